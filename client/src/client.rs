//! Program client facade.
//!
//! Translates feature-level intents into fully formed, submitted
//! transactions. The only state held is the RPC handle, the endpoint, and
//! the commitment established at construction; submission blocks until the
//! network confirms and surfaces the transport's error on failure — there is
//! no retry below the caller.

use mpl_token_metadata::accounts::Metadata;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_client::GetConfirmedSignaturesForAddress2Config;
use solana_client::rpc_config::{RpcSendTransactionConfig, RpcTransactionConfig};
use solana_client::rpc_response::RpcConfirmedTransactionStatusWithSignature;
use solana_sdk::account::Account;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::compute_budget::ComputeBudgetInstruction;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;
use solana_transaction_status::{EncodedConfirmedTransactionWithStatusMeta, UiTransactionEncoding};
use tracing::debug;

use crate::api::BatchAuthorization;
use crate::constants::{
    CREATE_COMPUTE_UNIT_LIMIT, MINT_COMPUTE_UNIT_LIMIT, PROGRAM_ID, REALLOC_HEADROOM,
};
use crate::error::{ClientError, Result};
use crate::events::{self, MathsolEvent};
use crate::instructions::{fair_launch, lucky_box, metadata};
use crate::pda;
use crate::state::{
    deserialize_account, FairLaunchAccount, FairLaunchUserAccount, LuckyBoxAccount,
    LuckyBoxUserAccount,
};

pub struct MathsolClient {
    rpc: RpcClient,
    endpoint: String,
    commitment: CommitmentConfig,
}

impl MathsolClient {
    /// Connects to `endpoint` at confirmed commitment.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_commitment(endpoint, CommitmentConfig::confirmed())
    }

    pub fn with_commitment(endpoint: impl Into<String>, commitment: CommitmentConfig) -> Self {
        let endpoint = endpoint.into();
        Self {
            rpc: RpcClient::new_with_commitment(endpoint.clone(), commitment),
            endpoint,
            commitment,
        }
    }

    /// Wraps an already-constructed RPC handle, for tests driving the
    /// facade against a mock transport.
    #[cfg(test)]
    pub(crate) fn from_rpc(rpc: RpcClient, commitment: CommitmentConfig) -> Self {
        let endpoint = rpc.url();
        Self {
            rpc,
            endpoint,
            commitment,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn program_id(&self) -> Pubkey {
        PROGRAM_ID
    }

    // ---- queries -------------------------------------------------------

    async fn account(&self, address: &Pubkey) -> Result<Option<Account>> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.commitment)
            .await
            .map_err(ClientError::from_rpc)?;
        Ok(response.value)
    }

    pub async fn query_lucky_box_account(&self) -> Result<Option<LuckyBoxAccount>> {
        match self.account(&pda::find_lucky_box_pda()).await? {
            Some(account) => Ok(Some(deserialize_account(
                &account.data,
                LuckyBoxAccount::DISCRIMINATOR,
                "LuckyBoxAccount",
            )?)),
            None => Ok(None),
        }
    }

    pub async fn query_lucky_box_user_account(
        &self,
        user: &Pubkey,
    ) -> Result<Option<LuckyBoxUserAccount>> {
        match self.account(&pda::find_lucky_box_user_pda(user)).await? {
            Some(account) => Ok(Some(deserialize_account(
                &account.data,
                LuckyBoxUserAccount::DISCRIMINATOR,
                "LuckyBoxUserAccount",
            )?)),
            None => Ok(None),
        }
    }

    pub async fn query_fair_launch_account(&self) -> Result<Option<FairLaunchAccount>> {
        match self.account(&pda::find_fair_launch_pda()).await? {
            Some(account) => Ok(Some(deserialize_account(
                &account.data,
                FairLaunchAccount::DISCRIMINATOR,
                "FairLaunchAccount",
            )?)),
            None => Ok(None),
        }
    }

    pub async fn query_fair_launch_user_account(
        &self,
        user: &Pubkey,
    ) -> Result<Option<FairLaunchUserAccount>> {
        match self.account(&pda::find_fair_launch_user_pda(user)).await? {
            Some(account) => Ok(Some(deserialize_account(
                &account.data,
                FairLaunchUserAccount::DISCRIMINATOR,
                "FairLaunchUserAccount",
            )?)),
            None => Ok(None),
        }
    }

    /// Metadata account content for an arbitrary metadata PDA.
    pub async fn query_metadata(&self, address: &Pubkey) -> Result<Option<Metadata>> {
        match self.account(address).await? {
            Some(account) => Ok(Some(
                Metadata::safe_deserialize(&account.data)
                    .map_err(|_| ClientError::AccountTooShort("Metadata"))?,
            )),
            None => Ok(None),
        }
    }

    pub async fn query_token_metadata(&self) -> Result<Option<Metadata>> {
        self.query_metadata(&pda::find_metadata_pda(&pda::find_token_pda()))
            .await
    }

    pub async fn query_collection_metadata(&self) -> Result<Option<Metadata>> {
        self.query_metadata(&pda::find_metadata_pda(&pda::find_collection_pda()))
            .await
    }

    /// Whether the user account must be extended before `additional` more
    /// draws: absent accounts always need it, otherwise the allocated byte
    /// size (minus header, per entry width) is compared against the current
    /// entry count plus the request.
    pub async fn should_realloc_user(&self, user: &Pubkey, additional: usize) -> Result<bool> {
        match self.account(&pda::find_fair_launch_user_pda(user)).await? {
            None => Ok(true),
            Some(account) => {
                let state: FairLaunchUserAccount = deserialize_account(
                    &account.data,
                    FairLaunchUserAccount::DISCRIMINATOR,
                    "FairLaunchUserAccount",
                )?;
                Ok(FairLaunchUserAccount::needs_realloc(
                    account.data.len(),
                    state.draw_ids.len(),
                    additional,
                ))
            }
        }
    }

    /// Recent transaction signatures involving the program, newest first,
    /// back to (and excluding) `until` when given.
    pub async fn query_signatures(
        &self,
        until: Option<Signature>,
    ) -> Result<Vec<RpcConfirmedTransactionStatusWithSignature>> {
        self.rpc
            .get_signatures_for_address_with_config(
                &PROGRAM_ID,
                GetConfirmedSignaturesForAddress2Config {
                    until,
                    commitment: Some(CommitmentConfig::confirmed()),
                    ..Default::default()
                },
            )
            .await
            .map_err(ClientError::from_rpc)
    }

    pub async fn query_transaction(
        &self,
        signature: &Signature,
    ) -> Result<EncodedConfirmedTransactionWithStatusMeta> {
        self.rpc
            .get_transaction_with_config(
                signature,
                RpcTransactionConfig {
                    encoding: Some(UiTransactionEncoding::Json),
                    commitment: Some(CommitmentConfig::confirmed()),
                    max_supported_transaction_version: Some(0),
                },
            )
            .await
            .map_err(ClientError::from_rpc)
    }

    pub fn parse_events(&self, tx: &EncodedConfirmedTransactionWithStatusMeta) -> Vec<MathsolEvent> {
        events::transaction_events(tx)
    }

    // ---- submission ----------------------------------------------------

    /// Signs and submits one transaction, skipping preflight and blocking
    /// until confirmation at the client's commitment.
    async fn send(
        &self,
        instructions: &[Instruction],
        payer: &Pubkey,
        signers: &[&Keypair],
    ) -> Result<Signature> {
        let blockhash = self
            .rpc
            .get_latest_blockhash()
            .await
            .map_err(ClientError::from_rpc)?;
        let transaction =
            Transaction::new_signed_with_payer(instructions, Some(payer), signers, blockhash);
        self.rpc
            .send_and_confirm_transaction_with_spinner_and_config(
                &transaction,
                self.commitment,
                RpcSendTransactionConfig {
                    skip_preflight: true,
                    ..Default::default()
                },
            )
            .await
            .map_err(ClientError::from_rpc)
    }

    // ---- lucky box -----------------------------------------------------

    pub async fn lucky_box_initialize(
        &self,
        admin: &Keypair,
        signer: Pubkey,
        mint_start_time: i64,
        swap_start_time: i64,
        seed_nft_count: u64,
    ) -> Result<Signature> {
        let ix = lucky_box::initialize(
            &admin.pubkey(),
            signer,
            mint_start_time,
            swap_start_time,
            seed_nft_count,
        )?;
        self.send(&[ix], &admin.pubkey(), &[admin]).await
    }

    pub async fn lucky_box_update(
        &self,
        admin: &Keypair,
        signer: Pubkey,
        mint_start_time: i64,
        swap_start_time: i64,
        seed_nft_count: u64,
    ) -> Result<Signature> {
        let ix = lucky_box::update(
            &admin.pubkey(),
            signer,
            mint_start_time,
            swap_start_time,
            seed_nft_count,
        )?;
        self.send(&[ix], &admin.pubkey(), &[admin]).await
    }

    pub async fn create_collection(
        &self,
        admin: &Keypair,
        name: String,
        symbol: String,
        uri: String,
    ) -> Result<Signature> {
        let ixs = [
            ComputeBudgetInstruction::set_compute_unit_limit(CREATE_COMPUTE_UNIT_LIMIT),
            metadata::create_collection(&admin.pubkey(), name, symbol, uri)?,
        ];
        self.send(&ixs, &admin.pubkey(), &[admin]).await
    }

    pub async fn create_token(
        &self,
        payer: &Keypair,
        name: String,
        symbol: String,
        uri: String,
        token_decimals: u8,
    ) -> Result<Signature> {
        let ixs = [
            ComputeBudgetInstruction::set_compute_unit_limit(CREATE_COMPUTE_UNIT_LIMIT),
            metadata::create_token(&payer.pubkey(), name, symbol, uri, token_decimals)?,
        ];
        self.send(&ixs, &payer.pubkey(), &[payer]).await
    }

    /// Mints one lucky-box NFT. A fresh mint keypair is generated per call
    /// and co-signs the transaction.
    pub async fn lucky_box_mint_nft(&self, user: &Keypair, referrer: Pubkey) -> Result<Signature> {
        let nft_mint = Keypair::new();
        debug!(nft_mint = %nft_mint.pubkey(), "minting lucky-box nft");
        let ixs = [
            ComputeBudgetInstruction::set_compute_unit_limit(MINT_COMPUTE_UNIT_LIMIT),
            lucky_box::mint_nft(&user.pubkey(), referrer, &nft_mint.pubkey())?,
        ];
        self.send(&ixs, &user.pubkey(), &[user, &nft_mint]).await
    }

    /// Burns the user's lucky-box NFT for program tokens. The signature
    /// check and the swap ride in the same atomic transaction.
    pub async fn lucky_box_swap(
        &self,
        user: &Keypair,
        nft_mint: &Pubkey,
        auth: &BatchAuthorization,
        token_amount: u64,
    ) -> Result<Signature> {
        let token_mint = self.token_mint().await?;
        let ixs =
            lucky_box::authorized_swap(&user.pubkey(), nft_mint, &token_mint, auth, token_amount)?;
        self.send(&ixs, &user.pubkey(), &[user]).await
    }

    // ---- fair launch ---------------------------------------------------

    pub async fn fair_launch_initialize(
        &self,
        admin: &Keypair,
        signer: Pubkey,
        start_time: i64,
        draw_price: u64,
        sol_refund_amount: u64,
        token_claim_amount: u64,
    ) -> Result<Signature> {
        let ix = fair_launch::initialize(
            &admin.pubkey(),
            signer,
            start_time,
            draw_price,
            sol_refund_amount,
            token_claim_amount,
        )?;
        self.send(&[ix], &admin.pubkey(), &[admin]).await
    }

    pub async fn fair_launch_update(
        &self,
        admin: &Keypair,
        signer: Pubkey,
        start_time: i64,
        draw_price: u64,
        sol_refund_amount: u64,
        token_claim_amount: u64,
    ) -> Result<Signature> {
        let ix = fair_launch::update(
            &admin.pubkey(),
            signer,
            start_time,
            draw_price,
            sol_refund_amount,
            token_claim_amount,
        )?;
        self.send(&[ix], &admin.pubkey(), &[admin]).await
    }

    /// User-init and capacity-extension instructions that must run ahead of
    /// `count` new draws, if any.
    async fn draw_prelude(&self, user: &Pubkey, count: u64) -> Result<Vec<Instruction>> {
        let mut prelude = Vec::new();
        match self.account(&pda::find_fair_launch_user_pda(user)).await? {
            None => {
                prelude.push(fair_launch::initialize_user(user)?);
                prelude.push(fair_launch::realloc_user(user, count + REALLOC_HEADROOM)?);
            }
            Some(account) => {
                let state: FairLaunchUserAccount = deserialize_account(
                    &account.data,
                    FairLaunchUserAccount::DISCRIMINATOR,
                    "FairLaunchUserAccount",
                )?;
                if FairLaunchUserAccount::needs_realloc(
                    account.data.len(),
                    state.draw_ids.len(),
                    count as usize,
                ) {
                    debug!(user = %user, count, "extending user draw capacity");
                    prelude.push(fair_launch::realloc_user(user, count + REALLOC_HEADROOM)?);
                }
            }
        }
        Ok(prelude)
    }

    /// Submits one draw, prepending user-init/realloc in the same
    /// transaction when needed.
    pub async fn fair_launch_draw(&self, user: &Keypair) -> Result<Signature> {
        let mut ixs = self.draw_prelude(&user.pubkey(), 1).await?;
        ixs.push(fair_launch::draw(&user.pubkey())?);
        self.send(&ixs, &user.pubkey(), &[user]).await
    }

    /// Submits `count` draws in one instruction.
    pub async fn fair_launch_batch_draw(&self, user: &Keypair, count: u64) -> Result<Signature> {
        let mut ixs = self.draw_prelude(&user.pubkey(), count).await?;
        ixs.push(fair_launch::batch_draw(&user.pubkey(), count)?);
        self.send(&ixs, &user.pubkey(), &[user]).await
    }

    pub async fn fair_launch_claim(
        &self,
        user: &Keypair,
        auth: &BatchAuthorization,
        draw_id: u64,
    ) -> Result<Signature> {
        let token_mint = self.token_mint().await?;
        let ixs = fair_launch::authorized_claim(&user.pubkey(), &token_mint, auth, draw_id)?;
        self.send(&ixs, &user.pubkey(), &[user]).await
    }

    pub async fn fair_launch_batch_claim(
        &self,
        user: &Keypair,
        auth: &BatchAuthorization,
        draw_ids: Vec<u64>,
    ) -> Result<Signature> {
        let token_mint = self.token_mint().await?;
        let ixs = fair_launch::authorized_batch_claim(&user.pubkey(), &token_mint, auth, draw_ids)?;
        self.send(&ixs, &user.pubkey(), &[user]).await
    }

    pub async fn fair_launch_refund(
        &self,
        user: &Keypair,
        auth: &BatchAuthorization,
        draw_id: u64,
    ) -> Result<Signature> {
        let ixs = fair_launch::authorized_refund(&user.pubkey(), auth, draw_id)?;
        self.send(&ixs, &user.pubkey(), &[user]).await
    }

    pub async fn fair_launch_batch_refund(
        &self,
        user: &Keypair,
        auth: &BatchAuthorization,
        draw_ids: Vec<u64>,
    ) -> Result<Signature> {
        let ixs = fair_launch::authorized_batch_refund(&user.pubkey(), auth, draw_ids)?;
        self.send(&ixs, &user.pubkey(), &[user]).await
    }

    pub async fn fair_launch_emergency_withdraw(
        &self,
        admin: &Keypair,
        recipient: &Pubkey,
        amount: u64,
    ) -> Result<Signature> {
        let ix = fair_launch::emergency_withdraw(&admin.pubkey(), recipient, amount)?;
        self.send(&[ix], &admin.pubkey(), &[admin]).await
    }

    /// The program token's mint, read from its metadata account.
    async fn token_mint(&self) -> Result<Pubkey> {
        let metadata = self
            .query_token_metadata()
            .await?
            .ok_or(ClientError::AccountNotFound("token metadata"))?;
        Ok(metadata.mint)
    }
}
