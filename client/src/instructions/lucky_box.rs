//! Lucky-box instruction builders.

use borsh::BorshSerialize;
use mpl_token_metadata::ID as TOKEN_METADATA_PROGRAM_ID;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::{system_program, sysvar};
use spl_associated_token_account::get_associated_token_address;

use super::{build_data, ed25519};
use crate::api::BatchAuthorization;
use crate::constants::PROGRAM_ID;
use crate::error::Result;
use crate::pda;

const INITIALIZE: [u8; 8] = [0x6f, 0xe1, 0xd4, 0xa0, 0xa2, 0x2d, 0x9d, 0x6b];
const UPDATE: [u8; 8] = [0x66, 0x09, 0x47, 0xfe, 0x86, 0x55, 0x89, 0xef];
const MINT_NFT: [u8; 8] = [0x1b, 0xe3, 0x02, 0x1d, 0x46, 0xe7, 0x61, 0xdd];
const SWAP: [u8; 8] = [0x00, 0x04, 0x4f, 0xe3, 0x9b, 0x59, 0x77, 0x02];

#[derive(BorshSerialize)]
struct InitializeArgs {
    signer: Pubkey,
    mint_start_time: i64,
    swap_start_time: i64,
    seed_nft_count: u64,
}

#[derive(BorshSerialize)]
struct MintNftArgs {
    referrer: Pubkey,
}

#[derive(BorshSerialize)]
struct SwapArgs {
    token_amount: u64,
    signature: [u8; 64],
}

pub fn initialize(
    admin: &Pubkey,
    signer: Pubkey,
    mint_start_time: i64,
    swap_start_time: i64,
    seed_nft_count: u64,
) -> Result<Instruction> {
    let args = InitializeArgs {
        signer,
        mint_start_time,
        swap_start_time,
        seed_nft_count,
    };
    Ok(Instruction {
        program_id: PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(pda::find_lucky_box_pda(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: build_data(INITIALIZE, &args)?,
    })
}

pub fn update(
    admin: &Pubkey,
    signer: Pubkey,
    mint_start_time: i64,
    swap_start_time: i64,
    seed_nft_count: u64,
) -> Result<Instruction> {
    let args = InitializeArgs {
        signer,
        mint_start_time,
        swap_start_time,
        seed_nft_count,
    };
    Ok(Instruction {
        program_id: PROGRAM_ID,
        accounts: vec![
            AccountMeta::new_readonly(*admin, true),
            AccountMeta::new(pda::find_lucky_box_pda(), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: build_data(UPDATE, &args)?,
    })
}

/// Mints one lucky-box NFT to `user` under the program's collection.
/// `nft_mint` is a fresh keypair's public key; it co-signs the transaction.
pub fn mint_nft(user: &Pubkey, referrer: Pubkey, nft_mint: &Pubkey) -> Result<Instruction> {
    let collection = pda::find_collection_pda();
    Ok(Instruction {
        program_id: PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*user, true),
            AccountMeta::new(pda::find_lucky_box_pda(), false),
            AccountMeta::new(pda::find_lucky_box_user_pda(user), false),
            AccountMeta::new(collection, false),
            AccountMeta::new(pda::find_metadata_pda(&collection), false),
            AccountMeta::new(pda::find_master_edition_pda(&collection), false),
            AccountMeta::new(*nft_mint, true),
            AccountMeta::new(pda::find_metadata_pda(nft_mint), false),
            AccountMeta::new(pda::find_master_edition_pda(nft_mint), false),
            AccountMeta::new(get_associated_token_address(user, nft_mint), false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
            AccountMeta::new_readonly(TOKEN_METADATA_PROGRAM_ID, false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data: build_data(MINT_NFT, &MintNftArgs { referrer })?,
    })
}

/// Burns the user's lucky-box NFT and mints `token_amount` of the program
/// token in exchange. `token_mint` is the mint the user's token account is
/// derived from.
pub fn swap(
    user: &Pubkey,
    nft_mint: &Pubkey,
    token_mint: &Pubkey,
    token_amount: u64,
    signature: [u8; 64],
) -> Result<Instruction> {
    Ok(Instruction {
        program_id: PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*user, true),
            AccountMeta::new(pda::find_lucky_box_pda(), false),
            AccountMeta::new(*nft_mint, false),
            AccountMeta::new(get_associated_token_address(user, nft_mint), false),
            AccountMeta::new(pda::find_token_pda(), false),
            AccountMeta::new(get_associated_token_address(user, token_mint), false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
            AccountMeta::new_readonly(sysvar::instructions::id(), false),
        ],
        data: build_data(SWAP, &SwapArgs { token_amount, signature })?,
    })
}

/// [ed25519-verify, swap] — one atomic transaction's worth of instructions.
pub fn authorized_swap(
    user: &Pubkey,
    nft_mint: &Pubkey,
    token_mint: &Pubkey,
    auth: &BatchAuthorization,
    token_amount: u64,
) -> Result<Vec<Instruction>> {
    Ok(vec![
        ed25519::verify_signature(&auth.signer, &auth.message, &auth.signature),
        swap(user, nft_mint, token_mint, token_amount, auth.signature)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::ed25519_program;

    #[test]
    fn mint_nft_is_co_signed_by_the_fresh_mint() {
        let user = Pubkey::new_unique();
        let referrer = Pubkey::new_unique();
        let nft_mint = Pubkey::new_unique();
        let ix = mint_nft(&user, referrer, &nft_mint).unwrap();

        assert_eq!(ix.accounts.len(), 15);
        assert!(ix.accounts[0].is_signer);
        assert_eq!(ix.accounts[6].pubkey, nft_mint);
        assert!(ix.accounts[6].is_signer);
        assert_eq!(&ix.data[..8], &MINT_NFT);
        assert_eq!(&ix.data[8..], referrer.as_ref());
    }

    #[test]
    fn authorized_swap_pairs_one_verify_with_one_swap() {
        let user = Pubkey::new_unique();
        let nft_mint = Pubkey::new_unique();
        let token_mint = Pubkey::new_unique();
        let auth = BatchAuthorization {
            signer: Pubkey::new_unique(),
            message: b"swap".to_vec(),
            signature: [9u8; 64],
        };
        let ixs = authorized_swap(&user, &nft_mint, &token_mint, &auth, 1_000).unwrap();

        assert_eq!(ixs.len(), 2);
        assert_eq!(ixs[0].program_id, ed25519_program::id());
        assert_eq!(ixs[1].program_id, PROGRAM_ID);
        assert_eq!(&ixs[1].data[..8], &SWAP);
        assert_eq!(&ixs[1].data[8..16], &1_000u64.to_le_bytes());
        assert_eq!(&ixs[1].data[16..], &[9u8; 64]);
    }
}
