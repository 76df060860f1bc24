//! Off-chain fair-launch API client.
//!
//! Read-then-decide only: nothing here mutates anything, and network
//! failures propagate to the caller untouched. The batch threshold exists
//! to amortize the fixed cost of a batched on-chain transaction; pending
//! sets at or below the threshold simply accumulate until a later cycle.

use std::str::FromStr;

use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;

use crate::constants::BATCH_THRESHOLD;
use crate::error::{ClientError, Result};

/// Off-chain projection of one draw attempt.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawLog {
    pub draw_id: u64,
    pub is_success: bool,
    /// 0 until the draw has been claimed.
    #[serde(default)]
    pub claim_time: i64,
    /// 0 until the draw has been refunded.
    #[serde(default)]
    pub refund_time: i64,
}

/// Authorization for one batched claim or refund transaction, issued by the
/// remote signer for an exact set of draw ids and consumed exactly once.
#[derive(Debug, Clone)]
pub struct BatchAuthorization {
    pub signer: Pubkey,
    pub message: Vec<u8>,
    pub signature: [u8; 64],
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct RawAuthorization {
    signer: String,
    message: String,
    signature: String,
}

impl TryFrom<RawAuthorization> for BatchAuthorization {
    type Error = ClientError;

    fn try_from(raw: RawAuthorization) -> Result<Self> {
        let signer = Pubkey::from_str(&raw.signer)
            .map_err(|e| ClientError::ApiResponse(format!("bad signer key: {e}")))?;
        let message = bs58::decode(&raw.message)
            .into_vec()
            .map_err(|e| ClientError::ApiResponse(format!("bad message encoding: {e}")))?;
        let signature: [u8; 64] = bs58::decode(&raw.signature)
            .into_vec()
            .map_err(|e| ClientError::ApiResponse(format!("bad signature encoding: {e}")))?
            .try_into()
            .map_err(|_| ClientError::ApiResponse("signature is not 64 bytes".to_string()))?;
        Ok(BatchAuthorization {
            signer,
            message,
            signature,
        })
    }
}

/// Successful draws the user has not claimed yet.
pub fn pending_claims(logs: &[DrawLog]) -> Vec<u64> {
    logs.iter()
        .filter(|log| log.is_success && log.claim_time == 0)
        .map(|log| log.draw_id)
        .collect()
}

/// Failed draws the user has not been refunded for yet.
pub fn pending_refunds(logs: &[DrawLog]) -> Vec<u64> {
    logs.iter()
        .filter(|log| !log.is_success && log.refund_time == 0)
        .map(|log| log.draw_id)
        .collect()
}

/// Whether a pending set is large enough to be worth a batched transaction.
pub fn exceeds_batch_threshold(draw_ids: &[u64]) -> bool {
    draw_ids.len() > BATCH_THRESHOLD
}

fn join_ids(draw_ids: &[u64]) -> String {
    draw_ids
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub struct FairLaunchApi {
    http: reqwest::Client,
    base_url: String,
}

impl FairLaunchApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn draw_logs_url(&self, user: &Pubkey) -> String {
        format!("{}/api/fair-launch/user-draw-logs?user={user}", self.base_url)
    }

    fn params_url(&self, endpoint: &str, user: &Pubkey, draw_ids: &[u64]) -> String {
        format!(
            "{}/api/fair-launch/{endpoint}?user={user}&drawId={}",
            self.base_url,
            join_ids(draw_ids)
        )
    }

    /// All draw records the service knows for `user`.
    pub async fn user_draw_logs(&self, user: &Pubkey) -> Result<Vec<DrawLog>> {
        let response = self
            .http
            .get(self.draw_logs_url(user))
            .send()
            .await?
            .error_for_status()?;
        let body: ApiResponse<Vec<DrawLog>> = response.json().await?;
        Ok(body.data)
    }

    async fn fetch_authorization(&self, url: String) -> Result<BatchAuthorization> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        let body: ApiResponse<RawAuthorization> = response.json().await?;
        body.data.try_into()
    }

    /// Authorization for claiming exactly `draw_ids`.
    pub async fn claim_params(&self, user: &Pubkey, draw_ids: &[u64]) -> Result<BatchAuthorization> {
        self.fetch_authorization(self.params_url("claim-params", user, draw_ids))
            .await
    }

    /// Authorization for refunding exactly `draw_ids`.
    pub async fn refund_params(
        &self,
        user: &Pubkey,
        draw_ids: &[u64],
    ) -> Result<BatchAuthorization> {
        self.fetch_authorization(self.params_url("refund-params", user, draw_ids))
            .await
    }
}
