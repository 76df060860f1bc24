//! Draw loop driver.
//!
//! One repeating cycle, executed strictly in order: draw, pause,
//! claim-check, refund-check. There is no early exit and no branching on
//! the draw outcome beyond the threshold-gated claim/refund decisions; the
//! first unrecovered failure aborts the remaining iterations. The
//! claim/refund checks run unconditionally every cycle regardless of
//! whether anything accumulated.

use std::time::Duration;

use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::api::{self, FairLaunchApi};
use crate::client::MathsolClient;
use crate::constants::{DEFAULT_DRAW_INTERVAL_MS, DEFAULT_DRAW_ITERATIONS};
use crate::error::Result;

#[derive(Debug, Clone, Copy)]
pub struct DrawLoopSettings {
    /// Number of draw cycles per run.
    pub iterations: u64,
    /// Pause after each draw before the claim/refund checks.
    pub interval: Duration,
}

impl Default for DrawLoopSettings {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_DRAW_ITERATIONS,
            interval: Duration::from_millis(DEFAULT_DRAW_INTERVAL_MS),
        }
    }
}

pub struct DrawLoop<'a> {
    client: &'a MathsolClient,
    api: FairLaunchApi,
    settings: DrawLoopSettings,
}

impl<'a> DrawLoop<'a> {
    pub fn new(client: &'a MathsolClient, api: FairLaunchApi) -> Self {
        Self::with_settings(client, api, DrawLoopSettings::default())
    }

    pub fn with_settings(
        client: &'a MathsolClient,
        api: FairLaunchApi,
        settings: DrawLoopSettings,
    ) -> Self {
        Self {
            client,
            api,
            settings,
        }
    }

    pub async fn run(&self, user: &Keypair) -> Result<()> {
        info!(
            user = %user.pubkey(),
            iterations = self.settings.iterations,
            "starting fair-launch draw loop"
        );
        for cycle in 0..self.settings.iterations {
            let signature = self.client.fair_launch_draw(user).await?;
            info!(cycle, %signature, "draw submitted");
            sleep(self.settings.interval).await;
            self.claim(user).await?;
            self.refund(user).await?;
        }
        Ok(())
    }

    /// Claims every successful-but-unclaimed draw, once enough have
    /// accumulated to be worth one batched transaction.
    async fn claim(&self, user: &Keypair) -> Result<()> {
        let logs = self.api.user_draw_logs(&user.pubkey()).await?;
        let draw_ids = api::pending_claims(&logs);
        if !api::exceeds_batch_threshold(&draw_ids) {
            debug!(pending = draw_ids.len(), "claim batch below threshold, deferring");
            return Ok(());
        }
        let auth = self.api.claim_params(&user.pubkey(), &draw_ids).await?;
        let count = draw_ids.len();
        let signature = self
            .client
            .fair_launch_batch_claim(user, &auth, draw_ids)
            .await?;
        info!(count, %signature, "batch claim submitted");
        Ok(())
    }

    /// Refunds every failed-but-unrefunded draw, under the same threshold.
    async fn refund(&self, user: &Keypair) -> Result<()> {
        let logs = self.api.user_draw_logs(&user.pubkey()).await?;
        let draw_ids = api::pending_refunds(&logs);
        if !api::exceeds_batch_threshold(&draw_ids) {
            debug!(pending = draw_ids.len(), "refund batch below threshold, deferring");
            return Ok(());
        }
        let auth = self.api.refund_params(&user.pubkey(), &draw_ids).await?;
        let count = draw_ids.len();
        let signature = self
            .client
            .fair_launch_batch_refund(user, &auth, draw_ids)
            .await?;
        info!(count, %signature, "batch refund submitted");
        Ok(())
    }
}
