//! Runtime configuration, read from a `config.toml` next to the binary.
//!
//! The draw-loop iteration count and inter-cycle pause are deliberately
//! configurable; the defaults are 1000 iterations and a 3000 ms pause.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;

use crate::constants::{DEFAULT_DRAW_INTERVAL_MS, DEFAULT_DRAW_ITERATIONS, DEVNET_ENDPOINT};
use crate::error::{ClientError, Result};

/// Which driver the process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flow {
    #[default]
    LuckyBox,
    FairLaunch,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// RPC endpoint; devnet by default.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Base URL of the off-chain fair-launch API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base58-encoded secret key of the one keypair this run acts as.
    pub keypair: String,

    #[serde(default)]
    pub flow: Flow,

    /// Referrer for the lucky-box mint; defaults to the user itself.
    #[serde(default)]
    pub referrer: Option<String>,

    /// Number of draw cycles per fair-launch run.
    #[serde(default = "default_iterations")]
    pub iterations: u64,

    /// Pause between draw cycles, in milliseconds.
    #[serde(default = "default_draw_interval_ms")]
    pub draw_interval_ms: u64,
}

fn default_rpc_url() -> String {
    DEVNET_ENDPOINT.to_string()
}

fn default_api_base_url() -> String {
    "https://api.mathsol.pro".to_string()
}

fn default_iterations() -> u64 {
    DEFAULT_DRAW_ITERATIONS
}

fn default_draw_interval_ms() -> u64 {
    DEFAULT_DRAW_INTERVAL_MS
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("read {}: {e}", path.display())))?;
        toml::from_str(&text).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// The keypair this run acts as.
    pub fn keypair(&self) -> Result<Keypair> {
        let bytes = bs58::decode(&self.keypair)
            .into_vec()
            .map_err(|e| ClientError::Config(format!("bad keypair encoding: {e}")))?;
        Keypair::from_bytes(&bytes)
            .map_err(|e| ClientError::Config(format!("bad keypair: {e}")))
    }

    pub fn referrer(&self) -> Result<Option<Pubkey>> {
        self.referrer
            .as_deref()
            .map(|s| {
                s.parse()
                    .map_err(|e| ClientError::Config(format!("bad referrer key: {e}")))
            })
            .transpose()
    }

    pub fn draw_interval(&self) -> Duration {
        Duration::from_millis(self.draw_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signer::Signer;

    #[test]
    fn minimal_config_gets_documented_defaults() {
        let config: Config = toml::from_str(r#"keypair = "placeholder""#).unwrap();
        assert_eq!(config.rpc_url, DEVNET_ENDPOINT);
        assert_eq!(config.flow, Flow::LuckyBox);
        assert_eq!(config.iterations, 1000);
        assert_eq!(config.draw_interval(), Duration::from_millis(3000));
        assert!(config.referrer.is_none());
    }

    #[test]
    fn flow_names_are_kebab_case() {
        let config: Config =
            toml::from_str("keypair = \"x\"\nflow = \"fair-launch\"").unwrap();
        assert_eq!(config.flow, Flow::FairLaunch);
        let config: Config = toml::from_str("keypair = \"x\"\nflow = \"lucky-box\"").unwrap();
        assert_eq!(config.flow, Flow::LuckyBox);
    }

    #[test]
    fn keypair_round_trips_through_base58() {
        let keypair = Keypair::new();
        let config: Config = toml::from_str(&format!(
            "keypair = \"{}\"",
            bs58::encode(keypair.to_bytes()).into_string()
        ))
        .unwrap();
        assert_eq!(config.keypair().unwrap().pubkey(), keypair.pubkey());
    }

    #[test]
    fn bad_keypair_is_a_config_error() {
        let config: Config = toml::from_str(r#"keypair = "not-base58-0OIl""#).unwrap();
        assert!(matches!(config.keypair(), Err(ClientError::Config(_))));
    }
}
