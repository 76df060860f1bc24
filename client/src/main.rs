use std::path::Path;

use anyhow::Context;
use solana_sdk::signer::Signer;
use tracing::error;
use tracing_subscriber::EnvFilter;

use mathsol_client::api::FairLaunchApi;
use mathsol_client::config::{Config, Flow};
use mathsol_client::fair_launch::{DrawLoop, DrawLoopSettings};
use mathsol_client::lucky_box::MintFlow;
use mathsol_client::MathsolClient;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(error) = run().await {
        error!("{error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_file(Path::new("config.toml")).context("loading config.toml")?;
    let user = config.keypair().context("loading keypair")?;
    let client = MathsolClient::new(&config.rpc_url);

    match config.flow {
        Flow::LuckyBox => {
            let referrer = config.referrer()?.unwrap_or_else(|| user.pubkey());
            MintFlow::new(&client).run(&user, referrer).await?;
        }
        Flow::FairLaunch => {
            let api = FairLaunchApi::new(&config.api_base_url);
            let settings = DrawLoopSettings {
                iterations: config.iterations,
                interval: config.draw_interval(),
            };
            DrawLoop::with_settings(&client, api, settings)
                .run(&user)
                .await?;
        }
    }
    Ok(())
}
