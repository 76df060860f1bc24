//! Program-wide constants: program id, PDA seeds, and client tuning values.

use solana_sdk::pubkey;
use solana_sdk::pubkey::Pubkey;

/// The deployed Mathsol program.
pub const PROGRAM_ID: Pubkey = pubkey!("4Mhnc3XvRMEbKYns84dhtEgPjA9ZATcwgDGb2dNdARmF");

/// Seed for the collection mint PDA.
pub const COLLECTION_SEED: &[u8] = b"Collection";

/// Seed for the token mint PDA.
pub const TOKEN_SEED: &[u8] = b"Token";

/// Seed for the fair-launch state PDA.
pub const FAIR_LAUNCH_SEED: &[u8] = b"FairLaunch";

/// Seed for the fair-launch SOL vault PDA.
pub const FAIR_LAUNCH_VAULT_SEED: &[u8] = b"FairLaunchVault";

/// Seed prefix for per-user fair-launch accounts.
pub const FAIR_LAUNCH_USER_SEED: &[u8] = b"FairLaunchUser";

/// Seed for the lucky-box state PDA.
pub const LUCKY_BOX_SEED: &[u8] = b"LuckyBox";

/// Seed prefix for per-user lucky-box accounts.
pub const LUCKY_BOX_USER_SEED: &[u8] = b"LuckyBoxUser";

/// Pending claim/refund batches at or below this size are deferred to a
/// later polling cycle; one batched transaction amortizes its fixed cost
/// only past this point.
pub const BATCH_THRESHOLD: usize = 10;

/// Extra draw-id slots requested on top of the immediate need when the
/// user account is reallocated.
pub const REALLOC_HEADROOM: u64 = 10;

/// Default number of draw cycles per run.
pub const DEFAULT_DRAW_ITERATIONS: u64 = 1000;

/// Default pause between draw cycles, in milliseconds.
pub const DEFAULT_DRAW_INTERVAL_MS: u64 = 3000;

/// Compute-unit limit for collection/token creation transactions.
pub const CREATE_COMPUTE_UNIT_LIMIT: u32 = 300_000;

/// Compute-unit limit for the NFT mint transaction.
pub const MINT_COMPUTE_UNIT_LIMIT: u32 = 400_000;

/// Default devnet RPC endpoint.
pub const DEVNET_ENDPOINT: &str = "https://api.devnet.solana.com";

/// Default mainnet RPC endpoint.
pub const MAINNET_ENDPOINT: &str = "https://api.mainnet-beta.solana.com";
