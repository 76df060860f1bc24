/// Module containing program-wide constants such as the program id,
/// PDA seed strings, and draw-loop tuning defaults.
pub mod constants;

/// Module defining error types used throughout the client, including
/// the on-chain program's error table.
pub mod error;

/// Module defining the on-chain account structures of the program.
pub mod state;

/// Module for deriving the program's PDA addresses.
pub mod pda;

/// Module containing client-side builders for every program instruction.
pub mod instructions;

/// Module decoding the program's Anchor events from transaction logs.
pub mod events;

/// Module wrapping the off-chain fair-launch HTTP API.
pub mod api;

/// Module implementing the program client facade.
pub mod client;

/// Runtime configuration loaded from `config.toml`.
pub mod config;

/// The recurring draw/claim/refund loop driver.
pub mod fair_launch;

/// The one-shot lucky-box mint flow driver.
pub mod lucky_box;

pub use client::MathsolClient;
pub use error::{ClientError, MathsolError, Result};
