//! Client error types.
//!
//! Every failure surfaces unchanged to the top-level driver; there is no
//! retry or recovery below the process boundary. On-chain rejections that
//! carry a custom error code are mapped back to the program's error table
//! so the operator sees the program's own message instead of a bare code.

use solana_sdk::instruction::InstructionError;
use solana_sdk::transaction::TransactionError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// The Mathsol program's error table (codes 6000..).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathsolError {
    #[error("mint activity not yet started.")]
    MintNotYetStarted,
    #[error("mint activity already ended.")]
    MintEnded,
    #[error("duplicate mint.")]
    DuplicateMint,
    #[error("invalid signature.")]
    InvalidSignature,
    #[error("invalid draw id.")]
    FairLaunchInvalidDrawId,
}

impl MathsolError {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            6000 => Some(Self::MintNotYetStarted),
            6001 => Some(Self::MintEnded),
            6002 => Some(Self::DuplicateMint),
            6003 => Some(Self::InvalidSignature),
            6004 => Some(Self::FairLaunchInvalidDrawId),
            _ => None,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            Self::MintNotYetStarted => 6000,
            Self::MintEnded => 6001,
            Self::DuplicateMint => 6002,
            Self::InvalidSignature => 6003,
            Self::FairLaunchInvalidDrawId => 6004,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("rpc error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    #[error("program error {code}: {msg}", code = .0.code(), msg = .0)]
    Program(MathsolError),

    #[error("api request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("malformed api response: {0}")]
    ApiResponse(String),

    #[error("account not found: {0}")]
    AccountNotFound(&'static str),

    #[error("account data too short for {0}")]
    AccountTooShort(&'static str),

    #[error("unexpected discriminator for {0}")]
    BadDiscriminator(&'static str),

    #[error("encode error: {0}")]
    Encode(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl ClientError {
    /// Wraps an RPC failure, lifting custom instruction-error codes into
    /// the program error table when they belong to it.
    pub fn from_rpc(err: solana_client::client_error::ClientError) -> Self {
        if let Some(TransactionError::InstructionError(_, InstructionError::Custom(code))) =
            err.get_transaction_error()
        {
            if let Some(program_err) = MathsolError::from_code(code) {
                return ClientError::Program(program_err);
            }
        }
        ClientError::Rpc(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_table_round_trips_codes() {
        for code in 6000..6005 {
            let err = MathsolError::from_code(code).unwrap();
            assert_eq!(err.code(), code);
        }
        assert!(MathsolError::from_code(6005).is_none());
        assert!(MathsolError::from_code(1).is_none());
    }

    #[test]
    fn program_messages_match_the_idl() {
        assert_eq!(
            MathsolError::DuplicateMint.to_string(),
            "duplicate mint."
        );
        assert_eq!(
            MathsolError::InvalidSignature.to_string(),
            "invalid signature."
        );
    }
}
