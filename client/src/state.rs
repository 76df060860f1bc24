//! On-chain account structures of the Mathsol program.
//!
//! Account data is the 8-byte Anchor discriminator followed by the borsh
//! encoding of the struct. Discriminators are `sha256("account:<Name>")[..8]`,
//! fixed by the program's IDL.

use borsh::BorshDeserialize;
use solana_sdk::pubkey::Pubkey;

use crate::error::{ClientError, Result};

/// Global fair-launch state.
#[derive(Debug, Clone, BorshDeserialize)]
pub struct FairLaunchAccount {
    /// The UNIX timestamp at which drawing opens.
    pub start_time: i64,

    /// The slot at which the event was started.
    pub start_slot: u64,

    /// The slot at which the event ends.
    pub end_slot: u64,

    /// Identifier assigned to the next draw.
    pub next_draw_id: u64,

    /// Price (in lamports) of a single draw.
    pub draw_price: u64,

    /// Lamports returned per failed draw.
    pub sol_refund_amount: u64,

    /// Token amount paid out per successful draw.
    pub token_claim_amount: u64,

    /// The administrator of the event.
    pub admin: Pubkey,

    /// The off-chain authority whose ed25519 signature authorizes
    /// claims and refunds.
    pub signer: Pubkey,
}

/// Per-user fair-launch state: the growing list of draw ids the user has
/// initiated. The account is allocated with a fixed capacity and must be
/// reallocated before the list would overflow it.
#[derive(Debug, Clone, Default, BorshDeserialize)]
pub struct FairLaunchUserAccount {
    pub draw_ids: Vec<u64>,
}

/// Global lucky-box state.
#[derive(Debug, Clone, BorshDeserialize)]
pub struct LuckyBoxAccount {
    pub mint_start_time: i64,
    pub swap_start_time: i64,
    pub seed_nft_count: u64,
    pub next_nft_id: u64,
    pub admin: Pubkey,
    pub signer: Pubkey,
}

/// Per-user lucky-box mint record. Existence of this account means the
/// user has already minted.
#[derive(Debug, Clone, BorshDeserialize)]
pub struct LuckyBoxUserAccount {
    pub referrer: Pubkey,
    pub nft_mint: Pubkey,
    pub nft_id: u64,
    pub mint_time: i64,
}

pub const ACCOUNT_DISCRIMINATOR_LEN: usize = 8;

impl FairLaunchAccount {
    pub const DISCRIMINATOR: [u8; 8] = [0x09, 0x06, 0xed, 0x6d, 0xa3, 0x0f, 0x0e, 0xe9];
}

impl LuckyBoxAccount {
    pub const DISCRIMINATOR: [u8; 8] = [0x01, 0xab, 0x61, 0xee, 0xef, 0xf9, 0xb4, 0xea];
}

impl LuckyBoxUserAccount {
    pub const DISCRIMINATOR: [u8; 8] = [0x9d, 0xe7, 0x01, 0x06, 0x24, 0x5e, 0x52, 0xd0];
}

impl FairLaunchUserAccount {
    pub const DISCRIMINATOR: [u8; 8] = [0xac, 0x70, 0x0e, 0xee, 0x6c, 0xe3, 0xe2, 0x5c];

    /// Discriminator plus the vec length prefix.
    pub const HEADER_LEN: usize = ACCOUNT_DISCRIMINATOR_LEN + 4;

    /// Byte width of one stored draw id.
    pub const ENTRY_LEN: usize = 8;

    /// Number of draw-id slots an allocation of `space` bytes can hold.
    pub fn capacity(space: usize) -> usize {
        space.saturating_sub(Self::HEADER_LEN) / Self::ENTRY_LEN
    }

    /// Whether an account of `space` bytes holding `current` entries must
    /// be extended before `additional` more draws are submitted.
    pub fn needs_realloc(space: usize, current: usize, additional: usize) -> bool {
        Self::capacity(space) <= current + additional
    }
}

/// Decodes `T` from raw account data, checking the discriminator first.
/// Trailing bytes are permitted: reallocated accounts carry unused
/// capacity after the serialized content.
pub fn deserialize_account<T: BorshDeserialize>(
    data: &[u8],
    discriminator: [u8; 8],
    name: &'static str,
) -> Result<T> {
    if data.len() < ACCOUNT_DISCRIMINATOR_LEN {
        return Err(ClientError::AccountTooShort(name));
    }
    let (disc, rest) = data.split_at(ACCOUNT_DISCRIMINATOR_LEN);
    if disc != discriminator {
        return Err(ClientError::BadDiscriminator(name));
    }
    let mut body = rest;
    T::deserialize(&mut body).map_err(|_| ClientError::AccountTooShort(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_check_matches_the_on_chain_layout() {
        // (space - 12) / 8 <= len + additional
        // freshly initialized account with room for one entry
        assert!(FairLaunchUserAccount::needs_realloc(20, 1, 1));
        assert!(!FairLaunchUserAccount::needs_realloc(28, 1, 1));
        // boundary: capacity exactly equal to the requested total triggers
        assert!(FairLaunchUserAccount::needs_realloc(12 + 8 * 5, 4, 1));
        assert!(!FairLaunchUserAccount::needs_realloc(12 + 8 * 6, 4, 1));
        // batch request
        assert!(FairLaunchUserAccount::needs_realloc(12 + 8 * 20, 5, 15));
        assert!(!FairLaunchUserAccount::needs_realloc(12 + 8 * 21, 5, 15));
    }

    #[test]
    fn capacity_is_zero_for_undersized_allocations() {
        assert_eq!(FairLaunchUserAccount::capacity(0), 0);
        assert_eq!(FairLaunchUserAccount::capacity(12), 0);
        assert_eq!(FairLaunchUserAccount::capacity(19), 0);
        assert_eq!(FairLaunchUserAccount::capacity(20), 1);
    }

    #[test]
    fn user_account_decodes_draw_ids() {
        let mut data = FairLaunchUserAccount::DISCRIMINATOR.to_vec();
        data.extend_from_slice(&3u32.to_le_bytes());
        for id in [7u64, 8, 9] {
            data.extend_from_slice(&id.to_le_bytes());
        }
        let account: FairLaunchUserAccount = deserialize_account(
            &data,
            FairLaunchUserAccount::DISCRIMINATOR,
            "FairLaunchUserAccount",
        )
        .unwrap();
        assert_eq!(account.draw_ids, vec![7, 8, 9]);
    }

    #[test]
    fn trailing_capacity_padding_is_tolerated() {
        // a reallocated account has unused slots after the serialized list
        let mut data = FairLaunchUserAccount::DISCRIMINATOR.to_vec();
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&1u64.to_le_bytes());
        data.extend_from_slice(&2u64.to_le_bytes());
        data.extend_from_slice(&[0u8; 8 * 10]);
        let account: FairLaunchUserAccount = deserialize_account(
            &data,
            FairLaunchUserAccount::DISCRIMINATOR,
            "FairLaunchUserAccount",
        )
        .unwrap();
        assert_eq!(account.draw_ids, vec![1, 2]);
    }

    #[test]
    fn wrong_discriminator_is_rejected() {
        let mut data = LuckyBoxAccount::DISCRIMINATOR.to_vec();
        data.extend_from_slice(&0u32.to_le_bytes());
        let result: Result<FairLaunchUserAccount> = deserialize_account(
            &data,
            FairLaunchUserAccount::DISCRIMINATOR,
            "FairLaunchUserAccount",
        );
        assert!(matches!(result, Err(ClientError::BadDiscriminator(_))));
    }
}
