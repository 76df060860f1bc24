//! Fair-launch instruction builders.

use borsh::BorshSerialize;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::{system_program, sysvar};
use spl_associated_token_account::get_associated_token_address;

use super::{build_data, ed25519};
use crate::api::BatchAuthorization;
use crate::constants::PROGRAM_ID;
use crate::error::Result;
use crate::pda;

const INITIALIZE: [u8; 8] = [0x24, 0x9c, 0x65, 0xeb, 0xb3, 0xca, 0x5d, 0x1f];
const UPDATE: [u8; 8] = [0xe4, 0x54, 0x34, 0x83, 0x50, 0xef, 0x1f, 0xa2];
const INITIALIZE_USER: [u8; 8] = [0x5b, 0x24, 0x1d, 0xde, 0xf3, 0xac, 0xbf, 0xa8];
const REALLOC_USER: [u8; 8] = [0xfc, 0x60, 0x78, 0x77, 0x97, 0xb2, 0x5d, 0xbd];
const DRAW: [u8; 8] = [0x4f, 0x04, 0x73, 0xf6, 0x70, 0x0d, 0x78, 0x66];
const BATCH_DRAW: [u8; 8] = [0x3f, 0x45, 0x95, 0xe9, 0x44, 0x37, 0xa6, 0xc9];
const REFUND: [u8; 8] = [0x11, 0x3a, 0x19, 0x00, 0xd6, 0x72, 0x89, 0x8b];
const BATCH_REFUND: [u8; 8] = [0x36, 0x81, 0x05, 0xd1, 0xb0, 0xb5, 0xaa, 0xff];
const CLAIM: [u8; 8] = [0x80, 0x43, 0x30, 0xea, 0xd9, 0x50, 0x91, 0x50];
const BATCH_CLAIM: [u8; 8] = [0x87, 0x3b, 0x47, 0x68, 0xcb, 0x31, 0x68, 0x42];
const EMERGENCY_WITHDRAW: [u8; 8] = [0x12, 0x8f, 0xf7, 0x6d, 0x5d, 0x94, 0x48, 0x65];

#[derive(BorshSerialize)]
struct InitializeArgs {
    signer: Pubkey,
    start_time: i64,
    draw_price: u64,
    sol_refund_amount: u64,
    token_claim_amount: u64,
}

#[derive(BorshSerialize)]
struct CountArgs {
    count: u64,
}

#[derive(BorshSerialize)]
struct SingleArgs {
    draw_id: u64,
    signature: [u8; 64],
}

#[derive(BorshSerialize)]
struct BatchArgs {
    draw_ids: Vec<u64>,
    signature: [u8; 64],
}

#[derive(BorshSerialize)]
struct AmountArgs {
    amount: u64,
}

pub fn initialize(
    admin: &Pubkey,
    signer: Pubkey,
    start_time: i64,
    draw_price: u64,
    sol_refund_amount: u64,
    token_claim_amount: u64,
) -> Result<Instruction> {
    let args = InitializeArgs {
        signer,
        start_time,
        draw_price,
        sol_refund_amount,
        token_claim_amount,
    };
    Ok(Instruction {
        program_id: PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(pda::find_fair_launch_pda(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: build_data(INITIALIZE, &args)?,
    })
}

pub fn update(
    admin: &Pubkey,
    signer: Pubkey,
    start_time: i64,
    draw_price: u64,
    sol_refund_amount: u64,
    token_claim_amount: u64,
) -> Result<Instruction> {
    let args = InitializeArgs {
        signer,
        start_time,
        draw_price,
        sol_refund_amount,
        token_claim_amount,
    };
    Ok(Instruction {
        program_id: PROGRAM_ID,
        accounts: vec![
            AccountMeta::new_readonly(*admin, true),
            AccountMeta::new(pda::find_fair_launch_pda(), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: build_data(UPDATE, &args)?,
    })
}

pub fn initialize_user(user: &Pubkey) -> Result<Instruction> {
    Ok(Instruction {
        program_id: PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*user, true),
            AccountMeta::new(pda::find_fair_launch_user_pda(user), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: INITIALIZE_USER.to_vec(),
    })
}

/// Extends the user account by `count` draw-id slots.
pub fn realloc_user(user: &Pubkey, count: u64) -> Result<Instruction> {
    Ok(Instruction {
        program_id: PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*user, true),
            AccountMeta::new(pda::find_fair_launch_user_pda(user), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: build_data(REALLOC_USER, &CountArgs { count })?,
    })
}

fn draw_accounts(user: &Pubkey) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new(*user, true),
        AccountMeta::new(pda::find_fair_launch_vault_pda(), false),
        AccountMeta::new(pda::find_fair_launch_pda(), false),
        AccountMeta::new(pda::find_fair_launch_user_pda(user), false),
        AccountMeta::new_readonly(system_program::id(), false),
    ]
}

pub fn draw(user: &Pubkey) -> Result<Instruction> {
    Ok(Instruction {
        program_id: PROGRAM_ID,
        accounts: draw_accounts(user),
        data: DRAW.to_vec(),
    })
}

pub fn batch_draw(user: &Pubkey, count: u64) -> Result<Instruction> {
    Ok(Instruction {
        program_id: PROGRAM_ID,
        accounts: draw_accounts(user),
        data: build_data(BATCH_DRAW, &CountArgs { count })?,
    })
}

fn refund_accounts(user: &Pubkey) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new(*user, true),
        AccountMeta::new(pda::find_fair_launch_vault_pda(), false),
        AccountMeta::new(pda::find_fair_launch_pda(), false),
        AccountMeta::new(pda::find_fair_launch_user_pda(user), false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new_readonly(sysvar::instructions::id(), false),
    ]
}

fn claim_accounts(user: &Pubkey, token_mint: &Pubkey) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new(*user, true),
        AccountMeta::new(pda::find_fair_launch_pda(), false),
        AccountMeta::new(pda::find_fair_launch_user_pda(user), false),
        AccountMeta::new(pda::find_token_pda(), false),
        AccountMeta::new(get_associated_token_address(user, token_mint), false),
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new_readonly(spl_associated_token_account::id(), false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new_readonly(sysvar::instructions::id(), false),
    ]
}

pub fn refund(user: &Pubkey, draw_id: u64, signature: [u8; 64]) -> Result<Instruction> {
    Ok(Instruction {
        program_id: PROGRAM_ID,
        accounts: refund_accounts(user),
        data: build_data(REFUND, &SingleArgs { draw_id, signature })?,
    })
}

pub fn batch_refund(user: &Pubkey, draw_ids: Vec<u64>, signature: [u8; 64]) -> Result<Instruction> {
    Ok(Instruction {
        program_id: PROGRAM_ID,
        accounts: refund_accounts(user),
        data: build_data(BATCH_REFUND, &BatchArgs { draw_ids, signature })?,
    })
}

pub fn claim(
    user: &Pubkey,
    token_mint: &Pubkey,
    draw_id: u64,
    signature: [u8; 64],
) -> Result<Instruction> {
    Ok(Instruction {
        program_id: PROGRAM_ID,
        accounts: claim_accounts(user, token_mint),
        data: build_data(CLAIM, &SingleArgs { draw_id, signature })?,
    })
}

pub fn batch_claim(
    user: &Pubkey,
    token_mint: &Pubkey,
    draw_ids: Vec<u64>,
    signature: [u8; 64],
) -> Result<Instruction> {
    Ok(Instruction {
        program_id: PROGRAM_ID,
        accounts: claim_accounts(user, token_mint),
        data: build_data(BATCH_CLAIM, &BatchArgs { draw_ids, signature })?,
    })
}

pub fn emergency_withdraw(admin: &Pubkey, recipient: &Pubkey, amount: u64) -> Result<Instruction> {
    Ok(Instruction {
        program_id: PROGRAM_ID,
        accounts: vec![
            AccountMeta::new_readonly(*admin, true),
            AccountMeta::new(pda::find_fair_launch_vault_pda(), false),
            AccountMeta::new(pda::find_fair_launch_pda(), false),
            AccountMeta::new(*recipient, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: build_data(EMERGENCY_WITHDRAW, &AmountArgs { amount })?,
    })
}

/// [ed25519-verify, claim] — one atomic transaction's worth of instructions.
pub fn authorized_claim(
    user: &Pubkey,
    token_mint: &Pubkey,
    auth: &BatchAuthorization,
    draw_id: u64,
) -> Result<Vec<Instruction>> {
    Ok(vec![
        ed25519::verify_signature(&auth.signer, &auth.message, &auth.signature),
        claim(user, token_mint, draw_id, auth.signature)?,
    ])
}

/// [ed25519-verify, batch-claim] — one atomic transaction's worth of
/// instructions for the whole pending set.
pub fn authorized_batch_claim(
    user: &Pubkey,
    token_mint: &Pubkey,
    auth: &BatchAuthorization,
    draw_ids: Vec<u64>,
) -> Result<Vec<Instruction>> {
    Ok(vec![
        ed25519::verify_signature(&auth.signer, &auth.message, &auth.signature),
        batch_claim(user, token_mint, draw_ids, auth.signature)?,
    ])
}

/// [ed25519-verify, refund].
pub fn authorized_refund(
    user: &Pubkey,
    auth: &BatchAuthorization,
    draw_id: u64,
) -> Result<Vec<Instruction>> {
    Ok(vec![
        ed25519::verify_signature(&auth.signer, &auth.message, &auth.signature),
        refund(user, draw_id, auth.signature)?,
    ])
}

/// [ed25519-verify, batch-refund].
pub fn authorized_batch_refund(
    user: &Pubkey,
    auth: &BatchAuthorization,
    draw_ids: Vec<u64>,
) -> Result<Vec<Instruction>> {
    Ok(vec![
        ed25519::verify_signature(&auth.signer, &auth.message, &auth.signature),
        batch_refund(user, draw_ids, auth.signature)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::ed25519_program;

    fn test_auth() -> BatchAuthorization {
        BatchAuthorization {
            signer: Pubkey::new_unique(),
            message: b"claim:1..12".to_vec(),
            signature: [3u8; 64],
        }
    }

    #[test]
    fn batch_claim_data_encodes_ids_then_signature() {
        let user = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let ids: Vec<u64> = (1..=12).collect();
        let ix = batch_claim(&user, &mint, ids.clone(), [3u8; 64]).unwrap();

        assert_eq!(&ix.data[..8], &BATCH_CLAIM);
        assert_eq!(&ix.data[8..12], &12u32.to_le_bytes());
        for (i, id) in ids.iter().enumerate() {
            let at = 12 + i * 8;
            assert_eq!(&ix.data[at..at + 8], &id.to_le_bytes());
        }
        assert_eq!(&ix.data[12 + 12 * 8..], &[3u8; 64]);
    }

    #[test]
    fn authorized_batch_claim_pairs_one_verify_with_one_claim() {
        let user = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let ids: Vec<u64> = (1..=12).collect();
        let ixs = authorized_batch_claim(&user, &mint, &test_auth(), ids).unwrap();

        assert_eq!(ixs.len(), 2);
        assert_eq!(ixs[0].program_id, ed25519_program::id());
        assert_eq!(ixs[1].program_id, PROGRAM_ID);
        assert_eq!(&ixs[1].data[..8], &BATCH_CLAIM);
        assert_eq!(&ixs[1].data[8..12], &12u32.to_le_bytes());
    }

    #[test]
    fn authorized_batch_refund_pairs_one_verify_with_one_refund() {
        let user = Pubkey::new_unique();
        let ixs = authorized_batch_refund(&user, &test_auth(), vec![4, 5, 6]).unwrap();

        assert_eq!(ixs.len(), 2);
        assert_eq!(ixs[0].program_id, ed25519_program::id());
        assert_eq!(ixs[1].program_id, PROGRAM_ID);
        assert_eq!(&ixs[1].data[..8], &BATCH_REFUND);
    }

    #[test]
    fn draw_touches_vault_state_and_user_account() {
        let user = Pubkey::new_unique();
        let ix = draw(&user).unwrap();
        assert_eq!(ix.data, DRAW.to_vec());
        assert_eq!(ix.accounts.len(), 5);
        assert_eq!(ix.accounts[0].pubkey, user);
        assert!(ix.accounts[0].is_signer);
        assert_eq!(ix.accounts[1].pubkey, pda::find_fair_launch_vault_pda());
        assert_eq!(ix.accounts[2].pubkey, pda::find_fair_launch_pda());
        assert_eq!(ix.accounts[3].pubkey, pda::find_fair_launch_user_pda(&user));
        assert_eq!(ix.accounts[4].pubkey, system_program::id());
    }

    #[test]
    fn realloc_count_is_borsh_u64() {
        let user = Pubkey::new_unique();
        let ix = realloc_user(&user, 21).unwrap();
        assert_eq!(&ix.data[..8], &REALLOC_USER);
        assert_eq!(&ix.data[8..], &21u64.to_le_bytes());
    }
}
