//! PDA derivation for the Mathsol program.
//!
//! Every address is a pure function of its seed string (and, where
//! applicable, a participant key) under the program id, so derivations are
//! stable and reproducible across calls.

use mpl_token_metadata::accounts::{MasterEdition, Metadata};
use solana_sdk::pubkey::Pubkey;

use crate::constants::{
    COLLECTION_SEED, FAIR_LAUNCH_SEED, FAIR_LAUNCH_USER_SEED, FAIR_LAUNCH_VAULT_SEED,
    LUCKY_BOX_SEED, LUCKY_BOX_USER_SEED, PROGRAM_ID, TOKEN_SEED,
};

pub fn find_collection_pda() -> Pubkey {
    Pubkey::find_program_address(&[COLLECTION_SEED], &PROGRAM_ID).0
}

pub fn find_token_pda() -> Pubkey {
    Pubkey::find_program_address(&[TOKEN_SEED], &PROGRAM_ID).0
}

pub fn find_lucky_box_pda() -> Pubkey {
    Pubkey::find_program_address(&[LUCKY_BOX_SEED], &PROGRAM_ID).0
}

pub fn find_lucky_box_user_pda(user: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[LUCKY_BOX_USER_SEED, user.as_ref()], &PROGRAM_ID).0
}

pub fn find_fair_launch_pda() -> Pubkey {
    Pubkey::find_program_address(&[FAIR_LAUNCH_SEED], &PROGRAM_ID).0
}

pub fn find_fair_launch_vault_pda() -> Pubkey {
    Pubkey::find_program_address(&[FAIR_LAUNCH_VAULT_SEED], &PROGRAM_ID).0
}

pub fn find_fair_launch_user_pda(user: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[FAIR_LAUNCH_USER_SEED, user.as_ref()], &PROGRAM_ID).0
}

/// Metaplex metadata account for `mint`.
pub fn find_metadata_pda(mint: &Pubkey) -> Pubkey {
    Metadata::find_pda(mint).0
}

/// Metaplex master-edition account for `mint`.
pub fn find_master_edition_pda(mint: &Pubkey) -> Pubkey {
    MasterEdition::find_pda(mint).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let user = Pubkey::new_unique();
        assert_eq!(find_collection_pda(), find_collection_pda());
        assert_eq!(find_token_pda(), find_token_pda());
        assert_eq!(find_fair_launch_pda(), find_fair_launch_pda());
        assert_eq!(find_fair_launch_vault_pda(), find_fair_launch_vault_pda());
        assert_eq!(
            find_fair_launch_user_pda(&user),
            find_fair_launch_user_pda(&user)
        );
        assert_eq!(
            find_lucky_box_user_pda(&user),
            find_lucky_box_user_pda(&user)
        );
    }

    #[test]
    fn distinct_users_get_distinct_accounts() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        assert_ne!(find_fair_launch_user_pda(&a), find_fair_launch_user_pda(&b));
        assert_ne!(find_lucky_box_user_pda(&a), find_lucky_box_user_pda(&b));
    }

    #[test]
    fn singleton_pdas_are_distinct_from_each_other() {
        let all = [
            find_collection_pda(),
            find_token_pda(),
            find_lucky_box_pda(),
            find_fair_launch_pda(),
            find_fair_launch_vault_pda(),
        ];
        for (i, a) in all.iter().enumerate() {
            for b in all.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
