//! Collection and token creation builders (admin setup).

use borsh::BorshSerialize;
use mpl_token_metadata::ID as TOKEN_METADATA_PROGRAM_ID;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::{system_program, sysvar};
use spl_associated_token_account::get_associated_token_address;

use super::build_data;
use crate::constants::PROGRAM_ID;
use crate::error::Result;
use crate::pda;

const CREATE_COLLECTION: [u8; 8] = [0x9c, 0xfb, 0x5c, 0x36, 0xe9, 0x02, 0x10, 0x52];
const CREATE_TOKEN: [u8; 8] = [0x54, 0x34, 0xcc, 0xe4, 0x18, 0x8c, 0xea, 0x4b];

#[derive(BorshSerialize)]
struct CreateCollectionArgs {
    name: String,
    symbol: String,
    uri: String,
}

#[derive(BorshSerialize)]
struct CreateTokenArgs {
    name: String,
    symbol: String,
    uri: String,
    token_decimals: u8,
}

pub fn create_collection(
    authority: &Pubkey,
    name: String,
    symbol: String,
    uri: String,
) -> Result<Instruction> {
    let collection = pda::find_collection_pda();
    Ok(Instruction {
        program_id: PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new(collection, false),
            AccountMeta::new(pda::find_metadata_pda(&collection), false),
            AccountMeta::new(pda::find_master_edition_pda(&collection), false),
            AccountMeta::new(get_associated_token_address(authority, &collection), false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
            AccountMeta::new_readonly(TOKEN_METADATA_PROGRAM_ID, false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data: build_data(CREATE_COLLECTION, &CreateCollectionArgs { name, symbol, uri })?,
    })
}

pub fn create_token(
    authority: &Pubkey,
    name: String,
    symbol: String,
    uri: String,
    token_decimals: u8,
) -> Result<Instruction> {
    let token_mint = pda::find_token_pda();
    Ok(Instruction {
        program_id: PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new(token_mint, false),
            AccountMeta::new(pda::find_metadata_pda(&token_mint), false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
            AccountMeta::new_readonly(TOKEN_METADATA_PROGRAM_ID, false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data: build_data(
            CREATE_TOKEN,
            &CreateTokenArgs {
                name,
                symbol,
                uri,
                token_decimals,
            },
        )?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_token_encodes_strings_and_decimals() {
        let authority = Pubkey::new_unique();
        let ix = create_token(
            &authority,
            "Math".to_string(),
            "MTH".to_string(),
            "https://example.com/mth.json".to_string(),
            9,
        )
        .unwrap();

        assert_eq!(&ix.data[..8], &CREATE_TOKEN);
        // borsh string: u32 length prefix then utf-8 bytes
        assert_eq!(&ix.data[8..12], &4u32.to_le_bytes());
        assert_eq!(&ix.data[12..16], b"Math");
        assert_eq!(*ix.data.last().unwrap(), 9);
    }
}
