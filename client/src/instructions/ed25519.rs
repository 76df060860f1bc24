//! Builder for the native ed25519 signature-verification instruction.
//!
//! The SDK's `new_ed25519_instruction` signs the message itself, but this
//! client only ever holds a pre-made signature from the off-chain authority,
//! so the instruction is assembled from its wire layout directly: a 2-byte
//! header, one 14-byte offsets block, then public key, signature, and
//! message. All offsets point into this same instruction (`u16::MAX`
//! instruction index).

use solana_sdk::ed25519_program;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;

pub const PUBKEY_LEN: usize = 32;
pub const SIGNATURE_LEN: usize = 64;

const OFFSETS_LEN: usize = 14;
const DATA_START: usize = 2 + OFFSETS_LEN;

/// Instruction index meaning "this instruction".
const CURRENT_INSTRUCTION: u16 = u16::MAX;

/// Builds a verification instruction for one `(signer, message, signature)`
/// triple. Placed ahead of a program instruction in the same transaction it
/// makes the pair atomic: the program instruction only executes if the
/// signature check passed.
pub fn verify_signature(
    signer: &Pubkey,
    message: &[u8],
    signature: &[u8; SIGNATURE_LEN],
) -> Instruction {
    let public_key_offset = DATA_START as u16;
    let signature_offset = public_key_offset + PUBKEY_LEN as u16;
    let message_data_offset = signature_offset + SIGNATURE_LEN as u16;

    let mut data = Vec::with_capacity(DATA_START + PUBKEY_LEN + SIGNATURE_LEN + message.len());
    data.push(1); // number of signatures
    data.push(0); // padding
    data.extend_from_slice(&signature_offset.to_le_bytes());
    data.extend_from_slice(&CURRENT_INSTRUCTION.to_le_bytes());
    data.extend_from_slice(&public_key_offset.to_le_bytes());
    data.extend_from_slice(&CURRENT_INSTRUCTION.to_le_bytes());
    data.extend_from_slice(&message_data_offset.to_le_bytes());
    data.extend_from_slice(&(message.len() as u16).to_le_bytes());
    data.extend_from_slice(&CURRENT_INSTRUCTION.to_le_bytes());
    data.extend_from_slice(signer.as_ref());
    data.extend_from_slice(signature);
    data.extend_from_slice(message);

    Instruction {
        program_id: ed25519_program::id(),
        accounts: vec![],
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_the_native_program() {
        let signer = Pubkey::new_unique();
        let message = b"draw:1,2,3".to_vec();
        let signature = [7u8; SIGNATURE_LEN];
        let ix = verify_signature(&signer, &message, &signature);

        assert_eq!(ix.program_id, ed25519_program::id());
        assert!(ix.accounts.is_empty());
        assert_eq!(ix.data[0], 1);
        assert_eq!(ix.data[1], 0);

        let u16_at = |i: usize| u16::from_le_bytes([ix.data[i], ix.data[i + 1]]);
        let signature_offset = u16_at(2) as usize;
        let public_key_offset = u16_at(6) as usize;
        let message_offset = u16_at(10) as usize;
        let message_len = u16_at(12) as usize;
        assert_eq!(u16_at(4), u16::MAX);
        assert_eq!(u16_at(8), u16::MAX);
        assert_eq!(u16_at(14), u16::MAX);

        assert_eq!(public_key_offset, DATA_START);
        assert_eq!(signature_offset, DATA_START + PUBKEY_LEN);
        assert_eq!(message_offset, DATA_START + PUBKEY_LEN + SIGNATURE_LEN);
        assert_eq!(message_len, message.len());

        assert_eq!(
            &ix.data[public_key_offset..public_key_offset + PUBKEY_LEN],
            signer.as_ref()
        );
        assert_eq!(
            &ix.data[signature_offset..signature_offset + SIGNATURE_LEN],
            &signature
        );
        assert_eq!(&ix.data[message_offset..message_offset + message_len], &message[..]);
        assert_eq!(ix.data.len(), message_offset + message_len);
    }
}
