//! Client-side builders for the program's instruction set.
//!
//! Instruction data is the 8-byte Anchor sighash discriminator
//! (`sha256("global:<name>")[..8]`, fixed by the IDL) followed by the borsh
//! encoding of the arguments. Builders are pure: they derive the PDAs they
//! need and never touch the network.

pub mod ed25519;
pub mod fair_launch;
pub mod lucky_box;
pub mod metadata;

use borsh::BorshSerialize;

use crate::error::Result;

/// Discriminator plus borsh-encoded args.
pub(crate) fn build_data<T: BorshSerialize>(discriminator: [u8; 8], args: &T) -> Result<Vec<u8>> {
    let mut data = discriminator.to_vec();
    args.serialize(&mut data)?;
    Ok(data)
}
