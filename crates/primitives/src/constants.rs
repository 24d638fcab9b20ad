//! Constants of the BLAKE2F precompile.
use alloy_primitives::{address, Address};

/// EIP-152: Add BLAKE2 compression function `F` precompile
///
/// The address the precompile is registered at since Istanbul.
pub const BLAKE2F_ADDRESS: Address = address!("0000000000000000000000000000000000000009");

/// Length of the precompile payload in bytes.
///
/// `[4 bytes rounds][64 bytes h][128 bytes m][8 bytes t_0][8 bytes t_1][1 byte f]`
pub const BLAKE2F_INPUT_LENGTH: usize = 213;

/// Length of the precompile output in bytes, the eight words of the updated state.
pub const BLAKE2F_OUTPUT_LENGTH: usize = 64;
