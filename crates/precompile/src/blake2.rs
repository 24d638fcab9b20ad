//! Blake2 precompile. More details in [`run`]

pub mod algo;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod avx2;
mod backend;
mod hasher;
#[cfg(target_arch = "aarch64")]
mod neon;
mod payload;

pub use backend::Backend;
pub use hasher::Blake2fHasher;
pub use payload::{encode_state, rounds, Blake2fInput, FinalFlagPolicy};

use crate::{PrecompileError, PrecompileOutput, PrecompileResult, PrecompileWithAddress};
use primitives::{Bytes, BLAKE2F_INPUT_LENGTH, BLAKE2F_OUTPUT_LENGTH};

/// Gas charged per round.
pub const F_ROUND: u64 = 1;
/// Length of the payload in bytes.
pub const INPUT_LENGTH: usize = BLAKE2F_INPUT_LENGTH;
/// Length of the output in bytes.
pub const OUTPUT_LENGTH: usize = BLAKE2F_OUTPUT_LENGTH;

/// Blake2 precompile, any non-zero final block byte means the final block
pub const FUN: PrecompileWithAddress = PrecompileWithAddress(crate::u64_to_address(9), run);

/// Blake2 precompile that rejects final block bytes other than 0 and 1
pub const FUN_STRICT: PrecompileWithAddress =
    PrecompileWithAddress(crate::u64_to_address(9), run_strict);

/// reference: <https://eips.ethereum.org/EIPS/eip-152>
/// input format:
/// [4 bytes for rounds][64 bytes for h][128 bytes for m][8 bytes for t_0][8 bytes for t_1][1 byte for f]
///
/// Uses [`FinalFlagPolicy::Lenient`].
pub fn run(input: &[u8], gas_limit: u64) -> PrecompileResult {
    run_with_policy(input, gas_limit, FinalFlagPolicy::Lenient)
}

/// Same as [`run`] with [`FinalFlagPolicy::Strict`].
pub fn run_strict(input: &[u8], gas_limit: u64) -> PrecompileResult {
    run_with_policy(input, gas_limit, FinalFlagPolicy::Strict)
}

/// Checks length, gas and final block flag in that order, then compresses.
pub fn run_with_policy(input: &[u8], gas_limit: u64, policy: FinalFlagPolicy) -> PrecompileResult {
    let Ok(input) = <&[u8; INPUT_LENGTH]>::try_from(input) else {
        tracing::trace!(len = input.len(), "blake2f: wrong input length");
        return Err(PrecompileError::Blake2WrongLength);
    };

    let rounds = rounds(input);
    let gas_used = rounds as u64 * F_ROUND;
    if gas_used > gas_limit {
        tracing::trace!(rounds, gas_limit, "blake2f: out of gas");
        return Err(PrecompileError::OutOfGas);
    }

    let input = Blake2fInput::decode(input, policy).inspect_err(|_| {
        tracing::trace!(flag = input[INPUT_LENGTH - 1], "blake2f: wrong final block flag");
    })?;
    let out = input.compress();
    tracing::trace!(rounds, gas_used, "blake2f");

    Ok(PrecompileOutput::new(gas_used, Bytes::copy_from_slice(&out)))
}
