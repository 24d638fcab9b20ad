//! EIP-152 payload layout.
//!
//! `[4 bytes for rounds][64 bytes for h][128 bytes for m][8 bytes for t_0][8 bytes for t_1][1 byte for f]`
use super::{
    algo::{MESSAGE_LENGTH, STATE_LENGTH},
    Backend, F_ROUND, INPUT_LENGTH, OUTPUT_LENGTH,
};
use crate::PrecompileError;

const ROUNDS_OFFSET: usize = 0;
const H_OFFSET: usize = ROUNDS_OFFSET + 4;
const M_OFFSET: usize = H_OFFSET + STATE_LENGTH * 8;
const T_OFFSET: usize = M_OFFSET + MESSAGE_LENGTH;
const F_OFFSET: usize = T_OFFSET + 16;

const _: () = assert!(F_OFFSET + 1 == INPUT_LENGTH);

/// How the final block indicator byte is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FinalFlagPolicy {
    /// Any non-zero byte means the final block.
    #[default]
    Lenient,
    /// Only `0` and `1` are accepted, as EIP-152 specifies.
    Strict,
}

impl FinalFlagPolicy {
    /// Interprets the final block indicator byte.
    #[inline]
    pub fn parse(self, byte: u8) -> Result<bool, PrecompileError> {
        match (self, byte) {
            (_, 0) => Ok(false),
            (_, 1) | (Self::Lenient, _) => Ok(true),
            (Self::Strict, _) => Err(PrecompileError::Blake2WrongFinalIndicatorFlag),
        }
    }
}

/// Decoded input of the compression function `F`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Blake2fInput {
    /// Number of rounds.
    pub rounds: u32,
    /// Chaining state.
    pub h: [u64; STATE_LENGTH],
    /// Message block, decoded into words by the engine.
    pub m: [u8; MESSAGE_LENGTH],
    /// Offset counter, low word first.
    pub t: [u64; 2],
    /// Final block indicator.
    pub f: bool,
}

impl Default for Blake2fInput {
    fn default() -> Self {
        Self {
            rounds: 0,
            h: [0; STATE_LENGTH],
            m: [0; MESSAGE_LENGTH],
            t: [0; 2],
            f: false,
        }
    }
}

impl Blake2fInput {
    /// Decodes the payload. The only check performed is on the final block byte,
    /// according to `policy`.
    pub fn decode(
        input: &[u8; INPUT_LENGTH],
        policy: FinalFlagPolicy,
    ) -> Result<Self, PrecompileError> {
        let f = policy.parse(input[F_OFFSET])?;

        let mut h = [0u64; STATE_LENGTH];
        let (words, _) = input[H_OFFSET..M_OFFSET].as_chunks::<8>();
        for (item, word) in h.iter_mut().zip(words) {
            *item = u64::from_le_bytes(*word);
        }

        Ok(Self {
            rounds: rounds(input),
            h,
            m: read_array(input, M_OFFSET),
            t: [
                u64::from_le_bytes(read_array(input, T_OFFSET)),
                u64::from_le_bytes(read_array(input, T_OFFSET + 8)),
            ],
            f,
        })
    }

    /// Checks the length of `input` and decodes it.
    pub fn from_slice(input: &[u8], policy: FinalFlagPolicy) -> Result<Self, PrecompileError> {
        let input = <&[u8; INPUT_LENGTH]>::try_from(input)
            .map_err(|_| PrecompileError::Blake2WrongLength)?;
        Self::decode(input, policy)
    }

    /// Encodes into the wire payload, writing the final block flag as `0` or `1`.
    pub fn encode(&self) -> [u8; INPUT_LENGTH] {
        let mut out = [0u8; INPUT_LENGTH];
        out[ROUNDS_OFFSET..H_OFFSET].copy_from_slice(&self.rounds.to_be_bytes());
        for (i, h) in self.h.iter().enumerate() {
            let start = H_OFFSET + i * 8;
            out[start..start + 8].copy_from_slice(&h.to_le_bytes());
        }
        out[M_OFFSET..T_OFFSET].copy_from_slice(&self.m);
        out[T_OFFSET..T_OFFSET + 8].copy_from_slice(&self.t[0].to_le_bytes());
        out[T_OFFSET + 8..F_OFFSET].copy_from_slice(&self.t[1].to_le_bytes());
        out[F_OFFSET] = self.f as u8;
        out
    }

    /// Gas charged for running this input.
    #[inline]
    pub fn gas_used(&self) -> u64 {
        self.rounds as u64 * F_ROUND
    }

    /// Runs the compression function with the fastest available backend.
    pub fn compress(&self) -> [u8; OUTPUT_LENGTH] {
        self.compress_with(Backend::detect())
    }

    /// Runs the compression function with the given backend.
    pub fn compress_with(&self, backend: Backend) -> [u8; OUTPUT_LENGTH] {
        let mut h = self.h;
        backend.compress(self.rounds, &mut h, &self.m, self.t, self.f);
        encode_state(&h)
    }
}

/// Reads the big-endian rounds count from the payload.
#[inline]
pub fn rounds(input: &[u8; INPUT_LENGTH]) -> u32 {
    u32::from_be_bytes(read_array(input, ROUNDS_OFFSET))
}

/// Serializes the state as eight little-endian words.
#[inline]
pub fn encode_state(h: &[u64; STATE_LENGTH]) -> [u8; OUTPUT_LENGTH] {
    let mut out = [0u8; OUTPUT_LENGTH];
    for (i, h) in (0..OUTPUT_LENGTH).step_by(8).zip(h.iter()) {
        out[i..i + 8].copy_from_slice(&h.to_le_bytes());
    }
    out
}

#[inline]
fn read_array<const N: usize>(input: &[u8; INPUT_LENGTH], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&input[offset..offset + N]);
    out
}
