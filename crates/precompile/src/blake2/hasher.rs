//! Incremental payload buffer.
use super::{Backend, Blake2fInput, FinalFlagPolicy, INPUT_LENGTH, OUTPUT_LENGTH};
use crate::PrecompileError;

/// Accumulates a payload from arbitrary chunks and compresses it once complete.
///
/// ```
/// use blake2f_precompile::{Blake2fHasher, Blake2fInput};
///
/// let payload = Blake2fInput::default().encode();
/// let mut hasher = Blake2fHasher::new();
/// for chunk in payload.chunks(50) {
///     hasher.update(chunk).unwrap();
/// }
/// let out = hasher.finalize().unwrap();
/// assert_eq!(out, Blake2fInput::default().compress());
/// assert!(hasher.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct Blake2fHasher {
    buffer: [u8; INPUT_LENGTH],
    position: usize,
    policy: FinalFlagPolicy,
    backend: Backend,
}

impl Default for Blake2fHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Blake2fHasher {
    /// New empty buffer with the lenient final flag policy and the detected backend.
    pub fn new() -> Self {
        Self::with_policy(FinalFlagPolicy::default())
    }

    /// New empty buffer with the given final flag policy.
    pub fn with_policy(policy: FinalFlagPolicy) -> Self {
        Self {
            buffer: [0; INPUT_LENGTH],
            position: 0,
            policy,
            backend: Backend::detect(),
        }
    }

    /// Uses `backend` for compression.
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Number of buffered bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.position
    }

    /// Whether nothing is buffered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.position == 0
    }

    /// Bytes still needed for a complete payload.
    #[inline]
    pub fn remaining(&self) -> usize {
        INPUT_LENGTH - self.position
    }

    /// Appends `data`.
    ///
    /// Fails without buffering anything if `data` does not fit in the payload.
    pub fn update(&mut self, data: &[u8]) -> Result<(), PrecompileError> {
        if data.len() > self.remaining() {
            return Err(PrecompileError::Blake2WrongLength);
        }
        self.buffer[self.position..self.position + data.len()].copy_from_slice(data);
        self.position += data.len();
        Ok(())
    }

    /// Compresses the buffered payload and resets the buffer.
    ///
    /// An incomplete payload is an error and stays buffered.
    pub fn finalize(&mut self) -> Result<[u8; OUTPUT_LENGTH], PrecompileError> {
        if self.remaining() != 0 {
            return Err(PrecompileError::Blake2WrongLength);
        }
        let input = Blake2fInput::decode(&self.buffer, self.policy);
        self.reset();
        Ok(input?.compress_with(self.backend))
    }

    /// Drops the buffered bytes.
    pub fn reset(&mut self) {
        self.buffer = [0; INPUT_LENGTH];
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(f: u8) -> [u8; INPUT_LENGTH] {
        let mut input = Blake2fInput {
            rounds: 3,
            ..Default::default()
        };
        input.m[0] = 0x61;
        let mut payload = input.encode();
        payload[INPUT_LENGTH - 1] = f;
        payload
    }

    #[test]
    fn byte_by_byte_matches_one_shot() {
        let payload = payload(1);
        let expected = Blake2fInput::from_slice(&payload, FinalFlagPolicy::Strict)
            .unwrap()
            .compress();

        let mut hasher = Blake2fHasher::new();
        for byte in payload {
            hasher.update(&[byte]).unwrap();
        }
        assert_eq!(hasher.remaining(), 0);
        assert_eq!(hasher.finalize().unwrap(), expected);
        assert!(hasher.is_empty());
    }

    #[test]
    fn overflow_is_rejected_without_buffering() {
        let mut hasher = Blake2fHasher::new();
        hasher.update(&[0u8; 200]).unwrap();
        assert_eq!(
            hasher.update(&[0u8; 14]),
            Err(PrecompileError::Blake2WrongLength)
        );
        assert_eq!(hasher.len(), 200);
        hasher.update(&[0u8; 13]).unwrap();
        assert_eq!(hasher.len(), INPUT_LENGTH);
    }

    #[test]
    fn incomplete_payload_stays_buffered() {
        let payload = payload(0);
        let mut hasher = Blake2fHasher::new();
        hasher.update(&payload[..212]).unwrap();
        assert_eq!(hasher.finalize(), Err(PrecompileError::Blake2WrongLength));
        assert_eq!(hasher.len(), 212);
        hasher.update(&payload[212..]).unwrap();
        assert!(hasher.finalize().is_ok());
    }

    #[test]
    fn strict_policy_rejects_flag_and_resets() {
        let mut hasher = Blake2fHasher::with_policy(FinalFlagPolicy::Strict);
        hasher.update(&payload(2)).unwrap();
        assert_eq!(
            hasher.finalize(),
            Err(PrecompileError::Blake2WrongFinalIndicatorFlag)
        );
        assert!(hasher.is_empty());

        let mut lenient = Blake2fHasher::new().with_backend(Backend::Portable);
        lenient.update(&payload(2)).unwrap();
        let mut strict = Blake2fHasher::with_policy(FinalFlagPolicy::Strict);
        strict.update(&payload(1)).unwrap();
        assert_eq!(lenient.finalize(), strict.finalize());
    }

    #[test]
    fn reset_discards_bytes() {
        let mut hasher = Blake2fHasher::new();
        hasher.update(&[1, 2, 3]).unwrap();
        hasher.reset();
        assert!(hasher.is_empty());
        assert_eq!(hasher.remaining(), INPUT_LENGTH);
    }
}
