//! # blake2f-precompile
//!
//! EIP-152 BLAKE2 compression function `F` precompiled contract.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

pub mod blake2;
pub mod interface;

pub use blake2::{
    Backend, Blake2fHasher, Blake2fInput, FinalFlagPolicy, F_ROUND, INPUT_LENGTH, OUTPUT_LENGTH,
};
pub use interface::*;
pub use primitives;

use primitives::Address;

/// Precompile function paired with the address it is registered at.
#[derive(Clone, Debug)]
pub struct PrecompileWithAddress(pub Address, pub PrecompileFn);

impl From<(Address, PrecompileFn)> for PrecompileWithAddress {
    fn from(value: (Address, PrecompileFn)) -> Self {
        PrecompileWithAddress(value.0, value.1)
    }
}

impl From<PrecompileWithAddress> for (Address, PrecompileFn) {
    fn from(value: PrecompileWithAddress) -> Self {
        (value.0, value.1)
    }
}

impl PrecompileWithAddress {
    /// Returns reference of address.
    #[inline]
    pub fn address(&self) -> &Address {
        &self.0
    }

    /// Returns reference of precompile.
    #[inline]
    pub fn precompile(&self) -> &PrecompileFn {
        &self.1
    }
}

/// Const function for making an address by concatenating the bytes from two given numbers.
///
/// Note that 32 + 128 = 160 = 20 bytes (the length of an address).
///
/// This function is used as a convenience for specifying the addresses of the various precompiles.
#[inline]
pub const fn u64_to_address(x: u64) -> Address {
    let x = x.to_be_bytes();
    Address::new([
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, x[0], x[1], x[2], x[3], x[4], x[5], x[6], x[7],
    ])
}

#[cfg(test)]
mod test {
    use super::*;
    use primitives::BLAKE2F_ADDRESS;

    #[test]
    fn test_blake2f_address() {
        assert_eq!(u64_to_address(9), BLAKE2F_ADDRESS);
        assert_eq!(blake2::FUN.address(), &BLAKE2F_ADDRESS);
        assert_eq!(blake2::FUN_STRICT.address(), &BLAKE2F_ADDRESS);
    }

    #[test]
    fn test_precompile_with_address_conversion() {
        let (address, precompile): (Address, PrecompileFn) = blake2::FUN.into();
        let back = PrecompileWithAddress::from((address, precompile));
        assert_eq!(back.address(), &BLAKE2F_ADDRESS);

        let input = Blake2fInput::default().encode();
        let output = (back.precompile())(&input, u64::MAX).unwrap();
        assert_eq!(output.gas_used, 0);
        assert_eq!(output.bytes.len(), OUTPUT_LENGTH);
    }
}
