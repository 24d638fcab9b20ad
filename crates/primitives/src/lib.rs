//! # blake2f-primitives
//!
//! Ethereum primitive types used across the BLAKE2F precompile crates.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

pub mod constants;

pub use constants::*;

pub use alloy_primitives::{self, address, hex, Address, Bytes};
