//! Command line runner for the BLAKE2F precompile.
pub mod cmd;
