use super::{InputError, PayloadArgs};
use clap::Parser;
use precompile::{Backend, Blake2fInput, FinalFlagPolicy, PrecompileError};
use primitives::hex;
use tracing::{info, warn};

/// Lists the compression backends and checks each available one against the portable one
///
/// Without a payload the EIP-152 "abc" vector is used.
#[derive(Parser, Debug)]
pub struct Cmd {
    #[command(flatten)]
    input: PayloadArgs,
}

#[derive(Debug, thiserror::Error)]
pub enum Errors {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("Invalid payload: {0}")]
    Precompile(#[from] PrecompileError),
    #[error("Backend `{0}` disagrees with the portable backend")]
    Mismatch(Backend),
}

impl Cmd {
    /// Runs the command.
    pub fn run(&self) -> Result<(), Errors> {
        let payload = self.input.read_or_default()?;
        let input = Blake2fInput::from_slice(&payload, FinalFlagPolicy::Lenient)?;
        let expected = input.compress_with(Backend::Portable);
        let detected = Backend::detect();

        for &backend in Backend::ALL {
            if !backend.is_available() {
                println!("{backend:<8} unavailable");
                continue;
            }
            let output = input.compress_with(backend);
            if output != expected {
                warn!(%backend, output = hex::encode(output), "backend mismatch");
                return Err(Errors::Mismatch(backend));
            }
            let marker = if backend == detected { " (detected)" } else { "" };
            println!("{backend:<8} ok{marker}");
        }
        info!(output = hex::encode(expected), "all available backends agree");
        Ok(())
    }
}
