use super::{InputError, PayloadArgs};
use clap::Parser;
use precompile::{blake2, FinalFlagPolicy, PrecompileError};
use primitives::hex;
use tracing::{debug, info};

/// Runs the precompile and prints the output as hex, followed by the gas used
#[derive(Parser, Debug)]
pub struct Cmd {
    #[command(flatten)]
    input: PayloadArgs,
    /// Gas limit of the call
    #[arg(long, default_value_t = u64::MAX)]
    gas_limit: u64,
    /// Reject final block bytes other than 0 and 1
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum Errors {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("Precompile failed: {0}")]
    Precompile(#[from] PrecompileError),
}

impl Cmd {
    /// Runs the command.
    pub fn run(&self) -> Result<(), Errors> {
        let payload = self.input.read()?.ok_or(InputError::MissingPayload)?;
        let policy = if self.strict {
            FinalFlagPolicy::Strict
        } else {
            FinalFlagPolicy::Lenient
        };
        debug!(len = payload.len(), ?policy, gas_limit = self.gas_limit, "running blake2f");

        let output = blake2::run_with_policy(&payload, self.gas_limit, policy)?;
        info!("blake2f succeeded");
        println!("{}", hex::encode(&output.bytes));
        println!("gas used: {}", output.gas_used);
        Ok(())
    }
}
