use super::{BackendArg, InputError, PayloadArgs};
use clap::Parser;
use precompile::{Backend, Blake2fInput, FinalFlagPolicy, PrecompileError};
use std::{hint::black_box, time::Instant};
use tracing::info;

/// Times repeated compression calls on one payload
///
/// Without a payload the EIP-152 "abc" vector is used.
#[derive(Parser, Debug)]
pub struct Cmd {
    #[command(flatten)]
    input: PayloadArgs,
    /// Number of calls
    #[arg(long, default_value_t = 10_000)]
    iterations: u64,
    /// Backend to time. Defaults to the detected one
    #[arg(long, value_enum)]
    backend: Option<BackendArg>,
}

#[derive(Debug, thiserror::Error)]
pub enum Errors {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("Invalid payload: {0}")]
    Precompile(#[from] PrecompileError),
    #[error("Backend `{0}` is not available on this machine")]
    Unavailable(Backend),
}

impl Cmd {
    /// Runs the command.
    pub fn run(&self) -> Result<(), Errors> {
        let payload = self.input.read_or_default()?;
        let input = Blake2fInput::from_slice(&payload, FinalFlagPolicy::Lenient)?;
        let backend = self.backend.map_or_else(Backend::detect, Backend::from);
        if !backend.is_available() {
            return Err(Errors::Unavailable(backend));
        }

        let start = Instant::now();
        for _ in 0..self.iterations {
            black_box(black_box(&input).compress_with(backend));
        }
        let elapsed = start.elapsed();

        let per_call = elapsed.div_f64(self.iterations.max(1) as f64);
        info!(%backend, rounds = input.rounds, iterations = self.iterations, "bench done");
        println!(
            "{backend}: {} calls of {} rounds in {elapsed:?} ({per_call:?} per call)",
            self.iterations, input.rounds
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portable_runs() {
        let cmd =
            Cmd::try_parse_from(["bench", "--iterations", "3", "--backend", "portable"]).unwrap();
        assert_eq!(cmd.backend, Some(BackendArg::Portable));
        assert!(cmd.run().is_ok());
    }

    #[test]
    fn unknown_backend_is_a_parse_error() {
        let err = Cmd::try_parse_from(["bench", "--backend", "sse2"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
