use super::{parse_hex, InputError};
use clap::Parser;
use precompile::Blake2fInput;
use primitives::hex;
use tracing::debug;

/// Builds a payload from its fields and prints it as hex
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Number of rounds
    #[arg(long, default_value_t = 12)]
    rounds: u32,
    /// Chaining state, 64 hex bytes holding eight little-endian words. Zero if omitted
    #[arg(long)]
    h: Option<String>,
    /// Message block, up to 128 hex bytes, padded with zeros
    #[arg(long)]
    m: Option<String>,
    /// Low word of the offset counter
    #[arg(long, default_value_t = 0)]
    t0: u64,
    /// High word of the offset counter
    #[arg(long, default_value_t = 0)]
    t1: u64,
    /// Mark the block as final
    #[arg(long = "final")]
    last_block: bool,
    /// Also print the output of the compression function
    #[arg(long)]
    compress: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum Errors {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("`{field}` must be {expected} bytes, got {got}")]
    WrongLength {
        field: &'static str,
        expected: &'static str,
        got: usize,
    },
}

impl Cmd {
    /// Runs the command.
    pub fn run(&self) -> Result<(), Errors> {
        let input = self.build()?;
        debug!(rounds = input.rounds, f = input.f, "encoded payload");
        println!("{}", hex::encode(input.encode()));
        if self.compress {
            println!("{}", hex::encode(input.compress()));
        }
        Ok(())
    }

    fn build(&self) -> Result<Blake2fInput, Errors> {
        let mut input = Blake2fInput {
            rounds: self.rounds,
            t: [self.t0, self.t1],
            f: self.last_block,
            ..Default::default()
        };

        if let Some(h) = &self.h {
            let bytes = parse_hex(h)?;
            if bytes.len() != input.h.len() * 8 {
                return Err(Errors::WrongLength {
                    field: "h",
                    expected: "64",
                    got: bytes.len(),
                });
            }
            for (word, chunk) in input.h.iter_mut().zip(bytes.chunks_exact(8)) {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(chunk);
                *word = u64::from_le_bytes(buf);
            }
        }

        if let Some(m) = &self.m {
            let bytes = parse_hex(m)?;
            if bytes.len() > input.m.len() {
                return Err(Errors::WrongLength {
                    field: "m",
                    expected: "at most 128",
                    got: bytes.len(),
                });
            }
            input.m[..bytes.len()].copy_from_slice(&bytes);
        }

        Ok(input)
    }
}
