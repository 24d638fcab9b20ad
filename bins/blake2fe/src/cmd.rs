pub mod backends;
pub mod bench;
pub mod encode;
pub mod run;

use clap::{Args, Parser, ValueEnum};
use precompile::{blake2::Backend, Blake2fInput, INPUT_LENGTH};
use primitives::hex;
use std::{fs, io::Error as IoError, path::PathBuf};

/// `blake2fe` subcommands
#[derive(Parser, Debug)]
#[command(infer_subcommands = true)]
pub enum MainCmd {
    /// Run the precompile on a payload
    Run(run::Cmd),
    /// Build a payload from its fields
    Encode(encode::Cmd),
    /// List compression backends and check them against the portable one
    Backends(backends::Cmd),
    /// Time repeated compression calls
    Bench(bench::Cmd),
}

/// Error of any subcommand.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Run(#[from] run::Errors),
    #[error(transparent)]
    Encode(#[from] encode::Errors),
    #[error(transparent)]
    Backends(#[from] backends::Errors),
    #[error(transparent)]
    Bench(#[from] bench::Errors),
}

impl MainCmd {
    /// Runs the selected subcommand.
    pub fn run(&self) -> Result<(), Error> {
        match self {
            Self::Run(cmd) => cmd.run().map_err(Into::into),
            Self::Encode(cmd) => cmd.run().map_err(Into::into),
            Self::Backends(cmd) => cmd.run().map_err(Into::into),
            Self::Bench(cmd) => cmd.run().map_err(Into::into),
        }
    }
}

/// Errors while reading a payload.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("The specified path does not exist")]
    PathNotExists,
    #[error("No payload given")]
    MissingPayload,
    #[error("Invalid hex string")]
    InvalidHex,
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Payload given on the command line or in a file.
#[derive(Args, Debug)]
pub struct PayloadArgs {
    /// Hex-encoded 213 byte payload
    payload: Option<String>,
    /// Path to a file containing the hex-encoded payload
    ///
    /// Overrides the positional `payload` argument.
    #[arg(long)]
    path: Option<PathBuf>,
}

impl PayloadArgs {
    /// Reads the payload bytes, if any were given. The length is not checked.
    pub fn read(&self) -> Result<Option<Vec<u8>>, InputError> {
        let text = if let Some(path) = &self.path {
            if !path.exists() {
                return Err(InputError::PathNotExists);
            }
            fs::read_to_string(path)?
        } else if let Some(payload) = &self.payload {
            payload.clone()
        } else {
            return Ok(None);
        };
        parse_hex(&text).map(Some)
    }

    /// Reads the payload, falling back to [`abc_payload`].
    pub fn read_or_default(&self) -> Result<Vec<u8>, InputError> {
        Ok(self.read()?.unwrap_or_else(|| abc_payload().to_vec()))
    }
}

/// Decodes hex, tolerating surrounding whitespace and a `0x` prefix.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, InputError> {
    hex::decode(text.trim().trim_start_matches("0x")).map_err(|_| InputError::InvalidHex)
}

/// Compression backend selectable on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum BackendArg {
    /// Scalar engine
    Portable,
    /// x86 AVX2
    Avx2,
    /// aarch64 NEON
    Neon,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Portable => Backend::Portable,
            BackendArg::Avx2 => Backend::Avx2,
            BackendArg::Neon => Backend::Neon,
        }
    }
}

/// EIP-152 test vector: 12 rounds over "abc" as the final block.
pub fn abc_payload() -> [u8; INPUT_LENGTH] {
    let mut m = [0u8; 128];
    m[..3].copy_from_slice(b"abc");
    Blake2fInput {
        rounds: 12,
        h: [
            0x6a09e667f2bdc948,
            0xbb67ae8584caa73b,
            0x3c6ef372fe94f82b,
            0xa54ff53a5f1d36f1,
            0x510e527fade682d1,
            0x9b05688c2b3e6c1f,
            0x1f83d9abfb41bd6b,
            0x5be0cd19137e2179,
        ],
        m,
        t: [3, 0],
        f: true,
    }
    .encode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        MainCmd::command().debug_assert();
    }

    #[test]
    fn parse_hex_prefix_and_whitespace() {
        assert_eq!(parse_hex(" 0x0a0b\n").unwrap(), vec![0x0a, 0x0b]);
        assert!(matches!(parse_hex("zz"), Err(InputError::InvalidHex)));
    }

    #[test]
    fn backend_arg_names_match_backends() {
        for variant in BackendArg::value_variants() {
            let name = variant.to_possible_value().unwrap().get_name().to_owned();
            assert_eq!(Backend::from_name(&name), Some(Backend::from(*variant)));
        }
        assert_eq!(BackendArg::value_variants().len(), Backend::ALL.len());
    }

    #[test]
    fn default_payload_is_abc_vector() {
        let args = PayloadArgs {
            payload: None,
            path: None,
        };
        let payload = args.read_or_default().unwrap();
        assert_eq!(payload.len(), INPUT_LENGTH);
        assert_eq!(&payload[68..71], b"abc");
    }

    #[test]
    fn missing_path_is_reported() {
        let args = PayloadArgs {
            payload: None,
            path: Some("/nonexistent/blake2f/payload.hex".into()),
        };
        assert!(matches!(args.read(), Err(InputError::PathNotExists)));
    }

    #[test]
    fn infers_subcommands() {
        let cmd = MainCmd::try_parse_from(["blake2fe", "back"]).unwrap();
        assert!(matches!(cmd, MainCmd::Backends(_)));
    }
}
