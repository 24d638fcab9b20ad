//! Selection between the portable compression engine and the vectorized ones.
use super::algo::{self, MESSAGE_LENGTH, STATE_LENGTH};
use cfg_if::cfg_if;

/// Implementation of the compression function `F`.
///
/// Every backend produces output identical to [`Backend::Portable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Backend {
    /// Scalar implementation, available everywhere.
    Portable,
    /// x86 and x86_64 with AVX2.
    Avx2,
    /// aarch64 NEON.
    Neon,
}

impl Backend {
    /// All backends, available or not.
    pub const ALL: &'static [Backend] = &[Backend::Portable, Backend::Avx2, Backend::Neon];

    /// Returns the backend name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Backend::Portable => "portable",
            Backend::Avx2 => "avx2",
            Backend::Neon => "neon",
        }
    }

    /// Returns the backend with the given name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.as_str() == name)
    }

    /// Whether the backend can run on this CPU.
    pub fn is_available(self) -> bool {
        match self {
            Backend::Portable => true,
            Backend::Avx2 => avx2_available(),
            Backend::Neon => cfg!(target_arch = "aarch64"),
        }
    }

    /// Iterator over the backends that can run on this CPU.
    pub fn available() -> impl Iterator<Item = Backend> {
        Self::ALL.iter().copied().filter(|b| b.is_available())
    }

    /// Returns the fastest backend available on this CPU.
    ///
    /// Always [`Backend::Portable`] when the `portable` feature is enabled.
    pub fn detect() -> Self {
        if cfg!(feature = "portable") {
            return Backend::Portable;
        }
        [Backend::Avx2, Backend::Neon]
            .into_iter()
            .find(|b| b.is_available())
            .unwrap_or(Backend::Portable)
    }

    /// Runs the compression function `F` over `h` in place.
    ///
    /// Falls back to [`Backend::Portable`] if this backend is not available.
    pub fn compress(
        self,
        rounds: u32,
        h: &mut [u64; STATE_LENGTH],
        block: &[u8; MESSAGE_LENGTH],
        t: [u64; 2],
        f: bool,
    ) {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            // SAFETY: AVX2 support was just checked.
            Backend::Avx2 if avx2_available() => unsafe {
                super::avx2::compress(rounds, h, block, t, f)
            },
            #[cfg(target_arch = "aarch64")]
            // SAFETY: NEON is always present on aarch64.
            Backend::Neon => unsafe { super::neon::compress(rounds, h, block, t, f) },
            _ => algo::compress(rounds, h, block, t, f),
        }
    }
}

impl core::fmt::Display for Backend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

cfg_if! {
    if #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))] {
        fn avx2_available() -> bool {
            false
        }
    } else if #[cfg(target_feature = "avx2")] {
        fn avx2_available() -> bool {
            true
        }
    } else if #[cfg(feature = "std")] {
        fn avx2_available() -> bool {
            std::is_x86_feature_detected!("avx2")
        }
    } else {
        fn avx2_available() -> bool {
            false
        }
    }
}
