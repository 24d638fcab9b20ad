//! AVX2 backend.
//!
//! Code adapted from <https://github.com/oconnor663/blake2_simd/blob/82b3e2aee4d2384aabbeb146058301ff0dbd453f/blake2b/src/avx2.rs>
//! with the per round message loads replaced by lookups into [`SIGMA`](super::algo::SIGMA),
//! so arbitrary round counts reuse one loop body.
#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use super::algo::{gather, message_words, sigma, IV, MESSAGE_LENGTH, STATE_LENGTH};

// Adapted from https://github.com/rust-lang-nursery/stdsimd/pull/479.
macro_rules! _MM_SHUFFLE {
    ($z:expr, $y:expr, $x:expr, $w:expr) => {
        ($z << 6) | ($y << 4) | ($x << 2) | $w
    };
}

const DEGREE: usize = 4;

/// Compress a block of data using the BLAKE2 algorithm.
///
/// # Safety
///
/// The CPU must support AVX2.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn compress(
    rounds: u32,
    h: &mut [u64; STATE_LENGTH],
    block: &[u8; MESSAGE_LENGTH],
    t: [u64; 2],
    f: bool,
) {
    let m = message_words(block);
    let last_block = if f { u64::MAX } else { 0 };

    let h_low = loadu(h.as_ptr());
    let h_high = loadu(h.as_ptr().add(DEGREE));
    let mut a = h_low;
    let mut b = h_high;
    let mut c = loadu(IV.as_ptr());
    let mut d = xor(loadu(IV.as_ptr().add(DEGREE)), set4(t[0], t[1], last_block, 0));

    for r in 0..rounds {
        let s = sigma(r);
        g1(&mut a, &mut b, &mut c, &mut d, load_msg(&m, s, 0));
        g2(&mut a, &mut b, &mut c, &mut d, load_msg(&m, s, 1));
        diagonalize(&mut b, &mut c, &mut d);
        g1(&mut a, &mut b, &mut c, &mut d, load_msg(&m, s, 8));
        g2(&mut a, &mut b, &mut c, &mut d, load_msg(&m, s, 9));
        undiagonalize(&mut b, &mut c, &mut d);
    }

    a = xor(xor(a, c), h_low);
    b = xor(xor(b, d), h_high);

    storeu(a, h.as_mut_ptr());
    storeu(b, h.as_mut_ptr().add(DEGREE));
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn loadu(src: *const u64) -> __m256i {
    // This is an unaligned load, so the pointer cast is allowed.
    _mm256_loadu_si256(src as *const __m256i)
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn storeu(src: __m256i, dest: *mut u64) {
    // This is an unaligned store, so the pointer cast is allowed.
    _mm256_storeu_si256(dest as *mut __m256i, src)
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn load_msg(m: &[u64; 16], s: &[usize; 16], offset: usize) -> __m256i {
    let [w0, w1, w2, w3] = gather(m, s, offset);
    set4(w0, w1, w2, w3)
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn add(a: __m256i, b: __m256i) -> __m256i {
    _mm256_add_epi64(a, b)
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn xor(a: __m256i, b: __m256i) -> __m256i {
    _mm256_xor_si256(a, b)
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn set4(a: u64, b: u64, c: u64, d: u64) -> __m256i {
    _mm256_setr_epi64x(a as i64, b as i64, c as i64, d as i64)
}

// These rotations are the "simple version". For the "complicated version", see
// https://github.com/sneves/blake2-avx2/blob/b3723921f668df09ece52dcd225a36d4a4eea1d9/blake2b-common.h#L43-L46.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn rot32(x: __m256i) -> __m256i {
    _mm256_or_si256(_mm256_srli_epi64(x, 32), _mm256_slli_epi64(x, 64 - 32))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn rot24(x: __m256i) -> __m256i {
    _mm256_or_si256(_mm256_srli_epi64(x, 24), _mm256_slli_epi64(x, 64 - 24))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn rot16(x: __m256i) -> __m256i {
    _mm256_or_si256(_mm256_srli_epi64(x, 16), _mm256_slli_epi64(x, 64 - 16))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn rot63(x: __m256i) -> __m256i {
    _mm256_or_si256(_mm256_srli_epi64(x, 63), _mm256_slli_epi64(x, 64 - 63))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn g1(a: &mut __m256i, b: &mut __m256i, c: &mut __m256i, d: &mut __m256i, m: __m256i) {
    *a = add(*a, m);
    *a = add(*a, *b);
    *d = xor(*d, *a);
    *d = rot32(*d);
    *c = add(*c, *d);
    *b = xor(*b, *c);
    *b = rot24(*b);
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn g2(a: &mut __m256i, b: &mut __m256i, c: &mut __m256i, d: &mut __m256i, m: __m256i) {
    *a = add(*a, m);
    *a = add(*a, *b);
    *d = xor(*d, *a);
    *d = rot16(*d);
    *c = add(*c, *d);
    *b = xor(*b, *c);
    *b = rot63(*b);
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn diagonalize(b: &mut __m256i, c: &mut __m256i, d: &mut __m256i) {
    *b = _mm256_permute4x64_epi64(*b, _MM_SHUFFLE!(0, 3, 2, 1));
    *c = _mm256_permute4x64_epi64(*c, _MM_SHUFFLE!(1, 0, 3, 2));
    *d = _mm256_permute4x64_epi64(*d, _MM_SHUFFLE!(2, 1, 0, 3));
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn undiagonalize(b: &mut __m256i, c: &mut __m256i, d: &mut __m256i) {
    *b = _mm256_permute4x64_epi64(*b, _MM_SHUFFLE!(2, 1, 0, 3));
    *c = _mm256_permute4x64_epi64(*c, _MM_SHUFFLE!(1, 0, 3, 2));
    *d = _mm256_permute4x64_epi64(*d, _MM_SHUFFLE!(0, 3, 2, 1));
}
