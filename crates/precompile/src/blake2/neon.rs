//! NEON backend. Each row is held as a low and a high `uint64x2_t` half.
use core::arch::aarch64::*;

use super::algo::{gather, message_words, sigma, IV, MESSAGE_LENGTH, STATE_LENGTH};

#[derive(Clone, Copy)]
struct Row {
    lo: uint64x2_t,
    hi: uint64x2_t,
}

/// Compress a block of data using the BLAKE2 algorithm.
///
/// # Safety
///
/// NEON is part of the aarch64 baseline; the function only needs to be `unsafe`
/// because the intrinsics are.
pub(crate) unsafe fn compress(
    rounds: u32,
    h: &mut [u64; STATE_LENGTH],
    block: &[u8; MESSAGE_LENGTH],
    t: [u64; 2],
    f: bool,
) {
    let m = message_words(block);
    let last_block = if f { u64::MAX } else { 0 };

    let h_low = load(h.as_ptr());
    let h_high = load(h.as_ptr().add(4));
    let mut a = h_low;
    let mut b = h_high;
    let mut c = load(IV.as_ptr());
    let mut d = xor(load(IV.as_ptr().add(4)), set4(t[0], t[1], last_block, 0));

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

    store(a, h.as_mut_ptr());
    store(b, h.as_mut_ptr().add(4));
}

#[inline(always)]
unsafe fn load(src: *const u64) -> Row {
    Row {
        lo: vld1q_u64(src),
        hi: vld1q_u64(src.add(2)),
    }
}

#[inline(always)]
unsafe fn store(src: Row, dest: *mut u64) {
    vst1q_u64(dest, src.lo);
    vst1q_u64(dest.add(2), src.hi);
}

#[inline(always)]
unsafe fn set4(a: u64, b: u64, c: u64, d: u64) -> Row {
    let words = [a, b, c, d];
    load(words.as_ptr())
}

#[inline(always)]
unsafe fn load_msg(m: &[u64; 16], s: &[usize; 16], offset: usize) -> Row {
    let words = gather(m, s, offset);
    load(words.as_ptr())
}

#[inline(always)]
unsafe fn add(a: Row, b: Row) -> Row {
    Row {
        lo: vaddq_u64(a.lo, b.lo),
        hi: vaddq_u64(a.hi, b.hi),
    }
}

#[inline(always)]
unsafe fn xor(a: Row, b: Row) -> Row {
    Row {
        lo: veorq_u64(a.lo, b.lo),
        hi: veorq_u64(a.hi, b.hi),
    }
}

#[inline(always)]
unsafe fn rot32(x: Row) -> Row {
    Row {
        lo: vorrq_u64(vshrq_n_u64::<32>(x.lo), vshlq_n_u64::<32>(x.lo)),
        hi: vorrq_u64(vshrq_n_u64::<32>(x.hi), vshlq_n_u64::<32>(x.hi)),
    }
}

#[inline(always)]
unsafe fn rot24(x: Row) -> Row {
    Row {
        lo: vorrq_u64(vshrq_n_u64::<24>(x.lo), vshlq_n_u64::<40>(x.lo)),
        hi: vorrq_u64(vshrq_n_u64::<24>(x.hi), vshlq_n_u64::<40>(x.hi)),
    }
}

#[inline(always)]
unsafe fn rot16(x: Row) -> Row {
    Row {
        lo: vorrq_u64(vshrq_n_u64::<16>(x.lo), vshlq_n_u64::<48>(x.lo)),
        hi: vorrq_u64(vshrq_n_u64::<16>(x.hi), vshlq_n_u64::<48>(x.hi)),
    }
}

#[inline(always)]
unsafe fn rot63(x: Row) -> Row {
    Row {
        lo: vorrq_u64(vshrq_n_u64::<63>(x.lo), vshlq_n_u64::<1>(x.lo)),
        hi: vorrq_u64(vshrq_n_u64::<63>(x.hi), vshlq_n_u64::<1>(x.hi)),
    }
}

#[inline(always)]
unsafe fn g1(a: &mut Row, b: &mut Row, c: &mut Row, d: &mut Row, m: Row) {
    *a = add(add(*a, m), *b);
    *d = rot32(xor(*d, *a));
    *c = add(*c, *d);
    *b = rot24(xor(*b, *c));
}

#[inline(always)]
unsafe fn g2(a: &mut Row, b: &mut Row, c: &mut Row, d: &mut Row, m: Row) {
    *a = add(add(*a, m), *b);
    *d = rot16(xor(*d, *a));
    *c = add(*c, *d);
    *b = rot63(xor(*b, *c));
}

// `vextq_u64::<1>(x, y)` yields `[x[1], y[0]]`.
#[inline(always)]
unsafe fn diagonalize(b: &mut Row, c: &mut Row, d: &mut Row) {
    *b = Row {
        lo: vextq_u64::<1>(b.lo, b.hi),
        hi: vextq_u64::<1>(b.hi, b.lo),
    };
    *c = Row { lo: c.hi, hi: c.lo };
    *d = Row {
        lo: vextq_u64::<1>(d.hi, d.lo),
        hi: vextq_u64::<1>(d.lo, d.hi),
    };
}

#[inline(always)]
unsafe fn undiagonalize(b: &mut Row, c: &mut Row, d: &mut Row) {
    *b = Row {
        lo: vextq_u64::<1>(b.hi, b.lo),
        hi: vextq_u64::<1>(b.lo, b.hi),
    };
    *c = Row { lo: c.hi, hi: c.lo };
    *d = Row {
        lo: vextq_u64::<1>(d.lo, d.hi),
        hi: vextq_u64::<1>(d.hi, d.lo),
    };
}
