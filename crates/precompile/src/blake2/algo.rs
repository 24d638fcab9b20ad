//! Blake2 algorithm
//!
//! Portable BLAKE2b compression function `F` over four rows of four 64-bit lanes.
//! The vectorized backends follow the same row layout, so every step here has a
//! one to one counterpart in them.

/// SIGMA from RFC 7693: <https://datatracker.ietf.org/doc/html/rfc7693#section-2.7>
pub const SIGMA: [[usize; 16]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
];

/// got IV from: <https://en.wikipedia.org/wiki/BLAKE_(hash_function)>
pub const IV: [u64; 8] = [
    0x6a09e667f3bcc908,
    0xbb67ae8584caa73b,
    0x3c6ef372fe94f82b,
    0xa54ff53a5f1d36f1,
    0x510e527fade682d1,
    0x9b05688c2b3e6c1f,
    0x1f83d9abfb41bd6b,
    0x5be0cd19137e2179,
];

/// Blake2 compression function state length (8 u64 values).
pub const STATE_LENGTH: usize = 8;

/// Blake2 compression function message block length in bytes.
pub const MESSAGE_LENGTH: usize = 128;

/// Four 64-bit lanes of the working vector.
pub type Row = [u64; 4];

/// Returns the sigma schedule row used by round `round`.
#[inline(always)]
pub const fn sigma(round: u32) -> &'static [usize; 16] {
    &SIGMA[(round % 10) as usize]
}

/// Decodes the message block into sixteen little-endian words.
#[inline]
pub fn message_words(block: &[u8; MESSAGE_LENGTH]) -> [u64; 16] {
    let (chunks, _) = block.as_chunks::<8>();
    let mut m = [0u64; 16];
    for (word, chunk) in m.iter_mut().zip(chunks) {
        *word = u64::from_le_bytes(*chunk);
    }
    m
}

/// Gathers the four message words that feed one G step.
///
/// `offset` is 0 for the column G1, 1 for the column G2, 8 for the diagonal G1
/// and 9 for the diagonal G2.
#[inline(always)]
pub fn gather(m: &[u64; 16], s: &[usize; 16], offset: usize) -> Row {
    [
        m[s[offset]],
        m[s[offset + 2]],
        m[s[offset + 4]],
        m[s[offset + 6]],
    ]
}

/// Initial working rows: `h`, then IV mixed with the counter and final block flag.
#[inline(always)]
pub fn init(h: &[u64; STATE_LENGTH], t: [u64; 2], f: bool) -> [Row; 4] {
    let last_block = if f { u64::MAX } else { 0 };
    [
        [h[0], h[1], h[2], h[3]],
        [h[4], h[5], h[6], h[7]],
        [IV[0], IV[1], IV[2], IV[3]],
        [IV[4] ^ t[0], IV[5] ^ t[1], IV[6] ^ last_block, IV[7]],
    ]
}

/// Folds the working rows back into the state.
#[inline(always)]
pub fn finalize(h: &mut [u64; STATE_LENGTH], rows: &[Row; 4]) {
    for i in 0..4 {
        h[i] ^= rows[0][i] ^ rows[2][i];
        h[i + 4] ^= rows[1][i] ^ rows[3][i];
    }
}

#[inline(always)]
fn mix(a: &mut Row, b: &mut Row, c: &mut Row, d: &mut Row, m: &Row, rd: u32, rb: u32) {
    for i in 0..4 {
        a[i] = a[i].wrapping_add(b[i]).wrapping_add(m[i]);
        d[i] = (d[i] ^ a[i]).rotate_right(rd);
        c[i] = c[i].wrapping_add(d[i]);
        b[i] = (b[i] ^ c[i]).rotate_right(rb);
    }
}

/// First half of the G function: <https://tools.ietf.org/html/rfc7693#section-3.1>
///
/// Rotates `d` by 32 and `b` by 24.
#[inline(always)]
pub fn g1(a: &mut Row, b: &mut Row, c: &mut Row, d: &mut Row, m: &Row) {
    mix(a, b, c, d, m, 32, 24);
}

/// Second half of the G function.
///
/// Rotates `d` by 16 and `b` by 63.
#[inline(always)]
pub fn g2(a: &mut Row, b: &mut Row, c: &mut Row, d: &mut Row, m: &Row) {
    mix(a, b, c, d, m, 16, 63);
}

/// Lines the diagonals of the working vector up into lanes.
#[inline(always)]
pub fn diagonalize(b: &mut Row, c: &mut Row, d: &mut Row) {
    b.rotate_left(1);
    c.rotate_left(2);
    d.rotate_left(3);
}

/// Inverse of [`diagonalize`].
#[inline(always)]
pub fn undiagonalize(b: &mut Row, c: &mut Row, d: &mut Row) {
    b.rotate_right(1);
    c.rotate_right(2);
    d.rotate_right(3);
}

/// One full round: columns, then diagonals.
#[inline(always)]
pub fn round(rows: &mut [Row; 4], m: &[u64; 16], r: u32) {
    let s = sigma(r);
    let [a, b, c, d] = rows;

    g1(a, b, c, d, &gather(m, s, 0));
    g2(a, b, c, d, &gather(m, s, 1));
    diagonalize(b, c, d);
    g1(a, b, c, d, &gather(m, s, 8));
    g2(a, b, c, d, &gather(m, s, 9));
    undiagonalize(b, c, d);
}

/// Compression function F takes as an argument the state vector "h",
/// message block vector "m" (last block is padded with zeros to full
/// block size, if required), 2w-bit offset counter "t", and final block
/// indicator flag "f". F returns a new state vector. The number of rounds
/// is caller supplied and may be zero.
pub fn compress(
    rounds: u32,
    h: &mut [u64; STATE_LENGTH],
    block: &[u8; MESSAGE_LENGTH],
    t: [u64; 2],
    f: bool,
) {
    let m = message_words(block);
    let mut rows = init(h, t, f);
    for r in 0..rounds {
        round(&mut rows, &m, r);
    }
    finalize(h, &rows);
}
