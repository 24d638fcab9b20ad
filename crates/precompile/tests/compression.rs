//! Properties of the compression function through the public API.
use blake2f_precompile::{
    blake2::{self, algo},
    Backend, Blake2fHasher, Blake2fInput, FinalFlagPolicy, PrecompileError, INPUT_LENGTH,
};
use blake2f_precompile::primitives::hex;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rstest::rstest;

fn random_input(rng: &mut StdRng, rounds: u32) -> Blake2fInput {
    let mut input = Blake2fInput {
        rounds,
        h: rng.random(),
        t: rng.random(),
        f: rng.random(),
        ..Default::default()
    };
    rng.fill(&mut input.m[..]);
    input
}

#[allow(clippy::many_single_char_names)]
fn g(v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize, x: u64, y: u64) {
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

/// RFC 7693 `F` over the flat sixteen word vector, one round at a time.
fn flat_reference(input: &Blake2fInput) -> [u8; 64] {
    let mut m = [0u64; 16];
    for (word, chunk) in m.iter_mut().zip(input.m.chunks_exact(8)) {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        *word = u64::from_le_bytes(buf);
    }

    let mut v = [0u64; 16];
    v[..8].copy_from_slice(&input.h);
    v[8..].copy_from_slice(&algo::IV);
    v[12] ^= input.t[0];
    v[13] ^= input.t[1];
    if input.f {
        v[14] = !v[14];
    }
    for r in 0..input.rounds as usize {
        let s = &algo::SIGMA[r % 10];
        g(&mut v, 0, 4, 8, 12, m[s[0]], m[s[1]]);
        g(&mut v, 1, 5, 9, 13, m[s[2]], m[s[3]]);
        g(&mut v, 2, 6, 10, 14, m[s[4]], m[s[5]]);
        g(&mut v, 3, 7, 11, 15, m[s[6]], m[s[7]]);
        g(&mut v, 0, 5, 10, 15, m[s[8]], m[s[9]]);
        g(&mut v, 1, 6, 11, 12, m[s[10]], m[s[11]]);
        g(&mut v, 2, 7, 8, 13, m[s[12]], m[s[13]]);
        g(&mut v, 3, 4, 9, 14, m[s[14]], m[s[15]]);
    }

    let mut h = input.h;
    for i in 0..8 {
        h[i] ^= v[i] ^ v[i + 8];
    }
    blake2::encode_state(&h)
}

fn abc_input(rounds: u32) -> Blake2fInput {
    let mut m = [0u8; 128];
    m[..3].copy_from_slice(b"abc");
    Blake2fInput {
        rounds,
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
}

#[test]
fn schedule_wraps_after_ten_rounds() {
    let mut rng = StdRng::seed_from_u64(152);
    let ten = random_input(&mut rng, 10);
    let twenty = Blake2fInput {
        rounds: 20,
        ..ten.clone()
    };

    let out_ten = ten.compress_with(Backend::Portable);
    let out_twenty = twenty.compress_with(Backend::Portable);
    assert_ne!(out_ten, out_twenty);
    assert_ne!(out_twenty, blake2::encode_state(&twenty.h));
    assert_eq!(out_ten, flat_reference(&ten));
    assert_eq!(out_twenty, flat_reference(&twenty));
}

#[rstest]
#[case::ten(10, hex!("5a4308e0e1daede181b47775d926a6b4b6a0adf86d05bfea696fac45f08419623976bd3c786f61500b9f94a043b9dcf397e38ee237f3c273a7d812be20874f5a"))]
#[case::twelve(12, hex!("ba80a53f981c4d0d6a2797b69f12f6e94c212f14685ac4b74b12bb6fdbffa2d17d87c5392aab792dc252d5de4533cc9518d38aa8dbf1925ab92386edd4009923"))]
#[case::twenty(20, hex!("0c1b96fc9c06898bb49af24ef91a669143df8e847807765da43f8ad6c0ec5180e6ab033a21428e52c5d933345f81d8300a02158704935b7a020d990572ad9be0"))]
fn abc_across_schedule_wrap(#[case] rounds: u32, #[case] expected: [u8; 64]) {
    let input = abc_input(rounds);
    assert_eq!(flat_reference(&input), expected);
    for backend in Backend::available() {
        assert_eq!(input.compress_with(backend), expected, "{backend}");
    }
}

#[test]
fn backends_match_portable_on_random_inputs() {
    let mut rng = StdRng::seed_from_u64(0xb1a4e2f);
    for _ in 0..64 {
        let rounds = rng.random_range(0..48);
        let input = random_input(&mut rng, rounds);
        let expected = input.compress_with(Backend::Portable);
        for backend in Backend::available() {
            assert_eq!(input.compress_with(backend), expected, "{backend}");
        }
        assert_eq!(input.compress(), expected);
    }
}

#[test]
fn large_round_count() {
    let mut rng = StdRng::seed_from_u64(1_000_000);
    let input = random_input(&mut rng, 1_000_000);
    let expected = input.compress_with(Backend::Portable);
    assert_eq!(expected, flat_reference(&input));
    for backend in Backend::available() {
        assert_eq!(input.compress_with(backend), expected, "{backend}");
    }

    let output = blake2::run(&input.encode(), 1_000_000).unwrap();
    assert_eq!(output.gas_used, 1_000_000);
    assert_eq!(&output.bytes[..], expected.as_slice());
}

#[test]
fn repeated_calls_are_identical() {
    let mut rng = StdRng::seed_from_u64(7);
    let payload = random_input(&mut rng, 12).encode();
    let first = blake2::run(&payload, u64::MAX).unwrap();
    for _ in 0..8 {
        assert_eq!(blake2::run(&payload, u64::MAX).unwrap(), first);
    }
}

#[test]
fn streamed_payload_matches_precompile() {
    let mut rng = StdRng::seed_from_u64(42);
    let payload = random_input(&mut rng, 24).encode();
    let expected = blake2::run(&payload, u64::MAX).unwrap();

    let mut hasher = Blake2fHasher::with_policy(FinalFlagPolicy::Strict);
    let mut rest = &payload[..];
    while !rest.is_empty() {
        let take = rng.random_range(1..=rest.len().min(40));
        hasher.update(&rest[..take]).unwrap();
        rest = &rest[take..];
    }
    assert_eq!(&expected.bytes[..], hasher.finalize().unwrap().as_slice());
    assert_eq!(hasher.finalize(), Err(PrecompileError::Blake2WrongLength));
}

#[test]
fn boundary_lengths() {
    let payload = Blake2fInput::default().encode();
    for len in [INPUT_LENGTH - 1, INPUT_LENGTH + 1] {
        let mut input = payload.to_vec();
        input.resize(len, 0);
        assert_eq!(
            blake2::run(&input, u64::MAX),
            Err(PrecompileError::Blake2WrongLength)
        );
    }
}
