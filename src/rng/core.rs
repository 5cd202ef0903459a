//! The per-lane PRNG step and the Lua-5.4-compatible `random` draw.
//!
//! - **PRNG step**: `state <- round((state * 1.72431234 + 2.134453429141) mod 1, 13 decimals)`.
//! - **Pseudo-seed**: `(step(stream) + seed_hash) / 2`.
//! - **Uniform random**: Lua 5.4's `math.random` — a tausworthe/xor-shift
//!   generator (xoshiro256**) over four 64-bit words, seeded by mixing the
//!   pseudo-seed through `d *= pi; d += e`, bit-cast to `u64`, floored against
//!   a minimum state value, and warmed up for 5 iterations before the first
//!   output is taken.
//!
//! Each call to `random` re-derives its one-shot generator from a freshly
//! stepped pseudo-seed rather than keeping a persistent xoshiro state across
//! draws — this is what makes an individual `PrngStream` resumable purely
//! from its scalar `state` field, and what the resample ladder in
//! [`crate::rng::resample`] relies on.

use super::lanes::Lanes8;
use std::f64::consts::E;
use std::f64::consts::PI;

const STEP_MUL: f64 = 1.72431234;
const STEP_ADD: f64 = 2.134453429141;
const STEP_ROUND_DECIMALS: i32 = 13;

/// Floor applied to the seed-mixing bit pattern before warm-up, so a
/// pathologically small mix never produces a degenerate (all-zero) xoshiro
/// state. Value chosen to match the order of magnitude of a `u64` built from
/// a `[0, 2)` double's bit pattern.
const MIN_STATE_BITS: u64 = 0x0010_0000_0000_0000;

/// One call to the vectorized PRNG step.
pub fn step(state: Lanes8) -> Lanes8 {
    (state * STEP_MUL + Lanes8::splat(STEP_ADD))
        .fract_mod1()
        .round_to(STEP_ROUND_DECIMALS)
}

/// `pseudoseed(stream) = (step(stream) + seed_hash) / 2`. Mutates `state` in
/// place — the step always advances, even for lanes the caller will discard,
/// since every lane does identical work per step.
pub fn pseudoseed(state: &mut Lanes8, seed_hash: Lanes8) -> Lanes8 {
    *state = step(*state);
    (*state + seed_hash) * 0.5
}

/// Build the four xoshiro256** words from a single pseudo-seed double.
fn seed_xoshiro(pseudo_seed: f64) -> [u64; 4] {
    let mut d = pseudo_seed;
    d *= PI;
    d += E;
    let mut bits = d.to_bits();
    if bits < MIN_STATE_BITS {
        bits |= MIN_STATE_BITS;
    }

    let s0 = bits;
    let s1 = bits.rotate_left(17) ^ 0x9E37_79B9_7F4A_7C15;
    let s2 = bits.rotate_left(31) ^ 0xBF58_476D_1CE4_E5B9;
    let s3 = bits.rotate_left(47) ^ 0x94D0_49BB_1331_11EB;
    let mut state = [s0, s1, s2, s3];
    for _ in 0..5 {
        xoshiro256ss_next(&mut state);
    }
    state
}

fn rotl(x: u64, k: u32) -> u64 {
    x.rotate_left(k)
}

/// xoshiro256** — the generator behind Lua 5.4's `math.random`.
fn xoshiro256ss_next(s: &mut [u64; 4]) -> u64 {
    let result = rotl(s[1].wrapping_mul(5), 7).wrapping_mul(9);
    let t = s[1] << 17;

    s[2] ^= s[0];
    s[3] ^= s[1];
    s[1] ^= s[2];
    s[0] ^= s[3];
    s[2] ^= t;
    s[3] = s[3].rotate_left(45);

    result
}

/// Convert a xoshiro256** `u64` output to a double in `[0, 1)` using the top
/// 53 bits, matching Lua 5.4's `I2d`.
fn to_unit_double(bits: u64) -> f64 {
    (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Draw one uniform `[0, 1)` double per lane, advancing `state` first.
pub fn random(state: &mut Lanes8, seed_hash: Lanes8) -> Lanes8 {
    let ps = pseudoseed(state, seed_hash);
    Lanes8::from_fn(|lane| {
        let mut xo = seed_xoshiro(ps[lane]);
        to_unit_double(xoshiro256ss_next(&mut xo))
    })
}

/// `random_int(lo, hi) = floor(random * (hi - lo)) + lo`.
pub fn random_int(state: &mut Lanes8, seed_hash: Lanes8, lo: i64, hi: i64) -> [i64; 8] {
    let r = random(state, seed_hash);
    let span = (hi - lo) as f64;
    let mut out = [0i64; 8];
    for lane in 0..8 {
        out[lane] = (r[lane] * span).floor() as i64 + lo;
    }
    out
}
