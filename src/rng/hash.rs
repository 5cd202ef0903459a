//! Pseudo-hash: Balatro's key+seed string hash, re-implemented bit-exactly.
//!
//! Given a key `K` and seed `S`, initialise `n = 1`, then for each character
//! `c` at 0-based logical position `i` in the concatenation of `S` reversed
//! and `K` reversed, update
//! `n <- ((1.1239285023 / n) * code(c) * pi + pi * (i + 1)) mod 1`.
//! The value after the last character is the result.
//!
//! The hash is expressed here as a resumable fold (`hash_prefix` /
//! `hash_continue`) so that [`crate::context::SeedHashCache`] can compute the
//! shared-suffix portion once per batch and reuse it for every key.

use super::lanes::Lanes8;
use std::f64::consts::PI;

const HASH_NUMERATOR: f64 = 1.1239285023;

#[inline]
fn fold_one(n: f64, c: u8, i: usize) -> f64 {
    ((HASH_NUMERATOR / n) * (c as f64) * PI + PI * ((i + 1) as f64)) % 1.0
}

/// Fold `prefix` starting from the hash's initial state (`n = 1, i = 0`).
/// Returns the resulting `(n, i)` so the fold can be resumed.
pub fn hash_prefix(prefix: &str) -> (f64, usize) {
    let mut n = 1.0f64;
    let mut i = 0usize;
    for c in prefix.bytes() {
        n = fold_one(n, c, i);
        i += 1;
    }
    (n, i)
}

/// Resume a fold from `(n0, i0)` over `rest`.
pub fn hash_continue(n0: f64, i0: usize, rest: impl Iterator<Item = u8>) -> f64 {
    let mut n = n0;
    let mut i = i0;
    for c in rest {
        n = fold_one(n, c, i);
        i += 1;
    }
    n
}

/// Scalar pseudo-hash over the already-reversed `seed_rev` and `key_rev`
/// strings (caller reverses once; the formula just wants the two strings
/// concatenated in that order).
pub fn pseudo_hash_scalar(key_rev: &str, seed_rev: &str) -> f64 {
    let (n, i) = hash_prefix(seed_rev);
    hash_continue(n, i, key_rev.bytes())
}

/// Vectorized pseudo-hash: one `key` shared by all 8 lanes, one reversed
/// seed string per lane (lanes typically differ only in their first
/// `BatchCharCount` characters since seeds share a suffix within a batch).
pub fn pseudo_hash_vec(key_rev: &str, seeds_rev: &[String; 8]) -> Lanes8 {
    Lanes8::from_fn(|lane| pseudo_hash_scalar(key_rev, &seeds_rev[lane]))
}

/// The "empty key" pseudo-hash of a seed — its `seed_hash`, cached once per
/// batch per lane and reused by every stream's `pseudoseed`.
pub fn seed_hash_vec(seeds_rev: &[String; 8]) -> Lanes8 {
    pseudo_hash_vec("", seeds_rev)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_inputs() {
        let a = pseudo_hash_scalar("Voucher", "BEELA");
        let b = pseudo_hash_scalar("Voucher", "BEELA");
        assert_eq!(a, b);
    }

    #[test]
    fn result_is_in_unit_interval() {
        let v = pseudo_hash_scalar("rarityshop1", "BEELA");
        assert!((0.0..1.0).contains(&v));
    }

    #[test]
    fn different_keys_diverge() {
        let a = pseudo_hash_scalar("Voucher1", "BEELA");
        let b = pseudo_hash_scalar("Voucher2", "BEELA");
        assert_ne!(a, b);
    }

    #[test]
    fn resumed_fold_matches_single_pass() {
        let seed_rev = "BEELA";
        let key_rev = "Voucher5";
        let direct = pseudo_hash_scalar(key_rev, seed_rev);

        let (n, i) = hash_prefix(&seed_rev[..3]);
        let resumed = hash_continue(n, i, seed_rev[3..].bytes().chain(key_rev.bytes()));
        assert_eq!(direct, resumed);
    }
}
