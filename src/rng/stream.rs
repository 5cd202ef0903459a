//! [`PrngStream`]: an 8-lane PRNG stream keyed by an immutable derivation
//! string ("PRNG Stream (vector)").

use super::core;
use super::hash::pseudo_hash_vec;
use super::lanes::Lanes8;

/// An 8-lane PRNG stream: `state` advances every time a draw is made,
/// `seed_hash` is constant for the lifetime of the stream (it belongs to the
/// seeds in the batch, not to this particular key).
#[derive(Debug, Clone, Copy)]
pub struct PrngStream {
    key_hash: Lanes8,
    state: Lanes8,
    seed_hash: Lanes8,
}

impl PrngStream {
    /// Construct a stream for `key` over the 8 reversed seed strings in the
    /// current batch. `seed_hash` should come from the batch's cached
    /// `pseudo_hash("", seed)`.
    pub fn new(key_rev: &str, seeds_rev: &[String; 8], seed_hash: Lanes8) -> Self {
        let key_hash = pseudo_hash_vec(key_rev, seeds_rev);
        PrngStream { key_hash, state: key_hash, seed_hash }
    }

    /// Rebuild from an already-hashed key vector, used by
    /// [`crate::context::SearchContext::create_stream_cached`] to reuse a
    /// precomputed shared-suffix hash.
    pub fn from_key_hash(key_hash: Lanes8, seed_hash: Lanes8) -> Self {
        PrngStream { key_hash, state: key_hash, seed_hash }
    }

    pub fn key_hash(&self) -> Lanes8 {
        self.key_hash
    }

    /// Uniform `[0, 1)` draw, one per lane.
    pub fn random(&mut self) -> Lanes8 {
        core::random(&mut self.state, self.seed_hash)
    }

    /// `random_int(lo, hi)`.
    pub fn random_int(&mut self, lo: i64, hi: i64) -> [i64; 8] {
        core::random_int(&mut self.state, self.seed_hash, lo, hi)
    }

    /// `random_choice(array)`.
    pub fn random_choice<'a, T>(&mut self, array: &'a [T]) -> [&'a T; 8] {
        let idx = self.random_int(0, array.len() as i64);
        std::array::from_fn(|lane| &array[idx[lane] as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::hash::seed_hash_vec;

    fn seeds(tags: [&str; 8]) -> [String; 8] {
        std::array::from_fn(|i| tags[i].to_string())
    }

    #[test]
    fn same_key_same_seed_gives_same_sequence() {
        let seeds = seeds(["A", "B", "C", "D", "E", "F", "G", "H"]);
        let sh = seed_hash_vec(&seeds);
        let mut s1 = PrngStream::new("Voucher1", &seeds, sh);
        let mut s2 = PrngStream::new("Voucher1", &seeds, sh);
        for _ in 0..8 {
            assert_eq!(s1.random(), s2.random());
        }
    }

    #[test]
    fn different_keys_diverge() {
        let seeds = seeds(["A", "B", "C", "D", "E", "F", "G", "H"]);
        let sh = seed_hash_vec(&seeds);
        let mut s1 = PrngStream::new("Voucher1", &seeds, sh);
        let mut s2 = PrngStream::new("Voucher2", &seeds, sh);
        assert_ne!(s1.random(), s2.random());
    }

    #[test]
    fn random_int_within_bounds() {
        let seeds = seeds(["A", "B", "C", "D", "E", "F", "G", "H"]);
        let sh = seed_hash_vec(&seeds);
        let mut s = PrngStream::new("rarityshop1", &seeds, sh);
        for _ in 0..50 {
            let v = s.random_int(0, 5);
            for x in v {
                assert!((0..5).contains(&x));
            }
        }
    }
}
