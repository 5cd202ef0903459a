//! C4: Search Context — the per-batch environment filters draw from.

use crate::items::Category;
use crate::rng::hash::{hash_continue, hash_prefix, pseudo_hash_vec, seed_hash_vec};
use crate::rng::{Lanes8, PrngStream, ResampleStream};
use crate::seed::Seed;
use crate::tables::ItemTables;

/// Longest common byte prefix shared by all 8 reversed seed strings.
fn common_prefix_len(seeds_rev: &[String; 8]) -> usize {
    let first = seeds_rev[0].as_bytes();
    let mut len = first.len();
    for s in &seeds_rev[1..] {
        let bytes = s.as_bytes();
        let shared = first.iter().zip(bytes).take_while(|(a, b)| a == b).count();
        len = len.min(shared);
    }
    len
}

/// "Seed-Hash Cache": the shared-suffix portion of the batch's
/// reversed seeds gets its pseudo-hash fold computed once; every
/// `create_stream_cached` call resumes from that point instead of refolding
/// the whole seed. Invalidated (rebuilt) at batch boundaries.
pub struct SeedHashCache {
    shared_state: f64,
    shared_index: usize,
    tails_rev: [String; 8],
}

impl SeedHashCache {
    pub fn new(seeds_rev: &[String; 8]) -> Self {
        let shared_len = common_prefix_len(seeds_rev);
        let (shared_state, shared_index) = hash_prefix(&seeds_rev[0][..shared_len]);
        let tails_rev = std::array::from_fn(|lane| seeds_rev[lane][shared_len..].to_string());
        SeedHashCache {
            shared_state,
            shared_index,
            tails_rev,
        }
    }

    pub fn hash_for_key(&self, key_rev: &str) -> Lanes8 {
        Lanes8::from_fn(|lane| {
            hash_continue(
                self.shared_state,
                self.shared_index,
                self.tails_rev[lane].bytes().chain(key_rev.bytes()),
            )
        })
    }
}

/// Per-batch environment exposed to filters and item streams.
pub struct SearchContext<'a> {
    seeds: [Seed; 8],
    seeds_rev: [String; 8],
    seed_hash: Lanes8,
    cache: SeedHashCache,
    pub tables: &'a ItemTables,
}

impl<'a> SearchContext<'a> {
    pub fn new(seeds: [Seed; 8], tables: &'a ItemTables) -> Self {
        let seeds_rev: [String; 8] = std::array::from_fn(|i| seeds[i].reversed());
        let seed_hash = seed_hash_vec(&seeds_rev);
        let cache = SeedHashCache::new(&seeds_rev);
        SearchContext {
            seeds,
            seeds_rev,
            seed_hash,
            cache,
            tables,
        }
    }

    /// Rebuild the seed-hash cache in place for a new batch of seeds,
    /// reusing the allocation rather than constructing a fresh context.
    pub fn reset(&mut self, seeds: [Seed; 8]) {
        self.seeds_rev = std::array::from_fn(|i| seeds[i].reversed());
        self.seed_hash = seed_hash_vec(&self.seeds_rev);
        self.cache = SeedHashCache::new(&self.seeds_rev);
        self.seeds = seeds;
    }

    pub fn seeds(&self) -> &[Seed; 8] {
        &self.seeds
    }

    pub fn seed_hash(&self) -> Lanes8 {
        self.seed_hash
    }

    /// Create a fresh stream for `key`, reversed internally the same way a
    /// seed is.
    pub fn create_stream(&self, key: &str) -> PrngStream {
        let key_rev: String = key.chars().rev().collect();
        let key_hash = pseudo_hash_vec(&key_rev, &self.seeds_rev);
        PrngStream::from_key_hash(key_hash, self.seed_hash)
    }

    /// Like [`Self::create_stream`] but resumes the batch's cached
    /// shared-suffix fold instead of refolding every seed character.
    pub fn create_stream_cached(&self, key: &str) -> PrngStream {
        let key_rev: String = key.chars().rev().collect();
        let key_hash = self.cache.hash_for_key(&key_rev);
        PrngStream::from_key_hash(key_hash, self.seed_hash)
    }

    pub fn resample_stream(&self, key: &str) -> ResampleStream {
        let key_rev: String = key.chars().rev().collect();
        ResampleStream::new(key_rev, self.seeds_rev.clone(), self.seed_hash)
    }

    /// Materialize each live lane as a scalar seed and invoke `f`, for
    /// filters whose work can't be vectorised.
    pub fn search_individual_seeds<T>(
        &self,
        live_mask: u8,
        mut f: impl FnMut(usize, &Seed) -> T,
    ) -> [Option<T>; 8] {
        std::array::from_fn(|lane| {
            if live_mask & (1 << lane) != 0 {
                Some(f(lane, &self.seeds[lane]))
            } else {
                None
            }
        })
    }
}

/// Builds the key string a stream is created from: e.g. the ante-5 shop
/// voucher stream has key `"Voucher" + "sho" + 5`.
pub fn category_key(prefix: &str, category: Category, source_tag: &str, ante: u8) -> String {
    let _ = category;
    format!("{prefix}{source_tag}{ante}")
}
