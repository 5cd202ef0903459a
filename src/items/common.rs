//! Shared draw machinery: uniform-with-pack-dedup and the Soul/Black-Hole
//! substitution trial, used by the Tarot, Planet and Spectral streams.

use super::{Category, Item, ItemSet};
use crate::rng::ResampleStream;

/// How many resample levels to try before giving up and emitting
/// [`Item::EXCLUDED`] for a lane (a pool smaller than the pack size would
/// never terminate otherwise).
const MAX_RESAMPLE_DEPTH: usize = 64;

/// Draw one uniform index per lane from `[0, pool_len)`, resampling lanes
/// that collide with their own pack's existing contents until every live
/// lane has a distinct item (draws used per lane = 1 + collisions
/// encountered).
///
/// All 8 lanes draw at every resample depth regardless of whether they
/// individually still need it; a lane simply keeps the result from the first
/// depth at which it didn't collide.
pub fn draw_with_pack_dedup(
    resample: &mut ResampleStream,
    pool_len: usize,
    packs: &mut [ItemSet; 8],
    category: Category,
    live_mask: u8,
) -> [Item; 8] {
    let pool_len = pool_len.max(1) as i64;
    let mut result: [Option<Item>; 8] = [None; 8];
    let mut depth = 0usize;

    loop {
        let stream = if depth == 0 {
            resample.initial()
        } else {
            resample.sibling(depth - 1).expect("resample ladder exhausted")
        };
        let idx = stream.random_int(0, pool_len);

        let mut any_pending = false;
        for lane in 0..8 {
            if live_mask & (1 << lane) == 0 || result[lane].is_some() {
                continue;
            }
            let item = Item::new(category, idx[lane] as u16);
            if packs[lane].contains(item) {
                any_pending = true;
            } else {
                result[lane] = Some(item);
            }
        }

        depth += 1;
        if !any_pending || depth >= MAX_RESAMPLE_DEPTH {
            break;
        }
    }

    // Deliberately does not push the drawn items into `packs`: callers that
    // layer a Soul/Black-Hole substitution on top need to decide which item
    // (the substitution or this draw) actually entered the pack.
    std::array::from_fn(|lane| result[lane].unwrap_or(Item::EXCLUDED))
}

/// Bernoulli trial result for a Soul/Black-Hole substitution: `true` means
/// the special item replaces the normal draw for that lane. The trial
/// always executes (one `random` call) regardless of whether its result
/// will be used.
pub fn bernoulli_trial(stream: &mut ResampleStream, threshold: f64) -> [bool; 8] {
    let roll = stream.initial().random();
    std::array::from_fn(|lane| roll[lane] < threshold)
}
