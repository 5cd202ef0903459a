//! C6: Filter Pipeline — a chain of pure `(seed, tables) -> mask8` filters,
//! ANDed together with per-batch short-circuiting.

use crate::context::SearchContext;
use crate::errors::{ConfigError, MotelyError};
use crate::rng::{LaneMask, ALL_LANES, NO_LANES};

/// A single filter stage. Implementors must be pure functions of `(seed,
/// ante tables)` — no hidden state carried across batches.
pub trait Filter {
    /// Evaluate this filter against the current batch, returning the
    /// lane-kept mask. `live_mask` marks which lanes are still candidates
    /// after earlier filters in the chain; implementations may skip work
    /// for lanes already excluded but MUST NOT set a bit that wasn't set in
    /// `live_mask`.
    fn filter(&self, ctx: &SearchContext<'_>, live_mask: LaneMask) -> LaneMask;

    /// Called once per batch before any `filter` call, so a filter can
    /// precompute per-batch invariants (e.g. cached partial hashes for its
    /// keys).
    fn on_batch_start(&mut self, _ctx: &SearchContext<'_>) {}
}

/// An ANDed sequence of filters: at least one filter is required; filters
/// with zero clauses must return all-ones, never all-zeros. An empty
/// `Chain` itself enforces the same pass-through rule so a DSL compile step
/// that produces zero clauses for a group doesn't accidentally zero out the
/// whole search.
pub struct Chain {
    filters: Vec<Box<dyn Filter>>,
}

impl Chain {
    pub fn new(filters: Vec<Box<dyn Filter>>) -> Result<Self, MotelyError> {
        if filters.is_empty() {
            return Err(ConfigError::EmptyChain.into());
        }
        Ok(Chain { filters })
    }

    /// A chain that always passes every lane, used for the "zero clauses"
    /// base case the DSL adapter falls back to rather than refusing to compile.
    pub fn pass_through() -> Self {
        Chain { filters: Vec::new() }
    }

    pub fn on_batch_start(&mut self, ctx: &SearchContext<'_>) {
        for f in &mut self.filters {
            f.on_batch_start(ctx);
        }
    }

    /// Evaluate the whole chain, short-circuiting to [`NO_LANES`] as soon as
    /// no lane remains live.
    pub fn evaluate(&self, ctx: &SearchContext<'_>) -> LaneMask {
        let mut mask = ALL_LANES;
        for f in &self.filters {
            if mask == NO_LANES {
                break;
            }
            mask &= f.filter(ctx, mask);
        }
        mask
    }
}
