//! Scorer: called once per surviving lane, returns an integer score plus
//! per-clause sub-scores; a [`Cutoff`] decides which scored seeds actually
//! reach the output channel.

use crate::context::SearchContext;
use crate::seed::Seed;

/// Per-seed score result: a total plus one sub-score per SHOULD clause, in
/// the clause's declared input order (feeds the CSV's extra columns).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResult {
    pub total: i64,
    pub sub_scores: Vec<i64>,
}

pub trait Scorer {
    fn score(&self, ctx: &SearchContext<'_>, lane: usize, seed: &Seed) -> ScoreResult;
}

/// A scorer built directly from a list of per-clause point values, used
/// when the DSL adapter (C8) compiles SHOULD clauses: each clause
/// contributes `score` points to the total when its own filter matches
/// lane `lane`, `0` otherwise.
pub struct ClauseScorer {
    clauses: Vec<(Box<dyn Fn(&SearchContext<'_>, usize) -> bool>, i64)>,
}

impl ClauseScorer {
    pub fn new(clauses: Vec<(Box<dyn Fn(&SearchContext<'_>, usize) -> bool>, i64)>) -> Self {
        ClauseScorer { clauses }
    }
}

impl Scorer for ClauseScorer {
    fn score(&self, ctx: &SearchContext<'_>, lane: usize, _seed: &Seed) -> ScoreResult {
        let mut total = 0i64;
        let mut sub_scores = Vec::with_capacity(self.clauses.len());
        for (matches, points) in &self.clauses {
            let hit = matches(ctx, lane);
            let awarded = if hit { *points } else { 0 };
            total += awarded;
            sub_scores.push(awarded);
        }
        ScoreResult { total, sub_scores }
    }
}

/// A score threshold a matching seed must clear before reaching the output
/// channel. `Auto` tracks a running high-water mark so the cutoff rises as
/// better matches are found: fixed or auto-tuning high-water-mark.
#[derive(Debug, Clone)]
pub enum Cutoff {
    Fixed(i64),
    Auto { current: std::sync::Arc<std::sync::atomic::AtomicI64> },
}

impl Cutoff {
    pub fn fixed(value: i64) -> Self {
        Cutoff::Fixed(value)
    }

    pub fn auto() -> Self {
        Cutoff::Auto {
            current: std::sync::Arc::new(std::sync::atomic::AtomicI64::new(i64::MIN)),
        }
    }

    /// Returns whether `score` clears the cutoff; for `Auto`, also raises
    /// the high-water mark when it does. Safe to call concurrently from
    /// multiple workers sharing the same `Auto` cutoff.
    pub fn admit(&self, score: i64) -> bool {
        match self {
            Cutoff::Fixed(v) => score >= *v,
            Cutoff::Auto { current } => {
                use std::sync::atomic::Ordering;
                let mut prev = current.load(Ordering::Relaxed);
                loop {
                    if score <= prev {
                        return false;
                    }
                    match current.compare_exchange_weak(
                        prev,
                        score,
                        Ordering::Relaxed,
                        Ordering::Relaxed,
                    ) {
                        Ok(_) => return true,
                        Err(observed) => prev = observed,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_cutoff_admits_scores_at_or_above_threshold() {
        let cutoff = Cutoff::fixed(10);
        assert!(cutoff.admit(10));
        assert!(cutoff.admit(11));
        assert!(!cutoff.admit(9));
    }

    #[test]
    fn auto_cutoff_only_admits_strictly_increasing_scores() {
        let cutoff = Cutoff::auto();
        assert!(cutoff.admit(5));
        assert!(!cutoff.admit(5));
        assert!(cutoff.admit(6));
        assert!(!cutoff.admit(4));
    }
}
