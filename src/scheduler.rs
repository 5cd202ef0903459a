//! Scheduler — a fixed worker-thread pool draining a single batch queue,
//! reporting progress via atomics, with cooperative cancellation polled
//! only between batches.
//!
//! A fixed pool of `std::thread::spawn` workers draining a shared queue,
//! favoring an `Arc<Mutex<_>>`-free accumulator since holding a lock across
//! the cancellation poll is not acceptable here: batch hand-off uses
//! `std::sync::mpsc`, and progress uses `std::sync::atomic` counters
//! instead.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use crate::context::SearchContext;
use crate::enumerator::Batch;
use crate::errors::MotelyError;
use crate::filter::Chain;
use crate::rng::LaneMask;
use crate::scorer::{Cutoff, ScoreResult, Scorer};
use crate::seed::Seed;
use crate::tables::ItemTables;

/// A surviving, scored seed, in the order its worker happened to emit it
/// (cross-batch order is explicitly unspecified).
#[derive(Debug, Clone)]
pub struct SearchMatch {
    pub seed: Seed,
    pub score: Option<ScoreResult>,
}

/// Shared, atomics-only progress counters a reporter thread (or the caller)
/// can sample at any time without synchronizing with workers.
#[derive(Default)]
pub struct Progress {
    pub seeds_searched: AtomicU64,
    pub matches: AtomicU64,
    /// High-water mark of completed batch indices across all workers.
    /// Batches are independent and idempotent to reprocess, so resuming
    /// from this value re-walks at most one in-flight batch per worker
    /// rather than skipping unfinished work.
    pub last_completed_batch: AtomicU64,
}

impl Progress {
    pub fn snapshot(&self) -> (u64, u64, u64) {
        (
            self.seeds_searched.load(Ordering::Relaxed),
            self.matches.load(Ordering::Relaxed),
            self.last_completed_batch.load(Ordering::Relaxed),
        )
    }
}

/// Handle to a running search: the result channel, shared progress, and the
/// cooperative-cancellation flag. Dropping this handle does not stop the
/// search; call [`SearchHandle::cancel`] explicitly.
pub struct SearchHandle {
    pub results: mpsc::Receiver<SearchMatch>,
    pub progress: Arc<Progress>,
    cancel: Arc<AtomicBool>,
    workers: Vec<std::thread::JoinHandle<()>>,
}

impl SearchHandle {
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Block until every worker has exited (batch source exhausted or
    /// cancellation observed).
    pub fn join(self) {
        for w in self.workers {
            let _ = w.join();
        }
    }
}

/// Builds a worker-local [`Chain`] for each thread.
pub type ChainFactory = Arc<dyn Fn() -> Result<Chain, MotelyError> + Send + Sync>;

pub struct SchedulerConfig {
    pub threads: usize,
    pub batch_channel_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            threads: num_cpus::get().max(1),
            batch_channel_capacity: 64,
        }
    }
}

/// Launch a search: one producer thread pulling `Batch`es from `next_batch`
/// until it returns `None`, and `config.threads` worker threads draining
/// them, applying `chain_factory`'s chain, and optionally scoring +
/// cutting off matches with `scorer`/`cutoff`.
pub fn spawn_search(
    config: SchedulerConfig,
    mut next_batch: impl FnMut() -> Option<Result<Batch, MotelyError>> + Send + 'static,
    chain_factory: ChainFactory,
    scorer: Option<Arc<dyn Scorer + Send + Sync>>,
    cutoff: Option<Cutoff>,
    tables: Arc<ItemTables>,
) -> SearchHandle {
    let (batch_tx, batch_rx) = mpsc::sync_channel::<(u64, Batch)>(config.batch_channel_capacity);
    let (result_tx, result_rx) = mpsc::channel::<SearchMatch>();
    let batch_rx = Arc::new(Mutex::new(batch_rx));
    let progress = Arc::new(Progress::default());
    let cancel = Arc::new(AtomicBool::new(false));

    {
        let cancel = Arc::clone(&cancel);
        std::thread::spawn(move || {
            let mut index = 0u64;
            while !cancel.load(Ordering::Relaxed) {
                match next_batch() {
                    Some(Ok(batch)) => {
                        if batch_tx.send((index, batch)).is_err() {
                            break;
                        }
                        index += 1;
                    }
                    Some(Err(_)) | None => break,
                }
            }
        });
    }

    let mut workers = Vec::with_capacity(config.threads);
    for _ in 0..config.threads {
        let batch_rx = Arc::clone(&batch_rx);
        let result_tx = result_tx.clone();
        let progress = Arc::clone(&progress);
        let cancel = Arc::clone(&cancel);
        let chain_factory = Arc::clone(&chain_factory);
        let scorer = scorer.clone();
        let cutoff = cutoff.clone();
        let tables = Arc::clone(&tables);

        workers.push(std::thread::spawn(move || {
            let mut chain = match chain_factory() {
                Ok(c) => c,
                Err(_) => return,
            };
            let dummy_seeds: [Seed; 8] = std::array::from_fn(|i| {
                Seed::new(format!("ALEE{}", (b'1' + i as u8) as char)).unwrap()
            });
            let mut ctx = SearchContext::new(dummy_seeds, &tables);

            loop {
                if cancel.load(Ordering::Relaxed) {
                    break;
                }
                let received = {
                    let rx = batch_rx.lock().expect("batch queue poisoned");
                    rx.recv()
                };
                let (batch_index, batch) = match received {
                    Ok(b) => b,
                    Err(_) => break,
                };

                ctx.reset(batch.clone());
                chain.on_batch_start(&ctx);
                let mask: LaneMask = chain.evaluate(&ctx);

                for lane in 0..8 {
                    if mask & (1 << lane) == 0 {
                        continue;
                    }
                    let score = scorer
                        .as_ref()
                        .map(|s| s.score(&ctx, lane, &batch[lane]));
                    let admitted = match (&cutoff, &score) {
                        (Some(c), Some(s)) => c.admit(s.total),
                        _ => true,
                    };
                    if !admitted {
                        continue;
                    }
                    progress.matches.fetch_add(1, Ordering::Relaxed);
                    if result_tx
                        .send(SearchMatch {
                            seed: batch[lane].clone(),
                            score: score.clone(),
                        })
                        .is_err()
                    {
                        return;
                    }
                }

                progress
                    .seeds_searched
                    .fetch_add(mask.count_ones() as u64, Ordering::Relaxed);
                progress
                    .last_completed_batch
                    .fetch_max(batch_index + 1, Ordering::Relaxed);
            }
        }));
    }

    SearchHandle {
        results: result_rx,
        progress,
        cancel,
        workers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;
    use std::sync::atomic::AtomicU64 as AU64;

    struct EvenSeed;
    impl Filter for EvenSeed {
        fn filter(&self, ctx: &SearchContext<'_>, live_mask: LaneMask) -> LaneMask {
            let mut mask = live_mask;
            for lane in 0..8 {
                if live_mask & (1 << lane) == 0 {
                    continue;
                }
                if ctx.seeds[lane].as_str().as_bytes()[0] % 2 != 0 {
                    mask &= !(1 << lane);
                }
            }
            mask
        }
    }

    #[test]
    fn workers_drain_all_batches_and_report_progress() {
        let tables = Arc::new(ItemTables::builtin());
        let produced = Arc::new(AU64::new(0));
        let produced_clone = Arc::clone(&produced);
        let next_batch = move || {
            let i = produced_clone.fetch_add(1, Ordering::Relaxed);
            if i >= 10 {
                return None;
            }
            Some(Ok(std::array::from_fn(|lane| {
                Seed::new(format!("ALEE{}", (b'1' + lane as u8) as char)).unwrap()
            })))
        };

        let chain_factory: ChainFactory =
            Arc::new(|| Chain::new(vec![Box::new(EvenSeed)]).map_err(Into::into));

        let handle = spawn_search(
            SchedulerConfig { threads: 2, batch_channel_capacity: 4 },
            next_batch,
            chain_factory,
            None,
            None,
            tables,
        );

        let mut seen = 0;
        while handle.results.recv().is_ok() {
            seen += 1;
        }
        handle.join();
        assert!(seen > 0);
    }
}
