//! # Motely
//!
//! A vectorized brute-force seed-search engine for Balatro: walks the space
//! of up-to-8-character seeds 8 lanes at a time, replaying the game's own
//! PRNG derivation to decide whether a seed's early antes satisfy a filter
//! spec, then scores and reports the survivors.
//!
//! ## Architecture overview
//!
//! - [`rng`]: the vectorized PRNG core and resample streams (C1/C2).
//! - [`items`]: per-category item streams built on the RNG core (C3).
//! - [`context`]: the per-batch environment filters and streams draw from (C4).
//! - [`enumerator`]: produces the batches a search walks (C5).
//! - [`filter`]: the `Chain`/`Filter` pipeline (C6).
//! - [`scheduler`]: the worker-thread pool driving a search to completion (C7).
//! - [`dsl`]: compiles a JSON clause file into a `Chain`/`Scorer` pair (C8).
//! - [`ante`]: shared per-ante replay used by the DSL adapter.
//! - [`config`]/[`deck_stake`]/[`tables`]/[`seed`]/[`errors`]: supporting data.

pub mod ante;
pub mod config;
pub mod context;
pub mod deck_stake;
pub mod dsl;
pub mod enumerator;
pub mod errors;
pub mod filter;
pub mod io;
pub mod items;
pub mod rng;
pub mod scheduler;
pub mod scorer;
pub mod seed;
pub mod tables;

pub use config::{CutoffConfig, SearchConfig, SearchConfigBuilder};
pub use deck_stake::{Deck, Stake};
pub use dsl::{compile, ClauseFile, CompiledSearch};
pub use enumerator::{Batch, ListEnumerator, ProviderEnumerator, SequentialEnumerator};
pub use errors::{ClauseError, ConfigError, MotelyError, MotelyResult, RuntimeError};
pub use filter::{Chain, Filter};
pub use scheduler::{spawn_search, ChainFactory, Progress, SchedulerConfig, SearchHandle, SearchMatch};
pub use scorer::{Cutoff, ScoreResult, Scorer};
pub use seed::Seed;
pub use tables::ItemTables;
