//! Error types for the search engine.
//!
//! Mirrors the taxonomy configuration errors abort before a
//! search launches, clause-compilation errors name the offending clause, and
//! runtime arithmetic errors are always a bug (never a retryable condition).

use thiserror::Error;

pub type MotelyResult<T> = Result<T, MotelyError>;

/// Top-level error type surfaced to callers of the library and the CLI.
#[derive(Debug, Error)]
pub enum MotelyError {
 #[error(transparent)]
 Config(#[from] ConfigError),

 #[error(transparent)]
 Clause(#[from] ClauseError),

 #[error(transparent)]
 Runtime(#[from] RuntimeError),

 #[error("search cancelled")]
 Cancelled,
}

impl MotelyError {
 /// Exit code: 1 = configuration, 2 = runtime, 130 = cancelled.
 pub fn exit_code(&self) -> i32 {
 match self {
 MotelyError::Config(_) => 1,
 MotelyError::Clause(_) => 1,
 MotelyError::Runtime(_) => 2,
 MotelyError::Cancelled => 130,
 }
 }
}

/// Configuration errors: bad enum names, invalid JSON, out-of-range antes,
/// unreadable files. Reported once, search does not launch.
#[derive(Debug, Error)]
pub enum ConfigError {
 #[error("unknown deck: {0}")]
 UnknownDeck(String),

 #[error("unknown stake: {0}")]
 UnknownStake(String),

 #[error("ante {0} out of range (expected 1..=8)")]
 AnteOutOfRange(u8),

 #[error("batch char count {0} out of range (expected 1..=8)")]
 BatchCharCountOutOfRange(u8),

 #[error("failed to read file {path}: {source}")]
 FileRead {
 path: String,
 #[source]
 source: std::io::Error,
 },

 #[error("invalid JSON in {file}: {source}")]
 JsonParse {
 file: String,
 #[source]
 source: serde_json::Error,
 },

 #[error("seed enumerator range is empty or invalid: start={start}, end={end}")]
 InvalidEnumeratorRange { start: u64, end: u64 },

 #[error("filter chain must contain at least one filter")]
 EmptyChain,

 #[error("missing required argument: {0}")]
 MissingArgument(String),

 #[error("invalid --cutoff value: {0}")]
 InvalidCutoff(String),
}

/// Errors raised while compiling a clause tree (C8) into a filter chain.
#[derive(Debug, Error)]
pub enum ClauseError {
 #[error("clause '{clause}' references an item that cannot appear at the stated slot: {reason}")]
 InvalidSlot { clause: String, reason: String },

 #[error("clause '{clause}' has unknown category: {category}")]
 UnknownCategory { clause: String, category: String },

 #[error("clause '{clause}' is missing a required field: {field}")]
 MissingField { clause: String, field: String },

 #[error("composite clause '{clause}' has no child clauses")]
 EmptyComposite { clause: String },
}

/// Errors that must never occur in correct operation; surfaced as a bug, the
/// worker aborts its batch and sets a failure flag that stops the search.
#[derive(Debug, Error)]
pub enum RuntimeError {
 #[error("NaN encountered in PRNG state for lane {lane} (key={key})")]
 NanState { lane: usize, key: String },

 #[error("character '{0}' is not in the seed alphabet")]
 OutOfAlphabet(char),

 #[error("seed exceeds the maximum length of 8 characters: {0}")]
 SeedTooLong(String),

 #[error("resample depth {0} exceeded stream's addressable ladder")]
 ResampleDepthExceeded(usize),
}
