//! Search configuration — the knobs exposed as CLI flags, collected into
//! one serde-loadable struct with a builder: plain data separated from
//! fluent construction with validation at the end.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::deck_stake::{Deck, Stake};
use crate::errors::{ConfigError, MotelyError, MotelyResult};

/// Top-level search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub deck: Deck,
    pub stake: Stake,
    pub threads: usize,
    /// Length of the fixed seed prefix each batch enumerates; the remaining characters are batch-invariant.
    pub batch_char_count: u8,
    pub start_batch: Option<u64>,
    pub end_batch: Option<u64>,
    pub cutoff: CutoffConfig,
    /// Path to a JSON file overriding the bundled item tables; `None` uses
    /// [`crate::tables::ItemTables::builtin`].
    pub tables_path: Option<PathBuf>,
    pub silent: bool,
    pub debug: bool,
}

/// Serializable form of [`crate::scorer::Cutoff`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CutoffConfig {
    Fixed(i64),
    Auto,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            deck: Deck::Red,
            stake: Stake::White,
            threads: Self::default_threads(),
            batch_char_count: 3,
            start_batch: None,
            end_batch: None,
            cutoff: CutoffConfig::Auto,
            tables_path: None,
            silent: false,
            debug: false,
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::new()
    }

    fn default_threads() -> usize {
        num_cpus::get().max(1)
    }

    pub fn from_file(path: impl AsRef<Path>) -> MotelyResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.display().to_string(),
            source,
        })?;
        let config: SearchConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::JsonParse {
                file: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve `batch_char_count` and ante bounds.
    pub fn validate(&self) -> Result<(), MotelyError> {
        if self.batch_char_count == 0 || self.batch_char_count > 8 {
            return Err(ConfigError::BatchCharCountOutOfRange(self.batch_char_count).into());
        }
        if let (Some(start), Some(end)) = (self.start_batch, self.end_batch) {
            if start > end {
                return Err(ConfigError::InvalidEnumeratorRange { start, end }.into());
            }
        }
        Ok(())
    }
}

impl Default for CutoffConfig {
    fn default() -> Self {
        CutoffConfig::Auto
    }
}

impl CutoffConfig {
    pub fn to_cutoff(&self) -> crate::scorer::Cutoff {
        match self {
            CutoffConfig::Fixed(v) => crate::scorer::Cutoff::fixed(*v),
            CutoffConfig::Auto => crate::scorer::Cutoff::auto(),
        }
    }
}

/// Fluent builder: set fields one at a time, validate once at `build`.
#[derive(Debug, Clone)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        SearchConfigBuilder { config: SearchConfig::default() }
    }

    pub fn deck(mut self, deck: Deck) -> Self {
        self.config.deck = deck;
        self
    }

    pub fn stake(mut self, stake: Stake) -> Self {
        self.config.stake = stake;
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.config.threads = threads;
        self
    }

    pub fn batch_char_count(mut self, count: u8) -> Self {
        self.config.batch_char_count = count;
        self
    }

    pub fn start_batch(mut self, start: u64) -> Self {
        self.config.start_batch = Some(start);
        self
    }

    pub fn end_batch(mut self, end: u64) -> Self {
        self.config.end_batch = Some(end);
        self
    }

    pub fn cutoff(mut self, cutoff: CutoffConfig) -> Self {
        self.config.cutoff = cutoff;
        self
    }

    pub fn tables_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.tables_path = Some(path.into());
        self
    }

    pub fn silent(mut self, enable: bool) -> Self {
        self.config.silent = enable;
        self
    }

    pub fn debug(mut self, enable: bool) -> Self {
        self.config.debug = enable;
        self
    }

    pub fn build(self) -> MotelyResult<SearchConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    pub fn build_unchecked(self) -> SearchConfig {
        self.config
    }
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_batch_char_count_is_rejected() {
        let config = SearchConfig::builder().batch_char_count(0).build_unchecked();
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_batch_range_is_rejected() {
        let config = SearchConfig::builder().start_batch(10).end_batch(1).build_unchecked();
        assert!(config.validate().is_err());
    }

    #[test]
    fn builder_overrides_stick() {
        let config = SearchConfig::builder()
            .deck(Deck::Blue)
            .stake(Stake::Gold)
            .threads(4)
            .build()
            .unwrap();
        assert_eq!(config.deck, Deck::Blue);
        assert_eq!(config.stake, Stake::Gold);
        assert_eq!(config.threads, 4);
    }
}
