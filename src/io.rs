//! CLI surface: the canonical flags this search tool accepts, parsed with
//! `clap`'s derive API the same way a `Cli`/`Commands` pair would, adapted
//! from a subcommand shape to a flat flag set since this tool runs exactly
//! one kind of job (a search).

use std::path::PathBuf;

use clap::Parser;

use crate::config::CutoffConfig;

/// Vectorized brute-force seed search.
#[derive(Parser, Debug)]
#[command(name = "motely")]
#[command(about = "Vectorized brute-force seed search for Balatro")]
#[command(version)]
pub struct Cli {
    /// Name of a JSON clause file under `--filters-dir` (default: current directory).
    #[arg(long = "json")]
    pub json: Option<String>,

    /// Directory `--json` names are resolved against.
    #[arg(long = "filters-dir", default_value = ".")]
    pub filters_dir: PathBuf,

    /// Single-seed mode: check exactly one seed instead of enumerating.
    #[arg(long = "seed")]
    pub seed: Option<String>,

    /// Name of a newline-delimited wordlist file (List enumerator mode).
    #[arg(long = "wordlist")]
    pub wordlist: Option<PathBuf>,

    /// Worker thread count; defaults to the available parallelism.
    #[arg(long = "threads")]
    pub threads: Option<usize>,

    /// Sequential mode's leading batch-varying character count (1..=8).
    #[arg(long = "batchSize")]
    pub batch_size: Option<u8>,

    #[arg(long = "startBatch")]
    pub start_batch: Option<u64>,

    #[arg(long = "endBatch")]
    pub end_batch: Option<u64>,

    /// "auto" (default) or a fixed integer score threshold.
    #[arg(long = "cutoff")]
    pub cutoff: Option<String>,

    /// Suppress progress output; matches still print.
    #[arg(long = "silent")]
    pub silent: bool,

    /// Print a full error trace instead of a single line on failure.
    #[arg(long = "debug")]
    pub debug: bool,

    /// Path to a JSON file overriding the bundled item tables.
    #[arg(long = "tables")]
    pub tables: Option<PathBuf>,

    /// Seed length for Sequential mode (ignored in seed/wordlist modes).
    #[arg(long = "length", default_value_t = 8)]
    pub length: u8,
}

/// Parse the `--cutoff` flag's `"auto"` / integer grammar.
pub fn parse_cutoff(raw: &str) -> Result<CutoffConfig, String> {
    if raw.eq_ignore_ascii_case("auto") {
        Ok(CutoffConfig::Auto)
    } else {
        raw.parse::<i64>()
            .map(CutoffConfig::Fixed)
            .map_err(|_| format!("invalid --cutoff value: {raw}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_accepts_auto_case_insensitively() {
        assert!(matches!(parse_cutoff("Auto").unwrap(), CutoffConfig::Auto));
    }

    #[test]
    fn cutoff_parses_fixed_integers() {
        match parse_cutoff("42").unwrap() {
            CutoffConfig::Fixed(v) => assert_eq!(v, 42),
            _ => panic!("expected Fixed"),
        }
    }

    #[test]
    fn cutoff_rejects_garbage() {
        assert!(parse_cutoff("not-a-number").is_err());
    }
}
