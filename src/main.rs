//! CLI entry point: parse flags, compile the clause DSL, drive the
//! scheduler to completion, print CSV results.

use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use log::info;

use motely::config::SearchConfig;
use motely::dsl::{self, ClauseFile};
use motely::enumerator::{Batch, ListEnumerator, SequentialEnumerator};
use motely::errors::{ConfigError, MotelyError, MotelyResult};
use motely::io::{parse_cutoff, Cli};
use motely::scheduler::{spawn_search, SchedulerConfig};
use motely::seed::Seed;
use motely::tables::ItemTables;

fn main() {
    let cli = Cli::parse();
    let debug = cli.debug;
    init_logging(debug);

    match run(cli) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            if debug {
                eprintln!("{}", format!("{err:?}").red());
            } else {
                eprintln!("{}", format!("error: {err}").red());
            }
            std::process::exit(err.exit_code());
        }
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn load_tables(cli: &Cli) -> MotelyResult<ItemTables> {
    match &cli.tables {
        None => Ok(ItemTables::builtin()),
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
                path: path.display().to_string(),
                source,
            })?;
            serde_json::from_str(&content).map_err(|source| {
                ConfigError::JsonParse { file: path.display().to_string(), source }.into()
            })
        }
    }
}

fn load_clause_file(cli: &Cli) -> MotelyResult<ClauseFile> {
    let name = cli
        .json
        .as_ref()
        .ok_or_else(|| MotelyError::from(ConfigError::MissingArgument("--json".to_string())))?;
    let path = cli.filters_dir.join(name);
    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::FileRead {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content)
        .map_err(|source| ConfigError::JsonParse { file: path.display().to_string(), source }.into())
}

fn load_wordlist(path: &std::path::Path) -> MotelyResult<Vec<Seed>> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.display().to_string(),
        source,
    })?;
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(Seed::new)
        .collect()
}

/// Build the batch-producing closure the scheduler pulls from, per the CLI's
/// chosen enumeration mode.
fn build_next_batch(
    cli: &Cli,
    config: &SearchConfig,
    length: u8,
) -> MotelyResult<Box<dyn FnMut() -> Option<Result<Batch, MotelyError>> + Send>> {
    if let Some(seed) = &cli.seed {
        let seed = Seed::new(seed.clone())?;
        let mut list = ListEnumerator::new(vec![seed])?;
        return Ok(Box::new(move || list.next_batch().map(|(b, _mask)| Ok(b))));
    }
    if let Some(wordlist) = &cli.wordlist {
        let seeds = load_wordlist(wordlist)?;
        let mut list = ListEnumerator::new(seeds)?;
        return Ok(Box::new(move || list.next_batch().map(|(b, _mask)| Ok(b))));
    }

    let batch_char_count = config.batch_char_count;
    let start_batch = config.start_batch.unwrap_or(0);
    let probe = SequentialEnumerator::new(length, batch_char_count, 0, 0)?;
    let end_batch = config.end_batch.unwrap_or_else(|| probe.total_batches.saturating_sub(1));
    let mut seq = SequentialEnumerator::new(length, batch_char_count, start_batch, end_batch)?;
    Ok(Box::new(move || seq.next_batch()))
}

fn run(cli: Cli) -> MotelyResult<()> {
    let tables = Arc::new(load_tables(&cli)?);
    let file = load_clause_file(&cli)?;
    let compiled = dsl::compile(&file, Arc::clone(&tables))?;

    let mut builder = SearchConfig::builder().deck(compiled.deck).stake(compiled.stake);
    if let Some(threads) = cli.threads {
        builder = builder.threads(threads);
    }
    if let Some(batch_size) = cli.batch_size {
        builder = builder.batch_char_count(batch_size);
    }
    if let Some(start) = cli.start_batch {
        builder = builder.start_batch(start);
    }
    if let Some(end) = cli.end_batch {
        builder = builder.end_batch(end);
    }
    if let Some(cutoff_raw) = &cli.cutoff {
        let cutoff = parse_cutoff(cutoff_raw).map_err(ConfigError::InvalidCutoff)?;
        builder = builder.cutoff(cutoff);
    }
    builder = builder.silent(cli.silent).debug(cli.debug);
    let config = builder.build()?;

    let mut next_batch = build_next_batch(&cli, &config, cli.length)?;
    let scheduler_config = SchedulerConfig { threads: config.threads, batch_channel_capacity: 64 };
    let cutoff = config.cutoff.to_cutoff();

    let handle = spawn_search(
        scheduler_config,
        move || next_batch(),
        compiled.chain_factory,
        compiled.scorer,
        Some(cutoff),
        Arc::clone(&tables),
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "# Deck: {:?}, Stake: {:?}", compiled.deck, compiled.stake).ok();
    let mut header = String::from("Seed,TotalScore");
    for label in &compiled.score_labels {
        header.push(',');
        header.push_str(label);
    }
    writeln!(out, "{header}").ok();

    let progress = Arc::clone(&handle.progress);
    let mut seen = HashSet::new();
    while let Ok(found) = handle.results.recv() {
        if !seen.insert(found.seed.clone()) {
            continue;
        }
        let total = found.score.as_ref().map(|s| s.total).unwrap_or(0);
        let mut row = format!("{},{}", found.seed, total);
        if let Some(score) = &found.score {
            for sub in &score.sub_scores {
                row.push(',');
                row.push_str(&sub.to_string());
            }
        }
        writeln!(out, "{row}").ok();
    }
    handle.join();

    if !config.silent {
        let (searched, matches, _) = progress.snapshot();
        info!("searched {searched} seeds, {matches} matches");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_wordlist_skips_blank_lines() {
        let dir = std::env::temp_dir().join(format!("motely-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("words.txt");
        std::fs::write(&path, "ALEEB\n\nALEEC\n").unwrap();
        let seeds = load_wordlist(&path).unwrap();
        assert_eq!(seeds.len(), 2);
        std::fs::remove_dir_all(&dir).ok();
    }
}
