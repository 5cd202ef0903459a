//! C8: Filter DSL Adapter — compiles a parsed clause tree into the C6
//! `Chain`/`Scorer` pair the scheduler runs.
//!
//! Clauses reference item occurrences by `(ante, shop-slot | pack-slot)`,
//! so compiling one means replaying the relevant antes with the persistent
//! per-`(ante, source)` streams `ante.rs` provides, then testing each
//! resolved slot against the clause's target. Replay is shared across every
//! clause in one chain by `AnteReplayFilter`, which always runs first each
//! batch and populates an `Rc<RefCell<..>>` cache the other clause filters
//! read from — a filter may shrink work by pre-computing in an
//! `on_batch_start` hook, applied at the whole-chain level here, not per
//! individual clause.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::ante::{replay_pack_slots, replay_shop_slots, PackStreams};
use crate::context::SearchContext;
use crate::deck_stake::{Deck, Stake};
use crate::dsl::clause::{AnteSpec, Clause, ClauseFile, Sources};
use crate::errors::{ClauseError, MotelyError};
use crate::filter::{Chain, Filter};
use crate::items::booster_pack::PackType;
use crate::items::shop::{ShopSlotCategory, ShopStreams};
use crate::items::voucher::{draw_voucher, VoucherSlot};
use crate::items::{boss, tag, Edition, Item, ItemSet};
use crate::rng::LaneMask;
use crate::scorer::{ScoreResult, Scorer};
use crate::seed::Seed;
use crate::tables::ItemTables;

/// One ante's cached replay: every shop slot and every flattened pack-item
/// slot, vectorized across lanes, plus the per-ante singletons (voucher,
/// tags, boss).
#[derive(Default)]
struct AnteRecord {
    shop: Vec<([ShopSlotCategory; 8], [Item; 8])>,
    pack: Vec<([PackType; 8], [Item; 8], [bool; 8])>,
    voucher: [Item; 8],
    small_blind_tag: [Item; 8],
    big_blind_tag: [Item; 8],
    boss: [Item; 8],
}

#[derive(Default)]
struct AnteReplayCache {
    antes: Vec<Option<AnteRecord>>,
}

impl AnteReplayCache {
    fn record(&self, ante: u8) -> Option<&AnteRecord> {
        self.antes.get(ante as usize).and_then(|o| o.as_ref())
    }
}

/// Vouchers carry no prerequisite data in [`ItemTables`] yet; until real
/// data supplies it, every voucher is treated as independent. Documented in
/// DESIGN.md.
fn flat_voucher_table(names: &[String]) -> Vec<VoucherSlot> {
    names
        .iter()
        .enumerate()
        .map(|(i, _)| VoucherSlot { index: i as u16, requires: None })
        .collect()
}

/// Always the first filter in a compiled chain: replays every ante up to
/// the highest one any clause references and populates the shared cache
/// every clause filter reads from. Never excludes a lane itself.
struct AnteReplayFilter {
    stake: Stake,
    max_ante: u8,
    cache: Rc<RefCell<AnteReplayCache>>,
}

/// Replay every ante `1..=max_ante`, in increasing order so voucher/boss
/// state (which depends on earlier antes) carries forward correctly.
/// Shared by [`AnteReplayFilter`] (once per batch) and [`DslScorer`] (once
/// per scored lane — SHOULD clauses have no batch-level cache to read from,
/// since [`Scorer::score`] isn't given an `on_batch_start` hook).
fn build_ante_records(ctx: &SearchContext<'_>, stake: Stake, max_ante: u8) -> Vec<Option<AnteRecord>> {
    let tables = ctx.tables;
    let voucher_table = flat_voucher_table(&tables.vouchers);
    let mut antes: Vec<Option<AnteRecord>> = (0..=max_ante).map(|_| None).collect();
    let mut active_vouchers: [ItemSet; 8] = Default::default();
    let mut recent_bosses: Vec<[Item; 8]> = Vec::new();

    for ante in 1..=max_ante {
        let mut record = AnteRecord::default();

        let mut shop_streams = ShopStreams::new(ctx, ante);
        replay_shop_slots(ctx, ante, stake, &mut shop_streams, |_, res| {
            record.shop.push((res.category, res.items));
            true
        });

        let mut pack_streams = PackStreams::new(ctx, ante);
        replay_pack_slots(ctx, ante, stake, &mut pack_streams, |_, res| {
            let kind: [PackType; 8] = std::array::from_fn(|lane| res.pack[lane].kind);
            record.pack.push((kind, res.item, res.soul_triggered));
            true
        });

        record.voucher = draw_voucher(ctx, ante, &voucher_table, &mut active_vouchers, &[]);
        record.small_blind_tag = tag::draw_small_blind_tag(ctx, ante, tables.small_blind_tags.len());
        record.big_blind_tag = tag::draw_big_blind_tag(ctx, ante, tables.big_blind_tags.len());
        record.boss = boss::draw_boss(ctx, ante, tables.bosses.len(), &recent_bosses);
        recent_bosses.push(record.boss);
        if recent_bosses.len() > boss::RECENT_EXCLUSION_WINDOW {
            recent_bosses.remove(0);
        }

        antes[ante as usize] = Some(record);
    }

    antes
}

impl Filter for AnteReplayFilter {
    fn on_batch_start(&mut self, ctx: &SearchContext<'_>) {
        let antes = build_ante_records(ctx, self.stake, self.max_ante);
        *self.cache.borrow_mut() = AnteReplayCache { antes };
    }

    fn filter(&self, _ctx: &SearchContext<'_>, live_mask: LaneMask) -> LaneMask {
        live_mask
    }
}

/// The item category a clause's `type` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClauseCategory {
    Joker,
    SoulJoker,
    Tarot,
    Planet,
    Spectral,
    PlayingCard,
    Voucher,
    Tag,
    SmallBlindTag,
    BigBlindTag,
    Boss,
}

impl ClauseCategory {
    fn parse(kind: &str, clause_label: &str) -> Result<Self, ClauseError> {
        Ok(match kind {
            "Joker" => ClauseCategory::Joker,
            "SoulJoker" => ClauseCategory::SoulJoker,
            "Tarot" => ClauseCategory::Tarot,
            "Planet" => ClauseCategory::Planet,
            "Spectral" => ClauseCategory::Spectral,
            "PlayingCard" => ClauseCategory::PlayingCard,
            "Voucher" => ClauseCategory::Voucher,
            "Tag" => ClauseCategory::Tag,
            "SmallBlindTag" => ClauseCategory::SmallBlindTag,
            "BigBlindTag" => ClauseCategory::BigBlindTag,
            "Boss" => ClauseCategory::Boss,
            other => {
                return Err(ClauseError::UnknownCategory {
                    clause: clause_label.to_string(),
                    category: other.to_string(),
                })
            }
        })
    }

    fn pool_len(self, tables: &ItemTables) -> usize {
        match self {
            ClauseCategory::Joker | ClauseCategory::SoulJoker => {
                tables.jokers.common.len()
                    + tables.jokers.uncommon.len()
                    + tables.jokers.rare.len()
                    + tables.jokers.legendary.len()
            }
            ClauseCategory::Tarot => tables.tarots.len(),
            ClauseCategory::Planet => tables.planets.len(),
            ClauseCategory::Spectral => tables.spectrals.len(),
            ClauseCategory::PlayingCard => tables.ranks.len() * tables.suits.len(),
            ClauseCategory::Voucher => tables.vouchers.len(),
            ClauseCategory::Tag => tables.small_blind_tags.len() + tables.big_blind_tags.len(),
            ClauseCategory::SmallBlindTag => tables.small_blind_tags.len(),
            ClauseCategory::BigBlindTag => tables.big_blind_tags.len(),
            ClauseCategory::Boss => tables.bosses.len(),
        }
    }
}

fn find_index(table: &[String], name: &str) -> Option<u16> {
    table.iter().position(|n| n.eq_ignore_ascii_case(name)).map(|i| i as u16)
}

/// Joker items carry no rarity tag, so a name is resolved by searching
/// every rarity pool; when a name is unique across pools (true of the
/// builtin table) this is exact, but two different rarities sharing both a
/// name-derived index and category is unresolvable without widening
/// `Item`'s layout — documented in DESIGN.md as a known limitation rather
/// than silently wrong.
fn resolve_joker_indices(tables: &ItemTables, names: &[String]) -> Vec<u16> {
    let pools = [
        &tables.jokers.common,
        &tables.jokers.uncommon,
        &tables.jokers.rare,
        &tables.jokers.legendary,
    ];
    let mut out = Vec::new();
    for name in names {
        for pool in pools {
            if let Some(idx) = find_index(pool, name) {
                out.push(idx);
            }
        }
    }
    out
}

fn resolve_edition(s: &str, clause_label: &str) -> Result<Edition, ClauseError> {
    Ok(match s.to_ascii_lowercase().as_str() {
        "foil" => Edition::Foil,
        "holographic" => Edition::Holographic,
        "polychrome" => Edition::Polychrome,
        "negative" => Edition::Negative,
        other => {
            return Err(ClauseError::InvalidSlot {
                clause: clause_label.to_string(),
                reason: format!("unknown edition '{other}'"),
            })
        }
    })
}

/// A compiled atomic clause: everything needed to test one lane's ante
/// records without re-touching the JSON.
struct AtomicMatcher {
    category: ClauseCategory,
    antes: Vec<u8>,
    target_indices: Option<Vec<u16>>,
    wildcard: bool,
    edition: Option<Edition>,
    shop_slots: Option<Vec<u32>>,
    pack_slots: Option<Vec<u32>>,
    min_shop_slot: Option<u32>,
    max_shop_slot: Option<u32>,
    rank: Option<u16>,
    suit: Option<u16>,
    min: u32,
    rank_count: usize,
}

impl AtomicMatcher {
    fn shop_slot_in_range(&self, slot: u32) -> bool {
        if let Some(list) = &self.shop_slots {
            return list.contains(&slot);
        }
        if self.min_shop_slot.is_some() || self.max_shop_slot.is_some() {
            let min = self.min_shop_slot.unwrap_or(0);
            let max = self.max_shop_slot.unwrap_or(u32::MAX);
            return slot >= min && slot <= max;
        }
        true
    }

    fn pack_slot_in_range(&self, slot: u32) -> bool {
        match &self.pack_slots {
            Some(list) => list.contains(&slot),
            None => true,
        }
    }

    fn item_matches(&self, item: Item) -> bool {
        if item.is_sentinel() {
            return false;
        }
        if let Some(edition) = self.edition {
            if item.edition() != edition {
                return false;
            }
        }
        if self.wildcard {
            // still qualify on rank/suit below for PlayingCard wildcards
        } else if let Some(targets) = &self.target_indices {
            let idx = if self.category == ClauseCategory::PlayingCard {
                (item.index() as usize % self.rank_count.max(1)) as u16
            } else {
                item.index()
            };
            if !targets.contains(&idx) {
                return false;
            }
        }
        if self.category == ClauseCategory::PlayingCard {
            if let Some(rank) = self.rank {
                if item.index() as usize % self.rank_count.max(1) != rank as usize {
                    return false;
                }
            }
            if let Some(suit) = self.suit {
                if item.index() as usize / self.rank_count.max(1) != suit as usize {
                    return false;
                }
            }
        }
        true
    }

    fn count_for_ante(&self, record: &AnteRecord, lane: usize) -> u32 {
        match self.category {
            ClauseCategory::Joker => {
                let mut n = 0;
                for (slot, (cats, items)) in record.shop.iter().enumerate() {
                    if cats[lane] == ShopSlotCategory::Joker
                        && self.shop_slot_in_range(slot as u32)
                        && self.item_matches(items[lane])
                    {
                        n += 1;
                    }
                }
                for (slot, (kinds, items, soul)) in record.pack.iter().enumerate() {
                    if kinds[lane] == PackType::Buffoon
                        && !soul[lane]
                        && self.pack_slot_in_range(slot as u32)
                        && self.item_matches(items[lane])
                    {
                        n += 1;
                    }
                }
                n
            }
            ClauseCategory::SoulJoker => record
                .pack
                .iter()
                .enumerate()
                .filter(|(slot, (_, items, soul))| {
                    soul[lane] && self.pack_slot_in_range(*slot as u32) && self.item_matches(items[lane])
                })
                .count() as u32,
            ClauseCategory::Tarot | ClauseCategory::Planet | ClauseCategory::Spectral => {
                let shop_cat = match self.category {
                    ClauseCategory::Tarot => ShopSlotCategory::Tarot,
                    ClauseCategory::Planet => ShopSlotCategory::Planet,
                    ClauseCategory::Spectral => ShopSlotCategory::Spectral,
                    _ => unreachable!(),
                };
                let pack_kind = match self.category {
                    ClauseCategory::Tarot => PackType::Arcana,
                    ClauseCategory::Planet => PackType::Celestial,
                    ClauseCategory::Spectral => PackType::Spectral,
                    _ => unreachable!(),
                };
                let mut n = 0;
                for (slot, (cats, items)) in record.shop.iter().enumerate() {
                    if cats[lane] == shop_cat
                        && self.shop_slot_in_range(slot as u32)
                        && self.item_matches(items[lane])
                    {
                        n += 1;
                    }
                }
                for (slot, (kinds, items, soul)) in record.pack.iter().enumerate() {
                    if kinds[lane] == pack_kind
                        && !soul[lane]
                        && self.pack_slot_in_range(slot as u32)
                        && self.item_matches(items[lane])
                    {
                        n += 1;
                    }
                }
                n
            }
            ClauseCategory::PlayingCard => {
                let mut n = 0;
                for (slot, (cats, items)) in record.shop.iter().enumerate() {
                    if cats[lane] == ShopSlotCategory::PlayingCard
                        && self.shop_slot_in_range(slot as u32)
                        && self.item_matches(items[lane])
                    {
                        n += 1;
                    }
                }
                for (slot, (kinds, items, _)) in record.pack.iter().enumerate() {
                    if kinds[lane] == PackType::Standard
                        && self.pack_slot_in_range(slot as u32)
                        && self.item_matches(items[lane])
                    {
                        n += 1;
                    }
                }
                n
            }
            ClauseCategory::Voucher => u32::from(self.item_matches(record.voucher[lane])),
            ClauseCategory::Tag => {
                u32::from(self.item_matches(record.small_blind_tag[lane]))
                    + u32::from(self.item_matches(record.big_blind_tag[lane]))
            }
            ClauseCategory::SmallBlindTag => u32::from(self.item_matches(record.small_blind_tag[lane])),
            ClauseCategory::BigBlindTag => u32::from(self.item_matches(record.big_blind_tag[lane])),
            ClauseCategory::Boss => u32::from(self.item_matches(record.boss[lane])),
        }
    }

    fn matches(&self, cache: &AnteReplayCache, lane: usize) -> bool {
        let mut total = 0u32;
        for &ante in &self.antes {
            if let Some(record) = cache.record(ante) {
                total += self.count_for_ante(record, lane);
            }
        }
        total >= self.min
    }

    /// Rough selectivity estimate for filter ordering: smaller target sets
    /// over a larger pool are more restrictive.
    fn selectivity(&self, tables: &ItemTables) -> f64 {
        if self.wildcard {
            return 1.0;
        }
        let pool = self.category.pool_len(tables).max(1) as f64;
        let targets = self.target_indices.as_ref().map(|t| t.len()).unwrap_or(1).max(1) as f64;
        targets / pool
    }
}

enum CompiledClause {
    Atomic(AtomicMatcher),
    And(Vec<CompiledClause>),
    Or(Vec<CompiledClause>),
}

impl CompiledClause {
    fn matches(&self, cache: &AnteReplayCache, lane: usize) -> bool {
        match self {
            CompiledClause::Atomic(m) => m.matches(cache, lane),
            CompiledClause::And(cs) => cs.iter().all(|c| c.matches(cache, lane)),
            CompiledClause::Or(cs) => cs.iter().any(|c| c.matches(cache, lane)),
        }
    }

    fn max_ante(&self) -> u8 {
        match self {
            CompiledClause::Atomic(m) => m.antes.iter().copied().max().unwrap_or(1),
            CompiledClause::And(cs) | CompiledClause::Or(cs) => {
                cs.iter().map(CompiledClause::max_ante).max().unwrap_or(1)
            }
        }
    }

    fn selectivity(&self, tables: &ItemTables) -> f64 {
        match self {
            CompiledClause::Atomic(m) => m.selectivity(tables),
            CompiledClause::And(cs) | CompiledClause::Or(cs) => cs
                .iter()
                .map(|c| c.selectivity(tables))
                .fold(1.0, f64::min),
        }
    }
}

fn compile_atomic(clause: &Clause, antes: AnteSpec, tables: &ItemTables) -> Result<AtomicMatcher, ClauseError> {
    let label = clause.kind.clone();
    let category = ClauseCategory::parse(&clause.kind, &label)?;
    let wildcard = clause.is_wildcard();
    let names = clause.target_names();

    let target_indices = if wildcard || names.is_empty() {
        None
    } else {
        Some(match category {
            ClauseCategory::Joker | ClauseCategory::SoulJoker => resolve_joker_indices(tables, &names),
            ClauseCategory::Tarot => names.iter().filter_map(|n| find_index(&tables.tarots, n)).collect(),
            ClauseCategory::Planet => names.iter().filter_map(|n| find_index(&tables.planets, n)).collect(),
            ClauseCategory::Spectral => {
                names.iter().filter_map(|n| find_index(&tables.spectrals, n)).collect()
            }
            ClauseCategory::Voucher => names.iter().filter_map(|n| find_index(&tables.vouchers, n)).collect(),
            ClauseCategory::Tag => names
                .iter()
                .filter_map(|n| find_index(&tables.small_blind_tags, n).or_else(|| find_index(&tables.big_blind_tags, n)))
                .collect(),
            ClauseCategory::SmallBlindTag => {
                names.iter().filter_map(|n| find_index(&tables.small_blind_tags, n)).collect()
            }
            ClauseCategory::BigBlindTag => {
                names.iter().filter_map(|n| find_index(&tables.big_blind_tags, n)).collect()
            }
            ClauseCategory::Boss => names.iter().filter_map(|n| find_index(&tables.bosses, n)).collect(),
            ClauseCategory::PlayingCard => Vec::new(),
        })
    };

    let edition = clause.edition.as_deref().map(|e| resolve_edition(e, &label)).transpose()?;

    let rank = clause.rank.as_deref().and_then(|r| find_index(&tables.ranks, r));
    let suit = clause.suit.as_deref().and_then(|s| find_index(&tables.suits, s));

    let Sources { shop_slots, pack_slots } = clause.sources.clone().unwrap_or_default();

    Ok(AtomicMatcher {
        category,
        antes: antes.antes,
        target_indices,
        wildcard,
        edition,
        shop_slots,
        pack_slots,
        min_shop_slot: clause.min_shop_slot,
        max_shop_slot: clause.max_shop_slot,
        rank,
        suit,
        min: clause.min.max(1),
        rank_count: tables.ranks.len(),
    })
}

fn compile_clause(clause: &Clause, inherited: AnteSpec, tables: &ItemTables) -> Result<CompiledClause, ClauseError> {
    let own = clause.ante_spec().inherit(&inherited);
    if clause.is_composite() {
        let children = clause.clauses.as_ref().ok_or_else(|| ClauseError::EmptyComposite {
            clause: clause.kind.clone(),
        })?;
        if children.is_empty() {
            return Err(ClauseError::EmptyComposite { clause: clause.kind.clone() });
        }
        let compiled: Result<Vec<_>, _> =
            children.iter().map(|c| compile_clause(c, own.clone(), tables)).collect();
        let compiled = compiled?;
        Ok(match clause.kind.as_str() {
            "And" => CompiledClause::And(compiled),
            _ => CompiledClause::Or(compiled),
        })
    } else {
        Ok(CompiledClause::Atomic(compile_atomic(clause, own, tables)?))
    }
}

/// A compiled SHOULD clause list, scored independently of the MUST/MUST-NOT
/// chain. Unlike [`ClauseFilter`], this owns no shared `Rc` state — every
/// field is plain owned data — so it is `Send + Sync` on its own and can be
/// handed to the scheduler as `Arc<dyn Scorer + Send + Sync>` directly.
struct DslScorer {
    stake: Stake,
    max_ante: u8,
    clauses: Vec<(CompiledClause, i64)>,
}

impl Scorer for DslScorer {
    fn score(&self, ctx: &SearchContext<'_>, lane: usize, _seed: &Seed) -> ScoreResult {
        let antes = build_ante_records(ctx, self.stake, self.max_ante);
        let cache = AnteReplayCache { antes };
        let mut total = 0i64;
        let mut sub_scores = Vec::with_capacity(self.clauses.len());
        for (clause, points) in &self.clauses {
            let awarded = if clause.matches(&cache, lane) { *points } else { 0 };
            total += awarded;
            sub_scores.push(awarded);
        }
        ScoreResult { total, sub_scores }
    }
}

struct ClauseFilter {
    negate: bool,
    compiled: CompiledClause,
    cache: Rc<RefCell<AnteReplayCache>>,
}

impl Filter for ClauseFilter {
    fn filter(&self, _ctx: &SearchContext<'_>, live_mask: LaneMask) -> LaneMask {
        let cache = self.cache.borrow();
        let mut out = live_mask;
        for lane in 0..8 {
            if live_mask & (1 << lane) == 0 {
                continue;
            }
            let hit = self.compiled.matches(&cache, lane);
            let keep = if self.negate { !hit } else { hit };
            if !keep {
                out &= !(1 << lane);
            }
        }
        out
    }
}

/// A compiled filter chain plus the scorer built from `should` clauses, and
/// the deck/stake the clause file asked for (the caller wires these into
/// the enumerator and scheduler).
pub struct CompiledSearch {
    pub deck: Deck,
    pub stake: Stake,
    pub chain_factory: crate::scheduler::ChainFactory,
    pub scorer: Option<Arc<dyn Scorer + Send + Sync>>,
    pub score_labels: Vec<String>,
}

/// Compile a parsed clause file into a chain factory + scorer. Each call to
/// the returned factory rebuilds an independent `AnteReplayCache`, matching
/// the scheduler's one-chain-per-worker model.
pub fn compile(file: &ClauseFile, tables: Arc<ItemTables>) -> Result<CompiledSearch, MotelyError> {
    let deck: Deck = file.deck.parse()?;
    let stake: Stake = file.stake.parse()?;

    let must: Result<Vec<_>, ClauseError> = file
        .must
        .iter()
        .map(|c| compile_clause(c, AnteSpec::default(), &tables))
        .collect();
    let must = must?;
    let must_not: Result<Vec<_>, ClauseError> = file
        .must_not
        .iter()
        .map(|c| compile_clause(c, AnteSpec::default(), &tables))
        .collect();
    let must_not = must_not?;
    let should: Result<Vec<_>, ClauseError> = file
        .should
        .iter()
        .map(|c| compile_clause(c, AnteSpec::default(), &tables))
        .collect();
    let should = should?;

    let max_ante = must
        .iter()
        .chain(must_not.iter())
        .chain(should.iter())
        .map(CompiledClause::max_ante)
        .max()
        .unwrap_or(1)
        .max(1)
        .min(8);

    let score_labels: Vec<String> = file
        .should
        .iter()
        .map(|c| c.value.clone().unwrap_or_else(|| c.kind.clone()))
        .collect();
    let should_scores: Vec<i64> = file.should.iter().map(|c| c.score.unwrap_or(0)).collect();

    let tables_for_factory = Arc::clone(&tables);
    let chain_factory: crate::scheduler::ChainFactory = Arc::new(move || {
        let cache = Rc::new(RefCell::new(AnteReplayCache::default()));
        let mut filters: Vec<Box<dyn Filter>> = vec![Box::new(AnteReplayFilter {
            stake,
            max_ante,
            cache: Rc::clone(&cache),
        })];

        let mut must_filters: Vec<(ClauseFilter, f64)> = Vec::new();
        for c in &must {
            let sel = c.selectivity(&tables_for_factory);
            must_filters.push((ClauseFilter { negate: false, compiled: clause_clone(c), cache: Rc::clone(&cache) }, sel));
        }
        must_filters.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        for (f, _) in must_filters {
            filters.push(Box::new(f));
        }
        for c in &must_not {
            filters.push(Box::new(ClauseFilter {
                negate: true,
                compiled: clause_clone(c),
                cache: Rc::clone(&cache),
            }));
        }

        Chain::new(filters).or_else(|_| Ok::<_, MotelyError>(Chain::pass_through()))
    });

    let scorer: Option<Arc<dyn Scorer + Send + Sync>> = if should.is_empty() {
        None
    } else {
        let clauses: Vec<(CompiledClause, i64)> = should.into_iter().zip(should_scores).collect();
        Some(Arc::new(DslScorer { stake, max_ante, clauses }))
    };

    Ok(CompiledSearch {
        deck,
        stake,
        chain_factory,
        scorer,
        score_labels,
    })
}

/// `CompiledClause` holds no `Clone` derive (its leaves borrow nothing, but
/// deriving `Clone` on a tree of trait-free enums is mechanical); building a
/// small manual clone keeps `must`'s matchers reusable across the per-worker
/// `must_filters` sort without re-parsing the source `Clause`s.
fn clause_clone(c: &CompiledClause) -> CompiledClause {
    match c {
        CompiledClause::Atomic(m) => CompiledClause::Atomic(AtomicMatcher {
            category: m.category,
            antes: m.antes.clone(),
            target_indices: m.target_indices.clone(),
            wildcard: m.wildcard,
            edition: m.edition,
            shop_slots: m.shop_slots.clone(),
            pack_slots: m.pack_slots.clone(),
            min_shop_slot: m.min_shop_slot,
            max_shop_slot: m.max_shop_slot,
            rank: m.rank,
            suit: m.suit,
            min: m.min,
            rank_count: m.rank_count,
        }),
        CompiledClause::And(cs) => CompiledClause::And(cs.iter().map(clause_clone).collect()),
        CompiledClause::Or(cs) => CompiledClause::Or(cs.iter().map(clause_clone).collect()),
    }
}
