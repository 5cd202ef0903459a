//! Tarot and Planet streams: a uniform index draw deduped against the
//! current pack, with a Soul/Black-Hole substitution trial that always
//! consumes RNG ahead of the draw.
//!
//! Like the joker streams, an ante's entire sequence of Tarot/Planet slots
//! for a given source shares one resample ladder and one substitution
//! stream; callers build these once per `(ante, source)` via
//! [`tarot_resample_key`] / [`soul_key`] (or the Planet equivalents) and
//! step them once per slot.

use super::common::{bernoulli_trial, draw_with_pack_dedup};
use super::{Category, Item, ItemSet, Source};
use crate::rng::ResampleStream;

/// Probability a pack slot substitutes the special item instead of the
/// normal category draw.
const SPECIAL_SUBSTITUTION_CHANCE: f64 = 0.003;

pub fn tarot_resample_key(source: Source, ante: u8) -> String {
    format!("Tarot{}{ante}", source.key_tag())
}

pub fn soul_key(source: Source, ante: u8) -> String {
    format!("soul{}{ante}", source.key_tag())
}

pub fn planet_resample_key(source: Source, ante: u8) -> String {
    format!("Planet{}{ante}", source.key_tag())
}

pub fn black_hole_key(source: Source, ante: u8) -> String {
    format!("blackhole{}{ante}", source.key_tag())
}

/// Draw one Tarot for the current slot, stepping `resample` (and `soul`,
/// when this source can roll the substitution) once. `soul` should be
/// `None` for any source other than [`Source::ArcanaPack`] — passing `Some`
/// there would roll a trial the game never performs for that source.
pub fn draw_tarot(
    resample: &mut ResampleStream,
    soul: Option<&mut ResampleStream>,
    pool_len: usize,
    packs: &mut [ItemSet; 8],
    live_mask: u8,
) -> [Item; 8] {
    let soul_hit = match soul {
        Some(s) => bernoulli_trial(s, SPECIAL_SUBSTITUTION_CHANCE),
        None => [false; 8],
    };

    let drawn = draw_with_pack_dedup(resample, pool_len, packs, Category::Tarot, live_mask);

    std::array::from_fn(|lane| {
        if live_mask & (1 << lane) == 0 {
            return Item::EXCLUDED;
        }
        let item = if soul_hit[lane] && !packs[lane].contains(Item::SOUL) {
            Item::SOUL
        } else {
            drawn[lane]
        };
        packs[lane].push(item);
        item
    })
}

/// Draw one Planet for the current slot, stepping `resample` (and
/// `black_hole`, when this source can roll the substitution) once.
/// `black_hole` should be `None` for any source other than
/// [`Source::CelestialPack`].
pub fn draw_planet(
    resample: &mut ResampleStream,
    black_hole: Option<&mut ResampleStream>,
    pool_len: usize,
    packs: &mut [ItemSet; 8],
    live_mask: u8,
) -> [Item; 8] {
    let black_hole_hit = match black_hole {
        Some(s) => bernoulli_trial(s, SPECIAL_SUBSTITUTION_CHANCE),
        None => [false; 8],
    };

    let drawn = draw_with_pack_dedup(resample, pool_len, packs, Category::Planet, live_mask);

    std::array::from_fn(|lane| {
        if live_mask & (1 << lane) == 0 {
            return Item::EXCLUDED;
        }
        let item = if black_hole_hit[lane] && !packs[lane].contains(Item::BLACK_HOLE) {
            Item::BLACK_HOLE
        } else {
            drawn[lane]
        };
        packs[lane].push(item);
        item
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SearchContext;
    use crate::rng::ALL_LANES;
    use crate::seed::Seed;
    use crate::tables::ItemTables;

    fn ctx(tables: &ItemTables) -> SearchContext<'_> {
        let seeds: [Seed; 8] =
            std::array::from_fn(|i| Seed::new(format!("ALEE{}", (b'1' + i as u8) as char)).unwrap());
        SearchContext::new(seeds, tables)
    }

    #[test]
    fn tarot_draw_is_deterministic_and_in_pool() {
        let tables = ItemTables::builtin();
        let c = ctx(&tables);
        let mut packs: [ItemSet; 8] = Default::default();
        let mut resample = c.resample_stream(&tarot_resample_key(Source::ArcanaPack, 1));
        let mut soul = c.resample_stream(&soul_key(Source::ArcanaPack, 1));
        let items = draw_tarot(
            &mut resample,
            Some(&mut soul),
            tables.tarots.len(),
            &mut packs,
            ALL_LANES,
        );
        for item in items {
            if item != Item::SOUL {
                assert!((item.index() as usize) < tables.tarots.len());
            }
        }
    }

    #[test]
    fn non_arcana_source_never_produces_soul() {
        let tables = ItemTables::builtin();
        let c = ctx(&tables);
        for ante in 1..=8 {
            let mut packs: [ItemSet; 8] = Default::default();
            let mut resample = c.resample_stream(&tarot_resample_key(Source::Shop, ante));
            let items = draw_tarot(&mut resample, None, tables.tarots.len(), &mut packs, ALL_LANES);
            assert!(items.iter().all(|i| *i != Item::SOUL));
        }
    }

    #[test]
    fn pack_dedup_avoids_repeats_across_the_antes_slot_sequence() {
        let tables = ItemTables::builtin();
        let c = ctx(&tables);
        let mut packs: [ItemSet; 8] = Default::default();
        let mut resample = c.resample_stream(&planet_resample_key(Source::CelestialPack, 1));
        let mut black_hole = c.resample_stream(&black_hole_key(Source::CelestialPack, 1));
        let mut seen: [Vec<Item>; 8] = Default::default();
        for _ in 0..3 {
            let items = draw_planet(
                &mut resample,
                Some(&mut black_hole),
                tables.planets.len(),
                &mut packs,
                ALL_LANES,
            );
            for (lane, item) in items.iter().enumerate() {
                if *item != Item::BLACK_HOLE {
                    assert!(!seen[lane].contains(item), "duplicate planet drawn in same lane");
                }
                seen[lane].push(*item);
            }
        }
    }

    #[test]
    fn consecutive_slots_advance_the_shared_resample_stream() {
        let tables = ItemTables::builtin();
        let c = ctx(&tables);
        let mut packs: [ItemSet; 8] = Default::default();
        let mut resample = c.resample_stream(&tarot_resample_key(Source::Shop, 1));
        let first = draw_tarot(&mut resample, None, tables.tarots.len(), &mut packs, ALL_LANES);
        let second = draw_tarot(&mut resample, None, tables.tarots.len(), &mut packs, ALL_LANES);
        assert_ne!(first, second, "second slot must not replay the first slot's draw");
    }
}
