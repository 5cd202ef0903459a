//! Spectral stream: like the Tarot/Planet streams, but Soul substitution
//! applies to [`Source::SpectralPack`] instead of Arcana packs.
//!
//! Shares the persistent-stream-per-`(ante, source)` design described in
//! `tarot_planet.rs`.

use super::common::{bernoulli_trial, draw_with_pack_dedup};
use super::{Category, Item, ItemSet, Source};
use crate::rng::ResampleStream;

const SPECIAL_SUBSTITUTION_CHANCE: f64 = 0.003;

pub fn spectral_resample_key(source: Source, ante: u8) -> String {
    format!("Spectral{}{ante}", source.key_tag())
}

pub fn soul_key(source: Source, ante: u8) -> String {
    format!("soul{}{ante}", source.key_tag())
}

/// Draw one Spectral card for the current slot, stepping `resample` (and
/// `soul`, for [`Source::SpectralPack`]) once.
pub fn draw_spectral(
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

    let drawn = draw_with_pack_dedup(resample, pool_len, packs, Category::Spectral, live_mask);

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
    fn spectral_draw_stays_in_pool_or_is_soul() {
        let tables = ItemTables::builtin();
        let c = ctx(&tables);
        let mut packs: [ItemSet; 8] = Default::default();
        let mut resample = c.resample_stream(&spectral_resample_key(Source::SpectralPack, 2));
        let mut soul = c.resample_stream(&soul_key(Source::SpectralPack, 2));
        let items = draw_spectral(
            &mut resample,
            Some(&mut soul),
            tables.spectrals.len(),
            &mut packs,
            ALL_LANES,
        );
        for item in items {
            if item != Item::SOUL {
                assert!((item.index() as usize) < tables.spectrals.len());
            }
        }
    }

    #[test]
    fn shop_source_never_rolls_soul_substitution() {
        let tables = ItemTables::builtin();
        let c = ctx(&tables);
        let mut packs: [ItemSet; 8] = Default::default();
        let mut resample = c.resample_stream(&spectral_resample_key(Source::Shop, 4));
        let items = draw_spectral(&mut resample, None, tables.spectrals.len(), &mut packs, ALL_LANES);
        assert!(items.iter().all(|i| *i != Item::SOUL));
    }
}
