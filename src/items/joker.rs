//! Joker stream: rarity poll -> index draw -> edition poll -> stickers.
//!
//! All of an ante's joker slots for a given `Source` share one set of
//! streams, so [`JokerStreams`] is built once per `(ante, source)` and
//! stepped once per slot; building a fresh stream per slot would silently
//! replay the same draw for every slot.

use super::{Edition, Item, Stickers};
use crate::context::SearchContext;
use crate::deck_stake::Stake;
use crate::items::{Category, Source};
use crate::rng::PrngStream;
use crate::tables::JokerRarity;

/// Edition-roll thresholds for a single source context. Booster packs roll
/// editions noticeably more often than the shop, and a soul-channel
/// legendary draw more often still.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditionThresholds {
    pub negative: f64,
    pub polychrome: f64,
    pub holographic: f64,
    pub foil: f64,
}

impl EditionThresholds {
    pub const SHOP: EditionThresholds = EditionThresholds {
        negative: 0.997,
        polychrome: 0.994,
        holographic: 0.98,
        foil: 0.96,
    };

    pub const PACK: EditionThresholds = EditionThresholds {
        negative: 0.99,
        polychrome: 0.98,
        holographic: 0.96,
        foil: 0.92,
    };

    pub const SOUL: EditionThresholds = EditionThresholds {
        negative: 0.97,
        polychrome: 0.94,
        holographic: 0.88,
        foil: 0.8,
    };

    pub const fn custom(negative: f64, polychrome: f64, holographic: f64, foil: f64) -> Self {
        EditionThresholds {
            negative,
            polychrome,
            holographic,
            foil,
        }
    }

    /// Booster-pack sources share one table; the shop has its own, tighter
    /// one. Soul-channel draws go through [`EditionThresholds::SOUL`]
    /// instead, selected by the caller before this is reached.
    pub fn for_source(source: Source) -> Self {
        match source {
            Source::Shop => Self::SHOP,
            Source::ArcanaPack
            | Source::CelestialPack
            | Source::SpectralPack
            | Source::BuffoonPack
            | Source::StandardPack => Self::PACK,
        }
    }

    fn resolve(self, p: f64) -> Edition {
        if p > self.negative {
            Edition::Negative
        } else if p > self.polychrome {
            Edition::Polychrome
        } else if p > self.holographic {
            Edition::Holographic
        } else if p > self.foil {
            Edition::Foil
        } else {
            Edition::None
        }
    }
}

fn rarity_from_poll(p: f64) -> JokerRarity {
    if p > 0.95 {
        JokerRarity::Rare
    } else if p > 0.7 {
        JokerRarity::Uncommon
    } else {
        JokerRarity::Common
    }
}

fn rarity_stream_tag(rarity: JokerRarity) -> &'static str {
    match rarity {
        JokerRarity::Common => "Joker1",
        JokerRarity::Uncommon => "Joker2",
        JokerRarity::Rare => "Joker3",
        JokerRarity::Legendary => "Joker4",
    }
}

fn rarity_item_category_index(rarity: JokerRarity) -> usize {
    match rarity {
        JokerRarity::Common => 0,
        JokerRarity::Uncommon => 1,
        JokerRarity::Rare => 2,
        JokerRarity::Legendary => 3,
    }
}

const RARITY_ORDER: [JokerRarity; 4] = [
    JokerRarity::Common,
    JokerRarity::Uncommon,
    JokerRarity::Rare,
    JokerRarity::Legendary,
];

/// The full set of keyed streams a `(ante, source)` pair needs to draw any
/// number of joker slots that ante. Built once, stepped once per slot.
pub struct JokerStreams {
    rarity: PrngStream,
    index: [PrngStream; 4],
    edition: PrngStream,
    eternal: PrngStream,
    perishable: PrngStream,
    rental: PrngStream,
}

impl JokerStreams {
    pub fn new(ctx: &SearchContext<'_>, ante: u8, source: Source) -> Self {
        let tag = source.key_tag();
        let index = std::array::from_fn(|i| {
            ctx.create_stream(&format!("{}{tag}{ante}", rarity_stream_tag(RARITY_ORDER[i])))
        });
        JokerStreams {
            rarity: ctx.create_stream(&format!("rarity{tag}{ante}")),
            index,
            edition: ctx.create_stream(&format!("edi{tag}{ante}")),
            eternal: ctx.create_stream(&format!("stake_shop_joker_eternal{ante}")),
            perishable: ctx.create_stream(&format!("ssjp{ante}")),
            rental: ctx.create_stream(&format!("ssjr{ante}")),
        }
    }

    /// Poll the three stake-gated stickers in their fixed order (eternal,
    /// perishable, rental) regardless of whether the stake allows them to
    /// take effect — the polls themselves are load-bearing for stream state
    /// even when their result is discarded.
    fn poll_stickers(&mut self, stake: Stake) -> [Stickers; 8] {
        let eternal_roll = self.eternal.random();
        let perishable_roll = self.perishable.random();
        let rental_roll = self.rental.random();

        std::array::from_fn(|lane| {
            let mut stickers = Stickers::empty();
            if stake.allows_eternal() && eternal_roll[lane] > 0.7 {
                stickers |= Stickers::ETERNAL;
            }
            if stake.allows_perishable() && perishable_roll[lane] > 0.7 {
                stickers |= Stickers::PERISHABLE;
            }
            if stake.allows_rental() && rental_roll[lane] > 0.7 {
                stickers |= Stickers::RENTAL;
            }
            stickers
        })
    }
}

/// Draw one joker per lane, stepping `streams` once. `soul_channel = true`
/// skips the rarity poll and draws straight from the `"Joker4"` legendary
/// pool — soul-channel jokers bypass rarity.
pub fn draw_joker(
    streams: &mut JokerStreams,
    source: Source,
    stake: Stake,
    pool_sizes: [usize; 4],
    soul_channel: bool,
    with_stickers: bool,
) -> [Item; 8] {
    let rarities: [JokerRarity; 8] = if soul_channel {
        [JokerRarity::Legendary; 8]
    } else {
        let p = streams.rarity.random();
        std::array::from_fn(|lane| rarity_from_poll(p[lane]))
    };

    let thresholds = if soul_channel { EditionThresholds::SOUL } else { EditionThresholds::for_source(source) };
    let edition_roll = streams.edition.random();

    // Stickers are polled unconditionally before we finish building the
    // item, per the fixed-order rule, even when `with_stickers` is false
    // for this slot's category.
    let stickers = if with_stickers {
        Some(streams.poll_stickers(stake))
    } else {
        None
    };

    // One index draw per distinct rarity actually present this step. In the
    // common case all 8 lanes share a rarity (soul channel, or a batch with
    // tight BatchCharCount); mixed rarities each step their own persistent
    // index stream.
    let mut index_by_rarity: [Option<[i64; 8]>; 4] = [None, None, None, None];
    for (slot, rarity) in RARITY_ORDER.into_iter().enumerate() {
        if rarities.contains(&rarity) {
            let n = pool_sizes[rarity_item_category_index(rarity)].max(1) as i64;
            index_by_rarity[slot] = Some(streams.index[slot].random_int(0, n));
        }
    }

    std::array::from_fn(|lane| {
        let rarity = rarities[lane];
        let slot = rarity_item_category_index(rarity);
        let idx = index_by_rarity[slot].unwrap()[lane];
        let mut item =
            Item::new(Category::Joker, idx as u16).with_edition(thresholds.resolve(edition_roll[lane]));
        if let Some(s) = stickers {
            item = item.with_stickers(s[lane]);
        }
        item
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Seed;
    use crate::tables::ItemTables;

    fn ctx(tables: &ItemTables) -> SearchContext<'_> {
        let seeds: [Seed; 8] = std::array::from_fn(|i| {
            Seed::new(format!("ALEE{}", (b'1' + i as u8) as char)).unwrap()
        });
        SearchContext::new(seeds, tables)
    }

    #[test]
    fn deterministic_across_identical_contexts() {
        let tables = ItemTables::builtin();
        let c1 = ctx(&tables);
        let c2 = ctx(&tables);
        let mut s1 = JokerStreams::new(&c1, 2, Source::Shop);
        let mut s2 = JokerStreams::new(&c2, 2, Source::Shop);
        let a = draw_joker(&mut s1, Source::Shop, Stake::White, [10, 10, 10, 5], false, true);
        let b = draw_joker(&mut s2, Source::Shop, Stake::White, [10, 10, 10, 5], false, true);
        assert_eq!(a, b);
    }

    #[test]
    fn consecutive_slots_advance_the_shared_stream() {
        let tables = ItemTables::builtin();
        let c = ctx(&tables);
        let mut streams = JokerStreams::new(&c, 2, Source::Shop);
        let first = draw_joker(&mut streams, Source::Shop, Stake::White, [10, 10, 10, 5], false, true);
        let second = draw_joker(&mut streams, Source::Shop, Stake::White, [10, 10, 10, 5], false, true);
        assert_ne!(first, second, "second shop slot must not replay the first slot's draw");
    }

    #[test]
    fn soul_channel_always_draws_legendary_pool() {
        let tables = ItemTables::builtin();
        let c = ctx(&tables);
        let legendary_count = tables.jokers.legendary.len();
        let mut streams = JokerStreams::new(&c, 1, Source::ArcanaPack);
        let items = draw_joker(
            &mut streams,
            Source::ArcanaPack,
            Stake::White,
            [10, 10, 10, legendary_count],
            true,
            false,
        );
        for item in items {
            assert!((item.index() as usize) < legendary_count);
        }
    }

    #[test]
    fn shop_source_uses_the_shop_threshold_table() {
        assert_eq!(EditionThresholds::for_source(Source::Shop), EditionThresholds::SHOP);
    }

    #[test]
    fn pack_sources_all_use_the_pack_threshold_table() {
        for source in [
            Source::ArcanaPack,
            Source::CelestialPack,
            Source::SpectralPack,
            Source::BuffoonPack,
            Source::StandardPack,
        ] {
            assert_eq!(EditionThresholds::for_source(source), EditionThresholds::PACK);
        }
    }

    #[test]
    fn soul_and_pack_threshold_tables_are_distinct() {
        // draw_joker selects EditionThresholds::SOUL for soul_channel draws
        // instead of EditionThresholds::for_source, regardless of source.
        assert_ne!(EditionThresholds::SOUL, EditionThresholds::for_source(Source::ArcanaPack));
        assert_ne!(EditionThresholds::SOUL, EditionThresholds::SHOP);
    }

    #[test]
    fn a_roll_that_would_be_foil_in_the_shop_can_resolve_higher_in_the_soul_table() {
        // 0.9 clears the shop's foil bar (0.96 is the only higher one it
        // beats) but, under the more generous soul table, also clears
        // holographic (0.88) — same roll, different outcome by table.
        assert_eq!(EditionThresholds::SHOP.resolve(0.9), Edition::None);
        assert_eq!(EditionThresholds::SOUL.resolve(0.9), Edition::Holographic);
    }

    #[test]
    fn white_stake_never_sets_stickers() {
        let tables = ItemTables::builtin();
        let c = ctx(&tables);
        let mut streams = JokerStreams::new(&c, 3, Source::Shop);
        let items = draw_joker(&mut streams, Source::Shop, Stake::White, [10, 10, 10, 5], false, true);
        for item in items {
            assert!(item.stickers().is_empty());
        }
    }
}
