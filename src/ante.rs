//! Ante replay: walks one ante's full shop-slot and pack-slot sequence
//! using the persistent per-`(ante, source)` streams the C3 item-stream
//! modules require (see `items::joker`, `items::tarot_planet`), so a
//! single slot query doesn't have to re-derive every slot before it from
//! scratch and doesn't restart a shared stream partway through an ante.
//!
//! Pack-slot addressing is flattened across the ante's whole pack sequence:
//! slot 0 is the first item slot of the first pack, and the index keeps
//! increasing through every later pack in that ante, in pack order.

use crate::context::SearchContext;
use crate::deck_stake::Stake;
use crate::items::booster_pack::{draw_pack, pack_count_for_ante, PackOffer, PackType};
use crate::items::joker::{draw_joker, JokerStreams};
use crate::items::playing_card::draw_playing_card;
use crate::items::shop::{
    draw_shop_item, shop_slot_category, shop_slot_count, ShopSlotCategory, ShopStreams,
};
use crate::items::spectral::{draw_spectral, soul_key as spectral_soul_key, spectral_resample_key};
use crate::items::tarot_planet::{
    black_hole_key, draw_planet, draw_tarot, planet_resample_key, soul_key as tarot_soul_key,
    tarot_resample_key,
};
use crate::items::{Item, ItemSet, Source};
use crate::rng::ResampleStream;

/// One ante's persistent pack-source streams: every pack type this ante can
/// offer shares one stream set across the whole ante, built once via
/// [`PackStreams::new`] and stepped once per item slot.
pub struct PackStreams {
    arcana_tarot: ResampleStream,
    arcana_soul: ResampleStream,
    arcana_soul_joker: JokerStreams,
    celestial_planet: ResampleStream,
    celestial_black_hole: ResampleStream,
    spectral: ResampleStream,
    spectral_soul: ResampleStream,
    spectral_soul_joker: JokerStreams,
    buffoon_joker: JokerStreams,
}

impl PackStreams {
    pub fn new(ctx: &SearchContext<'_>, ante: u8) -> Self {
        PackStreams {
            arcana_tarot: ctx.resample_stream(&tarot_resample_key(Source::ArcanaPack, ante)),
            arcana_soul: ctx.resample_stream(&tarot_soul_key(Source::ArcanaPack, ante)),
            arcana_soul_joker: JokerStreams::new(ctx, ante, Source::ArcanaPack),
            celestial_planet: ctx.resample_stream(&planet_resample_key(Source::CelestialPack, ante)),
            celestial_black_hole: ctx.resample_stream(&black_hole_key(Source::CelestialPack, ante)),
            spectral: ctx.resample_stream(&spectral_resample_key(Source::SpectralPack, ante)),
            spectral_soul: ctx.resample_stream(&spectral_soul_key(Source::SpectralPack, ante)),
            spectral_soul_joker: JokerStreams::new(ctx, ante, Source::SpectralPack),
            buffoon_joker: JokerStreams::new(ctx, ante, Source::BuffoonPack),
        }
    }
}

/// All persistent streams one ante's full shop + pack replay needs.
pub struct AnteStreams {
    pub shop: ShopStreams,
    pub packs: PackStreams,
}

impl AnteStreams {
    pub fn new(ctx: &SearchContext<'_>, ante: u8) -> Self {
        AnteStreams {
            shop: ShopStreams::new(ctx, ante),
            packs: PackStreams::new(ctx, ante),
        }
    }
}

/// One shop slot's resolved contents, vectorized across lanes.
pub struct ShopSlotResult {
    pub category: [ShopSlotCategory; 8],
    pub items: [Item; 8],
}

const SHOP_CATEGORIES: [ShopSlotCategory; 5] = [
    ShopSlotCategory::Joker,
    ShopSlotCategory::Tarot,
    ShopSlotCategory::Planet,
    ShopSlotCategory::Spectral,
    ShopSlotCategory::PlayingCard,
];

/// Replay `ante`'s shop slots `0..shop_slot_count(ante)` in order, calling
/// `visit` with each slot's resolved category and items. Stops early once
/// `visit` returns `false`; every earlier slot still pays for its RNG draws
/// since its shop stream has no per-slot key component to skip ahead with.
///
/// Mixed per-lane categories (two lanes landing on different categories for
/// the same slot index) are drawn once per distinct category actually
/// present this slot across all 8 lanes, then selected per lane — the same
/// pattern `items::joker` uses for mixed rarities.
pub fn replay_shop_slots(
    ctx: &SearchContext<'_>,
    ante: u8,
    stake: Stake,
    streams: &mut ShopStreams,
    mut visit: impl FnMut(u8, ShopSlotResult) -> bool,
) {
    let mut packs: [ItemSet; 8] = Default::default();
    for slot in 0..shop_slot_count(ante) {
        let category = shop_slot_category(ctx, ante, slot);
        let mut items = [Item::EXCLUDED; 8];
        for cat in SHOP_CATEGORIES {
            if !category.contains(&cat) {
                continue;
            }
            let drawn = draw_shop_item(ctx, ante, slot, stake, cat, streams, &mut packs);
            for lane in 0..8 {
                if category[lane] == cat {
                    items[lane] = drawn[lane];
                }
            }
        }
        if !visit(slot, ShopSlotResult { category, items }) {
            break;
        }
    }
}

/// One flattened pack-item slot's resolved contents.
pub struct PackSlotResult {
    pub pack_index: u8,
    pub pack: [PackOffer; 8],
    /// The item a lane ends up with: the normal category draw, or (when the
    /// Soul/Black-Hole trial hit) the substitution — with Soul further
    /// resolved into the joker it actually produced, since that's what a
    /// `SoulJoker` clause targets.
    pub item: [Item; 8],
    /// Whether `item[lane]` came from a Soul substitution rather than the
    /// pack's normal category draw, for `SoulJoker`-vs-`Joker` clause
    /// disambiguation (both produce `Category::Joker` items).
    pub soul_triggered: [bool; 8],
}

fn mask_for(offer: &[PackOffer; 8], item_slot: u8, kind: PackType) -> u8 {
    let mut mask = 0u8;
    for lane in 0..8 {
        if item_slot < offer[lane].size.slot_count() && offer[lane].kind == kind {
            mask |= 1 << lane;
        }
    }
    mask
}

/// Replay every item slot across every pack `ante` offers, in pack order
/// then item-slot order within each pack, calling `visit` with a flat
/// 0-based slot index that keeps increasing across pack boundaries. Stops
/// early once `visit` returns `false`.
pub fn replay_pack_slots(
    ctx: &SearchContext<'_>,
    ante: u8,
    stake: Stake,
    streams: &mut PackStreams,
    mut visit: impl FnMut(u8, PackSlotResult) -> bool,
) {
    let tables = ctx.tables;
    let mut packs: [ItemSet; 8] = Default::default();
    let mut global_slot: u8 = 0;

    'packs: for pack_index in 0..pack_count_for_ante(ante) {
        let offer = draw_pack(ctx, ante, pack_index);
        let slot_count = offer.iter().map(|o| o.size.slot_count()).max().unwrap_or(0);

        for item_slot in 0..slot_count {
            let mut item = [Item::EXCLUDED; 8];
            let mut soul_triggered = [false; 8];

            let arcana_mask = mask_for(&offer, item_slot, PackType::Arcana);
            if arcana_mask != 0 {
                let drawn = draw_tarot(
                    &mut streams.arcana_tarot,
                    Some(&mut streams.arcana_soul),
                    tables.tarots.len(),
                    &mut packs,
                    arcana_mask,
                );
                let mut soul_mask = 0u8;
                for lane in 0..8 {
                    if arcana_mask & (1 << lane) == 0 {
                        continue;
                    }
                    if drawn[lane] == Item::SOUL {
                        soul_mask |= 1 << lane;
                    } else {
                        item[lane] = drawn[lane];
                    }
                }
                if soul_mask != 0 {
                    let legendary = tables.jokers.legendary.len();
                    let soul_joker = draw_joker(
                        &mut streams.arcana_soul_joker,
                        Source::ArcanaPack,
                        stake,
                        [
                            tables.jokers.common.len(),
                            tables.jokers.uncommon.len(),
                            tables.jokers.rare.len(),
                            legendary,
                        ],
                        true,
                        false,
                    );
                    for lane in 0..8 {
                        if soul_mask & (1 << lane) != 0 {
                            item[lane] = soul_joker[lane];
                            soul_triggered[lane] = true;
                        }
                    }
                }
            }

            let celestial_mask = mask_for(&offer, item_slot, PackType::Celestial);
            if celestial_mask != 0 {
                let drawn = draw_planet(
                    &mut streams.celestial_planet,
                    Some(&mut streams.celestial_black_hole),
                    tables.planets.len(),
                    &mut packs,
                    celestial_mask,
                );
                for lane in 0..8 {
                    if celestial_mask & (1 << lane) != 0 {
                        item[lane] = drawn[lane];
                    }
                }
            }

            let spectral_mask = mask_for(&offer, item_slot, PackType::Spectral);
            if spectral_mask != 0 {
                let drawn = draw_spectral(
                    &mut streams.spectral,
                    Some(&mut streams.spectral_soul),
                    tables.spectrals.len(),
                    &mut packs,
                    spectral_mask,
                );
                let mut soul_mask = 0u8;
                for lane in 0..8 {
                    if spectral_mask & (1 << lane) == 0 {
                        continue;
                    }
                    if drawn[lane] == Item::SOUL {
                        soul_mask |= 1 << lane;
                    } else {
                        item[lane] = drawn[lane];
                    }
                }
                if soul_mask != 0 {
                    let legendary = tables.jokers.legendary.len();
                    let soul_joker = draw_joker(
                        &mut streams.spectral_soul_joker,
                        Source::SpectralPack,
                        stake,
                        [
                            tables.jokers.common.len(),
                            tables.jokers.uncommon.len(),
                            tables.jokers.rare.len(),
                            legendary,
                        ],
                        true,
                        false,
                    );
                    for lane in 0..8 {
                        if soul_mask & (1 << lane) != 0 {
                            item[lane] = soul_joker[lane];
                            soul_triggered[lane] = true;
                        }
                    }
                }
            }

            let buffoon_mask = mask_for(&offer, item_slot, PackType::Buffoon);
            if buffoon_mask != 0 {
                let drawn = draw_joker(
                    &mut streams.buffoon_joker,
                    Source::BuffoonPack,
                    stake,
                    [
                        tables.jokers.common.len(),
                        tables.jokers.uncommon.len(),
                        tables.jokers.rare.len(),
                        tables.jokers.legendary.len(),
                    ],
                    false,
                    true,
                );
                for lane in 0..8 {
                    if buffoon_mask & (1 << lane) != 0 {
                        item[lane] = drawn[lane];
                    }
                }
            }

            let standard_mask = mask_for(&offer, item_slot, PackType::Standard);
            if standard_mask != 0 {
                let drawn = draw_playing_card(
                    ctx,
                    ante,
                    global_slot,
                    tables.ranks.len(),
                    tables.suits.len(),
                    tables.seals.len(),
                    tables.enhancements.len(),
                );
                for lane in 0..8 {
                    if standard_mask & (1 << lane) != 0 {
                        item[lane] = drawn[lane];
                    }
                }
            }

            let keep_going = visit(
                global_slot,
                PackSlotResult { pack_index, pack: offer, item, soul_triggered },
            );
            global_slot = global_slot.saturating_add(1);
            if !keep_going {
                break 'packs;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Seed;
    use crate::tables::ItemTables;

    fn ctx(tables: &ItemTables) -> SearchContext<'_> {
        let seeds: [Seed; 8] =
            std::array::from_fn(|i| Seed::new(format!("ALEE{}", (b'1' + i as u8) as char)).unwrap());
        SearchContext::new(seeds, tables)
    }

    #[test]
    fn shop_replay_visits_every_slot_in_order() {
        let tables = ItemTables::builtin();
        let c = ctx(&tables);
        let mut streams = ShopStreams::new(&c, 1);
        let mut seen = Vec::new();
        replay_shop_slots(&c, 1, Stake::White, &mut streams, |slot, _| {
            seen.push(slot);
            true
        });
        assert_eq!(seen, (0..shop_slot_count(1)).collect::<Vec<_>>());
    }

    #[test]
    fn shop_replay_stops_early_when_visit_returns_false() {
        let tables = ItemTables::builtin();
        let c = ctx(&tables);
        let mut streams = ShopStreams::new(&c, 1);
        let mut count = 0;
        replay_shop_slots(&c, 1, Stake::White, &mut streams, |_, _| {
            count += 1;
            count < 3
        });
        assert_eq!(count, 3);
    }

    #[test]
    fn pack_replay_assigns_strictly_increasing_flat_slot_indices() {
        let tables = ItemTables::builtin();
        let c = ctx(&tables);
        let mut streams = PackStreams::new(&c, 1);
        let mut seen = Vec::new();
        replay_pack_slots(&c, 1, Stake::White, &mut streams, |slot, _| {
            seen.push(slot);
            true
        });
        for window in seen.windows(2) {
            assert!(window[1] > window[0]);
        }
        assert!(!seen.is_empty());
    }

    #[test]
    fn replaying_the_same_ante_twice_from_fresh_streams_agrees() {
        let tables = ItemTables::builtin();
        let c1 = ctx(&tables);
        let c2 = ctx(&tables);
        let mut s1 = PackStreams::new(&c1, 2);
        let mut s2 = PackStreams::new(&c2, 2);
        let mut a = Vec::new();
        let mut b = Vec::new();
        replay_pack_slots(&c1, 2, Stake::White, &mut s1, |_, r| {
            a.push(r.item);
            true
        });
        replay_pack_slots(&c2, 2, Stake::White, &mut s2, |_, r| {
            b.push(r.item);
            true
        });
        assert_eq!(a, b);
    }
}
