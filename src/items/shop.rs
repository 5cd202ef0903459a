//! Shop stream: the ante's shop slot sequence, interleaving
//! joker/tarot/planet/spectral/playing-card/voucher draws, with joker slots
//! additionally polling stake-gated stickers in place.

use super::joker::{draw_joker, JokerStreams};
use super::playing_card::draw_playing_card;
use super::spectral::{draw_spectral, spectral_resample_key};
use super::tarot_planet::{draw_planet, draw_tarot, planet_resample_key, tarot_resample_key};
use super::{Item, ItemSet, Source};
use crate::context::SearchContext;
use crate::deck_stake::Stake;
use crate::rng::ResampleStream;

/// Shop slots offered in the ante-1 shop.
pub const SHOP_SLOTS_ANTE_1: u8 = 15;
/// Shop slots offered in every other ante's shop.
pub const SHOP_SLOTS_DEFAULT: u8 = 50;

/// Upper bound on how many of each category a single ante's shop can need,
/// used by callers to pre-size per-lane pack/item buffers without having to
/// walk the whole shop first.
#[derive(Debug, Clone, Copy)]
pub struct MaxShopSlotsNeeded {
    pub jokers: u8,
    pub tarots: u8,
    pub planets: u8,
    pub spectrals: u8,
    pub playing_cards: u8,
    pub vouchers: u8,
}

pub const MAX_SHOP_SLOTS_NEEDED: MaxShopSlotsNeeded = MaxShopSlotsNeeded {
    jokers: 6,
    tarots: 8,
    planets: 8,
    spectrals: 8,
    playing_cards: 16,
    vouchers: 1,
};

pub fn shop_slot_count(ante: u8) -> u8 {
    if ante == 1 {
        SHOP_SLOTS_ANTE_1
    } else {
        SHOP_SLOTS_DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopSlotCategory {
    Joker,
    Tarot,
    Planet,
    Spectral,
    PlayingCard,
}

impl ShopSlotCategory {
    /// Weighted selection from a uniform roll. Category weights are
    /// stake-invariant; only the per-joker-slot sticker polls below depend
    /// on stake.
    fn from_roll(p: f64) -> Self {
        if p > 0.84 {
            ShopSlotCategory::PlayingCard
        } else if p > 0.72 {
            ShopSlotCategory::Spectral
        } else if p > 0.56 {
            ShopSlotCategory::Planet
        } else if p > 0.40 {
            ShopSlotCategory::Tarot
        } else {
            ShopSlotCategory::Joker
        }
    }
}

/// Which category the `slot`-th shop item belongs to, for this ante.
pub fn shop_slot_category(ctx: &SearchContext<'_>, ante: u8, slot: u8) -> [ShopSlotCategory; 8] {
    let mut stream = ctx.create_stream(&format!("shop{ante}_{slot}"));
    let roll = stream.random();
    std::array::from_fn(|lane| ShopSlotCategory::from_roll(roll[lane]))
}

/// The shop's own copy of the per-category streams an ante needs, shared
/// across every shop slot of that category.
pub struct ShopStreams {
    joker: JokerStreams,
    tarot: ResampleStream,
    planet: ResampleStream,
    spectral: ResampleStream,
}

impl ShopStreams {
    pub fn new(ctx: &SearchContext<'_>, ante: u8) -> Self {
        ShopStreams {
            joker: JokerStreams::new(ctx, ante, Source::Shop),
            tarot: ctx.resample_stream(&tarot_resample_key(Source::Shop, ante)),
            planet: ctx.resample_stream(&planet_resample_key(Source::Shop, ante)),
            spectral: ctx.resample_stream(&spectral_resample_key(Source::Shop, ante)),
        }
    }
}

/// Draw the `slot`-th shop item's contents, given its (already-drawn)
/// category. `packs` doubles as the "items already in the shop this ante"
/// set used for tarot/planet/spectral dedup, mirroring how a booster pack's
/// slots dedup against each other. The shop never rolls the Soul/Black-Hole
/// substitution, so `streams` never needs a substitution stream.
pub fn draw_shop_item(
    ctx: &SearchContext<'_>,
    ante: u8,
    slot: u8,
    stake: Stake,
    category: ShopSlotCategory,
    streams: &mut ShopStreams,
    packs: &mut [ItemSet; 8],
) -> [Item; 8] {
    let tables = ctx.tables;
    match category {
        ShopSlotCategory::Joker => draw_joker(
            &mut streams.joker,
            Source::Shop,
            stake,
            [
                tables.jokers.common.len(),
                tables.jokers.uncommon.len(),
                tables.jokers.rare.len(),
                tables.jokers.legendary.len(),
            ],
            false,
            true,
        ),
        ShopSlotCategory::Tarot => draw_tarot(
            &mut streams.tarot,
            None,
            tables.tarots.len(),
            packs,
            crate::rng::ALL_LANES,
        ),
        ShopSlotCategory::Planet => draw_planet(
            &mut streams.planet,
            None,
            tables.planets.len(),
            packs,
            crate::rng::ALL_LANES,
        ),
        ShopSlotCategory::Spectral => draw_spectral(
            &mut streams.spectral,
            None,
            tables.spectrals.len(),
            packs,
            crate::rng::ALL_LANES,
        ),
        ShopSlotCategory::PlayingCard => draw_playing_card(
            ctx,
            ante,
            slot,
            tables.ranks.len(),
            tables.suits.len(),
            tables.seals.len(),
            tables.enhancements.len(),
        ),
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
    fn ante_one_has_fifteen_slots() {
        assert_eq!(shop_slot_count(1), 15);
        assert_eq!(shop_slot_count(2), 50);
    }

    #[test]
    fn slot_category_is_deterministic() {
        let tables = ItemTables::builtin();
        let c1 = ctx(&tables);
        let c2 = ctx(&tables);
        let a = shop_slot_category(&c1, 1, 0);
        let b = shop_slot_category(&c2, 1, 0);
        assert_eq!(a, b);
    }

    #[test]
    fn joker_slot_produces_a_joker_category_item() {
        let tables = ItemTables::builtin();
        let c = ctx(&tables);
        let mut packs: [ItemSet; 8] = Default::default();
        let mut streams = ShopStreams::new(&c, 1);
        let items = draw_shop_item(
            &c,
            1,
            0,
            Stake::White,
            ShopSlotCategory::Joker,
            &mut streams,
            &mut packs,
        );
        for item in items {
            assert_eq!(item.category(), Some(crate::items::Category::Joker));
        }
    }

    #[test]
    fn consecutive_shop_slots_advance_the_shared_streams() {
        let tables = ItemTables::builtin();
        let c = ctx(&tables);
        let mut packs: [ItemSet; 8] = Default::default();
        let mut streams = ShopStreams::new(&c, 1);
        let first = draw_shop_item(
            &c,
            1,
            0,
            Stake::White,
            ShopSlotCategory::Joker,
            &mut streams,
            &mut packs,
        );
        let second = draw_shop_item(
            &c,
            1,
            1,
            Stake::White,
            ShopSlotCategory::Joker,
            &mut streams,
            &mut packs,
        );
        assert_ne!(first, second, "second shop slot must not replay the first slot's draw");
    }
}
