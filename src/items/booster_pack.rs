//! Booster-pack stream: how many packs the shop offers this ante, and
//! each pack's type/size. Per-slot contents (joker/tarot/planet/
//! spectral/playing-card draws) are produced by the matching item-stream
//! function once the pack's type and size are known.

use crate::context::SearchContext;

/// Packs offered in the ante-1 shop.
pub const PACKS_ANTE_1: u8 = 4;
/// Packs offered in every other ante's shop.
pub const PACKS_DEFAULT: u8 = 6;

pub fn pack_count_for_ante(ante: u8) -> u8 {
    if ante == 1 {
        PACKS_ANTE_1
    } else {
        PACKS_DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackType {
    Arcana,
    Celestial,
    Spectral,
    Buffoon,
    Standard,
}

impl PackType {
    /// Weighted selection from a uniform `[0, 1)` roll. Spectral packs are
    /// rarer than the other four, matching the real shop's distribution.
    fn from_roll(p: f64) -> Self {
        if p > 0.90 {
            PackType::Spectral
        } else if p > 0.725 {
            PackType::Buffoon
        } else if p > 0.55 {
            PackType::Celestial
        } else if p > 0.275 {
            PackType::Standard
        } else {
            PackType::Arcana
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackSize {
    Normal,
    Jumbo,
    Mega,
}

impl PackSize {
    fn from_roll(p: f64) -> Self {
        if p > 0.96 {
            PackSize::Mega
        } else if p > 0.60 {
            PackSize::Jumbo
        } else {
            PackSize::Normal
        }
    }

    /// Item slots in a pack of this size.
    pub fn slot_count(self) -> u8 {
        match self {
            PackSize::Normal => 2,
            PackSize::Jumbo => 4,
            PackSize::Mega => 4,
        }
    }

    /// How many of a pack's slots the player may keep.
    pub fn choose_count(self) -> u8 {
        match self {
            PackSize::Normal => 1,
            PackSize::Jumbo => 1,
            PackSize::Mega => 2,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PackOffer {
    pub kind: PackType,
    pub size: PackSize,
}

/// Draw the `slot`-th pack offered in `ante`'s shop.
pub fn draw_pack(ctx: &SearchContext<'_>, ante: u8, slot: u8) -> [PackOffer; 8] {
    let mut type_stream = ctx.create_stream(&format!("shop_pack{ante}_{slot}"));
    let mut size_stream = ctx.create_stream(&format!("shop_packsize{ante}_{slot}"));
    let type_roll = type_stream.random();
    let size_roll = size_stream.random();
    std::array::from_fn(|lane| PackOffer {
        kind: PackType::from_roll(type_roll[lane]),
        size: PackSize::from_roll(size_roll[lane]),
    })
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
    fn ante_one_offers_four_packs_others_offer_six() {
        assert_eq!(pack_count_for_ante(1), 4);
        assert_eq!(pack_count_for_ante(2), 6);
        assert_eq!(pack_count_for_ante(8), 6);
    }

    #[test]
    fn mega_pack_has_four_slots_and_two_choices() {
        assert_eq!(PackSize::Mega.slot_count(), 4);
        assert_eq!(PackSize::Mega.choose_count(), 2);
    }

    #[test]
    fn pack_draw_is_deterministic() {
        let tables = ItemTables::builtin();
        let c1 = ctx(&tables);
        let c2 = ctx(&tables);
        let a = draw_pack(&c1, 1, 0);
        let b = draw_pack(&c2, 1, 0);
        for lane in 0..8 {
            assert_eq!(a[lane].kind, b[lane].kind);
            assert_eq!(a[lane].size, b[lane].size);
        }
    }
}
