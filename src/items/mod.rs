//! Item Streams — typed producers for each game category, and the `Item`
//! value they all produce.

pub mod booster_pack;
pub mod boss;
pub mod common;
pub mod joker;
pub mod playing_card;
pub mod shop;
pub mod spectral;
pub mod tag;
pub mod tarot_planet;
pub mod voucher;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// The category an [`Item`] belongs to. Fits in 4 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Category {
    Joker = 0,
    Tarot = 1,
    Planet = 2,
    Spectral = 3,
    PlayingCard = 4,
    Voucher = 5,
    Tag = 6,
    Booster = 7,
    Boss = 8,
    Special = 9,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Joker,
        Category::Tarot,
        Category::Planet,
        Category::Spectral,
        Category::PlayingCard,
        Category::Voucher,
        Category::Tag,
        Category::Booster,
        Category::Boss,
        Category::Special,
    ];
}

/// A joker/card edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Edition {
    None = 0,
    Foil = 1,
    Holographic = 2,
    Polychrome = 3,
    Negative = 4,
}

/// A playing-card enhancement (e.g. Bonus, Mult, Glass, Steel, Stone...).
/// The concrete enum values are data; this is the shape the joker/
/// playing-card streams write into an [`Item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enhancement(pub u8);

impl Enhancement {
    pub const NONE: Enhancement = Enhancement(0);
}

/// A playing-card seal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seal(pub u8);

impl Seal {
    pub const NONE: Seal = Seal(0);
}

bitflags! {
    /// Stake-gated stickers. Polled in a fixed order regardless of outcome.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Stickers: u8 {
        const ETERNAL = 0b001;
        const PERISHABLE = 0b010;
        const RENTAL = 0b100;
    }
}

/// Where in the ante an item-generation draw originates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Shop,
    ArcanaPack,
    CelestialPack,
    SpectralPack,
    BuffoonPack,
    StandardPack,
}

impl Source {
    /// The short tag mixed into PRNG keys.
    pub fn key_tag(self) -> &'static str {
        match self {
            Source::Shop => "sho",
            Source::ArcanaPack => "ar1",
            Source::CelestialPack => "pl1",
            Source::SpectralPack => "spe",
            Source::BuffoonPack => "buf",
            Source::StandardPack => "sta",
        }
    }
}

const CAT_BITS: u32 = 4;
const IDX_BITS: u32 = 12;
const EDI_BITS: u32 = 3;
const ENH_BITS: u32 = 5;
const SEAL_BITS: u32 = 3;
const STK_BITS: u32 = 3;

const CAT_SHIFT: u32 = 0;
const IDX_SHIFT: u32 = CAT_SHIFT + CAT_BITS;
const EDI_SHIFT: u32 = IDX_SHIFT + IDX_BITS;
const ENH_SHIFT: u32 = EDI_SHIFT + EDI_BITS;
const SEAL_SHIFT: u32 = ENH_SHIFT + ENH_BITS;
const STK_SHIFT: u32 = SEAL_SHIFT + SEAL_BITS;

fn mask(bits: u32) -> u32 {
    (1u32 << bits) - 1
}

/// A 32-bit tagged value: category + within-category index + packed
/// modifiers. Bit layout is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item(pub u32);

impl Item {
    /// Sentinel: this lane's stream produced nothing (exhausted / excluded).
    pub const EXCLUDED: Item = Item(u32::MAX);

    /// Sentinel: the Soul card (spectral category, special substitution).
    pub const SOUL: Item = Item(u32::MAX - 1);

    /// Sentinel: the Black Hole card (planet category, special substitution).
    pub const BLACK_HOLE: Item = Item(u32::MAX - 2);

    pub fn new(category: Category, index: u16) -> Self {
        Item(((category as u32) << CAT_SHIFT) | ((index as u32 & mask(IDX_BITS)) << IDX_SHIFT))
    }

    pub fn is_sentinel(self) -> bool {
        matches!(self, Item::EXCLUDED | Item::SOUL | Item::BLACK_HOLE)
    }

    pub fn category(self) -> Option<Category> {
        if self.is_sentinel() {
            return None;
        }
        let raw = (self.0 >> CAT_SHIFT) & mask(CAT_BITS);
        Some(match raw {
            0 => Category::Joker,
            1 => Category::Tarot,
            2 => Category::Planet,
            3 => Category::Spectral,
            4 => Category::PlayingCard,
            5 => Category::Voucher,
            6 => Category::Tag,
            7 => Category::Booster,
            8 => Category::Boss,
            _ => Category::Special,
        })
    }

    pub fn index(self) -> u16 {
        ((self.0 >> IDX_SHIFT) & mask(IDX_BITS)) as u16
    }

    pub fn with_edition(self, edition: Edition) -> Self {
        let cleared = self.0 & !(mask(EDI_BITS) << EDI_SHIFT);
        Item(cleared | ((edition as u32) << EDI_SHIFT))
    }

    pub fn edition(self) -> Edition {
        match (self.0 >> EDI_SHIFT) & mask(EDI_BITS) {
            1 => Edition::Foil,
            2 => Edition::Holographic,
            3 => Edition::Polychrome,
            4 => Edition::Negative,
            _ => Edition::None,
        }
    }

    pub fn with_enhancement(self, enhancement: Enhancement) -> Self {
        let cleared = self.0 & !(mask(ENH_BITS) << ENH_SHIFT);
        Item(cleared | ((enhancement.0 as u32 & mask(ENH_BITS)) << ENH_SHIFT))
    }

    pub fn enhancement(self) -> Enhancement {
        Enhancement(((self.0 >> ENH_SHIFT) & mask(ENH_BITS)) as u8)
    }

    pub fn with_seal(self, seal: Seal) -> Self {
        let cleared = self.0 & !(mask(SEAL_BITS) << SEAL_SHIFT);
        Item(cleared | ((seal.0 as u32 & mask(SEAL_BITS)) << SEAL_SHIFT))
    }

    pub fn seal(self) -> Seal {
        Seal(((self.0 >> SEAL_SHIFT) & mask(SEAL_BITS)) as u8)
    }

    pub fn with_stickers(self, stickers: Stickers) -> Self {
        let cleared = self.0 & !(mask(STK_BITS) << STK_SHIFT);
        Item(cleared | ((stickers.bits() as u32 & mask(STK_BITS)) << STK_SHIFT))
    }

    pub fn stickers(self) -> Stickers {
        Stickers::from_bits_truncate(((self.0 >> STK_SHIFT) & mask(STK_BITS)) as u8)
    }
}

/// A fixed-capacity ordered list of items used for in-pack deduplication.
/// Capacity 8 matches the largest pack size.
#[derive(Debug, Clone, Default)]
pub struct ItemSet {
    items: Vec<Item>,
}

pub const ITEM_SET_CAPACITY: usize = 8;

impl ItemSet {
    pub fn new() -> Self {
        ItemSet {
            items: Vec::with_capacity(ITEM_SET_CAPACITY),
        }
    }

    pub fn contains(&self, item: Item) -> bool {
        self.items.contains(&item)
    }

    pub fn push(&mut self, item: Item) {
        debug_assert!(self.items.len() < ITEM_SET_CAPACITY, "pack overflowed its item set");
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_category_and_index() {
        let item = Item::new(Category::Joker, 42);
        assert_eq!(item.category(), Some(Category::Joker));
        assert_eq!(item.index(), 42);
    }

    #[test]
    fn edition_and_modifiers_independent_of_base_fields() {
        let item = Item::new(Category::PlayingCard, 7)
            .with_edition(Edition::Polychrome)
            .with_enhancement(Enhancement(3))
            .with_seal(Seal(2))
            .with_stickers(Stickers::ETERNAL | Stickers::RENTAL);

        assert_eq!(item.category(), Some(Category::PlayingCard));
        assert_eq!(item.index(), 7);
        assert_eq!(item.edition(), Edition::Polychrome);
        assert_eq!(item.enhancement(), Enhancement(3));
        assert_eq!(item.seal(), Seal(2));
        assert!(item.stickers().contains(Stickers::ETERNAL));
        assert!(item.stickers().contains(Stickers::RENTAL));
        assert!(!item.stickers().contains(Stickers::PERISHABLE));
    }

    #[test]
    fn sentinels_report_no_category() {
        assert_eq!(Item::EXCLUDED.category(), None);
        assert_eq!(Item::SOUL.category(), None);
        assert_eq!(Item::BLACK_HOLE.category(), None);
        assert_ne!(Item::SOUL, Item::BLACK_HOLE);
    }

    #[test]
    fn item_set_dedup_query() {
        let mut set = ItemSet::new();
        let a = Item::new(Category::Tarot, 1);
        let b = Item::new(Category::Tarot, 2);
        set.push(a);
        assert!(set.contains(a));
        assert!(!set.contains(b));
        assert_eq!(set.len(), 1);
    }
}
