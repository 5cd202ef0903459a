//! Shapes for the per-item game tables.
//!
//! Per-item game tables (the concrete enumerations of jokers/tarots/
//! planets/etc. and their rarity weights) are taken as data inputs; this
//! module defines the *shapes* they plug into, not their values. The shapes
//! are plain `serde`-deserializable structs, with a small built-in default
//! sufficient to exercise the item streams and the testable properties,
//! following a data shape plus a bundled default.

use serde::{Deserialize, Serialize};

/// Jokers bucketed by rarity, mirroring its three-tier rarity poll plus the
/// separate soul-channel pool (`"Joker4"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JokerTable {
    pub common: Vec<String>,
    pub uncommon: Vec<String>,
    pub rare: Vec<String>,
    /// Legendary / soul jokers, drawn only via the soul-channel substitution.
    pub legendary: Vec<String>,
}

impl JokerTable {
    pub fn pool(&self, rarity: JokerRarity) -> &[String] {
        match rarity {
            JokerRarity::Common => &self.common,
            JokerRarity::Uncommon => &self.uncommon,
            JokerRarity::Rare => &self.rare,
            JokerRarity::Legendary => &self.legendary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JokerRarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ItemTables {
    pub jokers: JokerTable,
    pub tarots: Vec<String>,
    pub planets: Vec<String>,
    pub spectrals: Vec<String>,
    pub vouchers: Vec<String>,
    pub small_blind_tags: Vec<String>,
    pub big_blind_tags: Vec<String>,
    pub bosses: Vec<String>,
    pub ranks: Vec<String>,
    pub suits: Vec<String>,
    pub enhancements: Vec<String>,
    pub seals: Vec<String>,
}

impl Default for JokerTable {
    fn default() -> Self {
        JokerTable {
            common: strs(&[
                "Joker", "Greedy Joker", "Lusty Joker", "Wrathful Joker", "Gluttonous Joker",
                "Jolly Joker", "Zany Joker", "Mad Joker", "Crazy Joker", "Droll Joker",
            ]),
            uncommon: strs(&[
                "Blueprint", "Misprint", "Sixth Sense", "Constellation", "Hiker", "Faceless Joker",
                "Green Joker", "Satellite", "Cavendish", "Card Sharp",
            ]),
            rare: strs(&[
                "Brainstorm", "DNA", "Baron", "Obelisk", "Hologram", "Vampire", "Acrobat",
                "Throwback", "Invisible Joker", "Seance",
            ]),
            legendary: strs(&["Canio", "Chicot", "Triboulet", "Yorick", "Perkeo"]),
        }
    }
}

impl ItemTables {
    /// Crate-bundled default, populated with enough real category members to
    /// exercise the golden-vector and regression tests against
    /// self-consistent data; production tables are injected by the caller.
    pub fn builtin() -> Self {
        ItemTables {
            jokers: JokerTable::default(),
            tarots: strs(&[
                "The Fool", "The Magician", "The High Priestess", "The Empress", "The Emperor",
                "The Hierophant", "The Lovers", "The Chariot", "Justice", "The Hermit",
                "The Wheel of Fortune", "Strength", "The Hanged Man", "Death", "Temperance",
                "The Devil", "The Tower", "The Star", "The Moon", "The Sun", "Judgement",
                "The World",
            ]),
            planets: strs(&[
                "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune",
                "Pluto", "Planet X", "Ceres", "Eris",
            ]),
            spectrals: strs(&[
                "Familiar", "Grim", "Incantation", "Talisman", "Aura", "Wraith", "Sigil", "Ouija",
                "Ectoplasm", "Immolate", "Ankh", "Deja Vu", "Hex", "Trance", "Medium", "Cryptid",
            ]),
            vouchers: strs(&[
                "Overstock", "Clearance Sale", "Hone", "Reroll Surplus", "Crystal Ball",
                "Telescope", "Grabber", "Wasteful", "Tarot Merchant", "Planet Merchant",
                "Seed Money", "Blank", "Magic Trick", "Hieroglyph", "Director's Cut",
                "Paint Brush",
            ]),
            small_blind_tags: strs(&[
                "Uncommon Tag", "Rare Tag", "Negative Tag", "Foil Tag", "Holographic Tag",
                "Polychrome Tag",
            ]),
            big_blind_tags: strs(&[
                "Investment Tag", "Voucher Tag", "Boss Tag", "Standard Tag", "Charm Tag",
                "Meteor Tag",
            ]),
            bosses: strs(&[
                "The Hook", "The Ox", "The House", "The Wall", "The Wheel", "The Arm",
                "The Club", "The Fish", "The Psychic", "The Goad", "The Water", "The Window",
                "The Manacle", "The Eye", "The Mouth", "The Plant", "The Serpent", "The Pillar",
                "The Needle", "The Head", "The Tooth", "The Flint", "The Mark",
            ]),
            ranks: strs(&[
                "2", "3", "4", "5", "6", "7", "8", "9", "10", "Jack", "Queen", "King", "Ace",
            ]),
            suits: strs(&["Spades", "Hearts", "Clubs", "Diamonds"]),
            enhancements: strs(&[
                "Bonus", "Mult", "Wild", "Glass", "Steel", "Stone", "Gold", "Lucky",
            ]),
            seals: strs(&["Gold", "Red", "Blue", "Purple"]),
        }
    }
}

fn strs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_has_nonempty_pools() {
        let t = ItemTables::builtin();
        assert!(!t.jokers.common.is_empty());
        assert!(!t.jokers.legendary.is_empty());
        assert!(!t.tarots.is_empty());
        assert!(!t.vouchers.is_empty());
    }
}
