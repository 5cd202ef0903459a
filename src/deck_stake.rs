//! `Deck` and `Stake` enums: names are parsed case-insensitively.

use crate::errors::{ConfigError, MotelyError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Deck {
    Red,
    Blue,
    Yellow,
    Green,
    Black,
    Magic,
    Nebula,
    Ghost,
    Abandoned,
    Checkered,
    Zodiac,
    Painted,
    Anaglyph,
    Plasma,
    Erratic,
}

impl std::str::FromStr for Deck {
    type Err = MotelyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Deck::*;
        Ok(match s.to_ascii_lowercase().as_str() {
            "red" => Red,
            "blue" => Blue,
            "yellow" => Yellow,
            "green" => Green,
            "black" => Black,
            "magic" => Magic,
            "nebula" => Nebula,
            "ghost" => Ghost,
            "abandoned" => Abandoned,
            "checkered" => Checkered,
            "zodiac" => Zodiac,
            "painted" => Painted,
            "anaglyph" => Anaglyph,
            "plasma" => Plasma,
            "erratic" => Erratic,
            other => return Err(ConfigError::UnknownDeck(other.to_string()).into()),
        })
    }
}

/// Difficulty stake. Ordered so `stake as u8` reflects difficulty rank,
/// which stake-gated sticker logic relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Stake {
    White = 0,
    Red = 1,
    Green = 2,
    Black = 3,
    Blue = 4,
    Purple = 5,
    Orange = 6,
    Gold = 7,
}

impl Stake {
    /// Minimum stake at which Eternal stickers can appear.
    pub fn allows_eternal(self) -> bool {
        self >= Stake::Black
    }

    /// Minimum stake at which Perishable stickers can appear.
    pub fn allows_perishable(self) -> bool {
        self >= Stake::Blue
    }

    /// Minimum stake at which Rental stickers can appear.
    pub fn allows_rental(self) -> bool {
        self >= Stake::Orange
    }
}

impl std::str::FromStr for Stake {
    type Err = MotelyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Stake::*;
        Ok(match s.to_ascii_lowercase().as_str() {
            "white" => White,
            "red" => Red,
            "green" => Green,
            "black" => Black,
            "blue" => Blue,
            "purple" => Purple,
            "orange" => Orange,
            "gold" => Gold,
            other => return Err(ConfigError::UnknownStake(other.to_string()).into()),
        })
    }
}
