//! Playing-card stream: suit + rank, with an optional seal, enhancement
//! and edition layered on independently-keyed rolls. Standard packs draw a
//! fixed number of cards (2 for a Mega Standard pack, 1 otherwise), each
//! an independent slot with its own key suffix.

use super::{Edition, Enhancement, Item, Seal};
use crate::context::SearchContext;

/// Seal roll threshold.
const SEAL_CHANCE: f64 = 0.8;
/// Enhancement roll threshold.
const ENHANCEMENT_CHANCE: f64 = 0.6;
/// Edition roll thresholds for playing cards, distinct from the joker
/// table: playing-card editions are rarer, though these mirror the joker
/// shop table's ordering at a lower overall rate.
const EDITION_POLYCHROME: f64 = 0.997;
const EDITION_HOLOGRAPHIC: f64 = 0.992;
const EDITION_FOIL: f64 = 0.98;

fn edition_from_roll(p: f64) -> Edition {
    if p > EDITION_POLYCHROME {
        Edition::Polychrome
    } else if p > EDITION_HOLOGRAPHIC {
        Edition::Holographic
    } else if p > EDITION_FOIL {
        Edition::Foil
    } else {
        Edition::None
    }
}

/// Draw one playing-card slot for the given ante/pack-slot index.
/// `rank_count`/`suit_count` size the two independent uniform draws; seal
/// and enhancement pools are supplied as their own sizes so callers can
/// swap in data-driven tables without touching this function.
pub fn draw_playing_card(
    ctx: &SearchContext<'_>,
    ante: u8,
    slot: u8,
    rank_count: usize,
    suit_count: usize,
    seal_count: usize,
    enhancement_count: usize,
) -> [Item; 8] {
    let mut suit_stream = ctx.create_stream(&format!("cdtsuit{ante}_{slot}"));
    let mut rank_stream = ctx.create_stream(&format!("cdtrank{ante}_{slot}"));
    let mut seal_roll_stream = ctx.create_stream(&format!("stdseal{ante}_{slot}"));
    let mut seal_which_stream = ctx.create_stream(&format!("stdsealtype{ante}_{slot}"));
    let mut enh_roll_stream = ctx.create_stream(&format!("stdenh{ante}_{slot}"));
    let mut enh_which_stream = ctx.create_stream(&format!("stdenhtype{ante}_{slot}"));
    let mut edi_stream = ctx.create_stream(&format!("stdedi{ante}_{slot}"));

    let suit_idx = suit_stream.random_int(0, suit_count.max(1) as i64);
    let rank_idx = rank_stream.random_int(0, rank_count.max(1) as i64);
    let seal_roll = seal_roll_stream.random();
    let seal_which = seal_which_stream.random_int(0, seal_count.max(1) as i64);
    let enh_roll = enh_roll_stream.random();
    let enh_which = enh_which_stream.random_int(0, enhancement_count.max(1) as i64);
    let edi_roll = edi_stream.random();

    // Encodes suit*rank_count + rank into the card's index so category data
    // doesn't need a separate (suit, rank) pair type.
    std::array::from_fn(|lane| {
        let index = (suit_idx[lane] as usize * rank_count.max(1) + rank_idx[lane] as usize) as u16;
        let mut item = Item::new(super::Category::PlayingCard, index).with_edition(edition_from_roll(edi_roll[lane]));
        if seal_roll[lane] > SEAL_CHANCE {
            item = item.with_seal(Seal(seal_which[lane] as u8 + 1));
        }
        if enh_roll[lane] > ENHANCEMENT_CHANCE {
            item = item.with_enhancement(Enhancement(enh_which[lane] as u8 + 1));
        }
        item
    })
}

/// Number of playing cards a Standard pack grants: 2 for the Mega variant,
/// 1 otherwise.
pub fn standard_pack_card_count(is_mega: bool) -> u8 {
    if is_mega {
        2
    } else {
        1
    }
}
