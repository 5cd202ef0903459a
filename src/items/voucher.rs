//! Voucher stream: one voucher offered per ante, resampled against the
//! vouchers already active in the run.
//!
//! Whether a voucher's upgrade-tier dependency (e.g. Hieroglyph requiring
//! its base voucher already active) gates the pool is resolved here
//! conservatively: by default only vouchers whose prerequisite is in
//! `active` are eligible, matching the real shop's behavior; callers that
//! already know a prerequisite was purchased off-seed can force it into the
//! pool via `assumed_purchased` without the search needing to simulate the
//! full run.

use super::{Category, Item, ItemSet};
use crate::context::SearchContext;

/// A voucher and the prerequisite voucher index it upgrades from, if any.
#[derive(Debug, Clone, Copy)]
pub struct VoucherSlot {
    pub index: u16,
    pub requires: Option<u16>,
}

/// Build the eligible-index list for this draw: vouchers with no
/// prerequisite, plus upgrade vouchers whose prerequisite is already active
/// or has been asserted via `assumed_purchased`.
fn eligible_pool(table: &[VoucherSlot], active: &ItemSet, assumed_purchased: &[u16]) -> Vec<u16> {
    table
        .iter()
        .filter(|slot| {
            !active.contains(Item::new(Category::Voucher, slot.index))
        })
        .filter(|slot| match slot.requires {
            None => true,
            Some(req) => {
                active.contains(Item::new(Category::Voucher, req)) || assumed_purchased.contains(&req)
            }
        })
        .map(|slot| slot.index)
        .collect()
}

/// Draw the ante's voucher offer. `active` holds vouchers already taken
/// this run (across all antes so far), used both for pack-style dedup and
/// for the prerequisite gate above.
pub fn draw_voucher(
    ctx: &SearchContext<'_>,
    ante: u8,
    table: &[VoucherSlot],
    active: &mut [ItemSet; 8],
    assumed_purchased: &[u16],
) -> [Item; 8] {
    let mut stream = ctx.create_stream(&format!("Voucher{ante}"));

    // The eligible pool only depends on `active`, which is shared across
    // lanes only in tests; in real use each lane's `active` set can differ,
    // so the pool (and hence the draw's modulus) is computed per lane.
    std::array::from_fn(|lane| {
        let pool = eligible_pool(table, &active[lane], assumed_purchased);
        if pool.is_empty() {
            return Item::EXCLUDED;
        }
        let idx = stream.random_int(0, pool.len() as i64);
        let item = Item::new(Category::Voucher, pool[idx[lane] as usize]);
        active[lane].push(item);
        item
    })
}
