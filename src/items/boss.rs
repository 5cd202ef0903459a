//! Boss stream: one boss blind per ante, drawn from the full boss pool
//! excluding whichever bosses appeared in the last
//! [`RECENT_EXCLUSION_WINDOW`] antes (the real game never repeats a boss
//! back-to-back within a short window).

use super::{Category, Item};
use crate::context::SearchContext;

/// How many of the most recent antes' bosses are excluded from the pool.
pub const RECENT_EXCLUSION_WINDOW: usize = 2;

/// Draw the boss for `ante`. `recent` holds the bosses from the
/// `RECENT_EXCLUSION_WINDOW` prior antes, oldest first; callers push this
/// ante's result and drop the oldest entry before the next call.
pub fn draw_boss(ctx: &SearchContext<'_>, ante: u8, pool_len: usize, recent: &[[Item; 8]]) -> [Item; 8] {
    let mut stream = ctx.create_stream(&format!("boss{ante}"));
    let pool_len = pool_len.max(1) as i64;

    std::array::from_fn(|lane| {
        let excluded: Vec<u16> = recent.iter().map(|r| r[lane].index()).collect();
        // Excluded bosses shrink the effective pool; redraw until the index
        // lands outside the exclusion set, consuming one RNG value per try
        // just like the resample ladder.
        let mut idx = stream.random_int(0, pool_len)[lane];
        let mut tries = 0;
        while excluded.contains(&(idx as u16)) && tries < pool_len {
            idx = stream.random_int(0, pool_len)[lane];
            tries += 1;
        }
        Item::new(Category::Boss, idx as u16)
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
    fn boss_never_repeats_within_exclusion_window() {
        let tables = ItemTables::builtin();
        let c = ctx(&tables);
        let mut recent: Vec<[Item; 8]> = Vec::new();
        for ante in 1..=6u8 {
            let drawn = draw_boss(&c, ante, tables.bosses.len(), &recent);
            for r in &recent {
                for lane in 0..8 {
                    assert_ne!(drawn[lane].index(), r[lane].index());
                }
            }
            recent.push(drawn);
            if recent.len() > RECENT_EXCLUSION_WINDOW {
                recent.remove(0);
            }
        }
    }
}
