//! Tag stream: one small-blind and one big-blind tag per ante, drawn
//! uniformly with no resampling (tags may repeat across antes).

use super::{Category, Item};
use crate::context::SearchContext;

pub fn draw_small_blind_tag(ctx: &SearchContext<'_>, ante: u8, pool_len: usize) -> [Item; 8] {
    let mut stream = ctx.create_stream(&format!("Tag{ante}"));
    let idx = stream.random_int(0, pool_len.max(1) as i64);
    std::array::from_fn(|lane| Item::new(Category::Tag, idx[lane] as u16))
}

pub fn draw_big_blind_tag(ctx: &SearchContext<'_>, ante: u8, pool_len: usize) -> [Item; 8] {
    let mut stream = ctx.create_stream(&format!("Tag2_{ante}"));
    let idx = stream.random_int(0, pool_len.max(1) as i64);
    std::array::from_fn(|lane| Item::new(Category::Tag, idx[lane] as u16))
}
