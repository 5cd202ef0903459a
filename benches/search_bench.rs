criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .sample_size(20)
        .measurement_time(std::time::Duration::from_secs(2));
    targets =
        stepping_prng_core,
        hashing_seed_batch,
        drawing_shop_joker,
        resampling_tarot_pack,
}

use motely::context::SearchContext;
use motely::items::joker::{draw_joker, JokerStreams};
use motely::items::tarot_planet::{draw_tarot, tarot_resample_key};
use motely::items::{ItemSet, Source};
use motely::deck_stake::Stake;
use motely::rng::hash::seed_hash_vec;
use motely::rng::core::random;
use motely::seed::Seed;
use motely::tables::ItemTables;

fn batch_seeds() -> [Seed; 8] {
    std::array::from_fn(|i| Seed::new(format!("ALEE{}", (b'1' + i as u8) as char)).unwrap())
}

fn stepping_prng_core(c: &mut criterion::Criterion) {
    let seeds: [String; 8] = std::array::from_fn(|i| format!("SEED{i}"));
    let seed_hash = seed_hash_vec(&seeds);
    let mut state = seed_hash;
    c.bench_function("advance the vector PRNG core one step", |b| {
        b.iter(|| random(&mut state, seed_hash))
    });
}

fn hashing_seed_batch(c: &mut criterion::Criterion) {
    let seeds: [String; 8] = std::array::from_fn(|i| format!("SEED{i}"));
    c.bench_function("hash an 8-seed batch", |b| b.iter(|| seed_hash_vec(&seeds)));
}

fn drawing_shop_joker(c: &mut criterion::Criterion) {
    let tables = ItemTables::builtin();
    let ctx = SearchContext::new(batch_seeds(), &tables);
    c.bench_function("draw a shop joker across 8 lanes", |b| {
        b.iter(|| {
            let mut streams = JokerStreams::new(&ctx, 1, Source::Shop);
            draw_joker(
                &mut streams,
                Source::Shop,
                Stake::White,
                [10, 10, 10, 5],
                false,
                true,
            )
        })
    });
}

fn resampling_tarot_pack(c: &mut criterion::Criterion) {
    let tables = ItemTables::builtin();
    let ctx = SearchContext::new(batch_seeds(), &tables);
    c.bench_function("draw a 5-card Arcana pack with dedup", |b| {
        b.iter(|| {
            let mut packs: [ItemSet; 8] = Default::default();
            let mut resample = ctx.resample_stream(&tarot_resample_key(Source::ArcanaPack, 1));
            for slot in 0..5u8 {
                draw_tarot(&mut resample, None, tables.tarots.len(), &mut packs, motely::rng::ALL_LANES);
                let _ = slot;
            }
        })
    });
}
