//! Engine hot-path benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rust_nim::core::{GameRng, Move, NimConfig};
use rust_nim::games::nim::NimEngine;
use rust_nim::training::{play_episode, OptimalPolicy, RandomPolicy, RolloutConfig};

fn default_engine() -> NimEngine {
    NimEngine::new(NimConfig::default(), &mut GameRng::new(42)).unwrap()
}

fn bench_step_and_reset(c: &mut Criterion) {
    let mut engine = default_engine();
    let mv = engine.possible_moves()[0];
    c.bench_function("step_reset", |b| {
        b.iter(|| {
            engine.step(black_box(mv)).unwrap();
            engine.reset()
        })
    });
}

fn bench_queries(c: &mut Criterion) {
    let mut engine = default_engine();
    engine.step(Move::new(0, 1)).unwrap();

    c.bench_function("optimal_moves", |b| b.iter(|| black_box(&engine).optimal_moves()));
    c.bench_function("possible_move_indices", |b| {
        b.iter(|| black_box(&engine).possible_move_indices())
    });
}

fn bench_configure(c: &mut Criterion) {
    let mut engine = default_engine();
    let mut rng = GameRng::new(7);
    c.bench_function("configure_random", |b| {
        b.iter(|| {
            engine.configure(NimConfig::default(), &mut rng).unwrap();
        })
    });
}

fn bench_episode(c: &mut Criterion) {
    let mut engine = default_engine();
    let mut expert = OptimalPolicy;
    let mut random = RandomPolicy::with_seed(3);
    let config = RolloutConfig::default();
    c.bench_function("episode_optimal_vs_random", |b| {
        b.iter(|| play_episode(&mut engine, [&mut expert, &mut random], &config).unwrap())
    });
}

criterion_group!(benches, bench_step_and_reset, bench_queries, bench_configure, bench_episode);
criterion_main!(benches);
