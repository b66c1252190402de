//! Card play benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lane_combat::board::Board;
use lane_combat::cards::{CardDefinition, TargetType};
use lane_combat::core::{BoardConfig, CombatUnit, ResolverConfig, Side, UnitId, UnitRoster};
use lane_combat::effects::Effect;
use lane_combat::play::{CardPlayResolver, CombatContext};

fn setup() -> (Board, UnitRoster) {
    let mut board = Board::from_config(&BoardConfig::new());
    let mut roster = UnitRoster::new();
    roster.insert(UnitId(1), CombatUnit::new("Hero", 30, u32::MAX));
    board.register_unit(UnitId(1), Side::Ally, 3).unwrap();
    for i in 0..5 {
        let id = UnitId(10 + i as u32);
        roster.insert(id, CombatUnit::new("Orc", u32::MAX, 0));
        board.register_unit(id, Side::Enemy, i).unwrap();
    }
    (board, roster)
}

fn bench_front_most_strike(c: &mut Criterion) {
    let (mut board, mut roster) = setup();
    let mut resolver = CardPlayResolver::new(ResolverConfig::new(42));
    let card = CardDefinition::new("strike").with_effect(Effect::damage(3, 4));

    c.bench_function("play_front_most_strike", |b| {
        b.iter(|| {
            let mut ctx = CombatContext::new(&mut board, &mut roster);
            black_box(resolver.play_card(&mut ctx, &card, UnitId(1)))
        })
    });
}

fn bench_manual_knockback(c: &mut Criterion) {
    let (board, roster) = setup();
    let card = CardDefinition::new("shove")
        .with_cost(0)
        .with_target_type(TargetType::SingleManual)
        .with_effect(Effect::knockback(1));

    c.bench_function("play_manual_knockback", |b| {
        b.iter(|| {
            // Fresh board each time so the push is never blocked
            let mut board = board.clone();
            let mut roster = roster.clone();
            board.unregister_unit(UnitId(11), Side::Enemy, 1);
            let mut resolver = CardPlayResolver::new(ResolverConfig::new(7));
            let mut ctx = CombatContext::new(&mut board, &mut roster);
            let _ = resolver.play_card(&mut ctx, &card, UnitId(1));
            black_box(resolver.provide_candidate(&mut ctx, UnitId(10)))
        })
    });
}

fn bench_board_clone(c: &mut Criterion) {
    let (board, _) = setup();
    c.bench_function("board_clone", |b| b.iter(|| black_box(board.clone())));
}

criterion_group!(benches, bench_front_most_strike, bench_manual_knockback, bench_board_clone);
criterion_main!(benches);
