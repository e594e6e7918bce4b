use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cm_core::{GameEvent, GameOrchestrator, RandomDice};

/// Keep 1s and 5s (or everything), bank at 750; play one full 2-player game.
fn play_one(seed: u64) -> u32 {
    let mut g = GameOrchestrator::new(RandomDice::new(seed));
    g.start_game(2);
    while g.is_in_progress() {
        let dice = match g.roll_current_turn() {
            GameEvent::Rolled { dice, .. } => dice,
            _ => continue,
        };
        let mut keep: Vec<usize> = (0..dice.len())
            .filter(|&i| dice[i] == 1 || dice[i] == 5)
            .collect();
        if keep.is_empty() {
            keep = (0..dice.len()).collect();
        }
        if let GameEvent::Scored { turn_total, .. } = g.select_current_turn_dice(&keep) {
            if turn_total >= 750 {
                g.bank_current_turn();
            }
        }
    }
    g.winner().map(|p| p.total_score).unwrap_or(0)
}

fn bench_full_game(c: &mut Criterion) {
    let mut seed = 0u64;
    c.bench_function("cm_core_full_game_2p", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            black_box(play_one(black_box(seed)))
        })
    });
}

criterion_group!(benches, bench_full_game);
criterion_main!(benches);
