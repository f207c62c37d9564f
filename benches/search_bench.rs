use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gomoku_ai::board::{Board, Pos, Stone};
use gomoku_ai::eval::evaluate;
use gomoku_ai::search::{generate_moves, MoveGenConfig, SearchOptions, Searcher};

fn midgame() -> Board {
    let mut board = Board::new();
    let moves = [
        (7, 7), (8, 8), (6, 7), (8, 7), (6, 6), (8, 6),
        (5, 5), (8, 9), (8, 5), (4, 4), (9, 9), (7, 6),
    ];
    for (i, (x, y)) in moves.into_iter().enumerate() {
        let stone = if i % 2 == 0 { Stone::Black } else { Stone::White };
        board.apply(Pos::new(x, y), stone);
    }
    board
}

fn bench_movegen(c: &mut Criterion) {
    let b = midgame();
    c.bench_function("generate_moves_midgame", |ben| {
        ben.iter(|| generate_moves(black_box(&b), Stone::Black, MoveGenConfig::default()).len())
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let b = midgame();
    c.bench_function("evaluate_midgame", |ben| {
        ben.iter(|| evaluate(black_box(&b), Stone::Black))
    });
}

fn bench_search(c: &mut Criterion) {
    let b = midgame();
    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    for depth in [2u8, 3] {
        group.bench_function(format!("depth_{}_midgame", depth), |ben| {
            ben.iter(|| {
                // Budget is generous so the depth, not the clock, bounds the work
                let opts = SearchOptions::with_config(depth, 60_000);
                let mut searcher = Searcher::new(opts);
                let outcome = searcher.search(black_box(&b), Stone::Black);
                black_box(outcome.best_move())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_movegen, bench_evaluate, bench_search);
criterion_main!(benches);
