use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chess_core::game_state::game_state::initial_position;
use chess_core::search::minimax::{search, SearchConfig};
use chess_core::utils::fen_parser::parse_fen;

const MIDDLEGAME_FEN: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimax");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(10);

    let positions = [
        ("start", initial_position()),
        ("middlegame", parse_fen(MIDDLEGAME_FEN).expect("benchmark FEN should parse")),
    ];

    for (name, (board, state)) in positions {
        for depth in 1..=3u8 {
            let config = SearchConfig::default().with_depth(depth);

            let warmup = search(&board, &state, &config).expect("search should run");
            assert!(warmup.best.is_some(), "{name} should have a best move");

            group.bench_with_input(BenchmarkId::new(name, format!("d{depth}")), &config, |b, config| {
                b.iter(|| {
                    search(black_box(&board), black_box(&state), black_box(config))
                        .expect("search benchmark run should succeed")
                        .nodes
                });
            });
        }
    }

    group.finish();
}

criterion_group!(search_benches, bench_search);
criterion_main!(search_benches);
