use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mcts_core::chess_move::Move;
use mcts_core::eval_info::{EvalInfo, update_eval_info};
use mcts_core::node::Node;
use mcts_core::square::Square;

const BRANCHING: usize = 30;
const LINE_DEPTH: usize = 12;

fn legal_moves(n: usize) -> Vec<Move> {
    Square::iter()
        .take(n)
        .map(|sq| Move::new(sq, Square::H8))
        .collect()
}

/// Root with `BRANCHING` expanded children, each leading a line of `LINE_DEPTH` nodes.
fn build_tree() -> Node {
    let root = Node::new(legal_moves(BRANCHING));
    root.set_value(0.0);

    for idx in 0..BRANCHING {
        let mut next = Arc::new(Node::new(legal_moves(4)));
        next.set_value(0.0);
        for _ in 0..LINE_DEPTH {
            let node = Arc::new(Node::new(legal_moves(4)));
            node.set_value(0.0);
            node.set_child(0, next);
            node.backup(0, 0.1);
            next = node;
        }
        root.set_child(idx, next);
        for _ in 0..(BRANCHING - idx) {
            root.backup(idx, 0.05);
        }
    }
    root
}

fn bench_update_eval_info(c: &mut Criterion) {
    let root = build_tree();
    let mut group = c.benchmark_group("update_eval_info");

    for multi_pv in [1usize, 5] {
        group.bench_with_input(
            BenchmarkId::from_parameter(multi_pv),
            &multi_pv,
            |b, &multi_pv| {
                let mut info = EvalInfo::default();
                b.iter(|| {
                    update_eval_info(&mut info, black_box(&root), 0, 0, multi_pv);
                    black_box(info.line_count())
                });
            },
        );
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let root = build_tree();
    let mut info = EvalInfo::default();
    update_eval_info(&mut info, &root, 0, 0, 5);

    c.bench_function("eval_info_render", |b| {
        b.iter(|| black_box(&info).to_string())
    });
}

criterion_group!(benches, bench_update_eval_info, bench_render);
criterion_main!(benches);
