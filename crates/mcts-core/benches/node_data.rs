use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use mcts_core::node::node_data::NodeData;

fn bench_grow(c: &mut Criterion) {
    c.bench_function("node_data_grow_40", |b| {
        b.iter(|| {
            let mut data = NodeData::<u32>::new(black_box(40));
            for _ in 1..40 {
                data.add_empty_child();
            }
            black_box(data.len())
        })
    });
}

fn bench_select(c: &mut Criterion) {
    let mut data = NodeData::<u32>::new(40);
    for idx in 0..40 {
        if idx > 0 {
            data.add_empty_child();
        }
        data.record_visit(idx, (idx % 7) as f32 / 7.0, false);
    }

    c.bench_function("node_data_argmax_combined", |b| {
        b.iter(|| {
            let values = black_box(&data).populated_combined_values();
            let mut best = 0;
            for (idx, &v) in values.iter().enumerate() {
                if v > values[best] {
                    best = idx;
                }
            }
            black_box(best)
        })
    });
}

criterion_group!(benches, bench_grow, bench_select);
criterion_main!(benches);
