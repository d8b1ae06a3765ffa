use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use stow_basket::{Options, StowableRef};
use stow_infra::{Basket, BasketContext};

fn widget(key: usize) -> StowableRef {
    StowableRef::new("Widget", key)
}

/// Basket with `size` distinct items, each with a small option set.
fn filled_basket(ctx: &BasketContext, size: usize) -> Basket {
    let mut basket = Basket::new(ctx.clone(), "basket").unwrap();
    for key in 0..size {
        basket
            .add(&widget(key), 1, Options::new().with("variant", key as u64 % 3))
            .unwrap();
    }
    basket
}

fn bench_add_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_latency");
    group.sample_size(1000);

    // Benchmark: every add creates a new line item
    group.bench_function("add_new_item", |b| {
        let ctx = BasketContext::in_memory();
        let mut basket = Basket::new(ctx, "basket").unwrap();
        let mut key = 0usize;
        b.iter(|| {
            key += 1;
            basket.add(&widget(black_box(key)), 1, Options::new()).unwrap();
        });
    });

    // Benchmark: every add increments the same line item
    group.bench_function("increment_existing_item", |b| {
        let ctx = BasketContext::in_memory();
        let mut basket = filled_basket(&ctx, 50);
        let options = Options::new().with("variant", 1u64);
        b.iter(|| {
            basket
                .add(&widget(black_box(49)), 1, options.clone())
                .unwrap();
        });
    });

    group.finish();
}

fn bench_merge_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_throughput");

    for size in [1usize, 10, 100].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("merge_into_empty", size), size, |b, &size| {
            let ctx = BasketContext::in_memory();
            let source = filled_basket(&ctx, size);
            b.iter_batched(
                || Basket::new(ctx.clone(), "basket").unwrap(),
                |mut target| {
                    target.merge(black_box(&source)).unwrap();
                    target
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_cascade_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("cascade_delete");

    for size in [0usize, 10, 100].iter() {
        group.throughput(Throughput::Elements(*size as u64 + 1));
        group.bench_with_input(BenchmarkId::new("delete", size), size, |b, &size| {
            let ctx = BasketContext::in_memory();
            b.iter_batched(
                || filled_basket(&ctx, size),
                |mut basket| {
                    basket.delete().unwrap();
                    basket
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_add_latency,
    bench_merge_throughput,
    bench_cascade_delete
);
criterion_main!(benches);
