//! # Tiered Mint Allocator Benchmarks
//!
//! | Target | Operation | Expectation |
//! |--------|-----------|-------------|
//! | `select_by_weight` | Cumulative weight walk | O(tiers) |
//! | `draw_tier` | Keccak mix + weighted pick | < 5µs |
//! | `mint_public` | Full transaction, in-memory adapters | < 100µs per call |

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use std::time::Duration;
use tm_mint_engine::domain::TierRegistry;
use tm_mint_engine::prelude::*;

// ============================================================================
// Weighted Selection
// ============================================================================

fn bench_select_by_weight(c: &mut Criterion) {
    let mut group = c.benchmark_group("select-by-weight");

    let weights = [600, 300, 100];
    let positions: Vec<u64> = {
        let mut rng = rand::thread_rng();
        (0..1_000).map(|_| rng.gen_range(0..1_000)).collect()
    };

    group.throughput(Throughput::Elements(positions.len() as u64));
    group.bench_function("reference_weights", |b| {
        b.iter(|| {
            for r in &positions {
                black_box(select_by_weight(weights, *r));
            }
        })
    });

    group.finish();
}

// ============================================================================
// Tier Draws
// ============================================================================

fn bench_draw_tier(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw-tier");
    group.measurement_time(Duration::from_secs(5));

    let requester = Address::repeat_byte(0xab);
    let seed = {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill(&mut bytes);
        Hash::new(bytes)
    };

    for capacities in [[600u64, 300, 100], [5, 5, 1], [1_000_000, 1_000, 1]] {
        let registry = match TierRegistry::new(capacities) {
            Ok(registry) => registry,
            Err(_) => continue,
        };
        group.bench_with_input(
            BenchmarkId::new("single_draw", format!("{capacities:?}")),
            &registry,
            |b, registry| {
                let mut nonce = 0u64;
                b.iter(|| {
                    nonce += 1;
                    let input = DrawInput {
                        seed: &seed,
                        requester: &requester,
                        nonce: TokenId(nonce),
                    };
                    black_box(draw_tier(registry, &input))
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// Full Transactions
// ============================================================================

fn bench_mint_public(c: &mut Criterion) {
    let mut group = c.benchmark_group("mint-public");
    group.measurement_time(Duration::from_secs(10));

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(_) => return,
    };
    let buyer = Address::repeat_byte(0xbe);

    for units in [1u32, 3, 5] {
        group.throughput(Throughput::Elements(u64::from(units)));
        group.bench_with_input(BenchmarkId::new("units", units), &units, |b, &units| {
            b.iter_batched(
                || {
                    let service = create_test_service();
                    runtime.block_on(async {
                        let owner = service.sale_status().await.owner;
                        let _ = service.go_public(owner).await;
                    });
                    service
                },
                |service| {
                    let paid = milli_ether(60 * u64::from(units));
                    black_box(runtime.block_on(service.mint_public(buyer, units, paid)))
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_select_by_weight,
    bench_draw_tier,
    bench_mint_public
);

criterion_main!(benches);
