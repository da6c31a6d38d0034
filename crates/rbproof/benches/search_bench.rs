//! Criterion benches for the proof searches.
//!
//! - reachability enumeration at small depths,
//! - equivalence classes of random and triple-unit proofs,
//! - unit lifting.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rbproof::prelude::*;

fn bench_enumerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("enumerate");
    group.sample_size(10);
    for depth in [2usize, 3] {
        group.bench_function(BenchmarkId::new("limit", depth), |b| {
            b.iter(|| Proof::enumerate(depth).backtrack.len())
        });
    }
    group.finish();
}

fn bench_equivalence(c: &mut Criterion) {
    let mut group = c.benchmark_group("equivalence");
    group.sample_size(10);
    let enumeration = Proof::enumerate(3);
    let triple: Rbg = "B(R(B(R(b,b),r),b),r,R(b,B(r,r)))".parse().unwrap();
    let derivation = Proof::derivations(&triple, &enumeration).next().unwrap();
    group.bench_function(BenchmarkId::new("class", "triple_unit"), |b| {
        b.iter(|| derivation.equivalence_class().count())
    });
    let cfg = RandomProofCfg {
        steps: 6,
        merge_bias: 0.5,
    };
    group.bench_function(BenchmarkId::new("class", "random6"), |b| {
        b.iter_batched(
            || ReplayToken { seed: 42, index: 0 },
            |mut tok| {
                tok.index = tok.index.wrapping_add(1);
                draw_proof(cfg, tok).equivalence_class().count()
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function(BenchmarkId::new("remove_unit_intros", "triple_unit"), |b| {
        b.iter(|| derivation.remove_unit_intros().len())
    });
    group.finish();
}

criterion_group!(benches, bench_enumerate, bench_equivalence);
criterion_main!(benches);
