use criterion::{criterion_group, criterion_main, Criterion};
use trop_moduli::ModuliSpaceBuilder;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_space");
    group.bench_function("genus1_two_markings", |b| {
        b.iter(|| {
            let space = ModuliSpaceBuilder::new(1, 2).generate_space().unwrap();
            assert_eq!(space.num_strata(), 5);
        })
    });
    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
