use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use potree_attributes::layout::{attributes, PointAttributes};
use rand::{seq::SliceRandom, thread_rng};

fn bench(c: &mut Criterion) {
    let names = attributes::names();
    let mut rng = thread_rng();

    let mut group = c.benchmark_group("from_names");
    for num_attributes in [1, 4, 8, 16] {
        let random_names = {
            let mut names = names.clone();
            names.shuffle(&mut rng);
            names.into_iter().take(num_attributes).collect::<Vec<_>>()
        };
        group.throughput(Throughput::Elements(num_attributes as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_attributes),
            &random_names,
            |b, names| b.iter(|| black_box(PointAttributes::from_names(names).unwrap())),
        );
    }
    group.finish();

    let point_attributes = PointAttributes::from_names(&names).unwrap();
    let mut group = c.benchmark_group("offset_of");
    for index in [0, 7, 15] {
        group.bench_with_input(BenchmarkId::from_parameter(index), &index, |b, index| {
            b.iter(|| black_box(point_attributes.offset_of(*index).unwrap()))
        });
    }
    group.finish();
}

criterion_group! {
    name = point_attributes;
    config = Criterion::default().sample_size(40);
    targets = bench
}
criterion_main!(point_attributes);
