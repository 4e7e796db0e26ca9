use std::sync::Arc;
use std::thread;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use visitatori::store::Strategy;
use visitatori::visit::Visit;

const NUM_THREADS: usize = 8;
const VISITS_PER_THREAD: usize = 10_000;
const NUM_PAGES: usize = 16;

fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_visits");
    group.sample_size(20);

    for strategy in [Strategy::Locked, Strategy::Serialized] {
        group.bench_function(
            BenchmarkId::new(
                format!("{strategy:?}"),
                format!("{}threads x {}visits", NUM_THREADS, VISITS_PER_THREAD),
            ),
            |b| {
                b.iter(|| {
                    let store = strategy.build().unwrap();
                    let mut handles = vec![];

                    for t in 0..NUM_THREADS {
                        let store = Arc::clone(&store);
                        let handle = thread::spawn(move || {
                            for i in 0..VISITS_PER_THREAD {
                                let visit = Visit::new(
                                    format!("visitor-{}", i % 1000 + t),
                                    format!("/page/{}", i % NUM_PAGES),
                                );
                                store.record(&visit).unwrap();
                            }
                        });
                        handles.push(handle);
                    }

                    for handle in handles {
                        handle.join().unwrap();
                    }

                    black_box(store.count("/page/0").unwrap())
                })
            },
        );
    }

    group.finish();
}

fn bench_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_heavy");
    group.sample_size(20);

    for strategy in [Strategy::Locked, Strategy::Serialized] {
        group.bench_function(
            BenchmarkId::new(format!("{strategy:?}"), "9 reads : 1 write"),
            |b| {
                b.iter(|| {
                    let store = strategy.build().unwrap();
                    let mut handles = vec![];

                    for t in 0..NUM_THREADS {
                        let store = Arc::clone(&store);
                        let handle = thread::spawn(move || {
                            let mut seen = 0;
                            for i in 0..VISITS_PER_THREAD {
                                let page = format!("/page/{}", i % NUM_PAGES);
                                if i % 10 == 0 {
                                    store.record(&Visit::new(format!("v-{t}-{i}"), page)).unwrap();
                                } else {
                                    seen += store.count(&page).unwrap();
                                }
                            }
                            seen
                        });
                        handles.push(handle);
                    }

                    let total: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
                    black_box(total)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_record, bench_mixed);
criterion_main!(benches);
