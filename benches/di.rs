use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrous_ioc::*;
use std::sync::Arc;

// ===== Fixtures =====

trait Repository: Send + Sync {
    fn id(&self) -> u64;
}

trait UserRepository: Repository {}

#[derive(Default)]
struct SqlUsers;

impl Repository for SqlUsers {
    fn id(&self) -> u64 {
        7
    }
}

impl UserRepository for SqlUsers {}

impl Injectable for SqlUsers {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>()
            .with_default()
            .implements::<dyn UserRepository>(|r| r as Arc<dyn UserRepository>)
            .build()
    }
}

#[derive(Default)]
struct Handler {
    users: Inject<dyn UserRepository>,
}

impl Injectable for Handler {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>()
            .with_default()
            .field("users", |h| &h.users)
            .build()
    }
}

fn user_repository_is_a_repository() -> TypeDescriptor {
    TypeDescriptor::builder::<dyn UserRepository>()
        .implements::<dyn Repository>(|r| r as Arc<dyn Repository>)
        .build()
}

// ===== Micro Benchmarks =====

fn bench_singleton_hit(c: &mut Criterion) {
    let container = Container::start([Module::new().singleton::<u64, _>(|_| 42)]);

    // Prime the singleton
    let _ = container.get::<u64>().unwrap();

    c.bench_function("singleton_hit_u64", |b| {
        b.iter(|| {
            let v = container.get::<u64>().unwrap();
            black_box(v);
        })
    });
}

fn bench_singleton_cold(c: &mut Criterion) {
    struct ExpensiveToCreate {
        data: Vec<u64>,
    }

    c.bench_function("singleton_cold_expensive", |b| {
        b.iter_batched(
            || {
                Container::start([Module::new().singleton::<ExpensiveToCreate, _>(|_| {
                    ExpensiveToCreate {
                        data: (0..1000).collect(),
                    }
                })])
            },
            |container| {
                let v = container.get::<ExpensiveToCreate>().unwrap();
                black_box(v.data.len());
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_transient_injection(c: &mut Criterion) {
    let container = Container::start([Module::new()
        .component::<SqlUsers>()
        .transient_component::<Handler>()]);

    c.bench_function("transient_with_field_injection", |b| {
        b.iter(|| {
            let handler = container.get::<Handler>().unwrap();
            black_box(handler.users.get_required().id());
        })
    });
}

fn bench_capability_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("capability_lookup");

    for memoize in [true, false] {
        let config = ContainerConfig::default().with_memoized_assignability(memoize);
        let container = Container::with_config(config);
        container.load_module(Module::new().component::<SqlUsers>());
        // declared after registration, so `dyn Repository` goes through the scan
        container.declare(user_repository_is_a_repository());

        group.bench_with_input(BenchmarkId::new("scan", memoize), &container, |b, container| {
            b.iter(|| {
                let repo = container.get::<dyn Repository>().unwrap();
                black_box(repo.id());
            })
        });
    }

    let direct = Container::start([Module::new()
        .declare(user_repository_is_a_repository())
        .component::<SqlUsers>()]);
    group.bench_function("indexed", |b| {
        b.iter(|| {
            let repo = direct.get::<dyn Repository>().unwrap();
            black_box(repo.id());
        })
    });

    group.finish();
}

fn bench_named_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("named_lookup");

    for size in [10usize, 100, 1000] {
        let mut module = Module::new();
        for i in 0..size {
            module = module.named_singleton::<u64, _>(&format!("value-{i}"), move |_| i as u64);
        }
        let container = Container::start([module]);
        let name = format!("value-{}", size / 2);

        group.bench_with_input(BenchmarkId::from_parameter(size), &container, |b, container| {
            b.iter(|| {
                let v = container.get_named::<u64>(&name).unwrap();
                black_box(*v);
            })
        });
    }

    group.finish();
}

fn bench_contention(c: &mut Criterion) {
    let container = Container::start([Module::new().component::<SqlUsers>()]);

    c.bench_function("singleton_hit_4_threads", |b| {
        b.iter(|| {
            std::thread::scope(|s| {
                for _ in 0..4 {
                    s.spawn(|| {
                        for _ in 0..100 {
                            black_box(container.get::<dyn UserRepository>().unwrap().id());
                        }
                    });
                }
            });
        })
    });
}

criterion_group!(
    benches,
    bench_singleton_hit,
    bench_singleton_cold,
    bench_transient_injection,
    bench_capability_lookup,
    bench_named_lookup,
    bench_contention
);
criterion_main!(benches);
