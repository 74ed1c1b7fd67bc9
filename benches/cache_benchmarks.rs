use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quest_core::cache::{CacheOptions, TaggedCache};

fn benchmark_cache_hit(c: &mut Criterion) {
    let cache = TaggedCache::new();
    cache
        .set("users:1", &"ada", &CacheOptions::new().with_tag("users"))
        .unwrap();

    c.bench_function("cache_hit", |b| {
        b.iter(|| cache.get::<String>(black_box("users:1")).unwrap())
    });
}

fn benchmark_cache_miss(c: &mut Criterion) {
    let cache = TaggedCache::new();

    c.bench_function("cache_miss", |b| {
        b.iter(|| cache.get::<String>(black_box("users:missing")).unwrap())
    });
}

fn benchmark_tagged_set(c: &mut Criterion) {
    let cache = TaggedCache::new();
    let options = CacheOptions::new().with_tags(["challenges", "challenges:42"]);

    c.bench_function("tagged_set_overwrite", |b| {
        b.iter(|| cache.set(black_box("challenges:42"), &42u32, &options).unwrap())
    });
}

fn benchmark_invalidate_by_tag(c: &mut Criterion) {
    let cache = TaggedCache::new();
    let options = CacheOptions::new().with_tag("leaderboard");

    c.bench_function("invalidate_by_tag_100", |b| {
        b.iter(|| {
            for rank in 0..100 {
                cache
                    .set(&format!("leaderboard:{rank}"), &rank, &options)
                    .unwrap();
            }
            cache.invalidate_by_tag(black_box("leaderboard"))
        })
    });
}

criterion_group!(
    benches,
    benchmark_cache_hit,
    benchmark_cache_miss,
    benchmark_tagged_set,
    benchmark_invalidate_by_tag
);
criterion_main!(benches);
