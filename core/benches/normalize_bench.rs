use criterion::{criterion_group, criterion_main, Criterion};
use dapur_core::normalize::normalize;

fn bench_normalize(c: &mut Criterion) {
    let text = "I have 2 cups of long-grain rice, three eggs, some soy sauce, \
                spring onions, minced garlic and a knob of butter left over from yesterday.";
    c.bench_function("normalize_query", |b| b.iter(|| normalize(text)));
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
