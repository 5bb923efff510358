use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tf_idf_recommender::{Corpus, ItemSimilarityIndex, SearchEngine};

const WORDS: &[&str] = &[
    "кольцо", "серебряное", "золотое", "чашка", "керамическая", "цепь", "браслет", "подвеска", "ложка",
    "тарелка", "фарфор", "позолота", "жемчуг", "сапфир", "набор", "подарочный", "стекло", "хрусталь",
    "ring", "silver", "gold", "cup", "chain", "bracelet", "pendant", "spoon", "plate", "crystal",
];

/// Deterministic synthetic catalogue of `size` items
fn synthetic_corpus(size: usize) -> Corpus<usize> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };
    Corpus::from_pairs((0..size).map(|id| {
        let len = 3 + (next() % 8) as usize;
        let content: Vec<&str> = (0..len).map(|_| WORDS[(next() % WORDS.len() as u64) as usize]).collect();
        (id, content.join(" "))
    }))
}

fn similarity_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("item_similarity");
    for size in [100usize, 500, 1_000] {
        let corpus = synthetic_corpus(size);
        group.bench_with_input(BenchmarkId::new("build", size), &corpus, |b, corpus| {
            b.iter(|| {
                let mut index = ItemSimilarityIndex::default();
                index.build(corpus.clone()).unwrap();
                index
            });
        });

        let mut index = ItemSimilarityIndex::default();
        index.build(corpus).unwrap();
        group.bench_with_input(BenchmarkId::new("find_closest", size), &index, |b, index| {
            b.iter(|| index.find_closest(black_box(&(size / 2)), 10).unwrap());
        });
    }
    group.finish();
}

fn search_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    for size in [1_000usize, 10_000] {
        let corpus = synthetic_corpus(size);
        group.bench_with_input(BenchmarkId::new("build", size), &corpus, |b, corpus| {
            b.iter(|| {
                let mut engine: SearchEngine<usize> = SearchEngine::default();
                engine.build(corpus.clone()).unwrap();
                engine
            });
        });

        let mut engine: SearchEngine<usize> = SearchEngine::default();
        engine.build(corpus).unwrap();
        group.bench_with_input(BenchmarkId::new("query", size), &engine, |b, engine| {
            b.iter(|| engine.search(black_box("серебряное кольцо с жемчугом"), 10).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, similarity_benchmark, search_benchmark);
criterion_main!(benches);
