use tf_idf_recommender::{Corpus, InteractionIndex, ItemSimilarityIndex, SearchEngine};
use tracing_subscriber::EnvFilter;

fn main() -> tf_idf_recommender::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // build corpus
    let corpus = Corpus::from_pairs([
        ("p1", "кольцо серебряное"),
        ("p2", "кольцо золотое"),
        ("p3", "чашка керамическая"),
        ("p4", "чашка фарфоровая с позолотой"),
    ]);

    // similar items
    let mut similar = ItemSimilarityIndex::default();
    similar.build(corpus.clone())?;
    println!("Similar to p1: \n{}", similar.find_closest_scored(&"p1", 2)?);

    // free-text search
    let mut engine: SearchEngine<&str> = SearchEngine::default();
    engine.build(corpus)?;
    let result = engine.search_scored("Серебряное КОЛЬЦО!", 3)?;
    println!("Search Results: \n{}", result);
    println!("{:#?}", result);

    // interactions
    let interactions = InteractionIndex::from_triples(vec![("u1", "p1", 1.0), ("u2", "p1", 2.0), ("u1", "p3", 1.0)])?;
    println!(
        "{} users x {} items, {} interactions",
        interactions.user_count(),
        interactions.item_count(),
        interactions.matrix().nnz()
    );
    println!("u1 bought: {:?}", interactions.interactions_of(&"u1")?);
    Ok(())
}
