use proptest::prelude::*;

use tf_idf_recommender::{clean, Codec, Corpus, InteractionIndex, ItemSimilarityIndex, SearchEngine, UserCodec};

const WORDS: &[&str] = &["кольцо", "серебро", "золото", "чашка", "ring", "silver", "cup", "цепь"];

fn words(len: std::ops::Range<usize>) -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), len).prop_map(|words| words.join(" "))
}

fn document() -> impl Strategy<Value = String> {
    words(0..6)
}

/// at least one document is non-empty, so the vocabulary never is
fn corpus() -> impl Strategy<Value = Vec<String>> {
    (words(1..6), prop::collection::vec(document(), 0..11)).prop_map(|(first, mut rest)| {
        rest.insert(0, first);
        rest
    })
}

proptest! {
    #[test]
    fn clean_is_idempotent(text in "\\PC{0,64}") {
        let once = clean(&text);
        prop_assert_eq!(clean(&once), once);
    }

    #[test]
    fn clean_output_is_lowercase_and_single_spaced(text in "[a-zA-Zа-яА-Я0-9 ,.!_-]{0,48}") {
        let cleaned = clean(&text);
        prop_assert_eq!(cleaned.to_lowercase(), cleaned.clone());
        prop_assert!(!cleaned.contains("  "));
        prop_assert_eq!(cleaned.trim(), cleaned.as_str());
    }

    #[test]
    fn similarity_is_symmetric(docs in corpus()) {
        let mut index = ItemSimilarityIndex::default();
        index.build(Corpus::from_pairs(docs.iter().cloned().enumerate())).unwrap();
        for a in 0..docs.len() {
            for b in 0..docs.len() {
                prop_assert_eq!(index.similarity(&a, &b).unwrap(), index.similarity(&b, &a).unwrap());
            }
        }
    }

    #[test]
    fn closest_excludes_self_and_is_bounded(docs in corpus(), k in 0usize..16) {
        let mut index = ItemSimilarityIndex::default();
        index.build(Corpus::from_pairs(docs.iter().cloned().enumerate())).unwrap();
        for id in 0..docs.len() {
            let closest = index.find_closest_scored(&id, k).unwrap();
            prop_assert_eq!(closest.len(), k.min(docs.len() - 1));
            prop_assert!(closest.keys().all(|&other| other != id));
            prop_assert!(closest.list.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }

    #[test]
    fn search_scores_are_bounded(docs in corpus(), query in document(), k in 0usize..16) {
        let mut engine: SearchEngine<usize> = SearchEngine::default();
        engine.build(Corpus::from_pairs(docs.iter().cloned().enumerate())).unwrap();
        let hits = engine.search_scored(&query, k).unwrap();
        prop_assert_eq!(hits.len(), k.min(docs.len()));
        for hit in hits.iter() {
            prop_assert!((0.0..=1.0 + 1e-9).contains(&hit.score));
        }
    }

    #[test]
    fn codec_round_trips(ids in prop::collection::vec(-50i64..50, 0..40)) {
        let codec: UserCodec<i64> = Codec::from_ids(ids.iter().copied());
        for id in &ids {
            let index = codec.encode(id).unwrap();
            prop_assert_eq!(codec.decode(index).unwrap(), id);
        }
        prop_assert!(codec.iter().zip(codec.iter().skip(1)).all(|(a, b)| a < b));
    }

    #[test]
    fn interaction_index_ignores_row_order(
        triples in prop::collection::vec((0i64..6, 0i64..6), 0..24),
        seed in any::<u64>(),
    ) {
        // distinct pairs only, so "last write wins" cannot depend on order
        let mut pairs = triples;
        pairs.sort_unstable();
        pairs.dedup();
        let rows: Vec<(i64, i64, f64)> = pairs.iter().map(|&(u, i)| (u, i, (u * 10 + i) as f64)).collect();

        let mut shuffled = rows.clone();
        let mut state = seed | 1;
        for i in (1..shuffled.len()).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            shuffled.swap(i, (state % (i as u64 + 1)) as usize);
        }

        let a = InteractionIndex::from_triples(rows).unwrap();
        let b = InteractionIndex::from_triples(shuffled).unwrap();
        prop_assert_eq!(a, b);
    }
}
