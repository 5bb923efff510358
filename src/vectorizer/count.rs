use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CountConfig;
use crate::error::{Error, Result};
use crate::utils::math::vector::SparseVector;
use crate::vectorizer::{token::TokenFrequency, VectorSpaceModel, Vocabulary};

/// Raw term-count vectorizer
///
/// Vector entries are occurrence counts of vocabulary terms. Stopwords are
/// removed before counting, and the vocabulary can be capped to the most
/// frequent terms of the corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountVectorizer {
    vocabulary: Vocabulary,
    stop_words: BTreeSet<String>,
    documents: Vec<SparseVector<u32>>,
}

impl CountVectorizer {
    pub fn fit_with_config<T>(config: &CountConfig, texts: &[T]) -> Result<Self>
    where
        T: AsRef<str>,
    {
        if texts.is_empty() {
            return Err(Error::EmptyCorpus("count vectorizer received no documents".to_string()));
        }
        let stop_words = config.stop_words.clone();
        let freqs: Vec<TokenFrequency> = texts
            .iter()
            .map(|text| count_terms(text.as_ref(), &stop_words))
            .collect();

        // total occurrences per term over the whole corpus
        let mut totals: HashMap<&str, u64> = HashMap::new();
        for freq in &freqs {
            for (token, count) in freq.iter() {
                *totals.entry(token).or_insert(0) += count as u64;
            }
        }
        if totals.is_empty() {
            return Err(Error::EmptyCorpus(format!(
                "vocabulary is empty after stopword removal ({} documents)",
                texts.len()
            )));
        }

        let mut ranked: Vec<(&str, u64)> = totals.into_iter().collect();
        if let Some(max_features) = config.max_features {
            if ranked.len() > max_features {
                debug!(terms = ranked.len(), max_features, "capping count vocabulary");
                ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
                ranked.truncate(max_features);
            }
        }
        let vocabulary = Vocabulary::from_terms(ranked.into_iter().map(|(term, _)| term));
        if vocabulary.is_empty() {
            return Err(Error::EmptyCorpus(format!(
                "vocabulary is empty after applying max_features = {:?}",
                config.max_features
            )));
        }

        let documents = freqs
            .iter()
            .map(|freq| project(&vocabulary, freq))
            .collect::<Result<Vec<_>>>()?;

        debug!(documents = documents.len(), vocabulary = vocabulary.len(), "count vectorizer fitted");
        Ok(Self { vocabulary, stop_words, documents })
    }

    pub fn stop_words(&self) -> &BTreeSet<String> {
        &self.stop_words
    }
}

fn count_terms(text: &str, stop_words: &BTreeSet<String>) -> TokenFrequency {
    let mut freq = TokenFrequency::from_text(text);
    if !stop_words.is_empty() {
        freq.remove_tokens_where(|token| stop_words.contains(token));
    }
    freq
}

fn project(vocabulary: &Vocabulary, freq: &TokenFrequency) -> Result<SparseVector<u32>> {
    SparseVector::from_pairs(
        vocabulary.len(),
        freq.iter()
            .filter_map(|(token, count)| vocabulary.index_of(token).map(|idx| (idx, count))),
    )
}

impl VectorSpaceModel for CountVectorizer {
    type Value = u32;

    /// Fit with the default [`CountConfig`]
    fn fit<T>(texts: &[T]) -> Result<Self>
    where
        T: AsRef<str>,
    {
        Self::fit_with_config(&CountConfig::default(), texts)
    }

    fn transform(&self, text: &str) -> SparseVector<u32> {
        let freq = count_terms(text, &self.stop_words);
        project(&self.vocabulary, &freq).expect("vocabulary index in range")
    }

    fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    fn document_vectors(&self) -> &[SparseVector<u32>] {
        &self.documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_occurrences() {
        let model = CountVectorizer::fit(&["кольцо серебро кольцо", "чашка"]).unwrap();
        assert_eq!(model.vocabulary().iter().collect::<Vec<_>>(), vec!["кольцо", "серебро", "чашка"]);
        let doc = &model.document_vectors()[0];
        assert_eq!(doc.dim(), 3);
        assert_eq!(doc.to_dense(), vec![2.0, 1.0, 0.0]);
    }

    #[test]
    fn removes_stop_words() {
        let config = CountConfig::new().with_stop_words(["для"]);
        let model = CountVectorizer::fit_with_config(&config, &["кольцо для мамы"]).unwrap();
        assert!(!model.vocabulary().contains("для"));
        assert_eq!(model.transform("для для кольцо").to_dense(), vec![1.0, 0.0]);
    }

    #[test]
    fn caps_vocabulary_to_most_frequent_terms() {
        let config = CountConfig::new().with_max_features(Some(2));
        let model = CountVectorizer::fit_with_config(&config, &["бб аа аа", "вв бб аа", "гг"]).unwrap();
        // aa:3, бб:2, вв:1, гг:1
        assert_eq!(model.vocabulary().iter().collect::<Vec<_>>(), vec!["аа", "бб"]);
        assert_eq!(model.document_vectors()[2].nnz(), 0);
    }

    #[test]
    fn cap_ties_break_by_term() {
        let config = CountConfig::new().with_max_features(Some(1));
        let model = CountVectorizer::fit_with_config(&config, &["яя аа"]).unwrap();
        assert_eq!(model.vocabulary().iter().collect::<Vec<_>>(), vec!["аа"]);
    }

    #[test]
    fn zero_feature_cap_fails() {
        let config = CountConfig::new().with_max_features(Some(0));
        assert!(matches!(
            CountVectorizer::fit_with_config(&config, &["кольцо серебро"]),
            Err(Error::EmptyCorpus(_))
        ));
    }

    #[test]
    fn transform_ignores_unknown_terms() {
        let model = CountVectorizer::fit(&["кольцо серебро"]).unwrap();
        let v = model.transform("золото кольцо");
        assert_eq!(v.dim(), model.dim());
        assert_eq!(v.to_dense(), vec![1.0, 0.0]);
        assert!(model.transform("несуществующее слово").is_zero());
    }

    #[test]
    fn empty_corpus_fails() {
        let texts: [&str; 0] = [];
        assert!(matches!(CountVectorizer::fit(&texts), Err(Error::EmptyCorpus(_))));
        assert!(matches!(CountVectorizer::fit(&["", " "]), Err(Error::EmptyCorpus(_))));

        let config = CountConfig::new().with_stop_words(["для"]);
        assert!(matches!(
            CountVectorizer::fit_with_config(&config, &["для"]),
            Err(Error::EmptyCorpus(_))
        ));
    }
}
