use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::utils::math::vector::SparseVector;
use crate::vectorizer::{token::TokenFrequency, VectorSpaceModel, Vocabulary};

/// TF-IDF vectorizer
///
/// weight(t, d) = count(t, d) * idf(t)
/// idf(t)       = ln((1 + n) / (1 + df(t))) + 1
///
/// Each vector is scaled to unit L2 norm (zero vectors stay zero), so the
/// dot product of two fitted vectors equals their cosine similarity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: Vocabulary,
    /// idf per vocabulary index
    idf: Vec<f64>,
    documents: Vec<SparseVector<f64>>,
}

impl TfidfVectorizer {
    /// smoothed inverse document frequency
    #[inline]
    pub fn idf_calc(doc_num: usize, doc_freq: usize) -> f64 {
        ((1.0 + doc_num as f64) / (1.0 + doc_freq as f64)).ln() + 1.0
    }

    /// idf weight of vocabulary column `index`
    pub fn idf(&self, index: usize) -> Option<f64> {
        self.idf.get(index).copied()
    }

    pub fn idf_vec(&self) -> &[f64] {
        &self.idf
    }

    fn weigh(&self, freq: &TokenFrequency) -> SparseVector<f64> {
        let pairs = freq.iter().filter_map(|(token, count)| {
            self.vocabulary
                .index_of(token)
                .map(|idx| (idx, count as f64 * self.idf[idx]))
        });
        let weighted =
            SparseVector::from_pairs(self.vocabulary.len(), pairs).expect("vocabulary index in range");
        l2_normalize(&weighted)
    }
}

fn l2_normalize(vec: &SparseVector<f64>) -> SparseVector<f64> {
    let norm = vec.norm();
    if norm == 0.0 {
        return vec.clone();
    }
    vec.map_values(|_, v| v / norm)
}

impl VectorSpaceModel for TfidfVectorizer {
    type Value = f64;

    fn fit<T>(texts: &[T]) -> Result<Self>
    where
        T: AsRef<str>,
    {
        if texts.is_empty() {
            return Err(Error::EmptyCorpus("tf-idf vectorizer received no documents".to_string()));
        }
        let freqs: Vec<TokenFrequency> = texts
            .iter()
            .map(|text| TokenFrequency::from_text(text.as_ref()))
            .collect();

        let vocabulary = Vocabulary::from_terms(
            freqs.iter().flat_map(|freq| freq.iter().map(|(token, _)| token)),
        );
        if vocabulary.is_empty() {
            return Err(Error::EmptyCorpus(format!(
                "vocabulary is empty ({} documents, all without terms)",
                texts.len()
            )));
        }

        let mut doc_freq = vec![0usize; vocabulary.len()];
        for freq in &freqs {
            for (token, _) in freq.iter() {
                if let Some(idx) = vocabulary.index_of(token) {
                    doc_freq[idx] += 1;
                }
            }
        }
        let idf = doc_freq
            .iter()
            .map(|&df| Self::idf_calc(texts.len(), df))
            .collect();

        let mut model = Self {
            vocabulary,
            idf,
            documents: Vec::new(),
        };
        model.documents = freqs.iter().map(|freq| model.weigh(freq)).collect();

        debug!(
            documents = model.documents.len(),
            vocabulary = model.vocabulary.len(),
            "tf-idf vectorizer fitted"
        );
        Ok(model)
    }

    fn transform(&self, text: &str) -> SparseVector<f64> {
        self.weigh(&TokenFrequency::from_text(text))
    }

    fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    fn document_vectors(&self) -> &[SparseVector<f64>] {
        &self.documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn idf_is_smoothed() {
        assert!((TfidfVectorizer::idf_calc(3, 1) - (2.0f64.ln() + 1.0)).abs() < EPS);
        assert!((TfidfVectorizer::idf_calc(3, 3) - 1.0).abs() < EPS);
    }

    #[test]
    fn rarer_terms_weigh_more() {
        let model = TfidfVectorizer::fit(&["кольцо серебряное", "кольцо золотое"]).unwrap();
        let common = model.vocabulary().index_of("кольцо").unwrap();
        let rare = model.vocabulary().index_of("золотое").unwrap();
        assert!(model.idf(rare).unwrap() > model.idf(common).unwrap());

        let doc = &model.document_vectors()[1];
        assert!(doc.get(rare) > doc.get(common));
    }

    #[test]
    fn document_vectors_have_unit_norm() {
        let model = TfidfVectorizer::fit(&["кольцо серебряное кольцо", "чашка", ""]).unwrap();
        let docs = model.document_vectors();
        assert!((docs[0].norm() - 1.0).abs() < EPS);
        assert!((docs[1].norm() - 1.0).abs() < EPS);
        // an empty document stays the zero vector
        assert!(docs[2].is_zero());
        assert_eq!(docs[2].dim(), model.dim());
    }

    #[test]
    fn transform_matches_fitted_vectors() {
        let texts = ["кольцо серебряное", "чашка керамическая"];
        let model = TfidfVectorizer::fit(&texts).unwrap();
        assert_eq!(model.transform(texts[0]), model.document_vectors()[0]);
        assert!(model.transform("несуществующее слово").is_zero());
    }

    #[test]
    fn empty_inputs_fail() {
        let texts: [String; 0] = [];
        assert!(matches!(TfidfVectorizer::fit(&texts), Err(Error::EmptyCorpus(_))));
        assert!(matches!(TfidfVectorizer::fit(&["", "a 1"]), Err(Error::EmptyCorpus(_))));
    }

    #[test]
    fn survives_a_cbor_snapshot() {
        let model = TfidfVectorizer::fit(&["кольцо серебряное", "кольцо золотое"]).unwrap();
        let bytes = serde_cbor::to_vec(&model).unwrap();
        let restored: TfidfVectorizer = serde_cbor::from_slice(&bytes).unwrap();
        assert_eq!(restored.vocabulary(), model.vocabulary());
        assert_eq!(restored.transform("серебряное кольцо"), model.transform("серебряное кольцо"));
    }
}
