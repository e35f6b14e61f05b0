//! TF-IDF vectors for event text.
//!
//! Term counts come from aprender's `CountVectorizer` driven by
//! [`EventTokenizer`]; the weighting on top is
//! - idf(t) = ln((1 + N) / (1 + df(t))) + 1
//! - weight = raw term count * idf, each row L2-normalised

use aprender::AprenderError;
use aprender::primitives::{Matrix, Vector};
use aprender::text::Tokenizer;
use aprender::text::vectorize::CountVectorizer;

/// Split text into lowercase tokens of length >= 2.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(|token| token.to_lowercase())
        .collect()
}

/// Word tokenizer for event text: maximal alphanumeric/underscore runs of
/// at least two characters, lowercased.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventTokenizer;

impl Tokenizer for EventTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, AprenderError> {
        Ok(tokenize(text))
    }
}

/// A fitted TF-IDF model.
pub struct TfIdfVectorizer {
    counts: CountVectorizer,
    /// Inverse document frequency per vocabulary column
    idf: Vec<f64>,
}

impl TfIdfVectorizer {
    /// Fit vocabulary and idf weights on a set of documents.
    ///
    /// Fails when `documents` is empty or yields no tokens at all.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Result<Self, AprenderError> {
        let mut counts = CountVectorizer::new().with_tokenizer(Box::new(EventTokenizer));
        let matrix = counts.fit_transform(documents)?;

        let (n_documents, n_terms) = matrix.shape();
        let idf = (0..n_terms)
            .map(|col| {
                let df = (0..n_documents).filter(|&row| matrix.get(row, col) > 0.0).count();
                ((1.0 + n_documents as f64) / (1.0 + df as f64)).ln() + 1.0
            })
            .collect();

        Ok(Self { counts, idf })
    }

    /// Project documents into the fitted feature space, one row each.
    ///
    /// Terms outside the vocabulary are ignored; a document with no known
    /// terms maps to the zero vector.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<Vec<Vector<f64>>, AprenderError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        let matrix: Matrix<f64> = self.counts.transform(documents)?;

        Ok((0..matrix.n_rows())
            .map(|row| {
                let mut weights: Vec<f64> = self
                    .idf
                    .iter()
                    .enumerate()
                    .map(|(col, idf)| matrix.get(row, col) * idf)
                    .collect();
                let norm = weights.iter().map(|v| v * v).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for value in &mut weights {
                        *value /= norm;
                    }
                }
                Vector::from_vec(weights)
            })
            .collect())
    }

    #[cfg(test)]
    fn column_of(&self, term: &str) -> Option<usize> {
        self.counts.vocabulary().get(term).copied()
    }
}
