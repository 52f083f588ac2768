//! Per-document term statistics: log-dampened term frequency and cosine
//! length normalization.

use crate::{DocId, Error, Result};
use std::collections::BTreeMap;

/// `1 + log10(raw_count)`; `raw_count` is at least 1 for any term drawn from
/// the document itself.
pub fn log_tf(raw_count: u32) -> f64 {
    1.0 + (raw_count as f64).log10()
}

/// Normalized term weights of one document, ready to be appended to postings.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentVector {
    pub doc_id: DocId,
    /// Euclidean norm of the unnormalized log-tf vector.
    pub length: f64,
    /// term -> tf_weight / length, in term order.
    pub weights: BTreeMap<String, f64>,
}

impl DocumentVector {
    /// Build the vector from the document's analyzed tokens.
    ///
    /// Fails with [`Error::DegenerateDocument`] when there are no tokens, since
    /// the length would be zero and every weight NaN.
    pub fn from_tokens<S: AsRef<str>>(doc_id: DocId, tokens: &[S]) -> Result<Self> {
        if tokens.is_empty() {
            return Err(Error::DegenerateDocument(doc_id));
        }

        // Ordered so the norm is summed in the same order on every run.
        let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
        for token in tokens {
            *counts.entry(token.as_ref()).or_insert(0) += 1;
        }

        let tf: Vec<(&str, f64)> = counts.into_iter().map(|(term, n)| (term, log_tf(n))).collect();
        let length = tf.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();

        let weights = tf
            .into_iter()
            .map(|(term, w)| (term.to_string(), w / length))
            .collect();

        Ok(Self { doc_id, length, weights })
    }

    pub fn num_terms(&self) -> usize {
        self.weights.len()
    }
}
