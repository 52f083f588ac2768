//! Query-time TF-IDF scoring against cosine-normalized document weights.
//!
//! The query vector is weighted `(1 + log10 tf) * log10(N / df)` but is not
//! itself length-normalized; the accumulated dot product is what gets ranked.

use crate::dictionary::Dictionary;
use crate::postings::PostingsSource;
use crate::stats::log_tf;
use crate::{DocId, Error, Result};
use std::collections::{BTreeMap, HashMap};

/// Per-query accumulated score of every candidate document.
pub type Scoreboard = HashMap<DocId, f64>;

pub fn idf(total_docs: u32, document_frequency: u32) -> f64 {
    (total_docs as f64 / document_frequency as f64).log10()
}

/// Weight of each query term found in the dictionary, in term order.
///
/// Terms missing from the dictionary are dropped here; they carry no postings.
pub fn query_weights<S: AsRef<str>>(tokens: &[S], dictionary: &Dictionary) -> BTreeMap<String, f64> {
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for token in tokens {
        *counts.entry(token.as_ref()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter_map(|(term, tf)| {
            let entry = dictionary.get(term)?;
            let w = log_tf(tf) * idf(dictionary.total_docs(), entry.document_frequency);
            Some((term.to_string(), w))
        })
        .collect()
}

/// Accumulate `query_weight(t) * doc_weight(t, d)` over every query term.
///
/// Terms are visited in lexicographic order so the floating-point sums, and
/// with them the tie-breaks, come out the same on every run. Zero-weight
/// terms (present in every document) are skipped without touching postings.
pub fn score<S, P>(tokens: &[S], dictionary: &Dictionary, postings: &mut P) -> Result<Scoreboard>
where
    S: AsRef<str>,
    P: PostingsSource + ?Sized,
{
    let mut scores = Scoreboard::new();
    for (term, q_w) in query_weights(tokens, dictionary) {
        if q_w == 0.0 {
            continue;
        }
        let Some(entry) = dictionary.get(&term) else { continue };
        let list = postings.postings_at(entry.pointer)?;
        if list.len() != entry.document_frequency as usize {
            return Err(Error::MalformedIndex {
                path: postings.location(),
                reason: format!(
                    "term {term:?} has document frequency {} but {} postings at offset {}",
                    entry.document_frequency,
                    list.len(),
                    entry.pointer
                ),
            });
        }
        for p in list {
            *scores.entry(p.doc_id).or_insert(0.0) += q_w * p.weight;
        }
    }
    Ok(scores)
}
