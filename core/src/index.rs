use crate::stats::DocumentVector;
use crate::{DocId, Error, Posting, Result};
use std::collections::HashMap;

/// Postings and document frequencies accumulated over the whole corpus.
///
/// Documents must arrive in strictly ascending id order, so each postings
/// list is sorted by doc id and never holds the same document twice. The
/// document frequency of a term is the length of its postings list.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<Posting>>, // postings sorted by doc_id
    num_docs: u32,
    last_doc: Option<DocId>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    pub fn add_document(&mut self, doc: DocumentVector) -> Result<()> {
        if let Some(previous) = self.last_doc {
            if doc.doc_id <= previous {
                return Err(Error::DocumentOrder { doc_id: doc.doc_id, previous });
            }
        }
        for (term, weight) in doc.weights {
            self.postings.entry(term).or_default().push(Posting::new(doc.doc_id, weight));
        }
        self.last_doc = Some(doc.doc_id);
        self.num_docs += 1;
        Ok(())
    }

    pub fn num_docs(&self) -> u32 { self.num_docs }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn document_frequency(&self, term: &str) -> Option<u32> {
        self.postings.get(term).map(|p| p.len() as u32)
    }

    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    /// Terms with their postings in lexicographic term order.
    pub fn terms(&self) -> Vec<(&str, &[Posting])> {
        let mut terms: Vec<(&str, &[Posting])> = self
            .postings
            .iter()
            .map(|(t, p)| (t.as_str(), p.as_slice()))
            .collect();
        terms.sort_unstable_by(|a, b| a.0.cmp(b.0));
        terms
    }
}
