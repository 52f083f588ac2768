//! Static TF-IDF inverted index: the indexing pipeline, the on-disk
//! dictionary/postings pair and the cosine scoring used by the searcher.

pub mod builder;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod index;
pub mod persist;
pub mod postings;
pub mod ranker;
pub mod scorer;
pub mod stats;
pub mod tokenizer;

pub use error::{Error, Result};

pub type DocId = u32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Posting {
    pub doc_id: DocId,
    pub weight: f64, // cosine-normalized log tf
}

impl Posting {
    pub fn new(doc_id: DocId, weight: f64) -> Self {
        Self { doc_id, weight }
    }
}
