use crate::DocId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot read document {path}: {source}")]
    CorpusRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("file {name:?} in {dir} is not named by a positive integer document id")]
    InvalidDocumentName { dir: PathBuf, name: String },

    #[error("corpus directory {0} contains no documents")]
    EmptyCorpus(PathBuf),

    #[error("document {0} contains no terms; its vector length is undefined")]
    DegenerateDocument(DocId),

    #[error("document {doc_id} added after document {previous}; ids must be strictly ascending")]
    DocumentOrder { doc_id: DocId, previous: DocId },

    #[error("term {0:?} cannot be stored in the dictionary (empty or contains whitespace)")]
    InvalidTerm(String),

    #[error("malformed index file {path}: {reason}")]
    MalformedIndex { path: PathBuf, reason: String },

    #[error("query on line {line} is not valid UTF-8 text")]
    InvalidQuery { line: usize },

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::MalformedIndex { path: path.into(), reason: reason.into() }
    }

    /// True when the error means the dictionary/postings pair can no longer be
    /// trusted, so a search batch must stop rather than skip the query.
    pub fn is_index_corruption(&self) -> bool {
        matches!(self, Error::MalformedIndex { .. } | Error::Io { .. })
    }
}
