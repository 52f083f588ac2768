//! Corpus discovery and the indexing pipeline: read each document, analyze
//! it, compute its normalized term weights, accumulate postings and write
//! the dictionary/postings pair.

use crate::config::BuildOptions;
use crate::index::InvertedIndex;
use crate::persist::{write_index, IndexPaths};
use crate::stats::DocumentVector;
use crate::tokenizer::Analyzer;
use crate::{DocId, Error, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Documents analyzed in parallel before their results are merged.
const PARALLEL_CHUNK: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusDocument {
    pub doc_id: DocId,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub documents: u32,
    pub terms: usize,
    pub postings_bytes: u64,
}

/// List the documents of `dir`, sorted by ascending document id.
///
/// Every regular file must be named by a positive integer; hidden files such
/// as `.DS_Store` are ignored. Subdirectories are not descended into.
pub fn discover_corpus(dir: &Path) -> Result<Vec<CorpusDocument>> {
    if !dir.is_dir() {
        return Err(Error::Config(format!("input {} is not a directory", dir.display())));
    }

    let mut docs = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| Error::CorpusRead {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            tracing::debug!(file = %entry.path().display(), "skipping hidden file");
            continue;
        }
        if !entry.file_type().is_file() {
            tracing::debug!(path = %entry.path().display(), "skipping non-file entry");
            continue;
        }
        let doc_id = name
            .parse::<DocId>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| Error::InvalidDocumentName { dir: dir.to_path_buf(), name: name.to_string() })?;
        docs.push(CorpusDocument { doc_id, path: entry.into_path() });
    }

    if docs.is_empty() {
        return Err(Error::EmptyCorpus(dir.to_path_buf()));
    }
    docs.sort_by_key(|d| d.doc_id);
    if let Some(pair) = docs.windows(2).find(|w| w[0].doc_id == w[1].doc_id) {
        return Err(Error::Config(format!(
            "{} and {} both name document {}",
            pair[0].path.display(),
            pair[1].path.display(),
            pair[0].doc_id
        )));
    }
    Ok(docs)
}

/// Read, analyze and weight one document.
pub fn analyze_document<A: Analyzer + ?Sized>(doc: &CorpusDocument, analyzer: &A) -> Result<DocumentVector> {
    let text = fs::read_to_string(&doc.path)
        .map_err(|source| Error::CorpusRead { path: doc.path.clone(), source })?;
    let tokens = analyzer.analyze(&text);
    let vector = DocumentVector::from_tokens(doc.doc_id, &tokens)?;
    tracing::debug!(doc_id = doc.doc_id, tokens = tokens.len(), terms = vector.num_terms(), "document analyzed");
    Ok(vector)
}

/// Accumulate postings for `docs`, which must be in ascending id order.
///
/// With `jobs > 1`, documents are analyzed on a rayon pool a chunk at a time;
/// each chunk's vectors come back in input order and are merged by this
/// thread alone, so the result matches a sequential run exactly.
pub fn build_inverted_index<A: Analyzer + ?Sized>(
    docs: &[CorpusDocument],
    analyzer: &A,
    options: &BuildOptions,
) -> Result<InvertedIndex> {
    let mut index = InvertedIndex::new();

    if !options.parallel() {
        for doc in docs {
            index.add_document(analyze_document(doc, analyzer)?)?;
        }
        return Ok(index);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs)
        .build()
        .map_err(|e| Error::Config(format!("cannot start {} indexing threads: {e}", options.jobs)))?;
    for chunk in docs.chunks(PARALLEL_CHUNK) {
        let vectors = pool.install(|| {
            chunk
                .par_iter()
                .map(|doc| analyze_document(doc, analyzer))
                .collect::<Result<Vec<_>>>()
        })?;
        for vector in vectors {
            index.add_document(vector)?;
        }
    }
    Ok(index)
}

/// Index every document under `input_dir` and write the result to `paths`.
pub fn build_index<A: Analyzer + ?Sized>(
    input_dir: &Path,
    paths: &IndexPaths,
    analyzer: &A,
    options: &BuildOptions,
) -> Result<BuildSummary> {
    let docs = discover_corpus(input_dir)?;
    tracing::info!(documents = docs.len(), jobs = options.jobs, input = %input_dir.display(), "indexing corpus");

    let index = build_inverted_index(&docs, analyzer, options)?;
    tracing::info!(num_docs = index.num_docs(), num_terms = index.num_terms(), "ingested documents");

    let written = write_index(paths, &index)?;
    Ok(BuildSummary { documents: index.num_docs(), terms: written.terms, postings_bytes: written.postings_bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::StandardAnalyzer;
    use tempfile::tempdir;

    #[test]
    fn discovers_in_numeric_order() {
        let dir = tempdir().unwrap();
        for name in ["10", "2", "1", ".DS_Store"] {
            fs::write(dir.path().join(name), "text").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();
        let ids: Vec<DocId> = discover_corpus(dir.path()).unwrap().iter().map(|d| d.doc_id).collect();
        assert_eq!(ids, vec![1, 2, 10]);
    }

    #[test]
    fn rejects_non_numeric_names() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("1"), "text").unwrap();
        fs::write(dir.path().join("readme.txt"), "text").unwrap();
        match discover_corpus(dir.path()) {
            Err(Error::InvalidDocumentName { name, .. }) => assert_eq!(name, "readme.txt"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_and_duplicate_ids() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("0"), "text").unwrap();
        assert!(matches!(discover_corpus(dir.path()), Err(Error::InvalidDocumentName { .. })));

        let dir = tempdir().unwrap();
        fs::write(dir.path().join("7"), "text").unwrap();
        fs::write(dir.path().join("007"), "text").unwrap();
        assert!(matches!(discover_corpus(dir.path()), Err(Error::Config(_))));
    }

    #[test]
    fn empty_or_missing_corpus() {
        let dir = tempdir().unwrap();
        assert!(matches!(discover_corpus(dir.path()), Err(Error::EmptyCorpus(_))));
        assert!(matches!(discover_corpus(&dir.path().join("nope")), Err(Error::Config(_))));
    }

    #[test]
    fn empty_document_aborts_indexing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("1"), "words here").unwrap();
        fs::write(dir.path().join("2"), "  ... !! ").unwrap();
        let docs = discover_corpus(dir.path()).unwrap();
        let err = build_inverted_index(&docs, &StandardAnalyzer::new(), &BuildOptions::default()).unwrap_err();
        assert!(matches!(err, Error::DegenerateDocument(2)));
    }

    #[test]
    fn parallel_matches_sequential() {
        let dir = tempdir().unwrap();
        for id in 1..=40u32 {
            let text = format!("doc {id} shares words with doc {} and has term{} term{}", id + 1, id % 7, id % 3);
            fs::write(dir.path().join(id.to_string()), text).unwrap();
        }
        let docs = discover_corpus(dir.path()).unwrap();
        let analyzer = StandardAnalyzer::new();
        let seq = build_inverted_index(&docs, &analyzer, &BuildOptions { jobs: 1 }).unwrap();
        let par = build_inverted_index(&docs, &analyzer, &BuildOptions { jobs: 4 }).unwrap();
        assert_eq!(seq.num_docs(), par.num_docs());
        assert_eq!(seq.terms(), par.terms());
    }
}
