use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use tfidf_core::config::SearchConfig;
use tfidf_core::dictionary::Dictionary;
use tfidf_core::persist::{write_text_atomically, IndexPaths};
use tfidf_core::postings::PostingsReader;
use tfidf_core::ranker::{format_result_line, rank, ScoredDoc};
use tfidf_core::scorer::score;
use tfidf_core::tokenizer::Analyzer;
use tfidf_core::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Space-separated document ids, best first
    #[default]
    Plain,
    /// One JSON object per query with ids and scores
    Json,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total_hits: usize,
    pub results: Vec<ScoredDoc>,
}

impl SearchResponse {
    fn empty(query: String) -> Self {
        Self { query, total_hits: 0, results: Vec::new() }
    }

    fn render(&self, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Plain => format_result_line(&self.results),
            OutputFormat::Json => serde_json::to_string(self)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub queries: usize,
    pub skipped: usize,
}

/// A loaded dictionary plus an open postings file, reused across queries.
pub struct SearchSession<A> {
    dictionary: Dictionary,
    postings: PostingsReader<BufReader<File>>,
    analyzer: A,
    config: SearchConfig,
}

impl<A: Analyzer> SearchSession<A> {
    pub fn open(paths: &IndexPaths, analyzer: A, config: SearchConfig) -> tfidf_core::Result<Self> {
        let dictionary = Dictionary::load(&paths.dictionary)?;
        let postings = PostingsReader::open(&paths.postings)?;
        tracing::info!(terms = dictionary.len(), total_docs = dictionary.total_docs(), "index loaded");
        Ok(Self { dictionary, postings, analyzer, config })
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn search(&mut self, query: &str) -> tfidf_core::Result<SearchResponse> {
        let tokens = self.analyzer.analyze(query);
        let scores = score(&tokens, &self.dictionary, &mut self.postings)?;
        let total_hits = scores.len();
        let results = rank(scores, self.config.top_k);
        Ok(SearchResponse { query: query.to_string(), total_hits, results })
    }

    /// Answer every line of `queries` and write one result line per query to
    /// `results`, in the same order.
    ///
    /// A query that cannot be answered is logged and given an empty line; an
    /// error showing the index itself is corrupt stops the batch and leaves
    /// `results` untouched.
    pub fn run_batch(&mut self, queries: &Path, results: &Path, format: OutputFormat) -> Result<BatchSummary> {
        let raw = fs::read(queries).with_context(|| format!("reading queries file {}", queries.display()))?;
        let mut lines: Vec<&[u8]> = raw.split(|b| *b == b'\n').collect();
        if raw.ends_with(b"\n") || raw.is_empty() {
            lines.pop();
        }

        let mut out = String::new();
        let mut skipped = 0;
        for (idx, &line) in lines.iter().enumerate() {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            let started = std::time::Instant::now();
            let outcome = std::str::from_utf8(line)
                .map_err(|_| Error::InvalidQuery { line: idx + 1 })
                .and_then(|q| self.search(q));
            let response = match outcome {
                Ok(response) => response,
                Err(e) if e.is_index_corruption() => {
                    return Err(e).with_context(|| format!("query on line {} of {}", idx + 1, queries.display()));
                }
                Err(e) => {
                    tracing::warn!(line = idx + 1, error = %e, "query skipped");
                    skipped += 1;
                    SearchResponse::empty(String::from_utf8_lossy(line).into_owned())
                }
            };
            tracing::debug!(
                line = idx + 1,
                hits = response.total_hits,
                took_s = started.elapsed().as_secs_f64(),
                "query answered"
            );
            out.push_str(&response.render(format)?);
            out.push('\n');
        }

        write_text_atomically(results, &out)
            .with_context(|| format!("writing results file {}", results.display()))?;
        tracing::info!(queries = lines.len(), skipped, results = %results.display(), "search complete");
        Ok(BatchSummary { queries: lines.len(), skipped })
    }
}
