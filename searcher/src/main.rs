use anyhow::{Context, Result};
use clap::Parser;
use searcher::{OutputFormat, SearchSession};
use std::path::PathBuf;
use tfidf_core::config::{SearchConfig, DEFAULT_TOP_K};
use tfidf_core::persist::IndexPaths;
use tfidf_core::tokenizer::StandardAnalyzer;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "searcher")]
#[command(about = "Rank documents for a file of free-text queries", long_about = None)]
struct Args {
    /// Dictionary file written by the indexer
    #[arg(short = 'd', long)]
    dictionary: PathBuf,
    /// Postings file written by the indexer
    #[arg(short = 'p', long)]
    postings: PathBuf,
    /// Queries, one per line
    #[arg(short = 'q', long)]
    queries: PathBuf,
    /// Results file, one line per query
    #[arg(short = 'o', long)]
    output: PathBuf,
    /// Maximum number of documents reported per query
    #[arg(long, env = "SEARCH_TOP_K", default_value_t = DEFAULT_TOP_K)]
    top_k: usize,
    /// Result line format
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,
    /// Drop English stop words from queries (must match the indexer setting)
    #[arg(long, default_value_t = false)]
    remove_stopwords: bool,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let config = SearchConfig::new(args.top_k).context("--top-k")?;
    let paths = IndexPaths::new(&args.dictionary, &args.postings);
    let analyzer = StandardAnalyzer::new().with_stopwords_removed(args.remove_stopwords);

    let mut session = SearchSession::open(&paths, analyzer, config).with_context(|| {
        format!("loading index (-d {}, -p {})", args.dictionary.display(), args.postings.display())
    })?;
    let summary = session.run_batch(&args.queries, &args.output, args.format)?;
    tracing::info!(queries = summary.queries, skipped = summary.skipped, "done");
    Ok(())
}
