use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tfidf_core::builder::build_index;
use tfidf_core::config::BuildOptions;
use tfidf_core::dictionary::Dictionary;
use tfidf_core::persist::IndexPaths;
use tfidf_core::postings::{PostingsReader, PostingsSource};
use tfidf_core::tokenizer::{Analyzer, StandardAnalyzer};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and inspect a TF-IDF dictionary/postings index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a directory of documents named by their numeric ids
    Build {
        /// Directory of documents
        #[arg(short = 'i', long)]
        input: PathBuf,
        /// Dictionary file to write
        #[arg(short = 'd', long)]
        dictionary: PathBuf,
        /// Postings file to write
        #[arg(short = 'p', long)]
        postings: PathBuf,
        /// Threads used to analyze documents; 1 indexes sequentially
        #[arg(long, env = "INDEX_JOBS", default_value_t = 1)]
        jobs: usize,
        /// Drop English stop words before weighting
        #[arg(long, default_value_t = false)]
        remove_stopwords: bool,
    },
    /// Print the dictionary entry and postings of one term
    Inspect {
        #[arg(short = 'd', long)]
        dictionary: PathBuf,
        #[arg(short = 'p', long)]
        postings: PathBuf,
        /// Raw word; it is analyzed the same way documents are
        term: String,
        #[arg(long, default_value_t = false)]
        remove_stopwords: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, dictionary, postings, jobs, remove_stopwords } => {
            let analyzer = StandardAnalyzer::new().with_stopwords_removed(remove_stopwords);
            let paths = IndexPaths::new(&dictionary, &postings);
            let summary = build_index(&input, &paths, &analyzer, &BuildOptions { jobs })
                .with_context(|| format!("indexing -i {}", input.display()))?;
            tracing::info!(
                documents = summary.documents,
                terms = summary.terms,
                postings_bytes = summary.postings_bytes,
                "index build complete"
            );
            Ok(())
        }
        Commands::Inspect { dictionary, postings, term, remove_stopwords } => {
            inspect(&IndexPaths::new(&dictionary, &postings), &term, remove_stopwords)
        }
    }
}

fn inspect(paths: &IndexPaths, raw: &str, remove_stopwords: bool) -> Result<()> {
    let analyzer = StandardAnalyzer::new().with_stopwords_removed(remove_stopwords);
    let terms = analyzer.analyze(raw);
    let [term] = terms.as_slice() else {
        bail!("{raw:?} analyzes to {} terms, expected exactly one", terms.len());
    };

    let dictionary = Dictionary::load(&paths.dictionary)
        .with_context(|| format!("loading -d {}", paths.dictionary.display()))?;
    let Some(entry) = dictionary.get(term) else {
        println!("{term}: not in dictionary ({} documents indexed)", dictionary.total_docs());
        return Ok(());
    };

    let mut reader = PostingsReader::open(&paths.postings)
        .with_context(|| format!("opening -p {}", paths.postings.display()))?;
    let list = reader.postings_at(entry.pointer)?;
    println!(
        "{term}: df={} pointer={} total_docs={}",
        entry.document_frequency,
        entry.pointer,
        dictionary.total_docs()
    );
    for p in list {
        println!("  {}\t{}", p.doc_id, p.weight);
    }
    Ok(())
}
