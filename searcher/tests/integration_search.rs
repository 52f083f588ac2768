use searcher::{OutputFormat, SearchSession};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tfidf_core::builder::build_index;
use tfidf_core::config::{BuildOptions, SearchConfig};
use tfidf_core::persist::IndexPaths;
use tfidf_core::tokenizer::StandardAnalyzer;
use tfidf_core::Error;

fn build_tiny_index(dir: &Path) -> IndexPaths {
    let corpus = dir.join("corpus");
    fs::create_dir_all(&corpus).unwrap();
    fs::write(corpus.join("1"), "the cat sat").unwrap();
    fs::write(corpus.join("2"), "the cat ran").unwrap();
    fs::write(corpus.join("3"), "the dog barked").unwrap();

    let paths = IndexPaths::new(dir.join("dictionary.txt"), dir.join("postings.txt"));
    build_index(&corpus, &paths, &StandardAnalyzer::new(), &BuildOptions::default()).unwrap();
    paths
}

fn open(paths: &IndexPaths, top_k: usize) -> SearchSession<StandardAnalyzer> {
    SearchSession::open(paths, StandardAnalyzer::new(), SearchConfig::new(top_k).unwrap()).unwrap()
}

#[test]
fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    let paths = build_tiny_index(dir.path());
    let mut session = open(&paths, 10);

    let resp = session.search("Cats").unwrap();
    let ids: Vec<u32> = resp.results.iter().map(|d| d.doc_id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(resp.results[0].score, resp.results[1].score);

    let resp = session.search("barking dog").unwrap();
    assert_eq!(resp.results[0].doc_id, 3);
    assert_eq!(resp.total_hits, 1);
}

#[test]
fn batch_writes_one_line_per_query() {
    let dir = tempdir().unwrap();
    let paths = build_tiny_index(dir.path());
    let queries = dir.path().join("queries.txt");
    let results = dir.path().join("results.txt");
    fs::write(&queries, "cat\ngiraffe\n\nthe cat\nthe\ncat ran\n").unwrap();

    let summary = open(&paths, 10).run_batch(&queries, &results, OutputFormat::Plain).unwrap();
    assert_eq!(summary.queries, 6);
    assert_eq!(summary.skipped, 0);
    assert_eq!(fs::read_to_string(&results).unwrap(), "1 2\n\n\n1 2\n\n2 1\n");
}

#[test]
fn batch_is_repeatable() {
    let dir = tempdir().unwrap();
    let paths = build_tiny_index(dir.path());
    let queries = dir.path().join("queries.txt");
    fs::write(&queries, "cat dog\nsat ran barked\n").unwrap();

    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");
    open(&paths, 10).run_batch(&queries, &first, OutputFormat::Plain).unwrap();
    open(&paths, 10).run_batch(&queries, &second, OutputFormat::Plain).unwrap();
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    assert_eq!(fs::read_to_string(&first).unwrap().lines().nth(1), Some("1 2 3"));
}

#[test]
fn top_k_limits_results() {
    let dir = tempdir().unwrap();
    let paths = build_tiny_index(dir.path());
    let resp = open(&paths, 1).search("sat ran barked").unwrap();
    assert_eq!(resp.total_hits, 3);
    assert_eq!(resp.results.len(), 1);
    assert_eq!(resp.results[0].doc_id, 1);
}

#[test]
fn invalid_utf8_query_gets_empty_line() {
    let dir = tempdir().unwrap();
    let paths = build_tiny_index(dir.path());
    let queries = dir.path().join("queries.txt");
    let results = dir.path().join("results.txt");
    fs::write(&queries, b"cat\n\xff\xfe\ndog\n").unwrap();

    let summary = open(&paths, 10).run_batch(&queries, &results, OutputFormat::Plain).unwrap();
    assert_eq!(summary.skipped, 1);
    assert_eq!(fs::read_to_string(&results).unwrap(), "1 2\n\n3\n");
}

#[test]
fn json_output_carries_scores() {
    let dir = tempdir().unwrap();
    let paths = build_tiny_index(dir.path());
    let queries = dir.path().join("queries.txt");
    let results = dir.path().join("results.jsonl");
    fs::write(&queries, "cat\ngiraffe\n").unwrap();

    open(&paths, 10).run_batch(&queries, &results, OutputFormat::Json).unwrap();
    let text = fs::read_to_string(&results).unwrap();
    let lines: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["query"], "cat");
    assert_eq!(lines[0]["total_hits"], 2);
    let arr = lines[0]["results"].as_array().unwrap();
    assert_eq!(arr[0]["doc_id"].as_u64(), Some(1));
    assert!(arr[0]["score"].as_f64().unwrap() > 0.0);
    assert!(lines[1]["results"].as_array().unwrap().is_empty());
}

#[test]
fn corrupt_postings_abort_the_batch() {
    let dir = tempdir().unwrap();
    let paths = build_tiny_index(dir.path());
    fs::write(&paths.postings, "garbage\n").unwrap();
    let queries = dir.path().join("queries.txt");
    let results = dir.path().join("results.txt");
    fs::write(&queries, "giraffe\ncat\n").unwrap();

    let err = open(&paths, 10).run_batch(&queries, &results, OutputFormat::Plain).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::MalformedIndex { .. })));
    assert!(!results.exists());
}

#[test]
fn malformed_dictionary_fails_to_open() {
    let dir = tempdir().unwrap();
    let paths = build_tiny_index(dir.path());
    fs::write(&paths.dictionary, "Total_number_of_document: 3\ncat 2\n").unwrap();
    let err = SearchSession::open(&paths, StandardAnalyzer::new(), SearchConfig::default()).err().unwrap();
    assert!(matches!(err, Error::MalformedIndex { .. }));
}
