//! Dictionary file: a `Total_number_of_document: N` header followed by one
//! `<term> <df> <pointer>` line per term, in lexicographic term order.

use crate::{Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub const TOTAL_DOCS_HEADER: &str = "Total_number_of_document:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub document_frequency: u32,
    /// Byte offset of the term's line in the postings file.
    pub pointer: u64,
}

pub fn format_header(total_docs: u32) -> String {
    format!("{TOTAL_DOCS_HEADER} {total_docs}\n")
}

pub fn format_entry(term: &str, entry: &DictionaryEntry) -> String {
    format!("{} {} {}\n", term, entry.document_frequency, entry.pointer)
}

/// The loaded dictionary: exact-match lookup of term -> (df, pointer).
#[derive(Debug, Default)]
pub struct Dictionary {
    entries: HashMap<String, DictionaryEntry>,
    total_docs: u32,
}

impl Dictionary {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Self::parse(BufReader::new(file), path)
    }

    /// Parse a whole dictionary. `path` names the source in errors.
    pub fn parse<R: BufRead>(reader: R, path: &Path) -> Result<Self> {
        let mut lines = reader.lines().enumerate();

        let total_docs = match lines.next() {
            Some((_, line)) => {
                let line = line.map_err(|e| Error::io(path, e))?;
                parse_header(&line).ok_or_else(|| {
                    Error::malformed(path, format!("line 1: expected `{TOTAL_DOCS_HEADER} <N>`, found {line:?}"))
                })?
            }
            None => return Err(Error::malformed(path, "file is empty")),
        };

        let mut entries = HashMap::new();
        for (idx, line) in lines {
            let line = line.map_err(|e| Error::io(path, e))?;
            let lineno = idx + 1;
            if line.is_empty() {
                continue;
            }
            let (term, entry) = parse_entry(&line)
                .map_err(|reason| Error::malformed(path, format!("line {lineno}: {reason}")))?;
            if entry.document_frequency == 0 || entry.document_frequency > total_docs {
                return Err(Error::malformed(
                    path,
                    format!(
                        "line {lineno}: document frequency {} of {term:?} outside 1..={total_docs}",
                        entry.document_frequency
                    ),
                ));
            }
            if entries.insert(term.to_string(), entry).is_some() {
                return Err(Error::malformed(path, format!("line {lineno}: duplicate term {term:?}")));
            }
        }

        tracing::debug!(terms = entries.len(), total_docs, path = %path.display(), "dictionary loaded");
        Ok(Self { entries, total_docs })
    }

    pub fn get(&self, term: &str) -> Option<&DictionaryEntry> {
        self.entries.get(term)
    }

    pub fn total_docs(&self) -> u32 { self.total_docs }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DictionaryEntry)> {
        self.entries.iter().map(|(t, e)| (t.as_str(), e))
    }
}

fn parse_header(line: &str) -> Option<u32> {
    let rest = line.strip_prefix(TOTAL_DOCS_HEADER)?;
    rest.strip_prefix(' ')?.parse().ok()
}

fn parse_entry(line: &str) -> std::result::Result<(&str, DictionaryEntry), String> {
    let fields: Vec<&str> = line.split(' ').collect();
    let &[term, df, pointer] = fields.as_slice() else {
        return Err(format!("expected 3 space-separated fields, found {}", fields.len()));
    };
    if term.is_empty() {
        return Err("empty term".into());
    }
    let document_frequency = df
        .parse()
        .map_err(|_| format!("document frequency {df:?} of {term:?} is not an integer"))?;
    let pointer = pointer
        .parse()
        .map_err(|_| format!("pointer {pointer:?} of {term:?} is not an integer offset"))?;
    Ok((term, DictionaryEntry { document_frequency, pointer }))
}
