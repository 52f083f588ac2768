//! Postings wire format and random-access reading.
//!
//! One postings list per line: `(docID, weight)` pairs joined by `", "`,
//! terminated by `\n`. The byte offset of each line is recorded in the
//! dictionary; everything that knows about the byte layout lives in
//! [`encode_postings`] and [`decode_postings`].

use crate::{DocId, Error, Posting, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Shortest round-trip decimal form, always with a fractional part.
fn format_weight(weight: f64, out: &mut String) {
    let text = weight.to_string();
    out.push_str(&text);
    if !text.contains(['.', 'N', 'i']) {
        out.push_str(".0");
    }
}

/// Append one encoded postings line, newline included, to `out`.
pub fn encode_postings(postings: &[Posting], out: &mut String) {
    for (i, p) in postings.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&format!("({}, ", p.doc_id));
        format_weight(p.weight, out);
        out.push(')');
    }
    out.push('\n');
}

/// Decode one postings line (without its trailing newline).
pub fn decode_postings(line: &str) -> std::result::Result<Vec<Posting>, String> {
    if line.is_empty() {
        return Err("empty postings line".into());
    }
    let stripped: String = line.chars().filter(|c| !matches!(c, '(' | ')')).collect();
    let fields: Vec<&str> = stripped.split(", ").collect();
    if fields.len() % 2 != 0 {
        return Err(format!("odd number of fields ({}) in postings line", fields.len()));
    }

    fields
        .chunks_exact(2)
        .map(|pair| {
            let doc_id: DocId = pair[0]
                .parse()
                .map_err(|_| format!("invalid document id {:?}", pair[0]))?;
            let weight: f64 = pair[1]
                .parse()
                .map_err(|_| format!("invalid weight {:?}", pair[1]))?;
            if !weight.is_finite() {
                return Err(format!("non-finite weight {:?} for document {doc_id}", pair[1]));
            }
            Ok(Posting::new(doc_id, weight))
        })
        .collect()
}

/// Random access to postings lists by byte offset.
pub trait PostingsSource {
    fn postings_at(&mut self, offset: u64) -> Result<Vec<Posting>>;

    /// Where the postings come from, for error messages.
    fn location(&self) -> PathBuf {
        PathBuf::from("<postings>")
    }
}

/// Seeks into a postings file and reads exactly one line per lookup.
pub struct PostingsReader<R> {
    inner: R,
    path: PathBuf,
    line: Vec<u8>,
}

impl PostingsReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::new(BufReader::new(file), path))
    }
}

impl<R: BufRead + Seek> PostingsReader<R> {
    /// `path` only labels errors; `inner` is what gets read.
    pub fn new<P: Into<PathBuf>>(inner: R, path: P) -> Self {
        Self { inner, path: path.into(), line: Vec::new() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: BufRead + Seek> PostingsSource for PostingsReader<R> {
    fn postings_at(&mut self, offset: u64) -> Result<Vec<Posting>> {
        self.inner
            .seek(SeekFrom::Start(offset))
            .map_err(|e| Error::io(&self.path, e))?;
        self.line.clear();
        let n = self
            .inner
            .read_until(b'\n', &mut self.line)
            .map_err(|e| Error::io(&self.path, e))?;
        if n == 0 {
            return Err(Error::malformed(&self.path, format!("offset {offset} is past the end of the file")));
        }
        if self.line.last() != Some(&b'\n') {
            return Err(Error::malformed(&self.path, format!("postings line at offset {offset} is truncated")));
        }
        let text = std::str::from_utf8(&self.line[..n - 1])
            .map_err(|_| Error::malformed(&self.path, format!("postings line at offset {offset} is not UTF-8")))?;
        decode_postings(text)
            .map_err(|reason| Error::malformed(&self.path, format!("postings at offset {offset}: {reason}")))
    }

    fn location(&self) -> PathBuf {
        self.path.clone()
    }
}
