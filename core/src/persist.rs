use crate::dictionary::{format_entry, format_header, DictionaryEntry};
use crate::index::InvertedIndex;
use crate::postings::encode_postings;
use crate::{Error, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};

/// Locations of the dictionary/postings pair.
#[derive(Debug, Clone)]
pub struct IndexPaths {
    pub dictionary: PathBuf,
    pub postings: PathBuf,
}

impl IndexPaths {
    pub fn new<D: AsRef<Path>, P: AsRef<Path>>(dictionary: D, postings: P) -> Self {
        Self { dictionary: dictionary.as_ref().to_path_buf(), postings: postings.as_ref().to_path_buf() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub terms: usize,
    pub postings_bytes: u64,
}

/// A temp file next to `target`, so the final rename stays on one filesystem.
fn temp_file_for(target: &Path) -> Result<NamedTempFile> {
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))
}

fn persist(tmp: NamedTempFile, target: &Path) -> Result<()> {
    tmp.persist(target).map_err(|e| Error::io(target, e.error))?;
    Ok(())
}

/// Move an existing `target` aside so a failed replacement can put it back.
/// The backup is deleted when dropped.
fn set_aside(target: &Path) -> Result<Option<TempPath>> {
    if !target.exists() {
        return Ok(None);
    }
    let backup = temp_file_for(target)?.into_temp_path();
    fs::rename(target, &backup).map_err(|e| Error::io(target, e))?;
    Ok(Some(backup))
}

/// Put `target` back the way [`set_aside`] found it.
fn restore(target: &Path, backup: Option<TempPath>) {
    let restored = match backup {
        Some(backup) => fs::rename(&backup, target),
        None => fs::remove_file(target),
    };
    if let Err(e) = restored {
        tracing::error!(path = %target.display(), error = %e, "cannot restore previous file");
    }
}

fn check_term(term: &str) -> Result<()> {
    if term.is_empty() || term.chars().any(char::is_whitespace) {
        return Err(Error::InvalidTerm(term.to_string()));
    }
    Ok(())
}

/// Write the dictionary and postings files in one pass over the sorted terms.
///
/// Each term's pointer is the postings byte offset before its line is
/// written. Both files go to temp files first and replace the targets only
/// once everything has been written; on error the temp files are dropped and
/// any previous index stays as it was.
pub fn write_index(paths: &IndexPaths, index: &InvertedIndex) -> Result<WriteSummary> {
    let mut dict_tmp = temp_file_for(&paths.dictionary)?;
    let mut post_tmp = temp_file_for(&paths.postings)?;

    let mut offset: u64 = 0;
    let terms = index.terms();
    {
        let mut dict = BufWriter::new(&mut dict_tmp);
        let mut post = BufWriter::new(&mut post_tmp);
        let dict_io = |e: std::io::Error| Error::io(&paths.dictionary, e);
        let post_io = |e: std::io::Error| Error::io(&paths.postings, e);

        dict.write_all(format_header(index.num_docs()).as_bytes()).map_err(dict_io)?;

        let mut line = String::new();
        for (term, postings) in &terms {
            check_term(term)?;
            line.clear();
            encode_postings(postings, &mut line);
            let entry = DictionaryEntry { document_frequency: postings.len() as u32, pointer: offset };
            post.write_all(line.as_bytes()).map_err(post_io)?;
            offset += line.len() as u64;
            dict.write_all(format_entry(term, &entry).as_bytes()).map_err(dict_io)?;
        }

        post.flush().map_err(post_io)?;
        dict.flush().map_err(dict_io)?;
    }

    if paths.dictionary.is_dir() {
        return Err(Error::io(
            &paths.dictionary,
            std::io::Error::other("dictionary target is a directory"),
        ));
    }

    // The two renames succeed or fail together: if the dictionary cannot be
    // replaced, the previous postings file goes back in place.
    let backup = set_aside(&paths.postings)?;
    if let Err(e) = persist(post_tmp, &paths.postings) {
        if let Some(backup) = backup {
            restore(&paths.postings, Some(backup));
        }
        return Err(e);
    }
    if let Err(e) = persist(dict_tmp, &paths.dictionary) {
        restore(&paths.postings, backup);
        return Err(e);
    }
    drop(backup);

    tracing::info!(
        terms = terms.len(),
        postings_bytes = offset,
        dictionary = %paths.dictionary.display(),
        postings = %paths.postings.display(),
        "index written"
    );
    Ok(WriteSummary { terms: terms.len(), postings_bytes: offset })
}

/// Replace `target` with `contents` via temp file and rename.
pub fn write_text_atomically(target: &Path, contents: &str) -> Result<()> {
    let mut tmp = temp_file_for(target)?;
    tmp.write_all(contents.as_bytes()).map_err(|e| Error::io(target, e))?;
    tmp.flush().map_err(|e| Error::io(target, e))?;
    persist(tmp, target)
}
