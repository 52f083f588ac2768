use crate::{Error, Result};

/// Number of documents reported per query unless configured otherwise.
pub const DEFAULT_TOP_K: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { top_k: DEFAULT_TOP_K }
    }
}

impl SearchConfig {
    pub fn new(top_k: usize) -> Result<Self> {
        if top_k == 0 {
            return Err(Error::Config("top-k must be at least 1".into()));
        }
        Ok(Self { top_k })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Worker threads for document analysis; 0 or 1 indexes sequentially.
    pub jobs: usize,
}

impl BuildOptions {
    pub fn parallel(&self) -> bool {
        self.jobs > 1
    }
}
