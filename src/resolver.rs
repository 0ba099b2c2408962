//! Drawing file resolution module
//!
//! Resolves a drawing reference to an existing file.
//!
//! Resolution rules (in order):
//! 1. Absolute reference that exists → itself
//! 2. Each search directory joined with the reference
//! 3. Reference lacking `.tldr` → retry 1-2 with the extension appended
//!
//! Search directories: note's directory, configured directories, current
//! working directory. Results are cached for the life of the resolver.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::constants::TLDR_EXTENSION;
use crate::embed::has_tldr_extension;
use crate::error::{Error, Result};

/// Ordered, de-duplicated list of directories consulted during resolution
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Build the search path: `note_dir`, then `extra` in order, then `cwd`.
    /// Later duplicates are dropped.
    pub fn new(note_dir: &Path, extra: &[PathBuf], cwd: &Path) -> Self {
        let mut dirs: Vec<PathBuf> = Vec::with_capacity(extra.len() + 2);
        for dir in std::iter::once(note_dir)
            .chain(extra.iter().map(PathBuf::as_path))
            .chain(std::iter::once(cwd))
        {
            if !dirs.iter().any(|d| d == dir) {
                dirs.push(dir.to_path_buf());
            }
        }
        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

/// Resolves references against a fixed [`SearchPath`], memoizing results
#[derive(Debug)]
pub struct FileResolver {
    search_path: SearchPath,
    cache: HashMap<String, PathBuf>,
}

impl FileResolver {
    pub fn new(search_path: SearchPath) -> Self {
        Self {
            search_path,
            cache: HashMap::new(),
        }
    }

    /// Resolve a reference to an existing path.
    ///
    /// Once resolved, the same reference always yields the same path for
    /// the remainder of the run, even if the filesystem changes.
    pub fn resolve(&mut self, reference: &str) -> Result<PathBuf> {
        if let Some(cached) = self.cache.get(reference) {
            return Ok(cached.clone());
        }

        let found = self.find(reference).or_else(|| {
            if has_tldr_extension(reference) {
                return None;
            }
            let with_ext = format!("{}.{}", reference, TLDR_EXTENSION);
            if let Some(cached) = self.cache.get(&with_ext) {
                return Some(cached.clone());
            }
            let found = self.find(&with_ext)?;
            self.cache.insert(with_ext, found.clone());
            Some(found)
        });

        match found {
            Some(path) => {
                debug!(reference, path = %path.display(), "resolved drawing");
                self.cache.insert(reference.to_string(), path.clone());
                Ok(path)
            }
            None => Err(Error::Resolution {
                reference: reference.to_string(),
                tried: self.search_path.dirs.clone(),
            }),
        }
    }

    /// First existing candidate for `reference`, without retries
    fn find(&self, reference: &str) -> Option<PathBuf> {
        let path = Path::new(reference);
        if path.is_absolute() {
            return path.exists().then(|| path.to_path_buf());
        }

        self.search_path
            .dirs
            .iter()
            .map(|dir| dir.join(path))
            .find(|candidate| candidate.exists())
    }
}
