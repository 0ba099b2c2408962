//! Utility functions for path handling and file writes

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Display a path with forward slashes (cross-platform standard)
/// Converts Windows backslashes to forward slashes for consistent output
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Expand a leading `~` to the user's home directory
pub fn expand_user(raw: &str) -> PathBuf {
    if raw == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

/// Expand `~` and make the path absolute.
/// Existing paths are canonicalized (dunce avoids the UNC prefix on Windows);
/// missing ones are joined onto the current directory.
pub fn absolutize(raw: &str) -> io::Result<PathBuf> {
    let expanded = expand_user(raw);
    if let Ok(canonical) = dunce::canonicalize(&expanded) {
        return Ok(canonical);
    }
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(std::env::current_dir()?.join(expanded))
    }
}

/// Write `contents` to `path` via a temporary file in the same directory,
/// renamed over the destination once fully written.
/// Parent directories are created if needed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".tmp-")
        .tempfile_in(&parent)?;
    tmp.write_all(contents)?;
    // Keep the destination's permissions when overwriting
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Rewrite a text file in place with `transform`.
///
/// Fails with [`Error::FileNotFound`] if `path` is not an existing file.
pub fn transform_file(path: &Path, transform: impl FnOnce(&str) -> String) -> Result<()> {
    if !path.is_file() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    write_atomic(path, transform(&content).as_bytes())?;
    Ok(())
}
