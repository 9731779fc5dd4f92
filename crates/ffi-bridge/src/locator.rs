//! Native library discovery
//!
//! Maps the current platform to the shared library filename and probes an
//! ordered list of candidate directories for it. Nothing here touches the
//! file system except `is_file` checks.

use bunsenite_core::{
    Error, Platform, Result, LIBRARY_BASE_NAME, LIBRARY_REMEDIATION, LIBRARY_SEARCH_DIRS,
};
use std::path::{Path, PathBuf};

/// Resolves the compiled engine library from a fixed list of candidate directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryLocator {
    /// Directory the relative search entries are joined onto
    base_dir: PathBuf,
    /// Library name without platform prefix or extension
    base_name: String,
    platform: Platform,
    /// Searched in order; first existing file wins
    search_dirs: Vec<PathBuf>,
}

impl LibraryLocator {
    /// Locator rooted at the current working directory
    pub fn new() -> Self {
        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            base_dir,
            base_name: LIBRARY_BASE_NAME.to_string(),
            platform: Platform::current(),
            search_dirs: LIBRARY_SEARCH_DIRS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Set the directory candidate locations are resolved against
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Set the library name (without `lib` prefix or extension)
    pub fn base_name(mut self, name: impl Into<String>) -> Self {
        self.base_name = name.into();
        self
    }

    /// Override the platform naming convention
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Replace the candidate directory list
    pub fn search_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Expected library filename for the configured platform
    pub fn filename(&self) -> String {
        self.platform.library_filename(&self.base_name)
    }

    /// Every path `locate` probes, in order
    pub fn candidates(&self) -> Vec<PathBuf> {
        let filename = self.filename();
        self.search_dirs
            .iter()
            .map(|dir| candidate_path(&self.base_dir, dir, &filename))
            .collect()
    }

    /// Return the first candidate that exists on disk
    pub fn locate(&self) -> Result<PathBuf> {
        let candidates = self.candidates();
        for candidate in &candidates {
            tracing::debug!(path = %candidate.display(), "probing for native library");
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "found native library");
                return Ok(candidate.clone());
            }
        }

        Err(Error::library_not_found(
            self.filename(),
            candidates,
            LIBRARY_REMEDIATION,
        ))
    }
}

impl Default for LibraryLocator {
    fn default() -> Self {
        Self::new()
    }
}

fn candidate_path(base: &Path, dir: &Path, filename: &str) -> PathBuf {
    if dir == Path::new(".") {
        base.join(filename)
    } else {
        base.join(dir).join(filename)
    }
}
