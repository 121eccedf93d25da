// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! File discovery for iba data directories.
//!
//! Walks a directory tree and yields paths matching a file-type and name
//! filter. Iteration is lazy and deterministic: the files of a directory
//! come before those of its subdirectories, both in name order.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::core::error::{IbaError, Result};

/// Default file extension of iba data files.
pub const DEFAULT_FILE_TYPE: &str = "dat";

/// Query describing which files to locate.
#[derive(Debug, Clone)]
pub struct FileQuery {
    file_type: String,
    name_pattern: Option<Regex>,
    recursive: bool,
}

impl Default for FileQuery {
    fn default() -> Self {
        Self {
            file_type: DEFAULT_FILE_TYPE.to_string(),
            name_pattern: None,
            recursive: true,
        }
    }
}

impl FileQuery {
    /// Create a query for the default iba extension, scanning subfolders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file extension to match.
    ///
    /// A leading dot is tolerated (`"dat"` and `".dat"` are equivalent);
    /// an empty string matches every file.
    pub fn with_file_type(mut self, file_type: &str) -> Self {
        self.file_type = file_type.trim_start_matches('.').to_string();
        self
    }

    /// Set a glob pattern (`*`, `?`) matched against the file stem.
    pub fn with_name_pattern(mut self, pattern: &str) -> Result<Self> {
        self.name_pattern = Some(glob_to_regex(pattern)?);
        Ok(self)
    }

    /// Set whether subfolders are scanned. Default: true.
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Check whether a file name matches this query.
    fn matches(&self, path: &Path) -> bool {
        if !self.file_type.is_empty() {
            let ext_matches = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|ext| ext.eq_ignore_ascii_case(&self.file_type))
                .unwrap_or(false);
            if !ext_matches {
                return false;
            }
        }
        match &self.name_pattern {
            Some(pattern) => path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(|stem| pattern.is_match(stem))
                .unwrap_or(false),
            None => true,
        }
    }
}

/// Find files under `root` matching the query.
///
/// Returns a lazy iterator of absolute paths. An empty directory yields
/// an empty iterator; a missing root fails with [`IbaError::NotFound`].
pub fn find_files(root: impl AsRef<Path>, query: &FileQuery) -> Result<FindFiles> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(IbaError::not_found(root));
    }

    let mut iter = FindFiles {
        query: query.clone(),
        pending_files: VecDeque::new(),
        pending_dirs: VecDeque::new(),
    };
    iter.scan_dir(root)?;
    Ok(iter)
}

/// Find iba `.dat` files under `root`, scanning subfolders.
pub fn find_dat_files(root: impl AsRef<Path>) -> Result<FindFiles> {
    find_files(root, &FileQuery::new())
}

/// Lazy iterator over located files.
#[derive(Debug)]
pub struct FindFiles {
    query: FileQuery,
    pending_files: VecDeque<PathBuf>,
    pending_dirs: VecDeque<PathBuf>,
}

impl FindFiles {
    /// Read one directory, queueing matching files and subfolders.
    fn scan_dir(&mut self, dir: &Path) -> Result<()> {
        let mut files = Vec::new();
        let mut dirs = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                dirs.push(path);
            } else if self.query.matches(&path) {
                files.push(path);
            }
        }
        files.sort();
        dirs.sort();
        self.pending_files.extend(files);
        if self.query.recursive {
            self.pending_dirs.extend(dirs);
        }
        Ok(())
    }
}

impl Iterator for FindFiles {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(file) = self.pending_files.pop_front() {
                return Some(Ok(file));
            }
            let dir = self.pending_dirs.pop_front()?;
            if let Err(err) = self.scan_dir(&dir) {
                return Some(Err(err));
            }
        }
    }
}

/// Translate a glob pattern (`*`, `?`) into an anchored regex.
fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let mut translated = String::with_capacity(pattern.len() + 8);
    translated.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => translated.push_str(".*"),
            '?' => translated.push('.'),
            other => translated.push_str(&regex::escape(&other.to_string())),
        }
    }
    translated.push('$');
    Regex::new(&translated)
        .map_err(|e| IbaError::backend("compile name pattern", format!("'{pattern}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_to_regex() {
        let re = glob_to_regex("cast_*").unwrap();
        assert!(re.is_match("cast_001"));
        assert!(!re.is_match("other_cast_001"));

        let re = glob_to_regex("run_?").unwrap();
        assert!(re.is_match("run_1"));
        assert!(!re.is_match("run_12"));

        // regex metacharacters in the pattern are literals
        let re = glob_to_regex("a+b").unwrap();
        assert!(re.is_match("a+b"));
        assert!(!re.is_match("aab"));
    }

    #[test]
    fn test_query_extension_matching() {
        let query = FileQuery::new();
        assert!(query.matches(Path::new("/data/a.dat")));
        assert!(query.matches(Path::new("/data/a.DAT")));
        assert!(!query.matches(Path::new("/data/a.txt")));
        assert!(!query.matches(Path::new("/data/a")));
    }

    #[test]
    fn test_query_leading_dot_tolerated() {
        let query = FileQuery::new().with_file_type(".dat");
        assert!(query.matches(Path::new("a.dat")));

        let query = FileQuery::new().with_file_type("dat");
        assert!(query.matches(Path::new("a.dat")));
    }

    #[test]
    fn test_query_empty_type_matches_everything() {
        let query = FileQuery::new().with_file_type("");
        assert!(query.matches(Path::new("a.dat")));
        assert!(query.matches(Path::new("a.txt")));
        assert!(query.matches(Path::new("a")));
    }

    #[test]
    fn test_query_name_pattern() {
        let query = FileQuery::new().with_name_pattern("cast_*").unwrap();
        assert!(query.matches(Path::new("cast_001.dat")));
        assert!(!query.matches(Path::new("melt_001.dat")));
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let err = find_files("/nonexistent/ibadat_dir", &FileQuery::new()).unwrap_err();
        assert!(matches!(err, IbaError::NotFound { .. }));
    }
}
