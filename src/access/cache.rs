// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Side-file caching of read results.
//!
//! Re-reading iba files over slow (network) storage is expensive, so the
//! accessor can persist each [`ResultTable`] to a cache directory, keyed
//! by (source path, channel spec, time base, tolerance flag). The cache
//! is an explicit object handed to the read call, with no process-wide
//! state, and it assumes a single process owns the cache directory.
//!
//! An entry is fresh only while the source file's modification time
//! matches the one recorded at store time. Unreadable or stale entries
//! degrade to a recompute; they never fail the read.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::{IbaError, Result};

use super::spec::ChannelSpec;
use super::table::ResultTable;

/// On-disk envelope of one cache entry.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// Canonical source path the table was read from
    source: String,
    /// Source mtime (seconds since the Unix epoch) at store time
    modified: u64,
    /// Channel spec the table was produced for
    spec: ChannelSpec,
    /// Requested time base in seconds (0 = native)
    tbase: f64,
    /// Whether unresolved columns were omitted rather than fatal.
    /// Tolerant tables may lack columns, so they never satisfy a
    /// strict read of the same spec.
    ignore: bool,
    /// The cached table
    table: ResultTable,
}

/// A directory of cached read results.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open (and create if needed) a cache directory.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load a fresh entry, if one exists.
    ///
    /// Returns `None` for missing, stale, or unreadable entries; a read
    /// is never failed by the cache.
    pub fn load(
        &self,
        source: &Path,
        spec: &ChannelSpec,
        tbase: f64,
        ignore: bool,
    ) -> Option<ResultTable> {
        let entry_path = self.entry_path(source, spec, tbase, ignore)?;
        let file = File::open(&entry_path).ok()?;
        let entry: CacheEntry = match serde_json::from_reader(BufReader::new(file)) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(
                    entry = %entry_path.display(),
                    error = %err,
                    "discarding undecodable cache entry"
                );
                return None;
            }
        };

        let source_key = canonical_key(source);
        if entry.source != source_key
            || &entry.spec != spec
            || entry.tbase != tbase
            || entry.ignore != ignore
        {
            // crc collision between different keys
            return None;
        }

        match source_mtime(source) {
            Some(modified) if modified == entry.modified => {
                debug!(source = %source.display(), "cache hit");
                Some(entry.table)
            }
            _ => {
                warn!(source = %source.display(), "cache entry is stale");
                None
            }
        }
    }

    /// Store a table, overwriting any previous entry for the same key.
    pub fn store(
        &self,
        source: &Path,
        spec: &ChannelSpec,
        tbase: f64,
        ignore: bool,
        table: &ResultTable,
    ) -> Result<()> {
        let entry_path = self
            .entry_path(source, spec, tbase, ignore)
            .ok_or_else(|| IbaError::cache(&self.dir, "cannot derive cache key"))?;
        let modified = source_mtime(source)
            .ok_or_else(|| IbaError::cache(&entry_path, "source modification time unavailable"))?;

        let entry = CacheEntry {
            source: canonical_key(source),
            modified,
            spec: spec.clone(),
            tbase,
            ignore,
            table: table.clone(),
        };

        let file = File::create(&entry_path)
            .map_err(|e| IbaError::cache(&entry_path, e.to_string()))?;
        serde_json::to_writer(BufWriter::new(file), &entry)
            .map_err(|e| IbaError::cache(&entry_path, e.to_string()))?;
        debug!(source = %source.display(), entry = %entry_path.display(), "cache entry written");
        Ok(())
    }

    /// Drop every entry belonging to the given source file.
    pub fn invalidate(&self, source: &Path) -> Result<()> {
        let source_key = canonical_key(source);
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let Ok(file) = File::open(&path) else {
                continue;
            };
            let Ok(entry) = serde_json::from_reader::<_, CacheEntry>(BufReader::new(file)) else {
                continue;
            };
            if entry.source == source_key {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    /// Drop every entry in the cache.
    pub fn clear(&self) -> Result<()> {
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    /// Derive the entry file for a (source, spec, tbase, ignore) key.
    fn entry_path(
        &self,
        source: &Path,
        spec: &ChannelSpec,
        tbase: f64,
        ignore: bool,
    ) -> Option<PathBuf> {
        let spec_json = serde_json::to_string(spec).ok()?;
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(canonical_key(source).as_bytes());
        hasher.update(spec_json.as_bytes());
        hasher.update(&tbase.to_bits().to_le_bytes());
        hasher.update(&[ignore as u8]);
        Some(self.dir.join(format!("{:08x}.json", hasher.finalize())))
    }
}

/// Canonical string form of a source path, for keys and comparisons.
fn canonical_key(path: &Path) -> String {
    fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

/// Source mtime in whole seconds since the Unix epoch.
fn source_mtime(path: &Path) -> Option<u64> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()?
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
}
