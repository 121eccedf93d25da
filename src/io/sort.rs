// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Chronological ordering of iba files.
//!
//! Files are ordered by their embedded acquisition start time. The start
//! time is read from the textual header prefix where possible, falling
//! back to a full backend open only when the header does not carry it.
//! Whether unreadable files abort the sort or are skipped is the caller's
//! choice; the sorter never hides that policy.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::core::error::{IbaError, Result};
use crate::io::backend::fixture::parse_header_time;
use crate::io::backend::DatBackend;
use crate::io::session::ReaderSession;

/// How many header lines are scanned for the start-time entry before
/// falling back to a backend open.
const HEADER_SCAN_LINES: usize = 20;

/// Read the acquisition start time of a file.
///
/// Scans the first few header lines for a `starttime:` entry; when the
/// header does not carry one, opens a session and asks the backend.
pub fn read_start_time(backend: &dyn DatBackend, path: impl AsRef<Path>) -> Result<DateTime<Utc>> {
    let path = path.as_ref();

    match scan_header_start_time(path)? {
        HeaderScan::Found(time) => Ok(time),
        HeaderScan::Unparsable(raw) => Err(IbaError::damaged(
            path,
            format!("unparsable starttime '{raw}'"),
        )),
        HeaderScan::Missing => {
            let session = ReaderSession::open(backend, path)?;
            session.start_time()
        }
    }
}

#[derive(Debug)]
enum HeaderScan {
    Found(DateTime<Utc>),
    Unparsable(String),
    Missing,
}

fn scan_header_start_time(path: &Path) -> Result<HeaderScan> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(IbaError::not_found(path));
        }
        Err(e) => return Err(e.into()),
    };

    let reader = BufReader::new(file);
    for line in reader.lines().take(HEADER_SCAN_LINES) {
        // Binary content in the body is not valid UTF-8; that just ends
        // the header scan.
        let Ok(line) = line else {
            return Ok(HeaderScan::Missing);
        };
        let Some(raw) = line.trim().strip_prefix("starttime:") else {
            continue;
        };
        return Ok(match parse_header_time(raw) {
            Some(time) => HeaderScan::Found(time),
            None => HeaderScan::Unparsable(raw.trim().to_string()),
        });
    }
    Ok(HeaderScan::Missing)
}

/// Sort files ascending by start time, aborting on the first file whose
/// start time cannot be read.
///
/// The sort is stable: ties keep their input order.
pub fn sort_by_start_time(
    backend: &dyn DatBackend,
    files: Vec<PathBuf>,
) -> Result<Vec<PathBuf>> {
    let mut keyed = Vec::with_capacity(files.len());
    for file in files {
        let time = read_start_time(backend, &file)?;
        keyed.push((time, file));
    }
    keyed.sort_by_key(|(time, _)| *time);
    Ok(keyed.into_iter().map(|(_, file)| file).collect())
}

/// Sort files ascending by start time, skipping unreadable files.
///
/// Returns the sorted readable files plus every skipped file with the
/// error that disqualified it.
pub fn sort_by_start_time_lossy(
    backend: &dyn DatBackend,
    files: Vec<PathBuf>,
) -> (Vec<PathBuf>, Vec<(PathBuf, IbaError)>) {
    let mut keyed = Vec::with_capacity(files.len());
    let mut skipped = Vec::new();
    for file in files {
        match read_start_time(backend, &file) {
            Ok(time) => keyed.push((time, file)),
            Err(err) => {
                warn!(file = %file.display(), error = %err, "skipping unsortable iba file");
                skipped.push((file, err));
            }
        }
    }
    keyed.sort_by_key(|(time, _)| *time);
    (keyed.into_iter().map(|(_, file)| file).collect(), skipped)
}
