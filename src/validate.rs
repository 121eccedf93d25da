// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Validity checks and summary inspection.
//!
//! The validator opens a file just far enough to confirm the container
//! parses and to extract its summary attributes (sample rate, frame
//! count). It never touches channel payloads, which makes it cheap
//! enough for health checks over whole directories.

use std::fs;
use std::path::Path;

use crate::core::error::{IbaError, Result};
use crate::io::backend::{DatBackend, DatReader};
use crate::io::metadata::{ChannelInfo, FileCheck, FileSummary};
use crate::io::session::ReaderSession;

/// Frame counter value the logger leaves in place until it finalizes a
/// file. A count at or above this marks an incomplete container.
const INCOMPLETE_FRAMES_SENTINEL: u64 = 1_000_000_000;

/// Extract and validate clk and frame count from an open reader.
///
/// A well-formed empty file (zero frames) is valid; an absent or
/// unparsable entry marks the container damaged, unless the file itself
/// vanished while it was being read.
pub(crate) fn inspect_reader(reader: &dyn DatReader, path: &Path) -> Result<(f64, u64)> {
    let clk = reader
        .query_info("clk")
        .and_then(|v| v.parse::<f64>().ok());
    let frames = reader
        .query_info("frames")
        .and_then(|v| v.parse::<u64>().ok());

    let (clk, frames) = match (clk, frames) {
        (Some(clk), Some(frames)) if clk > 0.0 => (clk, frames),
        _ => {
            if !path.is_file() {
                return Err(IbaError::not_found(path));
            }
            return Err(IbaError::damaged(
                path,
                "clk or frames attribute missing or invalid",
            ));
        }
    };

    if frames >= INCOMPLETE_FRAMES_SENTINEL {
        return Err(IbaError::not_complete(path));
    }

    Ok((clk, frames))
}

/// Check whether a file is a valid iba container.
///
/// Returns the sample rate and frame count on success; fails with
/// [`IbaError::FileDamaged`] or [`IbaError::FileNotComplete`] for
/// structurally broken input.
pub fn check_file(backend: &dyn DatBackend, path: impl AsRef<Path>) -> Result<FileCheck> {
    let path = path.as_ref();
    let session = ReaderSession::open(backend, path)?;
    let (clk, frames) = inspect_reader(&*session, path)?;
    Ok(FileCheck {
        valid: true,
        clk,
        frames,
    })
}

/// Gather summary attributes of a file, without channel payloads.
pub fn file_summary(backend: &dyn DatBackend, path: impl AsRef<Path>) -> Result<FileSummary> {
    let path = path.as_ref();
    let session = ReaderSession::open(backend, path)?;
    let (clk, frames) = inspect_reader(&*session, path)?;
    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    Ok(FileSummary {
        path: path.display().to_string(),
        size,
        start_time: session.start_time()?,
        clk,
        frames,
        channel_count: session.channels().len(),
    })
}

/// List channel metadata, optionally restricted to the given names/ids.
///
/// Unknown entries in `names` are silently absent from the result; use
/// [`has_channel`] to probe for a specific one.
pub fn channel_infos(
    backend: &dyn DatBackend,
    path: impl AsRef<Path>,
    names: Option<&[String]>,
) -> Result<Vec<ChannelInfo>> {
    let session = ReaderSession::open(backend, path.as_ref())?;
    let infos = match names {
        Some(names) => names
            .iter()
            .filter_map(|name| session.resolve(name).cloned())
            .collect(),
        None => session.channels().values().cloned().collect(),
    };
    Ok(infos)
}

/// Check whether a channel exists in the given file.
///
/// Any failure to open or resolve counts as "not present".
pub fn has_channel(backend: &dyn DatBackend, path: impl AsRef<Path>, name: &str) -> bool {
    ReaderSession::open(backend, path.as_ref())
        .map(|session| session.resolve(name).is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::backend::Samples;
    use crate::io::metadata::ChannelId;
    use chrono::{DateTime, Utc};
    use std::collections::{BTreeMap, HashMap};
    use std::path::PathBuf;

    struct InfoReader {
        path: PathBuf,
        info: HashMap<String, String>,
        channels: BTreeMap<ChannelId, ChannelInfo>,
    }

    impl InfoReader {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                path: PathBuf::from("info.dat"),
                info: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                channels: BTreeMap::new(),
            }
        }
    }

    impl DatReader for InfoReader {
        fn path(&self) -> &Path {
            &self.path
        }

        fn start_time(&self) -> Result<DateTime<Utc>> {
            Ok(DateTime::<Utc>::UNIX_EPOCH)
        }

        fn query_info(&self, name: &str) -> Option<String> {
            self.info.get(name).cloned()
        }

        fn channels(&self) -> &BTreeMap<ChannelId, ChannelInfo> {
            &self.channels
        }

        fn samples(&self, _id: &ChannelId) -> Result<Samples> {
            Ok(Samples::Numeric {
                timebase: 0.01,
                values: Vec::new(),
            })
        }

        fn close(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_inspect_valid() {
        let reader = InfoReader::new(&[("clk", "0.01"), ("frames", "500")]);
        let (clk, frames) = inspect_reader(&reader, Path::new("/")).unwrap();
        assert_eq!(clk, 0.01);
        assert_eq!(frames, 500);
    }

    #[test]
    fn test_inspect_empty_file_is_valid() {
        let reader = InfoReader::new(&[("clk", "0.01"), ("frames", "0")]);
        let (_, frames) = inspect_reader(&reader, Path::new("/")).unwrap();
        assert_eq!(frames, 0);
    }

    #[test]
    fn test_inspect_missing_clk_is_damaged() {
        let reader = InfoReader::new(&[("frames", "500")]);
        // "/" exists, so this is damage rather than a vanished file
        let err = inspect_reader(&reader, Path::new("/etc/hostname")).unwrap_err();
        assert!(matches!(
            err,
            IbaError::FileDamaged { .. } | IbaError::NotFound { .. }
        ));
    }

    #[test]
    fn test_inspect_vanished_file_is_not_found() {
        let reader = InfoReader::new(&[]);
        let err = inspect_reader(&reader, Path::new("/nonexistent/x.dat")).unwrap_err();
        assert!(matches!(err, IbaError::NotFound { .. }));
    }

    #[test]
    fn test_inspect_sentinel_frames_is_incomplete() {
        let reader = InfoReader::new(&[("clk", "0.01"), ("frames", "1000000000")]);
        let err = inspect_reader(&reader, Path::new("/")).unwrap_err();
        assert!(matches!(err, IbaError::FileNotComplete { .. }));
    }
}
