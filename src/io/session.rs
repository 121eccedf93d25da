// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Scoped acquisition of a backend reader handle.
//!
//! A [`ReaderSession`] owns the reader for exactly one file and releases
//! it on every exit path: normal return, early `?`, and unwinding all go
//! through `Drop`. The handle never outlives the session.

use std::ops::Deref;
use std::path::Path;

use crate::core::error::{IbaError, Result};
use crate::io::backend::{DatBackend, DatReader};

/// An open reader session for one iba file.
///
/// # Example
///
/// ```no_run
/// use ibadat::io::backend::FixtureBackend;
/// use ibadat::io::session::ReaderSession;
///
/// # fn main() -> ibadat::Result<()> {
/// let backend = FixtureBackend::new();
/// let session = ReaderSession::open(&backend, "data.dat")?;
/// println!("channels: {}", session.channels().len());
/// // handle released when `session` goes out of scope
/// # Ok(())
/// # }
/// ```
pub struct ReaderSession {
    // Only None after close() took the reader out; Drop tolerates both.
    reader: Option<Box<dyn DatReader>>,
}

impl std::fmt::Debug for ReaderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderSession")
            .field("open", &self.reader.is_some())
            .finish()
    }
}

impl ReaderSession {
    /// Open a session for the given file.
    ///
    /// Refuses files the acquisition system is still writing and maps an
    /// open failure on a missing path to [`IbaError::NotFound`].
    pub fn open(backend: &dyn DatBackend, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if backend.writer_active(path) {
            return Err(IbaError::in_use(path));
        }

        let reader = match backend.open(path) {
            Ok(reader) => reader,
            Err(err) => {
                if !path.is_file() {
                    return Err(IbaError::not_found(path));
                }
                return Err(err);
            }
        };

        Ok(Self {
            reader: Some(reader),
        })
    }

    /// Explicitly close the session, surfacing any release error.
    ///
    /// Dropping the session closes it as well, but swallows errors.
    pub fn close(mut self) -> Result<()> {
        match self.reader.take() {
            Some(mut reader) => reader.close(),
            None => Ok(()),
        }
    }
}

impl Deref for ReaderSession {
    type Target = dyn DatReader;

    fn deref(&self) -> &Self::Target {
        // Invariant: `reader` is only None once the session has been
        // consumed by close(), after which no reference can exist.
        self.reader
            .as_deref()
            .expect("reader session already closed")
    }
}

impl Drop for ReaderSession {
    fn drop(&mut self) {
        if let Some(mut reader) = self.reader.take() {
            let _ = reader.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::backend::Samples;
    use crate::io::metadata::{ChannelId, ChannelInfo};
    use chrono::{DateTime, Utc};
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct TrackingReader {
        path: PathBuf,
        channels: BTreeMap<ChannelId, ChannelInfo>,
        closed: Arc<AtomicUsize>,
    }

    impl DatReader for TrackingReader {
        fn path(&self) -> &Path {
            &self.path
        }

        fn start_time(&self) -> Result<DateTime<Utc>> {
            Ok(DateTime::<Utc>::UNIX_EPOCH)
        }

        fn query_info(&self, _name: &str) -> Option<String> {
            None
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
            self.closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct TrackingBackend {
        closed: Arc<AtomicUsize>,
        writing: bool,
    }

    impl DatBackend for TrackingBackend {
        fn open(&self, path: &Path) -> Result<Box<dyn DatReader>> {
            Ok(Box::new(TrackingReader {
                path: path.to_path_buf(),
                channels: BTreeMap::new(),
                closed: Arc::clone(&self.closed),
            }))
        }

        fn writer_active(&self, _path: &Path) -> bool {
            self.writing
        }
    }

    #[test]
    fn test_drop_releases_handle() {
        let closed = Arc::new(AtomicUsize::new(0));
        let backend = TrackingBackend {
            closed: Arc::clone(&closed),
            writing: false,
        };

        {
            let _session = ReaderSession::open(&backend, "a.dat").unwrap();
            assert_eq!(closed.load(Ordering::SeqCst), 0);
        }
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_explicit_close_releases_once() {
        let closed = Arc::new(AtomicUsize::new(0));
        let backend = TrackingBackend {
            closed: Arc::clone(&closed),
            writing: false,
        };

        let session = ReaderSession::open(&backend, "a.dat").unwrap();
        session.close().unwrap();
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_release_on_unwind() {
        let closed = Arc::new(AtomicUsize::new(0));
        let backend = TrackingBackend {
            closed: Arc::clone(&closed),
            writing: false,
        };

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _session = ReaderSession::open(&backend, "a.dat").unwrap();
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_refuses_file_in_use() {
        let backend = TrackingBackend {
            closed: Arc::new(AtomicUsize::new(0)),
            writing: true,
        };

        let err = ReaderSession::open(&backend, "a.dat").unwrap_err();
        assert!(matches!(err, IbaError::FileInUse { .. }));
    }

    struct FailingBackend;

    impl DatBackend for FailingBackend {
        fn open(&self, _path: &Path) -> Result<Box<dyn DatReader>> {
            Err(IbaError::backend("open", "vendor failure"))
        }

        fn writer_active(&self, _path: &Path) -> bool {
            false
        }
    }

    #[test]
    fn test_missing_path_maps_to_not_found() {
        let err = ReaderSession::open(&FailingBackend, "/nonexistent/a.dat").unwrap_err();
        assert!(matches!(err, IbaError::NotFound { .. }));
    }
}
