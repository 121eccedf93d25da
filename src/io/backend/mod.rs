// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Reader backend traits, the seam to the vendor parsing library.
//!
//! All actual container parsing is supplied by an implementation of
//! [`DatBackend`]. The crate only consumes its open/close, info-query,
//! channel-enumeration, and sample-extraction capabilities; it never
//! reimplements the decoder itself.
//!
//! The [`fixture`] backend ships with the crate so the full read path
//! can be exercised and tested without the vendor runtime.

pub mod fixture;

pub use fixture::FixtureBackend;

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::core::error::Result;

use super::metadata::{ChannelId, ChannelInfo};

/// Sample data of a single channel.
///
/// Numeric channels carry one value per channel frame; text channels
/// carry timed segments that are expanded onto the frame grid by the
/// accessor. Both forms are strictly one-dimensional.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    /// Numeric samples with the channel's own sampling interval
    Numeric {
        /// Sampling interval of this channel in seconds
        timebase: f64,
        /// Sample values
        values: Vec<f64>,
    },
    /// Text segments as (offset from file start in seconds, text) pairs
    Text {
        /// Segments in ascending offset order
        segments: Vec<(f64, String)>,
    },
}

impl Samples {
    /// Check whether the channel carries any data at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Samples::Numeric { values, .. } => values.is_empty(),
            Samples::Text { segments } => segments.is_empty(),
        }
    }
}

/// An open reader handle for exactly one iba file.
///
/// Implementations wrap the vendor reader object. Handles are obtained
/// through [`DatBackend::open`] and must be released via [`close`], which
/// the [`ReaderSession`](crate::io::session::ReaderSession) guarantees on
/// every exit path.
///
/// [`close`]: DatReader::close
pub trait DatReader {
    /// Get the path of the open file.
    fn path(&self) -> &Path;

    /// Get the acquisition start time of the file.
    fn start_time(&self) -> Result<DateTime<Utc>>;

    /// Query a file-level info entry by name (e.g. `clk`, `frames`).
    ///
    /// Returns `None` for unknown keys.
    fn query_info(&self, name: &str) -> Option<String>;

    /// Get all channels of the file, keyed by channel id.
    fn channels(&self) -> &BTreeMap<ChannelId, ChannelInfo>;

    /// Get channel info by channel name.
    ///
    /// Returns the first matching channel in id order.
    fn channel_by_name(&self, name: &str) -> Option<&ChannelInfo> {
        self.channels().values().find(|c| c.name == name)
    }

    /// Get channel info by channel id.
    fn channel_by_id(&self, id: &ChannelId) -> Option<&ChannelInfo> {
        self.channels().get(id)
    }

    /// Resolve a channel by id string (`M:N` / `M.N`) or by name.
    fn resolve(&self, needle: &str) -> Option<&ChannelInfo> {
        if let Ok(id) = needle.parse::<ChannelId>() {
            return self.channel_by_id(&id);
        }
        self.channel_by_name(needle)
    }

    /// Extract the sample data of a channel.
    fn samples(&self, id: &ChannelId) -> Result<Samples>;

    /// Release the underlying handle.
    ///
    /// Called exactly once by the owning session; implementations must
    /// tolerate the file having vanished in the meantime.
    fn close(&mut self) -> Result<()>;
}

/// Factory for reader handles, one per vendor library binding.
pub trait DatBackend {
    /// Open a reader for the given file.
    fn open(&self, path: &Path) -> Result<Box<dyn DatReader>>;

    /// Check whether the acquisition system is currently writing the file.
    ///
    /// Opening such a file would observe a half-written container, so the
    /// session refuses it up front.
    fn writer_active(&self, path: &Path) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::metadata::ChannelKind;

    struct StubReader {
        channels: BTreeMap<ChannelId, ChannelInfo>,
    }

    impl DatReader for StubReader {
        fn path(&self) -> &Path {
            Path::new("stub.dat")
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
            Ok(())
        }
    }

    fn stub_reader() -> StubReader {
        let mut channels = BTreeMap::new();
        channels.insert(
            ChannelId::new(0, 0),
            ChannelInfo::new(ChannelId::new(0, 0), "Speed", ChannelKind::Analog),
        );
        channels.insert(
            ChannelId::new(3, 12),
            ChannelInfo::new(ChannelId::new(3, 12), "Grade", ChannelKind::Text),
        );
        StubReader { channels }
    }

    #[test]
    fn test_resolve_by_name() {
        let reader = stub_reader();
        let info = reader.resolve("Speed").unwrap();
        assert_eq!(info.id, ChannelId::new(0, 0));
    }

    #[test]
    fn test_resolve_by_id_string() {
        let reader = stub_reader();
        let info = reader.resolve("3:12").unwrap();
        assert_eq!(info.name, "Grade");
        let info = reader.resolve("3.12").unwrap();
        assert_eq!(info.name, "Grade");
    }

    #[test]
    fn test_resolve_missing() {
        let reader = stub_reader();
        assert!(reader.resolve("Temperature").is_none());
        assert!(reader.resolve("9:9").is_none());
    }

    #[test]
    fn test_samples_is_empty() {
        let samples = Samples::Numeric {
            timebase: 0.01,
            values: vec![],
        };
        assert!(samples.is_empty());

        let samples = Samples::Text {
            segments: vec![(0.0, "A".to_string())],
        };
        assert!(!samples.is_empty());
    }
}
