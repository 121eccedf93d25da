// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Shared metadata types for iba files.
//!
//! This module provides the types used to describe channels and files
//! independently of the backend that parses the container.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::core::error::IbaError;

/// Identifier of a channel inside an iba file.
///
/// Channel ids are written as `module:number` (e.g. `3:12`). The logger
/// also emits the dotted form `module.number` in some exports; both are
/// accepted when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId {
    /// Module the channel belongs to
    pub module: u16,
    /// Channel number within the module
    pub number: u16,
}

impl ChannelId {
    /// Create a new channel id.
    pub fn new(module: u16, number: u16) -> Self {
        Self { module, number }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.number)
    }
}

impl FromStr for ChannelId {
    type Err = IbaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (module, number) = s
            .split_once([':', '.'])
            .ok_or_else(|| IbaError::backend("parse channel id", format!("'{s}' is not 'M:N'")))?;
        let module = module
            .parse::<u16>()
            .map_err(|e| IbaError::backend("parse channel id", format!("module in '{s}': {e}")))?;
        let number = number
            .parse::<u16>()
            .map_err(|e| IbaError::backend("parse channel id", format!("number in '{s}': {e}")))?;
        Ok(Self { module, number })
    }
}

/// Kind of signal stored in a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Continuous numeric signal
    Analog,
    /// Boolean signal stored as 0.0/1.0
    Digital,
    /// Text signal stored as timed segments
    Text,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Analog => write!(f, "analog"),
            ChannelKind::Digital => write!(f, "digital"),
            ChannelKind::Text => write!(f, "text"),
        }
    }
}

/// Information about a single channel in an iba file.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelInfo {
    /// Channel id within the file
    pub id: ChannelId,
    /// Channel name (e.g. "ActCastingSpeed")
    pub name: String,
    /// Signal kind
    pub kind: ChannelKind,
    /// Sampling interval of this channel in seconds (0.0 if unknown)
    pub timebase: f64,
    /// Physical unit, when recorded
    pub unit: Option<String>,
    /// Remaining per-channel info entries as reported by the backend
    pub extra: HashMap<String, String>,
}

impl ChannelInfo {
    /// Create a new ChannelInfo.
    pub fn new(id: ChannelId, name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            timebase: 0.0,
            unit: None,
            extra: HashMap::new(),
        }
    }

    /// Set the channel timebase in seconds.
    pub fn with_timebase(mut self, timebase: f64) -> Self {
        self.timebase = timebase;
        self
    }

    /// Set the physical unit.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Add an extra info entry.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Check whether `needle` matches this channel by name or by id.
    pub fn matches(&self, needle: &str) -> bool {
        if self.name == needle {
            return true;
        }
        needle
            .parse::<ChannelId>()
            .map(|id| id == self.id)
            .unwrap_or(false)
    }
}

/// Summary attributes of an iba file.
#[derive(Debug, Clone)]
pub struct FileSummary {
    /// File path
    pub path: String,
    /// File size in bytes
    pub size: u64,
    /// Acquisition start time
    pub start_time: DateTime<Utc>,
    /// Base sample rate of the file in seconds per frame
    pub clk: f64,
    /// Number of frames recorded
    pub frames: u64,
    /// Number of channels in the file
    pub channel_count: usize,
}

/// Result of a validity check, without any channel payloads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileCheck {
    /// Whether the container parsed cleanly
    pub valid: bool,
    /// Base sample rate in seconds per frame
    pub clk: f64,
    /// Number of frames recorded
    pub frames: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_id_parse_colon() {
        let id: ChannelId = "3:12".parse().unwrap();
        assert_eq!(id, ChannelId::new(3, 12));
        assert_eq!(id.to_string(), "3:12");
    }

    #[test]
    fn test_channel_id_parse_dotted() {
        let id: ChannelId = "12.1".parse().unwrap();
        assert_eq!(id, ChannelId::new(12, 1));
    }

    #[test]
    fn test_channel_id_parse_invalid() {
        assert!("ActSpeed".parse::<ChannelId>().is_err());
        assert!("3:".parse::<ChannelId>().is_err());
        assert!(":1".parse::<ChannelId>().is_err());
        assert!("".parse::<ChannelId>().is_err());
    }

    #[test]
    fn test_channel_info_builder() {
        let info = ChannelInfo::new(ChannelId::new(0, 1), "Speed", ChannelKind::Analog)
            .with_timebase(0.01)
            .with_unit("m/s")
            .with_extra("comment", "cast speed");

        assert_eq!(info.id, ChannelId::new(0, 1));
        assert_eq!(info.name, "Speed");
        assert_eq!(info.kind, ChannelKind::Analog);
        assert_eq!(info.timebase, 0.01);
        assert_eq!(info.unit.as_deref(), Some("m/s"));
        assert_eq!(info.extra.get("comment").map(String::as_str), Some("cast speed"));
    }

    #[test]
    fn test_channel_info_matches() {
        let info = ChannelInfo::new(ChannelId::new(3, 12), "Speed", ChannelKind::Analog);
        assert!(info.matches("Speed"));
        assert!(info.matches("3:12"));
        assert!(info.matches("3.12"));
        assert!(!info.matches("3:13"));
        assert!(!info.matches("Temperature"));
    }

    #[test]
    fn test_channel_kind_display() {
        assert_eq!(ChannelKind::Analog.to_string(), "analog");
        assert_eq!(ChannelKind::Digital.to_string(), "digital");
        assert_eq!(ChannelKind::Text.to_string(), "text");
    }
}
