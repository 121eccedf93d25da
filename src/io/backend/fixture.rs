// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! JSON-backed fixture backend.
//!
//! A reference implementation of [`DatBackend`] that reads a plain-text
//! stand-in for the vendor container: a line-oriented header (the same
//! `starttime:` prefix real iba files carry) followed by a JSON channel
//! body. It exists so the locator, sorter, accessor, and validator can be
//! exercised end to end without the vendor runtime; it is not a vendor
//! decoder replacement.
//!
//! # File layout
//!
//! ```text
//! starttime: 01.02.2023 10:30:00.500
//! clk: 0.01
//! frames: 1000
//! status: done
//! channels:
//! [{"id":"0:1","name":"Speed","kind":"analog","values":[1.0,2.0]}]
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::{IbaError, Result};
use crate::io::metadata::{ChannelId, ChannelInfo, ChannelKind};

use super::{DatBackend, DatReader, Samples};

/// Marker line separating the header from the JSON channel body.
const CHANNELS_MARKER: &str = "channels:";

/// Header `status` value while the logger still owns the file.
const STATUS_WRITING: &str = "writing";

/// Timestamp formats used in the header, fractional seconds optional.
const TIME_FORMATS: [&str; 2] = ["%d.%m.%Y %H:%M:%S%.f", "%d.%m.%Y %H:%M:%S"];

/// One channel as stored in the fixture body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureChannel {
    /// Channel id as `M:N`
    pub id: String,
    /// Channel name
    pub name: String,
    /// Signal kind: `analog`, `digital`, or `text`
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Channel timebase in seconds (defaults to the file clk)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timebase: Option<f64>,
    /// Physical unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Numeric samples
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
    /// Text segments as (offset seconds, text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<(f64, String)>>,
}

fn default_kind() -> String {
    "analog".to_string()
}

impl FixtureChannel {
    /// Create a numeric channel.
    pub fn numeric(id: &str, name: &str, values: Vec<f64>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: default_kind(),
            timebase: None,
            unit: None,
            values: Some(values),
            segments: None,
        }
    }

    /// Create a text channel.
    pub fn text(id: &str, name: &str, segments: Vec<(f64, String)>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: "text".to_string(),
            timebase: None,
            unit: None,
            values: None,
            segments: Some(segments),
        }
    }

    /// Set the channel timebase in seconds.
    pub fn with_timebase(mut self, timebase: f64) -> Self {
        self.timebase = Some(timebase);
        self
    }
}

/// A complete fixture file, for writing test and demo data.
#[derive(Debug, Clone)]
pub struct FixtureFile {
    /// Acquisition start time
    pub start_time: DateTime<Utc>,
    /// Base sample rate in seconds per frame
    pub clk: f64,
    /// Number of frames
    pub frames: u64,
    /// Whether the logger still owns the file
    pub writing: bool,
    /// Channel data
    pub channels: Vec<FixtureChannel>,
}

impl FixtureFile {
    /// Create a finalized fixture file.
    pub fn new(start_time: DateTime<Utc>, clk: f64, frames: u64) -> Self {
        Self {
            start_time,
            clk,
            frames,
            writing: false,
            channels: Vec::new(),
        }
    }

    /// Add a channel.
    pub fn with_channel(mut self, channel: FixtureChannel) -> Self {
        self.channels.push(channel);
        self
    }

    /// Mark the file as still being written.
    pub fn still_writing(mut self) -> Self {
        self.writing = true;
        self
    }

    /// Write the fixture to disk.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let body = serde_json::to_string(&self.channels)
            .map_err(|e| IbaError::backend("write fixture", e.to_string()))?;
        let start = if self.start_time.timestamp_subsec_nanos() == 0 {
            self.start_time.format("%d.%m.%Y %H:%M:%S").to_string()
        } else {
            self.start_time.format("%d.%m.%Y %H:%M:%S%.3f").to_string()
        };
        let status = if self.writing { STATUS_WRITING } else { "done" };

        let mut file = File::create(path.as_ref())?;
        writeln!(file, "starttime: {start}")?;
        writeln!(file, "clk: {}", self.clk)?;
        writeln!(file, "frames: {}", self.frames)?;
        writeln!(file, "status: {status}")?;
        writeln!(file, "{CHANNELS_MARKER}")?;
        writeln!(file, "{body}")?;
        Ok(())
    }
}

/// Backend that opens fixture files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureBackend;

impl FixtureBackend {
    /// Create a new fixture backend.
    pub fn new() -> Self {
        Self
    }
}

impl DatBackend for FixtureBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn DatReader>> {
        Ok(Box::new(FixtureReader::open(path)?))
    }

    fn writer_active(&self, path: &Path) -> bool {
        read_header(path)
            .map(|header| {
                header
                    .get("status")
                    .map(|s| s == STATUS_WRITING)
                    .unwrap_or(false)
            })
            .unwrap_or(false)
    }
}

/// Open reader over a parsed fixture file.
#[derive(Debug)]
pub struct FixtureReader {
    path: PathBuf,
    start_time: DateTime<Utc>,
    header: HashMap<String, String>,
    channels: BTreeMap<ChannelId, ChannelInfo>,
    samples: HashMap<ChannelId, Samples>,
}

impl FixtureReader {
    /// Open and fully parse a fixture file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(IbaError::not_found(path));
            }
            Err(e) => return Err(e.into()),
        };

        let (header, body) = split_header(&text);
        let header = parse_header(path, header)?;
        let start_time = parse_start_time(path, &header)?;
        let clk = parse_numeric_entry::<f64>(path, &header, "clk")?;
        if clk <= 0.0 {
            return Err(IbaError::damaged(path, "clk must be positive"));
        }
        parse_numeric_entry::<u64>(path, &header, "frames")?;

        // A valid header with no body means the logger was interrupted
        // before the channel section was flushed.
        let body = body.ok_or_else(|| IbaError::not_complete(path))?;
        let fixture_channels: Vec<FixtureChannel> =
            serde_json::from_str(body.trim()).map_err(|_| IbaError::not_complete(path))?;

        let mut channels = BTreeMap::new();
        let mut samples = HashMap::new();
        for chan in fixture_channels {
            let id: ChannelId = chan
                .id
                .parse()
                .map_err(|_| IbaError::damaged(path, format!("bad channel id '{}'", chan.id)))?;
            let kind = match chan.kind.as_str() {
                "analog" => ChannelKind::Analog,
                "digital" => ChannelKind::Digital,
                "text" => ChannelKind::Text,
                other => {
                    return Err(IbaError::damaged(
                        path,
                        format!("unknown channel kind '{other}'"),
                    ));
                }
            };
            let timebase = chan.timebase.unwrap_or(clk);
            let mut info = ChannelInfo::new(id, &chan.name, kind).with_timebase(timebase);
            if let Some(unit) = &chan.unit {
                info = info.with_unit(unit);
            }

            let data = match kind {
                ChannelKind::Text => Samples::Text {
                    segments: chan.segments.unwrap_or_default(),
                },
                _ => Samples::Numeric {
                    timebase,
                    values: chan.values.unwrap_or_default(),
                },
            };
            channels.insert(id, info);
            samples.insert(id, data);
        }

        Ok(Self {
            path: path.to_path_buf(),
            start_time,
            header,
            channels,
            samples,
        })
    }
}

impl DatReader for FixtureReader {
    fn path(&self) -> &Path {
        &self.path
    }

    fn start_time(&self) -> Result<DateTime<Utc>> {
        Ok(self.start_time)
    }

    fn query_info(&self, name: &str) -> Option<String> {
        self.header.get(name).cloned()
    }

    fn channels(&self) -> &BTreeMap<ChannelId, ChannelInfo> {
        &self.channels
    }

    fn samples(&self, id: &ChannelId) -> Result<Samples> {
        self.samples
            .get(id)
            .cloned()
            .ok_or_else(|| IbaError::channel_not_found(vec![id.to_string()], &self.path))
    }

    fn close(&mut self) -> Result<()> {
        self.samples.clear();
        self.channels.clear();
        Ok(())
    }
}

/// Split raw file text into header lines and the JSON body.
fn split_header(text: &str) -> (Vec<&str>, Option<&str>) {
    match text.split_once(CHANNELS_MARKER) {
        Some((head, body)) => (head.lines().collect(), Some(body)),
        None => (text.lines().collect(), None),
    }
}

/// Parse `key: value` header lines into a map.
fn parse_header(path: &Path, lines: Vec<&str>) -> Result<HashMap<String, String>> {
    let mut header = HashMap::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| IbaError::damaged(path, format!("malformed header line '{line}'")))?;
        header.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(header)
}

fn parse_start_time(path: &Path, header: &HashMap<String, String>) -> Result<DateTime<Utc>> {
    let raw = header
        .get("starttime")
        .ok_or_else(|| IbaError::damaged(path, "missing starttime"))?;
    parse_header_time(raw).ok_or_else(|| IbaError::damaged(path, format!("bad starttime '{raw}'")))
}

fn parse_numeric_entry<T: std::str::FromStr>(
    path: &Path,
    header: &HashMap<String, String>,
    key: &str,
) -> Result<T> {
    header
        .get(key)
        .and_then(|v| v.parse::<T>().ok())
        .ok_or_else(|| IbaError::damaged(path, format!("missing or invalid '{key}' entry")))
}

/// Parse a header timestamp, with or without fractional seconds.
pub(crate) fn parse_header_time(raw: &str) -> Option<DateTime<Utc>> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw.trim(), fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Read only the header of a fixture file, without touching the body.
pub(crate) fn read_header(path: &Path) -> Result<HashMap<String, String>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(IbaError::not_found(path));
        }
        Err(e) => return Err(e.into()),
    };
    let reader = BufReader::new(file);
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim() == CHANNELS_MARKER {
            break;
        }
        lines.push(line);
    }
    parse_header(path, lines.iter().map(String::as_str).collect())
}
