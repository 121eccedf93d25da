// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};

use ibadat::io::backend::fixture::{FixtureChannel, FixtureFile};

/// Unique temp file path for this test process.
pub fn unique_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("ibadat_it_{}_{}.dat", std::process::id(), name));
    path
}

/// Unique temp directory for this test process, created empty.
pub fn unique_dir(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("ibadat_it_{}_{}", std::process::id(), name));
    let _ = fs::remove_dir_all(&path);
    fs::create_dir_all(&path).unwrap();
    path
}

/// A recording start time `offset_secs` into the reference day.
pub fn start_at(offset_secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 2, 1, 10, 30, 0).unwrap() + chrono::Duration::seconds(offset_secs)
}

/// A finalized single-channel fixture: 100 frames of "Speed" at clk 0.01.
pub fn speed_fixture(start: DateTime<Utc>) -> FixtureFile {
    FixtureFile::new(start, 0.01, 100).with_channel(FixtureChannel::numeric(
        "0:1",
        "Speed",
        (0..100).map(|i| i as f64).collect(),
    ))
}
