// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Integration tests for validity checks and session lifecycle.

mod common;

use std::fs;

use common::{speed_fixture, start_at, unique_path};
use ibadat::io::backend::fixture::{FixtureChannel, FixtureFile};
use ibadat::io::{FixtureBackend, ReaderSession};
use ibadat::validate::{channel_infos, check_file, file_summary, has_channel};
use ibadat::IbaError;

#[test]
fn test_check_valid_file() {
    let path = unique_path("check_valid");
    speed_fixture(start_at(0)).write_to(&path).unwrap();

    let backend = FixtureBackend::new();
    let check = check_file(&backend, &path).unwrap();
    assert!(check.valid);
    assert_eq!(check.clk, 0.01);
    assert_eq!(check.frames, 100);

    let _ = fs::remove_file(&path);
}

#[test]
fn test_check_empty_file_is_valid() {
    let path = unique_path("check_empty");
    FixtureFile::new(start_at(0), 0.01, 0).write_to(&path).unwrap();

    let backend = FixtureBackend::new();
    let check = check_file(&backend, &path).unwrap();
    assert!(check.valid);
    assert_eq!(check.frames, 0);

    let _ = fs::remove_file(&path);
}

#[test]
fn test_check_truncated_file_is_not_complete() {
    let path = unique_path("check_truncated");
    fs::write(
        &path,
        "starttime: 01.02.2023 10:30:00\nclk: 0.01\nframes: 100\nchannels:\n[{\"id\":",
    )
    .unwrap();

    let backend = FixtureBackend::new();
    let err = check_file(&backend, &path).unwrap_err();
    assert!(matches!(err, IbaError::FileNotComplete { .. }));

    let _ = fs::remove_file(&path);
}

#[test]
fn test_check_sentinel_frames_is_not_complete() {
    let path = unique_path("check_sentinel");
    FixtureFile::new(start_at(0), 0.01, 1_000_000_000)
        .write_to(&path)
        .unwrap();

    let backend = FixtureBackend::new();
    let err = check_file(&backend, &path).unwrap_err();
    assert!(matches!(err, IbaError::FileNotComplete { .. }));

    let _ = fs::remove_file(&path);
}

#[test]
fn test_check_damaged_header() {
    let path = unique_path("check_damaged");
    fs::write(&path, "clk: 0.01\nframes: 100\nchannels:\n[]\n").unwrap();

    let backend = FixtureBackend::new();
    let err = check_file(&backend, &path).unwrap_err();
    assert!(matches!(err, IbaError::FileDamaged { .. }));

    let _ = fs::remove_file(&path);
}

#[test]
fn test_check_missing_file() {
    let backend = FixtureBackend::new();
    let err = check_file(&backend, "/nonexistent/run.dat").unwrap_err();
    assert!(matches!(err, IbaError::NotFound { .. }));
}

#[test]
fn test_file_in_use_is_refused() {
    let path = unique_path("check_in_use");
    speed_fixture(start_at(0)).still_writing().write_to(&path).unwrap();

    let backend = FixtureBackend::new();
    let err = check_file(&backend, &path).unwrap_err();
    assert!(matches!(err, IbaError::FileInUse { .. }));

    let err = ReaderSession::open(&backend, &path).unwrap_err();
    assert!(matches!(err, IbaError::FileInUse { .. }));

    let _ = fs::remove_file(&path);
}

#[test]
fn test_file_summary() {
    let path = unique_path("summary");
    FixtureFile::new(start_at(0), 0.01, 100)
        .with_channel(FixtureChannel::numeric("0:1", "Speed", vec![1.0; 100]))
        .with_channel(FixtureChannel::numeric("1:0", "Temp", vec![20.0; 100]))
        .write_to(&path)
        .unwrap();

    let backend = FixtureBackend::new();
    let summary = file_summary(&backend, &path).unwrap();
    assert_eq!(summary.start_time, start_at(0));
    assert_eq!(summary.clk, 0.01);
    assert_eq!(summary.frames, 100);
    assert_eq!(summary.channel_count, 2);
    assert!(summary.size > 0);

    let _ = fs::remove_file(&path);
}

#[test]
fn test_channel_infos_and_has_channel() {
    let path = unique_path("channel_infos");
    FixtureFile::new(start_at(0), 0.01, 100)
        .with_channel(FixtureChannel::numeric("0:1", "Speed", vec![1.0; 100]))
        .with_channel(FixtureChannel::numeric("1:0", "Temp", vec![20.0; 100]))
        .write_to(&path)
        .unwrap();

    let backend = FixtureBackend::new();

    let all = channel_infos(&backend, &path, None).unwrap();
    assert_eq!(all.len(), 2);

    let named = vec!["Temp".to_string(), "0:1".to_string(), "Nope".to_string()];
    let some = channel_infos(&backend, &path, Some(&named)).unwrap();
    assert_eq!(some.len(), 2);
    assert_eq!(some[0].name, "Temp");
    assert_eq!(some[1].name, "Speed");

    assert!(has_channel(&backend, &path, "Speed"));
    assert!(has_channel(&backend, &path, "1:0"));
    assert!(!has_channel(&backend, &path, "Pressure"));
    assert!(!has_channel(&backend, "/nonexistent/run.dat", "Speed"));

    let _ = fs::remove_file(&path);
}
