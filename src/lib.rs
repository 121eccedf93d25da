// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Ibadat
//!
//! Access library for iba measurement files (.dat).
//!
//! The library wraps a pluggable decoder backend with file discovery,
//! time-ordered listing, channel extraction, and validity checking:
//! - **Locating** measurement files in [`io::locate`](crate::io::locate)
//! - **Sorting** by recording start time in [`io::sort`](crate::io::sort)
//! - **Reader sessions** over a backend handle in [`io::session`](crate::io::session)
//! - **Channel access** with specs, time bases, and caching in [`access`](crate::access)
//! - **Validity checks** in [`validate`](crate::validate)
//!
//! ## Architecture
//!
//! The decoder itself sits behind the [`io::backend::DatBackend`] trait;
//! the rest of the library only ever sees trait objects, so a vendor
//! decoder and the bundled fixture backend are interchangeable.
//! - `io/backend/` - Backend traits and the fixture backend
//! - `io/` - File location, sorting, metadata, sessions
//! - `access/` - Channel specs, read calls, result tables, side-file cache
//! - `validate` - File health checks and summaries
//!
//! ## Example: Reading Channels
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use ibadat::access::{read_file, ChannelSpec, ReadOptions};
//! use ibadat::io::FixtureBackend;
//!
//! let backend = FixtureBackend::new();
//! let spec = ChannelSpec::parse("Speed_act,Temp_1", ',');
//! let table = read_file(&backend, "line3/2024/run_0042.dat", &spec, &ReadOptions::new())?;
//! println!("{} rows", table.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Sorted Listing
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use ibadat::io::{find_dat_files, sort_by_start_time, FixtureBackend};
//!
//! let backend = FixtureBackend::new();
//! let files = find_dat_files("line3/2024")?.collect::<Result<Vec<_>, _>>()?;
//! let sorted = sort_by_start_time(&backend, files)?;
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use crate::core::{IbaError, Result};

// File IO: backends, locating, sorting, sessions
pub mod io;

// Channel access and caching
pub mod access;

// Validity checks
pub mod validate;

pub use access::{read_file, read_files, ChannelSpec, FileCache, ReadOptions, ResultTable};
pub use io::{
    find_dat_files, find_files, sort_by_start_time, DatBackend, DatReader, FileQuery,
    FixtureBackend, ReaderSession,
};
pub use validate::{check_file, file_summary};
