// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! I/O layer: file discovery, sorting, metadata, and the backend seam.

pub mod backend;
pub mod locate;
pub mod metadata;
pub mod session;
pub mod sort;

// Re-exports
pub use backend::{DatBackend, DatReader, FixtureBackend, Samples};
pub use locate::{find_dat_files, find_files, FileQuery, FindFiles};
pub use metadata::{ChannelId, ChannelInfo, ChannelKind, FileCheck, FileSummary};
pub use session::ReaderSession;
pub use sort::{read_start_time, sort_by_start_time, sort_by_start_time_lossy};
