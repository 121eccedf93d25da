// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Channel access: specs, read calls, result tables, and caching.

pub mod cache;
pub mod read;
pub mod spec;
pub mod table;

// Re-exports
pub use cache::FileCache;
pub use read::{read_file, read_files, ReadOptions};
pub use spec::{ChannelSpec, ColumnSpec};
pub use table::{Column, ColumnData, ResultTable};
