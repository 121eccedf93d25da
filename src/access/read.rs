// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The channel accessor: reads channel data out of iba files.
//!
//! Given a [`ChannelSpec`], the accessor resolves candidate ids, extracts
//! sample data through an open [`ReaderSession`], brings every channel
//! onto the file's frame grid, applies the requested time base, and
//! assembles a [`ResultTable`]. With a [`FileCache`] configured, a fresh
//! cached table short-circuits the whole read without reopening the
//! source file.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::error::{IbaError, Result};
use crate::io::backend::{DatBackend, Samples};
use crate::io::session::ReaderSession;
use crate::validate::inspect_reader;

use super::cache::FileCache;
use super::spec::ChannelSpec;
use super::table::{ColumnData, ResultTable};

/// Options of a single read call.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions<'a> {
    /// Target sampling interval in seconds; 0 keeps the file's native base
    pub tbase: f64,
    /// Delimiter for channel specs given as a single string
    pub delimiter: char,
    /// Omit unresolvable columns instead of failing the read
    pub ignore: bool,
    /// Cache to probe before and fill after the read
    pub cache: Option<&'a FileCache>,
}

impl Default for ReadOptions<'_> {
    fn default() -> Self {
        Self {
            tbase: 0.0,
            delimiter: ',',
            ignore: false,
            cache: None,
        }
    }
}

impl<'a> ReadOptions<'a> {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target time base in seconds.
    pub fn with_tbase(mut self, tbase: f64) -> Self {
        self.tbase = tbase;
        self
    }

    /// Set the spec delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Tolerate unresolvable channels by omitting their columns.
    pub fn with_ignore(mut self, ignore: bool) -> Self {
        self.ignore = ignore;
        self
    }

    /// Enable caching through the given cache.
    pub fn with_cache(mut self, cache: &'a FileCache) -> Self {
        self.cache = Some(cache);
        self
    }
}

/// Read channels from one iba file into a table.
pub fn read_file(
    backend: &dyn DatBackend,
    path: impl AsRef<Path>,
    spec: &ChannelSpec,
    options: &ReadOptions<'_>,
) -> Result<ResultTable> {
    let path = path.as_ref();

    if let Some(cache) = options.cache {
        if let Some(table) = cache.load(path, spec, options.tbase, options.ignore) {
            return Ok(table);
        }
        debug!(file = %path.display(), "cache miss, reading source");
    }

    let session = ReaderSession::open(backend, path)?;
    let (clk, frames) = inspect_reader(&*session, path)?;
    let frames = frames as usize;

    let start = session.start_time()?;
    let start_ns = start
        .timestamp_nanos_opt()
        .ok_or_else(|| IbaError::damaged(path, "start time out of representable range"))?;
    let step = decimation_step(options.tbase, clk);

    let time: Vec<i64> = (0..frames)
        .step_by(step)
        .map(|i| start_ns + (i as f64 * clk * 1e9).round() as i64)
        .collect();
    let mut table = ResultTable::new(time);

    for column in spec.normalize(&*session) {
        let mut resolved = None;
        for candidate in &column.candidates {
            let Some(info) = session.resolve(candidate) else {
                continue;
            };
            let samples = session.samples(&info.id)?;
            if samples.is_empty() {
                // Present but empty does not resolve the column; keep
                // trying the remaining candidates.
                continue;
            }
            resolved = Some(samples);
            break;
        }

        let samples = match resolved {
            Some(samples) => samples,
            None if options.ignore => {
                debug!(column = %column.column, file = %path.display(), "omitting unresolved column");
                continue;
            }
            None => {
                return Err(IbaError::channel_not_found(
                    column.candidates.clone(),
                    path,
                ));
            }
        };

        let data = match samples {
            Samples::Numeric { timebase, values } => {
                ColumnData::Numeric(decimate(regrid(values, timebase, clk), step))
            }
            Samples::Text { segments } => {
                if segments.windows(2).any(|pair| pair[1].0 < pair[0].0) {
                    return Err(IbaError::damaged(
                        path,
                        format!("text segments of '{}' out of chronological order", column.column),
                    ));
                }
                ColumnData::Text(decimate(expand_text(&segments, clk, frames), step))
            }
        };
        table.push_column(column.column, data)?;
    }

    if let Some(cache) = options.cache {
        cache.store(path, spec, options.tbase, options.ignore, &table)?;
    }

    Ok(table)
}

/// Read several files with the same spec and stack the results.
///
/// Missing channels never abort a multi-file read; their rows are filled
/// by the stacking rules instead.
pub fn read_files(
    backend: &dyn DatBackend,
    paths: &[PathBuf],
    spec: &ChannelSpec,
    options: &ReadOptions<'_>,
) -> Result<ResultTable> {
    let options = options.with_ignore(true);
    let mut tables = Vec::with_capacity(paths.len());
    for path in paths {
        tables.push(read_file(backend, path, spec, &options)?);
    }
    ResultTable::stack(&tables)
}

/// Decimation step for a target time base over the file clk.
fn decimation_step(tbase: f64, clk: f64) -> usize {
    if tbase <= 0.0 || clk <= 0.0 {
        return 1;
    }
    ((tbase / clk) as usize).max(1)
}

/// Bring channel samples onto the file frame grid.
///
/// Channels sampled slower than the file clk repeat each value until the
/// grids line up; channels already on the grid pass through.
fn regrid(values: Vec<f64>, timebase: f64, clk: f64) -> Vec<f64> {
    if clk <= 0.0 || timebase <= clk {
        return values;
    }
    let factor = (timebase / clk).round() as usize;
    if factor <= 1 {
        return values;
    }
    let mut gridded = Vec::with_capacity(values.len() * factor);
    for value in values {
        gridded.extend(std::iter::repeat(value).take(factor));
    }
    gridded
}

/// Expand timed text segments onto the frame grid.
///
/// Each segment's text fills the rows from its offset up to the next
/// segment (or the end of the file). Rows before the first segment stay
/// empty.
fn expand_text(segments: &[(f64, String)], clk: f64, frames: usize) -> Vec<String> {
    let mut expanded = vec![String::new(); frames];
    if clk <= 0.0 {
        return expanded;
    }
    for (i, (offset, text)) in segments.iter().enumerate() {
        let start = ((offset / clk) as usize).min(frames);
        // A misordered successor must not produce an inverted range.
        let end = segments
            .get(i + 1)
            .map(|(next, _)| ((next / clk) as usize).min(frames))
            .unwrap_or(frames)
            .max(start);
        for slot in &mut expanded[start..end] {
            slot.clone_from(text);
        }
    }
    expanded
}

/// Keep every `step`-th element, starting with the first.
fn decimate<T>(values: Vec<T>, step: usize) -> Vec<T> {
    if step <= 1 {
        return values;
    }
    values.into_iter().step_by(step).collect()
}
