// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Read command - extract channel data into a CSV table.

use std::fs::{self, File};
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::Args;

use crate::common::Result;
use ibadat::access::{read_file, read_files, ChannelSpec, ColumnData, FileCache, ReadOptions, ResultTable};
use ibadat::io::FixtureBackend;

/// Read channel data from one or more files.
#[derive(Args, Clone, Debug)]
pub struct ReadCmd {
    /// Input files; several files are stacked row-wise
    #[arg(value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// Channels to read, delimited; "*" reads every channel
    #[arg(short, long, default_value = "*")]
    channels: String,

    /// Delimiter of the --channels string
    #[arg(short, long, default_value = ",")]
    delimiter: char,

    /// Rename output columns, positionally, delimited like --channels
    #[arg(short, long)]
    names: Option<String>,

    /// TOML file with a [channels] table mapping columns to candidate ids
    #[arg(short, long, conflicts_with_all = ["channels", "names"])]
    map: Option<PathBuf>,

    /// Resample to this time base in seconds (0 keeps the native base)
    #[arg(long, default_value_t = 0.0)]
    tbase: f64,

    /// Omit channels that cannot be resolved instead of failing
    #[arg(long)]
    ignore: bool,

    /// Cache read results in this folder
    #[arg(long, value_name = "FOLDER")]
    cache: Option<PathBuf>,

    /// Write CSV to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl ReadCmd {
    pub fn run(self) -> Result<()> {
        let backend = FixtureBackend::new();

        let mut spec = match &self.map {
            Some(map) => load_channel_map(map)?,
            None => ChannelSpec::parse(&self.channels, self.delimiter),
        };
        if let Some(names) = &self.names {
            let names: Vec<String> = names
                .split(self.delimiter)
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect();
            spec = spec.with_names(&names);
        }

        let cache = match &self.cache {
            Some(dir) => Some(FileCache::new(dir)?),
            None => None,
        };
        let mut options = ReadOptions::new()
            .with_tbase(self.tbase)
            .with_delimiter(self.delimiter)
            .with_ignore(self.ignore);
        if let Some(cache) = &cache {
            options = options.with_cache(cache);
        }

        let table = if self.inputs.len() == 1 {
            read_file(&backend, &self.inputs[0], &spec, &options)?
        } else {
            read_files(&backend, &self.inputs, &spec, &options)?
        };

        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("cannot create {}", path.display()))?;
                write_csv(&mut BufWriter::new(file), &table)?;
                eprintln!(
                    "{} row(s), {} column(s) written to {}",
                    table.len(),
                    table.columns.len(),
                    path.display()
                );
            }
            None => {
                let stdout = std::io::stdout();
                write_csv(&mut stdout.lock(), &table)?;
            }
        }

        Ok(())
    }
}

/// Load a channel map from a TOML file.
///
/// Expected shape:
///
/// ```toml
/// [channels]
/// Speed = "3:0"
/// Temp = ["4:1", "5:1"]
/// ```
fn load_channel_map(path: &Path) -> Result<ChannelSpec> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read channel map {}", path.display()))?;
    let table: toml::Table = toml::from_str(&text)
        .with_context(|| format!("invalid channel map {}", path.display()))?;

    let channels = table
        .get("channels")
        .and_then(|v| v.as_table())
        .ok_or_else(|| anyhow!("channel map {} has no [channels] table", path.display()))?;

    let mut pairs = Vec::with_capacity(channels.len());
    for (column, value) in channels {
        let candidates = match value {
            toml::Value::String(s) => vec![s.clone()],
            toml::Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| anyhow!("channel map entry '{column}' must list strings"))
                })
                .collect::<Result<Vec<_>>>()?,
            _ => {
                return Err(anyhow!(
                    "channel map entry '{column}' must be a string or an array of strings"
                ))
            }
        };
        pairs.push((candidates, column.clone()));
    }

    Ok(ChannelSpec::mapped(pairs))
}

/// Write a result table as CSV, time first.
fn write_csv(out: &mut impl std::io::Write, table: &ResultTable) -> Result<()> {
    write!(out, "time")?;
    for column in &table.columns {
        write!(out, ",{}", escape_csv(&column.name))?;
    }
    writeln!(out)?;

    for row in 0..table.len() {
        write!(out, "{}", table.time[row])?;
        for column in &table.columns {
            match &column.data {
                ColumnData::Numeric(values) => write!(out, ",{}", values[row])?,
                ColumnData::Text(values) => write!(out, ",{}", escape_csv(&values[row]))?,
            }
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
