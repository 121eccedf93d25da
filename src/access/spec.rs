// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Channel specifications.
//!
//! A [`ChannelSpec`] names which channels a read extracts and which output
//! columns they land in. The historical loose shapes (single delimited
//! string, list of alternatives, name-to-column map) are normalized into
//! one tagged representation at the boundary before any processing.

use serde::{Deserialize, Serialize};

use crate::io::backend::DatReader;

/// One output column with its candidate channel ids.
///
/// Candidates are tried in order; the first one present in the file with
/// non-empty data feeds the column. Alternatives exist to tolerate a
/// signal's id changing across files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Candidate channel ids or names, tried in order
    pub candidates: Vec<String>,
    /// Output column name
    pub column: String,
}

impl ColumnSpec {
    /// Create a column fed by a single channel, named after it.
    pub fn single(channel: impl Into<String>) -> Self {
        let channel = channel.into();
        Self {
            candidates: vec![channel.clone()],
            column: channel,
        }
    }

    /// Create a column with alternative candidate ids.
    ///
    /// The column is named after the first candidate unless renamed.
    pub fn alternatives(candidates: Vec<String>) -> Self {
        let column = candidates.first().cloned().unwrap_or_default();
        Self { candidates, column }
    }

    /// Rename the output column.
    pub fn named(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }
}

/// Which channels to read from a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelSpec {
    /// Every channel in the file, columns named after the channels
    All,
    /// A single channel by name or id
    Single(String),
    /// One column fed by the first resolvable candidate id
    Alternatives(Vec<String>),
    /// Explicit columns, each with its own candidates and output name
    Columns(Vec<ColumnSpec>),
}

impl ChannelSpec {
    /// Parse a delimited channel string.
    ///
    /// `""` and `"*"` select all channels. Entries are trimmed and empty
    /// entries dropped; a single remaining entry becomes [`Single`].
    ///
    /// [`Single`]: ChannelSpec::Single
    pub fn parse(text: &str, delimiter: char) -> Self {
        let text = text.trim();
        if text.is_empty() || text == "*" {
            return ChannelSpec::All;
        }

        let mut entries: Vec<String> = text
            .split(delimiter)
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect();

        match entries.len() {
            0 => ChannelSpec::All,
            1 => ChannelSpec::Single(entries.remove(0)),
            _ => ChannelSpec::Columns(entries.into_iter().map(ColumnSpec::single).collect()),
        }
    }

    /// Build a spec from (candidates, column) pairs, e.g. a name map.
    pub fn mapped(pairs: Vec<(Vec<String>, String)>) -> Self {
        ChannelSpec::Columns(
            pairs
                .into_iter()
                .map(|(candidates, column)| ColumnSpec {
                    candidates,
                    column,
                })
                .collect(),
        )
    }

    /// Rename output columns positionally.
    ///
    /// Surplus names are ignored; columns beyond the name list keep their
    /// default names. [`All`] is unaffected.
    ///
    /// [`All`]: ChannelSpec::All
    pub fn with_names(self, names: &[String]) -> Self {
        let mut columns = match self {
            ChannelSpec::All => return ChannelSpec::All,
            ChannelSpec::Single(channel) => vec![ColumnSpec::single(channel)],
            ChannelSpec::Alternatives(candidates) => vec![ColumnSpec::alternatives(candidates)],
            ChannelSpec::Columns(columns) => columns,
        };
        for (column, name) in columns.iter_mut().zip(names) {
            column.column = name.clone();
        }
        ChannelSpec::Columns(columns)
    }

    /// Normalize into the ordered column list for one open file.
    ///
    /// [`All`] expands to one column per channel present in the file,
    /// in channel-id order.
    ///
    /// [`All`]: ChannelSpec::All
    pub fn normalize(&self, reader: &dyn DatReader) -> Vec<ColumnSpec> {
        match self {
            ChannelSpec::All => reader
                .channels()
                .values()
                .map(|info| ColumnSpec::single(&info.name))
                .collect(),
            ChannelSpec::Single(channel) => vec![ColumnSpec::single(channel)],
            ChannelSpec::Alternatives(candidates) => {
                vec![ColumnSpec::alternatives(candidates.clone())]
            }
            ChannelSpec::Columns(columns) => columns
                .iter()
                .filter(|c| !c.candidates.is_empty())
                .cloned()
                .collect(),
        }
    }
}
