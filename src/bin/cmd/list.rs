// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! List command - locate iba files, optionally in recording order.

use std::path::PathBuf;

use clap::Args;

use crate::common::Result;
use ibadat::io::{find_files, sort_by_start_time, sort_by_start_time_lossy, FileQuery, FixtureBackend};

/// Locate iba files under a folder.
#[derive(Args, Clone, Debug)]
pub struct ListCmd {
    /// Folder to scan
    #[arg(value_name = "FOLDER")]
    root: PathBuf,

    /// File extension to match
    #[arg(short = 't', long, default_value = "dat")]
    file_type: String,

    /// Glob pattern (`*`, `?`) matched against file names
    #[arg(short, long)]
    pattern: Option<String>,

    /// Do not scan subfolders
    #[arg(long)]
    no_recursive: bool,

    /// Order files by recording start time instead of path
    #[arg(short, long)]
    sorted: bool,

    /// With --sorted, skip files whose start time cannot be read
    #[arg(long)]
    skip_damaged: bool,
}

impl ListCmd {
    pub fn run(self) -> Result<()> {
        let mut query = FileQuery::new()
            .with_file_type(&self.file_type)
            .with_recursive(!self.no_recursive);
        if let Some(pattern) = &self.pattern {
            query = query.with_name_pattern(pattern)?;
        }

        let files = find_files(&self.root, &query)?.collect::<ibadat::Result<Vec<_>>>()?;

        let files = if self.sorted {
            let backend = FixtureBackend::new();
            if self.skip_damaged {
                let (sorted, skipped) = sort_by_start_time_lossy(&backend, files);
                for (file, err) in &skipped {
                    eprintln!("Skipping {}: {err}", file.display());
                }
                sorted
            } else {
                sort_by_start_time(&backend, files)?
            }
        } else {
            files
        };

        for file in &files {
            println!("{}", file.display());
        }
        eprintln!("{} file(s)", files.len());

        Ok(())
    }
}
