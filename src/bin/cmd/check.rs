// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Check command - validate iba files and show their summaries.

use std::path::PathBuf;

use clap::Args;

use crate::common::{format_size, format_timestamp, ProgressBar, Result};
use ibadat::io::{find_dat_files, FixtureBackend};
use ibadat::validate::{check_file, file_summary};

/// Check file validity.
#[derive(Args, Clone, Debug)]
pub struct CheckCmd {
    /// Files or folders to check
    #[arg(value_name = "PATH", required = true)]
    paths: Vec<PathBuf>,

    /// Show full summaries instead of one line per file
    #[arg(short, long)]
    verbose: bool,
}

impl CheckCmd {
    pub fn run(self) -> Result<()> {
        let backend = FixtureBackend::new();

        let mut files = Vec::new();
        for path in &self.paths {
            if path.is_dir() {
                for file in find_dat_files(path)? {
                    files.push(file?);
                }
            } else {
                files.push(path.clone());
            }
        }

        let progress = ProgressBar::new(files.len() as u64, "checking");
        let mut invalid = 0usize;

        for file in &files {
            if self.verbose {
                match file_summary(&backend, file) {
                    Ok(summary) => {
                        println!("=== {} ===", summary.path);
                        println!("Size: {}", format_size(summary.size));
                        println!("Start: {}", format_timestamp(summary.start_time));
                        println!("Clk: {} s", summary.clk);
                        println!("Frames: {}", summary.frames);
                        println!("Channels: {}", summary.channel_count);
                        println!();
                    }
                    Err(e) => {
                        invalid += 1;
                        println!("=== {} ===", file.display());
                        println!("INVALID: {e}");
                        println!();
                    }
                }
            } else {
                match check_file(&backend, file) {
                    Ok(check) => println!(
                        "{}: valid, clk {} s, {} frames",
                        file.display(),
                        check.clk,
                        check.frames
                    ),
                    Err(e) => {
                        invalid += 1;
                        println!("{}: INVALID: {e}", file.display());
                    }
                }
            }
            progress.inc();
        }

        progress.finish_with_message(format!("{} checked", files.len()));
        eprintln!("{} file(s), {} invalid", files.len(), invalid);

        if invalid > 0 {
            std::process::exit(2);
        }
        Ok(())
    }
}
