// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Ibadat CLI
//!
//! Command-line tool for working with iba acquisition files.
//!
//! ## Usage
//!
//! ```sh
//! # Locate files, in recording order
//! ibadat list /data/line3 --sorted
//!
//! # Validate files
//! ibadat check /data/line3/run_0042.dat
//!
//! # List channels
//! ibadat channels /data/line3/run_0042.dat --filter speed
//!
//! # Extract channel data as CSV
//! ibadat read /data/line3/run_0042.dat --channels "3:0,Temp_1" --tbase 0.1
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{ChannelsCmd, CheckCmd, ListCmd, ReadCmd};
use common::Result;

/// Ibadat - iba acquisition file toolkit
///
/// Locate, order, validate, and read channel data from iba .dat files.
#[derive(Parser, Clone)]
#[command(name = "ibadat")]
#[command(about = "Toolkit for iba acquisition files", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Locate iba files, optionally ordered by recording start time
    List(ListCmd),

    /// Check file validity and show summaries
    Check(CheckCmd),

    /// List the channels of a file
    Channels(ChannelsCmd),

    /// Read channel data into a CSV table
    Read(ReadCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List(cmd) => cmd.run(),
        Commands::Check(cmd) => cmd.run(),
        Commands::Channels(cmd) => cmd.run(),
        Commands::Read(cmd) => cmd.run(),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
