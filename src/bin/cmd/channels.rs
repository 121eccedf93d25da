// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Channels command - list the channels of an iba file.

use std::path::PathBuf;

use clap::Args;

use crate::common::Result;
use ibadat::io::FixtureBackend;
use ibadat::validate::channel_infos;

/// List channels in a file.
#[derive(Args, Clone, Debug)]
pub struct ChannelsCmd {
    /// Input file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Only show channels whose name or id contains this text
    #[arg(short, long)]
    filter: Option<String>,

    /// Show per-channel extra info entries
    #[arg(long)]
    extra: bool,
}

impl ChannelsCmd {
    pub fn run(self) -> Result<()> {
        let backend = FixtureBackend::new();
        let infos = channel_infos(&backend, &self.input, None)?;

        println!("=== Channels in {} ===", self.input.display());
        println!();

        let mut shown = 0usize;
        for info in &infos {
            if let Some(filter) = &self.filter {
                let lower = filter.to_lowercase();
                if !info.name.to_lowercase().contains(&lower)
                    && !info.id.to_string().contains(filter.as_str())
                {
                    continue;
                }
            }
            shown += 1;

            print!("[{}] {} | {}", info.id, info.name, info.kind);
            if info.timebase > 0.0 {
                print!(" | {} s", info.timebase);
            }
            if let Some(unit) = &info.unit {
                print!(" | {unit}");
            }
            println!();

            if self.extra && !info.extra.is_empty() {
                let mut entries: Vec<_> = info.extra.iter().collect();
                entries.sort();
                for (key, value) in entries {
                    println!("    {key}: {value}");
                }
            }
        }

        println!();
        println!("{shown} of {} channel(s)", infos.len());

        Ok(())
    }
}
