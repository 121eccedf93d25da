// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod channels;
mod check;
mod list;
mod read;

pub use channels::ChannelsCmd;
pub use check::CheckCmd;
pub use list::ListCmd;
pub use read::ReadCmd;
