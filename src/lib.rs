//! Core library entry for the `joinboard` CLI.
//!
//! A terminal client for the Join Kanban board: tasks in four buckets,
//! assignees, subtasks and an address book, all kept on a REST backend.

pub mod adapters;
pub mod api;
pub mod board;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod contacts;
pub mod context;
pub mod model;
pub mod ports;
pub mod session;
pub mod summary;

#[cfg(test)]
mod testing;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli)
}
