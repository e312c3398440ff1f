//! The `fieldsift` command-line front end.
//!
//! Parses arguments with [`cli::Cli`], resolves a [`config::Config`] and
//! dispatches to a handler in [`commands`]. Handlers write to any
//! [`std::io::Write`], so the whole CLI can be driven from tests through
//! [`run`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod logger;
pub mod render;

use std::io::Write;

use anyhow::Result;

use crate::cli::{Cli, Command};
use crate::config::Config;

/// Runs one parsed invocation.
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let config = Config::from_cli(&cli);
    log::debug!("store at {}", config.store.display());
    run_with(&config, cli.command, out)
}

/// Runs a command against an explicit configuration.
pub fn run_with(config: &Config, command: Command, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Fields => commands::fields(config, out),
        Command::List => commands::list(config, out),
        Command::Add(args) => commands::add(config, &args, out),
        Command::Edit(args) => commands::edit(config, &args, out),
        Command::Remove { id } => commands::remove(config, &id, out),
        Command::Clear => commands::clear(config, out),
        Command::Filter(args) => commands::filter(config, &args, out),
        Command::Export(args) => commands::export_records(config, &args, out),
    }
}
