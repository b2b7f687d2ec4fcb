//! tagit CLI - tag image files from the terminal
//!
//! Tags are stored in the file names themselves, so every tag edit renames a
//! file on disk.

mod cli;
mod commands;
mod config;
mod error;
mod interaction;


use std::path::PathBuf;

use clap::Parser;
use tagit_core::Interaction;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::common::Workspace;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::export::run_export;
use crate::commands::history::run_history;
use crate::commands::list::run_list;
use crate::commands::log::run_log;
use crate::commands::mv::run_mv;
use crate::commands::prune::run_prune;
use crate::commands::revert::run_revert;
use crate::commands::scan::run_scan;
use crate::commands::set::run_set;
use crate::commands::tags::run_tags;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::interaction::ConsoleInteraction;

fn main() {
    if let Err(error) = run() {
        ConsoleInteraction::new(false).report(&error.to_string());
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "tagit=warn".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let root = cli.root;
    let data_dir = cli.data_dir;
    let quiet = cli.quiet;
    let workspace = || resolve_workspace(root.clone(), data_dir.clone(), quiet);

    match cli.command {
        Commands::Scan => run_scan(&workspace()?)?,
        Commands::List { tag, json } => run_list(&workspace()?, tag.as_deref(), json)?,
        Commands::Tags { command } => run_tags(&workspace()?, command)?,
        Commands::Set { file, tags } => run_set(&workspace()?, &file, &tags)?,
        Commands::History { file } => run_history(&workspace()?, &file)?,
        Commands::Revert { file, name } => run_revert(&workspace()?, &file, &name)?,
        Commands::Mv { file, dest_dir } => run_mv(&workspace()?, &file, &dest_dir)?,
        Commands::Log => run_log(&workspace()?)?,
        Commands::Prune => run_prune(&workspace()?)?,
        Commands::Export { format, output } => {
            run_export(&workspace()?, format, output.as_deref())?;
        }
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
        Commands::Config { command } => run_config(command)?,
    }

    Ok(())
}

fn resolve_workspace(
    root: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    quiet: bool,
) -> Result<Workspace, CliError> {
    let config = CliConfig::load().map_err(CliError::Config)?;
    Ok(Workspace {
        root: config.resolve_root(root).map_err(CliError::Config)?,
        data_dir: config.resolve_data_dir(data_dir).map_err(CliError::Config)?,
        quiet,
    })
}
