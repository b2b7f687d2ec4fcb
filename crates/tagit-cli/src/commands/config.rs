use std::path::PathBuf;

use crate::cli::ConfigCommands;
use crate::config::{default_config_path, normalize_path_option, CliConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            default_data_dir,
            default_root,
        } => run_config_init(default_data_dir, default_root),
        ConfigCommands::Show => run_config_show(),
    }
}

pub fn run_config_init(
    data_dir: Option<PathBuf>,
    default_root: Option<PathBuf>,
) -> Result<(), CliError> {
    let existing = CliConfig::load().map_err(CliError::Config)?;
    let config = merge_config(existing, data_dir, default_root)?;
    let path = config.save().map_err(CliError::Config)?;
    println!("{}", path.display());
    Ok(())
}

/// Explicit values replace stored ones; paths are stored absolute.
pub fn merge_config(
    existing: CliConfig,
    data_dir: Option<PathBuf>,
    default_root: Option<PathBuf>,
) -> Result<CliConfig, CliError> {
    let absolute = |path: Option<PathBuf>| -> Result<Option<PathBuf>, CliError> {
        normalize_path_option(path)
            .map(|path| tagit_core::repository::absolute_path(&path))
            .transpose()
            .map_err(CliError::from)
    };

    Ok(CliConfig {
        version: existing.version,
        data_dir: absolute(data_dir)?.or(existing.data_dir),
        default_root: absolute(default_root)?.or(existing.default_root),
    })
}

pub fn run_config_show() -> Result<(), CliError> {
    let path = default_config_path().map_err(CliError::Config)?;
    let config = CliConfig::load_from_path(&path).map_err(CliError::Config)?;
    let data_dir = config.resolve_data_dir(None).map_err(CliError::Config)?;
    let root = config.resolve_root(None).map_err(CliError::Config)?;

    println!("config:   {}", path.display());
    println!("data dir: {}", data_dir.display());
    println!("root:     {}", root.display());
    Ok(())
}
