use std::path::Path;

use tagit_core::TagOperations;

use crate::commands::common::{resolve_path_arg, with_repository, Workspace};
use crate::error::CliError;
use crate::interaction::ConsoleInteraction;

pub fn run_mv(workspace: &Workspace, file: &Path, dest_dir: &Path) -> Result<(), CliError> {
    let path = resolve_path_arg(file)?;
    let interaction = ConsoleInteraction::new(false);

    let dest = with_repository(workspace, |repository| {
        Ok(TagOperations::new(repository, &interaction).move_file(&path, dest_dir)?)
    })?;

    println!("{}", dest.display());
    Ok(())
}
