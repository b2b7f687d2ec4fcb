use std::path::Path;

use tagit_core::TagOperations;

use crate::commands::common::{resolve_path_arg, with_repository, Workspace};
use crate::error::CliError;
use crate::interaction::ConsoleInteraction;

pub fn run_history(workspace: &Workspace, file: &Path) -> Result<(), CliError> {
    let path = resolve_path_arg(file)?;
    let interaction = ConsoleInteraction::new(false);

    let names = with_repository(workspace, |repository| {
        Ok(TagOperations::new(repository, &interaction).history(&path)?)
    })?;

    if names.is_empty() {
        println!("No previous names");
    }
    for (index, name) in names.iter().enumerate() {
        println!("{:>3}  {name}", index + 1);
    }
    Ok(())
}
