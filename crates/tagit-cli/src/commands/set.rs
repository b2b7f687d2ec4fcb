use std::path::Path;

use tagit_core::TagOperations;

use crate::commands::common::{resolve_path_arg, with_repository, Workspace};
use crate::error::CliError;
use crate::interaction::ConsoleInteraction;

pub fn run_set(workspace: &Workspace, file: &Path, tags: &[String]) -> Result<(), CliError> {
    let path = resolve_path_arg(file)?;
    let interaction = ConsoleInteraction::new(false);

    with_repository(workspace, |repository| {
        TagOperations::new(repository, &interaction).set_tags(&path, tags)?;
        Ok(())
    })
}
