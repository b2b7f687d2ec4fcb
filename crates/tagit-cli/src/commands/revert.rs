use std::path::Path;

use tagit_core::{Tag, TagOperations};

use crate::commands::common::{resolve_path_arg, with_repository, Workspace};
use crate::error::CliError;
use crate::interaction::ConsoleInteraction;

pub fn run_revert(workspace: &Workspace, file: &Path, name: &str) -> Result<(), CliError> {
    let path = resolve_path_arg(file)?;
    let interaction = ConsoleInteraction::new(false);

    let created = with_repository(workspace, |repository| {
        Ok(TagOperations::new(repository, &interaction).revert_to_name(&path, name)?)
    })?;

    if let Some(notice) = created_tags_notice(&created) {
        println!("{notice}");
    }
    Ok(())
}

pub fn created_tags_notice(created: &[Tag]) -> Option<String> {
    if created.is_empty() {
        return None;
    }
    let mut notice = String::from("The following tags were created:");
    for tag in created {
        notice.push_str("\n - ");
        notice.push_str(tag.name());
    }
    Some(notice)
}
