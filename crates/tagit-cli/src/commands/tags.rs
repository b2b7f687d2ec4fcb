use tagit_core::export::render_tags_json;
use tagit_core::{Error, RemovalOutcome, Repository, Tag, TagOperations};

use crate::cli::TagCommands;
use crate::commands::common::{require_tag_name, with_repository, Workspace};
use crate::error::CliError;
use crate::interaction::ConsoleInteraction;

pub fn run_tags(workspace: &Workspace, command: TagCommands) -> Result<(), CliError> {
    match command {
        TagCommands::List { json } => run_tags_list(workspace, json),
        TagCommands::Add { name } => run_tags_add(workspace, &name),
        TagCommands::Remove { names, yes } => run_tags_remove(workspace, &names, yes),
    }
}

pub fn run_tags_list(workspace: &Workspace, as_json: bool) -> Result<(), CliError> {
    with_repository(workspace, |repository| {
        let tags = repository.registry().snapshot();
        if as_json {
            println!("{}", render_tags_json(&tags)?);
        } else {
            for tag in &tags {
                let count = repository.files_with_tag(tag.name()).len();
                println!("{:<24}  {count}", tag.name());
            }
        }
        Ok(())
    })
}

pub fn run_tags_add(workspace: &Workspace, name: &str) -> Result<(), CliError> {
    let interaction = ConsoleInteraction::new(false);
    let tag = with_repository(workspace, |repository| {
        Ok(TagOperations::new(repository, &interaction).add_tag(name)?)
    })?;
    println!("{tag}");
    Ok(())
}

pub fn run_tags_remove(
    workspace: &Workspace,
    names: &[String],
    assume_yes: bool,
) -> Result<(), CliError> {
    let names = names
        .iter()
        .map(|name| require_tag_name(name))
        .collect::<Result<Vec<_>, _>>()?;
    let interaction = ConsoleInteraction::new(assume_yes);

    let outcome = with_repository(workspace, |repository| {
        let tags = registered_tags(repository, &names)?;
        Ok(TagOperations::new(repository, &interaction).remove_tags(&tags)?)
    })?;

    match outcome {
        RemovalOutcome::Removed { retagged } => {
            println!(
                "Removed {} tag(s); retagged {} file(s)",
                names.len(),
                retagged.len()
            );
        }
        RemovalOutcome::Declined => println!("Nothing removed"),
    }
    Ok(())
}

/// Look up each name in the registry, keeping the order given.
pub fn registered_tags(repository: &Repository, names: &[String]) -> Result<Vec<Tag>, CliError> {
    names
        .iter()
        .map(|name| {
            repository
                .registry()
                .find_by_name(name)
                .cloned()
                .ok_or_else(|| CliError::Core(Error::UnknownTag(name.clone())))
        })
        .collect()
}
