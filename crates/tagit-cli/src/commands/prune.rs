use crate::commands::common::{with_repository, Workspace};
use crate::error::CliError;

pub fn run_prune(workspace: &Workspace) -> Result<(), CliError> {
    let pruned = with_repository(workspace, |repository| Ok(repository.prune_missing()))?;

    if pruned.is_empty() {
        println!("Nothing to prune");
    }
    for path in &pruned {
        println!("{}", path.display());
    }
    Ok(())
}
