use crate::commands::common::{with_repository, Workspace};
use crate::error::CliError;

pub fn run_log(workspace: &Workspace) -> Result<(), CliError> {
    let contents = with_repository(workspace, |repository| Ok(repository.read_rename_log()))?;
    print!("{contents}");
    Ok(())
}
