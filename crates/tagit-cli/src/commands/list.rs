use crate::commands::common::{
    file_to_list_item, format_file_lines, require_tag_name, with_repository, FileListItem,
    Workspace,
};
use crate::error::CliError;

pub fn run_list(workspace: &Workspace, tag: Option<&str>, as_json: bool) -> Result<(), CliError> {
    let tag = tag.map(require_tag_name).transpose()?;

    with_repository(workspace, |repository| {
        let files = match tag.as_deref() {
            Some(name) => repository.files_with_tag(name),
            None => repository.files().iter().collect(),
        };

        if as_json {
            let items = files
                .iter()
                .map(|file| file_to_list_item(file))
                .collect::<Vec<FileListItem>>();
            println!("{}", serde_json::to_string_pretty(&items)?);
        } else {
            for line in format_file_lines(&files, repository.root()) {
                println!("{line}");
            }
        }
        Ok(())
    })
}
