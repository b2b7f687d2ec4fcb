use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Serialize;
use tagit_core::observer::Observer;
use tagit_core::repository::absolute_path;
use tagit_core::store::StoragePaths;
use tagit_core::{FileEvent, RegistryEvent, Repository, TaggedFile};

use crate::error::CliError;
use crate::interaction::{render_tag_list, ChangePrinter};

/// Where a command finds its images and persisted state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub quiet: bool,
}

#[derive(Debug, Serialize)]
pub struct FileListItem {
    pub path: String,
    pub name: String,
    pub tags: Vec<String>,
}

/// Open the repository, run `action`, then save whatever state it left.
///
/// The state is saved even when `action` fails, since renames that already
/// happened must stay recorded.
pub fn with_repository<T>(
    workspace: &Workspace,
    action: impl FnOnce(&mut Repository) -> Result<T, CliError>,
) -> Result<T, CliError> {
    let mut repository =
        Repository::open(&workspace.root, StoragePaths::in_dir(&workspace.data_dir))?;

    let _observers = (!workspace.quiet).then(|| {
        let printer = Rc::new(ChangePrinter);
        let file_observer: Rc<dyn Observer<FileEvent>> = printer.clone();
        let registry_observer: Rc<dyn Observer<RegistryEvent>> = printer;
        repository.subscribe_files(&file_observer);
        repository.registry_mut().subscribe(&registry_observer);
        (file_observer, registry_observer)
    });

    let result = action(&mut repository);
    repository.save();
    result
}

/// Absolute, lexically normalized form of a path given on the command line
pub fn resolve_path_arg(path: &Path) -> Result<PathBuf, CliError> {
    Ok(absolute_path(path)?)
}

/// Reject blank tag names; anything else is kept exactly as typed, since
/// registered names may carry surrounding whitespace.
pub fn require_tag_name(name: &str) -> Result<String, CliError> {
    if name.trim().is_empty() {
        Err(CliError::EmptyTagName)
    } else {
        Ok(name.to_string())
    }
}

pub fn file_to_list_item(file: &TaggedFile) -> FileListItem {
    FileListItem {
        path: file.path().display().to_string(),
        name: file.file_name(),
        tags: file
            .current_tags()
            .iter()
            .map(|tag| tag.name().to_string())
            .collect(),
    }
}

pub fn format_file_lines(files: &[&TaggedFile], root: &Path) -> Vec<String> {
    files
        .iter()
        .map(|file| {
            let shown = file.path().strip_prefix(root).unwrap_or_else(|_| file.path());
            let tags = file.current_tags();
            if tags.is_empty() {
                shown.display().to_string()
            } else {
                format!("{}  {}", shown.display(), render_tag_list(&tags))
            }
        })
        .collect()
}
