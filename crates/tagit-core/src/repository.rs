//! Tracked files and tag registry for one root directory.
//!
//! Opening a repository restores the persisted state, then walks the root and
//! reconciles what is on disk with what was restored. Corrupt persisted
//! documents are deleted and replaced by empty state; they never fail `open`.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;

use walkdir::WalkDir;

use crate::audit::{FileRenameLog, RenameLog};
use crate::error::{Error, Result};
use crate::models::{FileEvent, Tag, TaggedFile};
use crate::observer::Observer;
use crate::registry::TagRegistry;
use crate::store::{self, StoragePaths};

/// Extensions treated as images, compared case-insensitively
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "png", "bmp", "jpeg", "gif"];

/// Counters from one walk of the root directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Image files found on disk
    pub images: usize,
    /// Images that were not tracked before this scan
    pub discovered: usize,
    /// Tags re-added to the registry from tracked files
    pub recovered_tags: usize,
    /// Entries that could not be read, or images whose path is not UTF-8
    pub skipped: usize,
}

/// Owns every tracked file under `root` together with the tag registry
pub struct Repository {
    root: PathBuf,
    files: Vec<TaggedFile>,
    registry: TagRegistry,
    paths: StoragePaths,
    rename_log: Box<dyn RenameLog>,
    last_scan: ScanSummary,
}

impl Repository {
    /// Open the repository rooted at `root`, logging renames next to the
    /// persisted state.
    pub fn open(root: impl Into<PathBuf>, paths: StoragePaths) -> Result<Self> {
        let rename_log = FileRenameLog::new(paths.rename_log.clone());
        Self::open_with_log(root, paths, Box::new(rename_log))
    }

    /// Open with a caller-supplied rename log.
    pub fn open_with_log(
        root: impl Into<PathBuf>,
        paths: StoragePaths,
        rename_log: Box<dyn RenameLog>,
    ) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::NotADirectory(root));
        }
        let root = absolute_path(&root)?;

        let files = restore_files(&paths.image_data);
        let registry = restore_registry(&paths.existing_tags);

        let mut repository = Self {
            root,
            files,
            registry,
            paths,
            rename_log,
            last_scan: ScanSummary::default(),
        };
        repository.last_scan = repository.scan();
        Ok(repository)
    }

    /// Walk the root and reconcile it with the tracked files.
    ///
    /// Untracked images are added with an empty tag set. For tracked images,
    /// any tag missing from the registry is added back to it. Images whose
    /// path is not valid UTF-8 are skipped, since the persisted collection
    /// stores paths as JSON strings.
    pub fn scan(&mut self) -> ScanSummary {
        let mut summary = ScanSummary::default();
        let mut index_by_path = self
            .files
            .iter()
            .enumerate()
            .map(|(index, file)| (file.path().to_path_buf(), index))
            .collect::<HashMap<_, _>>();

        for entry in WalkDir::new(&self.root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    tracing::warn!("Skipping unreadable entry during scan: {}", error);
                    summary.skipped += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_image_path(entry.path()) {
                continue;
            }
            if entry.path().to_str().is_none() {
                tracing::warn!("Skipping non UTF-8 path: {}", entry.path().display());
                summary.skipped += 1;
                continue;
            }

            summary.images += 1;
            if let Some(&index) = index_by_path.get(entry.path()) {
                for tag in self.files[index].current_tags() {
                    if self.registry.add(tag) {
                        summary.recovered_tags += 1;
                    }
                }
            } else {
                tracing::debug!("Tracking {}", entry.path().display());
                index_by_path.insert(entry.path().to_path_buf(), self.files.len());
                self.files.push(TaggedFile::new(entry.path()));
                summary.discovered += 1;
            }
        }

        tracing::debug!(
            "Scanned {}: {} images, {} new, {} tags recovered",
            self.root.display(),
            summary.images,
            summary.discovered,
            summary.recovered_tags
        );
        summary
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn storage_paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Result of the scan performed by `open`
    pub const fn last_scan(&self) -> ScanSummary {
        self.last_scan
    }

    pub fn files(&self) -> &[TaggedFile] {
        &self.files
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TagRegistry {
        &mut self.registry
    }

    pub fn rename_log(&self) -> &dyn RenameLog {
        self.rename_log.as_ref()
    }

    /// Full text of the rename log
    pub fn read_rename_log(&self) -> String {
        self.rename_log.read_all()
    }

    /// Find a tracked file by exact path
    pub fn find_by_path(&self, path: &Path) -> Option<&TaggedFile> {
        self.files.iter().find(|file| file.path() == path)
    }

    pub fn find_by_path_mut(&mut self, path: &Path) -> Option<&mut TaggedFile> {
        self.files.iter_mut().find(|file| file.path() == path)
    }

    pub fn is_under_root(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }

    /// Tracked files currently carrying the tag named `name`
    pub fn files_with_tag(&self, name: &str) -> Vec<&TaggedFile> {
        let tag = Tag::new(name);
        self.files.iter().filter(|file| file.has_tag(&tag)).collect()
    }

    /// Subscribe `observer` to every tracked file.
    pub fn subscribe_files(&mut self, observer: &Rc<dyn Observer<FileEvent>>) {
        for file in &mut self.files {
            file.subscribe(observer);
        }
    }

    /// Stop tracking files whose path no longer exists.
    ///
    /// Returns the dropped paths. Never run implicitly.
    pub fn prune_missing(&mut self) -> Vec<PathBuf> {
        let mut pruned = Vec::new();
        self.files.retain(|file| {
            let exists = fs::symlink_metadata(file.path()).is_ok();
            if !exists {
                pruned.push(file.path().to_path_buf());
            }
            exists
        });
        for path in &pruned {
            tracing::info!("Stopped tracking missing file {}", path.display());
        }
        pruned
    }

    /// Split borrow used by multi-entity operations.
    pub(crate) fn parts_mut(&mut self) -> (&mut [TaggedFile], &mut TagRegistry, &dyn RenameLog) {
        (&mut self.files, &mut self.registry, self.rename_log.as_ref())
    }

    /// Persist the file collection and the registry.
    ///
    /// Best-effort: failures are logged and the in-memory state stays
    /// authoritative.
    pub fn save(&self) {
        if let Err(error) = store::write_file_collection(&self.paths.image_data, &self.files) {
            tracing::warn!(
                "Failed to save file collection to {}: {}",
                self.paths.image_data.display(),
                error
            );
        }
        if let Err(error) =
            store::write_tag_registry(&self.paths.existing_tags, &self.registry.snapshot())
        {
            tracing::warn!(
                "Failed to save tag registry to {}: {}",
                self.paths.existing_tags.display(),
                error
            );
        }
        tracing::debug!(
            "Saved {} files and {} tags",
            self.files.len(),
            self.registry.len()
        );
    }
}

/// Whether `path` has one of the accepted image extensions
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|extension| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(extension))
        })
}

/// Absolute form of `path` with `.` and `..` resolved lexically.
///
/// Symlinks are left alone, so tracked paths match what a directory walk
/// reports.
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

fn restore_files(path: &Path) -> Vec<TaggedFile> {
    match store::load_file_collection(path) {
        Ok(Some(document)) => {
            let mut files: Vec<TaggedFile> = Vec::with_capacity(document.files.len());
            for file in document.files {
                if files.iter().any(|existing| existing.path() == file.path()) {
                    tracing::warn!("Dropping duplicate record for {}", file.path().display());
                    continue;
                }
                files.push(file);
            }
            files
        }
        Ok(None) => Vec::new(),
        Err(error) => {
            discard(path, &error);
            Vec::new()
        }
    }
}

fn restore_registry(path: &Path) -> TagRegistry {
    match store::load_tag_registry(path) {
        Ok(Some(document)) => TagRegistry::from_tags(document.tags),
        Ok(None) => TagRegistry::new(),
        Err(error) => {
            discard(path, &error);
            TagRegistry::new()
        }
    }
}

/// Corrupt documents are deleted; other read failures leave the file alone.
fn discard(path: &Path, error: &Error) {
    if !matches!(error, Error::PersistCorrupt { .. }) {
        tracing::warn!("Ignoring unreadable persisted state: {}", error);
        return;
    }

    tracing::warn!("Discarding persisted state: {}", error);
    if let Err(remove_error) = fs::remove_file(path) {
        tracing::warn!(
            "Failed to delete corrupt state at {}: {}",
            path.display(),
            remove_error
        );
    }
}
