//! Tracked image file model
//!
//! A [`TaggedFile`] keeps its on-disk name in sync with its tag set: the file
//! name is always `original_name + encode_tags(current_tags) + extension`.
//! Every tag edit is a rename inside the file's directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::audit::{move_entry, RenameLog};
use crate::error::{Error, Result};
use crate::models::Tag;
use crate::observer::{Observer, Subscribers};

/// Marks the start of a tag inside an encoded name.
pub const TAG_DELIMITER: char = '@';

/// Change events emitted by a [`TaggedFile`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    /// The file now lives at `to`
    Moved { from: PathBuf, to: PathBuf },
    /// The tag set was replaced
    TagsChanged { path: PathBuf, tags: Vec<Tag> },
}

/// One image file under management
#[derive(Debug, Serialize, Deserialize)]
pub struct TaggedFile {
    path: PathBuf,
    original_name: String,
    extension: String,
    current_tags: Vec<Tag>,
    past_names: Vec<String>,
    #[serde(skip)]
    subscribers: Subscribers<FileEvent>,
}

impl TaggedFile {
    /// Start tracking the file at `path` with an empty tag set.
    ///
    /// The original name is everything before the last `.` of the file name,
    /// tag suffix included: an existing `photo @x.jpg` is not parsed back into
    /// tags.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (original_name, extension) = match file_name.rfind('.') {
            Some(index) => (
                file_name[..index].to_string(),
                file_name[index..].to_string(),
            ),
            None => (file_name, String::new()),
        };

        Self {
            path,
            original_name,
            extension,
            current_tags: Vec::new(),
            past_names: Vec::new(),
            subscribers: Subscribers::new(),
        }
    }

    /// Current location on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name without extension or tag suffix
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Extension including the leading `.`
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Copy of the current tag set
    pub fn current_tags(&self) -> Vec<Tag> {
        self.current_tags.clone()
    }

    /// Copy of every encoded name this file has had, oldest first
    pub fn past_names(&self) -> Vec<String> {
        self.past_names.clone()
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.current_tags.contains(tag)
    }

    /// Original name plus tag suffix, without extension
    pub fn encoded_name(&self) -> String {
        format!("{}{}", self.original_name, encode_tags(&self.current_tags))
    }

    /// File name the current tag set maps to
    pub fn file_name(&self) -> String {
        format!("{}{}", self.encoded_name(), self.extension)
    }

    pub fn subscribe(&mut self, observer: &Rc<dyn Observer<FileEvent>>) {
        self.subscribers.subscribe(observer);
    }

    /// Replace the tag set, renaming the file to match.
    ///
    /// On failure the tags, the history and the path are left untouched.
    pub fn set_tags(&mut self, tags: Vec<Tag>, log: &dyn RenameLog) -> Result<()> {
        let target = self.path.with_file_name(format!(
            "{}{}{}",
            self.original_name,
            encode_tags(&tags),
            self.extension
        ));
        let previous_name = self.encoded_name();

        self.relocate(&target, log)
            .map_err(|source| Error::RenameFailed {
                from: self.path.clone(),
                to: target.clone(),
                source,
            })?;

        self.past_names.push(previous_name);
        self.current_tags = tags;
        self.subscribers.notify(&FileEvent::TagsChanged {
            path: self.path.clone(),
            tags: self.current_tags.clone(),
        });
        Ok(())
    }

    /// Move the file to `dest` without touching its tags.
    pub fn move_to(&mut self, dest: &Path, log: &dyn RenameLog) -> Result<()> {
        self.relocate(dest, log).map_err(|source| Error::MoveFailed {
            from: self.path.clone(),
            to: dest.to_path_buf(),
            source,
        })
    }

    fn relocate(&mut self, dest: &Path, log: &dyn RenameLog) -> io::Result<()> {
        move_path(&self.path, dest)?;
        log.record(&move_entry(&self.path, dest));
        tracing::info!("Moved {} to {}", self.path.display(), dest.display());

        let from = std::mem::replace(&mut self.path, dest.to_path_buf());
        self.subscribers.notify(&FileEvent::Moved {
            from,
            to: self.path.clone(),
        });
        Ok(())
    }
}

/// Move primitive shared by tag edits and directory moves.
///
/// Never overwrites: an occupied destination is `AlreadyExists`. Moving a file
/// onto its own path succeeds without touching the filesystem.
fn move_path(from: &Path, to: &Path) -> io::Result<()> {
    fs::symlink_metadata(from)?;
    if from == to {
        return Ok(());
    }
    if fs::symlink_metadata(to).is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", to.display()),
        ));
    }

    match fs::rename(from, to) {
        Err(error) if error.kind() == io::ErrorKind::CrossesDevices => {
            copy_then_remove(from, to, |source| fs::remove_file(source))
        }
        result => result,
    }
}

/// Cross-device fallback. If the source cannot be removed the copy is
/// deleted again, so the destination stays free for a retry.
fn copy_then_remove(
    from: &Path,
    to: &Path,
    remove_source: impl FnOnce(&Path) -> io::Result<()>,
) -> io::Result<()> {
    if let Err(error) = fs::copy(from, to) {
        discard_copy(to);
        return Err(error);
    }
    if let Err(error) = remove_source(from) {
        discard_copy(to);
        return Err(error);
    }
    Ok(())
}

fn discard_copy(path: &Path) {
    match fs::remove_file(path) {
        Err(error) if error.kind() != io::ErrorKind::NotFound => {
            tracing::warn!("Failed to remove partial copy {}: {}", path.display(), error);
        }
        _ => {}
    }
}

/// Encode tags as a name suffix: `" @a @b"`. No tags encode to `""`.
pub fn encode_tags(tags: &[Tag]) -> String {
    tags.iter()
        .map(|tag| format!(" {TAG_DELIMITER}{}", tag.name()))
        .collect()
}

/// Extract tag names from an encoded name.
///
/// Everything after the first `@` is split on `@`; segments are trimmed and
/// empty ones dropped. `"photo @x @y"` yields `["x", "y"]`.
pub fn decode_tag_names(name: &str) -> Vec<String> {
    let Some(index) = name.find(TAG_DELIMITER) else {
        return Vec::new();
    };

    name[index + TAG_DELIMITER.len_utf8()..]
        .split(TAG_DELIMITER)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(ToString::to_string)
        .collect()
}
