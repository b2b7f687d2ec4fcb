//! Operations spanning several tracked files and the tag registry.
//!
//! Multi-file operations are applied sequentially and are not transactional:
//! when one rename fails the batch stops, and files already renamed stay
//! renamed.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::{decode_tag_names, Tag, TaggedFile};
use crate::repository::{absolute_path, Repository};

/// Callbacks supplied by whatever presents tagit to a user.
pub trait Interaction {
    /// Ask the user to approve `message`; `false` aborts the operation.
    fn confirm(&self, message: &str) -> bool;

    /// Surface a failure to the user.
    fn report(&self, message: &str);
}

/// Result of [`TagOperations::remove_tags`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// Tags were removed from the registry after retagging these files
    Removed { retagged: Vec<PathBuf> },
    /// The user declined; nothing changed
    Declined,
}

/// Cross-entity tag operations on a borrowed repository
pub struct TagOperations<'a> {
    repository: &'a mut Repository,
    interaction: &'a dyn Interaction,
}

impl<'a> TagOperations<'a> {
    pub fn new(repository: &'a mut Repository, interaction: &'a dyn Interaction) -> Self {
        Self {
            repository,
            interaction,
        }
    }

    /// Register a new tag.
    ///
    /// Validation uses the trimmed name but the tag is stored exactly as
    /// given, surrounding whitespace included.
    pub fn add_tag(&mut self, name: &str) -> Result<Tag> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidTag(name.to_string()));
        }
        if self.repository.registry().find_by_name(trimmed).is_some() {
            return Err(Error::DuplicateTag(trimmed.to_string()));
        }

        let tag = Tag::new(name);
        if !self.repository.registry_mut().add(tag.clone()) {
            return Err(Error::DuplicateTag(name.to_string()));
        }
        tracing::info!("Added tag '{}'", tag);
        Ok(tag)
    }

    /// Remove `tags` from every file under the root, then from the registry.
    ///
    /// When any file carries one of the tags the user must confirm first.
    pub fn remove_tags(&mut self, tags: &[Tag]) -> Result<RemovalOutcome> {
        let affected = self.affected_files(tags);

        if !affected.is_empty() {
            let message = removal_warning(&affected);
            if !self.interaction.confirm(&message) {
                tracing::info!("Tag removal declined");
                return Ok(RemovalOutcome::Declined);
            }
        }

        let (files, registry, log) = self.repository.parts_mut();
        let mut retagged = Vec::with_capacity(affected.len());
        for path in &affected {
            let Some(file) = files.iter_mut().find(|file| file.path() == path.as_path()) else {
                continue;
            };
            let remaining = file
                .current_tags()
                .into_iter()
                .filter(|tag| !tags.contains(tag))
                .collect::<Vec<_>>();
            file.set_tags(remaining, log)?;
            retagged.push(file.path().to_path_buf());
        }

        for tag in tags {
            registry.remove(tag);
        }
        tracing::info!(
            "Removed {} tag(s), retagged {} file(s)",
            tags.len(),
            retagged.len()
        );
        Ok(RemovalOutcome::Removed { retagged })
    }

    /// Retag `path` from a past encoded name such as `"photo @x @y"`.
    ///
    /// Names missing from the registry are registered before the rename is
    /// attempted and stay registered if it fails. Returns the tags that had to
    /// be created.
    pub fn revert_to_name(&mut self, path: &Path, name: &str) -> Result<Vec<Tag>> {
        if self.repository.find_by_path(path).is_none() {
            return Err(Error::NotTracked(path.to_path_buf()));
        }

        let mut tags = Vec::new();
        let mut created = Vec::new();

        for tag_name in decode_tag_names(name) {
            let tag = match self.repository.registry().find_by_name(&tag_name) {
                Some(existing) => existing.clone(),
                None => {
                    let tag = Tag::new(tag_name);
                    self.repository.registry_mut().add(tag.clone());
                    created.push(tag.clone());
                    tag
                }
            };
            tags.push(tag);
        }

        let (files, _, log) = self.repository.parts_mut();
        let file = find_file(files, path)?;
        file.set_tags(tags, log)?;

        if !created.is_empty() {
            tracing::info!("Revert created {} new tag(s)", created.len());
        }
        Ok(created)
    }

    /// Replace the tags of `path` with registered tags named in `names`.
    pub fn set_tags(&mut self, path: &Path, names: &[String]) -> Result<()> {
        let tags = names
            .iter()
            .map(|name| {
                self.repository
                    .registry()
                    .find_by_name(name)
                    .cloned()
                    .ok_or_else(|| Error::UnknownTag(name.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let (files, _, log) = self.repository.parts_mut();
        find_file(files, path)?.set_tags(tags, log)
    }

    /// Move `path` into `dest_dir`, keeping its current file name.
    ///
    /// Refused when a tracked file directly inside `dest_dir` shares the
    /// original name, since that would tangle the two files' histories.
    pub fn move_file(&mut self, path: &Path, dest_dir: &Path) -> Result<PathBuf> {
        if !dest_dir.is_dir() {
            return Err(Error::NotADirectory(dest_dir.to_path_buf()));
        }
        let dest_dir = absolute_path(dest_dir)?;

        let (files, _, log) = self.repository.parts_mut();
        let original_name = find_file(files, path)?.original_name().to_string();
        let clash = files.iter().any(|file| {
            file.path().parent() == Some(dest_dir.as_path())
                && file.original_name() == original_name
                && file.path().is_file()
        });
        if clash {
            return Err(Error::Conflict(original_name));
        }

        let file = find_file(files, path)?;
        let dest = dest_dir.join(file.file_name());
        file.move_to(&dest, log)?;
        Ok(dest)
    }

    /// Past encoded names of `path`, oldest first
    pub fn history(&self, path: &Path) -> Result<Vec<String>> {
        self.repository
            .find_by_path(path)
            .map(TaggedFile::past_names)
            .ok_or_else(|| Error::NotTracked(path.to_path_buf()))
    }

    /// Tracked files under the root carrying any of `tags`, in first-seen
    /// order when walking tags then files.
    fn affected_files(&self, tags: &[Tag]) -> Vec<PathBuf> {
        let mut affected: Vec<PathBuf> = Vec::new();
        for tag in tags {
            for file in self.repository.files() {
                if self.repository.is_under_root(file.path())
                    && file.has_tag(tag)
                    && !affected.iter().any(|path| path == file.path())
                {
                    affected.push(file.path().to_path_buf());
                }
            }
        }
        affected
    }
}

fn find_file<'f>(files: &'f mut [TaggedFile], path: &Path) -> Result<&'f mut TaggedFile> {
    files
        .iter_mut()
        .find(|file| file.path() == path)
        .ok_or_else(|| Error::NotTracked(path.to_path_buf()))
}

fn removal_warning(paths: &[PathBuf]) -> String {
    let mut message = String::from("The selected tags will be removed from these files:\n");
    for path in paths {
        let _ = writeln!(message, " - {}", path.display());
    }
    message.push_str("Do you wish to continue?");
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemoryRenameLog;
    use crate::store::StoragePaths;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    struct ScriptedInteraction {
        answer: bool,
        prompts: RefCell<Vec<String>>,
    }

    impl ScriptedInteraction {
        fn answering(answer: bool) -> Self {
            Self {
                answer,
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl Interaction for ScriptedInteraction {
        fn confirm(&self, message: &str) -> bool {
            self.prompts.borrow_mut().push(message.to_string());
            self.answer
        }

        fn report(&self, _message: &str) {}
    }

    struct Fixture {
        root: TempDir,
        _data: TempDir,
        repository: Repository,
    }

    impl Fixture {
        fn new(files: &[&str]) -> Self {
            let root = tempdir().unwrap();
            for name in files {
                let path = root.path().join(name);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(path, b"img").unwrap();
            }
            let data = tempdir().unwrap();
            let repository = Repository::open_with_log(
                root.path(),
                StoragePaths::in_dir(data.path()),
                Box::new(MemoryRenameLog::new()),
            )
            .unwrap();
            Self {
                root,
                _data: data,
                repository,
            }
        }

        fn path(&self, name: &str) -> PathBuf {
            std::path::absolute(self.root.path()).unwrap().join(name)
        }

        fn tag_file(&mut self, name: &str, tags: &[&str]) -> PathBuf {
            let interaction = ScriptedInteraction::answering(true);
            let path = self.path(name);
            let names = tags.iter().map(ToString::to_string).collect::<Vec<_>>();
            let mut ops = TagOperations::new(&mut self.repository, &interaction);
            for tag in tags {
                let _ = ops.add_tag(tag);
            }
            ops.set_tags(&path, &names).unwrap();
            self.repository
                .files()
                .iter()
                .find(|file| file.original_name() == Path::new(name).file_stem().unwrap())
                .unwrap()
                .path()
                .to_path_buf()
        }
    }

    fn names(tags: &[Tag]) -> Vec<&str> {
        tags.iter().map(Tag::name).collect()
    }

    #[test]
    fn add_tag_rejects_blank_names() {
        let mut fixture = Fixture::new(&[]);
        let interaction = ScriptedInteraction::answering(true);
        let mut ops = TagOperations::new(&mut fixture.repository, &interaction);

        assert!(matches!(ops.add_tag(""), Err(Error::InvalidTag(_))));
        assert!(matches!(ops.add_tag(" \t "), Err(Error::InvalidTag(_))));
        assert!(fixture.repository.registry().is_empty());
    }

    #[test]
    fn add_tag_stores_untrimmed_name() {
        let mut fixture = Fixture::new(&[]);
        let interaction = ScriptedInteraction::answering(true);
        let mut ops = TagOperations::new(&mut fixture.repository, &interaction);

        let tag = ops.add_tag(" beach ").unwrap();
        assert_eq!(tag.name(), " beach ");
        assert!(fixture.repository.registry().find_by_name(" beach ").is_some());
        assert!(fixture.repository.registry().find_by_name("beach").is_none());
    }

    #[test]
    fn add_tag_rejects_duplicates_by_trimmed_name() {
        let mut fixture = Fixture::new(&[]);
        let interaction = ScriptedInteraction::answering(true);
        let mut ops = TagOperations::new(&mut fixture.repository, &interaction);

        ops.add_tag("beach").unwrap();
        assert!(matches!(ops.add_tag("beach"), Err(Error::DuplicateTag(_))));
        assert!(matches!(ops.add_tag("  beach"), Err(Error::DuplicateTag(_))));
        ops.add_tag(" sand").unwrap();
        assert!(matches!(ops.add_tag(" sand"), Err(Error::DuplicateTag(_))));
        assert_eq!(fixture.repository.registry().len(), 2);
    }

    #[test]
    fn remove_tags_without_affected_files_skips_confirmation() {
        let mut fixture = Fixture::new(&["a.jpg"]);
        let interaction = ScriptedInteraction::answering(false);
        let mut ops = TagOperations::new(&mut fixture.repository, &interaction);
        ops.add_tag("unused").unwrap();

        let outcome = ops.remove_tags(&[Tag::new("unused")]).unwrap();

        assert_eq!(outcome, RemovalOutcome::Removed { retagged: vec![] });
        assert!(interaction.prompts.borrow().is_empty());
        assert!(fixture.repository.registry().is_empty());
    }

    #[test]
    fn remove_tags_retags_affected_files() {
        let mut fixture = Fixture::new(&["a.jpg", "b.jpg", "c.jpg"]);
        let a = fixture.tag_file("a.jpg", &["x", "y"]);
        fixture.tag_file("b.jpg", &["y"]);
        let interaction = ScriptedInteraction::answering(true);
        let mut ops = TagOperations::new(&mut fixture.repository, &interaction);

        let outcome = ops.remove_tags(&[Tag::new("x")]).unwrap();

        let renamed = fixture.path("a @y.jpg");
        assert_eq!(
            outcome,
            RemovalOutcome::Removed {
                retagged: vec![renamed.clone()]
            }
        );
        let prompts = interaction.prompts.borrow();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains(&a.display().to_string()));
        assert!(!prompts[0].contains("b @y.jpg"));

        let file = fixture.repository.find_by_path(&renamed).unwrap();
        assert_eq!(names(&file.current_tags()), vec!["y"]);
        assert_eq!(file.past_names(), vec!["a", "a @x @y"]);
        assert!(fixture.repository.registry().find_by_name("x").is_none());
        assert!(fixture.repository.registry().find_by_name("y").is_some());
    }

    #[test]
    fn declined_removal_changes_nothing() {
        let mut fixture = Fixture::new(&["a.jpg"]);
        let a = fixture.tag_file("a.jpg", &["x"]);
        let interaction = ScriptedInteraction::answering(false);
        let mut ops = TagOperations::new(&mut fixture.repository, &interaction);

        let outcome = ops.remove_tags(&[Tag::new("x")]).unwrap();

        assert_eq!(outcome, RemovalOutcome::Declined);
        let file = fixture.repository.find_by_path(&a).unwrap();
        assert_eq!(names(&file.current_tags()), vec!["x"]);
        assert!(a.exists());
        assert!(fixture.repository.registry().find_by_name("x").is_some());
    }

    #[test]
    fn failed_rename_stops_batch_and_keeps_registry() {
        let mut fixture = Fixture::new(&["a.jpg", "b.jpg"]);
        let a = fixture.tag_file("a.jpg", &["x"]);
        let b = fixture.tag_file("b.jpg", &["x"]);
        // Occupy the name b.jpg would be renamed to.
        fs::write(fixture.path("b.jpg"), b"squatter").unwrap();
        let interaction = ScriptedInteraction::answering(true);
        let mut ops = TagOperations::new(&mut fixture.repository, &interaction);

        let error = ops.remove_tags(&[Tag::new("x")]).unwrap_err();

        assert!(matches!(error, Error::RenameFailed { .. }));
        assert!(!a.exists());
        assert!(fixture.path("a.jpg").exists());
        assert!(b.exists());
        assert!(fixture.repository.registry().find_by_name("x").is_some());
    }

    #[test]
    fn remove_tags_ignores_files_outside_root() {
        let mut fixture = Fixture::new(&["a.jpg"]);
        let path = fixture.tag_file("a.jpg", &["x"]);
        let outside = tempdir().unwrap();
        let interaction = ScriptedInteraction::answering(false);
        let mut ops = TagOperations::new(&mut fixture.repository, &interaction);
        let moved = ops.move_file(&path, outside.path()).unwrap();

        let outcome = ops.remove_tags(&[Tag::new("x")]).unwrap();

        assert_eq!(outcome, RemovalOutcome::Removed { retagged: vec![] });
        assert!(interaction.prompts.borrow().is_empty());
        assert!(moved.exists());
        let file = fixture.repository.find_by_path(&moved).unwrap();
        assert_eq!(names(&file.current_tags()), vec!["x"]);
        assert!(fixture.repository.registry().find_by_name("x").is_none());
    }

    #[test]
    fn revert_creates_missing_tags() {
        let mut fixture = Fixture::new(&["photo.jpg"]);
        let path = fixture.tag_file("photo.jpg", &["x"]);
        let interaction = ScriptedInteraction::answering(true);
        let mut ops = TagOperations::new(&mut fixture.repository, &interaction);

        let created = ops.revert_to_name(&path, "photo @x @y").unwrap();

        assert_eq!(created, vec![Tag::new("y")]);
        let renamed = fixture.path("photo @x @y.jpg");
        assert!(renamed.exists());
        let file = fixture.repository.find_by_path(&renamed).unwrap();
        assert_eq!(names(&file.current_tags()), vec!["x", "y"]);
        assert_eq!(
            names(&fixture.repository.registry().snapshot()),
            vec!["x", "y"]
        );
    }

    #[test]
    fn revert_to_untagged_name_clears_tags() {
        let mut fixture = Fixture::new(&["photo.jpg"]);
        let path = fixture.tag_file("photo.jpg", &["x"]);
        let interaction = ScriptedInteraction::answering(true);
        let mut ops = TagOperations::new(&mut fixture.repository, &interaction);

        let created = ops.revert_to_name(&path, "photo").unwrap();

        assert!(created.is_empty());
        assert!(fixture.path("photo.jpg").exists());
    }

    #[test]
    fn failed_revert_keeps_created_tags() {
        let mut fixture = Fixture::new(&["photo.jpg"]);
        fs::write(fixture.path("photo @new.jpg"), b"squatter").unwrap();
        let path = fixture.path("photo.jpg");
        let interaction = ScriptedInteraction::answering(true);
        let mut ops = TagOperations::new(&mut fixture.repository, &interaction);

        let error = ops.revert_to_name(&path, "photo @new").unwrap_err();

        assert!(matches!(error, Error::RenameFailed { .. }));
        assert!(fixture.repository.registry().find_by_name("new").is_some());
        let file = fixture.repository.find_by_path(&path).unwrap();
        assert!(file.current_tags().is_empty());
    }

    #[test]
    fn set_tags_rejects_unknown_names() {
        let mut fixture = Fixture::new(&["photo.jpg"]);
        let path = fixture.path("photo.jpg");
        let interaction = ScriptedInteraction::answering(true);
        let mut ops = TagOperations::new(&mut fixture.repository, &interaction);

        let error = ops.set_tags(&path, &["ghost".to_string()]).unwrap_err();
        assert!(matches!(error, Error::UnknownTag(name) if name == "ghost"));
        assert!(path.exists());
    }

    #[test]
    fn operations_on_untracked_path_fail() {
        let mut fixture = Fixture::new(&[]);
        let interaction = ScriptedInteraction::answering(true);
        let mut ops = TagOperations::new(&mut fixture.repository, &interaction);
        let missing = fixture.root.path().join("nope.jpg");

        assert!(matches!(ops.history(&missing), Err(Error::NotTracked(_))));
        assert!(matches!(
            ops.revert_to_name(&missing, "nope"),
            Err(Error::NotTracked(_))
        ));
    }

    #[test]
    fn move_file_into_directory() {
        let mut fixture = Fixture::new(&["a.jpg", "sorted/other.jpg"]);
        let path = fixture.tag_file("a.jpg", &["x"]);
        let dest_dir = fixture.path("sorted");
        let interaction = ScriptedInteraction::answering(true);
        let mut ops = TagOperations::new(&mut fixture.repository, &interaction);

        let dest = ops.move_file(&path, &dest_dir).unwrap();

        assert_eq!(dest, dest_dir.join("a @x.jpg"));
        assert!(dest.exists());
        assert!(!path.exists());
        let history = ops.history(&dest).unwrap();
        assert_eq!(history, vec!["a"]);
    }

    #[test]
    fn move_file_refuses_original_name_clash() {
        let mut fixture = Fixture::new(&["a.jpg", "sorted/a.png"]);
        let path = fixture.path("a.jpg");
        let dest_dir = fixture.path("sorted");
        let interaction = ScriptedInteraction::answering(true);
        let mut ops = TagOperations::new(&mut fixture.repository, &interaction);

        let error = ops.move_file(&path, &dest_dir).unwrap_err();

        assert!(matches!(error, Error::Conflict(name) if name == "a"));
        assert!(path.exists());
    }

    #[test]
    fn move_file_requires_directory() {
        let mut fixture = Fixture::new(&["a.jpg"]);
        let path = fixture.path("a.jpg");
        let missing = fixture.path("missing");
        let interaction = ScriptedInteraction::answering(true);
        let mut ops = TagOperations::new(&mut fixture.repository, &interaction);

        let error = ops.move_file(&path, &missing).unwrap_err();
        assert!(matches!(error, Error::NotADirectory(_)));
    }
}
