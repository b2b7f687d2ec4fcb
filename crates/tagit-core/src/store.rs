//! Persisted repository state.
//!
//! Two independent JSON documents live in the data directory: the tracked file
//! collection and the tag registry. Each carries a schema version; a document
//! that fails to parse or has another version is reported as
//! [`Error::PersistCorrupt`], which callers can tell apart from a missing file
//! (`Ok(None)`).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Tag, TaggedFile};

pub const IMAGE_DATA_FILE_NAME: &str = "image-data.json";
pub const EXISTING_TAGS_FILE_NAME: &str = "existing-tags.json";
pub const RENAME_LOG_FILE_NAME: &str = "rename-log.txt";

const STORE_SCHEMA_VERSION: u32 = 1;

/// Locations of the persisted artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub image_data: PathBuf,
    pub existing_tags: PathBuf,
    pub rename_log: PathBuf,
}

impl StoragePaths {
    /// Standard file names inside `data_dir`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            image_data: data_dir.join(IMAGE_DATA_FILE_NAME),
            existing_tags: data_dir.join(EXISTING_TAGS_FILE_NAME),
            rename_log: data_dir.join(RENAME_LOG_FILE_NAME),
        }
    }
}

/// On-disk form of the tracked file collection
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileCollectionDocument {
    #[serde(default = "default_schema_version")]
    pub version: u32,
    pub files: Vec<TaggedFile>,
}

/// On-disk form of the tag registry
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TagRegistryDocument {
    #[serde(default = "default_schema_version")]
    pub version: u32,
    pub tags: Vec<Tag>,
}

const fn default_schema_version() -> u32 {
    STORE_SCHEMA_VERSION
}

trait Versioned {
    fn version(&self) -> u32;
}

impl Versioned for FileCollectionDocument {
    fn version(&self) -> u32 {
        self.version
    }
}

impl Versioned for TagRegistryDocument {
    fn version(&self) -> u32 {
        self.version
    }
}

#[derive(Serialize)]
struct FileCollectionRef<'a> {
    version: u32,
    files: &'a [TaggedFile],
}

#[derive(Serialize)]
struct TagRegistryRef<'a> {
    version: u32,
    tags: &'a [Tag],
}

pub fn load_file_collection(path: &Path) -> Result<Option<FileCollectionDocument>> {
    load_document(path)
}

pub fn load_tag_registry(path: &Path) -> Result<Option<TagRegistryDocument>> {
    load_document(path)
}

fn load_document<T>(path: &Path) -> Result<Option<T>>
where
    T: DeserializeOwned + Versioned,
{
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(error) if error.kind() == io::ErrorKind::InvalidData => {
            return Err(corrupt(path, error.to_string()));
        }
        Err(error) => return Err(error.into()),
    };

    let document: T =
        serde_json::from_str(&raw).map_err(|error| corrupt(path, error.to_string()))?;
    if document.version() != STORE_SCHEMA_VERSION {
        return Err(corrupt(
            path,
            format!(
                "unsupported schema version {} (expected {STORE_SCHEMA_VERSION})",
                document.version()
            ),
        ));
    }

    Ok(Some(document))
}

fn corrupt(path: &Path, reason: String) -> Error {
    Error::PersistCorrupt {
        path: path.to_path_buf(),
        reason,
    }
}

pub fn write_file_collection(path: &Path, files: &[TaggedFile]) -> Result<()> {
    write_document(
        path,
        &FileCollectionRef {
            version: STORE_SCHEMA_VERSION,
            files,
        },
    )
}

pub fn write_tag_registry(path: &Path, tags: &[Tag]) -> Result<()> {
    write_document(
        path,
        &TagRegistryRef {
            version: STORE_SCHEMA_VERSION,
            tags,
        },
    )
}

/// Write `document` as pretty JSON, creating the parent directory on demand.
fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let serialized = serde_json::to_string_pretty(document)?;
    fs::write(path, serialized)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_document_is_none() {
        let dir = tempdir().unwrap();
        let loaded = load_tag_registry(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn garbage_document_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(EXISTING_TAGS_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        let error = load_tag_registry(&path).unwrap_err();
        assert!(matches!(error, Error::PersistCorrupt { .. }));
    }

    #[test]
    fn non_utf8_document_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(IMAGE_DATA_FILE_NAME);
        fs::write(&path, [0xff, 0xfe, 0x00, 0x42]).unwrap();

        let error = load_file_collection(&path).unwrap_err();
        assert!(matches!(error, Error::PersistCorrupt { .. }));
    }

    #[test]
    fn unknown_version_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(EXISTING_TAGS_FILE_NAME);
        fs::write(&path, r#"{ "version": 9, "tags": ["a"] }"#).unwrap();

        let error = load_tag_registry(&path).unwrap_err();
        match error {
            Error::PersistCorrupt { reason, .. } => assert!(reason.contains("schema version 9")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn written_registry_loads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(EXISTING_TAGS_FILE_NAME);
        let tags = vec![Tag::new("x"), Tag::new("y")];

        write_tag_registry(&path, &tags).unwrap();
        let loaded = load_tag_registry(&path).unwrap().unwrap();

        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.tags, tags);
    }

    #[test]
    fn written_collection_loads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(IMAGE_DATA_FILE_NAME);
        let files = vec![TaggedFile::new("/pics/a.jpg"), TaggedFile::new("/pics/b.png")];

        write_file_collection(&path, &files).unwrap();
        let loaded = load_file_collection(&path).unwrap().unwrap();

        let paths = loaded
            .files
            .iter()
            .map(|file| file.path().to_path_buf())
            .collect::<Vec<_>>();
        assert_eq!(
            paths,
            vec![PathBuf::from("/pics/a.jpg"), PathBuf::from("/pics/b.png")]
        );
    }

    #[test]
    fn storage_paths_use_standard_names() {
        let paths = StoragePaths::in_dir(Path::new("data"));
        assert_eq!(paths.image_data, Path::new("data").join("image-data.json"));
        assert_eq!(paths.existing_tags, Path::new("data").join("existing-tags.json"));
        assert_eq!(paths.rename_log, Path::new("data").join("rename-log.txt"));
    }
}
