//! Append-only record of every file move and rename.

use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use chrono::Local;

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %I:%M:%S";

/// Text sink receiving one entry per successful move.
///
/// Recording is best-effort: implementations swallow write failures so a
/// completed rename is never reported as failed.
pub trait RenameLog {
    fn record(&self, message: &str);

    /// Full log text
    fn read_all(&self) -> String;
}

/// Audit message for a move between two paths, using absolute paths.
pub fn move_entry(from: &Path, to: &Path) -> String {
    format!(
        "Move file [{}] to [{}]",
        absolute(from).display(),
        absolute(to).display()
    )
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Format a single log entry: `[dd/MM/yyyy hh:mm:ss] - message` and a blank line.
pub fn format_entry(message: &str, timestamp: chrono::DateTime<Local>) -> String {
    format!("[{}] - {message}\n\n", timestamp.format(TIMESTAMP_FORMAT))
}

/// Rename log stored in a plain text file
#[derive(Debug, Clone)]
pub struct FileRenameLog {
    path: PathBuf,
}

impl FileRenameLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, entry: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(entry.as_bytes())
    }
}

impl RenameLog for FileRenameLog {
    fn record(&self, message: &str) {
        if let Err(error) = self.append(&format_entry(message, Local::now())) {
            tracing::warn!(
                "Failed to write rename log at {}: {}",
                self.path.display(),
                error
            );
        }
    }

    fn read_all(&self) -> String {
        match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => String::new(),
            Err(error) => {
                tracing::warn!(
                    "Failed to read rename log at {}: {}",
                    self.path.display(),
                    error
                );
                String::new()
            }
        }
    }
}

/// In-memory rename log, mainly for tests
#[derive(Debug, Default)]
pub struct MemoryRenameLog {
    entries: RefCell<Vec<String>>,
}

impl MemoryRenameLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded messages without timestamps
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }
}

impl RenameLog for MemoryRenameLog {
    fn record(&self, message: &str) {
        self.entries.borrow_mut().push(message.to_string());
    }

    fn read_all(&self) -> String {
        self.entries
            .borrow()
            .iter()
            .map(|message| format!("{message}\n"))
            .collect()
    }
}
