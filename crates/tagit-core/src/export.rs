//! Export helpers for the tracked file collection.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::models::{Tag, TaggedFile};

/// Export output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// Serializable view of one tracked file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFile {
    pub path: String,
    pub original_name: String,
    pub extension: String,
    pub tags: Vec<String>,
    pub past_names: Vec<String>,
}

/// Convert a tracked file into an export record, keeping tag order.
#[must_use]
pub fn file_to_export_item(file: &TaggedFile) -> ExportFile {
    ExportFile {
        path: file.path().display().to_string(),
        original_name: file.original_name().to_string(),
        extension: file.extension().to_string(),
        tags: file
            .current_tags()
            .iter()
            .map(|tag| tag.name().to_string())
            .collect(),
        past_names: file.past_names(),
    }
}

/// Render files as pretty-printed JSON.
pub fn render_json_export(files: &[TaggedFile]) -> serde_json::Result<String> {
    let items = files
        .iter()
        .map(file_to_export_item)
        .collect::<Vec<ExportFile>>();
    serde_json::to_string_pretty(&items)
}

/// Render files in Markdown with frontmatter blocks.
#[must_use]
pub fn render_markdown_export(files: &[TaggedFile]) -> String {
    let mut output = String::new();

    for (index, file) in files.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }

        let item = file_to_export_item(file);
        let _ = writeln!(output, "---");
        let _ = writeln!(output, "path: {}", item.path);
        let _ = writeln!(output, "original_name: {}", item.original_name);
        let _ = writeln!(output, "tags:");
        for tag in &item.tags {
            let _ = writeln!(output, "  - {tag}");
        }
        let _ = writeln!(output, "past_names:");
        for name in &item.past_names {
            let _ = writeln!(output, "  - {name}");
        }
        let _ = writeln!(output, "---");
    }

    output
}

/// Render files based on the selected export format.
pub fn render_files_export(
    files: &[TaggedFile],
    format: ExportFormat,
) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(files),
        ExportFormat::Markdown => Ok(render_markdown_export(files)),
    }
}

/// Render the tag vocabulary as a JSON array of names.
pub fn render_tags_json(tags: &[Tag]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(tags)
}

/// Build a deterministic default file name for export flows.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("tagit-export-{timestamp_ms}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemoryRenameLog;
    use tempfile::tempdir;

    fn tagged_file() -> (tempfile::TempDir, TaggedFile) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"img").unwrap();
        let mut file = TaggedFile::new(path);
        file.set_tags(vec![Tag::new("zeta"), Tag::new("alpha")], &MemoryRenameLog::new())
            .unwrap();
        (dir, file)
    }

    #[test]
    fn file_to_export_item_keeps_tag_order() {
        let (_dir, file) = tagged_file();
        let item = file_to_export_item(&file);

        assert_eq!(item.tags, vec!["zeta", "alpha"]);
        assert_eq!(item.original_name, "photo");
        assert_eq!(item.extension, ".jpg");
        assert_eq!(item.past_names, vec!["photo"]);
        assert!(item.path.ends_with("photo @zeta @alpha.jpg"));
    }

    #[test]
    fn render_markdown_export_includes_frontmatter() {
        let (_dir, file) = tagged_file();
        let rendered = render_markdown_export(&[file]);

        assert!(rendered.starts_with("---\npath: "));
        assert!(rendered.contains("original_name: photo\n"));
        assert!(rendered.contains("tags:\n  - zeta\n  - alpha\n"));
        assert!(rendered.contains("past_names:\n  - photo\n"));
    }

    #[test]
    fn render_tags_json_is_plain_names() {
        let rendered = render_tags_json(&[Tag::new("a"), Tag::new("b")]).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, vec!["a", "b"]);
    }

    #[test]
    fn suggested_export_file_name_uses_format_extension() {
        assert_eq!(
            suggested_export_file_name(ExportFormat::Json, 123),
            "tagit-export-123.json"
        );
        assert_eq!(
            suggested_export_file_name(ExportFormat::Markdown, 456),
            "tagit-export-456.md"
        );
    }
}
