use std::path::{Path, PathBuf};

use chrono::Utc;
use tagit_core::export::{render_files_export, suggested_export_file_name};

use crate::cli::ExportFormat;
use crate::commands::common::{with_repository, Workspace};
use crate::error::CliError;

pub fn run_export(
    workspace: &Workspace,
    format: ExportFormat,
    output_path: Option<&Path>,
) -> Result<(), CliError> {
    let rendered = with_repository(workspace, |repository| {
        Ok(render_files_export(repository.files(), format.into())?)
    })?;

    if let Some(path) = output_path {
        let path = resolve_export_path(path, format, Utc::now().timestamp_millis());
        std::fs::write(&path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}

/// A directory output gets a generated file name inside it.
pub fn resolve_export_path(path: &Path, format: ExportFormat, timestamp_ms: i64) -> PathBuf {
    if path.is_dir() {
        path.join(suggested_export_file_name(format.into(), timestamp_ms))
    } else {
        path.to_path_buf()
    }
}
