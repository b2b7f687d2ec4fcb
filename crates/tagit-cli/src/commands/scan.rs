use tagit_core::repository::ScanSummary;

use crate::commands::common::{with_repository, Workspace};
use crate::error::CliError;

pub fn run_scan(workspace: &Workspace) -> Result<(), CliError> {
    let (summary, tracked, tags) = with_repository(workspace, |repository| {
        Ok((
            repository.last_scan(),
            repository.files().len(),
            repository.registry().len(),
        ))
    })?;

    println!("{}", format_scan_summary(&summary, tracked, tags));
    Ok(())
}

pub fn format_scan_summary(summary: &ScanSummary, tracked: usize, tags: usize) -> String {
    let mut line = format!(
        "{} images on disk, {} newly tracked, {} tracked in total, {} tags",
        summary.images, summary.discovered, tracked, tags
    );
    if summary.recovered_tags > 0 {
        line.push_str(&format!(" ({} recovered)", summary.recovered_tags));
    }
    if summary.skipped > 0 {
        line.push_str(&format!(", {} entries skipped", summary.skipped));
    }
    line
}
