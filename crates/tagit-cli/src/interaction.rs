//! Terminal side of the core callbacks: confirmation prompts, failure
//! reports and change notifications.

use std::io::{self, BufRead, Write};

use tagit_core::observer::Observer;
use tagit_core::{FileEvent, Interaction, RegistryEvent, Tag};

/// Prompts on stderr and reads the answer from stdin.
pub struct ConsoleInteraction {
    assume_yes: bool,
}

impl ConsoleInteraction {
    pub const fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Interaction for ConsoleInteraction {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let stdin = io::stdin();
        prompt(&mut stdin.lock(), &mut io::stderr(), message).unwrap_or_else(|error| {
            tracing::warn!("Failed to read confirmation: {}", error);
            false
        })
    }

    fn report(&self, message: &str) {
        eprintln!("Error: {message}");
    }
}

/// Write `message` with a `[y/N]` suffix and read one answer line.
///
/// End of input counts as a refusal.
pub fn prompt(
    input: &mut impl BufRead,
    output: &mut impl Write,
    message: &str,
) -> io::Result<bool> {
    write!(output, "{message} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        writeln!(output)?;
        return Ok(false);
    }
    Ok(is_affirmative(&answer))
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Prints file and registry changes to stderr as they happen.
pub struct ChangePrinter;

impl Observer<FileEvent> for ChangePrinter {
    fn notify(&self, event: &FileEvent) {
        eprintln!("{}", describe_file_event(event));
    }
}

impl Observer<RegistryEvent> for ChangePrinter {
    fn notify(&self, event: &RegistryEvent) {
        eprintln!("{}", describe_registry_event(event));
    }
}

pub fn describe_file_event(event: &FileEvent) -> String {
    match event {
        FileEvent::Moved { from, to } => format!("{} -> {}", from.display(), to.display()),
        FileEvent::TagsChanged { path, tags } => {
            format!("{}: {}", path.display(), render_tag_list(tags))
        }
    }
}

pub fn describe_registry_event(event: &RegistryEvent) -> String {
    match event {
        RegistryEvent::Added(tag) => format!("Tag added: {tag}"),
        RegistryEvent::Removed(tag) => format!("Tag removed: {tag}"),
    }
}

pub fn render_tag_list(tags: &[Tag]) -> String {
    if tags.is_empty() {
        return "(no tags)".to_string();
    }
    tags.iter()
        .map(|tag| format!("@{tag}"))
        .collect::<Vec<_>>()
        .join(" ")
}
