use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "tagit")]
#[command(about = "Tag image files by encoding labels into their names")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory whose images are managed (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Directory holding tagit's persisted state and rename log
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Do not print rename and tag change notifications
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the root directory and report what is tracked
    Scan,
    /// List tracked files and their tags
    #[command(alias = "ls")]
    List {
        /// Only show files carrying this tag
        #[arg(long)]
        tag: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the tag vocabulary
    Tags {
        #[command(subcommand)]
        command: TagCommands,
    },
    /// Replace the tags of a file
    Set {
        /// Tracked image file
        file: PathBuf,
        /// Registered tag names, in order (none clears all tags)
        tags: Vec<String>,
    },
    /// Show the names a file has had
    History {
        /// Tracked image file
        file: PathBuf,
    },
    /// Retag a file from one of its past names
    Revert {
        /// Tracked image file
        file: PathBuf,
        /// Past encoded name, e.g. "photo @beach @2020"
        name: String,
    },
    /// Move a file into another directory
    #[command(alias = "move")]
    Mv {
        /// Tracked image file
        file: PathBuf,
        /// Destination directory
        dest_dir: PathBuf,
    },
    /// Print the rename log
    Log,
    /// Stop tracking files that no longer exist on disk
    Prune,
    /// Export the tracked file collection
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Optional output file or directory (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Configure default directories
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum TagCommands {
    /// List registered tags
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Register a new tag
    Add {
        /// Tag name
        name: String,
    },
    /// Remove tags from the registry and from every file carrying them
    Remove {
        /// Tag names
        #[arg(required = true)]
        names: Vec<String>,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write the config file
    Init {
        /// Default data directory
        #[arg(long, value_name = "DIR")]
        default_data_dir: Option<PathBuf>,
        /// Default root directory
        #[arg(long, value_name = "DIR")]
        default_root: Option<PathBuf>,
    },
    /// Print the effective configuration
    Show,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl From<ExportFormat> for tagit_core::export::ExportFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => Self::Json,
            ExportFormat::Markdown => Self::Markdown,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
