//! CLI argument definitions using clap

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Run named HTTP requests from layered YAML configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "recurl", version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Endpoint to run (a document under `endpoints/`)
    #[arg(value_name = "ENDPOINT")]
    pub endpoint: Option<String>,

    /// Environment layer to apply on top of the app defaults
    #[arg(short = 'e', long = "env", value_name = "ENV")]
    pub env: Option<String>,

    /// Print the request as a curl command instead of sending it
    #[arg(long = "dry-run", action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Print the request as a curl command, then send it
    #[arg(long = "curlify", action = ArgAction::SetTrue, conflicts_with = "dry_run")]
    pub curlify: bool,

    /// Write the response body to a file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Do not print the status line
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue)]
    pub quiet: bool,

    /// Print only the status line
    #[arg(long = "only-status", action = ArgAction::SetTrue, conflicts_with = "quiet")]
    pub only_status: bool,

    /// Use a registered app instead of searching upward for one
    #[arg(long = "app", value_name = "NAME")]
    pub app: Option<String>,

    /// Log debug details to stderr
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue, global = true)]
    pub verbose: bool,

    /// Output format for logs: json (JSON Lines) or text (default)
    #[arg(long = "log-format", value_name = "FORMAT", value_enum, global = true)]
    pub log_format: Option<LogFormat>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a new app and register it
    Init {
        /// App name (also the directory name)
        name: String,

        /// Directory to create the app in
        #[arg(long = "path", value_name = "DIR", default_value = ".")]
        path: PathBuf,
    },

    /// List registered apps
    #[command(name = "list-local")]
    ListLocal,

    /// Print a shell completion script
    Complete {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Shell types for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Log format for structured output
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Plain text output (default)
    #[default]
    Text,
    /// JSON Lines format for parsing
    Json,
}
