//! CLI parse: clap types for cardgen. No behavior; definitions only.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Cardgen CLI - batch image generation for flashcard manifests
#[derive(Parser, Debug)]
#[command(name = "cardgen")]
#[command(about = "Generate missing flashcard images from a manifest")]
pub struct Cli {
    /// Defaults to `generate` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Project root; manifest and output paths resolve against it
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(long)]
    pub verbose: bool,

    /// Disable logging entirely (console reporting is unaffected)
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate images for every record that lacks one
    Generate(GenerateArgs),
    /// Show which records are frozen, present, or still pending
    Status {
        #[command(flatten)]
        paths: PathArgs,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// Overrides for where the manifest and artifacts live
#[derive(Args, Debug, Clone, Default)]
pub struct PathArgs {
    /// Manifest JSON file
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Output root for generated images
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub paths: PathArgs,

    /// Report what would be generated without calling the service
    #[arg(long)]
    pub dry_run: bool,

    /// Seconds to wait after a successful generation
    #[arg(long)]
    pub success_delay_secs: Option<u64>,

    /// Seconds to wait after a failed generation
    #[arg(long)]
    pub failure_delay_secs: Option<u64>,

    /// Image model to request
    #[arg(long)]
    pub model: Option<String>,
}
