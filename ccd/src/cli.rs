//! CLI argument definitions for ccd.
//!
//! This module contains the clap-derived `Cli` and `Commands` types.
//! Separated from `main.rs` so that library code (e.g., `pipeline::ExecutionPlan::from_cli`)
//! and shell completion generation can reference these types.

use clap::{ArgAction, Parser, Subcommand};

use crate::commands;
use crate::config::{DEFAULT_IMAGE, DEFAULT_RUNTIME};

#[derive(Debug, Parser)]
#[command(name = "ccd")]
#[command(about = "Run coding-agent CLIs in a per-project Docker container")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Container runtime executable
    #[arg(long, global = true, env = "CCD_RUNTIME", default_value = DEFAULT_RUNTIME)]
    pub runtime: String,

    /// Image to build and run
    #[arg(long, global = true, env = "CCD_IMAGE", default_value = DEFAULT_IMAGE)]
    pub image: String,

    /// Print the runtime commands instead of running them
    #[arg(long, short = 'n', global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the image with a selected set of features
    ///
    /// All features are installed by default. `--with` installs only the
    /// listed features; `--without` removes features and wins over `--with`.
    Build(commands::build::BuildArgs),

    /// Start (or attach to) the container for an app folder
    ///
    /// The container is named `ccd-<folder name>`. If it is already running
    /// a new shell is opened in it instead.
    Run(commands::run::RunArgs),

    /// Shorthand for `ccd run .`
    #[command(name = ".")]
    Here(commands::run::SessionArgs),

    /// Open a shell in the running container for an app folder
    Attach(commands::attach::AttachArgs),

    /// List the features that can be toggled at build time
    Features(commands::features::FeaturesArgs),

    /// List running ccd containers
    #[command(alias = "ps")]
    List,

    /// Generate shell completions
    Completions(commands::completions::CompletionsArgs),
}
