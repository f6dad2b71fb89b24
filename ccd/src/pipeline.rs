//! Execution plan shared by all commands.
//!
//! Captures the global options from the command line together with the
//! [`CommandRunner`] used to reach the container runtime, so commands never
//! look at `Cli` or construct runners themselves.

use std::path::PathBuf;
use std::sync::Arc;

use crate::Cli;
use crate::command_runner::{CommandRunner, RealCommandRunner};
use crate::config::{Config, DEFAULT_IMAGE, DEFAULT_RUNTIME};

/// Execution plan for a ccd command.
#[derive(Clone)]
pub struct ExecutionPlan {
    /// Container runtime executable
    pub runtime: String,
    /// Image to build and run
    pub image: String,
    /// Whether to print foreground commands instead of running them
    pub dry_run: bool,
    runner: Arc<dyn CommandRunner>,
}

impl ExecutionPlan {
    /// Create an execution plan from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            runtime: cli.runtime.clone(),
            image: cli.image.clone(),
            dry_run: cli.dry_run,
            runner: Arc::new(RealCommandRunner),
        }
    }

    /// Replace the command runner.
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    /// Base [`Config`] for this plan with the given home folder.
    pub fn config(&self, home_folder: impl Into<PathBuf>) -> Config {
        Config::new(home_folder)
            .with_runtime(&self.runtime)
            .with_image(&self.image)
    }
}

impl Default for ExecutionPlan {
    fn default() -> Self {
        Self {
            runtime: DEFAULT_RUNTIME.to_string(),
            image: DEFAULT_IMAGE.to_string(),
            dry_run: false,
            runner: Arc::new(RealCommandRunner),
        }
    }
}

impl std::fmt::Debug for ExecutionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionPlan")
            .field("runtime", &self.runtime)
            .field("image", &self.image)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn from_cli_copies_globals() {
        let cli = Cli::try_parse_from([
            "ccd", "--runtime", "podman", "--image", "mine", "--dry-run", "list",
        ])
        .unwrap();
        let plan = ExecutionPlan::from_cli(&cli);
        assert_eq!(plan.runtime, "podman");
        assert_eq!(plan.image, "mine");
        assert!(plan.dry_run);
    }

    #[test]
    fn config_inherits_runtime_and_image() {
        let plan = ExecutionPlan {
            runtime: "podman".to_string(),
            ..ExecutionPlan::default()
        };
        let config = plan.config("/tmp/home");
        assert_eq!(config.runtime, "podman");
        assert_eq!(config.image, DEFAULT_IMAGE);
        assert_eq!(config.home_folder, PathBuf::from("/tmp/home"));
    }
}
