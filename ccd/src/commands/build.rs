//! Build command implementation.
//!
//! Resolves the feature set, then hands `docker build` the terminal until it
//! finishes. Feature names are validated before the runtime is started.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::feature::FeatureSet;
use crate::invocation::BuildOptions;
use crate::lifecycle::Controller;
use crate::pipeline::ExecutionPlan;

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Install only these features (comma-separated)
    #[arg(long, value_name = "FEATURES")]
    pub with: Option<String>,

    /// Skip these features (comma-separated); wins over --with
    #[arg(long, value_name = "FEATURES")]
    pub without: Option<String>,

    /// Pin a feature version, e.g. --pin go=1.23.4 (repeatable)
    #[arg(long = "pin", value_name = "FEATURE=VERSION")]
    pub pins: Vec<String>,

    /// Dockerfile to build from
    #[arg(short = 'f', long = "file")]
    pub dockerfile: Option<PathBuf>,

    /// Build context directory
    #[arg(long, default_value = ".")]
    pub context: PathBuf,

    /// Extra arguments passed to the runtime's build command
    #[arg(last = true, value_name = "RUNTIME_ARGS")]
    pub runtime_args: Vec<String>,
}

pub fn run(args: BuildArgs, plan: &ExecutionPlan) -> Result<i32> {
    let features = FeatureSet::resolve(args.with.as_deref(), args.without.as_deref())?
        .with_pins(&args.pins)?;

    let options = BuildOptions {
        dockerfile: args.dockerfile,
        context: args.context,
        extra_args: args.runtime_args,
    };

    // Build does not mount anything, so the home folder is never consulted.
    let config = plan.config(PathBuf::new());
    Controller::new(&config, plan.runner())
        .dry_run(plan.dry_run)
        .build(&features, &options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_runner::fake::FakeRunner;
    use crate::error::CcdError;
    use std::sync::Arc;

    fn args(with: Option<&str>, without: Option<&str>) -> BuildArgs {
        BuildArgs {
            with: with.map(String::from),
            without: without.map(String::from),
            pins: Vec::new(),
            dockerfile: None,
            context: PathBuf::from("."),
            runtime_args: Vec::new(),
        }
    }

    #[test]
    fn unknown_feature_fails_before_dispatch() {
        let runner = Arc::new(FakeRunner::with_state(""));
        let plan = ExecutionPlan::default().with_runner(runner.clone());

        let err = run(args(Some("frobnicate"), None), &plan).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CcdError>(),
            Some(CcdError::UnknownFeature { .. })
        ));
        assert!(runner.subcommands().is_empty());
    }

    #[test]
    fn without_list_reaches_build_args() {
        let runner = Arc::new(FakeRunner::with_state(""));
        let plan = ExecutionPlan::default().with_runner(runner.clone());

        run(args(None, Some("rust,copilot")), &plan).unwrap();

        let build = runner.last_call();
        let args = build.arguments();
        assert!(args.contains(&"INSTALL_RUST=0".to_string()));
        assert!(args.contains(&"INSTALL_COPILOT=0".to_string()));
        assert!(args.contains(&"INSTALL_CLAUDE=1".to_string()));
    }
}
