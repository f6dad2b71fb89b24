//! Attach command implementation.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::config::DEFAULT_SHELL;
use crate::lifecycle::Controller;
use crate::pipeline::ExecutionPlan;

#[derive(Debug, Args)]
pub struct AttachArgs {
    /// App folder whose container to attach to
    #[arg(default_value = ".")]
    pub app_folder: PathBuf,

    /// Shell to start inside the container
    #[arg(long, env = "CCD_SHELL", default_value = DEFAULT_SHELL)]
    pub shell: String,
}

pub fn run(args: AttachArgs, plan: &ExecutionPlan) -> Result<i32> {
    // Attach never mounts anything; the home folder is irrelevant here.
    let config = plan.config(PathBuf::new()).with_shell(args.shell);
    Controller::new(&config, plan.runner())
        .dry_run(plan.dry_run)
        .attach(&args.app_folder)
}
