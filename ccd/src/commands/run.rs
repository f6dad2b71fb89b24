//! Run command implementation (`ccd run` and `ccd .`).

use anyhow::Result;
use clap::Args;
use is_terminal::IsTerminal;
use std::path::{Path, PathBuf};

use crate::config::{StalePolicy, default_home_folder};
use crate::lifecycle::Controller;
use crate::output::Output;
use crate::pipeline::ExecutionPlan;

/// Options shared by `ccd run` and `ccd .`.
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Folder holding client credentials [default: ~/.claude-code-docker]
    ///
    /// Defaults to a folder in your home directory rather than `./home`, so
    /// credentials never end up inside the app folder mounted at /app.
    #[arg(long, env = "CCD_HOME", value_name = "HOME")]
    pub home: Option<PathBuf>,

    /// Init file the entrypoint sources instead of the app folder's own
    #[arg(long, env = "CCD_INIT_FILE")]
    pub init: Option<String>,

    /// What to do with a stopped container of the same name
    #[arg(long, value_enum, default_value_t = StalePolicy::Remove)]
    pub on_stale: StalePolicy,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// App folder mounted at /app
    #[arg(default_value = ".")]
    pub app_folder: PathBuf,

    #[command(flatten)]
    pub session: SessionArgs,
}

pub fn run(args: RunArgs, plan: &ExecutionPlan) -> Result<i32> {
    start(&args.app_folder, args.session, plan)
}

/// `ccd .`
pub fn here(session: SessionArgs, plan: &ExecutionPlan) -> Result<i32> {
    start(Path::new("."), session, plan)
}

fn start(app_folder: &Path, session: SessionArgs, plan: &ExecutionPlan) -> Result<i32> {
    let home = match session.home {
        Some(home) => home,
        None => default_home_folder()?,
    };

    let config = plan
        .config(home)
        .with_init_file(session.init)
        .with_stale_policy(session.on_stale);

    if !plan.dry_run && !std::io::stdin().is_terminal() {
        Output::warning("stdin is not a terminal; the runtime may refuse an interactive session");
    }

    Controller::new(&config, plan.runner())
        .dry_run(plan.dry_run)
        .run(app_folder)
}
