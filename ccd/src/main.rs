use anyhow::Result;
use clap::Parser;

use ccd::commands;
use ccd::error::CcdError;
use ccd::logging::{self, Verbosity};
use ccd::output::Output;
use ccd::pipeline::ExecutionPlan;
use ccd::{Cli, Commands};

fn dispatch(cli: Cli) -> Result<i32> {
    let plan = ExecutionPlan::from_cli(&cli);

    tracing::debug!(
        runtime = %plan.runtime,
        image = %plan.image,
        dry_run = plan.dry_run,
        "Execution plan created"
    );

    match cli.command {
        Commands::Build(args) => commands::build::run(args, &plan),
        Commands::Run(args) => commands::run::run(args, &plan),
        Commands::Here(session) => commands::run::here(session, &plan),
        Commands::Attach(args) => commands::attach::run(args, &plan),
        Commands::Features(args) => commands::features::run(args),
        Commands::List => commands::list::run(&plan),
        Commands::Completions(args) => commands::completions::run(args),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(Verbosity::from_count(cli.verbose));

    let code = match dispatch(cli) {
        Ok(code) => code,
        Err(err) => match err.downcast_ref::<CcdError>() {
            Some(ccd_err) => {
                Output::error(ccd_err.to_string());
                ccd_err.exit_code()
            }
            None => {
                Output::error(format!("{err:#}"));
                1
            }
        },
    };

    std::process::exit(code);
}
