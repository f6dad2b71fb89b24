//! Shell completion generation.

use anyhow::Result;
use clap::{Args, CommandFactory, ValueEnum};
use clap_complete::Generator;
use clap_complete_nushell::Nushell;
use std::io;

use crate::cli::Cli;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Nushell,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

fn emit<G: Generator>(generator: G) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(generator, &mut cmd, name, &mut io::stdout());
}

pub fn run(args: CompletionsArgs) -> Result<i32> {
    match args.shell {
        Shell::Bash => emit(clap_complete::Shell::Bash),
        Shell::Zsh => emit(clap_complete::Shell::Zsh),
        Shell::Fish => emit(clap_complete::Shell::Fish),
        Shell::Nushell => emit(Nushell),
    }
    Ok(0)
}
