//! Features command: print the build feature catalog.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::feature::Feature;
use crate::output::Output;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum Format {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Args)]
pub struct FeaturesArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,
}

#[derive(Debug, Serialize)]
struct FeatureRow {
    name: Feature,
    description: &'static str,
    default: bool,
    install_arg: String,
    version_arg: String,
}

fn rows() -> Vec<FeatureRow> {
    Feature::ALL
        .into_iter()
        .map(|f| FeatureRow {
            name: f,
            description: f.description(),
            default: f.default_enabled(),
            install_arg: f.install_arg(),
            version_arg: f.version_arg(),
        })
        .collect()
}

pub fn run(args: FeaturesArgs) -> Result<i32> {
    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&rows())?),
        Format::Table => {
            Output::subheader("FEATURES:");
            for row in rows() {
                let default = if row.default { "on" } else { "off" };
                Output::row(row.name.name(), format!("{:<20} default {}", row.description, default));
            }
        }
    }
    Ok(0)
}
