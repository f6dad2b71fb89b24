//! ccd - run coding-agent CLIs in a per-project Docker container
//!
//! One long-lived interactive container per project folder. The folder's
//! name determines the container name (`ccd-<folder>`), so `ccd run` and
//! `ccd attach` from the same folder always find the same container.
//!
//! ## Layers
//!
//! - **Resolution** ([`feature`], [`identity`], [`mounts`]): pure
//!   derivations from the command line and the filesystem
//! - **Command building** ([`invocation`]): inert runtime command lines
//! - **Lifecycle** ([`lifecycle`]): build/run/attach decisions, executed
//!   through a [`command_runner::CommandRunner`]
//!
//! The container runtime is the only source of truth for container state;
//! ccd keeps no registry of its own.

pub mod cli;
pub mod command_runner;
pub mod commands;
pub mod config;
pub mod error;
pub mod feature;
pub mod identity;
pub mod invocation;
pub mod lifecycle;
pub mod logging;
pub mod mounts;
pub mod output;
pub mod pipeline;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::CcdError;
