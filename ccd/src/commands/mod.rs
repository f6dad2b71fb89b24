//! CLI command implementations.
//!
//! Every command returns the exit code the process should terminate with.

pub mod attach;
pub mod build;
pub mod completions;
pub mod features;
pub mod list;
pub mod run;
