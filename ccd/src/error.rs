//! Custom error types for ccd.
//!
//! Variants are grouped the way callers react to them: validation and
//! configuration problems are caught before any container process is
//! spawned, while runtime errors carry the external tool's exit code so it
//! can be passed through unchanged.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CcdError {
    // Validation
    #[error("Unrecognized feature '{token}' (known features: {known})")]
    UnknownFeature { token: String, known: String },

    #[error("Invalid version pin '{pin}': expected <feature>=<version>")]
    InvalidPin { pin: String },

    #[error("App folder not found: {}", path.display())]
    AppFolderNotFound { path: PathBuf },

    #[error("App folder is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Cannot derive a container name from folder '{folder}'")]
    EmptyIdentity { folder: String },

    // Configuration
    #[error("Home folder {} is unusable: {reason}", path.display())]
    Configuration { path: PathBuf, reason: String },

    #[error("Could not determine the user's home directory; pass --home explicitly")]
    NoHomeDirectory,

    // Not found
    #[error("No running container named '{name}'\n\n  → Start one with: ccd run")]
    NotRunning { name: String },

    // Unusable state
    #[error(
        "Container '{name}' is paused\n\n  \
         → Resume it with: {runtime} unpause {name}"
    )]
    ContainerPaused { name: String, runtime: String },

    #[error("Container '{name}' is '{state}'; try again once it has settled")]
    UnexpectedState { name: String, state: String },

    // Policy
    #[error(
        "A stopped container named '{name}' already exists\n\n  \
         → Remove it with: {runtime} rm {name}\n  \
         → Or rerun with: --on-stale remove"
    )]
    StaleContainer { name: String, runtime: String },

    // External runtime
    #[error("'{program}' exited with code {code}")]
    RuntimeExit { program: String, code: i32 },

    #[error("Container runtime '{program}' could not be started: {source}")]
    RuntimeUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' failed with code {code}: {stderr}")]
    RuntimeQuery {
        command: String,
        code: i32,
        stderr: String,
    },
}

impl CcdError {
    /// Exit code the process should terminate with for this error.
    ///
    /// A failing external runtime keeps its own code; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            CcdError::RuntimeExit { code, .. } | CcdError::RuntimeQuery { code, .. } => *code,
            _ => 1,
        }
    }
}
