//! Resolved configuration for one ccd invocation.
//!
//! All ambient inputs (flags, `CCD_*` environment variables, the user's home
//! directory) are collected here by the CLI layer. Nothing below this module
//! reads the process environment.

use clap::ValueEnum;
use directories::BaseDirs;
use std::fmt;
use std::path::PathBuf;

use crate::error::CcdError;

pub const DEFAULT_RUNTIME: &str = "docker";
pub const DEFAULT_IMAGE: &str = "claude-code";
pub const DEFAULT_SHELL: &str = "/bin/bash";

/// Name of the default home folder, created under the user's home directory.
pub const HOME_FOLDER_NAME: &str = ".claude-code-docker";

/// Working directory the app folder is mounted at.
pub const CONTAINER_APP_DIR: &str = "/app";

/// Home directory of the image's user.
pub const CONTAINER_HOME: &str = "/home/ubuntu";

/// What `run` does when a stopped container with the derived name exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StalePolicy {
    /// Remove the stopped container and start a fresh one
    #[default]
    Remove,
    /// Fail and leave the stopped container alone
    Refuse,
}

impl fmt::Display for StalePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StalePolicy::Remove => write!(f, "remove"),
            StalePolicy::Refuse => write!(f, "refuse"),
        }
    }
}

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Container runtime executable (`docker`, `podman`, ...)
    pub runtime: String,
    /// Image to build and run
    pub image: String,
    /// Host folder holding per-client credentials
    pub home_folder: PathBuf,
    /// Init file override passed to the entrypoint as `CCD_INIT_FILE`
    pub init_file: Option<String>,
    /// Shell started by `attach`
    pub shell: String,
    pub stale_policy: StalePolicy,
}

impl Config {
    /// Configuration with the given home folder and defaults elsewhere.
    pub fn new(home_folder: impl Into<PathBuf>) -> Self {
        Self {
            runtime: DEFAULT_RUNTIME.to_string(),
            image: DEFAULT_IMAGE.to_string(),
            home_folder: home_folder.into(),
            init_file: None,
            shell: DEFAULT_SHELL.to_string(),
            stale_policy: StalePolicy::default(),
        }
    }

    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = runtime.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_init_file(mut self, init_file: Option<String>) -> Self {
        self.init_file = init_file;
        self
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }
}

/// `~/.claude-code-docker` for the current user.
pub fn default_home_folder() -> Result<PathBuf, CcdError> {
    let dirs = BaseDirs::new().ok_or(CcdError::NoHomeDirectory)?;
    Ok(dirs.home_dir().join(HOME_FOLDER_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn defaults() {
        let config = Config::new("/tmp/home");
        assert_eq!(config.runtime, "docker");
        assert_eq!(config.image, "claude-code");
        assert_eq!(config.shell, "/bin/bash");
        assert_eq!(config.stale_policy, StalePolicy::Remove);
        assert!(config.init_file.is_none());
    }

    #[test]
    fn builder_overrides() {
        let config = Config::new("/tmp/home")
            .with_runtime("podman")
            .with_image("ccd-dev")
            .with_shell("/bin/zsh")
            .with_init_file(Some("/app/env.sh".to_string()))
            .with_stale_policy(StalePolicy::Refuse);
        assert_eq!(config.runtime, "podman");
        assert_eq!(config.image, "ccd-dev");
        assert_eq!(config.shell, "/bin/zsh");
        assert_eq!(config.init_file.as_deref(), Some("/app/env.sh"));
        assert_eq!(config.stale_policy, StalePolicy::Refuse);
    }

    #[test]
    #[serial]
    fn default_home_folder_follows_home_variable() {
        let temp = tempfile::TempDir::new().unwrap();
        let previous = std::env::var_os("HOME");

        // Rust 2024 requires unsafe for environment mutation
        unsafe { std::env::set_var("HOME", temp.path()) };
        let home = default_home_folder();
        unsafe {
            match previous {
                Some(value) => std::env::set_var("HOME", value),
                None => std::env::remove_var("HOME"),
            }
        }

        assert_eq!(home.unwrap(), temp.path().join(HOME_FOLDER_NAME));
    }

    #[test]
    #[serial]
    fn default_home_folder_is_under_home() {
        let home = default_home_folder().unwrap();
        assert!(home.ends_with(HOME_FOLDER_NAME));
        assert!(home.is_absolute());
    }
}
