//! Host ↔ container bind mounts for `run`.
//!
//! Planning is pure: [`MountPlan::new`] only joins paths. Host-side
//! preparation is a separate step ([`MountPlan::prepare`]) that creates the
//! home folder and empty placeholders for file mounts. Missing directories
//! under the home folder are left for the runtime to create on first bind.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{CONTAINER_APP_DIR, CONTAINER_HOME};
use crate::error::CcdError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountKind {
    /// The project folder, mounted read-write at the working directory
    AppFolder,
    /// A per-client configuration directory under the home folder
    ConfigDir,
    /// A per-client configuration file under the home folder
    ConfigFile,
}

/// One `-v host:container` binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub host: PathBuf,
    pub container: String,
    pub kind: MountKind,
}

impl Mount {
    /// The `host:container` value passed to `-v`.
    pub fn volume_arg(&self) -> String {
        format!("{}:{}", self.host.display(), self.container)
    }
}

/// Client configuration paths under the home folder, in mount order.
pub const CLIENT_CONFIG: [(&str, MountKind); 5] = [
    (".claude", MountKind::ConfigDir),
    (".claude.json", MountKind::ConfigFile),
    (".gemini", MountKind::ConfigDir),
    (".codex", MountKind::ConfigDir),
    (".copilot", MountKind::ConfigDir),
];

/// The ordered mounts for one app folder and home folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPlan {
    home_folder: PathBuf,
    mounts: Vec<Mount>,
}

impl MountPlan {
    /// Plan mounts for a canonical `app_folder` and a `home_folder`.
    ///
    /// The home folder is made absolute against the current directory but
    /// is not touched on disk.
    pub fn new(app_folder: &Path, home_folder: &Path) -> Result<Self, CcdError> {
        let home_folder = std::path::absolute(home_folder).map_err(|e| CcdError::Configuration {
            path: home_folder.to_path_buf(),
            reason: format!("cannot resolve to an absolute path: {e}"),
        })?;

        let mut mounts = vec![Mount {
            host: app_folder.to_path_buf(),
            container: CONTAINER_APP_DIR.to_string(),
            kind: MountKind::AppFolder,
        }];

        mounts.extend(CLIENT_CONFIG.iter().map(|(name, kind)| Mount {
            host: home_folder.join(name),
            container: format!("{CONTAINER_HOME}/{name}"),
            kind: *kind,
        }));

        Ok(Self {
            home_folder,
            mounts,
        })
    }

    pub fn home_folder(&self) -> &Path {
        &self.home_folder
    }

    pub fn mounts(&self) -> &[Mount] {
        &self.mounts
    }

    /// Create the home folder and file placeholders on the host.
    ///
    /// Safe to call repeatedly: existing files are opened in append mode and
    /// never truncated.
    pub fn prepare(&self) -> Result<(), CcdError> {
        let config_err = |reason: String| CcdError::Configuration {
            path: self.home_folder.clone(),
            reason,
        };

        if self.home_folder.exists() && !self.home_folder.is_dir() {
            return Err(config_err("exists but is not a directory".to_string()));
        }

        debug!(path = %self.home_folder.display(), "Ensuring home folder exists");
        fs::create_dir_all(&self.home_folder)
            .map_err(|e| config_err(format!("cannot create directory: {e}")))?;

        for mount in &self.mounts {
            if mount.kind != MountKind::ConfigFile {
                continue;
            }
            if mount.host.is_dir() {
                return Err(config_err(format!(
                    "{} must be a file, found a directory",
                    mount.host.display()
                )));
            }
            debug!(path = %mount.host.display(), "Ensuring placeholder file");
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&mount.host)
                .map_err(|e| {
                    config_err(format!("cannot create {}: {e}", mount.host.display()))
                })?;
        }

        Ok(())
    }
}
