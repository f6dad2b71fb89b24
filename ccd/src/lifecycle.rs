//! Build / run / attach orchestration.
//!
//! The [`Controller`] walks every command through the same phases:
//!
//! ```text
//! Idle → Resolving → Dispatched → Succeeded | Failed
//! ```
//!
//! Validation and host preparation happen while `Resolving`, so a bad
//! feature name, app folder or home folder fails before the runtime is ever
//! invoked. Container state is queried from the runtime on every call and
//! never remembered between invocations.

use anyhow::{Result, bail};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::command_runner::{CommandRunner, exit_code};
use crate::config::{Config, StalePolicy};
use crate::error::CcdError;
use crate::feature::FeatureSet;
use crate::identity::ContainerIdentity;
use crate::invocation::{BuildOptions, Invocation};
use crate::mounts::MountPlan;
use crate::output::Output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Resolving,
    Dispatched,
    Succeeded,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Idle => "idle",
            Phase::Resolving => "resolving",
            Phase::Dispatched => "dispatched",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Container state as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerState {
    Absent,
    Running,
    /// Alive but frozen; never treated as a leftover
    Paused,
    /// Exited, dead or created but never started
    Stopped,
    /// Any other state (`removing`, or one this version does not know)
    Other(String),
}

impl ContainerState {
    /// Interpret the output of `ps --format {{.State}}`.
    pub fn from_ps_output(stdout: &str) -> Self {
        let Some(state) = stdout.lines().map(str::trim).find(|l| !l.is_empty()) else {
            return ContainerState::Absent;
        };
        match state.to_ascii_lowercase().as_str() {
            "running" | "restarting" => ContainerState::Running,
            "paused" => ContainerState::Paused,
            "exited" | "dead" | "created" => ContainerState::Stopped,
            _ => ContainerState::Other(state.to_string()),
        }
    }
}

/// One row of `ccd list`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunningContainer {
    #[serde(rename = "Names")]
    pub name: String,
    #[serde(rename = "Image", default)]
    pub image: String,
    #[serde(rename = "Status", default)]
    pub status: String,
}

/// Drives one command against the container runtime.
pub struct Controller<'a> {
    config: &'a Config,
    runner: &'a dyn CommandRunner,
    dry_run: bool,
    phase: Phase,
}

impl<'a> Controller<'a> {
    pub fn new(config: &'a Config, runner: &'a dyn CommandRunner) -> Self {
        Self {
            config,
            runner,
            dry_run: false,
            phase: Phase::Idle,
        }
    }

    /// Print foreground commands instead of running them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn transition(&mut self, next: Phase) {
        debug!(from = %self.phase, to = %next, "Lifecycle transition");
        self.phase = next;
    }

    /// Record the final phase for `result` and pass it through.
    fn settle(&mut self, result: Result<i32>) -> Result<i32> {
        let next = match &result {
            Ok(0) => Phase::Succeeded,
            _ => Phase::Failed,
        };
        self.transition(next);
        result
    }

    /// Build the image with the resolved feature set.
    ///
    /// A non-zero exit from the runtime becomes [`CcdError::RuntimeExit`]
    /// carrying the same code.
    pub fn build(&mut self, features: &FeatureSet, options: &BuildOptions) -> Result<i32> {
        self.transition(Phase::Resolving);
        let result = self.build_inner(features, options);
        self.settle(result)
    }

    fn build_inner(&mut self, features: &FeatureSet, options: &BuildOptions) -> Result<i32> {
        for (feature, enabled) in features.iter() {
            info!(
                feature = %feature,
                enabled,
                version = features.version(feature),
                "Feature decision"
            );
        }

        let invocation = Invocation::build(self.config, features, options);
        Output::info(format!("Building image: {}", self.config.image));

        let code = self.dispatch(&invocation)?;
        if code != 0 {
            return Err(CcdError::RuntimeExit {
                program: self.config.runtime.clone(),
                code,
            }
            .into());
        }

        if !self.dry_run {
            Output::success(format!("Built image {}", self.config.image));
        }
        Ok(0)
    }

    /// Start an interactive container for `app_folder`, or attach to the
    /// one already running for it.
    ///
    /// Returns the exit code of the interactive session.
    pub fn run(&mut self, app_folder: &Path) -> Result<i32> {
        self.transition(Phase::Resolving);
        let result = self.run_inner(app_folder);
        self.settle(result)
    }

    fn run_inner(&mut self, app_folder: &Path) -> Result<i32> {
        let (app_folder, identity) = ContainerIdentity::resolve(app_folder)?;
        let plan = MountPlan::new(&app_folder, &self.config.home_folder)?;

        info!(path = %app_folder.display(), "App folder");
        info!(path = %plan.home_folder().display(), "Home folder");
        debug!(name = %identity.name, hostname = %identity.hostname, "Container identity");

        plan.prepare()?;
        let invocation = Invocation::run(self.config, &identity, &plan);

        match self.query_state(&identity)? {
            ContainerState::Running => {
                Output::info(format!(
                    "Container '{}' is already running, attaching",
                    identity
                ));
                return self.exec_into(&identity);
            }
            ContainerState::Stopped => self.clear_stale(&identity)?,
            ContainerState::Absent => {}
            state => return Err(self.unusable(&identity, state).into()),
        }

        Output::info(format!("Starting container '{}'...", identity));
        self.dispatch(&invocation)
    }

    /// Open a shell in the running container for `app_folder`.
    pub fn attach(&mut self, app_folder: &Path) -> Result<i32> {
        self.transition(Phase::Resolving);
        let result = self.attach_inner(app_folder);
        self.settle(result)
    }

    fn attach_inner(&mut self, app_folder: &Path) -> Result<i32> {
        let (_, identity) = ContainerIdentity::resolve(app_folder)?;

        match self.query_state(&identity)? {
            ContainerState::Running => {}
            ContainerState::Absent | ContainerState::Stopped => {
                return Err(CcdError::NotRunning {
                    name: identity.name,
                }
                .into());
            }
            state => return Err(self.unusable(&identity, state).into()),
        }

        Output::info(format!("Attaching to container '{}'...", identity));
        self.exec_into(&identity)
    }

    /// Running containers whose name carries the ccd prefix.
    pub fn running_containers(&self) -> Result<Vec<RunningContainer>> {
        let stdout = self.capture(&Invocation::list(self.config))?;
        stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .map_err(|e| anyhow::anyhow!("Unexpected `ps` output '{line}': {e}"))
            })
            .collect()
    }

    /// Error for a container that exists but can be neither reused nor removed.
    fn unusable(&self, identity: &ContainerIdentity, state: ContainerState) -> CcdError {
        let name = identity.name.clone();
        match state {
            ContainerState::Paused => CcdError::ContainerPaused {
                name,
                runtime: self.config.runtime.clone(),
            },
            ContainerState::Other(state) => CcdError::UnexpectedState { name, state },
            state => CcdError::UnexpectedState {
                name,
                state: format!("{state:?}").to_lowercase(),
            },
        }
    }

    fn exec_into(&mut self, identity: &ContainerIdentity) -> Result<i32> {
        self.dispatch(&Invocation::exec(self.config, identity))
    }

    fn clear_stale(&mut self, identity: &ContainerIdentity) -> Result<()> {
        match self.config.stale_policy {
            StalePolicy::Refuse => bail!(CcdError::StaleContainer {
                name: identity.name.clone(),
                runtime: self.config.runtime.clone(),
            }),
            StalePolicy::Remove => {
                warn!(name = %identity.name, "Removing stopped container");
                let remove = Invocation::remove(self.config, identity);
                if self.dry_run {
                    Output::dry_run(format!("Would remove: {}", remove.command_line()));
                    return Ok(());
                }
                Output::warning(format!(
                    "Removing stopped container '{}' before starting a new one",
                    identity
                ));
                self.capture(&remove)?;
                Ok(())
            }
        }
    }

    fn query_state(&self, identity: &ContainerIdentity) -> Result<ContainerState> {
        let stdout = self.capture(&Invocation::query_state(self.config, identity))?;
        let state = ContainerState::from_ps_output(&stdout);
        debug!(name = %identity.name, ?state, "Queried container state");
        Ok(state)
    }

    /// Run a housekeeping command, failing on a non-zero exit.
    fn capture(&self, invocation: &Invocation) -> Result<String> {
        let output = self.runner.run_output(invocation)?;
        if !output.status.success() {
            return Err(CcdError::RuntimeQuery {
                command: invocation.command_line(),
                code: exit_code(output.status),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Hand the terminal to `invocation` and return its exit code.
    fn dispatch(&mut self, invocation: &Invocation) -> Result<i32> {
        info!(command = %invocation.command_line(), "Full command");

        if self.dry_run {
            Output::dry_run(invocation.command_line());
            return Ok(0);
        }

        self.transition(Phase::Dispatched);
        let status = self.runner.run_foreground(invocation)?;
        Ok(exit_code(status))
    }
}
