//! Construction of container runtime command lines.
//!
//! Everything here is pure: an [`Invocation`] is an inert description of a
//! process (program, ordered arguments, environment overlay) that the
//! [`CommandRunner`](crate::command_runner::CommandRunner) later executes.
//! Argument order is fixed so the same inputs always render the same
//! command line.

use std::path::PathBuf;

use crate::config::{CONTAINER_APP_DIR, Config};
use crate::feature::FeatureSet;
use crate::identity::{ContainerIdentity, NAME_PREFIX};
use crate::mounts::MountPlan;

/// Variable naming the app directory inside the container.
pub const ENV_APP_DIR: &str = "CCD_APP_DIR";
/// Variable naming the project environment path inside the container.
pub const ENV_PROJECT_ENV: &str = "CCD_PROJECT_ENV";
/// Variable carrying an explicit init file for the entrypoint.
pub const ENV_INIT_FILE: &str = "CCD_INIT_FILE";

/// Default project environment, overridable from the init file.
pub const DEFAULT_PROJECT_ENV: &str = "/app/.venv";

/// Build-specific inputs that are not part of [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Dockerfile to build from; the runtime's default when `None`
    pub dockerfile: Option<PathBuf>,
    /// Build context directory
    pub context: PathBuf,
    /// Extra arguments passed to the runtime verbatim
    pub extra_args: Vec<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            dockerfile: None,
            context: PathBuf::from("."),
            extra_args: Vec::new(),
        }
    }
}

/// A fully described external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    env: Vec<(String, String)>,
}

impl Invocation {
    pub(crate) fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub(crate) fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// `<runtime> build` with one toggle and one version arg per feature.
    pub fn build(config: &Config, features: &FeatureSet, options: &BuildOptions) -> Self {
        let mut inv = Self::new(&config.runtime).arg("build");

        for (feature, enabled) in features.iter() {
            inv = inv
                .arg("--build-arg")
                .arg(format!(
                    "{}={}",
                    feature.install_arg(),
                    if enabled { "1" } else { "0" }
                ))
                .arg("--build-arg")
                .arg(format!(
                    "{}={}",
                    feature.version_arg(),
                    features.version(feature)
                ));
        }

        inv = inv.arg("-t").arg(&config.image);

        if let Some(dockerfile) = &options.dockerfile {
            inv = inv.arg("-f").arg(dockerfile.display().to_string());
        }

        inv = inv
            .args(options.extra_args.iter().cloned())
            .arg(options.context.display().to_string());

        inv.env.push(("DOCKER_BUILDKIT".to_string(), "1".to_string()));
        inv
    }

    /// `<runtime> run -it --rm` for a fresh interactive container.
    pub fn run(config: &Config, identity: &ContainerIdentity, plan: &MountPlan) -> Self {
        let mut inv = Self::new(&config.runtime).args([
            "run",
            "-it",
            "--rm",
            "--name",
            identity.name.as_str(),
            "--hostname",
            identity.hostname.as_str(),
            "-w",
            CONTAINER_APP_DIR,
        ]);

        for (key, value) in container_env(config) {
            inv = inv.arg("-e").arg(format!("{key}={value}"));
        }

        for mount in plan.mounts() {
            inv = inv.arg("-v").arg(mount.volume_arg());
        }

        inv.arg(&config.image)
    }

    /// `<runtime> exec -it <name> <shell>` into a running container.
    pub fn exec(config: &Config, identity: &ContainerIdentity) -> Self {
        Self::new(&config.runtime).args([
            "exec",
            "-it",
            identity.name.as_str(),
            config.shell.as_str(),
        ])
    }

    /// Query the state of the container with exactly this name.
    pub fn query_state(config: &Config, identity: &ContainerIdentity) -> Self {
        Self::new(&config.runtime).args([
            "ps".to_string(),
            "--all".to_string(),
            "--filter".to_string(),
            format!("name=^{}$", identity.name),
            "--format".to_string(),
            "{{.State}}".to_string(),
        ])
    }

    /// Force-remove the named container.
    pub fn remove(config: &Config, identity: &ContainerIdentity) -> Self {
        Self::new(&config.runtime).args(["rm", "--force", identity.name.as_str()])
    }

    /// List running containers managed by ccd as JSON lines.
    pub fn list(config: &Config) -> Self {
        Self::new(&config.runtime).args([
            "ps".to_string(),
            "--filter".to_string(),
            format!("name=^{NAME_PREFIX}-"),
            "--format".to_string(),
            "{{json .}}".to_string(),
        ])
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    /// Shell-quoted command line, for logs and `--dry-run` style output.
    pub fn command_line(&self) -> String {
        let parts: Vec<&str> = std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect();
        shlex::try_join(parts.iter().copied()).unwrap_or_else(|_| parts.join(" "))
    }
}

/// Environment the entrypoint expects to find set.
fn container_env(config: &Config) -> Vec<(&'static str, String)> {
    let mut env = vec![
        (ENV_APP_DIR, CONTAINER_APP_DIR.to_string()),
        (ENV_PROJECT_ENV, DEFAULT_PROJECT_ENV.to_string()),
    ];
    if let Some(init) = &config.init_file {
        env.push((ENV_INIT_FILE, init.clone()));
    }
    env
}
