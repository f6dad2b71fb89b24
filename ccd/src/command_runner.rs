//! Abstraction over container runtime execution for testability.
//!
//! This module provides the [`CommandRunner`] trait, which is the only place
//! ccd spawns external processes. The lifecycle controller talks to the
//! runtime exclusively through it, so tests can substitute a fake that
//! records every [`Invocation`] and returns canned results.
//!
//! # Production Usage
//!
//! [`RealCommandRunner`] delegates to [`std::process::Command`]. Foreground
//! runs inherit stdin/stdout/stderr so the user's terminal becomes the
//! container's terminal, and a SIGINT delivered to ccd is forwarded to the
//! child while ccd keeps waiting for it to exit.

use anyhow::{Context, Result};
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use std::io::ErrorKind;
use std::os::unix::process::ExitStatusExt;
use std::process::{Command, ExitStatus, Output, Stdio};
use std::sync::Once;
use std::sync::atomic::{AtomicI32, Ordering};
use tracing::debug;

use crate::error::CcdError;
use crate::invocation::Invocation;

/// Trait for abstracting external command execution.
pub trait CommandRunner: Send + Sync {
    /// Run a command and capture its full output (stdout + stderr + exit status).
    ///
    /// Used for state queries and housekeeping that the user does not see.
    fn run_output(&self, invocation: &Invocation) -> Result<Output>;

    /// Run a command in the foreground and block until it exits.
    ///
    /// Stdio is inherited and interrupts are forwarded to the child.
    fn run_foreground(&self, invocation: &Invocation) -> Result<ExitStatus>;
}

/// Exit code of a finished process, using the shell's `128 + signal`
/// convention for processes killed by a signal.
pub fn exit_code(status: ExitStatus) -> i32 {
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => 1,
    }
}

/// Pid of the current foreground child, 0 when there is none.
static FOREGROUND_PID: AtomicI32 = AtomicI32::new(0);
static FORWARDER: Once = Once::new();

fn install_signal_forwarder() -> Result<()> {
    let mut installed = Ok(());
    FORWARDER.call_once(|| {
        installed = ctrlc::set_handler(|| {
            let pid = FOREGROUND_PID.load(Ordering::SeqCst);
            if pid > 0 {
                let _ = kill(Pid::from_raw(pid), Signal::SIGINT);
            }
        });
    });
    installed.context("Failed to install SIGINT handler")
}

/// Production implementation that delegates to [`std::process::Command`].
pub struct RealCommandRunner;

impl RealCommandRunner {
    fn command(invocation: &Invocation) -> Command {
        let mut cmd = Command::new(invocation.program());
        cmd.args(invocation.arguments());
        for (k, v) in invocation.env() {
            cmd.env(k, v);
        }
        cmd
    }

    fn spawn_error(invocation: &Invocation, err: std::io::Error) -> anyhow::Error {
        if err.kind() == ErrorKind::NotFound {
            CcdError::RuntimeUnavailable {
                program: invocation.program().to_string(),
                source: err,
            }
            .into()
        } else {
            anyhow::Error::new(err).context(format!("Failed to run '{}'", invocation.program()))
        }
    }
}

impl CommandRunner for RealCommandRunner {
    fn run_output(&self, invocation: &Invocation) -> Result<Output> {
        debug!(command = %invocation.command_line(), "Capturing output");
        Self::command(invocation)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Self::spawn_error(invocation, e))
    }

    fn run_foreground(&self, invocation: &Invocation) -> Result<ExitStatus> {
        install_signal_forwarder()?;

        debug!(command = %invocation.command_line(), "Starting foreground process");
        let mut child = Self::command(invocation)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Self::spawn_error(invocation, e))?;

        FOREGROUND_PID.store(child.id() as i32, Ordering::SeqCst);
        let status = child.wait();
        FOREGROUND_PID.store(0, Ordering::SeqCst);

        let status =
            status.with_context(|| format!("Failed to wait for '{}'", invocation.program()))?;
        debug!(code = exit_code(status), "Foreground process exited");
        Ok(status)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory runtime used by controller tests.

    use super::*;
    use std::sync::Mutex;

    /// Simulates a runtime holding at most one container.
    pub struct FakeRunner {
        /// What `ps --format {{.State}}` prints; empty means absent
        pub state: Mutex<String>,
        /// Exit code returned by foreground runs
        pub exit_code: i32,
        /// Every invocation, in order
        pub calls: Mutex<Vec<Invocation>>,
    }

    impl FakeRunner {
        pub fn with_state(state: &str) -> Self {
            Self {
                state: Mutex::new(state.to_string()),
                exit_code: 0,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn exiting_with(mut self, code: i32) -> Self {
            self.exit_code = code;
            self
        }

        /// First argument (the runtime subcommand) of each call.
        pub fn subcommands(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|inv| inv.arguments()[0].clone())
                .collect()
        }

        pub fn last_call(&self) -> Invocation {
            self.calls.lock().unwrap().last().cloned().unwrap()
        }
    }

    fn status(code: i32) -> ExitStatus {
        ExitStatus::from_raw(code << 8)
    }

    impl CommandRunner for FakeRunner {
        fn run_output(&self, invocation: &Invocation) -> Result<Output> {
            self.calls.lock().unwrap().push(invocation.clone());
            let stdout = match invocation.arguments()[0].as_str() {
                "ps" => format!("{}\n", self.state.lock().unwrap()),
                "rm" => {
                    self.state.lock().unwrap().clear();
                    String::new()
                }
                _ => String::new(),
            };
            Ok(Output {
                status: status(0),
                stdout: stdout.into_bytes(),
                stderr: Vec::new(),
            })
        }

        fn run_foreground(&self, invocation: &Invocation) -> Result<ExitStatus> {
            self.calls.lock().unwrap().push(invocation.clone());
            Ok(status(self.exit_code))
        }
    }
}
