//! Verbosity flags → tracing subscriber.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Diagnostic level selected by repeating `-v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Warning,
    Info,
    Debug,
    /// Trace output with timestamps and source locations
    VerboseDebug,
}

impl Verbosity {
    /// Map a flag count to a level; counts past the last level saturate.
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Verbosity::Warning,
            1 => Verbosity::Info,
            2 => Verbosity::Debug,
            _ => Verbosity::VerboseDebug,
        }
    }

    pub fn level(self) -> Level {
        match self {
            Verbosity::Warning => Level::WARN,
            Verbosity::Info => Level::INFO,
            Verbosity::Debug => Level::DEBUG,
            Verbosity::VerboseDebug => Level::TRACE,
        }
    }

    /// Filter used when `RUST_LOG` is not set.
    pub fn directive(self) -> String {
        format!("ccd={}", self.level().as_str().to_lowercase())
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `-v`.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if verbosity == Verbosity::VerboseDebug {
        builder.with_file(true).with_line_number(true).init();
    } else {
        builder.with_target(false).without_time().init();
    }
}
