//! Output helpers for consistent CLI output.
//!
//! Status lines go to stdout with a colored prefix, errors to stderr. These
//! are for the user; diagnostics belong in `tracing` and are gated by `-v`.
//!
//! # Example
//!
//! ```rust,ignore
//! use ccd::output::Output;
//!
//! Output::info("Starting container 'ccd-my-app'...");
//! Output::warning("Removing stopped container 'ccd-my-app'");
//! Output::error("No running container named 'ccd-my-app'");
//! ```

use owo_colors::OwoColorize;

/// Standard output helper for consistent CLI formatting.
pub struct Output;

impl Output {
    /// Print a success message with a green checkmark.
    ///
    /// Example: `✓ Built image claude-code`
    pub fn success(msg: impl AsRef<str>) {
        println!("{} {}", "✓".green().bold(), msg.as_ref());
    }

    /// Print an error message with a red X to stderr.
    pub fn error(msg: impl AsRef<str>) {
        eprintln!("{} {}", "✗".red().bold(), msg.as_ref().red());
    }

    /// Print a warning message with a yellow warning symbol.
    pub fn warning(msg: impl AsRef<str>) {
        println!("{} {}", "⚠".yellow(), msg.as_ref());
    }

    /// Print an info/status message with a cyan arrow.
    ///
    /// Example: `→ Starting container 'ccd-my-app'...`
    pub fn info(msg: impl AsRef<str>) {
        println!("{} {}", "→".cyan(), msg.as_ref().dimmed());
    }

    /// Print a subheader for sections within output.
    pub fn subheader(msg: impl AsRef<str>) {
        println!("{}", msg.as_ref().bold());
    }

    /// Print a table row with a fixed-width first column.
    pub fn row(first: impl AsRef<str>, rest: impl AsRef<str>) {
        println!("  {:<12} {}", first.as_ref().cyan(), rest.as_ref());
    }

    /// Print a dry-run message.
    ///
    /// Example: `[dry-run] docker run -it --rm ...`
    pub fn dry_run(msg: impl AsRef<str>) {
        println!("{} {}", "[dry-run]".dimmed(), msg.as_ref());
    }
}
