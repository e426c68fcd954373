//! Invocation options
//!
//! cs2pr has no config files: everything comes from the command line and is
//! frozen into [`Options`] before the report is read.

/// Settings that shape the emitted annotations and the exit code
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Wrap every annotation in ANSI color codes
    pub colorize: bool,
    /// Only error-level findings produce a failing exit code
    pub graceful_warnings: bool,
    /// Text put in front of every message; empty, or ends with a space
    pub message_prefix: String,
}

impl Options {
    /// Build the message prefix from a `--prefix` value.
    ///
    /// Surrounding double quotes are dropped. Returns `None` when nothing
    /// is left, which callers treat as an invalid option.
    pub fn prefix_from_arg(value: &str) -> Option<String> {
        let value = value.strip_prefix('"').unwrap_or(value);
        let value = value.strip_suffix('"').unwrap_or(value);
        if value.is_empty() {
            None
        } else {
            Some(format!("{value} "))
        }
    }
}
