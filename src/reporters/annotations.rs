//! GitHub Actions annotation reporter
//!
//! Reference: https://docs.github.com/en/actions/reference/workflow-commands-for-github-actions

use crate::config::Options;
use crate::models::{AnnotationKind, CheckstyleReport};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, trace};

/// Bright red, for error annotations
const ERROR_COLOR: &str = "\x1b[91m";
/// Bright yellow, for everything else
const WARNING_COLOR: &str = "\x1b[93m";
/// Reset ANSI color
const RESET: &str = "\x1b[0m";

fn kind_color(kind: AnnotationKind) -> &'static str {
    match kind {
        AnnotationKind::Error => ERROR_COLOR,
        AnnotationKind::Warning | AnnotationKind::Notice => WARNING_COLOR,
    }
}

/// Summary of one reporting run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Annotations written
    pub annotations: usize,
    /// Findings that make the run fail
    pub forcing: usize,
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        self.forcing > 0
    }
}

/// Strip one leading `<base>/` from `path`. Plain string matching, no
/// path normalization.
pub fn relativize<'a>(path: &'a str, base: Option<&str>) -> &'a str {
    base.and_then(|base| path.strip_prefix(base))
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(path)
}

/// Workflow command payloads are single-line: encode `\n` as `%0A`.
pub fn escape_message(message: &str) -> String {
    message.replace('\n', "%0A")
}

/// Formats findings as workflow commands
pub struct Annotator<'a> {
    options: &'a Options,
    base_dir: Option<String>,
}

impl<'a> Annotator<'a> {
    pub fn new(options: &'a Options, base_dir: Option<&Path>) -> Self {
        Self {
            options,
            base_dir: base_dir.map(|dir| dir.to_string_lossy().into_owned()),
        }
    }

    /// Whether a finding of this kind makes the run fail
    pub fn is_forcing(&self, kind: AnnotationKind) -> bool {
        !self.options.graceful_warnings || kind == AnnotationKind::Error
    }

    /// Render a single annotation, including color codes when enabled
    pub fn render(&self, kind: AnnotationKind, file: &str, line: &str, message: &str) -> String {
        let file = relativize(file, self.base_dir.as_deref());
        let message = escape_message(&format!("{}{}", self.options.message_prefix, message));
        let command = format!("::{kind} file={file},line={line}::{message}\n");

        if self.options.colorize {
            format!("{}\n{command}{RESET}", kind_color(kind))
        } else {
            command
        }
    }

    /// Write one annotation per finding, in document order
    pub fn write_report<W: Write>(
        &self,
        report: &CheckstyleReport,
        out: &mut W,
    ) -> io::Result<Outcome> {
        let mut outcome = Outcome::default();

        for file in &report.files {
            trace!("{}: {} findings", file.name, file.errors.len());
            for error in &file.errors {
                let kind = error.kind();
                out.write_all(
                    self.render(kind, &file.name, &error.line, &error.message)
                        .as_bytes(),
                )?;
                outcome.annotations += 1;
                if self.is_forcing(kind) {
                    outcome.forcing += 1;
                }
            }
        }

        debug!(
            "Wrote {} annotations ({} failing)",
            outcome.annotations, outcome.forcing
        );
        Ok(outcome)
    }
}
