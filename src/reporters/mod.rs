//! Output reporters for cs2pr
//!
//! Only one format exists: GitHub Actions workflow commands
//! (`::error file=...,line=...::message`), optionally wrapped in ANSI
//! colors for humans reading the raw log.

mod annotations;

pub use annotations::{escape_message, relativize, Annotator, Outcome};

use crate::config::Options;
use crate::models::CheckstyleReport;
use std::io::Write;
use std::path::Path;

/// Write every finding of `report` to `out`, relative to `base_dir`
pub fn report<W: Write>(
    report: &CheckstyleReport,
    options: &Options,
    base_dir: Option<&Path>,
    out: &mut W,
) -> std::io::Result<Outcome> {
    Annotator::new(options, base_dir).write_report(report, out)
}
