//! Checkstyle report loading
//!
//! Loading happens in two steps: a well-formedness pass that can point at
//! the offending line and column, then typed deserialization into
//! [`CheckstyleReport`]. Failures are classified into [`LoadError`], whose
//! `Display` is the diagnostic shown to the user.

mod wellformed;

pub use wellformed::SyntaxError;

use crate::models::CheckstyleReport;
use thiserror::Error;
use tracing::debug;

/// Why a report could not be loaded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("{message} on line {line}, column {column}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Expecting xml stream starting with a xml opening tag.")]
    MissingXmlDeclaration,

    #[error("Unknown error. Expecting checkstyle formatted xml input.")]
    Unrecognized,
}

impl From<SyntaxError> for LoadError {
    fn from(err: SyntaxError) -> Self {
        LoadError::Syntax {
            message: err.message,
            line: err.line,
            column: err.column,
        }
    }
}

impl LoadError {
    /// Pick the diagnostic for input that failed without a positioned error
    fn unpositioned(xml: &str) -> Self {
        if starts_with_xml_declaration(xml) {
            LoadError::Unrecognized
        } else {
            LoadError::MissingXmlDeclaration
        }
    }
}

/// Case-insensitive check for a leading `<?xml`
fn starts_with_xml_declaration(xml: &str) -> bool {
    xml.as_bytes()
        .get(..5)
        .is_some_and(|head| head.eq_ignore_ascii_case(b"<?xml"))
}

/// Parse a Checkstyle report.
///
/// Missing attributes default to empty strings, unknown elements and
/// attributes are ignored. No schema validation is done.
pub fn load(xml: &str) -> Result<CheckstyleReport, LoadError> {
    // Nothing to point at in an empty stream
    if xml.is_empty() {
        return Err(LoadError::unpositioned(xml));
    }

    wellformed::check(xml)?;

    let report: CheckstyleReport = quick_xml::de::from_str(xml).map_err(|e| {
        debug!("Deserialization failed after well-formedness check: {}", e);
        LoadError::unpositioned(xml)
    })?;

    debug!(
        "Loaded report: {} files, {} findings",
        report.files.len(),
        report.error_count()
    );
    Ok(report)
}
