//! Core data models for cs2pr
//!
//! The Checkstyle containers are deserialized straight from the XML report;
//! [`AnnotationKind`] is what the CI host understands.

use serde::Deserialize;

/// A parsed Checkstyle report
///
/// The root element name is not checked, so any tool emitting the
/// Checkstyle shape under a different root still works.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CheckstyleReport {
    #[serde(rename = "file", default)]
    pub files: Vec<FileEntry>,
}

impl CheckstyleReport {
    /// Total number of findings across all files
    pub fn error_count(&self) -> usize {
        self.files.iter().map(|f| f.errors.len()).sum()
    }
}

/// All findings reported for one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileEntry {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "error", default)]
    pub errors: Vec<ErrorEntry>,
}

/// A single finding
///
/// `line` is kept as the raw attribute text: linters occasionally emit an
/// empty or non-numeric value and it is passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorEntry {
    #[serde(rename = "@severity", default)]
    pub severity: String,
    #[serde(rename = "@line", default)]
    pub line: String,
    #[serde(rename = "@message", default)]
    pub message: String,
}

impl ErrorEntry {
    /// Annotation level for this finding's severity
    pub fn kind(&self) -> AnnotationKind {
        AnnotationKind::from_severity(&self.severity)
    }
}

/// Annotation levels of a GitHub Actions workflow command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    Error,
    Warning,
    Notice,
}

impl AnnotationKind {
    /// Map a Checkstyle severity. Exact, case-sensitive match; anything
    /// unrecognised (including an empty string) is a warning.
    pub fn from_severity(severity: &str) -> Self {
        match severity {
            "error" | "failure" => AnnotationKind::Error,
            "info" | "notice" => AnnotationKind::Notice,
            _ => AnnotationKind::Warning,
        }
    }
}

impl std::fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnnotationKind::Error => write!(f, "error"),
            AnnotationKind::Warning => write!(f, "warning"),
            AnnotationKind::Notice => write!(f, "notice"),
        }
    }
}
