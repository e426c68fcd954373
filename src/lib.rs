//! Turns Checkstyle XML reports into GitHub Actions annotations.
//!
//! The pipeline is strictly sequential:
//! - [`cli`] parses the invocation and picks the input source
//! - [`parsers`] loads the report into [`models::CheckstyleReport`]
//! - [`reporters`] writes one workflow command per finding

pub mod cli;
pub mod config;
pub mod models;
pub mod parsers;
pub mod reporters;
