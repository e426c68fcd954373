//! cs2pr - Checkstyle reports as pull request annotations
//!
//! Reads a Checkstyle XML report from a file or stdin and prints one
//! GitHub Actions workflow command per finding.

use anyhow::Result;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<ExitCode> {
    // Initialize logging (stdout is reserved for annotations)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    cs2pr::cli::run(std::env::args_os().collect())
}
