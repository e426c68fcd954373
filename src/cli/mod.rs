//! CLI definition and the top-level run loop

use crate::config::Options;
use crate::{parsers, reporters};
use anyhow::{Context, Result};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::Parser;
use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{debug, warn};

/// No failing findings
pub const EXIT_SUCCESS: u8 = 0;
/// At least one failing finding
pub const EXIT_FINDINGS: u8 = 1;
/// The report is not well-formed XML
pub const EXIT_MALFORMED_INPUT: u8 = 2;
/// Bad option or argument count
pub const EXIT_INVALID_INVOCATION: u8 = 9;

// Help and version flags are off: every unrecognised `--token` must surface
// as an unknown option.

/// cs2pr - Annotate a Github Pull Request based on a Checkstyle XML-report
#[derive(Parser, Debug)]
#[command(
    name = "cs2pr",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
pub struct Cli {
    /// Don't exit with error codes if there are only warnings
    #[arg(long)]
    pub graceful_warnings: bool,

    /// Colorize the output (still compatible with Github Annotations)
    #[arg(long)]
    pub colorize: bool,

    /// Prefix every annotation message with the given text
    #[arg(long, value_name = "TEXT", require_equals = true)]
    pub prefix: Option<String>,
}

/// Where the report is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    /// Read the whole report. Invalid UTF-8 is replaced, not rejected.
    pub fn read(&self) -> io::Result<String> {
        let bytes = match self {
            Source::Stdin => {
                let mut bytes = Vec::new();
                io::stdin().lock().read_to_end(&mut bytes)?;
                bytes
            }
            Source::File(path) => std::fs::read(path)?,
        };
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Invalid command lines. Both print to stdout and exit with
/// [`EXIT_INVALID_INVOCATION`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    #[error("Unknown option {0}")]
    UnknownOption(String),

    #[error("{}", usage(.program))]
    Usage { program: String },
}

/// Usage text shown for a bad argument count or a missing file
pub fn usage(program: &str) -> String {
    format!(
        "cs2pr {version}\n\
Annotate a Github Pull Request based on a Checkstyle XML-report.\n\
Usage: {program} [OPTION]... <filename>\n\
\n\
Supported options:\n  \
--graceful-warnings   Don't exit with error codes if there are only warnings.\n  \
--colorize            Colorize the output (still compatible with Github Annotations)\n  \
--prefix=\"text\"       Prefix every annotation message with the given text.",
        version = env!("CARGO_PKG_VERSION"),
    )
}

/// A validated command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub options: Options,
    pub source: Source,
}

impl Invocation {
    /// Parse the full argument list, `argv[0]` included
    pub fn parse(args: &[OsString]) -> Result<Self, InvocationError> {
        let program = args
            .first()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| "cs2pr".to_string());

        // A bare `--` is an option with an empty name, not a separator
        if args.iter().skip(1).any(|arg| arg == "--") {
            return Err(InvocationError::UnknownOption(String::new()));
        }

        // Only `--` tokens are options; everything else is positional, even
        // when it starts with a single dash
        let (option_args, positionals): (Vec<&OsString>, Vec<&OsString>) = args
            .iter()
            .skip(1)
            .partition(|arg| arg.as_encoded_bytes().starts_with(b"--"));

        let clap_args = std::iter::once(OsString::from(program.as_str()))
            .chain(option_args.into_iter().cloned());
        let cli = Cli::try_parse_from(clap_args).map_err(|err| from_clap(&err, args, &program))?;

        let message_prefix = match cli.prefix.as_deref() {
            None => String::new(),
            Some(value) => Options::prefix_from_arg(value).ok_or_else(|| {
                InvocationError::UnknownOption(raw_option(args, "prefix"))
            })?,
        };
        let options = Options {
            colorize: cli.colorize,
            graceful_warnings: cli.graceful_warnings,
            message_prefix,
        };

        let source = match positionals.as_slice() {
            [] => Source::Stdin,
            [path] if Path::new(*path).exists() => Source::File(PathBuf::from(*path)),
            _ => return Err(InvocationError::Usage { program }),
        };

        Ok(Self {
            program,
            options,
            source,
        })
    }
}

/// Translate a clap failure; clap must never print or exit by itself
fn from_clap(err: &clap::Error, args: &[OsString], program: &str) -> InvocationError {
    match err.kind() {
        ErrorKind::UnknownArgument
        | ErrorKind::NoEquals
        | ErrorKind::InvalidValue
        | ErrorKind::ValueValidation
        | ErrorKind::TooManyValues => {
            let invalid = match err.get(ContextKind::InvalidArg) {
                Some(ContextValue::String(arg)) => arg.as_str(),
                _ => "",
            };
            match invalid.strip_prefix("--") {
                Some(long) => {
                    let name = long.split([' ', '=']).next().unwrap_or(long);
                    InvocationError::UnknownOption(raw_option(args, name))
                }
                None => InvocationError::UnknownOption(invalid.to_string()),
            }
        }
        kind => {
            debug!("Unhandled argument error ({:?}): {}", kind, err);
            InvocationError::Usage {
                program: program.to_string(),
            }
        }
    }
}

/// The raw `--name...` token as typed, without its leading dashes
fn raw_option(args: &[OsString], name: &str) -> String {
    args.iter()
        .skip(1)
        .map(|arg| arg.to_string_lossy())
        .filter_map(|arg| arg.strip_prefix("--").map(str::to_string))
        .find(|option| {
            option == name
                || option
                    .strip_prefix(name)
                    .is_some_and(|rest| rest.starts_with('='))
        })
        .unwrap_or_else(|| name.to_string())
}

/// Run cs2pr with process arguments and the real stdio handles
pub fn run(args: Vec<OsString>) -> Result<ExitCode> {
    let base_dir = match std::env::current_dir() {
        Ok(dir) => Some(dir),
        Err(e) => {
            warn!("Cannot determine working directory, paths stay absolute: {}", e);
            None
        }
    };

    let mut out = io::BufWriter::new(io::stdout().lock());
    let mut err = io::stderr().lock();
    let code = run_with(&args, base_dir.as_deref(), &mut out, &mut err)?;
    out.flush().context("Failed to flush stdout")?;

    Ok(ExitCode::from(code))
}

/// Parse → load → report, writing to the given streams. Returns the exit code.
pub fn run_with<W: Write, E: Write>(
    args: &[OsString],
    base_dir: Option<&Path>,
    out: &mut W,
    err: &mut E,
) -> Result<u8> {
    let invocation = match Invocation::parse(args) {
        Ok(invocation) => invocation,
        Err(e) => {
            writeln!(out, "{e}")?;
            return Ok(EXIT_INVALID_INVOCATION);
        }
    };
    debug!("Options: {:?}, source: {:?}", invocation.options, invocation.source);

    let xml = match invocation.source.read() {
        Ok(xml) => xml,
        Err(e) => match &invocation.source {
            Source::Stdin => return Err(e).context("Failed to read stdin"),
            // An existing but unreadable path (directory, permissions) counts
            // as an empty report
            Source::File(path) => {
                warn!("Failed to read {}: {}", path.display(), e);
                String::new()
            }
        },
    };

    let report = match parsers::load(&xml) {
        Ok(report) => report,
        Err(e) => {
            write!(err, "Error: {e}\n\n{xml}")?;
            err.flush()?;
            return Ok(EXIT_MALFORMED_INPUT);
        }
    };

    let outcome = reporters::report(&report, &invocation.options, base_dir, out)?;

    Ok(if outcome.is_failure() {
        EXIT_FINDINGS
    } else {
        EXIT_SUCCESS
    })
}
