//! CLI contract tests
//!
//! Runs the cs2pr binary against reports on stdin or on disk and checks
//! stdout, stderr and the exit code.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

fn cs2pr_bin() -> String {
    env!("CARGO_BIN_EXE_cs2pr").to_string()
}

/// Run cs2pr in `cwd`, feeding `stdin`. Returns (exit code, stdout, stderr).
fn run(cwd: &Path, args: &[&str], stdin: &str) -> (i32, String, String) {
    let mut child = Command::new(cs2pr_bin())
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to run cs2pr");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

/// Temp dir resolved the way the child's getcwd() will report it
fn workdir() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let canonical = dir.path().canonicalize().unwrap();
    let path = canonical.to_str().unwrap().to_string();
    (dir, path)
}

fn report(findings: &[(&str, &str, &str, &str)]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<checkstyle>\n");
    for (file, line, severity, message) in findings {
        xml.push_str(&format!(
            "  <file name=\"{file}\">\n    <error line=\"{line}\" severity=\"{severity}\" message=\"{message}\"/>\n  </file>\n"
        ));
    }
    xml.push_str("</checkstyle>\n");
    xml
}

// ============================================================================
// Annotations
// ============================================================================

#[test]
fn test_error_from_stdin_is_relativized() {
    let (dir, cwd) = workdir();
    let xml = report(&[(format!("{cwd}/src/a.php").as_str(), "3", "error", "Bad thing")]);
    let (code, stdout, stderr) = run(dir.path(), &[], &xml);
    assert_eq!(code, 1);
    assert_eq!(stdout, "::error file=src/a.php,line=3::Bad thing\n");
    assert!(stderr.is_empty(), "unexpected stderr: {stderr}");
}

#[test]
fn test_report_from_file() {
    let (dir, cwd) = workdir();
    let path = dir.path().join("checkstyle.xml");
    std::fs::write(
        &path,
        report(&[
            (format!("{cwd}/a.php").as_str(), "1", "warning", "first"),
            ("lib/b.php", "2", "info", "second"),
        ]),
    )
    .unwrap();

    let (code, stdout, _) = run(dir.path(), &["checkstyle.xml"], "");
    assert_eq!(code, 1);
    assert_eq!(
        stdout,
        "::warning file=a.php,line=1::first\n::notice file=lib/b.php,line=2::second\n"
    );
}

#[test]
fn test_empty_report_exits_zero() {
    let (dir, _) = workdir();
    let (code, stdout, _) = run(dir.path(), &[], "<?xml version=\"1.0\"?>\n<checkstyle/>\n");
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
}

#[test]
fn test_graceful_warnings() {
    let (dir, _) = workdir();
    let xml = report(&[
        ("a.php", "1", "warning", "w"),
        ("a.php", "2", "notice", "n"),
        ("a.php", "3", "", "unknown severity"),
    ]);
    assert_eq!(run(dir.path(), &[], &xml).0, 1);
    assert_eq!(run(dir.path(), &["--graceful-warnings"], &xml).0, 0);

    let with_error = report(&[
        ("a.php", "1", "warning", "w"),
        ("a.php", "2", "failure", "f"),
    ]);
    assert_eq!(run(dir.path(), &["--graceful-warnings"], &with_error).0, 1);
}

#[test]
fn test_prefix_and_multiline_message() {
    let (dir, _) = workdir();
    let xml = report(&[("a.php", "4", "error", "line one&#10;line two")]);
    let (_, stdout, _) = run(dir.path(), &["--prefix=\"[phpstan]\""], &xml);
    assert_eq!(stdout, "::error file=a.php,line=4::[phpstan] line one%0Aline two\n");
}

#[test]
fn test_colorize() {
    let (dir, _) = workdir();
    let xml = report(&[("a.php", "1", "error", "e"), ("b.php", "2", "warning", "w")]);
    let (_, stdout, _) = run(dir.path(), &["--colorize"], &xml);
    assert_eq!(
        stdout,
        "\x1b[91m\n::error file=a.php,line=1::e\n\x1b[0m\x1b[93m\n::warning file=b.php,line=2::w\n\x1b[0m"
    );
}

#[test]
fn test_dash_prefixed_file_is_read() {
    let (dir, _) = workdir();
    std::fs::write(
        dir.path().join("-report.xml"),
        report(&[("a.php", "5", "error", "dash")]),
    )
    .unwrap();
    let (code, stdout, _) = run(dir.path(), &["-report.xml"], "");
    assert_eq!(code, 1);
    assert_eq!(stdout, "::error file=a.php,line=5::dash\n");
}

// ============================================================================
// Malformed input
// ============================================================================

#[test]
fn test_truncated_xml() {
    let (dir, _) = workdir();
    let (code, stdout, stderr) = run(dir.path(), &[], "<checkstyle><file");
    assert_eq!(code, 2);
    assert!(stdout.is_empty());
    assert!(stderr.starts_with("Error: "), "stderr: {stderr}");
    assert!(stderr.contains(" on line 1, column "));
    assert!(stderr.ends_with("\n\n<checkstyle><file"));
}

#[test]
fn test_empty_input() {
    let (dir, _) = workdir();
    let (code, _, stderr) = run(dir.path(), &[], "");
    assert_eq!(code, 2);
    assert_eq!(
        stderr,
        "Error: Expecting xml stream starting with a xml opening tag.\n\n"
    );
}

#[test]
fn test_plain_text_input() {
    let (dir, _) = workdir();
    let (code, _, stderr) = run(dir.path(), &[], "Fatal error: out of memory\n");
    assert_eq!(code, 2);
    assert!(stderr.starts_with("Error: Start tag expected, '<' not found on line 1, column 1\n\n"));
    assert!(stderr.ends_with("Fatal error: out of memory\n"));
}

#[test]
fn test_unreadable_path_is_empty_report() {
    let (dir, _) = workdir();
    std::fs::create_dir(dir.path().join("reports")).unwrap();
    let (code, stdout, stderr) = run(dir.path(), &["reports"], "");
    assert_eq!(code, 2);
    assert!(stdout.is_empty());
    assert_eq!(
        stderr,
        "Error: Expecting xml stream starting with a xml opening tag.\n\n"
    );
}

// ============================================================================
// Invocation errors
// ============================================================================

#[test]
fn test_unknown_option() {
    let (dir, _) = workdir();
    let (code, stdout, _) = run(dir.path(), &["--bogus"], "");
    assert_eq!(code, 9);
    assert_eq!(stdout, "Unknown option bogus\n");
}

#[test]
fn test_single_dash_token_prints_usage() {
    let (dir, _) = workdir();
    let (code, stdout, _) = run(dir.path(), &["-x"], "");
    assert_eq!(code, 9);
    assert!(stdout.starts_with("cs2pr "));
    assert!(!stdout.contains("Unknown option"));
}

#[test]
fn test_missing_file_prints_usage() {
    let (dir, _) = workdir();
    let (code, stdout, _) = run(dir.path(), &["missing.xml"], "");
    assert_eq!(code, 9);
    assert!(stdout.starts_with("cs2pr "));
    assert!(stdout.contains("[OPTION]... <filename>"));
}

#[test]
fn test_too_many_arguments_prints_usage() {
    let (dir, _) = workdir();
    std::fs::write(dir.path().join("a.xml"), "<checkstyle/>").unwrap();
    std::fs::write(dir.path().join("b.xml"), "<checkstyle/>").unwrap();
    let (code, stdout, _) = run(dir.path(), &["a.xml", "b.xml"], "");
    assert_eq!(code, 9);
    assert!(stdout.contains("Supported options:"));
}
