//! Integration tests for the marquee CLI
//!
//! These tests exercise the full CLI workflow against temporary site
//! directories. They verify that commands work end-to-end without mocking.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Helper to run marquee in a specific working directory
fn run_marquee(args: &[&str], dir: &Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_marquee"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to execute marquee")
}

/// Helper to get stdout as string
fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Helper to get stderr as string
fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

// =============================================================================
// Basic Command Tests
// =============================================================================

#[test]
fn test_help_command() {
    let tmp = TempDir::new().unwrap();
    let output = run_marquee(&["--help"], tmp.path());

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("marquee"));
    assert!(out.contains("quickstart"));
    assert!(out.contains("releases"));
}

#[test]
fn test_version_command() {
    let tmp = TempDir::new().unwrap();
    let output = run_marquee(&["--version"], tmp.path());

    assert!(output.status.success());
    assert!(stdout(&output).contains("marquee"));
}

// =============================================================================
// Shell Completion Tests
// =============================================================================

#[test]
fn test_completion_zsh() {
    let tmp = TempDir::new().unwrap();
    let output = run_marquee(&["completion", "zsh"], tmp.path());

    assert!(
        output.status.success(),
        "completion zsh failed: {}",
        stderr(&output)
    );
    assert!(
        stdout(&output).contains("#compdef marquee"),
        "zsh completion should contain #compdef"
    );
}

#[test]
fn test_completion_bash() {
    let tmp = TempDir::new().unwrap();
    let output = run_marquee(&["completion", "bash"], tmp.path());

    assert!(output.status.success());
    assert!(stdout(&output).contains("marquee"));
}

// =============================================================================
// Quickstart Tests
// =============================================================================

#[test]
fn test_quickstart_default_state() {
    let tmp = TempDir::new().unwrap();
    let output = run_marquee(&["quickstart"], tmp.path());

    assert!(output.status.success());
    // Empty project name renders quoted; no tokens follow.
    assert_eq!(stdout(&output).trim_end(), "quickstart \"\"");
}

#[test]
fn test_quickstart_full_selection() {
    let tmp = TempDir::new().unwrap();
    let output = run_marquee(
        &[
            "quickstart",
            "--project",
            "Euro",
            "--assets",
            "--patch",
            "--textures",
            "--maps",
            "--scm",
            "git",
            "--run",
        ],
        tmp.path(),
    );

    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim_end(),
        "quickstart Euro assets patch textures maps git run"
    );
}

#[test]
fn test_quickstart_name_with_space_is_quoted() {
    let tmp = TempDir::new().unwrap();
    let output = run_marquee(&["quickstart", "--project", "My Game"], tmp.path());

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "quickstart \"My Game\"");
}

#[test]
fn test_quickstart_token_order_is_fixed() {
    let tmp = TempDir::new().unwrap();
    // Flags given maps-first; output order must follow the page's field
    // order, assets before maps.
    let output = run_marquee(
        &["quickstart", "--project", "X", "--maps", "--assets"],
        tmp.path(),
    );

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "quickstart X assets maps");
}

#[test]
fn test_quickstart_sections_listing() {
    let tmp = TempDir::new().unwrap();
    let output = run_marquee(
        &["quickstart", "--project", "X", "--maps", "--sections"],
        tmp.path(),
    );

    assert!(output.status.success());
    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "quickstart X maps");
    assert!(lines[1..].contains(&"section-all"));
    assert!(lines[1..].contains(&"section-maps"));
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_quickstart_no_selection_reveals_no_sections() {
    let tmp = TempDir::new().unwrap();
    let output = run_marquee(
        &["quickstart", "--project", "X", "--sections"],
        tmp.path(),
    );

    assert!(output.status.success());
    let out = stdout(&output);
    assert_eq!(out.lines().count(), 1);
    assert!(!out.contains("section-"));
}

#[test]
fn test_quickstart_program_from_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("marquee.toml"),
        "[quickstart]\nprogram = \"mytool new\"\n",
    )
    .unwrap();

    let output = run_marquee(&["quickstart", "--project", "Demo"], tmp.path());
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "mytool new Demo");
}

// =============================================================================
// Build Tests
// =============================================================================

#[test]
fn test_build_expands_site() {
    let tmp = TempDir::new().unwrap();
    let site = tmp.path().join("site");
    fs::create_dir_all(&site).unwrap();
    fs::write(
        site.join("index.html"),
        "<html><body><div include-html=\"nav.html\"></div></body></html>",
    )
    .unwrap();
    fs::write(site.join("nav.html"), "<nav>links</nav>").unwrap();
    fs::write(site.join("style.css"), "body {}").unwrap();

    let output = run_marquee(&["build", "--out", "dist"], tmp.path());
    assert!(output.status.success(), "build failed: {}", stderr(&output));

    let index = fs::read_to_string(tmp.path().join("dist/index.html")).unwrap();
    assert!(index.contains("<nav>links</nav>"));
    assert!(!index.contains("include-html"));
    assert!(tmp.path().join("dist/style.css").exists());

    let err = stderr(&output);
    assert!(err.contains("2 page(s)"), "unexpected stderr: {}", err);
    assert!(err.contains("1 file(s)"));
}

#[test]
fn test_build_missing_placeholder_gets_fallback_text() {
    let tmp = TempDir::new().unwrap();
    let site = tmp.path().join("site");
    fs::create_dir_all(&site).unwrap();
    fs::write(
        site.join("index.html"),
        "<div include-html=\"missing.html\"></div>",
    )
    .unwrap();

    let output = run_marquee(&["build", "--out", "dist"], tmp.path());
    assert!(output.status.success());

    let index = fs::read_to_string(tmp.path().join("dist/index.html")).unwrap();
    assert_eq!(index, "<div>Page not found.</div>");
}

#[test]
fn test_build_without_site_dir_fails() {
    let tmp = TempDir::new().unwrap();
    let output = run_marquee(&["build"], tmp.path());

    assert!(!output.status.success());
    assert!(stderr(&output).contains("does not exist"));
}

// =============================================================================
// Releases Tests
// =============================================================================

#[test]
fn test_releases_without_repo_fails_with_hint() {
    let tmp = TempDir::new().unwrap();
    let output = run_marquee(&["releases"], tmp.path());

    assert!(!output.status.success());
    assert!(stderr(&output).contains("No repository given"));
}

// Note: fetching releases requires the gh CLI and network access; those
// paths are covered by manual testing.
