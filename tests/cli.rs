//! Exit-code and output contracts of the two binaries.
//!
//! None of these need PDFium: every case fails before the engine is bound.

use std::path::Path;
use std::process::{Command, Output};

fn parser() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_docling-parser"));
    for var in [
        "DOCLING_PAGES",
        "DOCLING_SEPARATOR",
        "DOCLING_PASSWORD",
        "DOCLING_PDFIUM_LIB",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn setup_in(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_docling-setup"));
    cmd.current_dir(dir)
        .env_remove("DOCLING_MANIFEST")
        .env_remove("DOCLING_INSTALL_CMD")
        .env_remove("DOCLING_CHECK_CMD");
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ── docling-parser ───────────────────────────────────────────────────────────

#[test]
fn parser_without_arguments_prints_usage() {
    let output = parser().output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output).trim(), "Usage: docling-parser <pdf_path>");
}

#[test]
fn parser_with_extra_arguments_prints_usage() {
    let output = parser().args(["a.pdf", "b.pdf"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Usage: docling-parser <pdf_path>"));
}

#[test]
fn parser_missing_file_is_json_and_exit_zero() {
    let output = parser().arg("/no/such/input.pdf").output().unwrap();
    assert_eq!(output.status.code(), Some(0));

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"error": "File not found: /no/such/input.pdf"})
    );
}

#[test]
fn parser_output_is_indented_two_spaces() {
    let output = parser().arg("/no/such/input.pdf").output().unwrap();
    assert!(stdout(&output).starts_with("{\n  \"error\": "));
}

#[test]
fn parser_rejects_bad_page_selection() {
    let output = parser()
        .args(["--pages", "0", "/no/such/input.pdf"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Usage: docling-parser <pdf_path>"));
}

#[test]
fn parser_without_engine_exits_one() {
    let input = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(input.path(), b"%PDF-1.7\n").unwrap();

    let output = parser()
        .args(["--pdfium-lib", "/nonexistent/libpdfium.so"])
        .arg(input.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout(&output).trim(),
        "ERROR: PDFium not installed. Run: docling-setup"
    );
}

// ── docling-setup ────────────────────────────────────────────────────────────

#[test]
fn setup_without_manifest_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = setup_in(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("requirements.txt not found!"));
}

#[cfg(unix)]
#[test]
fn setup_with_commands_follows_their_exit_status() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("requirements.txt"), "docling\n").unwrap();

    let ok = setup_in(dir.path())
        .args(["--install-cmd", "true", "--check-cmd", "true"])
        .output()
        .unwrap();
    assert_eq!(ok.status.code(), Some(0));
    assert!(stdout(&ok).contains("- docling"));

    let install_fails = setup_in(dir.path())
        .args(["--install-cmd", "false", "--check-cmd", "true"])
        .output()
        .unwrap();
    assert_eq!(install_fails.status.code(), Some(1));

    let check_fails = setup_in(dir.path())
        .args(["--install-cmd", "true", "--check-cmd", "false"])
        .output()
        .unwrap();
    assert_eq!(check_fails.status.code(), Some(1));
}

#[cfg(unix)]
#[test]
fn setup_hands_unparsed_requirements_to_the_package_manager() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("requirements.txt"),
        "docling>=2.0,<3.0\n\
         mypkg @ https://example.com/mypkg-1.0-py3-none-any.whl\n\
         git+https://github.com/org/repo.git@v1#egg=repo\n",
    )
    .unwrap();

    let output = setup_in(dir.path())
        .args(["--install-cmd", "test -f", "--check-cmd", "true"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("- mypkg @ https://example.com/mypkg-1.0-py3-none-any.whl"));
}

#[cfg(unix)]
#[test]
fn setup_check_command_keeps_quoted_arguments() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("requirements.txt"), "docling\n").unwrap();

    let output = setup_in(dir.path())
        .args(["--install-cmd", "true", "--check-cmd", "sh -c 'exit 0'"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn setup_rejects_empty_commands() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("requirements.txt"), "docling\n").unwrap();

    for flag in ["--install-cmd", "--check-cmd"] {
        let output = setup_in(dir.path()).args([flag, "  "]).output().unwrap();
        assert_eq!(output.status.code(), Some(1), "{flag}");
        assert!(String::from_utf8_lossy(&output.stderr).contains("is empty"), "{flag}");
    }
}
