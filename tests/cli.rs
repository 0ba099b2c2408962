use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn run(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_obsidian-pandoc-prep"))
        .args(args)
        .current_dir(cwd)
        .env_remove("TLDRAW_SEARCH_DIRS")
        .env_remove("RUST_LOG")
        .env("TLDRAW_CONVERTER_SCRIPT", cwd.join("no-such-converter.mjs"))
        .output()
        .expect("binary runs")
}

#[test]
fn test_sanitize_then_restore_math() {
    let temp_dir = TempDir::new().unwrap();
    let note = temp_dir.path().join("note.md");
    fs::write(&note, "text\n# Heading\n$$\n\\begin{align}\na\n\\end{align}\n$$\n").unwrap();

    let out = run(&["sanitize", "note.md"], temp_dir.path());
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "note.md sanitized and saved.");
    assert_eq!(
        fs::read_to_string(&note).unwrap(),
        "text\n\n# Heading\n\n\\begin{align}\na\n\\end{align}\n"
    );

    let out = run(&["restore-math", "note.md"], temp_dir.path());
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.trim(), "note.md math blocks restored with $$");
    assert_eq!(
        fs::read_to_string(&note).unwrap(),
        "text\n\n# Heading\n\n$$\n\\begin{align}\na\n\\end{align}\n$$\n"
    );
}

#[test]
fn test_normalization_usage_and_missing_file() {
    let temp_dir = TempDir::new().unwrap();

    let out = run(&["sanitize"], temp_dir.path());
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.starts_with("error:"));
    assert!(stderr.contains("Usage:"));

    let out = run(&["restore-math", "a.md", "b.md"], temp_dir.path());
    assert_eq!(out.status.code(), Some(1));

    let out = run(&["sanitize", "absent.md"], temp_dir.path());
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("File not found"));
}

#[test]
fn test_export_missing_note_fails() {
    let temp_dir = TempDir::new().unwrap();
    let out = run(&["export-tldraw", "absent.md"], temp_dir.path());
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_export_and_restore_embeds() {
    let temp_dir = TempDir::new().unwrap();
    let original = "Fig: ![[draw.tldr|My Drawing]]\nLost: ![[missing]]\n";
    let note = temp_dir.path().join("note.md");
    fs::write(&note, original).unwrap();
    fs::write(
        temp_dir.path().join("draw.tldr"),
        r#"{"records":[{"props":{"src":"data:image/png;base64,iVBORw0KGgo="}}]}"#,
    )
    .unwrap();

    let out = run(&["export-tldraw", "note.md"], temp_dir.path());
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Leaving embed unchanged"));

    let exported = fs::read_to_string(&note).unwrap();
    assert!(exported.starts_with("Fig: ![My Drawing](draw.png){data-tldraw-embed=\""));
    assert!(exported.contains("Lost: ![[missing]]"));
    assert_eq!(fs::read(temp_dir.path().join("draw.png")).unwrap().len(), 8);

    let out = run(&["restore-embeds", "note.md"], temp_dir.path());
    assert!(out.status.success());
    assert_eq!(fs::read_to_string(&note).unwrap(), original);
}
