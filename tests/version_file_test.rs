// tests/version_file_test.rs
use chrono::NaiveDate;
use release_pack::domain::PatchMode;
use release_pack::editor::VersionFileEditor;
use release_pack::ReleaseError;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn editor_on(year: i32, month: u32, day: u32) -> VersionFileEditor {
    VersionFileEditor::new("SELF_VERSION", "SELF_DATE")
        .unwrap()
        .with_today(NaiveDate::from_ymd_opt(year, month, day).unwrap())
}

fn version_file(content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("version.nut");
    fs::write(&path, content).unwrap();
    (dir, path)
}

const INFO_NUT: &str = "/* header */\nclass Info extends AIInfo {\n\tfunction GetVersion() { return SELF_VERSION; }\n\tfunction GetDate() { return SELF_DATE; }\n}\nSELF_VERSION <- 7;\nSELF_DATE <- \"2019-11-30\";\n  trailing   spaces   \n";

#[test]
fn test_end_to_end_refresh_then_increment() {
    let (_dir, path) = version_file("SELF_VERSION <- 42;\nSELF_DATE <- \"2020-01-01\";\n");
    let editor = editor_on(2024, 3, 7);

    let record = editor.load_and_patch(&path, PatchMode::RefreshDate).unwrap();
    assert_eq!(record.version, Some(42));
    assert_eq!(record.version_line, Some(1));
    assert_eq!(record.date_line, Some(2));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "SELF_VERSION <- 42;\nSELF_DATE <- \"2024-03-07\";\n\n"
    );

    let record = editor
        .load_and_patch(&path, PatchMode::IncrementVersion)
        .unwrap();
    assert_eq!(record.version, Some(42));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "SELF_VERSION <- 43;\nSELF_DATE <- \"2024-03-07\";\n\n"
    );
}

#[test]
fn test_missing_version_leaves_file_untouched() {
    let original = "SELF_DATE <- \"2020-01-01\";\n";
    let (_dir, path) = version_file(original);

    let err = editor_on(2024, 3, 7)
        .load_and_patch(&path, PatchMode::RefreshDate)
        .unwrap_err();

    assert!(matches!(err, ReleaseError::VersionNotFound { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_refresh_keeps_every_other_line() {
    let (_dir, path) = version_file(INFO_NUT);
    editor_on(2030, 12, 1)
        .load_and_patch(&path, PatchMode::RefreshDate)
        .unwrap();

    let after = fs::read_to_string(&path).unwrap();
    let before: Vec<&str> = INFO_NUT.lines().collect();
    let lines: Vec<&str> = after.lines().collect();
    assert_eq!(lines.len(), before.len() + 1);
    for (i, (old, new)) in before.iter().zip(&lines).enumerate() {
        if i == 6 {
            assert_eq!(*new, "SELF_DATE <- \"2030-12-01\";");
        } else {
            assert_eq!(old, new, "line {} changed", i + 1);
        }
    }
    assert_eq!(lines.last(), Some(&""));
}

#[test]
fn test_increment_keeps_every_other_line() {
    let (_dir, path) = version_file(INFO_NUT);
    editor_on(2030, 12, 1)
        .load_and_patch(&path, PatchMode::IncrementVersion)
        .unwrap();

    let after = fs::read_to_string(&path).unwrap();
    let expected = INFO_NUT.replace("SELF_VERSION <- 7;", "SELF_VERSION <- 8;") + "\n";
    assert_eq!(after, expected);
}

#[test]
fn test_repeated_passes_keep_single_trailer_and_passthrough() {
    let (_dir, path) = version_file(INFO_NUT);
    let editor = editor_on(2024, 3, 7);

    for _ in 0..3 {
        editor.load_and_patch(&path, PatchMode::RefreshDate).unwrap();
        editor
            .load_and_patch(&path, PatchMode::IncrementVersion)
            .unwrap();
    }

    let after = fs::read_to_string(&path).unwrap();
    assert!(after.ends_with("spaces   \n\n"));
    assert!(!after.ends_with("\n\n\n"));
    assert!(after.contains("SELF_VERSION <- 10;"));
    assert!(after.contains("SELF_DATE <- \"2024-03-07\";"));
    assert!(after.starts_with("/* header */\nclass Info extends AIInfo {\n"));
    assert!(after.contains("\tfunction GetVersion() { return SELF_VERSION; }\n"));
}

#[test]
fn test_preview_does_not_write() {
    let (_dir, path) = version_file(INFO_NUT);
    let patched = editor_on(2024, 3, 7)
        .preview(&path, PatchMode::RefreshDate)
        .unwrap();
    assert!(patched.content.contains("2024-03-07"));
    assert_eq!(fs::read_to_string(&path).unwrap(), INFO_NUT);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = editor_on(2024, 3, 7)
        .load_and_patch(&dir.path().join("absent.nut"), PatchMode::RefreshDate)
        .unwrap_err();
    assert!(matches!(err, ReleaseError::Io(_)));
}
