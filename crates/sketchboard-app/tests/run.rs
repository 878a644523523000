//! Whole-session runs against a temporary storage directory.

use clap::Parser;
use sketchboard_app::{AppError, Cli, run};
use sketchboard_core::storage::{FileStorage, Storage};
use std::path::Path;

const DRAW_RECTANGLE: &str = r##"[
    {"command": "tool", "tool": "rectangle"},
    {"command": "fill_color", "code": "#a5d8ff"},
    {"type": "pointer_down", "position": {"x": 50, "y": 50}},
    {"type": "pointer_move", "position": {"x": 100, "y": 80}},
    {"type": "pointer_up", "position": {"x": 150, "y": 120}}
]"##;

fn cli(dir: &Path, extra: &[&str]) -> Cli {
    let storage = dir.join("drawings");
    let mut args = vec![
        "sketchboard".to_string(),
        "--storage-dir".to_string(),
        storage.display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn replay_saves_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.json");
    std::fs::write(&script, DRAW_RECTANGLE).unwrap();
    let svg = dir.path().join("out.svg");

    let summary = run(&cli(
        dir.path(),
        &[
            script.to_str().unwrap(),
            "--drawing",
            "board",
            "--svg",
            svg.to_str().unwrap(),
        ],
    ))
    .unwrap();

    assert_eq!(summary.shapes, 1);
    assert_eq!(summary.replay.events, 3);
    assert_eq!(summary.replay.commands, 2);
    assert!(summary.saved);

    let storage = FileStorage::new(dir.path().join("drawings")).unwrap();
    let drawing = pollster::block_on(storage.load("board")).unwrap();
    assert_eq!(drawing.shapes.len(), 1);

    let doc = std::fs::read_to_string(&svg).unwrap();
    assert!(doc.starts_with("<svg"));
    assert!(doc.contains("<path"));
    assert!(doc.contains("#a5d8ff"));
}

#[test]
fn second_run_continues_saved_drawing() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.json");
    std::fs::write(&script, DRAW_RECTANGLE).unwrap();
    let script = script.to_str().unwrap();

    run(&cli(dir.path(), &[script])).unwrap();
    let summary = run(&cli(dir.path(), &[script])).unwrap();
    assert_eq!(summary.shapes, 2);
}

#[test]
fn no_save_leaves_storage_empty() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.json");
    std::fs::write(&script, DRAW_RECTANGLE).unwrap();

    let summary = run(&cli(dir.path(), &[script.to_str().unwrap(), "--no-save"])).unwrap();
    assert!(!summary.saved);

    let storage = FileStorage::new(dir.path().join("drawings")).unwrap();
    assert!(pollster::block_on(storage.list()).unwrap().is_empty());
}

#[test]
fn malformed_script_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.json");
    std::fs::write(&script, "[{\"type\": ").unwrap();

    let err = run(&cli(dir.path(), &[script.to_str().unwrap()])).unwrap_err();
    assert!(matches!(err, AppError::Parse(_)));
}

#[test]
fn missing_script_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    let err = run(&cli(dir.path(), &[missing.to_str().unwrap()])).unwrap_err();
    assert!(matches!(err, AppError::Io(_)));
}
