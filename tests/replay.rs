//! Script replay tests for the command-line driver

mod common;

use std::fs;

use common::test_editor;
use tempfile::TempDir;
use vartext::cli::{load_script, replay};
use vartext::editable::{EditMsg, Key};

#[test]
fn test_replay_yaml_script() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("steps.yaml");
    fs::write(
        &path,
        "- focus\n- insert_text: \"Hi @fir\"\n- key: enter\n- insert_text: \"!\"\n",
    )
    .unwrap();

    let script = load_script(&path).unwrap();
    assert_eq!(script.len(), 4);

    let mut editor = test_editor("");
    let report = replay(&mut editor, script);
    assert_eq!(
        report.changes,
        vec![
            "Hi @fir".to_string(),
            "Hi {{first_name}} ".to_string(),
            "Hi {{first_name}} !".to_string(),
        ]
    );
    assert_eq!(report.value, "Hi {{first_name}} !");
    assert_eq!(report.cursor, 19);
    assert_eq!(report.mention, None);
}

#[test]
fn test_replay_json_script_reports_open_mention() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("steps.json");
    fs::write(&path, r#"[{"insert_text": "@na"}, "mention_next"]"#).unwrap();

    let mut editor = test_editor("");
    let report = replay(&mut editor, load_script(&path).unwrap());
    assert_eq!(report.mention.as_deref(), Some("na"));
    assert_eq!(report.candidates, vec!["first_name", "last_name"]);
}

#[test]
fn test_replay_without_edits_reports_no_changes() {
    let mut editor = test_editor("Hi {{email}}");
    let report = replay(
        &mut editor,
        vec![EditMsg::Key(Key::Home), EditMsg::Key(Key::Right)],
    );
    assert!(report.changes.is_empty());
    assert_eq!(report.cursor, 1);
}

#[test]
fn test_load_script_rejects_unknown_message() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("steps.yaml");
    fs::write(&path, "- teleport\n").unwrap();
    assert!(load_script(&path).is_err());
}
