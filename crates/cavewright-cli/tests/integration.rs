use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn cavewright() -> Command {
    Command::cargo_bin("cavewright").unwrap()
}

fn write_doc(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path
}

const WELL_FORMED: &str = r#"<Actions>
  <ObjectChange name="Table">
    <Transition duration="2">
      <Visible>true</Visible>
      <Color>10,20,30</Color>
    </Transition>
  </ObjectChange>
  <SoundRef name="chime" action="Stop"/>
  <TimerChange name="intro"><start/></TimerChange>
  <Restart/>
</Actions>
"#;

// ---------------------------------------------------------------------------
// cavewright validate
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_well_formed_document() {
    let dir = TempDir::new().unwrap();
    let doc = write_doc(&dir, "actions.xml", WELL_FORMED);

    cavewright()
        .args(["validate", doc.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("ObjectChange"))
        .stdout(predicate::str::contains("Restart"));
}

#[test]
fn validate_rejects_unknown_action_tag() {
    let dir = TempDir::new().unwrap();
    let doc = write_doc(&dir, "actions.xml", "<Actions><Bogus/></Actions>");

    cavewright()
        .args(["validate", doc.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Bogus"));
}

#[test]
fn validate_reports_missing_required_attribute() {
    let dir = TempDir::new().unwrap();
    let doc = write_doc(
        &dir,
        "actions.xml",
        r#"<Actions><Event enable="true"/></Actions>"#,
    );

    cavewright()
        .args(["validate", doc.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("name"));
}

#[test]
fn validate_json_reports_errors() {
    let dir = TempDir::new().unwrap();
    let doc = write_doc(
        &dir,
        "actions.xml",
        r#"<Actions><Restart/><Bogus/></Actions>"#,
    );

    cavewright()
        .args(["validate", doc.to_str().unwrap(), "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"actions\": 1"))
        .stdout(predicate::str::contains("\"tag\": \"Bogus\""));
}

#[test]
fn validate_fails_on_empty_document() {
    let dir = TempDir::new().unwrap();
    let doc = write_doc(&dir, "actions.xml", "<Actions></Actions>");

    cavewright()
        .args(["validate", doc.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no action nodes"));
}

#[test]
fn validate_missing_file_fails() {
    cavewright()
        .args(["validate", "/no/such/file.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

// ---------------------------------------------------------------------------
// cavewright format
// ---------------------------------------------------------------------------

fn format_to_string(doc: &Path) -> String {
    let output = cavewright()
        .args(["format", doc.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn format_normalizes_tuple_text() {
    let dir = TempDir::new().unwrap();
    let doc = write_doc(
        &dir,
        "actions.xml",
        r#"<Actions><MoveCave><Absolute/><Placement><Position>(1.0, 2.0, 3.0)</Position></Placement></MoveCave></Actions>"#,
    );

    let formatted = format_to_string(&doc);
    assert!(formatted.contains("1,2,3"));
    assert!(!formatted.contains("(1.0"));
}

#[test]
fn format_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let doc = write_doc(&dir, "actions.xml", WELL_FORMED);

    let once = format_to_string(&doc);
    let again_doc = write_doc(&dir, "formatted.xml", &once);
    let twice = format_to_string(&again_doc);
    assert_eq!(once, twice);
}

#[test]
fn format_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let doc = write_doc(&dir, "actions.xml", WELL_FORMED);
    let out = dir.path().join("out.xml");

    cavewright()
        .args([
            "format",
            doc.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ])
        .assert()
        .success();

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("ObjectChange"));
}

#[test]
fn format_rejects_invalid_document() {
    let dir = TempDir::new().unwrap();
    let doc = write_doc(
        &dir,
        "actions.xml",
        r#"<Actions><ObjectChange name="Table"/></Actions>"#,
    );

    cavewright()
        .args(["format", doc.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Transition"));
}

// ---------------------------------------------------------------------------
// cavewright schema
// ---------------------------------------------------------------------------

#[test]
fn schema_lists_every_action_tag() {
    let output = cavewright()
        .arg("schema")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    for tag in [
        "ObjectChange",
        "GroupRef",
        "TimerChange",
        "SoundRef",
        "Event",
        "MoveCave",
        "Restart",
    ] {
        assert!(text.contains(tag), "schema output missing {tag}");
    }
}

#[test]
fn schema_for_one_tag_shows_its_attributes() {
    cavewright()
        .args(["schema", "ObjectChange"])
        .assert()
        .success()
        .stdout(predicate::str::contains("object_name"))
        .stdout(predicate::str::contains("required"))
        .stdout(predicate::str::contains("Play Sound"))
        .stdout(predicate::str::contains("ObjectChange").and(predicate::str::contains("GroupRef").not()));
}

#[test]
fn schema_unknown_tag_fails() {
    cavewright()
        .args(["schema", "Bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown action tag"));
}

#[test]
fn schema_json_carries_field_table() {
    cavewright()
        .args(["schema", "SoundRef", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"required\": true"))
        .stdout(predicate::str::contains("\"default\": \"Start\""));
}
