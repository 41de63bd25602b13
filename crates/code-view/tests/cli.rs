use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run(args: &[&str], stdin: Option<&str>) -> Output {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("code-view.json");
    let mut child = Command::new(env!("CARGO_BIN_EXE_code-view"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    {
        let mut pipe = child.stdin.take().unwrap();
        pipe.write_all(stdin.unwrap_or("").as_bytes()).unwrap();
    }
    let output = child.wait_with_output().unwrap();
    assert!(config.exists(), "default config should be created");
    output
}

fn stdout(output: &Output) -> String {
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_text_output_with_range() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("query.sql");
    std::fs::write(&file, "SELECT 1;\nSELECT 2;\r\nSELECT 3;\n").unwrap();

    let output = run(
        &[file.to_str().unwrap(), "--format", "text", "--range", "#L1-L2"],
        None,
    );
    assert_eq!(
        stdout(&output),
        " 0 | SELECT 1;\n>1 | SELECT 2;\n>2 | SELECT 3;\n"
    );
}

#[test]
fn test_click_reports_descriptor() {
    let output = run(&["--format", "text", "--click", "0"], Some("a\nb"));
    assert_eq!(stdout(&output), ">0 | a\n 1 | b\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("range: #L0"));
}

#[test]
fn test_click_extend_keeps_anchor() {
    let output = run(
        &["-", "--format", "text", "--range", "#L1", "--click", "2", "--extend"],
        Some("a\nb\nc\nd"),
    );
    assert_eq!(stdout(&output), " 0 | a\n>1 | b\n>2 | c\n 3 | d\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("range: #L1-L2"));
}

#[test]
fn test_html_output_has_anchors() {
    let output = run(&["--language", "sql"], Some("SELECT 1\nSELECT 2"));
    let html = stdout(&output);
    assert!(html.contains("id=\"L0\""));
    assert!(html.contains("id=\"L1\""));
    assert!(html.contains("hl-sql"));
}

#[test]
fn test_json_output_without_highlighting() {
    let output = run(&["--format", "json", "--no-highlight"], Some("x\ny\n"));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let lines = value.as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["content"][0]["value"], "x\n");
    assert_eq!(lines[1]["highlighted"], false);
}

#[test]
fn test_malformed_range_highlights_nothing() {
    let output = run(&["--format", "text", "--range", "#L0-L1-L2"], Some("a\nb"));
    assert_eq!(stdout(&output), " 0 | a\n 1 | b\n");
}

#[test]
fn test_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&[dir.path().join("nope.sql").to_str().unwrap()], None);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read file"));
}

#[test]
fn test_html_output_detects_sql_without_hint() {
    let output = run(&[], Some("SELECT 1\nSELECT 2"));
    assert!(stdout(&output).contains("hl-sql"));
}
