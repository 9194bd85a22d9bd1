use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[allow(deprecated)]
fn repolens() -> Command {
    let mut cmd = Command::cargo_bin("repolens").expect("binary");
    cmd.env_remove("RUST_LOG")
        .env_remove("REPOLENS_MAX_FILES")
        .env_remove("REPOLENS_TIMEOUT_MS");
    cmd
}

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

fn setup_landing() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write(
        root,
        "package.json",
        r#"{"name":"launchpad","dependencies":{"next":"^13.5.0","react":"18.2.0"}}"#,
    );
    write(
        root,
        "pages/index.tsx",
        r#"import Hero from "../components/Hero";
export default function Home() { return <Hero />; }"#,
    );
    write(
        root,
        "components/Hero.tsx",
        r#"export default function Hero() { return <section><h1>Ship faster</h1><a href="/signup">Get started</a></section>; }"#,
    );
    temp
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("valid json on stdout")
}

#[test]
fn analyze_prints_public_projection_by_default() {
    let temp = setup_landing();
    let output = repolens()
        .arg("--quiet")
        .arg("analyze")
        .arg(temp.path())
        .arg("--repo-name")
        .arg("demo")
        .output()
        .expect("command run");
    assert!(output.status.success());

    let body = stdout_json(&output);
    assert_eq!(body["project"]["name"], "demo");
    assert_eq!(body["project"]["intent"], "PRESENT");
    assert_eq!(body["source"]["method"], "static-analysis");
    for internal in ["engine", "risk_flags", "blueprint"] {
        assert!(body.get(internal).is_none(), "{internal} leaked");
    }
    assert!(body["project"].get("blueprint").is_none());
}

#[test]
fn canonical_format_keeps_internal_fields() {
    let temp = setup_landing();
    let output = repolens()
        .args(["--quiet", "analyze", "--format", "canonical"])
        .arg(temp.path())
        .output()
        .expect("command run");
    assert!(output.status.success());

    let body = stdout_json(&output);
    assert_eq!(body["engine"]["name"], "repolens");
    assert_eq!(body["project"]["blueprint"], "LandingCROBlueprint");
    assert!(body["risk_flags"].is_array());
}

#[test]
fn report_format_carries_diagnostics() {
    let temp = setup_landing();
    let output = repolens()
        .args(["--quiet", "analyze", "--format", "report"])
        .arg(temp.path())
        .output()
        .expect("command run");
    assert!(output.status.success());

    let body = stdout_json(&output);
    assert!(body["canonical"].is_object());
    assert_eq!(
        body["diagnostics"]["fingerprint"].as_str().map(str::len),
        Some(64)
    );
}

#[test]
fn markdown_format_starts_with_project_heading() {
    let temp = setup_landing();
    repolens()
        .args(["--quiet", "analyze", "--format", "markdown", "--repo-name", "demo"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# demo\n"))
        .stdout(predicate::str::contains("## Excluded Concepts"));
}

#[test]
fn normalized_input_is_read_from_stdin() {
    let input = r#"{
        "files": ["package.json", "posts/hello.md", "posts/second.md", "pages/posts/[slug].tsx"],
        "fileMap": {"package.json": "{\"name\":\"notes\",\"dependencies\":{\"next\":\"14.0.0\"}}"}
    }"#;
    let output = repolens()
        .args(["--quiet", "analyze", "--normalized", "-", "--format", "prompt"])
        .write_stdin(input)
        .output()
        .expect("command run");
    assert!(output.status.success());

    let prompt = String::from_utf8(output.stdout).unwrap();
    assert!(prompt.starts_with("You are describing a software project"));
    assert!(prompt.contains("\"name\": \"notes\""));
}

#[test]
fn empty_directory_fails_with_error_on_stderr() {
    let temp = tempdir().unwrap();
    repolens()
        .arg("analyze")
        .arg(temp.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Project contains no files"));
}

#[test]
fn config_file_limits_are_overridden_by_flags() {
    let temp = setup_landing();
    write(temp.path(), "repolens.toml", "[ingest]\nmax_files = 1\n");

    repolens()
        .arg("analyze")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("more than 1 files"));

    repolens()
        .args(["--quiet", "analyze", "--max-files", "50"])
        .arg(temp.path())
        .assert()
        .success();
}

#[test]
fn invalid_config_is_reported() {
    let temp = setup_landing();
    let config = temp.path().join("custom.toml");
    fs::write(&config, "[ingest]\nmax_filez = 3\n").unwrap();

    repolens()
        .arg("analyze")
        .arg(temp.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn schema_command_prints_public_schema() {
    let output = repolens()
        .args(["schema", "--public"])
        .output()
        .expect("command run");
    assert!(output.status.success());

    let schema = stdout_json(&output);
    let properties = schema["properties"].as_object().expect("properties");
    assert!(properties.contains_key("project"));
    assert!(!properties.contains_key("risk_flags"));
    assert!(!properties.contains_key("engine"));
}
