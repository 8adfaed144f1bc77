//! CLI integration tests

use std::path::Path;
use std::process::{Command, Output};

fn hdp(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hdp"))
        .args(args)
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("HDP_API_URL")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let home = tempfile::tempdir().unwrap();
    let output = hdp(home.path(), &["--help"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("Heart Disease Prediction"),
        "Should show app name"
    );
    for command in ["status", "health", "predict", "features", "config"] {
        assert!(stdout.contains(command), "Should show {} command", command);
    }
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let home = tempfile::tempdir().unwrap();
    let output = hdp(home.path(), &["--version"]);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout(&output).contains("hdp"), "Should show binary name");
}

/// Test predict subcommand help lists every feature flag
#[test]
fn test_predict_help() {
    let home = tempfile::tempdir().unwrap();
    let output = hdp(home.path(), &["predict", "--help"]);
    let stdout = stdout(&output);

    assert!(output.status.success());
    for flag in [
        "--age", "--sex", "--cp", "--trestbps", "--chol", "--fbs", "--restecg", "--thalach",
        "--exang", "--oldpeak", "--slope", "--ca", "--thal", "--features",
    ] {
        assert!(stdout.contains(flag), "Should show {} flag", flag);
    }
}

/// Test the feature catalogue in JSON form
#[test]
fn test_features_json() {
    let home = tempfile::tempdir().unwrap();
    let output = hdp(home.path(), &["--format", "json", "features"]);

    assert!(output.status.success(), "{}", stderr(&output));
    let catalogue: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let entries = catalogue.as_array().unwrap();
    assert_eq!(entries.len(), 13);
    assert_eq!(entries[0]["name"], "age");
    assert_eq!(entries[0]["kind"], "numeric");
    assert_eq!(entries[12]["name"], "thal");
    assert_eq!(entries[12]["default"], 1);
}

/// Test that missing numeric features are reported before any request
#[test]
fn test_predict_missing_features() {
    let home = tempfile::tempdir().unwrap();
    let output = hdp(
        home.path(),
        &["--api-url", "http://127.0.0.1:9", "predict", "--age", "50"],
    );

    assert!(!output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("Missing required features"));
    assert!(stderr.contains("--trestbps"));
}

/// Test a full prediction against a mock service
#[test]
fn test_predict_against_mock_service() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/predict")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "features": [63.0, 1.0, 3.0, 145.0, 233.0, 1.0, 0.0, 150.0, 0.0, 2.3, 0.0, 0.0, 1.0]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"logistic_regression": 1, "decision_tree": 0}"#)
        .create();

    let home = tempfile::tempdir().unwrap();
    let url = server.url();
    let output = hdp(
        home.path(),
        &[
            "--api-url",
            &url,
            "predict",
            "--features",
            "63,1,3,145,233,1,0,150,0,2.3,0,0,1",
        ],
    );

    assert!(output.status.success(), "{}", stderr(&output));
    let stdout = stdout(&output);
    assert!(stdout.contains("Logistic Regression"));
    assert!(stdout.contains("High Risk"));
    assert!(stdout.contains("Low Risk"));
    mock.assert();
}

/// Test that the service's error detail reaches the user
#[test]
fn test_predict_reports_service_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/predict")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "Models not loaded"}"#)
        .create();

    let home = tempfile::tempdir().unwrap();
    let url = server.url();
    let output = hdp(
        home.path(),
        &[
            "--api-url",
            &url,
            "predict",
            "--features",
            "63,1,3,145,233,1,0,150,0,2.3,0,0,1",
        ],
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Models not loaded"));
}

/// Test that the config file supplies the URL when no flag is given
#[test]
fn test_config_set_url_then_show() {
    let home = tempfile::tempdir().unwrap();

    let output = hdp(home.path(), &["config", "set-url", "http://predictor.internal:9000"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(home.path().join(".config/hdp/config.json").exists());

    let output = hdp(home.path(), &["--format", "json", "config", "show"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let shown: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(shown["effective_api_url"], "http://predictor.internal:9000");
}

/// Test the default URL when nothing is configured
#[test]
fn test_default_url() {
    let home = tempfile::tempdir().unwrap();
    let output = hdp(home.path(), &["--format", "json", "config", "show"]);

    assert!(output.status.success(), "{}", stderr(&output));
    let shown: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(shown["effective_api_url"], "http://localhost:8000");
}

/// Test that an invalid URL is rejected by set-url
#[test]
fn test_config_set_url_rejects_invalid() {
    let home = tempfile::tempdir().unwrap();
    let output = hdp(home.path(), &["config", "set-url", "not a url"]);
    assert!(!output.status.success());
}
