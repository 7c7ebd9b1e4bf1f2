mod common;

use common::{fixture_path, spawn_command, stderr, stdout, validate};

#[test]
fn validate_valid_directory() {
    let output = validate(&fixture_path("valid_configs"), &[]);
    assert!(
        output.status.success(),
        "validate should succeed for valid configs: {}",
        stderr(&output)
    );
    assert_eq!(stdout(&output).trim(), "All validations passed!");
}

#[test]
fn validate_invalid_directory_reports_every_error() {
    let output = validate(&fixture_path("invalid_configs"), &[]);
    assert_eq!(output.status.code(), Some(2));

    let out = stdout(&output);
    assert!(out.contains("ERROR: Failed to parse config file"), "{out}");
    assert!(out.contains("config_file=DatabaseConfig.json"), "{out}");
    assert!(out.contains("config_file=MyNewThingConfig.json"), "{out}");
    assert!(out.contains("location=statuses"), "{out}");
    assert!(out.contains("ERROR: Referenced subfeature is undefined"), "{out}");
    assert!(out.contains("undefined_subfeature=sub_3"), "{out}");
    assert!(
        stderr(&output).contains("validation failed with 3 error(s)"),
        "{}",
        stderr(&output)
    );
}

#[test]
fn validate_json_output() {
    let output = validate(&fixture_path("invalid_configs"), &["--format", "json"]);
    assert_eq!(output.status.code(), Some(2));

    let parsed: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("output should be valid JSON");

    assert_eq!(
        parsed["configs_loaded"],
        serde_json::json!(["FeatureConfig", "SubFeatureConfig"])
    );
    assert_eq!(parsed["summary"]["errors"], 3);
    assert_eq!(parsed["summary"]["passed"], false);

    let kinds: Vec<&str> = parsed["errors"]
        .as_array()
        .expect("errors should be an array")
        .iter()
        .map(|e| e["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["config_creation", "single_config", "cross_config"]);
}

#[test]
fn validate_json_output_when_passing() {
    let output = validate(&fixture_path("valid_configs"), &["--format", "json"]);
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["summary"]["passed"], true);
    assert_eq!(parsed["configs_loaded"].as_array().unwrap().len(), 4);
}

#[test]
fn validate_strict_skips_cross_config() {
    let output = validate(&fixture_path("invalid_configs"), &["--strict"]);
    assert_eq!(output.status.code(), Some(2));

    let out = stdout(&output);
    assert!(out.contains("config_file=DatabaseConfig.json"), "{out}");
    assert!(!out.contains("Referenced subfeature is undefined"), "{out}");
}

#[test]
fn validate_empty_subfeature_names() {
    let output = validate(&fixture_path("empty_subfeature_names"), &[]);
    assert_eq!(output.status.code(), Some(2));

    let out = stdout(&output);
    assert!(
        out.contains("ERROR: schema validation failed: subfeature_names cannot be empty"),
        "{out}"
    );
    assert!(out.contains("config_file=FeatureConfig.json"), "{out}");
    assert!(out.contains("location=features[0].subfeature_names"), "{out}");
    assert!(!out.contains("Referenced subfeature"), "{out}");
}

#[test]
fn validate_missing_directory() {
    let output = validate(
        std::path::Path::new("/tmp/nonexistent_crossconf_test_dir"),
        &[],
    );
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("config directory not found"));
}

#[test]
fn validate_empty_directory_passes() {
    let dir = tempfile::tempdir().unwrap();
    let output = validate(dir.path(), &[]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "All validations passed!");
}

#[test]
fn validate_size_limit_from_environment() {
    let dir = fixture_path("valid_configs");
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_crossconf"))
        .args(["--quiet", "validate", dir.to_str().unwrap()])
        .env("CROSSCONF_MAX_CONFIG_SIZE", "8")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("Config file exceeds size limit"));
}

#[test]
fn unknown_flag_is_usage_error() {
    let output = spawn_command(&["validate", "--no-such-flag"]);
    assert_eq!(output.status.code(), Some(64));
}
