use std::process::Command;

#[test]
fn json_summary_reports_the_session() {
    let output = Command::new(env!("CARGO_BIN_EXE_field-defence"))
        .args(["--ticks", "300", "--tower", "5,3", "--tower", "0,0", "--json"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run the field-defence binary");

    assert!(output.status.success(), "field-defence exited with {:?}", output.status);

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout carries a JSON summary");
    assert_eq!(summary["ticks"], 300);
    assert_eq!(summary["columns"], 12);
    assert_eq!(summary["rows"], 9);
    assert_eq!(summary["money"], 155);
    assert_eq!(summary["lives"], 100);
    assert_eq!(summary["placements"][0]["rejected"], serde_json::Value::Null);
    assert!(summary["placements"][1]["rejected"].is_string());
}

#[test]
fn missing_config_file_is_an_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_field-defence"))
        .args(["--config", "/nonexistent/field-defence.json"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run the field-defence binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read config"), "stderr: {stderr}");
}

#[test]
fn config_with_deathless_creeps_is_refused() {
    let path = std::env::temp_dir().join(format!(
        "field-defence-zero-health-{}.json",
        std::process::id()
    ));
    std::fs::write(&path, r#"{ "creep_health": 0 }"#).expect("write temporary config");

    let output = Command::new(env!("CARGO_BIN_EXE_field-defence"))
        .arg("--config")
        .arg(&path)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run the field-defence binary");
    let _ = std::fs::remove_file(&path);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("creep_health must be at least 1"), "stderr: {stderr}");
}
