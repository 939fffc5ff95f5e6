//! Logging settings taken from the configuration file

use std::process::Command;

fn run_with_config(dir: &std::path::Path, contents: &str) -> std::process::Output {
    let config_path = dir.join("signalrank.toml");
    std::fs::write(&config_path, contents).unwrap();

    Command::new(env!("CARGO_BIN_EXE_signalrank"))
        .args(["-c", config_path.to_str().unwrap()])
        .args(["-m", "1", "-i", "0", "-p", "1", "-n", "1", "-r", "none", "--no-color"])
        .output()
        .expect("binary should run")
}

#[test]
fn test_log_file_and_format_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("run.log");
    let contents = format!(
        "log-file = {:?}\nlog-format = \"json\"\nlog-level = \"info\"\n",
        log_path.to_str().unwrap()
    );

    let output = run_with_config(dir.path(), &contents);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let written = std::fs::read_to_string(&log_path).expect("log file should exist");
    let first = written.lines().next().expect("log file should not be empty");
    let line: serde_json::Value = serde_json::from_str(first).unwrap();
    assert_eq!(line["level"], "INF");
    assert!(written.contains("signalrank"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("INF [main]"), "text logs leaked to stderr: {}", stderr);
}

#[test]
fn test_cli_log_format_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("run.log");
    let config_path = dir.path().join("signalrank.toml");
    std::fs::write(
        &config_path,
        format!("log-file = {:?}\nlog-format = \"json\"\n", log_path.to_str().unwrap()),
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_signalrank"))
        .args(["-c", config_path.to_str().unwrap(), "-o", "text"])
        .args(["-m", "1", "-i", "0", "-p", "1", "-n", "1", "-r", "none", "--no-color"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let written = std::fs::read_to_string(&log_path).unwrap();
    assert!(written.contains("INF [main]"), "got: {}", written);
}
