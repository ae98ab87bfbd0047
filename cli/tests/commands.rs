use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("crates")
        .join("report")
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bbr-cli-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Run `bbr` with config and cache pointed into `home`.
fn bbr(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bbr"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_CACHE_HOME", home.join("cache"))
        .env("APPDATA", home.join("config"))
        .env("LOCALAPPDATA", home.join("cache"))
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run bbr")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_info_from_report() {
    let home = scratch_dir("info");
    let report = fixture("desk_1234.xml");
    let output = bbr(&home, &["info", "--from", report.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().take(4).collect();
    assert_eq!(
        lines,
        vec![
            "Computer Name: DESK-1234",
            "Scan Time: 2024-01-15T10:00:00",
            "Design Capacity: 50000 mWh",
            "Full Charge Capacity: 48000 mWh",
        ]
    );
    let _ = fs::remove_dir_all(&home);
}

#[test]
fn test_info_rejects_broken_xml() {
    let home = scratch_dir("broken");
    let report = fixture("unclosed_tag.xml");
    let output = bbr(&home, &["info", "--from", report.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("not well-formed"));
    let _ = fs::remove_dir_all(&home);
}

#[test]
fn test_info_missing_file() {
    let home = scratch_dir("missing");
    let report = home.join("nope.xml");
    let output = bbr(&home, &["info", "--from", report.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("nope.xml"));
    let _ = fs::remove_dir_all(&home);
}

#[test]
fn test_generate_from_report_writes_chart() {
    let home = scratch_dir("generate");
    let report = fixture("duplicate_days.xml");
    let target = home.join("out").join("chart.html");
    let output = bbr(
        &home,
        &[
            "generate",
            "--no-open",
            "--from",
            report.to_str().unwrap(),
            "--output",
            target.to_str().unwrap(),
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Battery report saved to"));

    let html = fs::read_to_string(&target).unwrap();
    assert!(html.contains("LAPTOP-77"));
    assert!(html.contains("<polyline"));
    assert!(html.contains("<td>2024-02-01</td><td>46500</td>"));
    assert!(!html.contains("<td>2024-02-01</td><td>47000</td>"));
    let _ = fs::remove_dir_all(&home);
}

#[test]
fn test_generate_empty_history() {
    let home = scratch_dir("empty");
    let report = fixture("empty_history.xml");
    let target = home.join("empty.html");
    let output = bbr(
        &home,
        &[
            "generate",
            "--no-open",
            "--metric",
            "health",
            "--from",
            report.to_str().unwrap(),
            "-o",
            target.to_str().unwrap(),
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let html = fs::read_to_string(&target).unwrap();
    assert!(html.contains("NEW-BOX"));
    assert!(html.contains("No capacity history was recorded"));
    assert!(!html.contains("<polyline"));
    let _ = fs::remove_dir_all(&home);
}

#[test]
fn test_generate_unknown_format() {
    let home = scratch_dir("format");
    let output = bbr(&home, &["generate", "--no-open", "--format", "pdf"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown report format `pdf`"));
    let _ = fs::remove_dir_all(&home);
}

#[test]
fn test_generate_rejects_unknown_chart_options() {
    let home = scratch_dir("options");
    let report = fixture("desk_1234.xml");
    let target = home.join("never.html");

    for (flag, value, message) in [
        ("--metric", "helth", "Unknown chart metric `helth`"),
        ("--theme", "solarized", "Unknown chart theme `solarized`"),
    ] {
        let output = bbr(
            &home,
            &[
                "generate",
                "--no-open",
                flag,
                value,
                "--from",
                report.to_str().unwrap(),
                "-o",
                target.to_str().unwrap(),
            ],
        );

        assert!(!output.status.success());
        assert!(stderr(&output).contains(message), "stderr: {}", stderr(&output));
        assert!(!target.exists());
    }
    let _ = fs::remove_dir_all(&home);
}

#[cfg(not(windows))]
#[test]
fn test_info_needs_windows() {
    let home = scratch_dir("unsupported");
    let output = bbr(&home, &["info"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("not available on"));
    let _ = fs::remove_dir_all(&home);
}

#[test]
fn test_config_path() {
    let home = scratch_dir("config");
    let output = bbr(&home, &["config", "--path"]);

    assert!(output.status.success());
    assert!(stdout(&output).trim().ends_with("config.toml"));
    let _ = fs::remove_dir_all(&home);
}

// dirs ignores the environment on Windows, reset would touch the real config
#[cfg(unix)]
#[test]
fn test_config_show_and_reset() {
    let home = scratch_dir("config-show");

    let shown = bbr(&home, &["config"]);
    assert!(shown.status.success(), "stderr: {}", stderr(&shown));
    let text = stdout(&shown);
    assert!(text.contains("not created, showing defaults"));
    assert!(text.contains("[report]"));
    assert!(text.contains("[chart]"));

    let reset = bbr(&home, &["config", "--reset"]);
    assert!(reset.status.success(), "stderr: {}", stderr(&reset));
    assert!(stdout(&reset).contains("Config reset to defaults"));

    let shown = bbr(&home, &["config"]);
    assert!(!stdout(&shown).contains("not created"));
    let _ = fs::remove_dir_all(&home);
}
