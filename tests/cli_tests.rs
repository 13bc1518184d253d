use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn freight_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("freight"))
}

fn init_config(temp_dir: &TempDir, demo: bool) -> std::path::PathBuf {
    let config_path = temp_dir.path().join("freight-config");
    let mut args = vec!["-C", config_path.to_str().unwrap(), "init"];
    if demo {
        args.push("--demo");
    }
    freight_cmd().args(&args).assert().success();
    config_path
}

fn write_quotations(config_path: &std::path::Path, json: &str) {
    fs::write(config_path.join("quotations.json"), json).unwrap();
}

#[test]
fn test_help() {
    freight_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Freight quotation rate history"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("freight-config");

    freight_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized freight config"));

    assert!(config_path.join("config.toml").exists());
    assert_eq!(
        fs::read_to_string(config_path.join("quotations.json")).unwrap(),
        "[]"
    );
    assert!(config_path.join("bookings.json").exists());
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir, false);

    freight_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_lane_without_init() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    freight_cmd()
        .args(["-C", config_path.to_str().unwrap(), "lane"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_demo_lane_history() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir, true);

    freight_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "lane",
            "--origin",
            "shanghai",
            "--destination",
            "rotter",
            "--months",
            "12",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("shanghai -> rotter"))
        .stdout(predicate::str::contains("AVG SELL"))
        .stdout(predicate::str::contains("$2,160.00"))
        .stdout(predicate::str::contains("$2,100.00"))
        .stdout(predicate::str::contains("$0.00"));
}

#[test]
fn test_lane_json_has_one_point_per_month() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir, true);

    let output = freight_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "lane",
            "--months",
            "100",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let points: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let points = points.as_array().unwrap();
    // Clamped to 24 months
    assert_eq!(points.len(), 24);
    assert_eq!(points[23]["avgSell"], 2160.0);
    assert!(points[0].get("volume").is_some());
}

#[test]
fn test_other_lane_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir, true);

    freight_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "customers",
            "--origin",
            "busan",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No quotations on busan -> *"));
}

#[test]
fn test_customers_summary() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir, true);

    freight_cmd()
        .args(["-C", config_path.to_str().unwrap(), "customers", "--months", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CUSTOMER"))
        .stdout(predicate::str::contains("ACE Logistics"))
        .stdout(predicate::str::contains("Blue Whale Shipping"))
        .stdout(predicate::str::contains("Harbor Freight Co"));
}

#[test]
fn test_quotes_filters_by_customer() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir, false);

    write_quotations(
        &config_path,
        r#"[
            {"id": "Q-1", "customer": "CUSTA", "createdAt": "2025-01-10", "lines": [{"qty": 1, "sell": 1000, "margin": 250}]},
            {"id": "Q-2", "customerCode": "CUSTA/001", "createdAt": "2025-01-11", "lines": [{"qty": 1, "sell": 1000, "margin": 50}]},
            {"id": "Q-3", "customer": "OTHER", "createdAt": "2025-01-12", "lines": [{"qty": 1, "sell": 500, "margin": 10}]}
        ]"#,
    );

    freight_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "quotes",
            "--customer",
            "custa",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Q-1"))
        .stdout(predicate::str::contains("Q-2"))
        .stdout(predicate::str::contains("Q-3").not())
        .stdout(predicate::str::contains("25.0%"))
        .stdout(predicate::str::contains("High"))
        .stdout(predicate::str::contains("Low"))
        .stdout(predicate::str::contains("Showing 2 of 2"));
}

#[test]
fn test_quotes_without_allowed_customers() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir, true);

    freight_cmd()
        .args(["-C", config_path.to_str().unwrap(), "quotes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No customers selected"));
}

#[test]
fn test_bands_classify() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir, false);

    freight_cmd()
        .args(["-C", config_path.to_str().unwrap(), "bands", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12.00% -> Mid (mid)"));

    freight_cmd()
        .args(["-C", config_path.to_str().unwrap(), "bands"])
        .assert()
        .success()
        .stdout(predicate::str::contains(">= 20.0%"))
        .stdout(predicate::str::contains("< 12.0%"));
}

#[test]
fn test_malformed_snapshot_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir, false);
    write_quotations(&config_path, "[{\"id\": ");

    freight_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("quotations.json"));
}

#[test]
fn test_status_counts_records() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir, true);

    freight_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Freight Status"))
        .stdout(predicate::str::contains("Quotations:       7"))
        .stdout(predicate::str::contains("Bookings:         7"));
}

#[test]
fn test_invalid_date_format_fails_cleanly() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir, true);
    let config_file = config_path.join("config.toml");
    let content = fs::read_to_string(&config_file)
        .unwrap()
        .replace(r#"date_format = "%b %d, %Y""#, r#"date_format = "%Q""#);
    fs::write(&config_file, content).unwrap();

    freight_cmd()
        .args(["-C", config_path.to_str().unwrap(), "customers"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid date_format '%Q'"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_bands_accepts_negative_ros() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir, false);

    freight_cmd()
        .args(["-C", config_path.to_str().unwrap(), "bands", "-5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-5.00% -> Low (low)"));
}
