use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const VALID: &str = r#"
wifi_ssid = "home"
wifi_password = "wifi-secret"
instagram_fingerprint = "5E:30:4C:7A:C6:91:69:CF:E0:05:79:5F:26:4D:80:C7:BF:F5:F5:4D"
api_access_token = "token-secret"
user_id = "1234567"
mqtt_server = "broker.local"
mqtt_user = "device"
mqtt_password = "mqtt-secret"
mqtt_topic = "gauge/SENSOR"
dht_pin = "D4"
dht_type = "DHT22"
report_interval_seconds = 300
"#;

fn gauge(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gauge"));
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("device.toml");
    fs::write(&path, body).unwrap();
    path
}

fn header_fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../crates/shared/kernel/tests/fixtures/user_config.h")
}

#[test]
fn check_accepts_a_valid_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, VALID);

    gauge(dir.path())
        .args(["check", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("configuration is valid"));
}

#[test]
fn check_finds_the_default_file_in_the_working_directory() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, VALID);

    gauge(dir.path()).arg("check").assert().success();
}

#[test]
fn check_reports_the_failing_field() {
    let dir = TempDir::new().unwrap();
    let body = VALID.replace("report_interval_seconds = 300", "report_interval_seconds = 0");
    let path = write_config(&dir, &body);

    gauge(dir.path())
        .args(["check", "-c"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("report_interval_seconds"));
}

#[test]
fn environment_overrides_the_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, VALID);

    gauge(dir.path())
        .env("GAUGE__MQTT_PORT", "8883")
        .args(["show", "-c"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("mqtt_port               = 8883"));
}

#[test]
fn invalid_environment_override_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, VALID);

    gauge(dir.path())
        .env("GAUGE__MQTT_PORT", "70000")
        .args(["check", "-c"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("mqtt_port"));
}

#[test]
fn show_redacts_secrets() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, VALID);

    gauge(dir.path())
        .args(["show", "-c"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("mqtt_port               = 1883"))
        .stdout(predicate::str::contains("dht_pin                 = D4 (GPIO 2)"))
        .stdout(predicate::str::contains("***"))
        .stdout(predicate::str::contains("wifi-secret").not())
        .stdout(predicate::str::contains("token-secret").not())
        .stdout(predicate::str::contains("mqtt-secret").not());
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();

    gauge(dir.path()).arg("check").assert().failure();
}

#[test]
fn migrate_prints_toml_that_loads() {
    let dir = TempDir::new().unwrap();

    let output = gauge(dir.path()).arg("migrate").arg(header_fixture()).assert().success();
    let toml = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert!(toml.contains("mqtt_port = 1883"));
    assert!(toml.contains("dht_type = \"DHT22\""));

    let path = write_config(&dir, &toml);
    gauge(dir.path()).args(["check", "-c"]).arg(&path).assert().success();
}

#[test]
fn migrate_writes_output_file_and_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("device.toml");

    gauge(dir.path()).arg("migrate").arg(header_fixture()).arg("-o").arg(&out).assert().success();
    assert!(fs::read_to_string(&out).unwrap().contains("report_interval_seconds = 300"));

    gauge(dir.path())
        .arg("migrate")
        .arg(header_fixture())
        .arg("-o")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    gauge(dir.path())
        .arg("migrate")
        .arg(header_fixture())
        .args(["-o"])
        .arg(&out)
        .arg("--force")
        .assert()
        .success();
    assert!(fs::read_to_string(&out).unwrap().contains("mqtt_topic = \"gauge/SENSOR\""));
}

#[test]
fn log_dir_receives_a_log_file() {
    let dir = TempDir::new().unwrap();
    let logs = dir.path().join("logs");
    let path = write_config(&dir, VALID);

    gauge(dir.path())
        .arg("--log-dir")
        .arg(&logs)
        .args(["check", "-c"])
        .arg(&path)
        .assert()
        .success();

    let entries: Vec<_> = fs::read_dir(&logs).unwrap().collect();
    assert!(!entries.is_empty());
}

#[test]
fn migrate_refuses_a_header_that_does_not_validate() {
    let dir = TempDir::new().unwrap();
    let header = dir.path().join("user_config.h");
    let text = fs::read_to_string(header_fixture()).unwrap();
    let without_token: String = text
        .lines()
        .filter(|line| !line.contains("API_ACCESS_TOKEN"))
        .map(|line| format!("{line}\n"))
        .collect();
    fs::write(&header, without_token).unwrap();
    let out = dir.path().join("device.toml");

    gauge(dir.path())
        .arg("migrate")
        .arg(&header)
        .arg("-o")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("api_access_token"));

    assert!(!out.exists());
}

#[test]
fn unknown_keys_are_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, &format!("{VALID}mqtt_prot = 8883\n"));

    gauge(dir.path())
        .args(["check", "-c"])
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Ignoring unknown configuration key"))
        .stderr(predicate::str::contains("mqtt_prot"));
}

#[test]
fn piped_logs_carry_no_colour_codes() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, VALID);

    gauge(dir.path())
        .args(["check", "-c"])
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("configuration is valid"))
        .stderr(predicate::str::contains("\u{1b}[").not());
}
