mod support;

use assert_cmd::Command;
use predicates::prelude::*;

use support::config::{sqlite_config, write_temp_config};

fn tonmarket(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("tonmarket").expect("binary built");
    cmd.current_dir(dir)
        .env_remove("DATABASE_PATH")
        .env_remove("WITHDRAW_FEE_RATE")
        .env_remove("TELEGRAM_BOT_TOKEN")
        .env("RUST_LOG", "warn");
    cmd
}

#[test]
fn cli_returns_nonzero_on_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_temp_config("[withdrawal]\ndaily_limit_ton = -5\n");

    tonmarket(dir.path())
        .args(["config", "validate", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("withdrawal.daily_limit_ton"));
}

#[test]
fn config_validate_accepts_defaults() {
    let dir = tempfile::tempdir().unwrap();
    tonmarket(dir.path())
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid: (defaults)"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    tonmarket(dir.path()).args(["config", "init"]).assert().success();
    assert!(dir.path().join("config.toml").exists());

    tonmarket(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    tonmarket(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sqlite").and(predicate::str::contains("TON, GIFTS")));
}

#[test]
fn credit_then_balance_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_temp_config(&sqlite_config(&dir.path().join("cli.db")));

    tonmarket(dir.path())
        .args(["credit", "alice", "42.5", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("42.5 TON"));

    tonmarket(dir.path())
        .args(["balance", "alice", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("alice").and(predicate::str::contains("42.5 TON")));
}

#[test]
fn credit_rejects_negative_amount() {
    let dir = tempfile::tempdir().unwrap();
    tonmarket(dir.path())
        .args(["credit", "alice", "--", "-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid amount"));
}

#[test]
fn run_answers_one_reply_per_request_line() {
    let dir = tempfile::tempdir().unwrap();
    let input = concat!(
        r#"{"op":"admin_credit","userId":"alice","amountTon":1000}"#,
        "\n\n",
        r#"{"op":"withdraw","userId":"alice","to":"EQdest","amountTon":"490"}"#,
        "\n",
        r#"{"op":"withdraw","userId":"alice","to":"EQdest","amountTon":"10.01"}"#,
        "\n",
        "not json\n",
        r#"{"op":"balance","userId":"alice"}"#,
        "\n",
    );

    let output = tonmarket(dir.path())
        .args(["run", "--no-sweep"])
        .write_stdin(input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let replies: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(replies.len(), 5);
    assert_eq!(replies[0]["balanceTon"], "1000");
    assert_eq!(replies[1]["requestId"], 1);
    assert_eq!(replies[1]["netTon"], "485.10");
    assert_eq!(replies[2]["code"], "daily_limit_exceeded");
    assert_eq!(replies[2]["usage"]["daily"]["used"], "490");
    assert_eq!(replies[3]["status"], 400);
    assert_eq!(replies[4], serde_json::json!({"balanceTon": "510"}));
}
