use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

#[test]
fn help_works() -> Result<(), Box<dyn std::error::Error>> {
    Command::new(assert_cmd::cargo::cargo_bin!("toml-reader"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--lenient-tables"));
    Ok(())
}

#[test]
fn decode_file_to_json() -> Result<(), Box<dyn std::error::Error>> {
    let input = "a = 2\n[t]\nlist = [1, 2]\nwhen = 1979-05-27\n";
    let mut tmp = NamedTempFile::new()?;
    write!(tmp, "{}", input)?;

    let output = Command::new(assert_cmd::cargo::cargo_bin!("toml-reader"))
        .arg(tmp.path())
        .output()?;
    assert!(output.status.success());
    let out = String::from_utf8(output.stdout)?;
    let v_out: serde_json::Value = serde_json::from_str(&out)?;
    assert_eq!(
        v_out,
        serde_json::json!({"a": 2, "t": {"list": [1, 2], "when": "1979-05-27"}})
    );
    Ok(())
}

#[test]
fn decode_stdin_pretty() -> Result<(), Box<dyn std::error::Error>> {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("toml-reader"))
        .arg("--pretty")
        .write_stdin("x.y = true\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  \"x\": {"));
    Ok(())
}

#[test]
fn parse_errors_report_position() -> Result<(), Box<dyn std::error::Error>> {
    let mut tmp = NamedTempFile::new()?;
    write!(tmp, "[a]\n[a]\n")?;

    Command::new(assert_cmd::cargo::cargo_bin!("toml-reader"))
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate table at line 2, column 1"));

    Command::new(assert_cmd::cargo::cargo_bin!("toml-reader"))
        .arg("--lenient-tables")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("{\"a\":{}}"));
    Ok(())
}

#[test]
fn max_depth_flag() -> Result<(), Box<dyn std::error::Error>> {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("toml-reader"))
        .args(["--max-depth", "1"])
        .write_stdin("a = [[1]]\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nesting too deep"));
    Ok(())
}

#[test]
fn missing_file_fails() {
    Command::new(assert_cmd::cargo::cargo_bin!("toml-reader"))
        .arg("/definitely/not/here.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open"));
}
