use assert_cmd::Command;
use predicates::prelude::*;

fn exposure_csv(dir: &std::path::Path) -> std::path::PathBuf {
    let mut body = String::from("died,age years\n");
    for i in 0..60 {
        let age = if i == 7 { "missing".to_string() } else { format!("{}", i as f64 * 1.5) };
        body.push_str(&format!("{},{}\n", i32::from(i % 3 == 0), age));
    }
    let path = dir.join("cohort.csv");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("logodds-explorer").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn method_help_mentions_library_provider() {
    let mut cmd = Command::cargo_bin("logodds-explorer").expect("binary exists");
    cmd.args(["explore", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"library\s+API").unwrap());
}

#[test]
fn explore_writes_results_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = exposure_csv(dir.path());
    let out = dir.path().join("results.csv");

    Command::cargo_bin("logodds-explorer")
        .unwrap()
        .env("LOGODDS_OUTPUTS_DIR", dir.path())
        .args(["explore", "--outcome", "died", "--predictor", "age years"])
        .args(["--categories", "3", "--no-plot"])
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("category,cases,non_cases,odds"));
    assert_eq!(written.lines().count(), 4);
}

#[test]
fn natural_breaks_without_backend_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = exposure_csv(dir.path());
    let out = dir.path().join("results.csv");

    Command::cargo_bin("logodds-explorer")
        .unwrap()
        .env("LOGODDS_OUTPUTS_DIR", dir.path())
        .args(["explore", "--outcome", "died", "--predictor", "age years"])
        .args(["--method", "natural-breaks", "--no-plot"])
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    assert!(!out.exists());
}

#[test]
fn unknown_method_is_a_usage_error() {
    Command::cargo_bin("logodds-explorer")
        .unwrap()
        .args(["categorise", "--input", "x.csv", "--predictor", "age", "--method", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bogus"));
}

#[test]
fn categorise_prints_breaks() {
    let dir = tempfile::tempdir().unwrap();
    let input = exposure_csv(dir.path());

    Command::cargo_bin("logodds-explorer")
        .unwrap()
        .env("LOGODDS_OUTPUTS_DIR", dir.path())
        .args(["categorise", "--predictor", "age years", "--method", "cutoffs"])
        .args(["--cutoffs", "0,30,60,90"])
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("age_years_cat: [0.0, 30.0, 60.0, 90.0]"));

    assert!(dir.path().join("categorised.csv").exists());
}
