use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output}
};

use serde_json::Value;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bt-processor-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).expect("Failed to create scratch directory");
    dir
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bt-processor"))
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to execute processor")
}

fn path(p: &Path) -> &str {
    p.to_str().expect("Scratch path is not UTF-8")
}

#[test]
fn test_simulate_then_fit() {
    let dir = scratch_dir("fit");
    let data = dir.join("data.json");
    let truth = dir.join("truth.json");

    let simulate = run(&[
        "simulate", "--players", "30", "--matches", "1500", "--seed", "5", "--output", path(&data), "--truth",
        path(&truth)
    ]);
    assert!(simulate.status.success(), "{}", String::from_utf8_lossy(&simulate.stderr));

    let dataset: Value = serde_json::from_str(&fs::read_to_string(&data).unwrap()).unwrap();
    assert_eq!(dataset["K"], 30);
    assert_eq!(dataset["N"], 1500);

    let fit = run(&["fit", "--input", path(&data), "--prior", "normal", "--truth", path(&truth)]);
    assert!(fit.status.success(), "{}", String::from_utf8_lossy(&fit.stderr));

    let output: Value = serde_json::from_slice(&fit.stdout).unwrap();
    assert!(output["estimates"]["alpha[1]"].is_f64());
    assert_eq!(output["ranked"].as_array().map(|r| r.len()), Some(30));
    assert!(output["correlation"].as_f64().unwrap() > 0.9);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_simulate_teams_then_sample() {
    let dir = scratch_dir("sample");
    let data = dir.join("teams.json");

    let simulate = run(&[
        "simulate", "-k", "8", "-n", "200", "-j", "2", "--scale", "0.5", "--output", path(&data)
    ]);
    assert!(simulate.status.success(), "{}", String::from_utf8_lossy(&simulate.stderr));

    let sample = run(&[
        "sample", "--input", path(&data), "--chains", "2", "--warmup", "100", "--draws", "100", "--top-k", "3"
    ]);
    assert!(sample.status.success(), "{}", String::from_utf8_lossy(&sample.stderr));

    let output: Value = serde_json::from_slice(&sample.stdout).unwrap();
    assert!(output["parameters"]["sigma"]["mean"].as_f64().unwrap() > 0.0);
    assert_eq!(output["ranks"].as_array().map(|r| r.len()), Some(8));
    assert!(output["ranks"][0]["top_k_probability"].is_f64());

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_strict_rejects_unobserved_players() {
    let dir = scratch_dir("strict");
    let data = dir.join("gap.json");
    fs::write(&data, r#"{"K": 3, "N": 2, "player0": [1, 2], "player1": [2, 1], "y": [1, 0]}"#).unwrap();

    let lenient = run(&["fit", "--input", path(&data)]);
    assert!(lenient.status.success());

    let strict = run(&["fit", "--input", path(&data), "--strict"]);
    assert!(!strict.status.success(), "Player 3 never played, strict mode should refuse");

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_invalid_dataset_fails() {
    let dir = scratch_dir("invalid");
    let data = dir.join("bad.json");
    fs::write(&data, r#"{"K": 2, "N": 1, "player0": [1], "player1": [3], "y": [1]}"#).unwrap();

    let output = run(&["fit", "--input", path(&data)]);
    assert!(!output.status.success());

    fs::remove_dir_all(dir).ok();
}
