//! Integration tests for the training pipeline and the predict binary

use farm_sustainability::prelude::*;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{tempdir, TempDir};

const HEADER: &str = "Soil_pH,Soil_Moisture,Temperature_C,Rainfall_mm,Crop_Type,\
Fertilizer_Usage_kg,Pesticide_Usage_kg,Crop_Yield_ton,Sustainability_Score";

const SAMPLE_ARGS: [&str; 8] = ["6.5", "30.2", "22.1", "120.4", "0", "45.0", "3.2", "4.8"];

/// Write a small farm dataset: a block of identical Wheat rows plus varied rows
fn write_dataset(path: &Path) {
    let mut csv = String::from(HEADER);
    csv.push('\n');

    for _ in 0..10 {
        csv.push_str("6.5,30.2,22.1,120.4,Wheat,45.0,3.2,4.8,72.3\n");
    }

    let crops = ["Wheat", "Corn", "Rice"];
    for i in 0..70 {
        let ph = 5.2 + (i % 9) as f64 * 0.3;
        let moisture = 12.0 + (i % 13) as f64 * 3.5;
        let temperature = 14.0 + (i % 7) as f64 * 2.0;
        let rainfall = 60.0 + (i * 17 % 150) as f64;
        let fertilizer = 15.0 + (i % 11) as f64 * 7.0;
        let pesticide = 1.0 + (i % 8) as f64 * 1.5;
        let yield_ton = 2.0 + (i % 5) as f64;
        let score = 35.0 + 0.8 * moisture - 0.25 * fertilizer + 3.0 * ph - pesticide;
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{:.2}\n",
            ph,
            moisture,
            temperature,
            rainfall,
            crops[i % crops.len()],
            fertilizer,
            pesticide,
            yield_ton,
            score
        ));
    }

    fs::write(path, csv).unwrap();
}

/// Config with every path inside `dir` and a small forest
fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.paths.dataset = dir.join("farm_data.csv");
    config.paths.model = dir.join("artifacts/model.bin");
    config.paths.scaler = dir.join("artifacts/scaler.bin");
    config.paths.encoder = dir.join("artifacts/encoder.json");
    config.training.n_trees = 25;
    config
}

/// Train on a fresh dataset and save the artifacts plus a config file
fn trained_workspace() -> (TempDir, Config) {
    trained_workspace_with(FeatureSet::Raw)
}

fn trained_workspace_with(feature_set: FeatureSet) -> (TempDir, Config) {
    let dir = tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.training.feature_set = feature_set;
    write_dataset(&config.paths.dataset);

    let outcome = Trainer::new(config.clone()).run().unwrap();
    ArtifactStore::new(&config.paths)
        .save(&outcome.artifacts)
        .unwrap();
    config.save(dir.path().join("config.toml")).unwrap();

    (dir, config)
}

fn run_predict(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_predict"))
        .current_dir(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn with_config<'a>(args: &[&'a str]) -> Vec<&'a str> {
    let mut full = vec!["--config", "config.toml"];
    full.extend_from_slice(args);
    full
}

#[test]
fn test_train_and_predict_in_process() {
    let (_dir, config) = trained_workspace();

    let predictor = Predictor::load(&ArtifactStore::new(&config.paths)).unwrap();
    let input = parse_features(&SAMPLE_ARGS).unwrap();
    let score = predictor.predict(&input).unwrap();

    let (min, max) = target_range(&config);
    assert!(score >= min && score <= max, "score {} outside [{}, {}]", score, min, max);
}

fn target_range(config: &Config) -> (f64, f64) {
    let records = farm_sustainability::data::load_records(&config.paths.dataset).unwrap();
    let scores = records.iter().map(|r| r.sustainability_score);
    (
        scores.clone().fold(f64::INFINITY, f64::min),
        scores.fold(f64::NEG_INFINITY, f64::max),
    )
}

#[test]
fn test_engineered_model_scores_raw_input() {
    let (_dir, config) = trained_workspace_with(FeatureSet::Engineered);

    let predictor = Predictor::load(&ArtifactStore::new(&config.paths)).unwrap();
    let score = predictor.predict(&parse_features(&SAMPLE_ARGS).unwrap()).unwrap();

    let (min, max) = target_range(&config);
    assert!(score.is_finite());
    assert!(score >= min && score <= max, "score {} outside [{}, {}]", score, min, max);
}

#[test]
fn test_engineered_model_through_binary() {
    let (dir, _config) = trained_workspace_with(FeatureSet::Engineered);

    let output = run_predict(dir.path(), &with_config(&SAMPLE_ARGS));
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8(output.stdout).unwrap().trim_end().parse::<f64>().is_ok());
}

#[test]
fn test_unknown_crop_code_still_scores() {
    let (_dir, config) = trained_workspace();
    let predictor = Predictor::load(&ArtifactStore::new(&config.paths)).unwrap();

    let mut args = SAMPLE_ARGS;
    args[4] = "99";
    let input = parse_features(&args).unwrap();

    assert_eq!(predictor.crop_name(&input), None);
    let score = predictor.predict(&input).unwrap();
    let (min, max) = target_range(&config);
    assert!(score >= min && score <= max);
}

#[test]
fn test_predict_binary_prints_two_decimals() {
    let (dir, _config) = trained_workspace();

    let output = run_predict(dir.path(), &with_config(&SAMPLE_ARGS));
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let line = stdout.trim_end();
    let (_, decimals) = line.split_once('.').unwrap();
    assert_eq!(decimals.len(), 2);
    let score: f64 = line.parse().unwrap();
    assert!(score > 0.0 && score < 100.0);
}

#[test]
fn test_predict_binary_is_repeatable() {
    let (dir, _config) = trained_workspace();

    let first = run_predict(dir.path(), &with_config(&SAMPLE_ARGS));
    let second = run_predict(dir.path(), &with_config(&SAMPLE_ARGS));
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_predict_binary_assess() {
    let (dir, _config) = trained_workspace();

    let mut args = vec!["--assess"];
    args.extend_from_slice(&SAMPLE_ARGS);
    let output = run_predict(dir.path(), &with_config(&args));
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let mut lines = stdout.lines();
    assert!(lines.next().unwrap().parse::<f64>().is_ok());
    assert!(lines.next().unwrap().starts_with("Rating: "));
    // Yield 4.8 t is below 50 t
    assert!(stdout.contains("crop rotation"));
}

#[test]
fn test_predict_binary_assess_after_values() {
    let (dir, _config) = trained_workspace();

    let mut args = SAMPLE_ARGS.to_vec();
    args.push("--assess");
    let output = run_predict(dir.path(), &with_config(&args));
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.lines().nth(1).unwrap().starts_with("Rating: "));
}

#[test]
fn test_predict_binary_dash_prefixed_garbage() {
    let dir = tempdir().unwrap();

    let mut args = SAMPLE_ARGS.to_vec();
    args[0] = "-abc";
    let output = run_predict(dir.path(), &args);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("Error: Invalid input"), "stderr: {}", stderr);
    assert!(stderr.contains("-abc"));
    assert_eq!(stderr.lines().count(), 1);
}

#[test]
fn test_predict_binary_unknown_option_is_one_line() {
    let dir = tempdir().unwrap();

    let mut args = SAMPLE_ARGS.to_vec();
    args.push("--bogus");
    let output = run_predict(dir.path(), &args);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("Error: "));
    assert_eq!(stderr.lines().count(), 1);
}

#[test]
fn test_predict_binary_wrong_argument_count() {
    let dir = tempdir().unwrap();

    for args in [&SAMPLE_ARGS[..0], &SAMPLE_ARGS[..7]] {
        let output = run_predict(dir.path(), args);
        assert_eq!(output.status.code(), Some(1));
        assert!(output.stdout.is_empty());
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.starts_with("Error: "));
        assert!(stderr.contains("Incorrect number of arguments"));
    }

    let mut nine = SAMPLE_ARGS.to_vec();
    nine.push("1.0");
    let output = run_predict(dir.path(), &nine);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Incorrect number of arguments"));
}

#[test]
fn test_predict_binary_invalid_number() {
    let dir = tempdir().unwrap();

    let mut args = SAMPLE_ARGS.to_vec();
    args[0] = "abc";
    let output = run_predict(dir.path(), &args);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid input"));
}

#[test]
fn test_predict_binary_missing_artifacts() {
    let dir = tempdir().unwrap();
    test_config(dir.path())
        .save(dir.path().join("config.toml"))
        .unwrap();

    let output = run_predict(dir.path(), &with_config(&SAMPLE_ARGS));

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load artifact"));
}

#[test]
fn test_predict_binary_accepts_negative_temperature() {
    let (dir, _config) = trained_workspace();

    let mut args = SAMPLE_ARGS.to_vec();
    args[2] = "-3.5";
    let output = run_predict(dir.path(), &with_config(&args));
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn test_training_is_deterministic_across_runs() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    write_dataset(&config.paths.dataset);

    let a = Trainer::new(config.clone()).run().unwrap();
    let b = Trainer::new(config).run().unwrap();

    assert_eq!(a.artifacts.scaler, b.artifacts.scaler);
    assert_eq!(a.report.test_r2, b.report.test_r2);
    assert_eq!(a.report.importances, b.report.importances);
}
