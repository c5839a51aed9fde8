//! Train the sustainability Random Forest and persist its artifacts
//!
//! Usage: cargo run --release --bin train -- --config sustainability.toml

use anyhow::{Context, Result};
use clap::Parser;
use farm_sustainability::artifacts::ArtifactStore;
use farm_sustainability::training::Trainer;
use farm_sustainability::utils::{setup_logging, Config};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Train the farm sustainability model")]
struct Args {
    /// TOML config file (defaults to ./sustainability.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::resolve(args.config.as_deref()).context("loading configuration")?;
    setup_logging(config.logging.level.as_deref().unwrap_or("info"));

    println!("===========================================");
    println!("  Farm Sustainability - Model Training");
    println!("===========================================\n");

    let trainer = Trainer::new(config);
    let outcome = trainer.run()?;
    let report = &outcome.report;
    let training = &trainer.config().training;

    println!("Dataset: {} rows", report.n_rows);
    println!(
        "Target range: {:.2} - {:.2}",
        report.target_range.0, report.target_range.1
    );
    println!("Train set: {} samples", report.n_train);
    println!("Test set:  {} samples\n", report.n_test);

    println!(
        "Random Forest: {} trees, max depth {}, {:?} feature set",
        training.n_trees, training.max_depth, training.feature_set
    );
    println!("Training completed in {:.2}s\n", report.elapsed.as_secs_f64());

    println!("=== Model Evaluation ===\n");
    println!("Training R²:  {:.4}", report.train_r2);
    println!("Test R²:      {:.4}", report.test_r2);
    println!("Training MSE: {:.4}", report.train_mse);
    println!("Test MSE:     {:.4}", report.test_mse);
    if let Some(oob) = report.oob_r2 {
        println!("OOB R²:       {:.4}", oob);
    }

    println!("\n=== Feature Importance Ranking ===\n");
    for (i, (name, imp)) in report.importances.iter().enumerate() {
        let bar = "█".repeat((imp * 40.0) as usize);
        println!("{:2}. {:33} {:.4} {}", i + 1, name, imp, bar);
    }

    println!("\n=== Crop Type Encoding ===\n");
    for (code, crop) in outcome.artifacts.encoder.classes().iter().enumerate() {
        println!("{:3} = {}", code, crop);
    }

    let store = ArtifactStore::new(&trainer.config().paths);
    store.save(&outcome.artifacts)?;

    println!("\n=== Saved Artifacts ===\n");
    println!("Model:   {}", store.model_path().display());
    println!("Scaler:  {}", store.scaler_path().display());
    println!("Encoder: {}", store.encoder_path().display());

    Ok(())
}
