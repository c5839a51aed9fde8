//! Score one farm observation with the trained model
//!
//! Usage: predict [--config FILE] [--assess] <Soil_pH> <Soil_Moisture> <Temperature_C>
//!        <Rainfall_mm> <Crop_Type> <Fertilizer_Usage_kg> <Pesticide_Usage_kg> <Crop_Yield_ton>
//!
//! Options may appear before, between or after the values.
//!
//! On success the score is printed to stdout with two decimals. On any failure
//! a single `Error: ...` line goes to stderr, stdout stays empty and the exit
//! code is 1.

use clap::error::ErrorKind;
use clap::Parser;
use farm_sustainability::artifacts::ArtifactStore;
use farm_sustainability::assessment::Assessment;
use farm_sustainability::error::Error;
use farm_sustainability::predictor::{format_prediction, parse_features, Predictor};
use farm_sustainability::utils::{setup_logging, Config};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Predict the sustainability score of a farm")]
struct Cli {
    /// TOML config file (defaults to ./sustainability.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also print a rating and recommendations
    #[arg(long)]
    assess: bool,

    /// The eight feature values, in dataset column order
    #[arg(num_args = 0.., allow_negative_numbers = true)]
    values: Vec<String>,
}

fn run(cli: Cli) -> anyhow::Result<String> {
    // Validate input before touching config or artifacts
    let input = parse_features(&cli.values)?;

    let config = Config::resolve(cli.config.as_deref())?;
    setup_logging(config.logging.level.as_deref().unwrap_or("warn"));

    let predictor = Predictor::load(&ArtifactStore::new(&config.paths))?;
    let score = predictor.predict(&input)?;

    let mut output = format_prediction(score);
    output.push('\n');
    if cli.assess {
        output.push_str(&Assessment::new(score, &input).to_string());
    }
    Ok(output)
}

/// First raw argument that looks like a short flag but is neither a known
/// option nor a number, e.g. `-abc` given where a value was expected
fn unknown_dash_value<I: IntoIterator<Item = String>>(args: I) -> Option<String> {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                args.next();
            }
            a if a.starts_with("--") || a.starts_with("-c") || a == "-h" || a == "-V" => {}
            a if a.len() > 1
                && a.starts_with('-')
                && !a.parse::<f64>().is_ok_and(f64::is_finite) =>
            {
                return Some(arg);
            }
            _ => {}
        }
    }
    None
}

/// One-line message for a command-line parse failure
fn usage_error(e: &clap::Error) -> String {
    if e.kind() == ErrorKind::UnknownArgument {
        if let Some(value) = unknown_dash_value(std::env::args().skip(1)) {
            return Error::ArgumentParse(format!("could not convert '{}' to a number", value))
                .to_string();
        }
    }

    let rendered = e.to_string();
    rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ")
        .to_string()
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            eprintln!("Error: {}", usage_error(&e));
            return ExitCode::FAILURE;
        }
    };

    match run(cli) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
