use std::env;
use std::process::ExitCode;

use hunger_trends::AnalysisResult;
use hunger_trends::analysis::{Inputs, derive, render};
use hunger_trends::config::AnalysisConfig;
use tracing_subscriber::{EnvFilter, fmt};

/// Names an optional JSON file overriding [`AnalysisConfig`] defaults.
const CONFIG_ENV: &str = "HUNGER_TRENDS_CONFIG";

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "analysis failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> AnalysisResult<()> {
    let config = match env::var_os(CONFIG_ENV) {
        Some(path) => AnalysisConfig::from_json_path(path)?,
        None => AnalysisConfig::default(),
    };
    tracing::info!(?config, "starting analysis");

    let inputs = Inputs::load(&config)?;
    for report in inputs.reports() {
        println!("{report}");
    }

    let derived = derive(&inputs, &config)?;
    for path in render(&derived, &config)? {
        println!("wrote {}", path.display());
    }
    Ok(())
}
