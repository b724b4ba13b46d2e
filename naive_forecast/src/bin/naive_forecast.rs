//! # naive-forecast
//!
//! Command-line front end for the naive forecast service.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use naive_forecast::config::{NaiveStrategy, QuantileMethod};
use naive_forecast::{EngineConfig, ForecastService, PredictRequest};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "naive-forecast")]
#[command(about = "Naive time series forecasts with quantile bands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a predict request read as JSON
    Predict {
        /// Request file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Output file (optional, stdout by default)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Point-forecast strategy (last, mean, median, first); overrides NAIVE_STRATEGY
        #[arg(short, long)]
        strategy: Option<NaiveStrategy>,

        /// z-score method (monte_carlo, analytic); overrides NAIVE_QUANTILE_METHOD
        #[arg(short, long)]
        method: Option<QuantileMethod>,

        /// Pretty-print the response
        #[arg(long)]
        pretty: bool,
    },

    /// Print the health payload
    Health,
}

fn read_request(input: &Path) -> Result<PredictRequest> {
    let mut raw = String::new();
    if input.as_os_str() == "-" {
        io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read request from stdin")?;
    } else {
        let file = File::open(input)
            .with_context(|| format!("Failed to open {}", input.display()))?;
        BufReader::new(file)
            .read_to_string(&mut raw)
            .with_context(|| format!("Failed to read {}", input.display()))?;
    }

    serde_json::from_str(&raw).context("Request is not a valid predict request")
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<&Path>, pretty: bool) -> Result<()> {
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };
    let mut writer = BufWriter::new(writer);

    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "naive_forecast=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Predict {
            input,
            output,
            strategy,
            method,
            pretty,
        } => {
            let mut config = EngineConfig::from_env();
            if let Some(strategy) = strategy {
                config = config.with_strategy(strategy);
            }
            if let Some(method) = method {
                config = config.with_quantile_method(method);
            }

            let service = ForecastService::new(&config);
            let request = read_request(&input)?;
            let response = service
                .predict(request)
                .map_err(|e| anyhow::anyhow!("{} ({:?})", e, e.kind()))?;
            write_json(&response, output.as_deref(), pretty)?;
        }
        Commands::Health => {
            let service = ForecastService::new(&EngineConfig::from_env());
            write_json(&service.health(), None, false)?;
        }
    }

    Ok(())
}
