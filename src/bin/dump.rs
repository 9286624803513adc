//! Fetch one metric and print its chart view as JSON.
//!
//! Usage: covidcurves-dump <METRIC> [--dataset]

use anyhow::{bail, Context, Result};
use covidcurves::{Config, Reporter};
use std::env;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let Some(metric) = args.next() else {
        bail!("usage: covidcurves-dump <METRIC> [--dataset]");
    };
    let raw = args.next().as_deref() == Some("--dataset");

    let config = Config::from_env().context("loading config")?;
    let reporter = Reporter::new(config)?;

    let json = if raw {
        let dataset = reporter
            .dataset(&metric)
            .await
            .with_context(|| format!("building dataset for {}", metric))?;
        serde_json::to_string_pretty(&dataset)?
    } else {
        let view = reporter
            .chart(&metric)
            .await
            .with_context(|| format!("building chart for {}", metric))?;
        serde_json::to_string_pretty(&view)?
    };
    println!("{}", json);
    Ok(())
}
