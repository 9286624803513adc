use anyhow::{Context, Result};
use covidcurves::{server, Config, Reporter};
use std::{env, sync::Arc};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .init();

    // ─── 2) load + validate config ───────────────────────────────────
    let config = Config::from_env().context("loading config")?;
    info!(
        entities = config.entities.len(),
        metrics = config.metrics.len(),
        source = %config.source,
        "config ready"
    );

    let reporter = Arc::new(Reporter::new(config).context("building reporter")?);

    // ─── 3) serve ────────────────────────────────────────────────────
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    info!("ready to serve on port {}", port);
    warp::serve(server::routes(reporter))
        .run(([0, 0, 0, 0], port))
        .await;

    Ok(())
}
