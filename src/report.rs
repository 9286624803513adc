// src/report.rs

use reqwest::Client;
use std::io::Cursor;
use std::time::Instant;
use tracing::{info, instrument};

use crate::config::{Config, MetricConfig};
use crate::error::{PipelineError, Result};
use crate::fetch;
use crate::process::{Dataset, Pipeline};
use crate::view::ChartView;

/// Fetch → pipeline → chart view, for one metric at a time.
///
/// Holds no per-request state: concurrent calls each fetch and build their
/// own `Dataset`.
pub struct Reporter {
    client: Client,
    config: Config,
    pipeline: Pipeline,
}

impl Reporter {
    pub fn new(config: Config) -> Result<Self> {
        let client = fetch::build_client(config.timeout())?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: Config) -> Self {
        let pipeline = Pipeline::from_config(&config);
        Self {
            client,
            config,
            pipeline,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn metric(&self, name: &str) -> Result<&MetricConfig> {
        self.config
            .metric(name)
            .ok_or_else(|| PipelineError::UnsupportedMetric(name.to_string()))
    }

    #[instrument(level = "info", skip(self))]
    pub async fn dataset(&self, metric: &str) -> Result<Dataset> {
        let m = self.metric(metric)?;
        let url = fetch::source_url(&self.config.source, &m.name)?;
        let start = Instant::now();
        let body = fetch::fetch_csv(&self.client, &url, self.config.timeout()).await?;
        let dataset = self.pipeline.run(Cursor::new(body), &m.name, m.cutoff)?;
        info!(elapsed = ?start.elapsed(), "{}: data for {:?}", m.name, dataset.date.format("%Y-%m-%d").to_string());
        Ok(dataset)
    }

    pub async fn chart(&self, metric: &str) -> Result<ChartView> {
        let m = self.metric(metric)?;
        let dataset = self.dataset(&m.name).await?;
        Ok(ChartView::build(
            &dataset,
            &m.name,
            m.cutoff,
            self.pipeline.entities(),
            &self.config.events,
            &self.config.event_label,
        ))
    }
}
