// src/config.rs

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{collections::BTreeMap, env, fs, path::Path, time::Duration};
use tracing::info;

use crate::fetch;
use crate::process::{corrections::CorrectionTable, date_parser};
use crate::schema::CsvSchema;

/// Environment variable naming a YAML config file.
pub const CONFIG_ENV: &str = "COVIDCURVES_CONFIG";

const JHU_SOURCE: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_{metric}_global.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// URL template; `{metric}` is replaced by the metric name.
    pub source: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub schema: CsvSchema,
    #[serde(default = "date_parser::default_layouts")]
    pub date_layouts: Vec<String>,
    pub entities: Vec<String>,
    pub metrics: Vec<MetricConfig>,
    #[serde(default)]
    pub events: BTreeMap<String, EventDate>,
    #[serde(default = "default_event_label")]
    pub event_label: String,
    #[serde(default)]
    pub corrections: CorrectionTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricConfig {
    pub name: String,
    /// Cumulative count that defines day 0.
    pub cutoff: f64,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_event_label() -> String {
    "lockdown".to_string()
}

impl Default for Config {
    fn default() -> Self {
        let events = [
            // lockdown of the northern regions
            ("Italy", 2020, 2, 27),
            ("France", 2020, 3, 17),
            ("United Kingdom", 2020, 3, 23),
        ]
        .into_iter()
        .filter_map(|(name, y, m, d)| {
            NaiveDate::from_ymd_opt(y, m, d).map(|day| (name.to_string(), EventDate::from(day)))
        })
        .collect();

        Self {
            source: JHU_SOURCE.to_string(),
            timeout_secs: default_timeout_secs(),
            schema: CsvSchema::JHU_GLOBAL,
            date_layouts: date_parser::default_layouts(),
            entities: ["France", "Italy", "Spain", "Germany", "US", "United Kingdom"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            metrics: vec![
                MetricConfig {
                    name: "confirmed".into(),
                    cutoff: 100.0,
                },
                MetricConfig {
                    name: "deaths".into(),
                    cutoff: 10.0,
                },
            ],
            events,
            event_label: default_event_label(),
            corrections: CorrectionTable::jhu_global(),
        }
    }
}

impl Config {
    /// Read and validate a YAML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
        let cfg: Config =
            serde_yaml::from_str(&text).with_context(|| format!("parsing {:?}", path))?;
        cfg.validate()
            .with_context(|| format!("validating {:?}", path))?;
        Ok(cfg)
    }

    /// `$COVIDCURVES_CONFIG` if set, the built-in deployment otherwise.
    pub fn from_env() -> Result<Self> {
        match env::var(CONFIG_ENV) {
            Ok(path) => {
                info!(%path, "loading config");
                Self::load(path)
            }
            Err(_) => {
                info!("using built-in config");
                let cfg = Self::default();
                cfg.validate()?;
                Ok(cfg)
            }
        }
    }

    /// Catch configuration bugs at startup rather than on the first request.
    pub fn validate(&self) -> Result<()> {
        if self.entities.is_empty() {
            bail!("no entities configured");
        }
        if self.metrics.is_empty() {
            bail!("no metrics configured");
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be positive");
        }
        if self.date_layouts.is_empty() {
            bail!("no date layouts configured");
        }
        if !self.source.contains("{metric}") {
            bail!("source {:?} has no {{metric}} placeholder", self.source);
        }
        for m in &self.metrics {
            fetch::source_url(&self.source, &m.name)
                .with_context(|| format!("metric {:?}: bad source URL", m.name))?;
            if !(m.cutoff.is_finite() && m.cutoff >= 0.0) {
                bail!("metric {:?}: cutoff must be a non-negative number", m.name);
            }
            self.corrections
                .corrections_for(&m.name)
                .with_context(|| format!("metric {:?} has no correction table", m.name))?;
        }
        for name in self.events.keys() {
            if !self.entities.contains(name) {
                bail!("event configured for {:?}, which is not an entity", name);
            }
        }
        Ok(())
    }

    pub fn metric(&self, name: &str) -> Option<&MetricConfig> {
        self.metrics.iter().find(|m| m.name.eq_ignore_ascii_case(name))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Absolute event timestamp, written as `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EventDate(pub NaiveDateTime);

impl EventDate {
    const DATETIME_LAYOUTS: &'static [&'static str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::DATETIME_LAYOUTS
            .iter()
            .find_map(|layout| NaiveDateTime::parse_from_str(s, layout).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .map(|d| d.and_time(NaiveTime::MIN))
            })
            .map(EventDate)
    }
}

impl From<NaiveDate> for EventDate {
    fn from(day: NaiveDate) -> Self {
        EventDate(day.and_time(NaiveTime::MIN))
    }
}

impl Serialize for EventDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0.format("%Y-%m-%dT%H:%M:%S"))
    }
}

impl<'de> Deserialize<'de> for EventDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        EventDate::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid event date {:?}", s)))
    }
}
