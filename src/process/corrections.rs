//! Hand-maintained overrides for known-bad upstream data points.
//!
//! Tables are keyed by metric name (case-insensitive). A metric with nothing
//! to correct still needs an explicit empty entry; an unknown metric is a
//! configuration error.
//!
//! Indices address the *aligned* sequence: index 0 is the day the entity
//! first reached the metric's cutoff.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub entity: String,
    pub index: usize,
    pub value: f64,
    /// Calendar day the corrected value belongs to, kept as the citation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Correction {
    pub fn new(entity: &str, index: usize, value: f64) -> Self {
        Self {
            entity: entity.to_string(),
            index,
            value,
            date: None,
            note: None,
        }
    }

    fn on(mut self, y: i32, m: u32, d: u32) -> Self {
        self.date = NaiveDate::from_ymd_opt(y, m, d);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrectionTable {
    tables: BTreeMap<String, Vec<Correction>>,
}

impl CorrectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, metric: &str, corrections: Vec<Correction>) {
        self.tables.insert(metric.to_lowercase(), corrections);
    }

    pub fn with(mut self, metric: &str, corrections: Vec<Correction>) -> Self {
        self.insert(metric, corrections);
        self
    }

    /// Corrections registered for `metric`; `UnsupportedMetric` when none are.
    pub fn corrections_for(&self, metric: &str) -> Result<&[Correction]> {
        self.tables
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(metric))
            .map(|(_, v)| v.as_slice())
            .ok_or_else(|| PipelineError::UnsupportedMetric(metric.to_string()))
    }

    /// Overwrite the listed positions. Returns how many values were written.
    ///
    /// Positions past the end of a (possibly short) aligned sequence and
    /// entities outside the table are skipped with a warning.
    pub fn apply(&self, metric: &str, table: &mut HashMap<String, Vec<f64>>) -> Result<usize> {
        let mut applied = 0;
        for c in self.corrections_for(metric)? {
            let Some(series) = table.get_mut(&c.entity) else {
                warn!(metric, entity = %c.entity, "correction for entity not in dataset");
                continue;
            };
            match series.get_mut(c.index) {
                Some(slot) => {
                    debug!(metric, entity = %c.entity, index = c.index, old = *slot, new = c.value, "correcting");
                    *slot = c.value;
                    applied += 1;
                }
                None => {
                    warn!(
                        metric,
                        entity = %c.entity,
                        index = c.index,
                        len = series.len(),
                        "correction index out of range"
                    );
                }
            }
        }
        Ok(applied)
    }

    /// Corrections for the JHU CSSE global time series, as checked by hand
    /// against Santé publique France figures.
    pub fn jhu_global() -> Self {
        let deaths = vec![
            Correction::new("France", 2, 30.0).on(2020, 3, 9),
            Correction::new("France", 10, 175.0).on(2020, 3, 17),
            Correction::new("France", 11, 244.0).on(2020, 3, 18),
            Correction::new("France", 12, 372.0).on(2020, 3, 19),
            // 2020-04-02 (index 26, 4503) looks like a spike but is correct:
            // it includes the nursing-home (EHPAD) death toll.
        ];
        let confirmed = [
            (35, 68605.0, 4),
            (36, 70478.0, 5),
            (37, 74390.0, 6),
            (38, 78167.0, 7),
            (39, 82048.0, 8),
            (40, 86344.0, 9),
            (41, 90676.0, 10),
            (42, 93790.0, 11),
            (43, 95403.0, 12),
            (44, 98076.0, 13),
            (45, 103573.0, 14),
            (46, 106206.0, 15),
            (47, 108847.0, 16),
            (48, 109252.0, 17),
            (49, 111821.0, 18),
            (50, 112606.0, 19),
            (51, 114657.0, 20),
            (52, 117324.0, 21),
        ]
        .into_iter()
        .map(|(idx, v, day)| Correction::new("France", idx, v).on(2020, 4, day))
        .collect();

        Self::new()
            .with("deaths", deaths)
            .with("confirmed", confirmed)
    }
}
