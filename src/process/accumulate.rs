use std::collections::HashMap;

use crate::error::{PipelineError, Result};

/// Per-entity running sequences, one slot per day.
#[derive(Debug, Clone, Default)]
pub struct SeriesAccumulator {
    table: HashMap<String, Vec<f64>>,
}

impl SeriesAccumulator {
    /// Row-per-entity sources: every entity starts as `days` zeros, so an
    /// entity that never shows up still has a full-length sequence.
    pub fn zeroed(entities: &[String], days: usize) -> Self {
        let table = entities
            .iter()
            .map(|name| (name.clone(), vec![0.0; days]))
            .collect();
        Self { table }
    }

    /// Row-per-day sources: sequences grow one day at a time.
    pub fn empty(entities: &[String]) -> Self {
        let table = entities
            .iter()
            .map(|name| (name.clone(), Vec::new()))
            .collect();
        Self { table }
    }

    /// Element-wise add one row into `name`'s sequence. Several rows for the
    /// same entity (one per province, say) are summed.
    pub fn add_row(&mut self, name: &str, values: &[f64]) -> Result<()> {
        let series = self.series_mut(name)?;
        if series.len() != values.len() {
            return Err(PipelineError::MalformedInput(format!(
                "row for {:?} has {} values, expected {}",
                name,
                values.len(),
                series.len()
            )));
        }
        for (acc, v) in series.iter_mut().zip(values) {
            *acc += v;
        }
        Ok(())
    }

    /// Append the next day's value for `name`.
    pub fn push_day(&mut self, name: &str, value: f64) -> Result<()> {
        self.series_mut(name)?.push(value);
        Ok(())
    }

    pub fn into_table(self) -> HashMap<String, Vec<f64>> {
        self.table
    }

    fn series_mut(&mut self, name: &str) -> Result<&mut Vec<f64>> {
        self.table
            .get_mut(name)
            .ok_or_else(|| PipelineError::UnknownEntity(name.to_string()))
    }
}
