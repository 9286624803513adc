use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Normalized per-entity series for one metric, built fresh for every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    /// Day of the most recent observation.
    pub date: NaiveDate,
    /// Day of index 0 of every unaligned series.
    pub start: NaiveDate,
    pub table: HashMap<String, Vec<f64>>,
    /// Day offset from `start` at which each entity reached the cutoff.
    pub cutoff: HashMap<String, usize>,
}

impl Dataset {
    pub fn new(start: NaiveDate, date: NaiveDate, table: HashMap<String, Vec<f64>>) -> Self {
        Self {
            date,
            start,
            cutoff: HashMap::with_capacity(table.len()),
            table,
        }
    }

    pub fn series(&self, entity: &str) -> Option<&[f64]> {
        self.table.get(entity).map(Vec::as_slice)
    }

    pub fn offset(&self, entity: &str) -> Option<usize> {
        self.cutoff.get(entity).copied()
    }

    /// Calendar day of index 0 in `entity`'s (aligned) series.
    pub fn day_zero(&self, entity: &str) -> Option<NaiveDate> {
        let offset = self.offset(entity)?;
        self.start
            .checked_add_days(chrono::Days::new(offset as u64))
    }
}
