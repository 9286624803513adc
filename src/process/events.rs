use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use super::dataset::Dataset;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Position of `event` on an entity's "days since cutoff" axis.
///
/// Day 0 is midnight of `start + offset` days. Events carrying a time of day
/// land on fractional positions; events before day 0 are negative.
pub fn project_event(event: NaiveDateTime, start: NaiveDate, offset: usize) -> f64 {
    let day_zero = start
        .checked_add_days(Days::new(offset as u64))
        .unwrap_or(NaiveDate::MAX);
    days_since(event, day_zero)
}

fn days_since(event: NaiveDateTime, day_zero: NaiveDate) -> f64 {
    (event - day_zero.and_time(NaiveTime::MIN)).num_seconds() as f64 / SECONDS_PER_DAY
}

impl Dataset {
    /// `None` when `entity` has not been aligned.
    pub fn project_event(&self, entity: &str, event: NaiveDateTime) -> Option<f64> {
        self.day_zero(entity).map(|day_zero| days_since(event, day_zero))
    }
}
