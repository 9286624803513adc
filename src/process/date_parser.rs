use chrono::NaiveDate;

use crate::error::{PipelineError, Result};

/// `1/2/06`, then `1/2/2006`, then ISO `2006-01-02`.
///
/// Order matters: `%Y` happily reads `20` as year 20, so the two-digit year
/// layout has to be tried first.
pub const DEFAULT_DATE_LAYOUTS: &[&str] = &["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d"];

pub fn default_layouts() -> Vec<String> {
    DEFAULT_DATE_LAYOUTS.iter().map(|s| s.to_string()).collect()
}

/// Parse `s` with the first layout that accepts it.
pub fn parse_date<S: AsRef<str>>(s: &str, layouts: &[S]) -> Result<NaiveDate> {
    let cleaned = s.trim().trim_matches('"');
    layouts
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(cleaned, layout.as_ref()).ok())
        .ok_or_else(|| PipelineError::DateParseFailure {
            input: s.to_string(),
            layouts: layouts.iter().map(|l| l.as_ref().to_string()).collect(),
        })
}
