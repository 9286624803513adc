// src/schema/types.rs

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Layout of a source CSV. Every historical revision of the upstream data
/// falls into one of these two shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CsvSchema {
    /// One row per entity (or per sub-region of an entity), one column per day.
    /// The first `leading_columns` columns are metadata; the header cells after
    /// them are the dates.
    RowPerEntity {
        entity_column: usize,
        leading_columns: usize,
    },
    /// One row per day with its date in `date_column`; the header names the
    /// entity held in every other column.
    RowPerDay { date_column: usize },
}

impl CsvSchema {
    /// `Province/State,Country/Region,Lat,Long,1/22/20,...`
    pub const JHU_GLOBAL: CsvSchema = CsvSchema::RowPerEntity {
        entity_column: 1,
        leading_columns: 4,
    };

    /// Header slice holding the day dates of a row-per-entity file.
    ///
    /// Fails with `MalformedInput` for row-per-day schemas, or when the header
    /// has no column past the metadata block.
    pub fn day_columns<'h>(&self, header: &'h [String]) -> Result<&'h [String]> {
        match *self {
            CsvSchema::RowPerEntity {
                entity_column,
                leading_columns,
            } => {
                if entity_column >= leading_columns {
                    return Err(PipelineError::MalformedInput(format!(
                        "entity column {} lies outside the {} metadata columns",
                        entity_column, leading_columns
                    )));
                }
                if header.len() <= leading_columns {
                    return Err(PipelineError::MalformedInput(format!(
                        "header has {} columns, expected more than {}",
                        header.len(),
                        leading_columns
                    )));
                }
                Ok(&header[leading_columns..])
            }
            CsvSchema::RowPerDay { .. } => Err(PipelineError::MalformedInput(
                "row-per-day files have no day columns".into(),
            )),
        }
    }
}

impl Default for CsvSchema {
    fn default() -> Self {
        CsvSchema::JHU_GLOBAL
    }
}
