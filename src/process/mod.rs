// src/process/mod.rs
pub mod accumulate;
pub mod align;
pub mod corrections;
pub mod dataset;
pub mod date_parser;
pub mod delta;
pub mod events;
pub mod filter;
pub mod reader;

use std::io::Read;
use tracing::{debug, info, instrument, trace};

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::schema::CsvSchema;

pub use accumulate::SeriesAccumulator;
pub use align::{align_to_threshold, threshold_index};
pub use corrections::{Correction, CorrectionTable};
pub use dataset::Dataset;
pub use date_parser::{parse_date, DEFAULT_DATE_LAYOUTS};
pub use delta::daily_deltas;
pub use events::project_event;
pub use filter::EntityFilter;
pub use reader::{parse_cell, SchemaReader};

/// Reader → entity filter → accumulator → aligner → corrector.
///
/// Holds only configuration; every `run` builds its own `Dataset`, so one
/// `Pipeline` can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct Pipeline {
    filter: EntityFilter,
    schema: CsvSchema,
    layouts: Vec<String>,
    corrections: CorrectionTable,
}

impl Pipeline {
    pub fn new(
        filter: EntityFilter,
        schema: CsvSchema,
        layouts: Vec<String>,
        corrections: CorrectionTable,
    ) -> Self {
        Self {
            filter,
            schema,
            layouts,
            corrections,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            EntityFilter::new(cfg.entities.iter().cloned()),
            cfg.schema.clone(),
            cfg.date_layouts.clone(),
            cfg.corrections.clone(),
        )
    }

    pub fn entities(&self) -> &[String] {
        self.filter.entities()
    }

    /// Parse, align and correct one metric's CSV.
    #[instrument(level = "info", skip(self, input))]
    pub fn run<R: Read>(&self, input: R, metric: &str, cutoff: f64) -> Result<Dataset> {
        // an unknown metric is a config bug; reject it before touching the input
        self.corrections.corrections_for(metric)?;

        let reader = SchemaReader::new(input)?;
        let mut dataset = self.read_series(reader)?;
        dataset.align(cutoff);
        let applied = self.corrections.apply(metric, &mut dataset.table)?;

        info!(
            start = %dataset.start,
            date = %dataset.date,
            entities = dataset.table.len(),
            corrections = applied,
            "dataset ready"
        );
        Ok(dataset)
    }

    /// Unaligned, uncorrected per-entity series.
    pub fn read_series<R: Read>(&self, reader: SchemaReader<R>) -> Result<Dataset> {
        match self.schema {
            CsvSchema::RowPerEntity {
                entity_column,
                leading_columns,
            } => self.read_row_per_entity(reader, entity_column, leading_columns),
            CsvSchema::RowPerDay { date_column } => self.read_row_per_day(reader, date_column),
        }
    }

    fn read_row_per_entity<R: Read>(
        &self,
        reader: SchemaReader<R>,
        entity_column: usize,
        leading_columns: usize,
    ) -> Result<Dataset> {
        let (start, date, days) = {
            let days = self.schema.day_columns(reader.header())?;
            let start = parse_date(&days[0], &self.layouts)?;
            let date = parse_date(&days[days.len() - 1], &self.layouts)?;
            (start, date, days.len())
        };
        debug!(%start, %date, days, "row-per-entity header");

        let mut acc = SeriesAccumulator::zeroed(self.filter.entities(), days);
        let mut kept = 0usize;
        for (idx, row) in reader.enumerate() {
            let row = row?;
            let name = row[entity_column].trim();
            if !self.filter.contains(name) {
                trace!(row = idx, entity = name, "skipping entity");
                continue;
            }
            let values = reader::parse_cells(&row[leading_columns..])?;
            acc.add_row(name, &values)?;
            kept += 1;
        }
        debug!(kept, "rows accumulated");

        Ok(Dataset::new(start, date, acc.into_table()))
    }

    fn read_row_per_day<R: Read>(
        &self,
        reader: SchemaReader<R>,
        date_column: usize,
    ) -> Result<Dataset> {
        if date_column >= reader.header().len() {
            return Err(PipelineError::MalformedInput(format!(
                "date column {} missing from a {}-column header",
                date_column,
                reader.header().len()
            )));
        }
        let columns = self.filter.resolve_columns(reader.header())?;

        let mut acc = SeriesAccumulator::empty(self.filter.entities());
        let mut first = None;
        let mut last = None;
        for row in reader {
            let row = row?;
            let day = parse_date(&row[date_column], &self.layouts)?;
            first.get_or_insert(day);
            last = Some(day);
            for (name, col) in &columns {
                acc.push_day(name, parse_cell(&row[*col])?)?;
            }
        }

        match (first, last) {
            (Some(start), Some(date)) => Ok(Dataset::new(start, date, acc.into_table())),
            _ => Err(PipelineError::MalformedInput(
                "no data rows after header".into(),
            )),
        }
    }
}
