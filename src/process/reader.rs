use csv::{ReaderBuilder, StringRecordsIntoIter};
use std::io::Read;

use crate::error::{PipelineError, Result};

/// Header plus a lazy stream of rows over any byte source.
///
/// The underlying reader is owned here, so it is released as soon as the
/// `SchemaReader` is dropped, whether the rows were drained or not.
pub struct SchemaReader<R: Read> {
    header: Vec<String>,
    records: StringRecordsIntoIter<R>,
}

impl<R: Read> SchemaReader<R> {
    pub fn new(input: R) -> Result<Self> {
        // keep rigid record lengths: a ragged row is malformed input
        let mut records = ReaderBuilder::new()
            .has_headers(false)
            .from_reader(input)
            .into_records();

        let header = match records.next() {
            Some(rec) => rec
                .map_err(|e| {
                    PipelineError::MalformedInput(format!("could not read CSV header: {}", e))
                })?
                .iter()
                .map(|s| s.trim().to_string())
                .collect(),
            None => {
                return Err(PipelineError::MalformedInput(
                    "could not read CSV header: empty input".into(),
                ))
            }
        };

        Ok(Self { header, records })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }
}

impl<R: Read> Iterator for SchemaReader<R> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next().map(|rec| {
            rec.map(|r| r.iter().map(str::to_string).collect())
                .map_err(PipelineError::from)
        })
    }
}

/// Parse one observation cell. Blank cells count as zero.
pub fn parse_cell(cell: &str) -> Result<f64> {
    let s = cell.trim();
    if s.is_empty() {
        return Ok(0.0);
    }
    let v: f64 = s
        .parse()
        .map_err(|e| PipelineError::MalformedInput(format!("could not parse {:?}: {}", cell, e)))?;
    if !v.is_finite() || v < 0.0 {
        return Err(PipelineError::MalformedInput(format!(
            "{:?} is not a non-negative count",
            cell
        )));
    }
    Ok(v)
}

/// Parse a run of cells, stopping at the first bad one.
pub fn parse_cells<S: AsRef<str>>(cells: &[S]) -> Result<Vec<f64>> {
    cells.iter().map(|c| parse_cell(c.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_rows() {
        let data = "Province,Country,Lat,Long,1/22/20,1/23/20\n,France,46.2,2.2,0,1\n\"Hubei\",China,30.9,112.2,444,444\n";
        let mut rdr = SchemaReader::new(data.as_bytes()).unwrap();
        assert_eq!(rdr.header().len(), 6);
        assert_eq!(rdr.header()[4], "1/22/20");

        let first = rdr.next().unwrap().unwrap();
        assert_eq!(first[1], "France");
        let second = rdr.next().unwrap().unwrap();
        assert_eq!(second[0], "Hubei");
        assert!(rdr.next().is_none());
    }

    #[test]
    fn test_quoted_entity_names_keep_commas() {
        let data = "Province,Country,Lat,Long,1/22/20\n,\"Korea, South\",36,128,1\n";
        let mut rdr = SchemaReader::new(data.as_bytes()).unwrap();
        let row = rdr.next().unwrap().unwrap();
        assert_eq!(row[1], "Korea, South");
    }

    #[test]
    fn test_empty_input_has_no_header() {
        let err = SchemaReader::new("".as_bytes()).err().unwrap();
        assert!(matches!(err, PipelineError::MalformedInput(_)));
    }

    #[test]
    fn test_ragged_row_is_malformed() {
        let data = "a,b,c\n1,2\n";
        let mut rdr = SchemaReader::new(data.as_bytes()).unwrap();
        assert!(matches!(
            rdr.next().unwrap(),
            Err(PipelineError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("").unwrap(), 0.0);
        assert_eq!(parse_cell("  ").unwrap(), 0.0);
        assert_eq!(parse_cell("42").unwrap(), 42.0);
        assert_eq!(parse_cell("1.5").unwrap(), 1.5);
        assert!(matches!(
            parse_cell("abc"),
            Err(PipelineError::MalformedInput(_))
        ));
        assert!(matches!(
            parse_cell("-3"),
            Err(PipelineError::MalformedInput(_))
        ));
        assert!(matches!(
            parse_cell("NaN"),
            Err(PipelineError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_parse_cells_blank_is_zero() {
        let cells = vec!["1".to_string(), "".to_string(), "3".to_string()];
        assert_eq!(parse_cells(&cells).unwrap(), vec![1.0, 0.0, 3.0]);
    }
}
