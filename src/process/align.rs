use tracing::debug;

use super::dataset::Dataset;

/// First index whose value reaches `cutoff`.
pub fn threshold_index(series: &[f64], cutoff: f64) -> Option<usize> {
    series.iter().position(|&v| v >= cutoff)
}

/// Drop the days before `series` first reaches `cutoff`.
///
/// Returns the kept suffix and its offset. A series that never reaches the
/// cutoff is returned whole with offset 0.
pub fn align_to_threshold(mut series: Vec<f64>, cutoff: f64) -> (Vec<f64>, usize) {
    match threshold_index(&series, cutoff) {
        Some(idx) => {
            series.drain(..idx);
            (series, idx)
        }
        None => (series, 0),
    }
}

impl Dataset {
    /// Align every entity on its own threshold-crossing day and record the
    /// offsets in `cutoff`.
    pub fn align(&mut self, cutoff: f64) {
        for (name, series) in self.table.iter_mut() {
            let (aligned, offset) = align_to_threshold(std::mem::take(series), cutoff);
            if offset == 0 && threshold_index(&aligned, cutoff).is_none() {
                debug!(entity = %name, cutoff, "never reaches cutoff; kept unaligned");
            }
            *series = aligned;
            self.cutoff.insert(name.clone(), offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn test_align_truncates_at_crossing() {
        let (aligned, offset) = align_to_threshold(vec![0.0, 5.0, 50.0, 150.0, 300.0], 100.0);
        assert_eq!(aligned, vec![150.0, 300.0]);
        assert_eq!(offset, 3);
    }

    #[test]
    fn test_equal_to_cutoff_counts_as_crossing() {
        let (aligned, offset) = align_to_threshold(vec![10.0, 100.0, 120.0], 100.0);
        assert_eq!(aligned, vec![100.0, 120.0]);
        assert_eq!(offset, 1);
    }

    #[test]
    fn test_never_reaching_cutoff_keeps_series() {
        let (aligned, offset) = align_to_threshold(vec![0.0, 1.0, 2.0], 100.0);
        assert_eq!(aligned, vec![0.0, 1.0, 2.0]);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert_eq!(align_to_threshold(vec![], 100.0), (vec![], 0));
        assert_eq!(align_to_threshold(vec![0.0, 200.0], 100.0), (vec![200.0], 1));
    }

    #[test]
    fn test_dataset_align_records_every_offset() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 22).unwrap();
        let mut ds = Dataset::new(
            start,
            start,
            HashMap::from([
                ("France".to_string(), vec![0.0, 5.0, 50.0, 150.0, 300.0]),
                ("Spain".to_string(), vec![0.0, 1.0, 2.0, 3.0, 4.0]),
            ]),
        );
        ds.align(100.0);
        assert_eq!(ds.series("France").unwrap(), &[150.0, 300.0]);
        assert_eq!(ds.offset("France"), Some(3));
        assert_eq!(ds.series("Spain").unwrap().len(), 5);
        assert_eq!(ds.offset("Spain"), Some(0));
        assert_eq!(ds.day_zero("France"), NaiveDate::from_ymd_opt(2020, 1, 25));
    }

    proptest! {
        #[test]
        fn prop_offset_plus_len_is_input_len(
            xs in proptest::collection::vec(0u32..1_000, 0..64),
            cutoff in 0u32..1_200,
        ) {
            let input: Vec<f64> = xs.iter().map(|&x| x as f64).collect();
            let (aligned, offset) = align_to_threshold(input.clone(), cutoff as f64);
            prop_assert_eq!(offset + aligned.len(), input.len());
            prop_assert_eq!(&aligned[..], &input[offset..]);
        }

        #[test]
        fn prop_crossing_starts_aligned_series(
            xs in proptest::collection::vec(0u32..1_000, 0..64),
            cutoff in 0u32..1_200,
        ) {
            let input: Vec<f64> = xs.iter().map(|&x| x as f64).collect();
            let cutoff = cutoff as f64;
            let (aligned, offset) = align_to_threshold(input.clone(), cutoff);
            if input.iter().any(|&v| v >= cutoff) {
                prop_assert!(aligned[0] >= cutoff);
                prop_assert!(input[..offset].iter().all(|&v| v < cutoff));
            } else {
                prop_assert_eq!(offset, 0);
                prop_assert_eq!(aligned, input);
            }
        }
    }
}
