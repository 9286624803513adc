use std::collections::HashSet;

use crate::error::{PipelineError, Result};

/// Fixed allow-list of entity names, in display order.
#[derive(Debug, Clone)]
pub struct EntityFilter {
    ordered: Vec<String>,
    known: HashSet<String>,
}

impl EntityFilter {
    pub fn new<I, S>(entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered = Vec::new();
        let mut known = HashSet::new();
        for name in entities {
            let name = name.into();
            if known.insert(name.clone()) {
                ordered.push(name);
            }
        }
        Self { ordered, known }
    }

    pub fn entities(&self) -> &[String] {
        &self.ordered
    }

    /// Row-oriented sources: anything not allow-listed is skipped.
    pub fn contains(&self, name: &str) -> bool {
        self.known.contains(name)
    }

    /// Column-oriented sources: map each allow-listed name to its header
    /// column, in allow-list order. Every name must be present.
    pub fn resolve_columns(&self, header: &[String]) -> Result<Vec<(String, usize)>> {
        self.ordered
            .iter()
            .map(|name| {
                header
                    .iter()
                    .position(|col| col == name)
                    .map(|idx| (name.clone(), idx))
                    .ok_or_else(|| PipelineError::UnknownEntity(name.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_contains() {
        let f = EntityFilter::new(["France", "Italy"]);
        assert!(f.contains("France"));
        assert!(!f.contains("Narnia"));
        assert!(!f.contains("france"));
    }

    #[test]
    fn test_duplicates_collapse() {
        let f = EntityFilter::new(["France", "Italy", "France"]);
        assert_eq!(f.entities(), &["France".to_string(), "Italy".to_string()]);
    }

    #[test]
    fn test_resolve_columns_in_allow_list_order() {
        let f = EntityFilter::new(["Italy", "France"]);
        let cols = f
            .resolve_columns(&header(&["date", "France", "Spain", "Italy"]))
            .unwrap();
        assert_eq!(
            cols,
            vec![("Italy".to_string(), 3), ("France".to_string(), 1)]
        );
    }

    #[test]
    fn test_resolve_columns_fails_fast_on_missing_entity() {
        let f = EntityFilter::new(["France", "United Kingdom"]);
        let err = f
            .resolve_columns(&header(&["date", "France", "Italy"]))
            .unwrap_err();
        match err {
            PipelineError::UnknownEntity(name) => assert_eq!(name, "United Kingdom"),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
