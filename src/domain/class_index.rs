// ============================================================
// Layer 3 — Class Index Mapping
// ============================================================
// A bijection between class names and contiguous integer
// labels [0, C). Labels are handed out in the order the names
// are first seen in the data, so "Iris-setosa" in the first row
// becomes 0, the next new name becomes 1, and so on.
//
// The mapping is built once from the whole table before the
// split and is then shared by the train and test sets.

use std::collections::HashMap;

use crate::domain::error::{PipelineError, Result};

#[derive(Debug, Clone, Default)]
pub struct ClassIndex {
    names:  Vec<String>,
    lookup: HashMap<String, usize>,
}

impl ClassIndex {
    /// Build the mapping from class names in first-encountered order.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut index = Self::default();
        for name in names {
            if !index.lookup.contains_key(name) {
                index.lookup.insert(name.to_string(), index.names.len());
                index.names.push(name.to_string());
            }
        }
        index
    }

    pub fn label_of(&self, name: &str) -> Result<usize> {
        self.lookup
            .get(name)
            .copied()
            .ok_or_else(|| PipelineError::data(format!("unknown class '{name}'")))
    }

    /// Class names ordered by label: `names()[i]` is the class with label `i`.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_follow_first_seen_order() {
        let index = ClassIndex::from_names(["b", "a", "b", "c", "a"]);
        assert_eq!(index.names(), &["b", "a", "c"]);
        assert_eq!(index.label_of("b").unwrap(), 0);
        assert_eq!(index.label_of("a").unwrap(), 1);
        assert_eq!(index.label_of("c").unwrap(), 2);
    }

    #[test]
    fn test_round_trip_name_and_label() {
        let index = ClassIndex::from_names(["setosa", "versicolor", "virginica"]);
        for (label, name) in index.names().iter().enumerate() {
            assert_eq!(index.label_of(name).unwrap(), label);
            assert_eq!(&index.names()[label], name);
        }
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_unknown_class_is_data_error() {
        let index = ClassIndex::from_names(["x"]);
        assert!(matches!(index.label_of("y").unwrap_err(), PipelineError::Data(_)));
    }
}
