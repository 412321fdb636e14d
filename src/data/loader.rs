// ============================================================
// Layer 4 — CSV Loader
// ============================================================
// Reads the Iris table from a CSV file with one header row.
//
// Schema handling:
//   - the target column (e.g. "Species") holds class names
//   - the identifier column (e.g. "Id") is dropped if present
//   - every other column is a numeric feature, kept in file order
//
// The csv crate rejects rows whose cell count differs from the
// header, so ragged rows surface as a DataError with the line
// number. Empty cells and non-numeric values do the same.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use std::{fs::File, path::PathBuf};

use csv::ReaderBuilder;

use crate::domain::error::{PipelineError, Result};
use crate::domain::sample::RawRow;
use crate::domain::traits::{RawTable, RowSource};

/// Loads a tabular file with a categorical target column.
/// Implements the RowSource trait from Layer 3.
pub struct CsvLoader {
    path:          PathBuf,
    target_column: String,
    id_column:     String,
}

impl CsvLoader {
    pub fn new(
        path:          impl Into<PathBuf>,
        target_column: impl Into<String>,
        id_column:     impl Into<String>,
    ) -> Self {
        Self {
            path:          path.into(),
            target_column: target_column.into(),
            id_column:     id_column.into(),
        }
    }
}

impl RowSource for CsvLoader {
    fn load_table(&self) -> Result<RawTable> {
        let file = File::open(&self.path).map_err(|e| {
            PipelineError::data(format!("cannot open '{}': {e}", self.path.display()))
        })?;

        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

        let headers = rdr
            .headers()
            .map_err(|e| PipelineError::data(format!("cannot read header row: {e}")))?
            .clone();

        let target_idx = headers
            .iter()
            .position(|h| h.trim() == self.target_column)
            .ok_or_else(|| {
                PipelineError::data(format!(
                    "required column '{}' not found in '{}'",
                    self.target_column,
                    self.path.display()
                ))
            })?;
        let id_idx = headers.iter().position(|h| h.trim() == self.id_column);

        // Everything that is neither the target nor the identifier is a feature
        let feature_cols: Vec<usize> = (0..headers.len())
            .filter(|&i| i != target_idx && Some(i) != id_idx)
            .collect();
        if feature_cols.is_empty() {
            return Err(PipelineError::data(format!(
                "'{}' has no feature columns",
                self.path.display()
            )));
        }
        let feature_names: Vec<String> = feature_cols
            .iter()
            .map(|&i| headers[i].trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| PipelineError::data(format!("CSV parse error: {e}")))?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            let mut features = Vec::with_capacity(feature_cols.len());
            for (&col, name) in feature_cols.iter().zip(&feature_names) {
                let cell = record[col].trim();
                let value: f64 = cell.parse().map_err(|_| {
                    PipelineError::data(format!(
                        "line {line}: column '{name}' is not numeric ('{cell}')"
                    ))
                })?;
                features.push(value);
            }

            let class = record[target_idx].trim();
            if class.is_empty() {
                return Err(PipelineError::data(format!(
                    "line {line}: empty '{}' value",
                    self.target_column
                )));
            }
            rows.push(RawRow::new(features, class));
        }

        if rows.is_empty() {
            return Err(PipelineError::data(format!(
                "'{}' contains no data rows",
                self.path.display()
            )));
        }

        let table = RawTable { feature_names, rows };
        tracing::info!(
            "Loaded {} rows with {} features from '{}'",
            table.rows.len(),
            table.feature_count(),
            self.path.display()
        );
        Ok(table)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("iris_loader_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn loader(path: PathBuf) -> CsvLoader {
        CsvLoader::new(path, "Species", "Id")
    }

    #[test]
    fn test_drops_id_and_splits_target() {
        let path = write_csv(
            "ok.csv",
            "Id,SepalLengthCm,SepalWidthCm,Species\n\
             1,5.1,3.5,Iris-setosa\n\
             2,7.0,3.2,Iris-versicolor\n",
        );
        let table = loader(path).load_table().unwrap();
        assert_eq!(table.feature_names, vec!["SepalLengthCm", "SepalWidthCm"]);
        assert_eq!(table.feature_count(), 2);
        assert_eq!(table.rows[0], RawRow::new(vec![5.1, 3.5], "Iris-setosa"));
        assert_eq!(table.rows[1].class, "Iris-versicolor");
    }

    #[test]
    fn test_missing_file_is_data_error() {
        let path = std::env::temp_dir().join("definitely_not_here_iris.csv");
        let err = loader(path).load_table().unwrap_err();
        assert!(matches!(err, PipelineError::Data(_)));
    }

    #[test]
    fn test_missing_target_column_is_data_error() {
        let path = write_csv("no_target.csv", "Id,a,b\n1,1.0,2.0\n");
        let err = loader(path).load_table().unwrap_err();
        assert!(matches!(err, PipelineError::Data(_)));
        assert!(err.to_string().contains("Species"));
    }

    #[test]
    fn test_non_numeric_feature_is_data_error() {
        let path = write_csv("bad_cell.csv", "Id,a,Species\n1,abc,x\n");
        let err = loader(path).load_table().unwrap_err();
        assert!(matches!(err, PipelineError::Data(_)));
    }

    #[test]
    fn test_ragged_row_is_data_error() {
        let path = write_csv("ragged.csv", "Id,a,Species\n1,1.0\n");
        assert!(matches!(loader(path).load_table().unwrap_err(), PipelineError::Data(_)));
    }

    #[test]
    fn test_header_only_is_data_error() {
        let path = write_csv("empty.csv", "Id,a,Species\n");
        assert!(matches!(loader(path).load_table().unwrap_err(), PipelineError::Data(_)));
    }
}
