//! Labelled diabetes dataset.
//!
//! The CSV must have a header row containing the eight feature columns and `Outcome`. Columns
//! are looked up by name, so their order in the file does not matter and extra columns are
//! ignored.

use crate::constants::{FEATURE_COUNT, FEATURE_NAMES, OUTCOME_COLUMN};
use crate::{PredictorError, PredictorResult};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::Read;
use std::path::Path;

/// Feature rows and their 0/1 outcomes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    pub features: Vec<[f64; FEATURE_COUNT]>,
    pub labels: Vec<u8>,
}

/// Train/test partition of a dataset.
#[derive(Debug)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

impl Dataset {
    /// Load a dataset from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, a required column is missing, a cell is
    /// not numeric, an outcome is not 0/1, or the file has no data rows.
    pub fn load_csv(path: &Path) -> PredictorResult<Self> {
        let file = std::fs::File::open(path).map_err(|source| PredictorError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Parse a dataset from any CSV source.
    pub fn from_reader<R: Read>(reader: R) -> PredictorResult<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader.headers()?.clone();

        let column = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(PredictorError::MissingColumn(name))
        };
        let mut feature_columns = [0usize; FEATURE_COUNT];
        for (slot, name) in feature_columns.iter_mut().zip(FEATURE_NAMES) {
            *slot = column(name)?;
        }
        let outcome_column = column(OUTCOME_COLUMN)?;

        let mut dataset = Dataset::default();
        for (i, result) in reader.records().enumerate() {
            let record = result?;
            // Header is line 1.
            let row = i + 2;

            let mut features = [0.0; FEATURE_COUNT];
            for ((value, &idx), name) in features.iter_mut().zip(&feature_columns).zip(FEATURE_NAMES)
            {
                *value = parse_cell(&record, idx, row, name)?;
            }

            let outcome = parse_cell(&record, outcome_column, row, OUTCOME_COLUMN)?;
            let label = match outcome {
                o if o == 0.0 => 0,
                o if o == 1.0 => 1,
                _ => {
                    return Err(PredictorError::InvalidCell {
                        row,
                        column: OUTCOME_COLUMN,
                        value: record.get(outcome_column).unwrap_or_default().to_string(),
                    })
                }
            };

            dataset.features.push(features);
            dataset.labels.push(label);
        }

        if dataset.is_empty() {
            return Err(PredictorError::EmptyDataset);
        }

        Ok(dataset)
    }

    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of rows labelled diabetic.
    pub fn positive_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l == 1).count()
    }

    /// Shuffle with a fixed seed and hold out `test_ratio` of the rows.
    pub fn train_test_split(&self, test_ratio: f64, seed: u64) -> Split {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let n = self.n_samples();

        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut rng);

        let test_size = ((test_ratio.clamp(0.0, 1.0) * n as f64).ceil() as usize).min(n);
        let (test_indices, train_indices) = indices.split_at(test_size);

        Split {
            train: self.subset(train_indices),
            test: self.subset(test_indices),
        }
    }

    /// Create a subset of the dataset by indices.
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: indices.iter().map(|&i| self.features[i]).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}

fn parse_cell(
    record: &csv::StringRecord,
    idx: usize,
    row: usize,
    column: &'static str,
) -> PredictorResult<f64> {
    let raw = record.get(idx).unwrap_or_default();
    raw.trim()
        .parse()
        .map_err(|_| PredictorError::InvalidCell {
            row,
            column,
            value: raw.to_string(),
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE_CSV: &str = "\
Pregnancies,Glucose,BloodPressure,SkinThickness,Insulin,BMI,DiabetesPedigreeFunction,Age,Outcome
6,148,72,35,0,33.6,0.627,50,1
1,85,66,29,0,26.6,0.351,31,0
8,183,64,0,0,23.3,0.672,32,1
1,89,66,23,94,28.1,0.167,21,0
0,137,40,35,168,43.1,2.288,33,1
5,116,74,0,0,25.6,0.201,30,0
3,78,50,32,88,31,0.248,26,1
10,115,0,0,0,35.3,0.134,29,0
2,197,70,45,543,30.5,0.158,53,1
8,125,96,0,0,0,0.232,54,1
";

    #[test]
    fn loads_sample_rows() {
        let dataset = Dataset::from_reader(SAMPLE_CSV.as_bytes()).expect("sample parses");
        assert_eq!(dataset.n_samples(), 10);
        assert_eq!(dataset.positive_count(), 6);
        assert_eq!(
            dataset.features[1],
            [1.0, 85.0, 66.0, 29.0, 0.0, 26.6, 0.351, 31.0]
        );
    }

    #[test]
    fn columns_are_matched_by_name() {
        let csv = "Outcome,Age,BMI,Glucose,Pregnancies,Insulin,SkinThickness,BloodPressure,DiabetesPedigreeFunction\n\
                   1,50,33.6,148,6,0,35,72,0.627\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).expect("reordered columns parse");
        assert_eq!(
            dataset.features[0],
            [6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0]
        );
        assert_eq!(dataset.labels, vec![1]);
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "Pregnancies,Glucose,BloodPressure,SkinThickness,Insulin,BMI,Age,Outcome\n1,2,3,4,5,6,7,0\n";
        let err = Dataset::from_reader(csv.as_bytes()).expect_err("pedigree column missing");
        assert!(matches!(
            err,
            PredictorError::MissingColumn("DiabetesPedigreeFunction")
        ));
    }

    #[test]
    fn bad_cell_names_row_and_column() {
        let csv = SAMPLE_CSV.replace("6,148,72", "6,abc,72");
        let err = Dataset::from_reader(csv.as_bytes()).expect_err("bad glucose");
        match err {
            PredictorError::InvalidCell { row, column, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Glucose");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_binary_outcome_is_rejected() {
        let csv = SAMPLE_CSV.replace("0.627,50,1", "0.627,50,2");
        assert!(Dataset::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn header_only_is_empty() {
        let header = SAMPLE_CSV.lines().next().unwrap_or_default();
        let err = Dataset::from_reader(header.as_bytes()).expect_err("no rows");
        assert!(matches!(err, PredictorError::EmptyDataset));
    }

    #[test]
    fn split_is_seeded_and_partitions_rows() {
        let dataset = Dataset::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let a = dataset.train_test_split(0.3, 0);
        let b = dataset.train_test_split(0.3, 0);

        assert_eq!(a.test.n_samples(), 3);
        assert_eq!(a.train.n_samples(), 7);
        assert_eq!(a.test, b.test);
        assert_eq!(a.train, b.train);
    }

    #[test]
    fn load_csv_reports_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Dataset::load_csv(&dir.path().join("nope.csv")).expect_err("missing file");
        assert!(matches!(err, PredictorError::FileRead { .. }));
    }
}
