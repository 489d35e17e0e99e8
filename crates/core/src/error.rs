#[derive(Debug, thiserror::Error)]
pub enum PredictorError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid value for {field}: {value:?}")]
    FieldParse { field: &'static str, value: String },

    #[error("failed to read file {path}: {source}", path = path.display())]
    FileRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path}: {source}", path = path.display())]
    FileWrite {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is missing column {0}")]
    MissingColumn(&'static str),
    #[error("dataset row {row}: invalid value {value:?} in column {column}")]
    InvalidCell {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("dataset contains no rows")]
    EmptyDataset,

    #[error("failed to serialize model: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize model: {0}")]
    Deserialization(serde_json::Error),
    #[error("model features {found:?} do not match expected features")]
    FeatureMismatch { found: Vec<String> },
    #[error("model is corrupt: {0}")]
    CorruptModel(String),
    #[error("model has not been fitted")]
    UnfittedModel,

    #[error("classifier is not loaded")]
    ClassifierUnavailable,
}

pub type PredictorResult<T> = std::result::Result<T, PredictorError>;
