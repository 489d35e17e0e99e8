//! Constants used throughout the predictor core crate.
//!
//! This module contains feature names, file defaults and result labels so the web service,
//! the trainer and the tests agree on one schema.

/// Form/CSV name of the pregnancy count feature.
pub const PREGNANCIES: &str = "Pregnancies";
/// Form/CSV name of the plasma glucose feature.
pub const GLUCOSE: &str = "Glucose";
/// Form/CSV name of the diastolic blood pressure feature.
pub const BLOOD_PRESSURE: &str = "BloodPressure";
/// Form/CSV name of the triceps skin fold feature.
pub const SKIN_THICKNESS: &str = "SkinThickness";
/// Form/CSV name of the serum insulin feature.
pub const INSULIN: &str = "Insulin";
/// Form/CSV name of the body mass index feature.
pub const BMI: &str = "BMI";
/// Form/CSV name of the diabetes pedigree function feature.
pub const DIABETES_PEDIGREE_FUNCTION: &str = "DiabetesPedigreeFunction";
/// Form/CSV name of the age feature.
pub const AGE: &str = "Age";

/// The eight model features, in the column order the classifier is trained on.
pub const FEATURE_NAMES: [&str; 8] = [
    PREGNANCIES,
    GLUCOSE,
    BLOOD_PRESSURE,
    SKIN_THICKNESS,
    INSULIN,
    BMI,
    DIABETES_PEDIGREE_FUNCTION,
    AGE,
];

/// Number of model features.
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// CSV label column holding the 0/1 outcome.
pub const OUTCOME_COLUMN: &str = "Outcome";

/// Default dataset location when no explicit path is configured.
pub const DEFAULT_DATASET_PATH: &str = "diabetes.csv";

/// Default model artifact location when no explicit path is configured.
pub const DEFAULT_MODEL_PATH: &str = "model.json";

/// Fraction of the dataset held out for evaluation by the trainer.
pub const DEFAULT_TEST_RATIO: f64 = 0.3;

/// Seed used for the train/test shuffle.
pub const DEFAULT_SPLIT_SEED: u64 = 0;

/// Number of trees grown by the trainer.
pub const DEFAULT_TREE_COUNT: usize = 200;

/// Dashboard type shown when no `diabetes_type` query parameter is given.
pub const DEFAULT_DASHBOARD_TYPE: &str = "Type 2";

/// Risk score at and above which the projection is `Moderate`.
pub const MODERATE_RISK_THRESHOLD: f64 = 100.0;

/// Risk score at and above which the projection is `High`.
pub const HIGH_RISK_THRESHOLD: f64 = 150.0;
