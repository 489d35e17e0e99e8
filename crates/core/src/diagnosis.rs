//! Diagnosis refinement.
//!
//! Turns the classifier's binary label into a coarse diabetes type using fixed threshold rules
//! on age, BMI and blood pressure.

use crate::record::PatientRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diabetes type label shown to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiabetesType {
    #[serde(rename = "Type 1")]
    Type1,
    #[serde(rename = "Type 2")]
    Type2,
    #[serde(rename = "Type 2 (Uncertain)")]
    Type2Uncertain,
    #[serde(rename = "Non-Diabetic")]
    NonDiabetic,
    #[serde(rename = "Error in detection")]
    ErrorInDetection,
}

impl DiabetesType {
    pub fn label(&self) -> &'static str {
        match self {
            DiabetesType::Type1 => "Type 1",
            DiabetesType::Type2 => "Type 2",
            DiabetesType::Type2Uncertain => "Type 2 (Uncertain)",
            DiabetesType::NonDiabetic => "Non-Diabetic",
            DiabetesType::ErrorInDetection => "Error in detection",
        }
    }

    /// Parse a label as produced by [`DiabetesType::label`].
    pub fn from_label(label: &str) -> Option<Self> {
        [
            DiabetesType::Type1,
            DiabetesType::Type2,
            DiabetesType::Type2Uncertain,
            DiabetesType::NonDiabetic,
            DiabetesType::ErrorInDetection,
        ]
        .into_iter()
        .find(|t| t.label() == label)
    }
}

impl fmt::Display for DiabetesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of a successful diagnosis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub is_diabetic: bool,
    pub diabetes_type: DiabetesType,
}

impl DiagnosisResult {
    /// Apply the type rules to a classifier label.
    ///
    /// Non-diabetic results are always `Non-Diabetic`. Diabetic results are checked in order:
    /// age < 30, blood pressure >= 140 and BMI < 25 is `Type 1`; age >= 30 and BMI >= 25 is
    /// `Type 2`; anything else is `Type 2 (Uncertain)`.
    pub fn refine(is_diabetic: bool, record: &PatientRecord) -> Self {
        let diabetes_type = if !is_diabetic {
            DiabetesType::NonDiabetic
        } else if record.age < 30.0 && record.blood_pressure >= 140.0 && record.bmi < 25.0 {
            DiabetesType::Type1
        } else if record.age >= 30.0 && record.bmi >= 25.0 {
            DiabetesType::Type2
        } else {
            DiabetesType::Type2Uncertain
        };

        Self {
            is_diabetic,
            diabetes_type,
        }
    }

    /// Human-readable summary used in logs and the CLI.
    pub fn summary(&self) -> String {
        if self.is_diabetic {
            format!("Diagnosed as Diabetic - {}", self.diabetes_type)
        } else {
            DiabetesType::NonDiabetic.label().to_string()
        }
    }
}

/// Why a diagnosis could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum DiagnosisError {
    #[error("input could not be parsed: {0}")]
    InputParse(#[source] crate::PredictorError),
    #[error("classifier is not loaded")]
    ClassifierUnavailable,
    #[error("classifier failed: {0}")]
    Scoring(#[source] crate::PredictorError),
}

impl DiagnosisError {
    /// The label every failure is reported to the user as.
    pub fn diabetes_type(&self) -> DiabetesType {
        DiabetesType::ErrorInDetection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(age: f64, bmi: f64, blood_pressure: f64) -> PatientRecord {
        PatientRecord {
            age,
            bmi,
            blood_pressure,
            ..PatientRecord::default()
        }
    }

    #[test]
    fn non_diabetic_ignores_other_fields() {
        for r in [
            record(25.0, 20.0, 150.0),
            record(40.0, 30.0, 80.0),
            record(40.0, 20.0, 0.0),
            record(0.0, 0.0, 0.0),
        ] {
            let result = DiagnosisResult::refine(false, &r);
            assert!(!result.is_diabetic);
            assert_eq!(result.diabetes_type, DiabetesType::NonDiabetic);
        }
    }

    #[test]
    fn young_lean_hypertensive_is_type_1() {
        let result = DiagnosisResult::refine(true, &record(25.0, 20.0, 150.0));
        assert_eq!(result.diabetes_type, DiabetesType::Type1);
    }

    #[test]
    fn older_overweight_is_type_2_for_any_pressure() {
        for bp in [0.0, 80.0, 140.0, 200.0] {
            let result = DiagnosisResult::refine(true, &record(40.0, 30.0, bp));
            assert_eq!(result.diabetes_type, DiabetesType::Type2);
        }
    }

    #[test]
    fn other_diabetic_cases_are_uncertain() {
        assert_eq!(
            DiagnosisResult::refine(true, &record(40.0, 20.0, 150.0)).diabetes_type,
            DiabetesType::Type2Uncertain
        );
        // Young with normal pressure.
        assert_eq!(
            DiagnosisResult::refine(true, &record(25.0, 20.0, 120.0)).diabetes_type,
            DiabetesType::Type2Uncertain
        );
    }

    #[test]
    fn boundaries_follow_rule_order() {
        // Age 30 is not "young".
        assert_eq!(
            DiagnosisResult::refine(true, &record(30.0, 25.0, 150.0)).diabetes_type,
            DiabetesType::Type2
        );
        // BP exactly 140 counts, BMI exactly 25 does not.
        assert_eq!(
            DiagnosisResult::refine(true, &record(29.0, 24.9, 140.0)).diabetes_type,
            DiabetesType::Type1
        );
        assert_eq!(
            DiagnosisResult::refine(true, &record(29.0, 25.0, 140.0)).diabetes_type,
            DiabetesType::Type2Uncertain
        );
    }

    #[test]
    fn labels_round_trip() {
        for t in [
            DiabetesType::Type1,
            DiabetesType::Type2,
            DiabetesType::Type2Uncertain,
            DiabetesType::NonDiabetic,
            DiabetesType::ErrorInDetection,
        ] {
            assert_eq!(DiabetesType::from_label(t.label()), Some(t));
        }
        assert_eq!(DiabetesType::from_label("Type 3"), None);
    }

    #[test]
    fn summary_mentions_type_only_when_diabetic() {
        assert_eq!(
            DiagnosisResult::refine(true, &record(40.0, 30.0, 0.0)).summary(),
            "Diagnosed as Diabetic - Type 2"
        );
        assert_eq!(
            DiagnosisResult::refine(false, &record(40.0, 30.0, 0.0)).summary(),
            "Non-Diabetic"
        );
    }
}
