//! Future risk projection.

use crate::constants::{HIGH_RISK_THRESHOLD, MODERATE_RISK_THRESHOLD};
use crate::record::PatientRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Bucket a score. Each higher tier includes its lower bound.
    pub fn from_score(score: f64) -> Self {
        if score < MODERATE_RISK_THRESHOLD {
            RiskLevel::Low
        } else if score < HIGH_RISK_THRESHOLD {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Averaged glucose/BMI/age score and its bucket.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub future_risk_score: f64,
    pub future_risk_level: RiskLevel,
}

impl RiskAssessment {
    pub fn from_record(record: &PatientRecord) -> Self {
        let score = (record.glucose + record.bmi + record.age) / 3.0;
        Self {
            future_risk_score: score,
            future_risk_level: RiskLevel::from_score(score),
        }
    }
}
