//! Patient record and form input extraction.
//!
//! A [`PatientRecord`] is the eight-feature description of one subject. Records are built per
//! request from raw form fields and never persisted by the core.

use crate::constants::{
    AGE, BLOOD_PRESSURE, BMI, DIABETES_PEDIGREE_FUNCTION, FEATURE_COUNT, GLUCOSE, INSULIN,
    PREGNANCIES, SKIN_THICKNESS,
};
use crate::{PredictorError, PredictorResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The eight model features for one subject.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(rename = "Pregnancies")]
    pub pregnancies: u32,
    #[serde(rename = "Glucose")]
    pub glucose: f64,
    #[serde(rename = "BloodPressure")]
    pub blood_pressure: f64,
    #[serde(rename = "SkinThickness")]
    pub skin_thickness: f64,
    #[serde(rename = "Insulin")]
    pub insulin: f64,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    #[serde(rename = "DiabetesPedigreeFunction")]
    pub diabetes_pedigree_function: f64,
    #[serde(rename = "Age")]
    pub age: f64,
}

impl PatientRecord {
    /// Build a record from raw form fields.
    ///
    /// Absent fields default to `0` / `0.0`. Present fields must parse: `Pregnancies` as a
    /// non-negative integer, everything else as a float. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns `PredictorError::FieldParse` naming the first field whose value does not parse.
    pub fn from_form(fields: &HashMap<String, String>) -> PredictorResult<Self> {
        Ok(Self {
            pregnancies: parse_field(fields, PREGNANCIES)?,
            glucose: parse_field(fields, GLUCOSE)?,
            blood_pressure: parse_field(fields, BLOOD_PRESSURE)?,
            skin_thickness: parse_field(fields, SKIN_THICKNESS)?,
            insulin: parse_field(fields, INSULIN)?,
            bmi: parse_field(fields, BMI)?,
            diabetes_pedigree_function: parse_field(fields, DIABETES_PEDIGREE_FUNCTION)?,
            age: parse_field(fields, AGE)?,
        })
    }

    /// Feature vector in training column order.
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.pregnancies),
            self.glucose,
            self.blood_pressure,
            self.skin_thickness,
            self.insulin,
            self.bmi,
            self.diabetes_pedigree_function,
            self.age,
        ]
    }
}

fn parse_field<T>(fields: &HashMap<String, String>, name: &'static str) -> PredictorResult<T>
where
    T: std::str::FromStr + Default,
{
    match fields.get(name) {
        None => Ok(T::default()),
        Some(raw) => raw.trim().parse().map_err(|_| PredictorError::FieldParse {
            field: name,
            value: raw.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let record = PatientRecord::from_form(&HashMap::new()).expect("empty form parses");
        assert_eq!(record, PatientRecord::default());
        assert_eq!(record.pregnancies, 0);
        assert_eq!(record.age, 0.0);
    }

    #[test]
    fn parses_all_fields() {
        let record = PatientRecord::from_form(&form(&[
            ("Pregnancies", "2"),
            ("Glucose", "85"),
            ("BloodPressure", "66"),
            ("SkinThickness", "29"),
            ("Insulin", "0"),
            ("BMI", "26.6"),
            ("DiabetesPedigreeFunction", "0.351"),
            ("Age", " 31 "),
        ]))
        .expect("valid form");

        assert_eq!(record.pregnancies, 2);
        assert_eq!(record.glucose, 85.0);
        assert_eq!(record.bmi, 26.6);
        assert_eq!(record.age, 31.0);
        assert_eq!(
            record.features(),
            [2.0, 85.0, 66.0, 29.0, 0.0, 26.6, 0.351, 31.0]
        );
    }

    #[test]
    fn non_numeric_value_is_a_hard_failure() {
        let err = PatientRecord::from_form(&form(&[("Glucose", "abc")]))
            .expect_err("non-numeric glucose must fail");
        assert!(matches!(
            err,
            PredictorError::FieldParse { field: "Glucose", .. }
        ));
    }

    #[test]
    fn pregnancies_must_be_a_non_negative_integer() {
        assert!(PatientRecord::from_form(&form(&[("Pregnancies", "1.5")])).is_err());
        assert!(PatientRecord::from_form(&form(&[("Pregnancies", "-1")])).is_err());
    }

    #[test]
    fn present_but_empty_field_fails() {
        assert!(PatientRecord::from_form(&form(&[("BMI", "")])).is_err());
    }
}
