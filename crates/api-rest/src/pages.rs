//! HTML pages.
//!
//! Pages are small and static apart from a few interpolated values, so they are rendered with
//! `format!` around a shared layout. Every interpolated string goes through [`escape`].

use predictor_core::constants::FEATURE_NAMES;
use predictor_core::{DiabetesType, DiagnosisResult, PatientRecord, RiskAssessment};

/// Escape text for inclusion in HTML element content or a quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Diabetes Predictor</title>
</head>
<body>
<nav><a href="/">Home</a> | <a href="/index">Check</a> | <a href="/dashboard">Dashboard</a> | <a href="/future_risk_dashboard">Future risk</a></nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

pub fn home() -> String {
    layout(
        "Home",
        r#"<h1>Diabetes Predictor</h1>
<p>Enter a few health measurements and a trained model will estimate whether they indicate diabetes.</p>
<p><a href="/index">Start a check</a></p>"#,
    )
}

pub fn index() -> String {
    let inputs: String = FEATURE_NAMES
        .iter()
        .map(|name| {
            let step = if *name == "Pregnancies" { "1" } else { "any" };
            format!(
                "<label>{name} <input type=\"number\" name=\"{name}\" step=\"{step}\" min=\"0\"></label><br>\n"
            )
        })
        .collect();

    layout(
        "Check",
        &format!(
            r#"<h1>Enter measurements</h1>
<form id="detection-form" method="post" action="/predict">
{inputs}<button type="submit">Predict</button>
</form>"#
        ),
    )
}

/// Result page for a diagnosis, or the error page when `diagnosis` is `None`.
pub fn result(diagnosis: Option<&DiagnosisResult>) -> String {
    let body = match diagnosis {
        Some(d) if d.is_diabetic => format!(
            r#"<h1>Diagnosed as Diabetic</h1>
<p>Diabetes type: <strong>{}</strong></p>
<p><a href="/dashboard?diabetes_type={}">View guidance</a> | <a href="/future_risk_dashboard">Future risk</a></p>"#,
            escape(d.diabetes_type.label()),
            query_value(d.diabetes_type.label()),
        ),
        Some(_) => format!(
            r#"<h1>{}</h1>
<p>The model found no indication of diabetes.</p>
<p><a href="/future_risk_dashboard">Future risk</a></p>"#,
            DiabetesType::NonDiabetic
        ),
        None => format!(
            r#"<h1>{}</h1>
<p>Please check the values entered and try again.</p>
<p><a href="/index">Back to the form</a></p>"#,
            DiabetesType::ErrorInDetection
        ),
    };
    layout("Result", &body)
}

pub fn dashboard(diabetes_type: &str) -> String {
    let guidance = match DiabetesType::from_label(diabetes_type) {
        Some(DiabetesType::Type1) => {
            "Type 1 diabetes needs insulin therapy. Monitor blood glucose several times a day and keep regular specialist follow-up."
        }
        Some(DiabetesType::Type2) => {
            "Type 2 diabetes is managed with diet, regular activity and weight control, with medication where prescribed."
        }
        Some(DiabetesType::Type2Uncertain) => {
            "The measurements do not clearly indicate a type. Discuss further tests such as HbA1c and autoantibodies with a clinician."
        }
        Some(DiabetesType::NonDiabetic) => {
            "No diabetes detected. Keep up a balanced diet and regular exercise, and recheck periodically."
        }
        Some(DiabetesType::ErrorInDetection) | None => {
            "No specific guidance is available for this type. Please consult a clinician."
        }
    };

    layout(
        "Dashboard",
        &format!(
            r#"<h1>Dashboard: {}</h1>
<p>{}</p>"#,
            escape(diabetes_type),
            guidance
        ),
    )
}

pub fn future_risk(record: &PatientRecord, risk: &RiskAssessment) -> String {
    layout(
        "Future risk",
        &format!(
            r#"<h1>Future risk: {level}</h1>
<p>Risk score: <strong>{score:.2}</strong></p>
<table>
<tr><th>Glucose</th><td>{glucose}</td></tr>
<tr><th>BMI</th><td>{bmi}</td></tr>
<tr><th>Age</th><td>{age}</td></tr>
</table>"#,
            level = risk.future_risk_level,
            score = risk.future_risk_score,
            glucose = record.glucose,
            bmi = record.bmi,
            age = record.age,
        ),
    )
}

fn query_value(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => (b as char).to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}
