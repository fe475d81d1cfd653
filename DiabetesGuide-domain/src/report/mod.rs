//! Clinical report assembled from a profile and its assessment.
//!
//! The report is built once into plain sections and then handed to a
//! renderer (`render_text` here, `pdf::render_pdf` for documents).

pub mod pdf;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::advice::{Assessment, RiskLevel, RiskScore};
use crate::entities::patient::PatientProfile;

pub const REPORT_TITLE: &str = "Diabetes Prevention Report";

pub const COMPLIANCE_CHECKS: [&str; 5] = [
    "HbA1c tested within recommended timeframe",
    "Cardiovascular risk assessment completed",
    "Personalised advice delivered",
    "Referral to prevention services if indicated",
    "Follow-up scheduled",
];

pub const SUPPORT_RESOURCES: [&str; 3] = [
    "Diabetes UK Helpline: 0345 123 2399",
    "NHS Diabetes Prevention Programme",
    "One You: www.nhs.uk/oneyou",
];

/// Report rendering errors
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF font error: {0}")]
    Font(String),

    #[error("PDF save error: {0}")]
    Save(String),
}

/// One titled block of report lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub heading: String,
    pub lines: Vec<String>,
}

/// Everything a GP needs from one assessment, ready to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalReport {
    pub title: String,
    pub patient_name: String,
    pub generated_on: String,

    /// Clinical parameters as label/value pairs
    pub parameters: Vec<(String, String)>,

    pub risk_score: RiskScore,
    pub risk_level: RiskLevel,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub referral_required: bool,
    pub rules_version: String,
}

fn yes_no(flag: bool) -> String {
    let answer = if flag { "Yes" } else { "No" };
    answer.to_string()
}

impl ClinicalReport {
    /// Assemble a report for a (possibly unnamed) patient
    pub fn build(name: Option<&str>, profile: &PatientProfile, assessment: &Assessment) -> Self {
        let patient_name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Not provided")
            .to_string();

        let blood_pressure = match (&profile.blood_pressure, profile.blood_pressure_reading()) {
            (_, Some(reading)) => format!("{} mmHg", reading),
            (Some(raw), None) => format!("{} (unreadable)", raw),
            (None, None) => "Not recorded".to_string(),
        };

        let parameters = vec![
            ("Age".to_string(), format!("{} years", profile.age)),
            ("HbA1c".to_string(), format!("{} mmol/mol", profile.hba1c)),
            ("Weight".to_string(), format!("{:.1} kg", profile.weight_kg)),
            ("BMI".to_string(), format!("{:.1}", profile.bmi())),
            ("Blood pressure".to_string(), blood_pressure),
            ("Ethnicity".to_string(), profile.ethnicity.label().to_string()),
            ("Activity".to_string(), format!("{} per week", profile.activity_level.label())),
            ("Smoker".to_string(), yes_no(profile.smoker)),
            ("Family history".to_string(), yes_no(profile.family_history)),
            (
                "Medications".to_string(),
                profile.medications.clone().unwrap_or_else(|| "None recorded".to_string()),
            ),
        ];

        Self {
            title: REPORT_TITLE.to_string(),
            patient_name,
            generated_on: Utc::now().format("%Y-%m-%d").to_string(),
            parameters,
            risk_score: assessment.risk_score,
            risk_level: assessment.risk_level,
            summary: assessment.advice.summary.clone(),
            recommendations: assessment.advice.recommendations.clone(),
            referral_required: assessment.advice.referral_required,
            rules_version: assessment.rules_version.clone(),
        }
    }

    /// Report body in reading order; the referral pathway only appears when needed
    pub fn sections(&self) -> Vec<ReportSection> {
        let mut sections = vec![
            ReportSection {
                heading: "Patient".to_string(),
                lines: vec![
                    format!("Patient: {}", self.patient_name),
                    format!("Report date: {}", self.generated_on),
                ],
            },
            ReportSection {
                heading: "Clinical Parameters".to_string(),
                lines: self
                    .parameters
                    .iter()
                    .map(|(label, value)| format!("{}: {}", label, value))
                    .collect(),
            },
            ReportSection {
                heading: "Risk Assessment".to_string(),
                lines: vec![
                    format!(
                        "10-year diabetes risk: {}% ({} risk)",
                        self.risk_score, self.risk_level
                    ),
                    self.summary.clone(),
                    format!("Rule set version: {}", self.rules_version),
                ],
            },
        ];

        let recommendations = if self.recommendations.is_empty() {
            vec!["No specific actions required at this time".to_string()]
        } else {
            self.recommendations
                .iter()
                .enumerate()
                .map(|(i, item)| format!("{}. {}", i + 1, item))
                .collect()
        };
        sections.push(ReportSection {
            heading: "Clinical Recommendations".to_string(),
            lines: recommendations,
        });

        if self.referral_required {
            sections.push(ReportSection {
                heading: "Referral Pathway".to_string(),
                lines: vec![
                    "Referral to primary care is indicated by this assessment".to_string(),
                    "Share this report with the patient's GP".to_string(),
                    "Record the referral outcome at the follow-up review".to_string(),
                ],
            });
        }

        sections.push(ReportSection {
            heading: "NICE Guideline Compliance".to_string(),
            lines: COMPLIANCE_CHECKS.iter().map(|c| format!("[ ] {}", c)).collect(),
        });

        sections.push(ReportSection {
            heading: "NHS Support Resources".to_string(),
            lines: SUPPORT_RESOURCES.iter().map(|r| format!("- {}", r)).collect(),
        });

        sections
    }

    /// Plain-text rendering
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&"=".repeat(self.title.chars().count()));
        out.push('\n');

        for section in self.sections() {
            out.push('\n');
            out.push_str(&section.heading);
            out.push('\n');
            for line in &section.lines {
                out.push_str("  ");
                out.push_str(line);
                out.push('\n');
            }
        }

        out
    }
}
