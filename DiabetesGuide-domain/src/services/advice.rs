//! Turns a profile and its risk score into prioritised clinical advice.

use tracing::debug;

use crate::entities::advice::{AdviceResult, Priority, RiskScore};
use crate::entities::blood_pressure::BloodPressureCategory;
use crate::entities::patient::{ActivityLevel, Ethnicity, PatientProfile};
use crate::services::insights::categorize_blood_pressure;

/// HbA1c (mmol/mol) at or above which diabetes is likely
pub const DIABETES_HBA1C: u16 = 48;

/// HbA1c (mmol/mol) at or above which the patient is prediabetic
pub const PREDIABETES_HBA1C: u16 = 42;

/// HbA1c at or above which a normal result still gets maintenance advice
pub const MAINTENANCE_HBA1C: u16 = 39;

/// Score above which statin therapy is suggested
pub const STATIN_THRESHOLD: f64 = 10.0;

/// Produce advice for a profile.
///
/// Rules append to one list in a fixed order; the referral flag is only ever set.
pub fn generate(profile: &PatientProfile, risk: RiskScore) -> AdviceResult {
    let mut recommendations = Vec::new();
    let mut referral_required = false;

    let (priority, banner) = if profile.hba1c >= DIABETES_HBA1C {
        referral_required = true;
        recommendations.push("Immediate GP referral required".to_string());
        recommendations.push("Confirm diagnosis with repeat HbA1c or FPG".to_string());
        (Priority::High, "URGENT: Likely diabetes (HbA1c ≥48)")
    } else if profile.hba1c >= PREDIABETES_HBA1C {
        recommendations.push("Refer to NHS Diabetes Prevention Programme".to_string());
        recommendations.push("Lifestyle intervention: 9-month program".to_string());
        (Priority::Medium, "WARNING: High risk (Prediabetes)")
    } else {
        if profile.hba1c >= MAINTENANCE_HBA1C {
            recommendations.push("Maintain healthy lifestyle to prevent progression".to_string());
        }
        (Priority::Low, "GOOD: Normal HbA1c")
    };

    if let Some(bp) = profile.blood_pressure_reading() {
        match categorize_blood_pressure(&bp) {
            BloodPressureCategory::Normal => {}
            category => {
                recommendations.push(format!("Hypertension ({}) - Monitor weekly", bp));
                if category == BloodPressureCategory::SevereHypertension {
                    referral_required = true;
                }
            }
        }
    }

    if matches!(profile.ethnicity, Ethnicity::SouthAsian | Ethnicity::BlackAfrican) {
        recommendations.push(format!(
            "Higher risk profile: {} ethnicity",
            profile.ethnicity.label()
        ));
    }

    match profile.activity_level {
        ActivityLevel::Under30Min => {
            recommendations.push("Increase activity: Aim for 150 mins/week".to_string());
            recommendations.push("Start with brisk walking 10 mins/day".to_string());
        }
        ActivityLevel::Between30And150Min => {
            recommendations.push("Good activity level - maintain 150+ mins/week".to_string());
        }
        ActivityLevel::Over150Min => {}
    }

    if profile.smoker {
        referral_required = true;
        recommendations
            .push("🚭 Smoking cessation: Refer to NHS Stop Smoking Services".to_string());
    }

    let summary = format!("{} {} | 10-yr risk: {}%", priority.glyph(), banner, risk);
    if risk.value() > STATIN_THRESHOLD {
        recommendations.push(format!(
            "High cardiovascular risk ({}%) - Consider statin therapy",
            risk
        ));
    }

    debug!(
        %priority,
        referral_required,
        recommendation_count = recommendations.len(),
        "Generated clinical advice"
    );

    AdviceResult {
        priority,
        summary,
        recommendations,
        referral_required,
    }
}
