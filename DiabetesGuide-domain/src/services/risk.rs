//! Points-based 10-year diabetes risk estimate.
//!
//! Pure and synchronous: the same profile always yields the same score.

use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::entities::advice::RiskScore;
use crate::entities::patient::{ActivityLevel, Ethnicity, PatientProfile};

/// Identifier of the rule set below, carried on every assessment
pub const RULES_VERSION: &str = "2";

/// Multiplier applied to the summed points
pub const SCALE_FACTOR: f64 = 0.9;

/// Ceiling applied to the scaled points before the BMI adjustment
pub const BASE_CEILING: f64 = 50.0;

/// Ceiling of the final score
pub const SCORE_CAP: f64 = RiskScore::MAX;

pub const OBESE_BMI: f64 = 30.0;
pub const OVERWEIGHT_BMI: f64 = 25.0;
pub const OBESE_MULTIPLIER: f64 = 1.4;
pub const OVERWEIGHT_MULTIPLIER: f64 = 1.2;

/// Per-factor points behind a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ScoreBreakdown {
    pub age_points: u32,
    pub hba1c_points: u32,
    pub ethnicity_points: u32,
    pub blood_pressure_points: u32,
    pub lifestyle_points: u32,
    pub total_points: u32,

    /// Scaled points after the base ceiling
    pub base: f64,
    pub bmi: f64,
    pub bmi_multiplier: f64,
    pub score: RiskScore,
}

fn age_points(age: u8) -> u32 {
    match age {
        0..=34 => 1,
        35..=44 => 3,
        45..=54 => 6,
        55..=64 => 9,
        _ => 7,
    }
}

fn hba1c_points(hba1c: u16) -> u32 {
    match hba1c {
        48..=u16::MAX => 8,
        42..=47 => 4,
        _ => 0,
    }
}

fn ethnicity_points(ethnicity: Ethnicity) -> u32 {
    match ethnicity {
        Ethnicity::SouthAsian => 6,
        Ethnicity::BlackAfrican => 4,
        Ethnicity::White | Ethnicity::MixedOther => 0,
    }
}

// Highest tier first so a severe reading never lands in the lower band
fn blood_pressure_points(profile: &PatientProfile) -> u32 {
    match profile.blood_pressure_reading() {
        Some(bp) if bp.systolic >= 160 => 5,
        Some(bp) if bp.systolic >= 140 => 3,
        _ => 0,
    }
}

fn lifestyle_points(profile: &PatientProfile) -> u32 {
    let mut points = 0;
    if profile.smoker {
        points += 3;
    }
    if profile.family_history {
        points += 2;
    }
    if profile.activity_level == ActivityLevel::Under30Min {
        points += 4;
    }
    points
}

fn bmi_multiplier(bmi: f64) -> f64 {
    if bmi > OBESE_BMI {
        OBESE_MULTIPLIER
    } else if bmi > OVERWEIGHT_BMI {
        OVERWEIGHT_MULTIPLIER
    } else {
        1.0
    }
}

/// Evaluate every factor and keep the intermediate values
pub fn breakdown(profile: &PatientProfile) -> ScoreBreakdown {
    let age_points = age_points(profile.age);
    let hba1c_points = hba1c_points(profile.hba1c);
    let ethnicity_points = ethnicity_points(profile.ethnicity);
    let blood_pressure_points = blood_pressure_points(profile);
    let lifestyle_points = lifestyle_points(profile);
    let total_points =
        age_points + hba1c_points + ethnicity_points + blood_pressure_points + lifestyle_points;

    let base = (total_points as f64 * SCALE_FACTOR).min(BASE_CEILING);
    let bmi = profile.bmi();
    let bmi_multiplier = bmi_multiplier(bmi);
    let score = RiskScore::new((base * bmi_multiplier).min(SCORE_CAP));

    debug!(
        total_points,
        base,
        bmi,
        bmi_multiplier,
        score = score.value(),
        "Computed diabetes risk score"
    );

    ScoreBreakdown {
        age_points,
        hba1c_points,
        ethnicity_points,
        blood_pressure_points,
        lifestyle_points,
        total_points,
        base,
        bmi,
        bmi_multiplier,
        score,
    }
}

/// Estimated 10-year diabetes risk for a profile
pub fn score(profile: &PatientProfile) -> RiskScore {
    breakdown(profile).score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> PatientProfile {
        PatientProfile {
            age: 30,
            hba1c: 35,
            weight_kg: 65.0,
            blood_pressure: Some("110/70".to_string()),
            ethnicity: Ethnicity::White,
            activity_level: ActivityLevel::Over150Min,
            smoker: false,
            family_history: false,
            medications: None,
        }
    }

    #[test]
    fn test_age_bands() {
        assert_eq!(age_points(18), 1);
        assert_eq!(age_points(34), 1);
        assert_eq!(age_points(35), 3);
        assert_eq!(age_points(44), 3);
        assert_eq!(age_points(45), 6);
        assert_eq!(age_points(54), 6);
        assert_eq!(age_points(55), 9);
        assert_eq!(age_points(64), 9);
        assert_eq!(age_points(65), 7);
        assert_eq!(age_points(100), 7);
    }

    #[test]
    fn test_hba1c_bands() {
        assert_eq!(hba1c_points(41), 0);
        assert_eq!(hba1c_points(42), 4);
        assert_eq!(hba1c_points(47), 4);
        assert_eq!(hba1c_points(48), 8);
        assert_eq!(hba1c_points(150), 8);
    }

    #[test]
    fn test_blood_pressure_tiers_are_exclusive() {
        let mut p = profile();
        p.blood_pressure = Some("139/99".to_string());
        assert_eq!(blood_pressure_points(&p), 0);

        p.blood_pressure = Some("140/80".to_string());
        assert_eq!(blood_pressure_points(&p), 3);

        p.blood_pressure = Some("165/100".to_string());
        assert_eq!(blood_pressure_points(&p), 5);

        p.blood_pressure = Some("garbage".to_string());
        assert_eq!(blood_pressure_points(&p), 0);

        p.blood_pressure = None;
        assert_eq!(blood_pressure_points(&p), 0);
    }

    #[test]
    fn test_lifestyle_points_accumulate() {
        let mut p = profile();
        assert_eq!(lifestyle_points(&p), 0);
        p.smoker = true;
        p.family_history = true;
        p.activity_level = ActivityLevel::Under30Min;
        assert_eq!(lifestyle_points(&p), 9);
    }

    #[test]
    fn test_low_risk_profile() {
        let b = breakdown(&profile());
        assert_eq!(b.total_points, 1);
        assert_eq!(b.bmi_multiplier, 1.0);
        assert_eq!(b.score.value(), 0.9);
    }

    #[test]
    fn test_bmi_multipliers() {
        // exactly 30 is overweight, not obese
        assert_eq!(bmi_multiplier(30.0), OVERWEIGHT_MULTIPLIER);
        assert_eq!(bmi_multiplier(30.1), OBESE_MULTIPLIER);
        assert_eq!(bmi_multiplier(25.0), 1.0);
        assert_eq!(bmi_multiplier(25.1), OVERWEIGHT_MULTIPLIER);
    }

    #[test]
    fn test_worst_case_stays_within_cap() {
        let p = PatientProfile {
            age: 60,
            hba1c: 150,
            weight_kg: 300.0,
            blood_pressure: Some("200/120".to_string()),
            ethnicity: Ethnicity::SouthAsian,
            activity_level: ActivityLevel::Under30Min,
            smoker: true,
            family_history: true,
            medications: None,
        };
        let b = breakdown(&p);
        // 9 + 8 + 6 + 5 + 9 = 37 points, 33.3 scaled, ×1.4 for BMI
        assert_eq!(b.total_points, 37);
        assert!(b.base < BASE_CEILING);
        assert_eq!(b.score.value(), 46.6);
        assert!(b.score.value() <= SCORE_CAP);
    }
}
