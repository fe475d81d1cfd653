use crate::entities::blood_pressure::{BloodPressure, BloodPressureCategory};

/// Categorize a blood pressure reading for the advice rules
pub fn categorize_blood_pressure(reading: &BloodPressure) -> BloodPressureCategory {
    if reading.systolic >= 160 {
        BloodPressureCategory::SevereHypertension
    } else if reading.systolic >= 140 || reading.diastolic >= 90 {
        BloodPressureCategory::Hypertension
    } else {
        BloodPressureCategory::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bp(systolic: i32, diastolic: i32) -> BloodPressure {
        BloodPressure { systolic, diastolic }
    }

    #[test]
    fn test_bp_category_normal() {
        assert_eq!(categorize_blood_pressure(&bp(139, 89)), BloodPressureCategory::Normal);
    }

    #[test]
    fn test_bp_category_hypertension() {
        // Systolic in range
        assert_eq!(categorize_blood_pressure(&bp(140, 70)), BloodPressureCategory::Hypertension);

        // Diastolic in range
        assert_eq!(categorize_blood_pressure(&bp(120, 90)), BloodPressureCategory::Hypertension);
    }

    #[test]
    fn test_bp_category_severe() {
        assert_eq!(
            categorize_blood_pressure(&bp(160, 70)),
            BloodPressureCategory::SevereHypertension
        );
        assert_eq!(
            categorize_blood_pressure(&bp(185, 125)),
            BloodPressureCategory::SevereHypertension
        );
    }
}
