use std::fmt;
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// A parsed "systolic/diastolic" reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct BloodPressure {
    /// Systolic blood pressure (the higher number)
    pub systolic: i32,

    /// Diastolic blood pressure (the lower number)
    pub diastolic: i32,
}

impl BloodPressure {
    /// Parse free text of the form "systolic/diastolic".
    ///
    /// Whitespace around either number is ignored. Anything else (missing
    /// slash, extra parts, non-integers) yields `None`; callers treat that as
    /// "no reading" rather than an error.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split('/');
        let systolic = parts.next()?.trim().parse::<i32>().ok()?;
        let diastolic = parts.next()?.trim().parse::<i32>().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { systolic, diastolic })
    }
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

/// Blood pressure category as used by the advice rules
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum BloodPressureCategory {
    /// Systolic < 140 and diastolic < 90
    Normal,

    /// Systolic ≥ 140 or diastolic ≥ 90
    Hypertension,

    /// Systolic ≥ 160; warrants referral
    SevereHypertension,
}

impl fmt::Display for BloodPressureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BloodPressureCategory::Normal => write!(f, "Normal"),
            BloodPressureCategory::Hypertension => write!(f, "Hypertension"),
            BloodPressureCategory::SevereHypertension => write!(f, "Severe Hypertension"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_readings() {
        assert_eq!(
            BloodPressure::parse("150/95"),
            Some(BloodPressure { systolic: 150, diastolic: 95 })
        );
        assert_eq!(
            BloodPressure::parse(" 120 / 80 "),
            Some(BloodPressure { systolic: 120, diastolic: 80 })
        );
    }

    #[test]
    fn test_parse_malformed_readings() {
        assert_eq!(BloodPressure::parse("not-a-number"), None);
        assert_eq!(BloodPressure::parse(""), None);
        assert_eq!(BloodPressure::parse("120"), None);
        assert_eq!(BloodPressure::parse("120/"), None);
        assert_eq!(BloodPressure::parse("120/80/60"), None);
        assert_eq!(BloodPressure::parse("12a/80"), None);
        assert_eq!(BloodPressure::parse("120.5/80"), None);
    }

    #[test]
    fn test_display_uses_parsed_values() {
        let reading = BloodPressure::parse(" 150 /95").unwrap();
        assert_eq!(reading.to_string(), "150/95");
    }
}
