//! Range checks applied at the request boundary
//!
//! Type-level problems (negative numbers, unknown enum values) are already
//! rejected during deserialization. These checks cover the numeric ranges the
//! intake accepts. Values are never clamped.

use super::{FamilyComposition, HealthProfile};
use crate::error::ValidationError;

pub const MAX_SPOUSES: u32 = 1;
pub const MAX_CHILDREN_PER_BAND: u32 = 20;
pub const MAX_DOCTOR_VISITS: u32 = 100;
pub const MAX_SPECIALIST_VISITS: u32 = 100;
pub const MAX_ER_VISITS: u32 = 20;
pub const MAX_URGENT_CARE_VISITS: u32 = 50;
pub const MAX_LAB_VISITS: u32 = 50;

fn check(field: &'static str, value: u32, max: u32) -> Result<(), ValidationError> {
    if value > max {
        return Err(ValidationError::OutOfRange { field, value, max });
    }
    Ok(())
}

impl FamilyComposition {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check("numSpouses", self.num_spouses, MAX_SPOUSES)?;
        check("numChildren0to18", self.num_children_0_to_18, MAX_CHILDREN_PER_BAND)?;
        check("numChildren19to20", self.num_children_19_to_20, MAX_CHILDREN_PER_BAND)?;
        Ok(())
    }
}

impl HealthProfile {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check("annualDoctorVisits", self.annual_doctor_visits, MAX_DOCTOR_VISITS)?;
        check("annualSpecialistVisits", self.annual_specialist_visits, MAX_SPECIALIST_VISITS)?;
        check("annualERVisits", self.annual_er_visits, MAX_ER_VISITS)?;
        check("annualUrgentCareVisits", self.annual_urgent_care_visits, MAX_URGENT_CARE_VISITS)?;
        if let Some(lab) = self.annual_lab_visits {
            check("annualLabVisits", lab, MAX_LAB_VISITS)?;
        }
        if self
            .regular_medications
            .iter()
            .any(|medication| medication.name.trim().is_empty())
        {
            return Err(ValidationError::EmptyMedicationName);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::{Medication, MedicationFrequency};
    use crate::plans::DrugTier;

    #[test]
    fn test_family_limits() {
        assert!(FamilyComposition::new(1, 20, 20).validate().is_ok());
        assert_eq!(
            FamilyComposition::new(2, 0, 0).validate(),
            Err(ValidationError::OutOfRange {
                field: "numSpouses",
                value: 2,
                max: 1
            })
        );
        assert!(FamilyComposition::new(0, 21, 0).validate().is_err());
    }

    #[test]
    fn test_usage_limits() {
        let mut profile = HealthProfile {
            annual_doctor_visits: 100,
            annual_er_visits: 20,
            ..Default::default()
        };
        assert!(profile.validate().is_ok());

        profile.annual_er_visits = 21;
        let err = profile.validate().unwrap_err();
        assert_eq!(err.to_string(), "annualERVisits must be at most 20, got 21");

        profile.annual_er_visits = 0;
        profile.annual_lab_visits = Some(51);
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_blank_medication_name_rejected() {
        let profile = HealthProfile {
            regular_medications: vec![Medication::new(
                "  ",
                DrugTier::Generic,
                MedicationFrequency::Daily,
            )],
            ..Default::default()
        };
        assert_eq!(profile.validate(), Err(ValidationError::EmptyMedicationName));
    }
}
