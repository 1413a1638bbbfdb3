//! Household composition, health profile and preference inputs

use crate::error::ValidationError;
use crate::plans::DrugTier;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Covered dependents besides the employee
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyComposition {
    /// Spouse or partner (0 or 1)
    pub num_spouses: u32,
    #[serde(rename = "numChildren0to18")]
    pub num_children_0_to_18: u32,
    #[serde(rename = "numChildren19to20")]
    pub num_children_19_to_20: u32,
}

impl FamilyComposition {
    /// Employee-only coverage
    pub fn employee_only() -> Self {
        Self::default()
    }

    pub fn new(num_spouses: u32, num_children_0_to_18: u32, num_children_19_to_20: u32) -> Self {
        Self {
            num_spouses,
            num_children_0_to_18,
            num_children_19_to_20,
        }
    }

    pub fn total_dependents(&self) -> u32 {
        self.num_spouses + self.num_children_0_to_18 + self.num_children_19_to_20
    }

    pub fn has_family(&self) -> bool {
        self.total_dependents() > 0
    }
}

/// How often a regular medication is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MedicationFrequency {
    Daily,
    Weekly,
    Monthly,
    AsNeeded,
}

impl MedicationFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            MedicationFrequency::Daily => "daily",
            MedicationFrequency::Weekly => "weekly",
            MedicationFrequency::Monthly => "monthly",
            MedicationFrequency::AsNeeded => "asNeeded",
        }
    }
}

impl FromStr for MedicationFrequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(MedicationFrequency::Daily),
            "weekly" => Ok(MedicationFrequency::Weekly),
            "monthly" => Ok(MedicationFrequency::Monthly),
            "asNeeded" => Ok(MedicationFrequency::AsNeeded),
            other => Err(ValidationError::UnknownFrequency(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    #[serde(rename = "type")]
    pub tier: DrugTier,
    pub frequency: MedicationFrequency,
}

impl Medication {
    pub fn new(name: impl Into<String>, tier: DrugTier, frequency: MedicationFrequency) -> Self {
        Self {
            name: name.into(),
            tier,
            frequency,
        }
    }
}

/// Parses `name:tier:frequency`, e.g. `metformin:generic:daily`
impl FromStr for Medication {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':').map(str::trim);
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(tier), Some(frequency), None) => {
                Ok(Medication::new(name, tier.parse()?, frequency.parse()?))
            }
            _ => Err(ValidationError::MalformedMedication(s.to_string())),
        }
    }
}

/// Self-rated overall health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverallHealth {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Self-reported expected healthcare usage for the plan year
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthProfile {
    /// Free-text condition labels
    pub chronic_conditions: Vec<String>,

    pub is_planning_pregnancy: bool,

    pub annual_doctor_visits: u32,

    pub annual_specialist_visits: u32,

    #[serde(rename = "annualERVisits")]
    pub annual_er_visits: u32,

    pub annual_urgent_care_visits: u32,

    /// Estimated from chronic conditions when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_lab_visits: Option<u32>,

    pub regular_medications: Vec<Medication>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_health: Option<OverallHealth>,
}

impl HealthProfile {
    pub fn chronic_condition_count(&self) -> u32 {
        self.chronic_conditions.len() as u32
    }

    pub fn has_chronic_conditions(&self) -> bool {
        !self.chronic_conditions.is_empty()
    }
}

/// Caller preferences collected during the conversation
///
/// Only `hsa_interested` affects plan selection; the other flags are carried
/// through for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub hsa_interested: bool,
    pub prioritize_low_premium: bool,
    pub prioritize_low_deductible: bool,
    pub prefer_predictable_copays: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            hsa_interested: true,
            prioritize_low_premium: false,
            prioritize_low_deductible: false,
            prefer_predictable_copays: false,
        }
    }
}
