//! Household, health profile and preference inputs, plus boundary validation

mod data;
mod validation;
mod request;
pub mod loader;

pub use data::{
    FamilyComposition, HealthProfile, Medication, MedicationFrequency, OverallHealth, Preferences,
};
pub use validation::{
    MAX_CHILDREN_PER_BAND, MAX_DOCTOR_VISITS, MAX_ER_VISITS, MAX_LAB_VISITS, MAX_SPECIALIST_VISITS,
    MAX_SPOUSES, MAX_URGENT_CARE_VISITS,
};
pub use request::CalculateCostsRequest;
pub use loader::{load_scenarios, load_scenarios_from_reader, Scenario};
