//! Estimation constants: employer premium funding, average service prices,
//! drug prices and fixed annual add-ons
//!
//! These are first-order proxies for negotiated prices, not actuarial values.

use crate::error::AdvisorError;
use crate::household::MedicationFrequency;
use crate::money::Money;
use crate::plans::DrugTier;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Employer share of the monthly premium
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployerContribution {
    /// 100% of the Silver 3000 employee rate
    pub employee_base: Money,
    /// Flat amount per covered dependent, regardless of age band
    pub per_dependent: Money,
}

impl Default for EmployerContribution {
    fn default() -> Self {
        Self {
            employee_base: Money::from_dollars(554.15),
            // 80% of the Silver 3000 child rate
            per_dependent: Money::from_dollars(258.74),
        }
    }
}

impl EmployerContribution {
    pub fn monthly_for(&self, total_dependents: u32) -> Money {
        self.employee_base + self.per_dependent * total_dependents
    }
}

/// Average billed price per visit, used when a service is coinsurance-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BaseServiceCosts {
    pub primary_care: Money,
    pub specialist: Money,
    pub emergency_room: Money,
    pub urgent_care: Money,
    pub lab_work: Money,
    pub imaging: Money,
}

impl Default for BaseServiceCosts {
    fn default() -> Self {
        Self {
            primary_care: Money::from_whole_dollars(150),
            specialist: Money::from_whole_dollars(250),
            emergency_room: Money::from_whole_dollars(2000),
            urgent_care: Money::from_whole_dollars(200),
            lab_work: Money::from_whole_dollars(150),
            imaging: Money::from_whole_dollars(400),
        }
    }
}

/// Average price per fill by drug tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrugBaseCosts {
    pub preferred_generic: Money,
    pub generic: Money,
    pub preferred_brand: Money,
    pub brand: Money,
    pub specialty: Money,
}

impl Default for DrugBaseCosts {
    fn default() -> Self {
        Self {
            preferred_generic: Money::from_whole_dollars(20),
            generic: Money::from_whole_dollars(40),
            preferred_brand: Money::from_whole_dollars(200),
            brand: Money::from_whole_dollars(400),
            specialty: Money::from_whole_dollars(1000),
        }
    }
}

impl DrugBaseCosts {
    pub fn for_tier(&self, tier: DrugTier) -> Money {
        match tier {
            DrugTier::PreferredGeneric => self.preferred_generic,
            DrugTier::Generic => self.generic,
            DrugTier::PreferredBrand => self.preferred_brand,
            DrugTier::Brand => self.brand,
            DrugTier::Specialty => self.specialty,
        }
    }
}

/// All constants used by the medical cost estimator and premium calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostAssumptions {
    pub employer_contribution: EmployerContribution,

    pub base_service_costs: BaseServiceCosts,

    pub drug_base_costs: DrugBaseCosts,

    /// Fills per month for as-needed medications
    pub as_needed_fills_per_month: f64,

    /// Added per chronic condition per year
    pub chronic_condition_annual: Money,

    /// Added when a pregnancy is planned
    pub pregnancy_annual: Money,

    /// Lab visits assumed when none are reported: max(minimum, conditions x per_condition)
    pub default_lab_visits_minimum: u32,
    pub default_lab_visits_per_condition: u32,

    /// Imaging studies per year with and without chronic conditions
    pub imaging_visits_with_chronic: f64,
    pub imaging_visits_without_chronic: f64,
}

impl Default for CostAssumptions {
    fn default() -> Self {
        Self::default_estimates()
    }
}

impl CostAssumptions {
    /// Standard estimates used for open enrollment comparisons
    pub fn default_estimates() -> Self {
        Self {
            employer_contribution: EmployerContribution::default(),
            base_service_costs: BaseServiceCosts::default(),
            drug_base_costs: DrugBaseCosts::default(),
            as_needed_fills_per_month: 0.5,
            chronic_condition_annual: Money::from_whole_dollars(2500),
            pregnancy_annual: Money::from_whole_dollars(6000),
            default_lab_visits_minimum: 2,
            default_lab_visits_per_condition: 2,
            imaging_visits_with_chronic: 2.0,
            imaging_visits_without_chronic: 0.5,
        }
    }

    /// Load overrides from a JSON file; omitted fields keep their defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, AdvisorError> {
        let path = path.as_ref();
        log::info!("Loading cost assumptions from {}", path.display());
        let body = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fills per month for a medication frequency
    ///
    /// Scheduled medications are one refill a month regardless of dosing frequency.
    pub fn fills_per_month(&self, frequency: MedicationFrequency) -> f64 {
        match frequency {
            MedicationFrequency::Daily | MedicationFrequency::Weekly | MedicationFrequency::Monthly => 1.0,
            MedicationFrequency::AsNeeded => self.as_needed_fills_per_month,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employer_contribution() {
        let employer = EmployerContribution::default();
        assert_eq!(employer.monthly_for(0), Money::from_dollars(554.15));
        assert_eq!(employer.monthly_for(3), Money::from_dollars(554.15 + 3.0 * 258.74));
    }

    #[test]
    fn test_partial_override() {
        let assumptions: CostAssumptions =
            serde_json::from_str(r#"{"pregnancyAnnual": 8000, "baseServiceCosts": {"imaging": 500}}"#).unwrap();
        assert_eq!(assumptions.pregnancy_annual, Money::from_whole_dollars(8000));
        assert_eq!(assumptions.base_service_costs.imaging, Money::from_whole_dollars(500));
        assert_eq!(assumptions.base_service_costs.specialist, Money::from_whole_dollars(250));
        assert_eq!(assumptions.chronic_condition_annual, Money::from_whole_dollars(2500));
    }

    #[test]
    fn test_fills_per_month() {
        let assumptions = CostAssumptions::default_estimates();
        assert_eq!(assumptions.fills_per_month(MedicationFrequency::Weekly), 1.0);
        assert_eq!(assumptions.fills_per_month(MedicationFrequency::AsNeeded), 0.5);
        assert_eq!(assumptions.drug_base_costs.for_tier(DrugTier::Specialty), Money::from_whole_dollars(1000));
    }
}
