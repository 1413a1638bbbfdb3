//! Employer HSA contribution accounting

use crate::household::FamilyComposition;
use crate::money::Money;
use crate::plans::HealthcarePlan;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsaCalculation {
    #[serde(rename = "isHSAPlan")]
    pub is_hsa_plan: bool,
    #[serde(rename = "monthlyHSAContribution")]
    pub monthly_hsa_contribution: Money,
    #[serde(rename = "annualHSAContribution")]
    pub annual_hsa_contribution: Money,
}

impl HsaCalculation {
    pub fn not_eligible() -> Self {
        Self {
            is_hsa_plan: false,
            monthly_hsa_contribution: Money::ZERO,
            annual_hsa_contribution: Money::ZERO,
        }
    }
}

/// Employer HSA deposit for the household
///
/// Any dependent selects the with-dependents rate; the count does not scale it.
pub fn calculate_hsa_contribution(plan: &HealthcarePlan, family: &FamilyComposition) -> HsaCalculation {
    let Some(schedule) = plan.hsa_schedule() else {
        return HsaCalculation::not_eligible();
    };

    let monthly = if family.has_family() {
        schedule.with_dependents
    } else {
        schedule.employee_only
    };

    HsaCalculation {
        is_hsa_plan: true,
        monthly_hsa_contribution: monthly,
        annual_hsa_contribution: monthly * 12,
    }
}
