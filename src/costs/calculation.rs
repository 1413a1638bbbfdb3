//! Total annual cost for one plan and household

use super::assumptions::CostAssumptions;
use super::hsa::{calculate_hsa_contribution, HsaCalculation};
use super::medical::{estimate_medical_costs, MedicalCostBreakdown};
use super::premium::{calculate_premium_cost, PremiumCalculation};
use crate::household::{FamilyComposition, HealthProfile};
use crate::money::Money;
use crate::plans::HealthcarePlan;
use serde::{Deserialize, Serialize};

/// Complete cost picture for one plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCalculation {
    pub plan_id: String,
    pub plan_name: String,

    pub premium: PremiumCalculation,
    pub hsa: HsaCalculation,
    pub medical_costs: MedicalCostBreakdown,

    /// Employee annual premium + capped medical spend. The HSA deposit is
    /// reported alongside and never netted in.
    pub total_annual_cost: Money,

    /// Employee monthly premium less the monthly HSA deposit; may be negative
    pub net_monthly_premium: Money,

    /// Employee monthly premium as shown in plan listings
    pub monthly_premium_display: Money,
}

pub fn calculate_total_annual_cost(
    plan: &HealthcarePlan,
    family: &FamilyComposition,
    health: &HealthProfile,
    assumptions: &CostAssumptions,
) -> CostCalculation {
    let premium = calculate_premium_cost(plan, family, &assumptions.employer_contribution);
    let hsa = calculate_hsa_contribution(plan, family);
    let medical_costs = estimate_medical_costs(plan, health, family, assumptions);

    let total_annual_cost = premium.employee_annual_premium + medical_costs.final_medical_costs;
    let net_monthly_premium = premium.employee_monthly_premium - hsa.monthly_hsa_contribution;

    log::debug!(
        "{}: premium {} + medical {} = {} (hsa deposit {})",
        plan.plan_id,
        premium.employee_annual_premium,
        medical_costs.final_medical_costs,
        total_annual_cost,
        hsa.annual_hsa_contribution
    );

    CostCalculation {
        plan_id: plan.plan_id.clone(),
        plan_name: plan.plan_name.clone(),
        monthly_premium_display: premium.employee_monthly_premium,
        premium,
        hsa,
        medical_costs,
        total_annual_cost,
        net_monthly_premium,
    }
}
