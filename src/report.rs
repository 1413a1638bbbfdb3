//! Caller-facing cost report and display helpers
//!
//! Shapes a [`PlanComparison`] into the response returned by the HTTP handler
//! and printed by the CLI.

use crate::costs::CostCalculation;
use crate::error::AdvisorError;
use crate::money::Money;
use crate::plans::{PlanCatalog, PlanTier, PlanType};
use crate::recommendation::{PlanComparison, RuleKind};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HsaSummary {
    pub monthly: Money,
    pub annual: Money,
}

impl HsaSummary {
    fn from_calculation(calc: &CostCalculation) -> Option<Self> {
        calc.hsa.is_hsa_plan.then_some(Self {
            monthly: calc.hsa.monthly_hsa_contribution,
            annual: calc.hsa.annual_hsa_contribution,
        })
    }
}

/// Medical spend by category for the recommended plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub primary_care: Money,
    pub specialist: Money,
    pub emergency_room: Money,
    pub urgent_care: Money,
    pub lab_work: Money,
    pub imaging: Money,
    pub prescriptions: Money,
    pub chronic_conditions: Money,
    pub pregnancy: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedPlanSummary {
    pub plan_id: String,
    pub plan_name: String,
    pub monthly_premium: Money,
    pub annual_premium: Money,
    pub hsa_contribution: Option<HsaSummary>,
    pub estimated_medical_costs: Money,
    pub total_annual_cost: Money,
    pub breakdown: CostBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub plan_id: String,
    pub plan_name: String,
    pub tier: PlanTier,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub monthly_premium: Money,
    pub annual_premium: Money,
    pub hsa_contribution: Option<HsaSummary>,
    pub estimated_medical_costs: Money,
    pub total_annual_cost: Money,
    /// Individual deductible
    pub deductible: Money,
    /// Individual out-of-pocket maximum
    pub oop_max: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostComparisonEntry {
    pub plan_name: String,
    pub total_annual_cost: Money,
    /// Extra annual cost relative to the recommended plan
    pub savings: Money,
}

/// Full response for a cost calculation request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateCostsResponse {
    pub success: bool,
    pub recommended_plan: RecommendedPlanSummary,
    pub all_plans: Vec<PlanSummary>,
    pub reasoning: String,
    pub matched_rule: RuleKind,
    pub cost_comparison: Vec<CostComparisonEntry>,
    pub generated_at: DateTime<Utc>,
}

impl CalculateCostsResponse {
    pub fn build(comparison: &PlanComparison, catalog: &PlanCatalog) -> Result<Self, AdvisorError> {
        Self::build_at(comparison, catalog, Utc::now())
    }

    pub fn build_at(
        comparison: &PlanComparison,
        catalog: &PlanCatalog,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, AdvisorError> {
        let recommended = comparison
            .recommended_plan()
            .ok_or_else(|| AdvisorError::PlanNotFound(comparison.recommended_plan_id.clone()))?;

        let all_plans = comparison
            .plans
            .iter()
            .map(|calc| {
                let plan = catalog.get_plan_by_id(&calc.plan_id)?;
                Ok(PlanSummary {
                    plan_id: calc.plan_id.clone(),
                    plan_name: calc.plan_name.clone(),
                    tier: plan.tier,
                    plan_type: plan.plan_type,
                    monthly_premium: calc.premium.employee_monthly_premium,
                    annual_premium: calc.premium.employee_annual_premium,
                    hsa_contribution: HsaSummary::from_calculation(calc),
                    estimated_medical_costs: calc.medical_costs.final_medical_costs,
                    total_annual_cost: calc.total_annual_cost,
                    deductible: plan.deductibles.individual,
                    oop_max: plan.out_of_pocket_max.individual,
                })
            })
            .collect::<Result<Vec<_>, AdvisorError>>()?;

        let cost_comparison = comparison
            .plans
            .iter()
            .map(|calc| CostComparisonEntry {
                plan_name: calc.plan_name.clone(),
                total_annual_cost: calc.total_annual_cost,
                savings: calculate_savings(recommended, calc),
            })
            .collect();

        Ok(Self {
            success: true,
            recommended_plan: summarize_recommended(recommended),
            all_plans,
            reasoning: comparison.reasoning.clone(),
            matched_rule: comparison.matched_rule,
            cost_comparison,
            generated_at,
        })
    }
}

fn summarize_recommended(calc: &CostCalculation) -> RecommendedPlanSummary {
    let medical = &calc.medical_costs;
    RecommendedPlanSummary {
        plan_id: calc.plan_id.clone(),
        plan_name: calc.plan_name.clone(),
        monthly_premium: calc.premium.employee_monthly_premium,
        annual_premium: calc.premium.employee_annual_premium,
        hsa_contribution: HsaSummary::from_calculation(calc),
        estimated_medical_costs: medical.final_medical_costs,
        total_annual_cost: calc.total_annual_cost,
        breakdown: CostBreakdown {
            primary_care: medical.primary_care_visits,
            specialist: medical.specialist_visits,
            emergency_room: medical.emergency_room_visits,
            urgent_care: medical.urgent_care_visits,
            lab_work: medical.lab_work,
            imaging: medical.imaging,
            prescriptions: medical.prescriptions,
            chronic_conditions: medical.chronic_condition_management,
            pregnancy: medical.pregnancy_costs,
        },
    }
}

/// Error body returned to HTTP callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

/// How much more `other` costs per year than `baseline`
pub fn calculate_savings(baseline: &CostCalculation, other: &CostCalculation) -> Money {
    other.total_annual_cost - baseline.total_annual_cost
}

/// Short multi-line summary of one plan's costs
pub fn cost_summary(calc: &CostCalculation) -> String {
    let hsa_info = if calc.hsa.is_hsa_plan {
        format!(
            " + {}/year HSA contribution",
            calc.hsa.annual_hsa_contribution.format_whole()
        )
    } else {
        String::new()
    };

    format!(
        "{}\nMonthly Premium: {}{}\nEstimated Medical Costs: {}/year\nTotal Annual Cost: {}",
        calc.plan_name,
        calc.premium.employee_monthly_premium.format_cents(),
        hsa_info,
        calc.medical_costs.final_medical_costs.format_whole(),
        calc.total_annual_cost.format_whole()
    )
}

/// `$1,234.56`
pub fn format_currency(amount: Money) -> String {
    amount.format_cents()
}

/// `$1,235`
pub fn format_currency_whole(amount: Money) -> String {
    amount.format_whole()
}
