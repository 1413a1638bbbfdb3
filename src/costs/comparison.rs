//! Cost every catalog plan for a household and rank by annual total
//!
//! The engine holds the catalog and estimation constants once and can be shared
//! across threads; every comparison is a pure function of its inputs.

use super::assumptions::CostAssumptions;
use super::calculation::{calculate_total_annual_cost, CostCalculation};
use crate::household::{FamilyComposition, HealthProfile, Scenario};
use crate::plans::PlanCatalog;
use rayon::prelude::*;
use serde::Serialize;

/// Sorted plan costs for one household of a batch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdComparison {
    pub scenario_id: String,
    pub calculations: Vec<CostCalculation>,
}

#[derive(Debug, Clone)]
pub struct ComparisonEngine {
    catalog: PlanCatalog,
    assumptions: CostAssumptions,
}

impl ComparisonEngine {
    pub fn new(catalog: PlanCatalog, assumptions: CostAssumptions) -> Self {
        Self { catalog, assumptions }
    }

    pub fn catalog(&self) -> &PlanCatalog {
        &self.catalog
    }

    pub fn assumptions(&self) -> &CostAssumptions {
        &self.assumptions
    }

    /// Cost every plan, cheapest first
    ///
    /// The sort is stable, so plans with equal totals keep catalog order.
    pub fn compare_all_plans(&self, family: &FamilyComposition, health: &HealthProfile) -> Vec<CostCalculation> {
        let mut calculations: Vec<CostCalculation> = self
            .catalog
            .get_all_plans()
            .iter()
            .map(|plan| calculate_total_annual_cost(plan, family, health, &self.assumptions))
            .collect();

        calculations.sort_by_key(|calc| calc.total_annual_cost);
        calculations
    }

    /// Compare many independent households in parallel
    ///
    /// Output order matches input order.
    pub fn compare_households(&self, scenarios: &[Scenario]) -> Vec<HouseholdComparison> {
        scenarios
            .par_iter()
            .map(|scenario| HouseholdComparison {
                scenario_id: scenario.scenario_id.clone(),
                calculations: self.compare_all_plans(&scenario.family, &scenario.health),
            })
            .collect()
    }
}

impl Default for ComparisonEngine {
    fn default() -> Self {
        Self::new(PlanCatalog::default_catalog(), CostAssumptions::default_estimates())
    }
}
