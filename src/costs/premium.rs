//! Premium apportionment between employer and employee

use super::assumptions::EmployerContribution;
use crate::household::FamilyComposition;
use crate::money::Money;
use crate::plans::HealthcarePlan;
use serde::{Deserialize, Serialize};

/// Monthly and annual premium split for one plan and household
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumCalculation {
    pub plan_id: String,

    // Gross costs before employer contribution
    pub gross_employee_cost: Money,
    pub gross_spouse_cost: Money,
    pub gross_children_cost: Money,
    pub gross_total_monthly: Money,

    pub employer_premium_contribution: Money,

    // What the employee pays
    pub employee_monthly_premium: Money,
    pub employee_annual_premium: Money,
}

/// Compute the premium split
///
/// Employer funding beyond the gross premium is dropped, never carried into the HSA.
pub fn calculate_premium_cost(
    plan: &HealthcarePlan,
    family: &FamilyComposition,
    employer: &EmployerContribution,
) -> PremiumCalculation {
    let rates = &plan.monthly_rates;

    let gross_employee_cost = rates.employee;
    let gross_spouse_cost = rates.spouse * family.num_spouses;
    let gross_children_cost = rates.child_0_to_18 * family.num_children_0_to_18
        + rates.child_19_to_20 * family.num_children_19_to_20;
    let gross_total_monthly = gross_employee_cost + gross_spouse_cost + gross_children_cost;

    let employer_premium_contribution = employer.monthly_for(family.total_dependents());
    let employee_monthly_premium = (gross_total_monthly - employer_premium_contribution).non_negative();

    PremiumCalculation {
        plan_id: plan.plan_id.clone(),
        gross_employee_cost,
        gross_spouse_cost,
        gross_children_cost,
        gross_total_monthly,
        employer_premium_contribution,
        employee_monthly_premium,
        employee_annual_premium: employee_monthly_premium * 12,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::PlanCatalog;

    fn premium_for(plan_id: &str, family: FamilyComposition) -> PremiumCalculation {
        let catalog = PlanCatalog::default_catalog();
        let plan = catalog.get_plan_by_id(plan_id).unwrap();
        calculate_premium_cost(plan, &family, &EmployerContribution::default())
    }

    #[test]
    fn test_silver_3000_employee_only_is_free() {
        let premium = premium_for("silver-3000-ppo", FamilyComposition::employee_only());
        assert_eq!(premium.gross_total_monthly, Money::from_dollars(554.15));
        assert_eq!(premium.employer_premium_contribution, Money::from_dollars(554.15));
        assert_eq!(premium.employee_monthly_premium, Money::ZERO);
        assert_eq!(premium.employee_annual_premium, Money::ZERO);
    }

    #[test]
    fn test_silver_hsa_employee_only() {
        let premium = premium_for("silver-hsa-2700", FamilyComposition::employee_only());
        assert_eq!(premium.gross_total_monthly, Money::from_dollars(584.09));
        assert_eq!(premium.employee_monthly_premium, Money::from_dollars(29.94));
        assert_eq!(premium.employee_annual_premium, Money::from_dollars(359.28));
        approx::assert_relative_eq!(premium.employee_monthly_premium.to_dollars(), 29.94);
    }

    #[test]
    fn test_family_gross_breakdown() {
        // Spouse + two young children + one 19-20 year old
        let premium = premium_for("gold-1000-ppo", FamilyComposition::new(1, 2, 1));
        assert_eq!(premium.gross_spouse_cost, Money::from_dollars(678.75));
        assert_eq!(
            premium.gross_children_cost,
            Money::from_dollars(397.02) * 2 + Money::from_dollars(402.07)
        );
        assert_eq!(premium.gross_total_monthly, Money::from_dollars(678.75 * 2.0 + 397.02 * 2.0 + 402.07));
        assert_eq!(
            premium.employer_premium_contribution,
            Money::from_dollars(554.15) + Money::from_dollars(258.74) * 4
        );
        assert_eq!(
            premium.employee_monthly_premium,
            premium.gross_total_monthly - premium.employer_premium_contribution
        );
    }

    #[test]
    fn test_premium_never_negative_and_annual_is_twelve_months() {
        let catalog = PlanCatalog::default_catalog();
        let generous = EmployerContribution {
            employee_base: Money::from_whole_dollars(5000),
            per_dependent: Money::from_whole_dollars(5000),
        };
        for plan in catalog.get_all_plans() {
            for spouses in 0..=1 {
                for kids in 0..=4 {
                    let family = FamilyComposition::new(spouses, kids, kids / 2);
                    for employer in [EmployerContribution::default(), generous] {
                        let premium = calculate_premium_cost(plan, &family, &employer);
                        assert!(!premium.employee_monthly_premium.is_negative());
                        assert_eq!(premium.employee_annual_premium, premium.employee_monthly_premium * 12);
                    }
                }
            }
        }
    }
}
