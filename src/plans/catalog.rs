//! Read-only registry of the plans offered for the current plan year

use super::data::{
    Coinsurance, Copay, CoverageLimit, HealthcarePlan, HsaContribution, MonthlyRates, PlanTier,
    PlanType, PrescriptionCosts, ServiceCostRule, ServiceCosts,
};
use crate::error::{AdvisorError, CatalogError};
use crate::money::Money;
use std::collections::HashSet;

/// Validated, immutable plan menu
///
/// Built once at startup and shared by reference; there are no mutation operations.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanCatalog {
    plans: Vec<HealthcarePlan>,
}

impl PlanCatalog {
    /// Create a catalog, validating every plan and rejecting duplicate ids
    ///
    /// An empty plan list is accepted; downstream recommendation reports it.
    pub fn new(plans: Vec<HealthcarePlan>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for plan in &plans {
            plan.validate()?;
            if !seen.insert(plan.plan_id.as_str()) {
                return Err(CatalogError::DuplicatePlanId(plan.plan_id.clone()));
            }
        }
        Ok(Self { plans })
    }

    /// The five plans offered for the 2025-2026 plan year, validated like any
    /// loaded catalog
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(default_plans())
    }

    /// The built-in plans without the validation pass of [`PlanCatalog::builtin`]
    pub fn default_catalog() -> Self {
        Self {
            plans: default_plans(),
        }
    }

    /// All plans in catalog order
    pub fn get_all_plans(&self) -> &[HealthcarePlan] {
        &self.plans
    }

    pub fn get_plan_by_id(&self, plan_id: &str) -> Result<&HealthcarePlan, AdvisorError> {
        self.find(plan_id)
            .ok_or_else(|| AdvisorError::PlanNotFound(plan_id.to_string()))
    }

    /// Non-failing lookup for callers iterating the catalog's own ids
    pub fn find(&self, plan_id: &str) -> Option<&HealthcarePlan> {
        self.plans.iter().find(|plan| plan.plan_id == plan_id)
    }

    pub fn hsa_plans(&self) -> impl Iterator<Item = &HealthcarePlan> {
        self.plans.iter().filter(|plan| plan.is_hsa)
    }

    pub fn ppo_plans(&self) -> impl Iterator<Item = &HealthcarePlan> {
        self.plans.iter().filter(|plan| plan.plan_type == PlanType::Ppo)
    }

    pub fn plans_by_tier(&self, tier: PlanTier) -> impl Iterator<Item = &HealthcarePlan> {
        self.plans.iter().filter(move |plan| plan.tier == tier)
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Multi-line plan summary for display
    pub fn plan_details(&self, plan_id: &str) -> Result<String, AdvisorError> {
        let plan = self.get_plan_by_id(plan_id)?;

        let mut lines = vec![
            format!("{} ({})", plan.plan_name, plan.plan_type),
            format!("- Monthly Rate (Employee): {}", plan.monthly_rates.employee),
            format!("- Deductible (Individual): {}", plan.deductibles.individual.format_whole()),
            format!(
                "- Out-of-Pocket Max (Individual): {}",
                plan.out_of_pocket_max.individual.format_whole()
            ),
        ];
        if let Some(hsa) = plan.hsa_schedule() {
            lines.push(format!(
                "- HSA Contribution: {}/month (employee only)",
                hsa.employee_only.format_whole()
            ));
        }
        lines.push(format!("- Primary Care: {}", plan.services.primary_care.describe()));
        lines.push(format!("- Specialist: {}", plan.services.specialist.describe()));

        Ok(lines.join("\n"))
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        Self::default_catalog()
    }
}

fn dollars(amount: f64) -> Money {
    Money::from_dollars(amount)
}

fn copay(amount: f64, deductible_waived: bool) -> ServiceCostRule {
    ServiceCostRule::Copay(Copay {
        amount: dollars(amount),
        deductible_waived,
    })
}

fn coinsurance(percentage: f64, deductible_applies: bool) -> ServiceCostRule {
    ServiceCostRule::Coinsurance(Coinsurance {
        percentage,
        deductible_applies,
    })
}

fn copay_with_coinsurance(amount: f64, percentage: f64) -> ServiceCostRule {
    ServiceCostRule::CopayWithCoinsurance {
        copay: Copay {
            amount: dollars(amount),
            deductible_waived: false,
        },
        coinsurance: Coinsurance {
            percentage,
            deductible_applies: true,
        },
    }
}

fn rates(employee: f64, child_0_to_18: f64, child_19_to_20: f64) -> MonthlyRates {
    // Adult dependents are rated the same as the employee
    MonthlyRates {
        employee: dollars(employee),
        spouse: dollars(employee),
        child_0_to_18: dollars(child_0_to_18),
        child_19_to_20: dollars(child_19_to_20),
    }
}

fn limit(individual: f64) -> CoverageLimit {
    CoverageLimit {
        individual: dollars(individual),
        family: dollars(individual * 2.0),
    }
}

/// Uniform coinsurance across every service (HSA plans)
fn uniform_coinsurance(percentage: f64) -> ServiceCosts {
    let rule = coinsurance(percentage, true);
    ServiceCosts {
        primary_care: rule,
        specialist: rule,
        emergency_room: rule,
        urgent_care: rule,
        telehealth: rule,
        lab_work: rule,
        imaging: rule,
    }
}

fn hsa_formulary() -> PrescriptionCosts {
    PrescriptionCosts {
        preferred_generic: coinsurance(10.0, true),
        generic: coinsurance(20.0, true),
        preferred_brand: coinsurance(30.0, true),
        brand: coinsurance(40.0, true),
        specialty: coinsurance(50.0, true),
    }
}

fn ppo_formulary(preferred_generic: f64, preferred_brand: f64) -> PrescriptionCosts {
    PrescriptionCosts {
        preferred_generic: copay(preferred_generic, true),
        generic: copay(35.0, true),
        preferred_brand: copay(preferred_brand, true),
        brand: coinsurance(50.0, true),
        // Published range is 20-50%, midpoint used
        specialty: coinsurance(35.0, true),
    }
}

fn features(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn default_plans() -> Vec<HealthcarePlan> {
    let employer_hsa = HsaContribution {
        employee_only: Money::from_whole_dollars(100),
        with_dependents: Money::from_whole_dollars(200),
    };

    vec![
        HealthcarePlan {
            plan_id: "silver-3000-ppo".to_string(),
            plan_name: "Regence Silver 3000 Preferred".to_string(),
            short_name: "Silver 3000".to_string(),
            tier: PlanTier::Silver,
            plan_type: PlanType::Ppo,
            monthly_rates: rates(554.15, 323.43, 328.48),
            deductibles: limit(3000.0),
            out_of_pocket_max: limit(8650.0),
            is_hsa: false,
            hsa_contribution: None,
            services: ServiceCosts {
                primary_care: copay(40.0, true),
                specialist: copay(60.0, true),
                emergency_room: copay_with_coinsurance(400.0, 35.0),
                urgent_care: copay(60.0, true),
                telehealth: copay(10.0, true),
                lab_work: coinsurance(35.0, true),
                imaging: coinsurance(35.0, true),
            },
            prescriptions: ppo_formulary(20.0, 60.0),
            features: features(&[
                "FREE for employee-only coverage",
                "Primary care and specialist copays (no deductible)",
                "Low-cost telehealth",
                "Good for healthy individuals/families",
            ]),
        },
        HealthcarePlan {
            plan_id: "silver-hsa-2700".to_string(),
            plan_name: "Regence Silver HSA 2700 Preferred".to_string(),
            short_name: "Silver HSA 2700".to_string(),
            tier: PlanTier::Silver,
            plan_type: PlanType::Hsa,
            monthly_rates: rates(584.09, 341.12, 346.17),
            deductibles: limit(2700.0),
            out_of_pocket_max: limit(6900.0),
            is_hsa: true,
            hsa_contribution: Some(employer_hsa),
            services: uniform_coinsurance(30.0),
            prescriptions: hsa_formulary(),
            features: features(&[
                "HSA-eligible - save pre-tax dollars",
                "Company contributes $100-200/month to YOUR HSA",
                "NET COST can be negative for employee-only",
                "Lower deductible than typical HSA",
                "Best for healthy individuals who want tax savings",
            ]),
        },
        HealthcarePlan {
            plan_id: "gold-1000-ppo".to_string(),
            plan_name: "Regence Gold 1000 Preferred".to_string(),
            short_name: "Gold 1000".to_string(),
            tier: PlanTier::Gold,
            plan_type: PlanType::Ppo,
            monthly_rates: rates(678.75, 397.02, 402.07),
            deductibles: limit(1000.0),
            out_of_pocket_max: limit(7000.0),
            is_hsa: false,
            hsa_contribution: None,
            services: ServiceCosts {
                primary_care: copay(30.0, true),
                specialist: copay(50.0, true),
                emergency_room: copay_with_coinsurance(300.0, 30.0),
                urgent_care: copay(50.0, true),
                telehealth: copay(10.0, true),
                // Deductible waived for lab work
                lab_work: coinsurance(30.0, false),
                imaging: coinsurance(30.0, true),
            },
            prescriptions: ppo_formulary(10.0, 50.0),
            features: features(&[
                "LOWEST deductible - only $1000",
                "Best overall coverage",
                "Lab work deductible waived",
                "Predictable copays for most services",
                "Great for chronic conditions or high usage",
            ]),
        },
        HealthcarePlan {
            plan_id: "gold-2000-ppo".to_string(),
            plan_name: "Regence Gold 2000 Preferred".to_string(),
            short_name: "Gold 2000".to_string(),
            tier: PlanTier::Gold,
            plan_type: PlanType::Ppo,
            monthly_rates: rates(654.59, 382.76, 387.81),
            deductibles: limit(2000.0),
            out_of_pocket_max: limit(5750.0),
            is_hsa: false,
            hsa_contribution: None,
            services: ServiceCosts {
                primary_care: copay(35.0, true),
                specialist: copay(50.0, true),
                emergency_room: copay_with_coinsurance(300.0, 25.0),
                urgent_care: copay(50.0, true),
                telehealth: copay(10.0, true),
                lab_work: coinsurance(25.0, false),
                imaging: coinsurance(25.0, true),
            },
            prescriptions: ppo_formulary(10.0, 50.0),
            features: features(&[
                "Low out-of-pocket maximum",
                "Balanced cost and coverage",
                "Lab work deductible waived",
                "Lower coinsurance rates (25%)",
                "Great for families with moderate usage",
            ]),
        },
        HealthcarePlan {
            plan_id: "gold-hsa-1800".to_string(),
            plan_name: "Regence Gold HSA 1800 Preferred".to_string(),
            short_name: "Gold HSA 1800".to_string(),
            tier: PlanTier::Gold,
            plan_type: PlanType::Hsa,
            monthly_rates: rates(685.50, 401.01, 406.06),
            deductibles: limit(1800.0),
            out_of_pocket_max: limit(4500.0),
            is_hsa: true,
            hsa_contribution: Some(employer_hsa),
            services: uniform_coinsurance(20.0),
            prescriptions: hsa_formulary(),
            features: features(&[
                "LOWEST out-of-pocket maximum of all plans",
                "HSA-eligible with great coverage",
                "Company contributes $100-200/month to YOUR HSA",
                "Lower coinsurance rates (20%)",
                "Best for high medical needs who want HSA benefits",
            ]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = PlanCatalog::default_catalog();
        assert_eq!(catalog.len(), 5);
        assert_eq!(PlanCatalog::builtin().unwrap(), catalog);
    }

    #[test]
    fn test_catalog_order_and_lookup() {
        let catalog = PlanCatalog::default_catalog();
        let ids: Vec<_> = catalog.get_all_plans().iter().map(|p| p.plan_id.as_str()).collect();
        assert_eq!(
            ids,
            ["silver-3000-ppo", "silver-hsa-2700", "gold-1000-ppo", "gold-2000-ppo", "gold-hsa-1800"]
        );

        let gold = catalog.get_plan_by_id("gold-1000-ppo").unwrap();
        assert_eq!(gold.monthly_rates.employee, Money::from_dollars(678.75));
        assert_eq!(gold.out_of_pocket_max.family, Money::from_whole_dollars(14000));

        let err = catalog.get_plan_by_id("bronze-9000").unwrap_err();
        assert!(matches!(err, AdvisorError::PlanNotFound(id) if id == "bronze-9000"));
    }

    #[test]
    fn test_filters() {
        let catalog = PlanCatalog::default_catalog();
        assert_eq!(catalog.hsa_plans().count(), 2);
        assert_eq!(catalog.ppo_plans().count(), 3);
        assert_eq!(catalog.plans_by_tier(PlanTier::Gold).count(), 3);
        assert_eq!(catalog.plans_by_tier(PlanTier::Silver).count(), 2);
    }

    #[test]
    fn test_er_rules_carry_copay_and_coinsurance() {
        let catalog = PlanCatalog::default_catalog();
        let silver = catalog.get_plan_by_id("silver-3000-ppo").unwrap();
        let er = silver.services.emergency_room;
        assert_eq!(er.copay().unwrap().amount, Money::from_whole_dollars(400));
        assert_eq!(er.coinsurance().unwrap().percentage, 35.0);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let plans = default_plans();
        let mut duplicated = plans.clone();
        duplicated.push(plans[0].clone());
        assert_eq!(
            PlanCatalog::new(duplicated).unwrap_err(),
            CatalogError::DuplicatePlanId("silver-3000-ppo".to_string())
        );
    }

    #[test]
    fn test_hsa_plan_without_schedule_rejected() {
        let mut plans = default_plans();
        plans[1].hsa_contribution = None;
        assert!(matches!(
            PlanCatalog::new(plans).unwrap_err(),
            CatalogError::MissingHsaContribution { .. }
        ));
    }

    #[test]
    fn test_bad_percentage_rejected() {
        let mut plans = default_plans();
        plans[0].services.imaging = coinsurance(135.0, true);
        assert!(matches!(
            PlanCatalog::new(plans).unwrap_err(),
            CatalogError::PercentageOutOfRange { value, .. } if value == 135.0
        ));
    }

    #[test]
    fn test_empty_catalog_allowed() {
        let catalog = PlanCatalog::new(Vec::new()).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_plan_details() {
        let catalog = PlanCatalog::default_catalog();
        let details = catalog.plan_details("silver-hsa-2700").unwrap();
        assert!(details.starts_with("Regence Silver HSA 2700 Preferred (HSA)"));
        assert!(details.contains("- Monthly Rate (Employee): $584.09"));
        assert!(details.contains("- HSA Contribution: $100/month (employee only)"));
        assert!(details.contains("- Primary Care: 30% coinsurance"));

        let ppo = catalog.plan_details("silver-3000-ppo").unwrap();
        assert!(ppo.contains("- Primary Care: $40 copay"));
        assert!(!ppo.contains("HSA Contribution"));
    }
}
