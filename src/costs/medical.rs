//! Out-of-pocket medical spend estimation
//!
//! Each service category is priced independently from the plan's cost rule.
//! Deductible accumulation across services is not modeled: a copay is charged
//! whether or not its deductible is waived, and coinsurance applies from the
//! first dollar. The out-of-pocket maximum is the single place plan limits are
//! enforced.

use super::assumptions::CostAssumptions;
use crate::household::{FamilyComposition, HealthProfile, Medication};
use crate::money::Money;
use crate::plans::{HealthcarePlan, ServiceCostRule};
use serde::{Deserialize, Serialize};

/// Annual out-of-pocket estimate for one plan, by category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalCostBreakdown {
    pub primary_care_visits: Money,
    pub specialist_visits: Money,
    pub emergency_room_visits: Money,
    pub urgent_care_visits: Money,
    pub lab_work: Money,
    pub imaging: Money,
    pub prescriptions: Money,
    pub chronic_condition_management: Money,
    pub pregnancy_costs: Money,

    /// Sum of every category before the cap
    pub subtotal: Money,

    /// Out-of-pocket maximum applicable to the household
    #[serde(rename = "cappedAtOOPMax")]
    pub capped_at_oop_max: Money,

    /// `min(subtotal, capped_at_oop_max)`
    pub final_medical_costs: Money,

    /// Whether the out-of-pocket maximum was binding
    pub oop_cap_reached: bool,

    /// Lab visits priced (reported or estimated)
    pub lab_visits_used: u32,

    /// Imaging studies priced (always estimated)
    pub imaging_visits_used: f64,
}

/// Price `visits` uses of a non-emergency service
///
/// Copay takes precedence over coinsurance when a rule carries both.
pub fn calculate_service_cost(rule: &ServiceCostRule, visits: f64, base_cost: Money) -> Money {
    if visits <= 0.0 {
        return Money::ZERO;
    }

    match rule {
        ServiceCostRule::Copay(copay) | ServiceCostRule::CopayWithCoinsurance { copay, .. } => {
            copay.amount.scale(visits)
        }
        ServiceCostRule::Coinsurance(coinsurance) => {
            base_cost.percent(coinsurance.percentage).scale(visits)
        }
    }
}

/// Emergency visits pay the copay and residual coinsurance on the base ER cost
pub fn calculate_emergency_cost(rule: &ServiceCostRule, visits: u32, er_base_cost: Money) -> Money {
    if visits == 0 {
        return Money::ZERO;
    }

    let copay = rule.copay().map(|copay| copay.amount).unwrap_or(Money::ZERO);
    let coinsurance = rule
        .coinsurance()
        .map(|coinsurance| er_base_cost.percent(coinsurance.percentage))
        .unwrap_or(Money::ZERO);

    (copay + coinsurance) * visits
}

/// Annual prescription spend
pub fn calculate_prescription_costs(
    plan: &HealthcarePlan,
    medications: &[Medication],
    assumptions: &CostAssumptions,
) -> Money {
    let monthly: Money = medications
        .iter()
        .map(|medication| {
            let cost_per_fill = match plan.prescriptions.rule(medication.tier) {
                ServiceCostRule::Copay(copay) | ServiceCostRule::CopayWithCoinsurance { copay, .. } => {
                    copay.amount
                }
                ServiceCostRule::Coinsurance(coinsurance) => assumptions
                    .drug_base_costs
                    .for_tier(medication.tier)
                    .percent(coinsurance.percentage),
            };
            cost_per_fill.scale(assumptions.fills_per_month(medication.frequency))
        })
        .sum();

    monthly * 12
}

/// Lab visits to price: the reported count, or an estimate from chronic conditions
///
/// A reported count of zero is treated as unreported.
pub fn lab_visits_for(health: &HealthProfile, assumptions: &CostAssumptions) -> u32 {
    match health.annual_lab_visits {
        Some(visits) if visits > 0 => visits,
        _ => assumptions
            .default_lab_visits_minimum
            .max(health.chronic_condition_count() * assumptions.default_lab_visits_per_condition),
    }
}

pub fn imaging_visits_for(health: &HealthProfile, assumptions: &CostAssumptions) -> f64 {
    if health.has_chronic_conditions() {
        assumptions.imaging_visits_with_chronic
    } else {
        assumptions.imaging_visits_without_chronic
    }
}

/// Estimate annual out-of-pocket medical spend, capped at the out-of-pocket maximum
pub fn estimate_medical_costs(
    plan: &HealthcarePlan,
    health: &HealthProfile,
    family: &FamilyComposition,
    assumptions: &CostAssumptions,
) -> MedicalCostBreakdown {
    let services = &plan.services;
    let base = &assumptions.base_service_costs;

    let primary_care_visits = calculate_service_cost(
        &services.primary_care,
        f64::from(health.annual_doctor_visits),
        base.primary_care,
    );
    let specialist_visits = calculate_service_cost(
        &services.specialist,
        f64::from(health.annual_specialist_visits),
        base.specialist,
    );
    let emergency_room_visits =
        calculate_emergency_cost(&services.emergency_room, health.annual_er_visits, base.emergency_room);
    let urgent_care_visits = calculate_service_cost(
        &services.urgent_care,
        f64::from(health.annual_urgent_care_visits),
        base.urgent_care,
    );

    let lab_visits_used = lab_visits_for(health, assumptions);
    let lab_work = calculate_service_cost(&services.lab_work, f64::from(lab_visits_used), base.lab_work);

    let imaging_visits_used = imaging_visits_for(health, assumptions);
    let imaging = calculate_service_cost(&services.imaging, imaging_visits_used, base.imaging);

    let prescriptions = calculate_prescription_costs(plan, &health.regular_medications, assumptions);

    let chronic_condition_management = assumptions.chronic_condition_annual * health.chronic_condition_count();
    let pregnancy_costs = if health.is_planning_pregnancy {
        assumptions.pregnancy_annual
    } else {
        Money::ZERO
    };

    let subtotal = primary_care_visits
        + specialist_visits
        + emergency_room_visits
        + urgent_care_visits
        + lab_work
        + imaging
        + prescriptions
        + chronic_condition_management
        + pregnancy_costs;

    let oop_max = plan.out_of_pocket_max_for(family.has_family());
    let final_medical_costs = subtotal.min(oop_max);

    MedicalCostBreakdown {
        primary_care_visits,
        specialist_visits,
        emergency_room_visits,
        urgent_care_visits,
        lab_work,
        imaging,
        prescriptions,
        chronic_condition_management,
        pregnancy_costs,
        subtotal,
        capped_at_oop_max: oop_max,
        final_medical_costs,
        oop_cap_reached: subtotal > oop_max,
        lab_visits_used,
        imaging_visits_used,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::MedicationFrequency;
    use crate::plans::{Coinsurance, Copay, DrugTier, PlanCatalog};

    fn dollars(amount: f64) -> Money {
        Money::from_dollars(amount)
    }

    fn plan(plan_id: &str) -> HealthcarePlan {
        PlanCatalog::default_catalog().get_plan_by_id(plan_id).unwrap().clone()
    }

    #[test]
    fn test_copay_ignores_deductible_flag() {
        let waived = ServiceCostRule::Copay(Copay {
            amount: dollars(40.0),
            deductible_waived: true,
        });
        let not_waived = ServiceCostRule::Copay(Copay {
            amount: dollars(40.0),
            deductible_waived: false,
        });
        assert_eq!(calculate_service_cost(&waived, 3.0, dollars(150.0)), dollars(120.0));
        assert_eq!(
            calculate_service_cost(&not_waived, 3.0, dollars(150.0)),
            calculate_service_cost(&waived, 3.0, dollars(150.0))
        );
    }

    #[test]
    fn test_coinsurance_uses_base_cost() {
        let rule = ServiceCostRule::Coinsurance(Coinsurance {
            percentage: 30.0,
            deductible_applies: true,
        });
        assert_eq!(calculate_service_cost(&rule, 4.0, dollars(250.0)), dollars(300.0));
        assert_eq!(calculate_service_cost(&rule, 0.5, dollars(400.0)), dollars(60.0));
        assert_eq!(calculate_service_cost(&rule, 0.0, dollars(400.0)), Money::ZERO);
    }

    #[test]
    fn test_emergency_room_copay_plus_coinsurance() {
        let silver = plan("silver-3000-ppo");
        // 400 copay + 35% of 2000
        assert_eq!(
            calculate_emergency_cost(&silver.services.emergency_room, 2, dollars(2000.0)),
            dollars(2.0 * (400.0 + 700.0))
        );

        let gold_hsa = plan("gold-hsa-1800");
        assert_eq!(
            calculate_emergency_cost(&gold_hsa.services.emergency_room, 1, dollars(2000.0)),
            dollars(400.0)
        );
        assert_eq!(calculate_emergency_cost(&gold_hsa.services.emergency_room, 0, dollars(2000.0)), Money::ZERO);
    }

    #[test]
    fn test_prescription_costs() {
        let assumptions = CostAssumptions::default_estimates();
        let meds = vec![
            Medication::new("lisinopril", DrugTier::PreferredGeneric, MedicationFrequency::Daily),
            Medication::new("inhaler", DrugTier::PreferredBrand, MedicationFrequency::AsNeeded),
            Medication::new("biologic", DrugTier::Specialty, MedicationFrequency::Monthly),
        ];

        // Silver 3000: $20 copay + $60 copay x 0.5 + 35% of $1000
        let silver = plan("silver-3000-ppo");
        assert_eq!(
            calculate_prescription_costs(&silver, &meds, &assumptions),
            dollars((20.0 + 30.0 + 350.0) * 12.0)
        );

        // Silver HSA: 10% of $20 + 30% of $200 x 0.5 + 50% of $1000
        let hsa = plan("silver-hsa-2700");
        assert_eq!(
            calculate_prescription_costs(&hsa, &meds, &assumptions),
            dollars((2.0 + 30.0 + 500.0) * 12.0)
        );

        assert_eq!(calculate_prescription_costs(&hsa, &[], &assumptions), Money::ZERO);
    }

    #[test]
    fn test_lab_and_imaging_defaults() {
        let assumptions = CostAssumptions::default_estimates();
        let mut health = HealthProfile::default();
        assert_eq!(lab_visits_for(&health, &assumptions), 2);
        assert_eq!(imaging_visits_for(&health, &assumptions), 0.5);

        health.chronic_conditions = vec!["diabetes".into(), "asthma".into(), "copd".into()];
        assert_eq!(lab_visits_for(&health, &assumptions), 6);
        assert_eq!(imaging_visits_for(&health, &assumptions), 2.0);

        health.annual_lab_visits = Some(1);
        assert_eq!(lab_visits_for(&health, &assumptions), 1);
        health.annual_lab_visits = Some(0);
        assert_eq!(lab_visits_for(&health, &assumptions), 6);
    }

    #[test]
    fn test_low_usage_breakdown() {
        let assumptions = CostAssumptions::default_estimates();
        let health = HealthProfile {
            annual_doctor_visits: 2,
            ..Default::default()
        };
        let family = FamilyComposition::employee_only();

        let silver = estimate_medical_costs(&plan("silver-3000-ppo"), &health, &family, &assumptions);
        assert_eq!(silver.primary_care_visits, dollars(80.0));
        // 2 labs at 35% of 150
        assert_eq!(silver.lab_work, dollars(105.0));
        // half an imaging study at 35% of 400
        assert_eq!(silver.imaging, dollars(70.0));
        assert_eq!(silver.subtotal, dollars(255.0));
        assert_eq!(silver.final_medical_costs, dollars(255.0));
        assert!(!silver.oop_cap_reached);
        assert_eq!(silver.capped_at_oop_max, dollars(8650.0));

        let hsa = estimate_medical_costs(&plan("silver-hsa-2700"), &health, &family, &assumptions);
        // 2 x 30% of 150, labs 2 x 45, imaging 0.5 x 120
        assert_eq!(hsa.primary_care_visits, dollars(90.0));
        assert_eq!(hsa.subtotal, dollars(90.0 + 90.0 + 60.0));
    }

    #[test]
    fn test_fixed_add_ons() {
        let assumptions = CostAssumptions::default_estimates();
        let health = HealthProfile {
            chronic_conditions: vec!["diabetes".into(), "hypertension".into()],
            is_planning_pregnancy: true,
            ..Default::default()
        };
        let breakdown = estimate_medical_costs(
            &plan("gold-1000-ppo"),
            &health,
            &FamilyComposition::new(1, 0, 0),
            &assumptions,
        );
        assert_eq!(breakdown.chronic_condition_management, dollars(5000.0));
        assert_eq!(breakdown.pregnancy_costs, dollars(6000.0));
        assert_eq!(breakdown.lab_visits_used, 4);
    }

    #[test]
    fn test_cap_holds_under_extreme_usage() {
        let assumptions = CostAssumptions::default_estimates();
        let health = HealthProfile {
            chronic_conditions: (0..40).map(|i| format!("condition-{i}")).collect(),
            is_planning_pregnancy: true,
            annual_doctor_visits: u32::MAX / 4,
            annual_specialist_visits: 100_000,
            annual_er_visits: 50_000,
            annual_urgent_care_visits: 100_000,
            annual_lab_visits: Some(100_000),
            regular_medications: vec![
                Medication::new("biologic", DrugTier::Specialty, MedicationFrequency::Daily);
                25
            ],
            overall_health: None,
        };

        for plan in PlanCatalog::default_catalog().get_all_plans() {
            for family in [FamilyComposition::employee_only(), FamilyComposition::new(1, 3, 0)] {
                let breakdown = estimate_medical_costs(plan, &health, &family, &assumptions);
                let cap = plan.out_of_pocket_max_for(family.has_family());
                assert!(breakdown.final_medical_costs <= cap);
                assert_eq!(breakdown.final_medical_costs, cap);
                assert!(breakdown.oop_cap_reached);
            }
        }
    }

    #[test]
    fn test_family_cap_used_for_households() {
        let assumptions = CostAssumptions::default_estimates();
        let health = HealthProfile {
            chronic_conditions: vec!["a".into(), "b".into(), "c".into()],
            ..Default::default()
        };
        let gold_hsa = plan("gold-hsa-1800");

        let single = estimate_medical_costs(&gold_hsa, &health, &FamilyComposition::employee_only(), &assumptions);
        assert_eq!(single.final_medical_costs, dollars(4500.0));

        let family = estimate_medical_costs(&gold_hsa, &health, &FamilyComposition::new(0, 1, 0), &assumptions);
        assert_eq!(family.capped_at_oop_max, dollars(9000.0));
        // 7500 chronic + 6 labs at $30 + 2 imaging at $80
        assert_eq!(family.subtotal, dollars(7840.0));
        assert_eq!(family.final_medical_costs, family.subtotal);
    }
}
