//! Plan recommendation over a cost comparison

use super::reasoning::{render_reasoning, ReasoningContext};
use super::rules::{matching_rule, RecommendationConfig, RuleKind, UsageSignals};
use crate::costs::{ComparisonEngine, CostAssumptions, CostCalculation};
use crate::error::AdvisorError;
use crate::household::{FamilyComposition, HealthProfile, Preferences, Scenario};
use crate::plans::PlanCatalog;
use rayon::prelude::*;
use serde::Serialize;

/// Sorted plan costs plus the recommended plan and why
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanComparison {
    /// Every plan, cheapest first
    pub plans: Vec<CostCalculation>,
    pub recommended_plan_id: String,
    pub reasoning: String,
    /// The same calculations under their ranked name
    pub sorted_by_total_cost: Vec<CostCalculation>,
    pub matched_rule: RuleKind,
}

impl PlanComparison {
    pub fn recommended_plan(&self) -> Option<&CostCalculation> {
        self.plans.iter().find(|calc| calc.plan_id == self.recommended_plan_id)
    }

    pub fn cheapest_plan(&self) -> Option<&CostCalculation> {
        self.plans.first()
    }
}

/// Recommendation outcome for one household of a batch
#[derive(Debug)]
pub struct ScenarioRecommendation {
    pub scenario_id: String,
    pub result: Result<PlanComparison, AdvisorError>,
}

#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    comparison: ComparisonEngine,
    config: RecommendationConfig,
}

impl RecommendationEngine {
    pub fn new(comparison: ComparisonEngine, config: RecommendationConfig) -> Self {
        Self { comparison, config }
    }

    /// Engine over a catalog with default estimates and thresholds
    pub fn with_catalog(catalog: PlanCatalog) -> Self {
        Self::new(
            ComparisonEngine::new(catalog, CostAssumptions::default_estimates()),
            RecommendationConfig::default(),
        )
    }

    pub fn comparison(&self) -> &ComparisonEngine {
        &self.comparison
    }

    pub fn catalog(&self) -> &PlanCatalog {
        self.comparison.catalog()
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// Compare every plan and pick one with the first matching rule
    ///
    /// Missing preferences behave as the defaults (HSA interest assumed).
    pub fn generate_recommendation(
        &self,
        family: &FamilyComposition,
        health: &HealthProfile,
        preferences: Option<&Preferences>,
    ) -> Result<PlanComparison, AdvisorError> {
        let preferences = preferences.copied().unwrap_or_default();
        let plans = self.comparison.compare_all_plans(family, health);
        if plans.is_empty() {
            log::warn!("No plans in catalog; nothing to recommend");
            return Err(AdvisorError::NoPlansAvailable);
        }

        let signals = UsageSignals::from_profile(health, &self.config);
        let rule = matching_rule(&signals);
        let selection = rule.selector.select(&plans, self.catalog(), &preferences, &self.config);

        let recommended = &plans[selection.index];
        let plan = self.catalog().get_plan_by_id(&recommended.plan_id)?;

        if selection.fell_back && rule.kind != RuleKind::LowUsage {
            log::warn!("Rule {} found no Gold plan; using cheapest plan", rule.kind);
        }
        log::info!(
            "Rule {} recommends {} at {} ({} plans compared)",
            rule.kind,
            recommended.plan_id,
            recommended.total_annual_cost,
            plans.len()
        );

        let reasoning = render_reasoning(&ReasoningContext {
            rule: rule.kind,
            signals: &signals,
            recommended,
            plan,
            cheapest: &plans[0],
            has_family: family.has_family(),
            fell_back: selection.fell_back,
        });
        let recommended_plan_id = recommended.plan_id.clone();

        Ok(PlanComparison {
            sorted_by_total_cost: plans.clone(),
            plans,
            recommended_plan_id,
            reasoning,
            matched_rule: rule.kind,
        })
    }

    /// Recommend for many households in parallel, preserving input order
    pub fn recommend_households(&self, scenarios: &[Scenario]) -> Vec<ScenarioRecommendation> {
        scenarios
            .par_iter()
            .map(|scenario| ScenarioRecommendation {
                scenario_id: scenario.scenario_id.clone(),
                result: self.generate_recommendation(
                    &scenario.family,
                    &scenario.health,
                    Some(&scenario.preferences),
                ),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::plans::{HealthcarePlan, PlanTier};

    fn engine() -> RecommendationEngine {
        RecommendationEngine::default()
    }

    fn tier_of(engine: &RecommendationEngine, plan_id: &str) -> PlanTier {
        engine.catalog().get_plan_by_id(plan_id).unwrap().tier
    }

    #[test]
    fn test_pregnancy_recommends_gold() {
        let engine = engine();
        let health = HealthProfile {
            is_planning_pregnancy: true,
            ..Default::default()
        };
        let result = engine
            .generate_recommendation(&FamilyComposition::new(1, 0, 0), &health, None)
            .unwrap();

        assert_eq!(result.matched_rule, RuleKind::Pregnancy);
        assert_eq!(tier_of(&engine, &result.recommended_plan_id), PlanTier::Gold);
        assert!(result.reasoning.starts_with("With pregnancy planned"));

        // Cheapest of the Gold plans
        let gold_totals: Vec<Money> = result
            .plans
            .iter()
            .filter(|calc| tier_of(&engine, &calc.plan_id) == PlanTier::Gold)
            .map(|calc| calc.total_annual_cost)
            .collect();
        assert_eq!(result.recommended_plan().unwrap().total_annual_cost, gold_totals[0]);
    }

    #[test]
    fn test_pregnancy_recommends_gold_for_any_household() {
        let engine = engine();
        let health = HealthProfile {
            is_planning_pregnancy: true,
            annual_doctor_visits: 1,
            ..Default::default()
        };
        for family in [
            FamilyComposition::employee_only(),
            FamilyComposition::new(0, 2, 0),
            FamilyComposition::new(1, 4, 2),
        ] {
            let result = engine.generate_recommendation(&family, &health, None).unwrap();
            assert_eq!(tier_of(&engine, &result.recommended_plan_id), PlanTier::Gold);
        }
    }

    #[test]
    fn test_frequent_doctor_visits_are_high_usage() {
        let engine = engine();
        let health = HealthProfile {
            annual_doctor_visits: 10,
            ..Default::default()
        };
        let result = engine
            .generate_recommendation(&FamilyComposition::employee_only(), &health, None)
            .unwrap();
        assert_eq!(result.matched_rule, RuleKind::HighUsage);
        assert_eq!(tier_of(&engine, &result.recommended_plan_id), PlanTier::Gold);
    }

    #[test]
    fn test_healthy_employee_gets_hsa_within_tolerance() {
        let engine = engine();
        let result = engine
            .generate_recommendation(&FamilyComposition::employee_only(), &HealthProfile::default(), None)
            .unwrap();

        assert_eq!(result.matched_rule, RuleKind::LowUsage);
        let recommended = result.recommended_plan().unwrap();
        assert!(recommended.hsa.is_hsa_plan);
        let cheapest = result.cheapest_plan().unwrap();
        assert!(recommended.total_annual_cost - cheapest.total_annual_cost <= Money::from_whole_dollars(500));
    }

    #[test]
    fn test_hsa_opt_out_gets_cheapest() {
        let engine = engine();
        let preferences = Preferences {
            hsa_interested: false,
            ..Default::default()
        };
        let health = HealthProfile {
            annual_doctor_visits: 1,
            ..Default::default()
        };
        let result = engine
            .generate_recommendation(&FamilyComposition::employee_only(), &health, Some(&preferences))
            .unwrap();

        assert_eq!(result.matched_rule, RuleKind::LowUsage);
        assert_eq!(result.recommended_plan_id, result.plans[0].plan_id);
    }

    #[test]
    fn test_hsa_outside_tolerance_loses() {
        let config = RecommendationConfig {
            hsa_price_tolerance: Money::ZERO,
            ..Default::default()
        };
        let engine = RecommendationEngine::new(ComparisonEngine::default(), config);
        let result = engine
            .generate_recommendation(&FamilyComposition::new(1, 2, 0), &HealthProfile::default(), None)
            .unwrap();

        let recommended = result.recommended_plan().unwrap();
        assert_eq!(recommended.total_annual_cost, result.plans[0].total_annual_cost);
    }

    #[test]
    fn test_recommended_plan_is_in_list() {
        let engine = engine();
        let profiles = [
            HealthProfile::default(),
            HealthProfile {
                annual_doctor_visits: 6,
                annual_specialist_visits: 3,
                ..Default::default()
            },
            HealthProfile {
                chronic_conditions: vec!["diabetes".into()],
                annual_er_visits: 2,
                ..Default::default()
            },
        ];
        for health in &profiles {
            for family in [FamilyComposition::employee_only(), FamilyComposition::new(1, 3, 1)] {
                let result = engine.generate_recommendation(&family, health, None).unwrap();
                assert_eq!(result.sorted_by_total_cost, result.plans);
                assert!(result.recommended_plan().is_some());
                assert_eq!(result.plans.len(), engine.catalog().len());
                assert!(!result.reasoning.is_empty());
            }
        }
    }

    #[test]
    fn test_ranked_plans_serialize_under_both_names() {
        let engine = engine();
        let result = engine
            .generate_recommendation(&FamilyComposition::new(1, 1, 0), &HealthProfile::default(), None)
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["sortedByTotalCost"], json["plans"]);
        let ids: Vec<&str> = json["sortedByTotalCost"]
            .as_array()
            .unwrap()
            .iter()
            .map(|calc| calc["planId"].as_str().unwrap())
            .collect();
        let expected: Vec<&str> = result.plans.iter().map(|calc| calc.plan_id.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_empty_catalog_is_an_error() {
        let engine = RecommendationEngine::with_catalog(PlanCatalog::new(Vec::new()).unwrap());
        let err = engine
            .generate_recommendation(&FamilyComposition::employee_only(), &HealthProfile::default(), None)
            .unwrap_err();
        assert!(matches!(err, AdvisorError::NoPlansAvailable));
    }

    #[test]
    fn test_no_gold_falls_back_to_cheapest() {
        let silver_only: Vec<HealthcarePlan> = PlanCatalog::default_catalog()
            .get_all_plans()
            .iter()
            .filter(|plan| !plan.is_gold())
            .cloned()
            .collect();
        let engine = RecommendationEngine::with_catalog(PlanCatalog::new(silver_only).unwrap());
        let health = HealthProfile {
            is_planning_pregnancy: true,
            ..Default::default()
        };
        let result = engine
            .generate_recommendation(&FamilyComposition::employee_only(), &health, None)
            .unwrap();

        assert_eq!(result.matched_rule, RuleKind::Pregnancy);
        assert_eq!(result.recommended_plan_id, result.plans[0].plan_id);
        assert!(result.reasoning.contains("No Gold plan"));
    }

    #[test]
    fn test_batch_preserves_order() {
        let engine = engine();
        let scenarios: Vec<Scenario> = (0..6)
            .map(|i| Scenario {
                scenario_id: format!("s{i}"),
                family: FamilyComposition::new(0, i, 0),
                health: HealthProfile {
                    annual_doctor_visits: i * 3,
                    ..Default::default()
                },
                preferences: Preferences::default(),
            })
            .collect();

        let results = engine.recommend_households(&scenarios);
        let ids: Vec<&str> = results.iter().map(|r| r.scenario_id.as_str()).collect();
        assert_eq!(ids, vec!["s0", "s1", "s2", "s3", "s4", "s5"]);
        assert!(results.iter().all(|r| r.result.is_ok()));
    }
}
