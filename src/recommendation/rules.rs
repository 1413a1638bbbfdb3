//! Recommendation decision table
//!
//! Rules are evaluated in order and the first matching predicate picks the
//! selector applied to the cost-sorted plan list.

use crate::costs::CostCalculation;
use crate::household::{HealthProfile, Preferences};
use crate::money::Money;
use crate::plans::{HealthcarePlan, PlanCatalog};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Usage thresholds and the HSA price tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationConfig {
    /// High usage when doctor visits exceed this
    pub high_usage_doctor_visits: u32,
    /// High usage when specialist visits exceed this
    pub high_usage_specialist_visits: u32,
    /// Low usage requires doctor visits at or below this
    pub low_usage_doctor_visits: u32,
    /// Low usage requires specialist visits at or below this
    pub low_usage_specialist_visits: u32,
    /// How much more than the cheapest plan an HSA plan may cost and still be preferred
    pub hsa_price_tolerance: Money,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            high_usage_doctor_visits: 8,
            high_usage_specialist_visits: 4,
            low_usage_doctor_visits: 3,
            low_usage_specialist_visits: 1,
            hsa_price_tolerance: Money::from_whole_dollars(500),
        }
    }
}

/// Health profile reduced to the facts the rules test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageSignals {
    pub planning_pregnancy: bool,
    pub has_chronic_conditions: bool,
    pub high_usage: bool,
    pub low_usage: bool,
}

impl UsageSignals {
    pub fn from_profile(health: &HealthProfile, config: &RecommendationConfig) -> Self {
        let has_chronic_conditions = health.has_chronic_conditions();
        // Any ER visit counts as high usage
        let high_usage = health.annual_doctor_visits > config.high_usage_doctor_visits
            || health.annual_specialist_visits > config.high_usage_specialist_visits
            || health.annual_er_visits > 0;
        let low_usage = health.annual_doctor_visits <= config.low_usage_doctor_visits
            && health.annual_specialist_visits <= config.low_usage_specialist_visits
            && health.annual_er_visits == 0
            && !has_chronic_conditions;

        Self {
            planning_pregnancy: health.is_planning_pregnancy,
            has_chronic_conditions,
            high_usage,
            low_usage,
        }
    }
}

/// Which rule produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Pregnancy,
    HighUsage,
    LowUsage,
    Default,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Pregnancy => "pregnancy",
            RuleKind::HighUsage => "highUsage",
            RuleKind::LowUsage => "lowUsage",
            RuleKind::Default => "default",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a rule picks a plan from the cost-sorted list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// Cheapest Gold plan, else the overall cheapest
    CheapestGold,
    /// Cheapest HSA plan when close enough to the cheapest and the caller wants one
    CheapestHsaWithinTolerance,
    Cheapest,
}

/// Outcome of applying a selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Index into the sorted plan list
    pub index: usize,
    /// The selector's preferred plan kind was unavailable
    pub fell_back: bool,
}

impl Selector {
    /// Pick a plan from a non-empty, cost-sorted list
    pub fn select(
        &self,
        sorted: &[CostCalculation],
        catalog: &PlanCatalog,
        preferences: &Preferences,
        config: &RecommendationConfig,
    ) -> Selection {
        let cheapest = Selection {
            index: 0,
            fell_back: false,
        };

        match self {
            Selector::Cheapest => cheapest,
            Selector::CheapestGold => {
                match position_where(sorted, catalog, |plan| plan.is_gold()) {
                    Some(index) => Selection { index, fell_back: false },
                    None => Selection { index: 0, fell_back: true },
                }
            }
            Selector::CheapestHsaWithinTolerance => {
                if !preferences.hsa_interested {
                    return cheapest;
                }
                let Some(index) = position_where(sorted, catalog, |plan| plan.is_hsa) else {
                    return Selection { index: 0, fell_back: true };
                };
                let premium_over_cheapest = sorted[index].total_annual_cost - sorted[0].total_annual_cost;
                if premium_over_cheapest <= config.hsa_price_tolerance {
                    Selection { index, fell_back: false }
                } else {
                    cheapest
                }
            }
        }
    }
}

fn position_where(
    sorted: &[CostCalculation],
    catalog: &PlanCatalog,
    predicate: impl Fn(&HealthcarePlan) -> bool,
) -> Option<usize> {
    sorted
        .iter()
        .position(|calc| catalog.find(&calc.plan_id).is_some_and(&predicate))
}

/// One row of the decision table
#[derive(Clone, Copy)]
pub struct RecommendationRule {
    pub kind: RuleKind,
    pub selector: Selector,
    predicate: fn(&UsageSignals) -> bool,
}

impl fmt::Debug for RecommendationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecommendationRule")
            .field("kind", &self.kind)
            .field("selector", &self.selector)
            .finish()
    }
}

impl RecommendationRule {
    pub fn matches(&self, signals: &UsageSignals) -> bool {
        (self.predicate)(signals)
    }
}

fn planning_pregnancy(signals: &UsageSignals) -> bool {
    signals.planning_pregnancy
}

fn chronic_or_high_usage(signals: &UsageSignals) -> bool {
    signals.has_chronic_conditions || signals.high_usage
}

fn low_usage(signals: &UsageSignals) -> bool {
    signals.low_usage
}

fn always(_: &UsageSignals) -> bool {
    true
}

/// Rules in priority order; the last always matches
pub static DECISION_TABLE: [RecommendationRule; 4] = [
    RecommendationRule {
        kind: RuleKind::Pregnancy,
        selector: Selector::CheapestGold,
        predicate: planning_pregnancy,
    },
    RecommendationRule {
        kind: RuleKind::HighUsage,
        selector: Selector::CheapestGold,
        predicate: chronic_or_high_usage,
    },
    RecommendationRule {
        kind: RuleKind::LowUsage,
        selector: Selector::CheapestHsaWithinTolerance,
        predicate: low_usage,
    },
    RecommendationRule {
        kind: RuleKind::Default,
        selector: Selector::Cheapest,
        predicate: always,
    },
];

/// First rule whose predicate matches
pub fn matching_rule(signals: &UsageSignals) -> &'static RecommendationRule {
    DECISION_TABLE
        .iter()
        .find(|rule| rule.matches(signals))
        .unwrap_or(&DECISION_TABLE[DECISION_TABLE.len() - 1])
}
