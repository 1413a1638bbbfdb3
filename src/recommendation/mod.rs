//! Rule-based plan recommendation
//!
//! An ordered decision table maps the household's usage signals to a plan
//! selector; the chosen plan comes with a templated explanation citing its
//! annual cost, HSA deposit and difference from the cheapest option.

mod rules;
mod reasoning;
mod engine;

pub use rules::{
    matching_rule, RecommendationConfig, RecommendationRule, RuleKind, Selection, Selector, UsageSignals,
    DECISION_TABLE,
};
pub use reasoning::{render_reasoning, ReasoningContext};
pub use engine::{PlanComparison, RecommendationEngine, ScenarioRecommendation};
