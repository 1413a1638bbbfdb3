//! Plan Advisor - employer health plan cost estimator and recommendation engine
//!
//! This library provides:
//! - A validated catalog of employer-sponsored plans (premiums, cost sharing, HSA funding)
//! - Premium apportionment between employer and employee
//! - Out-of-pocket medical spend estimates capped at the out-of-pocket maximum
//! - Ranked total-cost comparison across every plan
//! - Rule-based recommendation with a plain-language explanation

pub mod money;
pub mod error;
pub mod plans;
pub mod household;
pub mod costs;
pub mod recommendation;
pub mod report;

// Re-export commonly used types
pub use money::Money;
pub use error::{AdvisorError, CatalogError, ValidationError};
pub use plans::{HealthcarePlan, PlanCatalog};
pub use household::{CalculateCostsRequest, FamilyComposition, HealthProfile, Preferences};
pub use costs::{ComparisonEngine, CostAssumptions, CostCalculation};
pub use recommendation::{PlanComparison, RecommendationConfig, RecommendationEngine};
pub use report::CalculateCostsResponse;
