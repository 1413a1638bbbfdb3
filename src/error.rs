//! Error types for catalog loading, input validation and recommendation

use thiserror::Error;

/// Top-level error returned by the advisor library
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("plan not found: {0}")]
    PlanNotFound(String),

    #[error("no plans available to recommend")]
    NoPlansAvailable,

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid plan catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdvisorError {
    /// Whether the failure was caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AdvisorError::Validation(_) | AdvisorError::Json(_) | AdvisorError::PlanNotFound(_)
        )
    }
}

/// Household or health profile values outside the accepted ranges
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be at most {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("medication name must not be empty")]
    EmptyMedicationName,

    #[error("unknown drug tier: {0}")]
    UnknownDrugTier(String),

    #[error("unknown medication frequency: {0}")]
    UnknownFrequency(String),

    #[error("malformed medication entry: {0}")]
    MalformedMedication(String),
}

/// Plan catalog data that fails load-time checks
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("service cost rule must define a copay, a coinsurance, or both")]
    EmptyServiceRule,

    #[error("duplicate plan id: {0}")]
    DuplicatePlanId(String),

    #[error("plan {plan_id}: {field} percentage {value} outside 0-100")]
    PercentageOutOfRange {
        plan_id: String,
        field: String,
        value: f64,
    },

    #[error("plan {plan_id}: {field} must not be negative")]
    NegativeAmount { plan_id: String, field: String },

    #[error("plan {plan_id}: HSA-eligible plan has no employer contribution schedule")]
    MissingHsaContribution { plan_id: String },

    #[error("plan {plan_id}: plan type HSA but not marked HSA-eligible")]
    HsaTypeMismatch { plan_id: String },

    #[error("plan {plan_id}: family {field} is below the individual amount")]
    FamilyBelowIndividual { plan_id: String, field: String },

    #[error("plan id must not be empty")]
    EmptyPlanId,
}
