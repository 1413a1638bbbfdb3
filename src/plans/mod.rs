//! Plan definitions and the read-only plan catalog

mod data;
mod catalog;
pub mod loader;

pub use data::{
    Coinsurance, Copay, CoverageLimit, DrugTier, HealthcarePlan, HsaContribution, MonthlyRates,
    PlanTier, PlanType, PrescriptionCosts, ServiceCategory, ServiceCostRule, ServiceCostSpec,
    ServiceCosts,
};
pub use catalog::PlanCatalog;
pub use loader::{load_catalog, load_catalog_from_reader, load_configured_catalog};
