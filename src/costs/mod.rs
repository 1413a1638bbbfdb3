//! Premium, HSA and out-of-pocket cost calculations
//!
//! Every function here is pure over immutable inputs: the catalog, the
//! household, the health profile and the estimation constants.

mod assumptions;
mod premium;
mod hsa;
mod medical;
mod calculation;
mod comparison;

pub use assumptions::{BaseServiceCosts, CostAssumptions, DrugBaseCosts, EmployerContribution};
pub use premium::{calculate_premium_cost, PremiumCalculation};
pub use hsa::{calculate_hsa_contribution, HsaCalculation};
pub use medical::{
    calculate_emergency_cost, calculate_prescription_costs, calculate_service_cost, estimate_medical_costs,
    imaging_visits_for, lab_visits_for, MedicalCostBreakdown,
};
pub use calculation::{calculate_total_annual_cost, CostCalculation};
pub use comparison::{ComparisonEngine, HouseholdComparison};
