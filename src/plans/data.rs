//! Plan data structures matching the benefits catalog format

use crate::error::CatalogError;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Metal tier of the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanTier {
    Silver,
    Gold,
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanTier::Silver => f.pad("Silver"),
            PlanTier::Gold => f.pad("Gold"),
        }
    }
}

impl FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "silver" => Ok(PlanTier::Silver),
            "gold" => Ok(PlanTier::Gold),
            other => Err(format!("Unknown plan tier: {}", other)),
        }
    }
}

/// Network/account structure of the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanType {
    /// Preferred provider organization, mostly copay-based
    #[serde(rename = "PPO")]
    Ppo,
    /// High-deductible plan paired with a health savings account
    #[serde(rename = "HSA")]
    Hsa,
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanType::Ppo => f.pad("PPO"),
            PlanType::Hsa => f.pad("HSA"),
        }
    }
}

/// Gross monthly premium per covered member category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRates {
    pub employee: Money,
    /// Spouse, partner or other adult dependent
    #[serde(rename = "dependent21Plus")]
    pub spouse: Money,
    #[serde(rename = "child0to18")]
    pub child_0_to_18: Money,
    #[serde(rename = "child19to20")]
    pub child_19_to_20: Money,
}

/// An amount with separate individual and family values (deductible, OOP max)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageLimit {
    pub individual: Money,
    pub family: Money,
}

impl CoverageLimit {
    pub fn for_household(&self, has_family: bool) -> Money {
        if has_family {
            self.family
        } else {
            self.individual
        }
    }
}

/// Employer HSA deposit per month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HsaContribution {
    pub employee_only: Money,
    pub with_dependents: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Copay {
    pub amount: Money,
    /// Carried for display; the estimator charges the copay either way
    pub deductible_waived: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coinsurance {
    /// Member share on a 0-100 scale
    pub percentage: f64,
    /// Carried for display; the estimator does not track deductible accumulation
    pub deductible_applies: bool,
}

/// Member cost sharing for one service or drug tier
///
/// Deserialized from the catalog's `{copay?, coinsurance?}` shape; a rule with
/// neither is rejected when the catalog is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ServiceCostSpec", into = "ServiceCostSpec")]
pub enum ServiceCostRule {
    Copay(Copay),
    Coinsurance(Coinsurance),
    /// Copay plus residual coinsurance (emergency room)
    CopayWithCoinsurance {
        copay: Copay,
        coinsurance: Coinsurance,
    },
}

impl ServiceCostRule {
    pub fn copay(&self) -> Option<&Copay> {
        match self {
            ServiceCostRule::Copay(copay) | ServiceCostRule::CopayWithCoinsurance { copay, .. } => {
                Some(copay)
            }
            ServiceCostRule::Coinsurance(_) => None,
        }
    }

    pub fn coinsurance(&self) -> Option<&Coinsurance> {
        match self {
            ServiceCostRule::Coinsurance(coinsurance)
            | ServiceCostRule::CopayWithCoinsurance { coinsurance, .. } => Some(coinsurance),
            ServiceCostRule::Copay(_) => None,
        }
    }

    /// Short description, e.g. `$40 copay` or `30% coinsurance`
    pub fn describe(&self) -> String {
        match self {
            ServiceCostRule::Copay(copay) => format!("{} copay", copay.amount.format_whole()),
            ServiceCostRule::Coinsurance(coinsurance) => {
                format!("{}% coinsurance", coinsurance.percentage)
            }
            ServiceCostRule::CopayWithCoinsurance { copay, coinsurance } => format!(
                "{} copay + {}% coinsurance",
                copay.amount.format_whole(),
                coinsurance.percentage
            ),
        }
    }
}

/// Wire form of a service cost rule
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ServiceCostSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copay: Option<Copay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coinsurance: Option<Coinsurance>,
}

impl TryFrom<ServiceCostSpec> for ServiceCostRule {
    type Error = CatalogError;

    fn try_from(spec: ServiceCostSpec) -> Result<Self, Self::Error> {
        match (spec.copay, spec.coinsurance) {
            (Some(copay), Some(coinsurance)) => {
                Ok(ServiceCostRule::CopayWithCoinsurance { copay, coinsurance })
            }
            (Some(copay), None) => Ok(ServiceCostRule::Copay(copay)),
            (None, Some(coinsurance)) => Ok(ServiceCostRule::Coinsurance(coinsurance)),
            (None, None) => Err(CatalogError::EmptyServiceRule),
        }
    }
}

impl From<ServiceCostRule> for ServiceCostSpec {
    fn from(rule: ServiceCostRule) -> Self {
        Self {
            copay: rule.copay().copied(),
            coinsurance: rule.coinsurance().copied(),
        }
    }
}

/// Medical service categories priced by each plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceCategory {
    PrimaryCare,
    Specialist,
    EmergencyRoom,
    UrgentCare,
    Telehealth,
    LabWork,
    Imaging,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 7] = [
        ServiceCategory::PrimaryCare,
        ServiceCategory::Specialist,
        ServiceCategory::EmergencyRoom,
        ServiceCategory::UrgentCare,
        ServiceCategory::Telehealth,
        ServiceCategory::LabWork,
        ServiceCategory::Imaging,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ServiceCategory::PrimaryCare => "Primary Care",
            ServiceCategory::Specialist => "Specialist",
            ServiceCategory::EmergencyRoom => "Emergency Room",
            ServiceCategory::UrgentCare => "Urgent Care",
            ServiceCategory::Telehealth => "Telehealth",
            ServiceCategory::LabWork => "Lab Work",
            ServiceCategory::Imaging => "Imaging",
        }
    }
}

/// Per-service cost rules of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCosts {
    pub primary_care: ServiceCostRule,
    pub specialist: ServiceCostRule,
    pub emergency_room: ServiceCostRule,
    pub urgent_care: ServiceCostRule,
    pub telehealth: ServiceCostRule,
    pub lab_work: ServiceCostRule,
    pub imaging: ServiceCostRule,
}

impl ServiceCosts {
    pub fn rule(&self, category: ServiceCategory) -> &ServiceCostRule {
        match category {
            ServiceCategory::PrimaryCare => &self.primary_care,
            ServiceCategory::Specialist => &self.specialist,
            ServiceCategory::EmergencyRoom => &self.emergency_room,
            ServiceCategory::UrgentCare => &self.urgent_care,
            ServiceCategory::Telehealth => &self.telehealth,
            ServiceCategory::LabWork => &self.lab_work,
            ServiceCategory::Imaging => &self.imaging,
        }
    }
}

/// Formulary tier of a prescription drug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DrugTier {
    PreferredGeneric,
    Generic,
    PreferredBrand,
    Brand,
    Specialty,
}

impl DrugTier {
    pub const ALL: [DrugTier; 5] = [
        DrugTier::PreferredGeneric,
        DrugTier::Generic,
        DrugTier::PreferredBrand,
        DrugTier::Brand,
        DrugTier::Specialty,
    ];

    /// Wire name, e.g. `preferredGeneric`
    pub fn as_str(&self) -> &'static str {
        match self {
            DrugTier::PreferredGeneric => "preferredGeneric",
            DrugTier::Generic => "generic",
            DrugTier::PreferredBrand => "preferredBrand",
            DrugTier::Brand => "brand",
            DrugTier::Specialty => "specialty",
        }
    }
}

impl FromStr for DrugTier {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DrugTier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| crate::error::ValidationError::UnknownDrugTier(s.to_string()))
    }
}

/// Prescription cost rules keyed by drug tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionCosts {
    pub preferred_generic: ServiceCostRule,
    pub generic: ServiceCostRule,
    pub preferred_brand: ServiceCostRule,
    pub brand: ServiceCostRule,
    pub specialty: ServiceCostRule,
}

impl PrescriptionCosts {
    pub fn rule(&self, tier: DrugTier) -> &ServiceCostRule {
        match tier {
            DrugTier::PreferredGeneric => &self.preferred_generic,
            DrugTier::Generic => &self.generic,
            DrugTier::PreferredBrand => &self.preferred_brand,
            DrugTier::Brand => &self.brand,
            DrugTier::Specialty => &self.specialty,
        }
    }
}

/// A single plan definition from the benefits catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthcarePlan {
    /// Stable identifier, e.g. `silver-3000-ppo`
    pub plan_id: String,

    /// Carrier display name
    pub plan_name: String,

    pub short_name: String,

    pub tier: PlanTier,

    #[serde(rename = "type")]
    pub plan_type: PlanType,

    pub monthly_rates: MonthlyRates,

    pub deductibles: CoverageLimit,

    pub out_of_pocket_max: CoverageLimit,

    /// Whether the employer deposits into an HSA for this plan
    #[serde(rename = "isHSA")]
    pub is_hsa: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsa_contribution: Option<HsaContribution>,

    #[serde(flatten)]
    pub services: ServiceCosts,

    pub prescriptions: PrescriptionCosts,

    /// Marketing highlights shown alongside the plan
    #[serde(default)]
    pub features: Vec<String>,
}

impl HealthcarePlan {
    pub fn is_gold(&self) -> bool {
        self.tier == PlanTier::Gold
    }

    /// Employer HSA schedule, present only for HSA-eligible plans
    pub fn hsa_schedule(&self) -> Option<&HsaContribution> {
        if self.is_hsa {
            self.hsa_contribution.as_ref()
        } else {
            None
        }
    }

    /// Out-of-pocket maximum that applies to the household
    pub fn out_of_pocket_max_for(&self, has_family: bool) -> Money {
        self.out_of_pocket_max.for_household(has_family)
    }

    pub fn deductible_for(&self, has_family: bool) -> Money {
        self.deductibles.for_household(has_family)
    }

    /// Check the plan's internal consistency
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.plan_id.trim().is_empty() {
            return Err(CatalogError::EmptyPlanId);
        }

        let amounts = [
            ("monthlyRates.employee", self.monthly_rates.employee),
            ("monthlyRates.dependent21Plus", self.monthly_rates.spouse),
            ("monthlyRates.child0to18", self.monthly_rates.child_0_to_18),
            ("monthlyRates.child19to20", self.monthly_rates.child_19_to_20),
            ("deductibles.individual", self.deductibles.individual),
            ("deductibles.family", self.deductibles.family),
            ("outOfPocketMax.individual", self.out_of_pocket_max.individual),
            ("outOfPocketMax.family", self.out_of_pocket_max.family),
        ];
        for (field, amount) in amounts {
            self.check_non_negative(field, amount)?;
        }

        if self.deductibles.family < self.deductibles.individual {
            return Err(CatalogError::FamilyBelowIndividual {
                plan_id: self.plan_id.clone(),
                field: "deductible".to_string(),
            });
        }
        if self.out_of_pocket_max.family < self.out_of_pocket_max.individual {
            return Err(CatalogError::FamilyBelowIndividual {
                plan_id: self.plan_id.clone(),
                field: "out-of-pocket maximum".to_string(),
            });
        }

        if self.plan_type == PlanType::Hsa && !self.is_hsa {
            return Err(CatalogError::HsaTypeMismatch {
                plan_id: self.plan_id.clone(),
            });
        }
        if self.is_hsa {
            let schedule = self.hsa_contribution.ok_or_else(|| {
                CatalogError::MissingHsaContribution {
                    plan_id: self.plan_id.clone(),
                }
            })?;
            self.check_non_negative("hsaContribution.employeeOnly", schedule.employee_only)?;
            self.check_non_negative("hsaContribution.withDependents", schedule.with_dependents)?;
        }

        for category in ServiceCategory::ALL {
            self.check_rule(category.label(), self.services.rule(category))?;
        }
        for tier in DrugTier::ALL {
            self.check_rule(tier.as_str(), self.prescriptions.rule(tier))?;
        }

        Ok(())
    }

    fn check_non_negative(&self, field: &str, amount: Money) -> Result<(), CatalogError> {
        if amount.is_negative() {
            return Err(CatalogError::NegativeAmount {
                plan_id: self.plan_id.clone(),
                field: field.to_string(),
            });
        }
        Ok(())
    }

    fn check_rule(&self, field: &str, rule: &ServiceCostRule) -> Result<(), CatalogError> {
        if let Some(copay) = rule.copay() {
            self.check_non_negative(field, copay.amount)?;
        }
        if let Some(coinsurance) = rule.coinsurance() {
            let pct = coinsurance.percentage;
            if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
                return Err(CatalogError::PercentageOutOfRange {
                    plan_id: self.plan_id.clone(),
                    field: field.to_string(),
                    value: pct,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_rule_requires_copay_or_coinsurance() {
        let err = serde_json::from_str::<ServiceCostRule>("{}").unwrap_err();
        assert!(err.to_string().contains("copay, a coinsurance, or both"));

        let er: ServiceCostRule = serde_json::from_str(
            r#"{"copay": {"amount": 400, "deductibleWaived": false},
                "coinsurance": {"percentage": 35, "deductibleApplies": true}}"#,
        )
        .unwrap();
        assert_eq!(er.copay().map(|c| c.amount), Some(Money::from_whole_dollars(400)));
        assert_eq!(er.coinsurance().map(|c| c.percentage), Some(35.0));
        assert_eq!(er.describe(), "$400 copay + 35% coinsurance");
    }

    #[test]
    fn test_drug_tier_parsing() {
        assert_eq!("preferredBrand".parse::<DrugTier>().unwrap(), DrugTier::PreferredBrand);
        assert!("brandName".parse::<DrugTier>().is_err());
    }

    #[test]
    fn test_coverage_limit_selection() {
        let oop = CoverageLimit {
            individual: Money::from_whole_dollars(8650),
            family: Money::from_whole_dollars(17300),
        };
        assert_eq!(oop.for_household(false), Money::from_whole_dollars(8650));
        assert_eq!(oop.for_household(true), Money::from_whole_dollars(17300));
    }
}
