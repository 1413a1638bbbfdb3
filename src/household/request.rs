//! Calculate-costs request accepted from the tool-invocation layer

use super::{FamilyComposition, HealthProfile, Preferences};
use crate::error::AdvisorError;
use serde::{Deserialize, Serialize};

/// Structured inputs gathered by the conversational front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateCostsRequest {
    pub family_composition: FamilyComposition,
    pub health_profile: HealthProfile,
    #[serde(default)]
    pub preferences: Option<Preferences>,
}

impl CalculateCostsRequest {
    /// Parse and validate a JSON request body
    ///
    /// Anything that fails here never reaches the calculators.
    pub fn from_json(body: &str) -> Result<Self, AdvisorError> {
        let request: CalculateCostsRequest = serde_json::from_str(body)?;
        request.validate()?;
        Ok(request)
    }

    /// Read and validate a request from a file
    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self, AdvisorError> {
        let body = std::fs::read_to_string(path)?;
        Self::from_json(&body)
    }

    pub fn validate(&self) -> Result<(), AdvisorError> {
        self.family_composition.validate()?;
        self.health_profile.validate()?;
        Ok(())
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences.unwrap_or_default()
    }
}
