//! Load a plan catalog from a JSON file
//!
//! The file holds an array of plan objects in the same camelCase shape the
//! catalog serializes to. Every plan is validated before the catalog is returned.

use super::{HealthcarePlan, PlanCatalog};
use crate::error::AdvisorError;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Environment variable naming an alternate catalog file
pub const CATALOG_PATH_ENV: &str = "PLAN_CATALOG_PATH";

/// Load and validate a catalog from a JSON file
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<PlanCatalog, AdvisorError> {
    let path = path.as_ref();
    log::info!("Loading plan catalog from {}", path.display());
    let file = File::open(path)?;
    load_catalog_from_reader(BufReader::new(file))
}

/// Load and validate a catalog from any reader (e.g., string buffer, network stream)
pub fn load_catalog_from_reader<R: std::io::Read>(reader: R) -> Result<PlanCatalog, AdvisorError> {
    let plans: Vec<HealthcarePlan> = serde_json::from_reader(reader)?;
    let catalog = PlanCatalog::new(plans)?;
    log::debug!("Loaded {} plans", catalog.len());
    Ok(catalog)
}

/// Load the catalog named by `PLAN_CATALOG_PATH`, or the built-in default when unset
pub fn load_configured_catalog() -> Result<PlanCatalog, AdvisorError> {
    match std::env::var(CATALOG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => load_catalog(path),
        _ => Ok(PlanCatalog::builtin()?),
    }
}
