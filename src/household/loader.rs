//! Load household scenarios from CSV for batch comparisons

use super::{FamilyComposition, HealthProfile, Medication, Preferences};
use crate::error::AdvisorError;
use csv::Reader;
use serde::Serialize;
use std::path::Path;

/// One household and usage profile to price against the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub scenario_id: String,
    pub family: FamilyComposition,
    pub health: HealthProfile,
    pub preferences: Preferences,
}

/// Raw CSV row matching the scenario sheet columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "ScenarioID")]
    scenario_id: String,
    #[serde(rename = "Spouses")]
    spouses: u32,
    #[serde(rename = "Children0to18")]
    children_0_to_18: u32,
    #[serde(rename = "Children19to20")]
    children_19_to_20: u32,
    #[serde(rename = "DoctorVisits")]
    doctor_visits: u32,
    #[serde(rename = "SpecialistVisits")]
    specialist_visits: u32,
    #[serde(rename = "ERVisits")]
    er_visits: u32,
    #[serde(rename = "UrgentCareVisits")]
    urgent_care_visits: u32,
    #[serde(rename = "LabVisits")]
    lab_visits: Option<u32>,
    /// Semicolon-separated condition labels
    #[serde(rename = "ChronicConditions", default)]
    chronic_conditions: String,
    #[serde(rename = "PlanningPregnancy")]
    planning_pregnancy: bool,
    /// Semicolon-separated `name:tier:frequency` entries
    #[serde(rename = "Medications", default)]
    medications: String,
    #[serde(rename = "HsaInterested", default)]
    hsa_interested: Option<bool>,
}

fn split_list(field: &str) -> impl Iterator<Item = &str> {
    field.split(';').map(str::trim).filter(|item| !item.is_empty())
}

impl CsvRow {
    fn to_scenario(self) -> Result<Scenario, AdvisorError> {
        let regular_medications = split_list(&self.medications)
            .map(str::parse::<Medication>)
            .collect::<Result<Vec<_>, _>>()?;

        let family = FamilyComposition::new(self.spouses, self.children_0_to_18, self.children_19_to_20);
        let health = HealthProfile {
            chronic_conditions: split_list(&self.chronic_conditions).map(str::to_string).collect(),
            is_planning_pregnancy: self.planning_pregnancy,
            annual_doctor_visits: self.doctor_visits,
            annual_specialist_visits: self.specialist_visits,
            annual_er_visits: self.er_visits,
            annual_urgent_care_visits: self.urgent_care_visits,
            annual_lab_visits: self.lab_visits,
            regular_medications,
            overall_health: None,
        };

        family.validate()?;
        health.validate()?;

        Ok(Scenario {
            scenario_id: self.scenario_id,
            family,
            health,
            preferences: Preferences {
                hsa_interested: self.hsa_interested.unwrap_or(true),
                ..Preferences::default()
            },
        })
    }
}

/// Load all scenarios from a CSV file
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<Scenario>, AdvisorError> {
    let reader = Reader::from_path(path)?;
    collect_scenarios(reader)
}

/// Load scenarios from any reader (e.g., string buffer, network stream)
pub fn load_scenarios_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Scenario>, AdvisorError> {
    collect_scenarios(Reader::from_reader(reader))
}

fn collect_scenarios<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<Scenario>, AdvisorError> {
    let mut scenarios = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        scenarios.push(row.to_scenario()?);
    }

    Ok(scenarios)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::household::MedicationFrequency;
    use crate::plans::DrugTier;

    const HEADER: &str = "ScenarioID,Spouses,Children0to18,Children19to20,DoctorVisits,SpecialistVisits,ERVisits,UrgentCareVisits,LabVisits,ChronicConditions,PlanningPregnancy,Medications,HsaInterested\n";

    #[test]
    fn test_load_scenarios() {
        let data = format!(
            "{HEADER}\
             single-healthy,0,0,0,1,0,0,0,,,false,,\n\
             family-chronic,1,2,0,6,3,1,2,4,diabetes; asthma,false,metformin:generic:daily;albuterol:preferredBrand:asNeeded,false\n"
        );
        let scenarios = load_scenarios_from_reader(data.as_bytes()).unwrap();
        assert_eq!(scenarios.len(), 2);

        let single = &scenarios[0];
        assert_eq!(single.scenario_id, "single-healthy");
        assert!(!single.family.has_family());
        assert_eq!(single.health.annual_lab_visits, None);
        assert!(single.health.chronic_conditions.is_empty());
        assert!(single.preferences.hsa_interested);

        let family = &scenarios[1];
        assert_eq!(family.family.total_dependents(), 3);
        assert_eq!(family.health.chronic_conditions, vec!["diabetes", "asthma"]);
        assert_eq!(family.health.annual_lab_visits, Some(4));
        assert_eq!(family.health.regular_medications.len(), 2);
        assert_eq!(family.health.regular_medications[1].tier, DrugTier::PreferredBrand);
        assert_eq!(family.health.regular_medications[1].frequency, MedicationFrequency::AsNeeded);
        assert!(!family.preferences.hsa_interested);
    }

    #[test]
    fn test_sample_scenario_file() {
        let scenarios = load_scenarios_from_reader(include_str!("../../data/sample_scenarios.csv").as_bytes()).unwrap();
        assert_eq!(scenarios.len(), 10);
        assert!(scenarios.iter().any(|s| s.health.is_planning_pregnancy));
        assert!(scenarios.iter().any(|s| !s.preferences.hsa_interested));
    }

    #[test]
    fn test_invalid_rows_rejected() {
        let too_many_spouses = format!("{HEADER}bad,2,0,0,1,0,0,0,,,false,,\n");
        let err = load_scenarios_from_reader(too_many_spouses.as_bytes()).unwrap_err();
        assert!(matches!(err, AdvisorError::Validation(ValidationError::OutOfRange { .. })));

        let negative = format!("{HEADER}bad,0,-1,0,1,0,0,0,,,false,,\n");
        assert!(matches!(
            load_scenarios_from_reader(negative.as_bytes()).unwrap_err(),
            AdvisorError::Csv(_)
        ));

        let bad_med = format!("{HEADER}bad,0,0,0,1,0,0,0,,,false,aspirin:otc:daily,\n");
        assert!(matches!(
            load_scenarios_from_reader(bad_med.as_bytes()).unwrap_err(),
            AdvisorError::Validation(ValidationError::UnknownDrugTier(_))
        ));
    }
}
