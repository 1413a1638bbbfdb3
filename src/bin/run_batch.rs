//! Recommend plans for a file of household scenarios
//!
//! Outputs one row per household with the recommended plan and the cheapest
//! plan for comparison.

use anyhow::{Context, Result};
use clap::Parser;
use plan_advisor::household::load_scenarios;
use plan_advisor::plans::{load_catalog, PlanCatalog};
use plan_advisor::recommendation::ScenarioRecommendation;
use plan_advisor::{ComparisonEngine, CostAssumptions, Money, RecommendationEngine};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "run_batch", about = "Recommend a plan for every household in a scenario CSV")]
struct Args {
    /// Scenario CSV
    #[arg(default_value = "data/sample_scenarios.csv")]
    input: PathBuf,

    /// Output CSV
    #[arg(long, default_value = "batch_recommendations.csv")]
    output: PathBuf,

    /// Plan catalog JSON (defaults to the built-in catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Cost assumption overrides JSON
    #[arg(long)]
    assumptions: Option<PathBuf>,
}

/// One output row per household
#[derive(Debug, serde::Serialize)]
struct BatchRow {
    #[serde(rename = "ScenarioID")]
    scenario_id: String,
    #[serde(rename = "Rule")]
    rule: String,
    #[serde(rename = "RecommendedPlan")]
    recommended_plan: String,
    #[serde(rename = "RecommendedTotal")]
    recommended_total: Option<Money>,
    #[serde(rename = "CheapestPlan")]
    cheapest_plan: String,
    #[serde(rename = "CheapestTotal")]
    cheapest_total: Option<Money>,
    #[serde(rename = "CostOverCheapest")]
    cost_over_cheapest: Option<Money>,
    #[serde(rename = "Error")]
    error: String,
}

impl From<ScenarioRecommendation> for BatchRow {
    fn from(outcome: ScenarioRecommendation) -> Self {
        let comparison = match outcome.result {
            Ok(comparison) => comparison,
            Err(e) => {
                return BatchRow {
                    scenario_id: outcome.scenario_id,
                    rule: String::new(),
                    recommended_plan: String::new(),
                    recommended_total: None,
                    cheapest_plan: String::new(),
                    cheapest_total: None,
                    cost_over_cheapest: None,
                    error: e.to_string(),
                }
            }
        };

        let recommended_total = comparison.recommended_plan().map(|calc| calc.total_annual_cost);
        let cheapest_total = comparison.cheapest_plan().map(|calc| calc.total_annual_cost);
        BatchRow {
            scenario_id: outcome.scenario_id,
            rule: comparison.matched_rule.to_string(),
            recommended_plan: comparison.recommended_plan_id.clone(),
            recommended_total,
            cheapest_plan: comparison
                .cheapest_plan()
                .map(|calc| calc.plan_id.clone())
                .unwrap_or_default(),
            cheapest_total,
            cost_over_cheapest: recommended_total.zip(cheapest_total).map(|(rec, low)| rec - low),
            error: String::new(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading scenarios from {}...", args.input.display());
    let scenarios = load_scenarios(&args.input).with_context(|| format!("loading {}", args.input.display()))?;
    println!("Loaded {} scenarios in {:?}", scenarios.len(), start.elapsed());

    let catalog = match &args.catalog {
        Some(path) => load_catalog(path)?,
        None => PlanCatalog::builtin()?,
    };
    let assumptions = match &args.assumptions {
        Some(path) => CostAssumptions::from_json_path(path)?,
        None => CostAssumptions::default_estimates(),
    };
    let engine = RecommendationEngine::new(
        ComparisonEngine::new(catalog, assumptions),
        Default::default(),
    );

    println!("Running comparisons...");
    let run_start = Instant::now();
    let outcomes = engine.recommend_households(&scenarios);
    println!("Compared {} households in {:?}", outcomes.len(), run_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut failures = 0;
    for outcome in outcomes {
        let row = BatchRow::from(outcome);
        if !row.error.is_empty() {
            failures += 1;
        }
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!("Results written to {}", args.output.display());
    if failures > 0 {
        log::warn!("{} households could not be priced", failures);
    }
    println!("Total time: {:?}", start.elapsed());
    Ok(())
}
