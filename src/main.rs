//! Plan Advisor CLI
//!
//! Command-line interface for browsing plans, comparing annual costs and
//! getting a recommendation for a household

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use plan_advisor::costs::ComparisonEngine;
use plan_advisor::plans::{load_catalog, PlanTier};
use plan_advisor::recommendation::RecommendationConfig;
use plan_advisor::report::{format_currency, format_currency_whole, CalculateCostsResponse};
use plan_advisor::{CalculateCostsRequest, CostAssumptions, CostCalculation, PlanCatalog, RecommendationEngine};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "plan-advisor",
    about = "Estimate annual health plan costs and recommend a plan",
    version
)]
struct Cli {
    /// Plan catalog JSON (defaults to the built-in catalog)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Cost assumption overrides JSON
    #[arg(long, global = true)]
    assumptions: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available plans
    Plans {
        /// Only show plans of this tier (silver or gold)
        #[arg(long)]
        tier: Option<PlanTier>,
        /// Only show HSA-eligible plans
        #[arg(long)]
        hsa_only: bool,
    },
    /// Show the benefit summary for one plan
    Details {
        plan_id: String,
    },
    /// Rank every plan by estimated total annual cost
    Compare(RequestArgs),
    /// Recommend a plan and explain why
    Recommend {
        #[command(flatten)]
        request: RequestArgs,
        /// Never prefer an HSA plan over the cheapest plan
        #[arg(long)]
        no_hsa: bool,
    },
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Request JSON with familyComposition, healthProfile and optional preferences
    #[arg(long)]
    input: PathBuf,
    /// Print the full JSON response instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let catalog = match &cli.catalog {
        Some(path) => load_catalog(path).with_context(|| format!("loading catalog {}", path.display()))?,
        None => PlanCatalog::builtin()?,
    };
    let assumptions = match &cli.assumptions {
        Some(path) => CostAssumptions::from_json_path(path)
            .with_context(|| format!("loading assumptions {}", path.display()))?,
        None => CostAssumptions::default_estimates(),
    };

    match cli.command {
        Command::Plans { tier, hsa_only } => list_plans(&catalog, tier, hsa_only),
        Command::Details { plan_id } => {
            println!("{}", catalog.plan_details(&plan_id)?);
            Ok(())
        }
        Command::Compare(args) => {
            let request = read_request(&args.input)?;
            let engine = ComparisonEngine::new(catalog, assumptions);
            let results = engine.compare_all_plans(&request.family_composition, &request.health_profile);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_comparison(&results, None);
            }
            Ok(())
        }
        Command::Recommend { request: args, no_hsa } => {
            let request = read_request(&args.input)?;
            let mut preferences = request.preferences();
            if no_hsa {
                preferences.hsa_interested = false;
            }

            let engine = RecommendationEngine::new(
                ComparisonEngine::new(catalog, assumptions),
                RecommendationConfig::default(),
            );
            let comparison = engine.generate_recommendation(
                &request.family_composition,
                &request.health_profile,
                Some(&preferences),
            )?;

            if args.json {
                let response = CalculateCostsResponse::build(&comparison, engine.catalog())?;
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_comparison(&comparison.plans, Some(comparison.recommended_plan_id.as_str()));
                println!();
                println!("{}", comparison.reasoning);
            }
            Ok(())
        }
    }
}

fn read_request(path: &Path) -> Result<CalculateCostsRequest> {
    CalculateCostsRequest::from_path(path).with_context(|| format!("reading request {}", path.display()))
}

fn list_plans(catalog: &PlanCatalog, tier: Option<PlanTier>, hsa_only: bool) -> Result<()> {
    println!(
        "{:<18} {:<34} {:<6} {:<4} {:>12} {:>12} {:>12}",
        "Plan ID", "Name", "Tier", "Type", "Employee/mo", "Deductible", "OOP Max"
    );
    println!("{}", "-".repeat(106));

    let plans = catalog
        .get_all_plans()
        .iter()
        .filter(|plan| tier.map_or(true, |tier| plan.tier == tier))
        .filter(|plan| !hsa_only || plan.is_hsa);

    for plan in plans {
        println!(
            "{:<18} {:<34} {:<6} {:<4} {:>12} {:>12} {:>12}",
            plan.plan_id,
            plan.plan_name,
            plan.tier,
            plan.plan_type,
            format_currency(plan.monthly_rates.employee),
            format_currency_whole(plan.deductibles.individual),
            format_currency_whole(plan.out_of_pocket_max.individual),
        );
    }
    Ok(())
}

fn print_comparison(results: &[CostCalculation], recommended: Option<&str>) {
    println!(
        "  {:<34} {:>12} {:>12} {:>10} {:>12}",
        "Plan", "Premium/yr", "Medical", "HSA", "Total"
    );
    println!("{}", "-".repeat(86));

    for calc in results {
        let marker = if Some(calc.plan_id.as_str()) == recommended { "*" } else { " " };
        println!(
            "{} {:<34} {:>12} {:>12} {:>10} {:>12}",
            marker,
            calc.plan_name,
            format_currency_whole(calc.premium.employee_annual_premium),
            format_currency_whole(calc.medical_costs.final_medical_costs),
            format_currency_whole(calc.hsa.annual_hsa_contribution),
            format_currency_whole(calc.total_annual_cost),
        );
    }
}
