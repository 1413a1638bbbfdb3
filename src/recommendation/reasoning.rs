//! Human-readable justification for a recommendation

use super::rules::{RuleKind, UsageSignals};
use crate::costs::CostCalculation;
use crate::money::Money;
use crate::plans::HealthcarePlan;

/// Everything a reasoning template may cite
pub struct ReasoningContext<'a> {
    pub rule: RuleKind,
    pub signals: &'a UsageSignals,
    pub recommended: &'a CostCalculation,
    pub plan: &'a HealthcarePlan,
    pub cheapest: &'a CostCalculation,
    pub has_family: bool,
    /// No plan of the preferred kind existed, so the cheapest was used
    pub fell_back: bool,
}

impl ReasoningContext<'_> {
    fn delta_vs_cheapest(&self) -> Money {
        self.recommended.total_annual_cost - self.cheapest.total_annual_cost
    }

    fn coverage_label(&self) -> &'static str {
        if self.has_family {
            "Family"
        } else {
            "Individual"
        }
    }

    fn hsa_line(&self) -> String {
        if self.recommended.hsa.is_hsa_plan {
            format!(
                "Includes {}/year company HSA contribution",
                self.recommended.hsa.annual_hsa_contribution.format_whole()
            )
        } else {
            format!(
                "HSA contribution: {}/year (not HSA-eligible)",
                self.recommended.hsa.annual_hsa_contribution.format_whole()
            )
        }
    }

    fn limits_line(&self) -> String {
        format!(
            "{} deductible of {} and out-of-pocket maximum of {}",
            self.coverage_label(),
            self.plan.deductible_for(self.has_family).format_whole(),
            self.recommended.medical_costs.capped_at_oop_max.format_whole()
        )
    }

    fn cost_sharing_line(&self) -> String {
        format!(
            "Primary care {}, specialist {}",
            self.plan.services.primary_care.describe(),
            self.plan.services.specialist.describe()
        )
    }

    fn medical_line(&self) -> String {
        format!(
            "Estimated medical costs of {}/year",
            self.recommended.medical_costs.final_medical_costs.format_whole()
        )
    }

    fn total_line(&self) -> String {
        let delta = self.delta_vs_cheapest();
        if delta > Money::ZERO {
            format!(
                "Estimated total annual cost of {}, {} more than the lowest-cost plan ({} at {})",
                self.recommended.total_annual_cost.format_whole(),
                delta.format_whole(),
                self.cheapest.plan_name,
                self.cheapest.total_annual_cost.format_whole()
            )
        } else {
            format!(
                "Lowest total annual cost at {}/year",
                self.recommended.total_annual_cost.format_whole()
            )
        }
    }
}

/// Render the explanation for the rule that fired
pub fn render_reasoning(ctx: &ReasoningContext<'_>) -> String {
    let name = &ctx.recommended.plan_name;
    let mut lines = Vec::new();

    let intro = match ctx.rule {
        RuleKind::Pregnancy => {
            lines.push(format!(
                "Pregnancy typically costs $6,000-10,000; {}",
                lowercase_first(&ctx.limits_line())
            ));
            lines.push(ctx.cost_sharing_line());
            lines.push(ctx.total_line());
            lines.push(ctx.hsa_line());
            format!("With pregnancy planned, I recommend {name} because:")
        }
        RuleKind::HighUsage => {
            lines.push(ctx.limits_line());
            lines.push(ctx.cost_sharing_line());
            lines.push(ctx.medical_line());
            lines.push(ctx.total_line());
            lines.push(ctx.hsa_line());
            let reason = if ctx.signals.has_chronic_conditions {
                "chronic conditions"
            } else {
                "high expected usage"
            };
            format!("With {reason}, I recommend {name} because:")
        }
        RuleKind::LowUsage if ctx.recommended.hsa.is_hsa_plan && ctx.delta_vs_cheapest() > Money::ZERO => {
            lines.push(format!(
                "Company contributes {}/year directly into your HSA",
                ctx.recommended.hsa.annual_hsa_contribution.format_whole()
            ));
            lines.push(format!(
                "Estimated total annual cost of {}, only {} more than the lowest-cost plan ({} at {})",
                ctx.recommended.total_annual_cost.format_whole(),
                ctx.delta_vs_cheapest().format_whole(),
                ctx.cheapest.plan_name,
                ctx.cheapest.total_annual_cost.format_whole()
            ));
            lines.push(premium_line(ctx.recommended));
            lines.push(ctx.medical_line());
            format!("Since you're healthy with low expected usage, I recommend {name} because:")
        }
        RuleKind::LowUsage => {
            lines.push(ctx.total_line());
            lines.push(ctx.hsa_line());
            lines.push(premium_line(ctx.recommended));
            lines.push(ctx.medical_line());
            format!("Since you're healthy with low expected usage, I recommend {name} because:")
        }
        RuleKind::Default => {
            lines.push(ctx.total_line());
            lines.push(ctx.hsa_line());
            lines.push(premium_line(ctx.recommended));
            lines.push(ctx.limits_line());
            format!("Based on your situation, I recommend {name} because:")
        }
    };

    if ctx.fell_back && ctx.rule != RuleKind::LowUsage {
        lines.push("No Gold plan is offered, so the lowest-cost plan is recommended".to_string());
    }

    let mut reasoning = intro;
    for line in lines {
        reasoning.push_str("\n• ");
        reasoning.push_str(&line);
    }
    reasoning
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn premium_line(calc: &CostCalculation) -> String {
    format!(
        "Premium of {}/month ({}/year) after the employer contribution",
        calc.premium.employee_monthly_premium.format_cents(),
        calc.premium.employee_annual_premium.format_whole()
    )
}
