//! AI prompts for rooftop analysis - solar feasibility assessment
//!
//! The prompt pins down the exact JSON shape the model must answer with.
//! Key techniques:
//! - No numeric example values in the JSON template (uses placeholders)
//! - Enumerated categorical values spelled out in the placeholder text
//! - Location and budget injected verbatim so the model grounds the
//!   financial figures
//!
//! Prompt building is pure and deterministic: the same (location, budget)
//! always produces a byte-identical instruction, which keeps tests and
//! request reproduction stable.

use serde_json::json;

// ============================================================================
// Report template
// ============================================================================

/// JSON template describing the required report shape.
///
/// String placeholders stand in for every value so the model cannot copy
/// example numbers. Field names must match the schema tables in
/// `crate::vision::schema`.
fn build_report_json_template() -> serde_json::Value {
    json!({
        "roof_analysis": {
            "roof_type": "flat/pitched/hip/gable",
            "roof_area_sqft": "estimated_total_area",
            "usable_area_sqft": "area_suitable_for_panels",
            "orientation": "primary_roof_direction",
            "tilt_angle": "estimated_degrees",
            "shading_assessment": "minimal/moderate/significant",
            "obstacles": ["list", "of", "obstacles"]
        },
        "solar_potential": {
            "recommended_system_size_kw": "calculated_size",
            "estimated_panels_count": "number_of_panels",
            "annual_energy_production_kwh": "estimated_production",
            "capacity_factor": "percentage",
            "optimal_panel_type": "monocrystalline/polycrystalline/thin_film"
        },
        "financial_analysis": {
            "estimated_system_cost": "total_cost",
            "cost_per_watt": "cost_per_watt",
            "annual_savings": "estimated_annual_savings",
            "payback_period_years": "calculated_payback",
            "roi_percentage": "return_on_investment",
            "net_present_value": "npv_calculation"
        },
        "installation_considerations": {
            "structural_assessment": "suitable/needs_evaluation/not_suitable",
            "electrical_requirements": "description",
            "permit_complexity": "simple/moderate/complex",
            "installation_timeline": "estimated_weeks"
        },
        "recommendations": {
            "proceed_with_installation": "true_or_false",
            "priority_improvements": ["list", "of", "suggestions"],
            "alternative_solutions": ["if", "applicable"],
            "next_steps": ["recommended", "actions"]
        }
    })
}

/// Format a budget as US dollars with comma separators, e.g. `$25,000.00`.
pub fn format_budget_usd(budget: f64) -> String {
    let fixed = format!("{:.2}", budget.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if budget < 0.0 { "-" } else { "" };
    format!("${}{}.{}", sign, grouped, cents)
}

// ============================================================================
// Prompt builders
// ============================================================================

/// Build the rooftop analysis instruction for one request.
pub fn build_analysis_prompt(location: &str, budget: f64) -> String {
    let template = build_report_json_template();
    let json_str = serde_json::to_string_pretty(&template).unwrap_or_else(|_| "{}".to_string());

    format!(
        "You are an expert solar energy consultant analyzing a rooftop for solar panel \
         installation potential.\n\
         \n\
         Location: {}\n\
         Budget: {}\n\
         \n\
         Analyze this satellite/aerial image and provide a comprehensive assessment in the \
         following JSON format:\n\
         \n\
         {}\n\
         \n\
         Base your analysis on visible roof characteristics, estimated dimensions, shading \
         from trees/buildings, roof condition, and typical solar installation parameters for \
         the given location and budget.",
        location,
        format_budget_usd(budget),
        json_str
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_analysis_prompt("San Francisco, CA", 25_000.0);
        let b = build_analysis_prompt("San Francisco, CA", 25_000.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_prompt_embeds_location_and_budget() {
        let prompt = build_analysis_prompt("Austin, TX", 25_000.0);
        assert!(prompt.contains("Location: Austin, TX"));
        assert!(prompt.contains("Budget: $25,000.00"));
    }

    #[test]
    fn test_prompt_names_every_section() {
        let prompt = build_analysis_prompt("Austin, TX", 10_000.0);
        for section in [
            "roof_analysis",
            "solar_potential",
            "financial_analysis",
            "installation_considerations",
            "recommendations",
        ] {
            assert!(prompt.contains(section), "missing section {}", section);
        }
    }

    #[test]
    fn test_prompt_names_key_fields() {
        let prompt = build_analysis_prompt("Austin, TX", 10_000.0);
        for field in [
            "roof_area_sqft",
            "recommended_system_size_kw",
            "payback_period_years",
            "permit_complexity",
            "proceed_with_installation",
        ] {
            assert!(prompt.contains(field), "missing field {}", field);
        }
    }

    #[test]
    fn test_prompt_uses_placeholders_not_numbers() {
        let prompt = build_analysis_prompt("Austin, TX", 10_000.0);
        assert!(prompt.contains("\"estimated_total_area\""));
        assert!(prompt.contains("\"true_or_false\""));
    }

    #[test]
    fn test_format_budget_usd_groups_thousands() {
        assert_eq!(format_budget_usd(25_000.0), "$25,000.00");
        assert_eq!(format_budget_usd(1_234_567.5), "$1,234,567.50");
        assert_eq!(format_budget_usd(999.99), "$999.99");
        assert_eq!(format_budget_usd(1000.0), "$1,000.00");
    }
}
