//! Output formatting module

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::types::SolarReport;

pub fn output_report(output_format: OutputFormat, report: &SolarReport) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(report)?;
        println!("{}", content);
        return Ok(());
    }

    // Table format
    let roof = &report.roof_analysis;
    let solar = &report.solar_potential;
    let financial = &report.financial_analysis;
    let installation = &report.installation_considerations;
    let recommendations = &report.recommendations;

    println!("\nSolar Feasibility Report");
    println!("========================");

    println!("\n--- Key Metrics ---");
    println!("System size:     {:.1} kW", solar.recommended_system_size_kw);
    println!("Annual output:   {:.0} kWh", solar.annual_energy_production_kwh);
    println!("Payback period:  {:.1} years", financial.payback_period_years);
    println!("ROI:             {:.1}%", financial.roi_percentage);

    println!("\n--- Roof Analysis ---");
    println!("Roof type:       {}", roof.roof_type);
    println!("Total area:      {:.0} sq ft", roof.roof_area_sqft);
    println!("Usable area:     {:.0} sq ft", roof.usable_area_sqft);
    println!("Orientation:     {}", roof.orientation);
    println!("Tilt angle:      {:.0}°", roof.tilt_angle);
    println!("Shading:         {}", roof.shading_assessment);
    if !roof.obstacles.is_empty() {
        println!("Obstacles:");
        for obstacle in &roof.obstacles {
            println!("  - {}", obstacle);
        }
    }

    println!("\n--- Solar Potential ---");
    println!("Panels:          {:.0}", solar.estimated_panels_count);
    println!("Panel type:      {}", solar.optimal_panel_type);
    println!("Capacity factor: {:.1}%", solar.capacity_factor);

    println!("\n--- Financial Analysis ---");
    println!("System cost:     ${:.0}", financial.estimated_system_cost);
    println!("Cost per watt:   ${:.2}", financial.cost_per_watt);
    println!("Annual savings:  ${:.0}", financial.annual_savings);
    println!("Net present value: ${:.0}", financial.net_present_value);

    println!("\n--- Installation ---");
    println!("Structural:      {}", installation.structural_assessment);
    println!("Electrical:      {}", installation.electrical_requirements);
    println!("Permits:         {}", installation.permit_complexity);
    println!("Timeline:        {}", installation.installation_timeline);

    println!("\n--- Recommendations ---");
    if recommendations.proceed_with_installation {
        println!("Recommended: this property is suitable for solar installation");
    } else {
        println!("Caution: additional evaluation recommended before proceeding");
    }
    print_list("Priority improvements", &recommendations.priority_improvements);
    print_list("Alternative solutions", &recommendations.alternative_solutions);
    print_list("Next steps", &recommendations.next_steps);

    Ok(())
}

fn print_list(label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{}:", label);
    for item in items {
        println!("  - {}", item);
    }
}
