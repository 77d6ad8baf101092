//! Core types for solar feasibility analysis

use crate::error::{Error, Result};
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// One rooftop analysis request: image, property location, and budget.
///
/// Validated on construction and immutable afterwards. A request is created
/// per user action and discarded after the pipeline run; nothing persists
/// across invocations.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    image: DynamicImage,
    location: String,
    budget: f64,
}

impl AnalysisRequest {
    /// Build a request, rejecting an empty location or a non-finite /
    /// non-positive budget.
    pub fn new(image: DynamicImage, location: impl Into<String>, budget: f64) -> Result<Self> {
        let location = location.into();
        if location.trim().is_empty() {
            return Err(Error::InvalidRequest("location must not be empty".to_string()));
        }
        if !budget.is_finite() || budget <= 0.0 {
            return Err(Error::InvalidRequest(format!(
                "budget must be a positive amount, got {}",
                budget
            )));
        }
        Ok(Self {
            image,
            location,
            budget,
        })
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }
}

/// Validated solar feasibility report extracted from the AI reply.
///
/// All five sections are required; the schema validator guarantees every
/// field below is present and typed before this struct is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarReport {
    pub roof_analysis: RoofAnalysis,
    pub solar_potential: SolarPotential,
    pub financial_analysis: FinancialAnalysis,
    pub installation_considerations: InstallationConsiderations,
    pub recommendations: Recommendations,
}

/// Roof characteristics visible in the image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofAnalysis {
    /// flat / pitched / hip / gable
    pub roof_type: String,
    pub roof_area_sqft: f64,
    /// Area suitable for panel placement
    pub usable_area_sqft: f64,
    /// Primary roof direction
    pub orientation: String,
    pub tilt_angle: f64,
    /// minimal / moderate / significant
    pub shading_assessment: String,
    pub obstacles: Vec<String>,
}

/// Recommended system sizing and yield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarPotential {
    pub recommended_system_size_kw: f64,
    pub estimated_panels_count: f64,
    pub annual_energy_production_kwh: f64,
    pub capacity_factor: f64,
    /// monocrystalline / polycrystalline / thin_film
    pub optimal_panel_type: String,
}

/// Cost, savings, and return projections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialAnalysis {
    pub estimated_system_cost: f64,
    pub cost_per_watt: f64,
    pub annual_savings: f64,
    pub payback_period_years: f64,
    pub roi_percentage: f64,
    pub net_present_value: f64,
}

/// Practical installation assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallationConsiderations {
    /// suitable / needs_evaluation / not_suitable
    pub structural_assessment: String,
    pub electrical_requirements: String,
    /// simple / moderate / complex
    pub permit_complexity: String,
    pub installation_timeline: String,
}

/// Go / no-go advice and follow-ups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub proceed_with_installation: bool,
    pub priority_improvements: Vec<String>,
    pub alternative_solutions: Vec<String>,
    pub next_steps: Vec<String>,
}

/// A saved analysis: request context plus the validated report.
///
/// Written as pretty JSON by `analyze --output`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Property location as given on the request
    pub location: String,
    /// Budget in US dollars
    pub budget: f64,
    /// Model that produced the reply
    pub model: String,
    /// Analysis timestamp
    pub analyzed_at: chrono::DateTime<chrono::Utc>,
    pub report: SolarReport,
}
