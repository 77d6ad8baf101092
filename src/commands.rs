//! Command handlers

use crate::cli::{Cli, Commands, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::output::output_report;
use crate::scanner::load_image;
use crate::types::{AnalysisRequest, ReportEntry};
use crate::vision::{analyze_rooftop, resolve_api_key, AnalyzerConfig};
use chrono::Utc;
use image::GenericImageView;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref model) = cli.model {
        config.model = model.clone();
    }

    match &cli.command {
        Commands::Analyze {
            image,
            location,
            budget,
            api_key,
            output,
            timeout,
        } => {
            let output_format = cli.format.unwrap_or(config.output_format);
            if let Some(timeout) = timeout {
                config.timeout_secs = *timeout;
            }
            cmd_analyze(
                &cli,
                &config,
                image.clone(),
                location.clone(),
                *budget,
                api_key.as_deref(),
                output.clone(),
                output_format,
            )
        }

        Commands::Config {
            show,
            set_model,
            set_base_url,
            set_timeout,
            set_format,
        } => cmd_config(
            *show,
            set_model.clone(),
            set_base_url.clone(),
            *set_timeout,
            *set_format,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_analyze(
    cli: &Cli,
    config: &Config,
    image_path: PathBuf,
    location: String,
    budget: f64,
    api_key: Option<&str>,
    output: Option<PathBuf>,
    output_format: OutputFormat,
) -> Result<()> {
    let api_key = resolve_api_key(api_key)?;

    // Load and validate the image before touching the network
    let image = load_image(&image_path)?;
    if cli.verbose {
        eprintln!(
            "Loaded image: {} ({}x{} pixels)",
            image_path.display(),
            image.width(),
            image.height()
        );
    }

    let request = AnalysisRequest::new(image, location, budget)?;

    let analyzer_config = AnalyzerConfig::default()
        .with_model(config.model.clone())
        .with_base_url(config.base_url.clone())
        .with_timeout_secs(config.timeout_secs);

    if cli.verbose {
        eprintln!("Model: {}", analyzer_config.model);
        eprintln!("Endpoint: {}", analyzer_config.base_url);
    }

    let spinner = analysis_spinner();
    let result = analyze_rooftop(&request, &api_key, &analyzer_config);
    spinner.finish_and_clear();

    let report = result?;

    output_report(output_format, &report)?;

    if let Some(output_path) = output {
        let entry = ReportEntry {
            location: request.location().to_string(),
            budget: request.budget(),
            model: analyzer_config.model.clone(),
            analyzed_at: Utc::now(),
            report,
        };
        std::fs::write(&output_path, serde_json::to_string_pretty(&entry)?)?;
        if cli.verbose {
            eprintln!("Report saved to {}", output_path.display());
        }
    }

    Ok(())
}

fn analysis_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Analyzing rooftop with AI... this may take a few moments");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

fn cmd_config(
    show: bool,
    set_model: Option<String>,
    set_base_url: Option<String>,
    set_timeout: Option<u64>,
    set_format: Option<OutputFormat>,
) -> Result<()> {
    let mut config = Config::load()?;

    let mut changed = false;

    if let Some(model) = set_model {
        config.model = model;
        changed = true;
    }
    if let Some(base_url) = set_base_url {
        config.base_url = base_url;
        changed = true;
    }
    if let Some(timeout) = set_timeout {
        config.timeout_secs = timeout;
        changed = true;
    }
    if let Some(format) = set_format {
        config.output_format = format;
        changed = true;
    }

    if changed {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !changed {
        println!("{}", config);
    }

    Ok(())
}
