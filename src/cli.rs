//! CLI definition using clap

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format for results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Parser)]
#[command(name = "solar-checker")]
#[command(version)]
#[command(about = "Rooftop solar feasibility assessment using AI image analysis")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Model identifier override
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a rooftop image for solar installation potential
    Analyze {
        /// Path to rooftop image (satellite or aerial view)
        image: PathBuf,

        /// Property location (e.g., "San Francisco, CA")
        #[arg(long, short = 'l')]
        location: String,

        /// Installation budget in US dollars
        #[arg(long, short = 'b')]
        budget: f64,

        /// API key. Takes precedence over the OPENROUTER_API_KEY environment variable.
        #[arg(long)]
        api_key: Option<String>,

        /// Write the report with request context to a JSON file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Request timeout in seconds. Uses config value if not specified.
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Show or update configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set vision model identifier
        #[arg(long)]
        set_model: Option<String>,

        /// Set inference endpoint URL
        #[arg(long)]
        set_base_url: Option<String>,

        /// Set remote call timeout in seconds
        #[arg(long)]
        set_timeout: Option<u64>,

        /// Set default output format
        #[arg(long)]
        set_format: Option<OutputFormat>,
    },
}
