//! Solar Checker - Rooftop solar feasibility assessment using AI
//!
//! A CLI tool that analyzes rooftop imagery to assess solar installation
//! potential.

use clap::Parser;
use solar_checker::cli::Cli;
use solar_checker::commands;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
