//! Command-line parsing for the Fulcrum plan builder.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the planning code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fulcrum", version, about = "Fulcrum financial-document download-plan builder")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the download plan CSV and print a run summary.
    Plan(PlanArgs),
    /// Check the roster CSVs for structural problems without building a plan.
    Validate(ValidateArgs),
}

/// Options for building a plan.
#[derive(Debug, Parser, Clone)]
pub struct PlanArgs {
    /// Policy TOML file.
    #[arg(short = 'c', long, default_value = "config/download_plan.toml")]
    pub config: PathBuf,

    /// Defaulter cohort roster CSV.
    #[arg(long, default_value = "data/cibil/wilful_defaulters.csv")]
    pub defaulters: PathBuf,

    /// Non-defaulter cohort roster CSV.
    #[arg(long = "non-defaulters", default_value = "data/cibil/non_defaulters.csv")]
    pub non_defaulters: PathBuf,

    /// Output plan CSV path.
    #[arg(short = 'o', long, default_value = "data/processed/financial_download_plan.csv")]
    pub output: PathBuf,

    /// Compute and print the summary only; skip writing the plan CSV.
    #[arg(long)]
    pub dry_run: bool,
}

/// Options for validating rosters.
#[derive(Debug, Parser)]
pub struct ValidateArgs {
    /// Defaulter cohort roster CSV.
    #[arg(long, default_value = "data/cibil/wilful_defaulters.csv")]
    pub defaulters: PathBuf,

    /// Non-defaulter cohort roster CSV.
    #[arg(long = "non-defaulters", default_value = "data/cibil/non_defaulters.csv")]
    pub non_defaulters: PathBuf,
}
