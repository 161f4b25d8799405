//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "wds-tariff-sim")]
#[command(version, about = "Demand-response tariff analysis for water distribution networks")]
#[command(
    long_about = "Builds energy and water tariffs for a water network, redistributes demand \
    under fixed setting/uptake and elasticity programmes, simulates pumping energy and writes \
    CSV tables comparing every scenario.\n\
    \nExamples:\n  \
    wds-tariff-sim tariffs --preset quick\n  \
    wds-tariff-sim fixed --scenario scenarios/net3.toml --out results\n  \
    wds-tariff-sim detail --mode elasticity --tariff Opposite --elasticity 0.4"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Load the scenario from a TOML file
    #[arg(long, global = true, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, quick)
    #[arg(long, global = true)]
    pub preset: Option<String>,

    /// Override the random tariff seed
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Override the output directory
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,

    /// Read energy tariffs from a CSV file instead of building them
    #[arg(long, global = true, value_name = "CSV")]
    pub energy_tariffs: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the energy and water tariffs and export them
    Tariffs,
    /// Run the fixed setting/uptake sweep and its detailed scenario
    Fixed,
    /// Run the elasticity sweep and its detailed scenario
    Elasticity,
    /// Run the elasticity sweep with each energy tariff as its own water tariff
    SameTariff,
    /// Run every sweep, the detailed scenarios and the discussion statistics
    All,
    /// Analyse a single scenario in detail
    Detail(DetailArgs),
}

/// Redistribution procedure of a detailed scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DetailMode {
    Fixed,
    Elasticity,
}

#[derive(Debug, Args)]
pub struct DetailArgs {
    /// Redistribution procedure
    #[arg(long, value_enum, default_value_t = DetailMode::Fixed)]
    pub mode: DetailMode,

    /// Energy tariff name (defaults to the scenario's detail tariff)
    #[arg(long)]
    pub tariff: Option<String>,

    /// Setting S for fixed mode
    #[arg(long)]
    pub setting: Option<usize>,

    /// Uptake rate X for fixed mode
    #[arg(long)]
    pub uptake: Option<f64>,

    /// Elasticity for elasticity mode
    #[arg(long)]
    pub elasticity: Option<f64>,
}
