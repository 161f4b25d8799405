//! wds-tariff-sim entry point: CLI wiring and config-driven analysis runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;

use wds_tariff_sim::cli::{Cli, Command, DetailArgs, DetailMode, GlobalArgs};
use wds_tariff_sim::config::{ConfigError, ScenarioConfig};
use wds_tariff_sim::error::Error;
use wds_tariff_sim::hydraulics::SupplyBalanceSolver;
use wds_tariff_sim::io::{export, import};
use wds_tariff_sim::logging;
use wds_tariff_sim::sim::detail::{DetailReport, elasticity_detail, fixed_detail};
use wds_tariff_sim::sim::discussion::{ElasticityDiscussion, FixedDiscussion};
use wds_tariff_sim::sim::sweep::{elasticity_sweep, fixed_sweep, same_tariff_sweep};
use wds_tariff_sim::sim::{ElasticitySweepReport, FixedSweepReport, ScenarioRunner};
use wds_tariff_sim::tariff::{TariffSet, build_energy_tariffs, build_water_tariffs};

/// Everything a subcommand needs: config, runner and both tariff sets.
struct Analysis {
    cfg: ScenarioConfig,
    runner: ScenarioRunner<SupplyBalanceSolver>,
    energy_tariffs: TariffSet,
    water_tariffs: TariffSet,
}

impl Analysis {
    fn out_dir(&self) -> &Path {
        &self.cfg.output.dir
    }
}

/// Loads config: `--scenario` takes priority, then `--preset`, then baseline.
fn load_config(global: &GlobalArgs) -> Result<ScenarioConfig> {
    let mut cfg = if let Some(path) = &global.scenario {
        ScenarioConfig::from_toml_file(path).map_err(Error::from)?
    } else if let Some(name) = &global.preset {
        ScenarioConfig::from_preset(name).map_err(Error::from)?
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(seed) = global.seed {
        cfg.simulation.seed = seed;
    }
    if let Some(out) = &global.out {
        cfg.output.dir = out.clone();
    }

    check_fields(&cfg.validate())?;
    Ok(cfg)
}

/// Prints every field error and fails if there were any.
fn check_fields(errors: &[ConfigError]) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }
    for e in errors {
        eprintln!("{e}");
    }
    bail!("scenario has {} invalid field(s)", errors.len());
}

fn prepare(cfg: ScenarioConfig, tariff_file: Option<&Path>) -> Result<Analysis> {
    let network = cfg.load_network().context("failed to load network")?;
    let runner = ScenarioRunner::new(network, SupplyBalanceSolver, cfg.horizon())
        .context("invalid network demands")?;

    let bau = runner.bau_energy().context("BAU simulation failed")?;
    let s = &cfg.simulation;
    let energy_tariffs = match tariff_file {
        Some(path) => import::load_tariff_set(path)
            .with_context(|| format!("failed to read tariffs from {}", path.display()))?,
        None => build_energy_tariffs(&bau, s.band_width, s.random_tariffs, s.seed)
            .context("failed to build energy tariffs")?,
    };
    if energy_tariffs.steps() != bau.len() {
        bail!(
            "energy tariffs have {} hours, the horizon has {}",
            energy_tariffs.steps(),
            bau.len()
        );
    }
    check_fields(&cfg.validate_detail_tariffs(&energy_tariffs))?;
    let water_tariffs = build_water_tariffs(&bau, &energy_tariffs, s.band_width)
        .context("failed to build water tariffs")?;
    info!(
        network = %runner.network().name,
        tariffs = energy_tariffs.len(),
        bau_energy_kwh = bau.iter().sum::<f64>(),
        "analysis prepared"
    );

    Ok(Analysis {
        cfg,
        runner,
        energy_tariffs,
        water_tariffs,
    })
}

fn export_tariffs(a: &Analysis) -> Result<()> {
    let dir = a.out_dir();
    export::export_tariff_set(&a.energy_tariffs, &dir.join("energy_tariffs.csv"))?;
    export::export_tariff_set(&a.water_tariffs, &dir.join("water_tariffs.csv"))?;
    export::export_demand_table(a.runner.original_demands(), &dir.join("original_demands.csv"))?;
    Ok(())
}

fn write_detail(report: &DetailReport, dir: &Path, prefix: &str) -> Result<()> {
    export::export_detail(report, dir, prefix)
        .with_context(|| format!("failed to export {prefix} detail"))?;
    println!("\n{}", report.summary);
    Ok(())
}

fn run_fixed(a: &Analysis) -> Result<FixedSweepReport> {
    let f = &a.cfg.fixed;
    let report = fixed_sweep(&a.runner, &a.energy_tariffs, &f.settings, &a.cfg.uptakes())
        .context("fixed sweep failed")?;
    export::export_fixed_sweep(&report, a.out_dir())?;

    let tariff = a.energy_tariffs.require(&f.detail_tariff)?;
    let detail = fixed_detail(&a.runner, tariff, f.detail_setting, f.detail_uptake)?;
    write_detail(&detail, a.out_dir(), "fixed_detail")?;
    Ok(report)
}

fn run_elasticity(a: &Analysis) -> Result<ElasticitySweepReport> {
    let e = &a.cfg.elasticity;
    let report = elasticity_sweep(
        &a.runner,
        &a.energy_tariffs,
        &a.water_tariffs,
        &a.cfg.elasticities(),
    )
    .context("elasticity sweep failed")?;
    export::export_elasticity_sweep(&report, a.out_dir(), "elasticity")?;

    let energy = a.energy_tariffs.require(&e.detail_tariff)?;
    let water = a.water_tariffs.require(&e.detail_tariff)?;
    let detail = elasticity_detail(&a.runner, energy, water, e.detail_elasticity)?;
    write_detail(&detail, a.out_dir(), "elasticity_detail")?;
    Ok(report)
}

fn run_same_tariff(a: &Analysis) -> Result<ElasticitySweepReport> {
    let report = same_tariff_sweep(&a.runner, &a.energy_tariffs, &a.cfg.elasticities())
        .context("same-tariff sweep failed")?;
    export::export_elasticity_sweep(&report, a.out_dir(), "same_tariff")?;
    Ok(report)
}

fn run_detail(a: &Analysis, args: &DetailArgs) -> Result<()> {
    let report = match args.mode {
        DetailMode::Fixed => {
            let f = &a.cfg.fixed;
            let name = args.tariff.as_deref().unwrap_or(&f.detail_tariff);
            let tariff = a.energy_tariffs.require(name)?;
            fixed_detail(
                &a.runner,
                tariff,
                args.setting.unwrap_or(f.detail_setting),
                args.uptake.unwrap_or(f.detail_uptake),
            )?
        }
        DetailMode::Elasticity => {
            let e = &a.cfg.elasticity;
            let name = args.tariff.as_deref().unwrap_or(&e.detail_tariff);
            elasticity_detail(
                &a.runner,
                a.energy_tariffs.require(name)?,
                a.water_tariffs.require(name)?,
                args.elasticity.unwrap_or(e.detail_elasticity),
            )?
        }
    };
    write_detail(&report, a.out_dir(), "detail")
}

fn run_all(a: &Analysis) -> Result<()> {
    export_tariffs(a)?;
    let fixed = run_fixed(a)?;
    let same_tariff = run_same_tariff(a)?;
    let elasticity = run_elasticity(a)?;

    let fixed_stats = FixedDiscussion::from_report(&fixed);
    let same_tariff_stats = ElasticityDiscussion::from_report(&same_tariff);
    let elasticity_stats = ElasticityDiscussion::from_report(&elasticity);
    export::export_fixed_discussion(&fixed_stats, a.out_dir())?;
    export::export_elasticity_discussion(&same_tariff_stats, a.out_dir(), "same_tariff")?;
    export::export_elasticity_discussion(&elasticity_stats, a.out_dir(), "elasticity")?;

    let total = fixed_stats.signs + same_tariff_stats.signs + elasticity_stats.signs;
    export::export_sign_counts(
        &[
            ("fixed", fixed_stats.signs),
            ("same_tariff", same_tariff_stats.signs),
            ("elasticity", elasticity_stats.signs),
            ("total", total),
        ],
        &a.out_dir().join("discussion_sign_counts.csv"),
    )?;

    println!("\n--- Cost savings across all scenarios ---");
    println!("Fixed:        {}", fixed_stats.signs);
    println!("Same tariff:  {}", same_tariff_stats.signs);
    println!("Elasticity:   {}", elasticity_stats.signs);
    println!("Total:        {total}");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.global.verbose);

    let cfg = load_config(&cli.global)?;
    let out: PathBuf = cfg.output.dir.clone();
    std::fs::create_dir_all(&out).with_context(|| format!("cannot create {}", out.display()))?;
    let analysis = prepare(cfg, cli.global.energy_tariffs.as_deref())?;

    match &cli.command {
        Command::Tariffs => export_tariffs(&analysis)?,
        Command::Fixed => {
            run_fixed(&analysis)?;
        }
        Command::Elasticity => {
            run_elasticity(&analysis)?;
        }
        Command::SameTariff => {
            run_same_tariff(&analysis)?;
        }
        Command::All => run_all(&analysis)?,
        Command::Detail(args) => run_detail(&analysis, args)?,
    }

    eprintln!("Results written to {}", out.display());
    Ok(())
}
