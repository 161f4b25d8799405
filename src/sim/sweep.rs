//! Scenario sweeps over tariffs and demand-response parameters.
//!
//! A sweep runs one baseline per tariff and one redistributed simulation
//! per parameter combination, collecting each KPI into a [`SweepTable`]
//! with one row per scenario and one column per tariff.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::hydraulics::HydraulicSolver;
use crate::tariff::TariffSet;

use super::engine::ScenarioRunner;
use super::types::{round_dp, stepped_range};

/// Row-major KPI grid: scenario rows by tariff columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepTable {
    pub title: String,
    rows: Vec<String>,
    columns: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl SweepTable {
    /// Zero-filled table with the given labels.
    pub fn new(title: impl Into<String>, rows: Vec<String>, columns: Vec<String>) -> Self {
        let values = vec![vec![0.0; columns.len()]; rows.len()];
        Self {
            title: title.into(),
            rows,
            columns,
            values,
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[row][col] = value;
    }

    /// Values of one scenario row, in column order.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row]
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one tariff column, in row order.
    pub fn column(&self, col: usize) -> Vec<f64> {
        self.values.iter().map(|r| r[col]).collect()
    }

    /// All cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().flatten().copied()
    }
}

/// Default setting grid: 1..=12 hours.
pub fn default_settings() -> Vec<usize> {
    (1..=12).collect()
}

/// Uptake grid `step, 2*step, ..., 1.0`, rounded to 2 decimals.
pub fn uptake_grid(step: f64) -> Vec<f64> {
    stepped_range(step, 1.0, step, 2)
}

/// Elasticity grid `step, 2*step, ..., max`, rounded to 2 decimals.
pub fn elasticity_grid(step: f64, max: f64) -> Vec<f64> {
    stepped_range(step, max, step, 2)
}

/// Row label of a fixed scenario.
pub fn fixed_label(setting: usize, uptake: f64) -> String {
    format!("S={setting} X={uptake}")
}

/// Row label of an elasticity scenario.
pub fn elasticity_label(elasticity: f64) -> String {
    format!("E={elasticity}")
}

/// Results of a fixed setting/uptake sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSweepReport {
    pub settings: Vec<usize>,
    pub uptakes: Vec<f64>,
    pub energy_change_pct: SweepTable,
    pub cost_savings_pct: SweepTable,
    pub total_demand_difference: SweepTable,
    pub demand_shifted_pct: SweepTable,
}

impl FixedSweepReport {
    /// Row index of `(setting index, uptake index)`.
    pub fn row_index(&self, setting_idx: usize, uptake_idx: usize) -> usize {
        setting_idx * self.uptakes.len() + uptake_idx
    }

    /// Tables in export order.
    pub fn tables(&self) -> [&SweepTable; 4] {
        [
            &self.energy_change_pct,
            &self.cost_savings_pct,
            &self.total_demand_difference,
            &self.demand_shifted_pct,
        ]
    }
}

/// Results of an elasticity sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct ElasticitySweepReport {
    pub elasticities: Vec<f64>,
    pub energy_change_pct: SweepTable,
    pub cost_savings_pct: SweepTable,
    pub revenue_increase_pct: SweepTable,
    pub net_increase_pct: SweepTable,
    pub total_demand_difference: SweepTable,
    pub demand_shifted_pct: SweepTable,
}

impl ElasticitySweepReport {
    /// Tables in export order.
    pub fn tables(&self) -> [&SweepTable; 6] {
        [
            &self.energy_change_pct,
            &self.cost_savings_pct,
            &self.revenue_increase_pct,
            &self.net_increase_pct,
            &self.total_demand_difference,
            &self.demand_shifted_pct,
        ]
    }
}

fn tariff_columns(tariffs: &TariffSet) -> Vec<String> {
    tariffs.names().into_iter().map(str::to_string).collect()
}

/// Sweeps every tariff over every `(setting, uptake)` pair.
///
/// # Errors
///
/// Returns [`Error::Validation`] on an empty grid and propagates scenario
/// errors (e.g. a setting that does not fit the horizon).
pub fn fixed_sweep<S: HydraulicSolver>(
    runner: &ScenarioRunner<S>,
    tariffs: &TariffSet,
    settings: &[usize],
    uptakes: &[f64],
) -> Result<FixedSweepReport> {
    if tariffs.is_empty() || settings.is_empty() || uptakes.is_empty() {
        return Err(Error::Validation(
            "fixed sweep needs at least one tariff, setting and uptake".to_string(),
        ));
    }

    let rows: Vec<String> = settings
        .iter()
        .flat_map(|&s| uptakes.iter().map(move |&x| fixed_label(s, x)))
        .collect();
    let columns = tariff_columns(tariffs);
    let table = |title: &str| SweepTable::new(title, rows.clone(), columns.clone());

    let mut report = FixedSweepReport {
        settings: settings.to_vec(),
        uptakes: uptakes.to_vec(),
        energy_change_pct: table("Energy Change Percentage"),
        cost_savings_pct: table("Cost Savings Percentage"),
        total_demand_difference: table("Total Demand Difference"),
        demand_shifted_pct: table("Demand Shifted Percentage"),
    };

    for (col, tariff) in tariffs.iter().enumerate() {
        info!(tariff = %tariff.name, scenarios = rows.len(), "fixed sweep");
        let baseline = runner.baseline(tariff, None)?;
        for (si, &setting) in settings.iter().enumerate() {
            for (xi, &uptake) in uptakes.iter().enumerate() {
                let row = report.row_index(si, xi);
                let kpi = runner.run_fixed(&baseline, setting, uptake)?.kpi;
                debug!(
                    tariff = %tariff.name,
                    scenario = %kpi.label,
                    cost_savings_pct = kpi.cost_savings_pct,
                    "scenario done"
                );
                report.energy_change_pct.set(row, col, kpi.energy_change_pct);
                report.cost_savings_pct.set(row, col, kpi.cost_savings_pct);
                // fixed-sweep tables carry the difference to 1 dp
                report
                    .total_demand_difference
                    .set(row, col, round_dp(kpi.total_demand_difference, 1));
                report.demand_shifted_pct.set(row, col, kpi.demand_shifted_pct);
            }
        }
    }
    Ok(report)
}

/// Sweeps every energy tariff, paired with the water tariff of the same
/// name, over every elasticity.
///
/// # Errors
///
/// Returns [`Error::Validation`] on an empty grid or a missing water
/// tariff, and propagates scenario errors.
pub fn elasticity_sweep<S: HydraulicSolver>(
    runner: &ScenarioRunner<S>,
    energy_tariffs: &TariffSet,
    water_tariffs: &TariffSet,
    elasticities: &[f64],
) -> Result<ElasticitySweepReport> {
    if energy_tariffs.is_empty() || elasticities.is_empty() {
        return Err(Error::Validation(
            "elasticity sweep needs at least one tariff and elasticity".to_string(),
        ));
    }

    let rows: Vec<String> = elasticities.iter().map(|&e| elasticity_label(e)).collect();
    let columns = tariff_columns(energy_tariffs);
    let table = |title: &str| SweepTable::new(title, rows.clone(), columns.clone());

    let mut report = ElasticitySweepReport {
        elasticities: elasticities.to_vec(),
        energy_change_pct: table("Energy Change Percentage"),
        cost_savings_pct: table("Cost Savings Percentage"),
        revenue_increase_pct: table("Revenue Increase Percentage"),
        net_increase_pct: table("Net Increase Percentage"),
        total_demand_difference: table("Total Demand Difference"),
        demand_shifted_pct: table("Demand Shifted Percentage"),
    };

    for (col, energy) in energy_tariffs.iter().enumerate() {
        let water = water_tariffs.require(&energy.name)?;
        info!(tariff = %energy.name, scenarios = rows.len(), "elasticity sweep");
        let baseline = runner.baseline(energy, Some(water))?;
        for (row, &e) in elasticities.iter().enumerate() {
            let kpi = runner.run_elasticity(&baseline, water, e)?.kpi;
            debug!(
                tariff = %energy.name,
                scenario = %kpi.label,
                cost_savings_pct = kpi.cost_savings_pct,
                "scenario done"
            );
            report.energy_change_pct.set(row, col, kpi.energy_change_pct);
            report.cost_savings_pct.set(row, col, kpi.cost_savings_pct);
            report
                .revenue_increase_pct
                .set(row, col, kpi.revenue_increase_pct().unwrap_or_default());
            report
                .net_increase_pct
                .set(row, col, kpi.net_increase_pct().unwrap_or_default());
            report
                .total_demand_difference
                .set(row, col, kpi.total_demand_difference);
            report.demand_shifted_pct.set(row, col, kpi.demand_shifted_pct);
        }
    }
    Ok(report)
}

/// Elasticity sweep in which every energy tariff also serves as its own
/// water tariff, so customers respond to the utility's energy prices.
///
/// # Errors
///
/// As [`elasticity_sweep`].
pub fn same_tariff_sweep<S: HydraulicSolver>(
    runner: &ScenarioRunner<S>,
    energy_tariffs: &TariffSet,
    elasticities: &[f64],
) -> Result<ElasticitySweepReport> {
    elasticity_sweep(runner, energy_tariffs, energy_tariffs, elasticities)
}
