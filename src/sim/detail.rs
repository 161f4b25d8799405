//! Hour-by-hour breakdown of a single scenario.

use tracing::info;

use crate::error::Result;
use crate::hydraulics::HydraulicSolver;
use crate::network::DemandTable;
use crate::response::{HourRecord, ResponseDetail};
use crate::tariff::Tariff;

use super::engine::{Baseline, ScenarioOutcome, ScenarioRunner};
use super::kpi::ScenarioKpi;
use super::types::{Horizon, pct, round_dp};

/// Revenue side of an hourly row.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRevenue {
    pub water_tariff: f64,
    pub original_revenue: f64,
    pub new_revenue: f64,
    pub original_net: f64,
    pub new_net: f64,
    /// `new_net - original_net`.
    pub net_difference: f64,
    /// `net_difference` relative to `|original_net|` of the same hour.
    pub net_difference_pct: f64,
}

/// One hour of a detailed scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRow {
    pub hour: usize,
    pub time_s: u64,
    pub energy_tariff: f64,
    /// Network demand before redistribution (3 dp).
    pub original_demand: f64,
    /// Network demand after redistribution (3 dp).
    pub new_demand: f64,
    /// `new_demand - original_demand`; positive where demand was added.
    pub shifted_demand: f64,
    pub shifted_demand_pct: f64,
    pub original_energy_kwh: f64,
    pub new_energy_kwh: f64,
    /// `original - new` (2 dp); positive where pumping fell.
    pub energy_difference: f64,
    /// `energy_difference` as a share of the day's original energy.
    pub energy_difference_pct: f64,
    pub original_cost: f64,
    pub new_cost: f64,
    pub cost_difference: f64,
    /// `cost_difference` as a share of the day's original cost.
    pub cost_difference_pct: f64,
    pub revenue: Option<HourlyRevenue>,
}

/// Everything produced by a detailed single-scenario analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailReport {
    pub hourly: Vec<HourlyRow>,
    pub summary: ScenarioKpi,
    pub response: Vec<ResponseDetail>,
    /// BAU hours ordered by `(tariff, cost)`.
    pub sorted_hours: Vec<HourRecord>,
    pub original_demands: DemandTable,
    pub new_demands: DemandTable,
}

impl DetailReport {
    fn build(
        original_demands: &DemandTable,
        horizon: Horizon,
        baseline: &Baseline,
        outcome: ScenarioOutcome,
    ) -> Self {
        let original_total = original_demands.total_hourly();
        let new_total = outcome.redistribution.demands.total_hourly();
        let day_energy = baseline.energy.total_energy();
        let day_cost = baseline.energy.total_cost();

        let hourly = (0..baseline.energy.len())
            .map(|h| {
                let original_demand = round_dp(original_total[h], 3);
                let new_demand = round_dp(new_total[h], 3);
                let shifted_demand = new_demand - original_demand;
                let energy_difference = round_dp(
                    baseline.energy.energy_kwh[h] - outcome.energy.energy_kwh[h],
                    2,
                );
                let cost_difference = baseline.energy.cost[h] - outcome.energy.cost[h];

                let revenue = match (&baseline.revenue, &outcome.revenue) {
                    (Some(before), Some(after)) => {
                        let original_net = before.revenue[h] - baseline.energy.cost[h];
                        let new_net = after.revenue[h] - outcome.energy.cost[h];
                        let net_difference = new_net - original_net;
                        Some(HourlyRevenue {
                            water_tariff: after.tariff[h],
                            original_revenue: before.revenue[h],
                            new_revenue: after.revenue[h],
                            original_net,
                            new_net,
                            net_difference,
                            net_difference_pct: pct(net_difference, original_net.abs()),
                        })
                    }
                    _ => None,
                };

                HourlyRow {
                    hour: h,
                    time_s: horizon.time_s(h),
                    energy_tariff: baseline.energy.tariff[h],
                    original_demand,
                    new_demand,
                    shifted_demand,
                    shifted_demand_pct: round_dp(pct(shifted_demand, original_demand), 2),
                    original_energy_kwh: baseline.energy.energy_kwh[h],
                    new_energy_kwh: outcome.energy.energy_kwh[h],
                    energy_difference,
                    energy_difference_pct: round_dp(pct(energy_difference, day_energy), 2),
                    original_cost: baseline.energy.cost[h],
                    new_cost: outcome.energy.cost[h],
                    cost_difference,
                    cost_difference_pct: round_dp(pct(cost_difference, day_cost), 2),
                    revenue,
                }
            })
            .collect();

        Self {
            hourly,
            summary: outcome.kpi,
            response: outcome.redistribution.details,
            sorted_hours: baseline.sorted_hours(),
            original_demands: original_demands.clone(),
            new_demands: outcome.redistribution.demands,
        }
    }
}

/// Detailed analysis of one fixed setting/uptake scenario.
///
/// # Errors
///
/// Propagates baseline and scenario errors.
pub fn fixed_detail<S: HydraulicSolver>(
    runner: &ScenarioRunner<S>,
    tariff: &Tariff,
    setting: usize,
    uptake: f64,
) -> Result<DetailReport> {
    info!(tariff = %tariff.name, setting, uptake, "fixed detail analysis");
    let baseline = runner.baseline(tariff, None)?;
    let outcome = runner.run_fixed(&baseline, setting, uptake)?;
    Ok(DetailReport::build(
        runner.original_demands(),
        runner.horizon(),
        &baseline,
        outcome,
    ))
}

/// Detailed analysis of one elasticity scenario.
///
/// # Errors
///
/// Propagates baseline and scenario errors.
pub fn elasticity_detail<S: HydraulicSolver>(
    runner: &ScenarioRunner<S>,
    energy_tariff: &Tariff,
    water_tariff: &Tariff,
    elasticity: f64,
) -> Result<DetailReport> {
    info!(tariff = %energy_tariff.name, elasticity, "elasticity detail analysis");
    let baseline = runner.baseline(energy_tariff, Some(water_tariff))?;
    let outcome = runner.run_elasticity(&baseline, water_tariff, elasticity)?;
    Ok(DetailReport::build(
        runner.original_demands(),
        runner.horizon(),
        &baseline,
        outcome,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hydraulics::SupplyBalanceSolver;
    use crate::network::NetworkModel;
    use crate::tariff::build_energy_tariffs;

    fn runner() -> ScenarioRunner<SupplyBalanceSolver> {
        ScenarioRunner::new(NetworkModel::net3_isolated(), SupplyBalanceSolver, Horizon::daily())
            .unwrap()
    }

    #[test]
    fn fixed_detail_rows_cover_the_day() {
        let runner = runner();
        let tariffs = build_energy_tariffs(&runner.bau_energy().unwrap(), 4, 0, 1).unwrap();
        let tariff = tariffs.require("Symmetric").unwrap();
        let report = fixed_detail(&runner, tariff, 8, 0.5).unwrap();

        assert_eq!(report.hourly.len(), 24);
        assert_eq!(report.hourly[1].time_s, 3600);
        assert_eq!(report.sorted_hours.len(), 24);
        assert_eq!(report.summary.label, "S=8 X=0.5");
        assert!(report.hourly.iter().all(|r| r.revenue.is_none()));

        let shifted: f64 = report.hourly.iter().map(|r| r.shifted_demand).sum();
        assert!(shifted.abs() < 0.05, "net hourly shift {shifted}");
        assert_eq!(report.response.len(), report.original_demands.len());
    }

    #[test]
    fn elasticity_detail_has_revenue_rows() {
        let runner = runner();
        let tariffs = build_energy_tariffs(&runner.bau_energy().unwrap(), 4, 0, 1).unwrap();
        let tariff = tariffs.require("Symmetric").unwrap();
        let report = elasticity_detail(&runner, tariff, tariff, 0.7).unwrap();
        assert!(report.hourly.iter().all(|r| r.revenue.is_some()));
        assert!(report.summary.revenue.is_some());
        assert_ne!(report.new_demands, report.original_demands);
    }
}
