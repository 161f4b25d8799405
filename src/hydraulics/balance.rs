//! Supply-balance solver for single-zone pumped networks.

use tracing::trace;

use crate::error::{Error, Result};
use crate::network::{DemandTable, NetworkModel};
use crate::sim::types::Horizon;

use super::{HydraulicSolver, PumpSeries, SimulationResults};

/// Steady-state solver for networks whose storage is isolated.
///
/// With tanks out of service, every pump delivers its share of the total
/// network demand at each step. The head gain follows the quadratic
/// system curve `H = static_head + r * q^2`, so moving volume between
/// hours changes energy non-linearly.
#[derive(Debug, Default, Clone, Copy)]
pub struct SupplyBalanceSolver;

impl HydraulicSolver for SupplyBalanceSolver {
    fn run(
        &self,
        network: &NetworkModel,
        demands: &DemandTable,
        horizon: &Horizon,
    ) -> Result<SimulationResults> {
        if demands.steps() != horizon.steps {
            return Err(Error::Solver(format!(
                "demand table has {} steps, horizon has {}",
                demands.steps(),
                horizon.steps
            )));
        }
        if network.pumps.is_empty() {
            return Err(Error::Solver(format!(
                "network \"{}\" has no pumps",
                network.name
            )));
        }

        let totals = demands.total_hourly();
        if let Some((t, q)) = totals.iter().enumerate().find(|(_, q)| **q < 0.0) {
            return Err(Error::Solver(format!(
                "negative total demand {q} at step {t}"
            )));
        }

        let pumps = network
            .pumps
            .iter()
            .map(|pump| {
                let flow_m3s: Vec<f64> = totals.iter().map(|q| q * pump.share).collect();
                let head_gain_m = flow_m3s
                    .iter()
                    .map(|q| {
                        if *q > 0.0 {
                            pump.static_head_m + pump.resistance_s2_m5 * q * q
                        } else {
                            0.0
                        }
                    })
                    .collect();
                PumpSeries {
                    name: pump.name.clone(),
                    flow_m3s,
                    head_gain_m,
                }
            })
            .collect();

        trace!(network = %network.name, steps = horizon.steps, "supply balance solved");

        Ok(SimulationResults {
            pumps,
            efficiency_pct: network.efficiency_pct,
            horizon: *horizon,
        })
    }

    fn name(&self) -> &'static str {
        "supply-balance"
    }
}
