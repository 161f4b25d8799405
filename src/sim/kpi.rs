//! Scenario KPIs comparing a redistributed run against its baseline.

use std::fmt;

use serde::Serialize;

use crate::response::Redistribution;

use super::metrics::{EnergyCostTable, RevenueTable};
use super::types::{pct, round_dp};

/// Revenue-side indicators, present for elasticity scenarios only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueKpi {
    pub original_revenue: f64,
    pub new_revenue: f64,
    /// Revenue minus energy cost, baseline.
    pub original_net: f64,
    /// Revenue minus energy cost, scenario.
    pub new_net: f64,
    /// `(new - orig) * 100 / orig` on revenue.
    pub revenue_increase_pct: f64,
    /// `(new - orig) * 100 / |orig|` on net.
    pub net_increase_pct: f64,
}

/// Key indicators of one demand-response scenario.
///
/// Percentages are rounded to 2 decimals; a zero baseline yields 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioKpi {
    /// Scenario label, e.g. `S=8 X=0.5` or `E=0.7`.
    pub label: String,
    pub original_energy_kwh: f64,
    pub new_energy_kwh: f64,
    pub original_cost: f64,
    pub new_cost: f64,
    /// Volume moved by the redistribution, summed over junctions.
    pub total_shifted: f64,
    /// Positive when pumping grows.
    pub energy_change_pct: f64,
    /// Positive when the energy bill shrinks.
    pub cost_savings_pct: f64,
    /// `sum(before) - sum(after)` over junctions, 4 dp. Zero up to float
    /// noise for a conserving policy.
    pub total_demand_difference: f64,
    pub demand_shifted_pct: f64,
    pub revenue: Option<RevenueKpi>,
}

impl ScenarioKpi {
    /// Computes the energy and demand indicators of a scenario.
    ///
    /// # Arguments
    ///
    /// * `label` - Scenario label
    /// * `original` - Baseline energy/cost table
    /// * `new` - Energy/cost table after redistribution
    /// * `redistribution` - Output of the demand-response policy
    pub fn from_tables(
        label: impl Into<String>,
        original: &EnergyCostTable,
        new: &EnergyCostTable,
        redistribution: &Redistribution,
    ) -> Self {
        let original_energy = original.total_energy();
        let new_energy = new.total_energy();
        let original_cost = original.total_cost();
        let new_cost = new.total_cost();
        let before = redistribution.total_before();
        let after = redistribution.total_after();
        let shifted = redistribution.total_shifted();

        Self {
            label: label.into(),
            original_energy_kwh: original_energy,
            new_energy_kwh: new_energy,
            original_cost,
            new_cost,
            total_shifted: shifted,
            energy_change_pct: round_dp(pct(new_energy - original_energy, original_energy), 2),
            cost_savings_pct: round_dp(pct(original_cost - new_cost, original_cost), 2),
            total_demand_difference: round_dp(before - after, 4),
            demand_shifted_pct: round_dp(pct(shifted, before), 2),
            revenue: None,
        }
    }

    /// Adds the revenue and net indicators using this KPI's energy costs.
    pub fn with_revenue(mut self, original: &RevenueTable, new: &RevenueTable) -> Self {
        let original_revenue = original.total_revenue();
        let new_revenue = new.total_revenue();
        let original_net = original_revenue - self.original_cost;
        let new_net = new_revenue - self.new_cost;
        self.revenue = Some(RevenueKpi {
            original_revenue,
            new_revenue,
            original_net,
            new_net,
            revenue_increase_pct: round_dp(
                pct(new_revenue - original_revenue, original_revenue),
                2,
            ),
            net_increase_pct: round_dp(pct(new_net - original_net, original_net.abs()), 2),
        });
        self
    }

    pub fn revenue_increase_pct(&self) -> Option<f64> {
        self.revenue.as_ref().map(|r| r.revenue_increase_pct)
    }

    pub fn net_increase_pct(&self) -> Option<f64> {
        self.revenue.as_ref().map(|r| r.net_increase_pct)
    }
}

impl fmt::Display for ScenarioKpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ({}) ---", self.label)?;
        writeln!(
            f,
            "Energy:                {:.2} -> {:.2} kWh ({:+.2}%)",
            self.original_energy_kwh, self.new_energy_kwh, self.energy_change_pct
        )?;
        writeln!(
            f,
            "Energy cost:           {:.2} -> {:.2} ({:.2}% saved)",
            self.original_cost, self.new_cost, self.cost_savings_pct
        )?;
        if let Some(r) = &self.revenue {
            writeln!(
                f,
                "Revenue:               {:.2} -> {:.2} ({:+.2}%)",
                r.original_revenue, r.new_revenue, r.revenue_increase_pct
            )?;
            writeln!(
                f,
                "Net:                   {:.2} -> {:.2} ({:+.2}%)",
                r.original_net, r.new_net, r.net_increase_pct
            )?;
        }
        writeln!(
            f,
            "Demand shifted:        {:.3} ({:.2}%)",
            self.total_shifted, self.demand_shifted_pct
        )?;
        write!(f, "Demand difference:     {:.4}", self.total_demand_difference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::DemandTable;
    use crate::response::ResponseDetail;
    use crate::tariff::Tariff;

    fn redistribution() -> Redistribution {
        let mut demands = DemandTable::new(2);
        demands.push_column("j", vec![1.5, 2.5]).unwrap();
        Redistribution {
            demands,
            details: vec![ResponseDetail::new("j", 1.0, 4.0, 4.0)],
        }
    }

    fn tables() -> (EnergyCostTable, EnergyCostTable) {
        let tariff = Tariff::new("t", vec![0.5, 1.5]);
        let original = EnergyCostTable::from_energy(&[10.0, 30.0], &tariff);
        let new = EnergyCostTable::from_energy(&[20.0, 18.0], &tariff);
        (original.unwrap(), new.unwrap())
    }

    #[test]
    fn energy_and_cost_percentages() {
        let (original, new) = tables();
        let kpi = ScenarioKpi::from_tables("S=1 X=0.5", &original, &new, &redistribution());
        // energy 40 -> 38, cost 50 -> 37
        assert_eq!(kpi.energy_change_pct, -5.0);
        assert_eq!(kpi.cost_savings_pct, 26.0);
        assert_eq!(kpi.demand_shifted_pct, 25.0);
        assert_eq!(kpi.total_demand_difference, 0.0);
        assert_eq!(kpi.revenue_increase_pct(), None);
    }

    #[test]
    fn zero_baseline_yields_zero() {
        let tariff = Tariff::flat("Flat", 2);
        let zero = EnergyCostTable::from_energy(&[0.0, 0.0], &tariff).unwrap();
        let kpi = ScenarioKpi::from_tables("x", &zero, &zero, &redistribution());
        assert_eq!(kpi.energy_change_pct, 0.0);
        assert_eq!(kpi.cost_savings_pct, 0.0);
    }

    #[test]
    fn net_uses_absolute_baseline() {
        let (original, new) = tables();
        let water = Tariff::new("w", vec![1.0, 1.0]);
        let mut before = DemandTable::new(2);
        before.push_column("j", vec![10.0, 10.0]).unwrap();
        let mut after = DemandTable::new(2);
        after.push_column("j", vec![12.0, 10.0]).unwrap();
        let rev0 = RevenueTable::new(&before, &water).unwrap();
        let rev1 = RevenueTable::new(&after, &water).unwrap();

        let kpi = ScenarioKpi::from_tables("E=0.5", &original, &new, &redistribution())
            .with_revenue(&rev0, &rev1);
        // revenue 20 -> 22, net -30 -> -15
        assert_eq!(kpi.revenue_increase_pct(), Some(10.0));
        assert_eq!(kpi.net_increase_pct(), Some(50.0));
    }

    #[test]
    fn display_lists_revenue_only_when_present() {
        let (original, new) = tables();
        let kpi = ScenarioKpi::from_tables("S=1 X=0.5", &original, &new, &redistribution());
        let text = kpi.to_string();
        assert!(text.starts_with("--- KPI Report (S=1 X=0.5) ---"));
        assert!(!text.contains("Revenue"));
    }
}
