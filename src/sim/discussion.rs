//! Statistics across a finished sweep.
//!
//! Every statistic is returned as a [`SweepTable`] so it can be exported
//! with the same writer as the sweep itself.

use std::fmt;
use std::ops::Add;

use crate::tariff::RANDOM_PREFIX;

use super::sweep::{ElasticitySweepReport, FixedSweepReport, SweepTable};
use super::types::round_dp;

/// Number of improving, neutral and worsening scenarios.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignCounts {
    pub positive: usize,
    pub zero: usize,
    pub negative: usize,
}

impl SignCounts {
    pub fn from_table(table: &SweepTable) -> Self {
        table.cells().fold(Self::default(), |mut acc, v| {
            if v > 0.0 {
                acc.positive += 1;
            } else if v == 0.0 {
                acc.zero += 1;
            } else {
                acc.negative += 1;
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.positive + self.zero + self.negative
    }
}

impl Add for SignCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            positive: self.positive + rhs.positive,
            zero: self.zero + rhs.zero,
            negative: self.negative + rhs.negative,
        }
    }
}

impl fmt::Display for SignCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cost saving {}, no difference {}, cost increase {}",
            self.positive, self.zero, self.negative
        )
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Sample standard deviation (n - 1); 0 for fewer than two values.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

fn single_column(title: &str, rows: Vec<String>, values: &[f64]) -> SweepTable {
    let mut table = SweepTable::new(title, rows, vec!["mean".to_string()]);
    for (row, &v) in values.iter().enumerate() {
        table.set(row, 0, v);
    }
    table
}

/// Mean over tariffs of each row, then over the selected rows (2 dp).
fn mean_of_rows(table: &SweepTable, rows: impl Iterator<Item = usize>) -> f64 {
    let row_means: Vec<f64> = rows.map(|r| mean(table.row(r))).collect();
    round_dp(mean(&row_means), 2)
}

/// Mean of each row across all tariff columns (2 dp).
pub fn row_means(table: &SweepTable) -> SweepTable {
    let values: Vec<f64> = (0..table.rows().len())
        .map(|r| round_dp(mean(table.row(r)), 2))
        .collect();
    single_column(&table.title, table.rows().to_vec(), &values)
}

/// Cost savings averaged per setting over every tariff and uptake.
pub fn mean_by_setting(report: &FixedSweepReport) -> SweepTable {
    let n_x = report.uptakes.len();
    let values: Vec<f64> = (0..report.settings.len())
        .map(|si| {
            let rows = (0..n_x).map(|xi| report.row_index(si, xi));
            mean_of_rows(&report.cost_savings_pct, rows)
        })
        .collect();
    let rows = report.settings.iter().map(|s| format!("S={s}")).collect();
    single_column("Mean Cost Savings by Setting", rows, &values)
}

/// Cost savings averaged per uptake over every tariff and setting.
pub fn mean_by_uptake(report: &FixedSweepReport) -> SweepTable {
    let n_s = report.settings.len();
    let values: Vec<f64> = (0..report.uptakes.len())
        .map(|xi| {
            let rows = (0..n_s).map(|si| report.row_index(si, xi));
            mean_of_rows(&report.cost_savings_pct, rows)
        })
        .collect();
    let rows = report.uptakes.iter().map(|x| format!("X={x}")).collect();
    single_column("Mean Cost Savings by Uptake", rows, &values)
}

/// Per-tariff maxima of the given tables, one column per table (2 dp).
pub fn maxima(tables: &[(&str, &SweepTable)]) -> SweepTable {
    let rows = tables
        .first()
        .map(|(_, t)| t.columns().to_vec())
        .unwrap_or_default();
    let columns = tables.iter().map(|(name, _)| name.to_string()).collect();
    let mut out = SweepTable::new("Maxima", rows, columns);
    for (col, (_, table)) in tables.iter().enumerate() {
        for tariff in 0..table.columns().len() {
            let max = table
                .column(tariff)
                .into_iter()
                .fold(f64::NEG_INFINITY, f64::max);
            out.set(tariff, col, round_dp(max, 2));
        }
    }
    out
}

/// Mean and sample standard deviation across the `Random *` columns of
/// each row, with the `mean ± std` band. `None` without random columns.
pub fn random_band(table: &SweepTable) -> Option<SweepTable> {
    let random: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.starts_with(RANDOM_PREFIX))
        .map(|(i, _)| i)
        .collect();
    if random.is_empty() {
        return None;
    }
    let columns = ["mean", "std", "lower", "upper"].map(str::to_string).to_vec();
    let mut out = SweepTable::new(
        format!("{} Random Band", table.title),
        table.rows().to_vec(),
        columns,
    );
    for row in 0..table.rows().len() {
        let values: Vec<f64> = random.iter().map(|&c| table.get(row, c)).collect();
        let m = mean(&values);
        let s = sample_std(&values);
        out.set(row, 0, round_dp(m, 2));
        out.set(row, 1, round_dp(s, 2));
        out.set(row, 2, round_dp(m - s, 2));
        out.set(row, 3, round_dp(m + s, 2));
    }
    Some(out)
}

/// Statistics of a fixed sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedDiscussion {
    pub by_setting: SweepTable,
    pub by_uptake: SweepTable,
    pub maxima: SweepTable,
    pub signs: SignCounts,
    pub random_band: Option<SweepTable>,
}

impl FixedDiscussion {
    pub fn from_report(report: &FixedSweepReport) -> Self {
        Self {
            by_setting: mean_by_setting(report),
            by_uptake: mean_by_uptake(report),
            maxima: maxima(&[
                ("max cost savings", &report.cost_savings_pct),
                ("max demand shifted", &report.demand_shifted_pct),
            ]),
            signs: SignCounts::from_table(&report.cost_savings_pct),
            random_band: random_band(&report.cost_savings_pct),
        }
    }
}

/// Statistics of an elasticity sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct ElasticityDiscussion {
    pub by_elasticity: SweepTable,
    pub maxima: SweepTable,
    pub signs: SignCounts,
    pub random_band: Option<SweepTable>,
}

impl ElasticityDiscussion {
    pub fn from_report(report: &ElasticitySweepReport) -> Self {
        Self {
            by_elasticity: row_means(&report.cost_savings_pct),
            maxima: maxima(&[
                ("max cost savings", &report.cost_savings_pct),
                ("max demand shifted", &report.demand_shifted_pct),
                ("max net increase", &report.net_increase_pct),
            ]),
            signs: SignCounts::from_table(&report.cost_savings_pct),
            random_band: random_band(&report.cost_savings_pct),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&str], cols: &[&str], values: &[&[f64]]) -> SweepTable {
        let mut t = SweepTable::new(
            "Cost Savings Percentage",
            rows.iter().map(|s| s.to_string()).collect(),
            cols.iter().map(|s| s.to_string()).collect(),
        );
        for (r, row) in values.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                t.set(r, c, v);
            }
        }
        t
    }

    fn report() -> FixedSweepReport {
        let rows = ["S=1 X=0.5", "S=1 X=1", "S=2 X=0.5", "S=2 X=1"];
        let cols = ["Flat", "Random 1", "Random 2"];
        let cost = table(
            &rows,
            &cols,
            &[&[1.0, 2.0, 3.0], &[3.0, 4.0, 5.0], &[0.0, -1.0, 1.0], &[6.0, 6.0, 6.0]],
        );
        let zeros = table(&rows, &cols, &[&[0.0; 3], &[0.0; 3], &[0.0; 3], &[0.0; 3]]);
        FixedSweepReport {
            settings: vec![1, 2],
            uptakes: vec![0.5, 1.0],
            energy_change_pct: zeros.clone(),
            cost_savings_pct: cost,
            total_demand_difference: zeros.clone(),
            demand_shifted_pct: zeros,
        }
    }

    #[test]
    fn means_by_setting_and_uptake() {
        let r = report();
        let s = mean_by_setting(&r);
        // S=1: row means 2 and 4; S=2: 0 and 6
        assert_eq!(s.column(0), vec![3.0, 3.0]);
        assert_eq!(s.rows(), &["S=1".to_string(), "S=2".to_string()]);
        let x = mean_by_uptake(&r);
        // X=0.5: 2 and 0; X=1: 4 and 6
        assert_eq!(x.column(0), vec![1.0, 5.0]);
    }

    #[test]
    fn sign_counts_cover_every_cell() {
        let d = FixedDiscussion::from_report(&report());
        assert_eq!(d.signs, SignCounts { positive: 10, zero: 1, negative: 1 });
        assert_eq!(d.signs.total(), 12);
        let sum = d.signs + d.signs;
        assert_eq!(sum.positive, 20);
    }

    #[test]
    fn maxima_per_tariff() {
        let d = FixedDiscussion::from_report(&report());
        assert_eq!(d.maxima.rows().len(), 3);
        assert_eq!(d.maxima.column(0), vec![6.0, 6.0, 6.0]);
        assert_eq!(d.maxima.column(1), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn random_band_uses_sample_std() {
        let band = random_band(&report().cost_savings_pct).unwrap();
        // Row 0: randoms 2, 3 -> mean 2.5, std sqrt(0.5)
        assert_eq!(band.get(0, 0), 2.5);
        assert!((band.get(0, 1) - 0.71).abs() < 1e-12);
        assert_eq!(band.get(3, 1), 0.0);
        let flat_only = table(&["a"], &["Flat"], &[&[1.0]]);
        assert!(random_band(&flat_only).is_none());
    }

    #[test]
    fn row_means_rounded() {
        let t = table(&["E=0.05"], &["a", "b", "c"], &[&[1.0, 1.0, 2.0]]);
        assert_eq!(row_means(&t).get(0, 0), 1.33);
    }
}
