//! CSV export for tariffs, demand tables, sweep results and detailed
//! scenario reports.
//!
//! Every writer takes any `impl Write` and formats numbers with a fixed
//! number of decimals, so identical inputs produce byte-identical files.
//! The `export_*` variants write to a path through a buffered file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::network::DemandTable;
use crate::response::{HourRecord, ResponseDetail};
use crate::sim::detail::{DetailReport, HourlyRow};
use crate::sim::discussion::{ElasticityDiscussion, FixedDiscussion, SignCounts};
use crate::sim::kpi::ScenarioKpi;
use crate::sim::sweep::{ElasticitySweepReport, FixedSweepReport, SweepTable};
use crate::tariff::TariffSet;

fn f2(v: f64) -> String {
    format!("{v:.2}")
}

fn f3(v: f64) -> String {
    format!("{v:.3}")
}

fn f4(v: f64) -> String {
    format!("{v:.4}")
}

fn f6(v: f64) -> String {
    format!("{v:.6}")
}

/// Lower-case file stem from a table title, e.g. `cost_savings_percentage`.
pub fn file_stem(title: &str) -> String {
    title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Creates `path` and hands a buffered writer to `write`.
fn to_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(BufWriter<File>) -> Result<()>,
{
    let file = File::create(path)?;
    write(BufWriter::new(file))?;
    debug!(path = %path.display(), "wrote output file");
    Ok(())
}

/// Writes a sweep table: one row per scenario, one column per tariff.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_sweep_table(table: &SweepTable, writer: impl Write) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["scenario".to_string()];
    header.extend(table.columns().iter().cloned());
    wtr.write_record(&header)?;
    for (idx, label) in table.rows().iter().enumerate() {
        let mut record = vec![label.clone()];
        record.extend(table.row(idx).iter().map(|&v| f4(v)));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn export_sweep_table(table: &SweepTable, path: &Path) -> Result<()> {
    to_file(path, |w| write_sweep_table(table, w))
}

/// Writes a tariff set: an `hour` column plus one column per tariff.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_tariff_set(tariffs: &TariffSet, writer: impl Write) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["hour".to_string()];
    header.extend(tariffs.names().into_iter().map(str::to_string));
    wtr.write_record(&header)?;
    for hour in 0..tariffs.steps() {
        let mut record = vec![hour.to_string()];
        record.extend(tariffs.iter().map(|t| f4(t.get(hour))));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn export_tariff_set(tariffs: &TariffSet, path: &Path) -> Result<()> {
    to_file(path, |w| write_tariff_set(tariffs, w))
}

/// Writes a demand table: an `hour` column plus one column per junction.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_demand_table(demands: &DemandTable, writer: impl Write) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["hour".to_string()];
    header.extend(demands.columns().iter().cloned());
    wtr.write_record(&header)?;
    for hour in 0..demands.steps() {
        let mut record = vec![hour.to_string()];
        record.extend((0..demands.len()).map(|c| f6(demands.series(c)[hour])));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn export_demand_table(demands: &DemandTable, path: &Path) -> Result<()> {
    to_file(path, |w| write_demand_table(demands, w))
}

/// Writes hourly detail rows. Revenue columns are included when the first
/// row carries revenue.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_hourly_rows(rows: &[HourlyRow], writer: impl Write) -> Result<()> {
    let with_revenue = rows.first().is_some_and(|r| r.revenue.is_some());
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![
        "hour",
        "time_s",
        "energy_tariff",
        "original_demand",
        "new_demand",
        "shifted_demand",
        "shifted_demand_pct",
        "original_energy_kwh",
        "new_energy_kwh",
        "energy_difference",
        "energy_difference_pct",
        "original_cost",
        "new_cost",
        "cost_difference",
        "cost_difference_pct",
    ];
    if with_revenue {
        header.extend([
            "water_tariff",
            "original_revenue",
            "new_revenue",
            "original_net",
            "new_net",
            "net_difference",
            "net_difference_pct",
        ]);
    }
    wtr.write_record(&header)?;

    for r in rows {
        let mut record = vec![
            r.hour.to_string(),
            r.time_s.to_string(),
            f2(r.energy_tariff),
            f3(r.original_demand),
            f3(r.new_demand),
            f3(r.shifted_demand),
            f2(r.shifted_demand_pct),
            f2(r.original_energy_kwh),
            f2(r.new_energy_kwh),
            f2(r.energy_difference),
            f2(r.energy_difference_pct),
            f2(r.original_cost),
            f2(r.new_cost),
            f2(r.cost_difference),
            f2(r.cost_difference_pct),
        ];
        if with_revenue {
            match &r.revenue {
                Some(rev) => record.extend([
                    f2(rev.water_tariff),
                    f4(rev.original_revenue),
                    f4(rev.new_revenue),
                    f4(rev.original_net),
                    f4(rev.new_net),
                    f4(rev.net_difference),
                    f2(rev.net_difference_pct),
                ]),
                None => record.extend(std::iter::repeat_n(String::new(), 7)),
            }
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes per-junction response details.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_response_details(details: &[ResponseDetail], writer: impl Write) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "junction",
        "demand_before",
        "shifted_demand",
        "shifted_pct",
        "demand_after",
    ])?;
    for d in details {
        wtr.write_record(&[
            d.junction.clone(),
            f6(d.before),
            f3(d.shifted),
            f2(d.shifted_pct),
            f6(d.after),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes BAU hours in `(tariff, cost)` order.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_sorted_hours(hours: &[HourRecord], writer: impl Write) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["rank", "hour", "energy_kwh", "tariff", "cost"])?;
    for (rank, h) in hours.iter().enumerate() {
        wtr.write_record(&[
            rank.to_string(),
            h.hour.to_string(),
            f2(h.energy_kwh),
            f2(h.tariff),
            f2(h.cost),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes a scenario summary as `metric,value` pairs.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_summary(kpi: &ScenarioKpi, writer: impl Write) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["metric", "value"])?;
    let mut rows = vec![
        ("scenario", kpi.label.clone()),
        ("original_energy_kwh", f2(kpi.original_energy_kwh)),
        ("new_energy_kwh", f2(kpi.new_energy_kwh)),
        ("energy_change_pct", f2(kpi.energy_change_pct)),
        ("original_cost", f2(kpi.original_cost)),
        ("new_cost", f2(kpi.new_cost)),
        ("cost_savings_pct", f2(kpi.cost_savings_pct)),
    ];
    if let Some(r) = &kpi.revenue {
        rows.extend([
            ("original_revenue", f4(r.original_revenue)),
            ("new_revenue", f4(r.new_revenue)),
            ("revenue_increase_pct", f2(r.revenue_increase_pct)),
            ("original_net", f4(r.original_net)),
            ("new_net", f4(r.new_net)),
            ("net_increase_pct", f2(r.net_increase_pct)),
        ]);
    }
    rows.extend([
        ("total_shifted", f3(kpi.total_shifted)),
        ("demand_shifted_pct", f2(kpi.demand_shifted_pct)),
        ("total_demand_difference", f4(kpi.total_demand_difference)),
    ]);
    for (metric, value) in rows {
        wtr.write_record([metric, value.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes a scenario summary as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_summary_json(kpi: &ScenarioKpi, mut writer: impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, kpi)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes labelled sign counts.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_sign_counts(counts: &[(&str, SignCounts)], writer: impl Write) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["sweep", "positive", "zero", "negative"])?;
    for (name, c) in counts {
        wtr.write_record(&[
            name.to_string(),
            c.positive.to_string(),
            c.zero.to_string(),
            c.negative.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the four fixed sweep tables into `dir` as `fixed_<table>.csv`.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be written.
pub fn export_fixed_sweep(report: &FixedSweepReport, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    for table in report.tables() {
        let path = dir.join(format!("fixed_{}.csv", file_stem(&table.title)));
        export_sweep_table(table, &path)?;
    }
    Ok(())
}

/// Writes the six elasticity sweep tables into `dir` as
/// `<prefix>_<table>.csv`, e.g. `elasticity_cost_savings_percentage.csv`.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be written.
pub fn export_elasticity_sweep(
    report: &ElasticitySweepReport,
    dir: &Path,
    prefix: &str,
) -> Result<()> {
    fs::create_dir_all(dir)?;
    for table in report.tables() {
        let path = dir.join(format!("{prefix}_{}.csv", file_stem(&table.title)));
        export_sweep_table(table, &path)?;
    }
    Ok(())
}

/// Writes a detailed scenario as `<prefix>_*.csv` files into `dir`.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be written.
pub fn export_detail(report: &DetailReport, dir: &Path, prefix: &str) -> Result<()> {
    fs::create_dir_all(dir)?;
    let path = |name: &str| dir.join(format!("{prefix}_{name}.csv"));
    to_file(&path("hourly"), |w| write_hourly_rows(&report.hourly, w))?;
    to_file(&path("summary"), |w| write_summary(&report.summary, w))?;
    let json = dir.join(format!("{prefix}_summary.json"));
    to_file(&json, |w| write_summary_json(&report.summary, w))?;
    to_file(&path("response"), |w| write_response_details(&report.response, w))?;
    to_file(&path("sorted_hours"), |w| write_sorted_hours(&report.sorted_hours, w))?;
    export_demand_table(&report.original_demands, &path("original_demands"))?;
    export_demand_table(&report.new_demands, &path("new_demands"))?;
    Ok(())
}

/// Writes fixed-sweep statistics as `discussion_fixed_*.csv` into `dir`.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be written.
pub fn export_fixed_discussion(discussion: &FixedDiscussion, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let path = |name: &str| dir.join(format!("discussion_fixed_{name}.csv"));
    export_sweep_table(&discussion.by_setting, &path("by_setting"))?;
    export_sweep_table(&discussion.by_uptake, &path("by_uptake"))?;
    export_sweep_table(&discussion.maxima, &path("maxima"))?;
    if let Some(band) = &discussion.random_band {
        export_sweep_table(band, &path("random_band"))?;
    }
    Ok(())
}

/// Writes elasticity-sweep statistics as `discussion_<prefix>_*.csv`
/// into `dir`.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be written.
pub fn export_elasticity_discussion(
    discussion: &ElasticityDiscussion,
    dir: &Path,
    prefix: &str,
) -> Result<()> {
    fs::create_dir_all(dir)?;
    let path = |name: &str| dir.join(format!("discussion_{prefix}_{name}.csv"));
    export_sweep_table(&discussion.by_elasticity, &path("by_elasticity"))?;
    export_sweep_table(&discussion.maxima, &path("maxima"))?;
    if let Some(band) = &discussion.random_band {
        export_sweep_table(band, &path("random_band"))?;
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn export_sign_counts(counts: &[(&str, SignCounts)], path: &Path) -> Result<()> {
    to_file(path, |w| write_sign_counts(counts, w))
}
