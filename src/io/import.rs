//! CSV import of tariff sets and demand tables.
//!
//! Both readers expect the layout written by [`super::export`]: a leading
//! `hour` column followed by one numeric column per tariff or junction.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Error, Result};
use crate::network::DemandTable;
use crate::tariff::{Tariff, TariffSet};

/// Parses the wide `hour,<name>,<name>...` layout into named columns.
fn read_columns(reader: impl Read) -> Result<Vec<(String, Vec<f64>)>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut columns: Vec<(String, Vec<f64>)> = headers
        .iter()
        .skip(1)
        .map(|name| (name.trim().to_string(), Vec::new()))
        .collect();

    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        for (idx, (name, values)) in columns.iter_mut().enumerate() {
            let raw = record.get(idx + 1).unwrap_or("").trim();
            let value = raw.parse::<f64>().map_err(|_| {
                Error::Validation(format!(
                    "row {}: column \"{name}\" has non-numeric value \"{raw}\"",
                    line + 1
                ))
            })?;
            values.push(value);
        }
    }
    Ok(columns)
}

/// Reads a tariff set with one column per tariff.
///
/// # Errors
///
/// Returns an error on malformed CSV, non-numeric cells or duplicate
/// tariff names.
pub fn read_tariff_set(reader: impl Read) -> Result<TariffSet> {
    let mut set = TariffSet::new();
    for (name, values) in read_columns(reader)? {
        set.push(Tariff::new(name, values))?;
    }
    Ok(set)
}

/// # Errors
///
/// Returns an error if the file cannot be opened or parsed.
pub fn load_tariff_set(path: &Path) -> Result<TariffSet> {
    read_tariff_set(BufReader::new(File::open(path)?))
}

/// Reads a demand table with one column per junction.
///
/// # Errors
///
/// Returns an error on malformed CSV, non-numeric cells or duplicate
/// junction names.
pub fn read_demand_table(reader: impl Read) -> Result<DemandTable> {
    let columns = read_columns(reader)?;
    let steps = columns.first().map_or(0, |(_, v)| v.len());
    let mut table = DemandTable::new(steps);
    for (name, values) in columns {
        table.push_column(name, values)?;
    }
    Ok(table)
}

/// # Errors
///
/// Returns an error if the file cannot be opened or parsed.
pub fn load_demand_table(path: &Path) -> Result<DemandTable> {
    read_demand_table(BufReader::new(File::open(path)?))
}
