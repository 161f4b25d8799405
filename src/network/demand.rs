//! Junction-by-hour demand table.

use crate::error::{Error, Result};

/// Hourly demands for every junction that consumes water.
///
/// Stored column-major: one series per junction, each exactly `steps`
/// long. Column order is preserved through every redistribution so that
/// exported tables line up with the network declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandTable {
    steps: usize,
    columns: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl DemandTable {
    /// Creates an empty table for a horizon of `steps` hours.
    pub fn new(steps: usize) -> Self {
        Self {
            steps,
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Appends a junction series.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the series length differs from the
    /// horizon or the junction is already present.
    pub fn push_column(&mut self, name: impl Into<String>, series: Vec<f64>) -> Result<()> {
        let name = name.into();
        if series.len() != self.steps {
            return Err(Error::Validation(format!(
                "demand series for \"{name}\" has {} values, expected {}",
                series.len(),
                self.steps
            )));
        }
        if self.columns.contains(&name) {
            return Err(Error::Validation(format!(
                "duplicate demand column \"{name}\""
            )));
        }
        self.columns.push(name);
        self.values.push(series);
        Ok(())
    }

    /// Number of hourly steps per column.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Junction names in column order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Series for column `idx`.
    pub fn series(&self, idx: usize) -> &[f64] {
        &self.values[idx]
    }

    /// Mutable series for column `idx`.
    pub fn series_mut(&mut self, idx: usize) -> &mut [f64] {
        &mut self.values[idx]
    }

    /// Series for the named junction, if present.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.values[i].as_slice())
    }

    /// Iterator over `(junction, series)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Vec::as_slice))
    }

    /// Total volume of column `idx` over the horizon.
    pub fn column_total(&self, idx: usize) -> f64 {
        self.values[idx].iter().sum()
    }

    /// Network-wide demand at each hour.
    pub fn total_hourly(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.steps];
        for series in &self.values {
            for (total, v) in totals.iter_mut().zip(series) {
                *total += v;
            }
        }
        totals
    }

    /// Sum over all junctions and hours.
    pub fn grand_total(&self) -> f64 {
        self.values.iter().flatten().sum()
    }

    /// Removes junctions whose series sums to zero.
    pub fn drop_zero_columns(&mut self) {
        let columns = std::mem::take(&mut self.columns);
        let values = std::mem::take(&mut self.values);
        for (name, series) in columns.into_iter().zip(values) {
            if series.iter().sum::<f64>() != 0.0 {
                self.columns.push(name);
                self.values.push(series);
            }
        }
    }
}
