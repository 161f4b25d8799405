//! Hourly tariff series and the banded tariff builders.

pub mod energy;
pub mod water;

pub use energy::build_energy_tariffs;
pub use water::build_water_tariffs;

use crate::error::{Error, Result};

/// Name prefix of the shuffled energy tariffs.
pub const RANDOM_PREFIX: &str = "Random ";

/// Default number of hours in each band.
pub const DEFAULT_BAND_WIDTH: usize = 4;

/// Named per-hour price multiplier.
#[derive(Debug, Clone, PartialEq)]
pub struct Tariff {
    pub name: String,
    pub values: Vec<f64>,
}

impl Tariff {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Constant tariff of `1.0` over `steps` hours.
    pub fn flat(name: impl Into<String>, steps: usize) -> Self {
        Self::new(name, vec![1.0; steps])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Factor at `hour`.
    pub fn get(&self, hour: usize) -> f64 {
        self.values[hour]
    }

    /// Arithmetic mean of the hourly factors (0 for an empty tariff).
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            0.0
        } else {
            self.values.iter().sum::<f64>() / self.values.len() as f64
        }
    }

    /// Whether this is one of the shuffled energy tariffs.
    pub fn is_random(&self) -> bool {
        self.name.starts_with(RANDOM_PREFIX)
    }
}

/// Ordered collection of tariffs sharing one horizon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TariffSet {
    tariffs: Vec<Tariff>,
}

impl TariffSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a tariff.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] on a duplicate name or a length that
    /// differs from the tariffs already in the set.
    pub fn push(&mut self, tariff: Tariff) -> Result<()> {
        if self.get(&tariff.name).is_some() {
            return Err(Error::Validation(format!(
                "duplicate tariff \"{}\"",
                tariff.name
            )));
        }
        let expected = self.steps();
        if !self.tariffs.is_empty() && expected != tariff.len() {
            return Err(Error::Validation(format!(
                "tariff \"{}\" has {} values, expected {expected}",
                tariff.name,
                tariff.len(),
            )));
        }
        self.tariffs.push(tariff);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Tariff> {
        self.tariffs.iter().find(|t| t.name == name)
    }

    /// Like [`Self::get`], reporting the missing name as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if no tariff has that name.
    pub fn require(&self, name: &str) -> Result<&Tariff> {
        self.get(name)
            .ok_or_else(|| Error::Validation(format!("unknown tariff \"{name}\"")))
    }

    pub fn names(&self) -> Vec<&str> {
        self.tariffs.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tariff> {
        self.tariffs.iter()
    }

    pub fn len(&self) -> usize {
        self.tariffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tariffs.is_empty()
    }

    /// Number of hours per tariff (0 for an empty set).
    pub fn steps(&self) -> usize {
        self.tariffs.first().map_or(0, Tariff::len)
    }
}

impl<'a> IntoIterator for &'a TariffSet {
    type Item = &'a Tariff;
    type IntoIter = std::slice::Iter<'a, Tariff>;

    fn into_iter(self) -> Self::IntoIter {
        self.tariffs.iter()
    }
}

/// Factors assigned to the four ranked bands of a 24-hour ordering.
///
/// For an ascending ranking of hours: the first `width` hours get
/// `lowest`, the next `width` get `low`, the `width` hours just below the
/// top `width` get `high`, and the top `width` get `highest`. Every other
/// hour gets 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandLevels {
    pub lowest: f64,
    pub low: f64,
    pub high: f64,
    pub highest: f64,
}

impl BandLevels {
    /// Cheap hours discounted, expensive hours surcharged.
    pub const SYMMETRIC: Self = Self {
        lowest: 0.5,
        low: 0.75,
        high: 1.5,
        highest: 1.25,
    };

    /// Mirror image of [`Self::SYMMETRIC`].
    pub const OPPOSITE: Self = Self {
        lowest: 1.5,
        low: 1.25,
        high: 0.5,
        highest: 0.75,
    };

    /// Builds a tariff series from an ascending ranking of hour indices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the four bands do not fit in the
    /// ranking or `width` is zero.
    pub fn apply(&self, ranking: &[usize], width: usize) -> Result<Vec<f64>> {
        let n = ranking.len();
        if width == 0 || 4 * width > n {
            return Err(Error::Validation(format!(
                "band width {width} does not fit {n} hours"
            )));
        }
        let mut values = vec![1.0; n];
        for (rank, &hour) in ranking.iter().enumerate() {
            let level = if rank < width {
                self.lowest
            } else if rank < 2 * width {
                self.low
            } else if rank >= n - width {
                self.highest
            } else if rank >= n - 2 * width {
                self.high
            } else {
                1.0
            };
            values[hour] = level;
        }
        Ok(values)
    }
}
