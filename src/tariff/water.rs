//! Water tariffs that pass the utility's energy cost ranking to consumers.

use tracing::debug;

use crate::error::Result;
use crate::response::sort_hours;
use crate::sim::metrics::EnergyCostTable;

use super::{BandLevels, Tariff, TariffSet};

/// Builds one water tariff per energy tariff.
///
/// For each energy tariff the BAU hours are ranked by `(tariff, cost)` and
/// the [`BandLevels::SYMMETRIC`] factors are applied to that ranking, so
/// water is cheapest when pumping it is cheapest. Each water tariff keeps
/// the name of the energy tariff it was derived from.
///
/// # Errors
///
/// Returns an error if an energy tariff does not match the BAU horizon or
/// the bands do not fit.
pub fn build_water_tariffs(
    bau_energy_kwh: &[f64],
    energy_tariffs: &TariffSet,
    band_width: usize,
) -> Result<TariffSet> {
    let mut set = TariffSet::new();
    for tariff in energy_tariffs {
        let table = EnergyCostTable::from_energy(bau_energy_kwh, tariff)?;
        let ranking: Vec<usize> = sort_hours(&table.records())
            .iter()
            .map(|r| r.hour)
            .collect();
        let values = BandLevels::SYMMETRIC.apply(&ranking, band_width)?;
        set.push(Tariff::new(tariff.name.clone(), values))?;
    }
    debug!(tariffs = set.len(), "built water tariffs");
    Ok(set)
}
