//! Energy tariff scenarios derived from the BAU pump energy profile.

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use tracing::debug;

use crate::error::Result;
use crate::sim::types::round_dp;

use super::{BandLevels, RANDOM_PREFIX, Tariff, TariffSet};

/// Hour indices ordered by ascending energy (rounded to 2 decimals).
///
/// Ties keep chronological order.
pub fn rank_by_energy(energy_kwh: &[f64]) -> Vec<usize> {
    let mut hours: Vec<usize> = (0..energy_kwh.len()).collect();
    hours.sort_by(|&a, &b| round_dp(energy_kwh[a], 2).total_cmp(&round_dp(energy_kwh[b], 2)));
    hours
}

/// Builds the energy tariff scenarios.
///
/// The set contains, in order: `Flat`, `Symmetric` (cheap when pumping is
/// light), `Opposite` (its mirror), and `random_count` tariffs
/// `Random 1..=N`. Each random tariff is the previous one shuffled again,
/// starting from `Opposite`, so all of them keep the same mean.
///
/// # Errors
///
/// Returns an error if the bands do not fit the horizon.
pub fn build_energy_tariffs(
    energy_kwh: &[f64],
    band_width: usize,
    random_count: usize,
    seed: u64,
) -> Result<TariffSet> {
    let ranking = rank_by_energy(energy_kwh);
    let steps = energy_kwh.len();

    let mut set = TariffSet::new();
    set.push(Tariff::flat("Flat", steps))?;
    set.push(Tariff::new(
        "Symmetric",
        BandLevels::SYMMETRIC.apply(&ranking, band_width)?,
    ))?;
    let opposite = BandLevels::OPPOSITE.apply(&ranking, band_width)?;
    set.push(Tariff::new("Opposite", opposite.clone()))?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut shuffled = opposite;
    for i in 1..=random_count {
        shuffled.shuffle(&mut rng);
        set.push(Tariff::new(format!("{RANDOM_PREFIX}{i}"), shuffled.clone()))?;
    }

    debug!(tariffs = set.len(), seed, "built energy tariffs");
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Vec<f64> {
        (0..24).map(|t| 10.0 + ((t * 7) % 24) as f64).collect()
    }

    #[test]
    fn ranking_is_ascending_and_stable() {
        let r = rank_by_energy(&[3.0, 1.0, 2.0, 1.0]);
        assert_eq!(r, vec![1, 3, 2, 0]);
    }

    #[test]
    fn symmetric_discounts_lightest_hours() {
        let energy = profile();
        let set = build_energy_tariffs(&energy, 4, 0, 1).unwrap();
        let sym = set.get("Symmetric").unwrap().values.clone();
        let ranking = rank_by_energy(&energy);
        for &h in &ranking[..4] {
            assert_eq!(sym[h], 0.5);
        }
        for &h in &ranking[20..] {
            assert_eq!(sym[h], 1.25);
        }
        let opp = set.get("Opposite").unwrap().values.clone();
        for &h in &ranking[..4] {
            assert_eq!(opp[h], 1.5);
        }
    }

    #[test]
    fn set_order_and_count() {
        let set = build_energy_tariffs(&profile(), 4, 3, 7).unwrap();
        assert_eq!(
            set.names(),
            vec!["Flat", "Symmetric", "Opposite", "Random 1", "Random 2", "Random 3"]
        );
    }

    #[test]
    fn every_tariff_has_unit_mean() {
        let set = build_energy_tariffs(&profile(), 4, 10, 42).unwrap();
        for t in &set {
            assert!((t.mean() - 1.0).abs() < 1e-12, "{} mean {}", t.name, t.mean());
        }
    }

    #[test]
    fn random_tariffs_are_permutations_of_opposite() {
        let set = build_energy_tariffs(&profile(), 4, 5, 42).unwrap();
        let mut opp = set.get("Opposite").unwrap().values.clone();
        opp.sort_by(f64::total_cmp);
        for t in set.iter().filter(|t| t.is_random()) {
            let mut v = t.values.clone();
            v.sort_by(f64::total_cmp);
            assert_eq!(v, opp);
        }
    }

    #[test]
    fn same_seed_same_tariffs() {
        let a = build_energy_tariffs(&profile(), 4, 5, 99).unwrap();
        let b = build_energy_tariffs(&profile(), 4, 5, 99).unwrap();
        assert_eq!(a, b);
    }
}
