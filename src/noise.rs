// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Noise model (§4.H): atmospheric, galactic, and man-made components,
//! each a decile triple in dBW/Hz, combined in power and scaled to the
//! receiver bandwidth in use.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::coeff::{CoeffStore, FixedMapKind};
use crate::decile::TripleValue;
use crate::fourier::{self, MapPoint};

/// Categorical man-made noise environment (§4.H), with tabulated levels at
/// 3 MHz from CCIR Report 258.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NoiseEnvironment {
    Remote,
    Quiet,
    Rural,
    Residential,
    Urban,
    Noisy,
}

impl Default for NoiseEnvironment {
    fn default() -> Self {
        NoiseEnvironment::Rural
    }
}

impl NoiseEnvironment {
    /// Man-made noise median, dBW/Hz, at the 3 MHz reference frequency.
    fn reference_level_dbw_hz(self) -> f64 {
        match self {
            NoiseEnvironment::Remote => -177.0,
            NoiseEnvironment::Quiet => -170.0,
            NoiseEnvironment::Rural => -164.0,
            NoiseEnvironment::Residential => -157.0,
            NoiseEnvironment::Urban => -150.0,
            NoiseEnvironment::Noisy => -140.0,
        }
    }
}

/// CCIR man-made-noise frequency slope, dB per decade.
const MAN_MADE_SLOPE_DB_PER_DECADE: f64 = -27.7;

/// Galactic noise level at 1 MHz, dBW/Hz, with the standard f^-2.5 falloff.
const GALACTIC_REFERENCE_DBW_HZ: f64 = -163.0;
const GALACTIC_SLOPE_DB_PER_DECADE: f64 = -25.0;

/// The three noise components plus their combination, all dBW/Hz unless
/// noted (§3 `NoiseComponents`).
#[derive(Clone, Copy, Debug)]
pub struct NoiseComponents {
    pub atmospheric: TripleValue,
    pub galactic: TripleValue,
    pub man_made: TripleValue,
    /// Power sum of the three components, still dBW/Hz.
    pub combined_density: TripleValue,
}

impl NoiseComponents {
    /// Evaluate all three components at one control point/frequency, per
    /// §4.H.
    pub fn evaluate(
        store: &CoeffStore,
        point: MapPoint,
        month: u32,
        frequency_mhz: f64,
        env: NoiseEnvironment,
    ) -> Self {
        let atmospheric = atmospheric_noise(store, point, month, frequency_mhz);
        let galactic = galactic_noise(frequency_mhz);
        let man_made = man_made_noise(env, frequency_mhz);

        let combined_density = atmospheric
            .sum_power_db(&galactic)
            .sum_power_db(&man_made);

        Self {
            atmospheric,
            galactic,
            man_made,
            combined_density,
        }
    }

    /// Combined noise power in the given receiver bandwidth, dBW.
    pub fn in_bandwidth(&self, bandwidth_hz: f64) -> TripleValue {
        self.combined_density
            .shift_db(10.0 * bandwidth_hz.max(1.0).log10())
    }
}

/// Atmospheric noise (Fam): the fixed median map scaled to `frequency_mhz`
/// by the stored Fdu/Fdl decile coefficients, which are themselves
/// evaluated as fixed maps (§4.A, §4.H).
fn atmospheric_noise(store: &CoeffStore, point: MapPoint, month: u32, frequency_mhz: f64) -> TripleValue {
    let median_3mhz = fourier::fixed_map(store, FixedMapKind::AtmosphericNoiseMedian, point, month);
    let fdu = fourier::fixed_map(store, FixedMapKind::AtmosphericNoiseFdu, point, month).abs();
    let fdl = fourier::fixed_map(store, FixedMapKind::AtmosphericNoiseFdl, point, month).abs();

    // The stored median is referenced to 3 MHz; apply the same CCIR-style
    // slope used for man-made noise to extrapolate to the operating
    // frequency, since no separate atmospheric slope map is bundled.
    let decades = (frequency_mhz.max(0.1) / 3.0).log10();
    let median = median_3mhz - 180.0 + MAN_MADE_SLOPE_DB_PER_DECADE * decades;
    TripleValue::new(median, fdl, fdu)
}

fn galactic_noise(frequency_mhz: f64) -> TripleValue {
    let decades = (frequency_mhz.max(0.1) / 1.0).log10();
    let median = GALACTIC_REFERENCE_DBW_HZ + GALACTIC_SLOPE_DB_PER_DECADE * decades;
    TripleValue::new(median, 3.0, 3.0)
}

fn man_made_noise(env: NoiseEnvironment, frequency_mhz: f64) -> TripleValue {
    let decades = (frequency_mhz.max(0.1) / 3.0).log10();
    let median = env.reference_level_dbw_hz() + MAN_MADE_SLOPE_DB_PER_DECADE * decades;
    TripleValue::new(median, 5.0, 5.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coeff::test_fixtures::write_fixture_months;
    use crate::geo::GeoPoint;
    use tempfile::tempdir;

    fn store() -> CoeffStore {
        let dir = tempdir().unwrap();
        write_fixture_months(dir.path());
        CoeffStore::load(dir.path()).unwrap()
    }

    fn point() -> MapPoint {
        MapPoint {
            location: GeoPoint::new_degrees(40.0, -75.0).unwrap(),
            modip_sin: 0.5,
            local_time_hours: 14.0,
        }
    }

    #[test]
    fn noise_env_round_trips_through_its_cli_string_form() {
        use std::str::FromStr;
        for env in [
            NoiseEnvironment::Remote,
            NoiseEnvironment::Quiet,
            NoiseEnvironment::Rural,
            NoiseEnvironment::Residential,
            NoiseEnvironment::Urban,
            NoiseEnvironment::Noisy,
        ] {
            let s = env.to_string();
            assert_eq!(NoiseEnvironment::from_str(&s).unwrap(), env);
        }
    }

    #[test]
    fn noisier_environments_have_higher_median() {
        let remote = man_made_noise(NoiseEnvironment::Remote, 7.0);
        let noisy = man_made_noise(NoiseEnvironment::Noisy, 7.0);
        assert!(noisy.median > remote.median);
    }

    #[test]
    fn man_made_noise_decreases_with_frequency() {
        let low = man_made_noise(NoiseEnvironment::Rural, 3.0);
        let high = man_made_noise(NoiseEnvironment::Rural, 30.0);
        assert!(high.median < low.median);
    }

    #[test]
    fn combined_density_exceeds_each_component() {
        let store = store();
        let noise = NoiseComponents::evaluate(&store, point(), 3, 14.0, NoiseEnvironment::Rural);
        assert!(noise.combined_density.median >= noise.atmospheric.median);
        assert!(noise.combined_density.median >= noise.galactic.median);
        assert!(noise.combined_density.median >= noise.man_made.median);
    }

    #[test]
    fn bandwidth_scaling_matches_ten_log_bw() {
        let store = store();
        let noise = NoiseComponents::evaluate(&store, point(), 3, 14.0, NoiseEnvironment::Rural);
        let n1 = noise.in_bandwidth(1.0);
        let n2700 = noise.in_bandwidth(2700.0);
        assert!((n2700.median - n1.median - 10.0 * 2700f64.log10()).abs() < 1e-6);
    }
}
