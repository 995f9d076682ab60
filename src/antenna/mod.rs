// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Antenna gain models (§4.I).
//!
//! Every antenna implements [`AntennaGain`]; the engine only ever talks to
//! that trait, so new antenna types can be added without touching the
//! signal engine.

mod dipole;
mod inverted_v;
mod monopole;
mod yagi;

pub use dipole::Dipole;
pub use inverted_v::InvertedV;
pub use monopole::QuarterWaveMonopole;
pub use yagi::ThreeElementYagi;

use log::warn;
use serde::{Deserialize, Serialize};

/// Gain, dBi, and whether the requested frequency fell outside the
/// antenna's design band (§7 `AntennaOutOfBand`: use the design-edge gain
/// and tag the result rather than failing).
#[derive(Clone, Copy, Debug)]
pub struct GainResult {
    pub gain_dbi: f64,
    pub out_of_band: bool,
}

/// `gain_db(elevation, azimuth, frequency) -> dBi` (§4.I).
pub trait AntennaGain: Send + Sync {
    /// Elevation and azimuth are radians; `frequency_mhz` is the operating
    /// frequency.
    fn gain_db(&self, elevation_rad: f64, azimuth_rad: f64, frequency_mhz: f64) -> GainResult;

    /// Human-readable antenna name, used in reports.
    fn name(&self) -> &'static str;
}

/// An isotropic radiator: 0 dBi at every elevation, azimuth and frequency.
#[derive(Clone, Copy, Debug, Default)]
pub struct Isotropic;

impl AntennaGain for Isotropic {
    fn gain_db(&self, _elevation_rad: f64, _azimuth_rad: f64, _frequency_mhz: f64) -> GainResult {
        GainResult {
            gain_dbi: 0.0,
            out_of_band: false,
        }
    }

    fn name(&self) -> &'static str {
        "isotropic"
    }
}

/// Warn once (at call time) when a frequency falls outside `[lo, hi]` MHz
/// and report it as out-of-band; every antenna but [`Isotropic`] uses this.
fn check_band(name: &str, frequency_mhz: f64, lo: f64, hi: f64) -> bool {
    if frequency_mhz < lo || frequency_mhz > hi {
        warn!(
            "{name}: frequency {frequency_mhz:.2} MHz outside design band [{lo}, {hi}] MHz, \
             using design-edge gain"
        );
        true
    } else {
        false
    }
}

/// Serialized antenna configuration (§6 `AntennaSpec`), resolved into a
/// boxed [`AntennaGain`] at engine build time.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AntennaSpec {
    Isotropic,
    Dipole { height_m: f64 },
    InvertedV { height_m: f64, apex_angle_deg: f64 },
    Monopole { ground_screen: bool },
    Yagi { height_m: f64, boom_azimuth_deg: f64 },
}

impl AntennaSpec {
    pub fn build(self) -> Box<dyn AntennaGain> {
        match self {
            AntennaSpec::Isotropic => Box::new(Isotropic),
            AntennaSpec::Dipole { height_m } => Box::new(Dipole::new(height_m)),
            AntennaSpec::InvertedV {
                height_m,
                apex_angle_deg,
            } => Box::new(InvertedV::new(height_m, apex_angle_deg)),
            AntennaSpec::Monopole { ground_screen } => {
                Box::new(QuarterWaveMonopole::new(ground_screen))
            }
            AntennaSpec::Yagi {
                height_m,
                boom_azimuth_deg,
            } => Box::new(ThreeElementYagi::new(height_m, boom_azimuth_deg)),
        }
    }
}

impl Default for AntennaSpec {
    fn default() -> Self {
        AntennaSpec::Dipole { height_m: 15.0 }
    }
}
