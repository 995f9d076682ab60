// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Vertical quarter-wave monopole over ground (omnidirectional in azimuth).

use super::{AntennaGain, GainResult};

/// Free-space gain of a resonant quarter-wave monopole over a perfectly
/// conducting ground plane, dBi.
const GROUND_SCREEN_GAIN_DBI: f64 = 5.15;
/// Gain over imperfect (real) ground, lossier at low elevation.
const REAL_GROUND_GAIN_DBI: f64 = 3.0;

#[derive(Clone, Copy, Debug)]
pub struct QuarterWaveMonopole {
    ground_screen: bool,
}

impl QuarterWaveMonopole {
    pub fn new(ground_screen: bool) -> Self {
        Self { ground_screen }
    }
}

impl AntennaGain for QuarterWaveMonopole {
    fn gain_db(&self, elevation_rad: f64, _azimuth_rad: f64, _frequency_mhz: f64) -> GainResult {
        // Vertical pattern peaks at low elevation and falls to zero
        // straight up; a vertical monopole's elevation pattern over ground
        // is approximately cos(elevation).
        let base = if self.ground_screen {
            GROUND_SCREEN_GAIN_DBI
        } else {
            REAL_GROUND_GAIN_DBI
        };
        let taper = elevation_rad.cos().max(1e-3);
        GainResult {
            gain_dbi: base + 20.0 * taper.log10(),
            out_of_band: false,
        }
    }

    fn name(&self) -> &'static str {
        "quarter_wave_monopole"
    }
}
