// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Three-element (reflector/driven/director) Yagi, fixed-band directional
//! antenna. Gain is analytic in elevation (ground-image array factor, as
//! for the dipole) and in azimuth relative to the boom's forward bearing,
//! with a narrower main lobe than a dipole.

use crate::constants::TAU;

use super::{check_band, AntennaGain, GainResult};

const FREE_SPACE_GAIN_DBI: f64 = 7.5;
/// Design-band half-width as a fraction of the design frequency.
const BAND_FRACTION: f64 = 0.15;
/// -3 dB azimuthal beamwidth, degrees, typical for a 3-element Yagi.
const BEAMWIDTH_DEG: f64 = 60.0;

#[derive(Clone, Copy, Debug)]
pub struct ThreeElementYagi {
    height_m: f64,
    /// Forward (maximum-gain) bearing, radians.
    boom_azimuth_rad: f64,
    design_freq_mhz: f64,
}

impl ThreeElementYagi {
    pub fn new(height_m: f64, boom_azimuth_deg: f64) -> Self {
        Self {
            height_m: height_m.max(1.0),
            boom_azimuth_rad: boom_azimuth_deg.to_radians(),
            design_freq_mhz: 14.15,
        }
    }

    fn band(&self) -> (f64, f64) {
        (
            self.design_freq_mhz * (1.0 - BAND_FRACTION),
            self.design_freq_mhz * (1.0 + BAND_FRACTION),
        )
    }
}

impl AntennaGain for ThreeElementYagi {
    fn gain_db(&self, elevation_rad: f64, azimuth_rad: f64, frequency_mhz: f64) -> GainResult {
        let (lo, hi) = self.band();
        let out_of_band = check_band("three_element_yagi", frequency_mhz, lo, hi);
        let f = frequency_mhz.clamp(lo, hi);

        let wavelength_m = 300.0 / f;
        let h_over_lambda = self.height_m / wavelength_m;
        let array_factor = (2.0 * (TAU * h_over_lambda * elevation_rad.sin()).sin()).abs();

        let off_boom = {
            let mut d = azimuth_rad - self.boom_azimuth_rad;
            d = ((d + std::f64::consts::PI).rem_euclid(TAU)) - std::f64::consts::PI;
            d
        };
        let beamwidth_rad = BEAMWIDTH_DEG.to_radians();
        // Gaussian-ish main lobe approximation, narrower than the dipole's
        // broad cosine taper.
        let az_taper = (-2.77 * (off_boom / beamwidth_rad).powi(2)).exp().max(0.02);

        let raw = (array_factor * az_taper).max(1e-4);
        GainResult {
            gain_dbi: FREE_SPACE_GAIN_DBI + 20.0 * raw.log10(),
            out_of_band,
        }
    }

    fn name(&self) -> &'static str {
        "three_element_yagi"
    }
}
