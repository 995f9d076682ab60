// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Horizontal half-wave dipole over real ground, closed-form pattern.

use crate::constants::TAU;

use super::{AntennaGain, GainResult};

/// Free-space peak gain of a resonant half-wave dipole, dBi.
const FREE_SPACE_GAIN_DBI: f64 = 2.15;

/// A resonant horizontal half-wave dipole at a fixed height above ground,
/// broadside towards azimuth 0 relative to the great-circle bearing passed
/// in by the caller.
#[derive(Clone, Copy, Debug)]
pub struct Dipole {
    height_m: f64,
}

impl Dipole {
    pub fn new(height_m: f64) -> Self {
        Self {
            height_m: height_m.max(1.0),
        }
    }
}

impl AntennaGain for Dipole {
    fn gain_db(&self, elevation_rad: f64, azimuth_rad: f64, frequency_mhz: f64) -> GainResult {
        let wavelength_m = 300.0 / frequency_mhz.max(0.1);
        let h_over_lambda = self.height_m / wavelength_m;

        // Ground-image array factor: constructive lobes where
        // 2h/lambda*sin(elevation) is an odd multiple of pi/2.
        let array_factor = (2.0 * (TAU * h_over_lambda * elevation_rad.sin()).sin()).abs();

        // Broadside-null azimuthal taper of the dipole's own free-space
        // pattern, in the horizontal plane.
        let az_taper = azimuth_rad.cos().abs().max(0.05);

        let raw = (array_factor * az_taper).max(1e-4);
        GainResult {
            gain_dbi: FREE_SPACE_GAIN_DBI + 20.0 * raw.log10(),
            out_of_band: false,
        }
    }

    fn name(&self) -> &'static str {
        "dipole"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadside_high_elevation_has_positive_lobe() {
        let d = Dipole::new(15.0);
        let g = d.gain_db(60f64.to_radians(), 0.0, 14.0);
        assert!(g.gain_dbi.is_finite());
    }

    #[test]
    fn end_fire_azimuth_is_attenuated_relative_to_broadside() {
        let d = Dipole::new(15.0);
        let broadside = d.gain_db(30f64.to_radians(), 0.0, 14.0);
        let endfire = d.gain_db(30f64.to_radians(), 90f64.to_radians(), 14.0);
        assert!(endfire.gain_dbi < broadside.gain_dbi);
    }
}
