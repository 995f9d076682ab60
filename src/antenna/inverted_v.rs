// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Inverted-V dipole: same ground-image geometry as the horizontal dipole,
//! but with reduced gain and a flatter azimuthal pattern from the drooped
//! legs.

use crate::constants::TAU;

use super::{AntennaGain, GainResult};

const FREE_SPACE_GAIN_DBI: f64 = 1.5;

#[derive(Clone, Copy, Debug)]
pub struct InvertedV {
    apex_height_m: f64,
    /// Included angle between the two legs, degrees (180 = flat dipole).
    apex_angle_deg: f64,
}

impl InvertedV {
    pub fn new(apex_height_m: f64, apex_angle_deg: f64) -> Self {
        Self {
            apex_height_m: apex_height_m.max(1.0),
            apex_angle_deg: apex_angle_deg.clamp(60.0, 180.0),
        }
    }

    /// Effective mean height of the drooped wire, used in the ground-image
    /// array factor in place of the apex height.
    fn effective_height_m(&self) -> f64 {
        let droop = (180.0 - self.apex_angle_deg) / 180.0;
        self.apex_height_m * (1.0 - 0.3 * droop)
    }
}

impl AntennaGain for InvertedV {
    fn gain_db(&self, elevation_rad: f64, azimuth_rad: f64, frequency_mhz: f64) -> GainResult {
        let wavelength_m = 300.0 / frequency_mhz.max(0.1);
        let h_over_lambda = self.effective_height_m() / wavelength_m;
        let array_factor = (2.0 * (TAU * h_over_lambda * elevation_rad.sin()).sin()).abs();

        // The drooped legs broaden the azimuthal pattern relative to a flat
        // dipole: less deep a null off the broadside.
        let az_taper = (0.5 + 0.5 * azimuth_rad.cos().abs()).max(0.3);

        let raw = (array_factor * az_taper).max(1e-4);
        GainResult {
            gain_dbi: FREE_SPACE_GAIN_DBI + 20.0 * raw.log10(),
            out_of_band: false,
        }
    }

    fn name(&self) -> &'static str {
        "inverted_v"
    }
}
