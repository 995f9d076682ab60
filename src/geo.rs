// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Geographic point type, in radians, as used throughout the engine.

use crate::error::HfError;

/// A point on the Earth's surface. All units are in radians.
///
/// Invariant: `-pi/2 <= lat <= pi/2` and `-pi < lon <= pi`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    /// Latitude \[radians\], positive north.
    pub lat: f64,
    /// Longitude \[radians\], positive east, in `(-pi, pi]`.
    pub lon: f64,
}

impl GeoPoint {
    /// Make a new `GeoPoint` from values in radians, wrapping longitude into
    /// `(-pi, pi]` and rejecting out-of-range latitudes.
    pub fn new(lat: f64, lon: f64) -> Result<Self, HfError> {
        if !(-std::f64::consts::FRAC_PI_2..=std::f64::consts::FRAC_PI_2).contains(&lat) {
            return Err(HfError::ConfigInvalid(format!(
                "latitude {} rad is out of range [-pi/2, pi/2]",
                lat
            )));
        }
        Ok(Self {
            lat,
            lon: wrap_lon(lon),
        })
    }

    /// Make a new `GeoPoint` from values in degrees.
    pub fn new_degrees(lat_deg: f64, lon_deg: f64) -> Result<Self, HfError> {
        if !(-90.0..=90.0).contains(&lat_deg) {
            return Err(HfError::ConfigInvalid(format!(
                "latitude {lat_deg} deg is out of range [-90, 90]"
            )));
        }
        Self::new(lat_deg.to_radians(), lon_deg.to_radians())
    }

    pub fn lat_deg(&self) -> f64 {
        self.lat.to_degrees()
    }

    pub fn lon_deg(&self) -> f64 {
        self.lon.to_degrees()
    }
}

/// Wrap a longitude in radians into `(-pi, pi]`.
fn wrap_lon(lon: f64) -> f64 {
    use crate::constants::{PI, TAU};
    let mut l = lon % TAU;
    if l <= -PI {
        l += TAU;
    } else if l > PI {
        l -= TAU;
    }
    l
}
