// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. `hf_predict` should do as many
calculations as possible in double precision before converting to a lower
precision, if it is ever required.
 */

pub use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Mean Earth radius used for all great-circle and hop-geometry maths (km).
pub const EARTH_RADIUS_KM: f64 = 6370.0;

/// Speed of light, in megametres per second, as carried by the legacy
/// reference implementation (note: *not* the 299.792458 SI value -- the
/// reference's constant is reproduced here because group delay comparisons
/// are tested against it within tolerance).
pub const VELOCITY_OF_LIGHT_MMPS: f64 = 299.79246;

/// The normal-decile constant: the number of standard deviations spanning
/// the 10th-to-50th (or 50th-to-90th) percentile of a normal distribution.
pub const NORM_DECILE: f64 = 1.28;

/// Fixed D-region absorption height (km). The legacy reference disagrees
/// with itself about whether this varies with reflection height; we follow
/// the fixed-100-km convention (see `DESIGN.md`).
pub const D_LAYER_HEIGHT_KM: f64 = 100.0;

/// Collision-frequency term used for F-layer absorption (§4.J).
pub const F_LAYER_COLLISION_PARAM: f64 = 10.2;

/// Absorption coefficient in the `L_abs` expression (§4.J).
pub const ABSORPTION_COEFF: f64 = 677.2;

/// E layer peak height (km), fixed per §4.E.
pub const HM_E_KM: f64 = 110.0;

/// E layer semi-thickness (km), fixed per §4.E.
pub const YM_E_KM: f64 = 20.0;

/// Typical F1 layer peak height (km) per §4.E.
pub const HM_F1_KM: f64 = 200.0;

/// Minimum elevation (takeoff) angle scanned when building a reflectrix,
/// matching the default `min_toa_deg` configuration value.
pub const DEFAULT_MIN_TOA_DEG: f64 = 3.0;

/// Floor applied to any probability before taking its logarithm (§4.G, §7).
pub const PROBABILITY_FLOOR: f64 = 1.0e-6;

/// Floor/ceiling applied to trigonometric arguments that should be in
/// `[-1, 1]` but may drift outside it due to floating point rounding (§7).
pub const TRIG_ARG_LIMIT: f64 = 1.0;

/// Multipath probability floor returned when no multipath interferer exists
/// or the path length exceeds [`MULTIPATH_PATH_LIMIT_RAD`] (§4.J).
pub const MULTIPATH_FLOOR: f64 = 0.001;

/// Multipath analysis is only performed for paths at or below this length
/// (7000 km, expressed as a great-circle angle in radians).
pub const MULTIPATH_PATH_LIMIT_RAD: f64 = 7000.0 / EARTH_RADIUS_KM;

/// Lower/upper clamp applied to the smoothed sunspot number (§4.A).
pub const SSN_MIN: f64 = 0.0;
pub const SSN_MAX: f64 = 300.0;

/// Number of quadrature nodes used to integrate the Appleton-Hartree group
/// index when building an ionogram (§4.E).
pub const IONOGRAM_QUADRATURE_NODES: usize = 40;

/// Number of monthly coefficient blobs the store expects (one per calendar
/// month).
pub const NUM_MONTHS: usize = 12;
