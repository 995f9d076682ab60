// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Solar and geomagnetic parameterization of a control point (§4.C).

use crate::constants::{PI, TAU, TRIG_ARG_LIMIT};
use crate::geo::GeoPoint;

/// Geomagnetic dipole pole used for the centered-dipole approximation
/// (§4.C: "a centered dipole at 78.5N, 289E is the minimum").
const DIPOLE_POLE_LAT_DEG: f64 = 78.5;
const DIPOLE_POLE_LON_DEG: f64 = 289.0;

/// Equatorial surface field strength of the centered dipole, gauss.
const DIPOLE_B0_GAUSS: f64 = 0.31;

/// Solar/geomagnetic context computed at one control point for one
/// prediction call.
#[derive(Clone, Copy, Debug)]
pub struct SolarContext {
    /// Solar zenith angle, radians.
    pub zenith_angle: f64,
    /// cos(zenith angle), clamped to `[-1, 1]`; cached because it is used
    /// repeatedly downstream.
    pub cos_zenith: f64,
    /// Local (solar) time, hours in `[0, 24)`.
    pub local_time_hours: f64,
    /// Geomagnetic latitude, radians.
    pub geomagnetic_lat: f64,
    /// Magnetic dip angle, radians.
    pub dip_angle: f64,
    /// Electron gyro-frequency, MHz.
    pub gyro_freq_mhz: f64,
}

/// Solar declination (radians), via a low-order Fourier series accurate to
/// about 0.01 degrees, parameterized by day-of-year fraction `gamma` in
/// `[0, 2*pi)`.
fn solar_declination(day_of_year_frac: f64) -> f64 {
    let gamma = TAU * day_of_year_frac;
    0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
        - 0.006758 * (2.0 * gamma).cos()
        + 0.000907 * (2.0 * gamma).sin()
        - 0.002697 * (3.0 * gamma).cos()
        + 0.00148 * (3.0 * gamma).sin()
}

/// Equation of time, in hours, same series family as the declination.
fn equation_of_time_hours(day_of_year_frac: f64) -> f64 {
    let gamma = TAU * day_of_year_frac;
    let minutes = 229.18
        * (0.000075 + 0.001868 * gamma.cos()
            - 0.032077 * gamma.sin()
            - 0.014615 * (2.0 * gamma).cos()
            - 0.040849 * (2.0 * gamma).sin());
    minutes / 60.0
}

/// Approximate fraction of the year elapsed, given a month (1-12) and a UTC
/// day fraction. Treats each month as occupying an equal 1/12 slice, which
/// is adequate for the ~0.01 degree precision this module targets.
fn day_of_year_fraction(month: u32, day_frac: f64) -> f64 {
    let month_frac = (month.clamp(1, 12) - 1) as f64 / 12.0;
    month_frac + day_frac / 12.0
}

/// Local (solar) time in decimal hours `[0, 24)`.
pub fn local_time_hours(point: GeoPoint, utc_hour: f64) -> f64 {
    let lt = utc_hour + point.lon_deg() / 15.0;
    ((lt % 24.0) + 24.0) % 24.0
}

/// Solar zenith angle at `point`, given month, UTC day fraction and hour.
pub fn solar_zenith_angle(point: GeoPoint, month: u32, utc_hour: f64) -> f64 {
    let day_frac = utc_hour / 24.0;
    let doy = day_of_year_fraction(month, day_frac);
    let decl = solar_declination(doy);
    let eot = equation_of_time_hours(doy);

    // Hour angle: solar noon is at local apparent time 12h.
    let solar_time = local_time_hours(point, utc_hour) + eot;
    let hour_angle = (solar_time - 12.0) / 24.0 * TAU;

    let cos_chi = point.lat.sin() * decl.sin() + point.lat.cos() * decl.cos() * hour_angle.cos();
    cos_chi.clamp(-TRIG_ARG_LIMIT, TRIG_ARG_LIMIT).acos()
}

/// Geomagnetic latitude (radians) of `point` under the centered-dipole
/// approximation.
pub fn geomagnetic_latitude(point: GeoPoint) -> f64 {
    let pole = GeoPoint::new_degrees(DIPOLE_POLE_LAT_DEG, DIPOLE_POLE_LON_DEG).unwrap();
    let colat = crate::path::distance(point, pole);
    (PI / 2.0 - colat).clamp(-PI / 2.0, PI / 2.0)
}

/// Magnetic dip angle (radians) from the geomagnetic latitude, via
/// `tan(I) = 2*tan(lambda_m)` (centered-dipole relation).
pub fn dip_angle(geomagnetic_lat: f64) -> f64 {
    (2.0 * geomagnetic_lat.tan()).atan()
}

/// Dipole field magnitude at `geomagnetic_lat`, gauss.
fn dipole_field_gauss(geomagnetic_lat: f64) -> f64 {
    DIPOLE_B0_GAUSS * (1.0 + 3.0 * geomagnetic_lat.sin().powi(2)).sqrt()
}

/// Electron gyro-frequency, MHz, from a field strength in gauss:
/// `f_H = 2.8 * |B|`.
pub fn gyro_frequency_mhz(b_gauss: f64) -> f64 {
    2.8 * b_gauss
}

impl SolarContext {
    pub fn compute(point: GeoPoint, month: u32, utc_hour: f64) -> Self {
        let zenith_angle = solar_zenith_angle(point, month, utc_hour);
        let geomagnetic_lat = geomagnetic_latitude(point);
        let dip = dip_angle(geomagnetic_lat);
        let b = dipole_field_gauss(geomagnetic_lat);
        Self {
            zenith_angle,
            cos_zenith: zenith_angle.cos(),
            local_time_hours: local_time_hours(point, utc_hour),
            geomagnetic_lat,
            dip_angle: dip,
            gyro_freq_mhz: gyro_frequency_mhz(b),
        }
    }
}
