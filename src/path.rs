// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Great-circle path geometry on a spherical Earth (§4.B).

use log::{trace, warn};

use crate::constants::{PI, TAU, TRIG_ARG_LIMIT};
use crate::geo::GeoPoint;

/// A control point's role along the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlRole {
    Tx,
    Rx,
    Mid,
    /// 1000 km inward from the transmitter.
    TxPlus1000,
    /// 1000 km inward from the receiver (i.e. 1000 km back towards tx).
    RxMinus1000,
}

/// A location along the path before solar/ionospheric context has been
/// attached (that context lives in [`crate::ionosphere::ControlPoint`]).
#[derive(Clone, Copy, Debug)]
pub struct ControlPointBase {
    pub role: ControlRole,
    pub location: GeoPoint,
    /// Distance along the path from the transmitter to this point, radians.
    pub distance_from_tx: f64,
}

/// Great-circle geometry between two points.
#[derive(Clone, Copy, Debug)]
pub struct PathGeometry {
    pub tx: GeoPoint,
    pub rx: GeoPoint,
    /// Azimuth from tx towards rx, radians in `[0, 2*pi)`, along the
    /// direction actually travelled (reversed for the long path).
    pub azimuth_tx: f64,
    /// Azimuth from rx towards tx, radians in `[0, 2*pi)`.
    pub azimuth_rx: f64,
    /// Great-circle distance travelled, radians, in `(0, pi]` for the short
    /// path or `(pi, 2*pi)` for the long path.
    pub distance: f64,
    pub long_path: bool,
}

/// If two points are closer than this (radians), nudge them apart before
/// computing azimuth, which is numerically unstable at zero separation.
/// Equivalent to roughly 1 metre on the Earth's surface.
const COLOCATION_EPS_RAD: f64 = 1.0 / (crate::constants::EARTH_RADIUS_KM * 1000.0);

/// Great-circle (haversine) distance between two points, radians.
pub fn distance(p: GeoPoint, q: GeoPoint) -> f64 {
    let dlat = q.lat - p.lat;
    let dlon = q.lon - p.lon;
    let a = (dlat / 2.0).sin().powi(2) + p.lat.cos() * q.lat.cos() * (dlon / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);
    2.0 * a.sqrt().asin()
}

/// Initial bearing from `p` to `q`, radians in `[0, 2*pi)`.
pub fn azimuth(p: GeoPoint, q: GeoPoint) -> f64 {
    let d = distance(p, q);
    let (p, q) = if d < COLOCATION_EPS_RAD {
        warn!(
            "azimuth requested for near-colocated points (distance {d:.3e} rad); \
             nudging receiver east by 1 m to stabilise the bearing"
        );
        (
            p,
            GeoPoint {
                lat: q.lat,
                lon: q.lon + COLOCATION_EPS_RAD,
            },
        )
    } else {
        (p, q)
    };

    let dlon = q.lon - p.lon;
    let y = dlon.sin() * q.lat.cos();
    let x = p.lat.cos() * q.lat.sin() - p.lat.sin() * q.lat.cos() * dlon.cos();
    let theta = y.atan2(x);
    (theta + TAU) % TAU
}

/// Move from `p` a great-circle distance `d` (radians) along bearing `azim`
/// (radians).
pub fn waypoint(p: GeoPoint, azim: f64, d: f64) -> GeoPoint {
    let lat2 = (p.lat.sin() * d.cos() + p.lat.cos() * d.sin() * azim.cos())
        .clamp(-TRIG_ARG_LIMIT, TRIG_ARG_LIMIT)
        .asin();
    let y = azim.sin() * d.sin() * p.lat.cos();
    let x = d.cos() - p.lat.sin() * lat2.sin();
    let lon2 = p.lon + y.atan2(x);
    GeoPoint {
        lat: lat2,
        lon: {
            let mut l = lon2 % TAU;
            if l <= -PI {
                l += TAU;
            } else if l > PI {
                l -= TAU;
            }
            l
        },
    }
}

impl PathGeometry {
    pub fn new(tx: GeoPoint, rx: GeoPoint, long_path: bool) -> Self {
        let short_distance = distance(tx, rx);
        let short_az_tx = azimuth(tx, rx);
        let short_az_rx = azimuth(rx, tx);

        let (distance, azimuth_tx, azimuth_rx) = if long_path {
            (TAU - short_distance, (short_az_tx + PI) % TAU, (short_az_rx + PI) % TAU)
        } else {
            (short_distance, short_az_tx, short_az_rx)
        };

        trace!(
            "path geometry: distance={:.1} km, az_tx={:.1} deg, long_path={long_path}",
            distance * crate::constants::EARTH_RADIUS_KM,
            azimuth_tx.to_degrees()
        );

        Self {
            tx,
            rx,
            azimuth_tx,
            azimuth_rx,
            distance,
            long_path,
        }
    }

    pub fn distance_km(&self) -> f64 {
        self.distance * crate::constants::EARTH_RADIUS_KM
    }

    /// Build the control-point locations for this path, per §4.B:
    /// - <= 2000 km: just the midpoint.
    /// - 2000-7000 km: midpoint plus tx+1000km and rx-1000km.
    /// - > 7000 km: the above plus both endpoints.
    pub fn control_points(&self) -> Vec<ControlPointBase> {
        let dist_km = self.distance_km();
        let one_mm_km = 1000.0 / crate::constants::EARTH_RADIUS_KM;

        let mid = ControlPointBase {
            role: ControlRole::Mid,
            location: waypoint(self.tx, self.azimuth_tx, self.distance / 2.0),
            distance_from_tx: self.distance / 2.0,
        };

        if dist_km <= 2000.0 {
            return vec![mid];
        }

        let tx_plus = ControlPointBase {
            role: ControlRole::TxPlus1000,
            location: waypoint(self.tx, self.azimuth_tx, one_mm_km),
            distance_from_tx: one_mm_km,
        };
        let rx_minus = ControlPointBase {
            role: ControlRole::RxMinus1000,
            location: waypoint(self.rx, self.azimuth_rx, one_mm_km),
            distance_from_tx: self.distance - one_mm_km,
        };

        if dist_km <= 7000.0 {
            return vec![tx_plus, mid, rx_minus];
        }

        let tx_point = ControlPointBase {
            role: ControlRole::Tx,
            location: self.tx,
            distance_from_tx: 0.0,
        };
        let rx_point = ControlPointBase {
            role: ControlRole::Rx,
            location: self.rx,
            distance_from_tx: self.distance,
        };
        vec![tx_point, tx_plus, mid, rx_minus, rx_point]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn phl() -> GeoPoint {
        GeoPoint::new_degrees(39.95, -75.17).unwrap()
    }
    fn bos() -> GeoPoint {
        GeoPoint::new_degrees(42.36, -71.06).unwrap()
    }

    #[test]
    fn short_distance_is_sane() {
        let d_km = distance(phl(), bos()) * crate::constants::EARTH_RADIUS_KM;
        assert!((400.0..500.0).contains(&d_km), "got {d_km}");
    }

    #[test]
    fn long_path_is_complement_of_short() {
        let short = PathGeometry::new(phl(), bos(), false);
        let long = PathGeometry::new(phl(), bos(), true);
        assert_abs_diff_eq!(short.distance + long.distance, TAU, epsilon = 1e-9);
    }

    #[test]
    fn reciprocal_path_has_same_distance() {
        let fwd = PathGeometry::new(phl(), bos(), false);
        let rev = PathGeometry::new(bos(), phl(), false);
        assert_abs_diff_eq!(fwd.distance, rev.distance, epsilon = 1e-9);
    }

    #[test]
    fn control_points_short_path_is_midpoint_only() {
        let geom = PathGeometry::new(phl(), bos(), false);
        let cps = geom.control_points();
        assert_eq!(cps.len(), 1);
        assert_eq!(cps[0].role, ControlRole::Mid);
    }

    #[test]
    fn control_points_medium_path_has_three() {
        // Tangier->Belgrade is a ~2200km path, squarely in the 2000-7000km band.
        let tangier = GeoPoint::new_degrees(35.80, -5.90).unwrap();
        let belgrade = GeoPoint::new_degrees(44.90, 20.50).unwrap();
        let geom = PathGeometry::new(tangier, belgrade, false);
        assert!(geom.distance_km() > 2000.0 && geom.distance_km() < 7000.0);
        assert_eq!(geom.control_points().len(), 3);
    }

    #[test]
    fn control_points_long_path_has_five() {
        let tx = GeoPoint::new_degrees(44.65, -63.59).unwrap();
        let rx = GeoPoint::new_degrees(35.68, 139.69).unwrap();
        let geom = PathGeometry::new(tx, rx, false);
        assert!(geom.distance_km() > 7000.0);
        assert_eq!(geom.control_points().len(), 5);
    }

    #[test]
    fn antipodal_azimuth_is_finite() {
        let p = GeoPoint::new_degrees(0.0, 0.0).unwrap();
        let q = GeoPoint::new_degrees(0.0, 179.9999).unwrap();
        let az = azimuth(p, q);
        assert!(az.is_finite());
    }

    #[test]
    fn colocated_points_give_finite_azimuth() {
        let p = phl();
        let az = azimuth(p, p);
        assert!(az.is_finite());
    }
}
