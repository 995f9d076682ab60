// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! MUF calculator (§4.G): per-layer maximum usable frequency via the secant
//! law, circuit MUF as the most restrictive control point, and FOT/HPF
//! refined by the decile spread.

use log::trace;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::constants::{EARTH_RADIUS_KM, PROBABILITY_FLOOR};
use crate::ionosphere::{ControlPoint, IonosphericProfile, LayerKind, LayerParams};
use crate::reflectrix::hop_distance_rad;

/// MUF statistics for one layer or one circuit (§3 `MufInfo`).
#[derive(Clone, Copy, Debug)]
pub struct MufInfo {
    /// Median (50% of days) MUF, MHz.
    pub muf: f64,
    /// Frequency of Optimum Traffic (90% of days), MHz.
    pub fot: f64,
    /// Highest Probable Frequency (10% of days), MHz.
    pub hpf: f64,
    pub sig_lo: f64,
    pub sig_hi: f64,
}

const REFERENCE_HOP_DISTANCE_KM: f64 = 3000.0;

/// Find the elevation angle (radians, in `(0, pi/2)`) at which a ray
/// reflecting from a layer of virtual height `h_virt` produces ground
/// distance `target`. Hop distance decreases monotonically with elevation,
/// so a bisection search suffices.
fn solve_elevation_for_hop(target: f64, h_virt: f64, earth_radius_km: f64) -> Option<f64> {
    let mut lo = 1e-4_f64;
    let mut hi = std::f64::consts::FRAC_PI_2 - 1e-4;
    if hop_distance_rad(lo, h_virt, earth_radius_km) < target {
        return None;
    }
    if hop_distance_rad(hi, h_virt, earth_radius_km) > target {
        return None;
    }
    for _ in 0..60 {
        let mid = 0.5 * (lo + hi);
        let d = hop_distance_rad(mid, h_virt, earth_radius_km);
        if d > target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Some(0.5 * (lo + hi))
}

/// Basic-secant-law MUF for one hop over `layer`, refined for the F2 layer
/// by the M(3000) factor so that the 3000 km basic-secant prediction is
/// replaced with the empirically-derived `foF2 * M(3000)F2` value and other
/// distances scale from that reference geometrically.
pub fn layer_muf(
    profile: &IonosphericProfile,
    layer: LayerKind,
    hop_distance_rad_: f64,
) -> Option<f64> {
    let params: &LayerParams = profile.layers().into_iter().find(|l| l.layer == layer)?;
    if params.fc <= 0.0 || hop_distance_rad_ <= 0.0 {
        return None;
    }
    let h_virt = profile.virtual_height(params.fc)?;

    let elevation = solve_elevation_for_hop(hop_distance_rad_, h_virt, EARTH_RADIUS_KM)?;
    let sin_i = (EARTH_RADIUS_KM * elevation.cos() / (EARTH_RADIUS_KM + h_virt)).clamp(-1.0, 1.0);
    let cos_i = (1.0 - sin_i * sin_i).max(1e-9).sqrt();
    let secant = 1.0 / cos_i;

    if layer != LayerKind::F2 {
        return Some(params.fc * secant);
    }

    let ref_distance = REFERENCE_HOP_DISTANCE_KM / EARTH_RADIUS_KM;
    let ref_elevation = solve_elevation_for_hop(ref_distance, h_virt, EARTH_RADIUS_KM);
    let ref_secant = ref_elevation.map(|e| {
        let sin_i = (EARTH_RADIUS_KM * e.cos() / (EARTH_RADIUS_KM + h_virt)).clamp(-1.0, 1.0);
        1.0 / (1.0 - sin_i * sin_i).max(1e-9).sqrt()
    });

    match ref_secant {
        Some(ref_secant) if ref_secant > 1e-9 => {
            Some(params.fc * params.m3000 * (secant / ref_secant))
        }
        _ => Some(params.fc * secant),
    }
}

/// Circuit MUF across every control point's own single-hop share of the
/// path, for `layer`: each control point's hop distance is the total path
/// distance divided by `num_hops`. The circuit MUF is the minimum across
/// control points (the most restrictive one dominates).
pub fn circuit_muf(
    control_points: &[ControlPoint],
    layer: LayerKind,
    total_distance_rad: f64,
    num_hops: usize,
) -> Option<MufInfo> {
    let hop_distance = total_distance_rad / num_hops.max(1) as f64;

    let mut worst: Option<(f64, f64, f64)> = None; // (muf, sig_lo, sig_hi)
    for cp in control_points {
        let muf = layer_muf(&cp.profile, layer, hop_distance)?;
        let params = cp.profile.layers().into_iter().find(|l| l.layer == layer)?;
        let candidate = (muf, params.sig_lo, params.sig_hi);
        worst = Some(match worst {
            None => candidate,
            Some(w) if candidate.0 < w.0 => candidate,
            Some(w) => w,
        });
    }

    let (muf, sig_lo, sig_hi) = worst?;
    let fot = refine_fot(muf, sig_lo);
    let hpf = refine_hpf(muf, sig_hi);

    trace!("circuit MUF for {layer:?}: muf={muf:.2} fot={fot:.2} hpf={hpf:.2}");

    Some(MufInfo {
        muf,
        fot,
        hpf,
        sig_lo,
        sig_hi,
    })
}

/// FOT: nominally 85% of MUF, refined downward by the lower-decile spread
/// of the map so a layer with a wide day-to-day spread gets a more
/// conservative optimum-traffic frequency.
fn refine_fot(muf: f64, sig_lo: f64) -> f64 {
    (muf * 0.85 * (1.0 - 0.5 * sig_lo)).max(0.0)
}

/// HPF: the frequency exceeded by the actual MUF on only 10% of days,
/// refined upward by the upper-decile spread.
fn refine_hpf(muf: f64, sig_hi: f64) -> f64 {
    muf * (1.0 + 0.5 * sig_hi)
}

/// `P(f; MUF, sig_lo, sig_hi)`: probability that the actual MUF on a given
/// day exceeds operating frequency `f`, modelled as a cumulative normal CDF
/// in `log(MUF)` with asymmetric sigma on either side of the median,
/// floored at [`PROBABILITY_FLOOR`] (§4.G, §7).
pub fn muf_probability(f: f64, muf: f64, sig_lo: f64, sig_hi: f64) -> f64 {
    if f <= 0.0 || muf <= 0.0 {
        return PROBABILITY_FLOOR;
    }
    let log_f = f.ln();
    let log_muf = muf.ln();
    let sigma = if log_f <= log_muf {
        sig_lo.max(1e-6)
    } else {
        sig_hi.max(1e-6)
    };
    let normal = Normal::new(log_muf, sigma).unwrap_or_else(|_| Normal::new(log_muf, 1e-6).unwrap());
    // P(actual MUF > f) = 1 - CDF(log f) under the log-normal model.
    let p = 1.0 - normal.cdf(log_f);
    p.max(PROBABILITY_FLOOR)
}
