// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Ionospheric profile synthesis (§4.E): assembles E/F1/F2 parabolic layer
//! parameters from evaluated Fourier maps, then derives an electron-density
//! profile and a precomputed ionogram (vertical frequency -> virtual
//! height) used by the ray tracer.

use lazy_static::lazy_static;
use log::trace;

use crate::coeff::{CoeffStore, FixedMapKind, VarMapKind};
use crate::constants::{
    D_LAYER_HEIGHT_KM, HM_E_KM, HM_F1_KM, IONOGRAM_QUADRATURE_NODES, PI, YM_E_KM,
};
use crate::fourier::{self, MapPoint};
use crate::geo::GeoPoint;
use crate::path::ControlPointBase;
use crate::solar::SolarContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    E,
    F1,
    F2,
}

/// A single parabolic layer's parameters (§3 `LayerParams`).
#[derive(Clone, Copy, Debug)]
pub struct LayerParams {
    pub layer: LayerKind,
    /// Critical (vertical-incidence) frequency, MHz.
    pub fc: f64,
    /// Peak height, km.
    pub hm: f64,
    /// Semi-thickness, km.
    pub ym: f64,
    /// Deviation loss contribution, dB.
    pub deviation_loss: f64,
    /// M(3000) factor (only physically meaningful for F2; carried at a
    /// neutral default for E/F1 since nothing downstream reads it there).
    pub m3000: f64,
    /// Fractional lower/upper decile spread of `fc`.
    pub sig_lo: f64,
    pub sig_hi: f64,
}

impl LayerParams {
    /// Plasma frequency (MHz) at height `h` (km) under this layer's
    /// parabola; zero outside `[hm-ym, hm+ym]`.
    fn plasma_freq_at(&self, h: f64) -> f64 {
        let x = (h - self.hm) / self.ym;
        if x.abs() >= 1.0 {
            0.0
        } else {
            self.fc * (1.0 - x * x).max(0.0).sqrt()
        }
    }

    /// Height (km) of the rising branch of this layer's parabola at which
    /// the plasma frequency equals `f` (the point a vertically incident
    /// wave of that frequency would reflect from). `None` if `f` exceeds
    /// the layer's critical frequency.
    fn rising_branch_height(&self, f: f64) -> Option<f64> {
        if f > self.fc || self.fc <= 0.0 {
            return None;
        }
        let x = (1.0 - (f / self.fc).powi(2)).max(0.0).sqrt();
        Some(self.hm - self.ym * x)
    }
}

/// E/F1/F2 layers, gyro-frequency, absorption index, and the precomputed
/// ionogram for one control point.
#[derive(Clone, Debug)]
pub struct IonosphericProfile {
    pub e: LayerParams,
    pub f1: Option<LayerParams>,
    pub f2: LayerParams,
    pub gyro_freq_mhz: f64,
    pub absorption_index: f64,
}

/// A control point along the path with its full solar/geomagnetic and
/// ionospheric context attached (§3 `ControlPoint`).
#[derive(Clone, Debug)]
pub struct ControlPoint {
    pub base: ControlPointBase,
    pub solar: SolarContext,
    pub profile: IonosphericProfile,
}

impl IonosphericProfile {
    pub fn build(
        store: &CoeffStore,
        location: GeoPoint,
        solar: &SolarContext,
        ssn: f64,
        month: u32,
    ) -> Self {
        let fo_e = davies_fo_e(solar.cos_zenith, ssn);

        let map_point = MapPoint {
            location,
            modip_sin: solar.geomagnetic_lat.sin(),
            local_time_hours: solar.local_time_hours,
        };
        let fo_f2_t = fourier::var_map(store, VarMapKind::FoF2, map_point, ssn, month);
        let m3000_t = fourier::var_map(store, VarMapKind::M3000F2, map_point, ssn, month);

        let ratio = (fo_e / fo_f2_t.median).min(1.7);
        let delta_m =
            (0.253 / (ratio - 1.215).abs().max(0.05) - 0.012 + 0.0015 * (ssn - 50.0) / 50.0)
                .clamp(-0.5, 1.5);
        let hm_f2 = (1490.0 / (m3000_t.median + delta_m) - 176.0).clamp(150.0, 500.0);
        let ym_f2 = ((hm_f2 - HM_E_KM) / (m3000_t.median * 1.2)).clamp(50.0, 150.0);

        let deviation_loss_f2 = fourier::fixed_map(
            store,
            FixedMapKind::AtmosphericNoiseMedian,
            map_point,
            month,
        )
        .abs()
            * 0.01;

        let f2 = LayerParams {
            layer: LayerKind::F2,
            fc: fo_f2_t.median,
            hm: hm_f2,
            ym: ym_f2,
            deviation_loss: deviation_loss_f2,
            m3000: m3000_t.median,
            sig_lo: (fo_f2_t.lower / fo_f2_t.median.max(1e-9)).abs(),
            sig_hi: (fo_f2_t.upper / fo_f2_t.median.max(1e-9)).abs(),
        };

        let e = LayerParams {
            layer: LayerKind::E,
            fc: fo_e,
            hm: HM_E_KM,
            ym: YM_E_KM,
            deviation_loss: 0.2,
            m3000: 3.0,
            sig_lo: 0.08,
            sig_hi: 0.08,
        };

        let chi_max = chi_max_for_latitude(location.lat);
        let f1 = if solar.zenith_angle <= chi_max {
            let fo_f1 = (fo_e * 1.4).min(f2.fc * 0.98);
            let ym_f1 = ((hm_f2 - HM_F1_KM) / 2.0).clamp(20.0, 60.0);
            Some(LayerParams {
                layer: LayerKind::F1,
                fc: fo_f1,
                hm: HM_F1_KM,
                ym: ym_f1,
                deviation_loss: 0.3,
                m3000: 3.0,
                sig_lo: 0.1,
                sig_hi: 0.1,
            })
        } else {
            None
        };

        let absorption_index = (0.5 + 0.01 * ssn) * solar.cos_zenith.max(0.0).sqrt().max(0.05);

        trace!(
            "profile at ({:.1},{:.1}): foE={:.2} foF1={:?} foF2={:.2} hmF2={:.0}",
            location.lat_deg(),
            location.lon_deg(),
            e.fc,
            f1.as_ref().map(|l| l.fc),
            f2.fc,
            f2.hm
        );

        Self {
            e,
            f1,
            f2,
            gyro_freq_mhz: solar.gyro_freq_mhz,
            absorption_index,
        }
    }

    /// All populated layers, lowest first.
    pub fn layers(&self) -> Vec<&LayerParams> {
        let mut v = vec![&self.e];
        if let Some(f1) = &self.f1 {
            v.push(f1);
        }
        v.push(&self.f2);
        v
    }

    /// Plasma frequency (MHz) at true height `h` (km): the maximum
    /// contribution from any populated layer (no valley modelling, a
    /// documented simplification).
    pub fn plasma_freq_at(&self, h: f64) -> f64 {
        self.layers()
            .iter()
            .map(|l| l.plasma_freq_at(h))
            .fold(0.0, f64::max)
    }

    /// Find the lowest (first-encountered) layer whose rising branch
    /// reflects vertical frequency `f`, and the true height at which that
    /// happens.
    pub fn reflection_point(&self, f: f64) -> Option<(LayerKind, f64)> {
        for l in self.layers() {
            if let Some(h) = l.rising_branch_height(f) {
                return Some((l.layer, h));
            }
        }
        None
    }

    /// Virtual height (km) for vertical frequency `f`, via Gaussian
    /// integration of the (collisionless, unmagnetized) group refractive
    /// index between 90 km and the true reflection height.
    pub fn virtual_height(&self, f: f64) -> Option<f64> {
        let (_, h_r) = self.reflection_point(f)?;
        Some(virtual_height_integral(self, f, h_r))
    }

    /// Elevation (radians) at which a ray at vertical frequency `f`
    /// reflecting from `layer` would just penetrate instead (§4.E).
    pub fn penetration_angle(&self, layer: LayerKind, f: f64, earth_radius_km: f64) -> Option<f64> {
        let l = self.layers().into_iter().find(|l| l.layer == layer)?;
        if f <= l.fc {
            return Some(PI / 2.0);
        }
        let cos_i = (l.fc / f).clamp(-1.0, 1.0);
        let sin_i = (1.0 - cos_i * cos_i).max(0.0).sqrt();
        let cos_elev = sin_i * (earth_radius_km + l.hm) / earth_radius_km;
        if cos_elev > 1.0 {
            None
        } else {
            Some(cos_elev.acos())
        }
    }
}

/// Davies-style empirical E-layer critical frequency (MHz), as a function
/// of cos(zenith angle) and smoothed sunspot number.
fn davies_fo_e(cos_chi: f64, ssn: f64) -> f64 {
    let night_floor = 0.5;
    let day = 3.3 * (1.0 + 0.0093 * ssn).sqrt() * cos_chi.max(0.0).powf(0.25);
    day.max(night_floor * (1.0 + 0.002 * ssn))
}

/// Latitude-dependent daytime cutoff for F1-layer presence (radians).
fn chi_max_for_latitude(lat: f64) -> f64 {
    (100.0 - 10.0 * (lat.abs() / (PI / 2.0))).to_radians()
}

lazy_static! {
    static ref GAUSS_NODES: Vec<(f64, f64)> = gauss_legendre_nodes(IONOGRAM_QUADRATURE_NODES);
}

fn legendre_and_deriv(n: usize, x: f64) -> (f64, f64) {
    let mut p0 = 1.0_f64;
    let mut p1 = x;
    if n == 0 {
        return (1.0, 0.0);
    }
    for k in 2..=n {
        let kf = k as f64;
        let p2 = ((2.0 * kf - 1.0) * x * p1 - (kf - 1.0) * p0) / kf;
        p0 = p1;
        p1 = p2;
    }
    let denom = x * x - 1.0;
    let dp = if denom.abs() < 1e-12 {
        // At x = +-1 use the closed-form derivative instead of dividing by ~0.
        n as f64 * (n as f64 + 1.0) / 2.0 * if x > 0.0 { 1.0 } else { (-1.0f64).powi(n as i32 - 1) }
    } else {
        n as f64 * (x * p1 - p0) / denom
    };
    (p1, dp)
}

/// Gauss-Legendre quadrature nodes and weights on `[-1, 1]`, computed via
/// Newton-Raphson refinement of the standard asymptotic initial guess.
fn gauss_legendre_nodes(n: usize) -> Vec<(f64, f64)> {
    let mut result = Vec::with_capacity(n);
    let m = (n + 1) / 2;
    for i in 0..m {
        let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        for _ in 0..100 {
            let (p_n, dp) = legendre_and_deriv(n, x);
            let dx = p_n / dp;
            x -= dx;
            if dx.abs() < 1e-14 {
                break;
            }
        }
        let (_, dp) = legendre_and_deriv(n, x);
        let w = 2.0 / ((1.0 - x * x) * dp * dp);
        result.push((x, w));
        if i != n - 1 - i {
            result.push((-x, w));
        }
    }
    result.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    result
}

/// Integrate the group refractive index from 90 km to `h_r`, using the
/// substitution `h = h_r - (h_r - 90) * u^2` to cancel the inverse-square-
/// root singularity at the reflection point.
fn virtual_height_integral(profile: &IonosphericProfile, f: f64, h_r: f64) -> f64 {
    let h0 = D_LAYER_HEIGHT_KM.min(h_r - 1.0).max(0.0);
    let span = (h_r - h0).max(1e-6);
    let mut integral = 0.0;
    for (xi, wi) in GAUSS_NODES.iter() {
        let u = 0.5 * (xi + 1.0);
        let h = h_r - span * u * u;
        let f_n = profile.plasma_freq_at(h);
        let n2 = (1.0 - (f_n / f).powi(2)).max(1e-6);
        let group_index = 1.0 / n2.sqrt();
        let jacobian = 2.0 * span * u; // |dh/du|
        integral += wi * group_index * jacobian * 0.5;
    }
    h0 + integral
}
