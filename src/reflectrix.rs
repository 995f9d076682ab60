// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Ray tracing / reflectrix (§4.F): for a given frequency, enumerate
//! reflection geometry at every feasible elevation angle, then enumerate
//! the viable hop-count modes for a required path distance.

use log::trace;

use crate::constants::FRAC_PI_2;
use crate::ionosphere::{IonosphericProfile, LayerKind};

/// One entry in a reflectrix: the reflection geometry at a specific
/// elevation angle, for one layer, at one operating frequency.
#[derive(Clone, Copy, Debug)]
pub struct ReflectrixEntry {
    pub layer: LayerKind,
    /// Takeoff elevation, radians.
    pub elevation: f64,
    pub true_height: f64,
    pub virtual_height: f64,
    /// The vertical-incidence frequency this oblique ray corresponds to.
    pub vertical_freq: f64,
    /// Ground distance of a single hop at this elevation, radians.
    pub hop_distance: f64,
}

/// The full per-frequency reflectrix: every layer's scanned elevations.
#[derive(Clone, Debug)]
pub struct Reflectrix {
    pub entries: Vec<ReflectrixEntry>,
    pub skip_distance: f64,
    pub max_distance: f64,
}

/// Ground central angle (radians) of one hop given takeoff elevation and
/// virtual reflection height, via the standard secant-law triangle.
pub(crate) fn hop_distance_rad(elevation: f64, virtual_height_km: f64, earth_radius_km: f64) -> f64 {
    let sin_i = (earth_radius_km * elevation.cos() / (earth_radius_km + virtual_height_km))
        .clamp(-1.0, 1.0);
    let i = sin_i.asin();
    let psi = i + elevation - FRAC_PI_2;
    2.0 * psi.max(0.0)
}

/// Solve, for one elevation and operating frequency, the self-consistent
/// `(virtual height, vertical frequency, incidence angle)` triple such that
/// `f_vert = f * cos(incidence)` and `virtual_height = ionogram(f_vert)`.
fn solve_oblique(
    profile: &IonosphericProfile,
    elevation: f64,
    f: f64,
    earth_radius_km: f64,
    initial_height_km: f64,
) -> Option<(f64, f64)> {
    let mut h_virt = initial_height_km;
    let mut f_vert = f;
    for _ in 0..25 {
        let sin_i =
            (earth_radius_km * elevation.cos() / (earth_radius_km + h_virt)).clamp(-1.0, 1.0);
        let cos_i = (1.0 - sin_i * sin_i).max(0.0).sqrt();
        f_vert = f * cos_i;
        let new_h = profile.virtual_height(f_vert)?;
        if (new_h - h_virt).abs() < 1e-3 {
            h_virt = new_h;
            break;
        }
        h_virt = new_h;
    }
    Some((f_vert, h_virt))
}

impl Reflectrix {
    /// Build the reflectrix for operating frequency `f` (MHz) over every
    /// populated layer in `profile`.
    pub fn build(profile: &IonosphericProfile, f: f64, min_toa_deg: f64, earth_radius_km: f64) -> Self {
        let min_elev = min_toa_deg.to_radians();
        let mut entries = Vec::new();

        for layer_params in profile.layers() {
            let layer = layer_params.layer;
            let max_elev = match profile.penetration_angle(layer, f, earth_radius_km) {
                Some(a) if a > min_elev => a,
                _ => continue,
            };

            const STEPS: usize = 60;
            for step in 0..=STEPS {
                let frac = step as f64 / STEPS as f64;
                let elevation = min_elev + (max_elev - min_elev) * frac;
                if let Some((f_vert, h_virt)) =
                    solve_oblique(profile, elevation, f, earth_radius_km, layer_params.hm + 20.0)
                {
                    let (_, h_true) = match profile.reflection_point(f_vert) {
                        Some(v) => v,
                        None => continue,
                    };
                    let hop_distance = hop_distance_rad(elevation, h_virt, earth_radius_km);
                    entries.push(ReflectrixEntry {
                        layer,
                        elevation,
                        true_height: h_true,
                        virtual_height: h_virt,
                        vertical_freq: f_vert,
                        hop_distance,
                    });
                }
            }
        }

        entries.sort_by(|a, b| a.elevation.partial_cmp(&b.elevation).unwrap());

        let skip_distance = entries
            .iter()
            .map(|e| e.hop_distance)
            .fold(f64::INFINITY, f64::min);
        let max_distance = entries
            .iter()
            .map(|e| e.hop_distance)
            .fold(0.0, f64::max);

        trace!(
            "reflectrix for f={f:.2} MHz: {} entries, skip={:.0}km max={:.0}km",
            entries.len(),
            skip_distance * earth_radius_km,
            max_distance * earth_radius_km
        );

        Self {
            entries,
            skip_distance: if skip_distance.is_finite() { skip_distance } else { 0.0 },
            max_distance,
        }
    }

    /// Entries for one layer only, ordered by elevation ascending (so hop
    /// distance is descending).
    pub fn layer_entries(&self, layer: LayerKind) -> Vec<&ReflectrixEntry> {
        self.entries.iter().filter(|e| e.layer == layer).collect()
    }

    /// Interpolate the reflectrix entry for `layer` whose hop distance
    /// equals `target_hop_distance` (radians), if the reflectrix for that
    /// layer brackets it.
    pub fn interpolate(&self, layer: LayerKind, target_hop_distance: f64) -> Option<ReflectrixEntry> {
        let entries = self.layer_entries(layer);
        if entries.len() < 2 {
            return None;
        }
        // Hop distance is monotonically decreasing with elevation.
        for w in entries.windows(2) {
            let (a, b) = (w[0], w[1]);
            let (hi, lo) = if a.hop_distance >= b.hop_distance {
                (a, b)
            } else {
                (b, a)
            };
            if target_hop_distance <= hi.hop_distance && target_hop_distance >= lo.hop_distance {
                let span = hi.hop_distance - lo.hop_distance;
                let t = if span.abs() < 1e-12 {
                    0.0
                } else {
                    (hi.hop_distance - target_hop_distance) / span
                };
                return Some(ReflectrixEntry {
                    layer,
                    elevation: hi.elevation + (lo.elevation - hi.elevation) * t,
                    true_height: hi.true_height + (lo.true_height - hi.true_height) * t,
                    virtual_height: hi.virtual_height + (lo.virtual_height - hi.virtual_height) * t,
                    vertical_freq: hi.vertical_freq + (lo.vertical_freq - hi.vertical_freq) * t,
                    hop_distance: target_hop_distance,
                });
            }
        }
        None
    }

    fn min_hop_distance(&self, layer: LayerKind) -> Option<f64> {
        self.layer_entries(layer)
            .iter()
            .map(|e| e.hop_distance)
            .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.min(d))))
    }

    /// Enumerate viable modes for a circuit of `total_distance_rad`, up to
    /// `max_hops` bounces, per §4.F Steps 2-3: for each hop count, find the
    /// per-layer reflectrix entry matching `total_distance / N`; also add a
    /// near-vertical ("NVIS") 1-hop mode per layer when the circuit is
    /// shorter than that layer's shortest obliquely-reachable hop.
    pub fn enumerate_modes(&self, total_distance_rad: f64, earth_radius_km: f64, max_hops: usize) -> Vec<Mode> {
        let mut modes = Vec::new();
        for layer in [LayerKind::E, LayerKind::F1, LayerKind::F2] {
            let min_hop = match self.min_hop_distance(layer) {
                Some(d) => d,
                None => continue,
            };

            if total_distance_rad < min_hop {
                if let Some(entry) = self.layer_entries(layer).into_iter().max_by(|a, b| {
                    a.elevation.partial_cmp(&b.elevation).unwrap()
                }) {
                    modes.push(Mode::from_entry(*entry, layer, 1, earth_radius_km, true));
                }
                continue;
            }

            for n in 1..=max_hops {
                let target = total_distance_rad / n as f64;
                if target < min_hop {
                    break;
                }
                if let Some(entry) = self.interpolate(layer, target) {
                    modes.push(Mode::from_entry(entry, layer, n, earth_radius_km, false));
                }
            }
        }
        modes
    }
}

/// One viable propagation mode: a hop count over a specific layer, with the
/// reflection geometry needed by the MUF and signal-loss calculations.
#[derive(Clone, Copy, Debug)]
pub struct Mode {
    pub layer: LayerKind,
    pub hop_count: usize,
    pub vertical_freq: f64,
    pub virtual_height: f64,
    pub true_height: f64,
    /// Incidence angle at the reflection point, radians (`sec(i)` is the
    /// obliquity factor used throughout §4.G/§4.J).
    pub incidence: f64,
    pub elevation: f64,
    /// Ground distance of a single hop, radians.
    pub hop_distance: f64,
    /// Near-vertical-incidence mode: the circuit is shorter than the
    /// layer's shortest normal oblique hop.
    pub vertical: bool,
}

impl Mode {
    fn from_entry(entry: ReflectrixEntry, layer: LayerKind, hop_count: usize, earth_radius_km: f64, vertical: bool) -> Self {
        let sin_i = (earth_radius_km * entry.elevation.cos() / (earth_radius_km + entry.virtual_height))
            .clamp(-1.0, 1.0);
        Self {
            layer,
            hop_count,
            vertical_freq: entry.vertical_freq,
            virtual_height: entry.virtual_height,
            true_height: entry.true_height,
            incidence: sin_i.asin(),
            elevation: entry.elevation,
            hop_distance: entry.hop_distance,
            vertical,
        }
    }

    /// `sec(i)`, the obliquity factor.
    pub fn secant(&self) -> f64 {
        1.0 / self.incidence.cos().max(1e-6)
    }

    /// Conventional mode label, e.g. `2F2`.
    pub fn label(&self) -> String {
        let l = match self.layer {
            LayerKind::E => "E",
            LayerKind::F1 => "F1",
            LayerKind::F2 => "F2",
        };
        format!("{}{}", self.hop_count, l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coeff::test_fixtures::write_fixture_months;
    use crate::coeff::CoeffStore;
    use crate::constants::EARTH_RADIUS_KM;
    use crate::geo::GeoPoint;
    use crate::solar::SolarContext;
    use tempfile::tempdir;

    fn profile() -> IonosphericProfile {
        let dir = tempdir().unwrap();
        write_fixture_months(dir.path());
        let store = CoeffStore::load(dir.path()).unwrap();
        let p = GeoPoint::new_degrees(10.0, 0.0).unwrap();
        let solar = SolarContext::compute(p, 3, 12.0);
        IonosphericProfile::build(&store, p, &solar, 100.0, 3)
    }

    #[test]
    fn reflectrix_below_muf_has_entries() {
        let profile = profile();
        let f = profile.f2.fc * 0.6;
        let rx = Reflectrix::build(&profile, f, 3.0, EARTH_RADIUS_KM);
        assert!(!rx.entries.is_empty());
        assert!(rx.max_distance >= rx.skip_distance);
    }

    #[test]
    fn reflectrix_far_above_muf_is_empty() {
        let profile = profile();
        let f = profile.f2.fc * 10.0;
        let rx = Reflectrix::build(&profile, f, 3.0, EARTH_RADIUS_KM);
        assert!(rx.entries.is_empty());
    }

    #[test]
    fn interpolate_finds_bracketed_hop_distance() {
        let profile = profile();
        let f = profile.f2.fc * 0.6;
        let rx = Reflectrix::build(&profile, f, 3.0, EARTH_RADIUS_KM);
        let target = (rx.skip_distance + rx.max_distance) / 2.0;
        let hit = rx.interpolate(LayerKind::F2, target);
        assert!(hit.is_some());
    }

    #[test]
    fn enumerate_modes_includes_single_hop_within_reflectrix_window() {
        let profile = profile();
        let f = profile.f2.fc * 0.6;
        let rx = Reflectrix::build(&profile, f, 3.0, EARTH_RADIUS_KM);
        let target = (rx.skip_distance + rx.max_distance) / 2.0;
        let modes = rx.enumerate_modes(target, EARTH_RADIUS_KM, 3);
        assert!(modes.iter().any(|m| m.layer == LayerKind::F2 && m.hop_count == 1));
    }

    #[test]
    fn enumerate_modes_is_empty_far_above_muf() {
        let profile = profile();
        let f = profile.f2.fc * 10.0;
        let rx = Reflectrix::build(&profile, f, 3.0, EARTH_RADIUS_KM);
        let modes = rx.enumerate_modes(1000.0 / EARTH_RADIUS_KM, EARTH_RADIUS_KM, 3);
        assert!(modes.is_empty());
    }
}
