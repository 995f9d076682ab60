// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Signal / reliability engine (§4.J).
//!
//! Combines free-space, absorption, deviation, ground-reflection,
//! over-MUF and auroral losses into a median received signal; derives
//! signal deciles by re-evaluating the over-MUF term at FOT/HPF; folds in
//! receiver noise to get SNR; and turns SNR against a required value into
//! a circuit reliability via the inverse-normal integral.
//!
//! ## D-region height (resolves an Open Question in §9)
//!
//! The absorption term below is always evaluated at the fixed 100 km
//! D-layer height ([`D_LAYER_HEIGHT_KM`]), never at the mode's own
//! (generally higher) reflection height. See `DESIGN.md`.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::antenna::GainResult;
use crate::constants::{
    ABSORPTION_COEFF, D_LAYER_HEIGHT_KM, EARTH_RADIUS_KM, F_LAYER_COLLISION_PARAM, NORM_DECILE,
    PROBABILITY_FLOOR, VELOCITY_OF_LIGHT_MMPS,
};
use crate::decile::TripleValue;
use crate::ionosphere::LayerKind;
use crate::muf::{muf_probability, MufInfo};
use crate::noise::NoiseComponents;
use crate::reflectrix::Mode;

/// Per-mode or combined signal/SNR/reliability result (§3 `SignalInfo`).
#[derive(Clone, Copy, Debug)]
pub struct SignalInfo {
    /// Median received power (dBW), plus its non-negative lower/upper
    /// decile deviations.
    pub power: TripleValue,
    /// SNR (median dB), plus its non-negative lower/upper decile
    /// deviations.
    pub snr: TripleValue,
    /// Probability the required SNR is met at this hour (§4.J).
    pub reliability: f64,
    pub delay_ms: f64,
}

/// Average ground-reflection loss for one intermediate bounce, dB. No
/// per-segment land/sea map is bundled with the coefficient store, so a
/// single value representative of mixed terrain (the CCIR-averaged
/// Fresnel reflection loss for a grazing HF ray) stands in for every
/// ground reflection rather than per-segment land/sea Fresnel averaging.
const GROUND_REFLECTION_LOSS_DB: f64 = 2.0;

/// Geomagnetic latitude (degrees) beyond which auroral-zone loss begins.
const AURORA_ONSET_LAT_DEG: f64 = 55.0;

/// Inputs needed to evaluate the total path loss for one mode at one
/// operating frequency (§4.J).
pub(crate) struct ModeLossInputs<'a> {
    pub mode: &'a Mode,
    pub frequency_mhz: f64,
    pub gyro_freq_mhz: f64,
    pub absorption_index: f64,
    pub deviation_loss_db: f64,
    pub muf_info: &'a MufInfo,
    pub geomagnetic_lat_rad: f64,
}

/// Incidence angle (radians) of this mode's ray at the fixed D-region
/// height, via the same secant-law geometry as the reflectrix.
fn d_region_incidence(mode: &Mode) -> f64 {
    let sin_i = (EARTH_RADIUS_KM * mode.elevation.cos() / (EARTH_RADIUS_KM + D_LAYER_HEIGHT_KM))
        .clamp(-1.0, 1.0);
    sin_i.asin()
}

fn b_c(frequency_mhz: f64, gyro_freq_mhz: f64) -> f64 {
    (frequency_mhz + gyro_freq_mhz).powf(1.98)
}

/// Collision-frequency term `X_nsq`: fixed for F-layer reflections, and for
/// E-layer reflections scaled up as the true height drops below 88 km
/// (denser, more collisional D/E-region air).
fn x_nsq(layer: LayerKind, true_height_km: f64) -> f64 {
    match layer {
        LayerKind::E if true_height_km < 88.0 => {
            F_LAYER_COLLISION_PARAM * (88.0 / true_height_km.max(1.0))
        }
        _ => F_LAYER_COLLISION_PARAM,
    }
}

fn absorption_loss_db(inputs: &ModeLossInputs) -> f64 {
    let i_d = d_region_incidence(inputs.mode);
    let bc = b_c(inputs.frequency_mhz, inputs.gyro_freq_mhz);
    let xnsq = x_nsq(inputs.mode.layer, inputs.mode.true_height);
    ABSORPTION_COEFF * inputs.absorption_index / (bc + xnsq) / i_d.cos().max(1e-3)
}

fn deviation_loss_db(inputs: &ModeLossInputs) -> f64 {
    let bc = b_c(inputs.frequency_mhz, inputs.gyro_freq_mhz);
    let xnsq = x_nsq(inputs.mode.layer, inputs.mode.true_height);
    let f_vert = inputs.mode.vertical_freq;
    inputs.deviation_loss_db / (bc + xnsq) * ((f_vert + inputs.gyro_freq_mhz).powf(1.98) + xnsq)
        / inputs.mode.incidence.cos().max(1e-3)
}

/// Auroral-zone loss (dB): zero equatorward of the oval, growing with the
/// square of the distance past onset.
fn aurora_loss_db(geomagnetic_lat_rad: f64) -> f64 {
    let lat_deg = geomagnetic_lat_rad.to_degrees().abs();
    if lat_deg < AURORA_ONSET_LAT_DEG {
        0.0
    } else {
        ((lat_deg - AURORA_ONSET_LAT_DEG) / 5.0).powi(2).min(30.0)
    }
}

/// Over-MUF penalty `L_xls` against the full asymmetric circuit-MUF
/// distribution (used for the median loss).
///
/// The secant factor is kept per the contested-but-specified Open
/// Question in §9: removing it degrades legacy-reference pass rate.
fn xls_loss_db(mode: &Mode, muf_info: &MufInfo) -> f64 {
    xls_loss_against(mode, muf_info.muf, muf_info.sig_lo, muf_info.sig_hi)
}

/// Over-MUF penalty evaluated against a single effective MUF edge (used
/// for the FOT/HPF-derived signal deciles, see `evaluate_mode`).
fn xls_loss_against(mode: &Mode, effective_muf: f64, sig_lo: f64, sig_hi: f64) -> f64 {
    let oblique_muf = mode.vertical_freq * mode.secant();
    let p = muf_probability(oblique_muf, effective_muf, sig_lo, sig_hi);
    -10.0 * p.max(PROBABILITY_FLOOR).log10() * mode.secant()
}

/// Ground distance (km) of the whole hop chain for this mode, and the
/// straight-hop path length used by the free-space loss and group delay
/// (§4.J: `path_length_km = N_hop * sqrt((hop_dist*R_E)^2 + (2*h_virt)^2)`).
fn path_length_km(mode: &Mode) -> f64 {
    let n_hop = mode.hop_count as f64;
    n_hop
        * ((mode.hop_distance * EARTH_RADIUS_KM).powi(2) + (2.0 * mode.virtual_height).powi(2))
            .sqrt()
}

/// Total path loss (dB) for one mode, with the over-MUF term supplied
/// separately so the caller can re-evaluate it at FOT/HPF for the signal
/// deciles without recomputing every other term.
fn total_loss_with_xls(
    inputs: &ModeLossInputs,
    xls_term: f64,
    tx_gain: &GainResult,
    rx_gain: &GainResult,
) -> f64 {
    let mode = inputs.mode;
    let n_hop = mode.hop_count as f64;
    let l_fs = 32.45 + 20.0 * (path_length_km(mode) * inputs.frequency_mhz).max(1e-9).log10();
    let l_abs = absorption_loss_db(inputs);
    let l_dev = deviation_loss_db(inputs);
    let l_ground = mode.hop_count.saturating_sub(1) as f64 * GROUND_REFLECTION_LOSS_DB;
    let l_aurora = aurora_loss_db(inputs.geomagnetic_lat_rad);

    l_fs + n_hop * (l_abs + l_dev) + l_ground + l_aurora + n_hop * xls_term
        - tx_gain.gain_dbi
        - rx_gain.gain_dbi
}

/// Standard-normal CDF.
fn std_normal_cdf(z: f64) -> f64 {
    Normal::new(0.0, 1.0).unwrap().cdf(z)
}

/// Reliability from the required SNR, median SNR, and its asymmetric
/// decile deviations (§4.J).
pub(crate) fn reliability_from_snr(
    required_snr_db: f64,
    snr_median: f64,
    snr_lo: f64,
    snr_hi: f64,
) -> f64 {
    let mut z = required_snr_db - snr_median;
    z /= if z <= 0.0 {
        (snr_lo / NORM_DECILE).max(1e-6)
    } else {
        (snr_hi / NORM_DECILE).max(1e-6)
    };
    (1.0 - std_normal_cdf(z)).clamp(0.0, 1.0)
}

/// Evaluate one mode's full `SignalInfo` at the operating frequency,
/// against the receiver noise and the transmit/receive antenna gains
/// already resolved for this mode's takeoff geometry (§4.J).
pub(crate) fn evaluate_mode(
    inputs: &ModeLossInputs,
    tx_gain: &GainResult,
    rx_gain: &GainResult,
    noise: &NoiseComponents,
    tx_power_dbw: f64,
    required_snr_db: f64,
    bandwidth_hz: f64,
) -> SignalInfo {
    let mode = inputs.mode;

    let l_median = total_loss_with_xls(inputs, xls_loss_db(mode, inputs.muf_info), tx_gain, rx_gain);
    // FOT/HPF are themselves specific percentile frequencies (not further
    // distributions), so the over-MUF term at each edge uses a tight
    // residual sigma rather than the full decile spread again.
    const EDGE_SIGMA: f64 = 0.02;
    let l_lo = total_loss_with_xls(
        inputs,
        xls_loss_against(mode, inputs.muf_info.fot, EDGE_SIGMA, EDGE_SIGMA),
        tx_gain,
        rx_gain,
    );
    let l_hi = total_loss_with_xls(
        inputs,
        xls_loss_against(mode, inputs.muf_info.hpf, EDGE_SIGMA, EDGE_SIGMA),
        tx_gain,
        rx_gain,
    );

    let p_median = tx_power_dbw - l_median;
    let p_lo = tx_power_dbw - l_lo;
    let p_hi = tx_power_dbw - l_hi;

    let power10 = (p_median - p_lo).max(0.0);
    let power90 = (p_hi - p_median).max(0.0);
    let power = TripleValue::new(p_median, power10, power90);

    let noise_in_bw = noise.in_bandwidth(bandwidth_hz);
    let snr_median = p_median - noise_in_bw.median;
    let snr_lo = (noise_in_bw.upper.powi(2) + power10.powi(2)).sqrt();
    let snr_hi = (noise_in_bw.lower.powi(2) + power90.powi(2)).sqrt();
    let snr = TripleValue::new(snr_median, snr_lo, snr_hi);

    let reliability = reliability_from_snr(required_snr_db, snr_median, snr_lo, snr_hi);

    SignalInfo {
        power,
        snr,
        reliability,
        delay_ms: path_length_km(mode) / VELOCITY_OF_LIGHT_MMPS,
    }
}

/// One candidate for most-reliable-mode selection / combination (§4.J
/// Steps 3/"Mode combination").
#[derive(Clone, Copy, Debug)]
pub(crate) struct ModeCandidate {
    pub hop_count: usize,
    pub signal: SignalInfo,
}

/// Select the index of the most-reliable mode (§4.J "Most-reliable-mode
/// selection"): prefer materially higher reliability; within +-0.05,
/// prefer the smaller hop count; if hop counts are equal too, prefer the
/// larger median SNR.
pub(crate) fn select_best_mode(candidates: &[ModeCandidate]) -> Option<usize> {
    (0..candidates.len()).reduce(|best, i| {
        let a = &candidates[best];
        let b = &candidates[i];
        let better = if b.signal.reliability > a.signal.reliability + 0.05 {
            true
        } else if a.signal.reliability > b.signal.reliability + 0.05 {
            false
        } else if b.hop_count != a.hop_count {
            b.hop_count < a.hop_count
        } else {
            b.signal.snr.median > a.signal.snr.median
        };
        if better {
            i
        } else {
            best
        }
    })
}

/// Incoherently sum modes within 100 dB of the strongest into one combined
/// `SignalInfo`, then recompute reliability from the combined median using
/// the best mode's decile deviations, clamped per §4.J.
pub(crate) fn combine_modes(
    candidates: &[ModeCandidate],
    best_index: usize,
    required_snr_db: f64,
) -> SignalInfo {
    let best = candidates[best_index].signal;

    let max_power = candidates
        .iter()
        .map(|c| c.signal.power.median)
        .fold(f64::NEG_INFINITY, f64::max);
    let linear_sum: f64 = candidates
        .iter()
        .map(|c| c.signal.power.median)
        .filter(|p| max_power - p <= 100.0)
        .map(|p| 10f64.powf((p - max_power) / 10.0))
        .sum();
    let combined_power_median = max_power + 10.0 * linear_sum.log10();

    let noise_median = best.power.median - best.snr.median;
    let combined_snr_median = combined_power_median - noise_median;
    let snr_lo = best.snr.lower.max(0.2);
    let snr_hi = best.snr.upper.min(30.0).max(0.0);

    let reliability = reliability_from_snr(required_snr_db, combined_snr_median, snr_lo, snr_hi);

    SignalInfo {
        power: TripleValue::new(combined_power_median, best.power.lower, best.power.upper),
        snr: TripleValue::new(combined_snr_median, snr_lo, snr_hi),
        reliability,
        delay_ms: best.delay_ms,
    }
}

/// Multipath probability (§4.J): for paths over 7000 km, always the floor.
/// Otherwise, the maximum reliability among modes that both arrive
/// materially later than the best mode and remain within
/// `multipath_tolerance_db` of its power; the floor if none qualify.
pub(crate) fn multipath_probability(
    candidates: &[ModeCandidate],
    best_index: usize,
    path_distance_rad: f64,
    max_tolerable_delay_ms: f64,
    multipath_tolerance_db: f64,
) -> f64 {
    use crate::constants::{MULTIPATH_FLOOR, MULTIPATH_PATH_LIMIT_RAD};

    if path_distance_rad > MULTIPATH_PATH_LIMIT_RAD {
        return MULTIPATH_FLOOR;
    }

    let best = candidates[best_index].signal;
    candidates
        .iter()
        .enumerate()
        .filter(|(i, c)| {
            *i != best_index
                && (c.signal.delay_ms - best.delay_ms).abs() > max_tolerable_delay_ms
                && (best.power.median - c.signal.power.median).abs() <= multipath_tolerance_db
        })
        .map(|(_, c)| c.signal.reliability)
        .fold(MULTIPATH_FLOOR, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reliability_is_half_when_median_equals_required() {
        let r = reliability_from_snr(10.0, 10.0, 2.0, 2.0);
        assert!((r - 0.5).abs() < 1e-9, "got {r}");
    }

    #[test]
    fn reliability_drops_as_required_snr_rises() {
        let low_req = reliability_from_snr(5.0, 10.0, 2.0, 2.0);
        let high_req = reliability_from_snr(20.0, 10.0, 2.0, 2.0);
        assert!(high_req <= low_req);
    }

    #[test]
    fn reliability_is_bounded() {
        let r = reliability_from_snr(-1000.0, 10.0, 2.0, 2.0);
        assert!((0.0..=1.0).contains(&r));
        let r2 = reliability_from_snr(1000.0, 10.0, 2.0, 2.0);
        assert!((0.0..=1.0).contains(&r2));
    }

    fn candidate(hop_count: usize, reliability: f64, snr_median: f64) -> ModeCandidate {
        ModeCandidate {
            hop_count,
            signal: SignalInfo {
                power: TripleValue::constant(-100.0),
                snr: TripleValue::new(snr_median, 2.0, 2.0),
                reliability,
                delay_ms: 5.0,
            },
        }
    }

    #[test]
    fn select_best_prefers_materially_higher_reliability() {
        let candidates = vec![candidate(2, 0.9, 15.0), candidate(1, 0.5, 20.0)];
        assert_eq!(select_best_mode(&candidates), Some(0));
    }

    #[test]
    fn select_best_prefers_fewer_hops_within_tolerance() {
        let candidates = vec![candidate(3, 0.80, 15.0), candidate(1, 0.82, 14.0)];
        assert_eq!(select_best_mode(&candidates), Some(1));
    }

    #[test]
    fn select_best_prefers_higher_snr_when_tied() {
        let candidates = vec![candidate(2, 0.80, 12.0), candidate(2, 0.81, 18.0)];
        assert_eq!(select_best_mode(&candidates), Some(1));
    }

    #[test]
    fn combined_signal_is_at_least_as_strong_as_any_single_mode() {
        let candidates = vec![candidate(1, 0.9, 15.0), candidate(2, 0.7, 10.0)];
        let combined = combine_modes(&candidates, 0, 10.0);
        let max_single = candidates
            .iter()
            .map(|c| c.signal.power.median)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(combined.power.median >= max_single);
    }

    #[test]
    fn multipath_floor_beyond_7000km() {
        let candidates = vec![candidate(1, 0.9, 15.0), candidate(2, 0.8, 10.0)];
        let p = multipath_probability(&candidates, 0, 8000.0 / EARTH_RADIUS_KM, 0.1, 3.0);
        assert_eq!(p, crate::constants::MULTIPATH_FLOOR);
    }

    #[test]
    fn multipath_floor_when_no_interferer_qualifies() {
        let mut candidates = vec![candidate(1, 0.9, 15.0), candidate(2, 0.8, 10.0)];
        candidates[1].signal.delay_ms = candidates[0].signal.delay_ms; // same delay, no multipath
        let p = multipath_probability(&candidates, 0, 2000.0 / EARTH_RADIUS_KM, 0.1, 3.0);
        assert_eq!(p, crate::constants::MULTIPATH_FLOOR);
    }
}
