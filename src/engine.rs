// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Top-level orchestration (§2, §3 `Prediction`, §5 Lifecycle).
//!
//! [`PredictionEngine`] owns the [`CoeffStore`] and is safe to reuse across
//! many [`PredictionEngine::predict`] calls; everything else here is rebuilt
//! fresh per call, matching the per-call ownership tree described in §9
//! ("mode graph without cycles").

use log::{debug, trace};

use crate::antenna::AntennaGain;
use crate::coeff::CoeffStore;
use crate::config::PredictConfig;
use crate::constants::EARTH_RADIUS_KM;
use crate::decile::TripleValue;
use crate::error::HfError;
use crate::fourier::MapPoint;
use crate::geo::GeoPoint;
use crate::ionosphere::{ControlPoint, IonosphericProfile, LayerKind};
use crate::muf::{self, MufInfo};
use crate::noise::NoiseComponents;
use crate::path::{ControlRole, PathGeometry};
use crate::reflectrix::Reflectrix;
use crate::signal::{self, ModeCandidate, ModeLossInputs, SignalInfo};
use crate::solar::SolarContext;

/// Maximum hop count scanned when enumerating modes (§4.F Step 2 stops once
/// `d/N` falls below the reflectrix window, but this bounds the search).
const MAX_HOP_COUNT: usize = 4;

/// Circuit hop-count estimate used only for the frequency-independent
/// "circuit MUF" reported on every `Prediction`, including closed ones
/// (§3 `Prediction.muf_info`): one hop per ~3500 km of path.
const CIRCUIT_HOP_REFERENCE_KM: f64 = 3500.0;

/// One evaluated propagation mode, reported alongside its signal and MUF
/// context (§3 `Mode`).
#[derive(Clone, Debug)]
pub struct ModeReport {
    pub label: String,
    pub layer: LayerKind,
    pub hop_count: usize,
    pub elevation_deg: f64,
    pub vertical: bool,
    pub signal: SignalInfo,
    pub muf_info: MufInfo,
    /// True if either antenna had to use its design-edge gain for this mode
    /// (§7 `AntennaOutOfBand`).
    pub antenna_out_of_band: bool,
}

/// Per-frequency prediction result (§3 `Prediction`).
#[derive(Clone, Debug)]
pub struct Prediction {
    pub frequency_mhz: f64,
    /// Viable modes in selection-priority order (§4.F Step 3, §5 Ordering).
    pub modes: Vec<ModeReport>,
    /// Index into `modes` of the most-reliable mode, `None` when closed.
    pub best_mode_index: Option<usize>,
    pub combined: SignalInfo,
    /// Circuit MUF/FOT/HPF, independent of whether this frequency has a
    /// viable mode (§7 `NoMode`: the circuit MUF is still meaningful).
    pub muf_info: MufInfo,
    pub multipath_probability: f64,
}

impl Prediction {
    /// No reflection path exists at this frequency (§7 `NoMode`): not an
    /// error, just an empty mode list with reliability 0.
    pub fn is_closed(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn best_mode(&self) -> Option<&ModeReport> {
        self.best_mode_index.and_then(|i| self.modes.get(i))
    }
}

fn closed_prediction(frequency_mhz: f64, muf_info: MufInfo) -> Prediction {
    Prediction {
        frequency_mhz,
        modes: Vec::new(),
        best_mode_index: None,
        combined: SignalInfo {
            power: TripleValue::constant(-300.0),
            snr: TripleValue::constant(-300.0),
            reliability: 0.0,
            delay_ms: 0.0,
        },
        muf_info,
        multipath_probability: crate::constants::MULTIPATH_FLOOR,
    }
}

/// Owns the process-wide coefficient store and exposes `predict()` (§5
/// Shared resource policy).
pub struct PredictionEngine {
    store: CoeffStore,
}

impl PredictionEngine {
    /// Load the twelve monthly coefficient blobs from `coeff_dir` once.
    pub fn new(coeff_dir: &std::path::Path) -> Result<Self, HfError> {
        Ok(Self {
            store: CoeffStore::load(coeff_dir)?,
        })
    }

    fn build_control_points(&self, tx: GeoPoint, rx: GeoPoint, month: u32, utc_hour: f64, ssn: f64, long_path: bool) -> (PathGeometry, Vec<ControlPoint>) {
        let geometry = PathGeometry::new(tx, rx, long_path);
        let control_points = geometry
            .control_points()
            .into_iter()
            .map(|base| {
                let solar = SolarContext::compute(base.location, month, utc_hour);
                let profile = IonosphericProfile::build(&self.store, base.location, &solar, ssn, month);
                ControlPoint { base, solar, profile }
            })
            .collect();
        (geometry, control_points)
    }

    /// Run the full pipeline for every frequency in `frequencies_mhz`,
    /// sharing one path geometry and one set of control-point profiles
    /// (§2 "one `predict()` call ... shares one path geometry and one
    /// ionospheric sampling").
    ///
    /// Per §8's frequency-subset-consistency property, control-point and
    /// profile construction never depends on `frequencies_mhz`, so calling
    /// with a subset yields identical results for the frequencies kept.
    pub fn predict(
        &self,
        tx: GeoPoint,
        rx: GeoPoint,
        month: u32,
        utc_hour: f64,
        ssn: f64,
        frequencies_mhz: &[f64],
        config: &PredictConfig,
    ) -> Result<Vec<Prediction>, HfError> {
        config.validate()?;
        for &f in frequencies_mhz {
            if f <= 0.0 {
                return Err(HfError::config(format!(
                    "frequency must be positive, got {f} MHz"
                )));
            }
        }
        if !(1..=12).contains(&month) {
            return Err(HfError::config(format!("month must be in 1..=12, got {month}")));
        }

        let (geometry, control_points) = self.build_control_points(tx, rx, month, utc_hour, ssn, config.long_path);
        let distance_km = geometry.distance_km();
        debug!(
            "predict: {} control points, distance={distance_km:.0} km, {} frequencies",
            control_points.len(),
            frequencies_mhz.len()
        );

        let mid = control_points
            .iter()
            .find(|cp| cp.base.role == ControlRole::Mid)
            .expect("control_points() always includes the midpoint");

        let circuit_hops = ((distance_km / CIRCUIT_HOP_REFERENCE_KM).ceil() as usize).max(1);
        let circuit_muf_info = muf::circuit_muf(&control_points, LayerKind::F2, geometry.distance, circuit_hops)
            .unwrap_or(MufInfo {
                muf: 0.0,
                fot: 0.0,
                hpf: 0.0,
                sig_lo: 0.0,
                sig_hi: 0.0,
            });

        let rx_solar = SolarContext::compute(rx, month, utc_hour);
        let rx_map_point = MapPoint {
            location: rx,
            modip_sin: rx_solar.geomagnetic_lat.sin(),
            local_time_hours: rx_solar.local_time_hours,
        };

        let tx_antenna = config.tx_antenna.build();
        let rx_antenna = config.rx_antenna.build();

        let mut predictions = Vec::with_capacity(frequencies_mhz.len());
        for &frequency_mhz in frequencies_mhz {
            predictions.push(self.predict_one(
                frequency_mhz,
                &geometry,
                &control_points,
                mid,
                distance_km,
                circuit_muf_info,
                rx_map_point,
                month,
                tx_antenna.as_ref(),
                rx_antenna.as_ref(),
                config,
            ));
        }

        Ok(predictions)
    }

    #[allow(clippy::too_many_arguments)]
    fn predict_one(
        &self,
        frequency_mhz: f64,
        geometry: &PathGeometry,
        control_points: &[ControlPoint],
        mid: &ControlPoint,
        distance_km: f64,
        circuit_muf_info: MufInfo,
        rx_map_point: MapPoint,
        month: u32,
        tx_antenna: &dyn AntennaGain,
        rx_antenna: &dyn AntennaGain,
        config: &PredictConfig,
    ) -> Prediction {
        let reflectrix = Reflectrix::build(&mid.profile, frequency_mhz, config.min_toa_deg, EARTH_RADIUS_KM);
        let modes = reflectrix.enumerate_modes(geometry.distance, EARTH_RADIUS_KM, MAX_HOP_COUNT);

        if modes.is_empty() {
            trace!("f={frequency_mhz:.2} MHz: no viable mode, returning closed prediction");
            return closed_prediction(frequency_mhz, circuit_muf_info);
        }

        let noise = NoiseComponents::evaluate(&self.store, rx_map_point, month, frequency_mhz, config.noise_env);

        let mut reports: Vec<ModeReport> = Vec::with_capacity(modes.len());
        let mut candidates: Vec<ModeCandidate> = Vec::with_capacity(modes.len());

        for mode in &modes {
            let layer_points: Vec<ControlPoint> = control_points
                .iter()
                .filter(|cp| cp.profile.layers().iter().any(|l| l.layer == mode.layer))
                .cloned()
                .collect();
            let muf_info = match muf::circuit_muf(&layer_points, mode.layer, geometry.distance, mode.hop_count) {
                Some(m) => m,
                None => {
                    trace!("mode {} has no computable circuit MUF, skipping", mode.label());
                    continue;
                }
            };

            let deviation_loss = mid
                .profile
                .layers()
                .iter()
                .find(|l| l.layer == mode.layer)
                .map(|l| l.deviation_loss)
                .unwrap_or(0.0);

            let inputs = ModeLossInputs {
                mode,
                frequency_mhz,
                gyro_freq_mhz: mid.profile.gyro_freq_mhz,
                absorption_index: mid.profile.absorption_index,
                deviation_loss_db: deviation_loss,
                muf_info: &muf_info,
                geomagnetic_lat_rad: mid.solar.geomagnetic_lat,
            };

            // Both ends are assumed to see this mode at the same takeoff
            // elevation and, absent an orientation field on most antenna
            // types, the path's own absolute azimuth (see DESIGN.md).
            let tx_gain = tx_antenna.gain_db(mode.elevation, geometry.azimuth_tx, frequency_mhz);
            let rx_gain = rx_antenna.gain_db(mode.elevation, geometry.azimuth_rx, frequency_mhz);

            let signal_info = signal::evaluate_mode(
                &inputs,
                &tx_gain,
                &rx_gain,
                &noise,
                config.tx_power_dbw,
                config.required_snr_db,
                config.bandwidth_hz,
            );

            candidates.push(ModeCandidate {
                hop_count: mode.hop_count,
                signal: signal_info,
            });
            reports.push(ModeReport {
                label: mode.label(),
                layer: mode.layer,
                hop_count: mode.hop_count,
                elevation_deg: mode.elevation.to_degrees(),
                vertical: mode.vertical,
                signal: signal_info,
                muf_info,
                antenna_out_of_band: tx_gain.out_of_band || rx_gain.out_of_band,
            });
        }

        if candidates.is_empty() {
            return closed_prediction(frequency_mhz, circuit_muf_info);
        }

        let best_index = signal::select_best_mode(&candidates).unwrap_or(0);
        let combined = signal::combine_modes(&candidates, best_index, config.required_snr_db);
        let multipath_probability = signal::multipath_probability(
            &candidates,
            best_index,
            geometry.distance,
            config.max_tolerable_delay_ms,
            config.multipath_tolerance_db,
        );

        trace!(
            "f={frequency_mhz:.2} MHz ({distance_km:.0} km): {} modes, best={} reliability={:.2}",
            reports.len(),
            reports[best_index].label,
            combined.reliability
        );

        Prediction {
            frequency_mhz,
            modes: reports,
            best_mode_index: Some(best_index),
            combined,
            muf_info: circuit_muf_info,
            multipath_probability,
        }
    }
}
