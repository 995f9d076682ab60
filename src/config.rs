// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-call prediction configuration (§6).
//!
//! `PredictConfig` derives `serde::{Serialize, Deserialize}` so a config can
//! be loaded from TOML/YAML/JSON, matching the CLI's layered-config
//! convention. Every field has a documented default from §6; the engine
//! does not guess at anything the caller leaves unset.

use serde::{Deserialize, Serialize};

use crate::antenna::AntennaSpec;
use crate::error::HfError;
use crate::noise::NoiseEnvironment;

fn default_tx_power_dbw() -> f64 {
    20.0
}
fn default_required_snr_db() -> f64 {
    // The realistic SSB operational value. §9 "Legacy validation vs.
    // realistic use": the legacy reference harness instead uses 73 dB,
    // which callers must set explicitly.
    10.0
}
fn default_bandwidth_hz() -> f64 {
    2700.0
}
fn default_required_reliability() -> f64 {
    0.9
}
fn default_min_toa_deg() -> f64 {
    3.0
}
fn default_max_tolerable_delay_ms() -> f64 {
    0.1
}
fn default_multipath_tolerance_db() -> f64 {
    3.0
}

/// Tunable knobs for one `predict()` call (§6).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictConfig {
    /// Transmitter power, dBW (default 20 dBW = 100 W).
    #[serde(default = "default_tx_power_dbw")]
    pub tx_power_dbw: f64,

    /// SNR required for the circuit to be considered "reliable" at a given
    /// hour, dB. Realistic SSB use: 10. Legacy-reference validation: 73.
    #[serde(default = "default_required_snr_db")]
    pub required_snr_db: f64,

    /// Receiver noise (and signal-decile) bandwidth, Hz.
    #[serde(default = "default_bandwidth_hz")]
    pub bandwidth_hz: f64,

    /// Reliability threshold used by callers to decide "circuit open" for
    /// reporting; the engine itself always returns the continuous value.
    #[serde(default = "default_required_reliability")]
    pub required_reliability: f64,

    /// Categorical man-made noise environment at the receiver.
    #[serde(default)]
    pub noise_env: NoiseEnvironment,

    /// Minimum takeoff angle scanned when building a reflectrix, degrees.
    #[serde(default = "default_min_toa_deg")]
    pub min_toa_deg: f64,

    /// Use the long (`2*pi - short`) great-circle path instead of the short
    /// one.
    #[serde(default)]
    pub long_path: bool,

    #[serde(default)]
    pub tx_antenna: AntennaSpec,
    #[serde(default)]
    pub rx_antenna: AntennaSpec,

    /// Delay difference beyond which a second mode is treated as a
    /// distinct multipath arrival, ms.
    #[serde(default = "default_max_tolerable_delay_ms")]
    pub max_tolerable_delay_ms: f64,

    /// Power difference within which a second mode counts as a multipath
    /// interferer with the best mode, dB.
    #[serde(default = "default_multipath_tolerance_db")]
    pub multipath_tolerance_db: f64,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            tx_power_dbw: default_tx_power_dbw(),
            required_snr_db: default_required_snr_db(),
            bandwidth_hz: default_bandwidth_hz(),
            required_reliability: default_required_reliability(),
            noise_env: NoiseEnvironment::default(),
            min_toa_deg: default_min_toa_deg(),
            long_path: false,
            tx_antenna: AntennaSpec::default(),
            rx_antenna: AntennaSpec::default(),
            max_tolerable_delay_ms: default_max_tolerable_delay_ms(),
            multipath_tolerance_db: default_multipath_tolerance_db(),
        }
    }
}

impl PredictConfig {
    /// Reject nonsense configuration before any compute begins (§7
    /// `ConfigInvalid`).
    pub(crate) fn validate(&self) -> Result<(), HfError> {
        if self.bandwidth_hz <= 0.0 {
            return Err(HfError::config(format!(
                "bandwidth_hz must be positive, got {}",
                self.bandwidth_hz
            )));
        }
        if !(0.0..=1.0).contains(&self.required_reliability) {
            return Err(HfError::config(format!(
                "required_reliability must be in [0, 1], got {}",
                self.required_reliability
            )));
        }
        if self.min_toa_deg < 0.0 || self.min_toa_deg >= 90.0 {
            return Err(HfError::config(format!(
                "min_toa_deg must be in [0, 90), got {}",
                self.min_toa_deg
            )));
        }
        if self.max_tolerable_delay_ms < 0.0 {
            return Err(HfError::config(
                "max_tolerable_delay_ms must be non-negative".to_string(),
            ));
        }
        if self.multipath_tolerance_db < 0.0 {
            return Err(HfError::config(
                "multipath_tolerance_db must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
