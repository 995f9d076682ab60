// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! HF (2-30 MHz) ionospheric propagation prediction engine.
//!
//! Given a transmitter and receiver location, a time (month/UTC hour), a
//! smoothed sunspot number, antenna configuration, and a set of operating
//! frequencies, [`PredictionEngine::predict`] returns, per frequency, the
//! viable propagation modes, the most-reliable mode, received signal power,
//! signal-to-noise ratio, circuit reliability, MUF/FOT/HPF, multipath
//! probability, and group delay.
//!
//! The pipeline is leaf-first: [`geo`] and [`path`] establish the
//! great-circle geometry; [`solar`] parameterizes each control point
//! astronomically; [`coeff`] and [`fourier`] evaluate the bundled CCIR/URSI
//! coefficient maps; [`ionosphere`] assembles layer parameters and an
//! ionogram; [`reflectrix`] ray-traces viable modes; [`muf`] derives MUF
//! statistics; [`noise`] and [`antenna`] supply the receiver noise floor and
//! antenna gain; [`signal`] combines all of it into per-mode and combined
//! reliability. [`engine`] orchestrates the whole pipeline per call.

pub mod antenna;
pub mod build_info;
pub mod coeff;
pub mod config;
pub mod constants;
pub mod decile;
pub mod engine;
pub mod error;
pub mod fourier;
pub mod geo;
pub mod ionosphere;
pub mod muf;
pub mod noise;
pub mod path;
pub mod reflectrix;
pub mod report;
pub mod signal;
pub mod solar;

pub use config::PredictConfig;
pub use engine::{ModeReport, Prediction, PredictionEngine};
pub use error::HfError;
pub use geo::GeoPoint;
