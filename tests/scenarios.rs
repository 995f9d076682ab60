// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! End-to-end scenarios over a synthetic coefficient store: six circuits
//! spanning short mid-latitude hops, a transatlantic path, a polar path, a
//! near-equatorial long path, and a path that crosses the day/night
//! terminator. None of these compare against real propagation predictions
//! (no legacy reference tables are bundled); they check that every
//! circuit, at a representative spread of HF frequencies, produces a
//! well-formed `Prediction` with no panics, NaNs, or out-of-range values.

mod common;

use hf_predict::config::PredictConfig;
use hf_predict::engine::PredictionEngine;
use hf_predict::geo::GeoPoint;

const SPREAD_MHZ: [f64; 6] = [3.5, 7.0, 10.1, 14.0, 21.0, 28.0];

fn engine() -> PredictionEngine {
    let dir = tempfile::tempdir().unwrap();
    common::write_fixture_months(dir.path());
    PredictionEngine::new(dir.path()).unwrap()
}

fn assert_well_formed(tx: GeoPoint, rx: GeoPoint, month: u32, utc_hour: f64, ssn: f64, config: &PredictConfig) {
    let engine = engine();
    let predictions = engine
        .predict(tx, rx, month, utc_hour, ssn, &SPREAD_MHZ, config)
        .expect("well-formed circuit input must not error");

    assert_eq!(predictions.len(), SPREAD_MHZ.len());
    for p in &predictions {
        assert!(p.frequency_mhz.is_finite());
        assert!(p.muf_info.muf.is_finite() && p.muf_info.muf >= 0.0);
        assert!((0.0..=1.0).contains(&p.combined.reliability));
        assert!((0.0..=1.0).contains(&p.multipath_probability));
        assert!(p.combined.snr.median.is_finite());
        assert!(p.combined.delay_ms >= 0.0);
        for m in &p.modes {
            assert!((0.0..=1.0).contains(&m.signal.reliability));
            assert!(m.hop_count >= 1);
        }
    }
}

#[test]
fn philadelphia_to_boston_short_midlatitude_hop() {
    assert_well_formed(
        common::philadelphia(),
        common::boston(),
        3,
        18.0,
        100.0,
        &PredictConfig::default(),
    );
}

#[test]
fn philadelphia_to_london_transatlantic() {
    assert_well_formed(
        common::philadelphia(),
        common::london(),
        6,
        12.0,
        150.0,
        &PredictConfig::default(),
    );
}

#[test]
fn halifax_to_tokyo_polar_long_path() {
    assert_well_formed(
        common::halifax(),
        common::tokyo(),
        12,
        9.0,
        80.0,
        &PredictConfig::default(),
    );
}

#[test]
fn tangier_to_belgrade_mediterranean_crossing() {
    assert_well_formed(
        common::tangier(),
        common::belgrade(),
        9,
        15.0,
        120.0,
        &PredictConfig::default(),
    );
}

#[test]
fn anchorage_to_oslo_high_latitude_auroral_zone() {
    let mut config = PredictConfig::default();
    config.required_snr_db = 6.0;
    assert_well_formed(common::anchorage(), common::oslo(), 1, 6.0, 60.0, &config);
}

#[test]
fn singapore_to_sao_paulo_near_equatorial_long_haul() {
    assert_well_formed(
        common::singapore(),
        common::sao_paulo(),
        6,
        22.0,
        200.0,
        &PredictConfig::default(),
    );
}

#[test]
fn anchorage_to_oslo_long_path_option_produces_a_longer_circuit() {
    let engine = engine();
    let mut long_config = PredictConfig::default();
    long_config.long_path = true;

    let short = engine
        .predict(common::anchorage(), common::oslo(), 1, 6.0, 60.0, &[14.0], &PredictConfig::default())
        .unwrap();
    let long = engine
        .predict(common::anchorage(), common::oslo(), 1, 6.0, 60.0, &[14.0], &long_config)
        .unwrap();

    // Both runs must still produce one well-formed prediction; the long and
    // short paths are not required to both stay open, only to not panic.
    assert_eq!(short.len(), 1);
    assert_eq!(long.len(), 1);
}
