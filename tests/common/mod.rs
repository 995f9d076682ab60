// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Shared fixtures for the integration test binaries.
//!
//! `CoeffStore::load` requires real CCIR/URSI blobs, which this repo does
//! not bundle, so every integration test works against a synthetic but
//! well-formed set of twelve monthly blobs written to a temp directory.
//! The shapes and scale of the synthetic coefficients are chosen only to
//! keep the evaluator well inside double-precision range, not to be
//! physically meaningful -- these tests exercise the pipeline's wiring and
//! invariants, not its prediction against real ionospheric data.

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

use hf_predict::geo::GeoPoint;

const LEGENDRE_ORDERS: usize = 13;
const FOURIER_TERMS: usize = 76;
const SSN_LEVELS: usize = 2;
const COMPONENTS: usize = 2;
const FIXED_COEFF_LEN: usize = 28;

const M3000_LEN: usize = LEGENDRE_ORDERS * FOURIER_TERMS * SSN_LEVELS * COMPONENTS;
const FO_F2_LEN: usize = SSN_LEVELS * LEGENDRE_ORDERS * FOURIER_TERMS * COMPONENTS;
const MONTH_FILE_FLOATS: usize = M3000_LEN + FO_F2_LEN + 3 * FIXED_COEFF_LEN;

/// Write a deterministic, well-formed set of twelve `month_NN.bin` blobs to
/// `dir`, matching the fixed big-endian layout the coefficient loader
/// expects.
pub fn write_fixture_months(dir: &Path) {
    for month in 1..=12u32 {
        let path = dir.join(format!("month_{month:02}.bin"));
        let mut f = File::create(&path).unwrap();
        let mut buf = Vec::with_capacity(MONTH_FILE_FLOATS * 4);
        let mut write_f32 = |buf: &mut Vec<u8>, v: f32| buf.extend_from_slice(&v.to_be_bytes());

        for i in 0..M3000_LEN {
            let v = 12.0 + 0.3 * ((i % 7) as f32) - (month as f32) * 0.02;
            write_f32(&mut buf, v);
        }
        for i in 0..FO_F2_LEN {
            let v = 8.0 + 0.2 * ((i % 5) as f32) + (month as f32) * 0.05;
            write_f32(&mut buf, v);
        }
        for i in 0..FIXED_COEFF_LEN {
            write_f32(&mut buf, 1.0 + 0.1 * (i as f32));
        }
        for i in 0..FIXED_COEFF_LEN {
            write_f32(&mut buf, 0.2 + 0.01 * (i as f32));
        }
        for i in 0..FIXED_COEFF_LEN {
            write_f32(&mut buf, 0.15 + 0.01 * (i as f32));
        }
        f.write_all(&buf).unwrap();
    }
}

pub fn philadelphia() -> GeoPoint {
    GeoPoint::new_degrees(39.95, -75.17).unwrap()
}
pub fn boston() -> GeoPoint {
    GeoPoint::new_degrees(42.36, -71.06).unwrap()
}
pub fn london() -> GeoPoint {
    GeoPoint::new_degrees(51.51, -0.13).unwrap()
}
pub fn halifax() -> GeoPoint {
    GeoPoint::new_degrees(44.65, -63.57).unwrap()
}
pub fn tokyo() -> GeoPoint {
    GeoPoint::new_degrees(35.68, 139.69).unwrap()
}
pub fn tangier() -> GeoPoint {
    GeoPoint::new_degrees(35.76, -5.83).unwrap()
}
pub fn belgrade() -> GeoPoint {
    GeoPoint::new_degrees(44.79, 20.45).unwrap()
}
pub fn anchorage() -> GeoPoint {
    GeoPoint::new_degrees(61.22, -149.90).unwrap()
}
pub fn oslo() -> GeoPoint {
    GeoPoint::new_degrees(59.91, 10.75).unwrap()
}
pub fn singapore() -> GeoPoint {
    GeoPoint::new_degrees(1.35, 103.82).unwrap()
}
pub fn sao_paulo() -> GeoPoint {
    GeoPoint::new_degrees(-23.55, -46.63).unwrap()
}
