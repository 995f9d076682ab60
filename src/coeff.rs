// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The coefficient store (§4.A): loads, at initialization, twelve monthly
//! binary blobs of Fourier-series coefficients (CCIR/URSI foF2 and
//! M(3000)F2 maps, plus a fixed block of atmospheric-noise maps) and
//! retains them in memory for the lifetime of the engine.
//!
//! The binary layout is fixed big-endian `f32` and MUST be reproduced
//! exactly: `{ m3000: f32[13*76*2*2], fo_f2: f32[2*13*76*2], fixed: f32[3*FIXED_COEFF_LEN] }`.

use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, warn};
use ndarray::Array4;

use crate::constants::{NUM_MONTHS, SSN_MAX, SSN_MIN};
use crate::error::HfError;

pub const LEGENDRE_ORDERS: usize = 13;
pub const FOURIER_TERMS: usize = 76;
pub const SSN_LEVELS: usize = 2;
pub const COMPONENTS: usize = 2;

pub const M3000_LEN: usize = LEGENDRE_ORDERS * FOURIER_TERMS * SSN_LEVELS * COMPONENTS;
pub const FO_F2_LEN: usize = SSN_LEVELS * LEGENDRE_ORDERS * FOURIER_TERMS * COMPONENTS;

/// Number of Legendre coefficients in each of the three fixed maps
/// (atmospheric noise median, upper-decile scale, lower-decile scale).
pub const FIXED_COEFF_LEN: usize = 28;

pub const MONTH_FILE_FLOATS: usize = M3000_LEN + FO_F2_LEN + 3 * FIXED_COEFF_LEN;
pub const MONTH_FILE_BYTES: usize = MONTH_FILE_FLOATS * 4;

/// Which variable (SSN- and hour-dependent) quantity to evaluate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarMapKind {
    FoF2,
    M3000F2,
}

/// Which fixed (time-of-year/hour, position only) quantity to evaluate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FixedMapKind {
    AtmosphericNoiseMedian,
    AtmosphericNoiseFdu,
    AtmosphericNoiseFdl,
}

/// One month's worth of coefficients.
#[derive(Clone, Debug)]
pub struct MonthlyCoeffs {
    pub month: u32,
    /// M(3000)F2 coefficients, shape `[orders, terms, ssn_level, component]`.
    pub m3000: Array4<f32>,
    /// foF2 coefficients, shape `[ssn_level, orders, terms, component]`.
    pub fo_f2: Array4<f32>,
    pub fixed_median: Vec<f32>,
    pub fixed_fdu: Vec<f32>,
    pub fixed_fdl: Vec<f32>,
}

impl MonthlyCoeffs {
    fn parse(month: u32, bytes: &[u8]) -> Result<Self, HfError> {
        if bytes.len() != MONTH_FILE_BYTES {
            return Err(HfError::data(format!(
                "month {month} coefficient blob has {} bytes, expected {MONTH_FILE_BYTES}",
                bytes.len()
            )));
        }

        let mut cursor = std::io::Cursor::new(bytes);
        let mut read_f32 = || -> Result<f32, HfError> {
            cursor
                .read_f32::<BigEndian>()
                .map_err(|e| HfError::data(format!("short read in month {month} blob: {e}")))
        };

        let mut m3000_raw = Vec::with_capacity(M3000_LEN);
        for _ in 0..M3000_LEN {
            m3000_raw.push(read_f32()?);
        }
        let m3000 = Array4::from_shape_vec(
            (LEGENDRE_ORDERS, FOURIER_TERMS, SSN_LEVELS, COMPONENTS),
            m3000_raw,
        )
        .map_err(|e| HfError::data(format!("bad m3000 shape for month {month}: {e}")))?;

        let mut fo_f2_raw = Vec::with_capacity(FO_F2_LEN);
        for _ in 0..FO_F2_LEN {
            fo_f2_raw.push(read_f32()?);
        }
        let fo_f2 = Array4::from_shape_vec(
            (SSN_LEVELS, LEGENDRE_ORDERS, FOURIER_TERMS, COMPONENTS),
            fo_f2_raw,
        )
        .map_err(|e| HfError::data(format!("bad fo_f2 shape for month {month}: {e}")))?;

        let mut read_fixed = || -> Result<Vec<f32>, HfError> {
            let mut v = Vec::with_capacity(FIXED_COEFF_LEN);
            for _ in 0..FIXED_COEFF_LEN {
                v.push(read_f32()?);
            }
            Ok(v)
        };
        let fixed_median = read_fixed()?;
        let fixed_fdu = read_fixed()?;
        let fixed_fdl = read_fixed()?;

        Ok(Self {
            month,
            m3000,
            fo_f2,
            fixed_median,
            fixed_fdu,
            fixed_fdl,
        })
    }
}

/// Process-wide, read-only after construction (§3 Ownership, §5 Shared
/// resource policy). Holds all twelve monthly coefficient sets.
pub struct CoeffStore {
    months: Vec<MonthlyCoeffs>,
}

impl CoeffStore {
    /// Load all twelve monthly blobs from `dir`, named `month_01.bin` ..
    /// `month_12.bin`. Any missing or corrupt file is fatal (§4.A, §7
    /// DataMissing).
    pub fn load(dir: &Path) -> Result<Self, HfError> {
        let mut months = Vec::with_capacity(NUM_MONTHS);
        for m in 1..=NUM_MONTHS as u32 {
            months.push(Self::load_month(dir, m)?);
        }
        debug!("coefficient store loaded: {} monthly blobs", months.len());
        Ok(Self { months })
    }

    fn load_month(dir: &Path, month: u32) -> Result<MonthlyCoeffs, HfError> {
        let path = Self::month_path(dir, month);
        let bytes = std::fs::read(&path).map_err(|source| HfError::Io {
            path: path.clone(),
            source,
        })?;
        MonthlyCoeffs::parse(month, &bytes)
    }

    fn month_path(dir: &Path, month: u32) -> PathBuf {
        dir.join(format!("month_{month:02}.bin"))
    }

    pub fn month(&self, month: u32) -> &MonthlyCoeffs {
        &self.months[(month.clamp(1, 12) - 1) as usize]
    }

    /// Clamp an out-of-range sunspot number into `[0, 300]`, warning as
    /// documented in §4.A.
    pub fn clamp_ssn(ssn: f64) -> f64 {
        if !(SSN_MIN..=SSN_MAX).contains(&ssn) {
            warn!("sunspot number {ssn} out of range, clamping to [{SSN_MIN}, {SSN_MAX}]");
        }
        ssn.clamp(SSN_MIN, SSN_MAX)
    }
}
