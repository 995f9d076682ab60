// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Decile-triple algebra.
//!
//! Every quantity subject to day-to-day ionospheric variability is carried
//! as a `TripleValue { median, lower, upper }`, where `lower`/`upper` are
//! *non-negative deviations* from the median (not absolute levels). This
//! lets the noise/signal/MUF composition in the propagation engine be
//! expressed as algebra on triples instead of scattered indexing.

use crate::constants::NORM_DECILE;

/// A decile triple: `median` plus the lower-10% and upper-10% deviations
/// from it. `lower` and `upper` are always `>= 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TripleValue {
    pub median: f64,
    pub lower: f64,
    pub upper: f64,
}

impl TripleValue {
    pub fn new(median: f64, lower: f64, upper: f64) -> Self {
        debug_assert!(lower >= 0.0, "lower decile deviation must be non-negative");
        debug_assert!(upper >= 0.0, "upper decile deviation must be non-negative");
        Self {
            median,
            lower: lower.max(0.0),
            upper: upper.max(0.0),
        }
    }

    /// A triple with no spread at all (deterministic quantity).
    pub fn constant(value: f64) -> Self {
        Self {
            median: value,
            lower: 0.0,
            upper: 0.0,
        }
    }

    /// Build a triple from a median and a sigma, using the normal-decile
    /// constant (§4.D). `sigma` is a fractional spread about the median.
    pub fn from_sigma(median: f64, sigma: f64) -> Self {
        let f = 1.0 + sigma * NORM_DECILE;
        Self::new(median, median * (1.0 - 1.0 / f), median * (f - 1.0))
    }

    /// `(1-decile, 9-decile)` absolute values (not deviations).
    pub fn p10(&self) -> f64 {
        self.median - self.lower
    }

    pub fn p90(&self) -> f64 {
        self.median + self.upper
    }

    /// Scale all three components by a constant (e.g. unit conversion).
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(
            self.median * factor,
            self.lower * factor.abs(),
            self.upper * factor.abs(),
        )
    }

    /// Shift the median by an additive offset in log/dB-space, leaving the
    /// deviations unchanged (adding a deterministic loss/gain term).
    pub fn shift_db(&self, delta_db: f64) -> Self {
        Self::new(self.median + delta_db, self.lower, self.upper)
    }

    /// Sum two decile triples that are independent power quantities
    /// expressed in dB: converts to linear power, sums, converts back.
    /// Deviations combine in quadrature in the linear domain, which is the
    /// standard treatment for independent log-normal contributions.
    pub fn sum_power_db(&self, other: &Self) -> Self {
        let a = 10f64.powf(self.median / 10.0);
        let b = 10f64.powf(other.median / 10.0);
        let total = a + b;
        let median_db = 10.0 * total.log10();

        // Propagate fractional deviations in linear power, then convert the
        // resulting absolute spread back to a dB deviation about the new
        // median.
        let lower_lin = (a * (1.0 - (-self.lower / 10.0 * std::f64::consts::LN_10).exp())).powi(2)
            + (b * (1.0 - (-other.lower / 10.0 * std::f64::consts::LN_10).exp())).powi(2);
        let upper_lin = (a * ((self.upper / 10.0 * std::f64::consts::LN_10).exp() - 1.0)).powi(2)
            + (b * ((other.upper / 10.0 * std::f64::consts::LN_10).exp() - 1.0)).powi(2);
        let lower_abs = lower_lin.sqrt();
        let upper_abs = upper_lin.sqrt();

        let lower_db = median_db - 10.0 * (total - lower_abs).max(1e-300).log10();
        let upper_db = 10.0 * (total + upper_abs).log10() - median_db;

        Self::new(median_db, lower_db, upper_db)
    }
}
