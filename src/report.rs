// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Text report rendering (§6 "Output tables"): one row per frequency with
//! MUF/FOT/HPF, the dominant mode, SNR median/deciles, reliability, and
//! delay. Column layout is not normative, only the numbers are -- this
//! mirrors the teacher's own `di_calibrate` summary tables in spirit, not
//! in byte-for-byte format.

use std::fmt::Write as _;

use crate::config::PredictConfig;
use crate::engine::Prediction;

/// Render a full report for one circuit's set of predictions.
pub fn render(predictions: &[Prediction], config: &PredictConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>8} {:>7} {:>7} {:>7} {:>8} {:>8} {:>8} {:>7} {:>8} {:>8}",
        "freq_MHz", "MUF", "FOT", "HPF", "mode", "SNR_dB", "snr10", "snr90", "reliab", "delay_ms"
    );
    let _ = writeln!(out, "{}", "-".repeat(88));

    for p in predictions {
        if p.is_closed() {
            let _ = writeln!(
                out,
                "{:>8.2} {:>7.2} {:>7.2} {:>7.2} {:>8} {:>8} {:>8} {:>7} {:>8} {:>8}",
                p.frequency_mhz, p.muf_info.muf, p.muf_info.fot, p.muf_info.hpf, "closed", "-", "-", "-", "0.00", "-"
            );
            continue;
        }
        let best = p.best_mode().expect("non-closed prediction has a best mode");
        let _ = writeln!(
            out,
            "{:>8.2} {:>7.2} {:>7.2} {:>7.2} {:>8} {:>8.1} {:>8.1} {:>7.1} {:>8.2} {:>8.2}",
            p.frequency_mhz,
            p.muf_info.muf,
            p.muf_info.fot,
            p.muf_info.hpf,
            best.label,
            p.combined.snr.median,
            p.combined.snr.lower,
            p.combined.snr.upper,
            p.combined.reliability,
            p.combined.delay_ms,
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "config: tx_power={:.1} dBW, required_snr={:.1} dB, bandwidth={:.0} Hz, noise_env={:?}",
        config.tx_power_dbw, config.required_snr_db, config.bandwidth_hz, config.noise_env
    );

    out
}

/// One-line summary per frequency, suitable for interactive log output.
pub fn render_line(p: &Prediction) -> String {
    if p.is_closed() {
        format!(
            "{:.2} MHz: closed (MUF {:.1})",
            p.frequency_mhz, p.muf_info.muf
        )
    } else {
        let best = p.best_mode().expect("non-closed prediction has a best mode");
        format!(
            "{:.2} MHz: {} reliability={:.2} snr={:.1}dB delay={:.2}ms",
            p.frequency_mhz, best.label, p.combined.reliability, p.combined.snr.median, p.combined.delay_ms
        )
    }
}
