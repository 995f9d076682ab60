// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Build-time metadata generated by `build.rs` via the `built` crate.

#![allow(dead_code, clippy::unreadable_literal)]
include!(concat!(env!("OUT_DIR"), "/built.rs"));

/// One-line build summary, e.g. `hf_predict 0.1.0 (abcdef1, 2026-07-28)`.
pub fn summary() -> String {
    let commit = GIT_COMMIT_HASH_SHORT.unwrap_or("unknown");
    format!("{} {} ({}, {})", PKG_NAME, PKG_VERSION, commit, BUILT_TIME_UTC)
}
