// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Captures build/version metadata (crate version, target triple, git
//! commit, build timestamp) into `OUT_DIR/built.rs` so the CLI can log it
//! at startup without shelling out to `git` at runtime.

fn main() {
    built::write_built_file().expect("failed to acquire build-time information");
}
