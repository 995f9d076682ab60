// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all hf_predict-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

/// The *only* publicly visible error from hf_predict.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HfError {
    /// Bad input caught before any compute begins: out-of-range coordinates,
    /// non-positive frequency, unknown noise environment, and so on.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// The coefficient store could not be built: a monthly blob is missing,
    /// the wrong size, or otherwise unrecognised.
    #[error("coefficient data error: {0}")]
    DataMissing(String),

    /// An I/O failure while reading coefficient files.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HfError {
    pub fn config<S: Into<String>>(s: S) -> Self {
        Self::ConfigInvalid(s.into())
    }

    pub fn data<S: Into<String>>(s: S) -> Self {
        Self::DataMissing(s.into())
    }
}
