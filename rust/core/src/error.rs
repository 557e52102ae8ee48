// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for scanning and naming operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while scanning source text or decoding names
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Scanner exhausted after {iterations} iterations looking for {literal:?}")]
    ScannerExhausted { literal: String, iterations: usize },

    #[error("Literal {0:?} not found outside comments")]
    LiteralNotFound(String),

    #[error("Unterminated block comment opened at byte {0}")]
    UnterminatedComment(usize),

    #[error("Name {name:?} does not start with {prefix:?}")]
    MissingPrefix { name: String, prefix: &'static str },

    #[error("Malformed baked shader name: {0}")]
    MalformedBakedName(String),
}
