// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding boxes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A box edge collapsed to zero length after transformation
    #[error("Degenerate box: {edge} edge has zero length")]
    DegenerateEdge { edge: &'static str },

    #[error("Reference frame matrix is not invertible")]
    SingularFrame,
}
