// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for asset operations.

use crate::keys::{MaterialKey, ShaderKey};

/// Result type alias for asset operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while managing assets.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("material not found: {0:?}")]
    MaterialNotFound(MaterialKey),

    #[error("shader not found: {0:?}")]
    ShaderNotFound(ShaderKey),

    /// The origin material has no stable identity in the store.
    #[error("unable to look up identity for material {material}")]
    IdentityLookupFailure { material: String },

    /// A generated material carries no provenance tags.
    #[error("material {material} has no provenance tags")]
    UnresolvedProvenance { material: String },

    /// Provenance tags point at nothing that still exists.
    #[error("origin of material {material} not found (identity {origin_guid})")]
    OriginNotFound {
        material: String,
        origin_guid: String,
    },

    /// Shader normalization only applies to generated materials.
    #[error("material {material} must be managed to change its shader")]
    NotManaged { material: String },

    /// The generated directory is not registered as a folder.
    #[error("generation directory not found: {0}")]
    MissingGenerationDirectory(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
