// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for code generation
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while baking or unbaking shader source
#[derive(Error, Debug)]
pub enum Error {
    #[error("Shader name opened at byte {0} is never closed")]
    UnterminatedName(usize),

    /// The shader was baked for a different generation target
    #[error("Shader {name} was baked for target {baked_for}")]
    ForeignBakedArtifact { name: String, baked_for: String },

    /// No clip variant exists to restore a baked shader to
    #[error("No clip variant {variant} to restore {name} to")]
    MissingVariant { name: String, variant: String },

    /// Unbake was asked for something that is not a baked shader
    #[error("Shader {0} is not baked")]
    NotBaked(String),

    #[error("Required include not found: {0}")]
    MissingInclude(String),

    #[error(transparent)]
    Scan(#[from] boxclip_core::Error),

    #[error(transparent)]
    Assets(#[from] boxclip_assets::Error),
}
