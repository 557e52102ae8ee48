// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

use boxclip_core::DEFAULT_ITERATION_LIMIT;

/// CLI configuration. Command-line flags take precedence.
#[derive(Debug, Clone)]
pub struct Config {
    /// Target identity to bake for instead of the generated folder's own.
    pub target_id: Option<String>,
    /// Directory baked shaders and includes are written to.
    pub generated_dir: String,
    /// Comment-skip limit of the source scanner.
    pub scan_limit: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            target_id: std::env::var("BOXCLIP_TARGET_ID")
                .ok()
                .filter(|id| !id.is_empty()),
            generated_dir: std::env::var("BOXCLIP_GENERATED_DIR")
                .unwrap_or_else(|_| "Generated".into()),
            scan_limit: std::env::var("BOXCLIP_SCAN_LIMIT")
                .unwrap_or_else(|_| DEFAULT_ITERATION_LIMIT.to_string())
                .parse()
                .unwrap_or(DEFAULT_ITERATION_LIMIT),
        }
    }
}
