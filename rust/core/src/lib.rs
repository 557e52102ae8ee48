// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # BoxClip Core
//!
//! Text-level building blocks shared by the BoxClip crates:
//!
//! - **Source scanning**: comment-aware literal search used to find splice
//!   points (`Shader "Name" {`) in shader templates, built on
//!   [memchr](https://docs.rs/memchr)
//! - **Number formatting**: locale-independent float literals via
//!   [lexical-core](https://docs.rs/lexical-core)
//! - **Naming conventions**: clip variant, baked and generated-material names,
//!   parsed with [nom](https://docs.rs/nom)
//! - **Batch reports**: per-item outcomes for partial-failure tolerant batches
//!
//! ## Quick Start
//!
//! ```rust
//! use boxclip_core::{SourceScanner, format_float};
//!
//! let source = "// Shader \"Old\"\nShader \"BoxClip/Standard\" { }";
//! let scanner = SourceScanner::new(source);
//! let pos = scanner.find("Shader", 0).unwrap().unwrap();
//! assert!(source[pos..].starts_with("Shader \"BoxClip"));
//!
//! assert_eq!(format_float(1.5), "1.5");
//! assert_eq!(format_float(f32::NAN), "0");
//! ```

pub mod batch;
pub mod error;
pub mod format;
pub mod naming;
pub mod scanner;

pub use batch::BatchReport;
pub use error::{Error, Result};
pub use format::{format_float, write_float, write_float4};
pub use naming::{
    baked_name, baked_prefix, classify, clip_variant_name, managed_material_name,
    parse_baked_name, strip_clip_prefix, strip_managed_suffix, BakedName, ShaderKind,
    BAKED_NAMESPACE, CLIP_VARIANT_PREFIX, INSTANCE_SEPARATOR, MANAGED_SUFFIX,
};
pub use scanner::{SourceScanner, DEFAULT_ITERATION_LIMIT};
