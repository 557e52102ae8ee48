// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # BoxClip Codegen
//!
//! Bakes evaluated clip quads into a copy of a `BoxClip/` shader so it no
//! longer depends on per-renderer uniforms, and reverses the bake.
//!
//! ```rust
//! use boxclip_codegen::{BakeRequest, CodeGenerator};
//! use boxclip_geometry::CategorySet;
//!
//! let template = "Shader \"BoxClip/Unlit\" { SubShader { } }";
//! let categories = CategorySet::new();
//! let gen = CodeGenerator::new();
//!
//! let baked = gen
//!     .bake_source(template, &BakeRequest::new("3f2a", &categories))
//!     .unwrap();
//! assert!(baked.starts_with("Shader \"Hidden/BoxClipBaked/3f2aInst/Unlit\" {"));
//! assert_eq!(gen.unbake_source(&baked, "3f2a").unwrap(), template);
//! ```

pub mod artifacts;
pub mod declaration;
pub mod error;
pub mod generator;
pub mod preamble;

pub use artifacts::INCLUDE_FILES;
pub use declaration::Declaration;
pub use error::{Error, Result};
pub use generator::{BakeRequest, CodeGenerator};
pub use preamble::{write_preamble, PREAMBLE_CLOSE, PREAMBLE_OPEN};
