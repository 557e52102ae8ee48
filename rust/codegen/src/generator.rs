// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Text-level bake and unbake.
//!
//! Baking renames `Shader "BoxClip/X"` to
//! `Shader "Hidden/BoxClipBaked/<target>Inst/X"` and splices the preamble in
//! right after the body brace. Everything else in the source is kept byte for
//! byte, so unbaking is the exact inverse.

use memchr::memmem;

use boxclip_core::{baked_name, baked_prefix, classify, parse_baked_name, ShaderKind};
use boxclip_core::DEFAULT_ITERATION_LIMIT;
use boxclip_geometry::CategorySet;

use crate::declaration::Declaration;
use crate::error::{Error, Result};
use crate::preamble::{write_preamble, PREAMBLE_CLOSE, PREAMBLE_OPEN};

/// Constants baked into one shader
#[derive(Debug, Clone, Copy)]
pub struct BakeRequest<'a> {
    /// Identity of the generation target the bake belongs to
    pub target_identity: &'a str,
    pub scale: f32,
    pub allow_in_front: f32,
    pub categories: &'a CategorySet,
}

impl<'a> BakeRequest<'a> {
    pub fn new(target_identity: &'a str, categories: &'a CategorySet) -> Self {
        Self {
            target_identity,
            scale: 1.0,
            allow_in_front: 0.0,
            categories,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_allow_in_front(mut self, allow_in_front: f32) -> Self {
        self.allow_in_front = allow_in_front;
        self
    }
}

/// Shader source generator
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    iteration_limit: usize,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self::with_iteration_limit(DEFAULT_ITERATION_LIMIT)
    }

    /// Bound the comment-skipping scanner
    pub fn with_iteration_limit(iteration_limit: usize) -> Self {
        Self { iteration_limit }
    }

    pub fn iteration_limit(&self) -> usize {
        self.iteration_limit
    }

    /// The name in the first uncommented `Shader "..."` declaration
    pub fn declared_name(&self, source: &str) -> Result<String> {
        let decl = Declaration::locate(source, self.iteration_limit)?;
        Ok(decl.name(source).to_string())
    }

    /// Bake `request` into `source`.
    ///
    /// Source already baked for the same target is returned unchanged.
    pub fn bake_source(&self, source: &str, request: &BakeRequest<'_>) -> Result<String> {
        let decl = Declaration::locate(source, self.iteration_limit)?;
        let name = decl.name(source);

        if name.starts_with(&baked_prefix(request.target_identity)) {
            return Ok(source.to_string());
        }
        if let ShaderKind::Baked(baked) = classify(name) {
            return Err(Error::ForeignBakedArtifact {
                name: name.to_string(),
                baked_for: baked.target.to_string(),
            });
        }
        let new_name = baked_name(request.target_identity, name)?;

        let mut out = String::with_capacity(source.len() + 8 * 1024);
        out.push_str(&source[..decl.name_start]);
        out.push_str(&new_name);
        out.push_str(&source[decl.name_end..=decl.brace]);
        write_preamble(
            &mut out,
            request.scale,
            request.allow_in_front,
            request.categories,
        );
        out.push_str(decl.body(source));
        Ok(out)
    }

    /// Reverse [`bake_source`](Self::bake_source) for `target_identity`.
    pub fn unbake_source(&self, source: &str, target_identity: &str) -> Result<String> {
        let decl = Declaration::locate(source, self.iteration_limit)?;
        let name = decl.name(source);
        let baked = parse_baked_name(name).map_err(|_| Error::NotBaked(name.to_string()))?;
        if !baked.is_for(target_identity) {
            return Err(Error::ForeignBakedArtifact {
                name: name.to_string(),
                baked_for: baked.target.to_string(),
            });
        }

        let body = strip_preamble(decl.body(source));
        let mut out = String::with_capacity(source.len());
        out.push_str(&source[..decl.name_start]);
        out.push_str(&baked.variant_name());
        out.push_str(&source[decl.name_end..=decl.brace]);
        out.push_str(body);
        Ok(out)
    }

    /// Clip variant name a baked source was produced from
    pub fn unbaked_name(&self, source: &str) -> Result<String> {
        let decl = Declaration::locate(source, self.iteration_limit)?;
        let name = decl.name(source);
        parse_baked_name(name)
            .map(|baked| baked.variant_name())
            .map_err(|_| Error::NotBaked(name.to_string()))
    }

    /// Generation target a baked source belongs to
    pub fn baked_target(&self, source: &str) -> Result<String> {
        let decl = Declaration::locate(source, self.iteration_limit)?;
        let name = decl.name(source);
        parse_baked_name(name)
            .map(|baked| baked.target.to_string())
            .map_err(|_| Error::NotBaked(name.to_string()))
    }
}

fn strip_preamble(body: &str) -> &str {
    if !body.starts_with(PREAMBLE_OPEN) {
        return body;
    }
    match memmem::find(body.as_bytes(), PREAMBLE_CLOSE.as_bytes()) {
        Some(end) => &body[end + PREAMBLE_CLOSE.len()..],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxclip_core::format_float;
    use boxclip_geometry::{Category, ClipQuad, Vector4};

    const TEMPLATE: &str = "// Shader \"BoxClip/Old\"\n\
        Shader \"BoxClip/Standard\"\n{\n    Properties { _Color (\"Color\", Color) = (1,1,1,1) }\n    SubShader { Pass { } }\n}\n";

    fn categories() -> CategorySet {
        let mut set = CategorySet::new();
        set.get_mut(Category::ClipShow).push(ClipQuad {
            position: Vector4::new(0.5, -0.5, 0.0, 1.0),
            normal: Vector4::new(0.0, 0.0, 1.0, 0.001),
            edge_ba: Vector4::new(0.0, 1.0, 0.0, 1.0),
            edge_da: Vector4::new(-1.0, 0.0, 0.0, 1.0),
        });
        set
    }

    #[test]
    fn bake_renames_and_splices() {
        let set = categories();
        let request = BakeRequest::new("0a1b", &set).with_scale(1.5);
        let gen = CodeGenerator::new();
        let baked = gen.bake_source(TEMPLATE, &request).unwrap();

        assert!(baked.starts_with("// Shader \"BoxClip/Old\"\n"));
        assert_eq!(
            gen.declared_name(&baked).unwrap(),
            "Hidden/BoxClipBaked/0a1bInst/Standard"
        );
        assert!(baked.contains("\"\n{\nCGINCLUDE\n"));
        assert!(baked.contains(&format!("#define BOXCLIP_SCALE {}\n", format_float(1.5))));
        assert!(baked.contains("#define boxQuad_ClipShow_Count 1\n"));
        assert!(baked.contains("\nENDCG\n\n    Properties"));
    }

    #[test]
    fn bake_is_idempotent() {
        let set = categories();
        let request = BakeRequest::new("0a1b", &set);
        let gen = CodeGenerator::new();
        let once = gen.bake_source(TEMPLATE, &request).unwrap();
        let twice = gen.bake_source(&once, &request).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn unbake_is_exact_inverse() {
        let set = categories();
        let gen = CodeGenerator::new();
        let baked = gen
            .bake_source(TEMPLATE, &BakeRequest::new("0a1b", &set))
            .unwrap();
        assert_eq!(gen.unbaked_name(&baked).unwrap(), "BoxClip/Standard");
        assert_eq!(gen.baked_target(&baked).unwrap(), "0a1b");
        assert_eq!(gen.unbake_source(&baked, "0a1b").unwrap(), TEMPLATE);
    }

    #[test]
    fn foreign_targets_are_refused() {
        let set = categories();
        let gen = CodeGenerator::new();
        let baked = gen
            .bake_source(TEMPLATE, &BakeRequest::new("0a1b", &set))
            .unwrap();

        assert!(matches!(
            gen.bake_source(&baked, &BakeRequest::new("ffff", &set)),
            Err(Error::ForeignBakedArtifact { ref baked_for, .. }) if baked_for == "0a1b"
        ));
        assert!(matches!(
            gen.unbake_source(&baked, "ffff"),
            Err(Error::ForeignBakedArtifact { .. })
        ));
    }

    #[test]
    fn plain_shaders_are_rejected() {
        let set = CategorySet::new();
        let gen = CodeGenerator::new();
        let plain = "Shader \"Standard\" { }";
        assert!(matches!(
            gen.bake_source(plain, &BakeRequest::new("0a1b", &set)),
            Err(Error::Scan(boxclip_core::Error::MissingPrefix { .. }))
        ));
        assert!(matches!(
            gen.unbake_source(plain, "0a1b"),
            Err(Error::NotBaked(_))
        ));
    }

    #[test]
    fn unbake_without_preamble_only_renames() {
        let gen = CodeGenerator::new();
        let source = "Shader \"Hidden/BoxClipBaked/0a1bInst/Unlit\" { Pass {} }";
        assert_eq!(
            gen.unbake_source(source, "0a1b").unwrap(),
            "Shader \"BoxClip/Unlit\" { Pass {} }"
        );
    }

    #[test]
    fn scanner_limit_applies() {
        let set = CategorySet::new();
        let gen = CodeGenerator::with_iteration_limit(1);
        let source = "/* a */ /* b */ Shader \"BoxClip/X\" {}";
        assert!(matches!(
            gen.bake_source(source, &BakeRequest::new("0a1b", &set)),
            Err(Error::Scan(boxclip_core::Error::ScannerExhausted { .. }))
        ));
    }
}
