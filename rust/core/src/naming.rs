// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Naming conventions shared by the code generator and the material cache.
//!
//! - clip-aware variant of shader `X`: `BoxClip/X`
//! - baked shader: `Hidden/BoxClipBaked/<target>Inst/X`
//! - generated material for material `M`: `M BoxClip`

use nom::{
    bytes::complete::{tag, take_until},
    combinator::rest,
    sequence::{pair, preceded, terminated},
    IResult,
};

use crate::error::{Error, Result};

/// Prefix of every hand-ported clip-aware shader
pub const CLIP_VARIANT_PREFIX: &str = "BoxClip/";
/// Namespace of shaders produced by a bake
pub const BAKED_NAMESPACE: &str = "Hidden/BoxClipBaked/";
/// Separator between the target identity and the variant name
pub const INSTANCE_SEPARATOR: &str = "Inst/";
/// Suffix appended to the names of generated materials
pub const MANAGED_SUFFIX: &str = " BoxClip";

/// How a shader name relates to the clip conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderKind<'a> {
    /// Not clip-aware
    Plain,
    /// `BoxClip/<base>`, driven by uniforms
    ClipVariant { base: &'a str },
    /// Baked for `target`
    Baked(BakedName<'a>),
}

/// Components of a baked shader name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BakedName<'a> {
    pub target: &'a str,
    pub base: &'a str,
}

impl<'a> BakedName<'a> {
    /// Name of the clip variant this bake was produced from
    pub fn variant_name(&self) -> String {
        clip_variant_name(self.base)
    }

    pub fn is_for(&self, target: &str) -> bool {
        self.target == target
    }
}

/// Classify a shader name
pub fn classify(name: &str) -> ShaderKind<'_> {
    if let Ok(baked) = parse_baked_name(name) {
        return ShaderKind::Baked(baked);
    }
    match name.strip_prefix(CLIP_VARIANT_PREFIX) {
        Some(base) => ShaderKind::ClipVariant { base },
        None => ShaderKind::Plain,
    }
}

/// `BoxClip/<origin>`
pub fn clip_variant_name(origin: &str) -> String {
    format!("{}{}", CLIP_VARIANT_PREFIX, origin)
}

/// Strip the clip variant prefix, refusing names that do not carry it
pub fn strip_clip_prefix(name: &str) -> Result<&str> {
    name.strip_prefix(CLIP_VARIANT_PREFIX)
        .ok_or_else(|| Error::MissingPrefix {
            name: name.to_string(),
            prefix: CLIP_VARIANT_PREFIX,
        })
}

/// Baked name for the clip variant `variant` under `target`
pub fn baked_name(target: &str, variant: &str) -> Result<String> {
    let base = strip_clip_prefix(variant)?;
    Ok(format!(
        "{}{}{}{}",
        BAKED_NAMESPACE, target, INSTANCE_SEPARATOR, base
    ))
}

/// Prefix shared by every shader baked for `target`
pub fn baked_prefix(target: &str) -> String {
    format!("{}{}{}", BAKED_NAMESPACE, target, INSTANCE_SEPARATOR)
}

fn baked_components(input: &str) -> IResult<&str, (&str, &str)> {
    preceded(
        tag(BAKED_NAMESPACE),
        pair(terminated(take_until(INSTANCE_SEPARATOR), tag(INSTANCE_SEPARATOR)), rest),
    )(input)
}

/// Split a baked name into target identity and variant base name
pub fn parse_baked_name(name: &str) -> Result<BakedName<'_>> {
    match baked_components(name) {
        Ok((_, (target, base))) if !target.is_empty() && !base.is_empty() => {
            Ok(BakedName { target, base })
        }
        _ => Err(Error::MalformedBakedName(name.to_string())),
    }
}

/// Name of the generated material for `origin`
pub fn managed_material_name(origin: &str) -> String {
    format!("{}{}", origin, MANAGED_SUFFIX)
}

/// Recover an origin name from a generated material name
pub fn strip_managed_suffix(name: &str) -> Option<&str> {
    name.find(MANAGED_SUFFIX).map(|idx| &name[..idx])
}
