// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Committing baked shaders to the asset store, and reversing them.

use tracing::{debug, info, warn};

use boxclip_assets::{parent_dir, AssetStore, GenerationTarget, MaterialKey, ShaderKey, ShaderSet};
use boxclip_core::{classify, BatchReport, ShaderKind};

use crate::error::{Error, Result};
use crate::generator::{BakeRequest, CodeGenerator};

/// Includes every baked shader needs next to it
pub const INCLUDE_FILES: [&str; 2] = ["BoxClipTemplate.cginc", "BoxClipStandardShadow.cginc"];

fn join(dir: &str, file: &str) -> String {
    if dir.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", dir, file)
    }
}

fn repoint(store: &mut AssetStore, materials: &[MaterialKey], shader: ShaderKey) -> Result<()> {
    for &material in materials {
        store.set_shader_preserving_queue(material, shader)?;
    }
    Ok(())
}

impl CodeGenerator {
    /// Bake one clip variant and commit it to the generation directory.
    ///
    /// The baked text and both includes are produced before anything is
    /// written, so a failure leaves the store untouched.
    pub fn bake_shader(
        &self,
        store: &mut AssetStore,
        target: &GenerationTarget,
        shader: ShaderKey,
        request: &BakeRequest<'_>,
    ) -> Result<ShaderKey> {
        let data = store.shader(shader)?;
        let baked = self.bake_source(&data.source, request)?;
        let baked_name = self.declared_name(&baked)?;

        let source_dir = parent_dir(&data.path);
        let includes = INCLUDE_FILES
            .iter()
            .map(|file| {
                let path = join(source_dir, file);
                store
                    .read_document(&path)
                    .map(|text| (*file, text.to_string()))
                    .ok_or(Error::MissingInclude(path))
            })
            .collect::<Result<Vec<_>>>()?;

        let path = store.generate_unique_path(&join(
            &target.directory,
            &format!("{}.shader", data.name.replace('/', "-")),
        ));

        for (file, text) in includes {
            store.write_document(join(&target.directory, file), text);
        }
        debug!(name = %baked_name, path = %path, "Committed baked shader");
        Ok(store.add_shader(baked_name, path, baked))
    }

    /// Bake every clip variant in `shaders` once and repoint its materials.
    ///
    /// Shaders that are not `BoxClip/` variants are left alone.
    pub fn bake_all(
        &self,
        store: &mut AssetStore,
        target: &GenerationTarget,
        shaders: &ShaderSet,
        request: &BakeRequest<'_>,
    ) -> BatchReport<ShaderKey, Error> {
        let mut report = BatchReport::new();

        for (shader, materials) in shaders.iter() {
            let is_variant = store
                .shader(shader)
                .map_or(false, |s| matches!(classify(&s.name), ShaderKind::ClipVariant { .. }));
            if !is_variant {
                continue;
            }

            let outcome = self
                .bake_shader(store, target, shader, request)
                .and_then(|baked| repoint(store, materials, baked));
            match outcome {
                Ok(()) => report.complete(shader),
                Err(e) => {
                    warn!(error = %e, "Failed to bake shader");
                    report.fail(shader, e);
                }
            }
        }

        info!(
            baked = report.completed.len(),
            failed = report.failed.len(),
            "Baked shaders"
        );
        report
    }

    /// Restore every baked shader in `shaders` to its clip variant.
    ///
    /// Materials are repointed and generated shaders removed once nothing
    /// references them. Shaders baked for another target, or whose variant
    /// no longer exists, are skipped and kept.
    pub fn unbake_all(
        &self,
        store: &mut AssetStore,
        target: &GenerationTarget,
        shaders: &ShaderSet,
    ) -> BatchReport<ShaderKey, Error> {
        let mut report = BatchReport::new();

        for (shader, materials) in shaders.iter() {
            let (name, path) = match store.shader(shader) {
                Ok(s) => (s.name.clone(), s.path.clone()),
                Err(e) => {
                    report.fail(shader, e.into());
                    continue;
                }
            };
            let ShaderKind::Baked(baked) = classify(&name) else {
                continue;
            };

            if !baked.is_for(&target.identity) {
                warn!(shader = %name, baked_for = baked.target, "Shader was baked for a different target");
                report.skip(
                    shader,
                    Error::ForeignBakedArtifact {
                        name: name.clone(),
                        baked_for: baked.target.to_string(),
                    },
                );
                continue;
            }

            let variant = baked.variant_name();
            let Some(restored) = store.find_shader(&variant) else {
                warn!(shader = %name, variant = %variant, "Clip variant not found, keeping baked shader");
                report.skip(
                    shader,
                    Error::MissingVariant {
                        name: name.clone(),
                        variant,
                    },
                );
                continue;
            };

            let outcome = repoint(store, materials, restored).and_then(|()| {
                if !target.owns(&path) {
                    return Ok(());
                }
                let remaining = store.shader_users(shader).len();
                if remaining > 0 {
                    debug!(shader = %name, remaining, "Baked shader still in use, keeping it");
                } else {
                    store.remove_shader(shader)?;
                }
                Ok(())
            });
            match outcome {
                Ok(()) => report.complete(shader),
                Err(e) => {
                    warn!(shader = %name, error = %e, "Failed to unbake shader");
                    report.fail(shader, e);
                }
            }
        }

        info!(
            unbaked = report.completed.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Unbaked shaders"
        );
        report
    }
}
