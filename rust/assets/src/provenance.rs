// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Create-or-reuse cache of generated materials.
//!
//! A generated ("managed") material lives in the generation directory and
//! records its origin in two tags. The tags are the only index: reuse looks
//! for a generated material tagged with the origin's identity, and reversal
//! resolves the tagged identity back to the origin. Built-in origins cannot
//! be enumerated by path, so they are remembered in a side list kept in the
//! store (and its snapshot) and resolved by name.

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use boxclip_core::{classify, clip_variant_name, managed_material_name, strip_managed_suffix};
use boxclip_core::{BatchReport, ShaderKind};

use crate::error::{Error, Result};
use crate::keys::{MaterialKey, ShaderKey};
use crate::store::{is_listable, is_under, AssetStore, MaterialData};
use crate::tags::Provenance;

/// Directory generated artifacts are written to, with its identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTarget {
    pub directory: String,
    pub identity: String,
}

impl GenerationTarget {
    /// Resolve a registered folder; its identity keys baked artifacts
    pub fn resolve(store: &AssetStore, directory: &str) -> Result<Self> {
        if !store.has_folder(directory) {
            return Err(Error::MissingGenerationDirectory(directory.to_string()));
        }
        let identity = store
            .asset_guid(directory)
            .ok_or_else(|| Error::MissingGenerationDirectory(directory.to_string()))?;
        Ok(Self {
            directory: directory.to_string(),
            identity,
        })
    }

    /// True when `path` is inside the generation directory
    pub fn owns(&self, path: &str) -> bool {
        is_under(path, &self.directory)
    }
}

/// How a generated material's shader was normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderOutcome {
    /// Already a clip variant or a generated shader
    AlreadyClipAware,
    /// Swapped to the clip variant
    Swapped { from: ShaderKey, to: ShaderKey },
    /// Baked for a different target; left alone
    ForeignBaked,
    /// No `BoxClip/` variant exists; left alone
    MissingVariant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManageStatus {
    AlreadyManaged,
    Created,
    Reused,
}

/// Result of [`ProvenanceCache::manage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Managed {
    pub material: MaterialKey,
    pub status: ManageStatus,
    pub shader: Option<ShaderOutcome>,
}

/// Materials split by whether they are generated
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaterialPartition {
    pub managed: Vec<MaterialKey>,
    pub unmanaged: Vec<MaterialKey>,
}

/// Batch outcome plus the origin → replacement map used to repoint users
#[derive(Debug)]
pub struct BatchResult {
    pub report: BatchReport<MaterialKey, Error>,
    pub replacements: FxHashMap<MaterialKey, MaterialKey>,
}

/// Provenance-tagged material cache for one generation target
#[derive(Debug, Clone)]
pub struct ProvenanceCache {
    target: GenerationTarget,
}

impl ProvenanceCache {
    pub fn new(target: GenerationTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &GenerationTarget {
        &self.target
    }

    pub fn is_managed(&self, store: &AssetStore, material: MaterialKey) -> Result<bool> {
        Ok(self.target.owns(&store.material(material)?.path))
    }

    /// A generated shader, a bake for this target, or a `BoxClip/` variant
    pub fn is_clip_aware(&self, store: &AssetStore, shader: ShaderKey) -> Result<bool> {
        let data = store.shader(shader)?;
        if self.target.owns(&data.path) {
            return Ok(true);
        }
        Ok(match classify(&data.name) {
            ShaderKind::ClipVariant { .. } => true,
            ShaderKind::Baked(baked) => baked.is_for(&self.target.identity),
            ShaderKind::Plain => false,
        })
    }

    /// Split materials into generated and origin materials, first-seen order
    pub fn partition(&self, store: &AssetStore, materials: &[MaterialKey]) -> Result<MaterialPartition> {
        let mut partition = MaterialPartition::default();
        for &material in materials {
            if partition.managed.contains(&material) || partition.unmanaged.contains(&material) {
                continue;
            }
            if self.is_managed(store, material)? {
                partition.managed.push(material);
            } else {
                partition.unmanaged.push(material);
            }
        }
        Ok(partition)
    }

    fn builtin_by_name(&self, store: &AssetStore, name: &str) -> Option<MaterialKey> {
        store
            .known_builtins()
            .iter()
            .copied()
            .find(|&k| store.material(k).map_or(false, |m| m.name == name))
    }

    /// Get or create the generated material for `material`.
    ///
    /// Generated materials are returned as-is. Otherwise an existing generated
    /// material tagged with the origin's identity is refreshed from the
    /// origin, or a new one is created at a unique path. The result's shader
    /// is then normalized.
    pub fn manage(&self, store: &mut AssetStore, material: MaterialKey) -> Result<Managed> {
        if self.is_managed(store, material)? {
            return Ok(Managed {
                material,
                status: ManageStatus::AlreadyManaged,
                shader: None,
            });
        }

        let origin = store.material(material)?.clone();
        let guid = store
            .asset_guid(&origin.path)
            .ok_or_else(|| Error::IdentityLookupFailure {
                material: origin.name.clone(),
            })?;

        if !is_listable(&origin.path) && self.builtin_by_name(store, &origin.name).is_none() {
            store.remember_builtin(material)?;
        }

        let generated_name = managed_material_name(&origin.name);
        let provenance = Provenance::new(guid.clone(), origin.name.clone());

        let existing = store
            .find_materials(&generated_name, &self.target.directory)
            .into_iter()
            .find(|&k| {
                store
                    .material(k)
                    .map_or(false, |m| Provenance::matches(&m.tags, &guid))
            });

        let (generated, status) = match existing {
            Some(key) => {
                let data = store.material_mut(key)?;
                data.properties = origin.properties.clone();
                data.tags = origin.tags.clone();
                provenance.write(&mut data.tags);
                data.shader = origin.shader;
                data.render_queue = origin.render_queue;
                debug!(material = %origin.name, "Reused generated material");
                (key, ManageStatus::Reused)
            }
            None => {
                let path = store.generate_unique_path(&format!(
                    "{}/{}.mat",
                    self.target.directory, generated_name
                ));
                let mut data = MaterialData {
                    name: generated_name,
                    path,
                    ..origin.clone()
                };
                provenance.write(&mut data.tags);
                debug!(material = %origin.name, path = %data.path, "Created generated material");
                (store.add_material(data), ManageStatus::Created)
            }
        };

        let shader = self.normalize_shader(store, generated)?;
        Ok(Managed {
            material: generated,
            status,
            shader: Some(shader),
        })
    }

    /// Point a generated material at the clip variant of its shader.
    pub fn normalize_shader(&self, store: &mut AssetStore, material: MaterialKey) -> Result<ShaderOutcome> {
        let data = store.material(material)?;
        if !self.target.owns(&data.path) {
            return Err(Error::NotManaged {
                material: data.name.clone(),
            });
        }
        let current = data.shader;
        if self.is_clip_aware(store, current)? {
            return Ok(ShaderOutcome::AlreadyClipAware);
        }

        let shader_name = store.shader(current)?.name.clone();
        // Bakes for this target were accepted as clip-aware above
        if let ShaderKind::Baked(baked) = classify(&shader_name) {
            warn!(
                shader = %shader_name,
                baked_for = baked.target,
                target = %self.target.identity,
                material = %data.name,
                "Shader was baked for a different target"
            );
            return Ok(ShaderOutcome::ForeignBaked);
        }

        let variant = clip_variant_name(&shader_name);
        let Some(to) = store.find_shader(&variant) else {
            warn!(shader = %shader_name, material = %data.name, "No clip variant of shader");
            return Ok(ShaderOutcome::MissingVariant);
        };

        store.set_shader_preserving_queue(material, to)?;
        Ok(ShaderOutcome::Swapped { from: current, to })
    }

    /// Resolve a generated material back to its origin.
    pub fn unmanage(&self, store: &AssetStore, material: MaterialKey) -> Result<MaterialKey> {
        let data = store.material(material)?;
        let provenance = Provenance::read(&data.tags).ok_or_else(|| Error::UnresolvedProvenance {
            material: data.name.clone(),
        })?;
        let not_found = || Error::OriginNotFound {
            material: data.name.clone(),
            origin_guid: provenance.origin_guid.clone(),
        };

        let origin_path = store
            .path_for_guid(&provenance.origin_guid)
            .ok_or_else(not_found)?;

        if !is_listable(origin_path) {
            return self
                .builtin_by_name(store, &provenance.origin_name)
                .ok_or_else(not_found);
        }

        let fallback_name = strip_managed_suffix(&data.name);
        store
            .materials_at_path(origin_path)
            .into_iter()
            .find(|&k| {
                store.material(k).map_or(false, |m| {
                    m.name == provenance.origin_name || Some(m.name.as_str()) == fallback_name
                })
            })
            .ok_or_else(not_found)
    }

    /// Manage every material independently
    pub fn manage_all(&self, store: &mut AssetStore, materials: &[MaterialKey]) -> BatchResult {
        let mut report = BatchReport::new();
        let mut replacements = FxHashMap::default();

        for &material in materials {
            match self.manage(store, material) {
                Ok(managed) => {
                    if managed.material != material {
                        replacements.insert(material, managed.material);
                    }
                    report.complete(material);
                }
                Err(e) => {
                    warn!(error = %e, "Failed to manage material");
                    report.fail(material, e);
                }
            }
        }

        info!(
            completed = report.completed.len(),
            failed = report.failed.len(),
            "Managed materials"
        );
        BatchResult {
            report,
            replacements,
        }
    }

    /// Resolve every generated material back to its origin
    pub fn unmanage_all(&self, store: &AssetStore, materials: &[MaterialKey]) -> BatchResult {
        let mut report = BatchReport::new();
        let mut replacements = FxHashMap::default();

        for &material in materials {
            match self.unmanage(store, material) {
                Ok(origin) => {
                    replacements.insert(material, origin);
                    report.complete(material);
                }
                Err(e) => {
                    warn!(error = %e, "Failed to resolve material origin");
                    report.fail(material, e);
                }
            }
        }

        info!(
            completed = report.completed.len(),
            failed = report.failed.len(),
            "Unmanaged materials"
        );
        BatchResult {
            report,
            replacements,
        }
    }
}
