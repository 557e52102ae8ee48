// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory asset database.
//!
//! The [`AssetStore`] owns materials and shaders in slot maps with stable
//! keys, plus plain text documents (shader includes) by path. Every asset path
//! has an identity: a 32 hex digit GUID derived from the path, so identities
//! survive a snapshot round trip without a separate index.
//!
//! Paths under `Resources/` hold built-in assets. They have identities but
//! cannot be enumerated, mirroring how built-in resources behave in the asset
//! databases this store stands in for.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use slotmap::SlotMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::keys::{MaterialKey, ShaderKey};
use crate::tags::Tags;

/// Prefix of paths whose contents cannot be enumerated
pub const NON_LISTABLE_PREFIX: &str = "Resources/";

/// A material property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Float(f32),
    Vector([f32; 4]),
    Texture(String),
}

/// Data stored for a material.
#[derive(Debug, Clone)]
pub struct MaterialData {
    pub name: String,
    pub path: String,
    pub shader: ShaderKey,
    pub render_queue: i32,
    pub properties: FxHashMap<String, PropertyValue>,
    pub tags: Tags,
}

impl MaterialData {
    pub fn new(name: impl Into<String>, path: impl Into<String>, shader: ShaderKey) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            shader,
            render_queue: 2000,
            properties: FxHashMap::default(),
            tags: Tags::default(),
        }
    }
}

/// Data stored for a shader: its declared name and full source text.
#[derive(Debug, Clone)]
pub struct ShaderData {
    pub name: String,
    pub path: String,
    pub source: String,
}

/// Stable identity of an asset path
pub fn guid_for_path(path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_bytes());
    let mut guid = hex::encode(hasher.finalize());
    guid.truncate(32);
    guid
}

/// True when assets at `path` can be enumerated
pub fn is_listable(path: &str) -> bool {
    !path.starts_with(NON_LISTABLE_PREFIX)
}

/// True when `path` lies inside `dir`
pub fn is_under(path: &str, dir: &str) -> bool {
    path.len() > dir.len() + 1 && path.starts_with(dir) && path.as_bytes()[dir.len()] == b'/'
}

/// Parent directory of an asset path (empty for top-level paths)
pub fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// The central owner of all asset data.
#[derive(Debug, Default)]
pub struct AssetStore {
    pub(crate) materials: SlotMap<MaterialKey, MaterialData>,
    pub(crate) shaders: SlotMap<ShaderKey, ShaderData>,
    pub(crate) documents: FxHashMap<String, String>,
    pub(crate) folders: FxHashSet<String>,
    /// Origins under non-listable paths, resolved by name instead of path
    pub(crate) known_builtins: Vec<MaterialKey>,
    /// guid → path for every path that has been registered
    guids: FxHashMap<String, String>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn register_path(&mut self, path: &str) {
        self.guids
            .entry(guid_for_path(path))
            .or_insert_with(|| path.to_string());
    }

    /// Identity of an asset path, if anything lives there
    pub fn asset_guid(&self, path: &str) -> Option<String> {
        let guid = guid_for_path(path);
        self.guids.contains_key(&guid).then_some(guid)
    }

    /// Path for an identity
    pub fn path_for_guid(&self, guid: &str) -> Option<&str> {
        self.guids.get(guid).map(String::as_str)
    }

    /// True when some asset, document or folder occupies `path`
    pub fn is_path_taken(&self, path: &str) -> bool {
        self.folders.contains(path)
            || self.documents.contains_key(path)
            || self.shaders.values().any(|s| s.path == path)
            || self.materials.values().any(|m| m.path == path)
    }

    /// `path` if free, otherwise `<stem> N<.ext>` with the first free N
    pub fn generate_unique_path(&self, path: &str) -> String {
        if !self.is_path_taken(path) {
            return path.to_string();
        }
        let file_start = path.rfind('/').map_or(0, |i| i + 1);
        let (stem, ext) = match path[file_start..].rfind('.') {
            Some(dot) => path.split_at(file_start + dot),
            None => (path, ""),
        };
        (1..)
            .map(|n| format!("{} {}{}", stem, n, ext))
            .find(|candidate| !self.is_path_taken(candidate))
            .unwrap_or_else(|| path.to_string())
    }

    // ---------------------------------------------------------------------
    // Folders and documents
    // ---------------------------------------------------------------------

    pub fn add_folder(&mut self, path: impl Into<String>) {
        let path = path.into();
        self.register_path(&path);
        self.folders.insert(path);
    }

    pub fn has_folder(&self, path: &str) -> bool {
        self.folders.contains(path)
    }

    /// Create or overwrite a text document
    pub fn write_document(&mut self, path: impl Into<String>, text: impl Into<String>) {
        let path = path.into();
        self.register_path(&path);
        self.documents.insert(path, text.into());
    }

    pub fn read_document(&self, path: &str) -> Option<&str> {
        self.documents.get(path).map(String::as_str)
    }

    pub fn documents(&self) -> impl Iterator<Item = (&str, &str)> {
        self.documents.iter().map(|(p, t)| (p.as_str(), t.as_str()))
    }

    // ---------------------------------------------------------------------
    // Shaders
    // ---------------------------------------------------------------------

    pub fn add_shader(
        &mut self,
        name: impl Into<String>,
        path: impl Into<String>,
        source: impl Into<String>,
    ) -> ShaderKey {
        let data = ShaderData {
            name: name.into(),
            path: path.into(),
            source: source.into(),
        };
        self.register_path(&data.path);
        debug!(name = %data.name, path = %data.path, "Added shader");
        self.shaders.insert(data)
    }

    pub fn shader(&self, key: ShaderKey) -> Result<&ShaderData> {
        self.shaders.get(key).ok_or(Error::ShaderNotFound(key))
    }

    /// Look up a shader by declared name
    pub fn find_shader(&self, name: &str) -> Option<ShaderKey> {
        self.shaders
            .iter()
            .find(|(_, s)| s.name == name)
            .map(|(k, _)| k)
    }

    pub fn shaders(&self) -> impl Iterator<Item = (ShaderKey, &ShaderData)> {
        self.shaders.iter()
    }

    pub fn remove_shader(&mut self, key: ShaderKey) -> Result<ShaderData> {
        let removed = self.shaders.remove(key).ok_or(Error::ShaderNotFound(key))?;
        debug!(name = %removed.name, path = %removed.path, "Removed shader");
        Ok(removed)
    }

    // ---------------------------------------------------------------------
    // Materials
    // ---------------------------------------------------------------------

    pub fn add_material(&mut self, data: MaterialData) -> MaterialKey {
        self.register_path(&data.path);
        self.materials.insert(data)
    }

    pub fn material(&self, key: MaterialKey) -> Result<&MaterialData> {
        self.materials.get(key).ok_or(Error::MaterialNotFound(key))
    }

    pub fn material_mut(&mut self, key: MaterialKey) -> Result<&mut MaterialData> {
        self.materials.get_mut(key).ok_or(Error::MaterialNotFound(key))
    }

    pub fn materials(&self) -> impl Iterator<Item = (MaterialKey, &MaterialData)> {
        self.materials.iter()
    }

    pub fn remove_material(&mut self, key: MaterialKey) -> Result<MaterialData> {
        let removed = self.materials.remove(key).ok_or(Error::MaterialNotFound(key))?;
        self.known_builtins.retain(|&k| k != key);
        Ok(removed)
    }

    /// Materials currently referencing `shader`
    pub fn shader_users(&self, shader: ShaderKey) -> Vec<MaterialKey> {
        self.materials
            .iter()
            .filter(|(_, m)| m.shader == shader)
            .map(|(k, _)| k)
            .collect()
    }

    /// Built-in origins recorded so far
    pub fn known_builtins(&self) -> &[MaterialKey] {
        &self.known_builtins
    }

    /// Record a built-in origin; returns false if it was already recorded
    pub fn remember_builtin(&mut self, material: MaterialKey) -> Result<bool> {
        self.material(material)?;
        if self.known_builtins.contains(&material) {
            return Ok(false);
        }
        self.known_builtins.push(material);
        Ok(true)
    }

    /// Materials stored at `path`; always empty for non-listable paths
    pub fn materials_at_path(&self, path: &str) -> Vec<MaterialKey> {
        if !is_listable(path) {
            return Vec::new();
        }
        self.materials
            .iter()
            .filter(|(_, m)| m.path == path)
            .map(|(k, _)| k)
            .collect()
    }

    /// Materials inside `dir` whose name contains `filter`
    pub fn find_materials(&self, filter: &str, dir: &str) -> Vec<MaterialKey> {
        self.materials
            .iter()
            .filter(|(_, m)| is_under(&m.path, dir) && m.name.contains(filter))
            .map(|(k, _)| k)
            .collect()
    }

    /// Repoint a material to `shader`, keeping its render queue
    pub fn set_shader_preserving_queue(
        &mut self,
        material: MaterialKey,
        shader: ShaderKey,
    ) -> Result<()> {
        if !self.shaders.contains_key(shader) {
            return Err(Error::ShaderNotFound(shader));
        }
        self.material_mut(material)?.shader = shader;
        Ok(())
    }
}
