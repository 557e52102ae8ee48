// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON serialization for asset stores.
//!
//! SlotMap keys are mapped to sequential integer IDs so snapshots are
//! portable. Identities are not stored: they are re-derived from paths.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::{AssetStore, MaterialData, PropertyValue};
use crate::tags::Tags;

/// Serializable representation of a full asset store.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub folders: Vec<String>,
    pub documents: Vec<DocumentSnapshot>,
    pub shaders: Vec<ShaderSnapshot>,
    pub materials: Vec<MaterialSnapshot>,
    /// Indices into `materials` of remembered built-in origins
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub known_builtin_materials: Vec<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub path: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShaderSnapshot {
    pub id: usize,
    pub name: String,
    pub path: String,
    pub source: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MaterialSnapshot {
    pub name: String,
    pub path: String,
    pub shader: usize,
    pub render_queue: i32,
    #[serde(default, skip_serializing_if = "FxHashMap::is_empty")]
    pub properties: FxHashMap<String, PropertyValue>,
    #[serde(default, skip_serializing_if = "FxHashMap::is_empty")]
    pub tags: Tags,
}

impl AssetStore {
    /// Serializes the store to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_snapshot()?)
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Rebuilds a store from [`to_json`](Self::to_json) output.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: StoreSnapshot =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Self::from_snapshot(snapshot)
    }

    fn to_snapshot(&self) -> Result<StoreSnapshot> {
        let mut shader_ids = FxHashMap::default();
        let shaders: Vec<ShaderSnapshot> = self
            .shaders
            .iter()
            .enumerate()
            .map(|(i, (k, s))| {
                shader_ids.insert(k, i);
                ShaderSnapshot {
                    id: i,
                    name: s.name.clone(),
                    path: s.path.clone(),
                    source: s.source.clone(),
                }
            })
            .collect();

        let mut material_ids = FxHashMap::default();
        let materials = self
            .materials
            .iter()
            .enumerate()
            .map(|(i, (k, m))| -> Result<MaterialSnapshot> {
                material_ids.insert(k, i);
                let shader = *shader_ids.get(&m.shader).ok_or_else(|| {
                    Error::Serialization(format!(
                        "material {} references a shader that no longer exists",
                        m.name
                    ))
                })?;
                Ok(MaterialSnapshot {
                    name: m.name.clone(),
                    path: m.path.clone(),
                    shader,
                    render_queue: m.render_queue,
                    properties: m.properties.clone(),
                    tags: m.tags.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let known_builtin_materials = self
            .known_builtins
            .iter()
            .filter_map(|k| material_ids.get(k).copied())
            .collect();

        let mut folders: Vec<String> = self.folders.iter().cloned().collect();
        folders.sort();
        let mut documents: Vec<DocumentSnapshot> = self
            .documents
            .iter()
            .map(|(path, text)| DocumentSnapshot {
                path: path.clone(),
                text: text.clone(),
            })
            .collect();
        documents.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(StoreSnapshot {
            folders,
            documents,
            shaders,
            materials,
            known_builtin_materials,
        })
    }

    fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        let mut store = AssetStore::new();
        for folder in snapshot.folders {
            store.add_folder(folder);
        }
        for doc in snapshot.documents {
            store.write_document(doc.path, doc.text);
        }

        let mut shader_keys = FxHashMap::default();
        for s in snapshot.shaders {
            let key = store.add_shader(s.name, s.path, s.source);
            shader_keys.insert(s.id, key);
        }

        let mut material_keys = Vec::with_capacity(snapshot.materials.len());
        for m in snapshot.materials {
            let shader = *shader_keys.get(&m.shader).ok_or_else(|| {
                Error::Serialization(format!(
                    "material {} references unknown shader id {}",
                    m.name, m.shader
                ))
            })?;
            material_keys.push(store.add_material(MaterialData {
                name: m.name,
                path: m.path,
                shader,
                render_queue: m.render_queue,
                properties: m.properties,
                tags: m.tags,
            }));
        }

        for id in snapshot.known_builtin_materials {
            let key = *material_keys.get(id).ok_or_else(|| {
                Error::Serialization(format!("unknown built-in material id {}", id))
            })?;
            store.remember_builtin(key)?;
        }

        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::Provenance;

    #[test]
    fn snapshot_preserves_provenance() {
        let mut store = AssetStore::new();
        store.add_folder("Generated");
        store.write_document("Shaders/BoxClipTemplate.cginc", "// template");
        let shader = store.add_shader("BoxClip/Standard", "Shaders/Standard.shader", "Shader {}");
        let mut data = MaterialData::new("Skin BoxClip", "Generated/Skin BoxClip.mat", shader);
        Provenance::new("abc", "Skin").write(&mut data.tags);
        store.add_material(data);

        let json = store.to_json().unwrap();
        let restored = AssetStore::from_json(&json).unwrap();

        assert!(restored.has_folder("Generated"));
        assert_eq!(
            restored.read_document("Shaders/BoxClipTemplate.cginc"),
            Some("// template")
        );
        let (_, material) = restored.materials().next().unwrap();
        assert_eq!(Provenance::read(&material.tags).unwrap().origin_name, "Skin");
        assert_eq!(restored.shader(material.shader).unwrap().name, "BoxClip/Standard");
        assert_eq!(
            restored.asset_guid("Generated"),
            store.asset_guid("Generated")
        );
    }

    #[test]
    fn dangling_shader_reference_is_rejected() {
        let json = r#"{"folders":[],"documents":[],"shaders":[],
            "materials":[{"name":"A","path":"A.mat","shader":3,"render_queue":2000}]}"#;
        assert!(matches!(
            AssetStore::from_json(json),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn dangling_shader_key_fails_instead_of_panicking() {
        let mut store = AssetStore::new();
        let shader = store.add_shader("Hidden/Gone", "Gen/Gone.shader", "");
        store.add_material(MaterialData::new("A", "A.mat", shader));
        store.remove_shader(shader).unwrap();
        assert!(matches!(store.to_json(), Err(Error::Serialization(_))));
    }

    #[test]
    fn builtin_side_list_survives_round_trip() {
        let mut store = AssetStore::new();
        let shader = store.add_shader("Standard", "Resources/builtin_shaders", "");
        store.add_material(MaterialData::new("Skin", "Materials/Skin.mat", shader));
        let builtin = store.add_material(MaterialData::new(
            "Default-Diffuse",
            "Resources/builtin_extra",
            shader,
        ));
        store.remember_builtin(builtin).unwrap();

        let restored = AssetStore::from_json(&store.to_json().unwrap()).unwrap();
        let known = restored.known_builtins();
        assert_eq!(known.len(), 1);
        assert_eq!(restored.material(known[0]).unwrap().name, "Default-Diffuse");
    }
}
