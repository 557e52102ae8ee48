// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grouping of materials by the shader they reference.

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::keys::{MaterialKey, ShaderKey};
use crate::store::AssetStore;

/// Distinct shaders in first-seen order, each with its materials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSet {
    entries: Vec<(ShaderKey, Vec<MaterialKey>)>,
}

impl ShaderSet {
    /// Group `materials` by shader. Duplicate materials are counted once.
    pub fn collect(store: &AssetStore, materials: &[MaterialKey]) -> Result<Self> {
        let mut index: FxHashMap<ShaderKey, usize> = FxHashMap::default();
        let mut entries: Vec<(ShaderKey, Vec<MaterialKey>)> = Vec::new();

        for &material in materials {
            let shader = store.material(material)?.shader;
            let slot = *index.entry(shader).or_insert_with(|| {
                entries.push((shader, Vec::new()));
                entries.len() - 1
            });
            let users = &mut entries[slot].1;
            if !users.contains(&material) {
                users.push(material);
            }
        }

        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShaderKey, &[MaterialKey])> {
        self.entries.iter().map(|(s, m)| (*s, m.as_slice()))
    }

    pub fn materials(&self, shader: ShaderKey) -> &[MaterialKey] {
        self.entries
            .iter()
            .find(|(s, _)| *s == shader)
            .map(|(_, m)| m.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MaterialData;

    #[test]
    fn groups_in_first_seen_order() {
        let mut store = AssetStore::new();
        let a = store.add_shader("A", "A.shader", "");
        let b = store.add_shader("B", "B.shader", "");
        let m1 = store.add_material(MaterialData::new("m1", "m1.mat", b));
        let m2 = store.add_material(MaterialData::new("m2", "m2.mat", a));
        let m3 = store.add_material(MaterialData::new("m3", "m3.mat", b));

        let set = ShaderSet::collect(&store, &[m1, m2, m3, m1]).unwrap();
        let order: Vec<_> = set.iter().map(|(s, _)| s).collect();
        assert_eq!(order, vec![b, a]);
        assert_eq!(set.materials(b), &[m1, m3]);
        assert_eq!(set.materials(a), &[m2]);
    }
}
