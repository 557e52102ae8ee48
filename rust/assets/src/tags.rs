// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key-value tags attached to materials, and the provenance record stored in
//! them.

use rustc_hash::FxHashMap;

/// Tag holding the identity of the material a generated one was made from
pub const ORIGIN_GUID_TAG: &str = "BoxClipGUID";
/// Tag holding the name of that origin material
pub const ORIGIN_NAME_TAG: &str = "BoxClipName";

/// String tags attached to a material.
pub type Tags = FxHashMap<String, String>;

/// Where a generated material came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub origin_guid: String,
    pub origin_name: String,
}

impl Provenance {
    pub fn new(origin_guid: impl Into<String>, origin_name: impl Into<String>) -> Self {
        Self {
            origin_guid: origin_guid.into(),
            origin_name: origin_name.into(),
        }
    }

    /// Read provenance from tags. A missing or empty identity means none.
    pub fn read(tags: &Tags) -> Option<Self> {
        let guid = tags.get(ORIGIN_GUID_TAG).filter(|g| !g.is_empty())?;
        Some(Self {
            origin_guid: guid.clone(),
            origin_name: tags.get(ORIGIN_NAME_TAG).cloned().unwrap_or_default(),
        })
    }

    /// Write both tags, replacing previous values.
    pub fn write(&self, tags: &mut Tags) {
        tags.insert(ORIGIN_GUID_TAG.to_string(), self.origin_guid.clone());
        tags.insert(ORIGIN_NAME_TAG.to_string(), self.origin_name.clone());
    }

    /// True when `tags` record `guid` as the origin identity.
    pub fn matches(tags: &Tags, guid: &str) -> bool {
        tags.get(ORIGIN_GUID_TAG).map(String::as_str) == Some(guid)
    }
}
