// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # BoxClip Assets
//!
//! Arena-based asset store and the provenance-tagged cache of generated
//! materials.
//!
//! Materials and shaders live in slot maps with stable keys. A generated
//! material records the identity and name of the material it was made from
//! in two tags, which is enough to find it again for reuse and to resolve it
//! back to its origin without any external index.

pub mod error;
pub mod keys;
pub mod provenance;
pub mod serialization;
pub mod shader_set;
pub mod store;
pub mod tags;

pub use error::{Error, Result};
pub use keys::{MaterialKey, ShaderKey};
pub use provenance::{
    BatchResult, GenerationTarget, ManageStatus, Managed, MaterialPartition, ProvenanceCache,
    ShaderOutcome,
};
pub use shader_set::ShaderSet;
pub use store::{
    guid_for_path, is_listable, is_under, parent_dir, AssetStore, MaterialData, PropertyValue,
    ShaderData, NON_LISTABLE_PREFIX,
};
pub use tags::{Provenance, Tags, ORIGIN_GUID_TAG, ORIGIN_NAME_TAG};
