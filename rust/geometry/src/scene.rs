// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Category registry: which boxes belong to which clip category.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::category::{Category, CategoryQuads, CategorySet};
use crate::error::Result;
use crate::frame::Frame;
use crate::oriented_box::{OrientedBox, THIN_DEFAULT_DEPTH};
use crate::quad::{encode_box, EncodeSettings};

/// Largest depth a thin-category box may keep
pub const THIN_MAX_DEPTH: f64 = 0.999999;

/// Named, ordered group of boxes for one category
#[derive(Debug, Clone, PartialEq)]
pub struct BoxContainer {
    pub name: String,
    pub boxes: Vec<OrientedBox>,
}

impl BoxContainer {
    pub fn for_category(category: Category) -> Self {
        Self {
            name: category.container_name().to_string(),
            boxes: Vec::new(),
        }
    }
}

/// What [`ClipScene::reconcile`] changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Containers that did not exist yet
    pub created: Vec<Category>,
    /// Thin-category boxes whose depth was normalized
    pub adjusted_depths: usize,
}

impl ReconcileReport {
    pub fn is_unchanged(&self) -> bool {
        self.created.is_empty() && self.adjusted_depths == 0
    }
}

/// Explicit map from category to its box container
#[derive(Debug, Clone, Default)]
pub struct ClipScene {
    containers: FxHashMap<Category, BoxContainer>,
}

impl ClipScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scene with every container present
    pub fn with_all_containers() -> Self {
        let mut scene = Self::new();
        scene.reconcile();
        scene
    }

    pub fn container(&self, category: Category) -> Option<&BoxContainer> {
        self.containers.get(&category)
    }

    /// Get the container for `category`, creating it if needed
    pub fn container_mut(&mut self, category: Category) -> &mut BoxContainer {
        self.containers
            .entry(category)
            .or_insert_with(|| BoxContainer::for_category(category))
    }

    pub fn add_box(&mut self, category: Category, oriented: OrientedBox) {
        self.container_mut(category).boxes.push(oriented);
    }

    /// Add a freshly authored box with the category's default depth
    pub fn author_box(&mut self, category: Category) -> &mut OrientedBox {
        let boxes = &mut self.container_mut(category).boxes;
        boxes.push(OrientedBox::authored_default(category.has_thickness()));
        let last = boxes.len() - 1;
        &mut boxes[last]
    }

    /// Boxes of `category` in traversal order
    pub fn boxes(&self, category: Category) -> &[OrientedBox] {
        self.containers
            .get(&category)
            .map(|c| c.boxes.as_slice())
            .unwrap_or(&[])
    }

    /// Create missing containers and normalize thin-category depths.
    ///
    /// Thin depths: exactly 1 becomes 0.001, anything above 0.999999 is
    /// clamped to 0.999999 and negatives become 0. Running it twice changes
    /// nothing the second time.
    pub fn reconcile(&mut self) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for category in Category::ALL {
            if !self.containers.contains_key(&category) {
                self.containers
                    .insert(category, BoxContainer::for_category(category));
                report.created.push(category);
            }
            if category.has_thickness() {
                continue;
            }
            if let Some(container) = self.containers.get_mut(&category) {
                for oriented in &mut container.boxes {
                    if let Some(depth) = normalized_thin_depth(oriented.size.z) {
                        oriented.size.z = depth;
                        report.adjusted_depths += 1;
                    }
                }
            }
        }

        if !report.is_unchanged() {
            debug!(
                created = report.created.len(),
                adjusted = report.adjusted_depths,
                "Reconciled clip scene"
            );
        }
        report
    }

    /// Encode the boxes of one category into at most 16 quads.
    ///
    /// Boxes past capacity are dropped in traversal order; a two-sided box
    /// that straddles the limit contributes only the faces that fit.
    pub fn evaluate_category(
        &self,
        category: Category,
        target: &Frame,
        settings: &EncodeSettings,
    ) -> Result<CategoryQuads> {
        let mut quads = CategoryQuads::new();
        for oriented in self.boxes(category) {
            if quads.is_full() {
                break;
            }
            for quad in encode_box(target, oriented, category.has_thickness(), settings)? {
                if !quads.push(quad) {
                    break;
                }
            }
        }
        Ok(quads)
    }

    /// Encode every category for `target`
    pub fn evaluate_all(&self, target: &Frame, settings: &EncodeSettings) -> Result<CategorySet> {
        let mut set = CategorySet::new();
        for category in Category::ALL {
            *set.get_mut(category) = self.evaluate_category(category, target, settings)?;
        }
        Ok(set)
    }
}

fn normalized_thin_depth(depth: f64) -> Option<f64> {
    if depth == 1.0 {
        Some(THIN_DEFAULT_DEPTH)
    } else if depth > THIN_MAX_DEPTH {
        Some(THIN_MAX_DEPTH)
    } else if depth < 0.0 {
        Some(0.0)
    } else {
        None
    }
}
