// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Clip categories and their fixed-capacity quad payloads.

use std::fmt;
use std::ops::Index;

use crate::quad::ClipQuad;

/// Semantic role a box plays in the clip test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    ClipShow,
    ClipHide,
    ShowVolume,
    HideVolume,
    ShowCameraWithin,
    HideCameraWithin,
    ZCompress,
}

impl Category {
    /// Every category, in payload order
    pub const ALL: [Category; 7] = [
        Category::ClipShow,
        Category::ClipHide,
        Category::ShowVolume,
        Category::HideVolume,
        Category::ShowCameraWithin,
        Category::HideCameraWithin,
        Category::ZCompress,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Maximum quads per category
    pub const CAPACITY: usize = 16;

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Volume and camera-within categories pack projected depth
    pub fn has_thickness(self) -> bool {
        matches!(
            self,
            Category::ShowVolume
                | Category::HideVolume
                | Category::ShowCameraWithin
                | Category::HideCameraWithin
        )
    }

    /// Identifier used in uniform and generated-define names
    pub fn as_str(self) -> &'static str {
        match self {
            Category::ClipShow => "ClipShow",
            Category::ClipHide => "ClipHide",
            Category::ShowVolume => "ShowVolume",
            Category::HideVolume => "HideVolume",
            Category::ShowCameraWithin => "ShowCameraWithin",
            Category::HideCameraWithin => "HideCameraWithin",
            Category::ZCompress => "ZCompress",
        }
    }

    /// Name of the container node holding this category's boxes
    pub fn container_name(self) -> &'static str {
        match self {
            Category::ClipShow => "Show",
            Category::ClipHide => "Hide",
            other => other.as_str(),
        }
    }

    /// Parse either the identifier or the container name
    pub fn from_name(name: &str) -> Option<Category> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == name || c.container_name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quads gathered for one category, zero-padded to capacity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryQuads {
    quads: [ClipQuad; Category::CAPACITY],
    count: usize,
}

impl CategoryQuads {
    pub fn new() -> Self {
        Self {
            quads: [ClipQuad::zeroed(); Category::CAPACITY],
            count: 0,
        }
    }

    /// Append a quad; returns false (and drops it) when full
    pub fn push(&mut self, quad: ClipQuad) -> bool {
        if self.is_full() {
            return false;
        }
        self.quads[self.count] = quad;
        self.count += 1;
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == Category::CAPACITY
    }

    /// The filled quads
    pub fn as_slice(&self) -> &[ClipQuad] {
        &self.quads[..self.count]
    }

    /// Uniform payload: four vectors per quad, unused slots zeroed
    pub fn vector_array(&self) -> [[f32; 4]; Category::CAPACITY * 4] {
        let mut out = [[0.0f32; 4]; Category::CAPACITY * 4];
        for (slot, quad) in out.chunks_exact_mut(4).zip(self.quads.iter()) {
            slot.copy_from_slice(&quad.channels());
        }
        out
    }
}

impl Default for CategoryQuads {
    fn default() -> Self {
        Self::new()
    }
}

/// One payload per category
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategorySet {
    entries: [CategoryQuads; Category::COUNT],
}

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category) -> &CategoryQuads {
        &self.entries[category.index()]
    }

    pub fn get_mut(&mut self, category: Category) -> &mut CategoryQuads {
        &mut self.entries[category.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryQuads)> {
        Category::ALL.iter().copied().zip(self.entries.iter())
    }

    /// Total quads across all categories
    pub fn total(&self) -> usize {
        self.entries.iter().map(CategoryQuads::len).sum()
    }
}

impl Index<Category> for CategorySet {
    type Output = CategoryQuads;

    fn index(&self, category: Category) -> &CategoryQuads {
        self.get(category)
    }
}
