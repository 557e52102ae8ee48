// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON scene description read by the CLI.
//!
//! ```json
//! {
//!   "target": { "translation": [0, 1, 0] },
//!   "settings": { "scale": 1.0, "scale_clip_planes": false, "allow_in_front": 0.0 },
//!   "boxes": [
//!     { "category": "HideVolume", "size": [1, 2, 0.5], "two_sided": true,
//!       "placement": { "translation": [0, 1, 0], "rotation": [0, 1.57, 0] } }
//!   ]
//! }
//! ```
//!
//! Categories accept either the identifier (`ClipShow`) or the container
//! name (`Show`). Rotations are Euler angles in radians (roll, pitch, yaw).

use anyhow::{anyhow, Context, Result};
use nalgebra::{Matrix4, Rotation3, Vector3};
use serde::Deserialize;

use boxclip_geometry::{Category, ClipScene, ClipSettings, Frame, OrientedBox};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Placement {
    pub translation: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl Placement {
    pub fn matrix(&self) -> Matrix4<f64> {
        let [tx, ty, tz] = self.translation;
        let [roll, pitch, yaw] = self.rotation;
        Matrix4::new_translation(&Vector3::new(tx, ty, tz))
            * Rotation3::from_euler_angles(roll, pitch, yaw).to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&Vector3::from(self.scale))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    pub scale: f32,
    pub scale_clip_planes: bool,
    pub allow_in_front: f32,
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self {
            scale: 1.0,
            scale_clip_planes: false,
            allow_in_front: 0.0,
        }
    }
}

fn active_default() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoxEntry {
    pub category: String,
    pub size: [f64; 3],
    #[serde(default)]
    pub center: [f64; 3],
    #[serde(default)]
    pub placement: Placement,
    #[serde(default)]
    pub two_sided: bool,
    #[serde(default = "active_default")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SceneFile {
    pub target: Placement,
    pub settings: SettingsFile,
    pub boxes: Vec<BoxEntry>,
}

/// A scene file turned into library types
#[derive(Debug)]
pub struct LoadedScene {
    pub scene: ClipScene,
    pub target: Frame,
    pub settings: ClipSettings,
}

impl SceneFile {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid scene file")
    }

    pub fn load(&self) -> Result<LoadedScene> {
        let mut scene = ClipScene::new();
        for (i, entry) in self.boxes.iter().enumerate() {
            let category = Category::from_name(&entry.category)
                .ok_or_else(|| anyhow!("box {}: unknown category {:?}", i, entry.category))?;
            let oriented = OrientedBox::new(Vector3::from(entry.size), entry.placement.matrix())
                .with_center(Vector3::from(entry.center))
                .two_sided(entry.two_sided)
                .active(entry.active);
            scene.add_box(category, oriented);
        }

        let target = Frame::new(self.target.matrix()).context("target placement")?;
        let settings = ClipSettings {
            scale: self.settings.scale,
            scale_clip_planes: self.settings.scale_clip_planes,
            allow_in_front: self.settings.allow_in_front,
            preview: true,
        };

        Ok(LoadedScene {
            scene,
            target,
            settings,
        })
    }
}
