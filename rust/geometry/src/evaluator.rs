// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-tick clip state evaluation for tracked consumers.
//!
//! Each consumer gets an override set holding the seven category payloads
//! plus scale and allow-in-front, evaluated in the consumer's reference
//! frame. Turning preview off clears everything that was written.

use nalgebra::Point3;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::category::{Category, CategorySet};
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::quad::EncodeSettings;
use crate::scene::ClipScene;

/// Distance above which a probe point counts as misaligned
pub const ALIGNMENT_TOLERANCE: f64 = 0.001;

/// Handle for a tracked consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConsumerId(u32);

impl ConsumerId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Anything that receives clip overrides
#[derive(Debug, Clone, PartialEq)]
pub enum Consumer {
    /// Rigid renderer evaluated in its own frame
    Renderer { frame: Frame },
    /// Skinned renderer evaluated in its designated root frame when present
    Deformable { frame: Frame, root: Option<Frame> },
    /// Particles, trails and lines: geometry lives in world space
    WorldAnchored { frame: Frame },
}

/// Result of comparing a consumer's reference frame against the clip origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Aligned,
    /// Deformable consumer without a designated root
    MissingRoot,
    /// Reference frame does not coincide with the expected frame
    Misaligned,
    /// World-anchored consumers need the origin to sit at the world origin
    WorldOriginRequired,
}

impl Consumer {
    /// Frame the clip quads are expressed in
    pub fn reference_frame(&self) -> &Frame {
        match self {
            Consumer::Renderer { frame } | Consumer::WorldAnchored { frame } => frame,
            Consumer::Deformable { frame, root } => root.as_ref().unwrap_or(frame),
        }
    }

    pub fn is_world_space_anchored(&self) -> bool {
        matches!(self, Consumer::WorldAnchored { .. })
    }

    /// Check that this consumer's reference frame matches `origin`
    pub fn alignment(&self, origin: &Frame) -> Alignment {
        match self {
            Consumer::Deformable { root: None, .. } => Alignment::MissingRoot,
            Consumer::WorldAnchored { frame } => {
                let world = Frame::identity();
                if !frames_coincide(origin, &world) {
                    Alignment::WorldOriginRequired
                } else if !frames_coincide(frame, &world) {
                    Alignment::Misaligned
                } else {
                    Alignment::Aligned
                }
            }
            _ => {
                if frames_coincide(self.reference_frame(), origin) {
                    Alignment::Aligned
                } else {
                    Alignment::Misaligned
                }
            }
        }
    }
}

/// Compare the images of the up, forward and left unit points
fn frames_coincide(a: &Frame, b: &Frame) -> bool {
    [
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(-1.0, 0.0, 0.0),
    ]
    .iter()
    .all(|probe| {
        nalgebra::distance(&a.transform_point(probe), &b.transform_point(probe))
            <= ALIGNMENT_TOLERANCE
    })
}

/// Clip settings shared by every consumer of one origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipSettings {
    pub scale: f32,
    pub scale_clip_planes: bool,
    pub allow_in_front: f32,
    /// Write overrides each tick; when false, clear them
    pub preview: bool,
}

impl ClipSettings {
    pub fn encode_settings(&self) -> EncodeSettings {
        EncodeSettings {
            scale: f64::from(self.scale),
            scale_clip_planes: self.scale_clip_planes,
        }
    }
}

impl Default for ClipSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            scale_clip_planes: false,
            allow_in_front: 0.0,
            preview: false,
        }
    }
}

/// Value of one named override property
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideValue {
    Vectors(Vec<[f32; 4]>),
    Float(f32),
}

/// Override set written to a consumer
#[derive(Debug, Clone, PartialEq)]
pub struct ClipOverrides {
    pub categories: CategorySet,
    pub scale: f32,
    pub allow_in_front: f32,
}

impl ClipOverrides {
    /// Named properties in upload order
    pub fn properties(&self) -> Vec<(String, OverrideValue)> {
        let mut props = Vec::with_capacity(Category::COUNT * 2 + 2);
        for (category, quads) in self.categories.iter() {
            props.push((
                format!("_BoxClipUniform{}", category),
                OverrideValue::Vectors(quads.vector_array().to_vec()),
            ));
            props.push((
                format!("_BoxClipCount{}", category),
                OverrideValue::Float(quads.len() as f32),
            ));
        }
        props.push(("_BoxClipScale".to_string(), OverrideValue::Float(self.scale)));
        props.push((
            "_BoxClipAllowInFront".to_string(),
            OverrideValue::Float(self.allow_in_front),
        ));
        props
    }
}

/// Evaluate the override set for a single consumer
pub fn evaluate_consumer(
    scene: &ClipScene,
    consumer: &Consumer,
    settings: &ClipSettings,
) -> Result<ClipOverrides> {
    let categories = scene.evaluate_all(consumer.reference_frame(), &settings.encode_settings())?;
    Ok(ClipOverrides {
        categories,
        scale: settings.scale,
        allow_in_front: settings.allow_in_front,
    })
}

/// Outcome of one [`ClipStateEvaluator::tick`]
#[derive(Debug, Default)]
pub struct TickReport {
    /// Consumers whose overrides were written
    pub evaluated: usize,
    /// Override sets removed
    pub cleared: usize,
    pub failures: Vec<(ConsumerId, Error)>,
}

/// Tracks consumers and the overrides written to them
#[derive(Debug, Default)]
pub struct ClipStateEvaluator {
    consumers: FxHashMap<ConsumerId, Consumer>,
    overrides: FxHashMap<ConsumerId, ClipOverrides>,
    next_id: u32,
}

impl ClipStateEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, consumer: Consumer) -> ConsumerId {
        let id = ConsumerId(self.next_id);
        self.next_id += 1;
        self.consumers.insert(id, consumer);
        id
    }

    /// Stop tracking a consumer, dropping any override written to it
    pub fn untrack(&mut self, id: ConsumerId) -> Option<Consumer> {
        self.overrides.remove(&id);
        self.consumers.remove(&id)
    }

    pub fn consumer(&self, id: ConsumerId) -> Option<&Consumer> {
        self.consumers.get(&id)
    }

    pub fn consumer_mut(&mut self, id: ConsumerId) -> Option<&mut Consumer> {
        self.consumers.get_mut(&id)
    }

    pub fn consumers(&self) -> impl Iterator<Item = (ConsumerId, &Consumer)> {
        self.consumers.iter().map(|(id, c)| (*id, c))
    }

    /// Override set currently applied to `id`
    pub fn overrides(&self, id: ConsumerId) -> Option<&ClipOverrides> {
        self.overrides.get(&id)
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    /// Recompute (or clear) the overrides of every tracked consumer
    pub fn tick(&mut self, scene: &ClipScene, settings: &ClipSettings) -> TickReport {
        let mut report = TickReport::default();

        if !settings.preview {
            report.cleared = self.overrides.len();
            self.overrides.clear();
            return report;
        }

        for (&id, consumer) in &self.consumers {
            match evaluate_consumer(scene, consumer, settings) {
                Ok(overrides) => {
                    if self.overrides.insert(id, overrides).is_none() {
                        debug!(consumer = id.raw(), "Created clip override set");
                    }
                    report.evaluated += 1;
                }
                Err(e) => {
                    warn!(consumer = id.raw(), error = %e, "Clip evaluation failed");
                    if self.overrides.remove(&id).is_some() {
                        report.cleared += 1;
                    }
                    report.failures.push((id, e));
                }
            }
        }

        report
    }
}
