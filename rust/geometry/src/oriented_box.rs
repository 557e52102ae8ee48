// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use nalgebra::{Matrix4, Vector3};

/// Depth given to newly authored boxes in thin categories
pub const THIN_DEFAULT_DEPTH: f64 = 0.001;

/// An authored box volume: size and center in its own local space, placed in
/// the world by `local_to_world`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientedBox {
    pub size: Vector3<f64>,
    pub center: Vector3<f64>,
    pub local_to_world: Matrix4<f64>,
    /// Emit both the -X and +X faces
    pub two_sided: bool,
    /// Inactive boxes are skipped entirely
    pub active: bool,
}

impl OrientedBox {
    /// An active, one-sided box centered on its local origin
    pub fn new(size: Vector3<f64>, local_to_world: Matrix4<f64>) -> Self {
        Self {
            size,
            center: Vector3::zeros(),
            local_to_world,
            two_sided: false,
            active: true,
        }
    }

    /// The box a new container entry starts with
    pub fn authored_default(has_thickness: bool) -> Self {
        let depth = if has_thickness { 1.0 } else { THIN_DEFAULT_DEPTH };
        Self::new(Vector3::new(1.0, 1.0, depth), Matrix4::identity())
    }

    pub fn with_center(mut self, center: Vector3<f64>) -> Self {
        self.center = center;
        self
    }

    pub fn two_sided(mut self, two_sided: bool) -> Self {
        self.two_sided = two_sided;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}
