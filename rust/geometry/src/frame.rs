// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reference frames: a local-to-world transform with its cached inverse.

use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::{Error, Result};

/// A rigid or affine reference frame
///
/// The inverse is computed once at construction so per-tick evaluation can
/// map world-space data into the frame without re-inverting.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    local_to_world: Matrix4<f64>,
    world_to_local: Matrix4<f64>,
}

impl Frame {
    /// The world frame
    pub fn identity() -> Self {
        Self {
            local_to_world: Matrix4::identity(),
            world_to_local: Matrix4::identity(),
        }
    }

    /// Build a frame from its local-to-world matrix
    pub fn new(local_to_world: Matrix4<f64>) -> Result<Self> {
        let world_to_local = local_to_world
            .try_inverse()
            .ok_or(Error::SingularFrame)?;
        Ok(Self {
            local_to_world,
            world_to_local,
        })
    }

    /// A frame translated from the world origin
    pub fn from_translation(x: f64, y: f64, z: f64) -> Self {
        let offset = Vector3::new(x, y, z);
        Self {
            local_to_world: Matrix4::new_translation(&offset),
            world_to_local: Matrix4::new_translation(&-offset),
        }
    }

    #[inline]
    pub fn local_to_world(&self) -> &Matrix4<f64> {
        &self.local_to_world
    }

    #[inline]
    pub fn world_to_local(&self) -> &Matrix4<f64> {
        &self.world_to_local
    }

    /// Map a local point into world space
    #[inline]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.local_to_world.transform_point(point)
    }

    /// Matrix mapping coordinates of a space with `local_to_world` into this frame
    #[inline]
    pub fn relative(&self, local_to_world: &Matrix4<f64>) -> Matrix4<f64> {
        self.world_to_local * local_to_world
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_matrix_is_rejected() {
        assert_eq!(Frame::new(Matrix4::zeros()), Err(Error::SingularFrame));
    }

    #[test]
    fn translation_inverse() {
        let frame = Frame::from_translation(1.0, 2.0, 3.0);
        let world = frame.transform_point(&Point3::origin());
        assert_eq!(world, Point3::new(1.0, 2.0, 3.0));
        let back = frame.world_to_local().transform_point(&world);
        assert_eq!(back, Point3::origin());
    }

    #[test]
    fn relative_transform_cancels_for_same_frame() {
        let frame = Frame::new(Matrix4::new_scaling(2.0)).unwrap();
        let relative = frame.relative(frame.local_to_world());
        assert!((relative - Matrix4::identity()).norm() < 1e-12);
    }
}
