// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Box → clip quad encoding.
//!
//! A clip quad describes one face of an oriented box in a target frame as
//! four packed vectors, so the per-pixel test reduces to a few dot products:
//!
//! | Channel    | xyz                         | w                                   |
//! |------------|-----------------------------|-------------------------------------|
//! | `position` | near corner                 | 1                                   |
//! | `normal`   | unit depth direction or +Y  | projected depth, or raw box depth   |
//! | `edge_ba`  | unit height direction       | 1 / height                          |
//! | `edge_da`  | unit signed width direction | 1 / width                           |
//!
//! The `normal.w` asymmetry is deliberate: categories with thickness pack the
//! signed projected depth, thin categories pack the box's raw `size.z`.

use nalgebra::{Point3, Vector3, Vector4};
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::oriented_box::OrientedBox;

/// Depth vectors shorter than this fall back to the +Y normal
pub const NORMAL_EPSILON: f64 = 1e-5;

/// Encoder output for a single box (one face, or two when two-sided)
pub type BoxQuads = SmallVec<[ClipQuad; 2]>;

/// Packed plane/edge descriptor for one box face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipQuad {
    pub position: Vector4<f32>,
    pub normal: Vector4<f32>,
    pub edge_ba: Vector4<f32>,
    pub edge_da: Vector4<f32>,
}

impl ClipQuad {
    /// All-zero quad used to pad fixed-size arrays
    pub fn zeroed() -> Self {
        Self {
            position: Vector4::zeros(),
            normal: Vector4::zeros(),
            edge_ba: Vector4::zeros(),
            edge_da: Vector4::zeros(),
        }
    }

    /// The four channels in upload order
    pub fn channels(&self) -> [[f32; 4]; 4] {
        [
            self.position.into(),
            self.normal.into(),
            self.edge_ba.into(),
            self.edge_da.into(),
        ]
    }

    #[inline]
    pub fn ba_scale(&self) -> f32 {
        self.edge_ba.w
    }

    #[inline]
    pub fn da_scale(&self) -> f32 {
        self.edge_da.w
    }

    #[inline]
    pub fn packed_depth(&self) -> f32 {
        self.normal.w
    }
}

impl Default for ClipQuad {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Encoder parameters shared by every box in an evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeSettings {
    /// Uniform scale the consumer applies to clip space
    pub scale: f64,
    /// Divide positions and directions by `scale`
    pub scale_clip_planes: bool,
}

impl EncodeSettings {
    #[inline]
    fn plane_factor(&self) -> f64 {
        if self.scale_clip_planes {
            1.0 / self.scale
        } else {
            1.0
        }
    }
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            scale_clip_planes: false,
        }
    }
}

/// Encode `oriented` into clip quads expressed in `target`'s local space.
///
/// Returns no quads for an inactive box, one for a one-sided box and two
/// (opposing faces) for a two-sided box. The caller enforces per-category
/// capacity. A zero-length height or width edge is a precondition violation.
pub fn encode_box(
    target: &Frame,
    oriented: &OrientedBox,
    has_thickness: bool,
    settings: &EncodeSettings,
) -> Result<BoxQuads> {
    let mut quads = BoxQuads::new();
    if !oriented.active {
        return Ok(quads);
    }

    let to_target = target.relative(&oriented.local_to_world);
    let factor = settings.plane_factor();
    let signs: &[f64] = if oriented.two_sided {
        &[-1.0, 1.0]
    } else {
        &[-1.0]
    };

    for &xsign in signs {
        let xdiff = xsign * oriented.size.x;
        let ydiff = oriented.size.y;
        let zdiff = oriented.size.z;

        let corner = Point3::new(
            oriented.center.x - 0.5 * xdiff,
            oriented.center.y - 0.5 * ydiff,
            oriented.center.z,
        );
        let position = to_target.transform_point(&corner).coords * factor;
        let line_ba = to_target.transform_vector(&Vector3::new(0.0, ydiff, 0.0)) * factor;
        let line_da = to_target.transform_vector(&Vector3::new(xdiff, 0.0, 0.0)) * factor;
        let line_normal = to_target.transform_vector(&Vector3::new(0.0, 0.0, zdiff)) * factor;

        let (ba_dir, ba_scale) = unit_with_inverse_length(&line_ba, "height")?;
        let (da_dir, da_scale) = unit_with_inverse_length(&line_da, "width")?;

        let (plane_normal, normal_scale) = match line_normal.try_normalize(NORMAL_EPSILON) {
            Some(unit) => (unit, line_normal.dot(&unit)),
            None => (Vector3::y(), 0.0),
        };
        let packed_depth = if has_thickness {
            normal_scale
        } else {
            oriented.size.z
        };

        quads.push(ClipQuad {
            position: pack(&position, 1.0),
            normal: pack(&plane_normal, packed_depth),
            edge_ba: pack(&ba_dir, ba_scale),
            edge_da: pack(&da_dir, da_scale),
        });
    }

    Ok(quads)
}

fn unit_with_inverse_length(
    edge: &Vector3<f64>,
    name: &'static str,
) -> Result<(Vector3<f64>, f64)> {
    let length = edge.norm();
    if length == 0.0 {
        return Err(Error::DegenerateEdge { edge: name });
    }
    Ok((edge / length, 1.0 / length))
}

#[inline]
fn pack(v: &Vector3<f64>, w: f64) -> Vector4<f32> {
    Vector4::new(v.x as f32, v.y as f32, v.z as f32, w as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Matrix4, Rotation3};

    fn unit_box(size: Vector3<f64>) -> OrientedBox {
        OrientedBox::new(size, Matrix4::identity())
    }

    #[test]
    fn inactive_box_emits_nothing() {
        let b = unit_box(Vector3::new(1.0, 1.0, 1.0)).active(false);
        let quads = encode_box(&Frame::identity(), &b, true, &EncodeSettings::default()).unwrap();
        assert!(quads.is_empty());
    }

    #[test]
    fn one_and_two_sided_counts() {
        let settings = EncodeSettings::default();
        let b = unit_box(Vector3::new(2.0, 3.0, 0.5));
        assert_eq!(encode_box(&Frame::identity(), &b, false, &settings).unwrap().len(), 1);
        let b = b.two_sided(true);
        let quads = encode_box(&Frame::identity(), &b, false, &settings).unwrap();
        assert_eq!(quads.len(), 2);
        // Opposing faces: width directions point opposite ways
        assert_relative_eq!(quads[0].edge_da.x, -1.0);
        assert_relative_eq!(quads[1].edge_da.x, 1.0);
    }

    #[test]
    fn corner_and_scales_in_identity_frame() {
        let b = unit_box(Vector3::new(2.0, 4.0, 0.5)).with_center(Vector3::new(1.0, 1.0, 1.0));
        let quad = encode_box(&Frame::identity(), &b, true, &EncodeSettings::default()).unwrap()[0];

        // xsign = -1: corner at center.x + 0.5 * width, center.y - 0.5 * height
        assert_eq!(quad.position, Vector4::new(2.0, -1.0, 1.0, 1.0));
        assert_relative_eq!(quad.ba_scale(), 0.25);
        assert_relative_eq!(quad.da_scale(), 0.5);
        assert_relative_eq!(quad.normal.z, 1.0);
        assert_relative_eq!(quad.packed_depth(), 0.5);
    }

    #[test]
    fn thin_categories_pack_raw_depth() {
        // Scaled placement: projected depth differs from raw size.z
        let placement = Matrix4::new_scaling(3.0);
        let b = OrientedBox::new(Vector3::new(1.0, 1.0, 0.2), placement);
        let settings = EncodeSettings::default();

        let thick = encode_box(&Frame::identity(), &b, true, &settings).unwrap()[0];
        let thin = encode_box(&Frame::identity(), &b, false, &settings).unwrap()[0];
        assert_relative_eq!(thick.packed_depth(), 0.6, epsilon = 1e-6);
        assert_relative_eq!(thin.packed_depth(), 0.2, epsilon = 1e-6);
    }

    #[test]
    fn zero_depth_defaults_to_up() {
        let b = unit_box(Vector3::new(1.0, 1.0, 0.0));
        let quad = encode_box(&Frame::identity(), &b, true, &EncodeSettings::default()).unwrap()[0];
        assert_eq!(quad.normal, Vector4::new(0.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn rotated_box_keeps_unit_directions() {
        let rotation = Rotation3::from_euler_angles(0.3, -1.1, 0.7).to_homogeneous();
        let b = OrientedBox::new(Vector3::new(2.0, 5.0, 0.25), rotation);
        let quad = encode_box(&Frame::identity(), &b, true, &EncodeSettings::default()).unwrap()[0];

        assert_relative_eq!(quad.normal.xyz().norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(quad.edge_ba.xyz().norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(quad.edge_da.xyz().norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(quad.ba_scale(), 0.2, epsilon = 1e-6);
        assert_relative_eq!(quad.da_scale(), 0.5, epsilon = 1e-6);
        // Projected depth is a magnitude, the direction carries the sign
        let flipped = OrientedBox::new(Vector3::new(2.0, 5.0, -0.25), rotation);
        let quad = encode_box(&Frame::identity(), &flipped, true, &EncodeSettings::default()).unwrap()[0];
        assert_relative_eq!(quad.packed_depth(), 0.25, epsilon = 1e-6);
    }

    #[test]
    fn target_frame_is_applied() {
        let target = Frame::from_translation(10.0, 0.0, 0.0);
        let b = unit_box(Vector3::new(1.0, 1.0, 1.0));
        let quad = encode_box(&target, &b, true, &EncodeSettings::default()).unwrap()[0];
        assert_relative_eq!(quad.position.x, -9.5);
        assert_relative_eq!(quad.position.y, -0.5);
    }

    #[test]
    fn scale_normalized_clip_planes() {
        let b = unit_box(Vector3::new(2.0, 2.0, 2.0));
        let settings = EncodeSettings {
            scale: 2.0,
            scale_clip_planes: true,
        };
        let quad = encode_box(&Frame::identity(), &b, true, &settings).unwrap()[0];
        assert_eq!(quad.position, Vector4::new(0.5, -0.5, 0.0, 1.0));
        assert_relative_eq!(quad.ba_scale(), 1.0);
        assert_relative_eq!(quad.packed_depth(), 1.0);
    }

    #[test]
    fn zero_width_is_rejected() {
        let b = unit_box(Vector3::new(0.0, 1.0, 1.0));
        assert_eq!(
            encode_box(&Frame::identity(), &b, true, &EncodeSettings::default()),
            Err(Error::DegenerateEdge { edge: "width" })
        );
    }
}
