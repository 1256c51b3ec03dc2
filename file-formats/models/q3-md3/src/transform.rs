//! Geometry decoding and coordinate conversion
//!
//! MD3 stores positions as signed 16-bit integers in 1/64 units and normals
//! as two 8-bit spherical angles. This module turns them into floating
//! point vectors and applies the export conventions:
//!
//! - an optional rigid placement taken from a tag (merge mode),
//! - an optional Y/Z axis swap, applied after the placement,
//! - an optional vertical flip of texture coordinates.
//!
//! # Examples
//!
//! ```rust
//! use q3_md3::transform::{ExportOptions, GeometryTransform, decode_normal};
//! use q3_md3::surface::Vertex;
//!
//! let transform = GeometryTransform::new(ExportOptions::default());
//! let vertex = Vertex { xyz: [64, 128, -32], normal: 0 };
//!
//! // Y and Z are swapped by default
//! let position = transform.position(&vertex);
//! assert_eq!(position.to_array(), [1.0, -0.5, 2.0]);
//!
//! // latitude 0, longitude 0 points straight up the model's Z axis
//! assert_eq!(decode_normal(0).z, 1.0);
//! ```

use std::f32::consts::PI;

use glam::{Mat3, Vec3};

use crate::surface::{TexCoord, Vertex};
use crate::tag::Tag;

/// Size of one quantization step of a vertex position
pub const XYZ_SCALE: f32 = 1.0 / 64.0;

/// Process-wide export conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Swap the Y and Z components of positions and normals. When off,
    /// triangle winding is reversed on output instead.
    pub swap_yz: bool,
    /// Write `1 - t` instead of `t` for texture coordinates
    pub flip_uvs: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            swap_yz: true,
            flip_uvs: true,
        }
    }
}

/// Convert a quantized position to model units
pub fn dequantize(xyz: [i16; 3]) -> Vec3 {
    Vec3::new(
        f32::from(xyz[0]) * XYZ_SCALE,
        f32::from(xyz[1]) * XYZ_SCALE,
        f32::from(xyz[2]) * XYZ_SCALE,
    )
}

/// Decode a latitude/longitude encoded normal into a unit vector
///
/// The high byte is the latitude and the low byte the longitude, each
/// scaled by `pi / 128`.
pub fn decode_normal(encoded: u16) -> Vec3 {
    let lat = f64::from((encoded >> 8) as u8 as f32 * PI / 128.0);
    let lng = f64::from((encoded & 0xFF) as u8 as f32 * PI / 128.0);

    Vec3::new(
        (lat.cos() * lng.sin()) as f32,
        (lat.sin() * lng.sin()) as f32,
        lng.cos() as f32,
    )
}

/// Rotation followed by translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    /// Rotation applied to positions and normals
    pub rotation: Mat3,
    /// Translation applied to positions only
    pub translation: Vec3,
}

impl RigidTransform {
    /// The transform that leaves everything in place
    pub const IDENTITY: Self = Self {
        rotation: Mat3::IDENTITY,
        translation: Vec3::ZERO,
    };

    /// Placement described by a tag's axes and origin
    pub fn from_tag(tag: &Tag) -> Self {
        Self {
            rotation: tag.rotation(),
            translation: tag.origin,
        }
    }

    /// Transform a point: `translation + rotation * point`
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * point
    }

    /// Transform a direction; translation does not apply
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * vector
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Converts the stored geometry of one model into output space
#[derive(Debug, Clone, Copy)]
pub struct GeometryTransform {
    options: ExportOptions,
    placement: Option<RigidTransform>,
}

impl GeometryTransform {
    /// Transform with no placement
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            placement: None,
        }
    }

    /// Transform that first places the model using `placement`
    pub fn with_placement(options: ExportOptions, placement: Option<RigidTransform>) -> Self {
        Self { options, placement }
    }

    /// Export options in effect
    pub fn options(&self) -> ExportOptions {
        self.options
    }

    fn swap(&self, v: Vec3) -> Vec3 {
        if self.options.swap_yz {
            Vec3::new(v.x, v.z, v.y)
        } else {
            v
        }
    }

    /// Output position of a vertex
    pub fn position(&self, vertex: &Vertex) -> Vec3 {
        let mut p = dequantize(vertex.xyz);
        if let Some(placement) = &self.placement {
            p = placement.transform_point(p);
        }
        self.swap(p)
    }

    /// Output normal of a vertex
    pub fn normal(&self, vertex: &Vertex) -> Vec3 {
        let mut n = decode_normal(vertex.normal);
        if let Some(placement) = &self.placement {
            n = placement.transform_vector(n);
        }
        self.swap(n)
    }

    /// Output texture coordinate
    pub fn tex_coord(&self, tex_coord: &TexCoord) -> (f32, f32) {
        if self.options.flip_uvs {
            (tex_coord.s, 1.0 - tex_coord.t)
        } else {
            (tex_coord.s, tex_coord.t)
        }
    }

    /// Triangle corners in output order
    ///
    /// Without the axis swap the output space has the opposite handedness,
    /// so the winding is reversed to keep faces pointing outward.
    pub fn winding<T: Copy>(&self, corners: [T; 3]) -> [T; 3] {
        if self.options.swap_yz {
            corners
        } else {
            [corners[2], corners[1], corners[0]]
        }
    }
}
