//! Validation checks for loaded MD3 models
//!
//! None of these problems stop a conversion. They are reported so callers
//! can log them before export.

use std::fmt;

use crate::model::Md3Model;

/// Largest deviation from an orthonormal basis accepted for tag axes
pub const TAG_AXIS_TOLERANCE: f32 = 1e-3;

/// A semantic problem found in a model that decoded successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A triangle references a vertex outside `0..num_verts`
    TriangleIndexOutOfRange {
        surface: String,
        triangle: usize,
        index: i32,
        num_verts: usize,
    },
    /// A surface carries a different number of frames than the header
    SurfaceFrameCount {
        surface: String,
        frames: usize,
        expected: usize,
    },
    /// The header declares skins, which MD3 files never use
    UnexpectedSkins(usize),
    /// Tag axes are not orthonormal
    SkewedTagAxes { tag: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TriangleIndexOutOfRange {
                surface,
                triangle,
                index,
                num_verts,
            } => write!(
                f,
                "Surface '{surface}' triangle {triangle} references vertex {index} (surface has {num_verts})"
            ),
            Self::SurfaceFrameCount {
                surface,
                frames,
                expected,
            } => write!(
                f,
                "Surface '{surface}' has {frames} frames but the model declares {expected}"
            ),
            Self::UnexpectedSkins(count) => write!(f, "Header declares {count} skins"),
            Self::SkewedTagAxes { tag } => write!(f, "Tag '{tag}' axes are not orthonormal"),
        }
    }
}

/// Check a model for problems that do not prevent conversion
pub fn validate(model: &Md3Model) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if model.header.num_skins != 0 {
        issues.push(ValidationIssue::UnexpectedSkins(model.header.num_skins));
    }

    for surface in &model.surfaces {
        if surface.header.num_frames != model.num_frames() {
            issues.push(ValidationIssue::SurfaceFrameCount {
                surface: surface.name().to_string(),
                frames: surface.header.num_frames,
                expected: model.num_frames(),
            });
        }

        let num_verts = surface.num_verts();
        for (triangle, tri) in surface.triangles.iter().enumerate() {
            for &index in &tri.indices {
                let in_range = usize::try_from(index).is_ok_and(|i| i < num_verts);
                if !in_range {
                    issues.push(ValidationIssue::TriangleIndexOutOfRange {
                        surface: surface.name().to_string(),
                        triangle,
                        index,
                        num_verts,
                    });
                }
            }
        }
    }

    for tag in model.tags.iter().flatten() {
        if !tag.is_orthonormal(TAG_AXIS_TOLERANCE) {
            issues.push(ValidationIssue::SkewedTagAxes {
                tag: tag.name.clone(),
            });
        }
    }

    issues
}
