//! Wavefront OBJ export
//!
//! A document lists every position, then every texture coordinate, then
//! every normal, then one group of faces per surface. Positions, texture
//! coordinates and normals share one index per vertex, so each face corner
//! is written as `i/i/i`. Indices are 1-based and run across all surfaces
//! of all models in the document.

use std::io::Write;

use crate::error::{Md3Error, Result};
use crate::model::Md3Model;
use crate::surface::{Surface, Vertex};
use crate::transform::{ExportOptions, GeometryTransform, RigidTransform};

/// Object name used for merged documents
pub const MERGED_OBJECT_NAME: &str = "MergedMD3";

/// One model's contribution to a document
#[derive(Debug, Clone, Copy)]
pub struct ObjPart<'a> {
    /// Source model
    pub model: &'a Md3Model,
    /// Animation frame to export
    pub frame: usize,
    /// Conversion applied to this model's geometry
    pub transform: GeometryTransform,
}

/// A surface resolved to the vertices of the exported frame
struct SurfaceRef<'a> {
    surface: &'a Surface,
    vertices: &'a [Vertex],
    transform: GeometryTransform,
    base_index: u64,
}

/// First global OBJ index of each surface, given per-surface vertex counts
///
/// The first surface starts at 1 and each following surface starts right
/// after the previous one's vertices.
pub fn base_indices<I>(vertex_counts: I) -> Vec<u64>
where
    I: IntoIterator<Item = usize>,
{
    let mut next = 1u64;
    vertex_counts
        .into_iter()
        .map(|count| {
            let base = next;
            next += count as u64;
            base
        })
        .collect()
}

fn resolve<'a>(parts: &[ObjPart<'a>]) -> Result<Vec<SurfaceRef<'a>>> {
    let surfaces: Vec<(&'a Surface, ObjPart<'a>)> = parts
        .iter()
        .flat_map(|part| part.model.surfaces.iter().map(move |s| (s, *part)))
        .collect();
    let bases = base_indices(surfaces.iter().map(|(s, _)| s.num_verts()));

    surfaces
        .into_iter()
        .zip(bases)
        .map(|((surface, part), base_index)| {
            let vertices =
                surface
                    .frame_vertices(part.frame)
                    .ok_or_else(|| Md3Error::FrameOutOfRange {
                        surface: surface.name().to_string(),
                        frame: part.frame,
                        frames: surface.header.num_frames,
                    })?;
            Ok(SurfaceRef {
                surface,
                vertices,
                transform: part.transform,
                base_index,
            })
        })
        .collect()
}

/// Writes OBJ documents to any byte sink
pub struct ObjWriter<W: Write> {
    out: W,
}

impl<W: Write> ObjWriter<W> {
    /// Wrap a sink
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write one document named `name` holding every part
    ///
    /// All frames are resolved before the first byte is written, so a
    /// missing frame never leaves a partial document behind. I/O failures
    /// abort immediately.
    pub fn write_document(&mut self, name: &str, parts: &[ObjPart<'_>]) -> Result<()> {
        let surfaces = resolve(parts)?;

        writeln!(self.out, "o {name}")?;

        for s in &surfaces {
            for vertex in s.vertices {
                let p = s.transform.position(vertex);
                writeln!(self.out, "v {:.6} {:.6} {:.6}", p.x, p.y, p.z)?;
            }
        }

        for s in &surfaces {
            for tex_coord in &s.surface.tex_coords {
                let (u, v) = s.transform.tex_coord(tex_coord);
                writeln!(self.out, "vt {u:.6} {v:.6}")?;
            }
        }

        for s in &surfaces {
            for vertex in s.vertices {
                let n = s.transform.normal(vertex);
                writeln!(self.out, "vn {:.6} {:.6} {:.6}", n.x, n.y, n.z)?;
            }
        }

        for s in &surfaces {
            writeln!(self.out, "g {}", s.surface.name())?;
            let base = s.base_index as i64;
            for triangle in &s.surface.triangles {
                let [a, b, c] = s
                    .transform
                    .winding(triangle.indices)
                    .map(|i| base + i64::from(i));
                writeln!(self.out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
            }
        }

        Ok(())
    }

    /// Flush and return the sink
    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Write one animation frame of a model as a document
pub fn write_frame<W: Write>(
    out: W,
    model: &Md3Model,
    frame: usize,
    options: ExportOptions,
) -> Result<()> {
    let mut writer = ObjWriter::new(out);
    writer.write_document(
        model.name(),
        &[ObjPart {
            model,
            frame,
            transform: GeometryTransform::new(options),
        }],
    )?;
    writer.finish()?;
    Ok(())
}

/// Write frame zero of every model into one document, placing each model
/// with its first tag when it has one
pub fn write_merged<W: Write>(out: W, models: &[&Md3Model], options: ExportOptions) -> Result<()> {
    let parts: Vec<ObjPart<'_>> = models
        .iter()
        .map(|&model| ObjPart {
            model,
            frame: 0,
            transform: GeometryTransform::with_placement(
                options,
                model.first_tag().map(RigidTransform::from_tag),
            ),
        })
        .collect();

    let mut writer = ObjWriter::new(out);
    writer.write_document(MERGED_OBJECT_NAME, &parts)?;
    writer.finish()?;
    Ok(())
}
