//! Surfaces: per-mesh headers and their triangle, texture coordinate,
//! shader and vertex blocks

use crate::error::{Md3Error, Result};
use crate::header::{MD3_MAGIC, Md3Header};
use crate::layout::{self, Encoding, Field, Record, RecordLayout};
use crate::reader::{ByteReader, block_size, check_bounds, try_vec};
use byteorder::{ByteOrder, LittleEndian};
use log::{debug, warn};

/// Surface header field descriptors
pub mod fields {
    use super::{Encoding, Field};

    pub const IDENT: Field = Field::new("ident", 0, 4, Encoding::Ident);
    pub const NAME: Field = Field::new("name", 4, 64, Encoding::Name);
    pub const FLAGS: Field = Field::new("flags", 68, 4, Encoding::I32);
    pub const NUM_FRAMES: Field = Field::new("num_frames", 72, 4, Encoding::I32);
    pub const NUM_SHADERS: Field = Field::new("num_shaders", 76, 4, Encoding::I32);
    pub const NUM_VERTS: Field = Field::new("num_verts", 80, 4, Encoding::I32);
    pub const NUM_TRIANGLES: Field = Field::new("num_triangles", 84, 4, Encoding::I32);
    pub const OFS_TRIANGLES: Field = Field::new("ofs_triangles", 88, 4, Encoding::I32);
    pub const OFS_SHADERS: Field = Field::new("ofs_shaders", 92, 4, Encoding::I32);
    pub const OFS_ST: Field = Field::new("ofs_st", 96, 4, Encoding::I32);
    pub const OFS_XYZ_NORMALS: Field = Field::new("ofs_xyz_normals", 100, 4, Encoding::I32);
    pub const OFS_END: Field = Field::new("ofs_end", 104, 4, Encoding::I32);

    pub const SHADER_NAME: Field = Field::new("name", 0, 64, Encoding::Name);
    pub const SHADER_INDEX: Field = Field::new("shader_index", 64, 4, Encoding::I32);
}

/// Byte layout of the 108-byte surface header
pub const SURFACE_LAYOUT: RecordLayout = RecordLayout {
    name: "surface",
    size: 108,
    fields: &[
        fields::IDENT,
        fields::NAME,
        fields::FLAGS,
        fields::NUM_FRAMES,
        fields::NUM_SHADERS,
        fields::NUM_VERTS,
        fields::NUM_TRIANGLES,
        fields::OFS_TRIANGLES,
        fields::OFS_SHADERS,
        fields::OFS_ST,
        fields::OFS_XYZ_NORMALS,
        fields::OFS_END,
    ],
};

/// Byte layout of a 68-byte shader record
pub const SHADER_LAYOUT: RecordLayout = RecordLayout {
    name: "shader",
    size: 68,
    fields: &[fields::SHADER_NAME, fields::SHADER_INDEX],
};

/// Size of a triangle record (three `i32` indices)
pub const TRIANGLE_SIZE: usize = 12;
/// Size of a texture coordinate record (two `f32`)
pub const TEX_COORD_SIZE: usize = 8;
/// Size of a vertex record (three `i16` plus an encoded normal)
pub const VERTEX_SIZE: usize = 8;

/// Decoded surface header
///
/// Offsets are relative to the start of the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceHeader {
    /// Magic signature ("IDP3")
    pub magic: [u8; 4],
    /// Surface display name
    pub name: String,
    /// Flag bits
    pub flags: i32,
    /// Number of animation frames stored in this surface
    pub num_frames: usize,
    /// Number of shader records
    pub num_shaders: usize,
    /// Number of vertices per frame
    pub num_verts: usize,
    /// Number of triangles
    pub num_triangles: usize,
    /// Offset of the triangle block
    pub ofs_triangles: i32,
    /// Offset of the shader block
    pub ofs_shaders: i32,
    /// Offset of the texture coordinate block
    pub ofs_st: i32,
    /// Offset of the vertex block
    pub ofs_xyz_normals: i32,
    /// Offset of the end of this surface, i.e. its size
    pub ofs_end: i32,
}

impl SurfaceHeader {
    /// Size of the surface header record in bytes
    pub const SIZE: usize = SURFACE_LAYOUT.size;

    /// Decode and validate the surface header at `start`
    pub fn parse(reader: &ByteReader<'_>, start: i64) -> Result<Self> {
        let bytes = reader.read_at(start, Self::SIZE as u64)?;
        let record = Record::new(&SURFACE_LAYOUT, bytes)?;

        let magic = record.ident(&fields::IDENT);
        if magic != MD3_MAGIC {
            return Err(Md3Error::InvalidMagic {
                expected: layout::ident_to_string(MD3_MAGIC),
                found: layout::ident_to_string(magic),
            });
        }

        let ofs_end = record.i32(&fields::OFS_END);
        if ofs_end < Self::SIZE as i32 {
            return Err(Md3Error::InvalidField {
                field: fields::OFS_END.name,
                value: ofs_end.into(),
            });
        }
        if start + i64::from(ofs_end) > reader.len() as i64 {
            return Err(Md3Error::Truncated {
                field: fields::OFS_END.name,
                declared: start + i64::from(ofs_end),
                actual: reader.len(),
            });
        }

        Ok(Self {
            magic,
            name: record.name(&fields::NAME),
            flags: record.i32(&fields::FLAGS),
            num_frames: layout::count(&fields::NUM_FRAMES, record.i32(&fields::NUM_FRAMES))?,
            num_shaders: layout::count(&fields::NUM_SHADERS, record.i32(&fields::NUM_SHADERS))?,
            num_verts: layout::count(&fields::NUM_VERTS, record.i32(&fields::NUM_VERTS))?,
            num_triangles: layout::count(
                &fields::NUM_TRIANGLES,
                record.i32(&fields::NUM_TRIANGLES),
            )?,
            ofs_triangles: record.i32(&fields::OFS_TRIANGLES),
            ofs_shaders: record.i32(&fields::OFS_SHADERS),
            ofs_st: record.i32(&fields::OFS_ST),
            ofs_xyz_normals: record.i32(&fields::OFS_XYZ_NORMALS),
            ofs_end,
        })
    }

    /// Borrow a sub-block of this surface, checked against both the
    /// surface's declared end and the input length
    fn read_block<'a>(
        &self,
        reader: &ByteReader<'a>,
        start: i64,
        offset: i32,
        size: u64,
    ) -> Result<&'a [u8]> {
        check_bounds(offset.into(), size, self.ofs_end as u64)?;
        reader.read_at(start + i64::from(offset), size)
    }
}

/// Three surface-local vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    /// Zero-based vertex indices
    pub indices: [i32; 3],
}

/// Texture coordinate pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexCoord {
    /// Horizontal coordinate
    pub s: f32,
    /// Vertical coordinate
    pub t: f32,
}

/// Quantized vertex position and encoded normal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vertex {
    /// Position in 1/64 units
    pub xyz: [i16; 3],
    /// Latitude in the high byte, longitude in the low byte
    pub normal: u16,
}

/// A shader (material) reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shader {
    /// Shader or texture path
    pub name: String,
    /// Engine-assigned shader index
    pub index: i32,
}

/// A fully decoded surface
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// Surface header
    pub header: SurfaceHeader,
    /// Shader references
    pub shaders: Vec<Shader>,
    /// Triangle list
    pub triangles: Vec<Triangle>,
    /// One texture coordinate per vertex
    pub tex_coords: Vec<TexCoord>,
    /// `num_frames * num_verts` vertices, frame-major
    pub vertices: Vec<Vertex>,
}

impl Surface {
    /// Surface display name
    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// Number of vertices per frame
    pub fn num_verts(&self) -> usize {
        self.header.num_verts
    }

    /// Vertices of one frame, if the surface carries that frame
    pub fn frame_vertices(&self, frame: usize) -> Option<&[Vertex]> {
        let count = self.header.num_verts;
        let start = frame.checked_mul(count)?;
        self.vertices.get(start..start.checked_add(count)?)
    }

    fn parse(reader: &ByteReader<'_>, index: usize, start: i64) -> Result<Self> {
        let header =
            SurfaceHeader::parse(reader, start).map_err(|e| e.in_surface(index, String::new()))?;

        let name = header.name.clone();
        Self::parse_blocks(reader, header, start).map_err(|e| e.in_surface(index, name))
    }

    fn parse_blocks(reader: &ByteReader<'_>, header: SurfaceHeader, start: i64) -> Result<Self> {
        let triangles = parse_triangles(reader, &header, start)?;
        let tex_coords = parse_tex_coords(reader, &header, start)?;
        let vertices = parse_vertices(reader, &header, start)?;
        let shaders = parse_shaders(reader, &header, start).unwrap_or_else(|e| {
            warn!("Ignoring shaders of surface '{}': {}", header.name, e);
            Vec::new()
        });

        debug!(
            "Surface '{}': {} frames, {} verts, {} triangles",
            header.name, header.num_frames, header.num_verts, header.num_triangles
        );

        Ok(Self {
            header,
            shaders,
            triangles,
            tex_coords,
            vertices,
        })
    }
}

fn parse_triangles(
    reader: &ByteReader<'_>,
    header: &SurfaceHeader,
    start: i64,
) -> Result<Vec<Triangle>> {
    let size = block_size(header.num_triangles, TRIANGLE_SIZE)?;
    let block = header.read_block(reader, start, header.ofs_triangles, size)?;

    let mut triangles = try_vec("triangles", header.num_triangles)?;
    for chunk in block.chunks_exact(TRIANGLE_SIZE) {
        let mut indices = [0i32; 3];
        LittleEndian::read_i32_into(chunk, &mut indices);
        triangles.push(Triangle { indices });
    }
    Ok(triangles)
}

fn parse_tex_coords(
    reader: &ByteReader<'_>,
    header: &SurfaceHeader,
    start: i64,
) -> Result<Vec<TexCoord>> {
    let size = block_size(header.num_verts, TEX_COORD_SIZE)?;
    let block = header.read_block(reader, start, header.ofs_st, size)?;

    let mut tex_coords = try_vec("texture coordinates", header.num_verts)?;
    for chunk in block.chunks_exact(TEX_COORD_SIZE) {
        tex_coords.push(TexCoord {
            s: LittleEndian::read_f32(&chunk[0..4]),
            t: LittleEndian::read_f32(&chunk[4..8]),
        });
    }
    Ok(tex_coords)
}

fn parse_vertices(
    reader: &ByteReader<'_>,
    header: &SurfaceHeader,
    start: i64,
) -> Result<Vec<Vertex>> {
    let count = header
        .num_frames
        .checked_mul(header.num_verts)
        .ok_or(Md3Error::InvalidField {
            field: fields::NUM_VERTS.name,
            value: header.num_verts as i64,
        })?;
    let size = block_size(count, VERTEX_SIZE)?;
    let block = header.read_block(reader, start, header.ofs_xyz_normals, size)?;

    let mut vertices = try_vec("vertices", count)?;
    for chunk in block.chunks_exact(VERTEX_SIZE) {
        let mut xyz = [0i16; 3];
        LittleEndian::read_i16_into(&chunk[0..6], &mut xyz);
        vertices.push(Vertex {
            xyz,
            normal: LittleEndian::read_u16(&chunk[6..8]),
        });
    }
    Ok(vertices)
}

fn parse_shaders(
    reader: &ByteReader<'_>,
    header: &SurfaceHeader,
    start: i64,
) -> Result<Vec<Shader>> {
    let size = block_size(header.num_shaders, SHADER_LAYOUT.size)?;
    let block = header.read_block(reader, start, header.ofs_shaders, size)?;

    let mut shaders = try_vec("shaders", header.num_shaders)?;
    for chunk in block.chunks_exact(SHADER_LAYOUT.size) {
        let record = Record::new(&SHADER_LAYOUT, chunk)?;
        shaders.push(Shader {
            name: record.name(&fields::SHADER_NAME),
            index: record.i32(&fields::SHADER_INDEX),
        });
    }
    Ok(shaders)
}

/// Decode every surface declared by `header`
///
/// Surfaces are laid out back to back starting at `ofs_surfaces`; each
/// surface's `ofs_end` gives the distance to the next one. Any failure
/// aborts the whole decode.
pub fn parse_surfaces(reader: &ByteReader<'_>, header: &Md3Header) -> Result<Vec<Surface>> {
    // every surface needs at least a header's worth of input
    let room = reader.len() / SurfaceHeader::SIZE;
    let mut surfaces = try_vec("surfaces", header.num_surfaces.min(room))?;
    let mut cursor = i64::from(header.ofs_surfaces);

    for index in 0..header.num_surfaces {
        let surface = Surface::parse(reader, index, cursor)?;
        cursor += i64::from(surface.header.ofs_end);
        surfaces.push(surface);
    }

    Ok(surfaces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layouts_are_contiguous() {
        assert!(SURFACE_LAYOUT.is_contiguous());
        assert!(SHADER_LAYOUT.is_contiguous());
        assert_eq!(SurfaceHeader::SIZE, 108);
    }

    #[test]
    fn test_frame_vertices() {
        let vertex = |x| Vertex {
            xyz: [x, 0, 0],
            normal: 0,
        };
        let surface = Surface {
            header: SurfaceHeader {
                magic: MD3_MAGIC,
                name: "s".to_string(),
                flags: 0,
                num_frames: 2,
                num_shaders: 0,
                num_verts: 2,
                num_triangles: 0,
                ofs_triangles: 108,
                ofs_shaders: 108,
                ofs_st: 108,
                ofs_xyz_normals: 108,
                ofs_end: 140,
            },
            shaders: vec![],
            triangles: vec![],
            tex_coords: vec![],
            vertices: vec![vertex(0), vertex(1), vertex(2), vertex(3)],
        };

        assert_eq!(surface.frame_vertices(1).unwrap()[0].xyz[0], 2);
        assert!(surface.frame_vertices(2).is_none());
    }
}
