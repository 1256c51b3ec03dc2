//! Synthetic MD3 files for tests

#![allow(dead_code)]

pub const HEADER_SIZE: usize = 108;
pub const FRAME_SIZE: usize = 56;
pub const TAG_SIZE: usize = 112;
pub const SURFACE_HEADER_SIZE: usize = 108;
pub const SHADER_SIZE: usize = 68;

/// Byte offset of `ofs_end` inside a surface header
pub const SURFACE_OFS_END: usize = 104;

pub const IDENTITY: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

#[derive(Debug, Clone)]
pub struct TagSpec {
    pub name: String,
    pub origin: [f32; 3],
    pub axis: [[f32; 3]; 3],
}

impl TagSpec {
    pub fn identity(name: &str) -> Self {
        Self {
            name: name.to_string(),
            origin: [0.0; 3],
            axis: IDENTITY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SurfaceSpec {
    pub name: String,
    pub shaders: Vec<(String, i32)>,
    pub triangles: Vec<[i32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    /// One entry per frame, each holding `(xyz, normal)` per vertex
    pub frames: Vec<Vec<([i16; 3], u16)>>,
}

impl SurfaceSpec {
    pub fn num_verts(&self) -> usize {
        self.tex_coords.len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let num_verts = self.num_verts();
        let ofs_shaders = SURFACE_HEADER_SIZE;
        let ofs_triangles = ofs_shaders + self.shaders.len() * SHADER_SIZE;
        let ofs_st = ofs_triangles + self.triangles.len() * 12;
        let ofs_verts = ofs_st + num_verts * 8;
        let ofs_end = ofs_verts + self.frames.len() * num_verts * 8;

        let mut out = Vec::with_capacity(ofs_end);
        out.extend_from_slice(b"IDP3");
        out.extend_from_slice(&name_bytes(&self.name, 64));
        for value in [
            0,
            self.frames.len(),
            self.shaders.len(),
            num_verts,
            self.triangles.len(),
            ofs_triangles,
            ofs_shaders,
            ofs_st,
            ofs_verts,
            ofs_end,
        ] {
            out.extend_from_slice(&(value as i32).to_le_bytes());
        }

        for (name, index) in &self.shaders {
            out.extend_from_slice(&name_bytes(name, 64));
            out.extend_from_slice(&index.to_le_bytes());
        }
        for triangle in &self.triangles {
            for index in triangle {
                out.extend_from_slice(&index.to_le_bytes());
            }
        }
        for [s, t] in &self.tex_coords {
            out.extend_from_slice(&s.to_le_bytes());
            out.extend_from_slice(&t.to_le_bytes());
        }
        for frame in &self.frames {
            assert_eq!(frame.len(), num_verts, "every frame needs all vertices");
            for (xyz, normal) in frame {
                for c in xyz {
                    out.extend_from_slice(&c.to_le_bytes());
                }
                out.extend_from_slice(&normal.to_le_bytes());
            }
        }

        assert_eq!(out.len(), ofs_end);
        out
    }
}

#[derive(Debug, Clone)]
pub struct ModelSpec {
    pub name: String,
    pub num_frames: usize,
    pub tags: Vec<TagSpec>,
    pub surfaces: Vec<SurfaceSpec>,
}

impl ModelSpec {
    pub fn to_bytes(&self) -> Vec<u8> {
        let ofs_frames = HEADER_SIZE;
        let ofs_tags = ofs_frames + self.num_frames * FRAME_SIZE;
        let ofs_surfaces = ofs_tags + self.num_frames * self.tags.len() * TAG_SIZE;
        let surfaces: Vec<Vec<u8>> = self.surfaces.iter().map(SurfaceSpec::to_bytes).collect();
        let ofs_end = ofs_surfaces + surfaces.iter().map(Vec::len).sum::<usize>();

        let mut out = Vec::with_capacity(ofs_end);
        out.extend_from_slice(b"IDP3");
        out.extend_from_slice(&15i32.to_le_bytes());
        out.extend_from_slice(&name_bytes(&self.name, 64));
        for value in [
            0,
            self.num_frames,
            self.tags.len(),
            self.surfaces.len(),
            0,
            ofs_frames,
            ofs_tags,
            ofs_surfaces,
            ofs_end,
        ] {
            out.extend_from_slice(&(value as i32).to_le_bytes());
        }

        for frame in 0..self.num_frames {
            for v in [-1.0f32, -1.0, -1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.75] {
                out.extend_from_slice(&v.to_le_bytes());
            }
            out.extend_from_slice(&name_bytes(&format!("frame{frame}"), 16));
        }

        for _ in 0..self.num_frames {
            for tag in &self.tags {
                out.extend_from_slice(&name_bytes(&tag.name, 64));
                for v in tag.origin.iter().chain(tag.axis.iter().flatten()) {
                    out.extend_from_slice(&v.to_le_bytes());
                }
            }
        }

        for surface in &surfaces {
            out.extend_from_slice(surface);
        }

        assert_eq!(out.len(), ofs_end);
        out
    }

    /// Offset of the first surface in the bytes produced by `to_bytes`
    pub fn surfaces_offset(&self) -> usize {
        HEADER_SIZE + self.num_frames * FRAME_SIZE + self.num_frames * self.tags.len() * TAG_SIZE
    }
}

pub fn name_bytes(name: &str, width: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; width];
    let len = name.len().min(width - 1);
    bytes[..len].copy_from_slice(&name.as_bytes()[..len]);
    bytes
}

pub fn put_i32(data: &mut [u8], offset: usize, value: i32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Encoded normal pointing along +Z (latitude 0, longitude 0)
pub const NORMAL_UP: u16 = 0x0000;

/// One surface, one frame, one triangle with texture coordinates
/// `(0,0) (1,0) (0,1)`
pub fn triangle_surface(name: &str) -> SurfaceSpec {
    SurfaceSpec {
        name: name.to_string(),
        shaders: vec![("models/test/skin.tga".to_string(), 0)],
        triangles: vec![[0, 1, 2]],
        tex_coords: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
        frames: vec![vec![
            ([0, 0, 0], NORMAL_UP),
            ([64, 0, 0], NORMAL_UP),
            ([0, 128, 64], NORMAL_UP),
        ]],
    }
}

pub fn triangle_model(name: &str) -> ModelSpec {
    ModelSpec {
        name: name.to_string(),
        num_frames: 1,
        tags: vec![],
        surfaces: vec![triangle_surface("body")],
    }
}

/// Two surfaces (3 and 4 vertices) across two frames
pub fn animated_model() -> ModelSpec {
    let quad_frame = |z: i16| {
        vec![
            ([0, 0, z], NORMAL_UP),
            ([64, 0, z], NORMAL_UP),
            ([64, 64, z], NORMAL_UP),
            ([0, 64, z], NORMAL_UP),
        ]
    };
    let mut first = triangle_surface("h_head");
    first.frames.push(vec![
        ([0, 0, 64], NORMAL_UP),
        ([64, 0, 64], NORMAL_UP),
        ([0, 128, 128], NORMAL_UP),
    ]);

    ModelSpec {
        name: "models/players/test/head.md3".to_string(),
        num_frames: 2,
        tags: vec![TagSpec::identity("tag_head")],
        surfaces: vec![
            first,
            SurfaceSpec {
                name: "h_visor".to_string(),
                shaders: vec![],
                triangles: vec![[0, 1, 2], [0, 2, 3]],
                tex_coords: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
                frames: vec![quad_frame(0), quad_frame(32)],
            },
        ],
    }
}
