//! Per-frame metadata records

use crate::error::Result;
use crate::header::Md3Header;
use crate::layout::{Encoding, Field, Record, RecordLayout};
use crate::reader::{ByteReader, block_size, try_vec};
use glam::Vec3;

mod fields {
    use super::{Encoding, Field};

    pub const MIN_BOUNDS: Field = Field::new("min_bounds", 0, 12, Encoding::Vec3);
    pub const MAX_BOUNDS: Field = Field::new("max_bounds", 12, 12, Encoding::Vec3);
    pub const LOCAL_ORIGIN: Field = Field::new("local_origin", 24, 12, Encoding::Vec3);
    pub const RADIUS: Field = Field::new("radius", 36, 4, Encoding::F32);
    pub const NAME: Field = Field::new("name", 40, 16, Encoding::Name);
}

/// Byte layout of a 56-byte frame record
pub const FRAME_LAYOUT: RecordLayout = RecordLayout {
    name: "frame",
    size: 56,
    fields: &[
        fields::MIN_BOUNDS,
        fields::MAX_BOUNDS,
        fields::LOCAL_ORIGIN,
        fields::RADIUS,
        fields::NAME,
    ],
};

/// Bounding information for one animation frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Bounding box minimum corner
    pub min_bounds: Vec3,
    /// Bounding box maximum corner
    pub max_bounds: Vec3,
    /// Local origin
    pub local_origin: Vec3,
    /// Bounding sphere radius
    pub radius: f32,
    /// Frame name
    pub name: String,
}

impl Frame {
    fn decode(record: &Record<'_>) -> Self {
        Self {
            min_bounds: record.vec3(&fields::MIN_BOUNDS),
            max_bounds: record.vec3(&fields::MAX_BOUNDS),
            local_origin: record.vec3(&fields::LOCAL_ORIGIN),
            radius: record.f32(&fields::RADIUS),
            name: record.name(&fields::NAME),
        }
    }
}

/// Decode the frame block declared by `header`
pub fn parse_frames(reader: &ByteReader<'_>, header: &Md3Header) -> Result<Vec<Frame>> {
    let size = block_size(header.num_frames, FRAME_LAYOUT.size)?;
    let block = reader.read_at(header.ofs_frames.into(), size)?;

    let mut frames = try_vec("frames", header.num_frames)?;
    for chunk in block.chunks_exact(FRAME_LAYOUT.size) {
        frames.push(Frame::decode(&Record::new(&FRAME_LAYOUT, chunk)?));
    }
    Ok(frames)
}
