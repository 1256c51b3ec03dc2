//! Tags: named attachment points carried per frame

use crate::error::Result;
use crate::header::Md3Header;
use crate::layout::{Encoding, Field, Record, RecordLayout};
use crate::reader::{ByteReader, block_size, try_vec};
use glam::{Mat3, Vec3};

mod fields {
    use super::{Encoding, Field};

    pub const NAME: Field = Field::new("name", 0, 64, Encoding::Name);
    pub const ORIGIN: Field = Field::new("origin", 64, 12, Encoding::Vec3);
    pub const AXIS: Field = Field::new("axis", 76, 36, Encoding::Mat3);
}

/// Byte layout of a 112-byte tag record
pub const TAG_LAYOUT: RecordLayout = RecordLayout {
    name: "tag",
    size: 112,
    fields: &[fields::NAME, fields::ORIGIN, fields::AXIS],
};

/// An attachment point: origin plus orientation
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    /// Tag name, e.g. `tag_torso`
    pub name: String,
    /// Origin in model space
    pub origin: Vec3,
    /// Orientation as three row vectors
    pub axis: [Vec3; 3],
}

impl Tag {
    fn decode(record: &Record<'_>) -> Self {
        Self {
            name: record.name(&fields::NAME),
            origin: record.vec3(&fields::ORIGIN),
            axis: record.rows3(&fields::AXIS),
        }
    }

    /// Orientation as a matrix whose rows are the tag axes
    pub fn rotation(&self) -> Mat3 {
        Mat3::from_cols(self.axis[0], self.axis[1], self.axis[2]).transpose()
    }

    /// Whether the axes form an orthonormal basis within `tolerance`
    pub fn is_orthonormal(&self, tolerance: f32) -> bool {
        let [a, b, c] = self.axis;
        (a.length() - 1.0).abs() <= tolerance
            && (b.length() - 1.0).abs() <= tolerance
            && (c.length() - 1.0).abs() <= tolerance
            && a.dot(b).abs() <= tolerance
            && a.dot(c).abs() <= tolerance
            && b.dot(c).abs() <= tolerance
    }
}

/// Decode the tags of frame zero
///
/// The tag block holds `num_tags` records per frame; only the first
/// frame's records are read.
pub fn parse_tags(reader: &ByteReader<'_>, header: &Md3Header) -> Result<Vec<Tag>> {
    let size = block_size(header.num_tags, TAG_LAYOUT.size)?;
    let block = reader.read_at(header.ofs_tags.into(), size)?;

    let mut tags = try_vec("tags", header.num_tags)?;
    for chunk in block.chunks_exact(TAG_LAYOUT.size) {
        tags.push(Tag::decode(&Record::new(&TAG_LAYOUT, chunk)?));
    }
    Ok(tags)
}
