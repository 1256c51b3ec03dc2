//! Fixed byte layouts of the MD3 records
//!
//! Records are decoded field by field from little-endian bytes using the
//! descriptors below instead of reinterpreting memory, so the decoders do
//! not depend on host endianness or struct packing.

use crate::error::{Md3Error, Result};
use byteorder::{ByteOrder, LittleEndian};
use glam::Vec3;

/// How a field's bytes are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Four ASCII bytes
    Ident,
    /// Signed 32-bit integer
    I32,
    /// 32-bit float
    F32,
    /// Three consecutive 32-bit floats
    Vec3,
    /// Nine consecutive 32-bit floats, three rows of three
    Mat3,
    /// NUL-padded text
    Name,
}

/// One field inside a fixed-size record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Field name, used in error messages
    pub name: &'static str,
    /// Byte offset from the start of the record
    pub offset: usize,
    /// Width in bytes
    pub width: usize,
    /// Numeric encoding
    pub encoding: Encoding,
}

impl Field {
    /// Create a field descriptor
    pub const fn new(name: &'static str, offset: usize, width: usize, encoding: Encoding) -> Self {
        Self {
            name,
            offset,
            width,
            encoding,
        }
    }

    /// Offset of the first byte after this field
    pub const fn end(&self) -> usize {
        self.offset + self.width
    }
}

/// A fixed-size record made of consecutive fields
#[derive(Debug, Clone, Copy)]
pub struct RecordLayout {
    /// Record name, used in error messages
    pub name: &'static str,
    /// Total size in bytes
    pub size: usize,
    /// Fields in file order
    pub fields: &'static [Field],
}

impl RecordLayout {
    /// Check that the fields tile the record with no gaps or overlaps
    pub fn is_contiguous(&self) -> bool {
        let mut cursor = 0;
        for field in self.fields {
            if field.offset != cursor {
                return false;
            }
            cursor = field.end();
        }
        cursor == self.size
    }
}

/// Decoding view over the bytes of one record
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    bytes: &'a [u8],
}

impl<'a> Record<'a> {
    /// Wrap `bytes`, which must hold at least `layout.size` bytes
    pub fn new(layout: &RecordLayout, bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() < layout.size {
            return Err(Md3Error::OutOfBounds {
                offset: 0,
                size: layout.size as u64,
                limit: bytes.len() as u64,
            });
        }
        Ok(Self {
            bytes: &bytes[..layout.size],
        })
    }

    fn slice(&self, field: &Field) -> &'a [u8] {
        &self.bytes[field.offset..field.end()]
    }

    /// Read an ident field
    pub fn ident(&self, field: &Field) -> [u8; 4] {
        debug_assert_eq!(field.encoding, Encoding::Ident);
        let mut ident = [0u8; 4];
        ident.copy_from_slice(self.slice(field));
        ident
    }

    /// Read a signed 32-bit integer field
    pub fn i32(&self, field: &Field) -> i32 {
        debug_assert_eq!(field.encoding, Encoding::I32);
        LittleEndian::read_i32(self.slice(field))
    }

    /// Read a 32-bit float field
    pub fn f32(&self, field: &Field) -> f32 {
        debug_assert_eq!(field.encoding, Encoding::F32);
        LittleEndian::read_f32(self.slice(field))
    }

    /// Read a three-float vector field
    pub fn vec3(&self, field: &Field) -> Vec3 {
        debug_assert_eq!(field.encoding, Encoding::Vec3);
        read_vec3(self.slice(field))
    }

    /// Read a 3x3 float matrix field as three rows
    pub fn rows3(&self, field: &Field) -> [Vec3; 3] {
        debug_assert_eq!(field.encoding, Encoding::Mat3);
        let bytes = self.slice(field);
        [
            read_vec3(&bytes[0..12]),
            read_vec3(&bytes[12..24]),
            read_vec3(&bytes[24..36]),
        ]
    }

    /// Read a NUL-padded name field
    pub fn name(&self, field: &Field) -> String {
        debug_assert_eq!(field.encoding, Encoding::Name);
        decode_name(self.slice(field))
    }
}

fn read_vec3(bytes: &[u8]) -> Vec3 {
    let mut xyz = [0f32; 3];
    LittleEndian::read_f32_into(&bytes[..12], &mut xyz);
    Vec3::from_array(xyz)
}

/// Decode NUL-padded text, stopping at the first NUL
pub fn decode_name(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Render an ident for error messages
pub fn ident_to_string(ident: [u8; 4]) -> String {
    String::from_utf8_lossy(&ident).into_owned()
}

/// Convert a signed count field to `usize`, rejecting negative values
pub fn count(field: &Field, value: i32) -> Result<usize> {
    usize::try_from(value).map_err(|_| Md3Error::InvalidField {
        field: field.name,
        value: value.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIR: RecordLayout = RecordLayout {
        name: "pair",
        size: 8,
        fields: &[
            Field::new("a", 0, 4, Encoding::I32),
            Field::new("b", 4, 4, Encoding::F32),
        ],
    };

    #[test]
    fn test_record_decode() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(-7i32).to_le_bytes());
        bytes.extend_from_slice(&1.5f32.to_le_bytes());

        let record = Record::new(&PAIR, &bytes).unwrap();
        assert_eq!(record.i32(&PAIR.fields[0]), -7);
        assert_eq!(record.f32(&PAIR.fields[1]), 1.5);
        assert!(PAIR.is_contiguous());
    }

    #[test]
    fn test_short_record() {
        assert!(Record::new(&PAIR, &[0u8; 7]).is_err());
    }

    #[test]
    fn test_decode_name() {
        assert_eq!(decode_name(b"models/head\0\0garbage"), "models/head");
        assert_eq!(decode_name(b"full"), "full");
        assert_eq!(decode_name(b"\0abc"), "");
    }

    #[test]
    fn test_negative_count() {
        let field = Field::new("num_verts", 0, 4, Encoding::I32);
        assert_eq!(count(&field, 3).unwrap(), 3);
        assert!(matches!(
            count(&field, -1),
            Err(Md3Error::InvalidField {
                field: "num_verts",
                value: -1
            })
        ));
    }
}
