//! MD3 container header

use crate::error::{Md3Error, Result};
use crate::layout::{self, Encoding, Field, Record, RecordLayout};
use crate::reader::ByteReader;
use log::debug;

/// Magic signature shared by the container and every surface ("IDP3")
pub const MD3_MAGIC: [u8; 4] = *b"IDP3";

/// The only supported format version
pub const MD3_VERSION: i32 = 15;

/// Header field descriptors
pub mod fields {
    use super::{Encoding, Field};

    pub const IDENT: Field = Field::new("ident", 0, 4, Encoding::Ident);
    pub const VERSION: Field = Field::new("version", 4, 4, Encoding::I32);
    pub const NAME: Field = Field::new("name", 8, 64, Encoding::Name);
    pub const FLAGS: Field = Field::new("flags", 72, 4, Encoding::I32);
    pub const NUM_FRAMES: Field = Field::new("num_frames", 76, 4, Encoding::I32);
    pub const NUM_TAGS: Field = Field::new("num_tags", 80, 4, Encoding::I32);
    pub const NUM_SURFACES: Field = Field::new("num_surfaces", 84, 4, Encoding::I32);
    pub const NUM_SKINS: Field = Field::new("num_skins", 88, 4, Encoding::I32);
    pub const OFS_FRAMES: Field = Field::new("ofs_frames", 92, 4, Encoding::I32);
    pub const OFS_TAGS: Field = Field::new("ofs_tags", 96, 4, Encoding::I32);
    pub const OFS_SURFACES: Field = Field::new("ofs_surfaces", 100, 4, Encoding::I32);
    pub const OFS_END: Field = Field::new("ofs_end", 104, 4, Encoding::I32);
}

/// Byte layout of the 108-byte container header
pub const HEADER_LAYOUT: RecordLayout = RecordLayout {
    name: "header",
    size: 108,
    fields: &[
        fields::IDENT,
        fields::VERSION,
        fields::NAME,
        fields::FLAGS,
        fields::NUM_FRAMES,
        fields::NUM_TAGS,
        fields::NUM_SURFACES,
        fields::NUM_SKINS,
        fields::OFS_FRAMES,
        fields::OFS_TAGS,
        fields::OFS_SURFACES,
        fields::OFS_END,
    ],
};

/// Decoded MD3 header
///
/// Counts are validated to be non-negative. Offsets are kept as the raw
/// signed values from the file and are only trusted after a bounds check
/// at the point of use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Md3Header {
    /// Magic signature ("IDP3")
    pub magic: [u8; 4],
    /// Format version (15)
    pub version: i32,
    /// Model display name
    pub name: String,
    /// Flag bits, unused by the format
    pub flags: i32,
    /// Number of animation frames
    pub num_frames: usize,
    /// Number of tags per frame
    pub num_tags: usize,
    /// Number of surfaces
    pub num_surfaces: usize,
    /// Number of skins, unused by the format
    pub num_skins: usize,
    /// Offset of the frame block
    pub ofs_frames: i32,
    /// Offset of the tag block
    pub ofs_tags: i32,
    /// Offset of the first surface
    pub ofs_surfaces: i32,
    /// Offset of the end of the file
    pub ofs_end: i32,
}

impl Md3Header {
    /// Size of the header record in bytes
    pub const SIZE: usize = HEADER_LAYOUT.size;

    /// Decode and validate the header at offset 0
    pub fn parse(reader: &ByteReader<'_>) -> Result<Self> {
        let bytes = reader.read_at(0, Self::SIZE as u64)?;
        let record = Record::new(&HEADER_LAYOUT, bytes)?;

        let magic = record.ident(&fields::IDENT);
        if magic != MD3_MAGIC {
            return Err(Md3Error::InvalidMagic {
                expected: layout::ident_to_string(MD3_MAGIC),
                found: layout::ident_to_string(magic),
            });
        }

        let version = record.i32(&fields::VERSION);
        if version != MD3_VERSION {
            return Err(Md3Error::UnsupportedVersion(version));
        }

        let ofs_end = record.i32(&fields::OFS_END);
        if i64::from(ofs_end) > reader.len() as i64 {
            return Err(Md3Error::Truncated {
                field: fields::OFS_END.name,
                declared: ofs_end.into(),
                actual: reader.len(),
            });
        }

        let header = Self {
            magic,
            version,
            name: record.name(&fields::NAME),
            flags: record.i32(&fields::FLAGS),
            num_frames: layout::count(&fields::NUM_FRAMES, record.i32(&fields::NUM_FRAMES))?,
            num_tags: layout::count(&fields::NUM_TAGS, record.i32(&fields::NUM_TAGS))?,
            num_surfaces: layout::count(
                &fields::NUM_SURFACES,
                record.i32(&fields::NUM_SURFACES),
            )?,
            num_skins: layout::count(&fields::NUM_SKINS, record.i32(&fields::NUM_SKINS))?,
            ofs_frames: record.i32(&fields::OFS_FRAMES),
            ofs_tags: record.i32(&fields::OFS_TAGS),
            ofs_surfaces: record.i32(&fields::OFS_SURFACES),
            ofs_end,
        };

        debug!(
            "MD3 header '{}': {} frames, {} tags, {} surfaces",
            header.name, header.num_frames, header.num_tags, header.num_surfaces
        );

        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn header_bytes(magic: &[u8; 4], version: i32, ofs_end: i32) -> Vec<u8> {
        let mut data = vec![0u8; Md3Header::SIZE];
        data[0..4].copy_from_slice(magic);
        data[4..8].copy_from_slice(&version.to_le_bytes());
        data[8..13].copy_from_slice(b"tank\0");
        data[76..80].copy_from_slice(&1i32.to_le_bytes());
        data[100..104].copy_from_slice(&108i32.to_le_bytes());
        data[104..108].copy_from_slice(&ofs_end.to_le_bytes());
        data
    }

    #[test]
    fn test_layout_is_contiguous() {
        assert!(HEADER_LAYOUT.is_contiguous());
        assert_eq!(Md3Header::SIZE, 108);
    }

    #[test]
    fn test_parse_header() {
        let data = header_bytes(b"IDP3", 15, 108);
        let header = Md3Header::parse(&ByteReader::new(&data)).unwrap();
        assert_eq!(header.name, "tank");
        assert_eq!(header.num_frames, 1);
        assert_eq!(header.num_surfaces, 0);
        assert_eq!(header.ofs_surfaces, 108);
    }

    #[test]
    fn test_bad_magic() {
        let data = header_bytes(b"IDP2", 15, 108);
        let err = Md3Header::parse(&ByteReader::new(&data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(matches!(err, Md3Error::InvalidMagic { .. }));
    }

    #[test]
    fn test_bad_version() {
        let data = header_bytes(b"IDP3", 16, 108);
        let err = Md3Header::parse(&ByteReader::new(&data)).unwrap_err();
        assert!(matches!(err, Md3Error::UnsupportedVersion(16)));
    }

    #[test]
    fn test_truncated() {
        let data = header_bytes(b"IDP3", 15, 500);
        let err = Md3Header::parse(&ByteReader::new(&data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Truncated);
    }

    #[test]
    fn test_short_input() {
        let data = header_bytes(b"IDP3", 15, 108);
        let err = Md3Header::parse(&ByteReader::new(&data[..60])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    }

    #[test]
    fn test_negative_count() {
        let mut data = header_bytes(b"IDP3", 15, 108);
        data[84..88].copy_from_slice(&(-2i32).to_le_bytes());
        let err = Md3Header::parse(&ByteReader::new(&data)).unwrap_err();
        assert!(matches!(
            err,
            Md3Error::InvalidField {
                field: "num_surfaces",
                ..
            }
        ));
    }
}
