//! A fully loaded MD3 model

use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::error::Result;
use crate::frame::{Frame, parse_frames};
use crate::header::Md3Header;
use crate::reader::ByteReader;
use crate::surface::{Surface, parse_surfaces};
use crate::tag::{Tag, parse_tags};

/// Header, frame metadata, surfaces and frame-zero tags of one MD3 file
///
/// A model is either loaded completely or not at all: every header and
/// surface failure aborts the load and drops whatever was decoded so far.
/// Tags and frame metadata are the exception; if their blocks are
/// unreadable they are left empty and the load carries on.
#[derive(Debug, Clone, PartialEq)]
pub struct Md3Model {
    /// Container header
    pub header: Md3Header,
    /// Frame metadata, empty if the frame block could not be read
    pub frames: Vec<Frame>,
    /// Surfaces in file order
    pub surfaces: Vec<Surface>,
    /// Tags of frame zero, `None` if the model has none or they could not
    /// be read
    pub tags: Option<Vec<Tag>>,
}

impl Md3Model {
    /// Decode a model from an in-memory blob
    pub fn parse(data: &[u8]) -> Result<Self> {
        let reader = ByteReader::new(data);
        let header = Md3Header::parse(&reader)?;

        let tags = if header.num_tags > 0 {
            match parse_tags(&reader, &header) {
                Ok(tags) => Some(tags),
                Err(e) => {
                    warn!("Ignoring tags of '{}': {}", header.name, e);
                    None
                }
            }
        } else {
            None
        };

        let frames = parse_frames(&reader, &header).unwrap_or_else(|e| {
            warn!("Ignoring frame metadata of '{}': {}", header.name, e);
            Vec::new()
        });

        let surfaces = parse_surfaces(&reader, &header)?;

        Ok(Self {
            header,
            frames,
            surfaces,
            tags,
        })
    }

    /// Read and decode a model file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading MD3 model from {}", path.display());
        let data = fs::read(path)?;
        Self::parse(&data)
    }

    /// Model display name
    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// Number of animation frames declared by the header
    pub fn num_frames(&self) -> usize {
        self.header.num_frames
    }

    /// The first tag of frame zero, used to place the model when merging
    pub fn first_tag(&self) -> Option<&Tag> {
        self.tags.as_deref().and_then(<[Tag]>::first)
    }

    /// Vertices per frame across all surfaces
    pub fn total_vertices(&self) -> usize {
        self.surfaces.iter().map(Surface::num_verts).sum()
    }

    /// Triangles across all surfaces
    pub fn total_triangles(&self) -> usize {
        self.surfaces.iter().map(|s| s.triangles.len()).sum()
    }
}
