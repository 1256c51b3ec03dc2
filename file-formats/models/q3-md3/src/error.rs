//! Error handling for MD3 loading and OBJ export

use std::collections::TryReserveError;
use std::io;
use thiserror::Error;

/// Broad classification of an [`Md3Error`]
///
/// Callers that only care about the failure category (bad file format,
/// truncated file, bad offset, allocation, operating system I/O) can match
/// on this instead of on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad magic, bad version, or a structurally invalid field
    Format,
    /// A declared offset or size runs past the end of the input
    Truncated,
    /// An offset/size check failed while reading a block
    OutOfBounds,
    /// A buffer reservation was refused
    Allocation,
    /// File open/read/write failure
    Io,
}

/// Errors that can occur when working with MD3 files
#[derive(Debug, Error)]
pub enum Md3Error {
    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid magic value in a header record
    #[error("Invalid magic value: expected '{expected}', found '{found}'")]
    InvalidMagic {
        /// The expected magic value
        expected: String,
        /// The actual magic value found
        found: String,
    },

    /// Unsupported MD3 version
    #[error("Unsupported MD3 version: {0}")]
    UnsupportedVersion(i32),

    /// A count or offset field holds a value that cannot be valid
    #[error("Invalid value for field '{field}': {value}")]
    InvalidField {
        /// Name of the offending field
        field: &'static str,
        /// Raw value read from the file
        value: i64,
    },

    /// The header declares more data than the file holds
    #[error("File appears truncated: {field} is {declared} but file size is {actual}")]
    Truncated {
        /// Name of the declaring field
        field: &'static str,
        /// The declared value
        declared: i64,
        /// The measured input length
        actual: usize,
    },

    /// A block lies outside the data it was read from
    #[error("Block at offset {offset} with size {size} exceeds limit {limit}")]
    OutOfBounds {
        /// Offset where the read was attempted
        offset: i64,
        /// Size of data that was attempted to be read
        size: u64,
        /// The length the read was checked against
        limit: u64,
    },

    /// A buffer could not be reserved
    #[error("Failed to allocate {bytes} bytes for {what}")]
    Allocation {
        /// Which block the buffer was for
        what: &'static str,
        /// Requested size in bytes
        bytes: u64,
        /// Allocator error
        #[source]
        source: TryReserveError,
    },

    /// A surface failed to decode
    #[error("Surface {index} ('{name}'): {source}")]
    Surface {
        /// Zero-based surface index
        index: usize,
        /// Surface display name, empty if the header itself failed
        name: String,
        /// Underlying failure
        #[source]
        source: Box<Md3Error>,
    },

    /// A document requested a frame that a surface does not carry
    #[error("Frame {frame} requested but surface '{surface}' only has {frames} frames")]
    FrameOutOfRange {
        /// Surface display name
        surface: String,
        /// Requested frame
        frame: usize,
        /// Frames available in the surface
        frames: usize,
    },

    /// Merge mode could not load enough models
    #[error("At least {required} models must load for a merge, only {loaded} did")]
    NotEnoughModels {
        /// Models that loaded
        loaded: usize,
        /// Minimum required
        required: usize,
    },
}

impl Md3Error {
    /// Returns the broad category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::InvalidMagic { .. }
            | Self::UnsupportedVersion(_)
            | Self::InvalidField { .. }
            | Self::FrameOutOfRange { .. }
            | Self::NotEnoughModels { .. } => ErrorKind::Format,
            Self::Truncated { .. } => ErrorKind::Truncated,
            Self::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            Self::Allocation { .. } => ErrorKind::Allocation,
            Self::Surface { source, .. } => source.kind(),
        }
    }

    pub(crate) fn in_surface(self, index: usize, name: impl Into<String>) -> Self {
        Self::Surface {
            index,
            name: name.into(),
            source: Box::new(self),
        }
    }
}

/// Type alias for Results from MD3 operations
pub type Result<T> = std::result::Result<T, Md3Error>;
