//! Parser and Wavefront OBJ exporter for Quake III MD3 model files.
//!
//! MD3 files hold a header, per-frame metadata, attachment tags and a list
//! of surfaces. Each surface stores triangles, texture coordinates and one
//! set of quantized vertices per animation frame. This crate decodes those
//! blocks with every offset checked against the real input length, and
//! writes the geometry as OBJ text.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//! use q3_md3::{ConversionSession, ExportOptions};
//!
//! let mut session = ConversionSession::new(ExportOptions::default());
//!
//! // One document per animation frame
//! let report = session.convert_single(Path::new("head.md3"), None)?;
//! println!("{} documents written", report.written.len());
//!
//! // Frame zero of several models, placed by their first tag
//! session.merge(&["lower.md3", "upper.md3", "head.md3"], Path::new("player.obj"))?;
//! # Ok::<(), q3_md3::Md3Error>(())
//! ```

#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

pub mod error;
pub mod frame;
pub mod header;
pub mod layout;
pub mod model;
pub mod obj;
pub mod reader;
pub mod session;
pub mod surface;
pub mod tag;
pub mod transform;
pub mod validation;

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
mod fixture;

// Re-export common types
pub use error::{ErrorKind, Md3Error, Result};
pub use header::Md3Header;
pub use model::Md3Model;
pub use session::{ConversionSession, MergeReport, SingleReport};
pub use transform::ExportOptions;
pub use validation::{ValidationIssue, validate};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
