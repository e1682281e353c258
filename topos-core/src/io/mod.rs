/// Text formats for geometry
use std::borrow::Cow;
use std::sync::Arc;

use crate::error::{Result, ToposError};
use crate::faces::FaceArray;
use crate::geometry::{Geometry, Mesh};
use crate::vertices::CoordinateArray;

pub mod json;
pub mod obj;

pub use json::JsonFormat;
pub use obj::ObjFormat;

/// A textual encoding of geometry.
///
/// Formats work on strings only; reading and writing files is left to the
/// caller.
pub trait DataFormat {
    /// File extension, without the dot.
    fn extension(&self) -> &'static str;

    fn dumps(&self, geometry: &dyn Geometry) -> Result<String>;

    fn loads(&self, text: &str) -> Result<Mesh>;
}

/// The format registered for a file extension, if any.
pub fn format_for_extension(extension: &str) -> Option<Box<dyn DataFormat>> {
    match extension.to_ascii_lowercase().as_str() {
        "obj" => Some(Box::new(ObjFormat)),
        "json" => Some(Box::new(JsonFormat)),
        _ => None,
    }
}

/// Vertex and face arrays of `geometry`, failing when either is missing.
pub(crate) fn require_parts(
    geometry: &dyn Geometry,
) -> Result<(Cow<'_, CoordinateArray>, &Arc<FaceArray>)> {
    let vertices = geometry
        .vertices()
        .ok_or(ToposError::MissingField { field: "vertices" })?;
    let faces = geometry
        .faces()
        .ok_or(ToposError::MissingField { field: "faces" })?;
    Ok((vertices, faces))
}
