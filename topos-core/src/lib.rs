#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

/// Topos Core Library - coordinate arrays, face topology and mesh generation
///
/// Vertices live in a `CoordinateArray` stored as Cartesian or cylindrical
/// rows, faces are 1-based index rows in a `FaceArray`, and a `Mesh` couples
/// the two with a name.

pub mod axis;
pub mod error;
pub mod faces;
pub mod generators;
pub mod geometry;
pub mod io;
pub mod template;
pub mod transform;
pub mod vertices;
pub mod view;

// Re-export commonly used types
pub use axis::Axis;
pub use error::{Result, ToposError};
pub use faces::{FaceArray, FaceKind};
pub use generators::{PlaneParams, TubeParams};
pub use geometry::{Geometry, Mesh};
pub use io::{format_for_extension, DataFormat, JsonFormat, ObjFormat};
pub use template::Template;
pub use transform::{Displace, Pipeline, Rotate, Scale, Translate, VertexTransform};
pub use vertices::{CoordinateArray, System};
pub use view::WorldView;
