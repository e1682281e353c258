/// Geometry containers coupling vertices, faces and a name
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, ToposError};
use crate::faces::FaceArray;
use crate::generators::{
    cylindrical_faces, cylindrical_vertices, planar_faces, planar_vertices, PlaneParams,
    TubeParams,
};
use crate::vertices::CoordinateArray;

/// Name reported by a geometry that was never given one.
pub const DEFAULT_NAME: &str = "Geometry";

/// Anything that can be read as named vertices and faces.
///
/// Serializers and transforms are written once against this trait and work
/// for plain meshes and derived views alike.
pub trait Geometry {
    fn name(&self) -> &str;

    /// The vertex array, borrowed when stored and owned when computed.
    fn vertices(&self) -> Option<Cow<'_, CoordinateArray>>;

    fn faces(&self) -> Option<&Arc<FaceArray>>;

    /// Multi-line summary: the name, then vertex and face counts when present.
    fn summary(&self) -> String {
        let mut s = format!("{}\n", self.name());
        if let Some(vertices) = self.vertices() {
            s.push_str(&format!("Vertices: {}\n", vertices.len()));
        }
        if let Some(faces) = self.faces() {
            s.push_str(&format!("Faces: {}\n", faces.len()));
        }
        s
    }
}

impl<G: Geometry + ?Sized> Geometry for &G {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn vertices(&self) -> Option<Cow<'_, CoordinateArray>> {
        (**self).vertices()
    }

    fn faces(&self) -> Option<&Arc<FaceArray>> {
        (**self).faces()
    }
}

/// A plain container for geometry data.
///
/// Faces sit behind an [`Arc`] so meshes derived by transforms share the
/// topology of their source instead of copying it. Face arrays are never
/// edited in place.
///
/// ```
/// use topos_core::{Geometry, Mesh, Scale, VertexTransform};
///
/// let tube = Mesh::tube(16, 4, true).unwrap();
/// let wide = Scale::new().r(2.0).apply(&tube).unwrap();
/// assert_eq!(wide.faces(), tube.faces());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Option<CoordinateArray>,
    faces: Option<Arc<FaceArray>>,
    name: Option<String>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        vertices: Option<CoordinateArray>,
        faces: Option<Arc<FaceArray>>,
        name: Option<String>,
    ) -> Self {
        Self {
            vertices,
            faces,
            name,
        }
    }

    pub fn with_vertices(mut self, vertices: CoordinateArray) -> Self {
        self.vertices = Some(vertices);
        self
    }

    pub fn with_faces(mut self, faces: impl Into<Arc<FaceArray>>) -> Self {
        self.faces = Some(faces.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// A unit plane of `n × n` vertices.
    pub fn plane(n: usize) -> Result<Self> {
        Self::plane_with(n, &PlaneParams::default())
    }

    pub fn plane_with(n: usize, params: &PlaneParams) -> Result<Self> {
        Ok(Self::new()
            .with_vertices(planar_vertices(n, params)?)
            .with_faces(planar_faces(n)?)
            .with_name("Plane"))
    }

    /// A unit-radius tube of `n_theta × n_z` vertices.
    pub fn tube(n_theta: usize, n_z: usize, close_loop: bool) -> Result<Self> {
        Self::tube_with(n_theta, n_z, close_loop, &TubeParams::default())
    }

    pub fn tube_with(
        n_theta: usize,
        n_z: usize,
        close_loop: bool,
        params: &TubeParams,
    ) -> Result<Self> {
        Ok(Self::new()
            .with_vertices(cylindrical_vertices(n_theta, n_z, params)?)
            .with_faces(cylindrical_faces(n_theta, n_z, close_loop)?)
            .with_name("Cylinder"))
    }

    /// Check the faces only refer to existing vertices.
    ///
    /// Construction never checks this; call it where a consumer needs it.
    pub fn validate(&self) -> Result<()> {
        match (&self.vertices, &self.faces) {
            (Some(vertices), Some(faces)) => faces.check_bounds(vertices.len()),
            (None, Some(_)) => Err(ToposError::MissingField { field: "vertices" }),
            _ => Ok(()),
        }
    }
}

impl Geometry for Mesh {
    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    fn vertices(&self) -> Option<Cow<'_, CoordinateArray>> {
        self.vertices.as_ref().map(Cow::Borrowed)
    }

    fn faces(&self) -> Option<&Arc<FaceArray>> {
        self.faces.as_ref()
    }
}

impl fmt::Display for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
