/// World views: place a geometry in space without touching its data
use std::borrow::Cow;
use std::sync::Arc;

use nalgebra::Vector3;

use crate::error::{Result, ToposError};
use crate::faces::FaceArray;
use crate::geometry::Geometry;
use crate::vertices::{CoordinateArray, System};

/// A geometry seen at a position in the world.
///
/// Vertices are computed on each read as the wrapped geometry's Cartesian
/// vertices plus `position`; faces are the wrapped geometry's own.
#[derive(Debug, Clone)]
pub struct WorldView<G> {
    geometry: G,
    position: Vector3<f64>,
    name: String,
}

impl<G: Geometry> WorldView<G> {
    pub fn new(geometry: G) -> Self {
        Self {
            geometry,
            position: Vector3::zeros(),
            name: "WorldView".to_string(),
        }
    }

    pub fn at(mut self, position: Vector3<f64>) -> Self {
        self.position = position;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn position(&self) -> &Vector3<f64> {
        &self.position
    }

    pub fn set_position(&mut self, position: Vector3<f64>) {
        self.position = position;
    }

    /// Set the position from a slice, which must hold exactly 3 values.
    pub fn set_position_from(&mut self, position: &[f64]) -> Result<()> {
        match position {
            [x, y, z] => {
                self.position = Vector3::new(*x, *y, *z);
                Ok(())
            }
            other => Err(ToposError::UnsupportedOperand {
                operand: format!(
                    "a position of shape ({},), position must have shape (3,)",
                    other.len()
                ),
            }),
        }
    }

    pub fn move_by(&mut self, offset: &Vector3<f64>) {
        self.position += offset;
    }
}

impl<G: Geometry> Geometry for WorldView<G> {
    fn name(&self) -> &str {
        &self.name
    }

    fn vertices(&self) -> Option<Cow<'_, CoordinateArray>> {
        let vertices = self.geometry.vertices()?;
        let world = vertices
            .cartesian()
            .iter()
            .map(|p| p + self.position)
            .collect();
        Some(Cow::Owned(CoordinateArray::new(System::Cartesian, world)))
    }

    fn faces(&self) -> Option<&Arc<FaceArray>> {
        self.geometry.faces()
    }

    fn summary(&self) -> String {
        let mut s = format!("{}\n", self.name);
        s.push_str(&format!("Geometry: {}\n", self.geometry.name()));
        s.push_str(&format!(
            "Position: [{}, {}, {}]\n",
            self.position.x, self.position.y, self.position.z
        ));
        if let Some(vertices) = self.geometry.vertices() {
            s.push_str(&format!("Vertices: {}\n", vertices.len()));
        }
        if let Some(faces) = self.faces() {
            s.push_str(&format!("Faces: {}\n", faces.len()));
        }
        s
    }
}
