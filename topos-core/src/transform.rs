/// Vertex transforms and the copy-before-mutate pipeline that applies them
use std::ops::Shr;

use nalgebra::{Rotation3, Vector3};

use crate::axis::Axis;
use crate::error::{Result, ToposError};
use crate::geometry::{Geometry, Mesh};
use crate::vertices::{CoordinateArray, System};

/// A transform that acts only on the vertices of a geometry.
///
/// `transform` receives an array it owns and may mutate it freely.
/// [`apply`](VertexTransform::apply) always hands it a copy, so the source
/// geometry is never altered.
pub trait VertexTransform {
    fn transform(&self, vertices: CoordinateArray) -> Result<CoordinateArray>;

    /// Produce a new mesh from `geometry` with transformed vertices, the
    /// source's faces (shared, not copied) and the source's name.
    fn apply(&self, geometry: &dyn Geometry) -> Result<Mesh> {
        let vertices = geometry
            .vertices()
            .ok_or(ToposError::MissingField { field: "vertices" })?
            .into_owned();

        Ok(Mesh::from_parts(
            Some(self.transform(vertices)?),
            geometry.faces().cloned(),
            Some(geometry.name().to_string()),
        ))
    }
}

impl<F> VertexTransform for F
where
    F: Fn(CoordinateArray) -> Result<CoordinateArray>,
{
    fn transform(&self, vertices: CoordinateArray) -> Result<CoordinateArray> {
        self(vertices)
    }
}

impl<T: VertexTransform> Shr<&T> for &Mesh {
    type Output = Result<Mesh>;

    fn shr(self, transform: &T) -> Result<Mesh> {
        transform.apply(self)
    }
}

/// Per-axis values for `x, y, z, r, t`, visited in that order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct AxisValues([Option<f64>; 5]);

impl AxisValues {
    fn set(&mut self, axis: Axis, value: f64) {
        self.0[axis as usize] = Some(value);
    }

    fn iter(&self) -> impl Iterator<Item = (Axis, f64)> + '_ {
        Axis::ALL
            .iter()
            .zip(self.0.iter())
            .filter_map(|(&axis, value)| value.map(|v| (axis, v)))
    }
}

/// Multiply coordinate variables by constant factors.
///
/// Factors go through the ordinary axis writes, so scaling `r` on a
/// Cartesian array moves `x` and `y` together.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scale {
    factors: AxisValues,
}

impl Scale {
    pub fn new() -> Self {
        Self::default()
    }

    /// The same factor on `x`, `y` and `z`.
    pub fn uniform(factor: f64) -> Self {
        Self::new().x(factor).y(factor).z(factor)
    }

    pub fn axis(mut self, axis: Axis, factor: f64) -> Self {
        self.factors.set(axis, factor);
        self
    }

    pub fn x(self, factor: f64) -> Self {
        self.axis(Axis::X, factor)
    }

    pub fn y(self, factor: f64) -> Self {
        self.axis(Axis::Y, factor)
    }

    pub fn z(self, factor: f64) -> Self {
        self.axis(Axis::Z, factor)
    }

    pub fn r(self, factor: f64) -> Self {
        self.axis(Axis::R, factor)
    }

    pub fn t(self, factor: f64) -> Self {
        self.axis(Axis::T, factor)
    }
}

impl VertexTransform for Scale {
    fn transform(&self, mut vertices: CoordinateArray) -> Result<CoordinateArray> {
        for (axis, factor) in self.factors.iter() {
            let values: Vec<f64> = vertices.axis(axis).iter().map(|v| v * factor).collect();
            vertices.set_axis(axis, &values)?;
        }
        Ok(vertices)
    }
}

/// Add constant offsets to coordinate variables.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Displace {
    offsets: AxisValues,
}

impl Displace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn axis(mut self, axis: Axis, offset: f64) -> Self {
        self.offsets.set(axis, offset);
        self
    }

    pub fn x(self, offset: f64) -> Self {
        self.axis(Axis::X, offset)
    }

    pub fn y(self, offset: f64) -> Self {
        self.axis(Axis::Y, offset)
    }

    pub fn z(self, offset: f64) -> Self {
        self.axis(Axis::Z, offset)
    }

    pub fn r(self, offset: f64) -> Self {
        self.axis(Axis::R, offset)
    }

    pub fn t(self, offset: f64) -> Self {
        self.axis(Axis::T, offset)
    }
}

impl VertexTransform for Displace {
    fn transform(&self, mut vertices: CoordinateArray) -> Result<CoordinateArray> {
        for (axis, offset) in self.offsets.iter() {
            let values: Vec<f64> = vertices.axis(axis).iter().map(|v| v + offset).collect();
            vertices.set_axis(axis, &values)?;
        }
        Ok(vertices)
    }
}

/// Add a vector to every row in the array's native system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Translate(pub Vector3<f64>);

impl Translate {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Vector3::new(x, y, z))
    }
}

impl VertexTransform for Translate {
    fn transform(&self, vertices: CoordinateArray) -> Result<CoordinateArray> {
        Ok(vertices + self.0)
    }
}

/// Rotate Cartesian positions about the origin.
///
/// Angles are in radians and applied in the order Z, Y, X. The result is
/// stored back in the array's native system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotate {
    rotation: Rotation3<f64>,
}

impl Rotate {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            rotation: Rotation3::from_euler_angles(x, y, z),
        }
    }

    /// Rotation about the `z` axis only.
    pub fn about_z(angle: f64) -> Self {
        Self::new(0.0, 0.0, angle)
    }

    pub fn rotation(&self) -> &Rotation3<f64> {
        &self.rotation
    }
}

impl VertexTransform for Rotate {
    fn transform(&self, vertices: CoordinateArray) -> Result<CoordinateArray> {
        let system = vertices.system();
        let rotated = vertices
            .cartesian()
            .iter()
            .map(|p| self.rotation.transform_vector(p))
            .collect();

        Ok(CoordinateArray::new(System::Cartesian, rotated).to_system(system))
    }
}

/// Transforms applied one after another.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn VertexTransform>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, stage: impl VertexTransform + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn push(&mut self, stage: Box<dyn VertexTransform>) {
        self.stages.push(stage);
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl VertexTransform for Pipeline {
    fn transform(&self, vertices: CoordinateArray) -> Result<CoordinateArray> {
        self.stages
            .iter()
            .try_fold(vertices, |vertices, stage| stage.transform(vertices))
    }
}
