/// Vertex arrays stored natively in Cartesian or cylindrical coordinates
use std::borrow::Cow;
use std::fmt;
use std::ops::Add;

use log::{debug, warn};
use nalgebra::Vector3;
use serde_json::Value;

use crate::axis::Axis;
use crate::error::{json_kind, Result, ToposError};
use crate::template::render_rows;

/// The coordinate system an array's buffer is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum System {
    Cartesian,
    Cylindrical,
}

impl System {
    pub fn name(self) -> &'static str {
        match self {
            System::Cartesian => "Cartesian",
            System::Cylindrical => "Cylindrical",
        }
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Convert a Cartesian `(x, y, z)` row to cylindrical `(θ, z, r)`.
///
/// `θ = atan2(y, x)` lies in `(−π, π]`. At `r = 0` the angle is
/// underdetermined and comes out as `0` (or `±π` for signed zeros).
#[inline]
pub fn cartesian_to_cylindrical(p: &Vector3<f64>) -> Vector3<f64> {
    let r = (p.x * p.x + p.y * p.y).sqrt();
    let t = p.y.atan2(p.x);
    Vector3::new(t, p.z, r)
}

/// Convert a cylindrical `(θ, z, r)` row to Cartesian `(x, y, z)`.
#[inline]
pub fn cylindrical_to_cartesian(c: &Vector3<f64>) -> Vector3<f64> {
    let (t, z, r) = (c[0], c[1], c[2]);
    Vector3::new(r * t.cos(), r * t.sin(), z)
}

/// An `(N, 3)` array of vertices under one native coordinate system.
///
/// The buffer is stored in one system and every other view is computed on
/// demand. Cartesian rows are `(x, y, z)`; cylindrical rows are `(θ, z, r)`,
/// so a tube unrolls into the same raster layout as a planar grid and both
/// share face generation.
///
/// Per-axis writes on the foreign system recompute a coupled pair of native
/// columns; see the `set_*` methods for the exact coupling.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateArray {
    data: Vec<Vector3<f64>>,
    system: System,
}

impl CoordinateArray {
    /// Take ownership of `data`, interpreted in `system`.
    pub fn new(system: System, data: Vec<Vector3<f64>>) -> Self {
        Self { data, system }
    }

    /// Cartesian array from `(x, y, z)` triples.
    pub fn new_cartesian(points: impl IntoIterator<Item = [f64; 3]>) -> Self {
        Self::new(
            System::Cartesian,
            points.into_iter().map(Vector3::from).collect(),
        )
    }

    /// Cylindrical array from `(θ, z, r)` triples.
    pub fn new_cylindrical(points: impl IntoIterator<Item = [f64; 3]>) -> Self {
        Self::new(
            System::Cylindrical,
            points.into_iter().map(Vector3::from).collect(),
        )
    }

    /// Build from rows of arbitrary length; every row must have 3 values.
    pub fn from_rows<R: AsRef<[f64]>>(system: System, rows: &[R]) -> Result<Self> {
        let data = rows
            .iter()
            .enumerate()
            .map(|(i, row)| match row.as_ref() {
                [a, b, c] => Ok(Vector3::new(*a, *b, *c)),
                other => Err(ToposError::invalid_shape(format!(
                    "row {} has {} values",
                    i,
                    other.len()
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(system, data))
    }

    /// Build from a JSON value holding an array of 3-element numeric arrays.
    pub fn from_json(system: System, value: &Value) -> Result<Self> {
        let rows = value.as_array().ok_or_else(|| {
            ToposError::invalid_shape(format!("expected an array of rows, found {}", json_kind(value)))
        })?;

        let mut data = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let cells = match row.as_array() {
                Some(cells) if cells.len() == 3 => cells,
                _ => {
                    return Err(ToposError::invalid_shape(format!(
                        "row {} is {}",
                        i,
                        json_kind(row)
                    )))
                }
            };

            let mut v = Vector3::zeros();
            for (j, cell) in cells.iter().enumerate() {
                v[j] = cell.as_f64().ok_or_else(|| ToposError::InvalidDtype {
                    found: json_kind(cell),
                })?;
            }
            data.push(v);
        }

        Ok(Self::new(system, data))
    }

    pub fn system(&self) -> System {
        self.system
    }

    /// The native buffer.
    pub fn data(&self) -> &[Vector3<f64>] {
        &self.data
    }

    pub fn into_data(self) -> Vec<Vector3<f64>> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Rows as `(x, y, z)`. Borrowed when the array is natively Cartesian.
    pub fn cartesian(&self) -> Cow<'_, [Vector3<f64>]> {
        match self.system {
            System::Cartesian => Cow::Borrowed(&self.data),
            System::Cylindrical => {
                Cow::Owned(self.data.iter().map(cylindrical_to_cartesian).collect())
            }
        }
    }

    /// Rows as `(θ, z, r)`. Borrowed when the array is natively cylindrical.
    pub fn cylindrical(&self) -> Cow<'_, [Vector3<f64>]> {
        match self.system {
            System::Cylindrical => Cow::Borrowed(&self.data),
            System::Cartesian => {
                Cow::Owned(self.data.iter().map(cartesian_to_cylindrical).collect())
            }
        }
    }

    /// Rows expressed in `system`.
    pub fn rows_in(&self, system: System) -> Cow<'_, [Vector3<f64>]> {
        match system {
            System::Cartesian => self.cartesian(),
            System::Cylindrical => self.cylindrical(),
        }
    }

    /// A new array holding the same points stored natively in `system`.
    pub fn to_system(&self, system: System) -> CoordinateArray {
        debug!(
            "converting {} vertices from {} to {}",
            self.len(),
            self.system,
            system
        );
        Self::new(system, self.rows_in(system).into_owned())
    }

    /// Values of one axis, computed from the native representation.
    pub fn axis(&self, axis: Axis) -> Vec<f64> {
        let (rows, column) = match axis {
            Axis::X => (self.cartesian(), 0),
            Axis::Y => (self.cartesian(), 1),
            Axis::Z => (self.cartesian(), 2),
            Axis::T => (self.cylindrical(), 0),
            Axis::R => (self.cylindrical(), 2),
        };
        rows.iter().map(|row| row[column]).collect()
    }

    pub fn x(&self) -> Vec<f64> {
        self.axis(Axis::X)
    }

    pub fn y(&self) -> Vec<f64> {
        self.axis(Axis::Y)
    }

    pub fn z(&self) -> Vec<f64> {
        self.axis(Axis::Z)
    }

    pub fn r(&self) -> Vec<f64> {
        self.axis(Axis::R)
    }

    pub fn t(&self) -> Vec<f64> {
        self.axis(Axis::T)
    }

    /// Stack the requested axes column-wise, one output row per vertex.
    ///
    /// Axes may repeat and appear in any order.
    pub fn project(&self, axes: &[Axis]) -> Vec<Vec<f64>> {
        let columns: Vec<Vec<f64>> = axes.iter().map(|&axis| self.axis(axis)).collect();

        (0..self.len())
            .map(|i| columns.iter().map(|column| column[i]).collect())
            .collect()
    }

    /// [`project`](Self::project) with a compact key such as `"xz"`.
    pub fn project_key(&self, key: &str) -> Result<Vec<Vec<f64>>> {
        Ok(self.project(&Axis::parse_key(key)?))
    }

    /// Write `values` to `axis`, dispatching to the matching `set_*` method.
    pub fn set_axis(&mut self, axis: Axis, values: &[f64]) -> Result<()> {
        match axis {
            Axis::X => self.set_x(values),
            Axis::Y => self.set_y(values),
            Axis::Z => self.set_z(values),
            Axis::R => self.set_r(values),
            Axis::T => self.set_t(values),
        }
    }

    /// Set `x`.
    ///
    /// Cartesian: writes column 0 only. Cylindrical: with `y` taken from the
    /// current points, stores `θ = atan2(y, x)` and `r = x / cos θ`. The
    /// division is unstable where `cos θ` approaches zero.
    pub fn set_x(&mut self, xs: &[f64]) -> Result<()> {
        self.check_len(xs)?;

        match self.system {
            System::Cartesian => self.write_column(0, xs),
            System::Cylindrical => {
                let ys = self.y();
                for ((row, &x), &y) in self.data.iter_mut().zip(xs).zip(&ys) {
                    let t = y.atan2(x);
                    row[0] = t;
                    row[2] = x / t.cos();
                }
                self.warn_non_finite(Axis::X);
            }
        }
        Ok(())
    }

    /// Set `y`.
    ///
    /// Cartesian: writes column 1 only. Cylindrical: with `x` taken from the
    /// current points, stores `θ = atan2(y, x)` and `r = y / sin θ`. Points on
    /// the `x` axis give `0 / 0` and a NaN radius.
    pub fn set_y(&mut self, ys: &[f64]) -> Result<()> {
        self.check_len(ys)?;

        match self.system {
            System::Cartesian => self.write_column(1, ys),
            System::Cylindrical => {
                let xs = self.x();
                for ((row, &y), &x) in self.data.iter_mut().zip(ys).zip(&xs) {
                    let t = y.atan2(x);
                    row[2] = y / t.sin();
                    row[0] = t;
                }
                self.warn_non_finite(Axis::Y);
            }
        }
        Ok(())
    }

    /// Set `z`. Both systems store `z` directly.
    pub fn set_z(&mut self, zs: &[f64]) -> Result<()> {
        self.check_len(zs)?;

        match self.system {
            System::Cartesian => self.write_column(2, zs),
            System::Cylindrical => self.write_column(1, zs),
        }
        Ok(())
    }

    /// Set `r`.
    ///
    /// Cylindrical: writes column 2 only. Cartesian: recomputes `x` and `y`
    /// from the new radius and the existing angle.
    pub fn set_r(&mut self, rs: &[f64]) -> Result<()> {
        self.check_len(rs)?;

        match self.system {
            System::Cylindrical => self.write_column(2, rs),
            System::Cartesian => {
                let ts = self.t();
                self.write_polar(rs, &ts);
            }
        }
        Ok(())
    }

    /// Set `θ`.
    ///
    /// Cylindrical: writes column 0 only, without normalising the angle.
    /// Cartesian: recomputes `x` and `y` from the existing radius and the new
    /// angle.
    pub fn set_t(&mut self, ts: &[f64]) -> Result<()> {
        self.check_len(ts)?;

        match self.system {
            System::Cylindrical => self.write_column(0, ts),
            System::Cartesian => {
                let rs = self.r();
                self.write_polar(&rs, ts);
            }
        }
        Ok(())
    }

    /// Set `target` to `f` evaluated over the `inputs` axes of each vertex.
    ///
    /// Inputs are projected before anything is written, so `f` always sees
    /// the original values.
    pub fn set_axis_with<F>(&mut self, target: Axis, inputs: &[Axis], f: F) -> Result<()>
    where
        F: Fn(&[f64]) -> f64,
    {
        let values: Vec<f64> = self.project(inputs).iter().map(|row| f(row)).collect();
        self.set_axis(target, &values)
    }

    /// Rows of `other` followed by the rows of `self`, stored in `self`'s
    /// native system.
    pub fn concat(&self, other: &CoordinateArray) -> CoordinateArray {
        let mut data = Vec::with_capacity(self.len() + other.len());
        data.extend_from_slice(&other.rows_in(self.system));
        data.extend_from_slice(&self.data);
        Self::new(self.system, data)
    }

    /// Add `offset` to every row in the native system.
    pub fn translate(&self, offset: &Vector3<f64>) -> CoordinateArray {
        Self::new(
            self.system,
            self.data.iter().map(|row| row + offset).collect(),
        )
    }

    /// [`translate`](Self::translate) with an offset given as a slice.
    pub fn translate_by(&self, offset: &[f64]) -> Result<CoordinateArray> {
        match offset {
            [a, b, c] => Ok(self.translate(&Vector3::new(*a, *b, *c))),
            other => Err(ToposError::UnsupportedOperand {
                operand: format!(
                    "an array of shape ({},), array must have shape (3,)",
                    other.len()
                ),
            }),
        }
    }

    /// Render every vertex's Cartesian `(x, y, z)` through `template`.
    ///
    /// Rows are joined by `sep`, with `prefix` and `suffix` around the
    /// whole. No separator follows the last row.
    pub fn fmt(&self, template: &str, prefix: &str, suffix: &str, sep: &str) -> Result<String> {
        let cartesian = self.cartesian();
        render_rows(
            template,
            prefix,
            suffix,
            sep,
            3,
            cartesian.iter().map(|row| row.as_slice()),
        )
    }

    fn check_len(&self, values: &[f64]) -> Result<()> {
        if values.len() != self.len() {
            return Err(ToposError::ShapeMismatch {
                expected: self.len(),
                found: values.len(),
            });
        }
        Ok(())
    }

    fn write_column(&mut self, column: usize, values: &[f64]) {
        for (row, &value) in self.data.iter_mut().zip(values) {
            row[column] = value;
        }
    }

    fn write_polar(&mut self, rs: &[f64], ts: &[f64]) {
        for ((row, &r), &t) in self.data.iter_mut().zip(rs).zip(ts) {
            row[0] = r * t.cos();
            row[1] = r * t.sin();
        }
    }

    fn warn_non_finite(&self, axis: Axis) {
        let count = self.data.iter().filter(|row| !row[2].is_finite()).count();
        if count > 0 {
            warn!(
                "setting {} on a cylindrical array left {} of {} radii non-finite",
                axis,
                count,
                self.len()
            );
        }
    }
}

impl Add<&CoordinateArray> for &CoordinateArray {
    type Output = CoordinateArray;

    fn add(self, other: &CoordinateArray) -> CoordinateArray {
        self.concat(other)
    }
}

impl Add<Vector3<f64>> for &CoordinateArray {
    type Output = CoordinateArray;

    fn add(self, offset: Vector3<f64>) -> CoordinateArray {
        self.translate(&offset)
    }
}

impl Add<Vector3<f64>> for CoordinateArray {
    type Output = CoordinateArray;

    fn add(mut self, offset: Vector3<f64>) -> CoordinateArray {
        for row in &mut self.data {
            *row += offset;
        }
        self
    }
}

impl fmt::Display for CoordinateArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.len() == 1 { "vertex" } else { "vertices" };
        write!(f, "{} Array: {} {}", self.system, self.len(), noun)
    }
}
