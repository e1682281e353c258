/// Face arrays: fixed-arity rows of vertex indices
use std::fmt;
use std::slice::ChunksExact;

use serde_json::Value;

use crate::error::{json_kind, Result, ToposError};
use crate::template::render_rows;

/// The shape of every face in a [`FaceArray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceKind {
    Tri,
    Quad,
}

impl FaceKind {
    /// Number of indices per face.
    pub fn arity(self) -> usize {
        match self {
            FaceKind::Tri => 3,
            FaceKind::Quad => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FaceKind::Tri => "Tri",
            FaceKind::Quad => "Quad",
        }
    }

    pub fn from_arity(arity: usize) -> Result<Self> {
        match arity {
            3 => Ok(FaceKind::Tri),
            4 => Ok(FaceKind::Quad),
            found => Err(ToposError::WrongArity {
                expected: None,
                found,
            }),
        }
    }
}

/// Faces as rows of vertex indices, all of the same arity.
///
/// Indices refer to a companion vertex array and are 1-based, as written
/// to OBJ files. Nothing here checks them against a vertex count; use
/// [`FaceArray::check_bounds`] where that matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceArray {
    indices: Vec<usize>,
    kind: FaceKind,
}

impl FaceArray {
    pub fn tris(rows: impl IntoIterator<Item = [usize; 3]>) -> Self {
        Self {
            indices: rows.into_iter().flatten().collect(),
            kind: FaceKind::Tri,
        }
    }

    pub fn quads(rows: impl IntoIterator<Item = [usize; 4]>) -> Self {
        Self {
            indices: rows.into_iter().flatten().collect(),
            kind: FaceKind::Quad,
        }
    }

    /// Build from rows that must all have `kind.arity()` indices.
    pub fn from_rows<R: AsRef<[usize]>>(kind: FaceKind, rows: &[R]) -> Result<Self> {
        let mut indices = Vec::with_capacity(rows.len() * kind.arity());

        for row in rows {
            let row = row.as_ref();
            if row.len() != kind.arity() {
                return Err(ToposError::WrongArity {
                    expected: Some(kind.arity()),
                    found: row.len(),
                });
            }
            indices.extend_from_slice(row);
        }

        Ok(Self { indices, kind })
    }

    /// Build from rows, taking the arity from the first row. An empty input
    /// gives an empty quad array.
    pub fn with_arity<R: AsRef<[usize]>>(rows: &[R]) -> Result<Self> {
        let kind = match rows.first() {
            Some(row) => FaceKind::from_arity(row.as_ref().len())?,
            None => FaceKind::Quad,
        };
        Self::from_rows(kind, rows)
    }

    /// Build from a JSON array of integer rows.
    ///
    /// With `kind` unset the arity is taken from the first row.
    pub fn from_json(kind: Option<FaceKind>, value: &Value) -> Result<Self> {
        let rows = value.as_array().ok_or_else(|| {
            ToposError::wrong_buffer(format!("expected an array of rows, found {}", json_kind(value)))
        })?;

        let mut parsed = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let cells = row.as_array().ok_or_else(|| {
                ToposError::wrong_buffer(format!("row {} is {}", i, json_kind(row)))
            })?;

            let indices = cells
                .iter()
                .map(|cell| match cell {
                    Value::Number(n) => n
                        .as_u64()
                        .and_then(|n| usize::try_from(n).ok())
                        .ok_or_else(|| ToposError::NonIntegerIndex {
                            found: n.to_string(),
                        }),
                    other => Err(ToposError::wrong_buffer(format!(
                        "row {} contains {}",
                        i,
                        json_kind(other)
                    ))),
                })
                .collect::<Result<Vec<usize>>>()?;
            parsed.push(indices);
        }

        match kind {
            Some(kind) => Self::from_rows(kind, &parsed),
            None => Self::with_arity(&parsed),
        }
    }

    pub fn kind(&self) -> FaceKind {
        self.kind
    }

    pub fn arity(&self) -> usize {
        self.kind.arity()
    }

    pub fn len(&self) -> usize {
        self.indices.len() / self.arity()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// All indices, row after row.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn rows(&self) -> ChunksExact<'_, usize> {
        self.indices.chunks_exact(self.arity())
    }

    pub fn row(&self, i: usize) -> Option<&[usize]> {
        let arity = self.arity();
        self.indices.get(i * arity..(i + 1) * arity)
    }

    pub fn max_index(&self) -> Option<usize> {
        self.indices.iter().copied().max()
    }

    /// Check every index lies in `1..=vertex_count`.
    pub fn check_bounds(&self, vertex_count: usize) -> Result<()> {
        match self
            .indices
            .iter()
            .find(|&&index| index == 0 || index > vertex_count)
        {
            Some(&index) => Err(ToposError::IndexOutOfBounds {
                index,
                vertex_count,
            }),
            None => Ok(()),
        }
    }

    /// Render every face through `template`; same contract as
    /// [`CoordinateArray::fmt`](crate::CoordinateArray::fmt).
    pub fn fmt(&self, template: &str, prefix: &str, suffix: &str, sep: &str) -> Result<String> {
        render_rows(template, prefix, suffix, sep, self.arity(), self.rows())
    }
}

impl fmt::Display for FaceArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.len() == 1 { "face" } else { "faces" };
        write!(f, "{} Array: {} {}", self.kind.name(), self.len(), noun)
    }
}
