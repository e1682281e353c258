/// Coordinate axis identifiers used for projection and per-axis writes
use std::fmt;

use crate::error::{Result, ToposError};

/// A single coordinate variable.
///
/// `X`, `Y`, `Z` are Cartesian; `R` and `T` are the cylindrical radius and
/// angle. `Z` is shared by both systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    R,
    T,
}

impl Axis {
    /// All axes, in the order transforms visit them.
    pub const ALL: [Axis; 5] = [Axis::X, Axis::Y, Axis::Z, Axis::R, Axis::T];

    pub fn from_char(c: char) -> Result<Self> {
        match c {
            'x' => Ok(Axis::X),
            'y' => Ok(Axis::Y),
            'z' => Ok(Axis::Z),
            'r' => Ok(Axis::R),
            't' => Ok(Axis::T),
            other => Err(ToposError::UnknownAxis { axis: other }),
        }
    }

    pub fn letter(self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
            Axis::R => 'r',
            Axis::T => 't',
        }
    }

    /// Parse a compact key such as `"xz"` or `"rzt"`. Repeats are allowed.
    pub fn parse_key(key: &str) -> Result<Vec<Axis>> {
        if key.is_empty() {
            return Err(ToposError::NotIterable {
                details: "empty key".to_string(),
            });
        }

        key.chars().map(Axis::from_char).collect()
    }

    /// Parse a key given as separate parts, e.g. `["x", "z"]`.
    ///
    /// Each part must be exactly one character long.
    pub fn parse_parts<S: AsRef<str>>(parts: &[S]) -> Result<Vec<Axis>> {
        if parts.is_empty() {
            return Err(ToposError::NotIterable {
                details: "empty key".to_string(),
            });
        }

        parts
            .iter()
            .map(|part| {
                let part = part.as_ref();
                let mut chars = part.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Axis::from_char(c),
                    _ => Err(ToposError::NotIterable {
                        details: format!("{part:?} is not a single letter"),
                    }),
                }
            })
            .collect()
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}
