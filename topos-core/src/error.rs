/// Error types for the geometry kernel
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ToposError>;

/// Errors raised by vertex arrays, face arrays, generators and formats.
///
/// Every error is raised where it is detected and passed to the caller
/// unchanged. Numerical edge cases (the angle at `r = 0`, trig divisions near
/// the axes) are not errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ToposError {
    /// Vertex buffer is not a 2-D buffer with exactly 3 columns.
    #[error("vertex array must have shape (n, 3): {details}")]
    InvalidShape {
        /// Description of the offending shape.
        details: String,
    },

    /// Face buffer is not a 2-D buffer of rows.
    #[error("faces must be represented by a 2-D integer buffer: {details}")]
    WrongBufferType {
        /// Description of the offending buffer.
        details: String,
    },

    /// Vertex values are not numeric.
    #[error("vertex values must be numeric, found {found}")]
    InvalidDtype {
        /// The kind of value found.
        found: String,
    },

    /// Face values are not non-negative integers.
    #[error("faces can only be defined using integer indices, found {found}")]
    NonIntegerIndex {
        /// The value found.
        found: String,
    },

    /// Face rows do not match the declared arity.
    #[error(
        "face array must have shape (n, {}), found a row of length {found}",
        arity_text(.expected)
    )]
    WrongArity {
        /// Declared arity, or `None` when either 3 or 4 would do.
        expected: Option<usize>,
        /// Length of the offending row.
        found: usize,
    },

    /// A face refers to a vertex that does not exist.
    #[error("face index {index} out of range for {vertex_count} vertices")]
    IndexOutOfBounds {
        /// The offending 1-based index.
        index: usize,
        /// Number of vertices available.
        vertex_count: usize,
    },

    /// Axis assignment with the wrong number of values.
    #[error("coordinate array must have shape ({expected},), got {found} values")]
    ShapeMismatch {
        /// Length of the vertex array.
        expected: usize,
        /// Length of the supplied values.
        found: usize,
    },

    /// Arithmetic with an operand of the wrong shape or kind.
    #[error("addition is not supported with {operand}")]
    UnsupportedOperand {
        /// Description of the operand.
        operand: String,
    },

    /// Axis key contains a letter outside `xyzrt`.
    #[error("unknown coordinate variable {axis:?}")]
    UnknownAxis {
        /// The offending letter.
        axis: char,
    },

    /// Axis key is not a sequence of single characters.
    #[error("coordinates must be specified as a sequence of single letters: {details}")]
    NotIterable {
        /// Description of the offending key.
        details: String,
    },

    /// Non-positive grid resolution passed to a generator.
    #[error("argument {argument} must be a positive integer, got {value}")]
    InvalidCount {
        /// Name of the argument.
        argument: &'static str,
        /// The value supplied.
        value: usize,
    },

    /// A value of the wrong type was supplied for a field.
    #[error("{field} must be represented by {expected}")]
    TypeMismatch {
        /// Field being set.
        field: &'static str,
        /// The expected type.
        expected: &'static str,
    },

    /// A record that should describe a geometry does not.
    #[error("expected a geometry object, found {found}")]
    NotGeometry {
        /// What was found instead.
        found: String,
    },

    /// A required field is absent.
    #[error("missing expected field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A `fmt` template is malformed or references a missing column.
    #[error("invalid format template {template:?}: {reason}")]
    InvalidTemplate {
        /// The template source.
        template: String,
        /// What went wrong.
        reason: String,
    },

    /// A coordinate is NaN or infinite where the output format has no
    /// spelling for it.
    #[error("vertex {index} has non-finite coordinates, which {format} cannot represent")]
    NonFinite {
        /// Zero-based row of the offending vertex.
        index: usize,
        /// The output format.
        format: &'static str,
    },

    /// Input text could not be parsed.
    #[error("failed to parse {format}: {reason}")]
    Parse {
        /// The format being parsed.
        format: &'static str,
        /// Parser diagnostic.
        reason: String,
    },
}

impl ToposError {
    pub(crate) fn invalid_shape(details: impl Into<String>) -> Self {
        Self::InvalidShape {
            details: details.into(),
        }
    }

    pub(crate) fn wrong_buffer(details: impl Into<String>) -> Self {
        Self::WrongBufferType {
            details: details.into(),
        }
    }

    pub(crate) fn template(template: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}

fn arity_text(expected: &Option<usize>) -> String {
    match expected {
        Some(arity) => arity.to_string(),
        None => "3 or 4".to_string(),
    }
}

/// Short description of a JSON value's kind, used in error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(a) => format!("array of length {}", a.len()),
        Value::Object(_) => "object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ToposError::ShapeMismatch {
            expected: 4,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "coordinate array must have shape (4,), got 2 values"
        );

        let err = ToposError::UnknownAxis { axis: 'q' };
        assert_eq!(err.to_string(), "unknown coordinate variable 'q'");

        let err = ToposError::WrongArity {
            expected: None,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "face array must have shape (n, 3 or 4), found a row of length 2"
        );

        let err = ToposError::WrongArity {
            expected: Some(3),
            found: 4,
        };
        assert_eq!(
            err.to_string(),
            "face array must have shape (n, 3), found a row of length 4"
        );

        let err = ToposError::MissingField { field: "faces" };
        assert_eq!(err.to_string(), "missing expected field: faces");
    }

    #[test]
    fn test_json_kind() {
        assert_eq!(json_kind(&serde_json::json!("a")), "string \"a\"");
        assert_eq!(json_kind(&serde_json::json!([1, 2])), "array of length 2");
        assert_eq!(json_kind(&serde_json::json!(1.5)), "number 1.5");
    }
}
