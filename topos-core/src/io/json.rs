/// JSON reader and writer
use serde::Deserialize;
use serde_json::Value;

use crate::error::{json_kind, Result, ToposError};
use crate::faces::FaceArray;
use crate::geometry::{Geometry, Mesh};
use crate::io::{require_parts, DataFormat};
use crate::vertices::{CoordinateArray, System};

/// Name given to meshes loaded from records without a `name` field.
pub const DEFAULT_JSON_NAME: &str = "<json_mesh>";

/// A single JSON object:
///
/// ```json
/// {"name": "Plane", "vertices": [[0.0, 0.0, 0.0], ...], "faces": [[1, 2, 4, 3], ...]}
/// ```
///
/// Vertices are written and read as Cartesian; face rows keep the 1-based
/// indices of the face array.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

#[derive(Debug, Deserialize)]
struct Record {
    name: Option<Value>,
    vertices: Option<Value>,
    faces: Option<Value>,
}

impl JsonFormat {
    /// JSON has no NaN or infinity, so those are rejected rather than
    /// written as invalid text.
    fn dump_vertices(&self, vertices: &CoordinateArray) -> Result<String> {
        if let Some(index) = vertices
            .cartesian()
            .iter()
            .position(|row| row.iter().any(|v| !v.is_finite()))
        {
            return Err(ToposError::NonFinite {
                index,
                format: "JSON",
            });
        }
        vertices.fmt("[{}, {}, {}]", "[", "]", ", ")
    }

    fn dump_faces(&self, faces: &FaceArray) -> Result<String> {
        let fields = vec!["{}"; faces.arity()].join(", ");
        faces.fmt(&format!("[{fields}]"), "[", "]", ", ")
    }
}

impl DataFormat for JsonFormat {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn dumps(&self, geometry: &dyn Geometry) -> Result<String> {
        let (vertices, faces) = require_parts(geometry)?;

        let name = serde_json::to_string(geometry.name()).map_err(|e| ToposError::Parse {
            format: "JSON",
            reason: e.to_string(),
        })?;

        Ok(format!(
            "{{\"name\": {}, \"vertices\": {}, \"faces\": {}}}",
            name,
            self.dump_vertices(&vertices)?,
            self.dump_faces(faces)?
        ))
    }

    fn loads(&self, text: &str) -> Result<Mesh> {
        let value: Value = serde_json::from_str(text).map_err(|e| ToposError::Parse {
            format: "JSON",
            reason: e.to_string(),
        })?;

        if !value.is_object() {
            return Err(ToposError::NotGeometry {
                found: json_kind(&value),
            });
        }

        let record: Record = serde_json::from_value(value).map_err(|e| ToposError::Parse {
            format: "JSON",
            reason: e.to_string(),
        })?;

        let vertices = record
            .vertices
            .ok_or(ToposError::MissingField { field: "vertices" })?;
        let faces = record
            .faces
            .ok_or(ToposError::MissingField { field: "faces" })?;

        let name = match record.name {
            None => DEFAULT_JSON_NAME.to_string(),
            Some(Value::String(name)) => name,
            Some(_) => {
                return Err(ToposError::TypeMismatch {
                    field: "name",
                    expected: "a string",
                })
            }
        };

        Ok(Mesh::new()
            .with_vertices(CoordinateArray::from_json(System::Cartesian, &vertices)?)
            .with_faces(FaceArray::from_json(None, &faces)?)
            .with_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faces::FaceKind;

    #[test]
    fn test_dump_plane() {
        let plane = Mesh::plane(2).unwrap();
        let text = JsonFormat.dumps(&plane).unwrap();
        assert_eq!(
            text,
            "{\"name\": \"Plane\", \
             \"vertices\": [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]], \
             \"faces\": [[1, 2, 4, 3]]}"
        );
    }

    #[test]
    fn test_dump_is_valid_json() {
        let tube = Mesh::tube(5, 3, true).unwrap().with_name("a \"quoted\" tube");
        let text = JsonFormat.dumps(&tube).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["name"], "a \"quoted\" tube");
        assert_eq!(value["vertices"].as_array().unwrap().len(), 15);
        assert_eq!(value["faces"].as_array().unwrap().len(), 10);
    }

    #[test]
    fn test_dump_rejects_non_finite() {
        let mesh = Mesh::new()
            .with_vertices(CoordinateArray::new_cartesian([
                [0.0, 0.0, 0.0],
                [f64::NAN, 0.0, 0.0],
                [0.0, f64::INFINITY, 0.0],
            ]))
            .with_faces(FaceArray::tris([[1, 2, 3]]));
        assert_eq!(
            JsonFormat.dumps(&mesh),
            Err(ToposError::NonFinite {
                index: 1,
                format: "JSON"
            })
        );
    }

    #[test]
    fn test_dump_rejects_degenerate_axis_write() {
        use crate::transform::{Displace, VertexTransform};

        // Writing y on a tube divides by sin θ, which is 0 / 0 at θ = 0.
        let tube = Mesh::tube(4, 2, true).unwrap();
        let flat = Displace::new().y(0.0).apply(&tube).unwrap();
        assert!(matches!(
            JsonFormat.dumps(&flat),
            Err(ToposError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_round_trip_tube() {
        let tube = Mesh::tube(16, 4, true).unwrap();
        let loaded = JsonFormat.loads(&JsonFormat.dumps(&tube).unwrap()).unwrap();

        assert_eq!(loaded.name(), tube.name());
        assert_eq!(loaded.vertices().unwrap().len(), tube.vertices().unwrap().len());
        assert_eq!(loaded.faces(), tube.faces());
        assert_eq!(loaded.vertices().unwrap().system(), System::Cartesian);
    }

    #[test]
    fn test_load_defaults_and_tris() {
        let mesh = JsonFormat
            .loads(r#"{"vertices": [[0, 0, 0], [1, 0, 0], [0, 1, 0]], "faces": [[1, 2, 3]]}"#)
            .unwrap();
        assert_eq!(mesh.name(), DEFAULT_JSON_NAME);
        assert_eq!(mesh.faces().unwrap().kind(), FaceKind::Tri);
    }

    #[test]
    fn test_load_errors() {
        assert_eq!(
            JsonFormat.loads(r#"{"faces": []}"#),
            Err(ToposError::MissingField { field: "vertices" })
        );
        assert_eq!(
            JsonFormat.loads(r#"{"vertices": []}"#),
            Err(ToposError::MissingField { field: "faces" })
        );
        assert!(matches!(
            JsonFormat.loads("[1, 2, 3]"),
            Err(ToposError::NotGeometry { .. })
        ));
        assert!(matches!(
            JsonFormat.loads("{not json"),
            Err(ToposError::Parse { .. })
        ));
        assert_eq!(
            JsonFormat.loads(r#"{"name": 3, "vertices": [], "faces": []}"#),
            Err(ToposError::TypeMismatch {
                field: "name",
                expected: "a string"
            })
        );
        assert!(matches!(
            JsonFormat.loads(r#"{"vertices": [[0, 0]], "faces": []}"#),
            Err(ToposError::InvalidShape { .. })
        ));
    }
}
