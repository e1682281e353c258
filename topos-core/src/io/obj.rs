/// Wavefront OBJ reader and writer
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, map_res, opt, rest},
    multi::separated_list1,
    number::complete::double,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::error::{Result, ToposError};
use crate::faces::FaceArray;
use crate::geometry::{Geometry, Mesh};
use crate::io::{require_parts, DataFormat};
use crate::vertices::CoordinateArray;

/// Name given to meshes loaded from OBJ text without an `o` record.
pub const DEFAULT_OBJ_NAME: &str = "<obj_mesh>";

/// OBJ text: an `o` name record, one `v x y z` line per vertex and one
/// `f a b c [d]` line per face with 1-based indices.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjFormat;

impl ObjFormat {
    fn dump_name(&self, geometry: &dyn Geometry) -> String {
        format!("o {}\n", geometry.name())
    }

    fn dump_vertices(&self, vertices: &CoordinateArray) -> Result<String> {
        if vertices.is_empty() {
            return Ok(String::new());
        }
        vertices.fmt("v {} {} {}", "", "\n", "\n")
    }

    fn dump_faces(&self, faces: &FaceArray) -> Result<String> {
        if faces.is_empty() {
            return Ok(String::new());
        }
        let fields = vec!["{}"; faces.arity()].join(" ");
        faces.fmt(&format!("f {fields}"), "", "\n", "\n")
    }
}

impl DataFormat for ObjFormat {
    fn extension(&self) -> &'static str {
        "obj"
    }

    fn dumps(&self, geometry: &dyn Geometry) -> Result<String> {
        let (vertices, faces) = require_parts(geometry)?;

        let mut out = self.dump_name(geometry);
        out.push_str(&self.dump_vertices(&vertices)?);
        out.push_str(&self.dump_faces(faces)?);
        Ok(out)
    }

    fn loads(&self, text: &str) -> Result<Mesh> {
        let mut name = None;
        let mut points = Vec::new();
        let mut faces = Vec::new();

        for (number, line) in text.lines().enumerate() {
            let line = strip_comment(line).trim();
            if line.is_empty() {
                continue;
            }

            let keyword = line.split_whitespace().next().unwrap_or_default();
            let parsed = match keyword {
                "o" => all_consuming(object_name)(line).map(|(_, n)| name = Some(n.to_string())),
                "v" => all_consuming(vertex)(line).map(|(_, v)| points.push(v)),
                "f" => all_consuming(face)(line).map(|(_, f)| faces.push(f)),
                // Normals, texture coordinates, groups, smoothing...
                _ => continue,
            };

            parsed.map_err(|e| ToposError::Parse {
                format: "OBJ",
                reason: format!("line {}: {:?}", number + 1, e),
            })?;
        }

        if points.is_empty() {
            return Err(ToposError::MissingField { field: "vertices" });
        }
        if faces.is_empty() {
            return Err(ToposError::MissingField { field: "faces" });
        }

        let vertices = CoordinateArray::new_cartesian(points);
        let faces = FaceArray::with_arity(&faces)?;

        Ok(Mesh::new()
            .with_vertices(vertices)
            .with_faces(faces)
            .with_name(name.unwrap_or_else(|| DEFAULT_OBJ_NAME.to_string())))
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

fn object_name(input: &str) -> IResult<&str, &str> {
    preceded(tuple((tag("o"), space1)), rest)(input)
}

/// `v x y z [w]`; the optional weight is ignored.
fn vertex(input: &str) -> IResult<&str, [f64; 3]> {
    let (input, _) = tag("v")(input)?;
    let (input, x) = preceded(space1, double)(input)?;
    let (input, y) = preceded(space1, double)(input)?;
    let (input, z) = preceded(space1, double)(input)?;
    let (input, _) = opt(preceded(space1, double))(input)?;
    Ok((input, [x, y, z]))
}

/// `f a b c ...` where each entry is `v`, `v/vt`, `v/vt/vn` or `v//vn`.
fn face(input: &str) -> IResult<&str, Vec<usize>> {
    preceded(
        tuple((tag("f"), space1)),
        terminated(separated_list1(space1, face_vertex), space0),
    )(input)
}

fn face_vertex(input: &str) -> IResult<&str, usize> {
    terminated(
        map_res(digit1, |digits: &str| digits.parse::<usize>()),
        opt(preceded(char('/'), take_till(|c: char| c.is_whitespace()))),
    )(input)
}
