/// Command-line front end: generate, transform, convert and write meshes
use std::fs;
use std::io::{self, stderr, stdout, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use log::{debug, info};
use topos_core::{
    format_for_extension, DataFormat, Geometry, JsonFormat, Mesh, ObjFormat, Pipeline,
    VertexTransform,
};

pub mod config;

pub use config::{JobConfig, OutputConfig, OutputFormat, PrimitiveConfig, TransformConfig};

/// Generate the starting mesh of a job.
pub fn build_primitive(primitive: &PrimitiveConfig) -> topos_core::Result<Mesh> {
    match primitive {
        PrimitiveConfig::Plane { size, params } => Mesh::plane_with(*size, params),
        PrimitiveConfig::Tube {
            n_theta,
            n_z,
            open,
            params,
        } => Mesh::tube_with(*n_theta, *n_z, !open, params),
    }
}

/// Chain the configured transforms in order.
pub fn build_pipeline(transforms: &[TransformConfig]) -> Pipeline {
    let mut pipeline = Pipeline::new();
    for transform in transforms {
        pipeline.push(transform.build());
    }
    pipeline
}

/// Generate, transform and name the mesh described by `job`.
pub fn run_job(job: &JobConfig) -> Result<Mesh> {
    let source = build_primitive(&job.primitive).context("failed to generate primitive")?;
    debug!("generated {}", source.name());

    let pipeline = build_pipeline(&job.transforms);
    let mut mesh = if pipeline.is_empty() {
        source
    } else {
        info!("applying {} transform(s)", pipeline.len());
        pipeline.apply(&source).context("transform failed")?
    };

    if let Some(name) = &job.name {
        mesh.set_name(name.as_str());
    }
    mesh.validate()?;
    Ok(mesh)
}

pub fn format_for(format: OutputFormat) -> Box<dyn DataFormat> {
    match format {
        OutputFormat::Obj => Box::new(ObjFormat),
        OutputFormat::Json => Box::new(JsonFormat),
    }
}

/// The format registered for the extension of `path`.
pub fn format_for_path(path: &Path) -> Result<Box<dyn DataFormat>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| anyhow!("{} has no file extension", path.display()))?;
    format_for_extension(extension)
        .ok_or_else(|| anyhow!("unsupported format {:?} for {}", extension, path.display()))
}

/// Serialize `geometry` to `path`, or to stdout when no path is given.
///
/// The coloured summary line goes to stdout after a file write and to
/// stderr when stdout carries the geometry itself.
pub fn write_geometry(
    geometry: &dyn Geometry,
    format: &dyn DataFormat,
    path: Option<&Path>,
) -> Result<()> {
    let text = format.dumps(geometry)?;

    match path {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {} bytes to {}", text.len(), path.display());
            print_summary(&mut stdout(), geometry, &path.display().to_string())?;
        }
        None => {
            let mut out = stdout();
            out.write_all(text.as_bytes())?;
            out.flush()?;
            print_summary(&mut stderr(), geometry, "stdout")?;
        }
    }
    Ok(())
}

/// Read `input`, then write it to `output` in the format of its extension.
pub fn convert(input: &Path, output: &Path) -> Result<Mesh> {
    let reader = format_for_path(input)?;
    let writer = format_for_path(output)?;

    let text = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let mesh = reader
        .loads(&text)
        .with_context(|| format!("failed to parse {}", input.display()))?;
    debug!(
        "converting {} from {} to {}",
        mesh.name(),
        reader.extension(),
        writer.extension()
    );

    write_geometry(&mesh, writer.as_ref(), Some(output))?;
    Ok(mesh)
}

/// One coloured line: name, counts and destination.
pub fn print_summary<W: Write>(
    out: &mut W,
    geometry: &dyn Geometry,
    destination: &str,
) -> io::Result<()> {
    let vertices = geometry.vertices().map_or(0, |v| v.len());
    let faces = geometry.faces().map_or(0, |f| f.len());

    queue!(
        out,
        SetForegroundColor(Color::Green),
        Print(geometry.name()),
        ResetColor,
        Print(format!(" | {} vertices | {} faces | ", vertices, faces)),
        SetForegroundColor(Color::Yellow),
        Print(destination),
        ResetColor,
        Print("\n")
    )?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("topos-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn test_run_job() {
        let job = parse_config(
            r#"
            name = "wide"

            [primitive]
            type = "tube"
            n_theta = 8
            n_z = 3

            [[transform]]
            type = "scale"
            r = 2.0
            "#,
        )
        .unwrap();

        let mesh = run_job(&job).unwrap();
        assert_eq!(mesh.name(), "wide");
        assert_eq!(mesh.faces().unwrap().len(), 16);
        assert!(mesh
            .vertices()
            .unwrap()
            .r()
            .iter()
            .all(|r| (r - 2.0).abs() < 1e-12));
    }

    #[test]
    fn test_run_job_without_transforms() {
        let job = parse_config("[primitive]\ntype = \"plane\"\nsize = 3\n").unwrap();
        let mesh = run_job(&job).unwrap();
        assert_eq!(mesh.name(), "Plane");
        assert_eq!(mesh.vertices().unwrap().len(), 9);
    }

    #[test]
    fn test_run_job_rejects_zero_size() {
        let job = parse_config("[primitive]\ntype = \"plane\"\nsize = 0\n").unwrap();
        assert!(run_job(&job).is_err());
    }

    #[test]
    fn test_format_for_path() {
        assert_eq!(format_for_path(Path::new("a/b.obj")).unwrap().extension(), "obj");
        assert_eq!(format_for_path(Path::new("b.JSON")).unwrap().extension(), "json");
        assert!(format_for_path(Path::new("mesh.stl")).is_err());
        assert!(format_for_path(Path::new("mesh")).is_err());
    }

    #[test]
    fn test_print_summary() {
        let plane = Mesh::plane(3).unwrap();
        let mut out = Vec::new();
        print_summary(&mut out, &plane, "plane.obj").unwrap();

        let line = String::from_utf8(out).unwrap();
        assert!(line.contains("Plane"));
        assert!(line.contains(" | 9 vertices | 4 faces | "));
        assert!(line.ends_with("plane.obj\u{1b}[0m\n"));
    }

    #[test]
    fn test_write_and_convert() {
        let obj = scratch("tube.obj");
        let json = scratch("tube.json");

        let tube = Mesh::tube(6, 2, true).unwrap();
        write_geometry(&tube, &ObjFormat, Some(obj.as_path())).unwrap();

        let loaded = convert(&obj, &json).unwrap();
        assert_eq!(loaded.name(), "Cylinder");
        assert_eq!(loaded.faces(), tube.faces());

        let text = fs::read_to_string(&json).unwrap();
        let back = JsonFormat.loads(&text).unwrap();
        assert_eq!(back.vertices().unwrap().len(), 12);
    }
}
