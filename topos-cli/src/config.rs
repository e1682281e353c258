/// TOML configuration for mesh generation jobs
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use topos_core::{Displace, PlaneParams, Rotate, Scale, Translate, TubeParams, VertexTransform};

/// Top-level job configuration.
///
/// ```toml
/// name = "pipe"
///
/// [primitive]
/// type = "tube"
/// n_theta = 32
/// n_z = 8
/// radius = 0.5
///
/// [[transform]]
/// type = "scale"
/// z = 4.0
///
/// [[transform]]
/// type = "rotate"
/// x = 1.5707963267948966
///
/// [output]
/// format = "obj"
/// path = "pipe.obj"
/// ```
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    /// Overrides the primitive's own name.
    pub name: Option<String>,
    pub primitive: PrimitiveConfig,
    /// Applied in file order.
    #[serde(default, rename = "transform")]
    pub transforms: Vec<TransformConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The generated starting geometry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PrimitiveConfig {
    Plane {
        #[serde(default = "default_size")]
        size: usize,
        #[serde(flatten)]
        params: PlaneParams,
    },
    Tube {
        #[serde(default = "default_n_theta")]
        n_theta: usize,
        #[serde(default = "default_n_z")]
        n_z: usize,
        /// Leave the seam at `theta_max` open.
        #[serde(default)]
        open: bool,
        #[serde(flatten)]
        params: TubeParams,
    },
}

fn default_size() -> usize {
    10
}
fn default_n_theta() -> usize {
    32
}
fn default_n_z() -> usize {
    2
}

/// Per-axis values; unset axes are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub r: Option<f64>,
    pub t: Option<f64>,
}

/// One vertex transform.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransformConfig {
    Scale(AxisConfig),
    Displace(AxisConfig),
    Translate {
        offset: [f64; 3],
    },
    /// Euler angles in radians.
    Rotate {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
        #[serde(default)]
        z: f64,
    },
}

impl TransformConfig {
    pub fn build(&self) -> Box<dyn VertexTransform> {
        match *self {
            TransformConfig::Scale(axes) => {
                let mut scale = Scale::new();
                if let Some(v) = axes.x {
                    scale = scale.x(v);
                }
                if let Some(v) = axes.y {
                    scale = scale.y(v);
                }
                if let Some(v) = axes.z {
                    scale = scale.z(v);
                }
                if let Some(v) = axes.r {
                    scale = scale.r(v);
                }
                if let Some(v) = axes.t {
                    scale = scale.t(v);
                }
                Box::new(scale)
            }
            TransformConfig::Displace(axes) => {
                let mut displace = Displace::new();
                if let Some(v) = axes.x {
                    displace = displace.x(v);
                }
                if let Some(v) = axes.y {
                    displace = displace.y(v);
                }
                if let Some(v) = axes.z {
                    displace = displace.z(v);
                }
                if let Some(v) = axes.r {
                    displace = displace.r(v);
                }
                if let Some(v) = axes.t {
                    displace = displace.t(v);
                }
                Box::new(displace)
            }
            TransformConfig::Translate { offset: [x, y, z] } => Box::new(Translate::new(x, y, z)),
            TransformConfig::Rotate { x, y, z } => Box::new(Rotate::new(x, y, z)),
        }
    }
}

/// Serialization format of the written geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Obj,
    Json,
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Written to stdout when unset.
    pub path: Option<PathBuf>,
}

/// Parse a job from TOML text.
pub fn parse_config(content: &str) -> anyhow::Result<JobConfig> {
    let config: JobConfig = toml::from_str(content)?;
    Ok(config)
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("invalid job file {}", path.display()))
}
