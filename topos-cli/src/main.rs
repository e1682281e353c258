/// Topos command-line interface: generate primitives directly or run TOML jobs
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::info;
use topos_cli::{config, format_for, run_job, write_geometry, OutputFormat};
use topos_core::{Mesh, PlaneParams, TubeParams};

#[derive(Parser)]
#[command(name = "topos")]
#[command(about = "Topos: vertex and face arrays for mesh generation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where and how to write the result.
#[derive(Args)]
struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Obj)]
    format: OutputFormat,
    /// Output file; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an N × N planar grid.
    Plane {
        #[arg(long, default_value_t = 10)]
        size: usize,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        xmin: f64,
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        xmax: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        ymin: f64,
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        ymax: f64,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Generate a cylindrical tube.
    Tube {
        #[arg(long, default_value_t = 32)]
        n_theta: usize,
        #[arg(long, default_value_t = 2)]
        n_z: usize,
        #[arg(long, default_value_t = 1.0)]
        radius: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        zmin: f64,
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        zmax: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        theta_min: f64,
        #[arg(long, default_value_t = std::f64::consts::TAU, allow_negative_numbers = true)]
        theta_max: f64,
        /// Leave the seam open instead of wrapping the last column.
        #[arg(long)]
        open: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Run a generation job from a TOML configuration file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output file (overrides the config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert between OBJ and JSON, chosen by file extension.
    Convert { input: PathBuf, output: PathBuf },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Plane {
            size,
            xmin,
            xmax,
            ymin,
            ymax,
            output,
        } => {
            let params = PlaneParams {
                xmin,
                xmax,
                ymin,
                ymax,
            };
            let mesh = Mesh::plane_with(size, &params)?;
            write_geometry(&mesh, format_for(output.format).as_ref(), output.output.as_deref())
        }
        Commands::Tube {
            n_theta,
            n_z,
            radius,
            zmin,
            zmax,
            theta_min,
            theta_max,
            open,
            output,
        } => {
            let params = TubeParams {
                radius,
                zmin,
                zmax,
                theta_min,
                theta_max,
            };
            let mesh = Mesh::tube_with(n_theta, n_z, !open, &params)?;
            write_geometry(&mesh, format_for(output.format).as_ref(), output.output.as_deref())
        }
        Commands::Run { config, output } => {
            let job = config::load_config(&config)?;
            info!("loaded job {}", config.display());

            let mesh = run_job(&job)?;
            let path = output.or(job.output.path);
            write_geometry(&mesh, format_for(job.output.format).as_ref(), path.as_deref())
        }
        Commands::Convert { input, output } => {
            topos_cli::convert(&input, &output)?;
            Ok(())
        }
    }
}
