//! liftline CLI: performance curves for a paraglider canopy.

mod wingfile;

use clap::{Parser, Subcommand};
use ll_geom::{GeometryError, SpanGeometry};
use ll_section::SectionError;
use ll_solver::{CirculationSolver, SolveStatus, SolverConfig, SolverError, SpanDiscretization};
use nalgebra::Vector3;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use wingfile::WingFile;

#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Wing file error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Section model error: {0}")]
    Section(#[from] SectionError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "ll-cli")]
#[command(about = "liftline - nonlinear lifting-line performance curves", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print planform and discretization summary
    Geometry {
        /// Path to the wing YAML file
        wing_path: PathBuf,
        /// Number of bound vortex segments
        #[arg(long, default_value_t = 51)]
        segments: usize,
    },
    /// Sweep angle of attack and print a CSV polar
    Polar {
        /// Path to the wing YAML file
        wing_path: PathBuf,
        /// Number of bound vortex segments
        #[arg(long, default_value_t = 51)]
        segments: usize,
        /// First angle of attack (degrees)
        #[arg(long, default_value_t = -2.0, allow_hyphen_values = true)]
        alpha_start: f64,
        /// Last angle of attack (degrees)
        #[arg(long, default_value_t = 12.0, allow_hyphen_values = true)]
        alpha_end: f64,
        /// Number of sweep points
        #[arg(long, default_value_t = 29)]
        steps: usize,
        /// Airspeed (m/s)
        #[arg(long, default_value_t = 10.0)]
        speed: f64,
        /// Sideslip angle (degrees)
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        beta: f64,
        /// Symmetric brake fraction, 0..=1
        #[arg(long, default_value_t = 0.0)]
        brake: f64,
        /// Opt-in residual tolerance for early exit
        #[arg(long)]
        tolerance: Option<f64>,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Geometry {
            wing_path,
            segments,
        } => cmd_geometry(&wing_path, segments),
        Commands::Polar {
            wing_path,
            segments,
            alpha_start,
            alpha_end,
            steps,
            speed,
            beta,
            brake,
            tolerance,
        } => cmd_polar(
            &wing_path,
            segments,
            alpha_start,
            alpha_end,
            steps,
            speed,
            beta,
            brake,
            tolerance,
        ),
    }
}

fn load_wing(path: &Path) -> CliResult<WingFile> {
    let text = std::fs::read_to_string(path)?;
    let file: WingFile = serde_yaml::from_str(&text)?;
    info!(path = %path.display(), "loaded wing description");
    Ok(file)
}

fn cmd_geometry(wing_path: &Path, segments: usize) -> CliResult<()> {
    let file = load_wing(wing_path)?;
    let planform = file.planform.build()?;
    let disc = SpanDiscretization::new(&planform, segments)?;

    println!(
        "Planform: span {:.2} m, area {:.2} m2, AR {:.2}, MAC {:.2} m",
        planform.span(),
        planform.area(),
        planform.aspect_ratio(),
        planform.mac()
    );
    println!(
        "Discretization: {} segments, {} nodes, segment area sum {:.3} m2",
        disc.len(),
        disc.nodes().len(),
        disc.areas().iter().sum::<f64>()
    );

    let worst_frame = (0..disc.len())
        .map(|j| {
            let s = (disc.spanwise()[j].norm() - 1.0).abs();
            let a = (disc.chordwise()[j].norm() - 1.0).abs();
            let n = (disc.normal()[j].norm() - 1.0).abs();
            s.max(a).max(n)
        })
        .fold(0.0_f64, f64::max);
    println!("Frame check: max unit-norm deviation {worst_frame:.2e}");

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_polar(
    wing_path: &Path,
    segments: usize,
    alpha_start: f64,
    alpha_end: f64,
    steps: usize,
    speed: f64,
    beta_deg: f64,
    brake: f64,
    tolerance: Option<f64>,
) -> CliResult<()> {
    let file = load_wing(wing_path)?;
    let planform = file.planform.build()?;
    let section = file.section.build()?;
    let brakes = file.brakes.as_ref().map(|b| b.build()).transpose()?;

    let config = SolverConfig {
        residual_tolerance: tolerance,
        ..SolverConfig::default()
    };
    let solver = Arc::new(CirculationSolver::new(
        &planform, segments, section, config,
    )?);

    let area = planform.area();
    let half_span = planform.span() / 2.0;
    let beta = beta_deg.to_radians();
    let delta: Vec<f64> = match &brakes {
        Some(b) => b.distribution(solver.discretization().stations(), half_span, brake, brake),
        None => vec![0.0; segments],
    };

    let alphas: Vec<f64> = (0..steps)
        .map(|i| {
            let t = if steps > 1 {
                i as f64 / (steps - 1) as f64
            } else {
                0.0
            };
            alpha_start + t * (alpha_end - alpha_start)
        })
        .collect();

    info!(steps = alphas.len(), speed, beta_deg, brake, "starting polar sweep");

    // Independent flight conditions: embarrassingly parallel
    let rows: Vec<String> = alphas
        .par_iter()
        .map(|&alpha_deg| {
            let alpha = alpha_deg.to_radians();
            let wind = uniform_wind(segments, speed, alpha, beta);
            match solver.forces(&wind, &delta) {
                Ok((solution, loads)) => {
                    let total = loads.total_force();
                    let lift = total.x * alpha.sin() - total.z * alpha.cos();
                    let drag = -total.x * alpha.cos() - total.z * alpha.sin();
                    let q_s = 0.5 * speed * speed * area;
                    let status = match solution.status {
                        SolveStatus::Converged => "converged",
                        SolveStatus::MaxIterationsReached => "max_iterations",
                    };
                    format!(
                        "{alpha_deg:.3},{:.5},{:.5},{},{status}",
                        lift / q_s,
                        drag / q_s,
                        solution.iterations
                    )
                }
                Err(err) => {
                    if let Some(report) = err.report() {
                        eprintln!(
                            "alpha {alpha_deg:.2} deg: diverged at iteration {}{} - {err}",
                            report.iteration,
                            report
                                .control_point
                                .map(|cp| format!(", control point {cp}"))
                                .unwrap_or_default()
                        );
                    } else {
                        eprintln!("alpha {alpha_deg:.2} deg: {err}");
                    }
                    format!("{alpha_deg:.3},,,,failed")
                }
            }
        })
        .collect();

    println!("alpha_deg,CL,CDi,iterations,status");
    for row in rows {
        println!("{row}");
    }

    Ok(())
}

fn uniform_wind(k: usize, speed: f64, alpha: f64, beta: f64) -> Vec<Vector3<f64>> {
    let v = Vector3::new(
        speed * alpha.cos() * beta.cos(),
        speed * beta.sin(),
        speed * alpha.sin() * beta.cos(),
    );
    vec![v; k]
}
