use anyhow::{Context, Result};
use clap::Parser;
use laser_gcode::bounds::curves_bounds;
use laser_gcode::{Compiler, Settings, Unit, init_logging, parse_svg_file};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "laser-gcode")]
#[command(about = "Convert SVG drawings to laser cutter G-code", long_about = None)]
struct Cli {
    /// Input SVG file
    #[arg(short, long)]
    input: PathBuf,
    /// Output G-code file
    #[arg(short, long)]
    output: PathBuf,
    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of cutting passes
    #[arg(long)]
    passes: Option<u32>,
    /// Depth the head moves down between passes
    #[arg(long)]
    pass_depth: Option<f64>,
    /// Machine unit (mm or in)
    #[arg(long)]
    unit: Option<Unit>,
    /// Operation tolerance, also sets the coordinate precision
    #[arg(long)]
    tolerance: Option<f64>,
    /// Put the origin at the bottom-left corner of the canvas
    #[arg(long)]
    flip_y: bool,
    /// Hatch filled shapes
    #[arg(long)]
    fill_areas: bool,
    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("Error reading settings file '{}'", path.display()))?,
            None => Settings::default(),
        };

        if let Some(passes) = self.passes {
            settings.z.passes = passes;
        }
        if let Some(depth) = self.pass_depth {
            settings.z.pass_depth = depth;
        }
        if let Some(unit) = self.unit {
            settings.machine.unit = Some(unit);
        }
        if let Some(tolerance) = self.tolerance {
            settings.machine.tolerance = tolerance;
        }
        settings.svg.flip_y |= self.flip_y;
        settings.svg.fill_areas |= self.fill_areas;

        Ok(settings)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = cli.settings()?;

    let drawing = parse_svg_file(&cli.input, &settings.parse_options())
        .with_context(|| format!("Error reading input file '{}'", cli.input.display()))?;

    let mut compiler =
        Compiler::new(settings.compiler_settings()).context("Invalid compiler settings")?;
    compiler.append_drawing(&drawing, settings.svg.fill_areas);
    let line_count = compiler
        .compile_to_file(&cli.output)
        .with_context(|| format!("Error writing output file '{}'", cli.output.display()))?;

    if let Some(bounds) = curves_bounds(&drawing.curves) {
        info!(
            "Drawing spans {:.2} x {:.2} ({} curves, {} cut)",
            bounds.width(),
            bounds.height(),
            drawing.curves.len(),
            drawing.cut_count()
        );
    }
    info!(
        "Successfully converted '{}' to '{}' ({} lines)",
        cli.input.display(),
        cli.output.display(),
        line_count
    );

    Ok(())
}
