//! G-code program assembly
//!
//! The [`Compiler`] collects drawing work into two bodies, engraving ("draw")
//! and cutting, and renders them into a complete program:
//!
//! 1. Header: absolute coordinates, custom header (default: laser off), unit
//! 2. Z move to the drawing height
//! 3. Draw body
//! 4. Z move to the cutting height, then the cut body once per pass, stepping
//!    down by the pass depth between passes
//! 5. Footer (default: laser off)
//!
//! Bodies are stored as [`Directive`]s and rendered through a single
//! [`Emitter`] at compile time, so feed-rate words follow the final order of
//! the program.

pub mod fill;

use crate::error::{CompileError, CompileResult};
use crate::gcode::{Directive, Emitter, EmitterConfig, Unit};
use crate::path::{LineChain, line_segment_approximation};
use crate::svg::color_to_grey;
use crate::types::{Area, Curve, Drawing, Point2};
use std::path::Path;
use tracing::{debug, info, warn};

/// Machine and process parameters for one compilation
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerSettings {
    /// Feed rate for travel moves with the laser off
    pub movement_speed: f64,
    pub cutting_speed: f64,
    pub drawing_speed: f64,
    /// Normalized laser power for cut paths
    pub cutting_power: f64,
    /// Normalized laser power for engraved paths
    pub drawing_power: f64,
    pub initial_z: f64,
    pub drawing_z: f64,
    pub cutting_z: f64,
    pub cutting_passes: u32,
    /// Depth the head moves down between cut passes
    pub pass_depth: f64,
    /// Pause (ms) before travelling to a new chain; 0 disables it
    pub dwell_time: f64,
    /// Pause (ms) used to burn a single point
    pub drawing_point_time: f64,
    pub unit: Option<Unit>,
    pub custom_header: Option<Vec<String>>,
    pub custom_footer: Option<Vec<String>>,
    pub emitter: EmitterConfig,
    /// Maximum deviation of flattened curves from the true geometry
    pub approximation_tolerance: f64,
    /// Spot size used to space hatch lines
    pub laser_diameter: f64,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            movement_speed: 1000.0,
            cutting_speed: 500.0,
            drawing_speed: 900.0,
            cutting_power: 1.0,
            drawing_power: 0.45,
            initial_z: 0.0,
            drawing_z: 7.0,
            cutting_z: 5.0,
            cutting_passes: 2,
            pass_depth: 0.0,
            dwell_time: 0.0,
            drawing_point_time: 20.0,
            unit: None,
            custom_header: None,
            custom_footer: None,
            emitter: EmitterConfig::default(),
            approximation_tolerance: 1e-2,
            laser_diameter: 2.0,
        }
    }
}

impl CompilerSettings {
    pub fn validate(&self) -> CompileResult<()> {
        let invalid = |name: &str, reason: String| {
            Err(CompileError::InvalidSetting {
                name: name.to_string(),
                reason,
            })
        };

        for (name, speed) in [
            ("movement_speed", self.movement_speed),
            ("cutting_speed", self.cutting_speed),
            ("drawing_speed", self.drawing_speed),
        ] {
            if !speed.is_finite() || speed <= 0.0 {
                return invalid(name, format!("speed must be positive, got {}", speed));
            }
        }

        for (name, power) in [
            ("cutting_power", self.cutting_power),
            ("drawing_power", self.drawing_power),
        ] {
            if !(0.0..=1.0).contains(&power) {
                return invalid(name, format!("{} is not between 0 and 1", power));
            }
        }

        if self.cutting_passes == 0 {
            return invalid("cutting_passes", "at least one pass is required".to_string());
        }

        if self.approximation_tolerance.is_nan() || self.approximation_tolerance <= 0.0 {
            return invalid(
                "approximation_tolerance",
                format!("must be positive, got {}", self.approximation_tolerance),
            );
        }

        if self.laser_diameter.is_nan() || self.laser_diameter <= 0.0 {
            return invalid(
                "laser_diameter",
                format!("must be positive, got {}", self.laser_diameter),
            );
        }

        let pass_depth = self.pass_depth.abs();
        if self.cutting_passes as f64 * pass_depth > self.cutting_z {
            return Err(CompileError::TooManyPasses {
                passes: self.cutting_passes,
                pass_depth,
                cutting_z: self.cutting_z,
            });
        }

        self.emitter.validate()?;
        Ok(())
    }
}

/// Directives for one section of the program plus where they leave the head
#[derive(Debug, Clone, Default)]
struct Body {
    directives: Vec<Directive>,
    end: Option<Point2>,
}

impl Body {
    fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

/// Assembles curves, points and areas into a G-code program
#[derive(Debug, Clone)]
pub struct Compiler {
    settings: CompilerSettings,
    body_draw: Body,
    body_cut: Body,
}

impl Compiler {
    pub fn new(mut settings: CompilerSettings) -> CompileResult<Self> {
        settings.validate()?;
        settings.pass_depth = settings.pass_depth.abs();
        Ok(Self {
            settings,
            body_draw: Body::default(),
            body_cut: Body::default(),
        })
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    /// True when nothing has been appended yet
    pub fn is_empty(&self) -> bool {
        self.body_draw.is_empty() && self.body_cut.is_empty()
    }

    /// Draw a polyline, cutting it when `cut` is set and engraving otherwise.
    ///
    /// Travel (laser off, movement speed) is only inserted when the chain does
    /// not start where the previous chain of the same body ended.
    pub fn append_line_chain(&mut self, chain: &LineChain, cut: bool) {
        let Some(start) = chain.start().filter(|_| !chain.is_empty()) else {
            warn!("Attempted to parse empty LineChain");
            return;
        };

        let s = &self.settings;
        let (speed, power) = if cut {
            (s.cutting_speed, s.cutting_power)
        } else {
            (s.drawing_speed, s.drawing_power)
        };
        let movement_speed = s.movement_speed;
        let dwell_time = s.dwell_time;
        let tolerance = s.emitter.tolerance;

        let body = if cut {
            &mut self.body_cut
        } else {
            &mut self.body_draw
        };

        if body.end.is_none_or(|end| end.distance(&start) > tolerance) {
            if dwell_time > 0.0 {
                body.directives.push(Directive::Dwell(dwell_time));
            }
            body.directives.extend([
                Directive::LaserOff,
                Directive::Speed(movement_speed),
                Directive::move_xy(start),
                Directive::Speed(speed),
                Directive::LaserPower(power),
            ]);
        }

        body.directives
            .extend(chain.lines().map(|(_, end)| Directive::move_xy(end)));
        body.end = chain.end();
    }

    /// Flatten curves into line chains and draw them
    pub fn append_curves(&mut self, curves: &[Curve]) {
        info!("Transforming {} curves to line segments", curves.len());
        for curve in curves {
            let chain = line_segment_approximation(curve, self.settings.approximation_tolerance);
            self.append_line_chain(&chain, curve.cut);
        }
    }

    /// Burn a single dot at the drawing power
    pub fn append_point(&mut self, point: Point2) {
        let s = &self.settings;
        let directives = [
            Directive::LaserOff,
            Directive::Speed(s.movement_speed),
            Directive::DrawPoint {
                point,
                power: s.drawing_power,
                time: s.drawing_point_time,
            },
        ];
        self.body_draw.directives.extend(directives);
        // The laser is off again, so the next chain needs its own prelude
        self.body_draw.end = None;
    }

    /// Hatch a closed polygon given as one or more rings
    pub fn append_polygon(&mut self, rings: &[Vec<Point2>], grey: u8) {
        let lines = fill::hatch_lines(rings, grey, self.settings.laser_diameter);
        let Some(&(start, _)) = lines.first() else {
            debug!(grey, "Polygon produced no hatch lines");
            return;
        };

        let s = &self.settings;
        let body = &mut self.body_draw;

        if body.end.is_none_or(|end| end.distance(&start) > s.emitter.tolerance) {
            if s.dwell_time > 0.0 {
                body.directives.push(Directive::Dwell(s.dwell_time));
            }
            body.directives
                .extend([Directive::LaserOff, Directive::Speed(s.movement_speed)]);
        }

        for (from, to) in &lines {
            body.directives.extend([
                Directive::move_xy(*from),
                Directive::Speed(s.cutting_speed),
                Directive::LaserPower(s.cutting_power),
                Directive::move_xy(*to),
                Directive::LaserOff,
                Directive::Speed(s.movement_speed),
            ]);
        }
        body.end = None;
    }

    /// Hatch a filled area with a density given by its grey value
    pub fn append_area(&mut self, area: &Area) {
        let tolerance = self.settings.approximation_tolerance;
        let rings: Vec<Vec<Point2>> = area
            .curves
            .iter()
            .map(|c| line_segment_approximation(c, tolerance).points)
            .filter(|ring| ring.len() > 2)
            .collect();
        if rings.is_empty() {
            warn!("Attempted to parse empty Polygon");
            return;
        }

        let grey = color_to_grey(&area.color).unwrap_or_else(|| {
            warn!(color = %area.color, "Unreadable fill color, hatching as black");
            0
        });
        self.append_polygon(&rings, grey);
    }

    pub fn append_areas(&mut self, areas: &[Area]) {
        info!("Hatching {} filled areas", areas.len());
        for area in areas {
            self.append_area(area);
        }
    }

    /// Append everything from a parsed document
    pub fn append_drawing(&mut self, drawing: &Drawing, fill_areas: bool) {
        self.append_curves(&drawing.curves);
        if fill_areas {
            self.append_areas(&drawing.areas);
        }
    }

    fn program(&self) -> Vec<Directive> {
        let s = &self.settings;
        let mut program = vec![Directive::Absolute, Directive::Speed(s.movement_speed)];

        match &s.custom_header {
            Some(lines) => program.extend(lines.iter().cloned().map(Directive::Raw)),
            None => program.push(Directive::LaserOff),
        }

        if let Some(unit) = s.unit {
            program.push(Directive::Unit(unit));
        }

        program.push(Directive::Speed(s.movement_speed));
        program.push(Directive::move_z(s.drawing_z - s.initial_z));

        if !self.body_draw.is_empty() {
            program.push(Directive::Comment("Start drawing".to_string()));
            program.extend(self.body_draw.directives.iter().cloned());
        }

        if !self.body_cut.is_empty() {
            program.push(Directive::Comment("Start cutting".to_string()));
            if !self.body_draw.is_empty() {
                program.push(Directive::LaserOff);
            }
            program.push(Directive::move_z(s.cutting_z));

            for i in 0..s.cutting_passes {
                program.push(Directive::Comment(format!(
                    "Pass {}/{}",
                    i + 1,
                    s.cutting_passes
                )));
                program.extend(self.body_cut.directives.iter().cloned());

                // Between passes: laser off and step down
                if i + 1 < s.cutting_passes {
                    program.push(Directive::LaserOff);
                    if s.pass_depth > 0.0 {
                        program.extend([
                            Directive::Relative,
                            Directive::move_z(-s.pass_depth),
                            Directive::Absolute,
                        ]);
                    }
                }
            }
        }

        match &s.custom_footer {
            Some(lines) => program.extend(lines.iter().cloned().map(Directive::Raw)),
            None => program.push(Directive::LaserOff),
        }

        program
    }

    /// Render the complete program, one instruction per line
    pub fn compile(&self) -> CompileResult<String> {
        if self.is_empty() {
            warn!("Compile with an empty body (no curves). Is this intentional?");
        }

        let mut emitter = Emitter::new(self.settings.emitter)?;
        let mut lines = Vec::new();
        for directive in &self.program() {
            if let Some(line) = emitter.apply(directive)?
                && !line.is_empty()
            {
                lines.push(line);
            }
        }

        debug!(lines = lines.len(), "Compiled G-code program");
        Ok(lines.join("\n"))
    }

    /// Compile and write the program to `path`
    pub fn compile_to_file<P: AsRef<Path>>(&self, path: P) -> CompileResult<usize> {
        let gcode = self.compile()?;
        std::fs::write(path.as_ref(), &gcode)?;
        info!(path = %path.as_ref().display(), "Wrote G-code file");
        Ok(gcode.lines().count())
    }
}
