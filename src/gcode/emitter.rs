use crate::error::{GcodeError, GcodeResult};
use crate::gcode::directive::Directive;
use crate::gcode::types::{CoordinateMode, EmitterConfig, Position, PowerRange, Unit};
use crate::types::Point2;
use tracing::{trace, warn};

/// Format a feed rate or duration, dropping the fraction when it is integral
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Format a coordinate with fixed decimals, treating -0 as 0
fn format_coordinate(n: f64, precision: usize) -> String {
    let s = format!("{:.*}", precision, n);
    match s.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => s,
    }
}

/// Stateful translator from drawing primitives to G-code lines.
///
/// Tracks the machine position, the last emitted feed rate and the pending
/// one, so that `F` words are only written when the speed actually changes.
#[derive(Debug, Clone)]
pub struct Emitter {
    position: Option<Position>,
    current_speed: Option<f64>,
    next_speed: Option<f64>,
    precision: usize,
    power_range: PowerRange,
    unit: Option<Unit>,
    coordinate_mode: CoordinateMode,
}

impl Emitter {
    pub fn new(config: EmitterConfig) -> GcodeResult<Self> {
        config.validate()?;
        Ok(Self {
            position: None,
            current_speed: None,
            next_speed: None,
            precision: config.precision(),
            power_range: config.power_range,
            unit: None,
            coordinate_mode: CoordinateMode::Absolute,
        })
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn unit(&self) -> Option<Unit> {
        self.unit
    }

    pub fn coordinate_mode(&self) -> CoordinateMode {
        self.coordinate_mode
    }

    /// Feed rate written by the last move, if any
    pub fn current_speed(&self) -> Option<f64> {
        self.current_speed
    }

    /// Record the feed rate for the next move. Nothing is emitted.
    pub fn set_movement_speed(&mut self, speed: f64) {
        self.next_speed = Some(speed);
    }

    /// Emit a `G1` containing only the supplied axes.
    ///
    /// Returns `Ok(None)` and leaves all state untouched when no axis is given.
    pub fn linear_move(
        &mut self,
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
    ) -> GcodeResult<Option<String>> {
        let next_speed = self.next_speed.ok_or(GcodeError::UndefinedSpeed)?;

        if x.is_none() && y.is_none() && z.is_none() {
            warn!("linear_move command invoked without arguments");
            return Ok(None);
        }

        let mut command = String::from("G1");

        if self.current_speed != Some(next_speed) {
            self.current_speed = Some(next_speed);
            command.push_str(&format!(" F{}", format_number(next_speed)));
        }

        for (axis, value) in [('X', x), ('Y', y), ('Z', z)] {
            if let Some(v) = value {
                command.push_str(&format!(" {}{}", axis, format_coordinate(v, self.precision)));
            }
        }

        self.track(x, y, z);
        trace!(position = ?self.position, "{}", command);

        command.push(';');
        Ok(Some(command))
    }

    fn track(&mut self, x: Option<f64>, y: Option<f64>, z: Option<f64>) {
        let previous = self.position.unwrap_or_default();
        let mode = self.coordinate_mode;
        let axis = |value: Option<f64>, old: f64| match (value, mode) {
            (Some(v), CoordinateMode::Absolute) => v,
            (Some(v), CoordinateMode::Relative) => old + v,
            (None, _) => old,
        };
        self.position = Some(Position::new(
            axis(x, previous.x),
            axis(y, previous.y),
            axis(z, previous.z),
        ));
    }

    /// Planar move to a drawing point
    pub fn move_to(&mut self, point: Point2) -> GcodeResult<String> {
        let line = self.linear_move(Some(point.x), Some(point.y), None)?;
        Ok(line.unwrap_or_default())
    }

    pub fn laser_off(&self) -> String {
        "M5;".to_string()
    }

    /// Laser on at a normalized power scaled into the configured machine range
    pub fn set_laser_power(&self, power: f64) -> GcodeResult<String> {
        if !(0.0..=1.0).contains(&power) {
            return Err(GcodeError::PowerOutOfBounds { power });
        }
        Ok(format!("M4 S{};", self.power_range.scale(power)))
    }

    pub fn set_absolute_coordinates(&mut self) -> String {
        self.coordinate_mode = CoordinateMode::Absolute;
        format!("{};", CoordinateMode::Absolute.code())
    }

    pub fn set_relative_coordinates(&mut self) -> String {
        self.coordinate_mode = CoordinateMode::Relative;
        format!("{};", CoordinateMode::Relative.code())
    }

    pub fn dwell(&self, milliseconds: f64) -> String {
        format!("G4 P{};", format_number(milliseconds))
    }

    /// Declare the current physical location as the origin of every axis
    pub fn set_origin_at_position(&mut self) -> String {
        self.position = Some(Position::origin());
        "G92 X0 Y0 Z0;".to_string()
    }

    pub fn set_unit(&mut self, unit: Unit) -> String {
        self.unit = Some(unit);
        format!("{};", unit.code())
    }

    /// Return to the reference position. Its offset from the work origin is
    /// unknown, so the tracked position is cleared.
    pub fn home_axes(&mut self) -> String {
        self.position = None;
        "G28;".to_string()
    }

    /// Engrave a single point: move, fire, dwell, stop
    pub fn draw_point(
        &mut self,
        point: Point2,
        drawing_power: f64,
        drawing_point_time: f64,
    ) -> GcodeResult<String> {
        let laser_on = self.set_laser_power(drawing_power)?;
        let travel = self.move_to(point)?;
        Ok([
            travel,
            laser_on,
            self.dwell(drawing_point_time),
            self.laser_off(),
        ]
        .join("\n"))
    }

    /// Render one directive; `None` when it produces no line
    pub fn apply(&mut self, directive: &Directive) -> GcodeResult<Option<String>> {
        let line = match directive {
            Directive::Speed(speed) => {
                self.set_movement_speed(*speed);
                return Ok(None);
            }
            Directive::Move { x, y, z } => return self.linear_move(*x, *y, *z),
            Directive::LaserOff => self.laser_off(),
            Directive::LaserPower(power) => self.set_laser_power(*power)?,
            Directive::Dwell(ms) => self.dwell(*ms),
            Directive::Absolute => self.set_absolute_coordinates(),
            Directive::Relative => self.set_relative_coordinates(),
            Directive::SetOrigin => self.set_origin_at_position(),
            Directive::Home => self.home_axes(),
            Directive::Unit(unit) => self.set_unit(*unit),
            Directive::DrawPoint { point, power, time } => {
                self.draw_point(*point, *power, *time)?
            }
            Directive::Comment(text) => format!("; {}", text),
            Directive::Raw(text) => text.clone(),
        };
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitter() -> Emitter {
        Emitter::new(EmitterConfig::default()).unwrap()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1000.0), "1000");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(-3.0), "-3");
    }

    #[test]
    fn test_format_coordinate_negative_zero() {
        assert_eq!(format_coordinate(-0.0, 3), "0.000");
        assert_eq!(format_coordinate(-0.0001, 3), "0.000");
        assert_eq!(format_coordinate(-0.25, 2), "-0.25");
    }

    #[test]
    fn test_move_without_speed_fails() {
        let mut em = emitter();
        assert_eq!(
            em.linear_move(Some(1.0), None, None),
            Err(GcodeError::UndefinedSpeed)
        );
        assert!(em.position().is_none());
    }

    #[test]
    fn test_first_move_emits_feed() {
        let mut em = emitter();
        em.set_movement_speed(1000.0);
        let line = em.linear_move(Some(1.0), Some(2.0), None).unwrap();
        assert_eq!(line.as_deref(), Some("G1 F1000 X1.000 Y2.000;"));
        assert_eq!(em.current_speed(), Some(1000.0));
    }

    #[test]
    fn test_unchanged_speed_omits_feed() {
        let mut em = emitter();
        em.set_movement_speed(500.0);
        em.linear_move(Some(1.0), None, None).unwrap();
        em.set_movement_speed(500.0);
        let line = em.linear_move(Some(2.0), None, None).unwrap();
        assert_eq!(line.as_deref(), Some("G1 X2.000;"));
    }

    #[test]
    fn test_empty_move_is_noop() {
        let mut em = emitter();
        em.set_movement_speed(500.0);
        assert_eq!(em.linear_move(None, None, None), Ok(None));
        assert!(em.position().is_none());
        assert!(em.current_speed().is_none());
    }

    #[test]
    fn test_partial_move_defaults_missing_axes() {
        let mut em = emitter();
        em.set_movement_speed(100.0);
        em.linear_move(None, None, Some(7.0)).unwrap();
        assert_eq!(em.position(), Some(Position::new(0.0, 0.0, 7.0)));
        em.linear_move(Some(2.0), None, None).unwrap();
        assert_eq!(em.position(), Some(Position::new(2.0, 0.0, 7.0)));
    }

    #[test]
    fn test_apply_renders_comment_and_speed() {
        let mut em = emitter();
        assert_eq!(em.apply(&Directive::Speed(300.0)), Ok(None));
        assert_eq!(
            em.apply(&Directive::Comment("Start drawing".into())),
            Ok(Some("; Start drawing".to_string()))
        );
        assert_eq!(
            em.apply(&Directive::move_z(5.0)),
            Ok(Some("G1 F300 Z5.000;".to_string()))
        );
    }
}
