use crate::gcode::types::Unit;
use crate::types::Point2;

/// One drawing command consumed by [`crate::gcode::Emitter::apply`]
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Pending feed rate for following moves
    Speed(f64),
    Move {
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
    },
    LaserOff,
    /// Normalized laser power in [0, 1]
    LaserPower(f64),
    /// Pause in milliseconds
    Dwell(f64),
    Absolute,
    Relative,
    SetOrigin,
    Home,
    Unit(Unit),
    /// Move, fire, dwell, and stop at a single point
    DrawPoint {
        point: Point2,
        power: f64,
        time: f64,
    },
    /// Verbatim `; ` comment line
    Comment(String),
    /// Verbatim instruction line, e.g. from a custom header
    Raw(String),
}

impl Directive {
    pub fn move_xy(point: Point2) -> Self {
        Directive::Move {
            x: Some(point.x),
            y: Some(point.y),
            z: None,
        }
    }

    pub fn move_z(z: f64) -> Self {
        Directive::Move {
            x: None,
            y: None,
            z: Some(z),
        }
    }
}
