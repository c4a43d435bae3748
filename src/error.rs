//! Error types for G-code emission, compilation, SVG import and configuration.

use std::io;
use thiserror::Error;

/// Errors raised by the G-code emitter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcodeError {
    /// A move was requested before any feed rate was set.
    #[error("Undefined movement speed. Call set_movement_speed before executing movement commands.")]
    UndefinedSpeed,

    /// Laser power outside the normalized range.
    #[error("{power} is out of bounds. Laser power must be given between 0 and 1.")]
    PowerOutOfBounds { power: f64 },

    /// Unit string that is neither millimeters nor inches.
    #[error("Unknown unit '{0}'. Please specify one of: mm, in")]
    UnknownUnit(String),

    /// Emitter constructed with unusable settings.
    #[error("Invalid emitter configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised while assembling a G-code program.
#[derive(Error, Debug)]
pub enum CompileError {
    /// The cut passes would drive the head into the material.
    #[error("Too many passes: {passes} x {pass_depth} exceeds cutting height {cutting_z}. The laser will collide with the material.")]
    TooManyPasses {
        passes: u32,
        pass_depth: f64,
        cutting_z: f64,
    },

    /// A compiler setting is out of its valid range.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidSetting { name: String, reason: String },

    /// Emission failed while rendering the program.
    #[error(transparent)]
    Gcode(#[from] GcodeError),

    /// I/O error while writing the program.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised while importing SVG documents.
#[derive(Error, Debug)]
pub enum SvgError {
    /// The document could not be parsed.
    #[error("SVG parse error: {0}")]
    Parse(String),

    /// I/O error while reading the document.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised while loading settings files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file is not valid TOML for [`crate::config::Settings`].
    #[error("Invalid settings file: {0}")]
    Toml(#[from] toml::de::Error),

    /// A settings value failed validation.
    #[error("Invalid setting: {0}")]
    Invalid(String),

    /// I/O error while reading the settings file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<usvg::Error> for SvgError {
    fn from(err: usvg::Error) -> Self {
        SvgError::Parse(err.to_string())
    }
}

/// Result type alias for emitter operations.
pub type GcodeResult<T> = Result<T, GcodeError>;

/// Result type alias for compiler operations.
pub type CompileResult<T> = Result<T, CompileError>;

/// Result type alias for SVG import.
pub type SvgResult<T> = Result<T, SvgError>;

/// Result type alias for settings loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
