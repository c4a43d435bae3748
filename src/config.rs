//! Settings file handling
//!
//! Machine and process parameters can be kept in a TOML file. Every field is
//! optional; missing values fall back to the defaults below.
//!
//! ```toml
//! [machine]
//! tolerance = 0.001
//! power_min = 0
//! power_max = 1000
//! unit = "mm"
//!
//! [speeds]
//! movement = 1000
//! cutting = 500
//! drawing = 900
//!
//! [z]
//! cutting = 5
//! passes = 2
//! pass_depth = 0
//! ```

use crate::compiler::CompilerSettings;
use crate::error::{ConfigError, ConfigResult};
use crate::gcode::{EmitterConfig, PowerRange, Unit};
use crate::svg::ParseOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Controller limits and output format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineSettings {
    /// Operation tolerance; also fixes the number of decimals in coordinates
    pub tolerance: f64,
    pub power_min: u32,
    pub power_max: u32,
    pub unit: Option<Unit>,
    pub header: Option<Vec<String>>,
    pub footer: Option<Vec<String>>,
}

impl Default for MachineSettings {
    fn default() -> Self {
        let power = PowerRange::default();
        Self {
            tolerance: EmitterConfig::default().tolerance,
            power_min: power.min,
            power_max: power.max,
            unit: None,
            header: None,
            footer: None,
        }
    }
}

/// Feed rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedSettings {
    pub movement: f64,
    pub cutting: f64,
    pub drawing: f64,
}

impl Default for SpeedSettings {
    fn default() -> Self {
        Self {
            movement: 1000.0,
            cutting: 500.0,
            drawing: 900.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaserSettings {
    pub cutting_power: f64,
    pub drawing_power: f64,
    /// Milliseconds
    pub dwell_time: f64,
    /// Milliseconds
    pub drawing_point_time: f64,
}

impl Default for LaserSettings {
    fn default() -> Self {
        Self {
            cutting_power: 1.0,
            drawing_power: 0.45,
            dwell_time: 0.0,
            drawing_point_time: 20.0,
        }
    }
}

/// Head heights and cut passes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZSettings {
    pub initial: f64,
    pub drawing: f64,
    pub cutting: f64,
    pub passes: u32,
    pub pass_depth: f64,
}

impl Default for ZSettings {
    fn default() -> Self {
        Self {
            initial: 0.0,
            drawing: 7.0,
            cutting: 5.0,
            passes: 2,
            pass_depth: 0.0,
        }
    }
}

/// Import options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgSettings {
    pub approximation_tolerance: f64,
    pub flip_y: bool,
    pub fill_areas: bool,
    pub laser_diameter: f64,
}

impl Default for SvgSettings {
    fn default() -> Self {
        Self {
            approximation_tolerance: 1e-2,
            flip_y: false,
            fill_areas: false,
            laser_diameter: 2.0,
        }
    }
}

/// Complete settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub machine: MachineSettings,
    pub speeds: SpeedSettings,
    pub laser: LaserSettings,
    pub z: ZSettings,
    pub svg: SvgSettings,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_toml(&content)?;
        debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Save settings to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Checks that only depend on the file itself; the compiler validates the rest
    pub fn validate(&self) -> ConfigResult<()> {
        if self.machine.power_min > self.machine.power_max {
            return Err(ConfigError::Invalid(format!(
                "power_min ({}) must not exceed power_max ({})",
                self.machine.power_min, self.machine.power_max
            )));
        }
        if self.z.passes == 0 {
            return Err(ConfigError::Invalid(
                "passes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn emitter_config(&self) -> EmitterConfig {
        EmitterConfig {
            tolerance: self.machine.tolerance,
            power_range: PowerRange::new(self.machine.power_min, self.machine.power_max),
        }
    }

    pub fn compiler_settings(&self) -> CompilerSettings {
        CompilerSettings {
            movement_speed: self.speeds.movement,
            cutting_speed: self.speeds.cutting,
            drawing_speed: self.speeds.drawing,
            cutting_power: self.laser.cutting_power,
            drawing_power: self.laser.drawing_power,
            initial_z: self.z.initial,
            drawing_z: self.z.drawing,
            cutting_z: self.z.cutting,
            cutting_passes: self.z.passes,
            pass_depth: self.z.pass_depth,
            dwell_time: self.laser.dwell_time,
            drawing_point_time: self.laser.drawing_point_time,
            unit: self.machine.unit,
            custom_header: self.machine.header.clone(),
            custom_footer: self.machine.footer.clone(),
            emitter: self.emitter_config(),
            approximation_tolerance: self.svg.approximation_tolerance,
            laser_diameter: self.svg.laser_diameter,
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            flip_y: self.svg.flip_y,
            canvas_height: None,
        }
    }
}
