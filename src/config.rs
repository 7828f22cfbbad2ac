//! Configuration management for the gaze tracker

use crate::constants::{
    BLINK_RATIO_THRESHOLD, CALIBRATION_FRAMES, CENTER_SPAN_OFFSET, LOOKING_LEFT_MIN,
    LOOKING_RIGHT_MAX, TARGET_IRIS_RATIO,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Threshold calibration configuration
    pub calibration: CalibrationConfig,

    /// Gaze classification configuration
    pub gaze: GazeConfig,
}

/// Threshold calibration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Samples collected per eye before the binarization threshold freezes
    pub sample_frames: usize,

    /// Fraction of the eye surface the iris is assumed to cover (0.0-1.0)
    pub target_iris_ratio: f64,
}

/// Gaze classification parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GazeConfig {
    /// Horizontal ratio at or below which the gaze counts as looking right
    pub looking_right_max: f64,

    /// Horizontal ratio at or above which the gaze counts as looking left
    pub looking_left_min: f64,

    /// Average width/height ratio above which the eyes count as closed
    pub blink_ratio_threshold: f64,

    /// Pixels subtracted from the doubled eye-box center when normalizing
    /// pupil positions
    pub center_span_offset: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            calibration: CalibrationConfig::default(),
            gaze: GazeConfig::default(),
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            sample_frames: CALIBRATION_FRAMES,
            target_iris_ratio: TARGET_IRIS_RATIO,
        }
    }
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            looking_right_max: LOOKING_RIGHT_MAX,
            looking_left_min: LOOKING_LEFT_MIN,
            blink_ratio_threshold: BLINK_RATIO_THRESHOLD,
            center_span_offset: CENTER_SPAN_OFFSET,
        }
    }
}

impl TrackerConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` describing the first invalid field
    pub fn validate(&self) -> Result<()> {
        if self.calibration.sample_frames == 0 {
            return Err(Error::ConfigError(
                "Calibration sample frames must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.calibration.target_iris_ratio) {
            return Err(Error::ConfigError(
                "Target iris ratio must be between 0.0 and 1.0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.gaze.looking_right_max) {
            return Err(Error::ConfigError(
                "Looking-right threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.gaze.looking_left_min) {
            return Err(Error::ConfigError(
                "Looking-left threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.gaze.looking_right_max >= self.gaze.looking_left_min {
            return Err(Error::ConfigError(
                "Looking-right threshold must be below the looking-left threshold".to_string(),
            ));
        }
        if self.gaze.blink_ratio_threshold <= 0.0 {
            return Err(Error::ConfigError(
                "Blink ratio threshold must be greater than 0".to_string(),
            ));
        }
        if self.gaze.center_span_offset < 0.0 {
            return Err(Error::ConfigError(
                "Center span offset must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Gaze Tracker Configuration

# Binarization threshold calibration
calibration:
  sample_frames: 20
  target_iris_ratio: 0.48

# Gaze classification
gaze:
  looking_right_max: 0.35
  looking_left_min: 0.65
  blink_ratio_threshold: 3.8
  center_span_offset: 10.0
"#;
