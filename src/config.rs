//! User configuration loaded from `~/.config/padmap/input.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::controller::gamepad::GamepadSettings;
use crate::controller::snapshot::RawCodeLayout;
use crate::mapping::{ControllerModel, LogicalAxis, PlatformVariant};

const CONFIG_DIR: &str = ".config/padmap";
const CONFIG_FILE: &str = "input.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Threshold {name} must be in (0, 1], got {value}")]
    InvalidThreshold { name: String, value: f32 },

    #[error("Hysteresis must be in [0, {max}), got {value}")]
    InvalidHysteresis { value: f32, max: f32 },
}

/// Threshold override for a single axis.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
pub struct AxisThreshold {
    pub axis: LogicalAxis,
    pub threshold: f32,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Interval between two ticks of the polling loop.
    pub tick_interval_ms: u64,
    /// Host API numbering to use. Probed from the OS when absent.
    pub platform: Option<PlatformVariant>,
    /// Controller model. Identified from the attached pad when absent.
    pub model: Option<ControllerModel>,
    pub stick_threshold: f32,
    pub trigger_threshold: f32,
    pub hysteresis: f32,
    pub axis_thresholds: Vec<AxisThreshold>,
    /// Event code layout for the gilrs collector. Derived from the platform
    /// when absent.
    pub raw_codes: Option<RawCodeLayout>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 16,
            platform: None,
            model: None,
            stick_threshold: 0.5,
            trigger_threshold: 0.5,
            hysteresis: 0.0,
            axis_thresholds: Vec::new(),
            raw_codes: None,
        }
    }
}

impl InputConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading input config from {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads the config from the default location, falling back to the
    /// defaults when no file exists there.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if !path.exists() {
            info!(
                "No config at {}, using default input settings",
                path.display()
            );
            return Ok(Self::default());
        }
        let config = Self::load(&path)?;
        info!("Loaded input config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut thresholds = vec![
            ("stick_threshold".to_string(), self.stick_threshold),
            ("trigger_threshold".to_string(), self.trigger_threshold),
        ];
        thresholds.extend(
            self.axis_thresholds
                .iter()
                .map(|t| (format!("{:?}", t.axis), t.threshold)),
        );

        for (name, value) in thresholds {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }

        let max = self.lowest_threshold();
        if !(self.hysteresis >= 0.0 && self.hysteresis < max) {
            return Err(ConfigError::InvalidHysteresis {
                value: self.hysteresis,
                max,
            });
        }
        Ok(())
    }

    fn lowest_threshold(&self) -> f32 {
        self.axis_thresholds
            .iter()
            .map(|t| t.threshold)
            .fold(self.stick_threshold.min(self.trigger_threshold), f32::min)
    }

    /// Configured platform, or the one matching the running OS.
    pub fn resolve_platform(&self) -> PlatformVariant {
        match self.platform {
            Some(platform) => platform,
            None => {
                let detected = PlatformVariant::detect();
                debug!("Probed platform variant {}", detected);
                detected
            }
        }
    }

    pub fn raw_code_layout(&self, platform: PlatformVariant) -> RawCodeLayout {
        self.raw_codes
            .unwrap_or_else(|| RawCodeLayout::for_variant(platform))
    }

    pub fn gamepad_settings(&self) -> GamepadSettings {
        let mut settings = GamepadSettings {
            stick_threshold: self.stick_threshold,
            trigger_threshold: self.trigger_threshold,
            hysteresis: self.hysteresis,
            ..GamepadSettings::default()
        };
        for entry in &self.axis_thresholds {
            if settings
                .axis_thresholds
                .insert(entry.axis, entry.threshold)
                .is_some()
            {
                warn!("Duplicate threshold for {:?}, last one wins", entry.axis);
            }
        }
        settings
    }
}

fn default_config_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| {
        warn!("Could not determine home directory, using current directory");
        PathBuf::from(".")
    });
    path.push(CONFIG_DIR);
    path.push(CONFIG_FILE);
    path
}
