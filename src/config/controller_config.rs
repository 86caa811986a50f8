use crate::flight_control::common::delta_from_secs;
use serde::Deserialize;
use std::{fmt, path::Path};

/// Gains and limits of one PID axis, as found under `PIDs/<axis>`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PidConfig {
    pub kp: f64,
    pub kd: f64,
    pub ki: f64,
    pub min_output: f64,
    pub max_output: f64,
    pub integrator_min: f64,
    pub integrator_max: f64,
}

impl PidConfig {
    fn validate(&self, axis: &'static str) -> Result<(), ConfigError> {
        let values = [
            ("kp", self.kp),
            ("kd", self.kd),
            ("ki", self.ki),
            ("minOutput", self.min_output),
            ("maxOutput", self.max_output),
            ("integratorMin", self.integrator_min),
            ("integratorMax", self.integrator_max),
        ];
        if let Some((name, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid { field: format!("PIDs/{axis}/{name}"), reason: "not finite" });
        }
        if self.min_output >= self.max_output {
            return Err(ConfigError::Invalid {
                field: format!("PIDs/{axis}/minOutput"),
                reason: "must be below maxOutput",
            });
        }
        if self.integrator_min > self.integrator_max {
            return Err(ConfigError::Invalid {
                field: format!("PIDs/{axis}/integratorMin"),
                reason: "must not exceed integratorMax",
            });
        }
        Ok(())
    }
}

/// One [`PidConfig`] per controlled axis.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AxisPidConfigs {
    #[serde(rename = "X")]
    pub x: PidConfig,
    #[serde(rename = "Y")]
    pub y: PidConfig,
    #[serde(rename = "Z")]
    pub z: PidConfig,
    #[serde(rename = "Yaw")]
    pub yaw: PidConfig,
}

/// Startup parameters of the flight controller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerConfig {
    /// Fixed world frame all poses are resolved in.
    #[serde(default = "ControllerConfig::default_world_frame")]
    pub world_frame: String,
    /// Frame of the controlled vehicle.
    pub frame: String,
    /// Control loop rate in Hz.
    #[serde(default = "ControllerConfig::default_frequency")]
    pub frequency: f64,
    /// Oldest vehicle pose sample (seconds) still accepted as current.
    #[serde(default = "ControllerConfig::default_max_pose_age")]
    pub max_pose_age: f64,
    /// Half-width of the x/y window in which integral accumulation is held.
    /// Absent means the integral is always active.
    #[serde(default)]
    pub xy_integral_dead_band: Option<f64>,
    #[serde(rename = "PIDs")]
    pub pids: AxisPidConfigs,
}

impl ControllerConfig {
    const CONFIG_ENV: &'static str = "ROTOR_CTRL_CONFIG";
    const DEFAULT_CONFIG_PATH: &'static str = "./controller.json";
    /// Accepted control loop rates in Hz.
    const FREQUENCY_RANGE: std::ops::RangeInclusive<f64> = 1.0..=1000.0;

    fn default_world_frame() -> String { "/world".to_string() }
    fn default_frequency() -> f64 { 50.0 }
    fn default_max_pose_age() -> f64 { 0.5 }

    /// Loads the file named by `ROTOR_CTRL_CONFIG`, falling back to
    /// `./controller.json`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path_var = std::env::var(Self::CONFIG_ENV);
        let path = path_var.as_deref().unwrap_or(Self::DEFAULT_CONFIG_PATH);
        Self::from_file(path)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json(&raw)
    }

    /// Parses and validates a JSON parameter document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: ControllerConfig = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "frame".to_string(), reason: "empty" });
        }
        if self.world_frame.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "worldFrame".to_string(), reason: "empty" });
        }
        if !Self::FREQUENCY_RANGE.contains(&self.frequency) {
            return Err(ConfigError::Invalid {
                field: "frequency".to_string(),
                reason: "must be between 1 and 1000 Hz",
            });
        }
        if !self.max_pose_age.is_finite() || self.max_pose_age <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "maxPoseAge".to_string(),
                reason: "must be positive",
            });
        }
        if let Some(width) = self.xy_integral_dead_band {
            if !width.is_finite() || width <= 0.0 {
                return Err(ConfigError::Invalid {
                    field: "xyIntegralDeadBand".to_string(),
                    reason: "must be positive",
                });
            }
        }
        self.pids.x.validate("X")?;
        self.pids.y.validate("Y")?;
        self.pids.z.validate("Z")?;
        self.pids.yaw.validate("Yaw")
    }

    /// Nominal control period in seconds.
    pub fn period_secs(&self) -> f64 { 1.0 / self.frequency }

    pub fn period(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.period_secs())
    }

    pub fn max_pose_age_delta(&self) -> chrono::TimeDelta { delta_from_secs(self.max_pose_age) }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid { field: String, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read configuration: {e}"),
            ConfigError::Parse(e) => write!(f, "malformed configuration: {e}"),
            ConfigError::Invalid { field, reason } => write!(f, "invalid parameter {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}
