mod controller_config;

pub use controller_config::{AxisPidConfigs, ConfigError, ControllerConfig, PidConfig};

#[cfg(test)]
pub(crate) mod tests;
