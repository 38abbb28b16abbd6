pub mod sensor_config;

pub use sensor_config::{load_sensor_config, parse_sensor_config, InterruptConfig, MeasurementConfig, SensorConfig};

/// Directory used when `CONFIG_PATH` is not set
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Sensor configuration file inside the configuration directory
pub const SENSOR_CONFIG_FILE: &str = "sensor.toml";

/// Get the configuration directory (allow override via CONFIG_PATH env var)
pub fn config_dir() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string())
}

pub fn sensor_config_path() -> String {
    format!("{}/{}", config_dir(), SENSOR_CONFIG_FILE)
}
