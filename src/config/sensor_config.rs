use serde::Deserialize;
use std::fs;
use tracing::warn;

use crate::errors::{ConfigError, ConfigResult};
use crate::model::Model;
use crate::settings::{AmbientPersistence, ProximityInterrupt, ProximityPersistence};

/// Root of `sensor.toml`: one sensor on one bus.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorConfig {
    /// I2C character device, e.g. `/dev/i2c-1`
    pub bus: String,
    /// Part name or number, e.g. `vcnl4040` or `4035`
    pub model: String,
    /// 7-bit address; the model's primary address when omitted
    pub address: Option<u8>,
    #[serde(default)]
    pub measurement: MeasurementConfig,
    pub interrupt: Option<InterruptConfig>,
}

/// Measurement settings applied after `init`. Unset fields keep the init
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeasurementConfig {
    pub led_current_ma: Option<u8>,
    pub ir_duty_cycle: Option<u16>,
    pub proximity_integration: Option<u8>,
    pub proximity_resolution: Option<u8>,
    pub ambient_integration_ms: Option<u16>,
    pub proximity_cancellation: Option<u16>,
}

/// `[interrupt]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterruptConfig {
    pub proximity_high: Option<u16>,
    pub proximity_low: Option<u16>,
    pub proximity_mode: Option<ProximityInterrupt>,
    pub proximity_persistence: Option<u8>,
    pub ambient_high: Option<u16>,
    pub ambient_low: Option<u16>,
    pub ambient_persistence: Option<u8>,
    pub ambient_enabled: Option<bool>,
    pub logic_mode: Option<bool>,
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}

impl SensorConfig {
    pub fn model(&self) -> ConfigResult<Model> {
        self.model.parse().map_err(|e: crate::errors::UnknownModel| invalid("model", e.to_string()))
    }

    /// Configured address, or the model's primary one.
    pub fn address(&self) -> ConfigResult<u8> {
        match self.address {
            Some(address) if address > 0x7F => Err(invalid("address", format!("{:#04x} is not a 7-bit address", address))),
            Some(address) => Ok(address),
            None => Ok(self.model()?.default_address()),
        }
    }

    /// Checks every value serde cannot check on its own.
    pub fn validate(&self) -> ConfigResult<()> {
        let model = self.model()?;
        let address = self.address()?;
        if !model.addresses().contains(&address) {
            warn!("[config] address {:#04x} is not a documented {} address", address, model);
        }
        if let Some(interrupt) = &self.interrupt {
            interrupt.proximity_persistence()?;
            interrupt.ambient_persistence()?;
        }
        Ok(())
    }
}

impl InterruptConfig {
    pub fn proximity_persistence(&self) -> ConfigResult<Option<ProximityPersistence>> {
        self.proximity_persistence
            .map(|hits| {
                ProximityPersistence::try_from(hits).map_err(|hits| {
                    invalid("interrupt.proximity_persistence", format!("{} is not one of 1, 2, 3, 4", hits))
                })
            })
            .transpose()
    }

    pub fn ambient_persistence(&self) -> ConfigResult<Option<AmbientPersistence>> {
        self.ambient_persistence
            .map(|hits| {
                AmbientPersistence::try_from(hits)
                    .map_err(|hits| invalid("interrupt.ambient_persistence", format!("{} is not one of 1, 2, 4, 8", hits)))
            })
            .transpose()
    }
}

/// Parses and validates a sensor configuration
pub fn parse_sensor_config(content: &str) -> ConfigResult<SensorConfig> {
    let parsed: SensorConfig = toml::from_str(content)?;
    parsed.validate()?;
    Ok(parsed)
}

/// Loads config from TOML file
pub fn load_sensor_config(path: &str) -> ConfigResult<SensorConfig> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::LoadError {
        path: path.to_string(),
        source,
    })?;
    parse_sensor_config(&content)
}
