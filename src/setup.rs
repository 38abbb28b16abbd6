//! Bring-up: turns a [`SensorConfig`] into a connected, initialized sensor.

use embedded_hal::i2c::I2c;
use tracing::{debug, info};

use crate::bus::{self, I2cBus};
use crate::config::SensorConfig;
use crate::driver::{Device, Vcnl40xx};
use crate::errors::{SetupError, SetupResult};

/// Opens the configured bus, then connects, initializes and configures the
/// sensor on it.
pub fn bring_up(config: &SensorConfig) -> SetupResult<Vcnl40xx<I2cBus>> {
    let model = config.model()?;
    let address = config.address()?;

    let i2c = bus::open(&config.bus).map_err(|e| SetupError::BusOpen {
        path: config.bus.clone(),
        reason: e.to_string(),
    })?;
    info!("[setup] {} expected at {:#04x} on {}", model, address, config.bus);

    configure(Device::new(model), i2c, address, config)
}

/// Connects `device` on an already open bus, runs `init` and applies the
/// configured settings on top.
pub fn configure<I: I2c>(device: Device, i2c: I, address: u8, config: &SensorConfig) -> SetupResult<Vcnl40xx<I>> {
    let mut sensor = device.connect(i2c, address)?;
    sensor.init()?;
    apply_config(&mut sensor, config)?;
    Ok(sensor)
}

/// Writes every setting present in `config`. Absent settings are left as
/// they are on the chip.
pub fn apply_config<I: I2c>(sensor: &mut Vcnl40xx<I>, config: &SensorConfig) -> SetupResult<()> {
    let measurement = &config.measurement;
    if let Some(milliamps) = measurement.led_current_ma {
        sensor.set_led_current(milliamps)?;
    }
    if let Some(ratio) = measurement.ir_duty_cycle {
        sensor.set_ir_duty_cycle(ratio)?;
    }
    if let Some(periods) = measurement.proximity_integration {
        sensor.set_proximity_integration_time(periods)?;
    }
    if let Some(bits) = measurement.proximity_resolution {
        sensor.set_proximity_resolution(bits)?;
    }
    if let Some(millis) = measurement.ambient_integration_ms {
        sensor.set_ambient_integration_time(millis)?;
    }
    if let Some(value) = measurement.proximity_cancellation {
        sensor.set_proximity_cancellation(value)?;
    }

    if let Some(interrupt) = &config.interrupt {
        // persistence values are checked before the first write
        let proximity_persistence = interrupt.proximity_persistence()?;
        let ambient_persistence = interrupt.ambient_persistence()?;

        if let Some(threshold) = interrupt.proximity_high {
            sensor.set_proximity_high_threshold(threshold)?;
        }
        if let Some(threshold) = interrupt.proximity_low {
            sensor.set_proximity_low_threshold(threshold)?;
        }
        if let Some(persistence) = proximity_persistence {
            sensor.set_proximity_interrupt_persistence(persistence)?;
        }
        if let Some(mode) = interrupt.proximity_mode {
            sensor.set_proximity_interrupt(mode)?;
        }
        match interrupt.logic_mode {
            Some(true) => sensor.enable_proximity_logic_mode()?,
            Some(false) => sensor.disable_proximity_logic_mode()?,
            None => {}
        }

        if let Some(threshold) = interrupt.ambient_high {
            sensor.set_ambient_high_threshold(threshold)?;
        }
        if let Some(threshold) = interrupt.ambient_low {
            sensor.set_ambient_low_threshold(threshold)?;
        }
        if let Some(persistence) = ambient_persistence {
            sensor.set_ambient_interrupt_persistence(persistence)?;
        }
        match interrupt.ambient_enabled {
            Some(true) => sensor.enable_ambient_interrupts()?,
            Some(false) => sensor.disable_ambient_interrupts()?,
            None => {}
        }
    }

    debug!("[setup] configuration applied to {}", sensor.model());
    Ok(())
}
