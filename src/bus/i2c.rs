//! Host I2C bus. On Linux this is an `/dev/i2c-*` character device driven
//! through linux-embedded-hal; elsewhere opening always fails.

#[cfg(target_os = "linux")]
use tracing::debug;

/// I2C bus handle - platform specific
#[cfg(target_os = "linux")]
pub type I2cBus = linux_embedded_hal::I2cdev;

/// Error raised while opening the bus
#[cfg(target_os = "linux")]
pub type OpenError = linux_embedded_hal::i2cdev::linux::LinuxI2CError;

/// Opens the I2C character device at `path`. The slave address is bound per
/// transaction by the driver.
#[cfg(target_os = "linux")]
pub fn open(path: &str) -> Result<I2cBus, OpenError> {
    let bus = linux_embedded_hal::I2cdev::new(path)?;
    debug!("[i2c] opened {}", path);
    Ok(bus)
}

#[cfg(not(target_os = "linux"))]
pub use self::unsupported::{open, I2cBus, OpenError};

#[cfg(not(target_os = "linux"))]
mod unsupported {
    use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};

    #[derive(Debug)]
    pub struct OpenError(String);

    impl std::fmt::Display for OpenError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "I2C not supported on this platform: {}", self.0)
        }
    }

    impl std::error::Error for OpenError {}

    /// Placeholder bus so the bring-up path type-checks off Linux. It cannot
    /// be constructed through [`open`].
    pub struct I2cBus {
        _private: (),
    }

    impl ErrorType for I2cBus {
        type Error = ErrorKind;
    }

    impl I2c for I2cBus {
        fn transaction(&mut self, _address: u8, _operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }
    }

    pub fn open(path: &str) -> Result<I2cBus, OpenError> {
        Err(OpenError(format!("cannot open '{}', I2C is only supported on Linux", path)))
    }
}
