pub mod i2c;

pub use i2c::{open, I2cBus};
