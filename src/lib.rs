//! Driver for the Vishay VCNL4040, VCNL4030 and VCNL4035 proximity and
//! ambient light sensors.
//!
//! The three parts share one driver: a [`model::Profile`] selects the
//! command codes and bit encodings of the connected part, and every
//! operation is expressed against those tables.

// Public modules
pub mod bus;
pub mod config;
pub mod driver;
pub mod errors;
pub mod model;
pub mod registers;
pub mod settings;
pub mod setup;

// Re-export commonly used types
pub use config::{load_sensor_config, SensorConfig};
pub use driver::{Device, Vcnl40xx};
pub use errors::{ConfigError, DriverResult, Error, SetupError, SetupResult, UnknownModel};
pub use model::{resolve, Model, Profile};
pub use settings::{InterruptFlags, Reading};
pub use setup::bring_up;

use tracing_subscriber::EnvFilter;

/// Initialize tracing with default configuration
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();
}
