use std::process::ExitCode;

use tracing::{error, info};
use vcnl40xx::config::sensor_config_path;
use vcnl40xx::{bring_up, init_tracing, load_sensor_config, SetupResult};

fn main() -> ExitCode {
    // RUST_LOG=debug shows every setting, RUST_LOG=trace every register transaction
    init_tracing();

    info!("[vcnl40xx] starting up...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("[main] {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> SetupResult<()> {
    // Load configuration from CONFIG_PATH or default
    let path = sensor_config_path();
    let sensor_config = load_sensor_config(&path)?;
    info!("[config] loaded {} on {} from {}", sensor_config.model, sensor_config.bus, path);

    let mut sensor = bring_up(&sensor_config)?;
    info!("[main] {} ready at {:#04x}", sensor.model(), sensor.address());

    let reading = sensor.reading()?;
    info!(
        "[main] proximity={} ambient={} white={}",
        reading.proximity, reading.ambient, reading.white
    );

    let flags = sensor.interrupt_flags()?;
    info!(
        "[main] close={} away={} light={} dark={}",
        flags.close, flags.away, flags.light, flags.dark
    );

    Ok(())
}
