//! Device driver: 16-bit register transactions and the sensor operations
//! built on them.
//!
//! Every configuration setter is a read-modify-write of one byte half. The
//! bus always moves whole 16-bit registers, so the other half is re-read and
//! written back unchanged. Nothing is cached; each call goes to the device.
//!
//! Methods take `&mut self`, so a driver instance cannot be shared between
//! threads without external locking. The read-modify-write sequence is not
//! atomic on the bus.

use embedded_hal::i2c::I2c;
use tracing::{debug, info, trace, warn};

use crate::errors::{DriverResult, Error, UnknownModel};
use crate::model::{resolve, Feature, Model, Profile};
use crate::registers::{ByteHalf, ByteRegister, Choice, Field, Ladder, Switch};
use crate::settings::{
    AmbientPersistence, AmbientSensitivity, InterruptFlags, MultiPulse, ProximityGain, ProximityInterrupt,
    ProximityPersistence, ProximitySensitivity, Reading, SunlightCancelCurrent, SunlightProtectOutput,
    SunlightProtection,
};

/// LED current set by `init`, the maximum
pub const INIT_LED_CURRENT_MA: u8 = 200;
/// Duty ratio 1/40 set by `init`, the fastest response
pub const INIT_IR_DUTY_CYCLE: u16 = 40;
/// Proximity integration time set by `init`, in T
pub const INIT_PROXIMITY_INTEGRATION: u8 = 8;
/// Proximity output width set by `init`, in bits
pub const INIT_PROXIMITY_RESOLUTION: u8 = 16;

/// A sensor whose model tables are selected but which is not attached to a
/// bus yet.
#[derive(Debug, Clone, Copy)]
pub struct Device {
    profile: Profile,
}

impl Device {
    pub fn new(model: Model) -> Self {
        Self { profile: resolve(model) }
    }

    pub fn from_part_number(part_number: u16) -> Result<Self, UnknownModel> {
        Model::try_from(part_number).map(Self::new)
    }

    pub fn model(&self) -> Model {
        self.profile.model
    }

    /// Attaches the bus and verifies the chip identity.
    ///
    /// The driver is only handed out when the ID register matches the
    /// selected model; on mismatch nothing else is written and the bus is
    /// dropped. Use [`Device::try_connect`] to get the bus back instead.
    pub fn connect<I, E>(self, i2c: I, address: u8) -> DriverResult<Vcnl40xx<I>, E>
    where
        I: I2c<Error = E>,
    {
        self.try_connect(i2c, address).map_err(|(error, _)| error)
    }

    /// Like [`Device::connect`], but hands the bus back together with the
    /// error when the identity read or check fails.
    pub fn try_connect<I, E>(self, i2c: I, address: u8) -> Result<Vcnl40xx<I>, (Error<E>, I)>
    where
        I: I2c<Error = E>,
    {
        let model = self.profile.model;
        let want = self.profile.identity;
        let mut sensor = Vcnl40xx { i2c, address, profile: self.profile };

        let got = match sensor.identity() {
            Ok(got) => got,
            Err(error) => return Err((error, sensor.release())),
        };
        if got != want {
            warn!("[{}] unexpected identity {:#04x} at address {:#04x}, wanted {:#04x}", model, got, address, want);
            return Err((Error::UnexpectedIdentity { got, want }, sensor.release()));
        }

        info!("[{}] connected at address {:#04x}", model, address);
        Ok(sensor)
    }
}

/// Connected driver for one sensor on one bus address.
pub struct Vcnl40xx<I> {
    i2c: I,
    address: u8,
    profile: Profile,
}

impl<I, E> Vcnl40xx<I>
where
    I: I2c<Error = E>,
{
    pub fn model(&self) -> Model {
        self.profile.model
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Gives the bus back.
    pub fn release(self) -> I {
        self.i2c
    }

    /// Puts the sensor in its default operating mode with proximity and
    /// ambient sensing running.
    ///
    /// Stops at the first failing step; earlier steps stay applied.
    pub fn init(&mut self) -> DriverResult<(), E> {
        self.set_led_current(INIT_LED_CURRENT_MA)?;
        self.set_ir_duty_cycle(INIT_IR_DUTY_CYCLE)?;
        self.set_proximity_integration_time(INIT_PROXIMITY_INTEGRATION)?;
        self.set_proximity_resolution(INIT_PROXIMITY_RESOLUTION)?;
        self.enable_smart_persistence()?;
        self.power_on_proximity()?;

        // fastest step differs per model: 80 ms on VCNL4040, 50 ms otherwise
        let fastest = self.profile.fields.als_it.settings().next().unwrap_or_default();
        self.set_ambient_integration_time(fastest)?;
        self.power_on_ambient()?;

        if self.profile.model.supports_white_channel() {
            self.power_on_white()?;
        }

        info!("[{}] initialized", self.profile.model);
        Ok(())
    }

    // Register transactions

    /// Reads a 16-bit register; the first byte on the bus is the low byte.
    pub fn read_register16(&mut self, code: u8) -> DriverResult<u16, E> {
        let mut buf = [0u8; 2];
        self.i2c.write_read(self.address, &[code], &mut buf).map_err(Error::Transport)?;
        let value = u16::from_le_bytes(buf);
        trace!("[{}] read {:#04x} -> {:#06x}", self.profile.model, code, value);
        Ok(value)
    }

    /// Writes a 16-bit register as command code, low byte, high byte.
    pub fn write_register16(&mut self, code: u8, value: u16) -> DriverResult<(), E> {
        let [low, high] = value.to_le_bytes();
        trace!("[{}] write {:#04x} <- {:#06x}", self.profile.model, code, value);
        self.i2c.write(self.address, &[code, low, high]).map_err(Error::Transport)
    }

    pub fn read_byte_half(&mut self, code: u8, half: ByteHalf) -> DriverResult<u8, E> {
        Ok(half.extract(self.read_register16(code)?))
    }

    /// Replaces one half of a register, re-reading it first so the other half
    /// is written back unchanged.
    pub fn write_byte_half(&mut self, code: u8, half: ByteHalf, byte: u8) -> DriverResult<(), E> {
        let current = self.read_register16(code)?;
        self.write_register16(code, half.splice(current, byte))
    }

    /// Clears the bits outside `mask` in one byte half and ORs in `value`.
    pub fn apply_field_mask(&mut self, code: u8, half: ByteHalf, mask: u8, value: u8) -> DriverResult<(), E> {
        let current = self.read_byte_half(code, half)?;
        let field = Field { mask, value };
        self.write_byte_half(code, half, field.apply(current))
    }

    // Power

    pub fn power_on_proximity(&mut self) -> DriverResult<(), E> {
        self.write_switch(self.profile.fields.ps_sd, true, "power_on_proximity")
    }

    pub fn power_off_proximity(&mut self) -> DriverResult<(), E> {
        self.write_switch(self.profile.fields.ps_sd, false, "power_off_proximity")
    }

    pub fn power_on_ambient(&mut self) -> DriverResult<(), E> {
        self.write_switch(self.profile.fields.als_sd, true, "power_on_ambient")
    }

    pub fn power_off_ambient(&mut self) -> DriverResult<(), E> {
        self.write_switch(self.profile.fields.als_sd, false, "power_off_ambient")
    }

    /// Powers the white channel up. Only on models with WHITE_SD.
    pub fn power_on_white(&mut self) -> DriverResult<(), E> {
        self.set_white_power(true, "power_on_white")
    }

    pub fn power_off_white(&mut self) -> DriverResult<(), E> {
        self.set_white_power(false, "power_off_white")
    }

    fn set_white_power(&mut self, on: bool, operation: &'static str) -> DriverResult<(), E> {
        let switch = self.feature(Feature::WhiteShutdown, self.profile.fields.white_sd, operation)?;
        self.write_switch(switch, on, operation)
    }

    /// Enables white measurements through WHITE_EN (VCNL4040).
    pub fn enable_white_channel(&mut self) -> DriverResult<(), E> {
        let switch = self.feature(Feature::WhiteEnable, self.profile.fields.white_en, "enable_white_channel")?;
        self.write_switch(switch, true, "enable_white_channel")
    }

    pub fn disable_white_channel(&mut self) -> DriverResult<(), E> {
        let switch = self.feature(Feature::WhiteEnable, self.profile.fields.white_en, "disable_white_channel")?;
        self.write_switch(switch, false, "disable_white_channel")
    }

    // Measurement settings

    /// Sets the ambient integration time in milliseconds and returns the
    /// step actually selected.
    pub fn set_ambient_integration_time(&mut self, millis: u16) -> DriverResult<u16, E> {
        self.write_ladder(self.profile.fields.als_it, millis, "set_ambient_integration_time")
    }

    /// Sets the proximity integration time in multiples of T (1, 2, 3, 4 or 8).
    pub fn set_proximity_integration_time(&mut self, periods: u8) -> DriverResult<u8, E> {
        let selected = self.write_ladder(self.profile.fields.ps_it, u16::from(periods), "set_proximity_integration_time")?;
        Ok(narrow(selected))
    }

    /// Sets the proximity output width to 12 or 16 bits.
    pub fn set_proximity_resolution(&mut self, bits: u8) -> DriverResult<u8, E> {
        let selected = self.write_ladder(self.profile.fields.ps_hd, u16::from(bits), "set_proximity_resolution")?;
        Ok(narrow(selected))
    }

    /// Sets the IR LED duty ratio to 1/40, 1/80, 1/160 or 1/320. A higher
    /// ratio responds faster and draws more power.
    pub fn set_ir_duty_cycle(&mut self, ratio: u16) -> DriverResult<u16, E> {
        self.write_ladder(self.profile.fields.ps_duty, ratio, "set_ir_duty_cycle")
    }

    /// Sets the IR LED sink current in milliamps (50 to 200).
    pub fn set_led_current(&mut self, milliamps: u8) -> DriverResult<u8, E> {
        let selected = self.write_ladder(self.profile.fields.led_i, u16::from(milliamps), "set_led_current")?;
        Ok(narrow(selected))
    }

    /// Reduces the LED current to a tenth (VCNL4030/VCNL4035).
    pub fn set_led_low_current(&mut self, enabled: bool) -> DriverResult<(), E> {
        let switch = self.feature(Feature::LedLowCurrent, self.profile.fields.led_i_low, "set_led_low_current")?;
        self.write_switch(switch, enabled, "set_led_low_current")
    }

    pub fn set_ambient_high_dynamic_range(&mut self, enabled: bool) -> DriverResult<(), E> {
        let switch = self.feature(Feature::AmbientHighDynamicRange, self.profile.fields.als_hd, "set_ambient_high_dynamic_range")?;
        self.write_switch(switch, enabled, "set_ambient_high_dynamic_range")
    }

    pub fn set_ambient_sensitivity(&mut self, sensitivity: AmbientSensitivity) -> DriverResult<(), E> {
        let choice = self.feature(Feature::AmbientSensitivity, self.profile.fields.als_ns, "set_ambient_sensitivity")?;
        self.write_choice(choice, sensitivity as usize, "set_ambient_sensitivity")
    }

    pub fn set_proximity_gain(&mut self, gain: ProximityGain) -> DriverResult<(), E> {
        let choice = self.feature(Feature::ProximityGain, self.profile.fields.ps_gain, "set_proximity_gain")?;
        self.write_choice(choice, gain as usize, "set_proximity_gain")
    }

    pub fn set_proximity_sensitivity(&mut self, sensitivity: ProximitySensitivity) -> DriverResult<(), E> {
        let choice = self.feature(Feature::ProximitySensitivity, self.profile.fields.ps_ns, "set_proximity_sensitivity")?;
        self.write_choice(choice, sensitivity as usize, "set_proximity_sensitivity")
    }

    /// Sets the number of LED pulses per proximity measurement (VCNL4040).
    pub fn set_proximity_multi_pulse(&mut self, pulses: MultiPulse) -> DriverResult<(), E> {
        let choice = self.feature(Feature::MultiPulse, self.profile.fields.ps_mps, "set_proximity_multi_pulse")?;
        self.write_choice(choice, pulses as usize, "set_proximity_multi_pulse")
    }

    // Proximity modes

    /// Smart persistence speeds up the proximity response while keeping the
    /// debounce of the persistence setting.
    pub fn enable_smart_persistence(&mut self) -> DriverResult<(), E> {
        self.write_switch(self.profile.fields.ps_smart_pers, true, "enable_smart_persistence")
    }

    pub fn disable_smart_persistence(&mut self) -> DriverResult<(), E> {
        self.write_switch(self.profile.fields.ps_smart_pers, false, "disable_smart_persistence")
    }

    /// In active force mode the sensor idles in standby and measures only
    /// when triggered with [`Vcnl40xx::trigger_proximity_measurement`].
    pub fn enable_active_force_mode(&mut self) -> DriverResult<(), E> {
        self.write_switch(self.profile.fields.ps_af, true, "enable_active_force_mode")
    }

    pub fn disable_active_force_mode(&mut self) -> DriverResult<(), E> {
        self.write_switch(self.profile.fields.ps_af, false, "disable_active_force_mode")
    }

    /// Requests one proximity measurement in active force mode.
    pub fn trigger_proximity_measurement(&mut self) -> DriverResult<(), E> {
        self.write_choice(self.profile.fields.ps_trig, 0, "trigger_proximity_measurement")
    }

    /// Logic output mode: INT is pulled low while the reading is above the
    /// high threshold and released once it drops below the low threshold.
    pub fn enable_proximity_logic_mode(&mut self) -> DriverResult<(), E> {
        self.write_switch(self.profile.fields.ps_logic, true, "enable_proximity_logic_mode")
    }

    pub fn disable_proximity_logic_mode(&mut self) -> DriverResult<(), E> {
        self.write_switch(self.profile.fields.ps_logic, false, "disable_proximity_logic_mode")
    }

    pub fn enable_sunlight_cancellation(&mut self) -> DriverResult<(), E> {
        self.write_switch(self.profile.fields.ps_sc_en, true, "enable_sunlight_cancellation")
    }

    pub fn disable_sunlight_cancellation(&mut self) -> DriverResult<(), E> {
        self.write_switch(self.profile.fields.ps_sc_en, false, "disable_sunlight_cancellation")
    }

    pub fn set_sunlight_cancel_current(&mut self, current: SunlightCancelCurrent) -> DriverResult<(), E> {
        let choice = self.feature(Feature::SunlightCancelCurrent, self.profile.fields.ps_sc_cur, "set_sunlight_cancel_current")?;
        self.write_choice(choice, current as usize, "set_sunlight_cancel_current")
    }

    pub fn set_sunlight_protection(&mut self, protection: SunlightProtection) -> DriverResult<(), E> {
        let choice = self.feature(Feature::SunlightProtection, self.profile.fields.ps_sp, "set_sunlight_protection")?;
        self.write_choice(choice, protection as usize, "set_sunlight_protection")
    }

    pub fn set_sunlight_protect_output(&mut self, output: SunlightProtectOutput) -> DriverResult<(), E> {
        let choice = self.feature(Feature::SunlightProtection, self.profile.fields.ps_spo, "set_sunlight_protect_output")?;
        self.write_choice(choice, output as usize, "set_sunlight_protect_output")
    }

    // Interrupts

    pub fn set_proximity_interrupt(&mut self, interrupt: ProximityInterrupt) -> DriverResult<(), E> {
        self.write_choice(self.profile.fields.ps_int, interrupt as usize, "set_proximity_interrupt")
    }

    /// Consecutive hits before a proximity interrupt is raised.
    pub fn set_proximity_interrupt_persistence(&mut self, persistence: ProximityPersistence) -> DriverResult<(), E> {
        self.write_choice(self.profile.fields.ps_pers, persistence as usize, "set_proximity_interrupt_persistence")
    }

    /// Consecutive hits before an ambient interrupt is raised.
    pub fn set_ambient_interrupt_persistence(&mut self, persistence: AmbientPersistence) -> DriverResult<(), E> {
        self.write_choice(self.profile.fields.als_pers, persistence as usize, "set_ambient_interrupt_persistence")
    }

    pub fn enable_ambient_interrupts(&mut self) -> DriverResult<(), E> {
        self.write_switch(self.profile.fields.als_int_en, true, "enable_ambient_interrupts")
    }

    pub fn disable_ambient_interrupts(&mut self) -> DriverResult<(), E> {
        self.write_switch(self.profile.fields.als_int_en, false, "disable_ambient_interrupts")
    }

    /// Value subtracted from proximity readings to cancel cross-talk.
    pub fn set_proximity_cancellation(&mut self, value: u16) -> DriverResult<(), E> {
        self.write_register16(self.profile.commands.ps_canc, value)
    }

    pub fn set_proximity_high_threshold(&mut self, threshold: u16) -> DriverResult<(), E> {
        self.write_register16(self.profile.commands.ps_thdh, threshold)
    }

    pub fn set_proximity_low_threshold(&mut self, threshold: u16) -> DriverResult<(), E> {
        self.write_register16(self.profile.commands.ps_thdl, threshold)
    }

    pub fn set_ambient_high_threshold(&mut self, threshold: u16) -> DriverResult<(), E> {
        self.write_register16(self.profile.commands.als_thdh, threshold)
    }

    pub fn set_ambient_low_threshold(&mut self, threshold: u16) -> DriverResult<(), E> {
        self.write_register16(self.profile.commands.als_thdl, threshold)
    }

    /// Reads the interrupt flag byte once.
    pub fn interrupt_flags(&mut self) -> DriverResult<InterruptFlags, E> {
        let location = self.profile.commands.int_flag;
        let bits = self.profile.fields.int_flags;
        let flags = self.read_byte_half(location.code, location.half)?;
        Ok(InterruptFlags {
            close: flags & bits.close != 0,
            away: flags & bits.away != 0,
            light: flags & bits.als_high != 0,
            dark: flags & bits.als_low != 0,
        })
    }

    /// Proximity rose above the high threshold.
    pub fn is_close(&mut self) -> DriverResult<bool, E> {
        Ok(self.interrupt_flags()?.close)
    }

    /// Proximity dropped below the low threshold.
    pub fn is_away(&mut self) -> DriverResult<bool, E> {
        Ok(self.interrupt_flags()?.away)
    }

    /// Ambient light rose above the high threshold.
    pub fn is_light(&mut self) -> DriverResult<bool, E> {
        Ok(self.interrupt_flags()?.light)
    }

    /// Ambient light dropped below the low threshold.
    pub fn is_dark(&mut self) -> DriverResult<bool, E> {
        Ok(self.interrupt_flags()?.dark)
    }

    // Data

    /// Raw proximity count; 0 is far, larger is nearer.
    pub fn proximity(&mut self) -> DriverResult<u16, E> {
        self.read_register16(self.profile.commands.ps_data)
    }

    /// Raw proximity count of one channel (1 to 3) on VCNL4035.
    pub fn proximity_channel(&mut self, channel: u8) -> DriverResult<u16, E> {
        let channels = self.feature(Feature::ProximityChannels, self.profile.commands.ps_data_channels, "proximity_channel")?;
        if channel == 0 || channel > self.profile.model.proximity_channels() {
            return Err(Error::InvalidChannel(channel));
        }
        let code = channels[usize::from(channel - 1)];
        self.read_register16(code)
    }

    /// Raw ambient light count; 0 is dark.
    pub fn ambient(&mut self) -> DriverResult<u16, E> {
        self.read_register16(self.profile.commands.als_data)
    }

    /// Raw white light count.
    pub fn white(&mut self) -> DriverResult<u16, E> {
        self.read_register16(self.profile.commands.white_data)
    }

    pub fn reading(&mut self) -> DriverResult<Reading, E> {
        Ok(Reading {
            proximity: self.proximity()?,
            ambient: self.ambient()?,
            white: self.white()?,
        })
    }

    /// Low byte of the ID register.
    pub fn identity(&mut self) -> DriverResult<u8, E> {
        let location = self.profile.commands.id;
        self.read_byte_half(location.code, location.half)
    }

    // Table plumbing

    fn unsupported(&self, operation: &'static str) -> Error<E> {
        Error::UnsupportedOperation { operation, model: self.profile.model }
    }

    /// Gates a model-specific table entry on the capability table. The entry
    /// is present exactly when the model supports the feature.
    fn feature<T>(&self, feature: Feature, entry: Option<T>, operation: &'static str) -> DriverResult<T, E> {
        if !self.profile.model.supports(feature) {
            return Err(self.unsupported(operation));
        }
        entry.ok_or_else(|| self.unsupported(operation))
    }

    fn write_field(&mut self, register: ByteRegister, field: Field, operation: &'static str) -> DriverResult<(), E> {
        let location = self.profile.commands.locate(register).ok_or_else(|| self.unsupported(operation))?;
        debug!(
            "[{}] {}: {:?} mask {:#010b} value {:#010b}",
            self.profile.model, operation, register, field.mask, field.value
        );
        self.apply_field_mask(location.code, location.half, field.mask, field.value)
    }

    fn write_switch(&mut self, switch: Switch, on: bool, operation: &'static str) -> DriverResult<(), E> {
        self.write_field(switch.register, switch.field(on), operation)
    }

    fn write_choice<const N: usize>(&mut self, choice: Choice<N>, index: usize, operation: &'static str) -> DriverResult<(), E> {
        self.write_field(choice.register, choice.field(index), operation)
    }

    fn write_ladder(&mut self, ladder: Ladder, requested: u16, operation: &'static str) -> DriverResult<u16, E> {
        let (selected, field) = ladder.select(requested);
        if selected != requested {
            debug!("[{}] {}: requested {}, selected {}", self.profile.model, operation, requested, selected);
        }
        self.write_field(ladder.register, field, operation)?;
        Ok(selected)
    }
}

fn narrow(setting: u16) -> u8 {
    u8::try_from(setting).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x60;

    fn read(code: u8, value: u16) -> I2cTransaction {
        I2cTransaction::write_read(ADDR, vec![code], value.to_le_bytes().to_vec())
    }

    fn write(code: u8, value: u16) -> I2cTransaction {
        let [low, high] = value.to_le_bytes();
        I2cTransaction::write(ADDR, vec![code, low, high])
    }

    /// Field update: byte-half read, re-read for the splice, write-back.
    fn rmw(code: u8, current: u16, updated: u16) -> Vec<I2cTransaction> {
        vec![read(code, current), read(code, current), write(code, updated)]
    }

    fn identity(model: Model) -> I2cTransaction {
        read(resolve(model).commands.id.code, 0x0100 | u16::from(model.identity()))
    }

    fn connect(model: Model, rest: Vec<I2cTransaction>) -> (Vcnl40xx<I2cMock>, I2cMock) {
        let mut expectations = vec![identity(model)];
        expectations.extend(rest);
        let i2c = I2cMock::new(&expectations);
        let handle = i2c.clone();
        let sensor = Device::new(model).connect(i2c, ADDR).unwrap();
        (sensor, handle)
    }

    #[test]
    fn test_connect_checks_identity() {
        let (sensor, mut i2c) = connect(Model::Vcnl4040, vec![]);
        assert_eq!(sensor.model(), Model::Vcnl4040);
        assert_eq!(sensor.address(), ADDR);
        i2c.done();
    }

    #[test]
    fn test_wrong_identity_stops_before_any_write() {
        let i2c = I2cMock::new(&[read(0x0C, 0x0180)]);
        let mut handle = i2c.clone();

        let result = Device::new(Model::Vcnl4040).connect(i2c, ADDR);
        assert!(matches!(result, Err(Error::UnexpectedIdentity { got: 0x80, want: 0x86 })));

        handle.done();
    }

    #[test]
    fn test_try_connect_returns_bus_on_mismatch() {
        let i2c = I2cMock::new(&[read(0x0C, 0x0180)]);

        let Err((error, mut i2c)) = Device::new(Model::Vcnl4040).try_connect(i2c, ADDR) else {
            panic!("connected to the wrong part");
        };
        assert_eq!(error, Error::UnexpectedIdentity { got: 0x80, want: 0x86 });
        i2c.done();
    }

    #[test]
    fn test_try_connect_returns_bus_on_transport_error() {
        let i2c = I2cMock::new(&[read(0x0E, 0).with_error(ErrorKind::Other)]);

        let Err((error, mut i2c)) = Device::new(Model::Vcnl4035).try_connect(i2c, ADDR) else {
            panic!("connected despite a failed identity read");
        };
        assert_eq!(error, Error::Transport(ErrorKind::Other));
        i2c.done();
    }

    #[test]
    fn test_identity_bus_failure_is_transport_error() {
        let i2c = I2cMock::new(&[read(0x0E, 0).with_error(ErrorKind::Other)]);
        let mut handle = i2c.clone();

        let result = Device::new(Model::Vcnl4030).connect(i2c, ADDR);
        assert!(matches!(result, Err(Error::Transport(ErrorKind::Other))));

        handle.done();
    }

    #[test]
    fn test_from_part_number() {
        assert_eq!(Device::from_part_number(4035).unwrap().model(), Model::Vcnl4035);
        assert!(Device::from_part_number(4000).is_err());
    }

    #[test]
    fn test_read_register_is_little_endian() {
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, vec![read(0x08, 0x1234)]);
        assert_eq!(sensor.read_register16(0x08), Ok(0x1234));
        i2c.done();
    }

    #[test]
    fn test_write_low_half_keeps_high_half() {
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, vec![read(0x03, 0x5A3C), write(0x03, 0x5AAB)]);
        sensor.write_byte_half(0x03, ByteHalf::Low, 0xAB).unwrap();
        i2c.done();
    }

    #[test]
    fn test_write_high_half_keeps_low_half() {
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, vec![read(0x04, 0x5A3C), write(0x04, 0xAB3C)]);
        sensor.write_byte_half(0x04, ByteHalf::High, 0xAB).unwrap();
        i2c.done();
    }

    #[test]
    fn test_field_update_keeps_neighbouring_bits() {
        // ALS_IT occupies bits 7:6 of the low half; 150 ms rounds up to 160 ms
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, rmw(0x00, 0xFFFF, 0xFF7F));
        assert_eq!(sensor.set_ambient_integration_time(150), Ok(160));
        i2c.done();
    }

    #[test]
    fn test_ambient_integration_time_ladder() {
        let mut expectations = rmw(0x00, 0x0000, 0x00C0);
        expectations.extend(rmw(0x00, 0x0000, 0x0000));
        expectations.extend(rmw(0x00, 0x0000, 0x0080));
        expectations.extend(rmw(0x00, 0x00C0, 0x0040));
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, expectations);

        assert_eq!(sensor.set_ambient_integration_time(700), Ok(640));
        assert_eq!(sensor.set_ambient_integration_time(10), Ok(80));
        assert_eq!(sensor.set_ambient_integration_time(320), Ok(320));
        assert_eq!(sensor.set_ambient_integration_time(160), Ok(160));
        i2c.done();
    }

    #[test]
    fn test_ambient_integration_time_uses_model_encoding() {
        let (mut sensor, mut i2c) = connect(Model::Vcnl4030, rmw(0x00, 0x0000, 0x0040));
        assert_eq!(sensor.set_ambient_integration_time(150), Ok(200));
        i2c.done();
    }

    #[test]
    fn test_led_current_writes_high_half() {
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, rmw(0x04, 0x40C3, 0x44C3));
        assert_eq!(sensor.set_led_current(130), Ok(140));
        i2c.done();
    }

    #[test]
    fn test_proximity_interrupt_keeps_resolution_bit() {
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, rmw(0x03, 0x0800, 0x0B00));
        sensor.set_proximity_interrupt(ProximityInterrupt::Both).unwrap();
        i2c.done();
    }

    #[test]
    fn test_persistence_settings() {
        let mut expectations = rmw(0x00, 0x000C, 0x0008);
        expectations.extend(rmw(0x03, 0x0000, 0x0020));
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, expectations);

        sensor.set_ambient_interrupt_persistence(AmbientPersistence::Four).unwrap();
        sensor.set_proximity_interrupt_persistence(ProximityPersistence::Three).unwrap();
        i2c.done();
    }

    #[test]
    fn test_proximity_high_threshold_is_single_write() {
        let (mut sensor, mut i2c) = connect(
            Model::Vcnl4040,
            vec![I2cTransaction::write(ADDR, vec![0x07, 0xD0, 0x07])],
        );
        sensor.set_proximity_high_threshold(2000).unwrap();
        i2c.done();
    }

    #[test]
    fn test_word_registers() {
        let (mut sensor, mut i2c) = connect(
            Model::Vcnl4030,
            vec![write(0x06, 150), write(0x05, 0x0102), write(0x01, 0xFFFF), write(0x02, 0)],
        );
        sensor.set_proximity_low_threshold(150).unwrap();
        sensor.set_proximity_cancellation(0x0102).unwrap();
        sensor.set_ambient_high_threshold(0xFFFF).unwrap();
        sensor.set_ambient_low_threshold(0).unwrap();
        i2c.done();
    }

    #[test]
    fn test_white_power_unsupported_without_bus_traffic() {
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, vec![]);
        assert_eq!(
            sensor.power_on_white(),
            Err(Error::UnsupportedOperation { operation: "power_on_white", model: Model::Vcnl4040 })
        );
        assert!(sensor.power_off_white().is_err());
        i2c.done();
    }

    #[test]
    fn test_white_power_on_als_conf2() {
        // WHITE_SD is bit 0 of the high half of command 0x00
        let (mut sensor, mut i2c) = connect(Model::Vcnl4030, rmw(0x00, 0x0301, 0x0201));
        sensor.power_on_white().unwrap();
        i2c.done();
    }

    #[test]
    fn test_white_enable_only_on_vcnl4040() {
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, rmw(0x04, 0x0007, 0x8007));
        sensor.disable_white_channel().unwrap();
        i2c.done();

        let (mut sensor, mut i2c) = connect(Model::Vcnl4035, vec![]);
        assert!(matches!(sensor.enable_white_channel(), Err(Error::UnsupportedOperation { .. })));
        i2c.done();
    }

    #[test]
    fn test_logic_mode_register_per_model() {
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, rmw(0x04, 0x0000, 0x4000));
        sensor.enable_proximity_logic_mode().unwrap();
        i2c.done();

        let (mut sensor, mut i2c) = connect(Model::Vcnl4030, rmw(0x04, 0x0012, 0x0010));
        sensor.disable_proximity_logic_mode().unwrap();
        i2c.done();
    }

    #[test]
    fn test_trigger_sets_only_trigger_bit() {
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, rmw(0x04, 0x0718, 0x071C));
        sensor.trigger_proximity_measurement().unwrap();
        i2c.done();
    }

    #[test]
    fn test_model_specific_fields() {
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, rmw(0x04, 0x0000, 0x0060));
        sensor.set_proximity_multi_pulse(MultiPulse::Eight).unwrap();
        assert!(sensor.set_proximity_gain(ProximityGain::SingleX8).is_err());
        assert!(sensor.set_ambient_high_dynamic_range(true).is_err());
        i2c.done();

        let mut expectations = rmw(0x03, 0x0000, 0x3000);
        expectations.extend(rmw(0x00, 0x0000, 0x0010));
        expectations.extend(rmw(0x04, 0x0000, 0x6000));
        let (mut sensor, mut i2c) = connect(Model::Vcnl4035, expectations);
        sensor.set_proximity_gain(ProximityGain::SingleX1).unwrap();
        sensor.set_ambient_high_dynamic_range(true).unwrap();
        sensor.set_sunlight_cancel_current(SunlightCancelCurrent::X8).unwrap();
        assert!(sensor.set_proximity_multi_pulse(MultiPulse::Two).is_err());
        i2c.done();
    }

    #[test]
    fn test_power_off_ambient_and_white() {
        let mut expectations = rmw(0x00, 0x0040, 0x0041);
        expectations.extend(rmw(0x00, 0x0200, 0x0300));
        let (mut sensor, mut i2c) = connect(Model::Vcnl4030, expectations);

        sensor.power_off_ambient().unwrap();
        sensor.power_off_white().unwrap();
        i2c.done();
    }

    #[test]
    fn test_enable_white_channel_clears_white_en() {
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, rmw(0x04, 0x8007, 0x0007));
        sensor.enable_white_channel().unwrap();
        i2c.done();
    }

    #[test]
    fn test_ambient_interrupt_switch() {
        let mut expectations = rmw(0x00, 0x0040, 0x0042);
        expectations.extend(rmw(0x00, 0x0042, 0x0040));
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, expectations);

        sensor.enable_ambient_interrupts().unwrap();
        sensor.disable_ambient_interrupts().unwrap();
        i2c.done();
    }

    #[test]
    fn test_proximity_mode_switches() {
        let mut expectations = rmw(0x04, 0x0718, 0x0708); // smart persistence off
        expectations.extend(rmw(0x04, 0x0700, 0x0708)); // active force on
        expectations.extend(rmw(0x04, 0x0718, 0x0710)); // active force off
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, expectations);

        sensor.disable_smart_persistence().unwrap();
        sensor.enable_active_force_mode().unwrap();
        sensor.disable_active_force_mode().unwrap();
        i2c.done();
    }

    #[test]
    fn test_sunlight_cancellation_sets_bit_zero() {
        let mut expectations = rmw(0x04, 0x0710, 0x0711);
        expectations.extend(rmw(0x04, 0x0711, 0x0710));
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, expectations);

        sensor.enable_sunlight_cancellation().unwrap();
        sensor.disable_sunlight_cancellation().unwrap();
        i2c.done();
    }

    #[test]
    fn test_vcnl4030_only_settings() {
        let mut expectations = rmw(0x04, 0x0012, 0x0092); // LED_I_LOW
        expectations.extend(rmw(0x03, 0x0800, 0x0C00)); // PS_NS
        expectations.extend(rmw(0x00, 0x0140, 0x0340)); // ALS_NS
        expectations.extend(rmw(0x04, 0x0700, 0x1700)); // PS_SP
        expectations.extend(rmw(0x04, 0x1700, 0x1F00)); // PS_SPO
        let (mut sensor, mut i2c) = connect(Model::Vcnl4030, expectations);

        sensor.set_led_low_current(true).unwrap();
        sensor.set_proximity_sensitivity(ProximitySensitivity::TwoStepX1).unwrap();
        sensor.set_ambient_sensitivity(AmbientSensitivity::X2).unwrap();
        sensor.set_sunlight_protection(SunlightProtection::X1_5).unwrap();
        sensor.set_sunlight_protect_output(SunlightProtectOutput::Full).unwrap();
        i2c.done();
    }

    #[test]
    fn test_vcnl4030_only_settings_unsupported_on_vcnl4040() {
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, vec![]);

        let unsupported = |operation: &'static str| -> DriverResult<(), ErrorKind> {
            Err(Error::UnsupportedOperation { operation, model: Model::Vcnl4040 })
        };
        assert_eq!(sensor.set_led_low_current(true), unsupported("set_led_low_current"));
        assert_eq!(
            sensor.set_proximity_sensitivity(ProximitySensitivity::TwoStepX4),
            unsupported("set_proximity_sensitivity")
        );
        assert_eq!(sensor.set_ambient_sensitivity(AmbientSensitivity::X1), unsupported("set_ambient_sensitivity"));
        assert_eq!(
            sensor.set_sunlight_protection(SunlightProtection::X1),
            unsupported("set_sunlight_protection")
        );
        assert_eq!(
            sensor.set_sunlight_protect_output(SunlightProtectOutput::Zero),
            unsupported("set_sunlight_protect_output")
        );
        assert_eq!(
            sensor.set_sunlight_cancel_current(SunlightCancelCurrent::X1),
            unsupported("set_sunlight_cancel_current")
        );
        assert_eq!(sensor.power_off_white(), unsupported("power_off_white"));
        i2c.done();
    }

    #[test]
    fn test_interrupt_flags_from_high_half() {
        let (mut sensor, mut i2c) = connect(Model::Vcnl4030, vec![read(0x0D, 0x12FF), read(0x0D, 0x2100)]);

        let flags = sensor.interrupt_flags().unwrap();
        assert_eq!(flags, InterruptFlags { close: true, away: false, light: true, dark: false });
        assert_eq!(sensor.is_dark(), Ok(true));
        i2c.done();
    }

    #[test]
    fn test_each_flag_query_reads_once() {
        let (mut sensor, mut i2c) = connect(
            Model::Vcnl4040,
            vec![read(0x0B, 0x0200), read(0x0B, 0x0100), read(0x0B, 0x1000), read(0x0B, 0x0000)],
        );
        assert_eq!(sensor.is_close(), Ok(true));
        assert_eq!(sensor.is_away(), Ok(true));
        assert_eq!(sensor.is_light(), Ok(true));
        assert_eq!(sensor.is_dark(), Ok(false));
        i2c.done();
    }

    #[test]
    fn test_reading_uses_model_data_registers() {
        let (mut sensor, mut i2c) = connect(
            Model::Vcnl4030,
            vec![read(0x08, 1200), read(0x0B, 300), read(0x0C, 450)],
        );
        assert_eq!(sensor.reading(), Ok(Reading { proximity: 1200, ambient: 300, white: 450 }));
        i2c.done();
    }

    #[test]
    fn test_proximity_channels() {
        let (mut sensor, mut i2c) = connect(Model::Vcnl4035, vec![read(0x09, 77)]);
        assert_eq!(sensor.proximity_channel(2), Ok(77));
        assert_eq!(sensor.proximity_channel(4), Err(Error::InvalidChannel(4)));
        assert_eq!(sensor.proximity_channel(0), Err(Error::InvalidChannel(0)));
        i2c.done();

        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, vec![]);
        assert!(matches!(sensor.proximity_channel(1), Err(Error::UnsupportedOperation { .. })));
        i2c.done();
    }

    #[test]
    fn test_init_vcnl4040() {
        let mut expectations = rmw(0x04, 0x0000, 0x0700); // LED 200 mA
        expectations.extend(rmw(0x03, 0x00C0, 0x0000)); // duty 1/40
        expectations.extend(rmw(0x03, 0x0000, 0x000E)); // 8T
        expectations.extend(rmw(0x03, 0x0000, 0x0800)); // 16 bit
        expectations.extend(rmw(0x04, 0x0000, 0x0010)); // smart persistence
        expectations.extend(rmw(0x03, 0x0001, 0x0000)); // proximity on
        expectations.extend(rmw(0x00, 0x0040, 0x0000)); // 80 ms
        expectations.extend(rmw(0x00, 0x0001, 0x0000)); // ambient on
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, expectations);

        sensor.init().unwrap();
        i2c.done();
    }

    #[test]
    fn test_init_vcnl4035_powers_white_channel() {
        let mut expectations = rmw(0x04, 0x0000, 0x0700);
        expectations.extend(rmw(0x03, 0x0000, 0x0000));
        expectations.extend(rmw(0x03, 0x0000, 0x000E));
        expectations.extend(rmw(0x03, 0x0000, 0x0800));
        expectations.extend(rmw(0x04, 0x0000, 0x0010));
        expectations.extend(rmw(0x03, 0x0000, 0x0000));
        expectations.extend(rmw(0x00, 0x01E0, 0x0100)); // 50 ms
        expectations.extend(rmw(0x00, 0x0101, 0x0100));
        expectations.extend(rmw(0x00, 0x0101, 0x0001)); // white on
        let (mut sensor, mut i2c) = connect(Model::Vcnl4035, expectations);

        sensor.init().unwrap();
        i2c.done();
    }

    #[test]
    fn test_init_stops_at_first_failure() {
        let mut expectations = rmw(0x04, 0x0000, 0x0700);
        expectations.push(read(0x03, 0).with_error(ErrorKind::Other));
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, expectations);

        assert_eq!(sensor.init(), Err(Error::Transport(ErrorKind::Other)));
        i2c.done();
    }

    #[test]
    fn test_failed_write_back_is_reported() {
        let mut expectations = vec![read(0x03, 0), read(0x03, 0)];
        expectations.push(write(0x03, 0x0001).with_error(ErrorKind::NoAcknowledge(
            embedded_hal::i2c::NoAcknowledgeSource::Address,
        )));
        let (mut sensor, mut i2c) = connect(Model::Vcnl4040, expectations);

        assert!(matches!(sensor.power_off_proximity(), Err(Error::Transport(ErrorKind::NoAcknowledge(_)))));
        i2c.done();
    }

    #[test]
    fn test_release_returns_bus() {
        let (sensor, _) = connect(Model::Vcnl4040, vec![]);
        let mut i2c = sensor.release();
        i2c.done();
    }
}
