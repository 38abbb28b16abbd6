//! Command codes per model, taken from each datasheet's register map.

use super::{ByteRegister, Location};

/// Command-code table of one model.
///
/// Byte-wide registers carry their half; word registers are plain codes.
/// Registers a model does not have are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandCodes {
    pub als_conf: Location,
    pub als_conf2: Option<Location>,
    pub als_thdh: u8,
    pub als_thdl: u8,
    pub ps_conf1: Location,
    pub ps_conf2: Location,
    pub ps_conf3: Location,
    pub ps_ms: Location,
    pub ps_canc: u8,
    pub ps_thdl: u8,
    pub ps_thdh: u8,
    pub ps_data: u8,
    /// Individual proximity channels, 1 to 3.
    pub ps_data_channels: Option<[u8; 3]>,
    pub als_data: u8,
    pub white_data: u8,
    pub int_flag: Location,
    pub id: Location,
}

impl CommandCodes {
    /// Resolves a byte-wide register to its physical location.
    pub fn locate(&self, register: ByteRegister) -> Option<Location> {
        match register {
            ByteRegister::AlsConf => Some(self.als_conf),
            ByteRegister::AlsConf2 => self.als_conf2,
            ByteRegister::PsConf1 => Some(self.ps_conf1),
            ByteRegister::PsConf2 => Some(self.ps_conf2),
            ByteRegister::PsConf3 => Some(self.ps_conf3),
            ByteRegister::PsMs => Some(self.ps_ms),
        }
    }
}

pub static VCNL4040: CommandCodes = CommandCodes {
    als_conf: Location::low(0x00),
    als_conf2: None,
    als_thdh: 0x01,
    als_thdl: 0x02,
    ps_conf1: Location::low(0x03),
    ps_conf2: Location::high(0x03),
    ps_conf3: Location::low(0x04),
    ps_ms: Location::high(0x04),
    ps_canc: 0x05,
    ps_thdl: 0x06,
    ps_thdh: 0x07,
    ps_data: 0x08,
    ps_data_channels: None,
    als_data: 0x09,
    white_data: 0x0A,
    int_flag: Location::high(0x0B),
    id: Location::low(0x0C),
};

pub static VCNL4030: CommandCodes = CommandCodes {
    als_conf: Location::low(0x00),
    als_conf2: Some(Location::high(0x00)),
    als_thdh: 0x01,
    als_thdl: 0x02,
    ps_conf1: Location::low(0x03),
    ps_conf2: Location::high(0x03),
    ps_conf3: Location::low(0x04),
    ps_ms: Location::high(0x04),
    ps_canc: 0x05,
    ps_thdl: 0x06,
    ps_thdh: 0x07,
    ps_data: 0x08,
    ps_data_channels: None,
    als_data: 0x0B,
    white_data: 0x0C,
    int_flag: Location::high(0x0D),
    id: Location::low(0x0E),
};

pub static VCNL4035: CommandCodes = CommandCodes {
    als_conf: Location::low(0x00),
    als_conf2: Some(Location::high(0x00)),
    als_thdh: 0x01,
    als_thdl: 0x02,
    ps_conf1: Location::low(0x03),
    ps_conf2: Location::high(0x03),
    ps_conf3: Location::low(0x04),
    ps_ms: Location::high(0x04),
    ps_canc: 0x05,
    ps_thdl: 0x06,
    ps_thdh: 0x07,
    // PS_DATA aliases the first channel
    ps_data: 0x08,
    ps_data_channels: Some([0x08, 0x09, 0x0A]),
    als_data: 0x0B,
    white_data: 0x0C,
    int_flag: Location::high(0x0D),
    id: Location::low(0x0E),
};
