//! Model selection: maps a chip variant to its register tables, identity
//! byte and bus addresses.

use std::fmt;
use std::str::FromStr;

use crate::errors::UnknownModel;
use crate::registers::{commands, fields, CommandCodes, RegisterFields};

/// Fixed 7-bit bus addresses. Parts ending in X01/X02/X03 are pin-strapped
/// package options of the same die.
pub mod address {
    pub const VCNL4040: u8 = 0x60;

    pub const VCNL4030X00: u8 = 0x60;
    pub const VCNL4030X01: u8 = 0x51;
    pub const VCNL4030X02: u8 = 0x40;
    pub const VCNL4030X03: u8 = 0x41;

    pub const VCNL4035X00: u8 = 0x60;
    pub const VCNL4035X01: u8 = 0x51;
    pub const VCNL4035X02: u8 = 0x40;
    pub const VCNL4035X03: u8 = 0x41;
}

/// Supported chip variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Model {
    Vcnl4040,
    Vcnl4030,
    Vcnl4035,
}

/// Hardware features only some models have. Operations backed by one of
/// these fail with `UnsupportedOperation` on models lacking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// White channel power control (WHITE_SD in ALS_CONF2)
    WhiteShutdown,
    /// White measurement enable (WHITE_EN in PS_MS)
    WhiteEnable,
    AmbientHighDynamicRange,
    AmbientSensitivity,
    ProximityGain,
    ProximitySensitivity,
    MultiPulse,
    LedLowCurrent,
    SunlightCancelCurrent,
    /// PS_SP and PS_SPO
    SunlightProtection,
    /// Separate data registers for three proximity channels
    ProximityChannels,
}

impl Feature {
    pub const ALL: [Feature; 11] = [
        Feature::WhiteShutdown,
        Feature::WhiteEnable,
        Feature::AmbientHighDynamicRange,
        Feature::AmbientSensitivity,
        Feature::ProximityGain,
        Feature::ProximitySensitivity,
        Feature::MultiPulse,
        Feature::LedLowCurrent,
        Feature::SunlightCancelCurrent,
        Feature::SunlightProtection,
        Feature::ProximityChannels,
    ];
}

impl Model {
    pub const ALL: [Model; 3] = [Model::Vcnl4040, Model::Vcnl4030, Model::Vcnl4035];

    pub fn part_number(self) -> u16 {
        match self {
            Model::Vcnl4040 => 4040,
            Model::Vcnl4030 => 4030,
            Model::Vcnl4035 => 4035,
        }
    }

    /// Expected low byte of the ID register.
    pub fn identity(self) -> u8 {
        match self {
            Model::Vcnl4040 => 0x86,
            Model::Vcnl4030 => 0x80,
            Model::Vcnl4035 => 0x80,
        }
    }

    /// Addresses the model ships at, primary option first.
    pub fn addresses(self) -> &'static [u8] {
        match self {
            Model::Vcnl4040 => &[address::VCNL4040],
            Model::Vcnl4030 => &[
                address::VCNL4030X00,
                address::VCNL4030X01,
                address::VCNL4030X02,
                address::VCNL4030X03,
            ],
            Model::Vcnl4035 => &[
                address::VCNL4035X00,
                address::VCNL4035X01,
                address::VCNL4035X02,
                address::VCNL4035X03,
            ],
        }
    }

    pub fn default_address(self) -> u8 {
        self.addresses()[0]
    }

    /// Capability table: the single place that decides which model has
    /// which optional feature.
    pub fn supports(self, feature: Feature) -> bool {
        use Feature::*;
        match self {
            Model::Vcnl4040 => matches!(feature, WhiteEnable | MultiPulse),
            Model::Vcnl4030 => !matches!(feature, WhiteEnable | MultiPulse | ProximityChannels),
            Model::Vcnl4035 => !matches!(feature, WhiteEnable | MultiPulse),
        }
    }

    /// Whether the white channel has its own power control (WHITE_SD).
    pub fn supports_white_channel(self) -> bool {
        self.supports(Feature::WhiteShutdown)
    }

    pub fn supports_ambient_high_dynamic_range(self) -> bool {
        self.supports(Feature::AmbientHighDynamicRange)
    }

    /// Number of proximity data channels.
    pub fn proximity_channels(self) -> u8 {
        if self.supports(Feature::ProximityChannels) {
            3
        } else {
            1
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VCNL{}", self.part_number())
    }
}

impl TryFrom<u16> for Model {
    type Error = UnknownModel;

    fn try_from(part_number: u16) -> Result<Self, Self::Error> {
        Model::ALL
            .into_iter()
            .find(|m| m.part_number() == part_number)
            .ok_or_else(|| UnknownModel(part_number.to_string()))
    }
}

impl FromStr for Model {
    type Err = UnknownModel;

    /// Accepts `4040`, `vcnl4040` or `VCNL4040`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        let digits = lower.strip_prefix("vcnl").unwrap_or(&lower);
        digits
            .parse::<u16>()
            .ok()
            .and_then(|n| Model::try_from(n).ok())
            .ok_or_else(|| UnknownModel(trimmed.to_string()))
    }
}

/// Everything the driver needs to know about one model.
#[derive(Debug, Clone, Copy)]
pub struct Profile {
    pub model: Model,
    pub commands: &'static CommandCodes,
    pub fields: &'static RegisterFields,
    pub identity: u8,
}

impl Profile {
    /// Whether the tables carry the registers and fields behind `feature`.
    pub fn provides(&self, feature: Feature) -> bool {
        let fields = self.fields;
        match feature {
            Feature::WhiteShutdown => fields.white_sd.is_some() && self.commands.als_conf2.is_some(),
            Feature::WhiteEnable => fields.white_en.is_some(),
            Feature::AmbientHighDynamicRange => fields.als_hd.is_some(),
            Feature::AmbientSensitivity => fields.als_ns.is_some() && self.commands.als_conf2.is_some(),
            Feature::ProximityGain => fields.ps_gain.is_some(),
            Feature::ProximitySensitivity => fields.ps_ns.is_some(),
            Feature::MultiPulse => fields.ps_mps.is_some(),
            Feature::LedLowCurrent => fields.led_i_low.is_some(),
            Feature::SunlightCancelCurrent => fields.ps_sc_cur.is_some(),
            Feature::SunlightProtection => fields.ps_sp.is_some() && fields.ps_spo.is_some(),
            Feature::ProximityChannels => self.commands.ps_data_channels.is_some(),
        }
    }

    /// True when the capability table and the register tables agree on every
    /// feature.
    pub fn is_consistent(&self) -> bool {
        Feature::ALL
            .into_iter()
            .all(|feature| self.model.supports(feature) == self.provides(feature))
    }
}

/// Selects the command-code and encoding tables for `model`.
pub fn resolve(model: Model) -> Profile {
    let (commands, fields) = match model {
        Model::Vcnl4040 => (&commands::VCNL4040, &fields::VCNL4040),
        Model::Vcnl4030 => (&commands::VCNL4030, &fields::VCNL4030),
        Model::Vcnl4035 => (&commands::VCNL4035, &fields::VCNL4035),
    };
    debug_assert!(fields.verify().is_ok(), "{} encoding table is inconsistent", model);

    let profile = Profile {
        model,
        commands,
        fields,
        identity: model.identity(),
    };
    debug_assert!(profile.is_consistent(), "{} capability table disagrees with its registers", model);
    profile
}

/// Resolves a model from its part number.
pub fn resolve_part_number(part_number: u16) -> Result<Profile, UnknownModel> {
    Model::try_from(part_number).map(resolve)
}
