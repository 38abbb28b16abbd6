//! Enumerated sensor settings. Variant order matches the encoding order of
//! the backing register slot.

use serde::Deserialize;

/// Consecutive proximity hits needed before an interrupt fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityPersistence {
    One,
    Two,
    Three,
    Four,
}

/// Consecutive ambient hits needed before an interrupt fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbientPersistence {
    One,
    Two,
    Four,
    Eight,
}

/// Proximity interrupt trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProximityInterrupt {
    Disabled,
    /// Reading rises above the high threshold.
    Close,
    /// Reading drops below the low threshold.
    Away,
    Both,
}

/// Proximity multi-pulse count per measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiPulse {
    One,
    Two,
    Four,
    Eight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityGain {
    TwoStep,
    SingleX8,
    SingleX1,
}

/// Sensitivity of the two-step proximity gain mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximitySensitivity {
    TwoStepX4,
    TwoStepX1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbientSensitivity {
    X1,
    X2,
}

/// Sunlight cancellation current multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SunlightCancelCurrent {
    X1,
    X2,
    X4,
    X8,
}

/// Sunlight protection capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SunlightProtection {
    X1,
    X1_5,
}

/// Proximity output while sunlight protection is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SunlightProtectOutput {
    Zero,
    Full,
}

impl TryFrom<u8> for ProximityPersistence {
    type Error = u8;

    fn try_from(hits: u8) -> Result<Self, Self::Error> {
        match hits {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            other => Err(other),
        }
    }
}

impl TryFrom<u8> for AmbientPersistence {
    type Error = u8;

    fn try_from(hits: u8) -> Result<Self, Self::Error> {
        match hits {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            8 => Ok(Self::Eight),
            other => Err(other),
        }
    }
}

/// Snapshot of the interrupt flag byte. Reading it clears the flags on the
/// chip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterruptFlags {
    pub close: bool,
    pub away: bool,
    pub light: bool,
    pub dark: bool,
}

/// One pass over the data registers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reading {
    pub proximity: u16,
    pub ambient: u16,
    pub white: u16,
}
