//! Register map primitives shared by every supported model.
//!
//! The sensors expose 16-bit registers addressed by a one-byte command code.
//! Several configuration registers are only eight bits wide and share a
//! command code with a second one, so every configuration field is located by
//! a command code plus a [`ByteHalf`].

pub mod commands;
pub mod fields;

use thiserror::Error;

pub use commands::CommandCodes;
pub use fields::{InterruptFlagBits, RegisterFields};

/// One half of a 16-bit register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteHalf {
    /// Bits 7..0, transferred first on the bus.
    Low,
    /// Bits 15..8.
    High,
}

impl ByteHalf {
    /// Extracts this half from a register word.
    pub fn extract(self, word: u16) -> u8 {
        let [low, high] = word.to_le_bytes();
        match self {
            ByteHalf::Low => low,
            ByteHalf::High => high,
        }
    }

    /// Replaces this half of `word` with `byte`, keeping the other half.
    pub fn splice(self, word: u16, byte: u8) -> u16 {
        match self {
            ByteHalf::Low => (word & 0xFF00) | u16::from(byte),
            ByteHalf::High => (word & 0x00FF) | (u16::from(byte) << 8),
        }
    }
}

/// Configuration registers that occupy a single byte half.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRegister {
    AlsConf,
    AlsConf2,
    PsConf1,
    PsConf2,
    PsConf3,
    PsMs,
}

/// Physical position of a byte-wide register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub code: u8,
    pub half: ByteHalf,
}

impl Location {
    pub const fn low(code: u8) -> Self {
        Self { code, half: ByteHalf::Low }
    }

    pub const fn high(code: u8) -> Self {
        Self { code, half: ByteHalf::High }
    }
}

/// A (mask, value) pair: `mask` clears the slot, `value` is OR-ed in after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub mask: u8,
    pub value: u8,
}

impl Field {
    /// Applies the field to the current contents of a byte half.
    pub fn apply(self, current: u8) -> u8 {
        (current & self.mask) | self.value
    }
}

pub(crate) const fn bit(n: u8) -> u8 {
    1 << n
}

/// A two-state slot. `on` is the encoding that activates the feature, which
/// for shutdown bits is the cleared state.
#[derive(Debug, Clone, Copy)]
pub struct Switch {
    pub register: ByteRegister,
    pub mask: u8,
    pub on: u8,
    pub off: u8,
}

impl Switch {
    pub fn field(&self, on: bool) -> Field {
        Field {
            mask: self.mask,
            value: if on { self.on } else { self.off },
        }
    }
}

/// A slot holding one of `N` enumerated encodings. The index order matches
/// the discriminants of the settings enum backed by it.
#[derive(Debug, Clone, Copy)]
pub struct Choice<const N: usize> {
    pub register: ByteRegister,
    pub mask: u8,
    pub values: [u8; N],
}

impl<const N: usize> Choice<N> {
    pub fn field(&self, index: usize) -> Field {
        debug_assert!(index < N, "choice index {} outside {} encodings", index, N);
        Field {
            mask: self.mask,
            value: self.values[index.min(N - 1)],
        }
    }
}

/// A slot encoding a physical quantity in discrete steps, ascending by
/// setting.
#[derive(Debug, Clone, Copy)]
pub struct Ladder {
    pub register: ByteRegister,
    pub mask: u8,
    pub steps: &'static [(u16, u8)],
}

impl Ladder {
    /// Picks the smallest supported setting not below `requested`, clamping
    /// to the largest one when the request exceeds every step.
    pub fn select(&self, requested: u16) -> (u16, Field) {
        let (setting, value) = self
            .steps
            .iter()
            .find(|(setting, _)| *setting >= requested)
            .or_else(|| self.steps.last())
            .copied()
            .unwrap_or_default();
        (setting, Field { mask: self.mask, value })
    }

    /// Supported settings in ascending order.
    pub fn settings(&self) -> impl Iterator<Item = u16> + '_ {
        self.steps.iter().map(|(setting, _)| *setting)
    }
}

/// A named bit slot used to check a model's encoding table.
#[derive(Debug, Clone)]
pub struct Slot {
    pub name: &'static str,
    pub register: ByteRegister,
    pub mask: u8,
    pub values: Vec<u8>,
}

impl Slot {
    pub fn switch(name: &'static str, switch: &Switch) -> Self {
        Self {
            name,
            register: switch.register,
            mask: switch.mask,
            values: vec![switch.on, switch.off],
        }
    }

    pub fn choice<const N: usize>(name: &'static str, choice: &Choice<N>) -> Self {
        Self {
            name,
            register: choice.register,
            mask: choice.mask,
            values: choice.values.to_vec(),
        }
    }

    pub fn ladder(name: &'static str, ladder: &Ladder) -> Self {
        Self {
            name,
            register: ladder.register,
            mask: ladder.mask,
            values: ladder.steps.iter().map(|(_, value)| *value).collect(),
        }
    }

    fn bits(&self) -> u8 {
        !self.mask
    }
}

/// Inconsistencies detected in an encoding table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("slot '{name}' has no encodings")]
    Empty { name: &'static str },

    #[error("slot '{name}' encoding {value:#010b} sets bits outside its mask")]
    ValueOutsideSlot { name: &'static str, value: u8 },

    #[error("slot '{name}' never sets bits {missing:#010b} of its mask")]
    SlotNotCovered { name: &'static str, missing: u8 },

    #[error("slot '{name}' encodings are not distinct")]
    DuplicateValue { name: &'static str },

    #[error("slots '{first}' and '{second}' claim the same bits")]
    Overlap { first: &'static str, second: &'static str },
}

/// Checks that every slot's values lie inside its mask, that the values
/// together cover the whole slot, and that slots within one register never
/// claim the same bit.
pub fn verify_slots(slots: &[Slot]) -> Result<(), TableError> {
    for slot in slots {
        if slot.values.is_empty() {
            return Err(TableError::Empty { name: slot.name });
        }
        let mut covered = 0u8;
        for (i, &value) in slot.values.iter().enumerate() {
            if value & slot.mask != 0 {
                return Err(TableError::ValueOutsideSlot { name: slot.name, value });
            }
            if slot.values[..i].contains(&value) {
                return Err(TableError::DuplicateValue { name: slot.name });
            }
            covered |= value;
        }
        if covered != slot.bits() {
            return Err(TableError::SlotNotCovered {
                name: slot.name,
                missing: slot.bits() & !covered,
            });
        }
    }

    for (i, first) in slots.iter().enumerate() {
        for second in &slots[i + 1..] {
            if first.register == second.register && first.bits() & second.bits() != 0 {
                return Err(TableError::Overlap {
                    first: first.name,
                    second: second.name,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALS_IT: Ladder = Ladder {
        register: ByteRegister::AlsConf,
        mask: !(bit(7) | bit(6)),
        steps: &[(80, 0), (160, bit(6)), (320, bit(7)), (640, bit(7) | bit(6))],
    };

    #[test]
    fn test_byte_half_splice_keeps_other_half() {
        assert_eq!(ByteHalf::Low.splice(0x1234, 0xAB), 0x12AB);
        assert_eq!(ByteHalf::High.splice(0x1234, 0xAB), 0xAB34);
        assert_eq!(ByteHalf::Low.extract(0x1234), 0x34);
        assert_eq!(ByteHalf::High.extract(0x1234), 0x12);
    }

    #[test]
    fn test_ladder_rounds_up_to_next_step() {
        assert_eq!(ALS_IT.select(150).0, 160);
        assert_eq!(ALS_IT.select(161).0, 320);
        assert_eq!(ALS_IT.select(10).0, 80);
        assert_eq!(ALS_IT.select(0).0, 80);
    }

    #[test]
    fn test_ladder_exact_steps_select_themselves() {
        for setting in [80, 160, 320, 640] {
            assert_eq!(ALS_IT.select(setting).0, setting);
        }
    }

    #[test]
    fn test_ladder_clamps_above_range() {
        let (setting, field) = ALS_IT.select(700);
        assert_eq!(setting, 640);
        assert_eq!(field.value, 0b1100_0000);
        assert_eq!(field.mask, 0b0011_1111);
    }

    #[test]
    fn test_field_apply_touches_only_slot() {
        let (_, field) = ALS_IT.select(320);
        assert_eq!(field.apply(0b0111_1111), 0b1011_1111);
        assert_eq!(field.apply(0x00), 0x80);
    }

    #[test]
    fn test_choice_picks_encoding_by_index() {
        let choice = Choice { register: ByteRegister::PsConf2, mask: !(bit(1) | bit(0)), values: [0, bit(0), bit(1)] };
        assert_eq!(choice.field(2), Field { mask: 0b1111_1100, value: 0b10 });
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "choice index 3 outside 3 encodings")]
    fn test_choice_index_past_table_panics_in_debug() {
        let choice = Choice { register: ByteRegister::PsConf2, mask: !(bit(1) | bit(0)), values: [0, bit(0), bit(1)] };
        choice.field(3);
    }

    #[test]
    fn test_verify_rejects_value_outside_mask() {
        let slot = Slot {
            name: "broken",
            register: ByteRegister::PsConf1,
            mask: !bit(0),
            values: vec![0, bit(1)],
        };
        assert_eq!(
            verify_slots(&[slot]),
            Err(TableError::ValueOutsideSlot { name: "broken", value: 0b10 })
        );
    }

    #[test]
    fn test_verify_rejects_uncovered_bits() {
        let slot = Slot {
            name: "narrow",
            register: ByteRegister::PsConf1,
            mask: !(bit(1) | bit(0)),
            values: vec![0, bit(0)],
        };
        assert_eq!(
            verify_slots(&[slot]),
            Err(TableError::SlotNotCovered { name: "narrow", missing: 0b10 })
        );
    }

    #[test]
    fn test_verify_rejects_overlap_in_same_register() {
        let first = Slot {
            name: "first",
            register: ByteRegister::PsMs,
            mask: !(bit(6) | bit(5)),
            values: vec![0, bit(5), bit(6), bit(6) | bit(5)],
        };
        let second = Slot {
            name: "second",
            register: ByteRegister::PsMs,
            mask: !bit(6),
            values: vec![0, bit(6)],
        };
        let elsewhere = Slot { register: ByteRegister::PsConf3, ..second.clone() };

        assert_eq!(
            verify_slots(&[first.clone(), second]),
            Err(TableError::Overlap { first: "first", second: "second" })
        );
        assert_eq!(verify_slots(&[first, elsewhere]), Ok(()));
    }
}
