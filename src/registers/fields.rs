//! Register encodings per model.
//!
//! Each model keeps its own literal even where the values coincide: the
//! datasheets reuse field names at different bit positions and a shared
//! default would hide that.

use super::{bit, verify_slots, ByteRegister, Choice, Ladder, Slot, Switch, TableError};

/// Bits of the interrupt flag byte (upper half of INT_FLAG).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptFlagBits {
    pub als_low: u8,
    pub als_high: u8,
    pub close: u8,
    pub away: u8,
}

/// Register encoding table of one model. Fields the model lacks are `None`.
#[derive(Debug, Clone, Copy)]
pub struct RegisterFields {
    /// Ambient integration time in milliseconds.
    pub als_it: Ladder,
    pub als_hd: Option<Switch>,
    pub als_pers: Choice<4>,
    pub als_int_en: Switch,
    pub als_sd: Switch,
    pub als_ns: Option<Choice<2>>,
    pub white_sd: Option<Switch>,

    /// IR LED duty ratio, as the denominator of 1/n.
    pub ps_duty: Ladder,
    pub ps_pers: Choice<4>,
    /// Proximity integration time in multiples of T.
    pub ps_it: Ladder,
    pub ps_sd: Switch,

    pub ps_gain: Option<Choice<3>>,
    /// Proximity output width in bits.
    pub ps_hd: Ladder,
    pub ps_ns: Option<Choice<2>>,
    pub ps_int: Choice<4>,

    pub ps_mps: Option<Choice<4>>,
    pub led_i_low: Option<Switch>,
    pub ps_smart_pers: Switch,
    pub ps_af: Switch,
    pub ps_trig: Choice<1>,
    pub ps_sc_en: Switch,

    pub white_en: Option<Switch>,
    /// Proximity detection logic output mode.
    pub ps_logic: Switch,
    /// IR LED current in milliamps.
    pub led_i: Ladder,
    pub ps_sc_cur: Option<Choice<4>>,
    pub ps_sp: Option<Choice<2>>,
    pub ps_spo: Option<Choice<2>>,

    pub int_flags: InterruptFlagBits,
}

impl RegisterFields {
    /// Every writable slot of this table, including model-specific ones.
    pub fn slots(&self) -> Vec<Slot> {
        let mut slots = vec![
            Slot::ladder("ALS_IT", &self.als_it),
            Slot::choice("ALS_PERS", &self.als_pers),
            Slot::switch("ALS_INT_EN", &self.als_int_en),
            Slot::switch("ALS_SD", &self.als_sd),
            Slot::ladder("PS_DUTY", &self.ps_duty),
            Slot::choice("PS_PERS", &self.ps_pers),
            Slot::ladder("PS_IT", &self.ps_it),
            Slot::switch("PS_SD", &self.ps_sd),
            Slot::ladder("PS_HD", &self.ps_hd),
            Slot::choice("PS_INT", &self.ps_int),
            Slot::switch("PS_SMART_PERS", &self.ps_smart_pers),
            Slot::switch("PS_AF", &self.ps_af),
            Slot::choice("PS_TRIG", &self.ps_trig),
            Slot::switch("PS_SC_EN", &self.ps_sc_en),
            Slot::switch("PS_MS", &self.ps_logic),
            Slot::ladder("LED_I", &self.led_i),
        ];

        slots.extend(self.als_hd.as_ref().map(|s| Slot::switch("ALS_HD", s)));
        slots.extend(self.als_ns.as_ref().map(|c| Slot::choice("ALS_NS", c)));
        slots.extend(self.white_sd.as_ref().map(|s| Slot::switch("WHITE_SD", s)));
        slots.extend(self.ps_gain.as_ref().map(|c| Slot::choice("PS_GAIN", c)));
        slots.extend(self.ps_ns.as_ref().map(|c| Slot::choice("PS_NS", c)));
        slots.extend(self.ps_mps.as_ref().map(|c| Slot::choice("PS_MPS", c)));
        slots.extend(self.led_i_low.as_ref().map(|s| Slot::switch("LED_I_LOW", s)));
        slots.extend(self.white_en.as_ref().map(|s| Slot::switch("WHITE_EN", s)));
        slots.extend(self.ps_sc_cur.as_ref().map(|c| Slot::choice("PS_SC_CUR", c)));
        slots.extend(self.ps_sp.as_ref().map(|c| Slot::choice("PS_SP", c)));
        slots.extend(self.ps_spo.as_ref().map(|c| Slot::choice("PS_SPO", c)));
        slots
    }

    /// Checks mask/value consistency of the whole table.
    pub fn verify(&self) -> Result<(), TableError> {
        verify_slots(&self.slots())
    }
}

pub static VCNL4040: RegisterFields = RegisterFields {
    als_it: Ladder {
        register: ByteRegister::AlsConf,
        mask: !(bit(7) | bit(6)),
        steps: &[(80, 0), (160, bit(6)), (320, bit(7)), (640, bit(7) | bit(6))],
    },
    als_hd: None,
    als_pers: Choice {
        register: ByteRegister::AlsConf,
        mask: !(bit(3) | bit(2)),
        values: [0, bit(2), bit(3), bit(3) | bit(2)],
    },
    als_int_en: Switch { register: ByteRegister::AlsConf, mask: !bit(1), on: bit(1), off: 0 },
    als_sd: Switch { register: ByteRegister::AlsConf, mask: !bit(0), on: 0, off: bit(0) },
    als_ns: None,
    white_sd: None,

    ps_duty: Ladder {
        register: ByteRegister::PsConf1,
        mask: !(bit(7) | bit(6)),
        steps: &[(40, 0), (80, bit(6)), (160, bit(7)), (320, bit(7) | bit(6))],
    },
    ps_pers: Choice {
        register: ByteRegister::PsConf1,
        mask: !(bit(5) | bit(4)),
        values: [0, bit(4), bit(5), bit(5) | bit(4)],
    },
    ps_it: Ladder {
        register: ByteRegister::PsConf1,
        mask: !(bit(3) | bit(2) | bit(1)),
        steps: &[
            (1, 0),
            (2, bit(2)),
            (3, bit(3)),
            (4, bit(3) | bit(2)),
            (8, bit(3) | bit(2) | bit(1)),
        ],
    },
    ps_sd: Switch { register: ByteRegister::PsConf1, mask: !bit(0), on: 0, off: bit(0) },

    ps_gain: None,
    ps_hd: Ladder {
        register: ByteRegister::PsConf2,
        mask: !bit(3),
        steps: &[(12, 0), (16, bit(3))],
    },
    ps_ns: None,
    ps_int: Choice {
        register: ByteRegister::PsConf2,
        mask: !(bit(1) | bit(0)),
        values: [0, bit(0), bit(1), bit(1) | bit(0)],
    },

    ps_mps: Some(Choice {
        register: ByteRegister::PsConf3,
        mask: !(bit(6) | bit(5)),
        values: [0, bit(5), bit(6), bit(6) | bit(5)],
    }),
    led_i_low: None,
    ps_smart_pers: Switch { register: ByteRegister::PsConf3, mask: !bit(4), on: bit(4), off: 0 },
    ps_af: Switch { register: ByteRegister::PsConf3, mask: !bit(3), on: bit(3), off: 0 },
    ps_trig: Choice { register: ByteRegister::PsConf3, mask: !bit(2), values: [bit(2)] },
    ps_sc_en: Switch { register: ByteRegister::PsConf3, mask: !bit(0), on: bit(0), off: 0 },

    // WHITE_EN is active low
    white_en: Some(Switch { register: ByteRegister::PsMs, mask: !bit(7), on: 0, off: bit(7) }),
    ps_logic: Switch { register: ByteRegister::PsMs, mask: !bit(6), on: bit(6), off: 0 },
    led_i: Ladder {
        register: ByteRegister::PsMs,
        mask: !(bit(2) | bit(1) | bit(0)),
        steps: &[
            (50, 0),
            (75, bit(0)),
            (100, bit(1)),
            (120, bit(1) | bit(0)),
            (140, bit(2)),
            (160, bit(2) | bit(0)),
            (180, bit(2) | bit(1)),
            (200, bit(2) | bit(1) | bit(0)),
        ],
    },
    ps_sc_cur: None,
    ps_sp: None,
    ps_spo: None,

    int_flags: InterruptFlagBits { als_low: bit(5), als_high: bit(4), close: bit(1), away: bit(0) },
};

pub static VCNL4030: RegisterFields = RegisterFields {
    als_it: Ladder {
        register: ByteRegister::AlsConf,
        mask: !(bit(7) | bit(6) | bit(5)),
        steps: &[
            (50, 0),
            (100, bit(5)),
            (200, bit(6)),
            (400, bit(6) | bit(5)),
            (800, bit(7)),
        ],
    },
    als_hd: Some(Switch { register: ByteRegister::AlsConf, mask: !bit(4), on: bit(4), off: 0 }),
    als_pers: Choice {
        register: ByteRegister::AlsConf,
        mask: !(bit(3) | bit(2)),
        values: [0, bit(2), bit(3), bit(3) | bit(2)],
    },
    als_int_en: Switch { register: ByteRegister::AlsConf, mask: !bit(1), on: bit(1), off: 0 },
    als_sd: Switch { register: ByteRegister::AlsConf, mask: !bit(0), on: 0, off: bit(0) },
    als_ns: Some(Choice { register: ByteRegister::AlsConf2, mask: !bit(1), values: [0, bit(1)] }),
    white_sd: Some(Switch { register: ByteRegister::AlsConf2, mask: !bit(0), on: 0, off: bit(0) }),

    ps_duty: Ladder {
        register: ByteRegister::PsConf1,
        mask: !(bit(7) | bit(6)),
        steps: &[(40, 0), (80, bit(6)), (160, bit(7)), (320, bit(7) | bit(6))],
    },
    ps_pers: Choice {
        register: ByteRegister::PsConf1,
        mask: !(bit(5) | bit(4)),
        values: [0, bit(4), bit(5), bit(5) | bit(4)],
    },
    ps_it: Ladder {
        register: ByteRegister::PsConf1,
        mask: !(bit(3) | bit(2) | bit(1)),
        steps: &[
            (1, 0),
            (2, bit(2)),
            (3, bit(3)),
            (4, bit(3) | bit(2)),
            (8, bit(3) | bit(2) | bit(1)),
        ],
    },
    ps_sd: Switch { register: ByteRegister::PsConf1, mask: !bit(0), on: 0, off: bit(0) },

    ps_gain: Some(Choice {
        register: ByteRegister::PsConf2,
        mask: !(bit(5) | bit(4)),
        values: [0, bit(4), bit(5) | bit(4)],
    }),
    ps_hd: Ladder {
        register: ByteRegister::PsConf2,
        mask: !bit(3),
        steps: &[(12, 0), (16, bit(3))],
    },
    ps_ns: Some(Choice { register: ByteRegister::PsConf2, mask: !bit(2), values: [0, bit(2)] }),
    ps_int: Choice {
        register: ByteRegister::PsConf2,
        mask: !(bit(1) | bit(0)),
        values: [0, bit(0), bit(1), bit(1) | bit(0)],
    },

    ps_mps: None,
    led_i_low: Some(Switch { register: ByteRegister::PsConf3, mask: !bit(7), on: bit(7), off: 0 }),
    ps_smart_pers: Switch { register: ByteRegister::PsConf3, mask: !bit(4), on: bit(4), off: 0 },
    ps_af: Switch { register: ByteRegister::PsConf3, mask: !bit(3), on: bit(3), off: 0 },
    ps_trig: Choice { register: ByteRegister::PsConf3, mask: !bit(2), values: [bit(2)] },
    ps_sc_en: Switch { register: ByteRegister::PsConf3, mask: !bit(0), on: bit(0), off: 0 },

    white_en: None,
    // logic output mode lives in PS_CONF3 on this part
    ps_logic: Switch { register: ByteRegister::PsConf3, mask: !bit(1), on: bit(1), off: 0 },
    led_i: Ladder {
        register: ByteRegister::PsMs,
        mask: !(bit(2) | bit(1) | bit(0)),
        steps: &[
            (50, 0),
            (75, bit(0)),
            (100, bit(1)),
            (120, bit(1) | bit(0)),
            (140, bit(2)),
            (160, bit(2) | bit(0)),
            (180, bit(2) | bit(1)),
            (200, bit(2) | bit(1) | bit(0)),
        ],
    },
    ps_sc_cur: Some(Choice {
        register: ByteRegister::PsMs,
        mask: !(bit(6) | bit(5)),
        values: [0, bit(5), bit(6), bit(6) | bit(5)],
    }),
    ps_sp: Some(Choice { register: ByteRegister::PsMs, mask: !bit(4), values: [0, bit(4)] }),
    ps_spo: Some(Choice { register: ByteRegister::PsMs, mask: !bit(3), values: [0, bit(3)] }),

    int_flags: InterruptFlagBits { als_low: bit(5), als_high: bit(4), close: bit(1), away: bit(0) },
};

pub static VCNL4035: RegisterFields = RegisterFields {
    als_it: Ladder {
        register: ByteRegister::AlsConf,
        mask: !(bit(7) | bit(6) | bit(5)),
        steps: &[
            (50, 0),
            (100, bit(5)),
            (200, bit(6)),
            (400, bit(6) | bit(5)),
            (800, bit(7)),
        ],
    },
    als_hd: Some(Switch { register: ByteRegister::AlsConf, mask: !bit(4), on: bit(4), off: 0 }),
    als_pers: Choice {
        register: ByteRegister::AlsConf,
        mask: !(bit(3) | bit(2)),
        values: [0, bit(2), bit(3), bit(3) | bit(2)],
    },
    als_int_en: Switch { register: ByteRegister::AlsConf, mask: !bit(1), on: bit(1), off: 0 },
    als_sd: Switch { register: ByteRegister::AlsConf, mask: !bit(0), on: 0, off: bit(0) },
    als_ns: Some(Choice { register: ByteRegister::AlsConf2, mask: !bit(1), values: [0, bit(1)] }),
    white_sd: Some(Switch { register: ByteRegister::AlsConf2, mask: !bit(0), on: 0, off: bit(0) }),

    ps_duty: Ladder {
        register: ByteRegister::PsConf1,
        mask: !(bit(7) | bit(6)),
        steps: &[(40, 0), (80, bit(6)), (160, bit(7)), (320, bit(7) | bit(6))],
    },
    ps_pers: Choice {
        register: ByteRegister::PsConf1,
        mask: !(bit(5) | bit(4)),
        values: [0, bit(4), bit(5), bit(5) | bit(4)],
    },
    ps_it: Ladder {
        register: ByteRegister::PsConf1,
        mask: !(bit(3) | bit(2) | bit(1)),
        steps: &[
            (1, 0),
            (2, bit(2)),
            (3, bit(3)),
            (4, bit(3) | bit(2)),
            (8, bit(3) | bit(2) | bit(1)),
        ],
    },
    ps_sd: Switch { register: ByteRegister::PsConf1, mask: !bit(0), on: 0, off: bit(0) },

    ps_gain: Some(Choice {
        register: ByteRegister::PsConf2,
        mask: !(bit(5) | bit(4)),
        values: [0, bit(4), bit(5) | bit(4)],
    }),
    ps_hd: Ladder {
        register: ByteRegister::PsConf2,
        mask: !bit(3),
        steps: &[(12, 0), (16, bit(3))],
    },
    ps_ns: Some(Choice { register: ByteRegister::PsConf2, mask: !bit(2), values: [0, bit(2)] }),
    ps_int: Choice {
        register: ByteRegister::PsConf2,
        mask: !(bit(1) | bit(0)),
        values: [0, bit(0), bit(1), bit(1) | bit(0)],
    },

    ps_mps: None,
    led_i_low: Some(Switch { register: ByteRegister::PsConf3, mask: !bit(7), on: bit(7), off: 0 }),
    ps_smart_pers: Switch { register: ByteRegister::PsConf3, mask: !bit(4), on: bit(4), off: 0 },
    ps_af: Switch { register: ByteRegister::PsConf3, mask: !bit(3), on: bit(3), off: 0 },
    ps_trig: Choice { register: ByteRegister::PsConf3, mask: !bit(2), values: [bit(2)] },
    ps_sc_en: Switch { register: ByteRegister::PsConf3, mask: !bit(0), on: bit(0), off: 0 },

    white_en: None,
    ps_logic: Switch { register: ByteRegister::PsConf3, mask: !bit(1), on: bit(1), off: 0 },
    led_i: Ladder {
        register: ByteRegister::PsMs,
        mask: !(bit(2) | bit(1) | bit(0)),
        steps: &[
            (50, 0),
            (75, bit(0)),
            (100, bit(1)),
            (120, bit(1) | bit(0)),
            (140, bit(2)),
            (160, bit(2) | bit(0)),
            (180, bit(2) | bit(1)),
            (200, bit(2) | bit(1) | bit(0)),
        ],
    },
    ps_sc_cur: Some(Choice {
        register: ByteRegister::PsMs,
        mask: !(bit(6) | bit(5)),
        values: [0, bit(5), bit(6), bit(6) | bit(5)],
    }),
    ps_sp: Some(Choice { register: ByteRegister::PsMs, mask: !bit(4), values: [0, bit(4)] }),
    ps_spo: Some(Choice { register: ByteRegister::PsMs, mask: !bit(3), values: [0, bit(3)] }),

    int_flags: InterruptFlagBits { als_low: bit(5), als_high: bit(4), close: bit(1), away: bit(0) },
};
