//! Logical Classic Controller record: sticks, triggers, buttons, identity.

use crate::buttons::ClassicButtons;
use crate::curve::{apply_curve, Curve, CURVE_CENTER};

/// Number of raw passthrough bytes carried after the identity tag.
pub const RAW_DATA_SIZE: usize = 8;

/// Analog stick with X/Y axes in native units (roughly ±100).
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stick {
    pub x: i8,
    pub y: i8,
}

impl Stick {
    #[must_use]
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    pub const NEUTRAL: Self = Self { x: 0, y: 0 };
}

/// How the left stick is reduced to the 6-bit wire resolution.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StickShaping {
    /// Straight scaling of a full-range signed byte.
    #[default]
    Linear,
    /// Through one of the response curves.
    Curve(Curve),
    /// Added to the centre code unshaped (calibration probing).
    Offset,
}

impl StickShaping {
    /// Reduce one left-stick axis to its 6-bit code.
    #[must_use]
    pub fn shape(self, value: i8) -> u8 {
        match self {
            Self::Linear => (centered_u8(value) >> 2) & 0x3F,
            Self::Curve(curve) => apply_curve(value, curve),
            Self::Offset => CURVE_CENTER.wrapping_add(value as u8) & 0x3F,
        }
    }
}

/// Map a signed axis onto the unsigned 8-bit range centred at 0x80.
#[inline]
#[must_use]
pub const fn centered_u8(value: i8) -> u8 {
    (value as u8) ^ 0x80
}

/// Complete Classic Controller snapshot, before wire packing.
///
/// Produced once per poll by the mapping engine and consumed by the
/// serializer. Buttons are active-high here.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClassicLogical {
    pub left_stick: Stick,
    pub right_stick: Stick,
    /// Shaping applied to `left_stick` when packed.
    pub shaping: StickShaping,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub buttons: ClassicButtons,
    /// Two-character tag naming the physical controller family.
    pub controller_id: [u8; 2],
    /// Native report bytes, zero padded.
    pub raw: [u8; RAW_DATA_SIZE],
}

impl ClassicLogical {
    /// Nothing pressed, sticks centred, no controller identity.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            left_stick: Stick::NEUTRAL,
            right_stick: Stick::NEUTRAL,
            shaping: StickShaping::Linear,
            left_trigger: 0,
            right_trigger: 0,
            buttons: ClassicButtons::NONE,
            controller_id: [0; 2],
            raw: [0; RAW_DATA_SIZE],
        }
    }

    /// Copy up to [`RAW_DATA_SIZE`] native bytes into the passthrough buffer.
    pub fn set_raw(&mut self, raw: &[u8]) {
        let len = raw.len().min(RAW_DATA_SIZE);
        self.raw = [0; RAW_DATA_SIZE];
        self.raw[..len].copy_from_slice(&raw[..len]);
    }

    /// Force the analog triggers to full travel when their digital bits are set.
    pub fn saturate_digital_triggers(&mut self) {
        if self.buttons.contains(ClassicButtons::TRIGGER_LEFT) {
            self.left_trigger = 0xFF;
        }
        if self.buttons.contains(ClassicButtons::TRIGGER_RIGHT) {
            self.right_trigger = 0xFF;
        }
    }
}
