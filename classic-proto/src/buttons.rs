//! Classic Controller button bitfield.

use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// Classic Controller button state, active-high.
///
/// Bit positions follow the controller's own report layout so that the
/// serializer only has to complement the two bytes. The wire format is
/// active-low; that inversion happens in [`crate::serialize`], never here.
///
/// # Example
///
/// ```
/// use classic_proto::ClassicButtons;
///
/// let buttons = ClassicButtons::A | ClassicButtons::ZR;
/// assert!(buttons.contains(ClassicButtons::A));
/// assert!(!buttons.contains(ClassicButtons::B));
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClassicButtons(pub u16);

impl ClassicButtons {
    pub const DPAD_RIGHT: Self = Self(0x8000);
    pub const DPAD_DOWN: Self = Self(0x4000);
    pub const TRIGGER_LEFT: Self = Self(0x2000);
    pub const MINUS: Self = Self(0x1000);
    pub const HOME: Self = Self(0x0800);
    pub const PLUS: Self = Self(0x0400);
    pub const TRIGGER_RIGHT: Self = Self(0x0200);
    /// Reads back as 1 on real hardware; never set by the mapping.
    pub const RESERVED: Self = Self(0x0100);
    pub const ZL: Self = Self(0x0080);
    pub const B: Self = Self(0x0040);
    pub const Y: Self = Self(0x0020);
    pub const A: Self = Self(0x0010);
    pub const X: Self = Self(0x0008);
    pub const ZR: Self = Self(0x0004);
    pub const DPAD_LEFT: Self = Self(0x0002);
    pub const DPAD_UP: Self = Self(0x0001);

    /// No buttons pressed.
    pub const NONE: Self = Self(0);

    /// Check if all of the given button(s) are pressed.
    #[inline]
    #[must_use]
    pub const fn contains(self, button: ClassicButtons) -> bool {
        (self.0 & button.0) == button.0
    }

    /// Check if any of the given button(s) is pressed.
    #[inline]
    #[must_use]
    pub const fn intersects(self, buttons: ClassicButtons) -> bool {
        (self.0 & buttons.0) != 0
    }

    /// Set or clear button(s).
    #[inline]
    pub fn set(&mut self, button: ClassicButtons, pressed: bool) {
        if pressed {
            self.0 |= button.0;
        } else {
            self.0 &= !button.0;
        }
    }

    /// Union of two masks, usable in constant tables.
    #[inline]
    #[must_use]
    pub const fn union(self, other: ClassicButtons) -> Self {
        Self(self.0 | other.0)
    }

    /// Get the raw u16 value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// High byte of the mask, as it appears (complemented) in report byte 4.
    #[inline]
    #[must_use]
    pub const fn high(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Low byte of the mask, as it appears (complemented) in report byte 5.
    #[inline]
    #[must_use]
    pub const fn low(self) -> u8 {
        self.0 as u8
    }

    /// Check if no buttons are pressed.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ClassicButtons {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ClassicButtons {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ClassicButtons {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for ClassicButtons {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for ClassicButtons {
    type Output = Self;

    #[inline]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_bitwise_or() {
        let buttons = ClassicButtons::A | ClassicButtons::B;
        assert!(buttons.contains(ClassicButtons::A));
        assert!(buttons.contains(ClassicButtons::B));
        assert!(!buttons.contains(ClassicButtons::X));
    }

    #[test]
    fn test_buttons_set_clear() {
        let mut buttons = ClassicButtons::NONE;
        buttons.set(ClassicButtons::HOME, true);
        assert!(buttons.contains(ClassicButtons::HOME));
        buttons.set(ClassicButtons::HOME, false);
        assert!(buttons.is_empty());
    }

    #[test]
    fn test_high_low_split() {
        let buttons = ClassicButtons::DPAD_RIGHT | ClassicButtons::DPAD_UP;
        assert_eq!(buttons.high(), 0x80);
        assert_eq!(buttons.low(), 0x01);
    }

    #[test]
    fn test_no_overlapping_bits() {
        let all = [
            ClassicButtons::DPAD_RIGHT,
            ClassicButtons::DPAD_DOWN,
            ClassicButtons::TRIGGER_LEFT,
            ClassicButtons::MINUS,
            ClassicButtons::HOME,
            ClassicButtons::PLUS,
            ClassicButtons::TRIGGER_RIGHT,
            ClassicButtons::RESERVED,
            ClassicButtons::ZL,
            ClassicButtons::B,
            ClassicButtons::Y,
            ClassicButtons::A,
            ClassicButtons::X,
            ClassicButtons::ZR,
            ClassicButtons::DPAD_LEFT,
            ClassicButtons::DPAD_UP,
        ];
        let combined = all.iter().fold(ClassicButtons::NONE, |acc, &b| acc | b);
        assert_eq!(combined.raw(), 0xFFFF);
    }
}
