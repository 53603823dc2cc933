//! Native controller reports, one variant per supported family.

use core::ops::{BitOr, BitOrAssign};

use classic_proto::{
    alternate_identity, Stick, ALT_ID_GAMECUBE, ALT_ID_GENERIC, ALT_ID_N64, ALT_ID_NES,
    ALT_ID_SNES,
};

/// Common queries over the per-family button sets.
pub trait NativeButtons: Copy {
    /// Check if all of the given button(s) are pressed.
    fn contains(self, buttons: Self) -> bool;

    /// Check if exactly `buttons` are pressed, ignoring undefined bits.
    fn is_exactly(self, buttons: Self) -> bool;
}

macro_rules! native_buttons {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($repr:ty) {
            $( $(#[$bmeta:meta])* $button:ident = $bit:expr, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub struct $name(pub $repr);

        impl $name {
            $( $(#[$bmeta])* pub const $button: Self = Self($bit); )*

            /// No buttons pressed.
            pub const NONE: Self = Self(0);

            /// Every button the family defines.
            pub const ALL: Self = Self(0 $( | $bit )*);

            /// Check if all of the given button(s) are pressed.
            #[inline]
            #[must_use]
            pub const fn contains(self, buttons: Self) -> bool {
                (self.0 & buttons.0) == buttons.0
            }

            /// Check if exactly `buttons` are pressed, ignoring undefined bits.
            #[inline]
            #[must_use]
            pub const fn is_exactly(self, buttons: Self) -> bool {
                (self.0 & Self::ALL.0) == buttons.0
            }

            #[inline]
            #[must_use]
            pub const fn raw(self) -> $repr {
                self.0
            }
        }

        impl NativeButtons for $name {
            #[inline]
            fn contains(self, buttons: Self) -> bool {
                $name::contains(self, buttons)
            }

            #[inline]
            fn is_exactly(self, buttons: Self) -> bool {
                $name::is_exactly(self, buttons)
            }
        }

        impl BitOr for $name {
            type Output = Self;

            #[inline]
            fn bitor(self, rhs: Self) -> Self::Output {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            #[inline]
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }
    };
}

native_buttons! {
    /// SNES pad, in shift-register order (first byte low).
    pub struct SnesButtons(u16) {
        B = 0x0080,
        Y = 0x0040,
        SELECT = 0x0020,
        START = 0x0010,
        UP = 0x0008,
        DOWN = 0x0004,
        LEFT = 0x0002,
        RIGHT = 0x0001,
        A = 0x8000,
        X = 0x4000,
        L = 0x2000,
        R = 0x1000,
    }
}

native_buttons! {
    /// NES pad.
    pub struct NesButtons(u8) {
        A = 0x80,
        B = 0x40,
        SELECT = 0x20,
        START = 0x10,
        UP = 0x08,
        DOWN = 0x04,
        LEFT = 0x02,
        RIGHT = 0x01,
    }
}

native_buttons! {
    /// N64 pad, in the order the controller reports them.
    pub struct N64Buttons(u16) {
        A = 0x0001,
        B = 0x0002,
        Z = 0x0004,
        START = 0x0008,
        UP = 0x0010,
        DOWN = 0x0020,
        LEFT = 0x0040,
        RIGHT = 0x0080,
        L = 0x0400,
        R = 0x0800,
        C_UP = 0x1000,
        C_DOWN = 0x2000,
        C_LEFT = 0x4000,
        C_RIGHT = 0x8000,
    }
}

impl N64Buttons {
    /// All four C buttons.
    pub const C_ALL: Self = Self(0xF000);
}

native_buttons! {
    /// GameCube pad.
    pub struct GcButtons(u16) {
        START = 0x0008,
        Y = 0x0010,
        X = 0x0020,
        B = 0x0040,
        A = 0x0080,
        L = 0x0200,
        R = 0x0400,
        Z = 0x0800,
        UP = 0x1000,
        DOWN = 0x2000,
        RIGHT = 0x4000,
        LEFT = 0x8000,
    }
}

native_buttons! {
    /// DB9 digital pads (Genesis, Master System, Atari).
    pub struct GenericButtons(u16) {
        UP = 0x0001,
        DOWN = 0x0002,
        LEFT = 0x0004,
        RIGHT = 0x0008,
        A = 0x0010,
        B = 0x0020,
        C = 0x0040,
        START = 0x0080,
        X = 0x0100,
        Y = 0x0200,
        Z = 0x0400,
        MODE = 0x0800,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SnesReport {
    pub buttons: SnesButtons,
    pub raw: [u8; 2],
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NesReport {
    pub buttons: NesButtons,
    pub raw: [u8; 1],
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct N64Report {
    pub buttons: N64Buttons,
    pub stick: Stick,
    pub raw: [u8; 4],
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GcReport {
    pub buttons: GcButtons,
    pub stick: Stick,
    pub c_stick: Stick,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub raw: [u8; 8],
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GenericReport {
    pub buttons: GenericButtons,
    pub raw: [u8; 3],
}

/// Controller family, without the report payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Family {
    #[default]
    None,
    Snes,
    Nes,
    N64,
    GameCube,
    Generic,
}

impl Family {
    /// Two-character tag carried in every translated report.
    #[must_use]
    pub const fn controller_id(self) -> [u8; 2] {
        match self {
            Self::None => [0, 0],
            Self::Snes => *b"SF",
            Self::Nes => *b"FC",
            Self::N64 => *b"64",
            Self::GameCube => *b"GC",
            Self::Generic => *b"MD",
        }
    }

    /// Identity announced when the host asks for raw reports.
    #[must_use]
    pub const fn alternate_identity(self) -> Option<[u8; 6]> {
        let device = match self {
            Self::None => return None,
            Self::Snes => ALT_ID_SNES,
            Self::Nes => ALT_ID_NES,
            Self::N64 => ALT_ID_N64,
            Self::GameCube => ALT_ID_GAMECUBE,
            Self::Generic => ALT_ID_GENERIC,
        };
        Some(alternate_identity(device))
    }
}

/// One poll's worth of native controller state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NativeReport {
    #[default]
    None,
    Snes(SnesReport),
    Nes(NesReport),
    N64(N64Report),
    GameCube(GcReport),
    Generic(GenericReport),
}

impl NativeReport {
    #[must_use]
    pub const fn family(&self) -> Family {
        match self {
            Self::None => Family::None,
            Self::Snes(_) => Family::Snes,
            Self::Nes(_) => Family::Nes,
            Self::N64(_) => Family::N64,
            Self::GameCube(_) => Family::GameCube,
            Self::Generic(_) => Family::Generic,
        }
    }

    /// Native bytes as read from the controller.
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        match self {
            Self::None => &[],
            Self::Snes(r) => &r.raw,
            Self::Nes(r) => &r.raw,
            Self::N64(r) => &r.raw,
            Self::GameCube(r) => &r.raw,
            Self::Generic(r) => &r.raw,
        }
    }

    /// Decode the two bytes shifted out of a SNES/NES port.
    ///
    /// Bytes are active-high (a pressed button reads 1). A SNES pad always
    /// shifts out four released bits after R; a NES pad has nothing there
    /// and the idle line reads as pressed, which is how the two are told
    /// apart.
    #[must_use]
    pub const fn from_serial_pad(bytes: [u8; 2]) -> Self {
        let [l, h] = bytes;
        if (h & 0x0F) == 0x0F {
            Self::Nes(NesReport {
                buttons: NesButtons(l),
                raw: [l],
            })
        } else {
            Self::Snes(SnesReport {
                buttons: SnesButtons(l as u16 | (h as u16) << 8),
                raw: [l, h],
            })
        }
    }
}
