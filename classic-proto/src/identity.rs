//! Fixed identification and calibration blocks.

/// Identity block of a genuine Classic Controller.
pub const CLASSIC_IDENTITY: [u8; 6] = [0x00, 0x00, 0xA4, 0x20, 0x01, 0x01];

/// Device byte of the alternate identity announced for an N64 pad.
pub const ALT_ID_N64: u8 = 0x64;
/// Device byte of the alternate identity announced for a GameCube pad.
pub const ALT_ID_GAMECUBE: u8 = 0x47;
/// Device byte of the alternate identity announced for a SNES pad.
pub const ALT_ID_SNES: u8 = 0x10;
/// Device byte of the alternate identity announced for a NES pad.
pub const ALT_ID_NES: u8 = 0x08;
/// Device byte of the alternate identity announced for a DB9 digital pad.
pub const ALT_ID_GENERIC: u8 = 0x4D;

/// Build the alternate identity block for a native device byte.
///
/// Hosts that know about the adapter switch to this identity to receive the
/// controller's raw report instead of the translated one.
#[must_use]
pub const fn alternate_identity(device: u8) -> [u8; 6] {
    [0x00, 0x00, 0xA4, 0x20, 0x52, device]
}

/// Stick and trigger calibration: centre 0x80 with full range on every axis.
pub const CALIBRATION: [u8; 32] = [
    0xE0, 0x20, 0x80, 0xE0, 0x20, 0x80, 0xE0, 0x20, 0x80, 0xE0, 0x20, 0x80, 0x00, 0x00, 0x00, 0x00,
    0xE0, 0x20, 0x80, 0xE0, 0x20, 0x80, 0xE0, 0x20, 0x80, 0xE0, 0x20, 0x80, 0x00, 0x00, 0x00, 0x00,
];

/// First byte of the extension block that follows every report core.
pub const REPORT_SENTINEL: u8 = b'R';
