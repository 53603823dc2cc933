//! The 256-byte register file shared between the bus responder and the poll loop.
//!
//! Every slot is an [`AtomicU8`] accessed with relaxed ordering. The two
//! contexts never hold a lock; a host read that races a publish may observe a
//! report that is partly old and partly new, which the host tolerates.

use classic_proto::{CALIBRATION, CLASSIC_IDENTITY};
use portable_atomic::{AtomicBool, AtomicU8, Ordering};

/// Start of the report data.
pub const DATA_ADDR: u8 = 0x00;
/// Number of report bytes whose read wakes the poll loop.
pub const DATA_CORE_LEN: u8 = 6;
/// Start of the calibration block.
pub const CALIBRATION_ADDR: u8 = 0x20;
/// Start of the 10-byte host challenge.
pub const CHALLENGE_ADDR: u8 = 0x40;
/// Start of the 6-byte host key.
pub const KEY_ADDR: u8 = 0x4A;
/// One past the end of the key area.
pub const KEY_AREA_END: u8 = 0x50;
/// Encryption control register.
pub const ENCRYPTION_ADDR: u8 = 0xF0;
/// Start of the 6-byte identity block.
pub const IDENTITY_ADDR: u8 = 0xFA;
/// Identity byte the host overwrites to choose a report layout.
pub const REPORT_MODE_ADDR: u8 = 0xFE;

/// Number of addressable slots.
pub const REGISTER_COUNT: usize = 256;

/// Lock-free register file.
///
/// Intended to live in a `static` and be borrowed by both contexts.
pub struct SharedRegisters {
    slots: [AtomicU8; REGISTER_COUNT],
    passthrough: AtomicBool,
}

impl SharedRegisters {
    /// All slots zero, passthrough off.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [const { AtomicU8::new(0) }; REGISTER_COUNT],
            passthrough: AtomicBool::new(false),
        }
    }

    #[inline]
    #[must_use]
    pub fn read(&self, addr: u8) -> u8 {
        self.slots[usize::from(addr)].load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write(&self, addr: u8, value: u8) {
        self.slots[usize::from(addr)].store(value, Ordering::Relaxed);
    }

    /// Copy `out.len()` bytes starting at `addr`, wrapping past 0xFF.
    pub fn read_block(&self, addr: u8, out: &mut [u8]) {
        let mut a = addr;
        for byte in out.iter_mut() {
            *byte = self.read(a);
            a = a.wrapping_add(1);
        }
    }

    /// Store `bytes` starting at `addr`, wrapping past 0xFF.
    pub fn write_block(&self, addr: u8, bytes: &[u8]) {
        let mut a = addr;
        for &byte in bytes {
            self.write(a, byte);
            a = a.wrapping_add(1);
        }
    }

    /// Publish a serialized report into the data range.
    pub fn publish(&self, report: &[u8]) {
        self.write_block(DATA_ADDR, report);
    }

    /// Current identity block.
    #[must_use]
    pub fn identity(&self) -> [u8; 6] {
        let mut id = [0; 6];
        self.read_block(IDENTITY_ADDR, &mut id);
        id
    }

    pub fn set_identity(&self, identity: &[u8; 6]) {
        self.write_block(IDENTITY_ADDR, identity);
    }

    /// Raw value of the report-mode register.
    #[must_use]
    pub fn report_mode_register(&self) -> u8 {
        self.read(REPORT_MODE_ADDR)
    }

    /// Whether the host has switched to the alternate identity.
    #[must_use]
    pub fn passthrough(&self) -> bool {
        self.passthrough.load(Ordering::Relaxed)
    }

    pub fn set_passthrough(&self, on: bool) {
        self.passthrough.store(on, Ordering::Relaxed);
    }

    /// Restore power-on contents: initial report, encryption off, Classic
    /// identity, calibration block.
    pub fn reset(&self, initial_report: &[u8]) {
        for slot in &self.slots {
            slot.store(0, Ordering::Relaxed);
        }
        self.publish(initial_report);
        self.write(ENCRYPTION_ADDR, 0);
        self.set_identity(&CLASSIC_IDENTITY);
        self.write_block(CALIBRATION_ADDR, &CALIBRATION);
        self.set_passthrough(false);
    }
}

impl Default for SharedRegisters {
    fn default() -> Self {
        Self::new()
    }
}
