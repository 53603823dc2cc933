//! Byte-level bus responder emulating the extension's register interface.
//!
//! The host addresses the extension at 7-bit address [`EXTENSION_ADDRESS`].
//! A write transaction carries a register pointer followed by data bytes;
//! a read transaction returns bytes from the current pointer onwards. The
//! pointer advances after every byte and wraps at 0xFF.
//!
//! [`ExtensionSlave`] is owned by the bus context. It shares nothing with the
//! poll loop except the [`SharedRegisters`] it borrows.

use crate::crypto::{KeyMaterial, Keystream, CHALLENGE_LEN, KEY_LEN};
use crate::tables::CipherTables;
use crate::registers::{
    SharedRegisters, CHALLENGE_ADDR, DATA_ADDR, DATA_CORE_LEN, ENCRYPTION_ADDR, KEY_AREA_END,
};
use classic_proto::CLASSIC_IDENTITY;

/// 7-bit bus address of every Wii extension.
pub const EXTENSION_ADDRESS: u8 = 0x52;

/// Value returned for reads outside a read transaction.
pub const IDLE_READ: u8 = 0xFF;

const DISABLE_CODES: [u8; 2] = [0x55, 0xAA];
const ALT_ID_TRIGGER: u8 = 0x64;
const KEY_AREA_FULL: u16 = 0xFFFF;

/// Notification produced while handling bus traffic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusEvent {
    /// The host started reading the report core; time to sample the controller.
    ReportSampled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Phase {
    Idle,
    AwaitPointer,
    Writing,
    Reading,
}

/// Extension bus responder.
pub struct ExtensionSlave<'a> {
    regs: &'a SharedRegisters,
    phase: Phase,
    pointer: u8,
    tables: Option<&'a CipherTables>,
    cipher: Option<Keystream>,
    /// One bit per byte of `0x40..0x50` written so far.
    key_written: u16,
    /// The current write transaction stored at least one data byte.
    stored: bool,
    default_identity: [u8; 6],
    alternate_identity: Option<[u8; 6]>,
}

impl<'a> ExtensionSlave<'a> {
    /// Take over `regs` and load its power-on contents.
    pub fn new(regs: &'a SharedRegisters, initial_report: &[u8]) -> Self {
        regs.reset(initial_report);
        Self {
            regs,
            phase: Phase::Idle,
            pointer: 0,
            tables: None,
            cipher: None,
            key_written: 0,
            stored: false,
            default_identity: CLASSIC_IDENTITY,
            alternate_identity: None,
        }
    }

    /// Register the identity the host may switch to by writing 0x64 to 0x00.
    pub fn set_alternate_identity(&mut self, identity: [u8; 6]) {
        self.alternate_identity = Some(identity);
    }

    /// Tables used to answer hosts that keep encryption on. Without them
    /// the key exchange is accepted but traffic stays unencrypted.
    pub fn set_cipher_tables(&mut self, tables: &'a CipherTables) {
        self.tables = Some(tables);
    }

    #[must_use]
    pub fn registers(&self) -> &'a SharedRegisters {
        self.regs
    }

    #[must_use]
    pub fn pointer(&self) -> u8 {
        self.pointer
    }

    #[must_use]
    pub fn encryption_enabled(&self) -> bool {
        self.cipher.is_some()
    }

    /// Host addressed us for writing. The next byte is the register pointer.
    pub fn start_write(&mut self) {
        self.phase = Phase::AwaitPointer;
        self.stored = false;
    }

    /// One byte received from the host.
    pub fn write_byte(&mut self, byte: u8) {
        match self.phase {
            Phase::AwaitPointer => {
                self.pointer = byte;
                self.phase = Phase::Writing;
            }
            Phase::Writing => {
                self.store(byte);
                self.pointer = self.pointer.wrapping_add(1);
            }
            Phase::Idle | Phase::Reading => {
                trace!("ignoring stray write byte");
            }
        }
    }

    /// Stop or repeated start. Ends the current phase.
    ///
    /// A write that ends on the last key byte (re)derives the cipher, as long
    /// as every byte of the key area has been written at some point.
    pub fn stop(&mut self) {
        if self.phase == Phase::Writing
            && self.stored
            && self.pointer == KEY_AREA_END
            && self.key_written == KEY_AREA_FULL
        {
            self.derive_cipher();
        }
        self.phase = Phase::Idle;
        self.stored = false;
    }

    /// Host addressed us for reading.
    ///
    /// Returns [`BusEvent::ReportSampled`] when the read begins inside the
    /// report core.
    pub fn start_read(&mut self) -> Option<BusEvent> {
        self.phase = Phase::Reading;
        (self.pointer < DATA_ADDR + DATA_CORE_LEN).then_some(BusEvent::ReportSampled)
    }

    /// Next byte to send to the host.
    pub fn read_byte(&mut self) -> u8 {
        if self.phase != Phase::Reading {
            return IDLE_READ;
        }

        let addr = self.pointer;
        let stored = self.regs.read(addr);
        self.pointer = addr.wrapping_add(1);
        match &self.cipher {
            Some(ks) => ks.encrypt(addr, stored),
            None => stored,
        }
    }

    /// Rewind the pointer over `count` bytes that were fetched but never
    /// clocked out. The pointer wraps at 256, so any count is taken modulo
    /// 256.
    pub fn unread(&mut self, count: usize) {
        let rewind = u8::try_from(count % 256).unwrap_or_default();
        self.pointer = self.pointer.wrapping_sub(rewind);
    }

    /// Handle a complete write transaction: pointer byte, then data.
    pub fn write_transaction(&mut self, bytes: &[u8]) {
        self.start_write();
        for &byte in bytes {
            self.write_byte(byte);
        }
        self.stop();
    }

    /// Handle a complete read transaction, filling `out`.
    pub fn read_transaction(&mut self, out: &mut [u8]) -> Option<BusEvent> {
        let event = self.start_read();
        for byte in out.iter_mut() {
            *byte = self.read_byte();
        }
        self.stop();
        event
    }

    fn store(&mut self, wire: u8) {
        let addr = self.pointer;

        // Control writes are recognised before decryption.
        if addr == ENCRYPTION_ADDR && DISABLE_CODES.contains(&wire) {
            debug!("encryption disabled by host");
            self.cipher = None;
            self.regs.set_identity(&self.default_identity);
            self.regs.set_passthrough(false);
        }
        if addr == DATA_ADDR && wire == ALT_ID_TRIGGER {
            if let Some(identity) = self.alternate_identity {
                info!("host selected alternate identity");
                self.regs.set_identity(&identity);
                self.regs.set_passthrough(true);
            }
        }

        let value = match &self.cipher {
            Some(ks) => ks.decrypt(addr, wire),
            None => wire,
        };
        self.regs.write(addr, value);
        self.stored = true;

        if (CHALLENGE_ADDR..KEY_AREA_END).contains(&addr) {
            self.key_written |= 1 << (addr - CHALLENGE_ADDR);
        }
    }

    fn derive_cipher(&mut self) {
        let mut area = [0u8; CHALLENGE_LEN + KEY_LEN];
        self.regs.read_block(CHALLENGE_ADDR, &mut area);
        let material = KeyMaterial::from_key_area(&area);

        let Some(tables) = self.tables else {
            warn!("no cipher tables, staying unencrypted");
            self.cipher = None;
            return;
        };
        self.cipher = Keystream::derive(tables, &material);
        match &self.cipher {
            Some(ks) => debug!("encryption enabled, algorithm {}", ks.index()),
            None => warn!("key recovery failed, staying unencrypted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::trial_key;
    use crate::registers::{IDENTITY_ADDR, REPORT_MODE_ADDR};
    use crate::tables::TEST_TABLES;
    use classic_proto::{alternate_identity, ALT_ID_N64};

    const REPORT: [u8; 6] = [0xA0, 0x20, 0x10, 0x00, 0xFF, 0xFF];
    const RAND: [u8; CHALLENGE_LEN] = [0x42, 0x11, 0x9C, 0x07, 0xE5, 0x30, 0x7A, 0xBB, 0x01, 0xC8];

    fn material_for(index: usize) -> KeyMaterial {
        KeyMaterial {
            rand: RAND,
            key: trial_key(&TEST_TABLES, index, &RAND),
        }
    }

    fn keystream_for(index: usize) -> Keystream {
        Keystream::derive(&TEST_TABLES, &material_for(index)).unwrap()
    }

    fn write_key(slave: &mut ExtensionSlave<'_>, index: usize) {
        slave.set_cipher_tables(&TEST_TABLES);
        let area = material_for(index).to_key_area();

        // Split the way hosts do: 6 + 6 + 4 bytes.
        let mut tx = [0u8; 7];
        tx[0] = 0x40;
        tx[1..].copy_from_slice(&area[..6]);
        slave.write_transaction(&tx);
        assert!(!slave.encryption_enabled());
        tx[0] = 0x46;
        tx[1..].copy_from_slice(&area[6..12]);
        slave.write_transaction(&tx);
        assert!(!slave.encryption_enabled());
        let mut tail = [0u8; 5];
        tail[0] = 0x4C;
        tail[1..].copy_from_slice(&area[12..]);
        slave.write_transaction(&tail);
    }

    #[test]
    fn test_init_contents() {
        let regs = SharedRegisters::new();
        let mut slave = ExtensionSlave::new(&regs, &REPORT);

        slave.write_transaction(&[IDENTITY_ADDR]);
        let mut id = [0u8; 6];
        assert_eq!(slave.read_transaction(&mut id), None);
        assert_eq!(id, CLASSIC_IDENTITY);

        slave.write_transaction(&[0x00]);
        let mut data = [0u8; 6];
        assert_eq!(slave.read_transaction(&mut data), Some(BusEvent::ReportSampled));
        assert_eq!(data, REPORT);
    }

    #[test]
    fn test_plain_write_then_read() {
        let regs = SharedRegisters::new();
        let mut slave = ExtensionSlave::new(&regs, &REPORT);

        slave.write_transaction(&[0x80, 1, 2, 3]);
        assert_eq!(regs.read(0x80), 1);
        assert_eq!(regs.read(0x82), 3);
        assert_eq!(slave.pointer(), 0x83);

        slave.write_transaction(&[0x81]);
        let mut out = [0u8; 2];
        slave.read_transaction(&mut out);
        assert_eq!(out, [2, 3]);
    }

    #[test]
    fn test_pointer_wraps() {
        let regs = SharedRegisters::new();
        let mut slave = ExtensionSlave::new(&regs, &REPORT);
        slave.write_transaction(&[0xFF, 0x11, 0x22]);
        assert_eq!(regs.read(0xFF), 0x11);
        assert_eq!(regs.read(0x00), 0x22);
    }

    #[test]
    fn test_sample_event_only_in_report_core() {
        let regs = SharedRegisters::new();
        let mut slave = ExtensionSlave::new(&regs, &REPORT);

        slave.write_transaction(&[0x05]);
        assert_eq!(slave.start_read(), Some(BusEvent::ReportSampled));
        slave.stop();

        slave.write_transaction(&[0x06]);
        assert_eq!(slave.start_read(), None);
        slave.stop();
    }

    #[test]
    fn test_malformed_sequences_ignored() {
        let regs = SharedRegisters::new();
        let mut slave = ExtensionSlave::new(&regs, &REPORT);

        // Data without a preceding start is dropped.
        slave.write_byte(0x99);
        assert_eq!(regs.read(0x00), REPORT[0]);

        // Reads outside a read transaction return the idle value.
        assert_eq!(slave.read_byte(), IDLE_READ);

        // A start with no bytes is harmless.
        slave.start_write();
        slave.stop();
        assert_eq!(slave.pointer(), 0);
    }

    #[test]
    fn test_unread_rewinds() {
        let regs = SharedRegisters::new();
        let mut slave = ExtensionSlave::new(&regs, &REPORT);
        slave.write_transaction(&[0x00]);
        let mut out = [0u8; 8];
        slave.read_transaction(&mut out);
        slave.unread(2);
        assert_eq!(slave.pointer(), 6);

        // A full lap of the register file lands on the same pointer.
        slave.unread(256 + 2);
        assert_eq!(slave.pointer(), 4);
    }

    #[test]
    fn test_key_exchange_enables_cipher() {
        let regs = SharedRegisters::new();
        let mut slave = ExtensionSlave::new(&regs, &REPORT);
        slave.write_transaction(&[0xF0, 0xAA]);
        write_key(&mut slave, 4);
        assert!(slave.encryption_enabled());

        // Reads come back encrypted, decrypting to the stored report.
        let ks = keystream_for(4);
        slave.write_transaction(&[0x00]);
        let mut out = [0u8; 6];
        slave.read_transaction(&mut out);
        for (addr, &wire) in out.iter().enumerate() {
            assert_eq!(ks.decrypt(addr as u8, wire), REPORT[addr]);
        }
    }

    #[test]
    fn test_encrypted_writes_are_decrypted() {
        let regs = SharedRegisters::new();
        let mut slave = ExtensionSlave::new(&regs, &REPORT);
        write_key(&mut slave, 1);
        let ks = keystream_for(1);

        slave.write_transaction(&[0x90, ks.encrypt(0x90, 0x3C)]);
        assert_eq!(regs.read(0x90), 0x3C);
    }

    #[test]
    fn test_bad_key_stays_plain() {
        let regs = SharedRegisters::new();
        let mut slave = ExtensionSlave::new(&regs, &REPORT);
        slave.set_cipher_tables(&TEST_TABLES);
        let mut material = material_for(2);
        material.key[0] ^= 0x01;
        let mut tx = [0u8; 17];
        tx[0] = 0x40;
        tx[1..].copy_from_slice(&material.to_key_area());
        slave.write_transaction(&tx);
        assert!(!slave.encryption_enabled());
    }

    #[test]
    fn test_without_tables_stays_plain() {
        let regs = SharedRegisters::new();
        let mut slave = ExtensionSlave::new(&regs, &REPORT);
        let mut tx = [0u8; 17];
        tx[0] = 0x40;
        tx[1..].copy_from_slice(&material_for(2).to_key_area());
        slave.write_transaction(&tx);
        assert!(!slave.encryption_enabled());

        slave.write_transaction(&[0x00]);
        let mut out = [0u8; 6];
        slave.read_transaction(&mut out);
        assert_eq!(out, REPORT);
    }

    #[test]
    fn test_key_only_rewrite_rederives() {
        let regs = SharedRegisters::new();
        let mut slave = ExtensionSlave::new(&regs, &REPORT);
        write_key(&mut slave, 4);
        assert!(slave.encryption_enabled());
        slave.write_transaction(&[0xF0, 0x55]);
        assert!(!slave.encryption_enabled());

        // Setting the pointer to the end of the key area stores nothing.
        slave.write_transaction(&[0x50]);
        assert!(!slave.encryption_enabled());

        // Only the six key bytes change; the challenge stays in place.
        let area = material_for(5).to_key_area();
        let mut tx = [0u8; 7];
        tx[0] = 0x4A;
        tx[1..].copy_from_slice(&area[10..]);
        slave.write_transaction(&tx);
        assert!(slave.encryption_enabled());

        let ks = keystream_for(5);
        slave.write_transaction(&[0x00]);
        let mut out = [0u8; 6];
        slave.read_transaction(&mut out);
        for (addr, &wire) in out.iter().enumerate() {
            assert_eq!(ks.decrypt(addr as u8, wire), REPORT[addr]);
        }
    }

    #[test]
    fn test_partial_key_area_does_not_derive() {
        let regs = SharedRegisters::new();
        let mut slave = ExtensionSlave::new(&regs, &REPORT);
        slave.set_cipher_tables(&TEST_TABLES);
        let area = material_for(0).to_key_area();
        let mut tx = [0u8; 16];
        tx[0] = 0x40;
        tx[1..].copy_from_slice(&area[..15]);
        slave.write_transaction(&tx);
        assert!(!slave.encryption_enabled());

        // Completing the last byte triggers derivation.
        slave.write_transaction(&[0x4F, area[15]]);
        assert!(slave.encryption_enabled());
    }

    #[test]
    fn test_disable_codes_restore_identity() {
        for code in DISABLE_CODES {
            let regs = SharedRegisters::new();
            let mut slave = ExtensionSlave::new(&regs, &REPORT);
            write_key(&mut slave, 2);
            assert!(slave.encryption_enabled());

            regs.write(REPORT_MODE_ADDR, 0x03);
            slave.write_transaction(&[0xF0, code]);
            assert!(!slave.encryption_enabled());
            assert_eq!(regs.identity(), CLASSIC_IDENTITY);
            assert_eq!(regs.read(0xF0), code);
        }
    }

    #[test]
    fn test_alternate_identity_switch() {
        let regs = SharedRegisters::new();
        let mut slave = ExtensionSlave::new(&regs, &REPORT);

        // Without a registered alternate the trigger is a plain data write.
        slave.write_transaction(&[0x00, 0x64]);
        assert_eq!(regs.identity(), CLASSIC_IDENTITY);
        assert!(!regs.passthrough());

        let alt = alternate_identity(ALT_ID_N64);
        slave.set_alternate_identity(alt);
        slave.write_transaction(&[0xF0, 0x55]);
        slave.write_transaction(&[0x00, 0x64]);
        assert_eq!(regs.identity(), alt);
        assert!(regs.passthrough());

        // Disabling again falls back to the default identity.
        slave.write_transaction(&[0xF0, 0x55]);
        assert_eq!(regs.identity(), CLASSIC_IDENTITY);
        assert!(!regs.passthrough());
    }
}
