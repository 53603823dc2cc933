//! Configuration record in the last sector of the on-board flash.

use adapter_core::config::RECORD_LEN;
use adapter_core::{ConfigStorage, StoreError};
use defmt::warn;
use embassy_rp::flash::{Blocking, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;

/// Flash fitted to the Pico.
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Start of the sector holding the record.
pub const CONFIG_OFFSET: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;

/// [`ConfigStorage`] over the RP2040 boot flash.
///
/// Writes erase the whole sector first. While the flash is being
/// programmed execute-in-place is off and interrupts are held, so the bus
/// responder stalls for the duration.
pub struct FlashStore<'d> {
    flash: Flash<'d, FLASH, Blocking, FLASH_SIZE>,
}

impl<'d> FlashStore<'d> {
    #[must_use]
    pub fn new(flash: Flash<'d, FLASH, Blocking, FLASH_SIZE>) -> Self {
        Self { flash }
    }
}

impl ConfigStorage for FlashStore<'_> {
    fn read(&mut self, record: &mut [u8; RECORD_LEN]) -> Result<(), StoreError> {
        self.flash.blocking_read(CONFIG_OFFSET, record).map_err(|e| {
            warn!("flash read failed: {:?}", e);
            StoreError::Read
        })
    }

    fn write(&mut self, record: &[u8; RECORD_LEN]) -> Result<(), StoreError> {
        self.flash
            .blocking_erase(CONFIG_OFFSET, CONFIG_OFFSET + ERASE_SIZE as u32)
            .and_then(|()| self.flash.blocking_write(CONFIG_OFFSET, record))
            .map_err(|e| {
                warn!("flash write failed: {:?}", e);
                StoreError::Write
            })
    }
}
