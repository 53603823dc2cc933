//! I2C responder for the extension port.
//!
//! Translates the transaction-level events of the RP2040 I2C slave into
//! the byte-level [`ExtensionSlave`] calls, and wakes the poll task when
//! the host samples the report.
//!
//! # Pins
//!
//! Uses I2C0 by default:
//! - GPIO 4: SDA
//! - GPIO 5: SCL

use defmt::debug;
use embassy_rp::i2c::Instance;
use embassy_rp::i2c_slave::{Command, Error, I2cSlave, ReadStatus};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use ext_slave::{BusEvent, ExtensionSlave};

/// Raised each time the host starts reading the data registers.
pub type SampleSignal = Signal<CriticalSectionRawMutex, ()>;

/// Largest host write: pointer plus a 16-byte key area block.
const WRITE_BUF: usize = 32;

/// Bytes staged per read response. Enough for the longest report in one go.
const READ_CHUNK: usize = 32;

/// Serves host transactions from the register file.
pub struct BusResponder<'d, T: Instance> {
    dev: I2cSlave<'d, T>,
    slave: ExtensionSlave<'static>,
    sampled: &'static SampleSignal,
}

impl<'d, T: Instance> BusResponder<'d, T> {
    #[must_use]
    pub fn new(dev: I2cSlave<'d, T>, slave: ExtensionSlave<'static>, sampled: &'static SampleSignal) -> Self {
        Self { dev, slave, sampled }
    }

    /// Answer transactions forever.
    pub async fn run(&mut self) -> ! {
        let mut buf = [0u8; WRITE_BUF];
        loop {
            match self.dev.listen(&mut buf).await {
                Ok(Command::Write(len)) => self.slave.write_transaction(&buf[..len]),
                Ok(Command::WriteRead(len)) => {
                    self.slave.write_transaction(&buf[..len]);
                    self.respond().await;
                }
                Ok(Command::Read) => self.respond().await,
                Ok(Command::GeneralCall(_)) => {}
                Err(Error::PartialWrite(len)) => {
                    debug!("host write truncated to {} bytes", len);
                    self.slave.write_transaction(&buf[..len.min(WRITE_BUF)]);
                }
                Err(e) => debug!("bus error: {:?}", e),
            }
        }
    }

    /// Feed register bytes until the host ends the read, then give back
    /// whatever it did not clock out.
    async fn respond(&mut self) {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            if self.slave.read_transaction(&mut chunk) == Some(BusEvent::ReportSampled) {
                self.sampled.signal(());
            }
            match self.dev.respond_to_read(&chunk).await {
                Ok(ReadStatus::Done) => return,
                Ok(ReadStatus::NeedMoreBytes) => {}
                Ok(ReadStatus::LeftoverBytes(count)) => {
                    self.slave.unread(usize::from(count));
                    return;
                }
                Err(e) => {
                    debug!("read aborted: {:?}", e);
                    return;
                }
            }
        }
    }
}
