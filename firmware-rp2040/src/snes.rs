//! SNES/NES controller port.
//!
//! Both pads are 4021 shift registers: a latch pulse captures the buttons,
//! then each falling clock edge presents the next bit (low = pressed).
//!
//! # Pins
//!
//! - GPIO 2: clock (idles high)
//! - GPIO 3: latch (active high)
//! - GPIO 6: data, with pull-up

use adapter_core::{ControllerSource, NativeReport, ReadError};
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

/// Latch pulse width.
const LATCH_US: u32 = 12;

/// Half of one clock period.
const HALF_CLOCK_US: u32 = 6;

/// Bits shifted out per read.
const BITS: usize = 16;

/// Polls a SNES or NES pad through three GPIOs.
pub struct SerialPadPort<C, L, D, T> {
    clock: C,
    latch: L,
    data: D,
    delay: T,
    bytes: [u8; 2],
    previous: [u8; 2],
}

impl<C, L, D, T> SerialPadPort<C, L, D, T>
where
    C: OutputPin,
    L: OutputPin,
    D: InputPin,
    T: DelayNs,
{
    #[must_use]
    pub fn new(clock: C, latch: L, data: D, delay: T) -> Self {
        Self {
            clock,
            latch,
            data,
            delay,
            bytes: [0; 2],
            previous: [0; 2],
        }
    }

    /// Latch the pad and clock out both bytes, first bit in the MSB.
    async fn shift_in(&mut self) -> Result<[u8; 2], ReadError> {
        self.latch.set_high().map_err(|_| ReadError::NoResponse)?;
        self.delay.delay_us(LATCH_US).await;
        self.latch.set_low().map_err(|_| ReadError::NoResponse)?;

        let mut word: u16 = 0;
        for _ in 0..BITS {
            self.delay.delay_us(HALF_CLOCK_US).await;
            self.clock.set_low().map_err(|_| ReadError::NoResponse)?;

            word <<= 1;
            if self.data.is_low().map_err(|_| ReadError::Corrupt)? {
                word |= 1;
            }

            self.delay.delay_us(HALF_CLOCK_US).await;
            self.clock.set_high().map_err(|_| ReadError::NoResponse)?;
        }

        Ok(word.to_be_bytes())
    }
}

impl<C, L, D, T> ControllerSource for SerialPadPort<C, L, D, T>
where
    C: OutputPin,
    L: OutputPin,
    D: InputPin,
    T: DelayNs,
{
    async fn init(&mut self) -> Result<(), ReadError> {
        self.clock.set_high().map_err(|_| ReadError::NoResponse)?;
        self.latch.set_low().map_err(|_| ReadError::NoResponse)?;
        self.bytes = self.shift_in().await?;
        self.previous = self.bytes;
        Ok(())
    }

    async fn update(&mut self) -> Result<(), ReadError> {
        self.previous = self.bytes;
        self.bytes = self.shift_in().await?;
        Ok(())
    }

    fn changed(&self) -> bool {
        self.bytes != self.previous
    }

    fn report(&self) -> NativeReport {
        NativeReport::from_serial_pad(self.bytes)
    }
}
