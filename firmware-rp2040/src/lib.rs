//! Wii Classic Controller extension adapter for RP2040.
//!
//! This crate provides the embedded implementation of an adapter that lets
//! a SNES or NES pad pose as a Classic Controller on a Wii Remote.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Answers the Wii Remote on I2C address 0x52 as an extension
//! 2. Reads the pad shortly before each expected host poll
//! 3. Publishes the translated report into the shared register file
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | I2C0 SDA | 4    | Extension port data |
//! | I2C0 SCL | 5    | Extension port clock |
//! | Clock    | 2    | Pad shift clock |
//! | Latch    | 3    | Pad latch |
//! | Data     | 6    | Pad serial data |
//!
//! # Architecture
//!
//! Two Embassy tasks share only the lock-free [`SharedRegisters`]:
//!
//! - **Bus Task**: [`BusResponder`] serves host reads and writes, and
//!   raises a [`SampleSignal`] when the report is sampled
//! - **Poll Task**: waits for the signal (or a timeout), waits 2.35 ms,
//!   then runs one [`ExtensionBridge`] cycle
//!
//! # Modules
//!
//! - [`bus`]: I2C slave responder ([`BusResponder`])
//! - [`flash_store`]: configuration storage ([`FlashStore`])
//! - [`snes`]: SNES/NES controller port ([`SerialPadPort`])
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`cipher-tables`**: Build in the extension cipher tables from
//!   `cipher-tables.bin` in the crate root (see [`ext_slave::tables`] for the
//!   layout). Without them, hosts that keep encryption on are not supported.

#![no_std]

#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features - they install conflicting panic handlers");

// Re-export core types for convenience
pub use adapter_core::{BridgeError, Configuration, ExtensionBridge, NativeReport};
pub use ext_slave::{CipherTables, ExtensionSlave, SharedRegisters, EXTENSION_ADDRESS};

pub mod bus;
pub mod flash_store;
pub mod snes;

pub use bus::{BusResponder, SampleSignal};
pub use flash_store::{FlashStore, CONFIG_OFFSET, FLASH_SIZE};
pub use snes::SerialPadPort;
