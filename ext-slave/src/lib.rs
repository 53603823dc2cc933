//! Wii extension register file and bus responder.
//!
//! This crate emulates the device side of the Wii Remote extension port:
//!
//! - [`registers`]: the 256-byte [`SharedRegisters`] file, lock-free so the
//!   bus responder and the poll loop can both touch it
//! - [`slave`]: [`ExtensionSlave`], the byte-level state machine driven by
//!   the bus peripheral
//! - [`crypto`]: key recovery and the per-address [`Keystream`]
//! - [`tables`]: the [`CipherTables`] blob format the cipher reads from
//!
//! # Example
//!
//! ```
//! use ext_slave::{BusEvent, ExtensionSlave, SharedRegisters};
//!
//! static REGS: SharedRegisters = SharedRegisters::new();
//!
//! let mut slave = ExtensionSlave::new(&REGS, &[0x20, 0x20, 0x10, 0x00, 0xFF, 0xFF]);
//!
//! // Host sets the pointer to 0x00 and reads six bytes.
//! slave.write_transaction(&[0x00]);
//! let mut report = [0u8; 6];
//! assert_eq!(slave.read_transaction(&mut report), Some(BusEvent::ReportSampled));
//! assert_eq!(report[4], 0xFF);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Log through defmt and derive `defmt::Format`
//! - **`log`**: Log through the `log` facade

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod fmt;

pub mod crypto;
pub mod registers;
pub mod slave;
pub mod tables;

pub use crypto::{trial_key, KeyMaterial, Keystream};
pub use tables::{CipherTables, TABLES_LEN};
pub use registers::SharedRegisters;
pub use slave::{BusEvent, ExtensionSlave, EXTENSION_ADDRESS};
