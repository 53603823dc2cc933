//! Controller translation and poll orchestration for the extension adapter.
//!
//! This crate holds everything between a native controller port and the
//! extension register file, without any platform-specific dependencies.
//!
//! # Overview
//!
//! - [`native`]: per-family native reports ([`NativeReport`])
//! - [`gesture`]: debounced triple-click detection ([`TripleClick`])
//! - [`config`]: runtime [`Configuration`] and its persisted record
//! - [`mapping`]: native to Classic translation ([`MappingEngine`])
//! - [`controller`]: controller port trait ([`ControllerSource`])
//! - [`output`]: report sink trait ([`ReportSink`])
//! - [`bridge`]: the per-poll cycle ([`ExtensionBridge`])
//!
//! # Example
//!
//! ```rust
//! use adapter_core::{Configuration, MappingEngine, NativeReport};
//! use classic_proto::{ClassicButtons, PackReport, ReportMode};
//!
//! let mut engine = MappingEngine::new();
//! let mut config = Configuration::default();
//!
//! // Two bytes shifted out of a NES pad with A held.
//! let report = NativeReport::from_serial_pad([0x80, 0xFF]);
//! let translation = engine.translate(&report, &mut config);
//! assert_eq!(translation.logical.buttons, ClassicButtons::A);
//!
//! let mut buf = [0u8; 17];
//! let len = translation.logical.pack(ReportMode::Classic6, &mut buf).unwrap();
//! assert_eq!(&buf[6..len][..3], b"RFC");
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Log through defmt and derive `defmt::Format`
//! - **`log`**: Log through the `log` facade
//! - **`heapless`**: Forwarded to `classic-proto`

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod fmt;

pub mod bridge;
pub mod config;
pub mod controller;
pub mod gesture;
pub mod mapping;
pub mod native;
pub mod output;

// Re-export main types at crate root
pub use bridge::{BridgeError, ExtensionBridge, LinkState, ERROR_THRESHOLD};
pub use config::{load_config, save_config, ConfigStorage, Configuration, GcProfile, N64Profile, StoreError};
pub use controller::{ControllerSource, ReadError};
pub use gesture::{Debounce, TripleClick};
pub use mapping::{MappingEngine, TestProbe, Translation};
pub use native::{
    Family, GcButtons, GcReport, GenericButtons, GenericReport, N64Buttons, N64Report, NativeButtons,
    NativeReport, NesButtons, NesReport, SnesButtons, SnesReport,
};
pub use output::ReportSink;
