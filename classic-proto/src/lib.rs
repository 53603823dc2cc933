//! Classic Controller data model and wire format for the extension adapter.
//!
//! This crate provides everything the adapter needs to describe what the
//! host should see:
//!
//! - **Types**: the logical report produced once per poll
//!   - [`ClassicButtons`] - Button state bitfield (active-high)
//!   - [`Stick`] - Signed stick position in native units
//!   - [`StickShaping`] - How the left stick is reduced to 6 bits
//!   - [`ClassicLogical`] - Complete report snapshot
//!
//! - **Curves**: [`apply_curve()`] and the named [`Curve`] tables
//!
//! - **Serialization**: [`PackReport`] packs a report in any [`ReportMode`]
//!
//! - **Identity**: [`CLASSIC_IDENTITY`], [`alternate_identity()`], [`CALIBRATION`]
//!
//! # Example
//!
//! ```
//! use classic_proto::{ClassicButtons, ClassicLogical, Curve, PackReport, ReportMode, Stick, StickShaping};
//!
//! let logical = ClassicLogical {
//!     left_stick: Stick::new(100, 0),
//!     shaping: StickShaping::Curve(Curve::V1_5),
//!     buttons: ClassicButtons::B | ClassicButtons::PLUS,
//!     ..ClassicLogical::neutral()
//! };
//!
//! let mut buf = [0u8; classic_proto::MAX_REPORT_SIZE];
//! let len = logical.pack(ReportMode::Classic8, &mut buf).unwrap();
//! assert_eq!(len, 19);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//! - **`heapless`**: Enable `pack_to_vec()`
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod buttons;
pub mod curve;
pub mod identity;
pub mod serialize;
pub mod types;

pub use buttons::ClassicButtons;
pub use curve::{apply_curve, Curve, CURVE_CENTER, MAX_STEP};
pub use identity::{
    alternate_identity, ALT_ID_GAMECUBE, ALT_ID_GENERIC, ALT_ID_N64, ALT_ID_NES, ALT_ID_SNES,
    CALIBRATION, CLASSIC_IDENTITY, REPORT_SENTINEL,
};
pub use serialize::{PackReport, ReportMode, SerializeError, EXTENSION_BLOCK_SIZE, MAX_REPORT_SIZE};
pub use types::{centered_u8, ClassicLogical, Stick, StickShaping, RAW_DATA_SIZE};
