//! Native controller source trait and error types.

use core::future::Future;

use crate::native::NativeReport;

/// Error type for controller reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadError {
    /// Nothing answered on the controller port.
    NoResponse,
    /// The controller stopped mid-transfer.
    Timeout,
    /// The reply was malformed or failed its checks.
    Corrupt,
}

impl core::fmt::Display for ReadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoResponse => write!(f, "no controller response"),
            Self::Timeout => write!(f, "controller read timed out"),
            Self::Corrupt => write!(f, "corrupt controller reply"),
        }
    }
}

/// Async trait for native controller ports.
///
/// One implementation per physical port (SNES/NES shift register, N64 or
/// GameCube single wire, DB9). The latest report is kept by the source and
/// fetched with [`ControllerSource::report`] after a successful update.
pub trait ControllerSource {
    /// Probe the port and prepare the controller for polling.
    fn init(&mut self) -> impl Future<Output = Result<(), ReadError>>;

    /// Read the controller once, refreshing [`ControllerSource::report`].
    fn update(&mut self) -> impl Future<Output = Result<(), ReadError>>;

    /// Whether the last update differed from the one before it.
    fn changed(&self) -> bool;

    /// Latest report, [`NativeReport::None`] before the first update.
    fn report(&self) -> NativeReport;
}
