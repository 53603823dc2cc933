//! Report sink trait.

use classic_proto::ReportMode;
use ext_slave::SharedRegisters;

/// Destination for serialized reports.
///
/// Synchronous: publishing is a copy into memory the bus responder reads
/// from, and must not yield between the sampled read and the update.
pub trait ReportSink {
    /// Make `report` the data the host reads next.
    fn publish(&mut self, report: &[u8]);

    /// Report layout currently selected by the host.
    fn report_mode(&self) -> ReportMode;

    /// Whether the host asked for raw native reports.
    fn passthrough_active(&self) -> bool;
}

impl ReportSink for &SharedRegisters {
    fn publish(&mut self, report: &[u8]) {
        SharedRegisters::publish(*self, report);
    }

    fn report_mode(&self) -> ReportMode {
        ReportMode::from_register(self.report_mode_register())
    }

    fn passthrough_active(&self) -> bool {
        self.passthrough()
    }
}
