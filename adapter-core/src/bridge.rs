//! ExtensionBridge: runs one controller poll per host read.

use classic_proto::{PackReport, SerializeError, MAX_REPORT_SIZE};

use crate::config::{load_config, save_config, ConfigStorage, Configuration, StoreError};
use crate::controller::{ControllerSource, ReadError};
use crate::mapping::MappingEngine;
use crate::native::{Family, NativeReport};
use crate::output::ReportSink;

/// Consecutive failed reads tolerated before the controller counts as gone.
pub const ERROR_THRESHOLD: u8 = 10;

/// Whether a controller is currently being polled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    #[default]
    NoController,
    Active,
}

/// Connects a controller port to the extension register file.
///
/// The firmware calls [`ExtensionBridge::poll_once`] each time the host
/// samples the report (or after a timeout). Each call reads the controller,
/// translates the report, saves the configuration if a chord changed it and
/// publishes the packed bytes.
///
/// # Error Handling
///
/// A failed read leaves the previous report in place. After more than
/// [`ERROR_THRESHOLD`] failures in a row the bridge publishes a neutral
/// report and goes back to probing for a controller.
pub struct ExtensionBridge<S, O, C> {
    source: S,
    sink: O,
    storage: C,
    engine: MappingEngine,
    config: Configuration,
    state: LinkState,
    error_count: u8,
    initial_family: Family,
}

impl<S: ControllerSource, O: ReportSink, C: ConfigStorage> ExtensionBridge<S, O, C> {
    /// Create a bridge, loading the stored configuration.
    ///
    /// Storage failures are logged and the defaults used instead.
    pub fn new(source: S, sink: O, mut storage: C) -> Self {
        let config = match load_config(&mut storage) {
            Ok(config) => config,
            Err(e) => {
                warn!("configuration unavailable ({}), using defaults", e);
                Configuration::default()
            }
        };

        Self {
            source,
            sink,
            storage,
            engine: MappingEngine::new(),
            config,
            state: LinkState::NoController,
            error_count: 0,
            initial_family: Family::None,
        }
    }

    /// Look for a controller before the bus is started.
    ///
    /// Returns the alternate identity of the detected family, to be
    /// registered with the bus responder for passthrough requests.
    pub async fn detect_initial(&mut self) -> Option<[u8; 6]> {
        if let Err(e) = self.source.init().await {
            debug!("no controller at start-up: {}", e);
            return None;
        }
        if let Err(e) = self.source.update().await {
            debug!("initial read failed: {}", e);
            return None;
        }

        self.initial_family = self.source.report().family();
        self.state = LinkState::Active;
        self.error_count = 0;
        self.engine.begin_session();
        info!("initial controller: {:?}", self.initial_family);

        self.initial_family.alternate_identity()
    }

    /// Poll the controller once and publish the result.
    ///
    /// Returns the result of the operation for testing purposes.
    pub async fn poll_once(&mut self) -> Result<(), BridgeError> {
        if self.state == LinkState::NoController {
            if let Err(e) = self.source.init().await {
                self.publish(&NativeReport::None)?;
                return Err(BridgeError::Read(e));
            }
            info!("controller connected");
            self.state = LinkState::Active;
            self.error_count = 0;
            self.engine.begin_session();
        }

        if let Err(e) = self.source.update().await {
            self.error_count = self.error_count.saturating_add(1);
            if self.error_count > ERROR_THRESHOLD {
                warn!("controller lost after {} failed reads", self.error_count);
                self.state = LinkState::NoController;
                self.error_count = 0;
                self.publish(&NativeReport::None)?;
            }
            return Err(BridgeError::Read(e));
        }
        self.error_count = 0;

        let report = self.source.report();
        if self.source.changed() {
            trace!("report: {:?}", report);
        }
        self.publish(&report)
    }

    fn publish(&mut self, report: &NativeReport) -> Result<(), BridgeError> {
        if self.sink.passthrough_active() {
            if report.family() == self.initial_family {
                self.sink.publish(report.raw());
            }
            return Ok(());
        }

        let translation = self.engine.translate(report, &mut self.config);

        let mut buf = [0u8; MAX_REPORT_SIZE];
        let len = translation
            .logical
            .pack(self.sink.report_mode(), &mut buf)
            .map_err(BridgeError::Serialize)?;
        self.sink.publish(&buf[..len]);

        if translation.config_changed {
            save_config(&mut self.storage, &self.config).map_err(BridgeError::Store)?;
        }
        Ok(())
    }

    #[must_use]
    pub const fn link_state(&self) -> LinkState {
        self.state
    }

    /// Current runtime configuration.
    #[must_use]
    pub const fn config(&self) -> &Configuration {
        &self.config
    }

    /// Family detected by [`ExtensionBridge::detect_initial`].
    #[must_use]
    pub const fn initial_family(&self) -> Family {
        self.initial_family
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn sink(&self) -> &O {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut O {
        &mut self.sink
    }

    pub fn storage(&self) -> &C {
        &self.storage
    }

    /// Decompose the bridge into its source, sink and storage.
    pub fn into_parts(self) -> (S, O, C) {
        (self.source, self.sink, self.storage)
    }
}

/// Error type for bridge operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeError {
    /// Error from the controller source.
    Read(ReadError),
    /// The configuration could not be saved.
    Store(StoreError),
    /// The report did not fit the output buffer.
    Serialize(SerializeError),
}

impl core::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Read(e) => write!(f, "read: {}", e),
            Self::Store(e) => write!(f, "store: {}", e),
            Self::Serialize(e) => write!(f, "serialize: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::config::RECORD_LEN;
    use crate::native::{GcButtons, GcReport, N64Buttons, N64Report};
    use classic_proto::{ReportMode, Stick};
    use core::future::Future;
    use core::pin::Pin;
    use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
    use std::collections::VecDeque;
    use std::vec;
    use std::vec::Vec;

    // Scripted controller port
    struct MockSource {
        init_ok: bool,
        updates: VecDeque<Result<NativeReport, ReadError>>,
        report: NativeReport,
        changed: bool,
    }

    impl MockSource {
        fn new(updates: Vec<Result<NativeReport, ReadError>>) -> Self {
            Self {
                init_ok: true,
                updates: updates.into(),
                report: NativeReport::None,
                changed: false,
            }
        }
    }

    impl ControllerSource for MockSource {
        fn init(&mut self) -> impl Future<Output = Result<(), ReadError>> {
            core::future::ready(if self.init_ok { Ok(()) } else { Err(ReadError::NoResponse) })
        }

        fn update(&mut self) -> impl Future<Output = Result<(), ReadError>> {
            let result = match self.updates.pop_front() {
                Some(Ok(report)) => {
                    self.changed = report != self.report;
                    self.report = report;
                    Ok(())
                }
                Some(Err(e)) => Err(e),
                None => Err(ReadError::Timeout),
            };
            core::future::ready(result)
        }

        fn changed(&self) -> bool {
            self.changed
        }

        fn report(&self) -> NativeReport {
            self.report
        }
    }

    struct MockSink {
        published: Vec<Vec<u8>>,
        mode: ReportMode,
        passthrough: bool,
    }

    impl MockSink {
        fn new() -> Self {
            Self {
                published: Vec::new(),
                mode: ReportMode::Classic6,
                passthrough: false,
            }
        }

        fn last(&self) -> &[u8] {
            self.published.last().unwrap()
        }
    }

    impl ReportSink for MockSink {
        fn publish(&mut self, report: &[u8]) {
            self.published.push(report.to_vec());
        }

        fn report_mode(&self) -> ReportMode {
            self.mode
        }

        fn passthrough_active(&self) -> bool {
            self.passthrough
        }
    }

    struct MockStorage {
        record: [u8; RECORD_LEN],
        writes: usize,
        fail_read: bool,
    }

    impl MockStorage {
        fn blank() -> Self {
            Self {
                record: [0xFF; RECORD_LEN],
                writes: 0,
                fail_read: false,
            }
        }
    }

    impl ConfigStorage for MockStorage {
        fn read(&mut self, record: &mut [u8; RECORD_LEN]) -> Result<(), StoreError> {
            if self.fail_read {
                return Err(StoreError::Read);
            }
            *record = self.record;
            Ok(())
        }

        fn write(&mut self, record: &[u8; RECORD_LEN]) -> Result<(), StoreError> {
            self.record = *record;
            self.writes += 1;
            Ok(())
        }
    }

    // Helper to run a future to completion (simple blocking executor)
    fn block_on<F: Future>(mut f: F) -> F::Output {
        fn noop_raw_waker() -> RawWaker {
            fn noop(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                noop_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
            RawWaker::new(core::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
        let mut cx = Context::from_waker(&waker);

        // SAFETY: We don't move f after pinning
        let mut f = unsafe { Pin::new_unchecked(&mut f) };

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {
                    panic!("Mock future returned Pending unexpectedly");
                }
            }
        }
    }

    fn gc(buttons: GcButtons) -> NativeReport {
        NativeReport::GameCube(GcReport {
            buttons,
            stick: Stick::NEUTRAL,
            c_stick: Stick::NEUTRAL,
            left_trigger: 0,
            right_trigger: 0,
            raw: [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88],
        })
    }

    fn bridge(updates: Vec<Result<NativeReport, ReadError>>) -> ExtensionBridge<MockSource, MockSink, MockStorage> {
        ExtensionBridge::new(MockSource::new(updates), MockSink::new(), MockStorage::blank())
    }

    #[test]
    fn test_gamecube_a_end_to_end() {
        let mut bridge = bridge(vec![Ok(gc(GcButtons::A))]);

        assert!(block_on(bridge.poll_once()).is_ok());
        assert_eq!(bridge.link_state(), LinkState::Active);

        let report = bridge.sink().last();
        assert_eq!(report.len(), 17);
        assert_eq!(&report[..6], &[0xA0, 0x20, 0x10, 0x00, 0xFF, 0xEF]);
        assert_eq!(&report[6..9], b"RGC");
        assert_eq!(&report[9..], &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88]);
    }

    #[test]
    fn test_blank_storage_gets_defaults() {
        let bridge = bridge(vec![]);
        assert_eq!(*bridge.config(), Configuration::default());
        assert_eq!(bridge.storage().writes, 1);
    }

    #[test]
    fn test_storage_read_failure_uses_defaults() {
        let mut storage = MockStorage::blank();
        storage.fail_read = true;
        let bridge = ExtensionBridge::new(MockSource::new(vec![]), MockSink::new(), storage);
        assert_eq!(*bridge.config(), Configuration::default());
        assert_eq!(bridge.storage().writes, 0);
    }

    #[test]
    fn test_missing_controller_publishes_neutral() {
        let mut bridge = bridge(vec![]);
        bridge.source_mut().init_ok = false;

        let result = block_on(bridge.poll_once());
        assert_eq!(result, Err(BridgeError::Read(ReadError::NoResponse)));
        assert_eq!(bridge.link_state(), LinkState::NoController);
        assert_eq!(&bridge.sink().last()[..6], &[0xA0, 0x20, 0x10, 0x00, 0xFF, 0xFF]);
        assert_eq!(&bridge.sink().last()[6..9], &[b'R', 0, 0]);
    }

    #[test]
    fn test_controller_dropped_after_threshold() {
        let mut updates = vec![Ok(gc(GcButtons::B))];
        updates.extend((0..=ERROR_THRESHOLD).map(|_| Err(ReadError::Corrupt)));
        let mut bridge = bridge(updates);

        block_on(bridge.poll_once()).unwrap();
        let published = bridge.sink().published.len();

        for _ in 0..ERROR_THRESHOLD {
            assert!(block_on(bridge.poll_once()).is_err());
            assert_eq!(bridge.link_state(), LinkState::Active);
        }
        // Transient failures keep the last report.
        assert_eq!(bridge.sink().published.len(), published);

        assert_eq!(block_on(bridge.poll_once()), Err(BridgeError::Read(ReadError::Corrupt)));
        assert_eq!(bridge.link_state(), LinkState::NoController);
        assert_eq!(bridge.sink().last()[5], 0xFF);
    }

    #[test]
    fn test_chord_is_saved_once() {
        let chord = GcButtons::A | GcButtons::B | GcButtons::X | GcButtons::Y | GcButtons::LEFT;
        let mut bridge = bridge(vec![Ok(gc(GcButtons::NONE)), Ok(gc(chord)), Ok(gc(chord))]);

        for _ in 0..3 {
            block_on(bridge.poll_once()).unwrap();
        }
        // One write for the defaults, one for the chord.
        assert_eq!(bridge.storage().writes, 2);
        assert_eq!(bridge.config().gc_profile, crate::config::GcProfile::Zlr);
        assert_eq!(
            Configuration::from_record(&bridge.storage().record),
            Some(*bridge.config())
        );
    }

    #[test]
    fn test_report_mode_selects_length() {
        let mut bridge = bridge(vec![Ok(gc(GcButtons::NONE)), Ok(gc(GcButtons::NONE))]);
        bridge.sink_mut().mode = ReportMode::Classic8;
        block_on(bridge.poll_once()).unwrap();
        assert_eq!(bridge.sink().last().len(), 19);

        bridge.sink_mut().mode = ReportMode::Classic10;
        block_on(bridge.poll_once()).unwrap();
        assert_eq!(bridge.sink().last().len(), 20);
    }

    #[test]
    fn test_detect_initial_and_passthrough() {
        let n64 = NativeReport::N64(N64Report {
            buttons: N64Buttons::A,
            stick: Stick::NEUTRAL,
            raw: [1, 2, 3, 4],
        });
        let mut bridge = bridge(vec![Ok(n64), Ok(n64), Ok(gc(GcButtons::A))]);

        assert_eq!(
            block_on(bridge.detect_initial()),
            Some([0x00, 0x00, 0xA4, 0x20, 0x52, 0x64])
        );
        assert_eq!(bridge.initial_family(), Family::N64);
        assert_eq!(bridge.link_state(), LinkState::Active);

        bridge.sink_mut().passthrough = true;
        block_on(bridge.poll_once()).unwrap();
        assert_eq!(bridge.sink().last(), &[1, 2, 3, 4]);

        // A different family is not forwarded.
        block_on(bridge.poll_once()).unwrap();
        assert_eq!(bridge.sink().published.len(), 1);
    }

    #[test]
    fn test_detect_initial_without_controller() {
        let mut bridge = bridge(vec![]);
        bridge.source_mut().init_ok = false;
        assert_eq!(block_on(bridge.detect_initial()), None);
        assert_eq!(bridge.link_state(), LinkState::NoController);
    }
}
