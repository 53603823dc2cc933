#![no_std]
#![no_main]

#[cfg(feature = "cipher-tables")]
use classic_adapter_rp2040::CipherTables;
use classic_adapter_rp2040::{
    BusResponder, ExtensionBridge, ExtensionSlave, FlashStore, SampleSignal, SerialPadPort,
    SharedRegisters, EXTENSION_ADDRESS, FLASH_SIZE,
};
use classic_proto::{ClassicLogical, PackReport, ReportMode, MAX_REPORT_SIZE};
use defmt::{debug, info, unwrap};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_futures::select::select;
use embassy_rp::bind_interrupts;
use embassy_rp::flash::{Blocking, Flash};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c_slave::{self, I2cSlave};
use embassy_rp::peripherals::I2C0;
use embassy_sync::signal::Signal;
use embassy_time::{Delay, Duration, Timer};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => embassy_rp::i2c::InterruptHandler<I2C0>;
});

/// Register file shared by the bus and poll tasks.
static REGS: SharedRegisters = SharedRegisters::new();

#[cfg(feature = "cipher-tables")]
static CIPHER_TABLES: CipherTables =
    CipherTables::from_blob(include_bytes!("../../cipher-tables.bin"));

/// Signal from the bus task: the host just sampled the report.
static SAMPLED: StaticCell<SampleSignal> = StaticCell::new();

/// Time from a host read to the controller update, so the next read finds
/// a fresh report.
const UPDATE_DELAY: Duration = Duration::from_micros(2350);

/// Keep polling the pad when the host goes quiet.
const POLL_TIMEOUT: Duration = Duration::from_millis(16);

type PadPort = SerialPadPort<Output<'static>, Output<'static>, Input<'static>, Delay>;
type Bridge = ExtensionBridge<PadPort, &'static SharedRegisters, FlashStore<'static>>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Classic adapter starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    let sampled = SAMPLED.init(Signal::new());

    // --- Configuration storage ---
    let flash = Flash::<_, Blocking, FLASH_SIZE>::new_blocking(p.FLASH);
    let store = FlashStore::new(flash);

    // --- Controller port ---
    let port = SerialPadPort::new(
        Output::new(p.PIN_2, Level::High), // clock
        Output::new(p.PIN_3, Level::Low),  // latch
        Input::new(p.PIN_6, Pull::Up),     // data
        Delay,
    );

    let mut bridge = ExtensionBridge::new(port, &REGS, store);

    // Detect before answering the host so the passthrough identity is known.
    let alternate = bridge.detect_initial().await;

    // --- Extension port ---
    let mut neutral = [0u8; MAX_REPORT_SIZE];
    let len = unwrap!(ClassicLogical::neutral().pack(ReportMode::Classic6, &mut neutral));
    let mut slave = ExtensionSlave::new(&REGS, &neutral[..len]);
    if let Some(identity) = alternate {
        slave.set_alternate_identity(identity);
    }
    #[cfg(feature = "cipher-tables")]
    slave.set_cipher_tables(&CIPHER_TABLES);

    let mut i2c_config = i2c_slave::Config::default();
    i2c_config.addr = u16::from(EXTENSION_ADDRESS);
    let dev = I2cSlave::new(
        p.I2C0,
        p.PIN_5, // SCL
        p.PIN_4, // SDA
        Irqs,
        i2c_config,
    );
    let responder = BusResponder::new(dev, slave, sampled);

    spawner.spawn(unwrap!(bus_task(responder)));
    spawner.spawn(unwrap!(poll_task(bridge, sampled)));

    info!("Classic adapter initialized, waiting for the host...");
}

/// Bus task - answers the Wii Remote.
#[embassy_executor::task]
async fn bus_task(mut responder: BusResponder<'static, I2C0>) {
    responder.run().await
}

/// Poll task - reads the pad once per host sample.
#[embassy_executor::task]
async fn poll_task(mut bridge: Bridge, sampled: &'static SampleSignal) {
    loop {
        select(sampled.wait(), Timer::after(POLL_TIMEOUT)).await;
        Timer::after(UPDATE_DELAY).await;

        if let Err(e) = bridge.poll_once().await {
            debug!("poll failed: {}", e);
        }
    }
}
