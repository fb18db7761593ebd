//! Meridian - round TFT network clock
//!
//! Firmware for a Raspberry Pi Pico W driving a 240x240 GC9A01 panel. The
//! clock face, connectivity and time sync each run as their own embassy
//! task around one shared application state.

#![no_std]
#![no_main]

extern crate alloc;

use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::*;
use embassy_executor::Spawner;
use embassy_net::StackResources;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_sync::mutex::Mutex;
use embassy_time::Delay;
use embedded_alloc::LlffHeap as Heap;
use embedded_hal_bus::spi::ExclusiveDevice;
use mipidsi::interface::SpiInterface;
use mipidsi::models::GC9A01;
use mipidsi::options::ColorInversion;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use meridian_core::config::Timing;
use meridian_core::state::AppState;
use meridian_hal_rp2040::Rp2040FlashStorage;

use crate::clock::SystemClock;
use crate::config::ConfigPersistence;
use crate::display::{Panel, SharedDisplay};
use crate::wifi::WifiLink;

mod channels;
mod clock;
mod config;
mod display;
mod ntp;
mod tasks;
mod wifi;

// Heap for the timezone rules
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 16KB
const HEAP_SIZE: usize = 16 * 1024;

/// Embedded default configuration (compiled into firmware)
/// Edit clock.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../clock.toml");

/// SPI clock for the panel
const DISPLAY_SPI_HZ: u32 = 62_500_000;

/// Network stack seed, mixed with the boot time
const NET_SEED: u64 = 0x4d45_5249_4449_414e;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

// Static cells (must live forever for task references)
static APP_STATE: StaticCell<AppState> = StaticCell::new();
static DISPLAY: StaticCell<SharedDisplay> = StaticCell::new();
static DISPLAY_BUFFER: StaticCell<[u8; 512]> = StaticCell::new();
static CLOCK: StaticCell<SystemClock> = StaticCell::new();
static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();
static NET_RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Meridian firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let app_state: &'static AppState = APP_STATE.init(AppState::new(Timing::DEFAULT));

    // Configuration: flash first, then the embedded defaults
    let mut persistence = ConfigPersistence::new(Rp2040FlashStorage::new(p.FLASH, p.DMA_CH2));
    let config = persistence.load_or_default(EMBEDDED_CONFIG).await;
    let clock: &'static SystemClock = CLOCK.init(SystemClock::new(config.timezone()));

    // Display: GC9A01 on SPI1 (SCK=GPIO10, MOSI=GPIO11, CS=GPIO9, DC=GPIO8,
    // RST=GPIO12, backlight=GPIO13)
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = DISPLAY_SPI_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, spi_config);
    let cs = Output::new(p.PIN_9, Level::High);
    let dc = Output::new(p.PIN_8, Level::Low);
    let rst = Output::new(p.PIN_12, Level::High);
    let _backlight = Output::new(p.PIN_13, Level::High);

    let spi_device = ExclusiveDevice::new_no_delay(spi, cs).unwrap();
    let interface = SpiInterface::new(spi_device, dc, DISPLAY_BUFFER.init([0; 512]));
    let panel = match mipidsi::Builder::new(GC9A01, interface)
        .reset_pin(rst)
        .display_size(240, 240)
        .invert_colors(ColorInversion::Inverted)
        .init(&mut Delay)
    {
        Ok(panel) => panel,
        Err(_) => defmt::panic!("Display init failed"),
    };
    let display: &'static SharedDisplay = DISPLAY.init(Mutex::new(Panel::new(panel)));
    info!("Display initialized");

    // Button on GPIO15, active low
    let button = Input::new(p.PIN_15, Pull::Up);

    // WiFi: CYW43439 over PIO SPI (PWR=GPIO23, CS=GPIO25, DIO=GPIO24, CLK=GPIO29)
    let fw = include_bytes!("../cyw43-firmware/43439A0.bin");
    let clm = include_bytes!("../cyw43-firmware/43439A0_clm.bin");

    let pwr = Output::new(p.PIN_23, Level::Low);
    let wifi_cs = Output::new(p.PIN_25, Level::High);
    let mut pio = Pio::new(p.PIO0, Irqs);
    let wifi_spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        wifi_cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );

    let state = CYW43_STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, wifi_spi, fw).await;
    spawner.spawn(tasks::cyw43_task(runner)).unwrap();

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;
    info!("WiFi chip initialized");

    let seed = NET_SEED ^ embassy_time::Instant::now().as_ticks();
    let (stack, net_runner) = embassy_net::new(
        net_device,
        embassy_net::Config::dhcpv4(Default::default()),
        NET_RESOURCES.init(StackResources::new()),
        seed,
    );
    spawner.spawn(tasks::net_task(net_runner)).unwrap();

    let configured = config.is_wifi_configured();
    let link = WifiLink::new(control, stack, &config);

    // Spawn tasks
    spawner
        .spawn(tasks::startup_task(app_state, display))
        .unwrap();
    spawner
        .spawn(tasks::render_task(app_state, display, clock, config.face))
        .unwrap();
    spawner
        .spawn(tasks::link_task(app_state, link, configured))
        .unwrap();
    spawner
        .spawn(tasks::sync_task(app_state, stack, clock, config.ntp_server.clone()))
        .unwrap();
    spawner
        .spawn(tasks::button_task(app_state, button, persistence, config))
        .unwrap();

    info!("All tasks spawned, clock running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
