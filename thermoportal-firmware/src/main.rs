//! Thermoportal - Indoor/Outdoor Temperature Display Firmware
//!
//! Firmware for a Raspberry Pi Pico W driving a 320x240 ILI9341 panel.
//! Shows the local ADT7410 reading next to the outdoor temperature fetched
//! from weatherapi.com, refreshed on fixed intervals.

#![no_std]
#![no_main]

extern crate alloc;

use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::*;
use embassy_executor::Spawner;
use embassy_net::{Config, StackResources};
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::spi::{self, Spi};
use embassy_time::Timer;
use embedded_alloc::LlffHeap as Heap;
use static_cell::{ConstStaticCell, StaticCell};
use {defmt_rtt as _, panic_probe as _};

use thermoportal_core::config::{ADT7410_ADDRESS, DEFAULT_BACKLIGHT, SCREEN_HEIGHT, SCREEN_WIDTH};
use thermoportal_core::dashboard::DashboardLayout;
use thermoportal_core::Dashboard;
use thermoportal_display::{color, Backlight, DisplayBackend, Screen};
use thermoportal_drivers::sensor::Adt7410;

use crate::display::{BacklightPwm, SPI_BUFFER_LEN, SPI_FREQUENCY_HZ};
use crate::net::weather::HttpsBuffers;
use crate::net::{HttpsWeather, NtpTimeSource, WifiLink};

mod controller;
mod display;
mod net;
mod secrets;

// Heap allocator for JSON parsing
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 16KB
const HEAP_SIZE: usize = 16 * 1024;

/// Settle time between the loading screen and network bring-up
const BOOT_SETTLE_MS: u64 = 1_000;

/// I2C bus speed for the ADT7410
const I2C_FREQUENCY_HZ: u32 = 100_000;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();
static NET_RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();
static SPI_BUFFER: StaticCell<[u8; SPI_BUFFER_LEN]> = StaticCell::new();
static HTTPS_BUFFERS: ConstStaticCell<HttpsBuffers> = ConstStaticCell::new(HttpsBuffers::new());

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Thermoportal firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Backlight on GPIO16 (PWM slice 0, channel A)
    let mut backlight = BacklightPwm::new(Pwm::new_output_a(
        p.PWM_SLICE0,
        p.PIN_16,
        pwm::Config::default(),
    ));
    backlight.set(Backlight::new(DEFAULT_BACKLIGHT));

    // Panel on SPI1: SCK=GPIO10, MOSI=GPIO11, MISO=GPIO12, CS=GPIO13, DC=GPIO14, RST=GPIO15
    let mut spi_config = spi::Config::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    let spi = Spi::new_blocking(p.SPI1, p.PIN_10, p.PIN_11, p.PIN_12, spi_config);
    let cs = Output::new(p.PIN_13, Level::High);
    let dc = Output::new(p.PIN_14, Level::Low);
    let reset = Output::new(p.PIN_15, Level::High);
    let mut backend = unwrap!(display::init_panel(
        spi,
        cs,
        dc,
        reset,
        SPI_BUFFER.init([0; SPI_BUFFER_LEN]),
    ));
    let (width, height) = backend.dimensions();
    if (width, height) != (SCREEN_WIDTH, SCREEN_HEIGHT) {
        warn!(
            "Panel is {}x{}, layout expects {}x{}",
            width, height, SCREEN_WIDTH, SCREEN_HEIGHT
        );
    }
    info!("Display initialized");

    let mut screen = Screen::new(color::BLACK);
    let layout = unwrap!(DashboardLayout::build(&mut screen));
    if let Err(e) = screen.render(&mut backend) {
        warn!("Initial render failed: {}", e);
    }
    Timer::after_millis(BOOT_SETTLE_MS).await;

    // ADT7410 on I2C0: SDA=GPIO4, SCL=GPIO5
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);
    let sensor = probe_sensor(Adt7410::new(i2c, ADT7410_ADDRESS));

    // CYW43 over PIO0: PWR=GPIO23, DIO=GPIO24, CS=GPIO25, CLK=GPIO29
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
    spawner.spawn(net::cyw43_task(runner)).unwrap();

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    let mut rng = RoscRng;
    let net_seed = rng.next_u64();
    let tls_seed = rng.next_u64();

    let (stack, runner) = embassy_net::new(
        net_device,
        Config::dhcpv4(Default::default()),
        NET_RESOURCES.init(StackResources::new()),
        net_seed,
    );
    spawner.spawn(net::net_task(runner)).unwrap();

    // Joined by the control loop before its first network job
    let link = WifiLink::new(control, stack, secrets::WIFI_SSID, secrets::WIFI_PASSWORD);
    let weather = HttpsWeather::new(
        stack,
        HTTPS_BUFFERS.take(),
        secrets::WEATHER_API_KEY,
        tls_seed,
    );
    let time = NtpTimeSource::new(stack);
    let dashboard = Dashboard::new(sensor, link, weather, time, layout);

    controller::run(dashboard, screen, backend).await
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

/// Check the ADT7410 is fitted and switch it to 16-bit mode
fn probe_sensor<I2C: embedded_hal::i2c::I2c>(mut sensor: Adt7410<I2C>) -> Option<Adt7410<I2C>> {
    if let Err(e) = sensor.probe() {
        warn!("ADT7410 not found, indoor reading disabled: {}", e);
        return None;
    }
    match sensor.set_high_resolution(true) {
        Ok(()) => {
            info!("ADT7410 initialized (16-bit)");
            Some(sensor)
        }
        Err(e) => {
            warn!("ADT7410 config failed, using 13-bit mode: {}", e);
            Some(sensor)
        }
    }
}
