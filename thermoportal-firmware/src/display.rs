//! TFT panel and backlight plumbing
//!
//! The panel is an ILI9341 on SPI1 driven blocking through mipidsi; the
//! screen model in `thermoportal-display` renders onto it via
//! `GraphicsBackend`.

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI1;
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use mipidsi::interface::SpiInterface;
use mipidsi::models::ILI9341Rgb565;
use mipidsi::options::{ColorOrder, Orientation, Rotation};
use mipidsi::Builder;

use thermoportal_display::{Backlight, GraphicsBackend};

/// SPI clock for the panel
pub const SPI_FREQUENCY_HZ: u32 = 40_000_000;

/// Size of the mipidsi command/pixel staging buffer
pub const SPI_BUFFER_LEN: usize = 512;

/// Backlight PWM period in counts
const BACKLIGHT_TOP: u16 = 0x8000;

pub type PanelSpi = ExclusiveDevice<Spi<'static, SPI1, Blocking>, Output<'static>, Delay>;

pub type Panel = mipidsi::Display<
    SpiInterface<'static, PanelSpi, Output<'static>>,
    ILI9341Rgb565,
    Output<'static>,
>;

/// Screen backend for the panel
pub type PanelBackend = GraphicsBackend<Panel>;

/// Panel bring-up errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum PanelError {
    /// Chip select could not be claimed
    ChipSelect,
    /// Controller init sequence failed
    Init,
}

/// Reset and configure the panel in landscape
pub fn init_panel(
    spi: Spi<'static, SPI1, Blocking>,
    cs: Output<'static>,
    dc: Output<'static>,
    reset: Output<'static>,
    buffer: &'static mut [u8; SPI_BUFFER_LEN],
) -> Result<PanelBackend, PanelError> {
    let device = ExclusiveDevice::new(spi, cs, Delay).map_err(|_| PanelError::ChipSelect)?;
    let interface = SpiInterface::new(device, dc, buffer);

    let panel = Builder::new(ILI9341Rgb565, interface)
        .reset_pin(reset)
        .orientation(Orientation::new().rotate(Rotation::Deg90))
        .color_order(ColorOrder::Bgr)
        .init(&mut Delay)
        .map_err(|_| PanelError::Init)?;

    Ok(GraphicsBackend::new(panel))
}

/// PWM-dimmed backlight
pub struct BacklightPwm {
    pwm: Pwm<'static>,
    config: pwm::Config,
}

impl BacklightPwm {
    pub fn new(pwm: Pwm<'static>) -> Self {
        let mut config = pwm::Config::default();
        config.top = BACKLIGHT_TOP;
        Self { pwm, config }
    }

    /// Apply a brightness level
    pub fn set(&mut self, level: Backlight) {
        self.config.compare_a = level.duty(self.config.top);
        self.pwm.set_config(&self.config);
    }
}
