//! Wi-Fi bring-up and network-backed data sources
//!
//! The CYW43 chip and the embassy-net stack each need a runner task. The
//! dashboard owns a `WifiLink` and rejoins through it whenever a network job
//! is due while the link is down; the jobs themselves go through
//! `NtpTimeSource` and `HttpsWeather`.

pub mod ntp;
pub mod weather;

use cyw43::JoinOptions;
use cyw43_pio::PioSpi;
use defmt::*;
use embassy_net::Stack;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::{DMA_CH0, PIO0};
use embassy_time::{with_timeout, Duration, Timer};

use thermoportal_core::traits::{LinkError, NetworkLink};

pub use ntp::NtpTimeSource;
pub use weather::HttpsWeather;

/// Wi-Fi join attempts before giving up
const WIFI_MAX_RETRIES: u8 = 5;

/// Delay between join attempts
const WIFI_RETRY_DELAY_SECS: u64 = 2;

/// Time allowed for link-up and for DHCP, each
const LINK_TIMEOUT_SECS: u64 = 15;

/// CYW43 Wi-Fi chip runner
#[embassy_executor::task]
pub async fn cyw43_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

/// Network stack runner
#[embassy_executor::task]
pub async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}

/// Wi-Fi connection owned by the control loop
pub struct WifiLink {
    control: cyw43::Control<'static>,
    stack: Stack<'static>,
    ssid: &'static str,
    password: &'static str,
}

impl WifiLink {
    pub fn new(
        control: cyw43::Control<'static>,
        stack: Stack<'static>,
        ssid: &'static str,
        password: &'static str,
    ) -> Self {
        Self {
            control,
            stack,
            ssid,
            password,
        }
    }
}

impl NetworkLink for WifiLink {
    fn is_up(&self) -> bool {
        self.stack.is_link_up() && self.stack.config_v4().is_some()
    }

    async fn connect(&mut self) -> Result<(), LinkError> {
        info!("Connecting to WiFi: {}", self.ssid);

        let mut last_status = 0;
        let mut joined = false;
        for attempt in 1..=WIFI_MAX_RETRIES {
            match self
                .control
                .join(self.ssid, JoinOptions::new(self.password.as_bytes()))
                .await
            {
                Ok(()) => {
                    joined = true;
                    break;
                }
                Err(e) => {
                    warn!(
                        "WiFi join attempt {}/{} failed: status={}",
                        attempt, WIFI_MAX_RETRIES, e.status
                    );
                    last_status = e.status;
                    if attempt < WIFI_MAX_RETRIES {
                        Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                    }
                }
            }
        }
        if !joined {
            return Err(LinkError::JoinFailed(last_status));
        }

        let timeout = Duration::from_secs(LINK_TIMEOUT_SECS);
        with_timeout(timeout, self.stack.wait_link_up())
            .await
            .map_err(|_| LinkError::LinkTimeout)?;
        with_timeout(timeout, self.stack.wait_config_up())
            .await
            .map_err(|_| LinkError::DhcpTimeout)?;

        if let Some(config) = self.stack.config_v4() {
            info!("WiFi connected, IP: {}", config.address);
        }
        Ok(())
    }
}
