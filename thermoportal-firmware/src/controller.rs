//! The dashboard control loop
//!
//! Runs forever on the main task. Every iteration reads the sensor,
//! refreshes whatever network data is due and repaints changed labels.
//! Failures are logged and the next iteration starts after the usual
//! period.

use defmt::*;
use embassy_time::{Instant, Timer};

use thermoportal_core::config::LOOP_PERIOD_MS;
use thermoportal_core::traits::{NetworkLink, TemperatureSensor, TimeSource, WeatherSource};
use thermoportal_core::units::Tenths;
use thermoportal_core::{Dashboard, StepReport};
use thermoportal_display::{DisplayBackend, Screen};

/// Drive the dashboard until power-off
pub async fn run<S, L, W, T, B>(
    mut dashboard: Dashboard<S, L, W, T>,
    mut screen: Screen,
    mut backend: B,
) -> !
where
    S: TemperatureSensor,
    L: NetworkLink,
    W: WeatherSource,
    T: TimeSource,
    B: DisplayBackend,
{
    info!("Control loop started");

    loop {
        let now_ms = Instant::now().as_millis();

        match dashboard.step(now_ms, &mut screen).await {
            Ok(report) => log_report(&dashboard, now_ms, &report),
            Err(e) => {
                warn!("Loop iteration failed, retrying: {}", e);
                if let Some(age_ms) = dashboard.outdoor_age_ms(now_ms) {
                    debug!("Outdoor reading is {}s old", age_ms / 1000);
                }
            }
        }

        if let Err(e) = screen.render(&mut backend) {
            warn!("Render failed: {}", e);
        }

        Timer::after_millis(LOOP_PERIOD_MS).await;
    }
}

fn log_report<S, L, W, T>(dashboard: &Dashboard<S, L, W, T>, now_ms: u64, report: &StepReport)
where
    S: TemperatureSensor,
    L: NetworkLink,
    W: WeatherSource,
    T: TimeSource,
{
    if report.reconnected {
        info!("WiFi link rejoined");
    }

    match (report.indoor_f, report.sensor_error) {
        (Some(f), _) => trace!("Indoor: {}F", f),
        (None, Some(e)) => warn!("Indoor sensor read failed: {}", e),
        (None, None) => {}
    }

    if report.clock_synced.is_some() {
        if let Some(clock) = dashboard.wall_clock() {
            let (h, m, s) = clock.time_of_day(now_ms);
            info!("Clock synced: {:02}:{:02}:{:02} UTC", h, m, s);
        }
    }

    if let Some(weather) = &report.weather {
        info!(
            "Outdoor: {}F, {} ({})",
            Tenths(weather.temp_f_x10),
            weather.condition.as_str(),
            weather.location.as_str()
        );
    }
}
