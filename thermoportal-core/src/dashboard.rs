//! Dashboard control loop body
//!
//! One call to [`Dashboard::step`] is one iteration of the device's main
//! loop: refresh the indoor reading, sync the clock when due, fetch the
//! weather when due. Each due network job first brings the link back up if
//! it dropped. A failed job ends the iteration early with an error; its
//! timer is left untouched so the next iteration retries it.

use core::fmt::Write;

use heapless::String;
use thermoportal_display::label::LABEL_LEN;
use thermoportal_display::{text_box, DisplayError, Screen, TemperaturePanel, ViewId, LINE_HEIGHT};

use crate::clock::WallClock;
use crate::config::{
    CLOCK_SYNC_INTERVAL_MS, HEADING_MAX_CHARS, OUTDOOR_Y, TABS_X, TABS_Y,
    WEATHER_REFRESH_INTERVAL_MS,
};
use crate::refresh::RefreshTimer;
use crate::traits::{
    ClockError, LinkError, NetworkLink, SensorError, TemperatureSensor, TimeSource, WeatherError,
    WeatherSource,
};
use crate::units::{celsius_x128_to_fahrenheit, Tenths};
use crate::weather::CurrentConditions;

/// Heading of the indoor reading
pub const INDOOR_TITLE: &str = "Indoor Temperature:";

/// Heading of the outdoor reading
pub const OUTDOOR_TITLE: &str = "Outdoor Temperature:";

/// Errors that end a loop iteration early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepError {
    /// Network link could not be brought up for a due job
    Link(LinkError),
    /// Clock sync failed; weather was not attempted
    TimeSync(ClockError),
    /// Weather fetch failed
    Weather(WeatherError),
    /// A label could not be updated
    Display(DisplayError),
}

impl From<DisplayError> for StepError {
    fn from(e: DisplayError) -> Self {
        StepError::Display(e)
    }
}

/// What happened during a successful iteration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepReport {
    /// Indoor reading in whole Fahrenheit, if the sensor answered
    pub indoor_f: Option<i16>,
    /// Whether the link had to be rejoined this iteration
    pub reconnected: bool,
    /// Why there is no indoor reading (None also when no sensor is fitted)
    pub sensor_error: Option<SensorError>,
    /// Unix time received, if the clock was synced this iteration
    pub clock_synced: Option<u64>,
    /// Conditions received, if the weather was fetched this iteration
    pub weather: Option<CurrentConditions>,
}

/// Label handles for the dashboard view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DashboardLayout {
    /// View holding both panels
    pub view: ViewId,
    /// Indoor temperature panel
    pub indoor: TemperaturePanel,
    /// Outdoor temperature panel
    pub outdoor: TemperaturePanel,
}

impl DashboardLayout {
    /// Build the dashboard view on `screen` and show it
    ///
    /// Both panel headings are laid out as empty text boxes, leaving the
    /// data labels to carry the titles.
    pub fn build(screen: &mut Screen) -> Result<Self, DisplayError> {
        let view = screen.add_view()?;
        let outdoor = TemperaturePanel::new(screen, view, TABS_X, OUTDOOR_Y)?;
        let indoor = TemperaturePanel::new(screen, view, TABS_X, TABS_Y)?;
        screen.show(view)?;

        for (panel, top) in [(indoor, TABS_Y), (outdoor, OUTDOOR_Y)] {
            let heading = screen
                .label_mut(panel.heading)
                .ok_or(DisplayError::NotFound)?;
            text_box(heading, top, "", HEADING_MAX_CHARS, LINE_HEIGHT)?;
        }

        Ok(Self {
            view,
            indoor,
            outdoor,
        })
    }
}

/// Indoor panel text for a reading in whole Fahrenheit
pub fn indoor_text(fahrenheit: Option<i16>) -> String<LABEL_LEN> {
    let mut text = String::new();
    // Both variants fit well within LABEL_LEN
    let _ = match fahrenheit {
        Some(f) => write!(text, "{}\n{}°F", INDOOR_TITLE, f),
        None => write!(text, "{}\n--°F", INDOOR_TITLE),
    };
    text
}

/// Outdoor panel text for a reading in Fahrenheit tenths
pub fn outdoor_text(f_x10: i16) -> String<LABEL_LEN> {
    let mut text = String::new();
    let _ = write!(text, "{}\n{}°F", OUTDOOR_TITLE, Tenths(f_x10));
    text
}

/// The device's control loop state
pub struct Dashboard<S, L, W, T> {
    sensor: Option<S>,
    link: L,
    weather: W,
    time: T,
    layout: DashboardLayout,
    clock_timer: RefreshTimer,
    weather_timer: RefreshTimer,
    wall_clock: Option<WallClock>,
}

impl<S, L, W, T> Dashboard<S, L, W, T>
where
    S: TemperatureSensor,
    L: NetworkLink,
    W: WeatherSource,
    T: TimeSource,
{
    /// Create a dashboard; both network jobs are due on the first step
    ///
    /// `sensor` is `None` on boards without an indoor sensor fitted. The
    /// link may start down; it is joined when the first job runs.
    pub fn new(
        sensor: Option<S>,
        link: L,
        weather: W,
        time: T,
        layout: DashboardLayout,
    ) -> Self {
        Self {
            sensor,
            link,
            weather,
            time,
            layout,
            clock_timer: RefreshTimer::new(CLOCK_SYNC_INTERVAL_MS),
            weather_timer: RefreshTimer::new(WEATHER_REFRESH_INTERVAL_MS),
            wall_clock: None,
        }
    }

    /// Run one loop iteration at uptime `now_ms`
    pub async fn step(&mut self, now_ms: u64, screen: &mut Screen) -> Result<StepReport, StepError> {
        let mut report = StepReport::default();

        match self.sensor.as_mut().map(|s| s.read_celsius_x128()) {
            Some(Ok(c_x128)) => report.indoor_f = Some(celsius_x128_to_fahrenheit(c_x128)),
            Some(Err(e)) => report.sensor_error = Some(e),
            None => {}
        }
        screen.set_text(self.layout.indoor.data, &indoor_text(report.indoor_f))?;

        if self.clock_timer.is_due(now_ms) {
            self.ensure_link(&mut report).await?;
            let unix = self.time.sync().await.map_err(StepError::TimeSync)?;
            self.wall_clock = Some(WallClock::new(unix, now_ms));
            self.clock_timer.mark(now_ms);
            report.clock_synced = Some(unix);
        }

        if self.weather_timer.is_due(now_ms) {
            self.ensure_link(&mut report).await?;
            let conditions = self
                .weather
                .fetch_current()
                .await
                .map_err(StepError::Weather)?;
            screen.set_text(self.layout.outdoor.data, &outdoor_text(conditions.temp_f_x10))?;
            self.weather_timer.mark(now_ms);
            report.weather = Some(conditions);
        }

        Ok(report)
    }

    /// Rejoin the network if the link dropped
    async fn ensure_link(&mut self, report: &mut StepReport) -> Result<(), StepError> {
        if self.link.is_up() {
            return Ok(());
        }
        self.link.connect().await.map_err(StepError::Link)?;
        report.reconnected = true;
        Ok(())
    }

    /// Wall clock from the last successful sync
    pub fn wall_clock(&self) -> Option<&WallClock> {
        self.wall_clock.as_ref()
    }

    /// How old the outdoor reading on screen is, if there is one
    pub fn outdoor_age_ms(&self, now_ms: u64) -> Option<u64> {
        self.weather_timer
            .last_refresh()
            .map(|last| now_ms.saturating_sub(last))
    }
}
