// Time axis generation for chart labels
use chrono::{DateTime, Duration, FixedOffset, Offset, TimeZone, Utc};
use std::fmt;

pub const DEFAULT_SAMPLES_PER_HOUR: u32 = 4;
pub const MS_PER_HOUR: i64 = 3_600_000;

const LABEL_FORMAT: &str = "%m/%d %H:%M";

/// Axis label for one sample slot. `text` is the display and join key, it
/// carries no year or seconds. `time_ms` is the instant it was rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLabel {
    pub text: String,
    pub time_ms: i64,
}

impl TimeLabel {
    pub fn new(text: String, time_ms: i64) -> Self {
        Self { text, time_ms }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("window of {hours}h is outside 1..={max}h")]
    Hours { hours: u32, max: u32 },
    #[error("{0} samples per hour does not divide an hour into whole minutes")]
    Density(u32),
}

/// Validated lookback window and sampling density.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingWindow {
    hours: u32,
    samples_per_hour: u32,
}

impl SamplingWindow {
    pub fn new(hours: u32, samples_per_hour: u32, max_hours: u32) -> Result<Self, WindowError> {
        if hours == 0 || hours > max_hours {
            return Err(WindowError::Hours { hours, max: max_hours });
        }
        if samples_per_hour == 0 || 60 % samples_per_hour != 0 {
            return Err(WindowError::Density(samples_per_hour));
        }
        Ok(Self {
            hours,
            samples_per_hour,
        })
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn samples_per_hour(&self) -> u32 {
        self.samples_per_hour
    }

    pub fn sample_count(&self) -> usize {
        self.hours as usize * self.samples_per_hour as usize
    }

    pub fn labels<Tz>(&self, now: &DateTime<Tz>) -> Vec<TimeLabel>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        generate_labels(now, self.hours, self.samples_per_hour)
    }
}

/// Clock that renders labels at a fixed UTC offset. A fixed offset has no
/// daylight-saving jumps, so label text stays unique within one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayClock {
    offset: FixedOffset,
}

impl DisplayClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Milliseconds between two consecutive labels.
pub fn sample_interval_ms(samples_per_hour: u32) -> i64 {
    MS_PER_HOUR / i64::from(samples_per_hour.max(1))
}

/// Labels for the `window_hours` ending at `now`, oldest first.
///
/// Returns an empty vector when `window_hours * samples_per_hour` is zero.
/// Callers are expected to pass a `samples_per_hour` that divides 60 so the
/// labels land on whole minutes.
pub fn generate_labels<Tz>(now: &DateTime<Tz>, window_hours: u32, samples_per_hour: u32) -> Vec<TimeLabel>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let total = window_hours as usize * samples_per_hour as usize;
    if total == 0 {
        return Vec::new();
    }

    let interval = sample_interval_ms(samples_per_hour);
    (0..total)
        .map(|i| {
            let steps_back = (total - 1 - i) as i64;
            let at = now.clone() - Duration::milliseconds(steps_back * interval);
            TimeLabel::new(at.format(LABEL_FORMAT).to_string(), at.timestamp_millis())
        })
        .collect()
}
