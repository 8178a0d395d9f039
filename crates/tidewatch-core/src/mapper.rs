//! Slider value to timestamp mapping.
//!
//! A single scalar drives the whole playback. Two domains are supported:
//!
//! - **Percentage** `[0, 100]`: a fraction of the recorded window, with 100
//!   as the live pivot. There is no forecast half.
//! - **Signed offset** `[-H, +H]` hours: 0 is live, negative values replay the
//!   recorded window, positive values are the forecast. The source timestamp
//!   used for lookups is clamped into the window, while the display timestamp
//!   keeps moving so the forecast shows future wall-clock times.

use chrono::{DateTime, Utc};
use tidewatch_types::{PlaybackMode, TimelineWindow};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Errors raised by [`TemporalMapper::map`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MapperError {
    /// The slider value lies outside the configured domain (or is NaN).
    #[error("slider value {value} outside domain [{min}, {max}]")]
    OutOfDomain {
        /// The offending value.
        value: f64,
        /// Domain minimum.
        min: f64,
        /// Domain maximum.
        max: f64,
    },
}

/// The closed range of valid slider values and its live pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderDomain {
    /// Smallest valid value.
    pub min: f64,
    /// Largest valid value.
    pub max: f64,
    /// The value that means "live".
    pub live: f64,
}

impl SliderDomain {
    /// Whether `value` lies inside the domain. NaN never does.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Timestamps derived from one slider value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappedTime {
    /// Timestamp used for track and timeline lookups, inside the window.
    pub source_timestamp: f64,
    /// Timestamp shown to the user.
    pub display_timestamp: f64,
    /// The slider sits on the live pivot.
    pub is_live: bool,
    /// The slider is in the forecast half.
    pub is_future: bool,
}

/// Maps slider values onto the recorded window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemporalMapper {
    mode: PlaybackMode,
    horizon_hours: f64,
}

impl TemporalMapper {
    /// Create a mapper. `horizon_hours` is only used in signed-offset mode.
    pub const fn new(mode: PlaybackMode, horizon_hours: f64) -> Self {
        Self {
            mode,
            horizon_hours,
        }
    }

    /// The valid slider range for the configured mode.
    pub fn domain(&self) -> SliderDomain {
        match self.mode {
            PlaybackMode::Percentage => SliderDomain {
                min: 0.0,
                max: 100.0,
                live: 100.0,
            },
            PlaybackMode::SignedOffset => SliderDomain {
                min: -self.horizon_hours,
                max: self.horizon_hours,
                live: 0.0,
            },
        }
    }

    /// Clamp `value` into the domain. NaN maps to the live pivot.
    pub fn clamp_to_domain(&self, value: f64) -> f64 {
        let domain = self.domain();
        if value.is_nan() {
            return domain.live;
        }
        value.clamp(domain.min, domain.max)
    }

    /// Map a slider value onto `window`.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::OutOfDomain`] if `value` lies outside
    /// [`domain`](Self::domain).
    pub fn map(&self, value: f64, window: &TimelineWindow) -> Result<MappedTime, MapperError> {
        let domain = self.domain();
        if !domain.contains(value) {
            return Err(MapperError::OutOfDomain {
                value,
                min: domain.min,
                max: domain.max,
            });
        }
        Ok(self.map_unchecked(value, window))
    }

    /// Clamp `value` into the domain, then map it. Never fails.
    pub fn map_clamped(&self, value: f64, window: &TimelineWindow) -> MappedTime {
        self.map_unchecked(self.clamp_to_domain(value), window)
    }

    fn map_unchecked(&self, value: f64, window: &TimelineWindow) -> MappedTime {
        match self.mode {
            PlaybackMode::Percentage => {
                let fraction = value / 100.0;
                // Endpoint-exact: 0 gives window_start, 100 gives window_end.
                let timestamp = window
                    .window_start
                    .mul_add(1.0 - fraction, window.window_end * fraction);
                MappedTime {
                    source_timestamp: timestamp,
                    display_timestamp: timestamp,
                    is_live: value >= 100.0,
                    is_future: false,
                }
            }
            PlaybackMode::SignedOffset => {
                let offset = value * SECONDS_PER_HOUR;
                let lookback = self.horizon_hours * SECONDS_PER_HOUR;
                MappedTime {
                    source_timestamp: window.clamp(window.window_end - lookback + offset),
                    display_timestamp: window.window_end + offset,
                    is_live: value == 0.0,
                    is_future: value > 0.0,
                }
            }
        }
    }
}

/// Convert unix seconds to a UTC datetime, if representable.
#[allow(clippy::cast_possible_truncation)]
pub fn to_datetime(timestamp: f64) -> Option<DateTime<Utc>> {
    if !timestamp.is_finite() {
        return None;
    }
    let millis = (timestamp * 1000.0).round();
    // i64 millis cover far more than chrono's representable range.
    if millis.abs() >= 9.0e18 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

/// Human-readable label for a mapped time.
///
/// `LIVE` on the pivot, otherwise `YYYY-MM-DD HH:MM UTC`, with a
/// ` (FORECAST)` suffix in the forecast half.
pub fn display_label(mapped: &MappedTime) -> String {
    if mapped.is_live {
        return "LIVE".to_owned();
    }
    let base = to_datetime(mapped.display_timestamp).map_or_else(
        || "UNKNOWN TIME".to_owned(),
        |dt| dt.format("%Y-%m-%d %H:%M UTC").to_string(),
    );
    if mapped.is_future {
        format!("{base} (FORECAST)")
    } else {
        base
    }
}
