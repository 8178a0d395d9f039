//! Recorded vessel tracks and environment timeline.
//!
//! The [`TrackStore`] is loaded once per session from the historian's JSON
//! document and never mutated afterwards. Loading validates every invariant
//! the playback engine relies on, so a store that exists is always safe to
//! query:
//!
//! - `window_start < window_end`, both finite
//! - every track has at least two points, ordered by non-decreasing timestamp
//! - every snapshot lies inside the window, in non-decreasing order, with a
//!   traffic density in `[0, 100]`

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;
use tidewatch_types::{BridgeState, EnvironmentSnapshot, TimelineWindow, TrackPoint, VesselTrack};
use tracing::{debug, info};

use crate::error::HistoryError;

/// Status used for recorded points that carry none.
const UNKNOWN_STATUS: &str = "UNKNOWN";

/// Upper bound of the traffic density scale.
const MAX_TRAFFIC_DENSITY: f64 = 100.0;

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// The historian's 24h history document, as received.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHistory {
    /// First recorded instant, unix seconds.
    pub window_start: f64,
    /// Last recorded instant, unix seconds.
    pub window_end: f64,
    /// Per-vessel paths.
    pub ships: Vec<RawShip>,
    /// Environment snapshots.
    #[serde(default)]
    pub timeline: Vec<RawSnapshot>,
}

/// One vessel path in a [`RawHistory`].
#[derive(Debug, Clone, Deserialize)]
pub struct RawShip {
    /// Vessel name.
    pub id: String,
    /// Vessel type.
    #[serde(rename = "type", default = "default_vessel_type")]
    pub vessel_type: String,
    /// IMO number; an empty string means unknown.
    #[serde(default)]
    pub imo: Option<String>,
    /// MMSI number; an empty string means unknown.
    #[serde(default)]
    pub mmsi: Option<String>,
    /// Recorded positions.
    pub path: Vec<RawPoint>,
}

/// One recorded position in a [`RawShip`] path.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPoint {
    /// Unix seconds.
    pub ts: f64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Navigational status.
    #[serde(default)]
    pub status: Option<String>,
}

/// One environment snapshot in a [`RawHistory`].
#[derive(Debug, Clone, Deserialize)]
pub struct RawSnapshot {
    /// Unix seconds.
    pub ts: f64,
    /// Bridge name to state.
    #[serde(default)]
    pub bridges: BTreeMap<String, BridgeState>,
    /// Road traffic density.
    #[serde(default)]
    pub traffic_density: f64,
    /// Weather condition tag.
    #[serde(default = "default_weather")]
    pub weather: String,
    /// Active obstacle warnings.
    #[serde(default)]
    pub obstacles: Vec<String>,
}

fn default_vessel_type() -> String {
    String::from("Unknown")
}

fn default_weather() -> String {
    String::from("CLEAR")
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Immutable, validated recorded history for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackStore {
    window: TimelineWindow,
    tracks: Vec<VesselTrack>,
    timeline: Vec<EnvironmentSnapshot>,
}

impl TrackStore {
    /// Validate a parsed history document and build the store.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::DataFormat`] if the window bounds are
    /// inconsistent, a track has fewer than two points or goes back in time,
    /// a vessel id repeats, or a snapshot violates the timeline invariants.
    pub fn load(raw: RawHistory) -> Result<Self, HistoryError> {
        let window = validate_window(raw.window_start, raw.window_end)?;

        let mut seen = BTreeSet::new();
        let mut tracks = Vec::with_capacity(raw.ships.len());
        for ship in raw.ships {
            if !seen.insert(ship.id.clone()) {
                return Err(HistoryError::data_format(format!(
                    "duplicate vessel id {:?}",
                    ship.id
                )));
            }
            tracks.push(convert_track(ship)?);
        }

        let mut timeline = Vec::with_capacity(raw.timeline.len());
        let mut previous: Option<f64> = None;
        for snapshot in raw.timeline {
            let converted = convert_snapshot(snapshot, &window)?;
            if previous.is_some_and(|prev| converted.timestamp < prev) {
                return Err(HistoryError::data_format(format!(
                    "timeline goes back in time at ts {}",
                    converted.timestamp
                )));
            }
            previous = Some(converted.timestamp);
            timeline.push(converted);
        }

        info!(
            window_start = window.window_start,
            window_end = window.window_end,
            tracks = tracks.len(),
            snapshots = timeline.len(),
            "Track store loaded"
        );

        Ok(Self {
            window,
            tracks,
            timeline,
        })
    }

    /// Parse the historian's JSON document and load it.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::DataFormat`] if the JSON is invalid, misses a
    /// required field, or fails [`load`](Self::load) validation.
    pub fn from_json(json: &str) -> Result<Self, HistoryError> {
        let raw: RawHistory = serde_json::from_str(json)
            .map_err(|e| HistoryError::data_format(format!("invalid history document: {e}")))?;
        Self::load(raw)
    }

    /// Read and load a history file.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Io`] if the file cannot be read, otherwise
    /// the errors of [`from_json`](Self::from_json).
    pub fn from_file(path: &Path) -> Result<Self, HistoryError> {
        let contents = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), bytes = contents.len(), "History file read");
        Self::from_json(&contents)
    }

    /// The recorded window.
    pub const fn window(&self) -> TimelineWindow {
        self.window
    }

    /// All recorded vessel tracks.
    pub fn tracks(&self) -> &[VesselTrack] {
        &self.tracks
    }

    /// The environment timeline in chronological order.
    pub fn timeline(&self) -> &[EnvironmentSnapshot] {
        &self.timeline
    }

    /// Find a vessel by name (case-insensitive), IMO, or MMSI.
    pub fn find_vessel(&self, identifier: &str) -> Option<&VesselTrack> {
        let needle = identifier.trim();
        self.tracks.iter().find(|track| {
            track.id.eq_ignore_ascii_case(needle)
                || track.imo.as_deref() == Some(needle)
                || track.mmsi.as_deref() == Some(needle)
        })
    }
}

fn validate_window(start: f64, end: f64) -> Result<TimelineWindow, HistoryError> {
    if !start.is_finite() || !end.is_finite() {
        return Err(HistoryError::data_format(format!(
            "window bounds must be finite (start {start}, end {end})"
        )));
    }
    if start >= end {
        return Err(HistoryError::data_format(format!(
            "window_start {start} must be before window_end {end}"
        )));
    }
    Ok(TimelineWindow {
        window_start: start,
        window_end: end,
    })
}

fn convert_track(ship: RawShip) -> Result<VesselTrack, HistoryError> {
    if ship.path.len() < 2 {
        return Err(HistoryError::data_format(format!(
            "track {:?} has {} point(s), at least 2 are required",
            ship.id,
            ship.path.len()
        )));
    }

    let mut points: Vec<TrackPoint> = Vec::with_capacity(ship.path.len());
    for raw in ship.path {
        if !raw.ts.is_finite() || !raw.lat.is_finite() || !raw.lng.is_finite() {
            return Err(HistoryError::data_format(format!(
                "track {:?} has a non-finite point at ts {}",
                ship.id, raw.ts
            )));
        }
        if points.last().is_some_and(|prev| raw.ts < prev.timestamp) {
            return Err(HistoryError::data_format(format!(
                "track {:?} goes back in time at ts {}",
                ship.id, raw.ts
            )));
        }
        points.push(TrackPoint {
            timestamp: raw.ts,
            lat: raw.lat,
            lng: raw.lng,
            status: raw.status.unwrap_or_else(|| UNKNOWN_STATUS.to_owned()),
        });
    }

    Ok(VesselTrack {
        id: ship.id,
        vessel_type: ship.vessel_type,
        imo: non_empty(ship.imo),
        mmsi: non_empty(ship.mmsi),
        points,
    })
}

fn convert_snapshot(
    raw: RawSnapshot,
    window: &TimelineWindow,
) -> Result<EnvironmentSnapshot, HistoryError> {
    if !window.contains(raw.ts) {
        return Err(HistoryError::data_format(format!(
            "snapshot at ts {} lies outside the window [{}, {}]",
            raw.ts, window.window_start, window.window_end
        )));
    }
    if !(0.0..=MAX_TRAFFIC_DENSITY).contains(&raw.traffic_density) {
        return Err(HistoryError::data_format(format!(
            "snapshot at ts {} has traffic density {} outside [0, 100]",
            raw.ts, raw.traffic_density
        )));
    }
    Ok(EnvironmentSnapshot {
        timestamp: raw.ts,
        bridges: raw.bridges,
        traffic_density: raw.traffic_density,
        weather: raw.weather,
        obstacles: raw.obstacles.into_iter().collect(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
