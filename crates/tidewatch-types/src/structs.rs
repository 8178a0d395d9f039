//! Recorded-history and crisis types.
//!
//! Covers the vessel tracks and environment timeline loaded once per
//! session, the recorded window they span, and the static crisis
//! definitions together with the events they produce.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::BridgeState;

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl GeoPoint {
    /// Create a coordinate pair.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Linear interpolation towards `other`.
    ///
    /// Written as `a * (1 - t) + b * t` so that `t == 0` yields `self` and
    /// `t == 1` yields `other` bit for bit.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let keep = 1.0 - t;
        Self {
            lat: self.lat.mul_add(keep, other.lat * t),
            lng: self.lng.mul_add(keep, other.lng * t),
        }
    }
}

// ---------------------------------------------------------------------------
// Tracks
// ---------------------------------------------------------------------------

/// One recorded position of a vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TrackPoint {
    /// Unix seconds.
    pub timestamp: f64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// AIS-style navigational status (`UNDERWAY`, `MOORED`, ...).
    pub status: String,
}

impl TrackPoint {
    /// The coordinate part of the point.
    pub const fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// The recorded history of one vessel.
///
/// Points are ordered by non-decreasing timestamp. A track needs at least
/// two points to be interpolated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VesselTrack {
    /// Vessel name.
    pub id: String,
    /// Vessel type (`Container Ship`, `Tug`, ...).
    #[serde(rename = "type")]
    pub vessel_type: String,
    /// IMO number, if known.
    pub imo: Option<String>,
    /// MMSI number, if known.
    pub mmsi: Option<String>,
    /// Recorded positions.
    pub points: Vec<TrackPoint>,
}

impl VesselTrack {
    /// Timestamp of the first recorded point.
    pub fn first_timestamp(&self) -> Option<f64> {
        self.points.first().map(|p| p.timestamp)
    }

    /// Timestamp of the last recorded point.
    pub fn last_timestamp(&self) -> Option<f64> {
        self.points.last().map(|p| p.timestamp)
    }

    /// Whether the track has enough points to interpolate.
    pub fn is_interpolable(&self) -> bool {
        self.points.len() >= 2
    }
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Recorded environment state at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EnvironmentSnapshot {
    /// Unix seconds.
    pub timestamp: f64,
    /// Bridge name to bridge state.
    pub bridges: BTreeMap<String, BridgeState>,
    /// Road traffic density in `[0, 100]`.
    pub traffic_density: f64,
    /// Weather condition tag (`FOG`, `SNOW`, `CLEAR`, ...).
    pub weather: String,
    /// Active obstacle warnings.
    pub obstacles: BTreeSet<String>,
}

impl EnvironmentSnapshot {
    /// A calm snapshot with no bridge events, used before any snapshot has
    /// been resolved.
    pub fn calm(timestamp: f64) -> Self {
        Self {
            timestamp,
            bridges: BTreeMap::new(),
            traffic_density: 0.0,
            weather: String::from("CLEAR"),
            obstacles: BTreeSet::new(),
        }
    }

    /// Whether any bridge is raised in this snapshot.
    pub fn any_bridge_open(&self) -> bool {
        self.bridges.values().any(|state| state.is_open())
    }
}

/// The recorded time range `[window_start, window_end]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TimelineWindow {
    /// First recorded instant, unix seconds.
    pub window_start: f64,
    /// Last recorded instant, unix seconds.
    pub window_end: f64,
}

impl TimelineWindow {
    /// Length of the window in seconds.
    pub fn span(&self) -> f64 {
        self.window_end - self.window_start
    }

    /// Whether `timestamp` lies inside the window (inclusive).
    pub fn contains(&self, timestamp: f64) -> bool {
        timestamp >= self.window_start && timestamp <= self.window_end
    }

    /// Clamp `timestamp` into the window.
    pub fn clamp(&self, timestamp: f64) -> f64 {
        timestamp.clamp(self.window_start, self.window_end)
    }
}

// ---------------------------------------------------------------------------
// Crises
// ---------------------------------------------------------------------------

/// Half-open slider range `[lo, hi)` in which a crisis fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TriggerRange {
    /// Inclusive lower bound.
    pub lo: f64,
    /// Exclusive upper bound.
    pub hi: f64,
}

impl TriggerRange {
    /// Whether `value` lies in `[lo, hi)`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lo && value < self.hi
    }

    /// Whether a forward step from `prev` to `cur` crosses into the range,
    /// i.e. `(prev, cur]` intersects `[lo, hi)`.
    pub fn crossed_by(&self, prev: f64, cur: f64) -> bool {
        cur > prev && prev < self.hi && cur >= self.lo
    }
}

/// A scripted anomaly that fires once per forward pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CrisisDefinition {
    /// Stable identifier.
    pub id: String,
    /// Slider range in which the crisis fires.
    pub trigger_range: TriggerRange,
    /// Scenario tag handed to the presentation layer (`SENSOR_FAILURE`, ...).
    pub scenario_tag: String,
}

/// Emitted when a crisis fires; consumed once by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CrisisEvent {
    /// Id of the [`CrisisDefinition`] that fired.
    pub definition_id: String,
    /// Scenario tag of that definition.
    pub scenario_tag: String,
    /// Slider value of the tick that fired the crisis.
    pub fired_at_slider_value: f64,
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn lerp_hits_endpoints_exactly() {
        let a = GeoPoint::new(53.5451, 9.8702);
        let b = GeoPoint::new(53.5008, 9.9710);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn lerp_midpoint() {
        let mid = GeoPoint::new(0.0, 0.0).lerp(GeoPoint::new(10.0, 20.0), 0.5);
        assert_eq!(mid, GeoPoint::new(5.0, 10.0));
    }

    #[test]
    fn trigger_range_is_half_open() {
        let range = TriggerRange { lo: 5.0, hi: 5.2 };
        assert!(range.contains(5.0));
        assert!(range.contains(5.1));
        assert!(!range.contains(5.2));
    }

    #[test]
    fn crossing_requires_forward_motion() {
        let range = TriggerRange { lo: 5.0, hi: 5.2 };
        assert!(range.crossed_by(4.95, 5.05));
        assert!(range.crossed_by(4.0, 6.0));
        assert!(!range.crossed_by(5.05, 4.95));
        assert!(!range.crossed_by(5.2, 5.3));
        assert!(!range.crossed_by(4.8, 4.9));
    }

    #[test]
    fn any_bridge_open() {
        let mut snap = EnvironmentSnapshot::calm(0.0);
        assert!(!snap.any_bridge_open());
        snap.bridges.insert("RETHE".to_owned(), BridgeState::Closed);
        assert!(!snap.any_bridge_open());
        snap.bridges.insert("KATTWYK".to_owned(), BridgeState::Open);
        assert!(snap.any_bridge_open());
    }
}
