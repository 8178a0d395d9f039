//! Live-feed input and per-tick output types.
//!
//! [`LiveWorld`] is what the external polling collaborator hands to the
//! engine; it is shown unchanged whenever the slider sits on the live
//! pivot. [`Frame`] is recomputed on every tick or seek and handed to the
//! renderers. [`PlaybackReport`] is the payload of the best-effort
//! advisory side channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ReportMode;
use crate::ids::EntityId;
use crate::structs::{CrisisEvent, EnvironmentSnapshot};

// ---------------------------------------------------------------------------
// Live feed
// ---------------------------------------------------------------------------

/// A vessel as reported by the live AIS feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LiveShip {
    /// Vessel name.
    pub id: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Vessel type.
    #[serde(rename = "type", default = "default_vessel_type")]
    pub vessel_type: String,
    /// Navigational status, if reported.
    #[serde(default)]
    pub status: Option<String>,
    /// IMO number, if reported.
    #[serde(default)]
    pub imo: Option<String>,
    /// MMSI number, if reported.
    #[serde(default)]
    pub mmsi: Option<String>,
}

/// A heavy goods vehicle from the live road feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LiveTruck {
    /// Vehicle identifier.
    pub id: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// Current weather from the live feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LiveWeather {
    /// Condition tag (`CLEAR`, `RAIN`, `FOG`, ...).
    pub condition: String,
    /// Air temperature in degrees Celsius.
    pub temperature: f64,
    /// Wind speed in km/h.
    pub wind_speed: f64,
}

impl Default for LiveWeather {
    fn default() -> Self {
        Self {
            condition: String::from("CLEAR"),
            temperature: 15.0,
            wind_speed: 0.0,
        }
    }
}

/// Everything the live feed reports at one poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LiveWorld {
    /// Vessels currently in the port area.
    #[serde(default)]
    pub ships: Vec<LiveShip>,
    /// Trucks currently on the port roads.
    #[serde(default)]
    pub trucks: Vec<LiveTruck>,
    /// Gauge water level in metres.
    #[serde(default)]
    pub tide: f64,
    /// Road traffic alerts.
    #[serde(default)]
    pub traffic_alerts: Vec<String>,
    /// Current weather.
    #[serde(default)]
    pub weather: LiveWeather,
}

fn default_vessel_type() -> String {
    String::from("Unknown")
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A vessel to draw in the current frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VisibleShip {
    /// Tagged identity.
    pub id: EntityId,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Vessel type.
    #[serde(rename = "type")]
    pub vessel_type: String,
    /// Navigational or prediction status.
    pub status: String,
    /// IMO number, if known.
    pub imo: Option<String>,
}

/// Predicted conflict between vessel traffic and the watched bridge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct BridgeForecast {
    /// Name of the watched bridge.
    pub bridge: String,
    /// Closure risk in `[0, 1]`.
    pub risk_score: f64,
    /// ETA of the nearest vessel in minutes, if any vessel is visible.
    pub eta_minutes: Option<f64>,
    /// The vessel with the smallest ETA.
    pub trigger_ship: Option<EntityId>,
}

/// The engine's computed world state for one slider value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Frame {
    /// Slider value this frame was computed for.
    pub slider_value: f64,
    /// Vessels to draw.
    pub visible_ships: Vec<VisibleShip>,
    /// Environment at the frame's source timestamp.
    pub environment: EnvironmentSnapshot,
    /// Display timestamp in unix seconds.
    pub display_timestamp: f64,
    /// Human-readable time label.
    pub display_time_label: String,
    /// Whether the slider sits on the live pivot.
    pub is_live: bool,
    /// Whether the slider is in the forecast half.
    pub is_future: bool,
    /// Crisis that fired on this tick, if any.
    pub crisis_event: Option<CrisisEvent>,
    /// Bridge conflict forecast over the visible vessels.
    pub bridge_forecast: BridgeForecast,
}

/// Payload pushed to the external advisory consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlaybackReport {
    /// Display time of the reported frame.
    pub timestamp: DateTime<Utc>,
    /// Vessels visible in the reported frame.
    pub ships: Vec<VisibleShip>,
    /// Estimated water level in metres.
    pub tide_level_m: f64,
    /// Report mode tag.
    pub mode: ReportMode,
}
