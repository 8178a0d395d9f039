//! Enumeration types for the Tidewatch playback engine.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// State of a movable bridge in a recorded environment snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum BridgeState {
    /// Bridge raised for ship passage; road traffic is stopped.
    Open,
    /// Bridge lowered; road traffic flows.
    Closed,
}

impl BridgeState {
    /// Whether the bridge is raised.
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// Source of a vessel shown in an output frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EntityKind {
    /// Reconstructed from a recorded track.
    Historical,
    /// Reported by the live feed at the live pivot.
    Live,
    /// A recorded track replayed into the forecast half of the slider.
    MirroredFuture,
    /// Generated by the future synthesizer; has no recorded counterpart.
    SyntheticFuture,
}

impl EntityKind {
    /// Stable lowercase name, used in log fields and display strings.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Historical => "historical",
            Self::Live => "live",
            Self::MirroredFuture => "mirrored",
            Self::SyntheticFuture => "synthetic",
        }
    }
}

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

/// How the slider value maps onto the recorded window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PlaybackMode {
    /// Slider in `[0, 100]`, a percentage of the window; 100 is live.
    Percentage,
    /// Slider in `[-H, +H]` hours around the live pivot at 0.
    #[default]
    SignedOffset,
}

/// Lifecycle of a single crisis definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CrisisPhase {
    /// Waiting for the slider to cross its trigger range.
    #[default]
    Armed,
    /// Crossed its range while another crisis was being displayed.
    Deferred,
    /// Fired; its event is on screen until acknowledged.
    Triggered,
    /// Acknowledged by the consumer. Stays disarmed until an explicit reset.
    Resolved,
}

/// Mode tag carried by advisory reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum ReportMode {
    /// The slider is off the live pivot and the engine replays history.
    #[default]
    HistoricPlayback,
}
