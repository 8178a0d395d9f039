//! Shared type definitions for the Tidewatch playback engine.
//!
//! Types defined here are shared by the history store, the playback core
//! and the engine binary, and flow downstream to `TypeScript` via `ts-rs`
//! for the harbour dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Tagged entity identifiers (historical, live, forecast)
//! - [`enums`] -- Bridge states, entity kinds, playback modes, crisis phases
//! - [`structs`] -- Tracks, environment snapshots, windows, crisis definitions
//! - [`frame`] -- Live-feed input, per-tick output frames, advisory reports

pub mod enums;
pub mod frame;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{BridgeState, CrisisPhase, EntityKind, PlaybackMode, ReportMode};
pub use frame::{
    BridgeForecast, Frame, LiveShip, LiveTruck, LiveWeather, LiveWorld, PlaybackReport,
    VisibleShip,
};
pub use ids::EntityId;
pub use structs::{
    CrisisDefinition, CrisisEvent, EnvironmentSnapshot, GeoPoint, TimelineWindow, TrackPoint,
    TriggerRange, VesselTrack,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Files are written to `bindings/` relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::EntityId::export_all();

        // Enums
        let _ = crate::enums::BridgeState::export_all();
        let _ = crate::enums::EntityKind::export_all();
        let _ = crate::enums::PlaybackMode::export_all();
        let _ = crate::enums::CrisisPhase::export_all();
        let _ = crate::enums::ReportMode::export_all();

        // Structs
        let _ = crate::structs::GeoPoint::export_all();
        let _ = crate::structs::TrackPoint::export_all();
        let _ = crate::structs::VesselTrack::export_all();
        let _ = crate::structs::EnvironmentSnapshot::export_all();
        let _ = crate::structs::TimelineWindow::export_all();
        let _ = crate::structs::TriggerRange::export_all();
        let _ = crate::structs::CrisisDefinition::export_all();
        let _ = crate::structs::CrisisEvent::export_all();

        // Frames
        let _ = crate::frame::LiveShip::export_all();
        let _ = crate::frame::LiveTruck::export_all();
        let _ = crate::frame::LiveWeather::export_all();
        let _ = crate::frame::LiveWorld::export_all();
        let _ = crate::frame::VisibleShip::export_all();
        let _ = crate::frame::BridgeForecast::export_all();
        let _ = crate::frame::Frame::export_all();
        let _ = crate::frame::PlaybackReport::export_all();
    }
}
