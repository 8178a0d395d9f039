//! Recorded history for the Tidewatch playback engine.
//!
//! This crate holds everything the engine knows about the past: the vessel
//! tracks and environment timeline of the recorded window, and the pure
//! lookups that reconstruct a vessel position or an environment snapshot at
//! an arbitrary instant inside that window.
//!
//! # Modules
//!
//! - [`store`] -- [`TrackStore`]: validated, immutable tracks and timeline
//!   loaded from the historian's JSON document.
//! - [`interpolate`] -- Piecewise-linear position reconstruction.
//! - [`environment`] -- Nearest-snapshot lookup and the last-known fallback
//!   resolver.
//! - [`error`] -- [`HistoryError`].

pub mod environment;
pub mod error;
pub mod interpolate;
pub mod store;

// Re-export primary types at crate root.
pub use environment::{EnvironmentResolver, nearest};
pub use error::HistoryError;
pub use interpolate::{InterpolatedPosition, interpolate, interpolate_with_status};
pub use store::{RawHistory, RawPoint, RawShip, RawSnapshot, TrackStore};
