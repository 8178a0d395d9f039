//! Input loading for the engine binary.
//!
//! A missing history file is not fatal: the engine then runs in live-only
//! mode. A history file that exists but is malformed is.

use std::io::ErrorKind;
use std::path::Path;

use tidewatch_history::{HistoryError, TrackStore};
use tidewatch_types::LiveWorld;
use tracing::{info, warn};

/// Load the historian document at `path`.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns [`HistoryError`] if the file exists but cannot be read or parsed.
pub fn load_history(path: &Path) -> Result<Option<TrackStore>, HistoryError> {
    match TrackStore::from_file(path) {
        Ok(store) => {
            info!(path = %path.display(), "History loaded");
            Ok(Some(store))
        }
        Err(HistoryError::Io { source }) if source.kind() == ErrorKind::NotFound => {
            warn!(
                path = %path.display(),
                "History file not found, running with live data only"
            );
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Load a live feed snapshot from `path`.
///
/// The live feed is optional, so every failure is logged and yields `None`.
pub fn load_live(path: &Path) -> Option<LiveWorld> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Live snapshot unreadable, ignoring");
            return None;
        }
    };
    match serde_json::from_str::<LiveWorld>(&contents) {
        Ok(live) => {
            info!(
                path = %path.display(),
                ships = live.ships.len(),
                trucks = live.trucks.len(),
                "Live snapshot loaded"
            );
            Some(live)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Live snapshot malformed, ignoring");
            None
        }
    }
}
