//! Environment snapshot lookup.
//!
//! The timeline is sampled at a fixed interval (10 minutes in the historian
//! feed), so the environment at an arbitrary instant is the recorded
//! snapshot closest to it. Ties go to the earlier snapshot in timeline
//! order, which keeps playback deterministic.

use tidewatch_types::EnvironmentSnapshot;
use tracing::debug;

use crate::error::HistoryError;

/// Return the snapshot whose timestamp is closest to `timestamp`.
///
/// # Errors
///
/// Returns [`HistoryError::EmptyTimeline`] if `timeline` is empty.
pub fn nearest(
    timeline: &[EnvironmentSnapshot],
    timestamp: f64,
) -> Result<&EnvironmentSnapshot, HistoryError> {
    let mut snapshots = timeline.iter();
    let first = snapshots.next().ok_or(HistoryError::EmptyTimeline)?;

    let mut best = first;
    let mut best_distance = (first.timestamp - timestamp).abs();
    for snapshot in snapshots {
        let distance = (snapshot.timestamp - timestamp).abs();
        // Strict comparison: the first snapshot wins ties.
        if distance < best_distance {
            best = snapshot;
            best_distance = distance;
        }
    }
    Ok(best)
}

/// Snapshot lookup that never fails a frame.
///
/// Remembers the last successfully resolved snapshot and hands it back when
/// the timeline is empty. Before anything has been resolved it falls back to
/// a calm snapshot (no bridge events, clear weather).
#[derive(Debug, Clone, Default)]
pub struct EnvironmentResolver {
    last_known: Option<EnvironmentSnapshot>,
}

impl EnvironmentResolver {
    /// Create a resolver with no remembered snapshot.
    pub const fn new() -> Self {
        Self { last_known: None }
    }

    /// Resolve the snapshot for `timestamp`, falling back to the last known
    /// one if the timeline is empty.
    pub fn resolve(
        &mut self,
        timeline: &[EnvironmentSnapshot],
        timestamp: f64,
    ) -> EnvironmentSnapshot {
        match nearest(timeline, timestamp) {
            Ok(snapshot) => {
                self.last_known = Some(snapshot.clone());
                snapshot.clone()
            }
            Err(err) => {
                debug!(error = %err, timestamp, "Snapshot lookup failed, reusing last known");
                self.last_known_or_calm(timestamp)
            }
        }
    }

    /// The last resolved snapshot, or a calm one stamped with `timestamp`.
    pub fn last_known_or_calm(&self, timestamp: f64) -> EnvironmentSnapshot {
        self.last_known
            .clone()
            .unwrap_or_else(|| EnvironmentSnapshot::calm(timestamp))
    }

    /// Forget the remembered snapshot (window reload).
    pub fn reset(&mut self) {
        self.last_known = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use tidewatch_types::BridgeState;

    use super::*;

    fn snap(ts: f64, weather: &str) -> EnvironmentSnapshot {
        let mut s = EnvironmentSnapshot::calm(ts);
        s.weather = weather.to_owned();
        s
    }

    fn timeline() -> Vec<EnvironmentSnapshot> {
        vec![
            snap(0.0, "SNOW"),
            snap(600.0, "FOG"),
            snap(1200.0, "FOG"),
            snap(1800.0, "CLEAR"),
        ]
    }

    #[test]
    fn picks_closest_snapshot() {
        let tl = timeline();
        assert_eq!(nearest(&tl, 650.0).unwrap().timestamp, 600.0);
        assert_eq!(nearest(&tl, 1700.0).unwrap().timestamp, 1800.0);
        assert_eq!(nearest(&tl, -500.0).unwrap().timestamp, 0.0);
        assert_eq!(nearest(&tl, 99_999.0).unwrap().timestamp, 1800.0);
    }

    #[test]
    fn tie_goes_to_earlier_snapshot() {
        let tl = timeline();
        assert_eq!(nearest(&tl, 300.0).unwrap().timestamp, 0.0);
        assert_eq!(nearest(&tl, 900.0).unwrap().timestamp, 600.0);
    }

    #[test]
    fn no_snapshot_is_strictly_closer() {
        let tl = timeline();
        for step in 0..40 {
            let t = f64::from(step) * 53.0 - 100.0;
            let chosen = nearest(&tl, t).unwrap();
            let chosen_distance = (chosen.timestamp - t).abs();
            for other in &tl {
                assert!((other.timestamp - t).abs() >= chosen_distance, "t = {t}");
            }
        }
    }

    #[test]
    fn empty_timeline_is_an_error() {
        assert!(matches!(nearest(&[], 0.0), Err(HistoryError::EmptyTimeline)));
    }

    #[test]
    fn resolver_reuses_last_known_snapshot() {
        let mut resolver = EnvironmentResolver::new();
        let mut tl = timeline();
        if let Some(s) = tl.get_mut(1) {
            s.bridges.insert("RETHE".to_owned(), BridgeState::Open);
        }

        let resolved = resolver.resolve(&tl, 610.0);
        assert!(resolved.any_bridge_open());

        let fallback = resolver.resolve(&[], 5000.0);
        assert_eq!(fallback.timestamp, 600.0);
        assert!(fallback.any_bridge_open());
    }

    #[test]
    fn resolver_starts_calm() {
        let mut resolver = EnvironmentResolver::new();
        let s = resolver.resolve(&[], 42.0);
        assert_eq!(s.timestamp, 42.0);
        assert!(!s.any_bridge_open());
        assert_eq!(s.weather, "CLEAR");
    }
}
