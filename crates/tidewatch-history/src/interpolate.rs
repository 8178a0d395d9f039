//! Position reconstruction from recorded tracks.
//!
//! Between two recorded points a vessel is assumed to move in a straight
//! line at constant speed; latitude and longitude are interpolated
//! independently. Nothing is extrapolated: outside a track's recorded span
//! the vessel is simply absent.

use tidewatch_types::{GeoPoint, TrackPoint, VesselTrack};

/// A reconstructed vessel position.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedPosition {
    /// Reconstructed coordinates.
    pub position: GeoPoint,
    /// Status carried from the earlier bracketing point, or the caller's
    /// override.
    pub status: String,
}

/// Reconstruct the position of `track` at `timestamp`.
///
/// Returns `None` if the track has fewer than two points or `timestamp`
/// lies outside the recorded span. The status is carried from the earlier
/// point of the bracketing pair.
pub fn interpolate(track: &VesselTrack, timestamp: f64) -> Option<InterpolatedPosition> {
    bracket(track, timestamp).map(|(p1, position)| InterpolatedPosition {
        position,
        status: p1.status.clone(),
    })
}

/// Like [`interpolate`], but labels the result with `status` instead of the
/// recorded one. Used when recorded tracks are replayed as a forecast.
pub fn interpolate_with_status(
    track: &VesselTrack,
    timestamp: f64,
    status: &str,
) -> Option<InterpolatedPosition> {
    bracket(track, timestamp).map(|(_, position)| InterpolatedPosition {
        position,
        status: status.to_owned(),
    })
}

/// Find the first consecutive pair with `p1.ts <= timestamp <= p2.ts` and
/// interpolate inside it.
///
/// Linear scan over the points. Pairs that go back in time are skipped
/// rather than trusted, so a track that bypassed store validation yields
/// absence instead of garbage.
fn bracket(track: &VesselTrack, timestamp: f64) -> Option<(&TrackPoint, GeoPoint)> {
    if !track.is_interpolable() || !timestamp.is_finite() {
        return None;
    }

    track.points.windows(2).find_map(|pair| {
        let [p1, p2] = pair else {
            return None;
        };
        if p2.timestamp < p1.timestamp {
            return None;
        }
        if timestamp < p1.timestamp || timestamp > p2.timestamp {
            return None;
        }

        let span = p2.timestamp - p1.timestamp;
        if span <= 0.0 {
            return Some((p1, p1.position()));
        }

        let ratio = ((timestamp - p1.timestamp) / span).clamp(0.0, 1.0);
        Some((p1, p1.position().lerp(p2.position(), ratio)))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn point(ts: f64, lat: f64, lng: f64, status: &str) -> TrackPoint {
        TrackPoint {
            timestamp: ts,
            lat,
            lng,
            status: status.to_owned(),
        }
    }

    fn track(points: Vec<TrackPoint>) -> VesselTrack {
        VesselTrack {
            id: "HMM OSLO".to_owned(),
            vessel_type: "Container Ship".to_owned(),
            imo: None,
            mmsi: None,
            points,
        }
    }

    /// A plausible Elbe arrival: irregular spacing, awkward coordinates.
    fn elbe_arrival() -> VesselTrack {
        track(vec![
            point(1_769_774_400.0, 53.5451, 9.8702, "AT_SEA"),
            point(1_769_775_000.0, 53.5302, 9.9107, "UNDERWAY"),
            point(1_769_776_213.0, 53.5203, 9.9301, "UNDERWAY"),
            point(1_769_779_999.0, 53.5088, 9.9563, "UNDERWAY"),
            point(1_769_781_000.0, 53.5008, 9.9710, "MOORED"),
        ])
    }

    #[test]
    fn midpoint_example() {
        let t = track(vec![point(0.0, 0.0, 0.0, "UNDERWAY"), point(10.0, 10.0, 20.0, "MOORED")]);
        let pos = interpolate(&t, 5.0).unwrap();
        assert_eq!(pos.position, GeoPoint::new(5.0, 10.0));
        assert_eq!(pos.status, "UNDERWAY");
    }

    #[test]
    fn recorded_points_are_reproduced_exactly() {
        let t = elbe_arrival();
        for p in &t.points {
            let pos = interpolate(&t, p.timestamp).unwrap();
            assert_eq!(pos.position.lat, p.lat, "lat at ts {}", p.timestamp);
            assert_eq!(pos.position.lng, p.lng, "lng at ts {}", p.timestamp);
        }
    }

    #[test]
    fn absent_outside_recorded_span() {
        let t = elbe_arrival();
        let first = t.first_timestamp().unwrap();
        let last = t.last_timestamp().unwrap();
        assert!(interpolate(&t, first - 0.5).is_none());
        assert!(interpolate(&t, first - 86_400.0).is_none());
        assert!(interpolate(&t, last + 0.5).is_none());
        assert!(interpolate(&t, f64::NAN).is_none());
    }

    #[test]
    fn single_point_track_is_absent() {
        let t = track(vec![point(0.0, 1.0, 1.0, "MOORED")]);
        assert!(interpolate(&t, 0.0).is_none());
    }

    #[test]
    fn degenerate_pair_uses_first_point() {
        let t = track(vec![
            point(5.0, 1.0, 1.0, "MOORED"),
            point(5.0, 2.0, 2.0, "UNDERWAY"),
            point(10.0, 3.0, 3.0, "UNDERWAY"),
        ]);
        let pos = interpolate(&t, 5.0).unwrap();
        assert_eq!(pos.position, GeoPoint::new(1.0, 1.0));
        assert_eq!(pos.status, "MOORED");
    }

    #[test]
    fn status_override() {
        let t = elbe_arrival();
        let pos = interpolate_with_status(&t, 1_769_776_000.0, "PREDICTED").unwrap();
        assert_eq!(pos.status, "PREDICTED");
    }

    #[test]
    fn decreasing_pairs_are_skipped() {
        let t = track(vec![
            point(0.0, 0.0, 0.0, "UNDERWAY"),
            point(10.0, 10.0, 10.0, "UNDERWAY"),
            point(4.0, 99.0, 99.0, "UNDERWAY"),
        ]);
        let pos = interpolate(&t, 5.0).unwrap();
        assert_eq!(pos.position, GeoPoint::new(5.0, 5.0));
        // 10 -> 4 goes backwards and is never used as a bracket.
        assert!(interpolate(&t, 11.0).is_none());
    }
}
