//! Forecast-half vessel synthesis.
//!
//! When the slider is in the forecast half there is no recorded data to
//! show, so the frame is filled with deterministic stand-ins: every recorded
//! vessel mirrored at the clamped source timestamp, one entity that always
//! moves, one that always sits at its berth, and the scripted vessels that
//! dramatize the configured crises. Everything here is a pure function of
//! the slider value.

use tidewatch_history::{TrackStore, interpolate_with_status};
use tidewatch_types::{EntityId, GeoPoint, VisibleShip};

use crate::config::{FutureConfig, MotionEntityConfig, ScriptedPathConfig, StaticEntityConfig};
use crate::mapper::MappedTime;

const STATUS_UNDERWAY: &str = "UNDERWAY";
const STATUS_MOORED: &str = "MOORED";

/// Builds the synthetic vessels of forecast frames.
#[derive(Debug, Clone)]
pub struct FutureSynthesizer {
    horizon_hours: f64,
    prediction_status: String,
    motion: MotionEntityConfig,
    anchor: StaticEntityConfig,
    paths: Vec<ScriptedPathConfig>,
}

impl FutureSynthesizer {
    /// Create a synthesizer for a signed-offset domain of half-width
    /// `horizon_hours`.
    pub fn new(config: &FutureConfig, horizon_hours: f64) -> Self {
        Self {
            horizon_hours,
            prediction_status: config.prediction_status.clone(),
            motion: config.motion_entity.clone(),
            anchor: config.static_entity.clone(),
            paths: config.scripted_paths.clone(),
        }
    }

    /// All synthetic vessels for `mapped`, or nothing outside the forecast
    /// half.
    pub fn synthesize(
        &self,
        store: Option<&TrackStore>,
        mapped: &MappedTime,
        slider_value: f64,
    ) -> Vec<VisibleShip> {
        if !mapped.is_future {
            return Vec::new();
        }

        let mut ships = store
            .map(|s| self.mirrored(s, mapped.source_timestamp))
            .unwrap_or_default();

        let motion = self.motion_position(slider_value);
        ships.push(VisibleShip {
            id: EntityId::synthetic(self.motion.id.as_str()),
            lat: motion.lat,
            lng: motion.lng,
            vessel_type: self.motion.vessel_type.clone(),
            status: STATUS_UNDERWAY.to_owned(),
            imo: None,
        });

        ships.push(VisibleShip {
            id: EntityId::synthetic(self.anchor.id.as_str()),
            lat: self.anchor.position.lat,
            lng: self.anchor.position.lng,
            vessel_type: self.anchor.vessel_type.clone(),
            status: STATUS_MOORED.to_owned(),
            imo: None,
        });

        for path in &self.paths {
            if let Some((position, status)) = scripted_position(path, slider_value) {
                ships.push(VisibleShip {
                    id: EntityId::synthetic(path.id.as_str()),
                    lat: position.lat,
                    lng: position.lng,
                    vessel_type: path.vessel_type.clone(),
                    status: status.to_owned(),
                    imo: None,
                });
            }
        }

        ships
    }

    /// Recorded vessels replayed at `source_timestamp` and relabelled as
    /// predictions.
    fn mirrored(&self, store: &TrackStore, source_timestamp: f64) -> Vec<VisibleShip> {
        store
            .tracks()
            .iter()
            .filter_map(|track| {
                let pos =
                    interpolate_with_status(track, source_timestamp, &self.prediction_status)?;
                Some(VisibleShip {
                    id: EntityId::mirrored(track.id.as_str()),
                    lat: pos.position.lat,
                    lng: pos.position.lng,
                    vessel_type: track.vessel_type.clone(),
                    status: pos.status,
                    imo: track.imo.clone(),
                })
            })
            .collect()
    }

    /// Position of the guaranteed-motion entity.
    ///
    /// Progress is `(|s| mod H) / H`, so the entity sweeps its segment once
    /// per horizon and never stands still for long.
    pub fn motion_position(&self, slider_value: f64) -> GeoPoint {
        if self.horizon_hours <= 0.0 {
            return self.motion.from;
        }
        let progress = (slider_value.abs() % self.horizon_hours) / self.horizon_hours;
        self.motion.from.lerp(self.motion.to, progress)
    }
}

/// Position and status of a scripted vessel at `slider_value`.
///
/// Absent before `start`. Between `start` and `end` the vessel walks its
/// waypoints at constant progress per segment. It then holds the final
/// waypoint with `hold_status` for `hold_for` slider units and disappears.
pub fn scripted_position(path: &ScriptedPathConfig, slider_value: f64) -> Option<(GeoPoint, &str)> {
    if !slider_value.is_finite() || slider_value < path.start {
        return None;
    }
    let last = *path.waypoints.last()?;

    if slider_value < path.end {
        let span = path.end - path.start;
        if span <= 0.0 {
            return Some((last, path.status.as_str()));
        }
        let progress = ((slider_value - path.start) / span).clamp(0.0, 1.0);
        return Some((along_waypoints(&path.waypoints, progress), path.status.as_str()));
    }

    if slider_value < path.end + path.hold_for {
        return Some((last, path.hold_status.as_str()));
    }
    None
}

/// Interpolate along `waypoints` at overall `progress` in `[0, 1]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn along_waypoints(waypoints: &[GeoPoint], progress: f64) -> GeoPoint {
    let segments = waypoints.len().saturating_sub(1);
    let Some(&last) = waypoints.last() else {
        return GeoPoint::default();
    };
    if segments == 0 {
        return last;
    }

    let segment_progress = progress * segments as f64;
    let index = segment_progress.floor();
    let within = segment_progress - index;
    let index = index as usize;

    match (waypoints.get(index), waypoints.get(index.saturating_add(1))) {
        (Some(&from), Some(&to)) => from.lerp(to, within),
        _ => last,
    }
}
