//! The playback engine: one session's state plus everything needed to turn
//! a slider value into a [`Frame`].
//!
//! Each tick follows the same order:
//!
//! 1. Decide the step size from the bridge state at the current value.
//! 2. Advance the slider (wrapping at the domain maximum).
//! 3. Let the crisis scheduler look at the step; a fired crisis pauses play.
//! 4. Map the new value to timestamps and assemble the frame: recorded
//!    vessels in the past, synthetic ones in the forecast, the live feed on
//!    the pivot.
//!
//! Without a [`TrackStore`] the engine runs degraded: every frame is the live
//! world, nothing is interpolated, and no crisis can fire.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tidewatch_history::{EnvironmentResolver, TrackStore, interpolate, nearest};
use tidewatch_types::{
    CrisisEvent, EntityId, EnvironmentSnapshot, Frame, LiveWorld, PlaybackReport, ReportMode,
    VisibleShip,
};
use tracing::{debug, info};

use crate::config::TidewatchConfig;
use crate::crisis::CrisisScheduler;
use crate::forecast::{BridgeWatch, TideModel};
use crate::future::FutureSynthesizer;
use crate::mapper::{self, MappedTime, TemporalMapper};
use crate::playback::{self, PlaybackState};

const LIVE_LABEL: &str = "LIVE";
const STATUS_UNKNOWN: &str = "UNKNOWN";

/// A playback session.
#[derive(Debug)]
pub struct PlaybackEngine {
    mapper: TemporalMapper,
    synthesizer: FutureSynthesizer,
    scheduler: CrisisScheduler,
    bridge_watch: BridgeWatch,
    tide: TideModel,
    step: f64,
    slow_motion_factor: f64,
    start_value: f64,
    autostart: bool,
    store: Option<Arc<TrackStore>>,
    live: Option<LiveWorld>,
    resolver: EnvironmentResolver,
    state: PlaybackState,
}

impl PlaybackEngine {
    /// Create a session from `config`.
    ///
    /// `store` is `None` when no recorded history is available; the engine
    /// then serves the live world on every frame.
    pub fn new(
        config: &TidewatchConfig,
        store: Option<Arc<TrackStore>>,
        live: Option<LiveWorld>,
    ) -> Self {
        let mapper = TemporalMapper::new(config.playback.mode, config.playback.horizon_hours);
        let start_value = config
            .autoplay
            .start_value
            .map_or_else(|| mapper.domain().min, |v| mapper.clamp_to_domain(v));
        let scheduler = CrisisScheduler::new(config.crises.clone());
        let state = PlaybackState::new(start_value, config.autoplay.autostart, &scheduler);

        info!(
            mode = ?config.playback.mode,
            horizon_hours = config.playback.horizon_hours,
            start_value,
            crises = scheduler.definitions().len(),
            has_history = store.is_some(),
            "Playback engine created"
        );

        Self {
            mapper,
            synthesizer: FutureSynthesizer::new(&config.future, config.playback.horizon_hours),
            scheduler,
            bridge_watch: BridgeWatch::new(&config.forecast),
            tide: TideModel::new(&config.forecast.tide),
            step: config.autoplay.step,
            slow_motion_factor: config.autoplay.slow_motion_factor,
            start_value,
            autostart: config.autoplay.autostart,
            store,
            live,
            resolver: EnvironmentResolver::new(),
            state,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The current playback state.
    pub const fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Whether recorded history is loaded.
    pub const fn has_history(&self) -> bool {
        self.store.is_some()
    }

    /// Whether the clock should currently advance the slider.
    pub const fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Advance one autoplay tick and return the resulting frame.
    ///
    /// While paused the slider does not move and the current frame is
    /// returned.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Frame {
        if !self.state.is_playing {
            return self.compose(now, None);
        }

        let slow = self.bridge_open_at(self.state.slider_value);
        let step_size = if slow {
            self.step * self.slow_motion_factor
        } else {
            self.step
        };
        if slow != self.state.slow_motion {
            debug!(slow_motion = slow, step_size, "Autoplay speed changed");
        }

        let (mut next, step) = playback::advance(&self.state, step_size, self.mapper.domain());
        next.slow_motion = slow;

        let crisis = if self.store.is_some() {
            self.scheduler.observe(&mut next.crises, &step)
        } else {
            None
        };
        if crisis.is_some() {
            next.is_playing = false;
        }
        self.state = next;
        self.compose(now, crisis)
    }

    /// Jump to `value`, clamped into the domain. Never fires a crisis.
    pub fn seek(&mut self, value: f64, now: DateTime<Utc>) -> Frame {
        let clamped = self.mapper.clamp_to_domain(value);
        let (next, step) = playback::seek(&self.state, clamped, &self.scheduler);
        debug!(from = step.prev, to = step.cur, requested = value, "Seek");
        self.state = next;
        self.compose(now, None)
    }

    /// Resume autoplay.
    pub fn play(&mut self) {
        self.state.is_playing = true;
    }

    /// Pause autoplay.
    pub fn pause(&mut self) {
        self.state.is_playing = false;
    }

    /// Resolve the active crisis.
    ///
    /// Returns the deferred crisis promoted in its place, if any. Playback
    /// stays paused either way; resuming is the caller's decision.
    pub fn acknowledge(&mut self) -> Option<CrisisEvent> {
        self.scheduler.acknowledge(&mut self.state.crises)
    }

    /// Back to the start value with every crisis armed.
    pub fn restart(&mut self) {
        info!(start_value = self.start_value, "Playback restarted");
        self.state = PlaybackState::new(self.start_value, self.autostart, &self.scheduler);
    }

    /// Replace the live feed snapshot.
    pub fn set_live(&mut self, live: LiveWorld) {
        debug!(ships = live.ships.len(), tide = live.tide, "Live world updated");
        self.live = Some(live);
    }

    /// Swap in a new recorded window and reset the session.
    pub fn reload(&mut self, store: Option<Arc<TrackStore>>) {
        info!(has_history = store.is_some(), "Recorded window reloaded");
        self.store = store;
        self.resolver.reset();
        self.restart();
    }

    // -----------------------------------------------------------------------
    // Frames
    // -----------------------------------------------------------------------

    /// The advisory report for `frame`, or `None` for live frames.
    pub fn report(&self, frame: &Frame) -> Option<PlaybackReport> {
        if frame.is_live {
            return None;
        }
        Some(PlaybackReport {
            timestamp: mapper::to_datetime(frame.display_timestamp)?,
            ships: frame.visible_ships.clone(),
            tide_level_m: self.tide.level_at(frame.display_timestamp),
            mode: ReportMode::HistoricPlayback,
        })
    }

    fn compose(&mut self, now: DateTime<Utc>, crisis_event: Option<CrisisEvent>) -> Frame {
        let value = self.state.slider_value;
        let Some(store) = self.store.clone() else {
            return self.live_frame(value, now, crisis_event);
        };

        let mapped = self.mapper.map_clamped(value, &store.window());
        if mapped.is_live {
            return self.live_frame(value, now, crisis_event);
        }

        let environment = self.resolver.resolve(store.timeline(), mapped.source_timestamp);
        let visible_ships = if mapped.is_future {
            self.synthesizer.synthesize(Some(store.as_ref()), &mapped, value)
        } else {
            recorded_ships(&store, mapped.source_timestamp)
        };

        self.assemble(value, &mapped, visible_ships, environment, crisis_event)
    }

    fn live_frame(
        &mut self,
        value: f64,
        now: DateTime<Utc>,
        crisis_event: Option<CrisisEvent>,
    ) -> Frame {
        let now_ts = unix_seconds(now);
        let mut environment = match &self.store {
            Some(store) => self
                .resolver
                .resolve(store.timeline(), store.window().window_end),
            None => self.resolver.last_known_or_calm(now_ts),
        };

        let visible_ships = match &self.live {
            Some(live) => {
                environment.weather.clone_from(&live.weather.condition);
                live.ships
                    .iter()
                    .map(|ship| VisibleShip {
                        id: EntityId::live(ship.id.as_str()),
                        lat: ship.lat,
                        lng: ship.lng,
                        vessel_type: ship.vessel_type.clone(),
                        status: ship
                            .status
                            .clone()
                            .unwrap_or_else(|| STATUS_UNKNOWN.to_owned()),
                        imo: ship.imo.clone(),
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        let mapped = MappedTime {
            source_timestamp: now_ts,
            display_timestamp: now_ts,
            is_live: true,
            is_future: false,
        };
        let mut frame = self.assemble(value, &mapped, visible_ships, environment, crisis_event);
        frame.display_time_label = LIVE_LABEL.to_owned();
        frame
    }

    fn assemble(
        &self,
        value: f64,
        mapped: &MappedTime,
        visible_ships: Vec<VisibleShip>,
        environment: EnvironmentSnapshot,
        crisis_event: Option<CrisisEvent>,
    ) -> Frame {
        let bridge_forecast = self.bridge_watch.forecast(&visible_ships);
        Frame {
            slider_value: value,
            visible_ships,
            environment,
            display_timestamp: mapped.display_timestamp,
            display_time_label: mapper::display_label(mapped),
            is_live: mapped.is_live,
            is_future: mapped.is_future,
            crisis_event,
            bridge_forecast,
        }
    }

    /// Whether the recorded environment at `value` has a bridge raised.
    /// Looked up fresh on every call.
    fn bridge_open_at(&self, value: f64) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        let mapped = self.mapper.map_clamped(value, &store.window());
        if mapped.is_live {
            return false;
        }
        nearest(store.timeline(), mapped.source_timestamp).map_or_else(
            |_| {
                self.resolver
                    .last_known_or_calm(mapped.source_timestamp)
                    .any_bridge_open()
            },
            EnvironmentSnapshot::any_bridge_open,
        )
    }
}

/// Every recorded vessel that has a position at `timestamp`.
fn recorded_ships(store: &TrackStore, timestamp: f64) -> Vec<VisibleShip> {
    store
        .tracks()
        .iter()
        .filter_map(|track| {
            let pos = interpolate(track, timestamp)?;
            Some(VisibleShip {
                id: EntityId::historical(track.id.as_str()),
                lat: pos.position.lat,
                lng: pos.position.lng,
                vessel_type: track.vessel_type.clone(),
                status: pos.status,
                imo: track.imo.clone(),
            })
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn unix_seconds(now: DateTime<Utc>) -> f64 {
    now.timestamp_millis() as f64 / 1000.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use tidewatch_types::{CrisisDefinition, EntityKind, LiveShip, TriggerRange};

    use super::*;

    /// 24 recorded hours ending 2026-01-30 13:00 UTC. The RETHE bridge is
    /// open in the snapshot that slider value -4 resolves to.
    const HISTORY: &str = r#"{
        "window_start": 1769691600, "window_end": 1769778000,
        "ships": [{"id": "ONE TRIUMPH", "type": "Container Ship", "imo": "9769271", "path": [
            {"ts": 1769691600, "lat": 53.5450, "lng": 9.8700, "status": "UNDERWAY"},
            {"ts": 1769778000, "lat": 53.5200, "lng": 9.9300, "status": "MOORED"}
        ]}],
        "timeline": [
            {"ts": 1769691600, "bridges": {"RETHE": "CLOSED"}, "traffic_density": 40, "weather": "SNOW"},
            {"ts": 1769720400, "bridges": {"RETHE": "OPEN"}, "traffic_density": 90, "weather": "FOG"},
            {"ts": 1769724000, "bridges": {"RETHE": "CLOSED"}, "traffic_density": 50, "weather": "FOG"}
        ]
    }"#;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_769_778_000, 0).unwrap()
    }

    fn config() -> TidewatchConfig {
        let mut config = TidewatchConfig::default();
        config.autoplay.step = 0.1;
        config.autoplay.slow_motion_factor = 0.5;
        config.crises = vec![CrisisDefinition {
            id: "sensor".to_owned(),
            trigger_range: TriggerRange { lo: 5.0, hi: 5.2 },
            scenario_tag: "SENSOR_FAILURE".to_owned(),
        }];
        config.future.scripted_paths.clear();
        config
    }

    fn engine() -> PlaybackEngine {
        let store = Arc::new(TrackStore::from_json(HISTORY).unwrap());
        PlaybackEngine::new(&config(), Some(store), None)
    }

    fn live_world() -> LiveWorld {
        LiveWorld {
            ships: vec![LiveShip {
                id: "HMM OSLO".to_owned(),
                lat: 53.54,
                lng: 9.93,
                vessel_type: "Container Ship".to_owned(),
                status: None,
                imo: None,
                mmsi: None,
            }],
            ..LiveWorld::default()
        }
    }

    #[test]
    fn starts_at_domain_minimum() {
        let e = engine();
        assert_eq!(e.state().slider_value, -12.0);
        assert!(e.is_playing());
    }

    #[test]
    fn past_frame_shows_recorded_vessels() {
        let mut e = engine();
        let frame = e.seek(-6.0, now());
        assert!(!frame.is_live && !frame.is_future);
        let ship = frame.visible_ships.first().unwrap();
        assert_eq!(ship.id.kind, EntityKind::Historical);
        assert_eq!(frame.display_time_label, "2026-01-30 07:00 UTC");
    }

    #[test]
    fn forecast_frame_is_synthetic() {
        let mut e = engine();
        let frame = e.seek(3.0, now());
        assert!(frame.is_future);
        assert!(frame.visible_ships.iter().all(|s| s.id.is_forecast()));
        assert!(frame.display_time_label.ends_with("(FORECAST)"));
    }

    #[test]
    fn pivot_frame_is_live() {
        let mut e = engine();
        e.set_live(live_world());
        let frame = e.seek(0.0, now());
        assert!(frame.is_live);
        assert_eq!(frame.display_time_label, "LIVE");
        assert_eq!(frame.visible_ships.len(), 1);
        assert_eq!(frame.visible_ships.first().unwrap().status, "UNKNOWN");
        assert!(e.report(&frame).is_none());
    }

    #[test]
    fn degraded_without_history() {
        let mut e = PlaybackEngine::new(&config(), None, Some(live_world()));
        let frame = e.seek(-6.0, now());
        assert!(frame.is_live);
        assert_eq!(frame.visible_ships.first().unwrap().id.kind, EntityKind::Live);
        let ticked = e.tick(now());
        assert!(ticked.crisis_event.is_none());
    }

    #[test]
    fn open_bridge_slows_autoplay() {
        let mut e = engine();
        let _ = e.seek(-4.0, now());
        let frame = e.tick(now());
        assert!(e.state().slow_motion);
        assert!((frame.slider_value - -3.95).abs() < 1e-9);

        let _ = e.seek(-10.0, now());
        assert!(!e.state().slow_motion);
        let frame = e.tick(now());
        assert!(!e.state().slow_motion);
        assert!((frame.slider_value - -9.9).abs() < 1e-9);
    }

    #[test]
    fn crisis_pauses_and_acknowledge_keeps_paused() {
        let mut e = engine();
        let _ = e.seek(4.0, now());
        let mut fired = Vec::new();
        for _ in 0..20 {
            let frame = e.tick(now());
            if let Some(event) = frame.crisis_event {
                fired.push(event);
            }
        }
        assert_eq!(fired.len(), 1);
        assert!(!e.is_playing());

        let paused_at = e.state().slider_value;
        let _ = e.tick(now());
        assert_eq!(e.state().slider_value, paused_at);

        assert!(e.acknowledge().is_none());
        assert!(!e.is_playing());
        e.play();
        let _ = e.tick(now());
        assert!(e.state().slider_value > paused_at);
    }

    #[test]
    fn seek_clamps_and_never_fires() {
        let mut e = engine();
        let frame = e.seek(5.1, now());
        assert!(frame.crisis_event.is_none());
        let frame = e.seek(99.0, now());
        assert_eq!(frame.slider_value, 12.0);
    }

    #[test]
    fn report_only_for_recorded_and_forecast_frames() {
        let mut e = engine();
        let frame = e.seek(-1.0, now());
        let report = e.report(&frame).unwrap();
        assert_eq!(report.mode, ReportMode::HistoricPlayback);
        assert_eq!(report.timestamp.to_rfc3339(), "2026-01-30T12:00:00+00:00");
        assert_eq!(report.ships.len(), frame.visible_ships.len());
    }

    #[test]
    fn reload_resets_session() {
        let mut e = engine();
        let _ = e.seek(6.0, now());
        e.pause();
        e.reload(None);
        assert_eq!(e.state().slider_value, -12.0);
        assert!(e.is_playing());
        assert!(!e.has_history());
    }
}
