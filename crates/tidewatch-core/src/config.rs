//! Configuration loading and typed config structures for Tidewatch.
//!
//! The canonical configuration lives in `tidewatch-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, a loader that reads the file, and [`TidewatchConfig::validate`]
//! which rejects values the playback engine cannot work with.

use std::path::Path;

use serde::Deserialize;
use tidewatch_types::{CrisisDefinition, GeoPoint, PlaybackMode, TriggerRange};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but holds unusable values.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.into(),
    }
}

/// Top-level Tidewatch configuration.
///
/// Mirrors the structure of `tidewatch-config.yaml`. Every field has a
/// default, so an empty file yields the shipped harbour scenario.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TidewatchConfig {
    /// Slider domain settings.
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Autoplay clock settings.
    #[serde(default)]
    pub autoplay: AutoplayConfig,

    /// Synthetic forecast entities.
    #[serde(default)]
    pub future: FutureConfig,

    /// Scripted crises, evaluated in declaration order.
    #[serde(default = "default_crises")]
    pub crises: Vec<CrisisDefinition>,

    /// Bridge conflict forecast and tide model.
    #[serde(default)]
    pub forecast: ForecastConfig,

    /// Advisory side channel.
    #[serde(default)]
    pub advisory: AdvisoryConfig,

    /// Input data locations.
    #[serde(default)]
    pub data: DataConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TidewatchConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            autoplay: AutoplayConfig::default(),
            future: FutureConfig::default(),
            crises: default_crises(),
            forecast: ForecastConfig::default(),
            advisory: AdvisoryConfig::default(),
            data: DataConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TidewatchConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `TIDEWATCH_HISTORY_PATH` overrides `data.history_path`
    /// - `TIDEWATCH_ADVISORY_URL` overrides `advisory.url`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty map.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("TIDEWATCH_HISTORY_PATH") {
            self.data.history_path = val;
        }
        if let Ok(val) = std::env::var("TIDEWATCH_ADVISORY_URL") {
            self.advisory.url = val;
        }
    }

    /// Check every section for values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.playback.validate()?;
        self.autoplay.validate()?;
        validate_crises(&self.crises)?;
        self.future.validate(&self.crises)?;
        self.forecast.validate()?;
        self.advisory.validate()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

/// Slider domain configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlaybackConfig {
    /// How slider values map onto time.
    #[serde(default)]
    pub mode: PlaybackMode,

    /// Half-width `H` of the signed-offset domain, in hours.
    #[serde(default = "default_horizon_hours")]
    pub horizon_hours: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            mode: PlaybackMode::default(),
            horizon_hours: default_horizon_hours(),
        }
    }
}

impl PlaybackConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.horizon_hours.is_finite() || self.horizon_hours <= 0.0 {
            return Err(invalid("playback.horizon_hours must be positive"));
        }
        Ok(())
    }
}

/// Autoplay clock configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AutoplayConfig {
    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Slider units advanced per tick.
    #[serde(default = "default_step")]
    pub step: f64,

    /// Step multiplier while any bridge is open.
    #[serde(default = "default_slow_motion_factor")]
    pub slow_motion_factor: f64,

    /// Whether playback starts immediately.
    #[serde(default = "default_true")]
    pub autostart: bool,

    /// Slider value playback starts from. Defaults to the domain minimum.
    #[serde(default)]
    pub start_value: Option<f64>,

    /// How long the headless engine shows a crisis before acknowledging it.
    #[serde(default = "default_crisis_hold_ms")]
    pub crisis_hold_ms: u64,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            step: default_step(),
            slow_motion_factor: default_slow_motion_factor(),
            autostart: true,
            start_value: None,
            crisis_hold_ms: default_crisis_hold_ms(),
        }
    }
}

impl AutoplayConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(invalid("autoplay.tick_interval_ms must be at least 1"));
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(invalid("autoplay.step must be positive"));
        }
        if !self.slow_motion_factor.is_finite()
            || self.slow_motion_factor <= 0.0
            || self.slow_motion_factor > 1.0
        {
            return Err(invalid("autoplay.slow_motion_factor must lie in (0, 1]"));
        }
        if self.start_value.is_some_and(|v| !v.is_finite()) {
            return Err(invalid("autoplay.start_value must be finite"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Forecast entities
// ---------------------------------------------------------------------------

/// Synthetic entities shown in the forecast half of the slider.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FutureConfig {
    /// Status given to recorded vessels mirrored into the forecast.
    #[serde(default = "default_prediction_status")]
    pub prediction_status: String,

    /// Entity that always moves, so the forecast never looks frozen.
    #[serde(default = "default_motion_entity")]
    pub motion_entity: MotionEntityConfig,

    /// Entity that always sits at a berth.
    #[serde(default = "default_static_entity")]
    pub static_entity: StaticEntityConfig,

    /// Scripted crisis-vessel paths.
    #[serde(default = "default_scripted_paths")]
    pub scripted_paths: Vec<ScriptedPathConfig>,
}

impl Default for FutureConfig {
    fn default() -> Self {
        Self {
            prediction_status: default_prediction_status(),
            motion_entity: default_motion_entity(),
            static_entity: default_static_entity(),
            scripted_paths: default_scripted_paths(),
        }
    }
}

impl FutureConfig {
    fn validate(&self, crises: &[CrisisDefinition]) -> Result<(), ConfigError> {
        for path in &self.scripted_paths {
            if path.waypoints.len() < 2 {
                return Err(invalid(format!(
                    "scripted path {} needs at least two waypoints",
                    path.id
                )));
            }
            if !path.start.is_finite() || !path.end.is_finite() || path.start >= path.end {
                return Err(invalid(format!(
                    "scripted path {} needs start < end",
                    path.id
                )));
            }
            if !path.hold_for.is_finite() || path.hold_for < 0.0 {
                return Err(invalid(format!(
                    "scripted path {} has a negative hold_for",
                    path.id
                )));
            }
            if let Some(crisis_id) = &path.crisis_id {
                if !crises.iter().any(|c| &c.id == crisis_id) {
                    return Err(invalid(format!(
                        "scripted path {} references unknown crisis {crisis_id}",
                        path.id
                    )));
                }
            }
        }
        Ok(())
    }
}

/// The guaranteed-motion forecast entity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MotionEntityConfig {
    /// Display name.
    pub id: String,
    /// Vessel type.
    #[serde(default = "default_motion_type")]
    pub vessel_type: String,
    /// Position at progress 0.
    pub from: GeoPoint,
    /// Position at progress 1.
    pub to: GeoPoint,
}

/// The guaranteed-static forecast entity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StaticEntityConfig {
    /// Display name.
    pub id: String,
    /// Vessel type.
    #[serde(default = "default_static_type")]
    pub vessel_type: String,
    /// Berth position.
    pub position: GeoPoint,
}

/// A vessel that follows waypoints over a slider interval.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptedPathConfig {
    /// Display name of the vessel.
    pub id: String,
    /// Crisis this path dramatizes, if any.
    #[serde(default)]
    pub crisis_id: Option<String>,
    /// Vessel type.
    #[serde(default = "default_scripted_type")]
    pub vessel_type: String,
    /// Status while traversing the waypoints.
    #[serde(default = "default_underway")]
    pub status: String,
    /// Status while holding at the final waypoint.
    #[serde(default = "default_hold_status")]
    pub hold_status: String,
    /// Slider value at which the vessel appears at the first waypoint.
    pub start: f64,
    /// Slider value at which the vessel reaches the final waypoint.
    pub end: f64,
    /// Slider units the vessel stays at the final waypoint after `end`.
    #[serde(default)]
    pub hold_for: f64,
    /// Ordered waypoints, at least two.
    pub waypoints: Vec<GeoPoint>,
}

fn validate_crises(crises: &[CrisisDefinition]) -> Result<(), ConfigError> {
    for (index, crisis) in crises.iter().enumerate() {
        let range = crisis.trigger_range;
        if !range.lo.is_finite() || !range.hi.is_finite() || range.lo >= range.hi {
            return Err(invalid(format!(
                "crisis {} needs a trigger range with lo < hi",
                crisis.id
            )));
        }
        if crises.iter().take(index).any(|c| c.id == crisis.id) {
            return Err(invalid(format!("duplicate crisis id {}", crisis.id)));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Bridge forecast and tide
// ---------------------------------------------------------------------------

/// Bridge conflict forecast settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastConfig {
    /// Name of the watched bridge.
    #[serde(default = "default_bridge_name")]
    pub bridge_name: String,

    /// Position of the watched bridge.
    #[serde(default = "default_bridge_position")]
    pub bridge: GeoPoint,

    /// Speed assumed for every vessel, in knots.
    #[serde(default = "default_assumed_speed_knots")]
    pub assumed_speed_knots: f64,

    /// ETA below which the risk starts rising, in minutes.
    #[serde(default = "default_alert_minutes")]
    pub alert_minutes: f64,

    /// ETA below which the risk is certain, in minutes.
    #[serde(default = "default_critical_minutes")]
    pub critical_minutes: f64,

    /// Tide model used for recorded and forecast frames.
    #[serde(default)]
    pub tide: TideConfig,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            bridge_name: default_bridge_name(),
            bridge: default_bridge_position(),
            assumed_speed_knots: default_assumed_speed_knots(),
            alert_minutes: default_alert_minutes(),
            critical_minutes: default_critical_minutes(),
            tide: TideConfig::default(),
        }
    }
}

impl ForecastConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.assumed_speed_knots.is_finite() || self.assumed_speed_knots <= 0.0 {
            return Err(invalid("forecast.assumed_speed_knots must be positive"));
        }
        if !self.critical_minutes.is_finite()
            || !self.alert_minutes.is_finite()
            || self.critical_minutes <= 0.0
            || self.critical_minutes >= self.alert_minutes
        {
            return Err(invalid(
                "forecast needs 0 < critical_minutes < alert_minutes",
            ));
        }
        if !self.tide.period_hours.is_finite() || self.tide.period_hours <= 0.0 {
            return Err(invalid("forecast.tide.period_hours must be positive"));
        }
        Ok(())
    }
}

/// Semi-diurnal tide model parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TideConfig {
    /// Mean water level in metres.
    #[serde(default = "default_tide_mean_m")]
    pub mean_level_m: f64,
    /// Half the tidal range in metres.
    #[serde(default = "default_tide_amplitude_m")]
    pub amplitude_m: f64,
    /// Tidal period in hours.
    #[serde(default = "default_tide_period_hours")]
    pub period_hours: f64,
    /// Unix seconds of a mean-level crossing on the rising tide.
    #[serde(default)]
    pub reference_timestamp: f64,
}

impl Default for TideConfig {
    fn default() -> Self {
        Self {
            mean_level_m: default_tide_mean_m(),
            amplitude_m: default_tide_amplitude_m(),
            period_hours: default_tide_period_hours(),
            reference_timestamp: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Advisory, data, logging
// ---------------------------------------------------------------------------

/// Advisory side channel settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdvisoryConfig {
    /// Whether playback reports are pushed at all.
    #[serde(default)]
    pub enabled: bool,
    /// Endpoint receiving the JSON reports.
    #[serde(default = "default_advisory_url")]
    pub url: String,
    /// Minimum engine time between two reports.
    #[serde(default = "default_report_interval_ms")]
    pub report_interval_ms: u64,
    /// Per-request timeout.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: default_advisory_url(),
            report_interval_ms: default_report_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl AdvisoryConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }
        if self.url.trim().is_empty() {
            return Err(invalid("advisory.url must be set when advisory is enabled"));
        }
        if self.report_interval_ms == 0 {
            return Err(invalid("advisory.report_interval_ms must be at least 1"));
        }
        Ok(())
    }
}

/// Input data locations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataConfig {
    /// Historian JSON document.
    #[serde(default = "default_history_path")]
    pub history_path: String,
    /// Optional snapshot of the live feed.
    #[serde(default)]
    pub live_path: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            history_path: default_history_path(),
            live_path: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_horizon_hours() -> f64 {
    12.0
}

const fn default_tick_interval_ms() -> u64 {
    100
}

const fn default_step() -> f64 {
    0.05
}

const fn default_slow_motion_factor() -> f64 {
    0.25
}

const fn default_crisis_hold_ms() -> u64 {
    5_000
}

const fn default_true() -> bool {
    true
}

fn default_prediction_status() -> String {
    "PREDICTED".to_owned()
}

fn default_motion_type() -> String {
    "Pilot Vessel".to_owned()
}

fn default_static_type() -> String {
    "Container Ship".to_owned()
}

fn default_scripted_type() -> String {
    "Cargo".to_owned()
}

fn default_underway() -> String {
    "UNDERWAY".to_owned()
}

fn default_hold_status() -> String {
    "HOLDING".to_owned()
}

fn default_motion_entity() -> MotionEntityConfig {
    MotionEntityConfig {
        id: "ELBE PILOT".to_owned(),
        vessel_type: default_motion_type(),
        // Finkenwerder down to the Waltershof junction.
        from: GeoPoint::new(53.5450, 9.8700),
        to: GeoPoint::new(53.5200, 9.9300),
    }
}

fn default_static_entity() -> StaticEntityConfig {
    StaticEntityConfig {
        id: "CTB BERTH".to_owned(),
        vessel_type: default_static_type(),
        position: GeoPoint::new(53.5420, 10.0100),
    }
}

fn default_scripted_paths() -> Vec<ScriptedPathConfig> {
    vec![
        ScriptedPathConfig {
            id: "MSC ANNA".to_owned(),
            crisis_id: Some("rethe-traffic".to_owned()),
            vessel_type: "Container Ship".to_owned(),
            status: default_underway(),
            hold_status: default_hold_status(),
            start: 4.0,
            end: 5.2,
            hold_for: 1.0,
            waypoints: vec![
                GeoPoint::new(53.5300, 9.9100),
                GeoPoint::new(53.5220, 9.9250),
                GeoPoint::new(53.5150, 9.9380),
                GeoPoint::new(53.5080, 9.9560),
                GeoPoint::new(53.5008, 9.9710),
            ],
        },
        ScriptedPathConfig {
            id: "ICE FLOE ELBE KM 620".to_owned(),
            crisis_id: Some("kattwyk-ice".to_owned()),
            vessel_type: "Hazard".to_owned(),
            status: "DRIFTING".to_owned(),
            hold_status: "GROUNDED".to_owned(),
            start: 8.0,
            end: 9.2,
            hold_for: 0.5,
            waypoints: vec![
                GeoPoint::new(53.5450, 9.8700),
                GeoPoint::new(53.5300, 9.9100),
                GeoPoint::new(53.5150, 9.9380),
                GeoPoint::new(53.4938, 9.9530),
            ],
        },
    ]
}

fn default_crises() -> Vec<CrisisDefinition> {
    vec![
        CrisisDefinition {
            id: "rethe-traffic".to_owned(),
            trigger_range: TriggerRange { lo: 5.0, hi: 5.2 },
            scenario_tag: "TRAFFIC".to_owned(),
        },
        CrisisDefinition {
            id: "kattwyk-ice".to_owned(),
            trigger_range: TriggerRange { lo: 9.0, hi: 9.2 },
            scenario_tag: "ICE".to_owned(),
        },
    ]
}

fn default_bridge_name() -> String {
    "RETHE".to_owned()
}

const fn default_bridge_position() -> GeoPoint {
    GeoPoint::new(53.5005, 9.9705)
}

const fn default_assumed_speed_knots() -> f64 {
    10.0
}

const fn default_alert_minutes() -> f64 {
    20.0
}

const fn default_critical_minutes() -> f64 {
    5.0
}

const fn default_tide_mean_m() -> f64 {
    2.0
}

const fn default_tide_amplitude_m() -> f64 {
    1.8
}

const fn default_tide_period_hours() -> f64 {
    12.42
}

fn default_advisory_url() -> String {
    "http://localhost:8000/advisory".to_owned()
}

const fn default_report_interval_ms() -> u64 {
    5_000
}

const fn default_request_timeout_ms() -> u64 {
    2_000
}

fn default_history_path() -> String {
    "data/history_24h.json".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = TidewatchConfig::default();
        assert_eq!(config.playback.mode, PlaybackMode::SignedOffset);
        assert_eq!(config.playback.horizon_hours, 12.0);
        assert_eq!(config.crises.len(), 2);
        assert_eq!(config.future.scripted_paths.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
playback:
  mode: percentage
  horizon_hours: 6

autoplay:
  tick_interval_ms: 250
  step: 0.5
  slow_motion_factor: 0.5
  autostart: false

future:
  prediction_status: "FORECAST"
  motion_entity:
    id: "TUG ALPHA"
    from: { lat: 53.53, lng: 9.91 }
    to: { lat: 53.52, lng: 9.93 }
  static_entity:
    id: "CTA BERTH"
    position: { lat: 53.515, lng: 9.938 }
  scripted_paths:
    - id: "GHOST"
      crisis_id: "sensor"
      start: 3
      end: 5
      hold_for: 1
      waypoints:
        - { lat: 0, lng: 0 }
        - { lat: 10, lng: 10 }

crises:
  - id: "sensor"
    trigger_range: { lo: 5.0, hi: 5.2 }
    scenario_tag: "SENSOR_FAILURE"

forecast:
  bridge_name: "KATTWYK"
  bridge: { lat: 53.4938, lng: 9.9530 }
  tide:
    period_hours: 12.42
    amplitude_m: 1.5

advisory:
  enabled: true
  url: "http://advisor.local/report"
  report_interval_ms: 1000

data:
  history_path: "/srv/tidewatch/history.json"
  live_path: "/srv/tidewatch/live.json"

logging:
  level: "debug"
"#;

        let config = TidewatchConfig::parse(yaml).unwrap();
        assert_eq!(config.playback.mode, PlaybackMode::Percentage);
        assert_eq!(config.autoplay.tick_interval_ms, 250);
        assert!(!config.autoplay.autostart);
        assert_eq!(config.future.prediction_status, "FORECAST");
        assert_eq!(config.future.motion_entity.vessel_type, "Pilot Vessel");
        assert_eq!(config.future.scripted_paths.first().unwrap().hold_status, "HOLDING");
        assert_eq!(config.crises.len(), 1);
        assert_eq!(config.forecast.bridge_name, "KATTWYK");
        assert_eq!(config.forecast.tide.mean_level_m, 2.0);
        assert_eq!(config.data.live_path.as_deref(), Some("/srv/tidewatch/live.json"));
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = TidewatchConfig::parse("autoplay:\n  step: 0.1\n").unwrap();
        assert_eq!(config.autoplay.step, 0.1);
        assert_eq!(config.autoplay.tick_interval_ms, 100);
        assert_eq!(config.crises.len(), 2);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = TidewatchConfig::parse("").unwrap();
        assert_eq!(config.playback, PlaybackConfig::default());
    }

    #[test]
    fn rejects_inverted_trigger_range() {
        let yaml = r#"
crises:
  - id: "backwards"
    trigger_range: { lo: 6.0, hi: 5.0 }
    scenario_tag: "TRAFFIC"
future:
  scripted_paths: []
"#;
        let err = TidewatchConfig::parse(yaml).unwrap().validate().unwrap_err();
        assert!(err.to_string().contains("backwards"));
    }

    #[test]
    fn rejects_duplicate_crisis_ids() {
        let mut config = TidewatchConfig::default();
        let first = config.crises.first().cloned().unwrap();
        config.crises.push(first);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_single_waypoint_path() {
        let mut config = TidewatchConfig::default();
        if let Some(path) = config.future.scripted_paths.first_mut() {
            path.waypoints.truncate(1);
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_path_for_unknown_crisis() {
        let mut config = TidewatchConfig::default();
        config.crises.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_autoplay_values() {
        let mut config = TidewatchConfig::default();
        config.autoplay.slow_motion_factor = 0.0;
        assert!(config.validate().is_err());

        let mut config = TidewatchConfig::default();
        config.autoplay.step = -0.05;
        assert!(config.validate().is_err());

        let mut config = TidewatchConfig::default();
        config.playback.horizon_hours = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn enabled_advisory_needs_url() {
        let mut config = TidewatchConfig::default();
        config.advisory.enabled = true;
        config.advisory.url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("tidewatch-config.yaml");
        if path.exists() {
            let config = TidewatchConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
            assert!(config.unwrap().validate().is_ok());
        }
    }
}
