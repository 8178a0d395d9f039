//! Headless Tidewatch engine.
//!
//! Wires the playback engine to the autoplay clock and runs it until
//! interrupted. Frames are logged instead of rendered; crises are shown for
//! `autoplay.crisis_hold_ms` and then acknowledged automatically so the
//! session keeps moving.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `tidewatch-config.yaml` (or `TIDEWATCH_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Validate configuration
//! 4. Load recorded history and the optional live snapshot
//! 5. Build the playback engine and the report sink
//! 6. Start the autoplay clock
//! 7. Consume frames until Ctrl-C, acknowledging crises
//! 8. Stop the clock and log the result

mod advisory;
mod data;
mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tidewatch_core::clock::{AutoplayClock, ClockSettings};
use tidewatch_core::config::TidewatchConfig;
use tidewatch_core::engine::PlaybackEngine;
use tidewatch_core::runner::{self, ChannelConsumer, NoOpSink, ReportSink};
use tidewatch_types::Frame;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::advisory::HttpReportSink;
use crate::error::EngineError;

/// Application entry point for the headless engine.
///
/// # Errors
///
/// Returns an error if configuration or history loading fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("tidewatch-engine starting");

    // 3. Validate.
    config.validate()?;
    info!(
        mode = ?config.playback.mode,
        horizon_hours = config.playback.horizon_hours,
        tick_interval_ms = config.autoplay.tick_interval_ms,
        step = config.autoplay.step,
        crises = config.crises.len(),
        advisory = config.advisory.enabled,
        "Configuration loaded"
    );

    // 4. Load data.
    let store = data::load_history(Path::new(&config.data.history_path))?.map(Arc::new);
    let live = config
        .data
        .live_path
        .as_deref()
        .and_then(|path| data::load_live(Path::new(path)));

    // 5. Engine and report sink.
    let engine = Arc::new(Mutex::new(PlaybackEngine::new(&config, store, live)));
    let sink: Arc<dyn ReportSink> = if config.advisory.enabled {
        info!(url = %config.advisory.url, "Advisory reporting enabled");
        Arc::new(HttpReportSink::new(&config.advisory)?)
    } else {
        Arc::new(NoOpSink)
    };
    let settings = ClockSettings {
        tick_interval_ms: config.autoplay.tick_interval_ms,
        report_interval: config
            .advisory
            .enabled
            .then(|| Duration::from_millis(config.advisory.report_interval_ms)),
    };

    // 6. Start the clock.
    let (consumer, mut frames) = ChannelConsumer::channel();
    let mut clock = AutoplayClock::start(engine, settings, consumer, sink);

    // 7. Consume frames.
    let hold = Duration::from_millis(config.autoplay.crisis_hold_ms);
    let mut acknowledge_at: Option<Instant> = None;

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!(error = %e, "Failed to listen for Ctrl-C, shutting down");
                }
                info!("Shutdown requested");
                break;
            }
            () = tokio::time::sleep_until(acknowledge_at.unwrap_or_else(Instant::now)),
                if acknowledge_at.is_some() =>
            {
                if let Some(next) = clock.acknowledge().await {
                    info!(crisis = %next.definition_id, "Deferred crisis now active");
                    acknowledge_at = Instant::now().checked_add(hold);
                } else {
                    info!("Crisis acknowledged, resuming playback");
                    acknowledge_at = None;
                    clock.play().await;
                }
            }
            received = frames.recv() => {
                let Some(frame) = received else {
                    warn!("Frame channel closed");
                    break;
                };
                log_frame(&frame);
                if frame.crisis_event.is_some() {
                    acknowledge_at = Instant::now().checked_add(hold);
                }
            }
        }
    }

    // 8. Stop and report.
    if let Some(result) = clock.stop().await {
        runner::log_autoplay_end(&result);
    }
    info!("tidewatch-engine shutdown complete");
    Ok(())
}

/// Load configuration from `TIDEWATCH_CONFIG` or `tidewatch-config.yaml`.
///
/// A missing file yields the defaults.
fn load_config() -> Result<TidewatchConfig, EngineError> {
    let config_path = std::env::var_os("TIDEWATCH_CONFIG")
        .map_or_else(|| PathBuf::from("tidewatch-config.yaml"), PathBuf::from);
    if config_path.exists() {
        Ok(TidewatchConfig::from_file(&config_path)?)
    } else {
        let mut config = TidewatchConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

fn log_frame(frame: &Frame) {
    debug!(
        slider = frame.slider_value,
        time = %frame.display_time_label,
        live = frame.is_live,
        future = frame.is_future,
        ships = frame.visible_ships.len(),
        bridge_open = frame.environment.any_bridge_open(),
        risk = frame.bridge_forecast.risk_score,
        "Frame"
    );
}
