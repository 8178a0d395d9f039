//! Autoplay loop.
//!
//! [`run_autoplay`] drives the engine on a fixed interval:
//!
//! - **Pause/resume**: while the engine is paused the loop waits for a wake-up
//!   instead of polling
//! - **Variable tick speed**: the interval is re-read from [`ClockControl`]
//!   on every tick
//! - **Clean shutdown**: the stop flag is checked while holding the engine
//!   lock, so once a stop is observed no further tick touches the state
//! - **Advisory reports**: non-live frames are handed to a [`ReportSink`] at
//!   most once per report interval
//!
//! Frames are delivered to a [`FrameConsumer`] after the engine lock has been
//! released.

use std::sync::Arc;

use chrono::Utc;
use tidewatch_types::{Frame, PlaybackReport};
use tokio::sync::{Mutex, mpsc};
use tokio::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::control::ClockControl;
use crate::engine::PlaybackEngine;

/// Receives every frame the clock produces.
pub trait FrameConsumer: Send {
    /// Called after each tick with the new frame.
    fn on_frame(&mut self, frame: &Frame);
}

/// A frame consumer that drops everything.
pub struct NoOpConsumer;

impl FrameConsumer for NoOpConsumer {
    fn on_frame(&mut self, _frame: &Frame) {}
}

/// Forwards frames into an unbounded channel.
///
/// Frames sent after the receiver is gone are dropped.
pub struct ChannelConsumer {
    sender: mpsc::UnboundedSender<Frame>,
}

impl ChannelConsumer {
    /// Create a consumer and the receiver it feeds.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Frame>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl FrameConsumer for ChannelConsumer {
    fn on_frame(&mut self, frame: &Frame) {
        if self.sender.send(frame.clone()).is_err() {
            debug!("Frame receiver dropped");
        }
    }
}

/// Side channel for playback reports. Implementations must not block.
pub trait ReportSink: Send + Sync {
    /// Hand over one report. Failures are the sink's to log.
    fn submit(&self, report: PlaybackReport);
}

/// A report sink that drops everything.
pub struct NoOpSink;

impl ReportSink for NoOpSink {
    fn submit(&self, _report: PlaybackReport) {}
}

/// Outcome of an autoplay run.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoplayResult {
    /// Ticks that advanced the slider.
    pub total_ticks: u64,
    /// Reports handed to the sink.
    pub reports_submitted: u64,
    /// Slider value when the loop stopped.
    pub final_slider_value: f64,
}

/// Run the autoplay loop until a stop is requested.
///
/// `report_interval` of `None` disables reporting.
pub async fn run_autoplay(
    engine: Arc<Mutex<PlaybackEngine>>,
    control: Arc<ClockControl>,
    consumer: &mut dyn FrameConsumer,
    sink: &dyn ReportSink,
    report_interval: Option<Duration>,
) -> AutoplayResult {
    let mut reports_submitted: u64 = 0;
    let mut last_report: Option<Instant> = None;

    info!(
        tick_interval_ms = control.tick_interval_ms(),
        reporting = report_interval.is_some(),
        "Autoplay starting"
    );

    loop {
        // --- Tick under the engine lock ---
        let ticked = {
            let mut guard = engine.lock().await;
            if control.is_stop_requested() {
                info!("Autoplay stop requested");
                return AutoplayResult {
                    total_ticks: control.ticks(),
                    reports_submitted,
                    final_slider_value: guard.state().slider_value,
                };
            }

            if guard.is_playing() {
                let frame = guard.tick(Utc::now());
                control.record_tick();

                let due = report_interval
                    .is_some_and(|every| last_report.is_none_or(|at| at.elapsed() >= every));
                let report = if due { guard.report(&frame) } else { None };
                Some((frame, report))
            } else {
                None
            }
        };

        // --- Paused: wait for play or stop ---
        let Some((frame, report)) = ticked else {
            debug!("Autoplay paused, waiting for wake-up");
            control.woken().await;
            continue;
        };

        if let Some(event) = &frame.crisis_event {
            warn!(
                crisis = %event.definition_id,
                scenario = %event.scenario_tag,
                slider = event.fired_at_slider_value,
                "Crisis fired, autoplay paused"
            );
        }

        consumer.on_frame(&frame);

        if let Some(report) = report {
            sink.submit(report);
            reports_submitted = reports_submitted.saturating_add(1);
            last_report = Some(Instant::now());
        }

        // --- Sleep for tick interval, cut short by a wake-up ---
        let interval = Duration::from_millis(control.tick_interval_ms());
        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            () = control.woken() => {}
        }
    }
}

/// Log the end of an autoplay run.
pub fn log_autoplay_end(result: &AutoplayResult) {
    info!(
        total_ticks = result.total_ticks,
        reports = result.reports_submitted,
        final_slider_value = result.final_slider_value,
        "Autoplay ended"
    );
    if result.total_ticks == 0 {
        warn!("Autoplay ended with no ticks executed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use super::*;
    use crate::config::TidewatchConfig;

    struct RecordingSink {
        reports: StdMutex<Vec<PlaybackReport>>,
    }

    impl ReportSink for RecordingSink {
        fn submit(&self, report: PlaybackReport) {
            if let Ok(mut reports) = self.reports.lock() {
                reports.push(report);
            }
        }
    }

    fn shared_engine() -> Arc<Mutex<PlaybackEngine>> {
        let store = tidewatch_history::TrackStore::from_json(
            r#"{
                "window_start": 1769691600, "window_end": 1769778000,
                "ships": [{"id": "ONE TRIUMPH", "path": [
                    {"ts": 1769691600, "lat": 53.5450, "lng": 9.8700},
                    {"ts": 1769778000, "lat": 53.5200, "lng": 9.9300}
                ]}]
            }"#,
        )
        .unwrap();
        let mut config = TidewatchConfig::default();
        config.crises.clear();
        config.future.scripted_paths.clear();
        Arc::new(Mutex::new(PlaybackEngine::new(
            &config,
            Some(Arc::new(store)),
            None,
        )))
    }

    #[tokio::test]
    async fn stop_before_first_tick() {
        let engine = shared_engine();
        let control = Arc::new(ClockControl::new(100));
        control.request_stop();

        let result = run_autoplay(engine, control, &mut NoOpConsumer, &NoOpSink, None).await;
        assert_eq!(result.total_ticks, 0);
        assert_eq!(result.reports_submitted, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn frames_reach_consumer_and_reports_are_throttled() {
        let engine = shared_engine();
        let control = Arc::new(ClockControl::new(100));
        let sink = Arc::new(RecordingSink {
            reports: StdMutex::new(Vec::new()),
        });
        let (mut consumer, mut frames) = ChannelConsumer::channel();

        let task = {
            let engine = Arc::clone(&engine);
            let control = Arc::clone(&control);
            let sink = Arc::clone(&sink);
            tokio::spawn(async move {
                run_autoplay(
                    engine,
                    control,
                    &mut consumer,
                    sink.as_ref(),
                    Some(Duration::from_millis(1_000)),
                )
                .await
            })
        };

        tokio::time::sleep(Duration::from_millis(2_050)).await;
        control.request_stop();
        let result = task.await.unwrap();

        let mut received = 0_u64;
        while frames.try_recv().is_ok() {
            received = received.saturating_add(1);
        }
        assert_eq!(received, result.total_ticks);
        assert!(result.total_ticks >= 20, "ticks = {}", result.total_ticks);

        let reports = sink.reports.lock().unwrap().len();
        assert_eq!(u64::try_from(reports).unwrap(), result.reports_submitted);
        assert!((2..=3).contains(&reports), "reports = {reports}");
    }
}
