//! The autoplay clock handle.
//!
//! [`AutoplayClock`] owns the spawned [`run_autoplay`] task and is the only
//! way the rest of the program touches a running session. Every operation
//! takes the engine lock, so seeks and ticks never interleave.
//!
//! Stopping is deterministic: [`AutoplayClock::stop`] raises the stop flag,
//! wakes the task and awaits its handle. The task checks the flag under the
//! engine lock before every tick, so after `stop` returns nothing mutates the
//! playback state on the clock's behalf.

use std::sync::Arc;

use chrono::Utc;
use tidewatch_types::{CrisisEvent, Frame, LiveWorld};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{info, warn};

use crate::control::ClockControl;
use crate::engine::PlaybackEngine;
use crate::runner::{AutoplayResult, FrameConsumer, ReportSink, run_autoplay};

/// Timing parameters of a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSettings {
    /// Real-time milliseconds between ticks.
    pub tick_interval_ms: u64,
    /// Minimum time between advisory reports; `None` disables them.
    pub report_interval: Option<Duration>,
}

/// Handle to a running autoplay task.
#[derive(Debug)]
pub struct AutoplayClock {
    engine: Arc<Mutex<PlaybackEngine>>,
    control: Arc<ClockControl>,
    handle: Option<JoinHandle<AutoplayResult>>,
}

impl AutoplayClock {
    /// Spawn the autoplay task on the current tokio runtime.
    pub fn start<C>(
        engine: Arc<Mutex<PlaybackEngine>>,
        settings: ClockSettings,
        consumer: C,
        sink: Arc<dyn ReportSink>,
    ) -> Self
    where
        C: FrameConsumer + 'static,
    {
        let control = Arc::new(ClockControl::new(settings.tick_interval_ms));
        let handle = {
            let engine = Arc::clone(&engine);
            let control = Arc::clone(&control);
            let mut consumer = consumer;
            tokio::spawn(async move {
                run_autoplay(
                    engine,
                    control,
                    &mut consumer,
                    sink.as_ref(),
                    settings.report_interval,
                )
                .await
            })
        };
        info!(tick_interval_ms = settings.tick_interval_ms, "Autoplay clock started");
        Self {
            engine,
            control,
            handle: Some(handle),
        }
    }

    /// The shared engine.
    pub const fn engine(&self) -> &Arc<Mutex<PlaybackEngine>> {
        &self.engine
    }

    /// Whether the task has not been stopped yet.
    pub const fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop the task and wait for it to finish.
    ///
    /// Returns `None` if the clock was already stopped or the task panicked.
    pub async fn stop(&mut self) -> Option<AutoplayResult> {
        let handle = self.handle.take()?;
        self.control.request_stop();
        match handle.await {
            Ok(result) => Some(result),
            Err(err) => {
                warn!(error = %err, "Autoplay task did not finish cleanly");
                None
            }
        }
    }

    /// Jump to `value` (clamped) and return the resulting frame.
    pub async fn seek(&self, value: f64) -> Frame {
        let mut engine = self.engine.lock().await;
        engine.seek(value, Utc::now())
    }

    /// Resume autoplay.
    pub async fn play(&self) {
        self.engine.lock().await.play();
        self.control.wake();
    }

    /// Pause autoplay.
    pub async fn pause(&self) {
        self.engine.lock().await.pause();
    }

    /// Resolve the active crisis; see [`PlaybackEngine::acknowledge`].
    pub async fn acknowledge(&self) -> Option<CrisisEvent> {
        self.engine.lock().await.acknowledge()
    }

    /// Replace the live feed snapshot.
    pub async fn set_live(&self, live: LiveWorld) {
        self.engine.lock().await.set_live(live);
    }
}

impl Drop for AutoplayClock {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.control.request_stop();
            handle.abort();
        }
    }
}
