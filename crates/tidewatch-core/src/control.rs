//! Shared control state between the autoplay task and its handle.
//!
//! The play flag itself lives in [`PlaybackState`] behind the engine lock so
//! that ticks, seeks and crisis pauses all see one value. This struct only
//! carries what the task must observe without taking that lock: the stop
//! request, the wake-up signal, and the runtime-adjustable tick interval.
//!
//! [`PlaybackState`]: crate::playback::PlaybackState

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::Notify;

/// Smallest accepted tick interval.
pub const MIN_TICK_INTERVAL_MS: u64 = 10;

/// Control flags shared by the autoplay task and [`AutoplayClock`].
///
/// [`AutoplayClock`]: crate::clock::AutoplayClock
#[derive(Debug)]
pub struct ClockControl {
    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Wakes the task when playback resumes or a stop is requested.
    wake: Notify,

    /// Current tick interval in milliseconds (runtime-adjustable).
    tick_interval_ms: AtomicU64,

    /// Ticks that advanced the slider since start.
    ticks: AtomicU64,
}

impl ClockControl {
    /// Create control state with the given tick interval.
    pub fn new(tick_interval_ms: u64) -> Self {
        Self {
            stop_requested: AtomicBool::new(false),
            wake: Notify::new(),
            tick_interval_ms: AtomicU64::new(tick_interval_ms),
            ticks: AtomicU64::new(0),
        }
    }

    // -----------------------------------------------------------------------
    // Wake-up
    // -----------------------------------------------------------------------

    /// Wake the task if it is waiting for playback to resume.
    ///
    /// A wake-up sent while the task is busy is kept and consumed by its
    /// next wait, so none is lost between checking the play flag and
    /// starting to wait.
    pub fn wake(&self) {
        self.wake.notify_one();
    }

    /// Wait for the next [`wake`](Self::wake).
    pub async fn woken(&self) {
        self.wake.notified().await;
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean stop and wake the task.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.wake.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    // -----------------------------------------------------------------------
    // Tick speed
    // -----------------------------------------------------------------------

    /// Get the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Set the tick interval in milliseconds.
    ///
    /// Returns the previous interval, or `None` if `ms` is below
    /// [`MIN_TICK_INTERVAL_MS`].
    pub fn set_tick_interval_ms(&self, ms: u64) -> Option<u64> {
        if ms < MIN_TICK_INTERVAL_MS {
            return None;
        }
        Some(self.tick_interval_ms.swap(ms, Ordering::AcqRel))
    }

    // -----------------------------------------------------------------------
    // Counters
    // -----------------------------------------------------------------------

    /// Record one advancing tick.
    pub fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::AcqRel);
    }

    /// Ticks that advanced the slider since start.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }
}
