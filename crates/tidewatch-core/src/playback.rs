//! Playback state and its pure reducers.
//!
//! [`PlaybackState`] is the only mutable state of a session. It changes
//! through two reducers: [`advance`] for clock ticks and [`seek`] for user
//! input. Both return the new state together with the [`Step`] they took, so
//! the crisis scheduler and the tests see exactly what moved.

use crate::crisis::{CrisisBoard, CrisisScheduler, Step, StepOrigin};
use crate::mapper::SliderDomain;

/// Fraction of the step size within which an advanced value is snapped onto
/// the live pivot or the domain maximum.
const SNAP_TOLERANCE: f64 = 1e-9;

/// Slider position, play flag and crisis bookkeeping of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Current slider value, always inside the domain.
    pub slider_value: f64,
    /// Whether the autoplay clock advances the slider.
    pub is_playing: bool,
    /// Whether the last tick ran at reduced speed because a bridge was open.
    pub slow_motion: bool,
    /// Crisis phases, the active crisis and the deferred queue.
    pub crises: CrisisBoard,
}

impl PlaybackState {
    /// A fresh session at `slider_value` with every crisis armed.
    pub fn new(slider_value: f64, is_playing: bool, scheduler: &CrisisScheduler) -> Self {
        Self {
            slider_value,
            is_playing,
            slow_motion: false,
            crises: scheduler.armed_board(),
        }
    }
}

/// Advance the slider by `step_size`, wrapping past the domain maximum.
///
/// Exceeding `domain.max` restarts at `domain.min`; landing exactly on the
/// maximum is allowed so the live pivot of the percentage domain is reached.
/// Repeated float addition drifts, so a value within rounding distance of
/// the live pivot or the maximum is snapped onto it.
pub fn advance(state: &PlaybackState, step_size: f64, domain: SliderDomain) -> (PlaybackState, Step) {
    let prev = state.slider_value;
    let candidate = snap(prev + step_size, step_size.abs() * SNAP_TOLERANCE, domain);
    let wrapped = candidate > domain.max;
    let cur = if wrapped {
        domain.min
    } else {
        candidate.max(domain.min)
    };

    let next = PlaybackState {
        slider_value: cur,
        ..state.clone()
    };
    let step = Step {
        prev,
        cur,
        origin: StepOrigin::Autoplay,
        wrapped,
    };
    (next, step)
}

fn snap(value: f64, tolerance: f64, domain: SliderDomain) -> f64 {
    if (value - domain.live).abs() <= tolerance {
        domain.live
    } else if (value - domain.max).abs() <= tolerance {
        domain.max
    } else {
        value
    }
}

/// Move the slider to `value`, already clamped into the domain.
///
/// Clears slow motion and re-arms every crisis. Applying the same seek twice
/// yields the same state.
pub fn seek(state: &PlaybackState, value: f64, scheduler: &CrisisScheduler) -> (PlaybackState, Step) {
    let mut next = PlaybackState {
        slider_value: value,
        slow_motion: false,
        ..state.clone()
    };
    scheduler.rearm(&mut next.crises);
    let step = Step {
        prev: state.slider_value,
        cur: value,
        origin: StepOrigin::Seek,
        wrapped: false,
    };
    (next, step)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use tidewatch_types::{CrisisDefinition, TriggerRange};

    use super::*;

    fn scheduler() -> CrisisScheduler {
        CrisisScheduler::new(vec![CrisisDefinition {
            id: "sensor".to_owned(),
            trigger_range: TriggerRange { lo: 5.0, hi: 5.2 },
            scenario_tag: "SENSOR_FAILURE".to_owned(),
        }])
    }

    fn signed_domain() -> SliderDomain {
        SliderDomain {
            min: -12.0,
            max: 12.0,
            live: 0.0,
        }
    }

    #[test]
    fn advance_moves_forward() {
        let state = PlaybackState::new(-1.0, true, &scheduler());
        let (next, step) = advance(&state, 0.5, signed_domain());
        assert_eq!(next.slider_value, -0.5);
        assert_eq!(step.prev, -1.0);
        assert!(!step.wrapped);
        assert_eq!(step.origin, StepOrigin::Autoplay);
    }

    #[test]
    fn advance_wraps_past_maximum() {
        let state = PlaybackState::new(11.9, true, &scheduler());
        let (next, step) = advance(&state, 0.2, signed_domain());
        assert_eq!(next.slider_value, -12.0);
        assert!(step.wrapped);
    }

    #[test]
    fn advance_may_land_on_maximum() {
        let domain = SliderDomain {
            min: 0.0,
            max: 100.0,
            live: 100.0,
        };
        let state = PlaybackState::new(99.0, true, &scheduler());
        let (next, step) = advance(&state, 1.0, domain);
        assert_eq!(next.slider_value, 100.0);
        assert!(!step.wrapped);
    }

    #[test]
    fn advance_snaps_drifted_value_onto_live_pivot() {
        let mut state = PlaybackState::new(-12.0, true, &scheduler());
        let mut live_hits = 0_u32;
        for _ in 0..480 {
            let (next, _) = advance(&state, 0.05, signed_domain());
            if next.slider_value == 0.0 {
                live_hits = live_hits.saturating_add(1);
            }
            state = next;
        }
        assert_eq!(live_hits, 1);
    }

    #[test]
    fn advance_snaps_onto_maximum_instead_of_wrapping() {
        let domain = SliderDomain {
            min: 0.0,
            max: 100.0,
            live: 100.0,
        };
        let state = PlaybackState::new(99.9 + 1e-12, true, &scheduler());
        let (next, step) = advance(&state, 0.1, domain);
        assert_eq!(next.slider_value, 100.0);
        assert!(!step.wrapped);

        let state = PlaybackState::new(99.9 - 1e-12, true, &scheduler());
        let (next, _) = advance(&state, 0.1, domain);
        assert_eq!(next.slider_value, 100.0);
    }

    #[test]
    fn seek_is_idempotent_and_rearms() {
        let s = scheduler();
        let mut state = PlaybackState::new(4.9, true, &s);
        state.slow_motion = true;
        let (fired, step) = advance(&state, 0.2, signed_domain());
        let mut fired = fired;
        assert!(s.observe(&mut fired.crises, &step).is_some());
        assert!(!fired.crises.is_armed("sensor"));

        let (once, _) = seek(&fired, 3.0, &s);
        let (twice, _) = seek(&once, 3.0, &s);
        assert_eq!(once, twice);
        assert!(once.crises.is_armed("sensor"));
        assert!(!once.slow_motion);
        assert_eq!(once.slider_value, 3.0);
    }
}
