//! Scripted crisis scheduling.
//!
//! Each [`CrisisDefinition`] fires at most once per forward pass of the
//! autoplay clock. A definition moves `Armed -> Triggered -> Resolved` and
//! only returns to `Armed` when the pass restarts: a manual seek, a reload,
//! or the autoplay wrap. Only one crisis is shown at a time; a definition
//! whose range is crossed while another crisis is still unacknowledged is
//! parked as `Deferred` and promoted on acknowledgement.
//!
//! Firing is a crossing test on the step `(prev, cur]` rather than a
//! containment test on `cur`, so a step large enough to jump over a narrow
//! range still fires.

use std::collections::{BTreeMap, VecDeque};

use tidewatch_types::{CrisisDefinition, CrisisEvent, CrisisPhase};
use tracing::{debug, info};

/// Where a slider change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOrigin {
    /// A clock tick.
    Autoplay,
    /// A user seek. Never triggers a crisis.
    Seek,
}

/// One slider movement as seen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Value before the step.
    pub prev: f64,
    /// Value after the step.
    pub cur: f64,
    /// What moved the slider.
    pub origin: StepOrigin,
    /// The step ran past the domain maximum and restarted at the minimum.
    pub wrapped: bool,
}

/// Per-session crisis bookkeeping, owned by the playback state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrisisBoard {
    phases: BTreeMap<String, CrisisPhase>,
    active: Option<CrisisEvent>,
    deferred: VecDeque<CrisisEvent>,
}

impl CrisisBoard {
    /// Phase of the definition `id`, if known.
    pub fn phase(&self, id: &str) -> Option<CrisisPhase> {
        self.phases.get(id).copied()
    }

    /// Whether the definition `id` can still fire on this pass.
    pub fn is_armed(&self, id: &str) -> bool {
        self.phase(id) == Some(CrisisPhase::Armed)
    }

    /// Arm flag of every definition, keyed by id.
    pub fn arm_flags(&self) -> BTreeMap<String, bool> {
        self.phases
            .iter()
            .map(|(id, phase)| (id.clone(), *phase == CrisisPhase::Armed))
            .collect()
    }

    /// The crisis currently waiting for acknowledgement.
    pub const fn active(&self) -> Option<&CrisisEvent> {
        self.active.as_ref()
    }

    /// Crises queued behind the active one, oldest first.
    pub fn deferred(&self) -> impl Iterator<Item = &CrisisEvent> {
        self.deferred.iter()
    }
}

/// Watches slider steps and fires the configured crises.
#[derive(Debug, Clone, Default)]
pub struct CrisisScheduler {
    definitions: Vec<CrisisDefinition>,
}

impl CrisisScheduler {
    /// Create a scheduler over `definitions`, evaluated in the given order.
    pub const fn new(definitions: Vec<CrisisDefinition>) -> Self {
        Self { definitions }
    }

    /// The configured definitions.
    pub fn definitions(&self) -> &[CrisisDefinition] {
        &self.definitions
    }

    /// A board with every definition armed.
    pub fn armed_board(&self) -> CrisisBoard {
        let mut board = CrisisBoard::default();
        self.rearm(&mut board);
        board
    }

    /// Start a new pass: every definition armed, nothing active or queued.
    pub fn rearm(&self, board: &mut CrisisBoard) {
        board.phases = self
            .definitions
            .iter()
            .map(|d| (d.id.clone(), CrisisPhase::Armed))
            .collect();
        board.active = None;
        board.deferred.clear();
    }

    /// Evaluate `step` against every armed definition.
    ///
    /// Returns the event that became active on this step, if any. A wrapped
    /// step re-arms the board instead of evaluating, and seeks never fire.
    pub fn observe(&self, board: &mut CrisisBoard, step: &Step) -> Option<CrisisEvent> {
        if step.wrapped {
            debug!(prev = step.prev, cur = step.cur, "Slider wrapped, re-arming crises");
            self.rearm(board);
            return None;
        }
        if step.origin != StepOrigin::Autoplay || step.cur <= step.prev {
            return None;
        }

        let mut fired = None;
        for definition in &self.definitions {
            if !board.is_armed(&definition.id)
                || !definition.trigger_range.crossed_by(step.prev, step.cur)
            {
                continue;
            }

            let event = CrisisEvent {
                definition_id: definition.id.clone(),
                scenario_tag: definition.scenario_tag.clone(),
                fired_at_slider_value: step.cur,
            };

            if board.active.is_none() {
                info!(
                    crisis = %definition.id,
                    scenario = %definition.scenario_tag,
                    slider = step.cur,
                    "Crisis triggered"
                );
                board.phases.insert(definition.id.clone(), CrisisPhase::Triggered);
                board.active = Some(event.clone());
                fired = Some(event);
            } else {
                info!(crisis = %definition.id, "Crisis deferred behind active crisis");
                board.phases.insert(definition.id.clone(), CrisisPhase::Deferred);
                board.deferred.push_back(event);
            }
        }
        fired
    }

    /// Resolve the active crisis and promote the next deferred one.
    ///
    /// Returns the promoted event, which is now active. Resolved crises stay
    /// disarmed until the next re-arm.
    pub fn acknowledge(&self, board: &mut CrisisBoard) -> Option<CrisisEvent> {
        let resolved = board.active.take()?;
        board
            .phases
            .insert(resolved.definition_id.clone(), CrisisPhase::Resolved);
        info!(crisis = %resolved.definition_id, "Crisis acknowledged");

        let next = board.deferred.pop_front()?;
        board
            .phases
            .insert(next.definition_id.clone(), CrisisPhase::Triggered);
        board.active = Some(next.clone());
        info!(crisis = %next.definition_id, "Deferred crisis promoted");
        Some(next)
    }
}
