//! Timed drill step sequencer.
//!
//! A [`DrillSequencer`] runs one attempt at one scenario. It never reads a
//! clock: the embedding application calls [`DrillSequencer::tick`] (or
//! [`DrillSequencer::advance_second`]) once per real second, and tests call
//! them as fast as they like.
//!
//! # States
//!
//! ```text
//! NotStarted --start--> Running <--pause/resume--> Paused
//!                          |
//!                          +--last step runs out--> Completed
//! ```
//!
//! `Completed` is terminal; only `reset` (or a fresh `start`) leaves it.
//!
//! # Tick phases
//!
//! A tick on a step with time left consumes one second. A tick on a step
//! that has already hit zero rolls over instead: it moves to the next step
//! (loading that step's duration) or completes the drill, without touching
//! the elapsed counter. Reaching zero on one tick therefore advances on the
//! following tick.
//!
//! `tick`, `pause` and `resume` are ignored outside their valid states.
//!
//! ```
//! use std::sync::Arc;
//! use resq_logic::scenario::{Scenario, Step};
//! use resq_logic::sequencer::{DrillSequencer, DrillStatus, TickOutcome};
//!
//! let scenario = Arc::new(Scenario::new(
//!     "Short",
//!     vec![Step::new("DROP", "Drop.", 1), Step::new("COVER", "Cover.", 1)],
//! ));
//! let mut drill = DrillSequencer::new();
//! drill.start(scenario).unwrap();
//!
//! assert_eq!(drill.tick(), TickOutcome::Counted);
//! assert_eq!(drill.tick(), TickOutcome::Advanced { step: 1 });
//! assert_eq!(drill.tick(), TickOutcome::Counted);
//! assert_eq!(drill.tick(), TickOutcome::Completed { elapsed_secs: 2 });
//! assert_eq!(drill.status(), DrillStatus::Completed);
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::DrillError;
use crate::grade::Grade;
use crate::scenario::{Scenario, Step};

/// Lifecycle state of a drill attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DrillStatus {
    #[default]
    NotStarted,
    Running,
    Paused,
    Completed,
}

/// What a single `tick` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    /// Not running; nothing changed.
    Idle,
    /// One second of the current step was consumed.
    Counted,
    /// Rolled over to the step at `step`.
    Advanced { step: usize },
    /// The last step had run out; the drill is now complete.
    Completed { elapsed_secs: u32 },
}

/// Graded result of a completed drill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillOutcome {
    pub scenario: String,
    pub elapsed_secs: u32,
    pub grade: Grade,
}

/// Presentation view of a sequencer at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencerSnapshot {
    pub scenario: Option<String>,
    pub status: DrillStatus,
    pub step_index: Option<usize>,
    pub step_count: usize,
    pub action: Option<String>,
    pub remaining_secs: u32,
    pub elapsed_secs: u32,
    pub progress_percent: f32,
}

/// One drill attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrillSequencer {
    scenario: Option<Arc<Scenario>>,
    current_step: Option<usize>,
    remaining_secs: u32,
    elapsed_secs: u32,
    status: DrillStatus,
}

impl DrillSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin (or restart) a drill on `scenario`.
    ///
    /// Fails with [`DrillError::InvalidScenario`] if the scenario has no steps,
    /// any step has a zero duration, or the durations sum past `u32::MAX`;
    /// the sequencer is left untouched.
    pub fn start(&mut self, scenario: Arc<Scenario>) -> Result<(), DrillError> {
        if let Err(e) = scenario.validate() {
            log::warn!("refusing to start drill: {}", e);
            return Err(e);
        }
        let first = scenario.steps()[0].duration_secs;
        log::debug!(
            "drill `{}` started: {} steps, {}s budget",
            scenario.name,
            scenario.len(),
            scenario.total_duration_secs()
        );
        *self = Self {
            scenario: Some(scenario),
            current_step: Some(0),
            remaining_secs: first,
            elapsed_secs: 0,
            status: DrillStatus::Running,
        };
        Ok(())
    }

    /// Advance time by one unit. See the module docs for the two phases.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != DrillStatus::Running {
            return TickOutcome::Idle;
        }
        let (Some(scenario), Some(current)) = (self.scenario.as_ref(), self.current_step) else {
            return TickOutcome::Idle;
        };

        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
            self.elapsed_secs += 1;
            return TickOutcome::Counted;
        }

        match scenario.step(current + 1) {
            Some(next) => {
                self.current_step = Some(next.index);
                self.remaining_secs = next.duration_secs;
                log::debug!(
                    "drill `{}` advanced to step {} ({})",
                    scenario.name,
                    next.index,
                    next.action
                );
                TickOutcome::Advanced { step: next.index }
            }
            None => {
                self.status = DrillStatus::Completed;
                log::info!(
                    "drill `{}` completed in {}s ({})",
                    scenario.name,
                    self.elapsed_secs,
                    Grade::from_elapsed(self.elapsed_secs)
                );
                TickOutcome::Completed {
                    elapsed_secs: self.elapsed_secs,
                }
            }
        }
    }

    /// Advance by one wall-clock second.
    ///
    /// Consumes one second and then performs any step roll-over in the same
    /// call, so roll-overs take no time. Driving a drill with this method,
    /// a scenario completes after exactly `total_duration_secs` calls.
    /// Returns the last thing that happened.
    pub fn advance_second(&mut self) -> TickOutcome {
        let mut outcome = self.tick();
        // A roll-over left pending by raw `tick` calls is settled first.
        if let TickOutcome::Advanced { .. } = outcome {
            outcome = self.tick();
        }
        if outcome == TickOutcome::Counted && self.remaining_secs == 0 {
            return self.tick();
        }
        outcome
    }

    /// Pause a running drill. Returns whether the drill was paused.
    pub fn pause(&mut self) -> bool {
        if self.status != DrillStatus::Running {
            return false;
        }
        self.status = DrillStatus::Paused;
        true
    }

    /// Resume a paused drill. Returns whether the drill was resumed.
    pub fn resume(&mut self) -> bool {
        if self.status != DrillStatus::Paused {
            return false;
        }
        self.status = DrillStatus::Running;
        true
    }

    /// Single pause/resume control: pauses when running, resumes when paused.
    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            DrillStatus::Running => self.pause(),
            DrillStatus::Paused => self.resume(),
            DrillStatus::NotStarted | DrillStatus::Completed => false,
        }
    }

    /// Discard all progress. The result equals `DrillSequencer::new()`.
    pub fn reset(&mut self) {
        if self.status != DrillStatus::NotStarted {
            log::debug!("drill reset from {:?}", self.status);
        }
        *self = Self::new();
    }

    pub fn status(&self) -> DrillStatus {
        self.status
    }

    pub fn scenario(&self) -> Option<&Arc<Scenario>> {
        self.scenario.as_ref()
    }

    pub fn current_step_index(&self) -> Option<usize> {
        self.current_step
    }

    pub fn current_step(&self) -> Option<&Step> {
        let scenario = self.scenario.as_ref()?;
        scenario.step(self.current_step?)
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn is_completed(&self) -> bool {
        self.status == DrillStatus::Completed
    }

    /// `(current step + 1) / step count * 100`, or 0 before start.
    pub fn progress_percent(&self) -> f32 {
        match (self.scenario.as_ref(), self.current_step) {
            (Some(s), Some(i)) if !s.is_empty() => (i + 1) as f32 / s.len() as f32 * 100.0,
            _ => 0.0,
        }
    }

    /// Graded result, available once the drill has completed.
    pub fn outcome(&self) -> Option<DrillOutcome> {
        if !self.is_completed() {
            return None;
        }
        let scenario = self.scenario.as_ref()?;
        Some(DrillOutcome {
            scenario: scenario.name.clone(),
            elapsed_secs: self.elapsed_secs,
            grade: Grade::from_elapsed(self.elapsed_secs),
        })
    }

    pub fn snapshot(&self) -> SequencerSnapshot {
        SequencerSnapshot {
            scenario: self.scenario.as_ref().map(|s| s.name.clone()),
            status: self.status,
            step_index: self.current_step,
            step_count: self.scenario.as_ref().map_or(0, |s| s.len()),
            action: self.current_step().map(|s| s.action.clone()),
            remaining_secs: self.remaining_secs,
            elapsed_secs: self.elapsed_secs,
            progress_percent: self.progress_percent(),
        }
    }
}
