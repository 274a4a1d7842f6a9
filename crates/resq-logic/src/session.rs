//! Registry of concurrent drill attempts.
//!
//! Each session owns its own [`DrillSequencer`]; sessions only ever share
//! scenario data through `Arc`, so ticking one attempt can never be observed
//! by another.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::DrillError;
use crate::scenario::Scenario;
use crate::sequencer::{DrillSequencer, DrillStatus, SequencerSnapshot, TickOutcome};

/// Identity of one drill attempt's owner (a browser tab, a kiosk, a test).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Isolated drill attempts keyed by session.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: BTreeMap<SessionId, DrillSequencer>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session's sequencer, creating a fresh one if needed.
    pub fn open(&mut self, id: SessionId) -> &mut DrillSequencer {
        self.sessions.entry(id).or_insert_with(|| {
            log::debug!("{} opened", id);
            DrillSequencer::new()
        })
    }

    /// Open the session if needed and start `scenario` on it.
    pub fn start(&mut self, id: SessionId, scenario: Arc<Scenario>) -> Result<(), DrillError> {
        self.open(id).start(scenario)
    }

    pub fn get(&self, id: SessionId) -> Option<&DrillSequencer> {
        self.sessions.get(&id)
    }

    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut DrillSequencer> {
        self.sessions.get_mut(&id)
    }

    /// Drop a session, returning its final state.
    pub fn close(&mut self, id: SessionId) -> Option<DrillSequencer> {
        let removed = self.sessions.remove(&id);
        if removed.is_some() {
            log::debug!("{} closed", id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = SessionId> + '_ {
        self.sessions.keys().copied()
    }

    /// Sessions currently in `status`.
    pub fn count_with_status(&self, status: DrillStatus) -> usize {
        self.sessions
            .values()
            .filter(|s| s.status() == status)
            .count()
    }

    /// `tick` every session once. Returns the sessions that completed.
    pub fn tick_all(&mut self) -> Vec<SessionId> {
        self.drive(DrillSequencer::tick)
    }

    /// `advance_second` every session once. Returns the sessions that completed.
    pub fn advance_all(&mut self) -> Vec<SessionId> {
        self.drive(DrillSequencer::advance_second)
    }

    fn drive(&mut self, step: fn(&mut DrillSequencer) -> TickOutcome) -> Vec<SessionId> {
        self.sessions
            .iter_mut()
            .filter_map(|(id, drill)| match step(drill) {
                TickOutcome::Completed { .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn snapshots(&self) -> Vec<(SessionId, SequencerSnapshot)> {
        self.sessions
            .iter()
            .map(|(id, drill)| (*id, drill.snapshot()))
            .collect()
    }
}
