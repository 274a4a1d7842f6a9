//! Scenario and step data model.
//!
//! A scenario is an ordered list of timed steps. Step order is execution
//! order; `Step::index` is the step's position and is rewritten whenever a
//! scenario is constructed, so it can be compared and rendered but never
//! identifies a step across scenarios.

use serde::{Deserialize, Serialize};

use crate::error::{DrillError, InvalidReason};

/// One instruction in a drill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// 0-based position in the owning scenario.
    #[serde(default)]
    pub index: usize,
    /// Short label shown large on screen ("DROP", "EVACUATE").
    pub action: String,
    /// Guidance text for the step.
    pub description: String,
    /// Time budget for this step in seconds. Must be at least 1.
    pub duration_secs: u32,
    /// Display glyph for the step.
    #[serde(default)]
    pub icon: String,
}

impl Step {
    pub fn new(action: &str, description: &str, duration_secs: u32) -> Self {
        Self {
            index: 0,
            action: action.to_string(),
            description: description.to_string(),
            duration_secs,
            icon: String::new(),
        }
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = icon.to_string();
        self
    }
}

/// A named, ordered sequence of drill steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawScenario")]
pub struct Scenario {
    pub name: String,
    steps: Vec<Step>,
}

#[derive(Deserialize)]
struct RawScenario {
    name: String,
    steps: Vec<Step>,
}

impl From<RawScenario> for Scenario {
    fn from(raw: RawScenario) -> Self {
        Scenario::new(&raw.name, raw.steps)
    }
}

impl Scenario {
    /// Build a scenario, numbering steps by position.
    ///
    /// Construction never fails; call [`Scenario::validate`] (or let
    /// `DrillSequencer::start` do it) before running.
    pub fn new(name: &str, mut steps: Vec<Step>) -> Self {
        for (i, step) in steps.iter_mut().enumerate() {
            step.index = i;
        }
        Self {
            name: name.to_string(),
            steps,
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the final step, `None` for an empty scenario.
    pub fn last_index(&self) -> Option<usize> {
        self.steps.len().checked_sub(1)
    }

    /// Sum of every step's duration in seconds, saturating at `u32::MAX`.
    ///
    /// Exact for any scenario that passes [`Scenario::validate`].
    pub fn total_duration_secs(&self) -> u32 {
        self.steps
            .iter()
            .fold(0u32, |acc, s| acc.saturating_add(s.duration_secs))
    }

    /// Check that the scenario is runnable: at least one step, every step at
    /// least one second long, and a total the elapsed counter can hold.
    /// Reports the first problem found.
    pub fn validate(&self) -> Result<(), DrillError> {
        let reason = if self.steps.is_empty() {
            Some(InvalidReason::NoSteps)
        } else if let Some(index) = self.steps.iter().position(|s| s.duration_secs == 0) {
            Some(InvalidReason::ZeroDuration { index })
        } else {
            self.steps
                .iter()
                .try_fold(0u32, |acc, s| acc.checked_add(s.duration_secs))
                .is_none()
                .then_some(InvalidReason::TotalTooLong)
        };

        match reason {
            Some(reason) => Err(DrillError::InvalidScenario {
                name: self.name.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_step() -> Scenario {
        Scenario::new(
            "Earthquake-like",
            vec![
                Step::new("DROP", "Drop to hands and knees.", 2),
                Step::new("COVER", "Take cover under a desk.", 3),
                Step::new("HOLD ON", "Hold until shaking stops.", 8),
            ],
        )
    }

    #[test]
    fn test_steps_are_numbered_by_position() {
        let s = three_step();
        let indices: Vec<usize> = s.steps().iter().map(|st| st.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_renumbers_caller_supplied_indices() {
        let mut a = Step::new("A", "", 1);
        a.index = 7;
        let s = Scenario::new("x", vec![a]);
        assert_eq!(s.steps()[0].index, 0);
    }

    #[test]
    fn test_total_duration() {
        assert_eq!(three_step().total_duration_secs(), 13);
        assert_eq!(three_step().last_index(), Some(2));
    }

    #[test]
    fn test_valid_scenario_passes() {
        assert!(three_step().validate().is_ok());
    }

    #[test]
    fn test_empty_scenario_rejected() {
        let s = Scenario::new("Empty", vec![]);
        let err = s.validate().unwrap_err();
        assert_eq!(err.reason(), InvalidReason::NoSteps);
        assert_eq!(s.last_index(), None);
    }

    #[test]
    fn test_zero_duration_rejected_with_index() {
        let s = Scenario::new(
            "Broken",
            vec![Step::new("A", "", 1), Step::new("B", "", 0)],
        );
        assert_eq!(
            s.validate().unwrap_err(),
            DrillError::InvalidScenario {
                name: "Broken".into(),
                reason: InvalidReason::ZeroDuration { index: 1 },
            }
        );
    }

    #[test]
    fn test_total_past_u32_rejected() {
        let s = Scenario::new(
            "Endless",
            vec![Step::new("WAIT", "", u32::MAX), Step::new("GO", "", 1)],
        );
        assert_eq!(s.total_duration_secs(), u32::MAX);
        assert_eq!(s.validate().unwrap_err().reason(), InvalidReason::TotalTooLong);

        let edge = Scenario::new(
            "Edge",
            vec![Step::new("WAIT", "", u32::MAX - 1), Step::new("GO", "", 1)],
        );
        assert!(edge.validate().is_ok());
        assert_eq!(edge.total_duration_secs(), u32::MAX);
    }

    #[test]
    fn test_deserialize_numbers_steps() {
        let json = r#"{
            "name": "Drill",
            "steps": [
                {"action": "GO", "description": "Go.", "duration_secs": 2},
                {"action": "STOP", "description": "Stop.", "duration_secs": 1, "icon": "x"}
            ]
        }"#;
        let s: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.step(1).unwrap().index, 1);
        assert_eq!(s.step(1).unwrap().icon, "x");
        assert!(s.step(0).unwrap().icon.is_empty());
    }
}
