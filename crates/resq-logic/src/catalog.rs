//! Drill scenario catalog.
//!
//! Three built-in drills ship with the crate. A catalog can also be loaded
//! from JSON (an object mapping scenario key to scenario); every scenario is
//! validated on load so a sequencer never sees an unrunnable one.
//!
//! Scenarios are handed out as `Arc<Scenario>`: the catalog owns them and any
//! number of drill attempts may read the same steps concurrently.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::error::DrillError;
use crate::scenario::{Scenario, Step};

/// Built-in scenario kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioKind {
    Fire,
    Earthquake,
    Flood,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::Fire,
        ScenarioKind::Earthquake,
        ScenarioKind::Flood,
    ];

    /// Stable catalog key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Earthquake => "earthquake",
            Self::Flood => "flood",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    /// The built-in scenario for this kind.
    pub fn scenario(self) -> Scenario {
        match self {
            Self::Fire => Scenario::new(
                "Fire Emergency",
                vec![
                    Step::new("ALERT", "Fire alarm activated. Stay calm.", 3).with_icon("🚨"),
                    Step::new(
                        "ASSESS",
                        "Check for immediate danger. Feel doors for heat.",
                        4,
                    )
                    .with_icon("👀"),
                    Step::new("EVACUATE", "Exit immediately via nearest safe route.", 5)
                        .with_icon("🚶"),
                    Step::new("CRAWL LOW", "Stay low under smoke. Cover nose and mouth.", 4)
                        .with_icon("🤏"),
                    Step::new("ASSEMBLY", "Report to designated assembly point.", 3)
                        .with_icon("📍"),
                    Step::new("HEADCOUNT", "Wait for attendance check. Stay together.", 2)
                        .with_icon("✅"),
                ],
            ),
            Self::Earthquake => Scenario::new(
                "Earthquake Emergency",
                vec![
                    Step::new("DROP", "Immediately drop to hands and knees.", 2).with_icon("⬇️"),
                    Step::new("COVER", "Take cover under desk or table.", 3).with_icon("🛡️"),
                    Step::new("HOLD ON", "Hold your position until shaking stops.", 8)
                        .with_icon("✊"),
                    Step::new("ASSESS", "Check for injuries and hazards around you.", 4)
                        .with_icon("👀"),
                    Step::new("EVACUATE", "Exit carefully if building is damaged.", 6)
                        .with_icon("🚶"),
                    Step::new("ASSEMBLY", "Report to outdoor assembly point.", 3).with_icon("📍"),
                ],
            ),
            Self::Flood => Scenario::new(
                "Flood Emergency",
                vec![
                    Step::new("ALERT", "Flood warning received. Prepare to evacuate.", 5)
                        .with_icon("📢"),
                    Step::new("GATHER", "Collect emergency supplies and documents.", 4)
                        .with_icon("🎒"),
                    Step::new("MOVE UP", "Go to higher floors immediately.", 3).with_icon("⬆️"),
                    Step::new("AVOID WATER", "Never walk through moving water.", 2)
                        .with_icon("⛔"),
                    Step::new("SIGNAL", "Signal for help if trapped.", 4).with_icon("🆘"),
                    Step::new("WAIT SAFELY", "Stay on high ground until help arrives.", 5)
                        .with_icon("⏳"),
                ],
            ),
        }
    }
}

/// Catalog loading and lookup errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scenario `{key}` rejected: {source}")]
    Invalid {
        key: String,
        #[source]
        source: DrillError,
    },
    #[error("no scenario with key `{0}`")]
    UnknownKey(String),
}

/// Picker summary of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub key: String,
    pub name: String,
    pub step_count: usize,
    pub total_secs: u32,
    /// Leading step actions, as shown on a picker card.
    pub preview: Vec<String>,
}

/// Number of step actions listed in a [`ScenarioSummary`] preview.
pub const PREVIEW_STEPS: usize = 3;

/// Read-only set of runnable scenarios keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    scenarios: BTreeMap<String, Arc<Scenario>>,
}

impl Catalog {
    /// Catalog with the fire, earthquake and flood drills.
    pub fn builtin() -> Self {
        let scenarios = ScenarioKind::ALL
            .into_iter()
            .map(|k| (k.key().to_string(), Arc::new(k.scenario())))
            .collect();
        Self { scenarios }
    }

    /// Parse a JSON object of `key -> scenario`, validating every entry.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: BTreeMap<String, Scenario> = serde_json::from_str(json)?;
        let mut catalog = Self::default();
        for (key, scenario) in raw {
            catalog.insert(&key, scenario)?;
        }
        log::debug!("loaded {} scenarios from JSON", catalog.len());
        Ok(catalog)
    }

    /// Add or replace a scenario after validating it.
    pub fn insert(&mut self, key: &str, scenario: Scenario) -> Result<(), CatalogError> {
        scenario.validate().map_err(|source| CatalogError::Invalid {
            key: key.to_string(),
            source,
        })?;
        self.scenarios.insert(key.to_string(), Arc::new(scenario));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<Arc<Scenario>> {
        self.scenarios.get(key).cloned()
    }

    /// Like [`Catalog::get`], but reports a missing key as an error.
    pub fn require(&self, key: &str) -> Result<Arc<Scenario>, CatalogError> {
        self.get(key)
            .ok_or_else(|| CatalogError::UnknownKey(key.to_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn summary(&self, key: &str) -> Option<ScenarioSummary> {
        let s = self.scenarios.get(key)?;
        Some(ScenarioSummary {
            key: key.to_string(),
            name: s.name.clone(),
            step_count: s.len(),
            total_secs: s.total_duration_secs(),
            preview: s
                .steps()
                .iter()
                .take(PREVIEW_STEPS)
                .map(|st| st.action.clone())
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidReason;

    #[test]
    fn test_builtin_has_three_valid_scenarios() {
        let c = Catalog::builtin();
        assert_eq!(c.len(), 3);
        for kind in ScenarioKind::ALL {
            let s = c.get(kind.key()).unwrap();
            assert!(s.validate().is_ok(), "{} invalid", kind.key());
            assert_eq!(s.len(), 6);
        }
    }

    #[test]
    fn test_builtin_totals() {
        let c = Catalog::builtin();
        assert_eq!(c.get("fire").unwrap().total_duration_secs(), 21);
        assert_eq!(c.get("earthquake").unwrap().total_duration_secs(), 26);
        assert_eq!(c.get("flood").unwrap().total_duration_secs(), 23);
    }

    #[test]
    fn test_key_round_trip() {
        for kind in ScenarioKind::ALL {
            assert_eq!(ScenarioKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(ScenarioKind::from_key("tornado"), None);
    }

    #[test]
    fn test_get_shares_one_allocation() {
        let c = Catalog::builtin();
        let a = c.get("fire").unwrap();
        let b = c.get("fire").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_require_unknown_key() {
        let c = Catalog::builtin();
        assert!(matches!(c.require("tornado"), Err(CatalogError::UnknownKey(k)) if k == "tornado"));
    }

    #[test]
    fn test_summary_preview() {
        let s = Catalog::builtin().summary("earthquake").unwrap();
        assert_eq!(s.name, "Earthquake Emergency");
        assert_eq!(s.step_count, 6);
        assert_eq!(s.total_secs, 26);
        assert_eq!(s.preview, vec!["DROP", "COVER", "HOLD ON"]);
    }

    #[test]
    fn test_from_json_valid() {
        let json = r#"{
            "drill": {"name": "Drill", "steps": [
                {"action": "GO", "description": "Go.", "duration_secs": 2}
            ]}
        }"#;
        let c = Catalog::from_json(json).unwrap();
        assert_eq!(c.keys().collect::<Vec<_>>(), vec!["drill"]);
    }

    #[test]
    fn test_from_json_rejects_overflowing_total() {
        let json = r#"{
            "long": {"name": "Long", "steps": [
                {"action": "WAIT", "description": "Wait.", "duration_secs": 4294967295},
                {"action": "GO", "description": "Go.", "duration_secs": 1}
            ]}
        }"#;
        match Catalog::from_json(json) {
            Err(CatalogError::Invalid { key, source }) => {
                assert_eq!(key, "long");
                assert_eq!(source.reason(), InvalidReason::TotalTooLong);
            }
            other => panic!("expected Invalid, got {:?}", other),
        }

        let mut c = Catalog::builtin();
        let long = Scenario::new(
            "Long",
            vec![Step::new("WAIT", "", u32::MAX), Step::new("GO", "", 1)],
        );
        assert!(c.insert("long", long).is_err());
        assert!(c.summary("long").is_none());
    }

    #[test]
    fn test_from_json_rejects_zero_duration() {
        let json = r#"{
            "bad": {"name": "Bad", "steps": [
                {"action": "GO", "description": "Go.", "duration_secs": 0}
            ]}
        }"#;
        match Catalog::from_json(json) {
            Err(CatalogError::Invalid { key, source }) => {
                assert_eq!(key, "bad");
                assert_eq!(source.reason(), InvalidReason::ZeroDuration { index: 0 });
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_from_json_rejects_empty_steps() {
        let json = r#"{"empty": {"name": "Empty", "steps": []}}"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::Invalid { .. })
        ));
    }

    #[test]
    fn test_from_json_parse_error() {
        assert!(matches!(
            Catalog::from_json("not json"),
            Err(CatalogError::Parse(_))
        ));
    }
}
