//! Integration tests for a full drill attempt.
//!
//! Exercises: Catalog → DrillSequencer (start / tick / pause / reset)
//! → DrillOutcome → Grade, plus sessions and the bundled JSON data.
//!
//! All tests are pure logic — no clock, no server, no rendering.

use std::sync::Arc;

use resq_logic::catalog::{Catalog, ScenarioKind};
use resq_logic::grade::{grade, Grade};
use resq_logic::muster::{MusterRoster, MusterStatus, Student, DEMO_ASSEMBLY_POINT};
use resq_logic::quiz::{default_questions, Question, QuizSession};
use resq_logic::scenario::{Scenario, Step};
use resq_logic::sequencer::{DrillSequencer, DrillStatus, TickOutcome};
use resq_logic::session::{SessionId, SessionRegistry};
use resq_logic::{DrillError, InvalidReason};

const SCENARIOS_JSON: &str = include_str!("../../../data/scenarios.json");
const ROSTER_JSON: &str = include_str!("../../../data/roster.json");
const QUIZ_JSON: &str = include_str!("../../../data/quiz.json");

// ── Helpers ────────────────────────────────────────────────────────────

fn scenario(durations: &[u32]) -> Arc<Scenario> {
    let steps = durations
        .iter()
        .map(|&d| Step::new("ACT", "Do the thing.", d))
        .collect();
    Arc::new(Scenario::new("Synthetic", steps))
}

fn run_seconds(drill: &mut DrillSequencer, secs: u32) {
    for _ in 0..secs {
        drill.advance_second();
    }
}

// ── Sequencer properties ───────────────────────────────────────────────

#[test]
fn every_builtin_completes_after_its_total_duration() {
    let catalog = Catalog::builtin();
    for kind in ScenarioKind::ALL {
        let s = catalog.get(kind.key()).unwrap();
        let total = s.total_duration_secs();
        let mut drill = DrillSequencer::new();
        drill.start(s.clone()).unwrap();

        run_seconds(&mut drill, total - 1);
        assert_eq!(drill.status(), DrillStatus::Running, "{}", kind.key());

        drill.advance_second();
        assert_eq!(drill.status(), DrillStatus::Completed, "{}", kind.key());
        assert_eq!(drill.current_step_index(), s.last_index());
        assert_eq!(drill.elapsed_secs(), total);
    }
}

#[test]
fn elapsed_tracks_seconds_driven() {
    let s = scenario(&[4, 1, 6, 2]);
    for k in 0..=13 {
        let mut drill = DrillSequencer::new();
        drill.start(s.clone()).unwrap();
        run_seconds(&mut drill, k);
        assert_eq!(drill.elapsed_secs(), k);
    }
}

#[test]
fn raw_ticks_need_one_rollover_per_step() {
    let durations = [2, 3, 8];
    let s = scenario(&durations);
    let mut drill = DrillSequencer::new();
    drill.start(s).unwrap();

    let mut ticks = 0;
    loop {
        ticks += 1;
        if let TickOutcome::Completed { elapsed_secs } = drill.tick() {
            assert_eq!(elapsed_secs, 13);
            break;
        }
        assert!(ticks < 100, "drill never completed");
    }
    assert_eq!(ticks, 13 + durations.len());
}

#[test]
fn pause_mid_step_resumes_exactly() {
    let catalog = Catalog::builtin();
    let mut drill = DrillSequencer::new();
    drill.start(catalog.get("earthquake").unwrap()).unwrap();
    run_seconds(&mut drill, 7);
    let (step, remaining, elapsed) = (
        drill.current_step_index(),
        drill.remaining_secs(),
        drill.elapsed_secs(),
    );

    drill.pause();
    run_seconds(&mut drill, 100);
    for _ in 0..100 {
        drill.tick();
    }
    assert_eq!(drill.current_step_index(), step);
    assert_eq!(drill.remaining_secs(), remaining);
    assert_eq!(drill.elapsed_secs(), elapsed);

    drill.resume();
    run_seconds(&mut drill, 26 - 7);
    assert!(drill.is_completed());
    assert_eq!(drill.outcome().unwrap().grade, Grade::Good);
}

#[test]
fn reset_after_anything_is_fresh() {
    let catalog = Catalog::builtin();
    let mut drill = DrillSequencer::new();
    drill.start(catalog.get("flood").unwrap()).unwrap();
    run_seconds(&mut drill, 9);
    drill.pause();
    drill.tick();
    drill.reset();
    assert_eq!(drill, DrillSequencer::new());
    assert_eq!(drill.tick(), TickOutcome::Idle);
}

#[test]
fn invalid_scenarios_rejected_by_start() {
    let mut drill = DrillSequencer::new();
    assert_eq!(
        drill.start(scenario(&[])),
        Err(DrillError::InvalidScenario {
            name: "Synthetic".into(),
            reason: InvalidReason::NoSteps,
        })
    );
    assert_eq!(
        drill.start(scenario(&[1, 2, 0])).unwrap_err().reason(),
        InvalidReason::ZeroDuration { index: 2 }
    );
    assert_eq!(drill.status(), DrillStatus::NotStarted);
}

#[test]
fn builtin_grades() {
    let catalog = Catalog::builtin();
    let graded: Vec<(String, Grade)> = ScenarioKind::ALL
        .into_iter()
        .map(|k| {
            let mut drill = DrillSequencer::new();
            drill.start(catalog.get(k.key()).unwrap()).unwrap();
            while !drill.is_completed() {
                drill.advance_second();
            }
            let out = drill.outcome().unwrap();
            (out.scenario, out.grade)
        })
        .collect();
    assert_eq!(
        graded,
        vec![
            ("Fire Emergency".to_string(), Grade::Excellent),
            ("Earthquake Emergency".to_string(), Grade::Good),
            ("Flood Emergency".to_string(), Grade::Excellent),
        ]
    );
    assert_eq!(grade(46), Grade::NeedsPractice);
}

#[test]
fn many_sessions_on_one_scenario_stay_isolated() {
    let catalog = Catalog::builtin();
    let fire = catalog.get("fire").unwrap();
    let mut reg = SessionRegistry::new();
    for id in 0..5 {
        reg.start(SessionId(id), fire.clone()).unwrap();
    }
    // Session n receives n extra seconds.
    for id in 0..5u64 {
        let drill = reg.get_mut(SessionId(id)).unwrap();
        run_seconds(drill, id as u32);
    }
    for id in 0..5u64 {
        assert_eq!(reg.get(SessionId(id)).unwrap().elapsed_secs(), id as u32);
    }
    // Scenario data is shared, never copied per session.
    assert_eq!(Arc::strong_count(&fire), 1 + 1 + 5);
}

// ── Bundled data ───────────────────────────────────────────────────────

#[test]
fn bundled_scenarios_match_builtin() {
    let loaded = Catalog::from_json(SCENARIOS_JSON).unwrap();
    let builtin = Catalog::builtin();
    assert_eq!(
        loaded.keys().collect::<Vec<_>>(),
        builtin.keys().collect::<Vec<_>>()
    );
    for key in builtin.keys() {
        assert_eq!(loaded.get(key), builtin.get(key), "{} differs", key);
    }
}

#[test]
fn bundled_roster_matches_demo() {
    let students: Vec<Student> = serde_json::from_str(ROSTER_JSON).unwrap();
    let roster = MusterRoster::new(DEMO_ASSEMBLY_POINT, students);
    assert_eq!(roster, resq_logic::muster::demo_roster());
    assert_eq!(roster.student("7").unwrap().status, MusterStatus::Missing);
}

#[test]
fn bundled_quiz_matches_default() {
    let questions: Vec<Question> = serde_json::from_str(QUIZ_JSON).unwrap();
    assert_eq!(questions, default_questions());
    assert!(QuizSession::new(questions).is_ok());
}
