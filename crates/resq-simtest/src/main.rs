//! ResQ Headless Drill Harness
//!
//! Validates pure drill logic and the bundled data files without a browser.
//! Runs entirely in-process — no server, no clock, no rendering.
//!
//! Usage:
//!   cargo run -p resq-simtest
//!   cargo run -p resq-simtest -- --verbose
//!   cargo run -p resq-simtest -- --seed 1234
//!
//! A malformed `--seed` is rejected with a usage error (exit status 2).
//!
//! Log output goes to stderr; set `RUST_LOG` to override the level.

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use resq_logic::catalog::{Catalog, ScenarioKind};
use resq_logic::grade::{self, Grade};
use resq_logic::muster::{MusterRoster, MusterStatus, Student, DEMO_ASSEMBLY_POINT};
use resq_logic::quiz::{Question, QuizSession, ScoreTier};
use resq_logic::sequencer::{DrillSequencer, DrillStatus, TickOutcome};
use resq_logic::session::{SessionId, SessionRegistry};

// ── Bundled data (same JSON the tests use) ──────────────────────────────
const SCENARIOS_JSON: &str = include_str!("../../../data/scenarios.json");
const ROSTER_JSON: &str = include_str!("../../../data/roster.json");
const QUIZ_JSON: &str = include_str!("../../../data/quiz.json");

const DEFAULT_SEED: u64 = 42;

// ── Harness config ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "resq-simtest", about = "Headless drill harness for ResQ")]
struct HarnessConfig {
    /// Print every check and debug-level library logs.
    #[arg(long)]
    verbose: bool,
    /// Seed for the simulated muster scans.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let config = HarnessConfig::parse();
    let level = if config.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    println!("=== ResQ Drill Harness (seed {}) ===\n", config.seed);

    let mut results = Vec::new();

    // 1. Scenario catalog data
    let catalog = validate_catalog(&mut results, config.verbose);

    // 2. Sequencer runs over every scenario
    results.extend(validate_sequencer(&catalog, config.verbose));

    // 3. Grade boundaries
    results.extend(validate_grading());

    // 4. Session isolation
    results.extend(validate_sessions(&catalog));

    // 5. QR muster
    results.extend(validate_muster(config.seed, config.verbose));

    // 6. Quiz
    results.extend(validate_quiz());

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || config.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Scenario Catalog ─────────────────────────────────────────────────

fn validate_catalog(results: &mut Vec<TestResult>, verbose: bool) -> Catalog {
    println!("--- Scenario Catalog ---");

    let loaded = match Catalog::from_json(SCENARIOS_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "catalog_parse".into(),
                passed: false,
                detail: e.to_string(),
            });
            log::error!("bundled catalog unusable, falling back to built-in: {}", e);
            return Catalog::builtin();
        }
    };

    results.push(TestResult {
        name: "catalog_all_kinds".into(),
        passed: ScenarioKind::ALL
            .iter()
            .all(|k| loaded.get(k.key()).is_some()),
        detail: format!("{} scenarios loaded", loaded.len()),
    });

    let builtin = Catalog::builtin();
    let drifted: Vec<&str> = builtin
        .keys()
        .filter(|k| loaded.get(k) != builtin.get(k))
        .collect();
    results.push(TestResult {
        name: "catalog_matches_builtin".into(),
        passed: drifted.is_empty(),
        detail: if drifted.is_empty() {
            "bundled JSON matches built-in scenarios".into()
        } else {
            format!("scenarios differ: {}", drifted.join(", "))
        },
    });

    let short: Vec<String> = loaded
        .keys()
        .filter_map(|k| loaded.summary(k))
        .filter(|s| s.step_count < 3)
        .map(|s| s.key)
        .collect();
    results.push(TestResult {
        name: "catalog_min_steps".into(),
        passed: short.is_empty(),
        detail: if short.is_empty() {
            "every scenario has at least 3 steps".into()
        } else {
            format!("too few steps: {}", short.join(", "))
        },
    });

    if verbose {
        println!("  Scenarios:");
        for key in loaded.keys() {
            if let Some(s) = loaded.summary(key) {
                println!(
                    "    {:11} {:22} {} steps, {:3}s  [{} ...]",
                    s.key,
                    s.name,
                    s.step_count,
                    s.total_secs,
                    s.preview.join(", ")
                );
            }
        }
    }

    loaded
}

// ── 2. Sequencer ────────────────────────────────────────────────────────

fn validate_sequencer(catalog: &Catalog, verbose: bool) -> Vec<TestResult> {
    println!("--- Drill Sequencer ---");
    let mut results = Vec::new();

    for key in catalog.keys() {
        let Some(scenario) = catalog.get(key) else {
            continue;
        };
        let total = scenario.total_duration_secs();

        // Wall-clock driver: completes after exactly `total` seconds.
        let mut drill = DrillSequencer::new();
        let started = drill.start(scenario.clone()).is_ok();
        let mut seconds = 0;
        while started && !drill.is_completed() && seconds <= total {
            drill.advance_second();
            seconds += 1;
        }
        results.push(TestResult {
            name: format!("seq_{}_seconds", key),
            passed: drill.is_completed()
                && seconds == total
                && drill.elapsed_secs() == total
                && drill.current_step_index() == scenario.last_index(),
            detail: format!(
                "completed in {}/{} seconds, elapsed={}",
                seconds,
                total,
                drill.elapsed_secs()
            ),
        });

        // Raw ticks: one extra roll-over tick per step.
        let mut drill = DrillSequencer::new();
        let started = drill.start(scenario.clone()).is_ok();
        let limit = total as usize + scenario.len() + 1;
        let mut ticks = 0;
        let mut completed_elapsed = None;
        while started && ticks < limit {
            ticks += 1;
            if let TickOutcome::Completed { elapsed_secs } = drill.tick() {
                completed_elapsed = Some(elapsed_secs);
                break;
            }
        }
        results.push(TestResult {
            name: format!("seq_{}_raw_ticks", key),
            passed: ticks == total as usize + scenario.len() && completed_elapsed == Some(total),
            detail: format!("{} ticks for {} steps / {}s", ticks, scenario.len(), total),
        });

        if verbose {
            if let Some(out) = drill.outcome() {
                println!(
                    "  {:22} {:3}s → {} ({})",
                    out.scenario,
                    out.elapsed_secs,
                    out.grade,
                    out.grade.message()
                );
            }
        }
    }

    // Pause freezes the run
    if let Some(scenario) = catalog.get(ScenarioKind::Earthquake.key()) {
        let mut drill = DrillSequencer::new();
        let started = drill.start(scenario).is_ok();
        for _ in 0..5 {
            drill.advance_second();
        }
        let before = drill.snapshot();
        drill.pause();
        for _ in 0..30 {
            drill.tick();
        }
        let frozen = drill.snapshot();
        drill.resume();
        drill.advance_second();
        results.push(TestResult {
            name: "seq_pause_freezes".into(),
            passed: started
                && frozen.elapsed_secs == before.elapsed_secs
                && frozen.remaining_secs == before.remaining_secs
                && frozen.step_index == before.step_index
                && frozen.status == DrillStatus::Paused
                && drill.elapsed_secs() == before.elapsed_secs + 1,
            detail: format!(
                "paused at step {:?} with {}s left, elapsed {}",
                frozen.step_index, frozen.remaining_secs, frozen.elapsed_secs
            ),
        });

        drill.reset();
        results.push(TestResult {
            name: "seq_reset_fresh".into(),
            passed: drill == DrillSequencer::new(),
            detail: "reset equals a new sequencer".into(),
        });
    }

    results
}

// ── 3. Grading ──────────────────────────────────────────────────────────

fn validate_grading() -> Vec<TestResult> {
    println!("--- Grading ---");
    let table = [
        (25, Grade::Excellent),
        (26, Grade::Good),
        (35, Grade::Good),
        (36, Grade::Average),
        (45, Grade::Average),
        (46, Grade::NeedsPractice),
    ];
    table
        .iter()
        .map(|&(secs, expected)| {
            let got = grade::grade(secs);
            TestResult {
                name: format!("grade_{}s", secs),
                passed: got == expected,
                detail: format!("{}s → {} (expected {})", secs, got, expected),
            }
        })
        .collect()
}

// ── 4. Sessions ─────────────────────────────────────────────────────────

fn validate_sessions(catalog: &Catalog) -> Vec<TestResult> {
    println!("--- Sessions ---");
    let mut results = Vec::new();

    let Some(fire) = catalog.get(ScenarioKind::Fire.key()) else {
        results.push(TestResult {
            name: "session_fire_available".into(),
            passed: false,
            detail: "fire scenario missing".into(),
        });
        return results;
    };

    let mut reg = SessionRegistry::new();
    let a = SessionId(1);
    let b = SessionId(2);
    let ok = reg.start(a, fire.clone()).is_ok() && reg.start(b, fire).is_ok();
    if let Some(drill) = reg.get_mut(a) {
        for _ in 0..10 {
            drill.advance_second();
        }
    }
    let elapsed_a = reg.get(a).map_or(0, |d| d.elapsed_secs());
    let elapsed_b = reg.get(b).map_or(0, |d| d.elapsed_secs());
    results.push(TestResult {
        name: "session_isolation".into(),
        passed: ok && elapsed_a == 10 && elapsed_b == 0,
        detail: format!("{}={}s {}={}s", a, elapsed_a, b, elapsed_b),
    });

    let mut completed = Vec::new();
    for _ in 0..30 {
        completed.extend(reg.advance_all());
    }
    results.push(TestResult {
        name: "session_completion_order".into(),
        passed: completed == vec![a, b],
        detail: format!("completed: {:?}", completed),
    });

    results
}

// ── 5. QR Muster ────────────────────────────────────────────────────────

fn validate_muster(seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- QR Muster ---");
    let mut results = Vec::new();

    let students: Vec<Student> = match serde_json::from_str(ROSTER_JSON) {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult {
                name: "muster_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };
    let mut roster = MusterRoster::new(DEMO_ASSEMBLY_POINT, students);
    let initial = roster.counts();

    results.push(TestResult {
        name: "muster_roster_loaded".into(),
        passed: initial.total() > 0 && initial.pending > 0,
        detail: format!(
            "{} students: {} safe, {} pending, {} missing",
            initial.total(),
            initial.safe,
            initial.pending,
            initial.missing
        ),
    });

    let mut rng = StdRng::seed_from_u64(seed);
    let mut scanned = Vec::new();
    while let Some(s) = roster.simulate_scan(&mut rng) {
        scanned.push(s.id.clone());
        roster.tick();
    }
    let after = roster.counts();
    results.push(TestResult {
        name: "muster_scans_drain_pending".into(),
        passed: scanned.len() == initial.pending
            && after.pending == 0
            && after.missing == initial.missing,
        detail: format!(
            "scanned [{}], missing untouched ({})",
            scanned.join(", "),
            after.missing
        ),
    });

    let missing_never_scanned = scanned.iter().all(|id| {
        roster
            .student(id)
            .is_some_and(|s| s.status == MusterStatus::Safe)
    }) && roster
        .students()
        .iter()
        .filter(|s| s.status == MusterStatus::Missing)
        .count()
        == initial.missing;
    results.push(TestResult {
        name: "muster_missing_not_scanned".into(),
        passed: missing_never_scanned,
        detail: "simulated scans only pick pending students".into(),
    });

    let mut rng_a = StdRng::seed_from_u64(seed);
    let mut rng_b = StdRng::seed_from_u64(seed);
    let mut first = demo_copy(&roster);
    let pick_a = first.simulate_scan(&mut rng_a).map(|s| s.id.clone());
    let mut second = demo_copy(&roster);
    let pick_b = second.simulate_scan(&mut rng_b).map(|s| s.id.clone());
    results.push(TestResult {
        name: "muster_seeded_replay".into(),
        passed: pick_a == pick_b,
        detail: format!("seed {} picks {:?} twice", seed, pick_a),
    });

    roster.mark_all_safe();
    results.push(TestResult {
        name: "muster_mark_all_safe".into(),
        passed: roster.safe_percentage() == 100.0,
        detail: format!("{:.0}% safe at {}", roster.safe_percentage(), roster.elapsed_display()),
    });

    roster.reset();
    results.push(TestResult {
        name: "muster_reset".into(),
        passed: roster.counts() == initial && roster.elapsed_secs() == 0,
        detail: "reset restores initial roster and clock".into(),
    });

    if verbose {
        println!("  Roster at {}:", roster.assembly_point());
        for s in roster.students() {
            println!("    {:3} {:16} {:?}", s.id, s.name, s.status);
        }
    }

    results
}

/// Copy of `roster` restored to its initial statuses.
fn demo_copy(roster: &MusterRoster) -> MusterRoster {
    let mut copy = roster.clone();
    copy.reset();
    copy
}

// ── 6. Quiz ─────────────────────────────────────────────────────────────

fn validate_quiz() -> Vec<TestResult> {
    println!("--- Quiz ---");
    let mut results = Vec::new();

    let questions: Vec<Question> = match serde_json::from_str(QUIZ_JSON) {
        Ok(q) => q,
        Err(e) => {
            results.push(TestResult {
                name: "quiz_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };
    let key: Vec<usize> = questions.iter().map(|q| q.correct).collect();

    let mut quiz = match QuizSession::new(questions) {
        Ok(q) => q,
        Err(e) => {
            results.push(TestResult {
                name: "quiz_bank_valid".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    let perfect = play(&mut quiz, &key);
    results.push(TestResult {
        name: "quiz_perfect_expert".into(),
        passed: perfect && quiz.score() == key.len() && quiz.tier() == ScoreTier::Expert,
        detail: format!("{}/{} → {}", quiz.score(), key.len(), quiz.tier().badge()),
    });

    quiz.reset();
    let wrong: Vec<usize> = key.iter().map(|&c| if c == 0 { 1 } else { 0 }).collect();
    let all_wrong = play(&mut quiz, &wrong);
    results.push(TestResult {
        name: "quiz_zero_beginner".into(),
        passed: all_wrong && quiz.score() == 0 && quiz.tier() == ScoreTier::Beginner,
        detail: format!("{}/{} → {}", quiz.score(), key.len(), quiz.tier().badge()),
    });

    results
}

/// Answer every question in order. Returns whether the quiz completed.
fn play(quiz: &mut QuizSession, picks: &[usize]) -> bool {
    for &p in picks {
        if quiz.answer(p).is_err() || quiz.next().is_err() {
            return false;
        }
    }
    quiz.is_completed()
}
