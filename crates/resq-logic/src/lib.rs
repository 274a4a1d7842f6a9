//! Pure drill logic for ResQ.
//!
//! This crate contains the campus emergency-drill logic independent of any
//! web server, UI framework, or wall clock. Functions and state machines take
//! plain data and are driven by explicit calls, making them unit-testable and
//! portable to any frontend that can call `tick()` once a second.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Built-in drill scenarios (fire, earthquake, flood) and JSON catalogs |
//! | [`error`] | Scenario validation errors shared by the catalog and sequencer |
//! | [`grade`] | Four-tier grading of total drill time |
//! | [`muster`] | QR muster roster, simulated scans, headcount |
//! | [`quiz`] | Multiple-choice preparedness quiz with badge tiers |
//! | [`scenario`] | Scenario and step data model, validation |
//! | [`sequencer`] | Timed step sequencer (start / tick / pause / reset) |
//! | [`session`] | Registry of isolated drill attempts keyed by session |
//!
//! ```
//! use resq_logic::catalog::{Catalog, ScenarioKind};
//! use resq_logic::grade::Grade;
//! use resq_logic::sequencer::{DrillSequencer, DrillStatus};
//!
//! let catalog = Catalog::builtin();
//! let fire = catalog.get(ScenarioKind::Fire.key()).unwrap();
//!
//! let mut drill = DrillSequencer::new();
//! drill.start(fire).unwrap();
//! while drill.status() != DrillStatus::Completed {
//!     drill.advance_second();
//! }
//! assert_eq!(drill.elapsed_secs(), 21);
//! assert_eq!(drill.outcome().unwrap().grade, Grade::Excellent);
//! ```

pub mod catalog;
pub mod error;
pub mod grade;
pub mod muster;
pub mod quiz;
pub mod scenario;
pub mod sequencer;
pub mod session;

pub use catalog::CatalogError;
pub use error::{DrillError, InvalidReason};
pub use muster::MusterError;
pub use quiz::QuizError;
