//! QR muster point headcount.
//!
//! Students report to an assembly point and are checked in by scanning their
//! QR code. Scanning is simulated: [`MusterRoster::simulate_scan`] marks a
//! uniformly random pending student safe, drawing from a caller-supplied
//! random source so runs can be replayed with a seeded RNG.
//!
//! Missing students are never picked by a simulated scan; only an explicit
//! [`MusterRoster::check_in`] or [`MusterRoster::mark_all_safe`] clears them.
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use resq_logic::muster::{demo_roster, MusterStatus};
//!
//! let mut roster = demo_roster();
//! let mut rng = StdRng::seed_from_u64(7);
//! let scanned = roster.simulate_scan(&mut rng).unwrap();
//! assert_eq!(scanned.status, MusterStatus::Safe);
//! assert_eq!(roster.counts().pending, 1);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Check-in state of one student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MusterStatus {
    Safe,
    Pending,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub class: String,
    pub status: MusterStatus,
}

impl Student {
    pub fn new(id: &str, name: &str, class: &str, status: MusterStatus) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            class: class.to_string(),
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MusterError {
    #[error("no student with id `{0}` on the roster")]
    UnknownStudent(String),
}

/// Headcount by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusterCounts {
    pub safe: usize,
    pub pending: usize,
    pub missing: usize,
}

impl MusterCounts {
    pub fn total(&self) -> usize {
        self.safe + self.pending + self.missing
    }
}

/// Roster at one assembly point, with its own muster clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusterRoster {
    assembly_point: String,
    students: Vec<Student>,
    initial: Vec<Student>,
    elapsed_secs: u32,
}

impl MusterRoster {
    pub fn new(assembly_point: &str, students: Vec<Student>) -> Self {
        Self {
            assembly_point: assembly_point.to_string(),
            initial: students.clone(),
            students,
            elapsed_secs: 0,
        }
    }

    pub fn assembly_point(&self) -> &str {
        &self.assembly_point
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn counts(&self) -> MusterCounts {
        let mut counts = MusterCounts::default();
        for s in &self.students {
            match s.status {
                MusterStatus::Safe => counts.safe += 1,
                MusterStatus::Pending => counts.pending += 1,
                MusterStatus::Missing => counts.missing += 1,
            }
        }
        counts
    }

    /// Share of the roster marked safe, 0–100. An empty roster is 0.
    pub fn safe_percentage(&self) -> f32 {
        if self.students.is_empty() {
            return 0.0;
        }
        self.counts().safe as f32 / self.students.len() as f32 * 100.0
    }

    /// Mark one uniformly chosen pending student safe.
    ///
    /// Returns the student scanned, or `None` when nobody is pending.
    pub fn simulate_scan(&mut self, rng: &mut impl Rng) -> Option<&Student> {
        let pending: Vec<usize> = self
            .students
            .iter()
            .enumerate()
            .filter(|(_, s)| s.status == MusterStatus::Pending)
            .map(|(i, _)| i)
            .collect();
        if pending.is_empty() {
            log::debug!("scan at {} found nobody pending", self.assembly_point);
            return None;
        }
        let idx = pending[rng.gen_range(0..pending.len())];
        let student = &mut self.students[idx];
        student.status = MusterStatus::Safe;
        log::debug!("scanned {} ({}) safe", student.name, student.id);
        Some(&self.students[idx])
    }

    /// Check in a specific student by id, whatever their current status.
    pub fn check_in(&mut self, id: &str) -> Result<&Student, MusterError> {
        let Some(idx) = self.students.iter().position(|s| s.id == id) else {
            log::warn!("check-in for unknown student `{}`", id);
            return Err(MusterError::UnknownStudent(id.to_string()));
        };
        self.students[idx].status = MusterStatus::Safe;
        Ok(&self.students[idx])
    }

    pub fn mark_all_safe(&mut self) {
        for s in &mut self.students {
            s.status = MusterStatus::Safe;
        }
        log::info!(
            "all {} students at {} marked safe",
            self.students.len(),
            self.assembly_point
        );
    }

    /// Restore every student's initial status and zero the clock.
    pub fn reset(&mut self) {
        self.students = self.initial.clone();
        self.elapsed_secs = 0;
    }

    /// Advance the muster clock by one second.
    pub fn tick(&mut self) {
        self.elapsed_secs += 1;
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Elapsed time as `m:ss`.
    pub fn elapsed_display(&self) -> String {
        format_clock(self.elapsed_secs)
    }
}

/// Format seconds as `m:ss` (minutes are not wrapped into hours).
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Assembly point used by the demo roster.
pub const DEMO_ASSEMBLY_POINT: &str = "Assembly Point A - Main Campus";

/// The eight-student class used for muster practice.
pub fn demo_roster() -> MusterRoster {
    use MusterStatus::*;
    MusterRoster::new(
        DEMO_ASSEMBLY_POINT,
        vec![
            Student::new("1", "Keshav Gupta", "CSE-A", Safe),
            Student::new("2", "Vineet Dahiya", "CSE-A", Safe),
            Student::new("3", "Gopal", "CSE-A", Pending),
            Student::new("4", "Aditya", "CSE-A", Safe),
            Student::new("5", "Puneet", "CSE-A", Pending),
            Student::new("6", "Aman", "CSE-A", Safe),
            Student::new("7", "Harsh", "CSE-A", Missing),
            Student::new("8", "Suryansh", "CSE-A", Safe),
        ],
    )
}
