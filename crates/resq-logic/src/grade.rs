//! Drill time grading.
//!
//! Grading depends only on total elapsed seconds, not on which scenario was
//! run. Each tier's upper bound is inclusive:
//!
//! | Elapsed (s) | Grade |
//! |-------------|-------|
//! | ≤ 25 | Excellent |
//! | ≤ 35 | Good |
//! | ≤ 45 | Average |
//! | > 45 | Needs Practice |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound (inclusive) for an Excellent grade.
pub const EXCELLENT_MAX_SECS: u32 = 25;
/// Upper bound (inclusive) for a Good grade.
pub const GOOD_MAX_SECS: u32 = 35;
/// Upper bound (inclusive) for an Average grade.
pub const AVERAGE_MAX_SECS: u32 = 45;

/// Qualitative response-time grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    Excellent,
    Good,
    Average,
    NeedsPractice,
}

impl Grade {
    pub const ALL: [Grade; 4] = [
        Grade::Excellent,
        Grade::Good,
        Grade::Average,
        Grade::NeedsPractice,
    ];

    pub fn from_elapsed(elapsed_secs: u32) -> Self {
        if elapsed_secs <= EXCELLENT_MAX_SECS {
            Self::Excellent
        } else if elapsed_secs <= GOOD_MAX_SECS {
            Self::Good
        } else if elapsed_secs <= AVERAGE_MAX_SECS {
            Self::Average
        } else {
            Self::NeedsPractice
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::NeedsPractice => "Needs Practice",
        }
    }

    /// Feedback line shown under the grade.
    pub fn message(self) -> &'static str {
        match self {
            Self::Excellent => "Outstanding response time!",
            Self::Good => "Good response, room for improvement.",
            Self::Average => "Practice more for better times.",
            Self::NeedsPractice => "More training needed.",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Grade a total drill time.
pub fn grade(elapsed_secs: u32) -> Grade {
    Grade::from_elapsed(elapsed_secs)
}
