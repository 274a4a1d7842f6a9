//! Preparedness quiz.
//!
//! A [`QuizSession`] walks a question bank in order. Each question is answered
//! once, the feedback (with explanation) is shown, then `next` moves on. The
//! final score maps to a badge tier:
//!
//! | Score | Tier | Badge |
//! |-------|------|-------|
//! | ≥ 80 % | Expert | Fire Safety Expert |
//! | ≥ 60 % | Trainee | Safety Trainee |
//! | < 60 % | Beginner | Safety Beginner |

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum percentage for the Expert tier.
const EXPERT_MIN_PERCENT: f32 = 80.0;
/// Minimum percentage for the Trainee tier.
const TRAINEE_MIN_PERCENT: f32 = 60.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options` of the right answer.
    pub correct: usize,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("quiz has no questions")]
    EmptyBank,
    #[error("question `{id}` marks option {correct} correct but has {options} options")]
    BadAnswerKey {
        id: String,
        correct: usize,
        options: usize,
    },
    #[error("option {option} is out of range ({options} options)")]
    OptionOutOfRange { option: usize, options: usize },
    #[error("current question was already answered")]
    AlreadyAnswered,
    #[error("current question has not been answered yet")]
    NotAnswered,
    #[error("quiz is already completed")]
    Completed,
}

/// Result of answering one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub correct_option: usize,
    pub explanation: String,
}

/// Badge tier for a finished quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreTier {
    Expert,
    Trainee,
    Beginner,
}

impl ScoreTier {
    pub fn from_percentage(percent: f32) -> Self {
        if percent >= EXPERT_MIN_PERCENT {
            Self::Expert
        } else if percent >= TRAINEE_MIN_PERCENT {
            Self::Trainee
        } else {
            Self::Beginner
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            Self::Expert => "Fire Safety Expert",
            Self::Trainee => "Safety Trainee",
            Self::Beginner => "Safety Beginner",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Expert => "Excellent! You're well prepared!",
            Self::Trainee => "Good job! Keep learning!",
            Self::Beginner => "Keep practicing! Safety is important.",
        }
    }
}

/// One pass through a question bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    answers: Vec<usize>,
    score: usize,
    completed: bool,
}

impl QuizSession {
    /// Start a quiz. Every question must have its answer key inside its options.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptyBank);
        }
        if let Some(q) = questions.iter().find(|q| q.correct >= q.options.len()) {
            return Err(QuizError::BadAnswerKey {
                id: q.id.clone(),
                correct: q.correct,
                options: q.options.len(),
            });
        }
        Ok(Self {
            questions,
            current: 0,
            answers: Vec::new(),
            score: 0,
            completed: false,
        })
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.completed {
            return None;
        }
        self.questions.get(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Whether the current question already has an answer.
    pub fn is_answered(&self) -> bool {
        self.answers.len() > self.current
    }

    pub fn answers(&self) -> &[usize] {
        &self.answers
    }

    /// Answer the current question.
    pub fn answer(&mut self, option: usize) -> Result<AnswerFeedback, QuizError> {
        if self.completed {
            return Err(QuizError::Completed);
        }
        if self.is_answered() {
            return Err(QuizError::AlreadyAnswered);
        }
        let q = &self.questions[self.current];
        if option >= q.options.len() {
            return Err(QuizError::OptionOutOfRange {
                option,
                options: q.options.len(),
            });
        }
        let correct = option == q.correct;
        let feedback = AnswerFeedback {
            correct,
            correct_option: q.correct,
            explanation: q.explanation.clone(),
        };
        self.answers.push(option);
        if correct {
            self.score += 1;
        }
        Ok(feedback)
    }

    /// Move to the next question, or complete the quiz after the last one.
    pub fn next(&mut self) -> Result<(), QuizError> {
        if self.completed {
            return Err(QuizError::Completed);
        }
        if !self.is_answered() {
            return Err(QuizError::NotAnswered);
        }
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        } else {
            self.completed = true;
            log::info!(
                "quiz completed: {}/{} ({})",
                self.score,
                self.questions.len(),
                self.tier().badge()
            );
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.current = 0;
        self.answers.clear();
        self.score = 0;
        self.completed = false;
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Score as a share of the whole bank, 0–100.
    pub fn percentage(&self) -> f32 {
        self.score as f32 / self.questions.len() as f32 * 100.0
    }

    /// `(current + 1) / len * 100`.
    pub fn progress_percent(&self) -> f32 {
        (self.current + 1) as f32 / self.questions.len() as f32 * 100.0
    }

    pub fn tier(&self) -> ScoreTier {
        ScoreTier::from_percentage(self.percentage())
    }
}

fn question(
    id: &str,
    prompt: &str,
    options: [&str; 4],
    correct: usize,
    explanation: &str,
) -> Question {
    Question {
        id: id.to_string(),
        prompt: prompt.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct,
        explanation: explanation.to_string(),
    }
}

/// The built-in four-question preparedness bank.
pub fn default_questions() -> Vec<Question> {
    vec![
        question(
            "1",
            "If you smell smoke in a building, what should you do first?",
            [
                "Run to the nearest exit",
                "Use the elevator",
                "Crawl low under the smoke",
                "Open windows for ventilation",
            ],
            2,
            "Smoke rises, so staying low helps you breathe cleaner air and see better.",
        ),
        question(
            "2",
            "During an earthquake, what is the safest action to take?",
            [
                "Run outside immediately",
                "Drop, Cover, and Hold On",
                "Stand in a doorway",
                "Hide under stairs",
            ],
            1,
            "Drop, Cover, and Hold On protects you from falling objects and helps you stay stable.",
        ),
        question(
            "3",
            "What should you do if you're trapped in floodwater?",
            [
                "Try to walk through it",
                "Wait for help on higher ground",
                "Drive through it quickly",
                "Swim to safety",
            ],
            1,
            "Even shallow moving water can knock you down. Stay on higher ground and wait for rescue.",
        ),
        question(
            "4",
            "Where should you meet after evacuating during a fire drill?",
            [
                "In the parking lot",
                "At the designated assembly point",
                "Near the fire trucks",
                "In another building",
            ],
            1,
            "Assembly points are pre-determined safe locations where attendance can be taken.",
        ),
    ]
}
