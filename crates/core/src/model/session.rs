use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::Difficulty;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("too many questions for a single session: {len}")]
    TooManyQuestions { len: usize },
}

/// How a single question ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionOutcome {
    Correct,
    Incorrect,
    /// The timer ran out before anything was selected.
    Unanswered,
}

impl QuestionOutcome {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, QuestionOutcome::Correct)
    }
}

/// Final score card for a completed quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    difficulty: Option<Difficulty>,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    points: u32,
    badge_awarded: bool,
    correct: u32,
    incorrect: u32,
    unanswered: u32,
}

impl QuizSummary {
    /// Build a summary from the per-question outcomes of a session.
    ///
    /// # Errors
    ///
    /// Returns `QuizSummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `QuizSummaryError::TooManyQuestions` if the outcome count cannot fit in `u32`.
    pub fn from_outcomes(
        difficulty: Option<Difficulty>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        points: u32,
        badge_awarded: bool,
        outcomes: &[QuestionOutcome],
    ) -> Result<Self, QuizSummaryError> {
        if completed_at < started_at {
            return Err(QuizSummaryError::InvalidTimeRange);
        }
        u32::try_from(outcomes.len()).map_err(|_| QuizSummaryError::TooManyQuestions {
            len: outcomes.len(),
        })?;

        let mut correct = 0_u32;
        let mut incorrect = 0_u32;
        let mut unanswered = 0_u32;
        for outcome in outcomes {
            match outcome {
                QuestionOutcome::Correct => correct += 1,
                QuestionOutcome::Incorrect => incorrect += 1,
                QuestionOutcome::Unanswered => unanswered += 1,
            }
        }

        Ok(Self {
            difficulty,
            started_at,
            completed_at,
            points,
            badge_awarded,
            correct,
            incorrect,
            unanswered,
        })
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn badge_awarded(&self) -> bool {
        self.badge_awarded
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn unanswered(&self) -> u32 {
        self.unanswered
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.correct + self.incorrect + self.unanswered
    }
}
