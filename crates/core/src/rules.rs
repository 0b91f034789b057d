use std::time::Duration;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RulesError {
    #[error("question count must be > 0")]
    InvalidQuestionCount,

    #[error("option count must be at least 2")]
    InvalidOptionCount,

    #[error("timer must be > 0 seconds")]
    InvalidTimer,

    #[error("points per correct answer must be > 0")]
    InvalidPointsPerCorrect,
}

/// The word list cannot fill every question with a full set of options.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("need at least {required} words for a full quiz, got {actual}")]
pub struct DataInsufficientError {
    pub required: usize,
    pub actual: usize,
}

//
// ─── RULES ─────────────────────────────────────────────────────────────────────
//

/// Fixed parameters of a quiz session.
///
/// Each question `q` draws its options from words `[q-1, q-1+option_count)`, so a
/// session needs `question_count + option_count - 1` words in total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRules {
    question_count: u32,
    option_count: u32,
    timer_secs: u32,
    points_per_correct: u32,
    badge_threshold: u32,
    advance_delay: Duration,
}

impl QuizRules {
    /// Ten questions, four options, one minute each, 10 points per hit, badge at 50.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            question_count: 10,
            option_count: 4,
            timer_secs: 60,
            points_per_correct: 10,
            badge_threshold: 50,
            advance_delay: Duration::from_millis(500),
        }
    }

    /// Creates custom rules.
    ///
    /// # Errors
    ///
    /// Returns `RulesError` if a count or the timer is zero, or fewer than two options are offered.
    pub fn new(
        question_count: u32,
        option_count: u32,
        timer_secs: u32,
        points_per_correct: u32,
        badge_threshold: u32,
        advance_delay: Duration,
    ) -> Result<Self, RulesError> {
        if question_count == 0 {
            return Err(RulesError::InvalidQuestionCount);
        }
        if option_count < 2 {
            return Err(RulesError::InvalidOptionCount);
        }
        if timer_secs == 0 {
            return Err(RulesError::InvalidTimer);
        }
        if points_per_correct == 0 {
            return Err(RulesError::InvalidPointsPerCorrect);
        }

        Ok(Self {
            question_count,
            option_count,
            timer_secs,
            points_per_correct,
            badge_threshold,
            advance_delay,
        })
    }

    // Accessors
    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn option_count(&self) -> u32 {
        self.option_count
    }

    #[must_use]
    pub fn timer_secs(&self) -> u32 {
        self.timer_secs
    }

    #[must_use]
    pub fn points_per_correct(&self) -> u32 {
        self.points_per_correct
    }

    #[must_use]
    pub fn badge_threshold(&self) -> u32 {
        self.badge_threshold
    }

    /// Pause between a submission and the next question, so feedback is visible.
    #[must_use]
    pub fn advance_delay(&self) -> Duration {
        self.advance_delay
    }

    /// Minimum number of words a session needs.
    #[must_use]
    pub fn required_words(&self) -> usize {
        let questions = usize::try_from(self.question_count).unwrap_or(usize::MAX);
        let options = usize::try_from(self.option_count).unwrap_or(usize::MAX);
        // option_count >= 2, so the subtraction cannot underflow.
        questions.saturating_add(options - 1)
    }

    /// Check that `available` words are enough for a full session.
    ///
    /// # Errors
    ///
    /// Returns `DataInsufficientError` when fewer than `required_words()` are available.
    pub fn check_word_count(&self, available: usize) -> Result<(), DataInsufficientError> {
        let required = self.required_words();
        if available < required {
            return Err(DataInsufficientError {
                required,
                actual: available,
            });
        }
        Ok(())
    }
}

impl Default for QuizRules {
    fn default() -> Self {
        Self::standard()
    }
}
