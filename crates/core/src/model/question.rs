use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionNumberError {
    #[error("question numbers start at 1")]
    Zero,

    #[error("question {number} is past the last question ({last})")]
    PastEnd { number: u32, last: u32 },
}

/// 1-based position of a question within a session.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuestionNumber(u32);

impl QuestionNumber {
    /// The first question of every session.
    pub const FIRST: Self = Self(1);

    /// Creates a `QuestionNumber` bounded by `last`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionNumberError::Zero` for 0 and `QuestionNumberError::PastEnd`
    /// when `number` is greater than `last`.
    pub fn new(number: u32, last: u32) -> Result<Self, QuestionNumberError> {
        if number == 0 {
            return Err(QuestionNumberError::Zero);
        }
        if number > last {
            return Err(QuestionNumberError::PastEnd { number, last });
        }
        Ok(Self(number))
    }

    /// Returns the underlying 1-based value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Zero-based index of the word this question asks about.
    #[must_use]
    pub fn word_index(&self) -> usize {
        usize::try_from(self.0 - 1).unwrap_or(usize::MAX)
    }

    /// Returns the following question, or `None` when `self` is the last one.
    #[must_use]
    pub fn next(self, last: u32) -> Option<Self> {
        Self::new(self.0 + 1, last).ok()
    }
}

impl Default for QuestionNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Debug for QuestionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionNumber({})", self.0)
    }
}

impl fmt::Display for QuestionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
