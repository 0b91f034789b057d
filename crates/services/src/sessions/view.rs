use quiz_core::model::{Difficulty, Language, MediaUri, QuestionNumber, QuizSummary};

use super::progress::QuizProgress;
use super::service::{Evaluation, QuizPhase};

/// One selectable answer, labelled in the active language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub text: String,
    pub audio: MediaUri,
}

/// Read model of a quiz session for presentation layers.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSnapshot {
    pub phase: QuizPhase,
    pub language: Language,
    pub difficulty: Option<Difficulty>,
    pub question: QuestionNumber,
    pub question_count: u32,
    pub question_text: Option<String>,
    pub picture: Option<MediaUri>,
    pub options: Vec<AnswerOption>,
    pub selected: Option<usize>,
    pub remaining_secs: u32,
    pub points: u32,
    pub progress: QuizProgress,
    pub badge_awarded: bool,
    /// Points at which the badge unlocks.
    pub badge_threshold: u32,
    pub submitted: bool,
    pub last_evaluation: Option<Evaluation>,
    pub summary: Option<QuizSummary>,
    pub load_error: Option<String>,
}

impl QuizSnapshot {
    /// Header line shown above the question, e.g. `Question 3/10`.
    #[must_use]
    pub fn header(&self) -> String {
        format!("Question {}/{}", self.question, self.question_count)
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<&AnswerOption> {
        self.selected.and_then(|index| self.options.get(index))
    }
}
