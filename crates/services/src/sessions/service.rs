use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;

use quiz_core::model::{
    Difficulty, Language, MediaUri, QuestionNumber, QuestionOutcome, QuizSummary, WordRecord,
};
use quiz_core::{Clock, QuizRules};

use super::plan::{OptionPlanner, shuffle_words};
use super::progress::QuizProgress;
use super::view::{AnswerOption, QuizSnapshot};
use crate::error::SessionError;

//
// ─── PHASES & OUTCOMES ─────────────────────────────────────────────────────────
//

/// Top-level state of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizPhase {
    /// Waiting for the word list (or stuck after a failed fetch until retry).
    Loading,
    AwaitingDifficulty,
    InProgress,
    /// Terminal; only `retry` leaves it.
    Completed,
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuizPhase::Loading => "loading",
            QuizPhase::AwaitingDifficulty => "awaiting a difficulty",
            QuizPhase::InProgress => "in progress",
            QuizPhase::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Result of evaluating one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub question: QuestionNumber,
    pub outcome: QuestionOutcome,
    /// Cumulative points after this question.
    pub points: u32,
    /// True only for the evaluation that unlocked the badge.
    pub badge_unlocked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredSubmit {
    AlreadySubmitted,
    NothingSelected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Evaluated(Evaluation),
    Ignored(IgnoredSubmit),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer not running (not in progress, or already submitted).
    Idle,
    Running { remaining_secs: u32 },
    /// Reached zero and the question was submitted automatically.
    Expired(Evaluation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Next(QuestionNumber),
    Completed(QuizSummary),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Quiz state machine: `Loading → AwaitingDifficulty → InProgress → Completed`.
///
/// Each question moves through unanswered, answered (an option selected) and
/// submitted; `advance` then moves to the next question or completes the session.
/// The session does no I/O and keeps no timers of its own: the caller feeds it the
/// fetched words, one `tick` per second, and `advance` after the feedback delay.
pub struct QuizSession {
    rules: QuizRules,
    clock: Clock,
    rng: StdRng,
    phase: QuizPhase,
    words: Vec<WordRecord>,
    load_error: Option<String>,
    difficulty: Option<Difficulty>,
    language: Language,
    question: QuestionNumber,
    remaining_secs: u32,
    slots: Vec<usize>,
    selected: Option<usize>,
    submitted: bool,
    points: u32,
    badge_awarded: bool,
    outcomes: Vec<QuestionOutcome>,
    last_evaluation: Option<Evaluation>,
    started_at: Option<DateTime<Utc>>,
    summary: Option<QuizSummary>,
}

impl QuizSession {
    /// Create a session in the `Loading` phase, seeded from the OS.
    #[must_use]
    pub fn new(rules: QuizRules, clock: Clock) -> Self {
        Self::with_rng(rules, clock, StdRng::from_os_rng())
    }

    /// Create a session with reproducible shuffling.
    #[must_use]
    pub fn with_seed(rules: QuizRules, clock: Clock, seed: u64) -> Self {
        Self::with_rng(rules, clock, StdRng::seed_from_u64(seed))
    }

    fn with_rng(rules: QuizRules, clock: Clock, rng: StdRng) -> Self {
        let remaining_secs = rules.timer_secs();
        Self {
            rules,
            clock,
            rng,
            phase: QuizPhase::Loading,
            words: Vec::new(),
            load_error: None,
            difficulty: None,
            language: Language::default(),
            question: QuestionNumber::FIRST,
            remaining_secs,
            slots: Vec::new(),
            selected: None,
            submitted: false,
            points: 0,
            badge_awarded: false,
            outcomes: Vec::new(),
            last_evaluation: None,
            started_at: None,
            summary: None,
        }
    }

    /// Start in the given language instead of English.
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    // ─── Loading ───────────────────────────────────────────────────────────────

    /// Accept the fetched word list, shuffle it and wait for a difficulty.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside `Loading`.
    /// Returns `SessionError::DataInsufficient` when the list cannot fill every
    /// question; the session then stays in `Loading` with the error recorded.
    pub fn load_words(&mut self, mut words: Vec<WordRecord>) -> Result<(), SessionError> {
        self.expect_phase(QuizPhase::Loading, "load words")?;

        if let Err(err) = self.rules.check_word_count(words.len()) {
            self.words.clear();
            self.load_error = Some(err.to_string());
            return Err(err.into());
        }

        shuffle_words(&mut words, &mut self.rng);
        self.words = words;
        self.load_error = None;
        self.phase = QuizPhase::AwaitingDifficulty;
        Ok(())
    }

    /// Record a failed fetch. The session keeps waiting in `Loading` with no words.
    pub fn load_failed(&mut self, message: impl Into<String>) {
        if self.phase != QuizPhase::Loading {
            return;
        }
        self.words.clear();
        self.load_error = Some(message.into());
    }

    /// Record the difficulty and show the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` unless the session is awaiting a difficulty.
    pub fn choose_difficulty(&mut self, difficulty: Difficulty) -> Result<(), SessionError> {
        self.expect_phase(QuizPhase::AwaitingDifficulty, "choose a difficulty")?;
        self.difficulty = Some(difficulty);
        self.started_at = Some(self.clock.now());
        self.phase = QuizPhase::InProgress;
        self.question = QuestionNumber::FIRST;
        self.build_question();
        Ok(())
    }

    // ─── Answering ─────────────────────────────────────────────────────────────

    /// Select an option, replacing any earlier selection.
    ///
    /// Returns the chosen option so the caller can play its pronunciation.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside `InProgress`,
    /// `SessionError::AlreadySubmitted` once the question is submitted, and
    /// `SessionError::OptionOutOfRange` for an unknown index.
    pub fn select(&mut self, index: usize) -> Result<AnswerOption, SessionError> {
        self.expect_phase(QuizPhase::InProgress, "select an option")?;
        if self.submitted {
            return Err(SessionError::AlreadySubmitted);
        }
        let option = self
            .option_at(index)
            .ok_or(SessionError::OptionOutOfRange {
                index,
                len: self.slots.len(),
            })?;
        self.selected = Some(index);
        Ok(option)
    }

    /// Evaluate the current selection.
    ///
    /// Does nothing when the question is already submitted or nothing is selected.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside `InProgress`.
    pub fn submit(&mut self) -> Result<SubmitOutcome, SessionError> {
        self.expect_phase(QuizPhase::InProgress, "submit")?;
        if self.submitted {
            return Ok(SubmitOutcome::Ignored(IgnoredSubmit::AlreadySubmitted));
        }
        let Some(selected) = self.selected else {
            return Ok(SubmitOutcome::Ignored(IgnoredSubmit::NothingSelected));
        };
        Ok(SubmitOutcome::Evaluated(self.evaluate(selected)))
    }

    /// Advance the countdown by one second.
    ///
    /// At zero the question is submitted as if the player pressed submit; with
    /// nothing selected it is recorded as unanswered so the quiz still moves on.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != QuizPhase::InProgress || self.submitted {
            return TickOutcome::Idle;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return TickOutcome::Running {
                remaining_secs: self.remaining_secs,
            };
        }

        let evaluation = match self.selected {
            Some(selected) => self.evaluate(selected),
            None => self.record(QuestionOutcome::Unanswered),
        };
        TickOutcome::Expired(evaluation)
    }

    /// Move past a submitted question: to the next one, or to `Completed` after the last.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside `InProgress`, or
    /// `SessionError::NotSubmitted` while the current question is still open.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, SessionError> {
        self.expect_phase(QuizPhase::InProgress, "advance")?;
        if !self.submitted {
            return Err(SessionError::NotSubmitted);
        }

        if let Some(next) = self.question.next(self.rules.question_count()) {
            self.question = next;
            self.build_question();
            return Ok(AdvanceOutcome::Next(next));
        }

        let started_at = self.started_at.unwrap_or_else(|| self.clock.now());
        let summary = QuizSummary::from_outcomes(
            self.difficulty,
            started_at,
            self.clock.now().max(started_at),
            self.points,
            self.badge_awarded,
            &self.outcomes,
        )?;
        self.phase = QuizPhase::Completed;
        self.summary = Some(summary.clone());
        Ok(AdvanceOutcome::Completed(summary))
    }

    /// Switch between English and Tamil.
    ///
    /// Labels, question text and the answer being compared against all switch
    /// together; the option order, the selection and a submission are kept.
    pub fn toggle_language(&mut self) -> Language {
        self.language = self.language.toggled();
        self.language
    }

    /// Reset everything to a fresh `Loading` session. The caller must fetch words again.
    pub fn retry(&mut self) {
        self.phase = QuizPhase::Loading;
        self.words.clear();
        self.load_error = None;
        self.difficulty = None;
        self.question = QuestionNumber::FIRST;
        self.remaining_secs = self.rules.timer_secs();
        self.slots.clear();
        self.selected = None;
        self.submitted = false;
        self.points = 0;
        self.badge_awarded = false;
        self.outcomes.clear();
        self.last_evaluation = None;
        self.started_at = None;
        self.summary = None;
    }

    // ─── Accessors ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn rules(&self) -> &QuizRules {
        &self.rules
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == QuizPhase::Completed
    }

    #[must_use]
    pub fn question(&self) -> QuestionNumber {
        self.question
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
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
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    #[must_use]
    pub fn summary(&self) -> Option<&QuizSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn last_evaluation(&self) -> Option<Evaluation> {
        self.last_evaluation
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Options of the current question, labelled in the active language.
    #[must_use]
    pub fn options(&self) -> Vec<AnswerOption> {
        (0..self.slots.len())
            .filter_map(|index| self.option_at(index))
            .collect()
    }

    #[must_use]
    pub fn question_text(&self) -> Option<String> {
        self.in_question()
            .then(|| self.language.question_text(self.question))
    }

    #[must_use]
    pub fn picture(&self) -> Option<&MediaUri> {
        if !self.in_question() {
            return None;
        }
        self.words
            .get(self.question.word_index())
            .map(WordRecord::picture)
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.rules.question_count();
        match self.phase {
            QuizPhase::Loading | QuizPhase::AwaitingDifficulty => QuizProgress::not_started(total),
            QuizPhase::InProgress | QuizPhase::Completed => {
                QuizProgress::at(self.question.value(), total)
            }
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot {
            phase: self.phase,
            language: self.language,
            difficulty: self.difficulty,
            question: self.question,
            question_count: self.rules.question_count(),
            question_text: self.question_text(),
            picture: self.picture().cloned(),
            options: if self.in_question() {
                self.options()
            } else {
                Vec::new()
            },
            selected: self.selected,
            remaining_secs: self.remaining_secs,
            points: self.points,
            progress: self.progress(),
            badge_awarded: self.badge_awarded,
            badge_threshold: self.rules.badge_threshold(),
            submitted: self.submitted,
            last_evaluation: self.last_evaluation,
            summary: self.summary.clone(),
            load_error: self.load_error.clone(),
        }
    }

    // ─── Internals ─────────────────────────────────────────────────────────────

    fn expect_phase(&self, expected: QuizPhase, action: &'static str) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidPhase {
                action,
                phase: self.phase,
            })
        }
    }

    fn in_question(&self) -> bool {
        self.phase == QuizPhase::InProgress
    }

    fn build_question(&mut self) {
        let planner = OptionPlanner::new(self.rules.option_count(), self.words.len());
        self.slots = planner.plan(self.question, &mut self.rng);
        self.selected = None;
        self.submitted = false;
        self.last_evaluation = None;
        self.remaining_secs = self.rules.timer_secs();
    }

    fn option_at(&self, index: usize) -> Option<AnswerOption> {
        let word = self.words.get(*self.slots.get(index)?)?;
        Some(AnswerOption {
            text: word.text(self.language).to_owned(),
            audio: word.audio().clone(),
        })
    }

    fn correct_text(&self) -> Option<&str> {
        self.words
            .get(self.question.word_index())
            .map(|word| word.text(self.language))
    }

    fn evaluate(&mut self, selected: usize) -> Evaluation {
        let chosen = self
            .slots
            .get(selected)
            .and_then(|&slot| self.words.get(slot))
            .map(|word| word.text(self.language));
        let is_correct = matches!((chosen, self.correct_text()), (Some(a), Some(b)) if a == b);

        let outcome = if is_correct {
            QuestionOutcome::Correct
        } else {
            QuestionOutcome::Incorrect
        };
        self.record(outcome)
    }

    fn record(&mut self, outcome: QuestionOutcome) -> Evaluation {
        let mut badge_unlocked = false;
        if outcome.is_correct() {
            self.points = self.points.saturating_add(self.rules.points_per_correct());
            if self.points >= self.rules.badge_threshold() && !self.badge_awarded {
                self.badge_awarded = true;
                badge_unlocked = true;
            }
        }
        self.submitted = true;
        self.outcomes.push(outcome);

        let evaluation = Evaluation {
            question: self.question,
            outcome,
            points: self.points,
            badge_unlocked,
        };
        self.last_evaluation = Some(evaluation);
        evaluation
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("phase", &self.phase)
            .field("words_len", &self.words.len())
            .field("question", &self.question)
            .field("remaining_secs", &self.remaining_secs)
            .field("selected", &self.selected)
            .field("submitted", &self.submitted)
            .field("points", &self.points)
            .field("badge_awarded", &self.badge_awarded)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
