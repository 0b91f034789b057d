mod difficulty;
mod language;
pub mod media;
mod question;
mod session;
mod word;

pub use media::{MediaUri, MediaValidationError};

pub use difficulty::{Difficulty, DifficultyParseError};
pub use language::{Language, LanguageParseError};
pub use question::{QuestionNumber, QuestionNumberError};
pub use session::{QuestionOutcome, QuizSummary, QuizSummaryError};
pub use word::{WordDraft, WordError, WordRecord, WordText};
