mod plan;
mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::QuizProgress;
pub use service::{
    AdvanceOutcome, Evaluation, IgnoredSubmit, QuizPhase, QuizSession, SubmitOutcome, TickOutcome,
};
pub use view::{AnswerOption, QuizSnapshot};
pub use workflow::{QuizController, QuizHandle, QuizIntent};
