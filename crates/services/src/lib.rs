#![forbid(unsafe_code)]

pub mod audio;
pub mod error;
pub mod sessions;
pub mod ticker;
pub mod words;

pub use quiz_core::{Clock, QuizRules};

pub use audio::{AudioPlayer, CommandAudioPlayer, SilentAudioPlayer};
pub use error::{FetchError, SessionError};
pub use ticker::Ticker;
pub use words::{HttpWordProvider, StaticWordProvider, WordProvider, WordProviderConfig};

pub use sessions::{
    AnswerOption, QuizController, QuizHandle, QuizIntent, QuizPhase, QuizProgress, QuizSession,
    QuizSnapshot,
};
