#![forbid(unsafe_code)]

pub mod model;
pub mod rules;
pub mod time;

pub use rules::{DataInsufficientError, QuizRules, RulesError};
pub use time::Clock;
