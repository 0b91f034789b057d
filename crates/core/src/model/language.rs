use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::QuestionNumber;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LanguageParseError {
    #[error("unknown language: {0}")]
    Unknown(String),
}

/// Display language for questions and option labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Tamil,
}

impl Language {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Language::English => Language::Tamil,
            Language::Tamil => Language::English,
        }
    }

    /// Prompt shown above the picture.
    #[must_use]
    pub fn question_text(self, number: QuestionNumber) -> String {
        match self {
            Language::English => format!("Question {number}: What is in the image?"),
            Language::Tamil => format!("கேள்வி {number}: படத்தில் என்ன உள்ளது?"),
        }
    }

    /// Label of the control that switches to the other language.
    #[must_use]
    pub fn toggle_label(self) -> &'static str {
        match self {
            Language::English => "Translate to Tamil",
            Language::Tamil => "Translate to English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => f.write_str("English"),
            Language::Tamil => f.write_str("Tamil"),
        }
    }
}

impl FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "ta" | "tamil" => Ok(Language::Tamil),
            _ => Err(LanguageParseError::Unknown(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_is_identity() {
        assert_eq!(Language::English.toggled(), Language::Tamil);
        assert_eq!(Language::English.toggled().toggled(), Language::English);
    }

    #[test]
    fn question_text_follows_language() {
        let q = QuestionNumber::new(3, 10).unwrap();
        assert_eq!(
            Language::English.question_text(q),
            "Question 3: What is in the image?"
        );
        assert_eq!(
            Language::Tamil.question_text(q),
            "கேள்வி 3: படத்தில் என்ன உள்ளது?"
        );
    }

    #[test]
    fn parses_codes_and_names() {
        assert_eq!("ta".parse::<Language>().unwrap(), Language::Tamil);
        assert_eq!("English".parse::<Language>().unwrap(), Language::English);
        assert!("fr".parse::<Language>().is_err());
    }
}
