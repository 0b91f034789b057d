use serde::Deserialize;
use thiserror::Error;

use crate::model::Language;
use crate::model::media::{MediaUri, MediaValidationError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WordError {
    #[error("English word cannot be empty")]
    EmptyEnglish,

    #[error("Tamil word cannot be empty")]
    EmptyTamil,

    #[error("invalid picture reference: {0}")]
    InvalidPicture(#[source] MediaValidationError),

    #[error("invalid audio reference: {0}")]
    InvalidAudio(#[source] MediaValidationError),
}

//
// ─── TEXT ──────────────────────────────────────────────────────────────────────
//

/// Non-blank word text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordText(String);

impl WordText {
    pub fn parse(s: impl Into<String>) -> Option<Self> {
        let s = s.into();
        if s.trim().is_empty() {
            return None;
        }
        Some(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//
// ─── DRAFT (wire shape) ────────────────────────────────────────────────────────
//

/// A word exactly as the word API sends it. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WordDraft {
    #[serde(rename = "enWord", default)]
    pub english: String,
    #[serde(rename = "taWord", default)]
    pub tamil: String,
    #[serde(rename = "picturePath", default)]
    pub picture: String,
    #[serde(rename = "audioPath", default)]
    pub audio: String,
}

impl WordDraft {
    pub fn new(
        english: impl Into<String>,
        tamil: impl Into<String>,
        picture: impl Into<String>,
        audio: impl Into<String>,
    ) -> Self {
        Self {
            english: english.into(),
            tamil: tamil.into(),
            picture: picture.into(),
            audio: audio.into(),
        }
    }

    /// Validate the draft into a `WordRecord`.
    ///
    /// # Errors
    ///
    /// Returns `WordError` when either text is blank or a media reference is unusable.
    pub fn validate(self) -> Result<WordRecord, WordError> {
        let english = WordText::parse(self.english).ok_or(WordError::EmptyEnglish)?;
        let tamil = WordText::parse(self.tamil).ok_or(WordError::EmptyTamil)?;
        let picture = MediaUri::parse(&self.picture).map_err(WordError::InvalidPicture)?;
        let audio = MediaUri::parse(&self.audio).map_err(WordError::InvalidAudio)?;

        Ok(WordRecord {
            english,
            tamil,
            picture,
            audio,
        })
    }
}

//
// ─── VALIDATED RECORD ──────────────────────────────────────────────────────────
//

/// One vocabulary entry: the word in both languages, its picture and its pronunciation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRecord {
    english: WordText,
    tamil: WordText,
    picture: MediaUri,
    audio: MediaUri,
}

impl WordRecord {
    #[must_use]
    pub fn english(&self) -> &str {
        self.english.as_str()
    }

    #[must_use]
    pub fn tamil(&self) -> &str {
        self.tamil.as_str()
    }

    /// The word as shown (and compared) in `language`.
    #[must_use]
    pub fn text(&self, language: Language) -> &str {
        match language {
            Language::English => self.english(),
            Language::Tamil => self.tamil(),
        }
    }

    #[must_use]
    pub fn picture(&self) -> &MediaUri {
        &self.picture
    }

    #[must_use]
    pub fn audio(&self) -> &MediaUri {
        &self.audio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_api_field_names() {
        let raw = r#"{
            "id": 7,
            "enWord": "Cat",
            "taWord": "பூனை",
            "picturePath": "https://cdn.example.com/cat.png",
            "audioPath": "https://cdn.example.com/cat.mp3"
        }"#;
        let draft: WordDraft = serde_json::from_str(raw).unwrap();
        let word = draft.validate().unwrap();

        assert_eq!(word.english(), "Cat");
        assert_eq!(word.text(Language::Tamil), "பூனை");
        assert!(word.picture().as_url().is_some());
        assert_eq!(word.audio().to_string(), "https://cdn.example.com/cat.mp3");
    }

    #[test]
    fn blank_text_is_rejected() {
        let err = WordDraft::new("  ", "பூனை", "cat.png", "cat.mp3")
            .validate()
            .unwrap_err();
        assert_eq!(err, WordError::EmptyEnglish);

        let err = WordDraft::new("Cat", "", "cat.png", "cat.mp3")
            .validate()
            .unwrap_err();
        assert_eq!(err, WordError::EmptyTamil);
    }

    #[test]
    fn missing_media_is_rejected() {
        let raw = r#"{ "enWord": "Cat", "taWord": "பூனை", "picturePath": "cat.png" }"#;
        let draft: WordDraft = serde_json::from_str(raw).unwrap();
        assert_eq!(
            draft.validate().unwrap_err(),
            WordError::InvalidAudio(MediaValidationError::EmptyMediaUri)
        );
    }
}
