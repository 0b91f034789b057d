use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{QuestionNumber, WordRecord};

/// Randomize the session word order (Fisher–Yates).
pub(crate) fn shuffle_words<R: Rng + ?Sized>(words: &mut [WordRecord], rng: &mut R) {
    words.shuffle(rng);
}

/// Builds the option set for a question.
///
/// Question `q` offers words `[q-1, q-1+option_count)`: the pictured word and the
/// ones right after it, so the window slides forward one word per question.
pub(crate) struct OptionPlanner {
    option_count: usize,
    available: usize,
}

impl OptionPlanner {
    #[must_use]
    pub fn new(option_count: u32, available: usize) -> Self {
        Self {
            option_count: usize::try_from(option_count).unwrap_or(usize::MAX),
            available,
        }
    }

    /// Draw and shuffle the options for `question`, as word indices in display order.
    ///
    /// The window is clipped at the end of the word list; sessions validate the
    /// word count up front so a full window is always available in practice.
    pub fn plan<R: Rng + ?Sized>(&self, question: QuestionNumber, rng: &mut R) -> Vec<usize> {
        let target = question.word_index();
        let end = target.saturating_add(self.option_count).min(self.available);
        let mut slots: Vec<usize> = (target.min(end)..end).collect();
        slots.shuffle(rng);
        slots
    }
}
