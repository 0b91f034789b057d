/// Aggregated view of quiz progress, used for the progress bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizProgress {
    pub question: u32,
    pub total: u32,
    /// Fill ratio in `[0, 1]`: `question / total` once the quiz has started, 0 before.
    pub ratio: f32,
}

impl QuizProgress {
    #[must_use]
    pub fn not_started(total: u32) -> Self {
        Self {
            question: 0,
            total,
            ratio: 0.0,
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn at(question: u32, total: u32) -> Self {
        let ratio = if total == 0 {
            0.0
        } else {
            question as f32 / total as f32
        };
        Self {
            question,
            total,
            ratio,
        }
    }

    #[must_use]
    pub fn percent(&self) -> u32 {
        // Ratios stay within [0, 1], so the rounded product fits.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = (self.ratio * 100.0).round() as u32;
        pct
    }
}
