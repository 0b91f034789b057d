//! Line-based presentation of a quiz session.

use quiz_core::model::{Difficulty, QuestionOutcome};
use quiz_services::{QuizIntent, QuizPhase, QuizSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Intent(QuizIntent),
    Quit,
    Help,
    Unknown,
}

/// Map a typed line to an intent. Option numbers are 1-based on screen.
#[must_use]
pub fn parse_input(line: &str, snapshot: &QuizSnapshot) -> Input {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => return Input::Quit,
        "?" | "h" | "help" => return Input::Help,
        "s" | "submit" => return Input::Intent(QuizIntent::Submit),
        "t" | "translate" => return Input::Intent(QuizIntent::ToggleLanguage),
        "r" | "retry" => return Input::Intent(QuizIntent::Retry),
        _ => {}
    }

    if let Ok(difficulty) = line.parse::<Difficulty>() {
        return Input::Intent(QuizIntent::ChooseDifficulty(difficulty));
    }
    if snapshot.phase == QuizPhase::AwaitingDifficulty {
        // Number shortcuts on the difficulty screen.
        match line {
            "1" => return Input::Intent(QuizIntent::ChooseDifficulty(Difficulty::Easy)),
            "2" => return Input::Intent(QuizIntent::ChooseDifficulty(Difficulty::Medium)),
            "3" => return Input::Intent(QuizIntent::ChooseDifficulty(Difficulty::Hard)),
            _ => return Input::Unknown,
        }
    }

    match line.parse::<usize>() {
        Ok(n) if n >= 1 => Input::Intent(QuizIntent::Select(n - 1)),
        _ => Input::Unknown,
    }
}

pub fn print_help() {
    println!("Commands:");
    println!("  easy | medium | hard   choose a difficulty (or 1-3 on that screen)");
    println!("  1-4                    pick an option (plays its pronunciation)");
    println!("  s                      submit");
    println!("  t                      switch English/Tamil");
    println!("  r                      retry");
    println!("  q                      quit");
}

/// Everything on screen except the countdown, which changes every second.
#[derive(Debug, Clone, PartialEq)]
struct Frame {
    phase: QuizPhase,
    question: u32,
    question_text: Option<String>,
    options: Vec<String>,
    selected: Option<usize>,
    submitted: bool,
    points: u32,
    badge_awarded: bool,
    load_error: Option<String>,
}

impl Frame {
    fn of(snapshot: &QuizSnapshot) -> Self {
        Self {
            phase: snapshot.phase,
            question: snapshot.question.value(),
            question_text: snapshot.question_text.clone(),
            options: snapshot.options.iter().map(|o| o.text.clone()).collect(),
            selected: snapshot.selected,
            submitted: snapshot.submitted,
            points: snapshot.points,
            badge_awarded: snapshot.badge_awarded,
            load_error: snapshot.load_error.clone(),
        }
    }
}

/// Prints a frame whenever the visible state changes, plus occasional timer lines.
#[derive(Debug, Default)]
pub struct Renderer {
    last: Option<Frame>,
}

impl Renderer {
    pub fn render(&mut self, snapshot: &QuizSnapshot) {
        let frame = Frame::of(snapshot);
        if self.last.as_ref() == Some(&frame) {
            if snapshot.phase == QuizPhase::InProgress
                && !snapshot.submitted
                && should_announce(snapshot.remaining_secs)
            {
                println!("  ⏱  {}s left", snapshot.remaining_secs);
            }
            return;
        }
        for line in frame_lines(snapshot) {
            println!("{line}");
        }
        self.last = Some(frame);
    }

    pub fn hint(&self, snapshot: &QuizSnapshot) {
        let hint = match snapshot.phase {
            QuizPhase::Loading => "still loading; type r to retry or q to quit",
            QuizPhase::AwaitingDifficulty => "type easy, medium or hard",
            QuizPhase::InProgress => "type an option number, s to submit, or ? for help",
            QuizPhase::Completed => "type r to play again or q to quit",
        };
        println!("  {hint}");
    }
}

fn should_announce(remaining_secs: u32) -> bool {
    remaining_secs <= 5 || remaining_secs % 15 == 0
}

fn frame_lines(snapshot: &QuizSnapshot) -> Vec<String> {
    let mut lines = vec![String::new()];
    match snapshot.phase {
        QuizPhase::Loading => match &snapshot.load_error {
            Some(error) => {
                lines.push(format!("Could not load words: {error}"));
                lines.push("Type r to retry.".to_owned());
            }
            None => lines.push("Loading...".to_owned()),
        },
        QuizPhase::AwaitingDifficulty => {
            lines.push("Select Difficulty Level".to_owned());
            for (i, level) in Difficulty::ALL.iter().enumerate() {
                lines.push(format!("  {}. {level}", i + 1));
            }
        }
        QuizPhase::InProgress => {
            if snapshot.badge_awarded {
                lines.push(format!(
                    "🏆 Achievement Unlocked: {} Points!",
                    snapshot.badge_threshold
                ));
            }
            lines.push(format!(
                "{}   Points: {}   [{}]   ({})",
                snapshot.header(),
                snapshot.points,
                progress_bar(snapshot.progress.percent()),
                snapshot.language.toggle_label(),
            ));
            lines.push(format!("Time left: {}s", snapshot.remaining_secs));
            if let Some(text) = &snapshot.question_text {
                lines.push(text.clone());
            }
            if let Some(picture) = &snapshot.picture {
                lines.push(format!("  picture: {picture}"));
            }
            for (i, option) in snapshot.options.iter().enumerate() {
                let marker = if snapshot.selected == Some(i) { '>' } else { ' ' };
                lines.push(format!("{marker} {}. {}", i + 1, option.text));
            }
            if let Some(option) = snapshot.selected_option() {
                lines.push(format!("Your answer: {}", option.text));
            }
            match snapshot.last_evaluation {
                Some(evaluation) if snapshot.submitted => {
                    let verdict = match evaluation.outcome {
                        QuestionOutcome::Correct => "Correct!",
                        QuestionOutcome::Incorrect => "Not quite.",
                        QuestionOutcome::Unanswered => "Time's up.",
                    };
                    lines.push(verdict.to_owned());
                }
                _ => lines.push("Pick an option, then s to submit.".to_owned()),
            }
        }
        QuizPhase::Completed => {
            lines.push("Quiz Completed!".to_owned());
            lines.push(format!("Final Score: {}", snapshot.points));
            if let Some(summary) = &snapshot.summary {
                lines.push(format!(
                    "Correct: {}  Wrong: {}  Timed out: {}",
                    summary.correct(),
                    summary.incorrect(),
                    summary.unanswered()
                ));
            }
            if snapshot.badge_awarded {
                lines.push("🏆 Badge earned".to_owned());
            }
            lines.push("Type r to retry.".to_owned());
        }
    }
    lines
}

fn progress_bar(percent: u32) -> String {
    let filled = usize::try_from(percent.min(100) / 10).unwrap_or(10);
    format!("{}{}", "#".repeat(filled), ".".repeat(10 - filled))
}
