use std::future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Sleep, sleep};
use tracing::{debug, error, info, warn};

use quiz_core::model::{Difficulty, WordRecord};

use super::service::{AdvanceOutcome, Evaluation, QuizSession, SubmitOutcome, TickOutcome};
use super::view::QuizSnapshot;
use crate::audio::AudioPlayer;
use crate::error::{FetchError, SessionError};
use crate::ticker::Ticker;
use crate::words::WordProvider;

const INTENT_BUFFER: usize = 32;

type FetchTask = JoinHandle<Result<Vec<WordRecord>, FetchError>>;

/// Something the player asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Select(usize),
    Submit,
    ToggleLanguage,
    ChooseDifficulty(Difficulty),
    Retry,
}

/// Presentation-side handle: send intents, watch snapshots.
#[derive(Clone, Debug)]
pub struct QuizHandle {
    intents: mpsc::Sender<QuizIntent>,
    snapshots: watch::Receiver<QuizSnapshot>,
}

impl QuizHandle {
    /// # Errors
    ///
    /// Returns `SessionError::Closed` once the controller has stopped.
    pub async fn send(&self, intent: QuizIntent) -> Result<(), SessionError> {
        self.intents
            .send(intent)
            .await
            .map_err(|_| SessionError::Closed)
    }

    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that observes every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QuizSnapshot> {
        self.snapshots.clone()
    }
}

/// Drives a `QuizSession` from one task.
///
/// Player intents, the word fetch, countdown ticks and the post-submit delay are all
/// funnelled through a single `select!` loop, so session mutations never interleave.
/// A fresh snapshot is published after each event.
pub struct QuizController {
    session: QuizSession,
    words: Arc<dyn WordProvider>,
    audio: Arc<dyn AudioPlayer>,
    ticker: Ticker,
    fetch: Option<FetchTask>,
    advance: Option<Pin<Box<Sleep>>>,
    snapshots: watch::Sender<QuizSnapshot>,
}

impl QuizController {
    #[must_use]
    pub fn new(
        session: QuizSession,
        words: Arc<dyn WordProvider>,
        audio: Arc<dyn AudioPlayer>,
    ) -> Self {
        let (snapshots, _) = watch::channel(session.snapshot());
        Self {
            session,
            words,
            audio,
            ticker: Ticker::per_second(),
            fetch: None,
            advance: None,
            snapshots,
        }
    }

    /// Spawn the controller loop on the current runtime.
    #[must_use]
    pub fn spawn(self) -> (QuizHandle, JoinHandle<()>) {
        let (intents, rx) = mpsc::channel(INTENT_BUFFER);
        let handle = QuizHandle {
            intents,
            snapshots: self.snapshots.subscribe(),
        };
        let task = tokio::spawn(self.run(rx));
        (handle, task)
    }

    /// Run until every intent sender is dropped.
    pub async fn run(mut self, mut intents: mpsc::Receiver<QuizIntent>) {
        self.start_fetch();
        self.publish();

        loop {
            tokio::select! {
                intent = intents.recv() => match intent {
                    Some(intent) => self.handle_intent(intent),
                    None => break,
                },
                result = wait_fetch(&mut self.fetch) => self.finish_fetch(result),
                () = self.ticker.tick() => self.on_tick(),
                () = wait_advance(&mut self.advance) => self.on_advance(),
            }
            self.publish();
        }

        if let Some(task) = self.fetch.take() {
            task.abort();
        }
        self.ticker.stop();
        debug!("quiz controller stopped");
    }

    fn handle_intent(&mut self, intent: QuizIntent) {
        match intent {
            QuizIntent::Select(index) => match self.session.select(index) {
                Ok(option) => {
                    debug!(index, text = %option.text, "option selected");
                    self.audio.play(&option.audio);
                }
                Err(e) => debug!(index, error = %e, "selection rejected"),
            },
            QuizIntent::Submit => match self.session.submit() {
                Ok(SubmitOutcome::Evaluated(evaluation)) => self.after_submission(evaluation),
                Ok(SubmitOutcome::Ignored(reason)) => debug!(?reason, "submit ignored"),
                Err(e) => debug!(error = %e, "submit rejected"),
            },
            QuizIntent::ToggleLanguage => {
                let language = self.session.toggle_language();
                debug!(%language, "language switched");
            }
            QuizIntent::ChooseDifficulty(difficulty) => {
                match self.session.choose_difficulty(difficulty) {
                    Ok(()) => {
                        info!(%difficulty, "quiz started");
                        self.ticker.start();
                    }
                    Err(e) => debug!(error = %e, "difficulty rejected"),
                }
            }
            QuizIntent::Retry => self.retry(),
        }
    }

    fn retry(&mut self) {
        info!("restarting quiz");
        if let Some(task) = self.fetch.take() {
            task.abort();
        }
        self.advance = None;
        self.ticker.stop();
        self.session.retry();
        self.start_fetch();
    }

    fn start_fetch(&mut self) {
        let words = Arc::clone(&self.words);
        self.fetch = Some(tokio::spawn(async move { words.fetch_words().await }));
    }

    fn finish_fetch(&mut self, result: Result<Result<Vec<WordRecord>, FetchError>, JoinError>) {
        self.fetch = None;
        match result {
            Ok(Ok(words)) => {
                let count = words.len();
                match self.session.load_words(words) {
                    Ok(()) => info!(count, "word list loaded"),
                    Err(e) => error!(count, error = %e, "word list unusable"),
                }
            }
            Ok(Err(e)) => {
                error!(error = %e, "failed to fetch word list");
                self.session.load_failed(e.to_string());
            }
            Err(e) if e.is_cancelled() => debug!("word fetch cancelled"),
            Err(e) => {
                error!(error = %e, "word fetch task failed");
                self.session.load_failed(e.to_string());
            }
        }
    }

    fn on_tick(&mut self) {
        match self.session.tick() {
            TickOutcome::Running { .. } => {}
            TickOutcome::Expired(evaluation) => {
                info!(question = %evaluation.question, "time is up");
                self.after_submission(evaluation);
            }
            TickOutcome::Idle => self.ticker.stop(),
        }
    }

    fn after_submission(&mut self, evaluation: Evaluation) {
        info!(
            question = %evaluation.question,
            outcome = ?evaluation.outcome,
            points = evaluation.points,
            "question submitted"
        );
        if evaluation.badge_unlocked {
            info!(points = evaluation.points, "badge unlocked");
        }
        self.ticker.stop();
        self.advance = Some(Box::pin(sleep(self.session.rules().advance_delay())));
    }

    fn on_advance(&mut self) {
        self.advance = None;
        match self.session.advance() {
            Ok(AdvanceOutcome::Next(question)) => {
                debug!(%question, "next question");
                self.ticker.start();
            }
            Ok(AdvanceOutcome::Completed(summary)) => {
                info!(
                    points = summary.points(),
                    correct = summary.correct(),
                    badge = summary.badge_awarded(),
                    "quiz completed"
                );
                self.ticker.stop();
            }
            Err(e) => warn!(error = %e, "could not advance"),
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.session.snapshot());
    }
}

async fn wait_fetch(
    fetch: &mut Option<FetchTask>,
) -> Result<Result<Vec<WordRecord>, FetchError>, JoinError> {
    match fetch {
        Some(task) => task.await,
        None => future::pending().await,
    }
}

async fn wait_advance(advance: &mut Option<Pin<Box<Sleep>>>) {
    match advance {
        Some(delay) => delay.await,
        None => future::pending().await,
    }
}
