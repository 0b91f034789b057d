use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{Difficulty, Language, MediaUri, QuestionOutcome, WordDraft, WordRecord};
use quiz_core::time::fixed_now;
use quiz_services::{
    AudioPlayer, Clock, FetchError, QuizController, QuizHandle, QuizIntent, QuizPhase, QuizRules,
    QuizSession, QuizSnapshot, WordProvider,
};
use tokio::time::Instant;

fn build_words(count: usize) -> Vec<WordRecord> {
    build_named_words("word", count)
}

fn build_named_words(prefix: &str, count: usize) -> Vec<WordRecord> {
    (0..count)
        .map(|i| {
            WordDraft::new(
                format!("{prefix}{i}"),
                format!("சொல்{i}"),
                format!("https://cdn.example.com/pic{i}.png"),
                format!("https://cdn.example.com/audio{i}.mp3"),
            )
            .validate()
            .unwrap()
        })
        .collect()
}

/// Serves `words`, failing the first `failures` requests.
struct CountingProvider {
    words: Vec<WordRecord>,
    failures: usize,
    calls: AtomicUsize,
}

impl CountingProvider {
    fn new(words: Vec<WordRecord>) -> Self {
        Self::failing_first(words, 0)
    }

    fn failing_first(words: Vec<WordRecord>, failures: usize) -> Self {
        Self {
            words,
            failures,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WordProvider for CountingProvider {
    async fn fetch_words(&self) -> Result<Vec<WordRecord>, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            let source = serde_json::from_str::<Vec<WordDraft>>("not json").unwrap_err();
            return Err(FetchError::Decode(source));
        }
        Ok(self.words.clone())
    }
}

/// The first request hangs for `delay` and serves stale words; later ones answer at once.
struct SlowFirstProvider {
    delay: Duration,
    calls: AtomicUsize,
    finished: AtomicUsize,
}

impl SlowFirstProvider {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl WordProvider for SlowFirstProvider {
    async fn fetch_words(&self) -> Result<Vec<WordRecord>, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let words = if call == 0 {
            tokio::time::sleep(self.delay).await;
            build_named_words("stale", 13)
        } else {
            build_words(13)
        };
        self.finished.fetch_add(1, Ordering::SeqCst);
        Ok(words)
    }
}

#[derive(Default)]
struct RecordingAudio {
    played: Mutex<Vec<MediaUri>>,
}

impl AudioPlayer for RecordingAudio {
    fn play(&self, audio: &MediaUri) {
        self.played.lock().unwrap().push(audio.clone());
    }
}

fn start(provider: Arc<impl WordProvider + 'static>, audio: Arc<RecordingAudio>) -> QuizHandle {
    let session = QuizSession::with_seed(QuizRules::standard(), Clock::fixed(fixed_now()), 11);
    let (handle, _task) = QuizController::new(session, provider, audio).spawn();
    handle
}

async fn wait_for(handle: &QuizHandle, check: impl FnMut(&QuizSnapshot) -> bool) -> QuizSnapshot {
    let mut rx = handle.subscribe();
    let snapshot = rx.wait_for(check).await.unwrap().clone();
    snapshot
}

/// Index of the option naming the pictured word (English labels).
fn correct_option(snapshot: &QuizSnapshot) -> usize {
    let picture = snapshot.picture.as_ref().unwrap().to_string();
    let number = picture
        .trim_start_matches("https://cdn.example.com/pic")
        .trim_end_matches(".png");
    let expected = format!("word{number}");
    snapshot
        .options
        .iter()
        .position(|option| option.text == expected)
        .unwrap()
}

async fn begin(handle: &QuizHandle) -> QuizSnapshot {
    wait_for(handle, |s| s.phase == QuizPhase::AwaitingDifficulty).await;
    handle
        .send(QuizIntent::ChooseDifficulty(Difficulty::Easy))
        .await
        .unwrap();
    wait_for(handle, |s| s.phase == QuizPhase::InProgress).await
}

#[tokio::test(start_paused = true)]
async fn correct_answer_scores_then_advances_after_delay() {
    let provider = Arc::new(CountingProvider::new(build_words(13)));
    let audio = Arc::new(RecordingAudio::default());
    let handle = start(Arc::clone(&provider), Arc::clone(&audio));

    let first = begin(&handle).await;
    assert_eq!(first.question.value(), 1);
    assert_eq!(first.options.len(), 4);
    assert_eq!(first.remaining_secs, 60);

    let index = correct_option(&first);
    handle.send(QuizIntent::Select(index)).await.unwrap();
    wait_for(&handle, |s| s.selected == Some(index)).await;
    assert_eq!(
        audio.played.lock().unwrap().last(),
        Some(&first.options[index].audio)
    );

    handle.send(QuizIntent::Submit).await.unwrap();
    let submitted = wait_for(&handle, |s| s.submitted).await;
    assert_eq!(submitted.points, 10);
    assert_eq!(
        submitted.last_evaluation.map(|e| e.outcome),
        Some(QuestionOutcome::Correct)
    );

    let second = wait_for(&handle, |s| s.question.value() == 2).await;
    assert_eq!(second.points, 10);
    assert_eq!(second.remaining_secs, 60);
    assert!(!second.submitted);
    assert_eq!(second.selected, None);
    assert!((second.progress.ratio - 0.2).abs() < 1e-6);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn timer_expiry_without_selection_moves_on() {
    let provider = Arc::new(CountingProvider::new(build_words(13)));
    let handle = start(provider, Arc::new(RecordingAudio::default()));

    begin(&handle).await;
    let started = Instant::now();

    let second = wait_for(&handle, |s| s.question.value() == 2).await;
    assert_eq!(second.points, 0);
    assert_eq!(second.remaining_secs, 60);
    assert_eq!(started.elapsed(), Duration::from_millis(60_500));
}

#[tokio::test(start_paused = true)]
async fn double_submit_scores_once() {
    let provider = Arc::new(CountingProvider::new(build_words(13)));
    let handle = start(provider, Arc::new(RecordingAudio::default()));

    let first = begin(&handle).await;
    handle
        .send(QuizIntent::Select(correct_option(&first)))
        .await
        .unwrap();
    handle.send(QuizIntent::Submit).await.unwrap();
    handle.send(QuizIntent::Submit).await.unwrap();

    let second = wait_for(&handle, |s| s.question.value() == 2).await;
    assert_eq!(second.points, 10);
}

#[tokio::test(start_paused = true)]
async fn full_run_completes_with_badge() {
    let provider = Arc::new(CountingProvider::new(build_words(13)));
    let handle = start(provider, Arc::new(RecordingAudio::default()));

    let mut snapshot = begin(&handle).await;
    for question in 1..=10 {
        assert_eq!(snapshot.question.value(), question);
        handle
            .send(QuizIntent::Select(correct_option(&snapshot)))
            .await
            .unwrap();
        handle.send(QuizIntent::Submit).await.unwrap();
        snapshot = wait_for(&handle, |s| {
            s.phase == QuizPhase::Completed || s.question.value() == question + 1
        })
        .await;
    }

    assert_eq!(snapshot.phase, QuizPhase::Completed);
    assert_eq!(snapshot.points, 100);
    assert!(snapshot.badge_awarded);
    let summary = snapshot.summary.unwrap();
    assert_eq!(summary.correct(), 10);
    assert_eq!(summary.difficulty(), Some(Difficulty::Easy));
}

#[tokio::test(start_paused = true)]
async fn language_toggle_relabels_options() {
    let provider = Arc::new(CountingProvider::new(build_words(13)));
    let handle = start(provider, Arc::new(RecordingAudio::default()));

    let english = begin(&handle).await;
    let index = correct_option(&english);
    handle.send(QuizIntent::Select(index)).await.unwrap();
    handle.send(QuizIntent::ToggleLanguage).await.unwrap();

    let tamil = wait_for(&handle, |s| s.language == Language::Tamil).await;
    assert_eq!(tamil.selected, Some(index));
    assert!(tamil.options[index].text.starts_with("சொல்"));
    assert!(tamil.question_text.unwrap().starts_with("கேள்வி 1"));

    handle.send(QuizIntent::Submit).await.unwrap();
    let submitted = wait_for(&handle, |s| s.submitted).await;
    assert_eq!(submitted.points, 10);
}

#[tokio::test(start_paused = true)]
async fn retry_resets_and_fetches_once_more() {
    let provider = Arc::new(CountingProvider::new(build_words(13)));
    let handle = start(Arc::clone(&provider), Arc::new(RecordingAudio::default()));

    let first = begin(&handle).await;
    handle
        .send(QuizIntent::Select(correct_option(&first)))
        .await
        .unwrap();
    handle.send(QuizIntent::Submit).await.unwrap();
    wait_for(&handle, |s| s.question.value() == 2).await;

    handle.send(QuizIntent::Retry).await.unwrap();
    let reset = wait_for(&handle, |s| s.phase == QuizPhase::AwaitingDifficulty).await;
    assert_eq!(reset.points, 0);
    assert_eq!(reset.question.value(), 1);
    assert_eq!(reset.remaining_secs, 60);
    assert_eq!(reset.difficulty, None);
    assert_eq!(reset.progress.ratio, 0.0);
    assert!(!reset.badge_awarded);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_stays_loading_until_retry() {
    let provider = Arc::new(CountingProvider::failing_first(build_words(13), 1));
    let handle = start(Arc::clone(&provider), Arc::new(RecordingAudio::default()));

    let failed = wait_for(&handle, |s| s.load_error.is_some()).await;
    assert_eq!(failed.phase, QuizPhase::Loading);

    handle.send(QuizIntent::Retry).await.unwrap();
    let loaded = wait_for(&handle, |s| s.phase == QuizPhase::AwaitingDifficulty).await;
    assert!(loaded.load_error.is_none());
    assert_eq!(provider.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn undersized_word_list_is_reported() {
    let provider = Arc::new(CountingProvider::new(build_words(12)));
    let handle = start(provider, Arc::new(RecordingAudio::default()));

    let snapshot = wait_for(&handle, |s| s.load_error.is_some()).await;
    assert_eq!(snapshot.phase, QuizPhase::Loading);
    assert!(snapshot.load_error.unwrap().contains("need at least 13 words"));
}

#[tokio::test(start_paused = true)]
async fn retry_during_advance_delay_cancels_the_pending_advance() {
    let provider = Arc::new(CountingProvider::new(build_words(13)));
    let handle = start(Arc::clone(&provider), Arc::new(RecordingAudio::default()));

    let first = begin(&handle).await;
    handle
        .send(QuizIntent::Select(correct_option(&first)))
        .await
        .unwrap();
    handle.send(QuizIntent::Submit).await.unwrap();
    wait_for(&handle, |s| s.submitted).await;

    handle.send(QuizIntent::Retry).await.unwrap();
    wait_for(&handle, |s| s.phase == QuizPhase::AwaitingDifficulty).await;

    tokio::time::sleep(Duration::from_secs(5)).await;
    let idle = handle.snapshot();
    assert_eq!(idle.phase, QuizPhase::AwaitingDifficulty);
    assert_eq!(idle.question.value(), 1);
    assert_eq!(idle.points, 0);
    assert_eq!(idle.remaining_secs, 60);
    assert!(!idle.submitted);

    handle
        .send(QuizIntent::ChooseDifficulty(Difficulty::Hard))
        .await
        .unwrap();
    let restarted = wait_for(&handle, |s| s.phase == QuizPhase::InProgress).await;
    assert_eq!(restarted.question.value(), 1);
    assert!(!restarted.submitted);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn retry_aborts_in_flight_fetch_and_loads_once() {
    let provider = Arc::new(SlowFirstProvider::new(Duration::from_secs(10)));
    let handle = start(Arc::clone(&provider), Arc::new(RecordingAudio::default()));

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(handle.snapshot().phase, QuizPhase::Loading);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    handle.send(QuizIntent::Retry).await.unwrap();
    wait_for(&handle, |s| s.phase == QuizPhase::AwaitingDifficulty).await;

    // Long past the point where the first request would have answered.
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    assert_eq!(provider.finished.load(Ordering::SeqCst), 1);

    let started = begin(&handle).await;
    assert!(started.options.iter().all(|option| option.text.starts_with("word")));
}
