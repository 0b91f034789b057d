mod terminal;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{Language, LanguageParseError};
use quiz_services::{
    AudioPlayer, Clock, CommandAudioPlayer, HttpWordProvider, QuizController, QuizRules,
    QuizSession, SilentAudioPlayer, StaticWordProvider, WordProvider, WordProviderConfig,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::terminal::{Input, Renderer, parse_input};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTimeout { raw: String },
    InvalidSeed { raw: String },
    InvalidLanguage(LanguageParseError),
    EmptyApiUrl,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTimeout { raw } => write!(f, "invalid --timeout value: {raw}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidLanguage(e) => write!(f, "invalid --language value: {e}"),
            ArgsError::EmptyApiUrl => write!(f, "--api-url cannot be empty"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  picture-quiz [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --api-url <url>        Word API endpoint");
    eprintln!("  --timeout <secs>       Word API request timeout (default: 30)");
    eprintln!("  --words-file <path>    Read words from a JSON file instead of the API");
    eprintln!("  --audio-cmd <command>  Program used to play pronunciations, e.g. \"mpv --really-quiet\"");
    eprintln!("  --language <en|ta>     Starting language (default: en)");
    eprintln!("  --tamil                Same as --language ta");
    eprintln!("  --seed <n>             Fixed shuffle seed");
    eprintln!("  -v, --verbose          Debug logging");
    eprintln!("  -h, --help             Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_API_URL, QUIZ_FETCH_TIMEOUT_SECS, QUIZ_AUDIO_CMD, QUIZ_LANGUAGE, QUIZ_LOG");
}

struct Args {
    provider: WordProviderConfig,
    words_file: Option<PathBuf>,
    audio_cmd: Option<String>,
    language: Language,
    seed: Option<u64>,
    verbose: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut provider = WordProviderConfig::from_env();
        let mut audio_cmd = std::env::var("QUIZ_AUDIO_CMD")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let mut words_file = None;
        let mut language = match std::env::var("QUIZ_LANGUAGE") {
            Ok(value) if !value.trim().is_empty() => {
                value.parse().map_err(ArgsError::InvalidLanguage)?
            }
            _ => Language::English,
        };
        let mut seed = None;
        let mut verbose = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => {
                    let value = require_value(args, "--api-url")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::EmptyApiUrl);
                    }
                    provider.api_url = value;
                }
                "--timeout" => {
                    let value = require_value(args, "--timeout")?;
                    let secs = value
                        .parse::<u64>()
                        .ok()
                        .filter(|secs| *secs > 0)
                        .ok_or_else(|| ArgsError::InvalidTimeout { raw: value.clone() })?;
                    provider.timeout = Duration::from_secs(secs);
                }
                "--words-file" => {
                    words_file = Some(PathBuf::from(require_value(args, "--words-file")?));
                }
                "--audio-cmd" => {
                    audio_cmd = Some(require_value(args, "--audio-cmd")?);
                }
                "--language" => {
                    language = require_value(args, "--language")?
                        .parse()
                        .map_err(ArgsError::InvalidLanguage)?;
                }
                "--tamil" => language = Language::Tamil,
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = Some(parsed);
                }
                "--verbose" | "-v" => verbose = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            provider,
            words_file,
            audio_cmd,
            language,
            seed,
            verbose,
        })
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("QUIZ_LOG").unwrap_or_else(|_| EnvFilter::new("info"))
    };
    // Logs share the terminal with the quiz, so keep them on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_provider(args: &Args) -> Result<Arc<dyn WordProvider>, Box<dyn std::error::Error>> {
    if let Some(path) = &args.words_file {
        let body = std::fs::read(path)?;
        info!(path = %path.display(), "using local word list");
        return Ok(Arc::new(StaticWordProvider::from_json(&body)?));
    }
    let provider = HttpWordProvider::new(args.provider.clone())?;
    info!(
        url = %provider.config().api_url,
        timeout_secs = provider.config().timeout.as_secs(),
        "using word API"
    );
    Ok(Arc::new(provider))
}

fn build_audio(args: &Args) -> Arc<dyn AudioPlayer> {
    match args
        .audio_cmd
        .as_deref()
        .and_then(CommandAudioPlayer::from_command_line)
    {
        Some(player) => Arc::new(player),
        None => Arc::new(SilentAudioPlayer),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    init_tracing(args.verbose);

    let words = build_provider(&args)?;
    let audio = build_audio(&args);
    let rules = QuizRules::standard();
    let session = match args.seed {
        Some(seed) => QuizSession::with_seed(rules, Clock::default(), seed),
        None => QuizSession::new(rules, Clock::default()),
    }
    .with_language(args.language);

    let (handle, task) = QuizController::new(session, words, audio).spawn();
    let mut snapshots = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut renderer = Renderer::default();
    renderer.render(&snapshots.borrow_and_update());

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                renderer.render(&snapshot);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let snapshot = handle.snapshot();
                match parse_input(&line, &snapshot) {
                    Input::Intent(intent) => {
                        if handle.send(intent).await.is_err() {
                            break;
                        }
                    }
                    Input::Quit => break,
                    Input::Help => terminal::print_help(),
                    Input::Unknown => renderer.hint(&snapshot),
                }
            }
        }
    }

    drop(handle);
    drop(snapshots);
    task.await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|arg| (*arg).to_owned());
        Args::parse(&mut iter)
    }

    #[test]
    fn language_flag_accepts_codes_and_names() {
        assert_eq!(parse(&["--language", "ta"]).unwrap().language, Language::Tamil);
        assert_eq!(
            parse(&["--tamil", "--language", "English"]).unwrap().language,
            Language::English
        );
        assert!(matches!(
            parse(&["--language", "fr"]),
            Err(ArgsError::InvalidLanguage(_))
        ));
    }

    #[test]
    fn timeout_and_seed_are_validated() {
        let args = parse(&["--timeout", "5", "--seed", "42"]).unwrap();
        assert_eq!(args.provider.timeout, Duration::from_secs(5));
        assert_eq!(args.seed, Some(42));
        assert!(matches!(
            parse(&["--timeout", "0"]),
            Err(ArgsError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            parse(&["--seed"]),
            Err(ArgsError::MissingValue { flag: "--seed" })
        ));
    }
}
