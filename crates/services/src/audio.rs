//! Pronunciation playback.
//!
//! Playback is fire-and-forget: callers never wait on it and failures are only logged.

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

use quiz_core::model::MediaUri;

/// Plays a media reference once, asynchronously.
pub trait AudioPlayer: Send + Sync {
    fn play(&self, audio: &MediaUri);
}

/// Player for environments without sound: logs the request and does nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudioPlayer;

impl AudioPlayer for SilentAudioPlayer {
    fn play(&self, audio: &MediaUri) {
        debug!(%audio, "audio playback skipped (silent player)");
    }
}

/// Hands each clip to an external program (e.g. `mpv --really-quiet`).
///
/// The reference is appended as the last argument. Must be used inside a Tokio runtime.
#[derive(Debug, Clone)]
pub struct CommandAudioPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandAudioPlayer {
    /// Parse a whitespace-separated command line such as `"ffplay -nodisp -autoexit"`.
    #[must_use]
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_owned);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl AudioPlayer for CommandAudioPlayer {
    fn play(&self, audio: &MediaUri) {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        // Local clips are passed as paths, everything else as text.
        match audio.as_path() {
            Some(path) => command.arg(path),
            None => command.arg(audio.to_string()),
        };
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false);

        let program = self.program.clone();
        let audio = audio.to_string();
        match command.spawn() {
            Ok(mut child) => {
                tokio::spawn(async move {
                    match child.wait().await {
                        Ok(status) if status.success() => debug!(%audio, "played"),
                        Ok(status) => warn!(%program, %audio, %status, "audio player exited with failure"),
                        Err(e) => warn!(%program, %audio, error = %e, "audio player did not finish"),
                    }
                });
            }
            Err(e) => warn!(%program, %audio, error = %e, "failed to start audio player"),
        }
    }
}
