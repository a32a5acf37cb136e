use crate::renderer::AudioView;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("playback failed: {0}")]
pub struct PlaybackError(pub String);

/// Whatever actually produces sound.
pub trait AudioPlayer {
    fn play(&mut self, url: &str, volume: f64) -> Result<(), PlaybackError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashState {
    WaitingForClick,
    Playing,
}

/// The "click to enter" overlay. Browsers only allow audio after a user
/// gesture, so the first click is what starts playback. There is no way
/// back to waiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplashGate {
    state: SplashState,
    overlay_visible: bool,
}

impl SplashGate {
    /// A disabled splash starts hidden but still waits for the first click.
    pub fn new(enabled: bool) -> Self {
        Self {
            state: SplashState::WaitingForClick,
            overlay_visible: enabled,
        }
    }

    pub fn state(&self) -> SplashState {
        self.state
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn hide_overlay(&mut self) {
        self.overlay_visible = false;
    }

    /// Returns false if the gate had already been passed. Playback errors are
    /// logged and otherwise ignored.
    pub fn click(&mut self, audio: &AudioView, player: &mut dyn AudioPlayer) -> bool {
        if self.state == SplashState::Playing {
            return false;
        }
        self.state = SplashState::Playing;
        self.overlay_visible = false;

        match audio.url.as_deref().map(str::trim) {
            Some(url) if audio.enabled && !url.is_empty() => {
                if let Err(e) = player.play(url, audio.volume) {
                    tracing::warn!("audio: {}", e);
                }
            }
            _ => tracing::debug!("audio: nothing to play"),
        }
        true
    }
}
