use std::fmt;
use std::time::Duration;

/// Звуковые эффекты сценария
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Фоновая музыка, играет по кругу
    Background,
    Ghost,
    Jumpscare,
    Keyboard,
}

impl Cue {
    pub const ALL: [Cue; 4] = [Cue::Background, Cue::Ghost, Cue::Jumpscare, Cue::Keyboard];

    pub fn file_name(&self) -> &'static str {
        match self {
            Cue::Background => "background.mp3",
            Cue::Ghost => "ghost.mp3",
            Cue::Jumpscare => "jumpscare.mp3",
            Cue::Keyboard => "keyboard.mp3",
        }
    }

    pub fn is_looping(&self) -> bool {
        matches!(self, Cue::Background)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

/// Trait for sound output; failures degrade to silence inside the implementation
pub trait AudioPlayer {
    /// Whether the sound file for `cue` exists
    fn is_loaded(&self, cue: Cue) -> bool;

    /// Start `cue`; `limit` cuts a one-shot sound after the given time.
    /// Returns `true` only if the sound actually started playing.
    fn play(&mut self, cue: Cue, limit: Option<Duration>) -> bool;

    /// Whether any one-shot sound is still playing (background music excluded)
    fn is_busy(&mut self) -> bool;

    fn stop_all(&mut self);
}
