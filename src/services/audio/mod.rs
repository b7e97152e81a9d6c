mod process_player;
mod sound_bank;
mod r#trait;

pub use self::process_player::ProcessAudio;
pub use self::r#trait::{AudioPlayer, Cue};
pub use self::sound_bank::SoundBank;

use crate::config::AudioConfig;

/// Factory function to create the audio player; dry-run logs instead of playing
pub fn create_audio_player(config: &AudioConfig, bank: SoundBank, dry_run: bool) -> Box<dyn AudioPlayer> {
    Box::new(ProcessAudio::new(config.clone(), bank, dry_run))
}
