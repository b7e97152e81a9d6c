use crate::config::Config;
use crate::error::Result;
use tracing::warn;

/// Source of cancel requests, polled at every wait step
pub trait CancelSource {
    /// Non-blocking: `true` if the cancel hotkey was pressed since the last poll
    fn poll_cancel(&mut self) -> bool;
}

/// Factory function to create an appropriate cancel source based on the dry_run flag.
///
/// A real listener that cannot open the keyboard falls back to the dry-run one:
/// Escape in the overlay window and Ctrl+C still cancel.
pub fn create_cancel_source(config: &Config, dry_run: bool) -> Result<Box<dyn CancelSource>> {
    let hotkey = config
        .cancel_hotkey()
        .map_err(crate::error::HauntError::Config)?;

    if dry_run {
        return Ok(Box::new(super::dry_keyboard_listener::DryRunKeyboardListener::new(hotkey)));
    }

    match super::keyboard_listener::RealKeyboardListener::new(&config.input.device_path, hotkey) {
        Ok(listener) => Ok(Box::new(listener)),
        Err(e) => {
            warn!("Глобальная клавиша отмены недоступна: {}", e);
            warn!("Выход возможен по {} в окне оверлея или по Ctrl+C", hotkey);
            Ok(Box::new(super::dry_keyboard_listener::DryRunKeyboardListener::new(hotkey)))
        }
    }
}
