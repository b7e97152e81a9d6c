use crate::events::Hotkey;
use tracing::info;

use super::r#trait::CancelSource;

/// Источник отмены без доступа к клавиатуре: никогда не срабатывает сам
pub struct DryRunKeyboardListener {
    polls: u64,
}

impl DryRunKeyboardListener {
    pub fn new(hotkey: Hotkey) -> Self {
        info!("Инициализация DryRunKeyboardListener (клавиша отмены: {})", hotkey);
        Self { polls: 0 }
    }
}

impl CancelSource for DryRunKeyboardListener {
    fn poll_cancel(&mut self) -> bool {
        self.polls += 1;
        if self.polls % 100 == 0 {
            crate::trace_if_enabled!("DryRunKeyboardListener: {} опросов без отмены", self.polls);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_cancels() {
        let mut listener = DryRunKeyboardListener::new(Hotkey::parse("escape", &[]).unwrap());
        assert!((0..250).all(|_| !listener.poll_cancel()));
    }
}
