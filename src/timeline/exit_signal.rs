use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Односторонний флаг выхода: взводится один раз и больше не сбрасывается.
///
/// Клоны разделяют одно состояние, поэтому флаг может взвести и обработчик
/// Ctrl+C, и опрос клавиши отмены.
#[derive(Debug, Clone, Default)]
pub struct ExitSignal {
    flag: Arc<AtomicBool>,
}

impl ExitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Возвращает `true` только для вызова, который действительно взвёл флаг
    pub fn request(&self) -> bool {
        !self.flag.swap(true, Ordering::SeqCst)
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_clear() {
        assert!(!ExitSignal::new().is_set());
    }

    #[test]
    fn test_request_is_one_way_and_idempotent() {
        let signal = ExitSignal::new();

        assert!(signal.request());
        assert!(signal.is_set());

        assert!(!signal.request());
        assert!(!signal.request());
        assert!(signal.is_set());
    }

    #[test]
    fn test_clones_share_state() {
        let signal = ExitSignal::new();
        let watcher = signal.clone();

        assert!(watcher.request());
        assert!(signal.is_set());
        assert!(!signal.request());
    }
}
