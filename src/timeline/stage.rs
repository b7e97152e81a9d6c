use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::assets::Assets;
use crate::services::{AudioPlayer, CancelSource, Editor, Keystrokes, Overlay};

use super::exit_signal::ExitSignal;

/// Результат ожидания
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Cancelled,
}

impl Flow {
    pub fn is_cancelled(self) -> bool {
        self == Flow::Cancelled
    }
}

/// Внешние исполнители эффектов, которые получает каждая сцена
pub struct Services {
    pub overlay: Box<dyn Overlay>,
    pub audio: Box<dyn AudioPlayer>,
    pub keys: Box<dyn Keystrokes>,
    pub editor: Box<dyn Editor>,
    pub cancel: Box<dyn CancelSource>,
}

/// Сцена, на которой играется сценарий: исполнители, ассеты и флаг выхода.
///
/// Все ожидания проходят через [`Stage::wait`] и [`Stage::wait_while`], которые
/// опрашивают отмену не реже одного кванта.
pub struct Stage {
    pub overlay: Box<dyn Overlay>,
    pub audio: Box<dyn AudioPlayer>,
    pub keys: Box<dyn Keystrokes>,
    pub editor: Box<dyn Editor>,
    pub assets: Assets,
    cancel: Box<dyn CancelSource>,
    exit: ExitSignal,
    quantum: Duration,
    silenced: bool,
    torn_down: bool,
}

impl Stage {
    pub fn new(services: Services, assets: Assets, exit: ExitSignal, quantum: Duration) -> Self {
        let Services { overlay, audio, keys, editor, cancel } = services;
        Self {
            overlay,
            audio,
            keys,
            editor,
            assets,
            cancel,
            exit,
            quantum,
            silenced: false,
            torn_down: false,
        }
    }

    pub fn quantum(&self) -> Duration {
        self.quantum
    }

    pub fn is_cancelled(&self) -> bool {
        self.exit.is_set()
    }

    /// Опрос всех каналов отмены; обрабатывает события окна оверлея.
    /// Флаг мог взвести и обработчик Ctrl+C, звук в любом случае глушится один раз.
    pub fn check_cancel(&mut self) -> bool {
        if !self.exit.is_set() {
            let from_keyboard = self.cancel.poll_cancel();
            let from_window = self.overlay.pump();
            if from_keyboard || from_window {
                self.exit.request();
            }
        }

        if self.exit.is_set() {
            self.silence();
            return true;
        }
        false
    }

    /// Взвести флаг выхода и остановить звук
    pub fn request_exit(&mut self) {
        self.exit.request();
        self.silence();
    }

    fn silence(&mut self) {
        if !self.silenced {
            self.silenced = true;
            info!("Запрошен выход - останавливаем звук");
            self.audio.stop_all();
        }
    }

    /// Ждать `duration`, проверяя отмену каждый квант
    pub async fn wait(&mut self, duration: Duration) -> Flow {
        let deadline = Instant::now() + duration;
        loop {
            if self.check_cancel() {
                return Flow::Cancelled;
            }
            let now = Instant::now();
            if now >= deadline {
                return Flow::Continue;
            }
            sleep((deadline - now).min(self.quantum)).await;
        }
    }

    /// Ждать, пока `busy` возвращает `true` (например, пока играет звук)
    pub async fn wait_while<F>(&mut self, mut busy: F) -> Flow
    where
        F: FnMut(&mut Stage) -> bool,
    {
        loop {
            if self.check_cancel() {
                return Flow::Cancelled;
            }
            if !busy(self) {
                return Flow::Continue;
            }
            sleep(self.quantum).await;
        }
    }

    /// Освобождение ресурсов после сценария; повторные вызовы ничего не делают
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        debug!("Завершение: останавливаем звук, закрываем редактор и оверлей");
        self.audio.stop_all();
        if self.editor.is_open() {
            self.editor.close();
        }
        self.overlay.clear();
        self.overlay.set_click_through(true);
    }
}
