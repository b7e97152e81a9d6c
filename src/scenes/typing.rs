//! «Призрак печатает»: редактор открывается сам, в нём появляется текст,
//! потом послание, и редактор закрывается без сохранения.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::Result;
use crate::events::{KeyCode, Modifiers};
use crate::render::{Frame, NEAR_BLACK};
use crate::services::Cue;
use crate::timeline::{Flow, Scene, Stage};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TypingSpec {
    /// Ожидание после запуска редактора
    pub launch_delay_ms: u64,
    /// Сколько первых символов печатать медленно
    pub slow_chars: usize,
    pub slow_delay_ms: u64,
    pub fast_delay_ms: u64,
    pub pause_ms: u64,
    pub message: String,
    pub message_delay_ms: u64,
    /// Обрезка звука клавиши
    pub keystroke_sound_ms: u64,
    pub close_delay_ms: u64,
    /// Почти чёрный экран после закрытия редактора
    pub aftermath_ms: u64,
    /// Текст, если файла с текстом нет
    pub fallback_text: String,
}

impl Default for TypingSpec {
    fn default() -> Self {
        Self {
            launch_delay_ms: 1000,
            slow_chars: 10,
            slow_delay_ms: 300,
            fast_delay_ms: 10,
            pause_ms: 3000,
            message: "DO NOT LOOK BACK".to_string(),
            message_delay_ms: 300,
            keystroke_sound_ms: 300,
            close_delay_ms: 500,
            aftermath_ms: 3000,
            fallback_text: "abcdefghijklmnopqrstuvwxyz".repeat(50),
        }
    }
}

/// Задержки между Enter, Ctrl+B и посланием
const NEWLINE_SETTLE: Duration = Duration::from_millis(300);
const BOLD_SETTLE: Duration = Duration::from_millis(200);

pub struct Typing {
    spec: TypingSpec,
    /// Одно предупреждение на сцену, дальше отказы клавиатуры только в debug
    keystroke_warned: bool,
}

impl Typing {
    pub fn new(spec: TypingSpec) -> Self {
        Self {
            spec,
            keystroke_warned: false,
        }
    }

    fn report(&mut self, result: Result<()>) {
        if let Err(e) = result {
            if self.keystroke_warned {
                crate::debug_if_enabled!("Нажатие не отправлено: {}", e);
            } else {
                warn!("Нажатия не доходят до редактора: {}", e);
                self.keystroke_warned = true;
            }
        }
    }

    fn press(&mut self, stage: &mut Stage, ch: char) {
        stage
            .audio
            .play(Cue::Keyboard, Some(Duration::from_millis(self.spec.keystroke_sound_ms)));

        let result = if ch == '\n' {
            stage.keys.chord(KeyCode::from(evdev::KeyCode::KEY_ENTER), Modifiers::new())
        } else {
            stage.keys.type_char(ch)
        };
        self.report(result);
    }

    fn chord(&mut self, stage: &mut Stage, key: evdev::KeyCode, modifiers: Modifiers) {
        let result = stage.keys.chord(KeyCode::from(key), modifiers);
        self.report(result);
    }

    /// Ожидание, после отмены которого редактор закрывается
    async fn pause(stage: &mut Stage, duration: Duration) -> Flow {
        let flow = stage.wait(duration).await;
        if flow.is_cancelled() {
            stage.editor.close();
        }
        flow
    }

    /// Всё, что происходит в окне редактора. `Cancelled` значит, что редактор уже закрыт.
    async fn haunt_editor(&mut self, stage: &mut Stage) -> Flow {
        if Self::pause(stage, Duration::from_millis(self.spec.launch_delay_ms)).await.is_cancelled() {
            return Flow::Cancelled;
        }

        let text = stage
            .assets
            .typing_text
            .clone()
            .unwrap_or_else(|| self.spec.fallback_text.clone());
        info!("Печатаем {} символов", text.chars().count());

        let slow = Duration::from_millis(self.spec.slow_delay_ms);
        let fast = Duration::from_millis(self.spec.fast_delay_ms);
        for (i, ch) in text.chars().enumerate() {
            if ch == '\r' {
                continue;
            }
            self.press(stage, ch);

            let delay = if i < self.spec.slow_chars { slow } else { fast };
            if Self::pause(stage, delay).await.is_cancelled() {
                return Flow::Cancelled;
            }
        }

        if Self::pause(stage, Duration::from_millis(self.spec.pause_ms)).await.is_cancelled() {
            return Flow::Cancelled;
        }

        self.chord(stage, evdev::KeyCode::KEY_ENTER, Modifiers::new());
        if Self::pause(stage, NEWLINE_SETTLE).await.is_cancelled() {
            return Flow::Cancelled;
        }
        self.chord(stage, evdev::KeyCode::KEY_B, Modifiers::new().with_ctrl(true));
        if Self::pause(stage, BOLD_SETTLE).await.is_cancelled() {
            return Flow::Cancelled;
        }

        let message = self.spec.message.clone();
        let message_delay = Duration::from_millis(self.spec.message_delay_ms);
        for ch in message.chars() {
            self.press(stage, ch);
            if Self::pause(stage, message_delay).await.is_cancelled() {
                return Flow::Cancelled;
            }
        }

        Flow::Continue
    }
}

#[async_trait::async_trait(?Send)]
impl Scene for Typing {
    fn name(&self) -> &'static str {
        "typing"
    }

    async fn run(&mut self, stage: &mut Stage) -> Result<()> {
        stage.overlay.clear();
        stage.overlay.set_click_through(true);

        match stage.editor.open() {
            Ok(()) => {
                if self.haunt_editor(stage).await.is_cancelled() {
                    return Ok(());
                }
                info!("Закрываем редактор без сохранения");
                stage.editor.close();
            }
            // Без окна-цели нажатия ушли бы в чужое окно, поэтому печать пропускаем
            Err(e) => warn!("Редактор не открылся, печать пропущена: {}", e),
        }

        if stage.wait(Duration::from_millis(self.spec.close_delay_ms)).await.is_cancelled() {
            return Ok(());
        }

        let (width, height) = stage.overlay.size();
        stage.overlay.set_click_through(false);
        stage.overlay.present(&Frame::filled(width, height, NEAR_BLACK))?;
        stage.wait(Duration::from_millis(self.spec.aftermath_ms)).await;
        Ok(())
    }
}
