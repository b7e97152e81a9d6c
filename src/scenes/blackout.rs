use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::Result;
use crate::render::{Frame, BLACK};
use crate::timeline::{Scene, Stage};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BlackoutSpec {
    /// Сколько раз переключить экран; первое состояние тёмное
    pub blinks: u32,
    pub blink_ms: u64,
    /// Сколько держать тёмный экран после мигания
    pub hold_ms: u64,
}

impl Default for BlackoutSpec {
    fn default() -> Self {
        Self {
            blinks: 8,
            blink_ms: 1000,
            hold_ms: 3000,
        }
    }
}

impl BlackoutSpec {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.blinks > 0 && self.blink_ms == 0 {
            return Err("blink_ms должно быть больше 0".to_string());
        }
        Ok(())
    }
}

/// Мигающий чёрный экран, перехватывающий ввод
pub struct Blackout {
    spec: BlackoutSpec,
}

impl Blackout {
    pub fn new(spec: BlackoutSpec) -> Self {
        Self { spec }
    }
}

#[async_trait::async_trait(?Send)]
impl Scene for Blackout {
    fn name(&self) -> &'static str {
        "blackout"
    }

    async fn run(&mut self, stage: &mut Stage) -> Result<()> {
        let (width, height) = stage.overlay.size();
        let dark = Frame::filled(width, height, BLACK);

        stage.overlay.set_click_through(false);

        for blink in 0..self.spec.blinks {
            if blink % 2 == 0 {
                stage.overlay.present(&dark)?;
            } else {
                stage.overlay.clear();
            }
            debug!("Мигание {}/{}", blink + 1, self.spec.blinks);

            if stage.wait(Duration::from_millis(self.spec.blink_ms)).await.is_cancelled() {
                return Ok(());
            }
        }

        stage.overlay.present(&dark)?;
        stage.wait(Duration::from_millis(self.spec.hold_ms)).await;
        Ok(())
    }
}
