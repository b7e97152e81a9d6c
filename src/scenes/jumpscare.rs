use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

use crate::error::Result;
use crate::render::{draw_text_centered, Frame, BLACK, RED};
use crate::services::Cue;
use crate::timeline::{Scene, Stage};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct JumpscareSpec {
    /// Сколько показывать скример, если звука нет
    pub fallback_ms: u64,
    /// Надпись на красном экране, когда нет картинки
    pub caption: String,
}

impl Default for JumpscareSpec {
    fn default() -> Self {
        Self {
            fallback_ms: 3000,
            caption: "BOO!!!".to_string(),
        }
    }
}

pub struct Jumpscare {
    spec: JumpscareSpec,
}

impl Jumpscare {
    pub fn new(spec: JumpscareSpec) -> Self {
        Self { spec }
    }

    fn compose(&self, stage: &Stage) -> Frame {
        let (width, height) = stage.overlay.size();

        match &stage.assets.jumpscare {
            Some(image) => {
                let mut frame = Frame::filled(width, height, BLACK);
                frame.draw_centered(image);
                frame
            }
            None => {
                info!("Скримера нет, показываем красный экран");
                let mut frame = Frame::filled(width, height, RED);
                draw_text_centered(&mut frame, &self.spec.caption, BLACK, 0.8);
                frame
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl Scene for Jumpscare {
    fn name(&self) -> &'static str {
        "jumpscare"
    }

    async fn run(&mut self, stage: &mut Stage) -> Result<()> {
        stage.overlay.set_click_through(false);
        let playing = stage.audio.play(Cue::Jumpscare, None);

        let frame = self.compose(stage);
        stage.overlay.present(&frame)?;

        // Держим картинку, пока играет звук; если звук не начался, фиксированное время
        let flow = if playing {
            stage.wait_while(|stage| stage.audio.is_busy()).await
        } else {
            stage.wait(Duration::from_millis(self.spec.fallback_ms)).await
        };

        if !flow.is_cancelled() {
            stage.overlay.clear();
        }
        Ok(())
    }
}
