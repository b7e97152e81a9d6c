use tracing::info;

use crate::error::Result;
use crate::render::Frame;

use super::r#trait::Overlay;

/// Оверлей без окна: только логирует, что было бы показано
pub struct DryRunOverlay {
    width: u32,
    height: u32,
    visible: bool,
    frames: u64,
}

impl DryRunOverlay {
    pub fn new(width: u32, height: u32) -> Self {
        info!("Инициализация DryRunOverlay {}x{}", width, height);
        Self {
            width,
            height,
            visible: false,
            frames: 0,
        }
    }
}

impl Overlay for DryRunOverlay {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_click_through(&mut self, enabled: bool) {
        crate::debug_if_enabled!("[DRY RUN] Клики насквозь: {}", enabled);
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.frames += 1;
        if !self.visible {
            info!("[DRY RUN] Оверлей показан, фон #{:06X}", frame.background());
            self.visible = true;
        }
        crate::trace_if_enabled!("[DRY RUN] Кадр #{}", self.frames);
        Ok(())
    }

    fn clear(&mut self) {
        if self.visible {
            info!("[DRY RUN] Оверлей скрыт после {} кадров", self.frames);
            self.visible = false;
        }
    }

    fn pump(&mut self) -> bool {
        false
    }

    fn acknowledge(&mut self, title: &str, message: &str) {
        info!("[DRY RUN] Диалог «{}»: {}", title, message);
    }
}
