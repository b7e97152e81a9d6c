//! Оверлей на winit 0.30 + softbuffer 0.4.
//!
//! Окно создаётся невидимым, без рамки, поверх всех окон на весь экран.
//! Цикл событий не запускается через `run_app`: сцены сами вызывают
//! [`Overlay::pump`] на каждом шаге ожидания (`pump_app_events` с нулевым
//! таймаутом), поэтому всё работает в одном потоке.
//!
//! Поля освобождаются в порядке объявления: surface раньше context,
//! context раньше window, window раньше event_loop.

use softbuffer::{Context, Surface};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop, OwnedDisplayHandle};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId, WindowLevel};

use crate::error::Result;
use crate::haunt_error;
use crate::render::Frame;

use super::r#trait::Overlay;

type Created = (
    Arc<Window>,
    Context<OwnedDisplayHandle>,
    Surface<OwnedDisplayHandle, Arc<Window>>,
);

pub struct WinitOverlay {
    surface: Surface<OwnedDisplayHandle, Arc<Window>>,
    _context: Context<OwnedDisplayHandle>,
    window: Arc<Window>,
    event_loop: Option<EventLoop<()>>,
    size: PhysicalSize<u32>,
    visible: bool,
    quit_requested: bool,
    last_frame: Option<Frame>,
}

/// Обработчик первого прохода цикла: winit 0.30 создаёт окна только в `resumed()`
struct Creator {
    attrs: Option<WindowAttributes>,
    result: Option<std::result::Result<Created, String>>,
}

impl Creator {
    fn create(event_loop: &ActiveEventLoop, attrs: WindowAttributes) -> std::result::Result<Created, String> {
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| format!("не удалось создать окно: {}", e))?,
        );
        let context = Context::new(event_loop.owned_display_handle())
            .map_err(|e| format!("softbuffer Context: {}", e))?;
        let surface = Surface::new(&context, window.clone())
            .map_err(|e| format!("softbuffer Surface: {}", e))?;
        Ok((window, context, surface))
    }
}

impl ApplicationHandler for Creator {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(attrs) = self.attrs.take() else {
            return;
        };
        self.result = Some(Self::create(event_loop, attrs));
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}
}

impl WinitOverlay {
    pub fn new(title: &str) -> Result<Self> {
        info!("Инициализация WinitOverlay");

        let mut event_loop = EventLoop::builder()
            .build()
            .map_err(|e| haunt_error!(display, "не удалось создать цикл событий: {}", e))?;

        let attrs = WindowAttributes::default()
            .with_title(title)
            .with_decorations(false)
            .with_transparent(true)
            .with_visible(false)
            .with_window_level(WindowLevel::AlwaysOnTop)
            .with_fullscreen(Some(Fullscreen::Borderless(None)));

        let mut creator = Creator {
            attrs: Some(attrs),
            result: None,
        };

        // Одного прохода достаточно: resumed() приходит синхронно на десктопе
        let _ = event_loop.pump_app_events(Some(Duration::from_millis(100)), &mut creator);

        let (window, context, surface) = creator
            .result
            .ok_or_else(|| haunt_error!(display, "resumed() так и не был вызван"))?
            .map_err(|e| haunt_error!(display, "{}", e))?;

        let size = window
            .current_monitor()
            .map(|monitor| monitor.size())
            .unwrap_or_else(|| window.inner_size());
        info!("Оверлей создан: {}x{}", size.width, size.height);

        let mut overlay = Self {
            surface,
            _context: context,
            window,
            event_loop: Some(event_loop),
            size,
            visible: false,
            quit_requested: false,
            last_frame: None,
        };
        overlay.set_click_through(true);
        Ok(overlay)
    }

    fn draw(&mut self, frame: &Frame) -> Result<()> {
        let (Some(w), Some(h)) = (NonZeroU32::new(frame.width()), NonZeroU32::new(frame.height())) else {
            return Ok(());
        };

        self.surface
            .resize(w, h)
            .map_err(|e| haunt_error!(display, "resize: {}", e))?;
        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|e| haunt_error!(display, "buffer_mut: {}", e))?;
        buffer.copy_from_slice(frame.pixels());
        buffer
            .present()
            .map_err(|e| haunt_error!(display, "present: {}", e))?;
        Ok(())
    }
}

impl ApplicationHandler for WinitOverlay {
    fn resumed(&mut self, _: &ActiveEventLoop) {}

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Окно оверлея закрыто пользователем");
                self.quit_requested = true;
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                info!("Escape в окне оверлея");
                self.quit_requested = true;
            }
            WindowEvent::Resized(size) => {
                debug!("Оверлей изменил размер: {}x{}", size.width, size.height);
                if size.width > 0 && size.height > 0 {
                    self.size = size;
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(frame) = self.last_frame.take() {
                    if let Err(e) = self.draw(&frame) {
                        warn!("Не удалось перерисовать оверлей: {}", e);
                    }
                    self.last_frame = Some(frame);
                }
            }
            _ => {}
        }
    }
}

impl Overlay for WinitOverlay {
    fn size(&self) -> (u32, u32) {
        (self.size.width, self.size.height)
    }

    fn set_click_through(&mut self, enabled: bool) {
        if let Err(e) = self.window.set_cursor_hittest(!enabled) {
            warn!("Режим кликов насквозь недоступен: {}", e);
        }
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.draw(frame)?;
        self.last_frame = Some(frame.clone());

        if !self.visible {
            self.window.set_visible(true);
            self.window.focus_window();
            self.visible = true;
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.last_frame = None;
        if self.visible {
            self.window.set_visible(false);
            self.visible = false;
        }
    }

    fn pump(&mut self) -> bool {
        // Забираем цикл, чтобы передать self как обработчик, затем возвращаем
        if let Some(mut event_loop) = self.event_loop.take() {
            let status = event_loop.pump_app_events(Some(Duration::ZERO), self);
            self.event_loop = Some(event_loop);
            if matches!(status, PumpStatus::Exit(_)) {
                self.quit_requested = true;
            }
        }
        std::mem::take(&mut self.quit_requested)
    }

    fn acknowledge(&mut self, title: &str, message: &str) {
        self.clear();
        self.pump();

        let _ = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Info)
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

impl Drop for WinitOverlay {
    fn drop(&mut self) {
        debug!("Закрытие окна оверлея");
        self.window.set_visible(false);
    }
}
