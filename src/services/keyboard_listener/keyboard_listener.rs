use crate::error::{HauntError, Result};
use crate::events::{Hotkey, KeyCode, KeyEvent, KeyState};
use crate::utils::DeviceFinder;
use evdev::{Device, EventType, InputEvent};
use std::io::ErrorKind;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::modifier_state::ModifierState;
use super::r#trait::CancelSource;

/// Глобальная клавиша отмены: читает физическую клавиатуру через evdev.
///
/// Устройство не захватывается эксклюзивно: пользователь продолжает печатать,
/// мы только подсматриваем события. Чтение идёт в отдельной задаче того же
/// потока, сцены забирают события из канала при опросе.
pub struct RealKeyboardListener {
    hotkey: Hotkey,
    events: UnboundedReceiver<KeyEvent>,
    reader: JoinHandle<()>,
    disconnected: bool,
}

impl RealKeyboardListener {
    pub fn new(device_path: &str, hotkey: Hotkey) -> Result<Self> {
        info!("Инициализация RealKeyboardListener (клавиша отмены: {})", hotkey);

        let device_path = DeviceFinder::find_keyboard_device(device_path, hotkey.key_code)?;

        let device = Device::open(&device_path).map_err(|e| {
            HauntError::DeviceNotFound(format!(
                "Не удалось открыть устройство {:?}: {}",
                device_path, e
            ))
        })?;

        let device_name = device.name().unwrap_or("Unknown").to_string();
        info!("Слушаем клавиатуру: {} ({})", device_name, device_path.display());

        let stream = device.into_event_stream()?;
        let (tx, events) = mpsc::unbounded_channel();
        let reader = tokio::spawn(Self::read_events(stream, device_name, tx));

        Ok(Self::with_channel(hotkey, events, reader))
    }

    fn with_channel(hotkey: Hotkey, events: UnboundedReceiver<KeyEvent>, reader: JoinHandle<()>) -> Self {
        Self {
            hotkey,
            events,
            reader,
            disconnected: false,
        }
    }

    async fn read_events(
        mut stream: evdev::EventStream,
        device_name: String,
        tx: UnboundedSender<KeyEvent>,
    ) {
        let mut modifier_state = ModifierState::new();

        loop {
            let event = match stream.next_event().await {
                Ok(event) => event,
                Err(e) if is_transient(&e) => {
                    debug!("Временная ошибка чтения событий: {}", e);
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                    continue;
                }
                // Устройство отключено (ENODEV) или сломано: закрываем канал
                Err(e) => {
                    error!("Чтение клавиатуры {} прекращено: {}", device_name, e);
                    break;
                }
            };

            if let Some(key_event) = Self::to_key_event(&event, &mut modifier_state, &device_name) {
                if tx.send(key_event).is_err() {
                    debug!("Получатель событий закрыт, чтение клавиатуры остановлено");
                    break;
                }
            }
        }
    }

    fn to_key_event(
        event: &InputEvent,
        modifier_state: &mut ModifierState,
        device_name: &str,
    ) -> Option<KeyEvent> {
        if event.event_type() != EventType::KEY {
            return None;
        }

        let Some(state) = KeyState::from_value(event.value()) else {
            debug!("Неизвестное значение события: {}", event.value());
            return None;
        };

        let key = evdev::KeyCode::new(event.code());
        if state != KeyState::Repeat {
            modifier_state.update_key(key, state == KeyState::Pressed);
        }

        Some(KeyEvent::new(
            KeyCode::from(key),
            state,
            modifier_state.to_modifiers(),
            device_name.to_string(),
        ))
    }
}

/// Ошибки, после которых чтение имеет смысл повторить
fn is_transient(error: &std::io::Error) -> bool {
    matches!(
        error.kind(),
        ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut
    )
}

impl CancelSource for RealKeyboardListener {
    fn poll_cancel(&mut self) -> bool {
        let mut requested = false;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    crate::trace_if_enabled!("Событие клавиши: {}", event);
                    if self.hotkey.is_triggered_by(&event) {
                        info!("Нажата клавиша отмены: {}", event.combination_id());
                        requested = true;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        warn!("Чтение клавиатуры прекратилось, глобальная отмена недоступна");
                        self.disconnected = true;
                    }
                    break;
                }
            }
        }
        requested
    }
}

impl Drop for RealKeyboardListener {
    fn drop(&mut self) {
        debug!("Остановка чтения клавиатуры");
        self.reader.abort();
    }
}
