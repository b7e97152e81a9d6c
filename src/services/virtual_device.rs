use crate::error::{HauntError, Result};
use crate::events::{KeyCode, Modifiers, VirtualKeyEvent};
use crate::mappings::CharToKey;
use tracing::{debug, info};

/// Имя нашего uinput-устройства; автопоиск клавиатуры его пропускает
pub const VIRTUAL_KEYBOARD_NAME: &str = "Haunted Window Keyboard";

/// Синтетический ввод во внешнее окно (редактор)
pub trait Keystrokes {
    /// Напечатать символ; символы без клавиши на раскладке пропускаются
    fn type_char(&mut self, ch: char) -> Result<()>;

    /// Нажать клавишу с модификаторами и отпустить всё
    fn chord(&mut self, key: KeyCode, modifiers: Modifiers) -> Result<()>;
}

/// Виртуальная клавиатура uinput
pub struct VirtualDevice {
    device: Option<uinput::Device>,
    device_name: String,
    dry_run: bool,
}

impl VirtualDevice {
    pub fn new(device_name: &str, dry_run: bool) -> Result<Self> {
        info!("Инициализация VirtualDevice '{}' (dry_run: {})", device_name, dry_run);

        let device = if dry_run {
            None
        } else {
            Some(Self::create_virtual_device(device_name)?)
        };

        Ok(Self {
            device,
            device_name: device_name.to_string(),
            dry_run,
        })
    }

    fn create_virtual_device(device_name: &str) -> Result<uinput::Device> {
        info!("Создание виртуального устройства uinput '{}' для инъекции клавиш", device_name);

        let virtual_device = uinput::default()?
            .name(device_name)?
            .event(uinput::event::Keyboard::All)?
            .create()
            .map_err(|e| {
                HauntError::Internal(format!(
                    "Не удалось создать виртуальное устройство '{}': {}",
                    device_name, e
                ))
            })?;

        info!("Виртуальное устройство '{}' создано успешно", device_name);
        Ok(virtual_device)
    }

    pub fn send_event(&mut self, event: VirtualKeyEvent) -> Result<()> {
        if self.dry_run {
            crate::debug_if_enabled!("[DRY RUN] Виртуальное событие: {} {:?}", event.key_code, event.state);
            return Ok(());
        }

        let Some(device) = &mut self.device else {
            return Err(HauntError::Internal("Виртуальное устройство недоступно".to_string()));
        };

        let keycode = event.key_code.value() as i32;

        // EV_KEY
        device.write(1, keycode, event.state.value()).map_err(|e| {
            HauntError::Internal(format!("Не удалось отправить событие клавиши {}: {}", event.key_code, e))
        })?;

        // EV_SYN / SYN_REPORT
        device.write(0, 0, 0).map_err(|e| {
            HauntError::Internal(format!("Не удалось синхронизировать события: {}", e))
        })?;

        Ok(())
    }

    fn send_all(&mut self, events: Vec<VirtualKeyEvent>) -> Result<()> {
        for event in events {
            self.send_event(event)?;
        }
        Ok(())
    }
}

impl Keystrokes for VirtualDevice {
    fn type_char(&mut self, ch: char) -> Result<()> {
        let Some(stroke) = CharToKey::lookup(ch) else {
            debug!("Символ {:?} отсутствует на раскладке, пропускаем", ch);
            return Ok(());
        };

        if self.dry_run {
            info!("[DRY RUN] Печать {:?}", ch);
        }

        let modifiers = Modifiers::new().with_shift(stroke.shift);
        self.send_all(VirtualKeyEvent::chord(stroke.key_code, modifiers))
    }

    fn chord(&mut self, key: KeyCode, modifiers: Modifiers) -> Result<()> {
        if self.dry_run {
            info!("[DRY RUN] Аккорд {}+{}", modifiers, key);
        }
        self.send_all(VirtualKeyEvent::chord(key, modifiers))
    }
}

impl Drop for VirtualDevice {
    fn drop(&mut self) {
        if !self.dry_run {
            info!("Закрытие виртуального устройства '{}'", self.device_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_accepts_everything() {
        let mut device = VirtualDevice::new("test", true).unwrap();

        assert!(device.type_char('A').is_ok());
        assert!(device.type_char('ж').is_ok());
        assert!(device.chord(KeyCode::new(48), Modifiers::new().with_ctrl(true)).is_ok());
    }

    #[test]
    fn test_missing_device_is_an_error() {
        let mut device = VirtualDevice {
            device: None,
            device_name: "broken".to_string(),
            dry_run: false,
        };

        let result = device.send_event(VirtualKeyEvent::press(KeyCode::new(30)));
        assert!(matches!(result, Err(HauntError::Internal(_))));
        // Неизвестный символ не доходит до устройства
        assert!(device.type_char('ж').is_ok());
    }
}
