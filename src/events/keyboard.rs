use serde::{Deserialize, Serialize};
use std::fmt;

use crate::mappings::KeyNames;

/// Состояние клавиши
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyState {
    Pressed,
    Released,
    Repeat,
}

impl KeyState {
    /// Значение поля `value` evdev/uinput события
    pub fn value(&self) -> i32 {
        match self {
            KeyState::Released => 0,
            KeyState::Pressed => 1,
            KeyState::Repeat => 2,
        }
    }

    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(KeyState::Released),
            1 => Some(KeyState::Pressed),
            2 => Some(KeyState::Repeat),
            _ => None,
        }
    }
}

/// Код клавиши (evdev коды)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl From<evdev::KeyCode> for KeyCode {
    fn from(key: evdev::KeyCode) -> Self {
        Self(key.code())
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match KeyNames::name_of(self.0) {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "KEY_{}", self.0),
        }
    }
}

/// Модификаторы клавиш
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub super_key: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ctrl(mut self, ctrl: bool) -> Self {
        self.ctrl = ctrl;
        self
    }

    pub fn with_alt(mut self, alt: bool) -> Self {
        self.alt = alt;
        self
    }

    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift && !self.super_key
    }

    /// Все модификаторы `required` зажаты в `self`
    pub fn contains(&self, required: &Modifiers) -> bool {
        (!required.ctrl || self.ctrl)
            && (!required.alt || self.alt)
            && (!required.shift || self.shift)
            && (!required.super_key || self.super_key)
    }

    /// Коды клавиш-модификаторов в порядке нажатия
    pub fn key_codes(&self) -> Vec<KeyCode> {
        let mut codes = Vec::new();
        if self.ctrl { codes.push(evdev::KeyCode::KEY_LEFTCTRL.into()); }
        if self.alt { codes.push(evdev::KeyCode::KEY_LEFTALT.into()); }
        if self.shift { codes.push(evdev::KeyCode::KEY_LEFTSHIFT.into()); }
        if self.super_key { codes.push(evdev::KeyCode::KEY_LEFTMETA.into()); }
        codes
    }

    pub fn to_vec(&self) -> Vec<String> {
        let mut result = Vec::new();
        if self.ctrl { result.push("ctrl".to_string()); }
        if self.alt { result.push("alt".to_string()); }
        if self.shift { result.push("shift".to_string()); }
        if self.super_key { result.push("super".to_string()); }
        result
    }

    pub fn from_vec(modifiers: &[String]) -> Result<Self, String> {
        let mut result = Self::new();
        for modifier in modifiers {
            match modifier.to_lowercase().as_str() {
                "ctrl" => result.ctrl = true,
                "alt" => result.alt = true,
                "shift" => result.shift = true,
                "super" => result.super_key = true,
                other => return Err(format!("Неизвестный модификатор '{}'", other)),
            }
        }
        Ok(result)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = self.to_vec();
        if modifiers.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", modifiers.join("+"))
        }
    }
}

/// Событие клавиатуры, прочитанное с физического устройства
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key_code: KeyCode,
    pub state: KeyState,
    pub modifiers: Modifiers,
    pub timestamp: std::time::Instant,
    pub device_name: String,
}

impl KeyEvent {
    pub fn new(
        key_code: KeyCode,
        state: KeyState,
        modifiers: Modifiers,
        device_name: String,
    ) -> Self {
        Self {
            key_code,
            state,
            modifiers,
            timestamp: std::time::Instant::now(),
            device_name,
        }
    }

    /// Получить уникальный идентификатор комбинации клавиш
    pub fn combination_id(&self) -> String {
        if self.modifiers.is_empty() {
            format!("{}", self.key_code)
        } else {
            format!("{}+{}", self.modifiers, self.key_code)
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {:?} ({})",
            self.combination_id(),
            self.device_name,
            self.state,
            self.timestamp.elapsed().as_millis()
        )
    }
}

/// Горячая клавиша отмены: клавиша + обязательные модификаторы
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey {
    pub key_code: KeyCode,
    pub modifiers: Modifiers,
}

impl Hotkey {
    pub fn parse(key_name: &str, modifiers: &[String]) -> Result<Self, String> {
        let code = KeyNames::translate(key_name)?;
        Ok(Self {
            key_code: KeyCode(code),
            modifiers: Modifiers::from_vec(modifiers)?,
        })
    }

    /// Срабатывает только на нажатие; автоповтор и отпускание игнорируются
    pub fn is_triggered_by(&self, event: &KeyEvent) -> bool {
        event.state == KeyState::Pressed
            && event.key_code == self.key_code
            && event.modifiers.contains(&self.modifiers)
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key_code)
        } else {
            write!(f, "{}+{}", self.modifiers, self.key_code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(code: u16, state: KeyState, modifiers: Modifiers) -> KeyEvent {
        KeyEvent::new(KeyCode::new(code), state, modifiers, "test".to_string())
    }

    #[test]
    fn test_modifiers_creation() {
        let modifiers = Modifiers::new()
            .with_ctrl(true)
            .with_shift(true);

        assert!(modifiers.ctrl);
        assert!(modifiers.shift);
        assert!(!modifiers.alt);
        assert!(!modifiers.super_key);
        assert!(!modifiers.is_empty());
    }

    #[test]
    fn test_modifiers_from_vec_rejects_unknown() {
        let parsed = Modifiers::from_vec(&["ctrl".to_string(), "ALT".to_string()]).unwrap();
        assert_eq!(parsed, Modifiers::new().with_ctrl(true).with_alt(true));
        assert!(Modifiers::from_vec(&["hyper".to_string()]).is_err());
    }

    #[test]
    fn test_key_event_combination_id() {
        let plain = event(1, KeyState::Pressed, Modifiers::new());
        let combo = event(16, KeyState::Pressed, Modifiers::new().with_ctrl(true));

        assert_eq!(plain.combination_id(), "escape");
        assert_eq!(combo.combination_id(), "ctrl+q");
    }

    #[test]
    fn test_hotkey_matches_press_only() {
        let hotkey = Hotkey::parse("escape", &[]).unwrap();

        assert!(hotkey.is_triggered_by(&event(1, KeyState::Pressed, Modifiers::new())));
        assert!(!hotkey.is_triggered_by(&event(1, KeyState::Released, Modifiers::new())));
        assert!(!hotkey.is_triggered_by(&event(1, KeyState::Repeat, Modifiers::new())));
        assert!(!hotkey.is_triggered_by(&event(30, KeyState::Pressed, Modifiers::new())));
    }

    #[test]
    fn test_hotkey_requires_modifiers() {
        let hotkey = Hotkey::parse("q", &["ctrl".to_string(), "shift".to_string()]).unwrap();
        let held = Modifiers::new().with_ctrl(true).with_shift(true).with_alt(true);

        assert!(hotkey.is_triggered_by(&event(16, KeyState::Pressed, held)));
        assert!(!hotkey.is_triggered_by(&event(16, KeyState::Pressed, Modifiers::new().with_ctrl(true))));
        assert_eq!(hotkey.to_string(), "ctrl+shift+q");
    }

    #[test]
    fn test_modifier_key_codes_order() {
        let codes = Modifiers::new().with_shift(true).with_ctrl(true).key_codes();
        assert_eq!(codes, vec![KeyCode::new(29), KeyCode::new(42)]);
    }
}
