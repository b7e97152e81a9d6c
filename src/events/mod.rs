pub mod keyboard;

pub use keyboard::{Hotkey, KeyCode, KeyEvent, KeyState, Modifiers};

/// События для виртуальной клавиатуры
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualKeyEvent {
    pub key_code: KeyCode,
    pub state: KeyState,
}

impl VirtualKeyEvent {
    pub fn new(key_code: KeyCode, state: KeyState) -> Self {
        Self { key_code, state }
    }

    pub fn press(key_code: KeyCode) -> Self {
        Self::new(key_code, KeyState::Pressed)
    }

    pub fn release(key_code: KeyCode) -> Self {
        Self::new(key_code, KeyState::Released)
    }

    /// Последовательность событий для аккорда: модификаторы вниз, клавиша, всё вверх в обратном порядке
    pub fn chord(key_code: KeyCode, modifiers: Modifiers) -> Vec<Self> {
        let held = modifiers.key_codes();
        let mut events: Vec<Self> = held.iter().map(|code| Self::press(*code)).collect();
        events.push(Self::press(key_code));
        events.push(Self::release(key_code));
        events.extend(held.iter().rev().map(|code| Self::release(*code)));
        events
    }
}
