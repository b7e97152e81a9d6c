use crate::events::KeyCode;
use evdev::KeyCode as Ev;

/// Клавиша US-раскладки, которая печатает символ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub key_code: KeyCode,
    pub shift: bool,
}

impl KeyStroke {
    fn plain(key: Ev) -> Self {
        Self { key_code: key.into(), shift: false }
    }

    fn shifted(key: Ev) -> Self {
        Self { key_code: key.into(), shift: true }
    }
}

/// Преобразование символов текста в нажатия виртуальной клавиатуры
pub struct CharToKey;

impl CharToKey {
    /// `None` для символов, которых нет на US-раскладке (кириллица, эмодзи, `\r`)
    pub fn lookup(ch: char) -> Option<KeyStroke> {
        if ch.is_ascii_lowercase() {
            return Self::letter(ch).map(KeyStroke::plain);
        }
        if ch.is_ascii_uppercase() {
            return Self::letter(ch.to_ascii_lowercase()).map(KeyStroke::shifted);
        }

        let stroke = match ch {
            '1' => KeyStroke::plain(Ev::KEY_1),
            '2' => KeyStroke::plain(Ev::KEY_2),
            '3' => KeyStroke::plain(Ev::KEY_3),
            '4' => KeyStroke::plain(Ev::KEY_4),
            '5' => KeyStroke::plain(Ev::KEY_5),
            '6' => KeyStroke::plain(Ev::KEY_6),
            '7' => KeyStroke::plain(Ev::KEY_7),
            '8' => KeyStroke::plain(Ev::KEY_8),
            '9' => KeyStroke::plain(Ev::KEY_9),
            '0' => KeyStroke::plain(Ev::KEY_0),
            '!' => KeyStroke::shifted(Ev::KEY_1),
            '@' => KeyStroke::shifted(Ev::KEY_2),
            '#' => KeyStroke::shifted(Ev::KEY_3),
            '$' => KeyStroke::shifted(Ev::KEY_4),
            '%' => KeyStroke::shifted(Ev::KEY_5),
            '^' => KeyStroke::shifted(Ev::KEY_6),
            '&' => KeyStroke::shifted(Ev::KEY_7),
            '*' => KeyStroke::shifted(Ev::KEY_8),
            '(' => KeyStroke::shifted(Ev::KEY_9),
            ')' => KeyStroke::shifted(Ev::KEY_0),

            ' ' => KeyStroke::plain(Ev::KEY_SPACE),
            '\n' => KeyStroke::plain(Ev::KEY_ENTER),
            '\t' => KeyStroke::plain(Ev::KEY_TAB),

            '-' => KeyStroke::plain(Ev::KEY_MINUS),
            '_' => KeyStroke::shifted(Ev::KEY_MINUS),
            '=' => KeyStroke::plain(Ev::KEY_EQUAL),
            '+' => KeyStroke::shifted(Ev::KEY_EQUAL),
            '[' => KeyStroke::plain(Ev::KEY_LEFTBRACE),
            '{' => KeyStroke::shifted(Ev::KEY_LEFTBRACE),
            ']' => KeyStroke::plain(Ev::KEY_RIGHTBRACE),
            '}' => KeyStroke::shifted(Ev::KEY_RIGHTBRACE),
            '\\' => KeyStroke::plain(Ev::KEY_BACKSLASH),
            '|' => KeyStroke::shifted(Ev::KEY_BACKSLASH),
            ';' => KeyStroke::plain(Ev::KEY_SEMICOLON),
            ':' => KeyStroke::shifted(Ev::KEY_SEMICOLON),
            '\'' => KeyStroke::plain(Ev::KEY_APOSTROPHE),
            '"' => KeyStroke::shifted(Ev::KEY_APOSTROPHE),
            ',' => KeyStroke::plain(Ev::KEY_COMMA),
            '<' => KeyStroke::shifted(Ev::KEY_COMMA),
            '.' => KeyStroke::plain(Ev::KEY_DOT),
            '>' => KeyStroke::shifted(Ev::KEY_DOT),
            '/' => KeyStroke::plain(Ev::KEY_SLASH),
            '?' => KeyStroke::shifted(Ev::KEY_SLASH),
            '`' => KeyStroke::plain(Ev::KEY_GRAVE),
            '~' => KeyStroke::shifted(Ev::KEY_GRAVE),
            _ => return None,
        };

        Some(stroke)
    }

    fn letter(ch: char) -> Option<Ev> {
        let key = match ch {
            'a' => Ev::KEY_A, 'b' => Ev::KEY_B, 'c' => Ev::KEY_C, 'd' => Ev::KEY_D,
            'e' => Ev::KEY_E, 'f' => Ev::KEY_F, 'g' => Ev::KEY_G, 'h' => Ev::KEY_H,
            'i' => Ev::KEY_I, 'j' => Ev::KEY_J, 'k' => Ev::KEY_K, 'l' => Ev::KEY_L,
            'm' => Ev::KEY_M, 'n' => Ev::KEY_N, 'o' => Ev::KEY_O, 'p' => Ev::KEY_P,
            'q' => Ev::KEY_Q, 'r' => Ev::KEY_R, 's' => Ev::KEY_S, 't' => Ev::KEY_T,
            'u' => Ev::KEY_U, 'v' => Ev::KEY_V, 'w' => Ev::KEY_W, 'x' => Ev::KEY_X,
            'y' => Ev::KEY_Y, 'z' => Ev::KEY_Z,
            _ => return None,
        };
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_and_case() {
        let lower = CharToKey::lookup('d').unwrap();
        let upper = CharToKey::lookup('D').unwrap();

        assert_eq!(lower.key_code, KeyCode::new(32));
        assert!(!lower.shift);
        assert_eq!(upper.key_code, lower.key_code);
        assert!(upper.shift);
    }

    #[test]
    fn test_message_is_fully_typeable() {
        for ch in "DO NOT LOOK BACK".chars() {
            assert!(CharToKey::lookup(ch).is_some(), "нет клавиши для {:?}", ch);
        }
    }

    #[test]
    fn test_punctuation_and_whitespace() {
        assert_eq!(CharToKey::lookup('\n').unwrap().key_code, KeyCode::new(28));
        assert_eq!(CharToKey::lookup('?').unwrap(), KeyStroke { key_code: KeyCode::new(53), shift: true });
        assert!(!CharToKey::lookup(' ').unwrap().shift);
    }

    #[test]
    fn test_unmapped_characters() {
        assert!(CharToKey::lookup('\r').is_none());
        assert!(CharToKey::lookup('ж').is_none());
        assert!(CharToKey::lookup('👻').is_none());
    }
}
