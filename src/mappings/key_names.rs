use evdev::KeyCode as Ev;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Имена клавиш, допустимые для горячей клавиши отмены
static KEY_NAME_TO_CODE: Lazy<HashMap<&'static str, u16>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // Буквенные клавиши
    for (name, key) in [
        ("a", Ev::KEY_A), ("b", Ev::KEY_B), ("c", Ev::KEY_C), ("d", Ev::KEY_D),
        ("e", Ev::KEY_E), ("f", Ev::KEY_F), ("g", Ev::KEY_G), ("h", Ev::KEY_H),
        ("i", Ev::KEY_I), ("j", Ev::KEY_J), ("k", Ev::KEY_K), ("l", Ev::KEY_L),
        ("m", Ev::KEY_M), ("n", Ev::KEY_N), ("o", Ev::KEY_O), ("p", Ev::KEY_P),
        ("q", Ev::KEY_Q), ("r", Ev::KEY_R), ("s", Ev::KEY_S), ("t", Ev::KEY_T),
        ("u", Ev::KEY_U), ("v", Ev::KEY_V), ("w", Ev::KEY_W), ("x", Ev::KEY_X),
        ("y", Ev::KEY_Y), ("z", Ev::KEY_Z),
    ] {
        map.insert(name, key.code());
    }

    // Функциональные клавиши
    for (name, key) in [
        ("f1", Ev::KEY_F1), ("f2", Ev::KEY_F2), ("f3", Ev::KEY_F3), ("f4", Ev::KEY_F4),
        ("f5", Ev::KEY_F5), ("f6", Ev::KEY_F6), ("f7", Ev::KEY_F7), ("f8", Ev::KEY_F8),
        ("f9", Ev::KEY_F9), ("f10", Ev::KEY_F10), ("f11", Ev::KEY_F11), ("f12", Ev::KEY_F12),
    ] {
        map.insert(name, key.code());
    }

    // Специальные клавиши
    map.insert("escape", Ev::KEY_ESC.code());
    map.insert("space", Ev::KEY_SPACE.code());
    map.insert("enter", Ev::KEY_ENTER.code());
    map.insert("backspace", Ev::KEY_BACKSPACE.code());
    map.insert("tab", Ev::KEY_TAB.code());
    map.insert("pause", Ev::KEY_PAUSE.code());
    map.insert("scrolllock", Ev::KEY_SCROLLLOCK.code());
    map.insert("printscreen", Ev::KEY_SYSRQ.code());
    map.insert("insert", Ev::KEY_INSERT.code());
    map.insert("delete", Ev::KEY_DELETE.code());
    map.insert("home", Ev::KEY_HOME.code());
    map.insert("end", Ev::KEY_END.code());

    map
});

static ALIASES: &[(&str, &str)] = &[("esc", "escape"), ("return", "enter"), ("del", "delete")];

static CODE_TO_KEY_NAME: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
    KEY_NAME_TO_CODE.iter().map(|(name, code)| (*code, *name)).collect()
});

/// Трансляция имён клавиш из конфигурации в evdev коды и обратно
pub struct KeyNames;

impl KeyNames {
    pub fn translate(key_name: &str) -> Result<u16, String> {
        let normalized = key_name.trim().to_lowercase();
        let canonical = ALIASES
            .iter()
            .find(|(alias, _)| *alias == normalized)
            .map(|(_, name)| *name)
            .unwrap_or(normalized.as_str());

        KEY_NAME_TO_CODE
            .get(canonical)
            .copied()
            .ok_or_else(|| format!("Неизвестная клавиша: '{}'", key_name))
    }

    pub fn name_of(code: u16) -> Option<&'static str> {
        CODE_TO_KEY_NAME.get(&code).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_known_keys() {
        assert_eq!(KeyNames::translate("escape").unwrap(), 1);
        assert_eq!(KeyNames::translate("Esc").unwrap(), 1);
        assert_eq!(KeyNames::translate("F12").unwrap(), 88);
        assert_eq!(KeyNames::translate("pause").unwrap(), 119);
    }

    #[test]
    fn test_translate_unknown_key() {
        assert!(KeyNames::translate("hyperdrive").is_err());
    }

    #[test]
    fn test_reverse_lookup() {
        assert_eq!(KeyNames::name_of(1), Some("escape"));
        assert_eq!(KeyNames::name_of(30), Some("a"));
        assert_eq!(KeyNames::name_of(9999), None);
    }
}
