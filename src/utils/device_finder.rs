use crate::error::{HauntError, Result};
use crate::events::KeyCode;
use crate::services::VIRTUAL_KEYBOARD_NAME;
use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct DeviceFinder;

impl DeviceFinder {
    /// Найти клавиатуру, на которой есть клавиша отмены
    pub fn find_keyboard_device(device_path: &str, cancel_key: KeyCode) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство: {:?}", path);
                Ok(path)
            } else {
                HauntError::device_not_found(format!("Указанное устройство не найдено: {:?}", path))
            };
        }

        Self::auto_find_keyboard(cancel_key)
    }

    fn auto_find_keyboard(cancel_key: KeyCode) -> Result<PathBuf> {
        info!("Автопоиск клавиатуры с клавишей {}...", cancel_key);

        let mut candidates = Self::by_id_candidates();
        candidates.extend(Self::event_candidates()?);

        let scored = candidates
            .into_iter()
            .filter_map(|path| {
                let score = Self::keyboard_score(&path, cancel_key)?;
                Some((path, score))
            })
            .collect();

        match Self::pick_best(scored) {
            Some((path, score)) => {
                info!("Выбрана клавиатура {:?} (приоритет: {})", path, score);
                Ok(path)
            }
            None => HauntError::device_not_found(
                "Не удалось найти доступную клавиатуру. \
                 Убедитесь, что пользователь добавлен в группу 'input'",
            ),
        }
    }

    /// Лучший кандидат: выше приоритет, затем by-id ссылки, затем меньший номер eventN
    fn pick_best(mut scored: Vec<(PathBuf, u32)>) -> Option<(PathBuf, u32)> {
        scored.sort_by_key(|(path, score)| {
            let by_id = path.to_string_lossy().contains("by-id");
            (Reverse(*score), !by_id, event_number(path).unwrap_or(u32::MAX))
        });
        scored.into_iter().next()
    }

    /// Приоритет по имени; `None` для мышей и нашей собственной виртуальной клавиатуры
    fn name_score(name: &str, by_id: bool) -> Option<u32> {
        let name = name.to_lowercase();
        if name == VIRTUAL_KEYBOARD_NAME.to_lowercase() {
            return None;
        }
        if ["mouse", "touchpad", "trackpoint"].iter().any(|m| name.contains(m)) {
            return None;
        }

        let score = match (by_id, name.contains("keyboard")) {
            (true, _) => 100,
            (false, true) => 50,
            (false, false) => 10,
        };
        Some(score)
    }

    fn by_id_candidates() -> Vec<PathBuf> {
        let by_id_dir = Path::new("/dev/input/by-id");
        let Ok(entries) = fs::read_dir(by_id_dir) else {
            debug!("Директория {:?} недоступна", by_id_dir);
            return Vec::new();
        };

        entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map(|name| name.ends_with("event-kbd"))
                    .unwrap_or(false)
            })
            .collect()
    }

    fn event_candidates() -> Result<Vec<PathBuf>> {
        let input_dir = Path::new("/dev/input");
        let entries = fs::read_dir(input_dir)
            .map_err(|e| HauntError::Permission(format!("Нет доступа к {:?}: {}", input_dir, e)))?;

        let mut devices: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map(|name| name.starts_with("event"))
                    .unwrap_or(false)
            })
            .collect();

        devices.sort_by_key(|path| event_number(path).unwrap_or(u32::MAX));
        Ok(devices)
    }

    /// `None`, если устройство не открывается или это не клавиатура
    fn keyboard_score(path: &Path, cancel_key: KeyCode) -> Option<u32> {
        let device = match evdev::Device::open(path) {
            Ok(device) => device,
            Err(e) => {
                debug!("Не удалось открыть устройство {:?}: {}", path, e);
                return None;
            }
        };

        let name = device.name().unwrap_or("Unknown");
        let by_id = path.to_string_lossy().contains("by-id");
        let Some(score) = Self::name_score(name, by_id) else {
            debug!("Исключаем устройство {:?} ({})", path, name);
            return None;
        };

        let keys = device.supported_keys()?;
        let cancel = evdev::KeyCode::new(cancel_key.value());
        let has_basics = keys.contains(evdev::KeyCode::KEY_A)
            && keys.contains(evdev::KeyCode::KEY_ENTER)
            && keys.contains(cancel);
        if !has_basics || keys.iter().count() <= 20 {
            debug!("Устройство {:?} не подходит как клавиатура ({})", path, name);
            return None;
        }

        Some(score)
    }
}

/// Номер N из /dev/input/eventN
fn event_number(path: &Path) -> Option<u32> {
    path.file_name()?.to_str()?.strip_prefix("event")?.parse().ok()
}
