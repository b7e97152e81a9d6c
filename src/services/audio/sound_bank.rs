use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::r#trait::Cue;

/// Найденные звуковые файлы; отсутствующий файл означает тишину для эффекта
#[derive(Debug, Clone, Default)]
pub struct SoundBank {
    files: HashMap<Cue, PathBuf>,
}

impl SoundBank {
    pub fn discover(sounds_dir: &Path) -> Self {
        let mut bank = Self::default();

        if !sounds_dir.is_dir() {
            warn!("Папка со звуками не найдена: {:?}", sounds_dir);
            warn!("Добавьте {} в эту папку", Self::expected_files());
            return bank;
        }

        for cue in Cue::ALL {
            let path = sounds_dir.join(cue.file_name());
            if path.is_file() {
                info!("Загружен {}", cue.file_name());
                bank.files.insert(cue, path);
            } else {
                debug!("Звук {} отсутствует, эффект будет беззвучным", cue.file_name());
            }
        }

        bank
    }

    pub fn with_file(mut self, cue: Cue, path: impl Into<PathBuf>) -> Self {
        self.files.insert(cue, path.into());
        self
    }

    pub fn path(&self, cue: Cue) -> Option<&Path> {
        self.files.get(&cue).map(PathBuf::as_path)
    }

    pub fn contains(&self, cue: Cue) -> bool {
        self.files.contains_key(&cue)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    fn expected_files() -> String {
        Cue::ALL
            .iter()
            .map(|cue| cue.file_name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discover_missing_dir_is_empty() {
        let bank = SoundBank::discover(Path::new("/non/existent/sounds"));
        assert_eq!(bank.len(), 0);
        assert!(!bank.contains(Cue::Background));
    }

    #[test]
    fn test_discover_partial_set() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ghost.mp3"), b"id3").unwrap();
        fs::write(dir.path().join("keyboard.mp3"), b"id3").unwrap();
        fs::create_dir(dir.path().join("jumpscare.mp3")).unwrap();

        let bank = SoundBank::discover(dir.path());

        assert!(bank.contains(Cue::Ghost));
        assert!(bank.contains(Cue::Keyboard));
        assert!(!bank.contains(Cue::Jumpscare));
        assert!(!bank.contains(Cue::Background));
        assert_eq!(bank.path(Cue::Ghost), Some(dir.path().join("ghost.mp3").as_path()));
    }
}
