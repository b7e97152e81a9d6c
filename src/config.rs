use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::events::Hotkey;
use crate::timeline::{SceneSpec, TimelineSpec};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub input: InputConfig,
    pub assets: AssetsConfig,
    pub audio: AudioConfig,
    pub editor: EditorConfig,
    pub overlay: OverlayConfig,
    pub timeline: TimelineConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    /// Путь к evdev устройству или "auto"
    pub device_path: String,
    pub cancel_key: String,
    pub cancel_modifiers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub root: PathBuf,
    pub sounds_dir: String,
    pub images_dir: String,
    pub jumpscare_image: String,
    pub typing_text: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Внешний проигрыватель: файл передаётся последним аргументом
    pub player: String,
    pub args: Vec<String>,
    /// Дополнительные аргументы для зацикленной фоновой музыки
    pub loop_args: Vec<String>,
    /// Максимум одновременно звучащих коротких эффектов
    pub max_voices: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EditorConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Закрыть уже открытые окна редактора перед запуском
    pub kill_existing: bool,
    /// Команда подготовки (например, увеличение шрифта), выполняется до запуска
    pub setup_command: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub title: String,
    /// Квант ожидания: как часто проверяется отмена
    pub poll_interval_ms: u64,
    /// Размер «экрана» в режиме сухого запуска
    pub dry_run_width: u32,
    pub dry_run_height: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub preset: String,
    pub background_music: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Пользовательский сценарий; если не пуст, заменяет пресет
    pub scenes: Vec<SceneSpec>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            device_path: "auto".to_string(),
            cancel_key: "escape".to_string(),
            cancel_modifiers: Vec::new(),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            sounds_dir: "sounds".to_string(),
            images_dir: "ghost_images".to_string(),
            jumpscare_image: "jumpscare.jpg".to_string(),
            typing_text: "random.txt".to_string(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            player: "ffplay".to_string(),
            args: vec![
                "-nodisp".to_string(),
                "-autoexit".to_string(),
                "-loglevel".to_string(),
                "quiet".to_string(),
            ],
            loop_args: vec!["-loop".to_string(), "0".to_string()],
            max_voices: 8,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            program: "gedit".to_string(),
            args: Vec::new(),
            kill_existing: true,
            setup_command: Vec::new(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            title: "Haunted Window".to_string(),
            poll_interval_ms: 100,
            dry_run_width: 1920,
            dry_run_height: 1080,
        }
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            preset: "classic".to_string(),
            background_music: true,
            seed: None,
            scenes: Vec::new(),
        }
    }
}

impl AssetsConfig {
    pub fn sounds_path(&self) -> PathBuf {
        self.root.join(&self.sounds_dir)
    }

    pub fn images_path(&self) -> PathBuf {
        self.root.join(&self.images_dir)
    }

    pub fn jumpscare_path(&self) -> PathBuf {
        self.images_path().join(&self.jumpscare_image)
    }

    pub fn typing_text_path(&self) -> PathBuf {
        self.root.join(&self.typing_text)
    }
}

impl Config {
    /// Загрузка: значения по умолчанию ← TOML файл (если есть) ← переменные HAUNT_*
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("HAUNT_").split("__"));

        Self::extract(figment)
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Отмена должна проверяться не реже раза в 100мс
        if self.overlay.poll_interval_ms == 0 || self.overlay.poll_interval_ms > 100 {
            anyhow::bail!(
                "poll_interval_ms должно быть в диапазоне 1..=100, получено {}",
                self.overlay.poll_interval_ms
            );
        }

        self.cancel_hotkey()?;

        if self.audio.player.trim().is_empty() {
            anyhow::bail!("audio.player не может быть пустым");
        }
        if self.audio.max_voices == 0 {
            anyhow::bail!("audio.max_voices должно быть больше 0");
        }
        if self.editor.program.trim().is_empty() {
            anyhow::bail!("editor.program не может быть пустым");
        }

        if self.timeline.scenes.is_empty() {
            if TimelineSpec::preset(&self.timeline.preset).is_none() {
                anyhow::bail!(
                    "Неизвестный пресет сценария '{}', доступны: {}",
                    self.timeline.preset,
                    TimelineSpec::preset_names().join(", ")
                );
            }
        } else {
            for (i, scene) in self.timeline.scenes.iter().enumerate() {
                scene
                    .validate()
                    .map_err(|e| anyhow::anyhow!("Сцена #{} ({}): {}", i + 1, scene.name(), e))?;
            }
        }

        Ok(())
    }

    pub fn cancel_hotkey(&self) -> Result<Hotkey> {
        Hotkey::parse(&self.input.cancel_key, &self.input.cancel_modifiers)
            .map_err(|e| anyhow::anyhow!("Неверная клавиша отмены: {}", e))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.overlay.poll_interval_ms)
    }

    /// Сценарий для запуска: пользовательский список сцен или пресет
    pub fn timeline_spec(&self, preset_override: Option<&str>) -> Result<TimelineSpec> {
        if let Some(name) = preset_override {
            return TimelineSpec::preset(name)
                .ok_or_else(|| anyhow::anyhow!("Неизвестный пресет сценария '{}'", name));
        }

        if !self.timeline.scenes.is_empty() {
            return Ok(TimelineSpec::new("custom", self.timeline.scenes.clone()));
        }

        TimelineSpec::preset(&self.timeline.preset)
            .ok_or_else(|| anyhow::anyhow!("Неизвестный пресет сценария '{}'", self.timeline.preset))
    }
}
