//! Загрузка необязательных ассетов: картинки призраков, скример и текст.
//!
//! Ни один файл не обязателен. Отсутствие чего-либо логируется, а сцены
//! используют встроенную замену.

use image::imageops::FilterType;
use image::{ImageFormat, ImageReader, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::AssetsConfig;
use crate::error::Result;
use crate::render::placeholder_ghost;

/// Максимальная сторона картинки призрака после уменьшения
const GHOST_MAX_SIDE: u32 = 256;
const PLACEHOLDER_SIDE: u32 = 192;

#[derive(Debug, Clone)]
pub struct Assets {
    /// Текст для «печати»; `None` означает встроенный текст сцены
    pub typing_text: Option<String>,
    /// Скример, уже растянутый на весь экран
    pub jumpscare: Option<RgbaImage>,
    /// Никогда не пуст: без картинок здесь лежит процедурный призрак
    pub ghosts: Vec<RgbaImage>,
}

impl Assets {
    /// Ассеты без единого файла
    pub fn fallback() -> Self {
        Self {
            typing_text: None,
            jumpscare: None,
            ghosts: vec![placeholder_ghost(PLACEHOLDER_SIDE)],
        }
    }

    pub fn load(config: &AssetsConfig, screen: (u32, u32)) -> Self {
        info!("Загрузка ассетов из {:?}", config.root);

        let jumpscare_path = config.jumpscare_path();
        let jumpscare = load_jumpscare(&jumpscare_path, screen);

        let mut ghosts = load_ghosts(&config.images_path(), &jumpscare_path);
        if ghosts.is_empty() {
            info!("Картинки призраков не найдены, используем процедурного призрака");
            ghosts.push(placeholder_ghost(PLACEHOLDER_SIDE));
        }

        Self {
            typing_text: load_text(&config.typing_text_path()),
            jumpscare,
            ghosts,
        }
    }
}

fn load_text(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) if text.trim().is_empty() => {
            warn!("Файл {:?} пуст, будет напечатан встроенный текст", path);
            None
        }
        Ok(text) => {
            info!("Загружен текст для печати: {} символов", text.chars().count());
            Some(text)
        }
        Err(e) => {
            warn!("{:?} не прочитан ({}), будет напечатан встроенный текст", path, e);
            None
        }
    }
}

fn load_jumpscare(path: &Path, (width, height): (u32, u32)) -> Option<RgbaImage> {
    if !path.is_file() {
        warn!("Скример {:?} не найден, будет красный экран", path);
        return None;
    }

    match open_rgba(path) {
        Ok(image) => {
            info!("Загружен скример {:?}", path);
            Some(image::imageops::resize(&image, width.max(1), height.max(1), FilterType::Lanczos3))
        }
        Err(e) => {
            warn!("Не удалось загрузить скример {:?}: {}", path, e);
            None
        }
    }
}

fn load_ghosts(dir: &Path, jumpscare: &Path) -> Vec<RgbaImage> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Папка с призраками {:?} недоступна: {}", dir, e);
            return Vec::new();
        }
    };

    // Порядок read_dir не определён, сортируем для воспроизводимости
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path != jumpscare)
        .filter(|path| ImageFormat::from_path(path).is_ok())
        .collect();
    paths.sort();

    let mut ghosts = Vec::with_capacity(paths.len());
    for path in paths {
        match open_rgba(&path) {
            Ok(image) => {
                debug!("Загружен призрак {:?}", path);
                ghosts.push(shrink(image, GHOST_MAX_SIDE));
            }
            Err(e) => warn!("Пропускаем {:?}: {}", path, e),
        }
    }

    info!("Загружено картинок призраков: {}", ghosts.len());
    ghosts
}

/// Формат определяется по содержимому, расширение только подсказка
fn open_rgba(path: &Path) -> Result<RgbaImage> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(image.to_rgba8())
}

/// Уменьшить с сохранением пропорций, если сторона больше `max_side`
fn shrink(image: RgbaImage, max_side: u32) -> RgbaImage {
    let (w, h) = image.dimensions();
    let longest = w.max(h);
    if longest <= max_side {
        return image;
    }

    let scale = max_side as f32 / longest as f32;
    let new_w = ((w as f32 * scale).round() as u32).max(1);
    let new_h = ((h as f32 * scale).round() as u32).max(1);
    image::imageops::resize(&image, new_w, new_h, FilterType::Lanczos3)
}
