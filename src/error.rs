use thiserror::Error;

#[derive(Error, Debug)]
pub enum HauntError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка uinput: {0}")]
    Uinput(#[from] uinput::Error),

    #[error("Ошибка изображения: {0}")]
    Image(#[from] image::ImageError),

    #[error("Ошибка оверлея: {0}")]
    Display(String),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl HauntError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(HauntError::DeviceNotFound(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, HauntError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! haunt_error {
    (display, $($arg:tt)*) => {
        $crate::error::HauntError::Display(format!($($arg)*))
    };
    (device_not_found, $($arg:tt)*) => {
        $crate::error::HauntError::DeviceNotFound(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::HauntError::Permission(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::HauntError::Internal(format!($($arg)*))
    };
}
