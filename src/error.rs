use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlideError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка uinput: {0}")]
    Uinput(#[from] uinput::Error),

    #[error("Ошибка наблюдения за файлом: {0}")]
    Notify(#[from] notify::Error),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Внешняя команда завершилась с ошибкой: {0}")]
    Command(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl GlideError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(GlideError::DeviceNotFound(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, GlideError>;

/// Ошибка включения движка. Движок после неё остаётся выключенным.
#[derive(Error, Debug)]
pub enum EnableError {
    #[error("Нет разрешения на перехват устройств ввода")]
    PermissionDenied,

    #[error("Не удалось создать перехват событий: {0}")]
    TapCreate(#[source] GlideError),
}

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! glide_error {
    (device_not_found, $($arg:tt)*) => {
        $crate::error::GlideError::DeviceNotFound(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::GlideError::Permission(format!($($arg)*))
    };
    (command, $($arg:tt)*) => {
        $crate::error::GlideError::Command(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::GlideError::Internal(format!($($arg)*))
    };
}
