use crate::error::{GlideError, Result};
use crate::glide_error;
use evdev::{KeyCode, RelativeAxisCode};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Какое устройство ищем
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeviceKind {
    Keyboard,
    Pointer,
}

impl DeviceKind {
    fn label(self) -> &'static str {
        match self {
            DeviceKind::Keyboard => "клавиатурное",
            DeviceKind::Pointer => "указывающее",
        }
    }

    /// Суффикс симлинка в /dev/input/by-id
    fn by_id_suffix(self) -> &'static str {
        match self {
            DeviceKind::Keyboard => "event-kbd",
            DeviceKind::Pointer => "event-mouse",
        }
    }

    /// Приоритет по имени симлинка, 0 означает что устройство не подходит
    fn by_id_priority(self, name: &str) -> u32 {
        if !name.contains("event") {
            return 0;
        }
        let lower = name.to_lowercase();
        match self {
            DeviceKind::Keyboard => {
                if lower.contains("mouse") {
                    0
                } else if name.ends_with(self.by_id_suffix()) {
                    100
                } else if lower.contains("keyboard") || lower.contains("kbd") {
                    50
                } else {
                    0
                }
            }
            DeviceKind::Pointer => {
                if name.ends_with(self.by_id_suffix()) {
                    100
                } else if lower.contains("mouse") || lower.contains("touchpad") {
                    50
                } else {
                    0
                }
            }
        }
    }
}

pub struct DeviceFinder;

impl DeviceFinder {
    /// Найти подходящее клавиатурное устройство
    pub fn find_keyboard_device(device_path: &str) -> Result<PathBuf> {
        Self::find_device(device_path, DeviceKind::Keyboard)
    }

    /// Найти мышь или тачпад, от которых приходит движение указателя
    pub fn find_pointer_device(device_path: &str) -> Result<PathBuf> {
        Self::find_device(device_path, DeviceKind::Pointer)
    }

    fn find_device(device_path: &str, kind: DeviceKind) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство: {:?}", path);
                Ok(path)
            } else {
                GlideError::device_not_found(format!("Указанное устройство не найдено: {:?}", path))
            };
        }

        info!("Начинаем автопоиск: {} устройство", kind.label());

        if let Ok(device) = Self::find_by_id(kind) {
            info!("Найдено устройство по ID: {:?}", device);
            return Ok(device);
        }

        if let Ok(device) = Self::find_by_event_devices(kind) {
            info!("Найдено устройство среди event устройств: {:?}", device);
            return Ok(device);
        }

        GlideError::device_not_found(format!(
            "Не удалось найти {} устройство. Убедитесь, что пользователь добавлен в группу 'input'",
            kind.label()
        ))
    }

    fn find_by_id(kind: DeviceKind) -> Result<PathBuf> {
        let by_id_dir = Path::new("/dev/input/by-id");

        if !by_id_dir.exists() {
            debug!("Директория /dev/input/by-id не существует");
            return GlideError::device_not_found("Директория by-id не найдена");
        }

        let entries = fs::read_dir(by_id_dir)
            .map_err(|e| glide_error!(permission, "Нет доступа к /dev/input/by-id: {}", e))?;

        let mut candidates = Vec::new();

        for entry in entries {
            let path = entry?.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("").to_string();

            let priority = kind.by_id_priority(&name);
            if priority == 0 {
                continue;
            }

            if !Self::is_device_accessible(&path) {
                warn!("Устройство {:?} недоступно", path);
                continue;
            }

            if Self::matches_kind(&path, kind) {
                info!("Кандидат: {} (приоритет: {})", name, priority);
                candidates.push((path, priority));
            } else {
                debug!("Устройство не прошло проверку возможностей: {}", name);
            }
        }

        // Сортируем по приоритету и возвращаем лучшее
        candidates.sort_by(|a, b| b.1.cmp(&a.1));

        match candidates.into_iter().next() {
            Some((device, _)) => Ok(device),
            None => GlideError::device_not_found("Устройство не найдено в by-id"),
        }
    }

    fn find_by_event_devices(kind: DeviceKind) -> Result<PathBuf> {
        let input_dir = Path::new("/dev/input");

        let entries = fs::read_dir(input_dir)
            .map_err(|e| glide_error!(permission, "Нет доступа к /dev/input: {}", e))?;

        let mut event_devices = Vec::new();

        for entry in entries {
            let path = entry?.path();
            let is_event = path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.starts_with("event"));

            if is_event {
                event_devices.push(path);
            }
        }

        // Сортируем устройства по номеру
        event_devices.sort();

        for device_path in event_devices {
            debug!("Проверяем устройство: {:?}", device_path);

            if Self::matches_kind(&device_path, kind) && Self::is_device_accessible(&device_path) {
                return Ok(device_path);
            }
        }

        GlideError::device_not_found("Не найдено подходящее устройство среди event устройств")
    }

    fn matches_kind(device_path: &Path, kind: DeviceKind) -> bool {
        match evdev::Device::open(device_path) {
            Ok(device) => {
                let name = device.name().unwrap_or("Unknown").to_lowercase();
                let result = match kind {
                    DeviceKind::Keyboard => Self::is_keyboard_device(&device, &name),
                    DeviceKind::Pointer => Self::is_pointer_device(&device),
                };
                debug!("Устройство {:?} ({}): {}", device_path, name, result);
                result
            }
            Err(e) => {
                debug!("Не удалось открыть устройство {:?}: {}", device_path, e);
                false
            }
        }
    }

    fn is_keyboard_device(device: &evdev::Device, name: &str) -> bool {
        // Исключаем мыши по имени устройства
        if name.contains("mouse") || name.contains("touchpad") || name.contains("trackpoint") {
            return false;
        }

        device.supported_keys().map_or(false, |keys| {
            let basic_keys = keys.contains(KeyCode::KEY_A)
                && keys.contains(KeyCode::KEY_SPACE)
                && keys.contains(KeyCode::KEY_ENTER);

            // У настоящей клавиатуры много клавиш
            basic_keys && keys.iter().count() > 20
        })
    }

    fn is_pointer_device(device: &evdev::Device) -> bool {
        let has_axes = device.supported_relative_axes().map_or(false, |axes| {
            axes.contains(RelativeAxisCode::REL_X) && axes.contains(RelativeAxisCode::REL_Y)
        });
        let has_button = device
            .supported_keys()
            .map_or(false, |keys| keys.contains(KeyCode::BTN_LEFT));

        has_axes && has_button
    }

    fn is_device_accessible(device_path: &Path) -> bool {
        match fs::File::open(device_path) {
            Ok(_) => true,
            Err(e) => {
                debug!("Устройство {:?} недоступно: {}", device_path, e);
                false
            }
        }
    }
}
