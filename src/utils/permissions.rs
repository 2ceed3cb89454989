use crate::error::Result;
use crate::glide_error;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use tracing::{info, warn};

/// Проверка разрешения на перехват ввода перед включением движка
pub trait PermissionGate: Send + Sync {
    fn input_monitoring_granted(&self) -> bool;
}

/// Разрешение по правам на /dev/input и /dev/uinput
pub struct DevicePermissionGate;

impl PermissionGate for DevicePermissionGate {
    fn input_monitoring_granted(&self) -> bool {
        match check_permissions() {
            Ok(()) => true,
            Err(e) => {
                warn!("{}", e);
                for command in get_setup_commands() {
                    warn!("   {}", command);
                }
                false
            }
        }
    }
}

/// В dry-run режиме устройства не захватываются, разрешение не нужно
pub struct DryRunPermissionGate;

impl PermissionGate for DryRunPermissionGate {
    fn input_monitoring_granted(&self) -> bool {
        true
    }
}

/// Проверить права доступа к необходимым ресурсам
pub fn check_permissions() -> Result<()> {
    info!("Проверка прав доступа...");

    // Проверка доступа к /dev/input/
    check_input_devices_access()?;

    // Проверка доступа к /dev/uinput
    check_uinput_access()?;

    // Проверка, что не запущен от root (рекомендация безопасности)
    check_not_root();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_input_devices_access() -> Result<()> {
    let input_dir = "/dev/input";

    if !std::path::Path::new(input_dir).exists() {
        return Err(glide_error!(permission, "Директория {} не существует", input_dir));
    }

    // Проверяем возможность чтения директории
    match fs::read_dir(input_dir) {
        Ok(_) => {
            info!("Доступ к {} подтвержден", input_dir);
            Ok(())
        }
        Err(e) => {
            Err(glide_error!(permission, "Нет доступа к {}: {}. Добавьте пользователя в группу 'input'", input_dir, e))
        }
    }
}

fn check_uinput_access() -> Result<()> {
    let uinput_device = "/dev/uinput";

    // Без uinput непоглощённые события некуда переслать
    if !std::path::Path::new(uinput_device).exists() {
        return Err(glide_error!(permission, "{} не существует, модуль uinput не загружен", uinput_device));
    }

    match fs::metadata(uinput_device) {
        Ok(metadata) => {
            let mode = metadata.permissions().mode();

            // Проверяем права доступа (обычно 660 или 666)
            if !uinput_mode_accessible(mode) {
                return Err(glide_error!(permission, "Нет прав доступа к {}. Добавьте пользователя в группу 'uinput' или 'input'", uinput_device));
            }

            info!("Доступ к {} подтвержден", uinput_device);
            Ok(())
        }
        Err(e) => {
            Err(glide_error!(permission, "Не удалось проверить права доступа к {}: {}", uinput_device, e))
        }
    }
}

fn uinput_mode_accessible(mode: u32) -> bool {
    mode & 0o006 != 0 || mode & 0o060 != 0
}

fn check_not_root() {
    // Проверяем переменную окружения USER
    match std::env::var("USER") {
        Ok(user) if user == "root" => {
            warn!("⚠️  Приложение запущено от имени root!");
            warn!("   Рекомендуется добавить пользователя в группы 'input' и 'uinput'");
            warn!("   и запускать приложение от имени обычного пользователя");
        }
        Ok(user) => {
            info!("Приложение запущено от имени пользователя: {}", user);
        }
        Err(_) => {
            warn!("Не удалось определить пользователя");
        }
    }
}

/// Получить рекомендуемые команды для настройки прав доступа
pub fn get_setup_commands() -> Vec<String> {
    vec![
        "# Добавить пользователя в необходимые группы:".to_string(),
        "sudo usermod -a -G input,uinput $USER".to_string(),
        "".to_string(),
        "# Загрузить модуль uinput:".to_string(),
        "sudo modprobe uinput".to_string(),
        "".to_string(),
        "# Автоматическая загрузка модуля при загрузке системы:".to_string(),
        "echo 'uinput' | sudo tee /etc/modules-load.d/uinput.conf".to_string(),
        "".to_string(),
        "# После выполнения команд перезайдите в систему".to_string(),
    ]
}
