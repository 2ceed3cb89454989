use crate::config::Config;
use crate::error::Result;
use crate::tracker::SettingsHandle;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Редакторы генерируют несколько событий на одно сохранение
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(200);

/// Горячая перезагрузка конфигурации: при изменении файла собирает новый
/// снимок настроек и публикует его через `SettingsHandle`.
///
/// Ошибочный файл не применяется, трекер продолжает работать со старым снимком.
pub struct SettingsWatcher {
    watcher: Option<RecommendedWatcher>,
    handle: Option<JoinHandle<()>>,
}

impl SettingsWatcher {
    pub fn spawn(config_path: PathBuf, settings: SettingsHandle) -> Result<Self> {
        let (tx, rx) = mpsc::channel::<notify::Result<notify::Event>>();
        let mut watcher = notify::recommended_watcher(tx)?;

        // Следим за каталогом: сохранение через rename заменяет сам файл
        let watch_dir = watch_dir(&config_path);
        watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;
        info!("Отслеживание изменений конфигурации: {:?}", config_path);

        let file_name = config_path.file_name().map(|n| n.to_os_string()).unwrap_or_default();

        let handle = std::thread::Builder::new()
            .name("winglide-config".to_string())
            .spawn(move || {
                let mut pending = false;
                loop {
                    let received = if pending {
                        rx.recv_timeout(RELOAD_DEBOUNCE)
                    } else {
                        rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
                    };

                    match received {
                        Ok(Ok(event)) => {
                            if affects_file(&event.paths, &file_name) {
                                debug!("Событие файла конфигурации: {:?}", event.kind);
                                pending = true;
                            }
                        }
                        Ok(Err(e)) => warn!("Ошибка наблюдения за конфигурацией: {}", e),
                        Err(RecvTimeoutError::Timeout) => {
                            pending = false;
                            reload(&config_path, &settings);
                        }
                        // Наблюдатель удалён
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("Поток наблюдения за конфигурацией завершён");
            })?;

        Ok(Self {
            watcher: Some(watcher),
            handle: Some(handle),
        })
    }
}

impl Drop for SettingsWatcher {
    fn drop(&mut self) {
        // Удаление наблюдателя закрывает канал и завершает поток
        self.watcher.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Поток наблюдения за конфигурацией завершился паникой");
            }
        }
    }
}

fn watch_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn affects_file(paths: &[PathBuf], file_name: &OsString) -> bool {
    paths
        .iter()
        .any(|p| p.file_name().is_some_and(|name| name == file_name.as_os_str()))
}

/// Перечитать файл и опубликовать новый снимок. Возвращает true, если снимок заменён.
fn reload(config_path: &Path, settings: &SettingsHandle) -> bool {
    let snapshot = Config::load(config_path).and_then(|config| config.tracker_settings());

    match snapshot {
        Ok(snapshot) => {
            info!("Конфигурация перезагружена: {:?}", snapshot.matcher);
            settings.publish(snapshot);
            true
        }
        Err(e) => {
            warn!("Новая конфигурация не применена: {:#}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ModifierFlags;
    use crate::tracker::{Mode, TrackerSettings};

    #[test]
    fn test_watch_dir_for_bare_file_name() {
        assert_eq!(watch_dir(Path::new("winglide.toml")), PathBuf::from("."));
        assert_eq!(watch_dir(Path::new("/etc/winglide/winglide.toml")), PathBuf::from("/etc/winglide"));
    }

    #[test]
    fn test_affects_only_config_file() {
        let name = OsString::from("winglide.toml");
        assert!(affects_file(&[PathBuf::from("/tmp/x/winglide.toml")], &name));
        assert!(!affects_file(&[PathBuf::from("/tmp/x/.winglide.toml.swp")], &name));
        assert!(!affects_file(&[], &name));
    }

    #[test]
    fn test_reload_publishes_new_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("winglide.toml");
        std::fs::write(&path, "[modifiers]\nmove = [\"super\", \"shift\"]\n").unwrap();

        let settings = SettingsHandle::new(TrackerSettings::default());
        assert!(reload(&path, &settings));
        assert_eq!(
            settings.snapshot().matcher.set_for(Mode::Move),
            ModifierFlags::SUPER | ModifierFlags::SHIFT
        );
    }

    #[test]
    fn test_invalid_file_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("winglide.toml");
        std::fs::write(&path, "[modifiers]\nmove = [\"hyper\"]\n").unwrap();

        let settings = SettingsHandle::new(Config::default().tracker_settings().unwrap());
        let before = settings.snapshot();

        assert!(!reload(&path, &settings));
        assert_eq!(*settings.snapshot(), *before);
    }
}
