use crate::error::{EnableError, GlideError};
use crate::services::input_source::InputSourceFactory;
use crate::services::text_accessor::TextAccessor;
use crate::services::window_accessor::WindowAccessor;
use crate::tracker::{SettingsHandle, Tracker};
use crate::utils::permissions::PermissionGate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, error, info, warn};

/// Внешние компоненты, которые движок получает при создании
pub struct Collaborators {
    pub permissions: Arc<dyn PermissionGate>,
    pub windows: Arc<dyn WindowAccessor>,
    pub text: Arc<dyn TextAccessor>,
}

/// Работающий перехват: поток, в котором живут источник событий и трекер
struct ActiveEngine {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Владелец движка с явным жизненным циклом enable/disable.
///
/// Перехват создаётся заново при каждом `enable()` и полностью освобождается
/// в `disable()`: после возврата из него ни одно событие трекер уже не получит.
pub struct EngineController {
    settings: SettingsHandle,
    collaborators: Collaborators,
    input_factory: InputSourceFactory,
    active: Option<ActiveEngine>,
}

impl EngineController {
    pub fn new(settings: SettingsHandle, collaborators: Collaborators, input_factory: InputSourceFactory) -> Self {
        Self {
            settings,
            collaborators,
            input_factory,
            active: None,
        }
    }

    pub fn enable(&mut self) -> Result<(), EnableError> {
        if self.is_active() {
            debug!("Движок уже включён");
            return Ok(());
        }

        if !self.collaborators.permissions.input_monitoring_granted() {
            warn!("Нет разрешения на перехват ввода, движок не включён");
            return Err(EnableError::PermissionDenied);
        }

        let source = (self.input_factory)().map_err(EnableError::TapCreate)?;

        let tracker = Tracker::new(
            self.settings.clone(),
            self.collaborators.windows.clone(),
            self.collaborators.text.clone(),
            source.tap_control(),
        );

        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();

        let handle = std::thread::Builder::new()
            .name("winglide-tap".to_string())
            .spawn(move || {
                if let Err(e) = source.run(tracker, thread_stop) {
                    error!("Ошибка в потоке перехвата: {}", e);
                }
            })
            .map_err(|e| EnableError::TapCreate(GlideError::Io(e)))?;

        self.active = Some(ActiveEngine { stop, handle });
        info!("Движок включён");
        Ok(())
    }

    pub fn disable(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        active.stop.store(true, Ordering::Release);
        if active.handle.join().is_err() {
            error!("Поток перехвата завершился паникой");
        }

        info!("Движок выключен");
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

impl Drop for EngineController {
    fn drop(&mut self) {
        self.disable();
    }
}
