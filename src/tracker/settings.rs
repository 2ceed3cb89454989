use super::modifiers::ModifierMatcher;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_MOVE_INTERVAL: Duration = Duration::from_millis(10);
pub const DEFAULT_RESIZE_INTERVAL: Duration = Duration::from_millis(20);

/// Неизменяемый снимок настроек трекера.
/// Заменяется целиком, поэтому наборы модификаторов всегда согласованы.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSettings {
    pub matcher: ModifierMatcher,
    pub resize_from_nearest_corner: bool,
    pub move_interval: Duration,
    pub resize_interval: Duration,
}

impl TrackerSettings {
    pub fn new(matcher: ModifierMatcher) -> Self {
        Self {
            matcher,
            resize_from_nearest_corner: false,
            move_interval: DEFAULT_MOVE_INTERVAL,
            resize_interval: DEFAULT_RESIZE_INTERVAL,
        }
    }

    pub fn with_nearest_corner(mut self, enabled: bool) -> Self {
        self.resize_from_nearest_corner = enabled;
        self
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self::new(ModifierMatcher::default())
    }
}

/// Точка передачи настроек между потоком перехвата и источником обновлений.
///
/// Поток перехвата берёт `snapshot()` один раз на событие; обновление
/// подменяет `Arc` целиком под коротким write-локом.
#[derive(Debug, Clone, Default)]
pub struct SettingsHandle {
    current: Arc<RwLock<Arc<TrackerSettings>>>,
}

impl SettingsHandle {
    pub fn new(settings: TrackerSettings) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(settings))),
        }
    }

    pub fn snapshot(&self) -> Arc<TrackerSettings> {
        self.current.read().clone()
    }

    pub fn publish(&self, settings: TrackerSettings) {
        *self.current.write() = Arc::new(settings);
    }
}
