use crate::config::Config;
use crate::error::Result;
use crate::services::window_accessor::PointerLocator;
use crate::tracker::Tracker;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Управление перехватом со стороны трекера
pub trait TapControl: Send + Sync {
    /// Запросить повторное включение перехвата.
    /// Без повторов и без отчёта: если не вышло, события просто перестанут приходить.
    fn reenable(&self);
}

/// Источник перехваченных событий ввода
pub trait InputSource: Send {
    fn tap_control(&self) -> Arc<dyn TapControl>;

    /// Блокирующий цикл доставки событий в трекер.
    /// Возвращается после выставления `stop`.
    fn run(self: Box<Self>, tracker: Tracker, stop: Arc<AtomicBool>) -> Result<()>;
}

/// Фабрика источников: перехват создаётся заново при каждом включении движка
pub type InputSourceFactory = Box<dyn Fn() -> Result<Box<dyn InputSource>> + Send + Sync>;

/// Factory function to create an appropriate input source based on the dry_run flag
pub fn create_input_source(
    config: Arc<Config>,
    locator: Arc<dyn PointerLocator>,
    dry_run: bool,
) -> Result<Box<dyn InputSource>> {
    if dry_run {
        Ok(Box::new(super::dry_input_source::DryRunInputSource::new()))
    } else {
        Ok(Box::new(super::evdev_source::EvdevInputSource::new(
            config,
            locator,
        )?))
    }
}

/// Фабрика, которую движок вызывает при каждом `enable()`
pub fn input_source_factory(
    config: Arc<Config>,
    locator: Arc<dyn PointerLocator>,
    dry_run: bool,
) -> InputSourceFactory {
    Box::new(move || create_input_source(config.clone(), locator.clone(), dry_run))
}
