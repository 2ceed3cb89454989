use crate::error::Result;
use crate::tracker::Tracker;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::r#trait::{InputSource, TapControl};

struct DryRunTap;

impl TapControl for DryRunTap {
    fn reenable(&self) {
        info!("[DRY RUN] Повторное включение перехвата");
    }
}

/// Источник без захвата устройств: ничего не перехватывает, только ждёт остановки
pub struct DryRunInputSource;

impl DryRunInputSource {
    pub fn new() -> Self {
        info!("Инициализация DryRunInputSource");
        Self
    }
}

impl Default for DryRunInputSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for DryRunInputSource {
    fn tap_control(&self) -> Arc<dyn TapControl> {
        Arc::new(DryRunTap)
    }

    fn run(self: Box<Self>, tracker: Tracker, stop: Arc<AtomicBool>) -> Result<()> {
        info!("Dry-run режим - перехват событий работает в режиме эмуляции");

        let mut last_report = Instant::now();
        while !stop.load(Ordering::Acquire) {
            std::thread::sleep(Duration::from_millis(50));
            if last_report.elapsed() >= Duration::from_secs(5) {
                debug!("Перехват работает в dry-run режиме, состояние: {}", tracker.state());
                last_report = Instant::now();
            }
        }

        Ok(())
    }
}
