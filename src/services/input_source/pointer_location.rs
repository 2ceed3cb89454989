use crate::events::{Delta, InputEventKind, ModifierFlags, Point};
use crate::services::window_accessor::PointerLocator;
use crate::tracker::Tracker;
use std::sync::Arc;

/// Абсолютная позиция указателя, собранная из относительных смещений.
///
/// Запрос к `PointerLocator` запускает внешний процесс, поэтому позиция
/// уточняется только перед началом сессии, где от неё зависит выбор окна.
pub struct PointerLocation {
    location: Point,
    locator: Arc<dyn PointerLocator>,
}

impl PointerLocation {
    pub fn new(locator: Arc<dyn PointerLocator>) -> Self {
        Self {
            location: Point::default(),
            locator,
        }
    }

    /// Позиция для события трекера
    pub fn advance(&mut self, kind: InputEventKind, flags: ModifierFlags, delta: Delta, tracker: &Tracker) -> Point {
        if kind == InputEventKind::ModifiersChanged && tracker.starts_session(flags) {
            if let Some(location) = self.locator.locate() {
                self.location = location;
            }
        }
        self.drift(delta)
    }

    /// Движение, которое трекер не видит
    pub fn drift(&mut self, delta: Delta) -> Point {
        self.location += delta;
        self.location
    }
}
