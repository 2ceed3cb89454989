use super::geometry::Corner;
use super::throttle::Throttle;
use crate::error::Result;
use crate::events::{Delta, Point, Size};
use crate::services::window_accessor::WindowHandle;
use std::fmt;
use std::time::{Duration, Instant};

/// Живая запись об окне, которое сейчас двигаем или растягиваем.
/// Существует только в состояниях Moving/Resizing.
pub struct TrackingSession {
    window: Box<dyn WindowHandle>,
    origin: Point,
    size: Size,
    corner: Corner,
    last_commit: Instant,
}

impl TrackingSession {
    /// Снять геометрию окна и выбрать угол. `None`, если окно не отдало геометрию.
    pub fn start(
        window: Box<dyn WindowHandle>,
        pointer: Point,
        resize: bool,
        nearest_corner: bool,
        now: Instant,
    ) -> Option<Self> {
        let origin = window.origin()?;
        let size = window.size()?;

        // Для перемещения угол ни на что не влияет
        let corner = if resize {
            Corner::for_session(pointer, origin, size, nearest_corner)
        } else {
            Corner::default()
        };

        Some(Self {
            window,
            origin,
            size,
            corner,
            last_commit: now,
        })
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn corner(&self) -> Corner {
        self.corner
    }

    /// Сдвинуть окно. Возвращает `true`, если геометрия записана в окно.
    pub fn apply_move(&mut self, delta: Delta, now: Instant, interval: Duration) -> Result<bool> {
        self.origin += delta;

        if !Throttle::new(interval).ready(self.last_commit, now) {
            return Ok(false);
        }

        self.window.set_origin(self.origin)?;
        self.last_commit = now;
        Ok(true)
    }

    /// Растянуть окно от выбранного угла. Возвращает `true`, если геометрия записана в окно.
    pub fn apply_resize(&mut self, delta: Delta, now: Instant, interval: Duration) -> Result<bool> {
        self.corner.apply(&mut self.origin, &mut self.size, delta);

        if !Throttle::new(interval).ready(self.last_commit, now) {
            return Ok(false);
        }

        if self.corner.moves_origin() {
            self.window.set_origin(self.origin)?;
        }
        self.window.set_size(self.size)?;
        self.last_commit = now;
        Ok(true)
    }
}

impl fmt::Debug for TrackingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingSession")
            .field("origin", &self.origin)
            .field("size", &self.size)
            .field("corner", &self.corner)
            .field("last_commit", &self.last_commit)
            .finish_non_exhaustive()
    }
}
