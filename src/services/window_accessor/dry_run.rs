use super::r#trait::{PointerLocator, WindowAccessor, WindowHandle};
use crate::error::Result;
use crate::events::{Point, Size};
use tracing::info;

/// Эмуляция оконной системы: одно неподвижное окно 800x600
pub struct DryRunWindowAccessor;

impl DryRunWindowAccessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DryRunWindowAccessor {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowAccessor for DryRunWindowAccessor {
    fn window_at(&self, point: Point) -> Option<Box<dyn WindowHandle>> {
        info!("[DRY RUN] Поиск окна под {}", point);
        Some(Box::new(DryRunWindow))
    }
}

impl PointerLocator for DryRunWindowAccessor {
    fn locate(&self) -> Option<Point> {
        None
    }
}

struct DryRunWindow;

impl WindowHandle for DryRunWindow {
    fn origin(&self) -> Option<Point> {
        Some(Point::new(100.0, 100.0))
    }

    fn size(&self) -> Option<Size> {
        Some(Size::new(800.0, 600.0))
    }

    fn set_origin(&self, origin: Point) -> Result<()> {
        info!("[DRY RUN] Перемещение окна в {}", origin);
        Ok(())
    }

    fn set_size(&self, size: Size) -> Result<()> {
        info!("[DRY RUN] Новый размер окна {}", size);
        Ok(())
    }
}
