use crate::error::Result;
use crate::events::{Point, Size};
use std::sync::Arc;

/// Окно, геометрией которого управляет трекер
pub trait WindowHandle: Send {
    fn origin(&self) -> Option<Point>;
    fn size(&self) -> Option<Size>;
    fn set_origin(&self, origin: Point) -> Result<()>;
    fn set_size(&self, size: Size) -> Result<()>;
}

/// Поиск окна под указателем
pub trait WindowAccessor: Send + Sync {
    fn window_at(&self, point: Point) -> Option<Box<dyn WindowHandle>>;
}

/// Запрос текущей абсолютной позиции указателя
pub trait PointerLocator: Send + Sync {
    fn locate(&self) -> Option<Point>;
}

/// Factory function to create an appropriate window accessor based on the dry_run flag
pub fn create_window_accessor(dry_run: bool) -> Arc<dyn WindowAccessor> {
    if dry_run {
        Arc::new(super::dry_run::DryRunWindowAccessor::new())
    } else {
        Arc::new(super::xdotool::XdotoolWindowAccessor::new())
    }
}

/// Factory function to create a pointer locator based on the dry_run flag
pub fn create_pointer_locator(dry_run: bool) -> Arc<dyn PointerLocator> {
    if dry_run {
        Arc::new(super::dry_run::DryRunWindowAccessor::new())
    } else {
        Arc::new(super::xdotool::XdotoolWindowAccessor::new())
    }
}
