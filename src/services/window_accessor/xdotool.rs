use super::r#trait::{PointerLocator, WindowAccessor, WindowHandle};
use crate::error::Result;
use crate::events::{Point, Size};
use crate::glide_error;
use crate::utils::command::{parse_shell_output, run_for_output};
use tracing::debug;

/// Доступ к окнам X11 через xdotool
pub struct XdotoolWindowAccessor;

impl XdotoolWindowAccessor {
    pub fn new() -> Self {
        Self
    }

    /// Позиция указателя и окно под ним
    fn mouse_location() -> Result<(Point, u64)> {
        let output = run_for_output("xdotool", &["getmouselocation", "--shell"])?;
        let values = parse_shell_output(&output);

        let number = |key: &str| -> Result<f64> {
            values
                .get(key)
                .and_then(|v| v.parse::<f64>().ok())
                .ok_or_else(|| glide_error!(command, "xdotool не вернул {}", key))
        };

        let location = Point::new(number("X")?, number("Y")?);
        let window = values
            .get("WINDOW")
            .and_then(|v| v.parse::<u64>().ok())
            .ok_or_else(|| glide_error!(command, "xdotool не вернул WINDOW"))?;

        Ok((location, window))
    }
}

impl Default for XdotoolWindowAccessor {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowAccessor for XdotoolWindowAccessor {
    fn window_at(&self, point: Point) -> Option<Box<dyn WindowHandle>> {
        // xdotool умеет искать окно только под текущим указателем
        match Self::mouse_location() {
            Ok((location, id)) if id != 0 => {
                debug!("Окно под указателем {}: {} (запрошено {})", location, id, point);
                Some(Box::new(XdotoolWindow { id }))
            }
            Ok(_) => {
                debug!("Под указателем {} нет окна", point);
                None
            }
            Err(e) => {
                debug!("Не удалось найти окно под указателем: {}", e);
                None
            }
        }
    }
}

impl PointerLocator for XdotoolWindowAccessor {
    fn locate(&self) -> Option<Point> {
        match Self::mouse_location() {
            Ok((location, _)) => Some(location),
            Err(e) => {
                debug!("Не удалось получить позицию указателя: {}", e);
                None
            }
        }
    }
}

/// Геометрия окна из вывода `getwindowgeometry --shell`
#[derive(Debug, Clone, Copy, PartialEq)]
struct WindowGeometry {
    origin: Point,
    size: Size,
}

impl WindowGeometry {
    fn parse(output: &str) -> Option<Self> {
        let values = parse_shell_output(output);
        let number = |key: &str| values.get(key).and_then(|v| v.parse::<f64>().ok());

        Some(Self {
            origin: Point::new(number("X")?, number("Y")?),
            size: Size::new(number("WIDTH")?, number("HEIGHT")?),
        })
    }
}

pub struct XdotoolWindow {
    id: u64,
}

impl XdotoolWindow {
    fn geometry(&self) -> Option<WindowGeometry> {
        let id = self.id.to_string();
        match run_for_output("xdotool", &["getwindowgeometry", "--shell", &id]) {
            Ok(output) => WindowGeometry::parse(&output),
            Err(e) => {
                debug!("Не удалось получить геометрию окна {}: {}", self.id, e);
                None
            }
        }
    }
}

impl WindowHandle for XdotoolWindow {
    fn origin(&self) -> Option<Point> {
        self.geometry().map(|g| g.origin)
    }

    fn size(&self) -> Option<Size> {
        self.geometry().map(|g| g.size)
    }

    fn set_origin(&self, origin: Point) -> Result<()> {
        let id = self.id.to_string();
        let x = (origin.x.round() as i64).to_string();
        let y = (origin.y.round() as i64).to_string();
        run_for_output("xdotool", &["windowmove", &id, &x, &y])?;
        Ok(())
    }

    fn set_size(&self, size: Size) -> Result<()> {
        let id = self.id.to_string();
        // Окно нулевого размера X11 не примет
        let width = (size.width.round().max(1.0) as i64).to_string();
        let height = (size.height.round().max(1.0) as i64).to_string();
        run_for_output("xdotool", &["windowsize", &id, &width, &height])?;
        Ok(())
    }
}
