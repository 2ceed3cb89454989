use crate::events::{Delta, Point, Size};

/// Угол окна, за который тянем при изменении размера.
/// Выбирается один раз при старте сессии.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl Corner {
    /// Угол, в четверти которого лежит точка `relative` (смещение от начала окна).
    /// Точка ровно на середине относится к правой/нижней половине.
    pub fn nearest(relative: Delta, size: Size) -> Corner {
        if size.width <= 0.0 || size.height <= 0.0 {
            return Corner::BottomRight;
        }

        let right = relative.dx / size.width >= 0.5;
        let bottom = relative.dy / size.height >= 0.5;

        match (right, bottom) {
            (false, false) => Corner::TopLeft,
            (true, false) => Corner::TopRight,
            (false, true) => Corner::BottomLeft,
            (true, true) => Corner::BottomRight,
        }
    }

    /// Угол для новой сессии изменения размера
    pub fn for_session(pointer: Point, origin: Point, size: Size, nearest: bool) -> Corner {
        if nearest {
            Corner::nearest(pointer - origin, size)
        } else {
            Corner::BottomRight
        }
    }

    /// Применить смещение так, чтобы противоположный угол остался на месте
    pub fn apply(self, origin: &mut Point, size: &mut Size, delta: Delta) {
        match self {
            Corner::TopLeft => {
                *origin += delta;
                *size -= delta;
            }
            Corner::TopRight => {
                *origin += Delta::new(0.0, delta.dy);
                *size += Delta::new(delta.dx, -delta.dy);
            }
            Corner::BottomLeft => {
                *origin += Delta::new(delta.dx, 0.0);
                *size += Delta::new(-delta.dx, delta.dy);
            }
            Corner::BottomRight => {
                *size += delta;
            }
        }
    }

    /// Меняет ли изменение размера от этого угла начало окна
    pub fn moves_origin(self) -> bool {
        self != Corner::BottomRight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(x: f64, y: f64) -> Corner {
        Corner::for_session(
            Point::new(x, y),
            Point::new(0.0, 0.0),
            Size::new(100.0, 100.0),
            true,
        )
    }

    #[test]
    fn test_nearest_corner_quadrants() {
        assert_eq!(pick(10.0, 10.0), Corner::TopLeft);
        assert_eq!(pick(90.0, 10.0), Corner::TopRight);
        assert_eq!(pick(10.0, 90.0), Corner::BottomLeft);
        assert_eq!(pick(90.0, 90.0), Corner::BottomRight);
    }

    #[test]
    fn test_midpoint_resolves_to_bottom_right() {
        assert_eq!(pick(50.0, 50.0), Corner::BottomRight);
        assert_eq!(pick(50.0, 10.0), Corner::TopRight);
        assert_eq!(pick(10.0, 50.0), Corner::BottomLeft);
    }

    #[test]
    fn test_nearest_is_relative_to_origin() {
        let corner = Corner::for_session(
            Point::new(210.0, 310.0),
            Point::new(200.0, 300.0),
            Size::new(100.0, 100.0),
            true,
        );
        assert_eq!(corner, Corner::TopLeft);
    }

    #[test]
    fn test_preference_off_always_bottom_right() {
        let corner = Corner::for_session(
            Point::new(10.0, 10.0),
            Point::new(0.0, 0.0),
            Size::new(100.0, 100.0),
            false,
        );
        assert_eq!(corner, Corner::BottomRight);
    }

    #[test]
    fn test_degenerate_size() {
        assert_eq!(Corner::nearest(Delta::new(0.0, 0.0), Size::new(0.0, 0.0)), Corner::BottomRight);
    }

    #[test]
    fn test_resize_arithmetic_per_corner() {
        let delta = Delta::new(5.0, -5.0);
        let cases = [
            (Corner::TopLeft, Point::new(5.0, -5.0), Size::new(95.0, 105.0)),
            (Corner::TopRight, Point::new(0.0, -5.0), Size::new(105.0, 105.0)),
            (Corner::BottomLeft, Point::new(5.0, 0.0), Size::new(95.0, 95.0)),
            (Corner::BottomRight, Point::new(0.0, 0.0), Size::new(105.0, 95.0)),
        ];

        for (corner, expected_origin, expected_size) in cases {
            let mut origin = Point::new(0.0, 0.0);
            let mut size = Size::new(100.0, 100.0);
            corner.apply(&mut origin, &mut size, delta);
            assert_eq!(origin, expected_origin, "{:?}", corner);
            assert_eq!(size, expected_size, "{:?}", corner);
        }
    }
}
