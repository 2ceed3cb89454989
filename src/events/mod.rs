pub mod geometry;
pub mod input;

pub use geometry::{Delta, Point, Size};
pub use input::{InputEvent, InputEventKind, ModifierFlags};
