//! WindowAccessor service: responsibility and boundaries
//!
//! This module and its submodules only locate the window under the pointer and
//! read or write its geometry. They MUST NOT know about modifier modes, corners
//! or throttling: all of that belongs to the Tracker.

mod dry_run;
mod xdotool;
mod r#trait;

pub use self::r#trait::{create_pointer_locator, create_window_accessor, PointerLocator, WindowAccessor, WindowHandle};
