mod dry_input_source;
mod evdev_source;
mod modifier_state;
mod pointer_location;
mod r#trait;

pub use self::r#trait::{input_source_factory, InputSource, InputSourceFactory, TapControl};
