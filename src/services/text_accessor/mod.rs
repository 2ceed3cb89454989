mod dry_run;
mod selection;
mod r#trait;

pub use self::r#trait::{create_text_accessor, TextAccessor};
