pub mod evdev_to_modifier;
pub mod modifier_names;

pub use evdev_to_modifier::EvdevToModifier;
pub use modifier_names::ModifierNames;
