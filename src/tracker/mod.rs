//! Tracker: classification of modifier combinations, the transition table,
//! corner-aware geometry and write throttling.
//!
//! Everything here is pure or talks to the outside world only through the
//! `WindowAccessor`, `TextAccessor` and `TapControl` traits, so the whole
//! module is driven by test doubles in its tests.

pub mod geometry;
pub mod modifiers;
pub mod session;
pub mod settings;
pub mod state;
pub mod throttle;
mod tracker;

#[cfg(test)]
pub mod testing;

pub use modifiers::{Mode, ModifierMatcher};
pub use settings::{SettingsHandle, TrackerSettings};
pub use state::State;
pub use tracker::Tracker;
