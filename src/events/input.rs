use super::geometry::{Delta, Point};
use std::fmt;
use std::time::Instant;

bitflags::bitflags! {
    /// Маска зажатых модификаторов, приходит вместе с каждым событием.
    ///
    /// `CAPS_LOCK` и `NUM_LOCK` видны в маске, но не участвуют в сравнении
    /// наборов модификаторов (см. [`ModifierFlags::TRACKED`]).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierFlags: u16 {
        const SHIFT     = 1 << 0;
        const CONTROL   = 1 << 1;
        const ALT       = 1 << 2;
        const SUPER     = 1 << 3;
        const CAPS_LOCK = 1 << 4;
        const NUM_LOCK  = 1 << 5;
    }
}

impl ModifierFlags {
    /// Модификаторы, которые учитываются при эксклюзивном сравнении
    pub const TRACKED: Self = Self::SHIFT
        .union(Self::CONTROL)
        .union(Self::ALT)
        .union(Self::SUPER);

    pub fn tracked(self) -> Self {
        self & Self::TRACKED
    }

    pub fn to_vec(self) -> Vec<&'static str> {
        let mut result = Vec::new();
        if self.contains(Self::CONTROL) { result.push("ctrl"); }
        if self.contains(Self::ALT) { result.push("alt"); }
        if self.contains(Self::SHIFT) { result.push("shift"); }
        if self.contains(Self::SUPER) { result.push("super"); }
        result
    }
}

impl fmt::Display for ModifierFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = self.to_vec();
        if modifiers.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", modifiers.join("+"))
        }
    }
}

/// Тип перехваченного события
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEventKind {
    PointerMoved,
    KeyDown,
    ModifiersChanged,
    TapDisabledTimeout,
    TapDisabledUserInput,
}

impl InputEventKind {
    pub fn is_tap_disabled(self) -> bool {
        matches!(self, Self::TapDisabledTimeout | Self::TapDisabledUserInput)
    }
}

/// Событие ввода в том виде, в котором его видит Tracker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    pub kind: InputEventKind,
    pub flags: ModifierFlags,
    /// Абсолютная позиция указателя
    pub location: Point,
    /// Смещение указателя с предыдущего события
    pub delta: Delta,
    pub timestamp: Instant,
}

impl InputEvent {
    pub fn new(kind: InputEventKind, flags: ModifierFlags, location: Point, delta: Delta) -> Self {
        Self {
            kind,
            flags,
            location,
            delta,
            timestamp: Instant::now(),
        }
    }

    pub fn modifiers_changed(flags: ModifierFlags, location: Point) -> Self {
        Self::new(InputEventKind::ModifiersChanged, flags, location, Delta::ZERO)
    }

    pub fn pointer_moved(flags: ModifierFlags, location: Point, delta: Delta) -> Self {
        Self::new(InputEventKind::PointerMoved, flags, location, delta)
    }

    pub fn tap_disabled(kind: InputEventKind) -> Self {
        Self::new(kind, ModifierFlags::empty(), Point::default(), Delta::ZERO)
    }

    pub fn at(mut self, timestamp: Instant) -> Self {
        self.timestamp = timestamp;
        self
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}[{}] at {} by {}",
            self.kind, self.flags, self.location, self.delta
        )
    }
}
