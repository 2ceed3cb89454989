use crate::events::ModifierFlags;
use std::fmt;

/// Режим, которому соответствует свой набор модификаторов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Move,
    Resize,
    Capitalize,
}

impl Mode {
    /// Порядок проверки: при совпадении нескольких наборов побеждает первый
    pub const PRIORITY: [Mode; 3] = [Mode::Move, Mode::Resize, Mode::Capitalize];
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Move => "move",
            Mode::Resize => "resize",
            Mode::Capitalize => "capitalize",
        };
        f.write_str(name)
    }
}

/// Наборы модификаторов для всех трёх режимов.
///
/// Хранит только отслеживаемые модификаторы; пустой набор выключает режим.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifierMatcher {
    move_set: ModifierFlags,
    resize_set: ModifierFlags,
    capitalize_set: ModifierFlags,
}

impl ModifierMatcher {
    pub fn new(move_set: ModifierFlags, resize_set: ModifierFlags, capitalize_set: ModifierFlags) -> Self {
        Self {
            move_set: move_set.tracked(),
            resize_set: resize_set.tracked(),
            capitalize_set: capitalize_set.tracked(),
        }
    }

    pub fn set_for(&self, mode: Mode) -> ModifierFlags {
        match mode {
            Mode::Move => self.move_set,
            Mode::Resize => self.resize_set,
            Mode::Capitalize => self.capitalize_set,
        }
    }

    pub fn is_empty(&self, mode: Mode) -> bool {
        self.set_for(mode).is_empty()
    }

    /// Все наборы пусты: движок не настроен и пропускает всё
    pub fn is_inert(&self) -> bool {
        Mode::PRIORITY.iter().all(|&mode| self.is_empty(mode))
    }

    /// Зажаты все модификаторы режима и ни одного лишнего из отслеживаемых
    pub fn exclusively_set(&self, mode: Mode, flags: ModifierFlags) -> bool {
        let set = self.set_for(mode);
        !set.is_empty() && flags.tracked() == set
    }

    /// Первый режим, чей набор эксклюзивно совпал с маской
    pub fn matching_mode(&self, flags: ModifierFlags) -> Option<Mode> {
        Mode::PRIORITY
            .into_iter()
            .find(|&mode| self.exclusively_set(mode, flags))
    }
}
