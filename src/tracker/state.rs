use super::modifiers::Mode;
use std::fmt;

/// Состояние конечного автомата
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    #[default]
    Idle,
    Moving,
    Resizing,
    Capitalizing,
}

impl State {
    pub const ALL: [State; 4] = [State::Idle, State::Moving, State::Resizing, State::Capitalizing];

    pub fn from_mode(mode: Option<Mode>) -> Self {
        match mode {
            None => State::Idle,
            Some(Mode::Move) => State::Moving,
            Some(Mode::Resize) => State::Resizing,
            Some(Mode::Capitalize) => State::Capitalizing,
        }
    }

    pub fn is_tracking(self) -> bool {
        matches!(self, State::Moving | State::Resizing)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Действие, выполняемое при переходе
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    StartTracking { resize: bool },
    Capitalize,
    ApplyMove,
    ApplyResize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub action: Action,
    pub absorb: bool,
    pub next: State,
}

/// Таблица переходов. Следующее состояние всегда равно кандидату.
///
/// Поглощается только первое событие при входе в режим; продолжение
/// перемещения/изменения размера событие не поглощает.
pub fn transition(current: State, candidate: State) -> Transition {
    use State::*;

    let (action, absorb) = match (current, candidate) {
        (Idle, Idle) => (Action::None, false),
        (Idle, Moving) => (Action::StartTracking { resize: false }, true),
        (Idle, Resizing) => (Action::StartTracking { resize: true }, true),
        (Idle, Capitalizing) => (Action::Capitalize, true),

        (Moving, Moving) => (Action::ApplyMove, false),
        (Moving, Idle | Resizing | Capitalizing) => (Action::None, false),

        (Resizing, Resizing) => (Action::ApplyResize, false),
        (Resizing, Idle | Moving | Capitalizing) => (Action::None, false),

        // Повторно не срабатывает, пока модификаторы не отпущены
        (Capitalizing, _) => (Action::None, false),
    };

    Transition {
        action,
        absorb,
        next: candidate,
    }
}
