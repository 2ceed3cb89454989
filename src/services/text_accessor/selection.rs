use super::r#trait::TextAccessor;
use crate::error::Result;
use crate::utils::command::{run_for_output, run_with_input};
use tracing::{debug, info};

/// Графическая сессия, от которой зависит набор утилит
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSession {
    X11,
    Wayland,
}

impl SelectionSession {
    /// `auto` смотрит на XDG_SESSION_TYPE, по умолчанию X11
    pub fn resolve(mode: &str) -> Self {
        match mode {
            "x11" => SelectionSession::X11,
            "wayland" => SelectionSession::Wayland,
            _ => Self::from_session_type(std::env::var("XDG_SESSION_TYPE").ok().as_deref()),
        }
    }

    fn from_session_type(session_type: Option<&str>) -> Self {
        match session_type {
            Some("wayland") => SelectionSession::Wayland,
            _ => SelectionSession::X11,
        }
    }
}

/// Работа с PRIMARY-выделением: чтение через xclip/wl-paste,
/// замена набором нового текста поверх выделения.
pub struct SelectionTextAccessor {
    session: SelectionSession,
}

impl SelectionTextAccessor {
    pub fn new(session: SelectionSession) -> Self {
        info!("Доступ к выделенному тексту через {:?}", session);
        Self { session }
    }

    fn read_selection(&self) -> Result<String> {
        match self.session {
            SelectionSession::X11 => run_for_output("xclip", &["-o", "-selection", "primary"]),
            SelectionSession::Wayland => run_for_output("wl-paste", &["--primary", "--no-newline"]),
        }
    }
}

impl TextAccessor for SelectionTextAccessor {
    fn selected_text(&self) -> Option<String> {
        match self.read_selection() {
            Ok(text) if !text.is_empty() => Some(text),
            Ok(_) => {
                debug!("Выделение пустое");
                None
            }
            Err(e) => {
                debug!("Не удалось прочитать выделение: {}", e);
                None
            }
        }
    }

    fn set_selected_text(&self, text: &str) -> Result<()> {
        match self.session {
            // Модификаторы в этот момент ещё зажаты, xdotool их временно отпускает
            SelectionSession::X11 => {
                run_for_output("xdotool", &["type", "--clearmodifiers", "--", text])?;
            }
            SelectionSession::Wayland => {
                run_with_input("wtype", &["-"], text)?;
            }
        }
        Ok(())
    }
}
