use crate::events::ModifierFlags;
use evdev::KeyCode;

/// Преобразование evdev::KeyCode в флаги модификаторов
pub struct EvdevToModifier;

impl EvdevToModifier {
    /// Флаг модификатора для клавиши, `None` для обычных клавиш
    pub fn translate(key: KeyCode) -> Option<ModifierFlags> {
        match key {
            KeyCode::KEY_LEFTSHIFT | KeyCode::KEY_RIGHTSHIFT => Some(ModifierFlags::SHIFT),
            KeyCode::KEY_LEFTCTRL | KeyCode::KEY_RIGHTCTRL => Some(ModifierFlags::CONTROL),
            KeyCode::KEY_LEFTALT | KeyCode::KEY_RIGHTALT => Some(ModifierFlags::ALT),
            KeyCode::KEY_LEFTMETA | KeyCode::KEY_RIGHTMETA => Some(ModifierFlags::SUPER),
            KeyCode::KEY_CAPSLOCK => Some(ModifierFlags::CAPS_LOCK),
            KeyCode::KEY_NUMLOCK => Some(ModifierFlags::NUM_LOCK),
            _ => None,
        }
    }
}
