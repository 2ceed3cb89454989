use crate::events::ModifierFlags;
use crate::mappings::EvdevToModifier;
use evdev::KeyCode;
use smallvec::SmallVec;

/// Текущая маска модификаторов по событиям клавиатуры.
///
/// Левая и правая клавиши дают один флаг, поэтому хранятся сами зажатые
/// клавиши: флаг снимается только когда отпущены обе.
#[derive(Debug, Default)]
pub struct ModifierState {
    held: SmallVec<[KeyCode; 8]>,
    locks: ModifierFlags,
}

const LOCKS: ModifierFlags = ModifierFlags::CAPS_LOCK.union(ModifierFlags::NUM_LOCK);

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(&self) -> ModifierFlags {
        self.held
            .iter()
            .filter_map(|key| EvdevToModifier::translate(*key))
            .fold(self.locks, |acc, flag| acc | flag)
    }

    /// Обновить маску по событию клавиши (`value`: 0 отпущена, 1 нажата, 2 автоповтор).
    /// Возвращает `true`, если маска изменилась.
    pub fn update_key(&mut self, key: KeyCode, value: i32) -> bool {
        let Some(flag) = EvdevToModifier::translate(key) else {
            return false;
        };

        let before = self.flags();
        if LOCKS.contains(flag) {
            // Lock-клавиши переключаются нажатием
            if value == 1 {
                self.locks.toggle(flag);
            }
        } else {
            match value {
                0 => self.held.retain(|held| *held != key),
                1 if !self.held.contains(&key) => self.held.push(key),
                _ => {}
            }
        }
        before != self.flags()
    }

    /// Пересобрать маску по фактическому состоянию устройства после потери событий
    pub fn resync<I>(&mut self, pressed: I, locks: ModifierFlags)
    where
        I: IntoIterator<Item = KeyCode>,
    {
        self.held = pressed
            .into_iter()
            .filter(|key| EvdevToModifier::translate(*key).is_some_and(|flag| !LOCKS.contains(flag)))
            .collect();
        self.locks = locks & LOCKS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut state = ModifierState::new();
        assert!(state.update_key(KeyCode::KEY_LEFTCTRL, 1));
        assert!(state.update_key(KeyCode::KEY_RIGHTALT, 1));
        assert_eq!(state.flags(), ModifierFlags::CONTROL | ModifierFlags::ALT);

        // Автоповтор маску не меняет
        assert!(!state.update_key(KeyCode::KEY_LEFTCTRL, 2));

        assert!(state.update_key(KeyCode::KEY_LEFTCTRL, 0));
        assert_eq!(state.flags(), ModifierFlags::ALT);
    }

    #[test]
    fn test_releasing_one_side_keeps_flag_while_other_side_held() {
        let mut state = ModifierState::new();
        state.update_key(KeyCode::KEY_LEFTCTRL, 1);
        state.update_key(KeyCode::KEY_LEFTALT, 1);

        assert!(!state.update_key(KeyCode::KEY_RIGHTCTRL, 1));
        assert!(!state.update_key(KeyCode::KEY_RIGHTCTRL, 0));
        assert_eq!(state.flags(), ModifierFlags::CONTROL | ModifierFlags::ALT);

        assert!(state.update_key(KeyCode::KEY_LEFTCTRL, 0));
        assert_eq!(state.flags(), ModifierFlags::ALT);
    }

    #[test]
    fn test_repeated_press_is_counted_once() {
        let mut state = ModifierState::new();
        state.update_key(KeyCode::KEY_LEFTSHIFT, 1);
        state.update_key(KeyCode::KEY_LEFTSHIFT, 1);
        assert!(state.update_key(KeyCode::KEY_LEFTSHIFT, 0));
        assert_eq!(state.flags(), ModifierFlags::empty());
    }

    #[test]
    fn test_regular_keys_are_ignored() {
        let mut state = ModifierState::new();
        assert!(!state.update_key(KeyCode::KEY_A, 1));
        assert_eq!(state.flags(), ModifierFlags::empty());
    }

    #[test]
    fn test_caps_lock_toggles() {
        let mut state = ModifierState::new();
        assert!(state.update_key(KeyCode::KEY_CAPSLOCK, 1));
        assert!(!state.update_key(KeyCode::KEY_CAPSLOCK, 0));
        assert!(state.flags().contains(ModifierFlags::CAPS_LOCK));
        assert!(state.update_key(KeyCode::KEY_CAPSLOCK, 1));
        assert!(!state.flags().contains(ModifierFlags::CAPS_LOCK));
    }

    #[test]
    fn test_resync_replaces_mask() {
        let mut state = ModifierState::new();
        state.update_key(KeyCode::KEY_LEFTSHIFT, 1);
        state.resync(
            [KeyCode::KEY_LEFTMETA, KeyCode::KEY_A, KeyCode::KEY_CAPSLOCK],
            ModifierFlags::NUM_LOCK,
        );
        assert_eq!(state.flags(), ModifierFlags::SUPER | ModifierFlags::NUM_LOCK);

        // После пересборки отпускание одной стороны работает как обычно
        state.update_key(KeyCode::KEY_RIGHTMETA, 1);
        state.update_key(KeyCode::KEY_LEFTMETA, 0);
        assert_eq!(state.flags(), ModifierFlags::SUPER | ModifierFlags::NUM_LOCK);
    }
}
