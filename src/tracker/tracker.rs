use super::session::TrackingSession;
use super::settings::{SettingsHandle, TrackerSettings};
use super::state::{transition, Action, State};
use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::{InputEvent, ModifierFlags, Point};
use crate::services::input_source::TapControl;
use crate::services::text_accessor::TextAccessor;
use crate::services::window_accessor::WindowAccessor;
use crate::trace_if_enabled;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Конечный автомат, через который проходит каждое перехваченное событие.
///
/// Работает только в потоке перехвата; настройки читает из `SettingsHandle`
/// один раз на событие.
pub struct Tracker {
    state: State,
    session: Option<TrackingSession>,
    settings: SettingsHandle,
    windows: Arc<dyn WindowAccessor>,
    text: Arc<dyn TextAccessor>,
    tap: Arc<dyn TapControl>,
}

impl Tracker {
    pub fn new(
        settings: SettingsHandle,
        windows: Arc<dyn WindowAccessor>,
        text: Arc<dyn TextAccessor>,
        tap: Arc<dyn TapControl>,
    ) -> Self {
        Self {
            state: State::Idle,
            session: None,
            settings,
            windows,
            text,
            tap,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn session(&self) -> Option<&TrackingSession> {
        self.session.as_ref()
    }

    /// Начнёт ли событие с такими флагами сессию перемещения или изменения размера.
    /// Только в этом случае нужна точная позиция указателя.
    pub fn starts_session(&self, flags: ModifierFlags) -> bool {
        let settings = self.settings.snapshot();
        if settings.matcher.is_inert() {
            return false;
        }

        let candidate = State::from_mode(settings.matcher.matching_mode(flags));
        matches!(transition(self.state, candidate).action, Action::StartTracking { .. })
    }

    /// Обработать событие. Возвращает `true`, если событие надо поглотить.
    ///
    /// Ошибки внешних компонентов сюда не доходят: они пишутся в лог,
    /// а решение о поглощении возвращается всегда.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        trace_if_enabled!("Обработка события: {}", event);

        if event.kind.is_tap_disabled() {
            debug!("Перехват отключён системой ({:?}), включаем заново", event.kind);
            self.tap.reenable();
            return false;
        }

        let settings = self.settings.snapshot();

        if settings.matcher.is_inert() {
            trace_if_enabled!("Модификаторы не настроены, пропускаем событие");
            return false;
        }

        let candidate = State::from_mode(settings.matcher.matching_mode(event.flags));
        let transition = transition(self.state, candidate);

        if transition.next != self.state {
            debug_if_enabled!("Переход {} -> {} ({})", self.state, transition.next, event.flags);
            if self.state.is_tracking() {
                self.session = None;
            }
        }

        let result = self.perform(transition.action, event, &settings);
        self.state = transition.next;

        if let Err(e) = result {
            debug!("Действие {:?} не выполнено: {}", transition.action, e);
        }

        transition.absorb
    }

    fn perform(&mut self, action: Action, event: &InputEvent, settings: &TrackerSettings) -> Result<()> {
        match action {
            Action::None => Ok(()),
            Action::StartTracking { resize } => {
                self.start_tracking(event.location, resize, event.timestamp, settings);
                Ok(())
            }
            Action::Capitalize => self.capitalize(),
            Action::ApplyMove => {
                let Some(session) = self.session.as_mut() else {
                    trace_if_enabled!("Нет окна для перемещения");
                    return Ok(());
                };
                session.apply_move(event.delta, event.timestamp, settings.move_interval)?;
                Ok(())
            }
            Action::ApplyResize => {
                let Some(session) = self.session.as_mut() else {
                    trace_if_enabled!("Нет окна для изменения размера");
                    return Ok(());
                };
                session.apply_resize(event.delta, event.timestamp, settings.resize_interval)?;
                Ok(())
            }
        }
    }

    fn start_tracking(&mut self, location: Point, resize: bool, now: Instant, settings: &TrackerSettings) {
        let Some(window) = self.windows.window_at(location) else {
            debug!("Под указателем {} нет окна, сессия не начата", location);
            self.session = None;
            return;
        };

        self.session = TrackingSession::start(
            window,
            location,
            resize,
            settings.resize_from_nearest_corner,
            now,
        );

        match &self.session {
            Some(session) => debug_if_enabled!(
                "Начата сессия: {} {} угол {:?}",
                session.origin(),
                session.size(),
                session.corner()
            ),
            None => debug!("Окно не отдало геометрию, сессия не начата"),
        }
    }

    fn capitalize(&self) -> Result<()> {
        let Some(text) = self.text.selected_text() else {
            debug!("Нет выделенного текста");
            return Ok(());
        };

        let upper = text.to_uppercase();
        debug_if_enabled!("Замена выделенного текста: '{}' -> '{}'", text, upper);
        self.text.set_selected_text(&upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Delta, InputEventKind, ModifierFlags, Size};
    use crate::tracker::geometry::Corner;
    use crate::tracker::modifiers::ModifierMatcher;
    use crate::tracker::testing::{MockTap, MockText, MockWindows};
    use std::time::Duration;

    const MOVE: ModifierFlags = ModifierFlags::CONTROL.union(ModifierFlags::ALT);
    const RESIZE: ModifierFlags = MOVE.union(ModifierFlags::SHIFT);
    const CAPITALIZE: ModifierFlags = ModifierFlags::SUPER;

    struct Fixture {
        tracker: Tracker,
        windows: Arc<MockWindows>,
        text: Arc<MockText>,
        tap: Arc<MockTap>,
        settings: SettingsHandle,
        t0: Instant,
    }

    impl Fixture {
        fn with_settings(settings: TrackerSettings) -> Self {
            let settings = SettingsHandle::new(settings);
            let windows = Arc::new(MockWindows::with_window(Point::new(100.0, 50.0), Size::new(200.0, 100.0)));
            let text = Arc::new(MockText::new(Some("hello world")));
            let tap = Arc::new(MockTap::default());
            let tracker = Tracker::new(settings.clone(), windows.clone(), text.clone(), tap.clone());
            Self {
                tracker,
                windows,
                text,
                tap,
                settings,
                t0: Instant::now(),
            }
        }

        fn new() -> Self {
            Self::with_settings(TrackerSettings::new(ModifierMatcher::new(MOVE, RESIZE, CAPITALIZE)))
        }

        fn ms(&self, ms: u64) -> Instant {
            self.t0 + Duration::from_millis(ms)
        }

        fn press(&mut self, flags: ModifierFlags, location: Point, ms: u64) -> bool {
            let event = InputEvent::modifiers_changed(flags, location).at(self.ms(ms));
            self.tracker.handle_event(&event)
        }

        fn drag(&mut self, flags: ModifierFlags, delta: Delta, ms: u64) -> bool {
            let event = InputEvent::pointer_moved(flags, Point::new(150.0, 80.0), delta).at(self.ms(ms));
            self.tracker.handle_event(&event)
        }
    }

    #[test]
    fn test_inert_engine_passes_everything() {
        let mut fx = Fixture::with_settings(TrackerSettings::default());
        for bits in 0..(1u16 << 4) {
            let flags = ModifierFlags::from_bits_truncate(bits);
            assert!(!fx.press(flags, Point::new(120.0, 60.0), 0));
            assert!(!fx.drag(flags, Delta::new(3.0, 3.0), 50));
            assert_eq!(fx.tracker.state(), State::Idle);
        }
        assert_eq!(fx.windows.lookups(), 0);
        assert_eq!(fx.text.reads(), 0);
    }

    #[test]
    fn test_tap_disabled_reenables_and_keeps_state() {
        let mut fx = Fixture::new();
        assert!(fx.press(MOVE, Point::new(120.0, 60.0), 0));
        assert_eq!(fx.tracker.state(), State::Moving);

        for kind in [InputEventKind::TapDisabledTimeout, InputEventKind::TapDisabledUserInput] {
            assert!(!fx.tracker.handle_event(&InputEvent::tap_disabled(kind)));
            assert_eq!(fx.tracker.state(), State::Moving);
        }
        assert_eq!(fx.tap.reenabled(), 2);
        assert!(fx.tracker.session().is_some());
    }

    #[test]
    fn test_tap_disabled_is_handled_even_when_inert() {
        let mut fx = Fixture::with_settings(TrackerSettings::default());
        let event = InputEvent::tap_disabled(InputEventKind::TapDisabledTimeout);
        assert!(!fx.tracker.handle_event(&event));
        assert_eq!(fx.tap.reenabled(), 1);
    }

    #[test]
    fn test_only_first_event_of_move_is_absorbed() {
        let mut fx = Fixture::new();
        assert!(fx.press(MOVE, Point::new(120.0, 60.0), 0));
        assert!(!fx.drag(MOVE, Delta::new(5.0, 5.0), 20));
        assert!(!fx.drag(MOVE, Delta::new(5.0, 5.0), 40));

        assert_eq!(fx.tracker.state(), State::Moving);
        assert_eq!(
            fx.windows.origins(),
            vec![Point::new(105.0, 55.0), Point::new(110.0, 60.0)]
        );
        assert!(fx.windows.sizes().is_empty());
    }

    #[test]
    fn test_move_is_throttled() {
        let mut fx = Fixture::new();
        assert!(fx.press(MOVE, Point::new(120.0, 60.0), 0));

        for ms in 1..=5 {
            fx.drag(MOVE, Delta::new(1.0, 0.0), ms);
        }
        assert!(fx.windows.origins().is_empty());

        fx.drag(MOVE, Delta::new(1.0, 0.0), 15);
        assert_eq!(fx.windows.origins(), vec![Point::new(106.0, 50.0)]);
    }

    #[test]
    fn test_resize_from_nearest_top_left_corner() {
        let settings = TrackerSettings::new(ModifierMatcher::new(MOVE, RESIZE, CAPITALIZE)).with_nearest_corner(true);
        let mut fx = Fixture::with_settings(settings);
        fx.windows.set_geometry(Point::new(0.0, 0.0), Size::new(100.0, 100.0));

        assert!(fx.press(RESIZE, Point::new(10.0, 10.0), 0));
        assert_eq!(fx.tracker.session().map(|s| s.corner()), Some(Corner::TopLeft));

        // Внутри интервала 20 мс записи нет
        assert!(!fx.drag(RESIZE, Delta::new(5.0, -5.0), 10));
        assert!(fx.windows.origins().is_empty());
        assert!(fx.windows.sizes().is_empty());

        fx.drag(RESIZE, Delta::ZERO, 25);
        assert_eq!(fx.windows.origins(), vec![Point::new(5.0, -5.0)]);
        assert_eq!(fx.windows.sizes(), vec![Size::new(95.0, 105.0)]);
    }

    #[test]
    fn test_resize_bottom_right_writes_only_size() {
        let mut fx = Fixture::new();
        assert!(fx.press(RESIZE, Point::new(110.0, 60.0), 0));
        assert_eq!(fx.tracker.session().map(|s| s.corner()), Some(Corner::BottomRight));

        assert!(!fx.drag(RESIZE, Delta::new(10.0, 20.0), 30));
        assert!(fx.windows.origins().is_empty());
        assert_eq!(fx.windows.sizes(), vec![Size::new(210.0, 120.0)]);
    }

    #[test]
    fn test_missing_window_keeps_mode_without_session() {
        let mut fx = Fixture::new();
        fx.windows.remove_window();

        assert!(fx.press(MOVE, Point::new(120.0, 60.0), 0));
        assert_eq!(fx.tracker.state(), State::Moving);
        assert!(fx.tracker.session().is_none());

        assert!(!fx.drag(MOVE, Delta::new(5.0, 5.0), 50));
        assert!(fx.windows.origins().is_empty());
    }

    #[test]
    fn test_leaving_mode_abandons_session() {
        let mut fx = Fixture::new();
        fx.press(MOVE, Point::new(120.0, 60.0), 0);
        assert!(fx.tracker.session().is_some());

        // Переход Moving -> Resizing не начинает новую сессию
        assert!(!fx.press(RESIZE, Point::new(120.0, 60.0), 5));
        assert_eq!(fx.tracker.state(), State::Resizing);
        assert!(fx.tracker.session().is_none());
        assert!(!fx.drag(RESIZE, Delta::new(5.0, 5.0), 50));
        assert!(fx.windows.sizes().is_empty());

        assert!(!fx.press(ModifierFlags::empty(), Point::new(120.0, 60.0), 60));
        assert!(fx.press(MOVE, Point::new(120.0, 60.0), 70));
        assert_eq!(fx.windows.lookups(), 2);
    }

    #[test]
    fn test_capitalize_selected_text_once() {
        let mut fx = Fixture::new();
        assert!(fx.press(CAPITALIZE, Point::new(0.0, 0.0), 0));
        assert_eq!(fx.text.written(), vec!["HELLO WORLD".to_string()]);

        // Удержание модификаторов не повторяет преобразование
        assert!(!fx.press(CAPITALIZE, Point::new(0.0, 0.0), 10));
        assert!(!fx.drag(CAPITALIZE, Delta::new(1.0, 1.0), 20));
        assert_eq!(fx.tracker.state(), State::Capitalizing);
        assert_eq!(fx.text.written().len(), 1);
        assert_eq!(fx.text.reads(), 1);
    }

    #[test]
    fn test_capitalize_again_after_release() {
        let mut fx = Fixture::new();
        fx.press(CAPITALIZE, Point::new(0.0, 0.0), 0);
        fx.press(ModifierFlags::empty(), Point::new(0.0, 0.0), 10);
        fx.press(CAPITALIZE, Point::new(0.0, 0.0), 20);
        assert_eq!(fx.text.written().len(), 2);
    }

    #[test]
    fn test_capitalize_without_selection() {
        let mut fx = Fixture::new();
        fx.text.set_selection(None);
        assert!(fx.press(CAPITALIZE, Point::new(0.0, 0.0), 0));
        assert!(fx.text.written().is_empty());
    }

    #[test]
    fn test_failed_text_write_still_absorbs() {
        let mut fx = Fixture::new();
        fx.text.fail_writes();
        assert!(fx.press(CAPITALIZE, Point::new(0.0, 0.0), 0));
        assert_eq!(fx.tracker.state(), State::Capitalizing);
    }

    #[test]
    fn test_failed_window_write_is_retried() {
        let mut fx = Fixture::new();
        fx.press(MOVE, Point::new(120.0, 60.0), 0);
        fx.windows.fail_writes(true);
        assert!(!fx.drag(MOVE, Delta::new(1.0, 0.0), 20));
        assert!(fx.windows.origins().is_empty());

        fx.windows.fail_writes(false);
        fx.drag(MOVE, Delta::new(1.0, 0.0), 21);
        assert_eq!(fx.windows.origins(), vec![Point::new(102.0, 50.0)]);
    }

    #[test]
    fn test_lock_keys_do_not_break_match() {
        let mut fx = Fixture::new();
        assert!(fx.press(MOVE | ModifierFlags::CAPS_LOCK, Point::new(120.0, 60.0), 0));
        assert_eq!(fx.tracker.state(), State::Moving);
    }

    #[test]
    fn test_settings_refresh_applies_to_next_event() {
        let mut fx = Fixture::new();
        assert!(!fx.press(ModifierFlags::SHIFT, Point::new(120.0, 60.0), 0));

        fx.settings.publish(TrackerSettings::new(ModifierMatcher::new(
            ModifierFlags::SHIFT,
            ModifierFlags::empty(),
            ModifierFlags::empty(),
        )));
        assert!(fx.press(ModifierFlags::SHIFT, Point::new(120.0, 60.0), 10));
        assert_eq!(fx.tracker.state(), State::Moving);

        // Снятие всех наборов делает движок инертным: состояние замирает
        fx.settings.publish(TrackerSettings::default());
        assert!(!fx.press(ModifierFlags::empty(), Point::new(120.0, 60.0), 20));
        assert_eq!(fx.tracker.state(), State::Moving);
    }

    #[test]
    fn test_starts_session_only_on_entry_into_move_or_resize() {
        let mut fx = Fixture::new();
        assert!(!fx.tracker.starts_session(ModifierFlags::SHIFT));
        assert!(!fx.tracker.starts_session(ModifierFlags::CONTROL));
        assert!(!fx.tracker.starts_session(CAPITALIZE));
        assert!(fx.tracker.starts_session(MOVE));
        assert!(fx.tracker.starts_session(RESIZE));

        // Во время перемещения новая сессия не начинается
        fx.press(MOVE, Point::new(120.0, 60.0), 0);
        assert!(!fx.tracker.starts_session(MOVE));
        assert!(!fx.tracker.starts_session(RESIZE));

        let inert = Fixture::with_settings(TrackerSettings::default());
        assert!(!inert.tracker.starts_session(MOVE));
    }
}
