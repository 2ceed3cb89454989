use crate::config::Config;
use crate::error::Result;
use crate::glide_error;
use crate::events::{Delta, InputEvent, InputEventKind, ModifierFlags};
use crate::services::window_accessor::PointerLocator;
use crate::services::VirtualDevice;
use crate::tracker::Tracker;
use crate::utils::DeviceFinder;
use crate::{debug_if_enabled, trace_if_enabled};
use evdev::{Device, EventType, KeyCode, LedCode, RelativeAxisCode, SynchronizationCode};
use smallvec::SmallVec;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use super::modifier_state::ModifierState;
use super::pointer_location::PointerLocation;
use super::r#trait::{InputSource, TapControl};

/// Запрос на повторный захват устройств, выполняется в цикле перехвата
#[derive(Debug, Default)]
pub struct GrabControl {
    requested: AtomicBool,
}

impl GrabControl {
    fn take_request(&self) -> bool {
        self.requested.swap(false, Ordering::AcqRel)
    }
}

impl TapControl for GrabControl {
    fn reenable(&self) {
        self.requested.store(true, Ordering::Release);
    }
}

/// События одного устройства до ближайшего SYN_REPORT
#[derive(Debug, Default)]
struct Frame {
    events: SmallVec<[evdev::InputEvent; 8]>,
    delta: Delta,
    modifiers_changed: bool,
    key_down: bool,
}

enum FrameStatus {
    Pending,
    Complete,
}

impl Frame {
    fn push(&mut self, event: evdev::InputEvent, modifiers: &mut ModifierState) -> FrameStatus {
        let event_type = event.event_type();
        let code = event.code();

        if event_type == EventType::SYNCHRONIZATION {
            if code == SynchronizationCode::SYN_REPORT.0 {
                return FrameStatus::Complete;
            }
            // SYN_DROPPED сюда не доходит: evdev сам пересобирает состояние
            // и досылает компенсирующие события клавиш
            if code == SynchronizationCode::SYN_DROPPED.0 {
                return FrameStatus::Pending;
            }
        } else if event_type == EventType::KEY {
            if modifiers.update_key(KeyCode::new(code), event.value()) {
                self.modifiers_changed = true;
            } else if event.value() == 1 && code < KeyCode::BTN_0.0 {
                // Кнопки мыши трекер не интересуют
                self.key_down = true;
            }
        } else if event_type == EventType::RELATIVE {
            if code == RelativeAxisCode::REL_X.0 {
                self.delta.dx += f64::from(event.value());
            } else if code == RelativeAxisCode::REL_Y.0 {
                self.delta.dy += f64::from(event.value());
            }
        }

        self.events.push(event);
        FrameStatus::Pending
    }

    /// Тип события для трекера; `None` для кадров, которые трекер не интересуют
    fn kind(&self) -> Option<InputEventKind> {
        if self.modifiers_changed {
            Some(InputEventKind::ModifiersChanged)
        } else if self.key_down {
            Some(InputEventKind::KeyDown)
        } else if !self.delta.is_zero() {
            Some(InputEventKind::PointerMoved)
        } else {
            None
        }
    }
}

struct DeviceTap {
    device: Device,
    path: PathBuf,
    frame: Frame,
}

impl DeviceTap {
    fn open(path: PathBuf) -> Result<Self> {
        let mut device = Device::open(&path).map_err(|e| {
            glide_error!(device_not_found, "Не удалось открыть устройство {:?}: {}", path, e)
        })?;

        device.grab().map_err(|e| {
            warn!("Не удалось захватить устройство {}: {}", path.display(), e);
            glide_error!(
                permission,
                "Не удалось захватить устройство эксклюзивно: {}. Device busy - скорее всего используется другим перехватчиком",
                e
            )
        })?;
        device.set_nonblocking(true)?;

        info!("Устройство: {} ({})", device.name().unwrap_or("Unknown"), path.display());
        info!("Устройство захвачено эксклюзивно");

        Ok(Self {
            device,
            path,
            frame: Frame::default(),
        })
    }

    fn fetch(&mut self) -> io::Result<Vec<evdev::InputEvent>> {
        Ok(self.device.fetch_events()?.collect())
    }

    fn regrab(&mut self) {
        let _ = self.device.ungrab();
        match self.device.grab() {
            Ok(()) => info!("Устройство {} захвачено повторно", self.path.display()),
            Err(e) => warn!("Не удалось повторно захватить {}: {}", self.path.display(), e),
        }
    }

    fn lock_flags(&self) -> ModifierFlags {
        let mut flags = ModifierFlags::empty();
        if let Ok(leds) = self.device.get_led_state() {
            if leds.contains(LedCode::LED_CAPSL) {
                flags |= ModifierFlags::CAPS_LOCK;
            }
            if leds.contains(LedCode::LED_NUML) {
                flags |= ModifierFlags::NUM_LOCK;
            }
        }
        flags
    }
}

impl Drop for DeviceTap {
    fn drop(&mut self) {
        info!("Освобождение захваченного устройства {}", self.path.display());
        if let Err(e) = self.device.ungrab() {
            error!("Не удалось освободить устройство: {}", e);
        }
    }
}

/// Перехват через evdev: эксклюзивный захват клавиатуры и мыши,
/// непоглощённые кадры уходят дальше через uinput.
pub struct EvdevInputSource {
    taps: Vec<DeviceTap>,
    virtual_device: VirtualDevice,
    modifiers: ModifierState,
    pointer: PointerLocation,
    control: Arc<GrabControl>,
}

impl EvdevInputSource {
    pub fn new(config: Arc<Config>, locator: Arc<dyn PointerLocator>) -> Result<Self> {
        info!("Инициализация EvdevInputSource");

        let keyboard_path = DeviceFinder::find_keyboard_device(&config.input.keyboard_device)?;
        let pointer_path = DeviceFinder::find_pointer_device(&config.input.pointer_device)?;

        let mut taps = vec![DeviceTap::open(keyboard_path.clone())?];
        if pointer_path != keyboard_path {
            taps.push(DeviceTap::open(pointer_path)?);
        }

        let virtual_device = VirtualDevice::new("Winglide Virtual Device", false)?;
        Ok(Self {
            taps,
            virtual_device,
            modifiers: ModifierState::new(),
            pointer: PointerLocation::new(locator),
            control: Arc::new(GrabControl::default()),
        })
    }

    fn process(&mut self, index: usize, event: evdev::InputEvent, tracker: &mut Tracker) {
        if let FrameStatus::Complete = self.taps[index].frame.push(event, &mut self.modifiers) {
            let frame = std::mem::take(&mut self.taps[index].frame);
            self.dispatch(frame, tracker);
        }
    }

    fn dispatch(&mut self, frame: Frame, tracker: &mut Tracker) {
        let absorb = match frame.kind() {
            Some(kind) => {
                let flags = self.modifiers.flags();
                let location = self.pointer.advance(kind, flags, frame.delta, tracker);

                let event = InputEvent::new(kind, flags, location, frame.delta);
                tracker.handle_event(&event)
            }
            None => {
                self.pointer.drift(frame.delta);
                false
            }
        };

        if absorb {
            debug_if_enabled!("Кадр из {} событий поглощён", frame.events.len());
            return;
        }

        if let Err(e) = self.virtual_device.send_frame(&frame.events) {
            error!("Не удалось переслать события: {}", e);
        }
    }

    /// Модификаторы всегда берутся с клавиатуры (первое устройство)
    fn resync_modifiers(&mut self) {
        let tap = &self.taps[0];
        match tap.device.get_key_state() {
            Ok(keys) => {
                let locks = tap.lock_flags();
                self.modifiers.resync(keys.iter(), locks);
                debug_if_enabled!("Модификаторы пересобраны: {}", self.modifiers.flags());
            }
            Err(e) => warn!("Не удалось прочитать состояние клавиш: {}", e),
        }
    }

    fn run_impl(mut self, mut tracker: Tracker, stop: Arc<AtomicBool>) -> Result<()> {
        info!("EvdevInputSource запущен, начинаем чтение событий");

        while !stop.load(Ordering::Acquire) {
            if self.control.take_request() {
                for tap in &mut self.taps {
                    tap.regrab();
                }
                self.resync_modifiers();
            }

            let mut idle = true;
            for index in 0..self.taps.len() {
                let events = match self.taps[index].fetch() {
                    Ok(events) => events,
                    Err(e) if e.kind() == io::ErrorKind::WouldBlock => continue,
                    Err(e) => {
                        error!("Ошибка чтения событий {}: {}", self.taps[index].path.display(), e);
                        tracker.handle_event(&InputEvent::tap_disabled(InputEventKind::TapDisabledUserInput));
                        std::thread::sleep(Duration::from_millis(100));
                        continue;
                    }
                };

                idle &= events.is_empty();
                trace_if_enabled!("Получено {} событий с {}", events.len(), self.taps[index].path.display());
                for event in events {
                    self.process(index, event, &mut tracker);
                }
            }

            // Небольшая задержка для предотвращения 100% загрузки CPU
            if idle {
                std::thread::sleep(Duration::from_millis(1));
            }
        }

        info!("EvdevInputSource остановлен");
        Ok(())
    }
}

impl InputSource for EvdevInputSource {
    fn tap_control(&self) -> Arc<dyn TapControl> {
        self.control.clone()
    }

    fn run(self: Box<Self>, tracker: Tracker, stop: Arc<AtomicBool>) -> Result<()> {
        (*self).run_impl(tracker, stop)
    }
}
