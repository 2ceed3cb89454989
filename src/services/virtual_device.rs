use crate::error::Result;
use crate::glide_error;
use tracing::{debug, info};
use uinput::event::relative::{Position, Wheel};
use uinput::event::{Controller, Keyboard, Relative};

/// Виртуальное устройство, через которое непоглощённые события уходят дальше в систему
pub struct VirtualDevice {
    device: Option<uinput::Device>,
    device_name: String,
    dry_run: bool,
}

impl VirtualDevice {
    pub fn new(device_name: &str, dry_run: bool) -> Result<Self> {
        info!("Инициализация VirtualDevice '{}' (dry_run: {})", device_name, dry_run);

        let device = if dry_run {
            None
        } else {
            Some(Self::create_virtual_device(device_name)?)
        };

        Ok(Self {
            device,
            device_name: device_name.to_string(),
            dry_run,
        })
    }

    fn create_virtual_device(device_name: &str) -> Result<uinput::Device> {
        info!("Создание виртуального устройства uinput '{}' для клавиатуры и мыши", device_name);

        let virtual_device = uinput::default()?
            .name(device_name)?
            .event(Keyboard::All)?
            .event(Controller::All)?
            .event(Relative::Position(Position::X))?
            .event(Relative::Position(Position::Y))?
            .event(Relative::Wheel(Wheel::Vertical))?
            .event(Relative::Wheel(Wheel::Horizontal))?
            .create()
            .map_err(|e| glide_error!(internal, "Не удалось создать виртуальное устройство '{}': {}", device_name, e))?;

        info!("Виртуальное устройство '{}' создано успешно", device_name);
        Ok(virtual_device)
    }

    /// Переслать кадр событий (всё до SYN_REPORT) и синхронизировать
    pub fn send_frame(&mut self, events: &[evdev::InputEvent]) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        if self.dry_run {
            debug!("[DRY RUN] Пересылка {} событий", events.len());
            return Ok(());
        }

        let Some(device) = &mut self.device else {
            return Err(glide_error!(internal, "Виртуальное устройство недоступно"));
        };

        for event in events {
            device
                .write(event.event_type().0 as i32, event.code() as i32, event.value())
                .map_err(|e| glide_error!(internal, "Не удалось отправить событие {:?}: {}", event, e))?;
        }

        device
            .synchronize()
            .map_err(|e| glide_error!(internal, "Не удалось синхронизировать события: {}", e))?;

        Ok(())
    }
}

impl Drop for VirtualDevice {
    fn drop(&mut self) {
        if !self.dry_run {
            info!("Закрытие виртуального устройства '{}'", self.device_name);
        }
    }
}
