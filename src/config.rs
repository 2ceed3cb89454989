use crate::events::ModifierFlags;
use crate::mappings::ModifierNames;
use crate::tracker::{Mode, ModifierMatcher, TrackerSettings};
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Верхняя граница интервала записи геометрии
const MAX_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub input: InputConfig,
    pub modifiers: ModifiersConfig,
    pub tracking: TrackingConfig,
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    /// "auto" или путь к event-устройству
    pub keyboard_device: String,
    pub pointer_device: String,
}

/// Наборы модификаторов для каждого режима. Пустой список выключает режим.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModifiersConfig {
    #[serde(rename = "move")]
    pub move_set: Vec<String>,
    #[serde(rename = "resize")]
    pub resize_set: Vec<String>,
    #[serde(rename = "capitalize")]
    pub capitalize_set: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub resize_from_nearest_corner: bool,
    pub move_interval_ms: u64,
    pub resize_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// auto | x11 | wayland
    pub text: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            filter: "winglide=info".to_string(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            keyboard_device: "auto".to_string(),
            pointer_device: "auto".to_string(),
        }
    }
}

impl Default for ModifiersConfig {
    fn default() -> Self {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            move_set: names(&["ctrl", "alt"]),
            resize_set: names(&["ctrl", "alt", "shift"]),
            capitalize_set: names(&["ctrl", "super"]),
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            resize_from_nearest_corner: false,
            move_interval_ms: 10,
            resize_interval_ms: 20,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            text: "auto".to_string(),
        }
    }
}

impl ModifiersConfig {
    fn names_for(&self, mode: Mode) -> &[String] {
        match mode {
            Mode::Move => &self.move_set,
            Mode::Resize => &self.resize_set,
            Mode::Capitalize => &self.capitalize_set,
        }
    }

    fn parse(&self, mode: Mode) -> Result<ModifierFlags> {
        ModifierNames::parse_set(self.names_for(mode))
            .map_err(|name| anyhow::anyhow!("Неверный модификатор '{}' в режиме {}", name, mode))
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::new()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("WINGLIDE_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        match self.backend.text.as_str() {
            "auto" | "x11" | "wayland" => {}
            _ => anyhow::bail!("Неверный бэкенд текста: {}", self.backend.text),
        }

        if self.tracking.move_interval_ms > MAX_INTERVAL_MS {
            anyhow::bail!("move_interval_ms должно быть не больше {}", MAX_INTERVAL_MS);
        }
        if self.tracking.resize_interval_ms > MAX_INTERVAL_MS {
            anyhow::bail!("resize_interval_ms должно быть не больше {}", MAX_INTERVAL_MS);
        }

        // Валидация наборов модификаторов
        let mut enabled: Vec<(Mode, ModifierFlags)> = Vec::new();
        for mode in Mode::PRIORITY {
            let set = self.modifiers.parse(mode)?;
            if set.is_empty() {
                continue;
            }
            if let Some((earlier, _)) = enabled.iter().find(|(_, other)| *other == set) {
                warn!(
                    "Режимы {} и {} используют одинаковый набор {}, {} никогда не сработает",
                    earlier, mode, set, mode
                );
            }
            enabled.push((mode, set));
        }

        Ok(())
    }

    /// Снимок настроек для трекера
    pub fn tracker_settings(&self) -> Result<TrackerSettings> {
        let matcher = ModifierMatcher::new(
            self.modifiers.parse(Mode::Move)?,
            self.modifiers.parse(Mode::Resize)?,
            self.modifiers.parse(Mode::Capitalize)?,
        );

        Ok(TrackerSettings {
            matcher,
            resize_from_nearest_corner: self.tracking.resize_from_nearest_corner,
            move_interval: Duration::from_millis(self.tracking.move_interval_ms),
            resize_interval: Duration::from_millis(self.tracking.resize_interval_ms),
        })
    }
}
