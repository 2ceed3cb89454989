pub mod engine;
pub mod input_source;
pub mod settings_watcher;
pub mod text_accessor;
pub mod virtual_device;
pub mod window_accessor;

pub use engine::EngineController;
pub use settings_watcher::SettingsWatcher;
pub use virtual_device::VirtualDevice;
