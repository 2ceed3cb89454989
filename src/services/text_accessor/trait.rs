use crate::config::Config;
use crate::error::Result;
use std::sync::Arc;

/// Чтение и замена выделенного текста в активном приложении
pub trait TextAccessor: Send + Sync {
    /// `None`, если выделения нет или доступ к нему невозможен
    fn selected_text(&self) -> Option<String>;
    fn set_selected_text(&self, text: &str) -> Result<()>;
}

/// Factory function to create an appropriate text accessor based on the dry_run flag
pub fn create_text_accessor(config: &Config, dry_run: bool) -> Arc<dyn TextAccessor> {
    if dry_run {
        Arc::new(super::dry_run::DryRunTextAccessor::new())
    } else {
        let session = super::selection::SelectionSession::resolve(&config.backend.text);
        Arc::new(super::selection::SelectionTextAccessor::new(session))
    }
}
