use super::r#trait::TextAccessor;
use crate::error::Result;
use tracing::info;

pub struct DryRunTextAccessor;

impl DryRunTextAccessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DryRunTextAccessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextAccessor for DryRunTextAccessor {
    fn selected_text(&self) -> Option<String> {
        info!("[DRY RUN] Чтение выделенного текста");
        None
    }

    fn set_selected_text(&self, text: &str) -> Result<()> {
        info!("[DRY RUN] Замена выделенного текста на '{}'", text);
        Ok(())
    }
}
