//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::config::ExportConfig;
use crate::export::{PdfExportSettings, PdfOptions};
use crate::proposal::ProposalStore;
use chrono::{Local, NaiveDate};
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Working copies of proposals (has internal locking)
    pub proposals: ProposalStore,

    /// Export defaults from configuration
    pub export: ExportConfig,
}

impl AppState {
    pub fn new(export: ExportConfig) -> Self {
        Self {
            proposals: ProposalStore::new(),
            export,
        }
    }

    /// Fill in configured defaults for a request's export settings
    pub fn export_settings(&self, requested: Option<PdfExportSettings>) -> PdfExportSettings {
        let mut settings = match requested {
            Some(settings) => settings,
            None => {
                let mut settings = PdfExportSettings::default();
                settings.footer.company_name = self.export.company_name.clone();
                settings
            }
        };
        if settings.footer.company_name.trim().is_empty() {
            settings.footer.company_name = self.export.company_name.clone();
        }
        settings
    }

    /// Serializer options for the given settings
    pub fn pdf_options(&self, settings: &PdfExportSettings) -> PdfOptions {
        PdfOptions {
            compress: settings.compress.unwrap_or(self.export.compress),
            ..Default::default()
        }
    }

    /// Date printed in headers
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn date_text(&self, date: NaiveDate) -> String {
        date.format(&self.export.date_format).to_string()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
