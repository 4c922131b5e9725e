//! Export module
//!
//! Preview pagination and PDF export of proposals:
//! - `preview`: height-estimated page splits and per-page preview views
//! - `layout`: metric-based flowed layout with headers, footers and branding
//! - `pdf`: serialization of a laid-out document

pub mod layout;
pub mod metrics;
pub mod pdf;
pub mod preview;
pub mod settings;
pub mod wrap;

pub use layout::layout_document;
pub use pdf::{write_pdf, PdfOptions};
pub use preview::{calculate_pages, render_preview_page, PreviewCursor, PreviewPage, PreviewPageView};
pub use settings::PdfExportSettings;

use crate::error::AppError;
use crate::proposal::Proposal;
use chrono::NaiveDate;
use tracing::debug;

/// A rendered PDF ready to be sent to the client
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Download name: every non-alphanumeric UTF-16 unit becomes `_`, then the ISO date
pub fn export_filename(title: &str, date: NaiveDate) -> String {
    let mut stem = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c);
        } else {
            stem.extend(std::iter::repeat('_').take(c.len_utf16()));
        }
    }
    format!("{}_{}.pdf", stem, date.format("%Y-%m-%d"))
}

/// Lay out and serialize a proposal
pub fn render_pdf(
    proposal: &Proposal,
    settings: &PdfExportSettings,
    date: NaiveDate,
    date_format: &str,
    options: &PdfOptions,
) -> Result<RenderedPdf, AppError> {
    settings.validate()?;

    let date_text = date.format(date_format).to_string();
    let document = layout_document(proposal, settings, &date_text);
    let bytes = write_pdf(&document, options)?;

    debug!(
        "Rendered '{}' to PDF: {} pages, {} bytes",
        proposal.title,
        document.pages.len(),
        bytes.len()
    );

    Ok(RenderedPdf {
        filename: export_filename(&proposal.title, date),
        page_count: document.pages.len(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposal::{Section, SectionType};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename("Q4 Plan: Café & Co.", date()), "Q4_Plan__Caf____Co__2026-10-18.pdf");
        assert_eq!(export_filename("  Plan ", date()), "__Plan__2026-10-18.pdf");
        assert_eq!(export_filename("Launch \u{1f680}", date()), "Launch____2026-10-18.pdf");
    }

    #[test]
    fn test_render_pdf_uses_date_format() {
        let proposal = Proposal::new("Plan", vec![Section::new("A", "b", SectionType::Text)]);
        let options = PdfOptions {
            compress: false,
            ..Default::default()
        };
        let rendered = render_pdf(&proposal, &PdfExportSettings::default(), date(), "%d.%m.%Y", &options).unwrap();
        assert_eq!(rendered.page_count, 1);
        assert_eq!(rendered.filename, "Plan_2026-10-18.pdf");
        let needle = b"(18.10.2026) Tj";
        assert!(rendered.bytes.windows(needle.len()).any(|w| w == needle));
    }

    #[test]
    fn test_render_pdf_rejects_bad_margins() {
        let proposal = Proposal::new("Plan", vec![]);
        let mut settings = PdfExportSettings::default();
        settings.margins.top = 200.0;
        settings.margins.bottom = 100.0;
        let result = render_pdf(&proposal, &settings, date(), "%Y", &PdfOptions::default());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
