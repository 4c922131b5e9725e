//! Preview and export DTOs

use crate::export::{PdfExportSettings, PreviewPage, PreviewPageView};
use crate::proposal::SectionDraft;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request for one (1-based) preview page
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    #[serde(default = "first_page")]
    pub page: usize,
    #[serde(default)]
    pub settings: Option<PdfExportSettings>,
}

fn first_page() -> usize {
    1
}

/// Request to export a stored proposal
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(default)]
    pub settings: Option<PdfExportSettings>,
}

/// A proposal supplied inline for stateless export
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InlineProposal {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(nested)]
    #[serde(default)]
    pub sections: Vec<SectionDraft>,
}

/// Stateless export: proposal and settings in one body
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InlineExportRequest {
    #[validate(nested)]
    pub proposal: InlineProposal,
    #[serde(default)]
    pub settings: Option<PdfExportSettings>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagesResponse {
    pub total_pages: usize,
    pub pages: Vec<PreviewPage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub page: PreviewPageView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<usize>,
}
