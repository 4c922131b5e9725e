//! Print preview pagination
//!
//! The preview estimates content height from character counts instead of
//! measuring text, which keeps it cheap enough to recompute on every edit.
//! A page breaks when the next section would push the running height past
//! the page height.

use crate::error::AppError;
use crate::export::settings::{HexColor, PdfExportSettings};
use crate::proposal::{Proposal, Section};
use serde::Serialize;

/// Default estimated page height
pub const DEFAULT_PAGE_HEIGHT: u32 = 800;
/// Estimated height of the document title block
pub const TITLE_HEIGHT: u32 = 60;
/// Fixed part of a section's estimated height
pub const SECTION_BASE_HEIGHT: u32 = 40;
/// Characters of content per unit of estimated height
pub const CHARS_PER_UNIT: u32 = 4;
/// Characters shown in a preview excerpt
pub const EXCERPT_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewItem {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPage {
    pub page_number: usize,
    pub content: Vec<PreviewItem>,
}

/// Estimated height of one section
pub fn section_height(section: &Section) -> u32 {
    let chars = section.content.chars().count() as u32;
    SECTION_BASE_HEIGHT + chars.div_ceil(CHARS_PER_UNIT)
}

/// Split a proposal into preview pages of `page_height` estimated units
pub fn calculate_pages(proposal: &Proposal, page_height: u32) -> Vec<PreviewPage> {
    let mut pages = vec![PreviewPage {
        page_number: 1,
        content: vec![PreviewItem {
            title: proposal.title.clone(),
            content: String::new(),
        }],
    }];
    let mut used = TITLE_HEIGHT;

    for section in &proposal.sections {
        let height = section_height(section);
        let current_is_empty = pages.last().map_or(true, |p| p.content.is_empty());

        if used + height > page_height && !current_is_empty {
            pages.push(PreviewPage {
                page_number: pages.len() + 1,
                content: Vec::new(),
            });
            used = 0;
        }

        if let Some(page) = pages.last_mut() {
            page.content.push(PreviewItem {
                title: section.title.clone(),
                content: section.content.clone(),
            });
        }
        used += height;
    }

    pages
}

/// Heading style of a preview item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HeadingLevel {
    /// The proposal title on the first page
    Document,
    Section,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewHeader {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewFooter {
    pub company_name: String,
    pub confidential: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewBlock {
    pub heading: String,
    pub level: HeadingLevel,
    pub color: HexColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

/// Everything needed to draw one page of the preview
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPageView {
    pub page_number: usize,
    pub total_pages: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<PreviewHeader>,
    pub blocks: Vec<PreviewBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<PreviewFooter>,
}

/// First `EXCERPT_CHARS` characters followed by an ellipsis
pub fn excerpt(content: &str) -> Option<String> {
    if content.is_empty() {
        return None;
    }
    let head: String = content.chars().take(EXCERPT_CHARS).collect();
    Some(format!("{}...", head))
}

/// Build the view of one (1-based) preview page
pub fn render_preview_page(
    pages: &[PreviewPage],
    page_number: usize,
    settings: &PdfExportSettings,
    date_text: &str,
) -> Result<PreviewPageView, AppError> {
    let page = page_number
        .checked_sub(1)
        .and_then(|i| pages.get(i))
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Preview page {} does not exist ({} pages)",
                page_number,
                pages.len()
            ))
        })?;

    // Custom text is shown even when the date/page header row is disabled
    let header_options = &settings.header;
    let custom_text = Some(header_options.custom_text.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    let header = (header_options.enabled || custom_text.is_some()).then(|| PreviewHeader {
        date: (header_options.enabled && header_options.include_date).then(|| date_text.to_string()),
        page_label: (header_options.enabled && header_options.include_page_number)
            .then(|| format!("Page {}", page_number)),
        custom_text,
    });

    let blocks = page
        .content
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let is_document_title = index == 0 && page_number == 1;
            PreviewBlock {
                heading: item.title.clone(),
                level: if is_document_title {
                    HeadingLevel::Document
                } else {
                    HeadingLevel::Section
                },
                color: if is_document_title {
                    settings.branding.primary_color
                } else {
                    settings.branding.accent_color
                },
                excerpt: excerpt(&item.content),
            }
        })
        .collect();

    let footer = settings.footer.enabled.then(|| PreviewFooter {
        company_name: settings.footer.company_name.clone(),
        confidential: settings.footer.include_confidential,
    });

    Ok(PreviewPageView {
        page_number,
        total_pages: pages.len(),
        header,
        blocks,
        footer,
    })
}

/// Page navigation state of the preview pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewCursor {
    current: usize,
    total: usize,
}

impl PreviewCursor {
    pub fn new(total: usize) -> Self {
        Self {
            current: 1,
            total: total.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total
    }

    pub fn previous(&mut self) -> usize {
        self.current = self.current.saturating_sub(1).max(1);
        self.current
    }

    pub fn next(&mut self) -> usize {
        self.current = (self.current + 1).min(self.total);
        self.current
    }

    /// Jump to a page, clamped into range
    pub fn go_to(&mut self, page: usize) -> usize {
        self.current = page.clamp(1, self.total);
        self.current
    }
}
