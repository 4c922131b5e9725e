//! Flowed document layout
//!
//! Turns a proposal into pages of positioned draw operations. Text is
//! measured with the built-in font metrics and wrapped to the content width;
//! a page break happens whenever the cursor passes the last line that still
//! fits above the bottom margin. Coordinates are millimetres from the top
//! left corner of the page, with `y` on the text baseline.

use crate::export::metrics::{text_width_mm, Font};
use crate::export::settings::{HexColor, PdfExportSettings};
use crate::export::wrap::split_text_to_size;
use crate::proposal::Proposal;
use serde::Serialize;

pub const LINE_HEIGHT: f32 = 7.0;
pub const TITLE_SPACING: f32 = 10.0;
pub const SECTION_SPACING: f32 = 15.0;
pub const HEADER_BASELINE: f32 = 15.0;
pub const HEADER_RULE_Y: f32 = 20.0;
pub const RULE_WIDTH: f32 = 0.2;

pub const HEADER_SIZE: f32 = 10.0;
pub const TITLE_SIZE: f32 = 20.0;
pub const SECTION_TITLE_SIZE: f32 = 16.0;
pub const BODY_SIZE: f32 = 12.0;

const HEADER_COLOR: HexColor = HexColor::gray(100);
const FOOTER_COLOR: HexColor = HexColor::gray(150);
const BODY_COLOR: HexColor = HexColor::gray(80);
const RULE_COLOR: HexColor = HexColor::gray(200);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        text: String,
        font: Font,
        size: f32,
        color: HexColor,
    },
    Rule {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: HexColor,
        width: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaidOutPage {
    pub number: usize,
    pub ops: Vec<DrawOp>,
}

#[cfg(test)]
impl LaidOutPage {
    /// Text runs on this page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Rule { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaidOutDocument {
    pub title: String,
    pub width_mm: f32,
    pub height_mm: f32,
    pub pages: Vec<LaidOutPage>,
}

enum Align {
    Left,
    Center,
    Right,
}

/// Cursor state while flowing content onto pages
struct Flow<'a> {
    settings: &'a PdfExportSettings,
    date_text: &'a str,
    width: f32,
    height: f32,
    pages: Vec<LaidOutPage>,
    y: f32,
}

impl<'a> Flow<'a> {
    fn new(settings: &'a PdfExportSettings, date_text: &'a str) -> Self {
        let (width, height) = settings.page_size_mm();
        let mut flow = Self {
            settings,
            date_text,
            width,
            height,
            pages: Vec::new(),
            y: settings.margins.top,
        };
        flow.start_page();
        flow
    }

    fn left(&self) -> f32 {
        self.settings.margins.left
    }

    fn right(&self) -> f32 {
        self.width - self.settings.margins.right
    }


    fn page(&mut self) -> &mut LaidOutPage {
        let index = self.pages.len() - 1;
        &mut self.pages[index]
    }

    fn text(&mut self, text: &str, x: f32, y: f32, font: Font, size: f32, color: HexColor, align: Align) {
        let x = match align {
            Align::Left => x,
            Align::Center => x - text_width_mm(text, font, size) / 2.0,
            Align::Right => x - text_width_mm(text, font, size),
        };
        self.page().ops.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            font,
            size,
            color,
        });
    }

    fn start_page(&mut self) {
        self.pages.push(LaidOutPage {
            number: self.pages.len() + 1,
            ops: Vec::new(),
        });
        self.y = self.settings.margins.top;
        self.draw_header();
    }

    fn draw_header(&mut self) {
        let settings = self.settings;
        let header = &settings.header;
        let (left, right) = (self.left(), self.right());
        let custom = header.custom_text.trim();
        if !custom.is_empty() {
            let center = (left + right) / 2.0;
            self.text(custom, center, HEADER_BASELINE, Font::Helvetica, HEADER_SIZE, HEADER_COLOR, Align::Center);
        }
        if !header.enabled {
            return;
        }
        let number = self.pages.len();

        if header.include_date {
            let date = self.date_text;
            self.text(date, left, HEADER_BASELINE, Font::Helvetica, HEADER_SIZE, HEADER_COLOR, Align::Left);
        }
        if header.include_page_number {
            let label = format!("Page {}", number);
            self.text(&label, right, HEADER_BASELINE, Font::Helvetica, HEADER_SIZE, HEADER_COLOR, Align::Right);
        }
        self.page().ops.push(DrawOp::Rule {
            x1: left,
            y1: HEADER_RULE_Y,
            x2: right,
            y2: HEADER_RULE_Y,
            color: RULE_COLOR,
            width: RULE_WIDTH,
        });
    }

    fn draw_footer(&mut self) {
        let settings = self.settings;
        let footer = &settings.footer;
        if !footer.enabled {
            return;
        }
        let y = self.height - settings.margins.bottom;
        let (left, right) = (self.left(), self.right());

        let company = footer.company_name.trim();
        if !company.is_empty() {
            let label = format!("\u{a9} {}", company);
            self.text(&label, left, y, Font::Helvetica, HEADER_SIZE, FOOTER_COLOR, Align::Left);
        }
        if footer.include_confidential {
            self.text("Confidential", right, y, Font::Helvetica, HEADER_SIZE, FOOTER_COLOR, Align::Right);
        }
    }

    /// Lowest baseline that may still receive a line
    fn break_threshold(&self) -> f32 {
        self.height - self.settings.margins.bottom - LINE_HEIGHT
    }

    fn ensure_room(&mut self) {
        if self.y > self.break_threshold() {
            self.draw_footer();
            self.start_page();
        }
    }

    fn lines(&mut self, text: &str, font: Font, size: f32, color: HexColor) {
        let width = self.settings.content_width_mm();
        for line in split_text_to_size(text, font, size, width) {
            self.ensure_room();
            if !line.is_empty() {
                let (x, y) = (self.left(), self.y);
                self.text(&line, x, y, font, size, color, Align::Left);
            }
            self.y += LINE_HEIGHT;
        }
    }

    fn finish(mut self) -> Vec<LaidOutPage> {
        self.draw_footer();
        self.pages
    }
}

/// Lay out a proposal for export. `date_text` is printed in page headers.
pub fn layout_document(proposal: &Proposal, settings: &PdfExportSettings, date_text: &str) -> LaidOutDocument {
    let mut flow = Flow::new(settings, date_text);
    let primary = settings.branding.primary_color;
    let accent = settings.branding.accent_color;

    // Title: wrapped, then one title gap below its last line
    flow.lines(&proposal.title, Font::HelveticaBold, TITLE_SIZE, primary);
    flow.y += TITLE_SPACING;

    for section in &proposal.sections {
        flow.ensure_room();
        flow.lines(&section.title, Font::HelveticaBold, SECTION_TITLE_SIZE, accent);
        flow.lines(&section.content, Font::Helvetica, BODY_SIZE, BODY_COLOR);
        flow.y += SECTION_SPACING;
    }

    let (width_mm, height_mm) = (flow.width, flow.height);
    LaidOutDocument {
        title: proposal.title.clone(),
        width_mm,
        height_mm,
        pages: flow.finish(),
    }
}
