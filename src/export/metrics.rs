//! Font metrics for the two built-in PDF fonts.
//!
//! Advance widths are in 1/1000 em for every character WinAnsiEncoding can
//! draw: printable ASCII, the Latin-1 block U+00A0..U+00FF and the
//! punctuation placed in 0x80..0x9F. Anything else uses an average width.

use serde::Serialize;

/// Millimetres per PostScript point
pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Width used for characters without a table entry
const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// U+00A0 (no-break space) through U+00FF
#[rustfmt::skip]
const HELVETICA_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
const HELVETICA_BOLD_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// The fonts the layout engine draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    /// PostScript base font name
    pub fn base_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Resource name used inside page content streams
    pub fn resource_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    fn table(&self) -> &'static [u16; 95] {
        match self {
            Font::Helvetica => &HELVETICA,
            Font::HelveticaBold => &HELVETICA_BOLD,
        }
    }

    fn latin1_table(&self) -> &'static [u16; 96] {
        match self {
            Font::Helvetica => &HELVETICA_LATIN1,
            Font::HelveticaBold => &HELVETICA_BOLD_LATIN1,
        }
    }

    /// Advance width of one character in 1/1000 em
    pub fn char_units(&self, c: char) -> u16 {
        let bold = *self == Font::HelveticaBold;
        match c as u32 {
            code @ 0x20..=0x7e => self.table()[(code - 0x20) as usize],
            code @ 0xa0..=0xff => self.latin1_table()[(code - 0xa0) as usize],
            _ => match c {
                '\u{2013}' | '\u{20ac}' => 556,
                '\u{2014}' | '\u{2026}' | '\u{2030}' | '\u{0152}' => 1000,
                '\u{2018}' | '\u{2019}' | '\u{201a}' => if bold { 278 } else { 222 },
                '\u{201c}' | '\u{201d}' | '\u{201e}' => if bold { 500 } else { 333 },
                '\u{2022}' => 350,
                '\u{2020}' | '\u{2021}' => 556,
                '\u{2039}' | '\u{203a}' => 333,
                '\u{2122}' => 1000,
                _ => FALLBACK_WIDTH,
            },
        }
    }

    /// Advance width of a string in 1/1000 em
    pub fn text_units(&self, text: &str) -> u32 {
        text.chars().map(|c| self.char_units(c) as u32).sum()
    }
}

/// Rendered width of `text` in millimetres at `size_pt`
pub fn text_width_mm(text: &str, font: Font, size_pt: f32) -> f32 {
    font.text_units(text) as f32 / 1000.0 * size_pt * MM_PER_PT
}

/// Rendered width of a single character in millimetres
pub fn char_width_mm(c: char, font: Font, size_pt: f32) -> f32 {
    font.char_units(c) as f32 / 1000.0 * size_pt * MM_PER_PT
}
