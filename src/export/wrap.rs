//! Splitting text into lines that fit a given width.

use crate::export::metrics::{char_width_mm, text_width_mm, Font};

/// Wrap `text` into lines no wider than `max_width_mm`.
///
/// Paragraphs (`\n`) wrap independently and an empty paragraph yields an
/// empty line. Words wider than the whole line are broken by character.
pub fn split_text_to_size(text: &str, font: Font, size_pt: f32, max_width_mm: f32) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines = Vec::new();
    for paragraph in normalized.split('\n') {
        wrap_paragraph(paragraph, font, size_pt, max_width_mm, &mut lines);
    }
    lines
}

fn wrap_paragraph(paragraph: &str, font: Font, size_pt: f32, max_width: f32, out: &mut Vec<String>) {
    let paragraph = paragraph.trim_end();
    if paragraph.is_empty() {
        out.push(String::new());
        return;
    }

    let space = char_width_mm(' ', font, size_pt);
    let mut line = String::new();
    let mut line_width = 0.0_f32;

    // Spaces before the first word of the paragraph are kept as indentation
    let mut leading = true;

    for (index, word) in paragraph.split(' ').enumerate() {
        // Runs of spaces produce empty words
        if word.is_empty() {
            if index > 0 && (leading || !line.is_empty()) && line_width + space <= max_width {
                line.push(' ');
                line_width += space;
            }
            continue;
        }
        leading = false;

        let word_width = text_width_mm(word, font, size_pt);
        let separator = if line.is_empty() { 0.0 } else { space };

        if line_width + separator + word_width <= max_width {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
            line_width += separator + word_width;
            continue;
        }

        if !line.trim_end().is_empty() {
            out.push(line.trim_end().to_string());
        }
        line.clear();
        line_width = 0.0;

        if word_width <= max_width {
            line.push_str(word);
            line_width = word_width;
        } else {
            for c in word.chars() {
                let w = char_width_mm(c, font, size_pt);
                if !line.is_empty() && line_width + w > max_width {
                    out.push(std::mem::take(&mut line));
                    line_width = 0.0;
                }
                line.push(c);
                line_width += w;
            }
        }
    }

    if !line.is_empty() {
        out.push(line.trim_end().to_string());
    }
}
