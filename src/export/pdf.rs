//! PDF serializer
//!
//! Writes a laid-out document as a PDF 1.4 file using the standard Type1
//! Helvetica fonts, so no font data has to be embedded.

use crate::error::AppError;
use crate::export::layout::{DrawOp, LaidOutDocument};
use crate::export::metrics::{Font, MM_PER_PT};
use crate::export::settings::HexColor;
use chrono::{DateTime, Utc};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use sha2::{Digest, Sha256};
use std::io::Write;

const CATALOG: usize = 1;
const PAGES: usize = 2;
const FONT_REGULAR: usize = 3;
const FONT_BOLD: usize = 4;
const INFO: usize = 5;
const FIRST_PAGE_OBJECT: usize = 6;

/// Serializer options
#[derive(Debug, Clone)]
pub struct PdfOptions {
    pub compress: bool,
    pub producer: String,
    pub created_at: DateTime<Utc>,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            compress: true,
            producer: format!("proposal-press {}", env!("CARGO_PKG_VERSION")),
            created_at: Utc::now(),
        }
    }
}

/// Map a character to its WinAnsiEncoding byte
pub fn win_ansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '\t' => b' ',
        '\u{20ac}' => 0x80,
        '\u{201a}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201e}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02c6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8a,
        '\u{2039}' => 0x8b,
        '\u{0152}' => 0x8c,
        '\u{017d}' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02dc}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9a,
        '\u{203a}' => 0x9b,
        '\u{0153}' => 0x9c,
        '\u{017e}' => 0x9e,
        '\u{0178}' => 0x9f,
        _ => b'?',
    }
}

/// Encode text as a PDF literal string, including the parentheses
pub fn literal_string(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 2);
    out.push(b'(');
    for c in text.chars() {
        match win_ansi_byte(c) {
            b @ (b'(' | b')' | b'\\') => {
                out.push(b'\\');
                out.push(b);
            }
            b if b >= 0x80 => out.extend_from_slice(format!("\\{:03o}", b).as_bytes()),
            b => out.push(b),
        }
    }
    out.push(b')');
    out
}

/// Compact number formatting for content streams
fn num(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let s = format!("{:.2}", rounded);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn pt(mm: f32) -> f32 {
    mm / MM_PER_PT
}

fn color_triplet(color: HexColor) -> String {
    let (r, g, b) = color.unit();
    format!("{} {} {}", num(r), num(g), num(b))
}

/// Build the content stream of one page
fn content_stream(ops: &[DrawOp], page_height_mm: f32) -> Vec<u8> {
    let mut out = Vec::new();
    for op in ops {
        match op {
            DrawOp::Text {
                x,
                y,
                text,
                font,
                size,
                color,
            } => {
                out.extend_from_slice(
                    format!(
                        "BT /{} {} Tf {} rg {} {} Td ",
                        font.resource_name(),
                        num(*size),
                        color_triplet(*color),
                        num(pt(*x)),
                        num(pt(page_height_mm - *y)),
                    )
                    .as_bytes(),
                );
                out.extend_from_slice(&literal_string(text));
                out.extend_from_slice(b" Tj ET\n");
            }
            DrawOp::Rule {
                x1,
                y1,
                x2,
                y2,
                color,
                width,
            } => {
                out.extend_from_slice(
                    format!(
                        "q {} RG {} w {} {} m {} {} l S Q\n",
                        color_triplet(*color),
                        num(pt(*width)),
                        num(pt(*x1)),
                        num(pt(page_height_mm - *y1)),
                        num(pt(*x2)),
                        num(pt(page_height_mm - *y2)),
                    )
                    .as_bytes(),
                );
            }
        }
    }
    out
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| AppError::Render(format!("Failed to compress page content: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| AppError::Render(format!("Failed to compress page content: {}", e)))
}

/// Byte buffer that records object offsets as objects are written
struct ObjectWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl ObjectWriter {
    fn new(object_count: usize) -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");
        Self {
            buf,
            offsets: vec![0; object_count + 1],
        }
    }

    fn object(&mut self, id: usize, body: &[u8]) {
        self.offsets[id] = self.buf.len();
        self.buf.extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, id: usize, data: &[u8], compressed: bool) {
        let mut body = Vec::with_capacity(data.len() + 64);
        let filter = if compressed { " /Filter /FlateDecode" } else { "" };
        body.extend_from_slice(format!("<< /Length {}{} >>\nstream\n", data.len(), filter).as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\nendstream");
        self.object(id, &body);
    }

    fn finish(mut self) -> Vec<u8> {
        let xref_offset = self.buf.len();
        let digest = Sha256::digest(&self.buf);
        let id: String = digest[..16].iter().map(|b| format!("{:02x}", b)).collect();

        let size = self.offsets.len();
        self.buf.extend_from_slice(format!("xref\n0 {}\n", size).as_bytes());
        self.buf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &self.offsets[1..] {
            self.buf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        self.buf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R /ID [<{}> <{}>] >>\nstartxref\n{}\n%%EOF\n",
                size, CATALOG, INFO, id, id, xref_offset
            )
            .as_bytes(),
        );
        self.buf
    }
}

fn font_object(font: Font) -> Vec<u8> {
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
        font.base_name()
    )
    .into_bytes()
}

/// Serialize a laid-out document to PDF bytes
pub fn write_pdf(doc: &LaidOutDocument, options: &PdfOptions) -> Result<Vec<u8>, AppError> {
    if doc.pages.is_empty() {
        return Err(AppError::Render("Document has no pages".to_string()));
    }

    let page_count = doc.pages.len();
    let object_count = FIRST_PAGE_OBJECT - 1 + page_count * 2;
    let mut writer = ObjectWriter::new(object_count);

    let page_ids: Vec<usize> = (0..page_count).map(|i| FIRST_PAGE_OBJECT + i * 2).collect();

    writer.object(CATALOG, format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES).as_bytes());

    let kids: Vec<String> = page_ids.iter().map(|id| format!("{} 0 R", id)).collect();
    writer.object(
        PAGES,
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), page_count).as_bytes(),
    );

    writer.object(FONT_REGULAR, &font_object(Font::Helvetica));
    writer.object(FONT_BOLD, &font_object(Font::HelveticaBold));

    let mut info = Vec::new();
    info.extend_from_slice(b"<< /Title ");
    info.extend_from_slice(&literal_string(&doc.title));
    info.extend_from_slice(b" /Producer ");
    info.extend_from_slice(&literal_string(&options.producer));
    info.extend_from_slice(
        format!(
            " /CreationDate (D:{}Z) >>",
            options.created_at.format("%Y%m%d%H%M%S")
        )
        .as_bytes(),
    );
    writer.object(INFO, &info);

    let media_box = format!("[0 0 {} {}]", num(pt(doc.width_mm)), num(pt(doc.height_mm)));
    for (page, page_id) in doc.pages.iter().zip(&page_ids) {
        let contents_id = page_id + 1;
        writer.object(
            *page_id,
            format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox {} /Resources << /Font << /{} {} 0 R /{} {} 0 R >> >> /Contents {} 0 R >>",
                PAGES,
                media_box,
                Font::Helvetica.resource_name(),
                FONT_REGULAR,
                Font::HelveticaBold.resource_name(),
                FONT_BOLD,
                contents_id
            )
            .as_bytes(),
        );

        let raw = content_stream(&page.ops, doc.height_mm);
        if options.compress {
            let packed = deflate(&raw)?;
            writer.stream(contents_id, &packed, true);
        } else {
            writer.stream(contents_id, &raw, false);
        }
    }

    Ok(writer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::layout::{layout_document, LaidOutPage};
    use crate::export::settings::PdfExportSettings;
    use crate::proposal::{Proposal, Section, SectionType};
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    fn options(compress: bool) -> PdfOptions {
        PdfOptions {
            compress,
            producer: "test".to_string(),
            created_at: DateTime::parse_from_rfc3339("2026-10-18T09:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    fn sample_doc() -> LaidOutDocument {
        let proposal = Proposal::new(
            "Café (draft)",
            vec![Section::new("Scope", "Design \u{2013} build \\ ship", SectionType::Text)],
        );
        layout_document(&proposal, &PdfExportSettings::default(), "10/18/2026")
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[test]
    fn test_literal_string_escaping() {
        assert_eq!(literal_string("a(b)c\\"), b"(a\\(b\\)c\\\\)".to_vec());
        assert_eq!(literal_string("\u{a9} Acme"), b"(\\251 Acme)".to_vec());
        assert_eq!(literal_string("\u{2014}"), b"(\\227)".to_vec());
        assert_eq!(literal_string("\u{4e2d}"), b"(?)".to_vec());
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(num(12.0), "12");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(841.889), "841.89");
        assert_eq!(num(-0.001), "0");
    }

    #[test]
    fn test_uncompressed_structure() {
        let pdf = write_pdf(&sample_doc(), &options(false)).unwrap();
        assert!(pdf.starts_with(b"%PDF-1.4\n"));
        assert!(pdf.ends_with(b"%%EOF\n"));
        assert!(find(&pdf, b"/BaseFont /Helvetica-Bold").is_some());
        assert!(find(&pdf, b"/Count 1").is_some());
        assert!(find(&pdf, b"/MediaBox [0 0 595.28 841.89]").is_some());
        assert!(find(&pdf, b"(Caf\\351 \\(draft\\)) Tj").is_some());
        assert!(find(&pdf, b"(Design \\226 build \\\\ ship) Tj").is_some());
        assert!(find(&pdf, b"/CreationDate (D:20261018093000Z)").is_some());
        assert!(find(&pdf, b"/FlateDecode").is_none());
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let pdf = write_pdf(&sample_doc(), &options(false)).unwrap();
        let text = String::from_utf8_lossy(&pdf);
        let startxref = text.rfind("startxref\n").unwrap();
        let xref_offset: usize = text[startxref + 10..].lines().next().unwrap().parse().unwrap();
        assert!(pdf[xref_offset..].starts_with(b"xref\n"));

        let table = String::from_utf8_lossy(&pdf[xref_offset..]);
        let entries: Vec<&str> = table.lines().skip(3).take_while(|l| !l.starts_with("trailer")).collect();
        assert_eq!(entries.len(), 7);
        for (i, entry) in entries.iter().enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            let expected = format!("{} 0 obj", i + 1);
            assert!(pdf[offset..].starts_with(expected.as_bytes()), "object {}", i + 1);
        }
    }

    #[test]
    fn test_compressed_stream_inflates_to_content() {
        let doc = sample_doc();
        let pdf = write_pdf(&doc, &options(true)).unwrap();
        let marker = find(&pdf, b"/Filter /FlateDecode >>\nstream\n").unwrap();
        let header = String::from_utf8_lossy(&pdf[..marker]);
        let length: usize = header
            .rsplit("/Length ")
            .next()
            .unwrap()
            .trim()
            .parse()
            .unwrap();
        let start = marker + b"/Filter /FlateDecode >>\nstream\n".len();
        let mut inflated = Vec::new();
        ZlibDecoder::new(&pdf[start..start + length])
            .read_to_end(&mut inflated)
            .unwrap();
        assert_eq!(inflated, content_stream(&doc.pages[0].ops, doc.height_mm));
    }

    #[test]
    fn test_identical_input_identical_output() {
        let a = write_pdf(&sample_doc(), &options(true)).unwrap();
        let b = write_pdf(&sample_doc(), &options(true)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_page_count_and_kids() {
        let content = "Line\n".repeat(120);
        let proposal = Proposal::new("Long", vec![Section::new("Body", content, SectionType::Text)]);
        let doc = layout_document(&proposal, &PdfExportSettings::default(), "d");
        let pdf = write_pdf(&doc, &options(true)).unwrap();
        let expected = format!("/Count {}", doc.pages.len());
        assert!(doc.pages.len() > 1);
        assert!(find(&pdf, expected.as_bytes()).is_some());
        assert!(find(&pdf, b"/Kids [6 0 R 8 0 R").is_some());
    }

    #[test]
    fn test_empty_document_rejected() {
        let doc = LaidOutDocument {
            title: "x".to_string(),
            width_mm: 210.0,
            height_mm: 297.0,
            pages: Vec::<LaidOutPage>::new(),
        };
        assert!(matches!(write_pdf(&doc, &options(false)), Err(AppError::Render(_))));
    }
}
