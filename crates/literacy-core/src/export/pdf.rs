//! Minimal PDF 1.4 writer: one full-width image per page.

use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::Utc;

use super::capability::Capability;
use super::page::PageGeometry;
use super::raster::{Raster, Rgb};
use crate::error::ExportError;

/// Builds a multi-page document from page images.
pub trait DocumentAssembler: Capability {
    fn assemble(&self, pages: &[Raster], geometry: &PageGeometry) -> Result<Vec<u8>, ExportError>;
}

#[derive(Debug, Clone)]
pub struct PdfAssembler {
    title: String,
}

impl PdfAssembler {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }
}

impl Default for PdfAssembler {
    fn default() -> Self {
        Self::new("AI Literacy Report")
    }
}

impl Capability for PdfAssembler {
    fn name(&self) -> &str {
        "pdf-writer"
    }

    fn is_ready(&self) -> bool {
        true
    }
}

impl DocumentAssembler for PdfAssembler {
    fn assemble(&self, pages: &[Raster], geometry: &PageGeometry) -> Result<Vec<u8>, ExportError> {
        if pages.is_empty() {
            return Err(ExportError::Assemble("document has no pages".into()));
        }
        if let Some(i) = pages.iter().position(|p| p.width() == 0 || p.height() == 0) {
            return Err(ExportError::Assemble(format!("page {} is empty", i + 1)));
        }

        let (page_w, page_h) = geometry.points();
        let mut doc = PdfWriter::new();

        // 1 catalog, 2 page tree, 3 info, then (page, content, image) per page
        let page_id = |i: usize| 4 + 3 * i;
        doc.object(1, b"<< /Type /Catalog /Pages 2 0 R >>");

        let kids: Vec<String> = (0..pages.len()).map(|i| format!("{} 0 R", page_id(i))).collect();
        doc.object(
            2,
            format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), pages.len()).as_bytes(),
        );
        doc.object(
            3,
            format!(
                "<< /Title ({}) /Producer (literacy) /CreationDate ({}) >>",
                escape(&self.title),
                Utc::now().format("D:%Y%m%d%H%M%SZ")
            )
            .as_bytes(),
        );

        for (i, raster) in pages.iter().enumerate() {
            let id = page_id(i);
            doc.object(
                id,
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {page_w:.2} {page_h:.2}] \
                     /Resources << /XObject << /Im0 {} 0 R >> >> /Contents {} 0 R >>",
                    id + 2,
                    id + 1
                )
                .as_bytes(),
            );

            // full page width, anchored at the top edge
            let drawn_h = f64::from(raster.height()) * page_w / f64::from(raster.width());
            let content = format!(
                "q {page_w:.2} 0 0 {drawn_h:.2} 0 {:.2} cm /Im0 Do Q",
                page_h - drawn_h
            );
            doc.stream(id + 1, "", content.as_bytes());

            let image = encode_image(raster);
            doc.stream(
                id + 2,
                &format!(
                    "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace {} \
                     /BitsPerComponent 8 /Filter /RunLengthDecode",
                    raster.width(),
                    raster.height(),
                    image.color_space
                ),
                &image.data,
            );
        }

        Ok(doc.finish())
    }
}

struct EncodedImage {
    color_space: String,
    data: Vec<u8>,
}

/// Indexed colour when the page has at most 256 colours, RGB otherwise.
fn encode_image(raster: &Raster) -> EncodedImage {
    let mut palette: Vec<Rgb> = Vec::new();
    let mut lookup: HashMap<Rgb, u8> = HashMap::new();
    let mut indices = Vec::with_capacity(raster.as_bytes().len() / 3);

    for px in raster.as_bytes().chunks_exact(3) {
        let colour = Rgb(px[0], px[1], px[2]);
        let index = match lookup.get(&colour) {
            Some(&index) => index,
            None if palette.len() < 256 => {
                let index = palette.len() as u8;
                palette.push(colour);
                lookup.insert(colour, index);
                index
            }
            None => {
                return EncodedImage {
                    color_space: "/DeviceRGB".into(),
                    data: run_length_encode(raster.as_bytes()),
                };
            }
        };
        indices.push(index);
    }

    let mut table = String::with_capacity(palette.len() * 6);
    for Rgb(r, g, b) in &palette {
        let _ = write!(table, "{r:02X}{g:02X}{b:02X}");
    }
    EncodedImage {
        color_space: format!("[/Indexed /DeviceRGB {} <{table}>]", palette.len() - 1),
        data: run_length_encode(&indices),
    }
}

/// PackBits-style encoding read by the `RunLengthDecode` filter.
fn run_length_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() / 4 + 1);
    let mut i = 0;
    while i < data.len() {
        let mut run = 1;
        while i + run < data.len() && run < 128 && data[i + run] == data[i] {
            run += 1;
        }
        if run > 1 {
            out.push((257 - run) as u8);
            out.push(data[i]);
            i += run;
            continue;
        }

        let start = i;
        i += 1;
        while i < data.len() && i - start < 128 && !(i + 1 < data.len() && data[i] == data[i + 1]) {
            i += 1;
        }
        out.push((i - start - 1) as u8);
        out.extend_from_slice(&data[start..i]);
    }
    out.push(128);
    out
}

fn escape(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '(' | ')' | '\\' => format!("\\{c}"),
            c if c.is_ascii() && !c.is_ascii_control() => c.to_string(),
            _ => "?".to_string(),
        })
        .collect()
}

struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    fn begin(&mut self, id: usize) {
        if self.offsets.len() < id {
            self.offsets.resize(id, 0);
        }
        self.offsets[id - 1] = self.buf.len();
        self.buf.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
    }

    fn object(&mut self, id: usize, body: &[u8]) {
        self.begin(id);
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, id: usize, dict: &str, data: &[u8]) {
        self.begin(id);
        let sep = if dict.is_empty() { "" } else { " " };
        self.buf
            .extend_from_slice(format!("<< {dict}{sep}/Length {} >>\nstream\n", data.len()).as_bytes());
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn finish(mut self) -> Vec<u8> {
        let xref = self.buf.len();
        let mut table = format!("xref\n0 {}\n0000000000 65535 f \n", self.offsets.len() + 1);
        for offset in &self.offsets {
            let _ = writeln!(table, "{offset:010} 00000 n ");
        }
        let _ = write!(
            table,
            "trailer\n<< /Size {} /Root 1 0 R /Info 3 0 R >>\nstartxref\n{xref}\n%%EOF\n",
            self.offsets.len() + 1
        );
        self.buf.extend_from_slice(table.as_bytes());
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_length_decode(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut i = 0;
        while i < data.len() {
            let len = data[i];
            i += 1;
            match len {
                128 => break,
                0..=127 => {
                    let n = usize::from(len) + 1;
                    out.extend_from_slice(&data[i..i + n]);
                    i += n;
                }
                _ => {
                    out.extend(std::iter::repeat(data[i]).take(257 - usize::from(len)));
                    i += 1;
                }
            }
        }
        out
    }

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    fn page(height: u32) -> Raster {
        let mut r = Raster::new(40, height, Rgb::hex(0x0f172a));
        r.fill_rect(5, 5, 10, 10, Rgb::hex(0x22d3ee));
        r
    }

    #[test]
    fn run_length_handles_runs_and_literals() {
        let mut data = vec![7u8; 300];
        data.extend_from_slice(&[1, 2, 3, 4, 4, 5]);
        data.extend((0..=255u8).cycle().take(400));
        let encoded = run_length_encode(&data);
        assert_eq!(encoded.last(), Some(&128));
        assert!(encoded.len() < data.len());
        assert_eq!(run_length_decode(&encoded), data);
        assert_eq!(run_length_encode(&[]), vec![128]);
    }

    #[test]
    fn writes_one_page_per_raster() {
        let pdf = PdfAssembler::default()
            .assemble(&[page(56), page(56), page(20)], &PageGeometry::A4)
            .unwrap();
        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert!(pdf.ends_with(b"%%EOF\n"));
        assert_eq!(count(&pdf, b"/Type /Page "), 3);
        assert_eq!(count(&pdf, b"/Count 3"), 1);
        assert_eq!(count(&pdf, b"/Subtype /Image"), 3);
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let pdf = PdfAssembler::default()
            .assemble(&[page(56)], &PageGeometry::A4)
            .unwrap();
        let text = String::from_utf8_lossy(&pdf);
        let xref = text.rfind("\nxref\n").unwrap() + 1;
        let entries: Vec<usize> = text[xref..]
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .map(|l| l[..10].parse().unwrap())
            .collect();
        assert_eq!(entries.len(), 6);
        for (i, offset) in entries.iter().enumerate() {
            let header = format!("{} 0 obj", i + 1);
            assert!(pdf[*offset..].starts_with(header.as_bytes()));
        }
    }

    #[test]
    fn short_last_page_is_anchored_to_top() {
        // 40px wide page image of 20 rows: 595.28 * 20 / 40 = 297.64 pt
        let pdf = PdfAssembler::default()
            .assemble(&[page(20)], &PageGeometry::A4)
            .unwrap();
        let text = String::from_utf8_lossy(&pdf);
        assert!(text.contains("q 595.28 0 0 297.64 0 544.25 cm /Im0 Do Q"));
    }

    #[test]
    fn few_colours_use_indexed_space() {
        let pdf = PdfAssembler::default()
            .assemble(&[page(10)], &PageGeometry::A4)
            .unwrap();
        let text = String::from_utf8_lossy(&pdf);
        assert!(text.contains("/ColorSpace [/Indexed /DeviceRGB 1 <0F172A22D3EE>]"));
    }

    #[test]
    fn many_colours_fall_back_to_rgb() {
        let mut r = Raster::new(300, 1, Rgb(0, 0, 0));
        for x in 0..300 {
            r.put(x, 0, Rgb((x % 256) as u8, (x / 256) as u8, 0));
        }
        let image = encode_image(&r);
        assert_eq!(image.color_space, "/DeviceRGB");
        assert_eq!(run_length_decode(&image.data), r.as_bytes());
    }

    #[test]
    fn rejects_empty_input() {
        let assembler = PdfAssembler::default();
        assert!(matches!(
            assembler.assemble(&[], &PageGeometry::A4),
            Err(ExportError::Assemble(_))
        ));
        assert!(assembler
            .assemble(&[Raster::new(10, 0, Rgb(0, 0, 0))], &PageGeometry::A4)
            .is_err());
    }

    #[test]
    fn title_is_escaped() {
        assert_eq!(escape("a (b) \\ é"), "a \\(b\\) \\\\ ?");
    }
}
