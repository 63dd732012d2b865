//! PDF rendering of composed pages
//!
//! Paints regions with the PDF base-14 Helvetica faces, so no font files are
//! embedded. Text widths for alignment come from the Helvetica metrics table
//! below.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use super::layout::{
    palette, Align, BrandMark, ComposedReport, HeaderBand, MetricsBand, Page, Rect, Region, Rgb,
    TableRegion, TextRegion, PAGE_HEIGHT, PAGE_WIDTH, TABLE_FONT_SIZE, TABLE_HEADER_HEIGHT,
    TABLE_LINE_HEIGHT, TABLE_ROW_PADDING,
};
use super::logo::LogoImage;
use crate::error::Result;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const LOGO_XOBJECT: &str = "Im1";
const CELL_PADDING: f32 = 5.0;

/// Sink that turns composed pages into document bytes
pub trait DocumentRenderer {
    fn render(&self, report: &ComposedReport) -> Result<Vec<u8>>;
}

/// Renders US Letter PDF documents
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer {
    /// Document title stored in the PDF info dictionary
    pub title: Option<String>,
}

impl PdfRenderer {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, report: &ComposedReport) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });

        let mut resources = dictionary! {
            "Font" => dictionary! {
                FONT_REGULAR => regular_id,
                FONT_BOLD => bold_id,
            },
        };
        if let Some(logo) = &report.logo {
            let image_id = add_image(&mut doc, logo);
            resources.set("XObject", dictionary! { LOGO_XOBJECT => image_id });
        }
        let resources_id = doc.add_object(resources);

        let mut kids: Vec<Object> = Vec::with_capacity(report.pages.len());
        for page in &report.pages {
            let content = paint_page(page, report.logo.as_ref());
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), real(PAGE_WIDTH), real(PAGE_HEIGHT)],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if let Some(title) = &self.title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(encode_text(title)),
                "Producer" => Object::string_literal("transition-report"),
            });
            doc.trailer.set("Info", info_id);
        }

        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        debug!(
            "Rendered {} pages into {} bytes",
            report.pages.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}

fn add_image(doc: &mut Document, logo: &LogoImage) -> ObjectId {
    let stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => logo.width as i64,
            "Height" => logo.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        logo.rgb.clone(),
    );
    doc.add_object(stream)
}

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

/// Map text to WinAnsi bytes; characters outside Latin-1 become '?'
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' => b'-',
            '\u{2018}' | '\u{2019}' => b'\'',
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect()
}

/// Helvetica advance width in 1/1000 em
fn glyph_width(c: char) -> u16 {
    match c {
        ' ' | '!' | ',' | '.' | '/' | ':' | ';' | '[' | '\\' | ']' | 'I' | 'f' | 't' => 278,
        '"' => 355,
        '\'' => 191,
        '(' | ')' | '-' | '`' | 'r' => 333,
        '*' => 389,
        '+' | '<' | '=' | '>' | '~' => 584,
        '%' => 889,
        '&' | 'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667,
        '@' => 1015,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' | 'w' => 722,
        'F' | 'T' | 'Z' => 611,
        'G' | 'O' | 'Q' => 778,
        'J' | 'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 500,
        'L' => 556,
        'M' | 'm' => 833,
        'W' => 944,
        'i' | 'j' | 'l' => 222,
        '^' => 469,
        '{' | '}' => 334,
        '|' => 260,
        _ => 556,
    }
}

/// Approximate rendered width of `text` in points
pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| glyph_width(c) as u32).sum();
    let width = units as f32 * size / 1000.0;
    // Helvetica-Bold runs slightly wider than the regular face
    if bold {
        width * 1.05
    } else {
        width
    }
}

/// Content stream builder working in top-left page coordinates
struct Painter {
    ops: Vec<Operation>,
}

impl Painter {
    fn new() -> Self {
        Self { ops: Vec::new() }
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.ops.push(Operation::new(operator, operands));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let [r, g, b] = color.unit();
        self.op("rg", vec![real(r), real(g), real(b)]);
        self.op(
            "re",
            vec![
                real(rect.x),
                real(PAGE_HEIGHT - rect.bottom()),
                real(rect.width),
                real(rect.height),
            ],
        );
        self.op("f", vec![]);
    }

    fn hline(&mut self, x1: f32, x2: f32, y: f32, width: f32, color: Rgb) {
        let [r, g, b] = color.unit();
        self.op("RG", vec![real(r), real(g), real(b)]);
        self.op("w", vec![real(width)]);
        self.op("m", vec![real(x1), real(PAGE_HEIGHT - y)]);
        self.op("l", vec![real(x2), real(PAGE_HEIGHT - y)]);
        self.op("S", vec![]);
    }

    /// Draw text with its baseline at `baseline` (top-left coordinates)
    fn text(&mut self, x: f32, baseline: f32, size: f32, bold: bool, color: Rgb, text: &str) {
        let [r, g, b] = color.unit();
        let font = if bold { FONT_BOLD } else { FONT_REGULAR };
        self.op("BT", vec![]);
        self.op("rg", vec![real(r), real(g), real(b)]);
        self.op("Tf", vec![font.into(), real(size)]);
        self.op("Td", vec![real(x), real(PAGE_HEIGHT - baseline)]);
        self.op("Tj", vec![Object::string_literal(encode_text(text))]);
        self.op("ET", vec![]);
    }

    /// Draw text aligned inside the horizontal span `[left, left + width]`
    #[allow(clippy::too_many_arguments)]
    fn aligned_text(
        &mut self,
        left: f32,
        width: f32,
        align: Align,
        baseline: f32,
        size: f32,
        bold: bool,
        color: Rgb,
        text: &str,
    ) {
        let measured = text_width(text, size, bold);
        let x = match align {
            Align::Left => left,
            Align::Center => left + (width - measured) / 2.0,
            Align::Right => left + width - measured,
        };
        self.text(x, baseline, size, bold, color, text);
    }

    fn image(&mut self, name: &str, rect: Rect) {
        self.op("q", vec![]);
        self.op(
            "cm",
            vec![
                real(rect.width),
                real(0.0),
                real(0.0),
                real(rect.height),
                real(rect.x),
                real(PAGE_HEIGHT - rect.bottom()),
            ],
        );
        self.op("Do", vec![Object::Name(name.as_bytes().to_vec())]);
        self.op("Q", vec![]);
    }

    fn into_content(self) -> Content {
        Content {
            operations: self.ops,
        }
    }
}

fn paint_page(page: &Page, logo: Option<&LogoImage>) -> Content {
    let mut painter = Painter::new();
    for region in &page.regions {
        match region {
            Region::Header(header) => paint_header(&mut painter, header, logo),
            Region::Metrics(metrics) => paint_metrics(&mut painter, metrics),
            Region::Table(table) => paint_table(&mut painter, table),
            Region::Text(text) => paint_text(&mut painter, text),
        }
    }
    painter.into_content()
}

fn paint_header(painter: &mut Painter, header: &HeaderBand, logo: Option<&LogoImage>) {
    let frame = header.frame;
    painter.text(frame.x, frame.y + 22.0, 22.0, true, palette::NAVY, &header.title);
    painter.text(
        frame.x,
        frame.y + 44.0,
        10.0,
        true,
        palette::CLIENT,
        &header.client_line,
    );
    painter.text(
        frame.x,
        frame.y + 60.0,
        10.0,
        false,
        palette::MODEL,
        &header.model_line,
    );
    painter.hline(frame.x, frame.right(), frame.bottom() - 4.0, 2.0, palette::NAVY);

    match (&header.brand, logo) {
        (BrandMark::Logo(area), Some(image)) => {
            painter.image(LOGO_XOBJECT, fit_top_right(*area, image.aspect_ratio()));
        }
        (BrandMark::Wordmark(text), _) => {
            painter.aligned_text(
                frame.x,
                frame.width,
                Align::Right,
                frame.y + 22.0,
                22.0,
                true,
                palette::NAVY,
                text,
            );
        }
        // Composer only asks for a logo when the report carries one
        (BrandMark::Logo(_), None) => {}
    }
}

/// Largest box with the given aspect ratio inside `area`, anchored top-right
fn fit_top_right(area: Rect, aspect: f32) -> Rect {
    let (width, height) = if area.width / area.height > aspect {
        (area.height * aspect, area.height)
    } else {
        (area.width, area.width / aspect)
    };
    Rect::new(area.right() - width, area.y, width, height)
}

fn paint_metrics(painter: &mut Painter, band: &MetricsBand) {
    let frame = band.frame;
    painter.fill_rect(frame, band.fill);

    let count = band.metrics.len().max(1) as f32;
    let slot = frame.width / count;
    for (i, metric) in band.metrics.iter().enumerate() {
        let x = frame.x + 0.05 * frame.width + i as f32 * slot;
        painter.text(x, frame.y + 22.0, 7.0, true, palette::LABEL, &metric.label);
        painter.text(x, frame.y + 42.0, 12.0, true, palette::NAVY, &metric.value);
    }
}

fn paint_table(painter: &mut Painter, table: &TableRegion) {
    let frame = table.frame;
    let spans = table.column_spans();
    let scale = table.scale;
    let font_size = TABLE_FONT_SIZE * scale;
    let header_height = TABLE_HEADER_HEIGHT * scale;

    painter.fill_rect(
        Rect::new(frame.x, frame.y, frame.width, header_height),
        table.header_fill,
    );
    for (column, (left, width)) in table.columns.iter().zip(&spans) {
        painter.aligned_text(
            left + CELL_PADDING,
            width - 2.0 * CELL_PADDING,
            column.align,
            frame.y + 13.5 * scale,
            font_size,
            true,
            table.header_text,
            &column.header,
        );
    }

    let mut y = frame.y + header_height;
    for (index, row) in table.rows.iter().enumerate() {
        let height = TableRegion::row_height(row, scale);
        if table.striped && index % 2 == 1 {
            painter.fill_rect(Rect::new(frame.x, y, frame.width, height), palette::STRIPE);
        }

        for ((cell, column), (left, width)) in row.iter().zip(&table.columns).zip(&spans) {
            for (line_no, line) in cell.lines.iter().enumerate() {
                let baseline = y
                    + (TABLE_ROW_PADDING / 2.0 + (line_no + 1) as f32 * TABLE_LINE_HEIGHT - 2.5)
                        * scale;
                painter.aligned_text(
                    left + CELL_PADDING,
                    width - 2.0 * CELL_PADDING,
                    column.align,
                    baseline,
                    font_size,
                    cell.style.bold,
                    cell.style.tone.color(),
                    line,
                );
            }
        }

        y += height;
        painter.hline(frame.x, frame.right(), y, 0.5, palette::RULE);
    }
}

fn paint_text(painter: &mut Painter, region: &TextRegion) {
    let frame = region.frame;
    let baseline = frame.y + (frame.height + region.size * 0.7) / 2.0;
    painter.aligned_text(
        frame.x,
        frame.width,
        region.align,
        baseline,
        region.size,
        region.bold,
        region.tone.color(),
        &region.text,
    );
}
