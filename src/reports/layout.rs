//! Page layout primitives
//!
//! Pages are described as ordered regions with absolute frames in PDF points,
//! measured from the top-left corner of a US Letter page. Both the composer
//! and the renderer size table rows with the constants below, so a composed
//! page paints exactly as measured.

use rust_decimal::Decimal;

use super::logo::LogoImage;

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;

pub const TABLE_FONT_SIZE: f32 = 8.5;
pub const TABLE_HEADER_HEIGHT: f32 = 20.0;
pub const TABLE_LINE_HEIGHT: f32 = 11.0;
pub const TABLE_ROW_PADDING: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Components scaled to 0.0..=1.0 for PDF colour operators
    pub fn unit(&self) -> [f32; 3] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        ]
    }
}

pub mod palette {
    use super::Rgb;

    pub const NAVY: Rgb = Rgb(0x1a, 0x37, 0x51);
    pub const GREEN: Rgb = Rgb(0x2e, 0x7d, 0x32);
    pub const RED: Rgb = Rgb(0xc6, 0x28, 0x28);
    pub const PANEL: Rgb = Rgb(0xf4, 0xf6, 0xf8);
    pub const STRIPE: Rgb = Rgb(0xfa, 0xfb, 0xfc);
    pub const RULE: Rgb = Rgb(0xdd, 0xdd, 0xdd);
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);
    pub const TEXT: Rgb = Rgb(0x22, 0x22, 0x22);
    pub const CLIENT: Rgb = Rgb(0x44, 0x44, 0x44);
    pub const MODEL: Rgb = Rgb(0x66, 0x66, 0x66);
    pub const LABEL: Rgb = Rgb(0x88, 0x88, 0x88);
}

/// Colour role of a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Default,
    Positive,
    Negative,
    Muted,
    Accent,
}

impl Tone {
    /// Green for gains, red for losses, neutral for zero
    pub fn of_sign(value: Decimal) -> Tone {
        if value > Decimal::ZERO {
            Tone::Positive
        } else if value < Decimal::ZERO {
            Tone::Negative
        } else {
            Tone::Default
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Tone::Default => palette::TEXT,
            Tone::Positive => palette::GREEN,
            Tone::Negative => palette::RED,
            Tone::Muted => palette::LABEL,
            Tone::Accent => palette::NAVY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub tone: Tone,
    pub bold: bool,
}

impl CellStyle {
    pub const PLAIN: CellStyle = CellStyle {
        tone: Tone::Default,
        bold: false,
    };

    pub fn signed(value: Decimal) -> Self {
        Self {
            tone: Tone::of_sign(value),
            bold: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    /// Display text, already wrapped into lines
    pub lines: Vec<String>,
    pub style: CellStyle,
}

impl TableCell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            style: CellStyle::PLAIN,
        }
    }

    pub fn styled(text: impl Into<String>, style: CellStyle) -> Self {
        Self {
            lines: vec![text.into()],
            style,
        }
    }

    pub fn wrapped(lines: Vec<String>, style: CellStyle) -> Self {
        Self { lines, style }
    }

    pub fn text(&self) -> String {
        self.lines.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub header: String,
    /// Share of the table width; a table's shares sum to 1.0
    pub width: f32,
    pub align: Align,
}

impl Column {
    pub fn new(header: &str, width: f32, align: Align) -> Self {
        Self {
            header: header.to_string(),
            width,
            align,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRegion {
    pub frame: Rect,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<TableCell>>,
    pub header_fill: Rgb,
    pub header_text: Rgb,
    /// Fill every other body row
    pub striped: bool,
    /// Factor applied to font size, line height and padding; at most 1.0
    pub scale: f32,
}

impl TableRegion {
    pub fn row_height(row: &[TableCell], scale: f32) -> f32 {
        let lines = row.iter().map(|c| c.lines.len()).max().unwrap_or(1).max(1);
        (lines as f32 * TABLE_LINE_HEIGHT + TABLE_ROW_PADDING) * scale
    }

    /// Height of header plus all rows
    pub fn measure(rows: &[Vec<TableCell>], scale: f32) -> f32 {
        TABLE_HEADER_HEIGHT * scale + rows.iter().map(|r| Self::row_height(r, scale)).sum::<f32>()
    }

    /// Left edge and width of each column
    pub fn column_spans(&self) -> Vec<(f32, f32)> {
        let mut x = self.frame.x;
        self.columns
            .iter()
            .map(|c| {
                let width = c.width * self.frame.width;
                let span = (x, width);
                x += width;
                span
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    SectionTitle,
    Placeholder,
    Footer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRegion {
    pub frame: Rect,
    pub text: String,
    pub kind: TextKind,
    pub size: f32,
    pub bold: bool,
    pub tone: Tone,
    pub align: Align,
}

/// What occupies the top-right corner of the header
#[derive(Debug, Clone, PartialEq)]
pub enum BrandMark {
    /// Draw the report's logo image fitted into this box
    Logo(Rect),
    /// Draw this text when no logo is available
    Wordmark(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderBand {
    pub frame: Rect,
    pub title: String,
    pub client_line: String,
    pub model_line: String,
    pub brand: BrandMark,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsBand {
    pub frame: Rect,
    pub fill: Rgb,
    pub metrics: Vec<Metric>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    Header(HeaderBand),
    Metrics(MetricsBand),
    Table(TableRegion),
    Text(TextRegion),
}

impl Region {
    pub fn frame(&self) -> Rect {
        match self {
            Region::Header(h) => h.frame,
            Region::Metrics(m) => m.frame,
            Region::Table(t) => t.frame,
            Region::Text(t) => t.frame,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    pub regions: Vec<Region>,
}

/// Laid-out pages plus the image resources they reference
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedReport {
    pub pages: Vec<Page>,
    pub logo: Option<LogoImage>,
}
