//! Report composition
//!
//! Turns a `ReportModel` into two pages of regions. Composition is pure: no
//! I/O, no failure path, and the same model always yields the same pages.

use rust_decimal::Decimal;

use super::layout::{
    palette, Align, BrandMark, CellStyle, Column, ComposedReport, HeaderBand, Metric,
    MetricsBand, Page, Rect, Region, TableCell, TableRegion, TextKind, TextRegion, Tone,
    PAGE_HEIGHT, PAGE_WIDTH,
};
use crate::config::ReportConfig;
use crate::transition::{RankedTradeList, ReportModel, TradeSide};
use crate::utils::{format_currency, format_percent, format_signed_percent, wrap_text};

const MARGIN_X: f32 = 49.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_X;
const MARGIN_TOP: f32 = 56.0;

const HEADER_HEIGHT: f32 = 78.0;
const METRICS_HEIGHT: f32 = 58.0;
const SECTION_TITLE_HEIGHT: f32 = 20.0;
const SECTION_GAP: f32 = 18.0;
const PLACEHOLDER_HEIGHT: f32 = 28.0;
const FOOTER_HEIGHT: f32 = 12.0;
const FOOTER_Y: f32 = PAGE_HEIGHT - 44.0;
/// Clearance kept between the last body region and the footer
const FOOTER_GAP: f32 = 8.0;

/// Fixed box for the logo, anchored to the top-right of the header
const LOGO_BOX: Rect = Rect::new(431.0, 50.0, 132.0, 46.0);

const CLASS_WRAP_WIDTH: usize = 30;
const SECURITY_WRAP_WIDTH: usize = 34;

pub const REPORT_TITLE: &str = "Portfolio Transition Analysis";
pub const PAGE_COUNT: usize = 2;

/// Presentation settings that do not belong to the data model
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeOptions {
    pub brand_name: String,
    pub top_trades: usize,
}

impl ComposeOptions {
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            brand_name: config.brand_name.clone(),
            top_trades: config.top_trades,
        }
    }
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            brand_name: crate::config::DEFAULT_BRAND_NAME.to_string(),
            top_trades: crate::config::DEFAULT_TOP_TRADES,
        }
    }
}

/// Vertical cursor that stacks regions down the page
struct PageBuilder {
    number: usize,
    cursor: f32,
    regions: Vec<Region>,
}

impl PageBuilder {
    fn new(number: usize) -> Self {
        Self {
            number,
            cursor: MARGIN_TOP,
            regions: Vec::new(),
        }
    }

    fn next_frame(&mut self, height: f32) -> Rect {
        let frame = Rect::new(MARGIN_X, self.cursor, CONTENT_WIDTH, height);
        self.cursor += height;
        frame
    }

    fn gap(&mut self, height: f32) {
        self.cursor += height;
    }

    /// Vertical space left above the footer
    fn remaining(&self) -> f32 {
        FOOTER_Y - FOOTER_GAP - self.cursor
    }

    fn push(&mut self, region: Region) {
        self.regions.push(region);
    }

    fn section_title(&mut self, title: &str) {
        let frame = self.next_frame(SECTION_TITLE_HEIGHT);
        self.push(Region::Text(TextRegion {
            frame,
            text: title.to_string(),
            kind: TextKind::SectionTitle,
            size: 11.0,
            bold: true,
            tone: Tone::Accent,
            align: Align::Left,
        }));
    }

    fn table(&mut self, columns: Vec<Column>, rows: Vec<Vec<TableCell>>, scale: f32) {
        let frame = self.next_frame(TableRegion::measure(&rows, scale));
        self.push(Region::Table(TableRegion {
            frame,
            columns,
            rows,
            header_fill: palette::NAVY,
            header_text: palette::WHITE,
            striped: true,
            scale,
        }));
    }

    fn placeholder(&mut self, text: &str) {
        let frame = self.next_frame(PLACEHOLDER_HEIGHT);
        self.push(Region::Text(TextRegion {
            frame,
            text: text.to_string(),
            kind: TextKind::Placeholder,
            size: 9.0,
            bold: false,
            tone: Tone::Muted,
            align: Align::Left,
        }));
    }

    fn finish(mut self) -> Page {
        self.regions.push(Region::Text(TextRegion {
            frame: Rect::new(MARGIN_X, FOOTER_Y, CONTENT_WIDTH, FOOTER_HEIGHT),
            text: format!("Page {} of {}", self.number, PAGE_COUNT),
            kind: TextKind::Footer,
            size: 7.0,
            bold: false,
            tone: Tone::Muted,
            align: Align::Right,
        }));

        Page {
            number: self.number,
            regions: self.regions,
        }
    }
}

/// Largest scale, capped at 1.0, at which tables of `natural` height fit in `available`
fn fit_scale(natural: f32, available: f32) -> f32 {
    if natural <= available || natural <= 0.0 {
        1.0
    } else {
        (available / natural).max(0.0)
    }
}

/// Lay out the two report pages for a model
pub fn compose(model: &ReportModel, options: &ComposeOptions) -> ComposedReport {
    let pages = vec![
        summary_page(model, options),
        trades_page(model, options),
    ];

    ComposedReport {
        pages,
        logo: model.logo.clone(),
    }
}

fn header_band(model: &ReportModel, options: &ComposeOptions, page: &mut PageBuilder) {
    let frame = page.next_frame(HEADER_HEIGHT);
    let brand = if model.logo.is_some() {
        BrandMark::Logo(LOGO_BOX)
    } else {
        BrandMark::Wordmark(options.brand_name.clone())
    };

    page.push(Region::Header(HeaderBand {
        frame,
        title: REPORT_TITLE.to_string(),
        client_line: format!("CLIENT: {}", model.client_name.to_uppercase()),
        model_line: format!("TARGET MODEL: {}", model.target_model_name),
        brand,
    }));
}

fn summary_page(model: &ReportModel, options: &ComposeOptions) -> Page {
    let mut page = PageBuilder::new(1);
    header_band(model, options, &mut page);
    page.gap(8.0);

    let frame = page.next_frame(METRICS_HEIGHT);
    page.push(Region::Metrics(MetricsBand {
        frame,
        fill: palette::PANEL,
        metrics: vec![
            Metric {
                label: "TOTAL VALUE".to_string(),
                value: format_currency(model.accounts.total_value),
            },
            Metric {
                label: "TRANSITION G/L".to_string(),
                value: format_currency(model.gain_loss.total_gain),
            },
            Metric {
                label: "ESTIMATED TAX".to_string(),
                value: format_currency(model.gain_loss.estimated_tax),
            },
            Metric {
                label: "TAX IMPACT %".to_string(),
                value: format_percent(model.tax_impact_pct),
            },
        ],
    }));
    page.gap(SECTION_GAP);

    // Long allocations shrink both tables so the page always holds them
    let allocation = allocation_rows(model);
    let gain_loss = vec![gain_loss_row(model)];
    let natural = TableRegion::measure(&allocation, 1.0) + TableRegion::measure(&gain_loss, 1.0);
    let fixed = 2.0 * SECTION_TITLE_HEIGHT + SECTION_GAP;
    let scale = fit_scale(natural, page.remaining() - fixed);

    page.section_title("ASSET ALLOCATION SUMMARY");
    page.table(allocation_columns(), allocation, scale);
    page.gap(SECTION_GAP);

    page.section_title("REALIZED GAIN & TAX SUMMARY");
    page.table(gain_loss_columns(), gain_loss, scale);

    page.finish()
}

fn trades_page(model: &ReportModel, options: &ComposeOptions) -> Page {
    let mut page = PageBuilder::new(2);
    header_band(model, options, &mut page);
    page.gap(SECTION_GAP);

    let buys = trade_rows(&model.buys);
    let sells = trade_rows(&model.sells);
    let placeholders = [&buys, &sells].iter().filter(|rows| rows.is_empty()).count();
    let natural: f32 = [&buys, &sells]
        .iter()
        .filter(|rows| !rows.is_empty())
        .map(|rows| TableRegion::measure(rows, 1.0))
        .sum();
    let fixed =
        2.0 * SECTION_TITLE_HEIGHT + SECTION_GAP + placeholders as f32 * PLACEHOLDER_HEIGHT;
    let scale = fit_scale(natural, page.remaining() - fixed);

    trade_section(&mut page, model.buys.side, buys, options.top_trades, scale);
    page.gap(SECTION_GAP);
    trade_section(&mut page, model.sells.side, sells, options.top_trades, scale);

    page.finish()
}

fn allocation_columns() -> Vec<Column> {
    vec![
        Column::new("Asset Class", 0.36, Align::Left),
        Column::new("Current", 0.14, Align::Right),
        Column::new("Target", 0.14, Align::Right),
        Column::new("Change", 0.14, Align::Right),
        Column::new("Trade $", 0.22, Align::Right),
    ]
}

fn allocation_rows(model: &ReportModel) -> Vec<Vec<TableCell>> {
    model
        .allocation
        .iter()
        .map(|row| {
            vec![
                TableCell::wrapped(wrap_text(&row.class_label, CLASS_WRAP_WIDTH), CellStyle::PLAIN),
                TableCell::plain(format_percent(row.current_pct)),
                TableCell::plain(format_percent(row.target_pct)),
                TableCell::styled(
                    format_signed_percent(row.change_pct),
                    CellStyle::signed(row.change_pct),
                ),
                TableCell::styled(
                    format_currency(row.trade_amount),
                    CellStyle::signed(row.trade_amount),
                ),
            ]
        })
        .collect()
}

fn gain_loss_columns() -> Vec<Column> {
    vec![
        Column::new("Short-Term G/L", 0.2, Align::Right),
        Column::new("Long-Term G/L", 0.2, Align::Right),
        Column::new("Total G/L", 0.2, Align::Right),
        Column::new("Estimated Tax", 0.2, Align::Right),
        Column::new("Post-Trade YTD G/L", 0.2, Align::Right),
    ]
}

fn gain_loss_row(model: &ReportModel) -> Vec<TableCell> {
    let gl = &model.gain_loss;
    let signed = |value: Decimal| TableCell::styled(format_currency(value), CellStyle::signed(value));

    vec![
        signed(gl.short_term_gain),
        signed(gl.long_term_gain),
        signed(gl.total_gain),
        TableCell::plain(format_currency(gl.estimated_tax)),
        signed(gl.post_trade_ytd_gain),
    ]
}

fn trade_columns() -> Vec<Column> {
    vec![
        Column::new("Acct", 0.10, Align::Left),
        Column::new("Ticker", 0.13, Align::Left),
        Column::new("Security", 0.43, Align::Left),
        Column::new("Trade $", 0.17, Align::Right),
        Column::new("Realized G/L", 0.17, Align::Right),
    ]
}

fn trade_rows(list: &RankedTradeList) -> Vec<Vec<TableCell>> {
    list.trades
        .iter()
        .map(|t| {
            vec![
                TableCell::plain(format!("..{}", t.account_last4)),
                TableCell::styled(
                    t.ticker.clone(),
                    CellStyle {
                        tone: Tone::Default,
                        bold: true,
                    },
                ),
                TableCell::wrapped(wrap_text(&t.security_name, SECURITY_WRAP_WIDTH), CellStyle::PLAIN),
                TableCell::styled(format_currency(t.trade_amount), CellStyle::signed(t.trade_amount)),
                TableCell::styled(format_currency(t.realized_gain), CellStyle::signed(t.realized_gain)),
            ]
        })
        .collect()
}

fn trade_section(
    page: &mut PageBuilder,
    side: TradeSide,
    rows: Vec<Vec<TableCell>>,
    limit: usize,
    scale: f32,
) {
    let (title, empty_text) = match side {
        TradeSide::Buy => (
            format!("TOP {} BUYS", limit),
            "No buy trades in this transition.",
        ),
        TradeSide::Sell => (
            format!("TOP {} SELLS", limit),
            "No sell trades in this transition.",
        ),
    };

    page.section_title(&title);

    if rows.is_empty() {
        page.placeholder(empty_text);
        return;
    }

    page.table(trade_columns(), rows, scale);
}
