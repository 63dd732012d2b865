#![allow(dead_code)]

//! Builders for transition workbook fixtures written with rust_xlsxwriter.

use image::{DynamicImage, ImageFormat, RgbImage};
use rust_xlsxwriter::Workbook;
use std::io::Cursor;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum Value {
    Text(String),
    Number(f64),
    Blank,
}

pub fn t(s: &str) -> Value {
    Value::Text(s.to_string())
}

pub fn n(v: f64) -> Value {
    Value::Number(v)
}

#[derive(Debug, Clone)]
pub struct SheetSpec {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl SheetSpec {
    pub fn new(name: &str, headers: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }
}

pub fn model_tolerance(rows: &[(&str, f64, f64, f64)]) -> SheetSpec {
    SheetSpec::new(
        "1 - Model Tolerance",
        &["Class", "Current %", "Target %", "Trade $"],
        rows.iter()
            .map(|(class, current, target, trade)| {
                vec![t(class), n(*current), n(*target), n(*trade)]
            })
            .collect(),
    )
}

/// (model category, account, ticker, security name, trade $, trade G/L $)
pub fn holding_and_trade(rows: &[(&str, &str, &str, &str, f64, f64)]) -> SheetSpec {
    SheetSpec::new(
        "Holding and Trade Details",
        &[
            "Model Category",
            "Account Number",
            "Ticker",
            "Security Name",
            "Trade $",
            "Trade G/L $",
        ],
        rows.iter()
            .map(|(category, account, ticker, name, trade, gain)| {
                vec![
                    t(category),
                    t(account),
                    t(ticker),
                    t(name),
                    n(*trade),
                    n(*gain),
                ]
            })
            .collect(),
    )
}

/// (short, long, total, tax, post-trade YTD)
pub fn gain_loss(values: (f64, f64, f64, f64, f64)) -> SheetSpec {
    let (short, long, total, tax, ytd) = values;
    SheetSpec::new(
        "Gain Loss Details",
        &[
            "Trade Short Term Gain",
            "Trade Long Term Gain",
            "Trade Total Gain $",
            "Estimated Tax",
            "Post-Trade YTD Gain",
        ],
        vec![vec![n(short), n(long), n(total), n(tax), n(ytd)]],
    )
}

pub fn account_and_cash(values: &[f64]) -> SheetSpec {
    SheetSpec::new(
        "Account and Cash Details",
        &["Account Number", "Account Value"],
        values
            .iter()
            .enumerate()
            .map(|(i, v)| vec![t(&format!("X00{}1234", i)), n(*v)])
            .collect(),
    )
}

/// A complete, valid export: US Equity moving down, cash moving up, a few trades
pub fn standard_sheets() -> Vec<SheetSpec> {
    vec![
        model_tolerance(&[
            ("Savvy US Equity - U.S. Equity", 40.0, 35.0, -5000.0),
            ("Cash", 5.0, 10.0, 5000.0),
            ("Savvy Total Portfolios - Fixed Income", 55.0, 55.0, 0.0),
        ]),
        holding_and_trade(&[
            ("Unassigned", "87654321", "VTI", "Vanguard Total Stock Market ETF", -5000.0, 1200.0),
            ("Savvy Growth", "87654321", "BND", "Vanguard Total Bond Market ETF", 3000.0, 0.0),
            ("Savvy Growth", "87654321", "CUSTODIAL_CASH", "Custodial Cash", 9000.0, 0.0),
            ("Savvy Growth", "87654321", "SGOV", "iShares 0-3 Month Treasury Bond ETF", 2000.0, 0.0),
            ("Savvy Growth", "87654321", "AAPL", "Apple Inc", 0.0, 0.0),
        ]),
        gain_loss((-120.0, 1320.0, 1200.0, 240.0, 1200.0)),
        account_and_cash(&[60000.0, 40000.0]),
    ]
}

pub fn build_workbook(sheets: &[SheetSpec]) -> Workbook {
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name).unwrap();

        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, header).unwrap();
        }
        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let row_num = row_idx as u32 + 1;
            for (col, value) in row.iter().enumerate() {
                match value {
                    Value::Text(s) => {
                        worksheet.write_string(row_num, col as u16, s).unwrap();
                    }
                    Value::Number(v) => {
                        worksheet.write_number(row_num, col as u16, *v).unwrap();
                    }
                    Value::Blank => {}
                }
            }
        }
    }
    workbook
}

pub fn write_workbook(path: &Path, sheets: &[SheetSpec]) {
    build_workbook(sheets).save(path).unwrap();
}

pub fn workbook_bytes(sheets: &[SheetSpec]) -> Vec<u8> {
    build_workbook(sheets).save_to_buffer().unwrap()
}

fn encode_rgb(width: u32, height: u32, data: Vec<u8>, format: ImageFormat) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, data).unwrap());
    let mut out = Vec::new();
    image.write_to(&mut Cursor::new(&mut out), format).unwrap();
    out
}

/// Minimal 2x1 RGB PNG
pub fn png_bytes() -> Vec<u8> {
    encode_rgb(2, 1, vec![26, 55, 81, 255, 255, 255], ImageFormat::Png)
}

/// 8x4 navy JPEG
pub fn jpeg_bytes() -> Vec<u8> {
    let pixels = [26u8, 55, 81].repeat(8 * 4);
    encode_rgb(8, 4, pixels, ImageFormat::Jpeg)
}
