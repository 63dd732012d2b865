//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of data derivation from presentation.

use colored::{ColoredString, Colorize};
use rust_decimal::Decimal;
use std::path::Path;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};
use transition_report::importers::sheet_locator::find_sheet;
use transition_report::importers::{LogicalSheet, SheetNames, Workbook};
use transition_report::transition::{RankedTradeList, ReportModel};
use transition_report::utils::{
    format_currency, format_percent, format_signed_percent,
};

fn signed(text: String, value: Decimal) -> ColoredString {
    if value > Decimal::ZERO {
        text.green()
    } else if value < Decimal::ZERO {
        text.red()
    } else {
        text.normal()
    }
}

/// Format the derived report data for JSON output
pub fn format_preview_json(model: &ReportModel) -> String {
    serde_json::to_string_pretty(model)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Format the derived report data as terminal tables
pub fn format_preview_table(model: &ReportModel) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{} {}\n",
        "Client:".bold(),
        model.client_name.to_uppercase()
    ));
    output.push_str(&format!(
        "{} {}\n\n",
        "Target model:".bold(),
        model.target_model_name
    ));

    output.push_str(&format!("{}\n", "Asset Allocation".cyan().bold()));
    output.push_str(&allocation_table(model));

    output.push_str(&format!("\n\n{} Summary", "━".repeat(60).bright_black()));
    let gl = &model.gain_loss;
    let lines = [
        ("Total Value:", format_currency(model.accounts.total_value).normal()),
        (
            "Short-Term G/L:",
            signed(format_currency(gl.short_term_gain), gl.short_term_gain),
        ),
        (
            "Long-Term G/L:",
            signed(format_currency(gl.long_term_gain), gl.long_term_gain),
        ),
        (
            "Transition G/L:",
            signed(format_currency(gl.total_gain), gl.total_gain),
        ),
        ("Estimated Tax:", format_currency(gl.estimated_tax).normal()),
        (
            "Post-Trade YTD:",
            signed(format_currency(gl.post_trade_ytd_gain), gl.post_trade_ytd_gain),
        ),
        ("Tax Impact:", format_percent(model.tax_impact_pct).normal()),
    ];
    for (label, value) in lines {
        output.push_str(&format!("\n{:<20} {}", label.bold(), value));
    }
    output.push('\n');

    output.push_str(&trade_table(&model.buys));
    output.push_str(&trade_table(&model.sells));

    output
}

fn allocation_table(model: &ReportModel) -> String {
    #[derive(Tabled)]
    struct AllocationLine {
        #[tabled(rename = "Asset Class")]
        class: String,
        #[tabled(rename = "Current")]
        current: String,
        #[tabled(rename = "Target")]
        target: String,
        #[tabled(rename = "Change")]
        change: String,
        #[tabled(rename = "Trade $")]
        trade: String,
    }

    let rows: Vec<AllocationLine> = model
        .allocation
        .iter()
        .map(|row| AllocationLine {
            class: row.class_label.clone(),
            current: format_percent(row.current_pct),
            target: format_percent(row.target_pct),
            change: signed(format_signed_percent(row.change_pct), row.change_pct).to_string(),
            trade: signed(format_currency(row.trade_amount), row.trade_amount).to_string(),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());
    table.to_string()
}

fn trade_table(list: &RankedTradeList) -> String {
    #[derive(Tabled)]
    struct TradeLine {
        #[tabled(rename = "Acct")]
        account: String,
        #[tabled(rename = "Ticker")]
        ticker: String,
        #[tabled(rename = "Security")]
        security: String,
        #[tabled(rename = "Trade $")]
        trade: String,
        #[tabled(rename = "Realized G/L")]
        gain: String,
    }

    let mut output = format!("\n{}\n", format!("Top {}", list.side.as_str()).cyan().bold());

    if list.is_empty() {
        output.push_str(&format!(
            "{}\n",
            format!("No {} in this transition.", list.side.as_str().to_lowercase()).dimmed()
        ));
        return output;
    }

    let rows: Vec<TradeLine> = list
        .trades
        .iter()
        .map(|t| TradeLine {
            account: format!("..{}", t.account_last4),
            ticker: t.ticker.clone(),
            security: t.security_name.clone(),
            trade: signed(format_currency(t.trade_amount), t.trade_amount).to_string(),
            gain: signed(format_currency(t.realized_gain), t.realized_gain).to_string(),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(3..), Alignment::right());
    output.push_str(&table.to_string());
    output.push('\n');
    output
}

/// Show every workbook sheet and the logical sheets they satisfy
pub fn format_sheet_resolution(workbook: &Workbook, names: &SheetNames) -> String {
    #[derive(Tabled)]
    struct SheetLine {
        #[tabled(rename = "Required Sheet")]
        logical: String,
        #[tabled(rename = "Match")]
        pattern: String,
        #[tabled(rename = "Resolved To")]
        actual: String,
        #[tabled(rename = "Rows")]
        rows: String,
    }

    let mut missing = 0;
    let rows: Vec<SheetLine> = LogicalSheet::ALL
        .iter()
        .map(|&sheet| {
            let pattern = names.substring(sheet);
            match find_sheet(workbook, pattern) {
                Some(table) => SheetLine {
                    logical: sheet.as_str().to_string(),
                    pattern: format!("*{}*", pattern),
                    actual: table.name().green().to_string(),
                    rows: table.len().to_string(),
                },
                None => {
                    missing += 1;
                    SheetLine {
                        logical: sheet.as_str().to_string(),
                        pattern: format!("*{}*", pattern),
                        actual: "missing".red().bold().to_string(),
                        rows: "-".to_string(),
                    }
                }
            }
        })
        .collect();

    let mut output = format!(
        "\n{} {}\n\n",
        "Workbook sheets:".bold(),
        workbook.sheet_names().join(", ")
    );

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(3..), Alignment::right());
    output.push_str(&table.to_string());
    output.push('\n');

    if missing == 0 {
        output.push_str(&format!("\n{} All required sheets found\n", "✓".green().bold()));
    } else {
        output.push_str(&format!(
            "\n{} {} required sheet(s) missing\n",
            "✗".red().bold(),
            missing
        ));
    }

    output
}

/// Status line after a report was written
pub fn format_report_written(path: &Path, bytes: usize) -> String {
    format!(
        "{} Report written to {} ({} bytes)",
        "✓".green().bold(),
        path.display().to_string().bold(),
        bytes
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use transition_report::importers::{Cell, Table as SheetTable};
    use transition_report::transition::{
        AccountSummary, AllocationRow, GainLossSummary, TradeSide,
    };

    fn sample_model() -> ReportModel {
        ReportModel {
            client_name: "Jane Doe".to_string(),
            target_model_name: "Growth".to_string(),
            allocation: vec![AllocationRow {
                class_label: "US Equity".to_string(),
                current_pct: dec!(40),
                target_pct: dec!(35),
                change_pct: dec!(-5),
                trade_amount: dec!(-5000),
            }],
            buys: RankedTradeList {
                side: TradeSide::Buy,
                trades: vec![],
            },
            sells: RankedTradeList {
                side: TradeSide::Sell,
                trades: vec![],
            },
            gain_loss: GainLossSummary {
                short_term_gain: dec!(0),
                long_term_gain: dec!(100),
                total_gain: dec!(100),
                estimated_tax: dec!(20),
                post_trade_ytd_gain: dec!(100),
            },
            accounts: AccountSummary {
                total_value: dec!(1000),
            },
            tax_impact_pct: dec!(2),
            logo: None,
        }
    }

    #[test]
    fn test_preview_table_mentions_everything() {
        colored::control::set_override(false);
        let text = format_preview_table(&sample_model());
        assert!(text.contains("JANE DOE"));
        assert!(text.contains("US Equity"));
        assert!(text.contains("-5.00%"));
        assert!(text.contains("-$5,000.00"));
        assert!(text.contains("No buys in this transition."));
        assert!(text.contains("No sells in this transition."));
    }

    #[test]
    fn test_preview_json_is_valid() {
        let json = format_preview_json(&sample_model());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["client_name"], "Jane Doe");
        assert_eq!(value["allocation"][0]["class_label"], "US Equity");
        assert!(value.get("logo").is_none());
    }

    #[test]
    fn test_sheet_resolution_reports_missing() {
        colored::control::set_override(false);
        let workbook = Workbook::new(vec![SheetTable::new(
            "1 - Model Tolerance",
            vec!["Class".to_string()],
            vec![vec![Cell::from("Bonds")]],
        )]);
        let text = format_sheet_resolution(&workbook, &SheetNames::default());
        assert!(text.contains("1 - Model Tolerance"));
        assert!(text.contains("missing"));
        assert!(text.contains("3 required sheet(s) missing"));
    }
}
