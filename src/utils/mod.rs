//! Utility functions for formatting and common operations
//!
//! This module provides centralized formatting utilities for consistent
//! display of currency, percentage, and wrapped label values in the report.

use rust_decimal::{Decimal, RoundingStrategy};
use unicode_width::UnicodeWidthStr;

/// Currency symbol options for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencySymbol {
    /// Include "$" prefix (US Dollar)
    USD,
    /// No currency symbol (for table cells, calculations display)
    None,
}

fn round2(value: Decimal) -> Decimal {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // Avoid printing "-0.00"
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

/// Core formatting function with full control over output.
///
/// Formats a Decimal value using US conventions:
/// - Thousands separator: `,`
/// - Decimal separator: `.`
/// - Sign before the currency symbol
///
/// # Examples
/// ```
/// use transition_report::utils::{format_currency_with_width, CurrencySymbol};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(
///     format_currency_with_width(dec!(1234.56), 0, CurrencySymbol::USD),
///     "$1,234.56"
/// );
///
/// assert_eq!(
///     format_currency_with_width(dec!(1234), 12, CurrencySymbol::None),
///     "    1,234.00"
/// );
/// ```
pub fn format_currency_with_width(value: Decimal, width: usize, symbol: CurrencySymbol) -> String {
    let rounded = round2(value);
    let is_negative = rounded < Decimal::ZERO;

    let formatted = format!("{:.2}", rounded.abs());
    let (integer_part, decimal_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec![',', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let sign = if is_negative { "-" } else { "" };
    let prefix = match symbol {
        CurrencySymbol::USD => "$",
        CurrencySymbol::None => "",
    };

    let result = format!("{}{}{}.{}", sign, prefix, with_separators, decimal_part);

    if width > 0 && result.len() < width {
        format!("{:>width$}", result, width = width)
    } else {
        result
    }
}

/// Format as US dollars: "$1,234.56"
///
/// # Examples
/// ```
/// use transition_report::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.56)), "$1,234.56");
/// assert_eq!(format_currency(dec!(-500)), "-$500.00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    format_currency_with_width(value, 0, CurrencySymbol::USD)
}

/// Percentage with two decimals: "12.34%"
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", round2(value))
}

/// Percentage change with an explicit sign: "+5.00%", "-5.00%", "0.00%"
pub fn format_signed_percent(value: Decimal) -> String {
    let rounded = round2(value);
    if rounded > Decimal::ZERO {
        format!("+{:.2}%", rounded)
    } else {
        format!("{:.2}%", rounded)
    }
}

/// Greedy word wrap on display width. Words longer than `width` get a line
/// of their own rather than being split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.width() + 1 + word.width() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
