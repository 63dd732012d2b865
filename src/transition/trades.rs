//! Trade selection and ranking
//!
//! Filters the holding/trade sheet down to real trades, masks account numbers,
//! and ranks the largest buys and sells independently.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::importers::Table;

pub const COL_TICKER: &str = "Ticker";
pub const COL_SECURITY_NAME: &str = "Security Name";
pub const COL_ACCOUNT_NUMBER: &str = "Account Number";
pub const COL_TRADE_AMOUNT: &str = "Trade $";
pub const COL_TRADE_GAIN: &str = "Trade G/L $";

/// Ticker marker for uninvested sweep cash
pub const CUSTODIAL_CASH_MARKER: &str = "CUSTODIAL_CASH";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    pub account_last4: String,
    pub ticker: String,
    pub security_name: String,
    /// Positive for buys, negative for sells
    pub trade_amount: Decimal,
    pub realized_gain: Decimal,
    pub is_custodial_cash: bool,
    /// Data row index in the source sheet, used to order equal amounts
    pub source_row: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "Buys",
            TradeSide::Sell => "Sells",
        }
    }

    fn matches(&self, amount: Decimal) -> bool {
        match self {
            TradeSide::Buy => amount > Decimal::ZERO,
            TradeSide::Sell => amount < Decimal::ZERO,
        }
    }
}

/// Largest trades on one side, by absolute amount
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTradeList {
    pub side: TradeSide,
    pub trades: Vec<TradeRecord>,
}

impl RankedTradeList {
    /// Rank eligible trades of `side`, keeping at most `limit`
    pub fn rank(side: TradeSide, eligible: &[TradeRecord], limit: usize) -> Self {
        let mut trades: Vec<TradeRecord> = eligible
            .iter()
            .filter(|t| side.matches(t.trade_amount))
            .cloned()
            .collect();

        trades.sort_by(|a, b| {
            b.trade_amount
                .abs()
                .cmp(&a.trade_amount.abs())
                .then(a.source_row.cmp(&b.source_row))
        });
        trades.truncate(limit);

        Self { side, trades }
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }
}

/// Ranked buys and sells for one transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeSelection {
    pub buys: RankedTradeList,
    pub sells: RankedTradeList,
}

/// Last four characters of an account number, ignoring any ".0" style suffix
pub fn mask_account(raw: &str) -> String {
    let whole = raw.trim().split('.').next().unwrap_or_default();
    let chars: Vec<char> = whole.chars().collect();
    let start = chars.len().saturating_sub(4);
    chars[start..].iter().collect()
}

pub fn is_custodial_cash(ticker: &str) -> bool {
    ticker.to_uppercase().contains(CUSTODIAL_CASH_MARKER)
}

/// Read every row with a non-zero trade amount, custodial cash included
pub fn read_trades(table: &Table) -> Result<Vec<TradeRecord>> {
    let col_ticker = table.require_column(COL_TICKER)?;
    let col_name = table.require_column(COL_SECURITY_NAME)?;
    let col_account = table.require_column(COL_ACCOUNT_NUMBER)?;
    let col_amount = table.require_column(COL_TRADE_AMOUNT)?;
    // A missing gain column means no realized gains
    let col_gain = table.column(COL_TRADE_GAIN);

    let records = table
        .rows()
        .enumerate()
        .filter_map(|(index, row)| {
            let trade_amount = row.decimal(col_amount).filter(|a| !a.is_zero())?;
            let ticker = row.text(col_ticker).unwrap_or_default();

            Some(TradeRecord {
                account_last4: mask_account(&row.text(col_account).unwrap_or_default()),
                is_custodial_cash: is_custodial_cash(&ticker),
                ticker,
                security_name: row.text(col_name).unwrap_or_default(),
                trade_amount,
                realized_gain: col_gain
                    .map(|col| row.decimal_or_zero(col))
                    .unwrap_or(Decimal::ZERO),
                source_row: index,
            })
        })
        .collect();

    Ok(records)
}

/// Select the top `limit` buys and sells from the holding/trade sheet
pub fn select_trades(table: &Table, limit: usize) -> Result<TradeSelection> {
    let eligible: Vec<TradeRecord> = read_trades(table)?
        .into_iter()
        .filter(|t| !t.is_custodial_cash)
        .collect();

    let selection = TradeSelection {
        buys: RankedTradeList::rank(TradeSide::Buy, &eligible, limit),
        sells: RankedTradeList::rank(TradeSide::Sell, &eligible, limit),
    };

    debug!(
        "{} eligible trades -> {} buys, {} sells",
        eligible.len(),
        selection.buys.len(),
        selection.sells.len()
    );
    Ok(selection)
}
