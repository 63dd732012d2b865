// Transition module - derivations from the raw export sheets

pub mod allocation;
pub mod financials;
pub mod model;
pub mod trades;

pub use allocation::{normalize_allocation, AllocationRow, LabelCleaner, LabelRule, CASH_LABEL};
pub use financials::{
    read_gain_loss, summarize_accounts, tax_impact_pct, AccountSummary, GainLossSummary,
};
pub use model::{build_report_model, identify_target_model, ReportModel};
pub use trades::{select_trades, RankedTradeList, TradeRecord, TradeSelection, TradeSide};
